extern crate clap;

use std::{
    collections::HashSet,
    fs::File,
    io::BufReader,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    process::ExitCode,
};

use binary2::{
    config::{BuildOptions, CompilerConfig, Stage},
    driver::Driver,
    lexer::lexer::Lexer,
    toolchain::{GnuAssembler, GnuLinker},
    Error,
};
use clap::{Parser, ValueEnum};
use colored::Colorize;

/// binary2 compiler: source -> i386 assembly -> object -> executable
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to compile
    #[arg()]
    file: PathBuf,

    /// Name of the final output (defaults to `out` when linking)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compile only, output assembly
    #[arg(short = 'S', conflicts_with = "assemble_only")]
    compile_only: bool,

    /// Compile and assemble, output an object file
    #[arg(short = 'c')]
    assemble_only: bool,

    /// Size of the cell buffer in the generated program
    #[arg(long, default_value_t = CompilerConfig::default().cell_count)]
    cell_count: NonZeroUsize,

    /// Don't remove the assembly/object files once they've been consumed
    #[arg(long)]
    keep_intermediates: bool,

    #[arg(long, default_value = "as")]
    assembler: PathBuf,

    #[arg(long, default_value = "ld")]
    linker: PathBuf,

    #[arg(short, long, value_enum)]
    dump: Vec<Dump>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Hash, PartialEq, Eq)]
enum Dump {
    /// Output the token stream with comments stripped
    Tokens,
}

impl Args {
    fn stage(&self) -> Stage {
        if self.compile_only {
            Stage::Compile
        } else if self.assemble_only {
            Stage::Assemble
        } else {
            Stage::Link
        }
    }

    fn build_options(&self) -> BuildOptions {
        BuildOptions {
            input: self.file.clone(),
            output: self.output.clone(),
            stage: self.stage(),
            compiler: CompilerConfig {
                cell_count: self.cell_count,
            },
            keep_intermediates: self.keep_intermediates,
            verbose: self.verbose,
        }
    }
}

fn dump_tokens(path: &Path) -> Result<(), Error> {
    let source = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut lexer = Lexer::new(BufReader::new(source));
    let tokens = lexer.collect_results().map_err(|e| Error::Compile {
        path: path.to_path_buf(),
        source: e.into(),
        leftover: None,
    })?;
    println!("{}", tokens.iter().map(|t| t.symbol()).collect::<String>());
    Ok(())
}

fn run(args: &Args) -> Result<(), Error> {
    let dumps: HashSet<&Dump> = args.dump.iter().collect();
    if dumps.contains(&Dump::Tokens) {
        dump_tokens(&args.file)?;
    }

    let options = args.build_options();
    let assembler = GnuAssembler {
        program: args.assembler.clone(),
    };
    let linker = GnuLinker {
        program: args.linker.clone(),
    };

    let artifact = Driver::new(&options, &assembler, &linker).run()?;
    if options.verbose {
        println!("{} {}", "Wrote".green(), artifact.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{0:}: {1:}", "error".red(), e);
            ExitCode::FAILURE
        }
    }
}
