use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, ErrorKind},
    path::{Path, PathBuf},
    time::Instant,
};

use colored::Colorize;

use crate::{
    codegen::{compile, CompileSummary},
    config::{BuildOptions, CompilerConfig, Stage},
    error::Error,
    toolchain::{Assembler, Linker},
};

/// Executable name when `-o` isn't given
pub const DEFAULT_EXECUTABLE: &str = "out";

/// `prog.bin2` -> `prog.<ext>`, only the final component's suffix is touched
pub fn replace_extension(path: &Path, ext: &str) -> PathBuf {
    path.with_extension(ext)
}

pub fn assembly_path(options: &BuildOptions) -> PathBuf {
    match (&options.output, options.stage) {
        (Some(output), Stage::Compile) => output.clone(),
        _ => replace_extension(&options.input, "s"),
    }
}

pub fn object_path(options: &BuildOptions) -> PathBuf {
    match (&options.output, options.stage) {
        (Some(output), Stage::Assemble) => output.clone(),
        _ => replace_extension(&options.input, "o"),
    }
}

pub fn executable_path(options: &BuildOptions) -> PathBuf {
    options
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXECUTABLE))
}

/// Fails if writing `output` would truncate `input`
pub fn ensure_distinct(input: &Path, output: &Path) -> Result<(), Error> {
    // an output that doesn't exist yet can't be the input
    let same = match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(input), Ok(output)) => input == output,
        _ => false,
    };

    if same {
        Err(Error::Overwrite {
            path: output.to_path_buf(),
        })
    } else {
        Ok(())
    }
}

/// Deletes a half written file, handing back its path if it's still there
pub fn remove_partial(path: &Path) -> Option<PathBuf> {
    match fs::remove_file(path) {
        Ok(()) => None,
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(_) => Some(path.to_path_buf()),
    }
}

/// Compiles `input` into a new assembly file at `output`.
///
/// A failed compile never leaves a half written `output` behind, unless it
/// can't be removed, in which case the error names it.
pub fn compile_file(
    input: &Path,
    output: &Path,
    config: &CompilerConfig,
) -> Result<CompileSummary, Error> {
    let source = File::open(input).map_err(|source| Error::Open {
        path: input.to_path_buf(),
        source,
    })?;
    ensure_distinct(input, output)?;
    let asm = File::create(output).map_err(|source| Error::Create {
        path: output.to_path_buf(),
        source,
    })?;

    compile(BufReader::new(source), BufWriter::new(asm), config).map_err(|source| {
        Error::Compile {
            path: input.to_path_buf(),
            source,
            leftover: remove_partial(output),
        }
    })
}

pub struct Driver<'a> {
    options: &'a BuildOptions,
    assembler: &'a dyn Assembler,
    linker: &'a dyn Linker,
}

impl<'a> Driver<'a> {
    pub fn new(
        options: &'a BuildOptions,
        assembler: &'a dyn Assembler,
        linker: &'a dyn Linker,
    ) -> Driver<'a> {
        Driver {
            options,
            assembler,
            linker,
        }
    }

    fn discard(&self, path: &Path) -> Result<(), Error> {
        if self.options.keep_intermediates {
            return Ok(());
        }
        fs::remove_file(path).map_err(|source| Error::Remove {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Runs every step up to the configured stage, returning the final artifact
    pub fn run(&self) -> Result<PathBuf, Error> {
        let verbose = self.options.verbose;
        let input = &self.options.input;

        // every artifact this build writes, checked before anything is touched
        let asm_path = assembly_path(self.options);
        let obj_path = object_path(self.options);
        let exe_path = executable_path(self.options);
        ensure_distinct(input, &asm_path)?;
        if self.options.stage != Stage::Compile {
            ensure_distinct(input, &obj_path)?;
        }
        if self.options.stage == Stage::Link {
            ensure_distinct(input, &exe_path)?;
        }

        if verbose {
            println!(
                "{} {} -> {}",
                "Compiling".blue(),
                input.display(),
                asm_path.display()
            );
        }
        let now = Instant::now();
        let summary = compile_file(input, &asm_path, &self.options.compiler)?;
        if verbose {
            println!(
                "{} {:.2?} ({} tokens from {} bytes, {} loops, max depth {})",
                "Finished compiling in".green(),
                now.elapsed(),
                summary.tokens,
                summary.bytes_scanned,
                summary.loops,
                summary.max_depth
            );
        }
        if self.options.stage == Stage::Compile {
            return Ok(asm_path);
        }

        if verbose {
            println!(
                "{} {} -> {}",
                "Assembling".blue(),
                asm_path.display(),
                obj_path.display()
            );
        }
        let now = Instant::now();
        self.assembler.assemble(&asm_path, &obj_path)?;
        self.discard(&asm_path)?;
        if verbose {
            println!("{} {:.2?}", "Finished assembling in".green(), now.elapsed());
        }
        if self.options.stage == Stage::Assemble {
            return Ok(obj_path);
        }

        if verbose {
            println!(
                "{} {} -> {}",
                "Linking".blue(),
                obj_path.display(),
                exe_path.display()
            );
        }
        let now = Instant::now();
        self.linker.link(&[&obj_path], &exe_path)?;
        self.discard(&obj_path)?;
        if verbose {
            println!("{} {:.2?}", "Finished linking in".green(), now.elapsed());
        }

        Ok(exe_path)
    }
}
