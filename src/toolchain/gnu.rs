use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use super::{Assembler, Linker, ToolchainError};

fn describe(program: &Path, args: &[OsString]) -> String {
    let mut command = program.display().to_string();
    for arg in args {
        command.push(' ');
        command.push_str(&arg.to_string_lossy());
    }
    command
}

fn run(program: &Path, args: Vec<OsString>) -> Result<(), ToolchainError> {
    let status = Command::new(program)
        .args(&args)
        .status()
        .map_err(|source| ToolchainError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(ToolchainError::Failed {
            command: describe(program, &args),
            status,
        })
    }
}

/// GNU `as` in 32 bit mode
#[derive(Debug, Clone)]
pub struct GnuAssembler {
    pub program: PathBuf,
}

impl Default for GnuAssembler {
    fn default() -> Self {
        GnuAssembler {
            program: PathBuf::from("as"),
        }
    }
}

impl GnuAssembler {
    pub fn args(&self, source: &Path, object: &Path) -> Vec<OsString> {
        vec![
            "--32".into(),
            "-o".into(),
            object.as_os_str().to_owned(),
            source.as_os_str().to_owned(),
        ]
    }
}

impl Assembler for GnuAssembler {
    fn assemble(&self, source: &Path, object: &Path) -> Result<(), ToolchainError> {
        run(&self.program, self.args(source, object))
    }
}

/// GNU `ld` producing a static i386 ELF
#[derive(Debug, Clone)]
pub struct GnuLinker {
    pub program: PathBuf,
}

impl Default for GnuLinker {
    fn default() -> Self {
        GnuLinker {
            program: PathBuf::from("ld"),
        }
    }
}

impl GnuLinker {
    pub fn args(&self, objects: &[&Path], executable: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-m".into(),
            "elf_i386".into(),
            "-o".into(),
            executable.as_os_str().to_owned(),
        ];
        args.extend(objects.iter().map(|object| object.as_os_str().to_owned()));
        args
    }
}

impl Linker for GnuLinker {
    fn link(&self, objects: &[&Path], executable: &Path) -> Result<(), ToolchainError> {
        run(&self.program, self.args(objects, executable))
    }
}
