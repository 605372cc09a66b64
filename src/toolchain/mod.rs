use std::{
    path::{Path, PathBuf},
    process::ExitStatus,
};

use thiserror::Error;

pub mod gnu;

pub use self::gnu::{GnuAssembler, GnuLinker};

/// Turns an assembly file into an object file
pub trait Assembler {
    fn assemble(&self, source: &Path, object: &Path) -> Result<(), ToolchainError>;
}

/// Turns object files into an executable
pub trait Linker {
    fn link(&self, objects: &[&Path], executable: &Path) -> Result<(), ToolchainError>;
}

#[derive(Error, Debug)]
pub enum ToolchainError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("`{command}` failed with {status}")]
    Failed { command: String, status: ExitStatus },
}
