use std::path::PathBuf;

use thiserror::Error;

use crate::{codegen::CodegenError, toolchain::ToolchainError};

fn leftover_note(leftover: Option<&PathBuf>) -> String {
    match leftover {
        Some(path) => format!(" (could not remove partial output {})", path.display()),
        None => String::new(),
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}: could not read file: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: could not write file: {source}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: could not remove intermediate file: {source}", .path.display())]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: output would overwrite the input", .path.display())]
    Overwrite { path: PathBuf },

    #[error("{}: {source}{}", .path.display(), leftover_note(.leftover.as_ref()))]
    Compile {
        path: PathBuf,
        source: CodegenError,
        /// Set when the half written output couldn't be cleaned up
        leftover: Option<PathBuf>,
    },

    #[error(transparent)]
    Toolchain(
        #[from]
        ToolchainError,
    ),
}
