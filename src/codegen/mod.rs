use thiserror::Error;

use crate::lexer::LexerError;

use self::label::Label;

pub mod codegen;
pub mod label;
pub mod loop_stack;

pub use self::codegen::{compile, Codegen};

/// What a finished compile saw, mostly for the verbose report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileSummary {
    /// Recognised symbols (comments excluded)
    pub tokens: usize,
    /// Raw bytes read from the source, comments included
    pub bytes_scanned: usize,
    pub loops: usize,
    pub max_depth: usize,
}

fn join_labels(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|label| label.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("failed to write assembly: {0}")]
    Io(
        #[from]
        std::io::Error,
    ),

    #[error(transparent)]
    Lexer(
        #[from]
        LexerError,
    ),

    #[error("unmatched loop end at line {line}, column {column}")]
    UnmatchedLoopEnd { line: usize, column: usize },

    #[error("unmatched loop start, labels still open: {}", join_labels(.labels))]
    UnmatchedLoopStart { labels: Vec<Label> },

    #[error("out of memory while growing loop stack to {capacity} frames")]
    OutOfMemory { capacity: usize },
}
