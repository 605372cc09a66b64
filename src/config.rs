use std::{num::NonZeroUsize, path::PathBuf};

pub const DEFAULT_CELL_COUNT: usize = 30_000;

/// Everything the code generator itself needs to know
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Size in bytes of the generated program's cell buffer
    pub cell_count: NonZeroUsize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            cell_count: NonZeroUsize::new(DEFAULT_CELL_COUNT).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// The last step a build runs, its output is the one named by `-o`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    /// Stop once the assembly is written
    Compile,
    /// Stop once the object file is written
    Assemble,
    /// Produce an executable
    #[default]
    Link,
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub stage: Stage,
    pub compiler: CompilerConfig,
    pub keep_intermediates: bool,
    pub verbose: bool,
}

impl BuildOptions {
    pub fn new(input: impl Into<PathBuf>) -> BuildOptions {
        BuildOptions {
            input: input.into(),
            output: None,
            stage: Stage::default(),
            compiler: CompilerConfig::default(),
            keep_intermediates: false,
            verbose: false,
        }
    }
}
