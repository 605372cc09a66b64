//! Compiler for binary2, an 8 symbol esoteric language, down to i386 linux assembly.

pub mod codegen;
pub mod config;
pub mod driver;
pub mod error;
pub mod lexer;
pub mod toolchain;

pub use codegen::{compile, CodegenError, CompileSummary};
pub use config::{BuildOptions, CompilerConfig, Stage};
pub use error::Error;
