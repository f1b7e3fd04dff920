//! Error types shared by the codegen and driver crates.
//!
//! Per spec §7, the lexer never fails and the parser reports through
//! [`crate::Diagnostic`] rather than returning `Err`. Codegen's only hard
//! failure path is the output file; the driver layers file-resolution and
//! toolchain-invocation failures on top of that.

use std::path::PathBuf;
use thiserror::Error;

/// Codegen's only hard failure path (spec §7): the output C file could
/// not be opened. No bytes are written when this is returned.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("failed to open output file {path}: {source}")]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the `come` CLI driver before or after the core
/// lex/parse/codegen pipeline runs.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("input not found: {0}")]
    InputNotFound(PathBuf),

    #[error("no main.co found in {0}")]
    NoMainInDirectory(PathBuf),

    #[error("source file does not end in .co: {0}")]
    BadExtension(PathBuf),

    #[error("failed to read source file {path}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("module '{0}' imported but no '{0}.co' found next to the entry file")]
    ImportNotFound(String),

    #[error("compilation failed: {0} error(s) reported")]
    CompilationFailed(usize),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("host C compiler '{compiler}' failed with status {status}")]
    ToolchainFailed { compiler: String, status: i32 },

    #[error("failed to invoke host C compiler '{compiler}': {source}")]
    ToolchainSpawn {
        compiler: String,
        #[source]
        source: std::io::Error,
    },
}
