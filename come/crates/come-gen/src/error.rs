//! Error types for codegen.
//!
//! Per spec §7, codegen's only hard failure path is the output file not
//! opening — `come_util::CodegenError` already carries that single variant,
//! so this crate aliases it rather than defining its own enum.

pub use come_util::CodegenError;

pub type Result<T> = std::result::Result<T, CodegenError>;
