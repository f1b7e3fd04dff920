//! come-util - shared diagnostics and error types for the `come` pipeline.
//!
//! This crate plays the same role `faxc-util` plays for the Fax compiler:
//! a small, dependency-light foundation the lexer, parser, codegen, and
//! driver crates all sit on top of. Unlike `faxc-util` it carries no
//! string interner or byte-span machinery — the data model this pipeline
//! implements (spec §3) tracks only a 1-based source line per token/node,
//! never a byte range, so there is nothing for a `Span`/`SourceMap` pair
//! to do here.

pub mod diagnostic;
pub mod error;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use error::{CodegenError, DriverError};

pub use rustc_hash::{FxHashMap, FxHashSet};
