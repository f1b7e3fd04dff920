//! Diagnostic reporting infrastructure.
//!
//! The parser is the only component that raises diagnostics (spec §7: the
//! lexer never fails, and codegen's only failure is the I/O error returned
//! from [`crate::error::CodegenError`]). A [`Diagnostic`] is deliberately
//! thin — just a level, a message, and the 1-based source line the parser
//! was resynchronising at — since the source line is the only location
//! information the data model carries (no byte spans, see SPEC_FULL.md §4.6).

mod level;

pub use level::Level;

use std::cell::RefCell;
use std::fmt;

/// A single diagnostic message tied to a source line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub line: u32,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, line: u32) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (line {})", self.level, self.message, self.line)
    }
}

/// Accumulates diagnostics raised during parsing of one translation unit.
///
/// Per spec §4.2's error policy, the parser never aborts on a syntax
/// error — it records a diagnostic here and resynchronises. `Handler` is
/// owned by the `Parser` for the lifetime of one translation unit (§5);
/// it carries no global state.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn error(&self, message: impl Into<String>, line: u32) {
        self.report(Diagnostic::error(message, line));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level.is_error())
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Writes every accumulated diagnostic to the given writer, one per line.
    pub fn emit_to(&self, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        for diagnostic in self.diagnostics.borrow().iter() {
            writeln!(out, "{}", diagnostic)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_no_errors() {
        let handler = Handler::new();
        assert!(!handler.has_errors());
        assert!(handler.diagnostics().is_empty());
    }

    #[test]
    fn reported_error_is_visible() {
        let handler = Handler::new();
        handler.error("unexpected token '}'", 7);
        assert!(handler.has_errors());
        assert_eq!(handler.diagnostics().len(), 1);
        assert_eq!(handler.diagnostics()[0].line, 7);
    }

    #[test]
    fn display_includes_level_message_and_line() {
        let diagnostic = Diagnostic::error("bad token", 3);
        assert_eq!(diagnostic.to_string(), "error: bad token (line 3)");
    }
}
