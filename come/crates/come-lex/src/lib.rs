//! come-lex - lexical analyzer for the source language.
//!
//! Splits a source file into a flat, line-numbered token list (spec §4.1).
//! The lexer never fails: unknown bytes are advanced past one at a time
//! and reported as [`TokenKind::Invalid`] tokens, leaving diagnosis to the
//! parser (spec §7 — "diagnostics are the parser's job").
//!
//! Structured the way the teacher splits scan rules across
//! `lexer/{number,identifier,string,operator,comment}.rs`, with
//! `lexer/core.rs` holding the driving loop.

mod cursor;
mod lexer;

pub use lexer::Lexer;

/// The closed set of lexical categories a [`Token`] can carry.
///
/// `text` (not this tag) is what preserves a token's exact spelling, so
/// this enum only needs to distinguish shape, never content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Module,
    Import,
    Alias,
    Const,
    Struct,
    Union,
    Enum,
    Method,
    Export,
    If,
    Else,
    While,
    Do,
    For,
    Switch,
    Case,
    Default,
    Return,
    Break,
    Continue,
    True,
    False,

    Ident,
    Number,
    Str,
    Char,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Question,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Tilde,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Logical
    AndAnd,
    OrOr,

    // Assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,

    // Increment/decrement
    PlusPlus,
    MinusMinus,

    Eof,
    Invalid,
}

impl TokenKind {
    /// `true` for the assignment family (`=`, `+=`, …), used by the
    /// parser's statement grammar to recognise an assignment regardless
    /// of which compound operator was spelled.
    pub fn is_assign_op(&self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq
                | TokenKind::AmpEq
                | TokenKind::PipeEq
                | TokenKind::CaretEq
                | TokenKind::ShlEq
                | TokenKind::ShrEq
        )
    }
}

/// A lexeme: `{ kind, text, line }` (spec §3). `text` retains the
/// original spelling verbatim — quotes on strings/chars, the leading
/// `0x` on hex numbers, digit-separator-stripped-but-otherwise-intact
/// numeric spellings, and any literal suffix (`u`, `l`, `L`, `f`, `LL`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Lexes an entire source string into a token list terminated by `Eof`.
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

/// Lexes a file by path (spec §4.1's contract: "Input: a file path").
pub fn lex_file(path: &std::path::Path) -> std::io::Result<Vec<Token>> {
    let source = std::fs::read_to_string(path)?;
    Ok(lex(&source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_emits_eof_only() {
        let tokens = lex("");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is(TokenKind::Eof));
    }

    #[test]
    fn lines_are_monotonically_non_decreasing() {
        let tokens = lex("a\nb\n\nc");
        let mut last = 0;
        for token in &tokens {
            assert!(token.line >= 1);
            assert!(token.line >= last);
            last = token.line;
        }
    }
}
