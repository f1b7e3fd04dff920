//! Core lexer: the dispatch loop that turns a source string into tokens.

use crate::cursor::Cursor;
use crate::{Token, TokenKind};

/// Lexer for the source language.
///
/// Holds nothing beyond a cursor: the lexer is single-pass and never
/// backtracks across tokens, so there is no shared state to reset between
/// translation units (spec §5).
pub struct Lexer<'source> {
    cursor: Cursor<'source>,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Tokenizes the entire source, terminating the list with `Eof`.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is(TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.cursor.position();
        let line = self.cursor.line();

        if self.cursor.is_at_end() {
            return Token::new(TokenKind::Eof, "", line);
        }

        let c = self.cursor.current();
        match c {
            b'"' => self.lex_string(start, line),
            b'\'' => self.lex_char(start, line),
            _ if c.is_ascii_digit() => self.lex_number(start, line),
            _ if is_ident_start(c) => self.lex_identifier(start, line),
            _ => self.lex_operator(start, line),
        }
    }

    pub(crate) fn cursor(&mut self) -> &mut Cursor<'source> {
        &mut self.cursor
    }

    /// Builds a token whose text is the exact slice consumed since `start`.
    pub(crate) fn finish(&self, kind: TokenKind, start: usize, line: u32) -> Token {
        Token::new(kind, self.cursor.slice(start, self.cursor.position()), line)
    }
}

pub(crate) fn is_ident_start(c: u8) -> bool {
    c == b'_' || c.is_ascii_alphabetic()
}

pub(crate) fn is_ident_continue(c: u8) -> bool {
    c == b'_' || c.is_ascii_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_byte_advances_one_and_continues() {
        let tokens = Lexer::new("a `` b").tokenize();
        // `a`, two Invalid tokens for the backticks, `b`, Eof
        assert!(tokens.iter().any(|t| t.is(TokenKind::Invalid)));
        assert!(tokens.last().unwrap().is(TokenKind::Eof));
    }
}
