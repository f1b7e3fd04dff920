//! Operator and punctuation lexing.
//!
//! Multi-character operators are tried before single-character ones
//! (spec §4.1), longest first, so `<<=` is never split into `<<` and `=`
//! nor `<` `<` `=`.

use super::core::Lexer;
use crate::{Token, TokenKind};

/// Ordered longest-first; single-byte punctuation falls through below.
const MULTI_CHAR: &[(&[u8], TokenKind)] = &[
    (b"<<=", TokenKind::ShlEq),
    (b">>=", TokenKind::ShrEq),
    (b"&&", TokenKind::AndAnd),
    (b"||", TokenKind::OrOr),
    (b"==", TokenKind::EqEq),
    (b"!=", TokenKind::NotEq),
    (b"<=", TokenKind::LtEq),
    (b">=", TokenKind::GtEq),
    (b"+=", TokenKind::PlusEq),
    (b"-=", TokenKind::MinusEq),
    (b"*=", TokenKind::StarEq),
    (b"/=", TokenKind::SlashEq),
    (b"%=", TokenKind::PercentEq),
    (b"&=", TokenKind::AmpEq),
    (b"|=", TokenKind::PipeEq),
    (b"^=", TokenKind::CaretEq),
    (b"++", TokenKind::PlusPlus),
    (b"--", TokenKind::MinusMinus),
    (b"<<", TokenKind::Shl),
    (b">>", TokenKind::Shr),
];

impl<'source> Lexer<'source> {
    pub(crate) fn lex_operator(&mut self, start: usize, line: u32) -> Token {
        for (literal, kind) in MULTI_CHAR {
            if self.cursor().eat(literal) {
                return self.finish(*kind, start, line);
            }
        }

        let c = self.cursor().advance();
        let kind = match c {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b':' => TokenKind::Colon,
            b'.' => TokenKind::Dot,
            b'?' => TokenKind::Question,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'!' => TokenKind::Bang,
            b'~' => TokenKind::Tilde,
            b'&' => TokenKind::Amp,
            b'|' => TokenKind::Pipe,
            b'^' => TokenKind::Caret,
            b'<' => TokenKind::Lt,
            b'>' => TokenKind::Gt,
            b'=' => TokenKind::Eq,
            _ => TokenKind::Invalid,
        };
        self.finish(kind, start, line)
    }
}

#[cfg(test)]
mod tests {
    use crate::{lex, TokenKind};

    #[test]
    fn shift_assign_is_not_split() {
        let tokens = lex("a <<= 1");
        assert_eq!(tokens[1].kind, TokenKind::ShlEq);
    }

    #[test]
    fn single_less_than_still_works() {
        let tokens = lex("a < b");
        assert_eq!(tokens[1].kind, TokenKind::Lt);
    }

    #[test]
    fn plus_plus_is_one_token() {
        let tokens = lex("i++");
        assert_eq!(tokens[1].kind, TokenKind::PlusPlus);
    }

    #[test]
    fn unrecognised_byte_is_invalid_and_does_not_abort() {
        let tokens = lex("a ` b");
        assert_eq!(tokens[1].kind, TokenKind::Invalid);
        assert_eq!(tokens[2].text, "b");
    }
}
