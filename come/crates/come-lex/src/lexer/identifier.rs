//! Identifier and keyword lexing.

use super::core::{is_ident_continue, Lexer};
use crate::{Token, TokenKind};

/// Right-boundary keyword table: a spelling only counts as a keyword if
/// the identifier scanner has already consumed its full maximal-munch
/// extent, so `intern` can never be mistaken for `int` (spec §4.1).
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("module", TokenKind::Module),
    ("import", TokenKind::Import),
    ("alias", TokenKind::Alias),
    ("const", TokenKind::Const),
    ("struct", TokenKind::Struct),
    ("union", TokenKind::Union),
    ("enum", TokenKind::Enum),
    ("method", TokenKind::Method),
    ("export", TokenKind::Export),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("do", TokenKind::Do),
    ("for", TokenKind::For),
    ("switch", TokenKind::Switch),
    ("case", TokenKind::Case),
    ("default", TokenKind::Default),
    ("return", TokenKind::Return),
    ("break", TokenKind::Break),
    ("continue", TokenKind::Continue),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
];

impl<'source> Lexer<'source> {
    pub(crate) fn lex_identifier(&mut self, start: usize, line: u32) -> Token {
        while is_ident_continue(self.cursor().current()) {
            self.cursor().advance();
        }
        let text = self.cursor().slice(start, self.cursor().position());
        let kind = KEYWORDS
            .iter()
            .find(|(kw, _)| *kw == text)
            .map(|(_, kind)| *kind)
            .unwrap_or(TokenKind::Ident);
        Token::new(kind, text, line)
    }
}

#[cfg(test)]
mod tests {
    use crate::{lex, TokenKind};

    #[test]
    fn keyword_prefix_does_not_shadow_longer_identifier() {
        let tokens = lex("intern");
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].text, "intern");
    }

    #[test]
    fn exact_keyword_matches() {
        let tokens = lex("struct");
        assert_eq!(tokens[0].kind, TokenKind::Struct);
    }

    #[test]
    fn underscore_prefixed_identifier_is_ident() {
        let tokens = lex("_private");
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].text, "_private");
    }
}
