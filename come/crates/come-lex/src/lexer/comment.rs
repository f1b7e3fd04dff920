//! Whitespace and comment skipping.

use super::Lexer;

impl<'source> Lexer<'source> {
    /// Skips whitespace, `//` line comments, and `/* */` block comments.
    ///
    /// Block comments span lines and do not nest (spec §4.1): the first
    /// `*/` encountered closes the comment regardless of any `/*` seen
    /// since.
    pub(crate) fn skip_trivia(&mut self) {
        loop {
            let cursor = self.cursor();
            match (cursor.current(), cursor.peek(1)) {
                (b' ' | b'\t' | b'\r' | b'\n', _) => {
                    self.cursor().advance();
                }
                (b'/', b'/') => {
                    while !self.cursor().is_at_end() && self.cursor().current() != b'\n' {
                        self.cursor().advance();
                    }
                }
                (b'/', b'*') => {
                    self.cursor().advance();
                    self.cursor().advance();
                    while !self.cursor().is_at_end() {
                        if self.cursor().current() == b'*' && self.cursor().peek(1) == b'/' {
                            self.cursor().advance();
                            self.cursor().advance();
                            break;
                        }
                        self.cursor().advance();
                    }
                }
                _ => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lex;

    #[test]
    fn line_comment_is_skipped() {
        let tokens = lex("a // comment\nb");
        assert_eq!(tokens[0].text, "a");
        assert_eq!(tokens[1].text, "b");
    }

    #[test]
    fn block_comment_spans_lines_and_first_close_wins() {
        let tokens = lex("a /* one /* two */ three */ b");
        // the first `*/` closes the comment, so "three */ b" is live source.
        assert_eq!(tokens[0].text, "a");
        assert_eq!(tokens[1].text, "three");
    }

    #[test]
    fn block_comment_advances_line_count() {
        let tokens = lex("a /*\n\n*/ b");
        assert_eq!(tokens[1].line, 3);
    }
}
