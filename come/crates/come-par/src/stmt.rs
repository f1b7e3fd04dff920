//! Statement parsing: blocks, control flow, declarations, and the
//! defensive resynchronisation spec §4.2 requires of every statement
//! production.

use come_lex::TokenKind;

use crate::ast::{Node, NodeKind};
use crate::Parser;

impl Parser {
    pub(crate) fn parse_block(&mut self) -> Node {
        let line = self.line();
        self.expect(TokenKind::LBrace, "'{'");
        let mut statements = Vec::new();
        while !self.is(TokenKind::RBrace) && !self.at_eof() {
            let pos_before = self.pos;
            statements.push(self.parse_statement());
            self.synchronize(pos_before);
        }
        self.expect(TokenKind::RBrace, "'}'");
        Node::with_children(NodeKind::Block, "", line, statements)
    }

    fn parse_statement(&mut self) -> Node {
        match self.peek().kind {
            TokenKind::LBrace => self.parse_block(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                let line = self.line();
                self.advance();
                self.eat(TokenKind::Semicolon);
                Node::new(NodeKind::Break, "", line)
            }
            TokenKind::Continue => {
                let line = self.line();
                self.advance();
                self.eat(TokenKind::Semicolon);
                Node::new(NodeKind::Continue, "", line)
            }
            _ => self.parse_simple_statement(),
        }
    }

    fn parse_if(&mut self) -> Node {
        let line = self.line();
        self.advance(); // if
        self.expect(TokenKind::LParen, "'('");
        let cond = self.parse_expr();
        self.expect(TokenKind::RParen, "')'");
        let then_block = self.parse_block();
        if self.eat(TokenKind::Else) {
            let else_branch = if self.is(TokenKind::If) {
                self.parse_if()
            } else {
                self.parse_block()
            };
            return Node::with_children(NodeKind::If, "", line, vec![cond, then_block, else_branch]);
        }
        Node::with_children(NodeKind::If, "", line, vec![cond, then_block])
    }

    fn parse_while(&mut self) -> Node {
        let line = self.line();
        self.advance(); // while
        self.expect(TokenKind::LParen, "'('");
        let cond = self.parse_expr();
        self.expect(TokenKind::RParen, "')'");
        let body = self.parse_block();
        Node::with_children(NodeKind::While, "", line, vec![cond, body])
    }

    fn parse_do_while(&mut self) -> Node {
        let line = self.line();
        self.advance(); // do
        let body = self.parse_block();
        self.expect(TokenKind::While, "'while'");
        self.expect(TokenKind::LParen, "'('");
        let cond = self.parse_expr();
        self.expect(TokenKind::RParen, "')'");
        self.eat(TokenKind::Semicolon);
        Node::with_children(NodeKind::DoWhile, "", line, vec![body, cond])
    }

    fn parse_for(&mut self) -> Node {
        let line = self.line();
        self.advance(); // for
        self.expect(TokenKind::LParen, "'('");

        let init = if self.is(TokenKind::Semicolon) {
            self.advance();
            Node::new(NodeKind::Empty, "", line)
        } else if self.looks_like_var_decl() {
            self.parse_var_decl()
        } else {
            let expr = self.parse_expr();
            self.expect(TokenKind::Semicolon, "';'");
            expr
        };

        let cond = if self.is(TokenKind::Semicolon) {
            Node::new(NodeKind::Empty, "", line)
        } else {
            self.parse_expr()
        };
        self.expect(TokenKind::Semicolon, "';'");

        let step = if self.is(TokenKind::RParen) {
            Node::new(NodeKind::Empty, "", line)
        } else {
            self.parse_assign_or_expr()
        };
        self.expect(TokenKind::RParen, "')'");

        let body = self.parse_block();
        Node::with_children(NodeKind::For, "", line, vec![init, cond, step, body])
    }

    fn parse_switch(&mut self) -> Node {
        let line = self.line();
        self.advance(); // switch
        self.expect(TokenKind::LParen, "'('");
        let scrutinee = self.parse_expr();
        self.expect(TokenKind::RParen, "')'");
        self.expect(TokenKind::LBrace, "'{'");

        let mut children = vec![scrutinee];
        while !self.is(TokenKind::RBrace) && !self.at_eof() {
            let pos_before = self.pos;
            match self.peek().kind {
                TokenKind::Case => children.push(self.parse_case()),
                TokenKind::Default => children.push(self.parse_default()),
                _ => {
                    let cur_line = self.line();
                    let found = self.peek().text.clone();
                    self.handler
                        .error(format!("expected 'case' or 'default', found '{}'", found), cur_line);
                }
            }
            self.synchronize(pos_before);
        }
        self.expect(TokenKind::RBrace, "'}'");
        Node::with_children(NodeKind::Switch, "", line, children)
    }

    /// Codegen, not the parser, injects the mandatory trailing `break`
    /// (spec §4.3 — the source has no implicit fallthrough); this just
    /// collects the case's value and body statements.
    fn parse_case(&mut self) -> Node {
        let line = self.line();
        self.advance(); // case
        let value = self.parse_expr();
        self.expect(TokenKind::Colon, "':'");
        let mut children = vec![value];
        while !matches!(self.peek().kind, TokenKind::Case | TokenKind::Default | TokenKind::RBrace) {
            let pos_before = self.pos;
            children.push(self.parse_statement());
            self.synchronize(pos_before);
        }
        Node::with_children(NodeKind::Case, "", line, children)
    }

    fn parse_default(&mut self) -> Node {
        let line = self.line();
        self.advance(); // default
        self.expect(TokenKind::Colon, "':'");
        let mut children = Vec::new();
        while !matches!(self.peek().kind, TokenKind::Case | TokenKind::Default | TokenKind::RBrace) {
            let pos_before = self.pos;
            children.push(self.parse_statement());
            self.synchronize(pos_before);
        }
        Node::with_children(NodeKind::Default, "", line, children)
    }

    fn parse_return(&mut self) -> Node {
        let line = self.line();
        self.advance(); // return
        if self.eat(TokenKind::Semicolon) {
            return Node::new(NodeKind::Return, "", line);
        }
        let value = self.parse_expr();
        self.eat(TokenKind::Semicolon);
        Node::with_children(NodeKind::Return, "", line, vec![value])
    }

    /// Disambiguates a var-decl (`Type name …;`) from an expression
    /// statement by speculatively parsing a type and checking whether
    /// another identifier follows, then rewinding.
    pub(crate) fn looks_like_var_decl(&mut self) -> bool {
        if !matches!(
            self.peek().kind,
            TokenKind::Ident | TokenKind::Struct | TokenKind::Union | TokenKind::Enum
        ) {
            return false;
        }
        let saved = self.pos;
        let _ = self.parse_type_text();
        let is_decl = self.is(TokenKind::Ident);
        self.pos = saved;
        is_decl
    }

    fn parse_simple_statement(&mut self) -> Node {
        if self.looks_like_var_decl() {
            return self.parse_var_decl();
        }
        let line = self.line();
        let expr = self.parse_expr();
        if self.peek().kind.is_assign_op() {
            let op = self.advance().text;
            let rhs = self.parse_expr();
            self.eat(TokenKind::Semicolon);
            return Node::with_children(NodeKind::Assign, op, line, vec![expr, rhs]);
        }
        self.eat(TokenKind::Semicolon);
        expr
    }

    /// Like [`Self::parse_simple_statement`] but without the trailing
    /// `;` consumption, for a `for` loop's step clause.
    fn parse_assign_or_expr(&mut self) -> Node {
        let line = self.line();
        let expr = self.parse_expr();
        if self.peek().kind.is_assign_op() {
            let op = self.advance().text;
            let rhs = self.parse_expr();
            return Node::with_children(NodeKind::Assign, op, line, vec![expr, rhs]);
        }
        expr
    }

    pub(crate) fn parse_var_decl(&mut self) -> Node {
        let (type_text, line) = self.parse_type_text();
        let name = self.expect(TokenKind::Ident, "a variable name").text;
        let array_suffix = self.parse_optional_array_suffix();
        let init = if self.eat(TokenKind::Eq) {
            self.parse_initializer()
        } else {
            Node::zero(line)
        };
        self.eat(TokenKind::Semicolon);
        let ty = Node::new(NodeKind::Ident, format!("{}{}", type_text, array_suffix), line);
        Node::with_children(NodeKind::VarDecl, name, line, vec![init, ty])
    }

    /// C-style trailing array declarator on a name (`int scores[]`),
    /// distinct from the prefix `T[N]` form `parse_type_text` already
    /// handles.
    pub(crate) fn parse_optional_array_suffix(&mut self) -> String {
        if self.eat(TokenKind::LBracket) {
            let suffix = if self.is(TokenKind::Number) {
                format!("[{}]", self.advance().text)
            } else {
                "[]".to_string()
            };
            self.expect(TokenKind::RBracket, "']'");
            suffix
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, NodeKind};

    #[test]
    fn if_else_chain_is_nested_under_else() {
        let (program, handler) =
            parse(come_lex::lex("int f() { if (a) { } else if (b) { } else { } }"));
        assert!(!handler.has_errors());
        let body = program.children[0].children.last().unwrap();
        let outer_if = &body.children[0];
        assert_eq!(outer_if.kind, NodeKind::If);
        assert_eq!(outer_if.children[2].kind, NodeKind::If);
    }

    #[test]
    fn for_loop_with_missing_clauses_yields_empty_nodes() {
        let (program, _) = parse(come_lex::lex("int f() { for (;;) { } }"));
        let body = program.children[0].children.last().unwrap();
        let for_node = &body.children[0];
        assert_eq!(for_node.children[0].kind, NodeKind::Empty);
        assert_eq!(for_node.children[1].kind, NodeKind::Empty);
        assert_eq!(for_node.children[2].kind, NodeKind::Empty);
    }

    #[test]
    fn uninitialised_var_decl_gets_synthetic_zero() {
        let (program, _) = parse(come_lex::lex("int f() { int x; }"));
        let body = program.children[0].children.last().unwrap();
        let var_decl = &body.children[0];
        assert_eq!(var_decl.kind, NodeKind::VarDecl);
        assert_eq!(var_decl.children[0].text, "0");
    }

    #[test]
    fn switch_case_does_not_inject_break_in_the_ast() {
        let (program, _) = parse(come_lex::lex("int f() { switch (x) { case 1: y; } }"));
        let body = program.children[0].children.last().unwrap();
        let switch_node = &body.children[0];
        let case_node = &switch_node.children[1];
        // value + one statement, no parser-injected break (spec §4.3:
        // codegen owns the mandatory break).
        assert_eq!(case_node.children.len(), 2);
    }
}
