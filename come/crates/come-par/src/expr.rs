//! Expression parsing: a Pratt parser over the fixed precedence table in
//! spec §4.2 (ternary lowest, `*`/`/`/`%` highest), plus alias
//! substitution at the primary level (spec §4.5) and aggregate
//! initialisers.

use come_lex::TokenKind;

use crate::ast::{Node, NodeKind};
use crate::Parser;

impl Parser {
    pub(crate) fn parse_expr(&mut self) -> Node {
        self.parse_ternary()
    }

    /// Either an aggregate initialiser (`{ … }`) or a plain expression —
    /// the two contexts a var-decl's right-hand side can take (spec §3).
    pub(crate) fn parse_initializer(&mut self) -> Node {
        if self.is(TokenKind::LBrace) {
            self.parse_aggregate_init()
        } else {
            self.parse_expr()
        }
    }

    fn parse_ternary(&mut self) -> Node {
        let line = self.line();
        let cond = self.parse_or();
        if self.eat(TokenKind::Question) {
            let then_expr = self.parse_ternary();
            self.expect(TokenKind::Colon, "':'");
            let else_expr = self.parse_ternary();
            return Node::with_children(NodeKind::Ternary, "", line, vec![cond, then_expr, else_expr]);
        }
        cond
    }

    fn parse_or(&mut self) -> Node {
        let mut lhs = self.parse_and();
        while self.is(TokenKind::OrOr) {
            let line = self.line();
            let op = self.advance().text;
            let rhs = self.parse_and();
            lhs = Node::with_children(NodeKind::BinaryOp, op, line, vec![lhs, rhs]);
        }
        lhs
    }

    fn parse_and(&mut self) -> Node {
        let mut lhs = self.parse_equality();
        while self.is(TokenKind::AndAnd) {
            let line = self.line();
            let op = self.advance().text;
            let rhs = self.parse_equality();
            lhs = Node::with_children(NodeKind::BinaryOp, op, line, vec![lhs, rhs]);
        }
        lhs
    }

    fn parse_equality(&mut self) -> Node {
        let mut lhs = self.parse_relational();
        while matches!(self.peek().kind, TokenKind::EqEq | TokenKind::NotEq) {
            let line = self.line();
            let op = self.advance().text;
            let rhs = self.parse_relational();
            lhs = Node::with_children(NodeKind::BinaryOp, op, line, vec![lhs, rhs]);
        }
        lhs
    }

    fn parse_relational(&mut self) -> Node {
        let mut lhs = self.parse_additive();
        while matches!(
            self.peek().kind,
            TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq
        ) {
            let line = self.line();
            let op = self.advance().text;
            let rhs = self.parse_additive();
            lhs = Node::with_children(NodeKind::BinaryOp, op, line, vec![lhs, rhs]);
        }
        lhs
    }

    fn parse_additive(&mut self) -> Node {
        let mut lhs = self.parse_multiplicative();
        while matches!(self.peek().kind, TokenKind::Plus | TokenKind::Minus) {
            let line = self.line();
            let op = self.advance().text;
            let rhs = self.parse_multiplicative();
            lhs = Node::with_children(NodeKind::BinaryOp, op, line, vec![lhs, rhs]);
        }
        lhs
    }

    fn parse_multiplicative(&mut self) -> Node {
        let mut lhs = self.parse_unary();
        while matches!(self.peek().kind, TokenKind::Star | TokenKind::Slash | TokenKind::Percent) {
            let line = self.line();
            let op = self.advance().text;
            let rhs = self.parse_unary();
            lhs = Node::with_children(NodeKind::BinaryOp, op, line, vec![lhs, rhs]);
        }
        lhs
    }

    /// `!`, `~`, `*` (deref), `-` (negate) attach tighter than any binary
    /// operator and recurse, so chains like `**p` and `--x` parse (spec
    /// §4.2).
    fn parse_unary(&mut self) -> Node {
        let line = self.line();
        if matches!(
            self.peek().kind,
            TokenKind::Bang | TokenKind::Tilde | TokenKind::Star | TokenKind::Minus
        ) {
            let op = self.advance().text;
            let operand = self.parse_unary();
            return Node::with_children(NodeKind::UnaryOp, op, line, vec![operand]);
        }
        self.parse_postfix()
    }

    /// Left-folds `.ident`, `[…]`, `(…)`, `++`, `--` around the primary
    /// until no postfix token remains (spec §4.2).
    fn parse_postfix(&mut self) -> Node {
        let mut node = self.parse_primary();
        loop {
            let line = self.line();
            match self.peek().kind {
                TokenKind::Dot => {
                    self.advance();
                    let member = self.expect(TokenKind::Ident, "a member name").text;
                    if self.is(TokenKind::LParen) {
                        let mut args = self.parse_call_args();
                        if self.is(TokenKind::LBrace) {
                            args.push(self.parse_block());
                        }
                        let mut children = vec![node];
                        children.extend(args);
                        node = Node::with_children(NodeKind::MethodCall, member, line, children);
                    } else {
                        node = Node::with_children(NodeKind::MemberAccess, member, line, vec![node]);
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr();
                    self.expect(TokenKind::RBracket, "']'");
                    node = Node::with_children(NodeKind::ArrayAccess, "", line, vec![node, index]);
                }
                TokenKind::LParen => {
                    let mut args = self.parse_call_args();
                    if self.is(TokenKind::LBrace) {
                        args.push(self.parse_block());
                    }
                    let callee = if node.kind == NodeKind::Ident { node.text } else { String::new() };
                    node = Node::with_children(NodeKind::Call, callee, line, args);
                }
                TokenKind::PlusPlus => {
                    self.advance();
                    node = Node::with_children(NodeKind::PostInc, "++", line, vec![node]);
                }
                TokenKind::MinusMinus => {
                    self.advance();
                    node = Node::with_children(NodeKind::PostDec, "--", line, vec![node]);
                }
                _ => break,
            }
        }
        node
    }

    fn parse_call_args(&mut self) -> Vec<Node> {
        self.expect(TokenKind::LParen, "'('");
        let mut args = Vec::new();
        if !self.is(TokenKind::RParen) {
            loop {
                args.push(self.parse_expr());
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'");
        args
    }

    fn parse_primary(&mut self) -> Node {
        let line = self.line();
        match self.peek().kind {
            TokenKind::Number => {
                let text = self.advance().text;
                Node::new(NodeKind::NumberLit, text, line)
            }
            TokenKind::Str => {
                let mut text = self.advance().text;
                // Adjacent string literals lex separately; the parser
                // concatenates them (spec §4.1, §8's round-trip law).
                while self.is(TokenKind::Str) {
                    let next = self.advance().text;
                    text = concat_adjacent_strings(&text, &next);
                }
                Node::new(NodeKind::StringLit, text, line)
            }
            TokenKind::Char => {
                let text = self.advance().text;
                Node::new(NodeKind::CharLit, text, line)
            }
            TokenKind::True => {
                self.advance();
                Node::new(NodeKind::BoolLit, "true", line)
            }
            TokenKind::False => {
                self.advance();
                Node::new(NodeKind::BoolLit, "false", line)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr();
                self.expect(TokenKind::RParen, "')'");
                inner
            }
            TokenKind::LBrace => self.parse_aggregate_init(),
            TokenKind::Ident => self.parse_ident_primary(),
            _ => {
                let token = self.advance();
                self.handler
                    .error(format!("unexpected token '{}' in expression", token.text), line);
                Node::error_node(line)
            }
        }
    }

    /// Looks up the identifier — and any `.member` chain following it —
    /// against the alias table, preferring the longest registered dotted
    /// name (spec §4.5). An unmatched chain is left untouched so the
    /// postfix parser treats it as ordinary member access.
    fn parse_ident_primary(&mut self) -> Node {
        let line = self.line();
        let name = self.advance().text;

        let mut dotted = name.clone();
        let mut probe = self.pos;
        let mut best: Option<(usize, Node)> = self.aliases.get(&dotted).map(|n| (probe, n.clone()));
        while self.tokens.get(probe).map(|t| t.kind) == Some(TokenKind::Dot)
            && self.tokens.get(probe + 1).map(|t| t.kind) == Some(TokenKind::Ident)
        {
            dotted.push('.');
            dotted.push_str(&self.tokens[probe + 1].text);
            probe += 2;
            if let Some(fragment) = self.aliases.get(&dotted) {
                best = Some((probe, fragment.clone()));
            }
        }
        if let Some((consumed_to, fragment)) = best {
            self.pos = consumed_to;
            return fragment;
        }
        Node::new(NodeKind::Ident, name, line)
    }

    fn parse_aggregate_init(&mut self) -> Node {
        let line = self.line();
        self.advance(); // '{'
        let mut children = Vec::new();
        while !self.is(TokenKind::RBrace) && !self.at_eof() {
            let entry_line = self.line();
            if self.eat(TokenKind::Dot) {
                let field = self.expect(TokenKind::Ident, "a field designator").text;
                self.expect(TokenKind::Eq, "'='");
                let value = self.parse_expr();
                let designator = Node::new(NodeKind::Ident, format!(".{}", field), entry_line);
                children.push(Node::with_children(
                    NodeKind::Assign,
                    "=",
                    entry_line,
                    vec![designator, value],
                ));
            } else {
                children.push(self.parse_expr());
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}'");
        Node::with_children(NodeKind::AggregateInit, "", line, children)
    }
}

fn concat_adjacent_strings(first: &str, second: &str) -> String {
    let first_inner = &first[..first.len().saturating_sub(1)];
    let second_inner = &second[1.min(second.len())..];
    format!("{}{}", first_inner, second_inner)
}

#[cfg(test)]
mod tests {
    use crate::parse;

    #[test]
    fn precedence_climbs_from_ternary_to_multiplicative() {
        let (program, handler) = parse(come_lex::lex("int f() { return 1 + 2 * 3; }"));
        assert!(!handler.has_errors());
        let function = &program.children[0];
        let ret = function.children.last().unwrap().children.last().unwrap();
        assert_eq!(ret.children[0].text, "+");
        assert_eq!(ret.children[0].children[1].text, "*");
    }

    #[test]
    fn adjacent_string_literals_concatenate() {
        let (program, _) = parse(come_lex::lex(r#"int f() { return "a" "b"; }"#));
        let function = &program.children[0];
        let ret = function.children.last().unwrap().children.last().unwrap();
        assert_eq!(ret.children[0].text, "\"ab\"");
    }

    #[test]
    fn aggregate_init_with_designators() {
        let (program, _) = parse(come_lex::lex("int f() { Point p = { .x = 3, .y = 4 }; }"));
        let function = &program.children[0];
        let block = function.children.last().unwrap();
        let var_decl = &block.children[0];
        let init = &var_decl.children[0];
        assert_eq!(init.kind, crate::NodeKind::AggregateInit);
        assert_eq!(init.children[0].children[0].text, ".x");
    }
}
