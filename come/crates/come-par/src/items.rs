//! Top-level declaration parsing: module/import/alias directives, const
//! groups, struct/union/enum declarations, and function definitions
//! (spec §4.2's "Declarations at top level").

use come_lex::TokenKind;

use crate::ast::{Node, NodeKind};
use crate::Parser;

impl Parser {
    pub(crate) fn parse_program(&mut self) -> Node {
        let mut module_name = "main".to_string();
        let mut children = Vec::new();
        while !self.at_eof() {
            let pos_before = self.pos;
            match self.peek().kind {
                TokenKind::Module => {
                    if self.peek_kind_at(1) == Some(TokenKind::Dot) {
                        children.push(self.parse_module_init());
                    } else {
                        module_name = self.parse_module_decl();
                    }
                }
                TokenKind::Import => children.extend(self.parse_import()),
                TokenKind::Alias => {
                    if let Some(node) = self.parse_alias() {
                        children.push(node);
                    }
                }
                TokenKind::Const => children.push(self.parse_const_group()),
                TokenKind::Struct | TokenKind::Union => children.push(self.parse_struct_or_union()),
                TokenKind::Enum => children.push(self.parse_enum_decl()),
                TokenKind::Export => children.push(self.parse_export()),
                _ => children.push(self.parse_function()),
            }
            self.synchronize(pos_before);
        }
        Node::with_children(NodeKind::Program, module_name, 1, children)
    }

    fn parse_module_decl(&mut self) -> String {
        self.advance(); // module
        let name = self.expect(TokenKind::Ident, "a module name").text;
        self.eat(TokenKind::Semicolon);
        name
    }

    /// `module.init() { … }` becomes a `Function` named `module_init`
    /// (spec §4.2) — codegen is the one that arranges for it to run
    /// before other user code via the module init chain (spec §4.3).
    fn parse_module_init(&mut self) -> Node {
        let line = self.line();
        self.advance(); // module
        self.expect(TokenKind::Dot, "'.'");
        let ident = self.expect(TokenKind::Ident, "'init'");
        if ident.text != "init" {
            self.handler.error(
                format!("expected 'init' after 'module.', found '{}'", ident.text),
                line,
            );
        }
        self.expect(TokenKind::LParen, "'('");
        self.expect(TokenKind::RParen, "')'");
        let body = self.parse_block();
        let ret = Node::new(NodeKind::Ident, "void", line);
        Node::with_children(NodeKind::Function, "module_init", line, vec![ret, body])
    }

    fn parse_import(&mut self) -> Vec<Node> {
        let line = self.line();
        self.advance(); // import
        let mut imports = Vec::new();
        if self.eat(TokenKind::LParen) {
            while !self.is(TokenKind::RParen) && !self.at_eof() {
                let name = self.expect(TokenKind::Ident, "an imported module name").text;
                imports.push(Node::new(NodeKind::Import, name, line));
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "')'");
        } else {
            let name = self.expect(TokenKind::Ident, "an imported module name").text;
            imports.push(Node::new(NodeKind::Import, name, line));
        }
        self.eat(TokenKind::Semicolon);
        imports
    }

    /// Type aliases (`alias N = struct M`) yield a `TypeAlias` node;
    /// expression aliases (`alias N = <expr>`) are purely compile-time —
    /// the parsed fragment is registered in the alias table and the
    /// directive itself produces no node (spec §4.2, §4.5).
    fn parse_alias(&mut self) -> Option<Node> {
        let line = self.line();
        self.advance(); // alias
        let mut name = self.expect(TokenKind::Ident, "an alias name").text;
        while self.eat(TokenKind::Dot) {
            let part = self.expect(TokenKind::Ident, "a dotted alias segment").text;
            name.push('.');
            name.push_str(&part);
        }
        self.expect(TokenKind::Eq, "'='");

        if matches!(self.peek().kind, TokenKind::Struct | TokenKind::Union | TokenKind::Enum) {
            let (type_text, _) = self.parse_type_text();
            self.eat(TokenKind::Semicolon);
            let type_node = Node::new(NodeKind::Ident, type_text, line);
            return Some(Node::with_children(NodeKind::TypeAlias, name, line, vec![type_node]));
        }

        let fragment = self.parse_expr();
        self.eat(TokenKind::Semicolon);
        self.aliases.insert(name, fragment);
        None
    }

    /// `const ( … )`. Bare entries (no `=`) are enum-variant candidates;
    /// entries with `=` are individually typed constants. Whether the
    /// whole group lowers to a C `enum` or a run of typed `const`s is
    /// decided by codegen once every entry's shape is known (spec §4.2).
    fn parse_const_group(&mut self) -> Node {
        let line = self.line();
        self.advance(); // const
        self.expect(TokenKind::LParen, "'('");
        let mut entries = Vec::new();
        while !self.is(TokenKind::RParen) && !self.at_eof() {
            let entry_line = self.line();
            let name = self.expect(TokenKind::Ident, "a constant name").text;
            if self.eat(TokenKind::Eq) {
                let value = self.parse_expr();
                entries.push(Node::with_children(NodeKind::ConstDecl, name, entry_line, vec![value]));
            } else {
                entries.push(Node::new(NodeKind::Ident, name, entry_line));
            }
            if !self.eat(TokenKind::Comma) {
                self.eat(TokenKind::Semicolon);
            }
        }
        self.expect(TokenKind::RParen, "')'");
        self.eat(TokenKind::Semicolon);
        Node::with_children(NodeKind::ConstGroup, "", line, entries)
    }

    fn parse_enum_decl(&mut self) -> Node {
        let line = self.line();
        self.advance(); // enum
        let name = self.expect(TokenKind::Ident, "an enum name").text;
        self.expect(TokenKind::LBrace, "'{'");
        let mut variants = Vec::new();
        while !self.is(TokenKind::RBrace) && !self.at_eof() {
            let variant_line = self.line();
            let variant = self.expect(TokenKind::Ident, "an enum variant name").text;
            variants.push(Node::new(NodeKind::Ident, variant, variant_line));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}'");
        self.eat(TokenKind::Semicolon);
        Node::with_children(NodeKind::EnumDecl, name, line, variants)
    }

    /// `struct N { … }` / `union N { … }`. Fields parse as `VarDecl`s;
    /// inline method prototypes are consumed and discarded here — their
    /// bodies are defined at top level as `Struct.method(…) { … }`
    /// functions (spec §4.2).
    fn parse_struct_or_union(&mut self) -> Node {
        let line = self.line();
        let kind = if self.is(TokenKind::Struct) {
            NodeKind::StructDecl
        } else {
            NodeKind::UnionDecl
        };
        self.advance(); // struct | union
        let name = self.expect(TokenKind::Ident, "a struct/union name").text;
        self.expect(TokenKind::LBrace, "'{'");
        let mut fields = Vec::new();
        while !self.is(TokenKind::RBrace) && !self.at_eof() {
            let pos_before = self.pos;
            self.eat(TokenKind::Method); // optional explicit marker before a prototype
            let member = self.parse_field_or_method_prototype();
            if let Some(field) = member {
                fields.push(field);
            }
            self.synchronize(pos_before);
        }
        self.expect(TokenKind::RBrace, "'}'");
        self.eat(TokenKind::Semicolon);
        Node::with_children(kind, name, line, fields)
    }

    /// Returns `Some(VarDecl)` for a field, or `None` for a forward-only
    /// method prototype (`Type name(args);`, no body).
    fn parse_field_or_method_prototype(&mut self) -> Option<Node> {
        let (type_text, line) = self.parse_type_text();
        let name = self.expect(TokenKind::Ident, "a field or method name").text;
        if self.is(TokenKind::LParen) {
            self.parse_params();
            self.eat(TokenKind::Semicolon);
            return None;
        }
        let array_suffix = self.parse_optional_array_suffix();
        self.expect(TokenKind::Semicolon, "';'");
        let ty = Node::new(NodeKind::Ident, format!("{}{}", type_text, array_suffix), line);
        Some(Node::with_children(NodeKind::VarDecl, name, line, vec![Node::zero(line), ty]))
    }

    fn parse_export(&mut self) -> Node {
        let line = self.line();
        self.advance(); // export
        if self.is(TokenKind::Import) {
            let imports = self.parse_import();
            return Node::with_children(NodeKind::Export, "", line, imports);
        }
        let inner = match self.peek().kind {
            TokenKind::Struct | TokenKind::Union => self.parse_struct_or_union(),
            TokenKind::Enum => self.parse_enum_decl(),
            TokenKind::Const => self.parse_const_group(),
            _ => self.parse_function(),
        };
        Node::with_children(NodeKind::Export, "", line, vec![inner])
    }

    /// `RetType Name(args) { body }`, including the `Struct.method`
    /// mangling rewrite and implicit-return-type defaulting for `main`
    /// and other functions whose return type is omitted (spec §4.2).
    fn parse_function(&mut self) -> Node {
        let (first, line) = self.parse_type_text();

        if self.eat(TokenKind::Dot) {
            let method_name = self.expect(TokenKind::Ident, "a method name").text;
            let mangled = format!("{}_{}", first, method_name);
            return self.finish_function(mangled, None, Some(first), line);
        }

        if self.is(TokenKind::LParen) {
            // `first` was the function name itself; no return type was written.
            return self.finish_function(first, None, None, line);
        }

        let mut name = self.expect(TokenKind::Ident, "a function name").text;
        let mut method_of = None;
        if self.eat(TokenKind::Dot) {
            let method_name = self.expect(TokenKind::Ident, "a method name").text;
            method_of = Some(name.clone());
            name = format!("{}_{}", name, method_name);
        }
        self.finish_function(name, Some(first), method_of, line)
    }

    fn finish_function(
        &mut self,
        name: String,
        ret_type: Option<String>,
        method_of: Option<String>,
        line: u32,
    ) -> Node {
        let mut params = self.parse_params();
        if let Some(struct_name) = &method_of {
            let self_type = Node::new(NodeKind::Ident, format!("{}*", struct_name), line);
            let self_param =
                Node::with_children(NodeKind::VarDecl, "self", line, vec![Node::zero(line), self_type]);
            params.insert(0, self_param);
        }
        let ret_text = ret_type.unwrap_or_else(|| if name == "main" { "int".into() } else { "void".into() });
        let ret_node = Node::new(NodeKind::Ident, ret_text, line);
        let body = self.parse_block();

        let mut children = vec![ret_node];
        children.extend(params);
        children.push(body);
        Node::with_children(NodeKind::Function, name, line, children)
    }

    fn parse_params(&mut self) -> Vec<Node> {
        self.expect(TokenKind::LParen, "'('");
        let mut params = Vec::new();
        if !self.is(TokenKind::RParen) {
            loop {
                let (type_text, line) = self.parse_type_text();
                let name = if self.is(TokenKind::Ident) {
                    self.advance().text
                } else {
                    String::new()
                };
                let array_suffix = self.parse_optional_array_suffix();
                let full_type = format!("{}{}", type_text, array_suffix);
                let ty_node = Node::new(NodeKind::Ident, full_type, line);
                params.push(Node::with_children(
                    NodeKind::VarDecl,
                    name,
                    line,
                    vec![Node::zero(line), ty_node],
                ));
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'");
        params
    }

    /// A type spelling: an optional `struct`/`union`/`enum` keyword, a
    /// name, any number of `*`, and an optional `[]`/`[N]` suffix — or a
    /// parenthesised multi-return marker, kept verbatim as `"(...)"`
    /// (spec §3, §4.2, §9's multi-return note).
    pub(crate) fn parse_type_text(&mut self) -> (String, u32) {
        let line = self.line();
        if self.is(TokenKind::LParen) {
            let mut depth = 0usize;
            loop {
                let token = self.advance();
                match token.kind {
                    TokenKind::LParen => depth += 1,
                    TokenKind::RParen => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    TokenKind::Eof => break,
                    _ => {}
                }
            }
            return ("(...)".to_string(), line);
        }

        let mut text = String::new();
        if matches!(self.peek().kind, TokenKind::Struct | TokenKind::Union | TokenKind::Enum) {
            text.push_str(&self.advance().text);
            text.push(' ');
        }
        text.push_str(&self.expect(TokenKind::Ident, "a type name").text);
        while self.eat(TokenKind::Star) {
            text.push('*');
        }
        if self.eat(TokenKind::LBracket) {
            if self.is(TokenKind::Number) {
                text.push('[');
                text.push_str(&self.advance().text);
                text.push(']');
            } else {
                text.push_str("[]");
            }
            self.expect(TokenKind::RBracket, "']'");
        }
        (text, line)
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, NodeKind};

    #[test]
    fn struct_method_name_is_mangled_with_injected_self() {
        let (program, handler) =
            parse(come_lex::lex("struct Rect { int w; int h; } int Rect.area() { return 1; }"));
        assert!(!handler.has_errors());
        let function = program
            .children
            .iter()
            .find(|n| n.kind == NodeKind::Function)
            .unwrap();
        assert_eq!(function.text, "Rect_area");
        // children: [return_type, self, body]
        assert_eq!(function.children[1].text, "self");
        assert_eq!(function.children[1].children[1].text, "Rect*");
    }

    #[test]
    fn main_without_return_type_defaults_to_int() {
        let (program, _) = parse(come_lex::lex("main() { }"));
        let function = &program.children[0];
        assert_eq!(function.text, "main");
        assert_eq!(function.children[0].text, "int");
    }

    #[test]
    fn other_function_without_return_type_defaults_to_void() {
        let (program, _) = parse(come_lex::lex("setup() { }"));
        let function = &program.children[0];
        assert_eq!(function.children[0].text, "void");
    }

    #[test]
    fn struct_fields_are_var_decls() {
        let (program, _) = parse(come_lex::lex("struct Point { int x; int y; }"));
        let struct_decl = &program.children[0];
        assert_eq!(struct_decl.kind, NodeKind::StructDecl);
        assert_eq!(struct_decl.children.len(), 2);
        assert_eq!(struct_decl.children[0].text, "x");
    }

    #[test]
    fn expression_alias_substitutes_and_produces_no_node() {
        let (program, _) = parse(come_lex::lex("alias Greeting = \"hi\"; int f() { return Greeting; }"));
        assert_eq!(program.children.len(), 1); // only `f`, no TypeAlias node
        let function = &program.children[0];
        let ret = function.children.last().unwrap().children[0].children[0].clone();
        assert_eq!(ret.kind, NodeKind::StringLit);
        assert_eq!(ret.text, "\"hi\"");
    }

    #[test]
    fn module_init_becomes_a_function_named_module_init() {
        let (program, _) = parse(come_lex::lex("module.init() { }"));
        assert_eq!(program.children[0].text, "module_init");
    }

    #[test]
    fn const_group_mixes_bare_and_valued_entries() {
        let (program, _) = parse(come_lex::lex("const (RED, GREEN = 1, BLUE)"));
        let group = &program.children[0];
        assert_eq!(group.kind, NodeKind::ConstGroup);
        assert_eq!(group.children[0].kind, NodeKind::Ident);
        assert_eq!(group.children[1].kind, NodeKind::ConstDecl);
    }
}
