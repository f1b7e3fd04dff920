//! Statement lowering (spec §4.3 "Statement lowering").

use come_par::{Node, NodeKind};

use crate::Codegen;

impl Codegen {
    /// Renders a `Block` node to its own `String`, used both for nested
    /// statement blocks and for the synthesised entry point / module
    /// chain bodies that aren't themselves `Block` AST nodes.
    pub(crate) fn render_block(&mut self, block: &Node) -> String {
        let mut out = String::new();
        self.emit_block_into(block, &mut out);
        out
    }

    fn emit_block_into(&mut self, block: &Node, out: &mut String) {
        out.push_str("{\n");
        for stmt in &block.children {
            self.emit_statement(stmt, out);
        }
        out.push_str("}\n");
    }

    pub(crate) fn emit_statement(&mut self, node: &Node, out: &mut String) {
        self.emit_line_marker(node.source_line);
        match node.kind {
            NodeKind::Block => self.emit_block_into(node, out),
            NodeKind::If => self.emit_if(node, out),
            NodeKind::While => self.emit_while(node, out),
            NodeKind::DoWhile => self.emit_do_while(node, out),
            NodeKind::For => self.emit_for(node, out),
            NodeKind::Switch => self.emit_switch(node, out),
            NodeKind::Return => self.emit_return(node, out),
            NodeKind::Break => out.push_str("break;\n"),
            NodeKind::Continue => out.push_str("continue;\n"),
            NodeKind::VarDecl => self.emit_var_decl(node, out),
            NodeKind::Empty => {}
            _ => {
                let text = self.emit_expr(node);
                if !text.is_empty() {
                    out.push_str(&text);
                    out.push_str(";\n");
                }
            }
        }
    }

    fn emit_if(&mut self, node: &Node, out: &mut String) {
        let cond = self.emit_expr(&node.children[0]);
        out.push_str(&format!("if ({}) ", cond));
        self.emit_block_into(&node.children[1], out);
        if node.children.len() > 2 {
            out.push_str("else ");
            if node.children[2].kind == NodeKind::If {
                self.emit_if(&node.children[2], out);
            } else {
                self.emit_block_into(&node.children[2], out);
            }
        }
    }

    fn emit_while(&mut self, node: &Node, out: &mut String) {
        let cond = self.emit_expr(&node.children[0]);
        out.push_str(&format!("while ({}) ", cond));
        self.emit_block_into(&node.children[1], out);
    }

    fn emit_do_while(&mut self, node: &Node, out: &mut String) {
        out.push_str("do ");
        self.emit_block_into(&node.children[0], out);
        let cond = self.emit_expr(&node.children[1]);
        out.push_str(&format!("while ({});\n", cond));
    }

    fn emit_for(&mut self, node: &Node, out: &mut String) {
        let init = self.emit_for_clause(&node.children[0]);
        let cond = if node.children[1].kind == NodeKind::Empty {
            String::new()
        } else {
            self.emit_expr(&node.children[1])
        };
        let step = self.emit_for_clause(&node.children[2]);
        out.push_str(&format!("for ({}; {}; {}) ", init, cond, step));
        self.emit_block_into(&node.children[3], out);
    }

    fn emit_for_clause(&mut self, node: &Node) -> String {
        match node.kind {
            NodeKind::Empty => String::new(),
            NodeKind::VarDecl => self.emit_var_decl_fragment(node),
            _ => self.emit_expr(node),
        }
    }

    fn emit_switch(&mut self, node: &Node, out: &mut String) {
        let scrutinee = self.emit_expr(&node.children[0]);
        out.push_str(&format!("switch ({}) {{\n", scrutinee));
        for case_node in &node.children[1..] {
            match case_node.kind {
                NodeKind::Case => {
                    let value = self.emit_expr(&case_node.children[0]);
                    out.push_str(&format!("case {}:\n", value));
                    for stmt in &case_node.children[1..] {
                        self.emit_statement(stmt, out);
                    }
                    // Mandatory: the source has no implicit fallthrough
                    // (spec §4.3) — the parser never injects this itself.
                    out.push_str("break;\n");
                }
                NodeKind::Default => {
                    out.push_str("default:\n");
                    for stmt in &case_node.children {
                        self.emit_statement(stmt, out);
                    }
                    out.push_str("break;\n");
                }
                _ => {}
            }
        }
        out.push_str("}\n");
    }

    fn emit_return(&mut self, node: &Node, out: &mut String) {
        if node.children.is_empty() {
            if self.current_return_type != "void" {
                out.push_str("return 0;\n");
            } else {
                out.push_str("return;\n");
            }
            return;
        }
        let value = self.emit_expr(&node.children[0]);
        out.push_str(&format!("return {};\n", value));
    }

    fn emit_var_decl(&mut self, node: &Node, out: &mut String) {
        let fragment = self.emit_var_decl_fragment(node);
        out.push_str(&fragment);
        out.push_str(";\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn gen(source: &str) -> String {
        let tokens = come_lex::lex(source);
        let (program, handler) = come_par::parse(tokens);
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
        crate::render(&program, Path::new("test.co"), false)
    }

    #[test]
    fn if_else_if_chains_without_braces_collapsing() {
        let c = gen("int f() { if (a) { b; } else if (c) { d; } else { e; } }");
        assert!(c.contains("if (") && c.contains("else if (") && c.contains("else {"));
    }

    #[test]
    fn for_loop_lowers_all_three_clauses() {
        let c = gen("int f() { for (int i = 0; i < 3; i++) { } }");
        assert!(c.contains("for (int i = 0; (i < 3); (i++)) "));
    }
}
