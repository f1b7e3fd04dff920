//! Function definitions and the variable-declaration lowering table
//! (spec §4.3 "Variable declaration lowering").

use come_par::{Node, NodeKind};

use crate::mangle::mangle_function;
use crate::symtab::c_type_spelling;
use crate::Codegen;

impl Codegen {
    pub(crate) fn emit_function_prototypes(&mut self, program: &Node) {
        for child in &program.children {
            if child.kind != NodeKind::Function {
                continue;
            }
            if child.text == "main" && self.module_name == "main" {
                continue;
            }
            let signature = self.function_signature(child);
            self.out.push_str(&signature);
            self.out.push_str(";\n");
        }
        self.out.push('\n');
    }

    pub(crate) fn emit_function(&mut self, function: &Node) {
        self.locals.reset();
        let ret_type = c_type_spelling(&function.children[0].text);
        self.current_return_type = ret_type;

        let param_count = function.children.len() - 2;
        for param in &function.children[1..1 + param_count] {
            self.record_local(&param.text, &param.children[1].text);
        }

        let signature = self.function_signature(function);
        self.out.push_str(&signature);
        self.out.push(' ');
        let body = function.children.last().unwrap();
        let rendered_body = self.render_block(body);
        self.out.push_str(&rendered_body);
        self.out.push('\n');
    }

    fn function_signature(&self, function: &Node) -> String {
        let ret_type = c_type_spelling(&function.children[0].text);
        let name = mangle_function(&self.module_name, function);
        let param_count = function.children.len() - 2;
        let params = &function.children[1..1 + param_count];
        if params.is_empty() {
            return format!("{} {}(void)", ret_type, name);
        }
        let rendered: Vec<String> = params
            .iter()
            .map(|p| format!("{} {}", c_type_spelling(&p.children[1].text), p.text))
            .collect();
        format!("{} {}({})", ret_type, name, rendered.join(", "))
    }

    /// The var-decl lowering table (spec §4.3), shared between ordinary
    /// statement-local declarations and a `for` loop's init clause.
    pub(crate) fn emit_var_decl_fragment(&mut self, node: &Node) -> String {
        let name = node.text.clone();
        let init_node = &node.children[0];
        let declared_type = node.children[1].text.clone();
        self.record_local(&name, &declared_type);

        if declared_type == "var" {
            let value = self.emit_expr(init_node);
            if init_node.kind == NodeKind::StringLit {
                return format!("come_string_t* {} = {}", name, value);
            }
            return format!("__auto_type {} = {}", name, value);
        }

        if declared_type.starts_with("string[]") {
            if init_node.kind == NodeKind::StringLit && init_node.text == "\"__ARGS__\"" {
                return format!("come_string_list_t* {} = come_string_list_from_argv(argc, argv)", name);
            }
            let value = self.emit_expr(init_node);
            return format!("come_string_list_t* {} = {}", name, value);
        }

        if declared_type.starts_with("string") {
            let value = self.emit_expr(init_node);
            return format!("come_string_t* {} = {}", name, value);
        }

        if declared_type == "bool" {
            let value = self.emit_expr(init_node);
            return format!("bool {} = {}", name, value);
        }

        if let Some((element_type, size)) = parse_fixed_array_type(&declared_type) {
            return self.emit_fixed_array_decl(&name, &element_type, &size, init_node);
        }

        if declared_type.ends_with("[]") {
            let element_type = declared_type.trim_end_matches("[]");
            return format!(
                "come_array_t* {} = come_array_new(come_type_tag(\"{}\"), {})",
                name,
                element_type,
                self.ctx_macro()
            );
        }

        if self.is_known_struct(&declared_type) {
            if init_node.kind == NodeKind::NumberLit && init_node.text == "0" {
                return format!("{} {} = {{0}}", declared_type, name);
            }
            let value = self.emit_expr(init_node);
            return format!("{} {} = {}", declared_type, name, value);
        }

        let value = self.emit_expr(init_node);
        format!("{} {} = {}", declared_type, name, value)
    }

    fn emit_fixed_array_decl(&mut self, name: &str, element_type: &str, size: &str, init_node: &Node) -> String {
        let ctx = self.ctx_macro();
        if init_node.kind == NodeKind::AggregateInit {
            let elements: Vec<String> = init_node.children.iter().map(|c| self.emit_expr(c)).collect();
            format!(
                "come_array_t* {name} = come_array_from_literal(come_type_tag(\"{elem}\"), {ctx}, ({elem}[]){{ {values} }}, {size})",
                name = name,
                elem = element_type,
                ctx = ctx,
                values = elements.join(", "),
                size = size
            )
        } else {
            format!(
                "come_array_t* {name} = come_array_new_fixed(come_type_tag(\"{elem}\"), {ctx}, {size})",
                name = name,
                elem = element_type,
                ctx = ctx,
                size = size
            )
        }
    }
}

/// `int[5]` -> `("int", "5")`; anything else (including unbounded
/// `int[]`, handled separately by the caller) is `None`.
fn parse_fixed_array_type(declared_type: &str) -> Option<(String, String)> {
    let open = declared_type.find('[')?;
    let close = declared_type.find(']')?;
    if close <= open + 1 {
        return None; // `T[]`, not a fixed size
    }
    let element_type = declared_type[..open].to_string();
    let size = declared_type[open + 1..close].to_string();
    if size.chars().all(|c| c.is_ascii_digit()) {
        Some((element_type, size))
    } else {
        None
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
    fn fixed_array_with_literal_becomes_array_from_literal() {
        let c = gen("int f() { int a[3] = {1,2,3}; }");
        assert!(c.contains("come_array_from_literal"));
    }

    #[test]
    fn multi_return_marker_lowers_to_int() {
        let c = gen("(int,int) pair() { return 1; }");
        assert!(c.contains("int come_main__pair(void)"));
    }

    #[test]
    fn struct_method_receiver_is_addressed() {
        let c = gen("struct Rect { int w; int h; } int Rect.area() { return 1; }");
        assert!(c.contains("come_main__Rect__area(Rect self)") || c.contains("come_main__Rect__area(Rect* self)"));
    }
}
