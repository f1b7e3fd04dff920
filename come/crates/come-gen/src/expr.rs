//! Expression lowering (spec §4.3 "Expression lowering rules").

use come_par::{Node, NodeKind};

use crate::mangle::mangle_call;
use crate::symtab::ReceiverKind;
use crate::Codegen;

/// How a `printf`-family format specifier treats its matching argument.
enum ArgTreatment {
    BoolLower,
    BoolUpper,
    /// The raw conversion character (`s`, `d`, `f`, …).
    Spec(char),
}

impl Codegen {
    pub(crate) fn emit_expr(&mut self, node: &Node) -> String {
        match node.kind {
            NodeKind::NumberLit | NodeKind::BoolLit | NodeKind::CharLit => node.text.clone(),
            NodeKind::StringLit => format!("come_string_new({}, {})", self.ctx_macro(), node.text),
            NodeKind::Ident => self.emit_ident(node),
            NodeKind::BinaryOp => self.emit_binary(node),
            NodeKind::UnaryOp => format!("({}{})", node.text, self.emit_expr(&node.children[0])),
            NodeKind::PostInc => format!("({}++)", self.emit_expr(&node.children[0])),
            NodeKind::PostDec => format!("({}--)", self.emit_expr(&node.children[0])),
            NodeKind::MemberAccess => self.emit_member_access(node),
            NodeKind::ArrayAccess => self.emit_array_access(node),
            NodeKind::Call => self.emit_call(node),
            NodeKind::MethodCall => self.emit_method_call(node),
            NodeKind::Ternary => self.emit_ternary(node),
            NodeKind::AggregateInit => self.emit_aggregate_init(node),
            NodeKind::Assign => self.emit_assign_fragment(node),
            NodeKind::Error => "/* AST ERROR: NULL NODE */ 0".to_string(),
            NodeKind::Empty => String::new(),
            _ => String::new(),
        }
    }

    fn emit_ident(&self, node: &Node) -> String {
        if node.text == "null" {
            "NULL".to_string()
        } else {
            node.text.clone()
        }
    }

    /// The declared type of an expression used as a receiver, so far as
    /// the flat local table can tell us (spec §4.4) — `self` resolves
    /// like any other parameter since `finish_function` records it at
    /// function entry.
    fn receiver_type_text(&self, node: &Node) -> String {
        match node.kind {
            NodeKind::Ident => self.local_type(&node.text).unwrap_or("").to_string(),
            NodeKind::StringLit => "string".to_string(),
            _ => String::new(),
        }
    }

    fn emit_binary(&mut self, node: &Node) -> String {
        let op = node.text.as_str();
        let lhs_node = &node.children[0];
        let rhs_node = &node.children[1];
        if matches!(op, "==" | "!=")
            && !self.is_null_operand(lhs_node)
            && !self.is_null_operand(rhs_node)
            && (self.operand_is_string(lhs_node) || self.operand_is_string(rhs_node))
        {
            let lhs = self.emit_expr(lhs_node);
            let rhs = self.emit_expr(rhs_node);
            let cmp = format!("come_string_compare({}, {})", lhs, rhs);
            return if op == "==" {
                format!("({} == 0)", cmp)
            } else {
                format!("({} != 0)", cmp)
            };
        }
        let lhs = self.emit_expr(lhs_node);
        let rhs = self.emit_expr(rhs_node);
        format!("({} {} {})", lhs, op, rhs)
    }

    fn is_null_operand(&self, node: &Node) -> bool {
        node.kind == NodeKind::Ident && node.text == "null"
    }

    fn operand_is_string(&self, node: &Node) -> bool {
        match node.kind {
            NodeKind::StringLit => true,
            NodeKind::Ident => {
                !Self::is_numeric_array_hint(&node.text)
                    && self
                        .local_type(&node.text)
                        .map(|t| matches!(self.classify_receiver(t), ReceiverKind::String))
                        .unwrap_or(false)
            }
            _ => false,
        }
    }

    fn emit_member_access(&mut self, node: &Node) -> String {
        let receiver = &node.children[0];
        let receiver_text = self.emit_expr(receiver);
        let receiver_type = self.receiver_type_text(receiver);
        let op = if Self::is_pointer_type(&receiver_type) { "->" } else { "." };
        format!("{}{}{}", receiver_text, op, node.text)
    }

    /// Array access lowers through one generic accessor macro regardless
    /// of element kind (spec §4.3); the runtime macro itself is what
    /// special-cases a string receiver into a new single-character
    /// string rather than a raw byte.
    fn emit_array_access(&mut self, node: &Node) -> String {
        let array_text = self.emit_expr(&node.children[0]);
        let index_text = self.emit_expr(&node.children[1]);
        format!("COME_AT({}, {})", array_text, index_text)
    }

    fn emit_call(&mut self, node: &Node) -> String {
        let args: Vec<String> = node.children.iter().map(|c| self.emit_expr(c)).collect();
        let callee = mangle_call(&self.module_name, &node.text);
        format!("{}({})", callee, args.join(", "))
    }

    fn emit_method_call(&mut self, node: &Node) -> String {
        if node.text == "printf" {
            return self.emit_printf_call(node);
        }

        let receiver_node = &node.children[0];
        let has_trailing_closure = node.children.last().map(|c| c.kind == NodeKind::Block).unwrap_or(false);
        let arg_end = if has_trailing_closure { node.children.len() - 1 } else { node.children.len() };
        let args: Vec<String> = node.children[1..arg_end].iter().map(|c| self.emit_expr(c)).collect();
        let trailing_closure = if has_trailing_closure {
            Some(self.emit_trailing_closure(node.children.last().unwrap()))
        } else {
            None
        };

        let receiver_text = self.emit_expr(receiver_node);
        let receiver_type = self.receiver_type_text(receiver_node);
        let kind = self.classify_receiver(&receiver_type);
        let method = node.text.as_str();

        let mut all_args = Vec::new();
        let callee = match &kind {
            ReceiverKind::Map => {
                if method == "put" {
                    all_args.push(format!("&{}", receiver_text));
                } else {
                    all_args.push(receiver_text);
                }
                format!("come_map_{}", method)
            }
            ReceiverKind::String => {
                all_args.push(receiver_text);
                format!("come_string_{}", method)
            }
            ReceiverKind::Array => {
                all_args.push(receiver_text);
                format!("come_array_{}", method)
            }
            ReceiverKind::Struct(name) => {
                let receiver_arg = if Self::is_pointer_type(&receiver_type) {
                    receiver_text
                } else {
                    format!("&{}", receiver_text)
                };
                all_args.push(receiver_arg);
                format!("come_{}__{}__{}", self.module_name, name, method)
            }
            ReceiverKind::Unknown => {
                all_args.push(receiver_text);
                format!("come_string_{}", method)
            }
        };
        all_args.extend(args);
        if let Some(closure) = trailing_closure {
            all_args.push(closure);
        }
        format!("{}({})", callee, all_args.join(", "))
    }

    fn emit_printf_call(&mut self, node: &Node) -> String {
        let mut arg_nodes = node.children[1..].iter();
        let Some(fmt_node) = arg_nodes.next() else {
            return "printf()".to_string();
        };
        let (rewritten_fmt, treatments) = rewrite_printf_format(&fmt_node.text);
        let mut rendered = vec![rewritten_fmt];
        for (arg, treatment) in arg_nodes.zip(treatments.iter()) {
            let text = self.emit_expr(arg);
            let rendered_arg = match treatment {
                ArgTreatment::BoolLower => format!("(({}) ? \"true\" : \"false\")", text),
                ArgTreatment::BoolUpper => format!("(({}) ? \"TRUE\" : \"FALSE\")", text),
                ArgTreatment::Spec('s') => match &arg.kind {
                    NodeKind::StringLit => arg.text.clone(),
                    _ if self.operand_is_string(arg) => format!("(({0}) ? ({0})->data : \"\")", text),
                    _ => text,
                },
                ArgTreatment::Spec(_) => text,
            };
            rendered.push(rendered_arg);
        }
        format!("printf({})", rendered.join(", "))
    }

    fn emit_ternary(&mut self, node: &Node) -> String {
        format!(
            "({} ? {} : {})",
            self.emit_expr(&node.children[0]),
            self.emit_expr(&node.children[1]),
            self.emit_expr(&node.children[2])
        )
    }

    pub(crate) fn emit_aggregate_init(&mut self, node: &Node) -> String {
        if node.children.is_empty() {
            return "{0}".to_string();
        }
        let parts: Vec<String> = node
            .children
            .iter()
            .map(|child| {
                if child.kind == NodeKind::Assign && child.children[0].text.starts_with('.') {
                    format!("{} = {}", child.children[0].text, self.emit_expr(&child.children[1]))
                } else {
                    self.emit_expr(child)
                }
            })
            .collect();
        format!("{{ {} }}", parts.join(", "))
    }

    pub(crate) fn emit_trailing_closure(&mut self, block: &Node) -> String {
        let id = self.next_closure_id();
        let name = format!("come_closure_{}", id);
        let body = self.render_block(block);
        format!("({{ void {name}(void) {body} {name}; }})", name = name, body = body)
    }

    pub(crate) fn emit_assign_fragment(&mut self, node: &Node) -> String {
        let target = self.emit_expr(&node.children[0]);
        let value = self.emit_expr(&node.children[1]);
        format!("{} {} {}", target, node.text, value)
    }
}

fn rewrite_printf_format(text: &str) -> (String, Vec<ArgTreatment>) {
    if text.len() < 2 {
        return (text.to_string(), Vec::new());
    }
    let inner = &text[1..text.len() - 1];
    let mut out = String::from("\"");
    let mut treatments = Vec::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('t') => {
                chars.next();
                out.push_str("%s");
                treatments.push(ArgTreatment::BoolLower);
            }
            Some('T') => {
                chars.next();
                out.push_str("%s");
                treatments.push(ArgTreatment::BoolUpper);
            }
            Some('%') => {
                chars.next();
                out.push_str("%%");
            }
            Some(next) => {
                chars.next();
                out.push('%');
                out.push(next);
                treatments.push(ArgTreatment::Spec(next));
            }
            None => out.push('%'),
        }
    }
    out.push('"');
    (out, treatments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printf_rewrites_bool_specifiers_to_s() {
        let (fmt, treatments) = rewrite_printf_format("\"%t and %T\"");
        assert_eq!(fmt, "\"%s and %s\"");
        assert_eq!(treatments.len(), 2);
    }

    #[test]
    fn printf_percent_literal_consumes_no_argument() {
        let (fmt, treatments) = rewrite_printf_format("\"100%% done\"");
        assert_eq!(fmt, "\"100%% done\"");
        assert!(treatments.is_empty());
    }
}
