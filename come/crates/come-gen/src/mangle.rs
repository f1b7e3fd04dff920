//! Symbol mangling (spec §4.3): `come_<module>__<name>` for plain
//! functions, `come_<module>__<Struct>__<method>` for struct methods.
//! Module-local `init`/`exit` are suffixed `_local` so the user's body
//! doesn't collide with the synthesised module init/exit pair (`decls.rs`).

use come_par::{Node, NodeKind};

/// True if `function`'s first parameter is the parser-injected `self`
/// (never user-written — spec §4.2's `Struct.method` rewrite always
/// inserts it as argument zero).
pub(crate) fn is_method(function: &Node) -> bool {
    function.children.len() >= 2
        && function.children[1].kind == NodeKind::VarDecl
        && function.children[1].text == "self"
}

/// Recovers the struct name a method was declared on from its injected
/// `self: Struct*` parameter, since the parser only left behind the
/// merged `Struct_method` spelling in the function's own `text`.
fn struct_name_of_method(function: &Node) -> String {
    let self_type = function.children[1].children[1].text.as_str();
    self_type.trim_end_matches('*').to_string()
}

fn method_name_of(function: &Node, struct_name: &str) -> String {
    function.text[struct_name.len() + 1..].to_string()
}

pub(crate) fn mangle_function(module: &str, function: &Node) -> String {
    if function.text.starts_with("come_") || function.text.starts_with("std_") {
        return function.text.clone();
    }
    if is_method(function) {
        let struct_name = struct_name_of_method(function);
        let method_name = method_name_of(function, &struct_name);
        return format!("come_{}__{}__{}", module, struct_name, method_name);
    }
    let local_name = match function.text.as_str() {
        "module_init" | "init" => "init_local".to_string(),
        "exit" => "exit_local".to_string(),
        other => other.to_string(),
    };
    format!("come_{}__{}", module, local_name)
}

/// Bypasses mangling for a call site whose callee already spells a
/// runtime symbol (spec §4.3: "calls to names already beginning with
/// `come_` or `std_` bypass mangling").
pub(crate) fn mangle_call(module: &str, callee: &str) -> String {
    if callee.starts_with("come_") || callee.starts_with("std_") {
        callee.to_string()
    } else {
        format!("come_{}__{}", module, callee)
    }
}
