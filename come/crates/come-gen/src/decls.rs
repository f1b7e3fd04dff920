//! Program-level emission phases other than function bodies: preamble,
//! entry point, module init/exit chain, typedefs, struct/union/const/enum
//! definitions (spec §4.3 "Emission phases" 1–6).

use come_par::{Node, NodeKind};

use crate::Codegen;

impl Codegen {
    /// Phase 1: headers, runtime shims, and the per-module arena context
    /// pointer/macro (spec §4.3).
    pub(crate) fn emit_preamble(&mut self) {
        self.out.push_str("#include <stdio.h>\n");
        self.out.push_str("#include <stdbool.h>\n");
        self.out.push_str("#include <stdlib.h>\n");
        self.out.push_str("#include <string.h>\n");
        self.out.push_str("#include <errno.h>\n");
        self.out.push_str("#include \"come_runtime.h\"\n\n");
        self.out.push_str(&format!(
            "static void* come_{}__ctx = NULL;\n#define COME_CTX come_{}__ctx\n\n",
            self.module_name, self.module_name
        ));
    }

    /// "The core emits `extern` declarations for each import's init/exit
    /// pair in the current unit" (spec §6).
    pub(crate) fn emit_extern_imports(&mut self) {
        for import in self.imports.clone() {
            self.out
                .push_str(&format!("extern void come_{0}__init(void);\nextern void come_{0}__exit(void);\n", import));
        }
        if !self.imports.is_empty() {
            self.out.push('\n');
        }
    }

    /// Phase 5: forward typedefs for every struct declared in the module,
    /// deduplicated against the seen-structs set (spec §4.3, §8 — emitting
    /// a struct typedef is idempotent per translation unit).
    pub(crate) fn emit_forward_typedefs(&mut self, program: &Node) {
        for child in &program.children {
            if !matches!(child.kind, NodeKind::StructDecl | NodeKind::UnionDecl) {
                continue;
            }
            if !self.seen_structs.insert(child.text.clone()) {
                continue;
            }
            let keyword = if child.kind == NodeKind::StructDecl { "struct" } else { "union" };
            self.out
                .push_str(&format!("typedef {} {} {};\n", keyword, child.text, child.text));
        }
        self.out.push('\n');
    }

    /// Phase 4: `alias N = struct M` directives (spec §4.2's type-alias
    /// form), also deduplicated against the seen-structs set.
    pub(crate) fn emit_type_aliases(&mut self, program: &Node) {
        for child in &program.children {
            if child.kind != NodeKind::TypeAlias {
                continue;
            }
            if !self.seen_structs.insert(child.text.clone()) {
                continue;
            }
            let aliased = &child.children[0].text;
            self.out.push_str(&format!("typedef {} {};\n", aliased, child.text));
        }
    }

    /// Standalone top-level `enum Name { … }` declarations — distinct
    /// from a bare `const ( … )` group that happens to lower to an enum
    /// (see `emit_const_groups`); this one carries its own C type name.
    pub(crate) fn emit_enum_decls(&mut self, program: &Node) {
        for child in &program.children {
            if child.kind != NodeKind::EnumDecl {
                continue;
            }
            let variants: Vec<String> = child.children.iter().map(|v| v.text.clone()).collect();
            self.out
                .push_str(&format!("typedef enum {{ {} }} {};\n", variants.join(", "), child.text));
        }
    }

    pub(crate) fn emit_struct_and_union_defs(&mut self, program: &Node) {
        for child in &program.children {
            if !matches!(child.kind, NodeKind::StructDecl | NodeKind::UnionDecl) {
                continue;
            }
            let keyword = if child.kind == NodeKind::StructDecl { "struct" } else { "union" };
            self.out.push_str(&format!("{} {} {{\n", keyword, child.text));
            for field in &child.children {
                let ty = crate::symtab::c_type_spelling(&field.children[1].text);
                self.out.push_str(&format!("{} {};\n", ty, field.text));
            }
            self.out.push_str("};\n\n");
        }
    }

    /// `const ( … )` groups (spec §4.2, §4.3): lowered to a single C
    /// `enum` when every entry is bare (an enum-variant candidate), or to
    /// a run of individually typed `const`s otherwise.
    pub(crate) fn emit_const_groups(&mut self, program: &Node) {
        for child in &program.children {
            if child.kind != NodeKind::ConstGroup {
                continue;
            }
            let all_bare = child.children.iter().all(|e| e.kind == NodeKind::Ident);
            if all_bare {
                let id = self.next_enum_id();
                let variants: Vec<String> = child.children.iter().map(|e| e.text.clone()).collect();
                self.out.push_str(&format!(
                    "typedef enum {{ {} }} come_{}__enum{};\n",
                    variants.join(", "),
                    self.module_name,
                    id
                ));
            } else {
                for entry in &child.children {
                    match entry.kind {
                        NodeKind::Ident => {
                            self.out.push_str(&format!("static const int {} = 0;\n", entry.text));
                        }
                        NodeKind::ConstDecl => {
                            let value = self.emit_expr(&entry.children[0]);
                            let ty = const_value_type(&entry.children[0]);
                            self.out.push_str(&format!("static const {} {} = {};\n", ty, entry.text, value));
                        }
                        _ => {}
                    }
                }
            }
        }
        self.out.push('\n');
    }

    /// Phase 3: synthesised, idempotent `init`/`exit` for this module,
    /// respecting the import DAG's ordering (spec §4.3, §6's module-init
    /// protocol, §8's idempotency invariant).
    pub(crate) fn emit_module_chain(&mut self, program: &Node) {
        let has_user_init = program
            .children
            .iter()
            .any(|c| c.kind == NodeKind::Function && (c.text == "module_init" || c.text == "init"));
        let has_user_exit = program.children.iter().any(|c| c.kind == NodeKind::Function && c.text == "exit");

        self.out.push_str(&format!(
            "void come_{0}__init(void) {{\n\
             static bool initialised = false;\n\
             if (initialised) return;\n\
             initialised = true;\n",
            self.module_name
        ));
        for import in self.imports.clone() {
            self.out.push_str(&format!("come_{}__init();\n", import));
        }
        if has_user_init {
            self.out.push_str(&format!("come_{}__init_local();\n", self.module_name));
        }
        self.out.push_str("}\n\n");

        self.out.push_str(&format!(
            "void come_{0}__exit(void) {{\n\
             static bool exited = false;\n\
             if (exited) return;\n\
             exited = true;\n",
            self.module_name
        ));
        if has_user_exit {
            self.out.push_str(&format!("come_{}__exit_local();\n", self.module_name));
        }
        for import in self.imports.clone().into_iter().rev() {
            self.out.push_str(&format!("come_{}__exit();\n", import));
        }
        self.out.push_str("}\n\n");
    }

    /// Phase 2: a synthesised C `main`, only for the module that declares
    /// one (spec §4.3, §6).
    pub(crate) fn emit_entry_point(&mut self, program: &Node) {
        let Some(user_main) = program
            .children
            .iter()
            .find(|c| c.kind == NodeKind::Function && c.text == "main")
        else {
            return;
        };
        let param_count = user_main.children.len() - 2;
        let ret_is_int = crate::symtab::c_type_spelling(&user_main.children[0].text) == "int";

        // `come_<module>__main` is defined last (phase 7) but called here
        // at phase 2, so it needs a forward declaration — unlike every
        // other function, it deliberately gets none from
        // `emit_function_prototypes` (spec §4.3: "for every non-`main`
        // function").
        let main_ret = if ret_is_int { "int" } else { "void" };
        let main_args = if param_count > 0 { "come_string_list_t*" } else { "void" };
        self.out
            .push_str(&format!("{} come_{}__main({});\n", main_ret, self.module_name, main_args));

        self.out.push_str("int main(int argc, char** argv) {\n");
        self.out
            .push_str(&format!("come_{0}__ctx = come_util_new_ctx(NULL);\n", self.module_name));
        self.out.push_str(&format!("come_{}__init();\n", self.module_name));

        let call_args = if param_count > 0 {
            "come_string_list_from_argv(argc, argv)".to_string()
        } else {
            String::new()
        };
        let call = format!("come_{}__main({})", self.module_name, call_args);
        if ret_is_int {
            self.out.push_str(&format!("int rc = {};\n", call));
        } else {
            self.out.push_str(&format!("{};\n", call));
        }
        self.out.push_str(&format!("come_{}__exit();\n", self.module_name));
        self.out
            .push_str(&format!("come_util_free(come_{}__ctx);\n", self.module_name));
        if ret_is_int {
            self.out.push_str("return rc;\n");
        } else {
            self.out.push_str("return 0;\n");
        }
        self.out.push_str("}\n\n");
    }
}

fn const_value_type(value: &Node) -> &'static str {
    match value.kind {
        NodeKind::StringLit => "char*",
        NodeKind::BoolLit => "bool",
        NodeKind::CharLit => "char",
        _ => "int",
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
    fn const_group_of_bare_entries_becomes_an_enum() {
        let c = gen("const (RED, GREEN, BLUE)");
        assert!(c.contains("typedef enum { RED, GREEN, BLUE }"));
    }

    #[test]
    fn const_group_with_values_becomes_typed_consts() {
        let c = gen("const (MAX = 10)");
        assert!(c.contains("static const int MAX = 10;"));
    }

    #[test]
    fn struct_typedef_is_emitted_once() {
        let c = gen("struct Point { int x; int y; } struct Point { int x; int y; }");
        assert_eq!(c.matches("typedef struct Point Point;").count(), 1);
    }
}
