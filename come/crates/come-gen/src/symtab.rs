//! The codegen-local symbol table (spec §4.4): a flat `Vec<(name, type)>`
//! with linear lookup, reset per function. Deliberately not a hash map —
//! spec §4.4 and §9's Design Notes are explicit that the intended upgrade
//! from the source's fixed-capacity array is a growable *container*, not a
//! different *lookup strategy*.

use crate::Codegen;

/// The receiver kinds method dispatch and `.`/`->` selection resolve
/// against, replacing the source's identifier-name heuristics with real
/// declared-type lookups (spec §9's "ad-hoc method-name routing →
/// type-directed dispatch" and "pointer-ness heuristic → explicit type
/// table" re-architecture notes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReceiverKind {
    String,
    Map,
    Array,
    Struct(String),
    Unknown,
}

#[derive(Default)]
pub(crate) struct SymbolTable {
    entries: Vec<(String, String)>,
}

impl SymbolTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&mut self) {
        self.entries.clear();
    }

    /// Overwrites an existing entry for `name` in place rather than
    /// pushing a duplicate, matching spec §4.4's documented shadowing
    /// behaviour ("inner shadows are accepted by overwriting in
    /// practice, at the cost of losing the outer entry until function
    /// end").
    pub(crate) fn record(&mut self, name: &str, ty: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = ty.to_string();
        } else {
            self.entries.push((name.to_string(), ty.to_string()));
        }
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ty)| ty.as_str())
    }
}

/// Variable names the source treats as numerically typed arrays for
/// `printf` dispatch regardless of their declared type — a legacy
/// heuristic spec §9's open questions says must be preserved verbatim
/// rather than superseded.
const NUMERIC_ARRAY_NAME_HINTS: &[&str] = &["scaled", "dyn", "buf", "arr", "args"];

/// Maps a declared source-level type spelling to the C type used for a
/// parameter, return type, or struct field — the same mapping the
/// var-decl table (`function.rs`) applies to locals, factored out so
/// function signatures and struct field lists stay consistent with it.
pub(crate) fn c_type_spelling(declared: &str) -> String {
    if declared == "(...)" {
        return "int".to_string();
    }
    if declared.starts_with("string[]") {
        return "come_string_list_t*".to_string();
    }
    if declared.starts_with("string") {
        return "come_string_t*".to_string();
    }
    if declared.ends_with("]") && declared.contains('[') {
        return "come_array_t*".to_string();
    }
    declared.to_string()
}

impl Codegen {
    pub(crate) fn record_local(&mut self, name: &str, ty: &str) {
        self.locals.record(name, ty);
    }

    pub(crate) fn local_type(&self, name: &str) -> Option<&str> {
        self.locals.lookup(name)
    }

    pub(crate) fn is_pointer_type(ty: &str) -> bool {
        ty.trim_end().ends_with('*')
    }

    /// True when `name` is one of the legacy array-receiver hints (spec
    /// §9) that must never be treated as string-typed for `printf`
    /// dispatch purposes.
    pub(crate) fn is_numeric_array_hint(name: &str) -> bool {
        NUMERIC_ARRAY_NAME_HINTS.contains(&name)
    }

    pub(crate) fn classify_receiver(&self, declared_type: &str) -> ReceiverKind {
        let bare = declared_type.trim_end_matches('*').trim();
        if bare.is_empty() {
            return ReceiverKind::Unknown;
        }
        if bare == "string" || bare.starts_with("string[") {
            ReceiverKind::String
        } else if bare == "map" || bare.starts_with("map[") || bare.starts_with("map<") {
            ReceiverKind::Map
        } else if bare.contains('[') || bare.ends_with("[]") {
            ReceiverKind::Array
        } else if self.is_known_struct(bare) {
            ReceiverKind::Struct(bare.to_string())
        } else {
            ReceiverKind::Unknown
        }
    }
}
