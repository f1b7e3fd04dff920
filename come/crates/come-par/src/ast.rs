//! AST node definitions.
//!
//! spec §3 deliberately gives every construct the same shape rather than
//! a per-construct Rust enum (contrast the teacher's `Item`/`FnItem`/
//! `StructItem`, …): `{ kind, text, children, source_line }`. `kind`
//! distinguishes what a node *is*; `children` are in a kind-specific but
//! fixed order (documented per variant below); `text` carries whatever
//! single string a node needs (a name, an operator symbol, a literal's
//! spelling); `source_line` is always the line of the node's first token.

/// The closed set of AST node shapes (spec §3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root. `text` = module name. Children: imports, type aliases, const
    /// groups, struct/union/enum declarations, and functions, in source
    /// order.
    Program,
    /// `text` = function name (already mangled from `Struct.method` to
    /// `Struct_method` if applicable). Children: `[return_type, arg0, …,
    /// argN, body]` — the last child is always the block.
    Function,
    Block,
    /// Children: `[initializer, type]`. An uninitialised declaration gets
    /// a synthetic `0` number-literal initializer (spec §3).
    VarDecl,
    /// `text` = assignment operator spelling (`=`, `+=`, …). Children:
    /// `[target, value]`.
    Assign,
    /// Child 0 is the receiver; children 1..N are arguments; a trailing
    /// `Block` child, if present, is a trailing closure body.
    MethodCall,
    /// `text` = callee name. Children: arguments.
    Call,
    /// Children: `[cond, then_block]` or `[cond, then_block, else_block]`.
    If,
    /// Children: `[cond, body]`.
    While,
    /// Children: `[body, cond]`.
    DoWhile,
    /// Children: `[init, cond, step, body]`. Any of `init`/`cond`/`step`
    /// may be an `Empty` placeholder node.
    For,
    /// Children: `[scrutinee, case0, …, caseN]`, each a `Case` or
    /// `Default` node.
    Switch,
    /// `text` unused. Children: `[value, stmt0, …, stmtN]`.
    Case,
    /// Children: `[stmt0, …, stmtN]`.
    Default,
    /// Children: `[]` or `[value]`.
    Return,
    Break,
    Continue,
    /// `text` = the literal's spelling including quotes.
    StringLit,
    /// `text` = `"true"` or `"false"`.
    BoolLit,
    /// `text` = the literal's spelling, suffix and all.
    NumberLit,
    /// `text` = the character literal's spelling including quotes.
    CharLit,
    /// `text` = the name.
    Ident,
    /// Children: `[array, index]`.
    ArrayAccess,
    /// `text` = member name. Children: `[receiver]`.
    MemberAccess,
    /// `text` = alias name. Children: `[aliased_type]`.
    TypeAlias,
    /// `text` = struct name. Children: field `VarDecl`s.
    StructDecl,
    /// `text` = union name. Children: field `VarDecl`s.
    UnionDecl,
    /// `text` = enum name. Children: `Ident` nodes, one per variant.
    EnumDecl,
    /// `text` = constant name. Children: `[value]`.
    ConstDecl,
    /// Children: `ConstDecl` or `EnumDecl`-variant entries (spec §4.2:
    /// lowered to a single C `enum` when every entry is of enum form).
    ConstGroup,
    /// Children are either raw expressions (positional) or `Assign`
    /// nodes whose target is a `.field` designator (designated). Empty
    /// for `{}`.
    AggregateInit,
    /// `text` = operator symbol. Children: `[lhs, rhs]`.
    BinaryOp,
    /// `text` = operator symbol. Children: `[operand]`.
    UnaryOp,
    /// `text` = `"++"` or `"--"`. Children: `[operand]`.
    PostInc,
    /// `text` = `"++"` or `"--"`. Children: `[operand]`.
    PostDec,
    /// Children: `[item]`. Parsing-only marker (spec §9 open question):
    /// affects no emission.
    Export,
    /// `text` = imported module name.
    Import,
    /// `text` = target type spelling. Children: `[operand]`.
    Cast,
    /// Children: `[cond, then_expr, else_expr]`.
    Ternary,
    /// A placeholder standing in for a required-but-missing child after
    /// a parse error (spec §7): codegen emits `/* AST ERROR: NULL NODE
    /// */ 0` for these rather than aborting.
    Error,
    /// An explicitly empty slot, e.g. the omitted clauses of a C-style
    /// `for (;;)`.
    Empty,
}

/// A uniformly shaped AST node (spec §3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub text: String,
    pub children: Vec<Node>,
    pub source_line: u32,
}

impl Node {
    pub fn new(kind: NodeKind, text: impl Into<String>, source_line: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            children: Vec::new(),
            source_line,
        }
    }

    pub fn with_children(
        kind: NodeKind,
        text: impl Into<String>,
        source_line: u32,
        children: Vec<Node>,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            children,
            source_line,
        }
    }

    /// A synthetic numeric `0`, used as the implicit initializer of an
    /// uninitialised `VarDecl` and as the implicit value of a `return`
    /// whose function has a non-void declared type (spec §3, §4.3).
    pub fn zero(source_line: u32) -> Self {
        Node::new(NodeKind::NumberLit, "0", source_line)
    }

    /// A placeholder for a required child the parser could not produce
    /// after a syntax error (spec §7).
    pub fn error_node(source_line: u32) -> Self {
        Node::new(NodeKind::Error, "", source_line)
    }

    pub fn is_error(&self) -> bool {
        self.kind == NodeKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_node_is_a_number_literal() {
        let zero = Node::zero(3);
        assert_eq!(zero.kind, NodeKind::NumberLit);
        assert_eq!(zero.text, "0");
        assert_eq!(zero.source_line, 3);
    }

    #[test]
    fn error_node_is_recognisable() {
        let node = Node::error_node(1);
        assert!(node.is_error());
    }
}
