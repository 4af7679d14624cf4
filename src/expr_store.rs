//! The symbolic-expression store capability that `REFERENCE` nodes consume
//! (§6). Ownership of the store — and of the path-constraint log, taint
//! engine and SMT back end it feeds — lives entirely outside this crate;
//! the AST engine only ever calls `lookup`.

use crate::node::Node;

/// An expression id assigned by the (external) symbolic-expression store.
pub type ExprId = u64;

/// What a `REFERENCE(expr_id)` node needs from the store it points into:
/// the root node of the referenced expression, and whether that expression
/// is currently marked tainted.
///
/// The AST engine forwards the tainted bit verbatim (see
/// `Node::get_symbolic_expression` and `SPEC_FULL.md` §4.8) — it never
/// interprets it itself; tainting is the store's concern, per
/// `original_source/src/libtriton/ast/astContext.cpp`'s separation between
/// the AST and `symbolicExpression` objects.
pub trait ExpressionStore {
    /// Resolve `id` to its root node and tainted flag, or `None` if `id` is
    /// unknown (the `AstContext` turns that into `AstError::UnknownVariable`).
    fn lookup(&self, id: ExprId) -> Option<(Node, bool)>;
}

/// A trivial in-memory store, useful for this crate's own tests and for
/// small embedders that don't yet have a real symbolic-expression log.
#[derive(Default)]
pub struct MapExpressionStore {
    entries: crate::fx::FxHashMap<ExprId, (Node, bool)>,
}

impl MapExpressionStore {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            entries: Default::default(),
        }
    }

    /// Register `id -> (root, tainted)`, overwriting any prior binding.
    pub fn insert(&mut self, id: ExprId, root: Node, tainted: bool) {
        self.entries.insert(id, (root, tainted));
    }
}

impl ExpressionStore for MapExpressionStore {
    fn lookup(&self, id: ExprId) -> Option<(Node, bool)> {
        self.entries.get(&id).cloned()
    }
}
