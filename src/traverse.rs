//! Traversal utilities over the expression DAG (§4.6): `unroll`, `collect`,
//! `duplicate`. All three are DAG-safe — they key a visited map off
//! [`Node::identity`] so a subtree shared by many parents is only ever
//! visited once, the same discipline `Node::init()`'s parent-propagation
//! walk and the pretty-printers rely on implicitly through structural
//! sharing.

use crate::fx::FxHashMap;
use crate::node::{AstKind, Node};

/// Return a new DAG identical to `node` except that every `REFERENCE(id)` is
/// replaced in place by a deep copy of the referenced expression's root.
/// Used to hand solver back ends that don't understand `let`/reference a
/// flat formula.
pub fn unroll(node: &Node) -> Node {
    let mut memo = FxHashMap::default();
    unroll_rec(node, &mut memo)
}

fn unroll_rec(node: &Node, memo: &mut FxHashMap<usize, Node>) -> Node {
    if let Some(existing) = memo.get(&node.identity()) {
        return existing.clone();
    }
    let result = if let AstKind::Reference(_) = &*node.kind() {
        match node.get_symbolic_expression() {
            Ok((root, _tainted)) => unroll_rec(&root, memo),
            Err(_) => node.clone(),
        }
    } else {
        let children = node.children();
        let new_children: Vec<Node> = children.iter().map(|c| unroll_rec(c, memo)).collect();
        if children
            .iter()
            .zip(new_children.iter())
            .all(|(old, new)| old.ptr_eq(new))
        {
            node.clone()
        } else {
            Node::new_with_context(node.kind().clone(), new_children, node.context())
        }
    };
    memo.insert(node.identity(), result.clone());
    result
}

/// Depth-first pre-order traversal returning every subnode whose kind
/// matches `predicate`, each exactly once even if reachable through several
/// parents.
pub fn collect(node: &Node, predicate: impl Fn(&AstKind) -> bool) -> Vec<Node> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    collect_rec(node, &predicate, &mut seen, &mut out);
    out
}

fn collect_rec(
    node: &Node,
    predicate: &impl Fn(&AstKind) -> bool,
    seen: &mut std::collections::HashSet<usize>,
    out: &mut Vec<Node>,
) {
    if !seen.insert(node.identity()) {
        return;
    }
    if predicate(&node.kind()) {
        out.push(node.clone());
    }
    for child in node.children() {
        collect_rec(&child, predicate, seen, out);
    }
}

/// Structural deep copy that shares no mutation with `node`: every interior
/// (operator) node is rebuilt fresh, so `set_child` on the copy never
/// touches the original's parent links. Leaves that the context itself
/// treats as identity-unique — `VARIABLE`, and the other zero-arity kinds,
/// which carry no mutable children to begin with — are reused as-is.
pub fn duplicate(node: &Node) -> Node {
    let mut memo = FxHashMap::default();
    duplicate_rec(node, &mut memo)
}

fn duplicate_rec(node: &Node, memo: &mut FxHashMap<usize, Node>) -> Node {
    if let Some(existing) = memo.get(&node.identity()) {
        return existing.clone();
    }
    let result = match &*node.kind() {
        AstKind::Bv(_)
        | AstKind::Integer(_)
        | AstKind::Str(_)
        | AstKind::Variable(_)
        | AstKind::Reference(_) => node.clone(),
        kind => {
            let kind = kind.clone();
            let new_children: Vec<Node> = node
                .children()
                .iter()
                .map(|c| duplicate_rec(c, memo))
                .collect();
            Node::new_with_context(kind, new_children, node.context())
        }
    };
    memo.insert(node.identity(), result.clone());
    result
}
