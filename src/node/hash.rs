//! Structural hashing (§4.2, §8 property 5): "a commutative-aware mix over
//! kind and children's hashes; commutative kinds sort children by hash
//! before mixing so that `a+b` and `b+a` hash identically."
//!
//! The spec's reference implementation keeps a 512-bit fingerprint; this
//! crate uses a 64-bit `FxHasher`-based mix instead (see DESIGN.md open
//! question resolution) — collisions are a performance concern for a
//! would-be intern table, not a correctness one, since `equal_to` always
//! falls back to a full structural comparison.

use super::{AstKind, Node};
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

pub(super) fn hash_node(node: &Node) -> u64 {
    let data = node.0.borrow();

    let mut own = FxHasher::default();
    std::mem::discriminant(&data.kind).hash(&mut own);
    hash_payload(&data.kind, &mut own);
    let own_hash = own.finish();

    let mut child_hashes: Vec<u64> = data.children.iter().map(Node::hash).collect();
    if is_commutative(&data.kind) {
        child_hashes.sort_unstable();
    }

    let mut state = FxHasher::default();
    own_hash.hash(&mut state);
    child_hashes.len().hash(&mut state);
    for h in child_hashes {
        h.hash(&mut state);
    }
    state.finish()
}

fn hash_payload<H: Hasher>(kind: &AstKind, state: &mut H) {
    match kind {
        AstKind::Integer(bv) | AstKind::Bv(bv) => bv.hash(state),
        AstKind::Str(s) => s.hash(state),
        AstKind::Variable(v) => v.name().hash(state),
        AstKind::Reference(id) => id.hash(state),
        AstKind::Extract(hi, lo) => {
            hi.hash(state);
            lo.hash(state);
        }
        AstKind::Sx(k) | AstKind::Zx(k) => k.hash(state),
        AstKind::Let(name) => name.hash(state),
        _ => {}
    }
}

/// Kinds where operand order doesn't affect the denotation (§4.2).
fn is_commutative(kind: &AstKind) -> bool {
    matches!(
        kind,
        AstKind::BvAdd
            | AstKind::BvMul
            | AstKind::BvAnd
            | AstKind::BvOr
            | AstKind::BvXor
            | AstKind::BvNand
            | AstKind::BvNor
            | AstKind::BvXnor
            | AstKind::Equal
            | AstKind::Distinct
            | AstKind::Iff
            | AstKind::Land
            | AstKind::Lor
    )
}
