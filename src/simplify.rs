//! Peephole algebraic simplification (§4.3), consulted by every `AstContext`
//! build method before it allocates an interior node. A rule fires only when
//! the constant side of the identity is ground — checked with
//! `!node.is_symbolized()` — matching the "concrete operand must be ground"
//! qualifier on the whole rule table. A hit returns an existing child
//! directly (the common case) or, for identities whose result is a fresh
//! constant (`x ^ x → 0`), builds that single constant node through the
//! context rather than the requested operator node — still far cheaper than
//! the node it replaces.
//!
//! `x - x → 0` and `x | x → x` are purely structural (`Node::equal_to`) and
//! fire even when `x` is symbolic; `x & x → x` and `x ^ x → 0` additionally
//! require `x` to be ground. Both choices are pinned by design notes rather
//! than left to implementer discretion.

use crate::context::AstContext;
use crate::node::{AstKind, Node};

fn is_ground_zero(n: &Node) -> bool {
    !n.is_symbolized() && n.eval().is_zero()
}

fn is_ground_all_ones(n: &Node) -> bool {
    !n.is_symbolized() && n.eval() == crate::bitvec::BitVec::all_ones(n.size().max(1))
}

fn is_ground_one(n: &Node) -> bool {
    !n.is_symbolized() && n.eval() == crate::bitvec::BitVec::from_u64(1, n.size().max(1))
}

fn same_subtree(a: &Node, b: &Node) -> bool {
    a.equal_to(b)
}

/// Try to simplify `kind` applied to `children`. Returns `Some(node)` when a
/// rule matched; the caller allocates the normal interior node otherwise.
pub(crate) fn simplify(ctx: &AstContext, kind: &AstKind, children: &[Node]) -> Option<Node> {
    match kind {
        AstKind::BvAdd => {
            let (a, b) = (&children[0], &children[1]);
            if is_ground_zero(a) {
                return Some(b.clone());
            }
            if is_ground_zero(b) {
                return Some(a.clone());
            }
            None
        }
        AstKind::BvSub => {
            let (a, b) = (&children[0], &children[1]);
            if is_ground_zero(b) {
                return Some(a.clone());
            }
            if is_ground_zero(a) {
                return ctx.bvneg(b.clone()).ok();
            }
            if same_subtree(a, b) {
                return ctx.bv(0, a.size().max(1)).ok();
            }
            None
        }
        AstKind::BvMul => {
            let (a, b) = (&children[0], &children[1]);
            if is_ground_zero(a) {
                return Some(a.clone());
            }
            if is_ground_zero(b) {
                return Some(b.clone());
            }
            None
        }
        AstKind::BvAnd => {
            let (a, b) = (&children[0], &children[1]);
            if is_ground_zero(a) {
                return Some(a.clone());
            }
            if is_ground_zero(b) {
                return Some(b.clone());
            }
            if is_ground_all_ones(a) {
                return Some(b.clone());
            }
            if is_ground_all_ones(b) {
                return Some(a.clone());
            }
            if same_subtree(a, b) && !a.is_symbolized() {
                return Some(a.clone());
            }
            None
        }
        AstKind::BvOr => {
            let (a, b) = (&children[0], &children[1]);
            if is_ground_zero(a) {
                return Some(b.clone());
            }
            if is_ground_zero(b) {
                return Some(a.clone());
            }
            if is_ground_all_ones(a) {
                return Some(a.clone());
            }
            if is_ground_all_ones(b) {
                return Some(b.clone());
            }
            if same_subtree(a, b) {
                return Some(a.clone());
            }
            None
        }
        AstKind::BvXor => {
            let (a, b) = (&children[0], &children[1]);
            if is_ground_zero(a) {
                return Some(b.clone());
            }
            if is_ground_zero(b) {
                return Some(a.clone());
            }
            if same_subtree(a, b) && !a.is_symbolized() {
                return ctx.bv(0, a.size().max(1)).ok();
            }
            None
        }
        AstKind::BvUdiv | AstKind::BvSdiv => {
            let (a, b) = (&children[0], &children[1]);
            if is_ground_one(b) {
                return Some(a.clone());
            }
            None
        }
        AstKind::BvShl | AstKind::BvLshr => {
            let (a, b) = (&children[0], &children[1]);
            if is_ground_zero(a) {
                return Some(a.clone());
            }
            if is_ground_zero(b) {
                return Some(a.clone());
            }
            if !b.is_symbolized() && b.eval().to_u128_lossy() >= a.size() as u128 {
                return ctx.bv(0, a.size().max(1)).ok();
            }
            None
        }
        AstKind::BvAshr => {
            let (a, b) = (&children[0], &children[1]);
            if is_ground_zero(a) {
                return Some(a.clone());
            }
            if is_ground_zero(b) {
                return Some(a.clone());
            }
            None
        }
        AstKind::Extract(hi, lo) => {
            let x = &children[0];
            if *lo == 0 && *hi + 1 == x.size() {
                return Some(x.clone());
            }
            None
        }
        AstKind::Zx(k) | AstKind::Sx(k) => {
            if *k == 0 {
                return Some(children[0].clone());
            }
            None
        }
        _ => None,
    }
}
