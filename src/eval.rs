//! The concrete evaluator (§4.5): a pure, bottom-up interpretation of a
//! node's kind and its children's *already-cached* `eval()` values under the
//! context's current variable bindings. `Node::init()` is the only caller;
//! it always re-evaluates a node's direct children first (they're already
//! up to date by construction/propagation order), so this module never
//! walks more than one level at a time.

use crate::bitvec::BitVec;
use crate::node::{AstKind, ContextHandle, Node};

/// The bit-width a node of this kind, with these children, produces.
/// `Reference` is the only kind that needs the context (to size itself
/// after the expression it points to); every other kind is sized from its
/// own payload or its children's already-known widths.
pub(crate) fn size_for_kind(kind: &AstKind, children: &[Node], context: &ContextHandle) -> u32 {
    match kind {
        AstKind::Integer(bv) | AstKind::Bv(bv) => bv.width(),
        AstKind::Str(_) => 0,
        AstKind::Variable(sv) => sv.size(),
        AstKind::Reference(id) => resolve_reference(*id, context)
            .map(|(node, _)| node.size())
            .unwrap_or(0),

        AstKind::BvAdd
        | AstKind::BvSub
        | AstKind::BvMul
        | AstKind::BvAnd
        | AstKind::BvOr
        | AstKind::BvXor
        | AstKind::BvNand
        | AstKind::BvNor
        | AstKind::BvXnor
        | AstKind::BvShl
        | AstKind::BvLshr
        | AstKind::BvAshr
        | AstKind::BvSdiv
        | AstKind::BvUdiv
        | AstKind::BvSmod
        | AstKind::BvSrem
        | AstKind::BvUrem
        | AstKind::BvNeg
        | AstKind::BvNot
        | AstKind::BvRol
        | AstKind::BvRor => children[0].size(),

        AstKind::Bvsge
        | AstKind::Bvsgt
        | AstKind::Bvsle
        | AstKind::Bvslt
        | AstKind::Bvuge
        | AstKind::Bvugt
        | AstKind::Bvule
        | AstKind::Bvult
        | AstKind::Equal
        | AstKind::Distinct
        | AstKind::Iff
        | AstKind::Land
        | AstKind::Lor
        | AstKind::Lnot
        | AstKind::Declare
        | AstKind::Assert => 1,

        AstKind::Ite => children[1].size(),
        AstKind::Concat => children.iter().map(Node::size).sum(),
        AstKind::Extract(hi, lo) => hi - lo + 1,
        AstKind::Sx(k) | AstKind::Zx(k) => children[0].size() + k,
        AstKind::Let(_) => children.get(1).map(Node::size).unwrap_or(0),
        AstKind::Compound => children.last().map(Node::size).unwrap_or(0),
    }
}

/// Re-derive this node's concrete value from its children's cached `eval()`
/// (§4.5). `size` is whatever `size_for_kind` just computed for the same
/// kind/children, passed in so leaf kinds don't need to recompute it.
pub(crate) fn evaluate(kind: &AstKind, children: &[Node], context: &ContextHandle, size: u32) -> BitVec {
    match kind {
        AstKind::Integer(bv) | AstKind::Bv(bv) => *bv,
        AstKind::Str(_) => BitVec::zero(1),
        AstKind::Variable(sv) => context
            .upgrade()
            .and_then(|cx| cx.borrow().variables().get_value(sv.name()).ok())
            .unwrap_or_else(|| BitVec::zero(sv.size())),
        AstKind::Reference(id) => resolve_reference(*id, context)
            .map(|(node, _)| node.eval())
            .unwrap_or_else(|| BitVec::zero(size.max(1))),

        AstKind::BvAdd => children[0].eval().add(&children[1].eval()),
        AstKind::BvSub => children[0].eval().sub(&children[1].eval()),
        AstKind::BvMul => children[0].eval().mul(&children[1].eval()),
        AstKind::BvAnd => children[0].eval().and(&children[1].eval()),
        AstKind::BvOr => children[0].eval().or(&children[1].eval()),
        AstKind::BvXor => children[0].eval().xor(&children[1].eval()),
        AstKind::BvNand => children[0].eval().and(&children[1].eval()).not(),
        AstKind::BvNor => children[0].eval().or(&children[1].eval()).not(),
        AstKind::BvXnor => children[0].eval().xor(&children[1].eval()).not(),
        AstKind::BvShl => children[0].eval().shl(&children[1].eval()),
        AstKind::BvLshr => children[0].eval().lshr(&children[1].eval()),
        AstKind::BvAshr => children[0].eval().ashr(&children[1].eval()),
        AstKind::BvSdiv => children[0].eval().sdiv(&children[1].eval()),
        AstKind::BvUdiv => children[0].eval().udiv(&children[1].eval()),
        AstKind::BvSmod => children[0].eval().smod(&children[1].eval()),
        AstKind::BvSrem => children[0].eval().srem(&children[1].eval()),
        AstKind::BvUrem => children[0].eval().urem(&children[1].eval()),

        AstKind::BvNeg => children[0].eval().neg(),
        AstKind::BvNot => children[0].eval().not(),

        AstKind::BvRol => {
            let width = children[0].size().max(1);
            let k = (children[1].eval().to_u128_lossy() % width as u128) as u32;
            children[0].eval().rol_const(k)
        }
        AstKind::BvRor => {
            let width = children[0].size().max(1);
            let k = (children[1].eval().to_u128_lossy() % width as u128) as u32;
            children[0].eval().ror_const(k)
        }

        AstKind::Bvsge => BitVec::from_bool(children[0].eval().sge(&children[1].eval())),
        AstKind::Bvsgt => BitVec::from_bool(children[0].eval().sgt(&children[1].eval())),
        AstKind::Bvsle => BitVec::from_bool(children[0].eval().sle(&children[1].eval())),
        AstKind::Bvslt => BitVec::from_bool(children[0].eval().slt(&children[1].eval())),
        AstKind::Bvuge => BitVec::from_bool(children[0].eval().uge(&children[1].eval())),
        AstKind::Bvugt => BitVec::from_bool(children[0].eval().ugt(&children[1].eval())),
        AstKind::Bvule => BitVec::from_bool(children[0].eval().ule(&children[1].eval())),
        AstKind::Bvult => BitVec::from_bool(children[0].eval().ult(&children[1].eval())),

        AstKind::Equal => {
            BitVec::from_bool(children.windows(2).all(|w| w[0].eval() == w[1].eval()))
        }
        AstKind::Distinct => BitVec::from_bool(all_pairwise_distinct(children)),
        AstKind::Iff => BitVec::from_bool(children[0].eval().as_bool() == children[1].eval().as_bool()),

        AstKind::Land => BitVec::from_bool(children.iter().all(|c| c.eval().as_bool())),
        AstKind::Lor => BitVec::from_bool(children.iter().any(|c| c.eval().as_bool())),
        AstKind::Lnot => BitVec::from_bool(!children[0].eval().as_bool()),

        AstKind::Ite => {
            if children[0].eval().as_bool() {
                children[1].eval()
            } else {
                children[2].eval()
            }
        }
        AstKind::Concat => children[1..]
            .iter()
            .fold(children[0].eval(), |acc, c| acc.concat(&c.eval())),
        AstKind::Extract(hi, lo) => children[0].eval().extract(*hi, *lo),
        AstKind::Sx(k) => children[0].eval().sign_extend(*k),
        AstKind::Zx(k) => children[0].eval().zero_extend(*k),

        AstKind::Let(_) => children
            .get(1)
            .map(Node::eval)
            .unwrap_or_else(|| BitVec::zero(1)),
        AstKind::Declare => children
            .first()
            .map(Node::eval)
            .unwrap_or_else(BitVec::logical_false),
        AstKind::Assert => children
            .first()
            .map(Node::eval)
            .unwrap_or_else(BitVec::logical_false),
        AstKind::Compound => children
            .last()
            .map(Node::eval)
            .unwrap_or_else(|| BitVec::zero(1)),
    }
}

fn all_pairwise_distinct(children: &[Node]) -> bool {
    for (i, a) in children.iter().enumerate() {
        for b in &children[i + 1..] {
            if a.eval() == b.eval() {
                return false;
            }
        }
    }
    true
}

fn resolve_reference(id: crate::expr_store::ExprId, context: &ContextHandle) -> Option<(Node, bool)> {
    let cx = context.upgrade()?;
    let cx = cx.borrow();
    cx.store().lookup(id)
}

#[cfg(test)]
mod tests {
    use crate::context::AstContext;
    use crate::modes::FlagModes;

    #[test]
    fn binary_op_evaluates_concretely() {
        let ctx = AstContext::new(FlagModes::none());
        let a = ctx.bv(12345, 64).unwrap();
        let b = ctx.bv(67890, 64).unwrap();
        let node = ctx.bvxor(a, b).unwrap();
        assert_eq!(node.eval().to_u128_lossy(), (12345u128 ^ 67890u128));
    }

    #[test]
    fn ite_picks_the_taken_branch() {
        let ctx = AstContext::new(FlagModes::none());
        let cond = ctx.equal(ctx.bv(1, 8).unwrap(), ctx.bv(1, 8).unwrap()).unwrap();
        let then_branch = ctx.bv(10, 8).unwrap();
        let else_branch = ctx.bv(20, 8).unwrap();
        let ite = ctx.ite(cond, then_branch, else_branch).unwrap();
        assert_eq!(ite.eval().to_u128_lossy(), 10);
    }
}
