//! Property-based tests for the universally-quantified claims in spec.md §8.
//! Concrete scenarios and the kind-by-kind unit coverage live next to the
//! code they exercise (`#[cfg(test)]` modules throughout `src/`); this file
//! is reserved for the properties that are naturally generative.

use ast_engine::context::AstContext;
use ast_engine::modes::{FlagModes, Mode};
use ast_engine::node::AstKind;
use ast_engine::BitVec;
use proptest::prelude::*;

fn width_strategy() -> impl Strategy<Value = u32> {
    1u32..=64
}

fn value_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

proptest! {
    /// Width law (property 1): every binary bit-vector operator's result
    /// shares its operands' width; every comparison's result is 1 bit.
    #[test]
    fn width_law_holds_for_binary_bv_ops(w in width_strategy(), a in value_strategy(), b in value_strategy()) {
        let ctx = AstContext::new(FlagModes::none());
        let lhs = ctx.bv(a as u128, w).unwrap();
        let rhs = ctx.bv(b as u128, w).unwrap();

        let add = ctx.bvadd(lhs.clone(), rhs.clone()).unwrap();
        prop_assert_eq!(add.size(), w);

        let cmp = ctx.bvult(lhs, rhs).unwrap();
        prop_assert_eq!(cmp.size(), 1);
    }

    /// Evaluation soundness (property 2): a ground `bvxor` node's `eval`
    /// matches the independently-computed `BitVec::xor`.
    #[test]
    fn evaluation_soundness_for_bvxor(w in width_strategy(), a in value_strategy(), b in value_strategy()) {
        let ctx = AstContext::new(FlagModes::none());
        let lhs = ctx.bv(a as u128, w).unwrap();
        let rhs = ctx.bv(b as u128, w).unwrap();
        let node = ctx.bvxor(lhs, rhs).unwrap();
        let expected = BitVec::from_u128(a as u128, w).xor(&BitVec::from_u128(b as u128, w));
        prop_assert_eq!(node.eval(), expected);
    }

    /// Simplification preserves meaning (property 3): `0 + x` evaluates the
    /// same whether `AST_OPTIMIZATIONS` folds it to `x` directly or builds
    /// the real `bvadd` node.
    #[test]
    fn zero_add_simplification_preserves_eval(w in width_strategy(), x in value_strategy()) {
        let optimized = AstContext::new(FlagModes::all());
        let raw = AstContext::new(FlagModes::none());

        let zero_o = optimized.bv(0, w).unwrap();
        let x_o = optimized.bv(x as u128, w).unwrap();
        let sum_o = optimized.bvadd(zero_o, x_o).unwrap();

        let zero_r = raw.bv(0, w).unwrap();
        let x_r = raw.bv(x as u128, w).unwrap();
        let sum_r = raw.bvadd(zero_r, x_r).unwrap();

        prop_assert_eq!(sum_o.eval(), sum_r.eval());
    }

    /// Variable update propagation (property 4): after `update_variable`,
    /// every ancestor's `eval` reflects the new binding, matching a fresh
    /// evaluation built from scratch with that value baked in.
    #[test]
    fn variable_update_propagates_to_every_ancestor(w in width_strategy(), initial in value_strategy(), updated in value_strategy(), k in value_strategy()) {
        let ctx = AstContext::new(FlagModes::none());
        let x = ctx.variable_named("x", w).unwrap();
        let k_node = ctx.bv(k as u128, w).unwrap();
        let sum = ctx.bvadd(x, k_node).unwrap();

        ctx.update_variable("x", BitVec::from_u128(initial as u128, w)).unwrap();
        prop_assert_eq!(sum.eval(), BitVec::from_u128(initial as u128, w).add(&BitVec::from_u128(k as u128, w)));

        ctx.update_variable("x", BitVec::from_u128(updated as u128, w)).unwrap();
        prop_assert_eq!(sum.eval(), BitVec::from_u128(updated as u128, w).add(&BitVec::from_u128(k as u128, w)));
    }

    /// Hash consistency (property 5): swapping the operands of a commutative
    /// operator produces the same structural hash.
    #[test]
    fn commutative_operand_order_does_not_change_hash(w in width_strategy(), a in value_strategy(), b in value_strategy()) {
        let ctx = AstContext::new(FlagModes::none());
        let a_node = ctx.bv(a as u128, w).unwrap();
        let b_node = ctx.bv(b as u128, w).unwrap();
        let ab = ctx.bvadd(a_node.clone(), b_node.clone()).unwrap();
        let ba = ctx.bvadd(b_node, a_node).unwrap();
        prop_assert_eq!(ab.hash(), ba.hash());
    }

    /// Unroll idempotence (property 7): unrolling an already-unrolled DAG
    /// changes nothing further.
    #[test]
    fn unroll_is_idempotent(w in width_strategy(), a in value_strategy()) {
        let pre = AstContext::new(FlagModes::none());
        let leaf = pre.bv(a as u128, w).unwrap();
        let mut store = ast_engine::expr_store::MapExpressionStore::new();
        store.insert(1, leaf, false);
        let ctx = AstContext::with_store(FlagModes::none(), Box::new(store));

        let r = ctx.reference(1).unwrap();
        let wrapped = ctx.bvadd(r, ctx.bv(1, w).unwrap()).unwrap();

        let once = ast_engine::traverse::unroll(&wrapped);
        let twice = ast_engine::traverse::unroll(&once);
        prop_assert!(once.equal_to(&twice));
        prop_assert!(ast_engine::traverse::collect(&once, |k| matches!(k, AstKind::Reference(_))).is_empty());
    }
}

/// Rotation lowering chooses its top-level shape per `SYMBOLIZE_INDEX_ROTATION`
/// (concrete scenario in §8): with the mode on, a symbolic-shift `bvrol`
/// lowers to `(shl | lshr)`; with it off, the shift is concretized into a
/// constant-rotation node.
#[test]
fn rotation_lowering_follows_the_mode_flag() {
    let mut on = FlagModes::none();
    on.enable(Mode::AstOptimizations);
    on.enable(Mode::SymbolizeIndexRotation);
    let ctx = AstContext::new(on);
    let x = ctx.variable_named("x", 8).unwrap();
    let k = ctx.variable_named("k", 8).unwrap();
    let rotated = ctx.bvrol(x, k).unwrap();
    assert!(matches!(&*rotated.kind(), AstKind::BvOr));

    let off = FlagModes::none();
    let ctx = AstContext::new(off);
    let x = ctx.variable_named("x", 8).unwrap();
    let k = ctx.bv(3, 8).unwrap();
    let rotated = ctx.bvrol(x, k).unwrap();
    assert!(matches!(&*rotated.kind(), AstKind::BvRol));
}
