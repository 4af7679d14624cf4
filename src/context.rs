//! The AST Context (§4.3): the sole constructor of [`Node`]s, the owner of
//! the variable binding table, and the place mode flags and the
//! expression store are plugged in. Grounded on the "one struct owns the
//! arena, every build method goes through it" shape of
//! `cranelift-codegen`'s `FunctionBuilder`/`DataFlowGraph` pair, collapsed
//! into a single type since this engine's "arena" is just `Rc` allocation,
//! not an index-based pool.

use crate::bitvec::BitVec;
use crate::error::{AstError, AstResult};
use crate::expr_store::{ExprId, ExpressionStore, MapExpressionStore};
use crate::modes::{Mode, Modes};
use crate::node::{AstKind, ContextHandle, Node};
use crate::printer::{self, RepresentationMode};
use crate::variable::{SharedVariable, SymbolicVariable, VariableTable};
use std::cell::RefCell;
use std::rc::Rc;

/// The mutable state behind an [`AstContext`] handle.
pub struct ContextState {
    modes: Box<dyn Modes>,
    store: Box<dyn ExpressionStore>,
    variables: VariableTable,
    repr_mode: RepresentationMode,
}

impl ContextState {
    pub(crate) fn modes(&self) -> &dyn Modes {
        &*self.modes
    }

    pub(crate) fn store(&self) -> &dyn ExpressionStore {
        &*self.store
    }

    pub(crate) fn variables(&self) -> &VariableTable {
        &self.variables
    }

    pub(crate) fn variables_mut(&mut self) -> &mut VariableTable {
        &mut self.variables
    }
}

/// A shared handle to the builder/owner of one expression DAG.
///
/// Not `Send`/`Sync` (see `SPEC_FULL.md` §5): the whole engine is
/// single-threaded by design, and `Rc`/`RefCell` make that a compile-time
/// fact rather than a convention.
#[derive(Clone)]
pub struct AstContext(Rc<RefCell<ContextState>>);

impl AstContext {
    /// A fresh context with an empty, in-memory expression store and no
    /// registered variables.
    pub fn new(modes: impl Modes + 'static) -> Self {
        Self::with_store(modes, Box::new(MapExpressionStore::new()))
    }

    /// A fresh context backed by a caller-supplied expression store — the
    /// store is populated by its owner *before* being handed in, since the
    /// AST engine itself only ever calls `lookup` (§6).
    pub fn with_store(modes: impl Modes + 'static, store: Box<dyn ExpressionStore>) -> Self {
        AstContext(Rc::new(RefCell::new(ContextState {
            modes: Box::new(modes),
            store,
            variables: VariableTable::new(),
            repr_mode: RepresentationMode::default(),
        })))
    }

    fn handle(&self) -> ContextHandle {
        Rc::downgrade(&self.0)
    }

    fn new_node(&self, kind: AstKind, children: Vec<Node>) -> Node {
        Node::new_with_context(kind, children, self.handle())
    }

    fn optimizations_enabled(&self) -> bool {
        self.0.borrow().modes().is_mode_enabled(Mode::AstOptimizations)
    }

    fn maybe_simplify(&self, kind: &AstKind, children: &[Node]) -> Option<Node> {
        if !self.optimizations_enabled() {
            return None;
        }
        crate::simplify::simplify(self, kind, children)
    }

    fn check_same_width(&self, a: &Node, b: &Node) -> AstResult<()> {
        if a.size() != b.size() {
            return Err(AstError::WidthMismatch {
                lhs: a.size(),
                rhs: b.size(),
            });
        }
        Ok(())
    }

    /// Reject an operand that isn't a 1-bit logical node (§3 `LAND/LOR`,
    /// `LNOT`, `IFF`, `ITE`'s condition): `evaluate`/`BitVec::as_bool` assume
    /// width 1, so this must be checked here rather than left to panic.
    fn check_logical(&self, n: &Node) -> AstResult<()> {
        if n.size() != 1 {
            return Err(AstError::OutOfRange {
                detail: "operand must be a 1-bit logical node",
            });
        }
        Ok(())
    }

    fn build_binary(&self, kind: AstKind, a: Node, b: Node) -> AstResult<Node> {
        self.check_same_width(&a, &b)?;
        let children = vec![a, b];
        if let Some(hit) = self.maybe_simplify(&kind, &children) {
            return Ok(hit);
        }
        Ok(self.new_node(kind, children))
    }

    fn build_unary(&self, kind: AstKind, a: Node) -> AstResult<Node> {
        let children = vec![a];
        if let Some(hit) = self.maybe_simplify(&kind, &children) {
            return Ok(hit);
        }
        Ok(self.new_node(kind, children))
    }

    // ---- leaves -----------------------------------------------------

    /// A concrete bit-vector literal, `value` truncated to `width`.
    pub fn bv(&self, value: u128, width: u32) -> AstResult<Node> {
        if width == 0 || width > crate::bitvec::MAX_BITS {
            return Err(AstError::OutOfRange {
                detail: "bit-vector width must be in 1..=512",
            });
        }
        Ok(self.new_node(AstKind::Bv(BitVec::from_u128(value, width)), Vec::new()))
    }

    /// `bv(1, 1)`.
    pub fn bv_true(&self) -> AstResult<Node> {
        self.bv(1, 1)
    }

    /// `bv(0, 1)`.
    pub fn bv_false(&self) -> AstResult<Node> {
        self.bv(0, 1)
    }

    /// A polymorphic, untyped-width literal — used for shift/rotate counts
    /// and extension widths rather than as a bit-vector operand.
    pub fn integer(&self, value: u128, width: u32) -> AstResult<Node> {
        if width == 0 || width > crate::bitvec::MAX_BITS {
            return Err(AstError::OutOfRange {
                detail: "integer width must be in 1..=512",
            });
        }
        Ok(self.new_node(AstKind::Integer(BitVec::from_u128(value, width)), Vec::new()))
    }

    /// A `STRING` literal.
    pub fn string(&self, s: impl Into<Rc<str>>) -> AstResult<Node> {
        Ok(self.new_node(AstKind::Str(s.into()), Vec::new()))
    }

    /// `variable(sv)`: returns the pre-existing node for `sv.name` if one is
    /// already bound (after a size-consistency check), otherwise allocates a
    /// fresh `VARIABLE` node and binds it at value `0` (§4.3).
    pub fn variable(&self, sv: SharedVariable) -> AstResult<Node> {
        {
            let state = self.0.borrow();
            if state.variables.contains(sv.name()) {
                let existing = state.variables.get_node(sv.name())?;
                if existing.size() != sv.size() {
                    return Err(AstError::WidthMismatch {
                        lhs: existing.size(),
                        rhs: sv.size(),
                    });
                }
                return Ok(existing);
            }
        }
        log::debug!("allocating new symbolic variable {} ({} bits)", sv.name(), sv.size());
        let node = self.new_node(AstKind::Variable(sv.clone()), Vec::new());
        self.0
            .borrow_mut()
            .variables
            .init_variable(sv.name(), BitVec::zero(sv.size()), node.clone())?;
        Ok(node)
    }

    /// Convenience over [`AstContext::variable`] for a `name, size` pair.
    pub fn variable_named(&self, name: &str, size: u32) -> AstResult<Node> {
        self.variable(Rc::new(SymbolicVariable::new(name, size)))
    }

    /// A `REFERENCE(expr_id)` node, sized from the store's current binding.
    pub fn reference(&self, id: ExprId) -> AstResult<Node> {
        let exists = self.0.borrow().store().lookup(id).is_some();
        if !exists {
            return Err(AstError::UnknownVariable {
                name: id.to_string(),
            });
        }
        Ok(self.new_node(AstKind::Reference(id), Vec::new()))
    }

    // ---- binary bit-vector arithmetic/bitwise ------------------------

    pub fn bvadd(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvAdd, a, b)
    }
    pub fn bvsub(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvSub, a, b)
    }
    pub fn bvmul(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvMul, a, b)
    }
    pub fn bvand(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvAnd, a, b)
    }
    pub fn bvor(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvOr, a, b)
    }
    pub fn bvxor(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvXor, a, b)
    }
    pub fn bvnand(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvNand, a, b)
    }
    pub fn bvnor(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvNor, a, b)
    }
    pub fn bvxnor(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvXnor, a, b)
    }
    pub fn bvshl(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvShl, a, b)
    }
    pub fn bvlshr(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvLshr, a, b)
    }
    pub fn bvashr(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvAshr, a, b)
    }
    pub fn bvsdiv(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvSdiv, a, b)
    }
    pub fn bvudiv(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvUdiv, a, b)
    }
    pub fn bvsmod(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvSmod, a, b)
    }
    pub fn bvsrem(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvSrem, a, b)
    }
    pub fn bvurem(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::BvUrem, a, b)
    }

    pub fn bvneg(&self, a: Node) -> AstResult<Node> {
        self.build_unary(AstKind::BvNeg, a)
    }
    pub fn bvnot(&self, a: Node) -> AstResult<Node> {
        self.build_unary(AstKind::BvNot, a)
    }

    // ---- rotation: constant and symbolic shift amounts ---------------

    /// `BVROL(expr, k)` with a compile-time-known shift count. `k` is reduced
    /// modulo the operand's width *before* it is stored in the `Integer`
    /// node — building the node at `expr`'s width first and reducing
    /// afterward would truncate `k` to that width instead of reducing it
    /// mod width, changing the rotation for a non-power-of-two width (e.g.
    /// `bvrol_const(x_3, 8)` must rotate by `8 mod 3 = 2`, not by `8 mod 2^3
    /// mod 3 = 0`).
    pub fn bvrol_const(&self, expr: Node, k: u32) -> AstResult<Node> {
        let width = expr.size().max(1);
        let amount = self.integer((k % width) as u128, width)?;
        self.build_rotate(AstKind::BvRol, expr, amount)
    }
    /// `BVROR(expr, k)` with a compile-time-known shift count; see
    /// [`AstContext::bvrol_const`] for why `k` is reduced mod width up front.
    pub fn bvror_const(&self, expr: Node, k: u32) -> AstResult<Node> {
        let width = expr.size().max(1);
        let amount = self.integer((k % width) as u128, width)?;
        self.build_rotate(AstKind::BvRor, expr, amount)
    }

    /// `BVROL(expr, amount)` where `amount` is itself a (possibly symbolic)
    /// node. Lowering follows the `SYMBOLIZE_INDEX_ROTATION` mode (§4.3): if
    /// set and `amount` is symbolic, rewrite to `(expr shl m) | (expr lshr
    /// (w - m))`; otherwise concretize `amount` via `eval()` and build a
    /// constant-rotation node.
    pub fn bvrol(&self, expr: Node, amount: Node) -> AstResult<Node> {
        self.build_rotate(AstKind::BvRol, expr, amount)
    }
    /// `BVROR(expr, amount)`; see [`AstContext::bvrol`].
    pub fn bvror(&self, expr: Node, amount: Node) -> AstResult<Node> {
        self.build_rotate(AstKind::BvRor, expr, amount)
    }

    fn build_rotate(&self, kind: AstKind, expr: Node, amount: Node) -> AstResult<Node> {
        let width = expr.size().max(1);
        if amount.is_symbolized()
            && self
                .0
                .borrow()
                .modes()
                .is_mode_enabled(Mode::SymbolizeIndexRotation)
        {
            let w = self.integer(width as u128, width)?;
            let m = self.bvurem(amount, w)?;
            let w_minus_m = self.bvsub(self.integer(width as u128, width)?, m.clone())?;
            return if matches!(kind, AstKind::BvRol) {
                let left = self.bvshl(expr.clone(), m)?;
                let right = self.bvlshr(expr, w_minus_m)?;
                self.bvor(left, right)
            } else {
                let left = self.bvlshr(expr.clone(), m)?;
                let right = self.bvshl(expr, w_minus_m)?;
                self.bvor(left, right)
            };
        }
        let k_value = amount.eval().to_u128_lossy() as u32 % width;
        let amount_node = self.integer(k_value as u128, width)?;
        let children = vec![expr, amount_node];
        if let Some(hit) = self.maybe_simplify(&kind, &children) {
            return Ok(hit);
        }
        Ok(self.new_node(kind, children))
    }

    // ---- comparisons --------------------------------------------------

    pub fn bvsge(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::Bvsge, a, b)
    }
    pub fn bvsgt(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::Bvsgt, a, b)
    }
    pub fn bvsle(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::Bvsle, a, b)
    }
    pub fn bvslt(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::Bvslt, a, b)
    }
    pub fn bvuge(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::Bvuge, a, b)
    }
    pub fn bvugt(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::Bvugt, a, b)
    }
    pub fn bvule(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::Bvule, a, b)
    }
    pub fn bvult(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::Bvult, a, b)
    }

    // ---- logical --------------------------------------------------

    pub fn equal(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::Equal, a, b)
    }
    pub fn distinct(&self, a: Node, b: Node) -> AstResult<Node> {
        self.build_binary(AstKind::Distinct, a, b)
    }
    pub fn iff(&self, a: Node, b: Node) -> AstResult<Node> {
        self.check_logical(&a)?;
        self.check_logical(&b)?;
        self.build_binary(AstKind::Iff, a, b)
    }

    /// Variadic conjunction; `operands` must have at least two entries, each
    /// a 1-bit logical node.
    pub fn land(&self, operands: Vec<Node>) -> AstResult<Node> {
        self.variadic_logical(AstKind::Land, operands)
    }
    /// Variadic disjunction; `operands` must have at least two entries, each
    /// a 1-bit logical node.
    pub fn lor(&self, operands: Vec<Node>) -> AstResult<Node> {
        self.variadic_logical(AstKind::Lor, operands)
    }

    fn variadic_logical(&self, kind: AstKind, operands: Vec<Node>) -> AstResult<Node> {
        if operands.len() < 2 {
            return Err(AstError::OutOfRange {
                detail: "land/lor require at least two operands",
            });
        }
        for operand in &operands {
            self.check_logical(operand)?;
        }
        Ok(self.new_node(kind, operands))
    }

    pub fn lnot(&self, a: Node) -> AstResult<Node> {
        self.check_logical(&a)?;
        self.build_unary(AstKind::Lnot, a)
    }

    /// `ITE(c, t, e)`: `c` must be logical, `t` and `e` must share a width.
    pub fn ite(&self, c: Node, t: Node, e: Node) -> AstResult<Node> {
        self.check_logical(&c)?;
        self.check_same_width(&t, &e)?;
        Ok(self.new_node(AstKind::Ite, vec![c, t, e]))
    }

    /// Variadic concatenation, `operands[0]` the most-significant chunk.
    pub fn concat(&self, operands: Vec<Node>) -> AstResult<Node> {
        if operands.len() < 2 {
            return Err(AstError::OutOfRange {
                detail: "concat requires at least two operands",
            });
        }
        let total: u32 = operands.iter().map(Node::size).sum();
        if total > crate::bitvec::MAX_BITS {
            return Err(AstError::OutOfRange {
                detail: "concat result exceeds the maximum bit-vector width",
            });
        }
        Ok(self.new_node(AstKind::Concat, operands))
    }

    /// `EXTRACT(hi, lo, x)`: requires `0 <= lo <= hi < x.size()`.
    pub fn extract(&self, hi: u32, lo: u32, x: Node) -> AstResult<Node> {
        if !(lo <= hi && hi < x.size()) {
            return Err(AstError::OutOfRange {
                detail: "extract indices must satisfy 0 <= lo <= hi < width",
            });
        }
        let children = vec![x];
        if let Some(hit) = self.maybe_simplify(&AstKind::Extract(hi, lo), &children) {
            return Ok(hit);
        }
        Ok(self.new_node(AstKind::Extract(hi, lo), children))
    }

    /// `SX(k, x)`: sign-extend `x` by `k` additional bits.
    pub fn sx(&self, k: u32, x: Node) -> AstResult<Node> {
        if x.size() + k > crate::bitvec::MAX_BITS {
            return Err(AstError::OutOfRange {
                detail: "sign-extension result exceeds the maximum bit-vector width",
            });
        }
        let children = vec![x];
        if let Some(hit) = self.maybe_simplify(&AstKind::Sx(k), &children) {
            return Ok(hit);
        }
        Ok(self.new_node(AstKind::Sx(k), children))
    }

    /// `ZX(k, x)`: zero-extend `x` by `k` additional bits.
    pub fn zx(&self, k: u32, x: Node) -> AstResult<Node> {
        if x.size() + k > crate::bitvec::MAX_BITS {
            return Err(AstError::OutOfRange {
                detail: "zero-extension result exceeds the maximum bit-vector width",
            });
        }
        let children = vec![x];
        if let Some(hit) = self.maybe_simplify(&AstKind::Zx(k), &children) {
            return Ok(hit);
        }
        Ok(self.new_node(AstKind::Zx(k), children))
    }

    /// `LET(name, bound, body)`.
    pub fn let_(&self, name: impl Into<Rc<str>>, bound: Node, body: Node) -> AstResult<Node> {
        Ok(self.new_node(AstKind::Let(name.into()), vec![bound, body]))
    }

    /// `DECLARE(var)`.
    pub fn declare(&self, var: Node) -> AstResult<Node> {
        if !matches!(&*var.kind(), AstKind::Variable(_)) {
            return Err(AstError::KindMismatch {
                accessor: "declare",
                found: var.kind().name(),
            });
        }
        Ok(self.new_node(AstKind::Declare, vec![var]))
    }

    /// `ASSERT(formula)`.
    pub fn assert_(&self, formula: Node) -> AstResult<Node> {
        if formula.size() != 1 {
            return Err(AstError::OutOfRange {
                detail: "assert requires a 1-bit logical formula",
            });
        }
        Ok(self.new_node(AstKind::Assert, vec![formula]))
    }

    /// `COMPOUND([e1..en])`.
    pub fn compound(&self, exprs: Vec<Node>) -> AstResult<Node> {
        if exprs.is_empty() {
            return Err(AstError::OutOfRange {
                detail: "compound requires at least one expression",
            });
        }
        Ok(self.new_node(AstKind::Compound, exprs))
    }

    // ---- mutation / binding table -----------------------------------

    /// Bind a brand-new variable name to `value` and its `node` (§4.3).
    pub fn init_variable(&self, name: &str, value: BitVec, node: Node) -> AstResult<()> {
        self.0.borrow_mut().variables.init_variable(name, value, node)
    }

    /// Update an existing binding and propagate the change to every
    /// ancestor of its node (§5 ordering guarantee: after this returns,
    /// every `eval()` downstream reflects `value`).
    pub fn update_variable(&self, name: &str, value: BitVec) -> AstResult<()> {
        log::trace!("update_variable({name}, {value})");
        self.0.borrow_mut().variables.set_value(name, value)?;
        let node = self.0.borrow().variables.get_node(name)?;
        node.init();
        Ok(())
    }

    pub fn get_variable_node(&self, name: &str) -> AstResult<Node> {
        self.0.borrow().variables.get_node(name)
    }

    pub fn get_variable_value(&self, name: &str) -> AstResult<BitVec> {
        self.0.borrow().variables.get_value(name)
    }

    // ---- representation / printing -----------------------------------

    pub fn get_representation_mode(&self) -> RepresentationMode {
        self.0.borrow().repr_mode
    }

    pub fn set_representation_mode(&self, mode: RepresentationMode) {
        self.0.borrow_mut().repr_mode = mode;
    }

    /// Render `node` using the context's current representation mode.
    pub fn print(&self, node: &Node) -> String {
        printer::render(self.get_representation_mode(), node)
    }

    /// Render `node` using an explicit representation mode, regardless of
    /// what the context is currently set to.
    pub fn print_as(&self, mode: RepresentationMode, node: &Node) -> String {
        printer::render(mode, node)
    }
}
