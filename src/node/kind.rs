//! `AstKind` — the tagged variant describing every node kind (§3 kind
//! table). Dispatch on `kind` is centralized in `eval`, the pretty-printers,
//! and `simplify`, following the "single record with a uniform children +
//! payload shape" guidance in §9 rather than a class hierarchy with a
//! virtual `init`; the enum shape itself is grounded on the tagged-payload
//! style of `cranelift-codegen/src/ir/instructions.rs::InstructionData` (and
//! the rejected egraph-node alternative discussed in SPEC_FULL.md §3).

use crate::bitvec::BitVec;
use crate::expr_store::ExprId;
use crate::variable::SharedVariable;
use std::rc::Rc;

/// Every node kind the AST engine can build (§3).
///
/// Children that are themselves `Node`s live in `NodeData::children`, not
/// here; a few kinds additionally carry small scalar payload that is *not*
/// a DAG edge (`EXTRACT`'s indices, `SX`/`ZX`'s extension width, `LET`'s
/// alias name) — grounded on `astContext.cpp`'s `ExtractNode(high, low,
/// expr)` / `SxNode(sizeExt, expr)`, which store those as plain fields
/// rather than as child nodes. `BVROL`/`BVROR`'s shift amount, by contrast,
/// *is* a second child (an `INTEGER` node), matching
/// `astContext.cpp::bvrol(expr, rot)` constructing `BvrolNode(expr,
/// this->integer(rot))`.
#[derive(Clone, Debug)]
pub enum AstKind {
    /// A polymorphic literal: not yet tied to a bit-vector width (§3 table:
    /// "untyped width"). Used for scalars that aren't themselves bit-vector
    /// operands, e.g. a rotate count or an extend width.
    Integer(BitVec),
    /// `BV(value, w)`: a concrete bit-vector literal.
    Bv(BitVec),
    /// `STRING(s)`.
    Str(Rc<str>),
    /// `VARIABLE(sv)`.
    Variable(SharedVariable),
    /// `REFERENCE(expr_id)`.
    Reference(ExprId),

    BvAdd,
    BvSub,
    BvMul,
    BvAnd,
    BvOr,
    BvXor,
    BvNand,
    BvNor,
    BvXnor,
    BvShl,
    BvLshr,
    BvAshr,
    BvSdiv,
    BvUdiv,
    BvSmod,
    BvSrem,
    BvUrem,

    BvNeg,
    BvNot,

    /// `BVROL(expr, k)` — `k` is the second child, an `Integer` node.
    BvRol,
    /// `BVROR(expr, k)` — `k` is the second child, an `Integer` node.
    BvRor,

    Bvsge,
    Bvsgt,
    Bvsle,
    Bvslt,
    Bvuge,
    Bvugt,
    Bvule,
    Bvult,

    Equal,
    Distinct,
    Iff,

    Land,
    Lor,
    Lnot,

    Ite,
    Concat,

    /// `EXTRACT(hi, lo, x)` — `hi`/`lo` are scalar payload, not children.
    Extract(u32, u32),
    /// `SX(k, x)` — `k` is scalar payload, not a child.
    Sx(u32),
    /// `ZX(k, x)` — `k` is scalar payload, not a child.
    Zx(u32),

    /// `LET(name, bound, body)` — `name` is the alias the body may refer to
    /// via a separate lookup mechanism external to the two real children
    /// (`bound`, `body`); this engine evaluates `LET` by simply evaluating
    /// `body` (§4.5), matching `astContext.cpp`'s runtime LetNode semantics.
    Let(Rc<str>),

    Declare,
    Assert,
    Compound,
}

impl AstKind {
    /// A short, stable name for error messages and the S-expression
    /// pretty-printer's head symbol.
    pub fn name(&self) -> &'static str {
        match self {
            AstKind::Integer(_) => "integer",
            AstKind::Bv(_) => "bv",
            AstKind::Str(_) => "string",
            AstKind::Variable(_) => "variable",
            AstKind::Reference(_) => "reference",
            AstKind::BvAdd => "bvadd",
            AstKind::BvSub => "bvsub",
            AstKind::BvMul => "bvmul",
            AstKind::BvAnd => "bvand",
            AstKind::BvOr => "bvor",
            AstKind::BvXor => "bvxor",
            AstKind::BvNand => "bvnand",
            AstKind::BvNor => "bvnor",
            AstKind::BvXnor => "bvxnor",
            AstKind::BvShl => "bvshl",
            AstKind::BvLshr => "bvlshr",
            AstKind::BvAshr => "bvashr",
            AstKind::BvSdiv => "bvsdiv",
            AstKind::BvUdiv => "bvudiv",
            AstKind::BvSmod => "bvsmod",
            AstKind::BvSrem => "bvsrem",
            AstKind::BvUrem => "bvurem",
            AstKind::BvNeg => "bvneg",
            AstKind::BvNot => "bvnot",
            AstKind::BvRol => "bvrol",
            AstKind::BvRor => "bvror",
            AstKind::Bvsge => "bvsge",
            AstKind::Bvsgt => "bvsgt",
            AstKind::Bvsle => "bvsle",
            AstKind::Bvslt => "bvslt",
            AstKind::Bvuge => "bvuge",
            AstKind::Bvugt => "bvugt",
            AstKind::Bvule => "bvule",
            AstKind::Bvult => "bvult",
            AstKind::Equal => "equal",
            AstKind::Distinct => "distinct",
            AstKind::Iff => "iff",
            AstKind::Land => "land",
            AstKind::Lor => "lor",
            AstKind::Lnot => "lnot",
            AstKind::Ite => "ite",
            AstKind::Concat => "concat",
            AstKind::Extract(..) => "extract",
            AstKind::Sx(_) => "sx",
            AstKind::Zx(_) => "zx",
            AstKind::Let(_) => "let",
            AstKind::Declare => "declare",
            AstKind::Assert => "assert",
            AstKind::Compound => "compound",
        }
    }

    /// Structural equality of the scalar payload carried by two kinds of
    /// the same or different variant, ignoring children entirely — used by
    /// `Node::equal_to` after the hash and variant checks have already
    /// passed. Kinds with no payload compare equal as soon as their
    /// discriminants match.
    pub(crate) fn kind_payload_eq(a: &AstKind, b: &AstKind) -> bool {
        match (a, b) {
            (AstKind::Integer(x), AstKind::Integer(y)) => x == y,
            (AstKind::Bv(x), AstKind::Bv(y)) => x == y,
            (AstKind::Str(x), AstKind::Str(y)) => x == y,
            (AstKind::Variable(x), AstKind::Variable(y)) => {
                Rc::ptr_eq(x, y) || x.name() == y.name()
            }
            (AstKind::Reference(x), AstKind::Reference(y)) => x == y,
            (AstKind::Extract(hx, lx), AstKind::Extract(hy, ly)) => hx == hy && lx == ly,
            (AstKind::Sx(x), AstKind::Sx(y)) => x == y,
            (AstKind::Zx(x), AstKind::Zx(y)) => x == y,
            (AstKind::Let(x), AstKind::Let(y)) => x == y,
            _ => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }

    /// Whether this kind produces a 1-bit Boolean result (§3: "logical").
    pub fn is_logical(&self) -> bool {
        matches!(
            self,
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
                | AstKind::Assert
        )
    }

    /// Whether this kind is a binary bit-vector arithmetic/bitwise operator
    /// whose two children must share a width, and whose result has that
    /// same width (§3 table, §8 property 1).
    pub fn is_binary_bv_op(&self) -> bool {
        matches!(
            self,
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
        )
    }

    /// Whether this kind is one of the eight signed/unsigned comparisons
    /// (binary, same-width operands, 1-bit logical result).
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            AstKind::Bvsge
                | AstKind::Bvsgt
                | AstKind::Bvsle
                | AstKind::Bvslt
                | AstKind::Bvuge
                | AstKind::Bvugt
                | AstKind::Bvule
                | AstKind::Bvult
        )
    }

    /// Whether this kind interprets its operands' most-significant bit as a
    /// two's-complement sign (§6 `is_signed` on the Node surface).
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            AstKind::Bvsge
                | AstKind::Bvsgt
                | AstKind::Bvsle
                | AstKind::Bvslt
                | AstKind::BvSdiv
                | AstKind::BvSrem
                | AstKind::BvSmod
                | AstKind::BvAshr
        )
    }
}
