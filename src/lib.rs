//! A hash-consed-or-structurally-typed DAG of bit-vector and Boolean
//! expression nodes: the builder/evaluator core of a dynamic symbolic
//! execution engine, extracted to stand on its own behind narrow
//! capability traits (`Modes`, `ExpressionStore`) that the rest of such a
//! system — mode storage, the symbolic-expression log, the SMT back end —
//! plugs in from the outside.
//!
//! Start at [`context::AstContext`]: it is the sole constructor of
//! [`node::Node`]s, owns the variable binding table, and exposes one build
//! method per node kind. Everything else in this crate exists to serve
//! that type: [`bitvec::BitVec`] is the concrete value every node caches,
//! [`eval`] and [`simplify`] are pure functions it consults, and
//! [`traverse`]/[`printer`] operate on the DAG it produces.
//!
//! ```
//! use ast_engine::context::AstContext;
//! use ast_engine::modes::FlagModes;
//!
//! let ctx = AstContext::new(FlagModes::all());
//! let x = ctx.variable_named("x", 8).unwrap();
//! let one = ctx.bv(1, 8).unwrap();
//! let expr = ctx.bvadd(x.clone(), one).unwrap();
//! ctx.update_variable("x", ast_engine::bitvec::BitVec::from_u64(41, 8)).unwrap();
//! assert_eq!(expr.eval().to_u128_lossy(), 42);
//! println!("{}", ctx.print(&expr));
//! ```

pub mod bitvec;
pub mod context;
pub mod error;
mod eval;
pub mod expr_store;
mod fx;
pub mod modes;
pub mod node;
pub mod printer;
mod simplify;
pub mod traverse;
pub mod variable;

pub use bitvec::BitVec;
pub use context::AstContext;
pub use error::{AstError, AstResult};
pub use modes::{FlagModes, Mode, Modes};
pub use node::{AstKind, Node};
pub use variable::{SharedVariable, SymbolicVariable, VariableTable};
