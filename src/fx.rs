//! Fast, non-cryptographic hashing for internal maps and sets.
//!
//! Mirrors `cranelift-codegen`'s `fx` module: everywhere this crate needs a
//! `HashMap`/`HashSet` keyed by node identity, variable name, or expression
//! id, it reaches for `rustc_hash::FxHasher` instead of the default SipHash
//! (which is overkill for keys we fully control).

pub use rustc_hash::{FxHashMap, FxHashSet};
