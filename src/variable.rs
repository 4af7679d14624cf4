//! Symbolic variables and the binding table that ties each one to its
//! current concrete value (§4.4, §6 — the `name, size` record consumed by
//! `VARIABLE` nodes lives outside this crate in the real system; this module
//! provides a minimal, self-contained record good enough for the core's own
//! tests and for small embedders).

use crate::bitvec::BitVec;
use crate::error::{AstError, AstResult};
use crate::fx::FxHashMap;
use crate::node::Node;
use std::rc::Rc;

/// A symbolic variable: a stable name and a fixed bit-width. Two `VARIABLE`
/// nodes referring to the same name are, by construction (§3 invariant),
/// the same `Node` — the identity lives in the binding table, not here.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SymbolicVariable {
    name: String,
    size: u32,
}

impl SymbolicVariable {
    /// Create a new symbolic variable record.
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        SymbolicVariable {
            name: name.into(),
            size,
        }
    }

    /// The variable's name, used as the binding-table key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The variable's declared bit-width.
    pub fn size(&self) -> u32 {
        self.size
    }
}

/// The side table mapping a variable name to its `VARIABLE` node and current
/// concrete value (§4.4). Names are unique; the `AstContext` is the sole
/// owner and mutator.
#[derive(Default)]
pub struct VariableTable {
    entries: FxHashMap<String, (Node, BitVec)>,
}

impl VariableTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a brand-new binding. Fails with `DuplicateVariable` if `name`
    /// is already present (§4.3 `init_variable`).
    pub fn init_variable(&mut self, name: &str, value: BitVec, node: Node) -> AstResult<()> {
        if self.entries.contains_key(name) {
            return Err(AstError::DuplicateVariable {
                name: name.to_string(),
            });
        }
        self.entries.insert(name.to_string(), (node, value));
        Ok(())
    }

    /// Update an existing binding's concrete value. Does *not* call
    /// `node.init()` itself — the `AstContext` does that immediately after,
    /// so the propagation to ancestors happens under the context's
    /// single-threaded discipline (§5 ordering guarantee).
    pub fn set_value(&mut self, name: &str, value: BitVec) -> AstResult<()> {
        match self.entries.get_mut(name) {
            Some(entry) => {
                entry.1 = value;
                Ok(())
            }
            None => Err(AstError::UnknownVariable {
                name: name.to_string(),
            }),
        }
    }

    /// The `VARIABLE` node bound to `name`, if any.
    pub fn get_node(&self, name: &str) -> AstResult<Node> {
        self.entries
            .get(name)
            .map(|(node, _)| node.clone())
            .ok_or_else(|| AstError::UnknownVariable {
                name: name.to_string(),
            })
    }

    /// The current concrete value bound to `name`, if any.
    pub fn get_value(&self, name: &str) -> AstResult<BitVec> {
        self.entries
            .get(name)
            .map(|(_, value)| *value)
            .ok_or_else(|| AstError::UnknownVariable {
                name: name.to_string(),
            })
    }

    /// Whether `name` already has a binding.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

/// Convenience: a reference-counted [`SymbolicVariable`], matching the
/// `Rc<Node>`-style sharing used throughout this crate.
pub type SharedVariable = Rc<SymbolicVariable>;
