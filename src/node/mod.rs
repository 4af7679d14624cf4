//! The shared, mutable expression DAG (§3 `Node`, §4.2, §4.8).
//!
//! A [`Node`] is a cheap-to-clone handle — `Rc<RefCell<NodeData>>` under a
//! newtype, since Rust's orphan rules forbid inherent `impl` blocks directly
//! on a type alias for a foreign `Rc<RefCell<_>>` — around the mutable cell
//! that actually holds a node's kind, children, and cached facts. Parents
//! are held as [`Weak`] back-references (§3 "Parent links never count
//! toward keeping a node alive"); on drop, a node removes itself from each
//! child's parent set, giving the exact ownership model §3/§9 describe for
//! the reference implementation's `shared_ptr`/`weak_ptr` pair.

mod hash;
mod kind;

pub use kind::AstKind;

use crate::bitvec::BitVec;
use crate::context::ContextState;
use crate::eval::evaluate;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

pub(crate) type ContextHandle = Weak<RefCell<ContextState>>;

/// The mutable guts of a node: everything in §3's `Node` entity except the
/// `Rc`/`Weak` plumbing, which lives on the [`Node`]/[`WeakNode`] handles.
pub struct NodeData {
    kind: AstKind,
    children: Vec<Node>,
    size: u32,
    eval: BitVec,
    symbolized: bool,
    logical: bool,
    hash: u64,
    parents: Vec<WeakNode>,
    context: ContextHandle,
    self_weak: WeakNode,
}

/// A shared handle to a node in the expression DAG.
///
/// Cloning a `Node` clones the `Rc`, not the node: two clones refer to the
/// same mutable cell, which is exactly what lets `set_child`/
/// `update_variable` propagate to every observer holding a handle.
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

/// A non-owning back-reference to a [`Node`], as held in `parents` (§3, §9).
#[derive(Clone)]
pub struct WeakNode(Weak<RefCell<NodeData>>);

impl WeakNode {
    /// Upgrade to a strong handle, if the node is still alive.
    pub fn upgrade(&self) -> Option<Node> {
        self.0.upgrade().map(Node)
    }

    fn ptr_eq(&self, other: &WeakNode) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl Drop for NodeData {
    fn drop(&mut self) {
        for child in &self.children {
            let mut child_data = child.0.borrow_mut();
            child_data.parents.retain(|p| !p.ptr_eq(&self.self_weak_handle()));
        }
    }
}

impl NodeData {
    fn self_weak_handle(&self) -> WeakNode {
        self.self_weak.clone()
    }
}

impl Node {
    /// Construct a brand-new node from a kind and its children, tied to
    /// `context` (used by `VARIABLE`/`REFERENCE` leaves to read the binding
    /// table / expression store during `init()`), and run `init()` on it.
    ///
    /// This is the only place a `Node` is ever created; `AstContext`'s build
    /// methods call it after validating widths and checking for a
    /// simplification hit (§4.3 step 3), and `duplicate` calls it directly
    /// to avoid re-simplifying a structural copy.
    pub(crate) fn new_raw(kind: AstKind, children: Vec<Node>, context: ContextHandle) -> Node {
        let node = Rc::new_cyclic(|weak_self| {
            RefCell::new(NodeData {
                kind,
                children,
                size: 0,
                eval: BitVec::zero(1),
                symbolized: false,
                logical: false,
                hash: 0,
                parents: Vec::new(),
                context,
                self_weak: WeakNode(weak_self.clone()),
            })
        });
        let node = Node(node);
        node.init();
        node
    }

    /// Re-derive every cached fact from the current children and binding
    /// table (§4.2 `init()` contract). Idempotent; registers `self` with
    /// each child's parent set exactly once, then recurses into every
    /// parent so a mutation propagates all the way to the roots.
    pub fn init(&self) {
        let (size, symbolized, logical) = {
            let data = self.0.borrow();
            (
                crate::eval::size_for_kind(&data.kind, &data.children, &data.context),
                matches!(data.kind, AstKind::Variable(_))
                    || data.children.iter().any(Node::is_symbolized),
                data.kind.is_logical(),
            )
        };
        let hash = hash::hash_node(self);
        let eval = {
            let data = self.0.borrow();
            evaluate(&data.kind, &data.children, &data.context, size)
        };

        {
            let mut data = self.0.borrow_mut();
            data.size = size;
            data.symbolized = symbolized;
            data.logical = logical;
            data.hash = hash;
            data.eval = eval;
        }

        let self_weak = self.downgrade();
        let children: Vec<Node> = self.0.borrow().children.clone();
        for child in &children {
            let mut child_data = child.0.borrow_mut();
            if !child_data.parents.iter().any(|p| p.ptr_eq(&self_weak)) {
                child_data.parents.push(self_weak.clone());
            }
        }

        let parents: Vec<Node> = self
            .0
            .borrow()
            .parents
            .iter()
            .filter_map(WeakNode::upgrade)
            .collect();
        for parent in parents {
            parent.init();
        }
    }

    /// Replace child `i` with `new`, deregister from the old child's parent
    /// set, and re-run `init()` (§4.2 `set_child`).
    ///
    /// # Panics
    /// Panics if `i` is out of bounds for this node's arity.
    pub fn set_child(&self, i: usize, new: Node) {
        log::trace!("set_child({i}) on a {} node", self.kind().name());
        let old = {
            let mut data = self.0.borrow_mut();
            let old = data.children[i].clone();
            data.children[i] = new;
            old
        };
        let self_weak = self.downgrade();
        let mut old_data = old.0.borrow_mut();
        old_data.parents.retain(|p| !p.ptr_eq(&self_weak));
        drop(old_data);
        self.init();
    }

    /// A weak, non-owning handle to this node.
    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Rc::downgrade(&self.0))
    }

    /// This node's kind.
    pub fn kind(&self) -> Ref<'_, AstKind> {
        Ref::map(self.0.borrow(), |d| &d.kind)
    }

    /// This node's children, in order.
    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    /// The current parent set, upgraded to strong handles (dead parents are
    /// silently dropped from the view, not from storage — they're pruned
    /// lazily the next time `init()` walks this list).
    pub fn parents(&self) -> Vec<Node> {
        self.0
            .borrow()
            .parents
            .iter()
            .filter_map(WeakNode::upgrade)
            .collect()
    }

    /// This node's bit-vector width (0 only for the top-level `COMPOUND`
    /// sequence construct, which has no width of its own).
    pub fn size(&self) -> u32 {
        self.0.borrow().size
    }

    /// `(1 << size) - 1`, or all-ones for `size == 512`.
    pub fn mask(&self) -> BitVec {
        BitVec::all_ones(self.size().max(1))
    }

    /// The cached concrete evaluation of this node under the context's
    /// current variable bindings (§4.5; this is *evaluation under the
    /// current binding*, not "this subtree is ground" — see DESIGN.md open
    /// question 1).
    pub fn eval(&self) -> BitVec {
        self.0.borrow().eval
    }

    /// `true` iff this subtree transitively contains a `VARIABLE` node.
    pub fn is_symbolized(&self) -> bool {
        self.0.borrow().symbolized
    }

    /// `true` iff this node's result is a 1-bit Boolean.
    pub fn is_logical(&self) -> bool {
        self.0.borrow().logical
    }

    /// `true` iff this kind interprets its operand(s) as two's-complement
    /// signed values (§6 `is_signed`).
    pub fn is_signed(&self) -> bool {
        self.0.borrow().kind.is_signed()
    }

    /// The literal value of an `INTEGER`/`BV` node.
    pub fn get_integer(&self) -> crate::error::AstResult<BitVec> {
        match &*self.kind() {
            AstKind::Integer(bv) | AstKind::Bv(bv) => Ok(*bv),
            other => Err(crate::error::AstError::KindMismatch {
                accessor: "get_integer",
                found: other.name(),
            }),
        }
    }

    /// The literal contents of a `STRING` node.
    pub fn get_string(&self) -> crate::error::AstResult<Rc<str>> {
        match &*self.kind() {
            AstKind::Str(s) => Ok(s.clone()),
            other => Err(crate::error::AstError::KindMismatch {
                accessor: "get_string",
                found: other.name(),
            }),
        }
    }

    /// The bound `(root, tainted)` pair of a `REFERENCE` node, resolved
    /// through the owning context's expression store.
    pub fn get_symbolic_expression(&self) -> crate::error::AstResult<(Node, bool)> {
        let id = match &*self.kind() {
            AstKind::Reference(id) => *id,
            other => {
                return Err(crate::error::AstError::KindMismatch {
                    accessor: "get_symbolic_expression",
                    found: other.name(),
                })
            }
        };
        self.context()
            .upgrade()
            .and_then(|cx| cx.borrow().store().lookup(id))
            .ok_or(crate::error::AstError::UnknownVariable {
                name: id.to_string(),
            })
    }

    /// The `SymbolicVariable` record of a `VARIABLE` node.
    pub fn get_symbolic_variable(&self) -> crate::error::AstResult<crate::variable::SharedVariable> {
        match &*self.kind() {
            AstKind::Variable(sv) => Ok(sv.clone()),
            other => Err(crate::error::AstError::KindMismatch {
                accessor: "get_symbolic_variable",
                found: other.name(),
            }),
        }
    }

    /// This node's structural hash (§4.2: commutative-aware, computed over
    /// kind and children's hashes).
    pub fn hash(&self) -> u64 {
        self.0.borrow().hash
    }

    /// Structural equality: same kind (and scalar payload), same children,
    /// recursively. Hash mismatches short-circuit the comparison (§4.2).
    pub fn equal_to(&self, other: &Node) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.hash() != other.hash() {
            return false;
        }
        if !AstKind::kind_payload_eq(&self.kind(), &other.kind()) {
            return false;
        }
        let a = self.children();
        let b = other.children();
        a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equal_to(y))
    }

    /// Identity equality: do these two handles refer to the very same node?
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// A stable, process-local identity for use as a visited-set key during
    /// traversal (`collect`/`unroll`); *not* meaningful across processes or
    /// after the node is dropped and its address reused.
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub(crate) fn context(&self) -> ContextHandle {
        self.0.borrow().context.clone()
    }

    pub(crate) fn new_with_context(
        kind: AstKind,
        children: Vec<Node>,
        context: ContextHandle,
    ) -> Node {
        Node::new_raw(kind, children, context)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind().name())
            .field("size", &self.size())
            .field("symbolized", &self.is_symbolized())
            .finish()
    }
}
