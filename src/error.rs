//! The single domain-error channel (§7). No exceptions for control flow: every
//! fallible `AstContext`/`Node` operation returns a `Result<_, AstError>`.

use std::fmt;

/// Everything that can go wrong while building, mutating or querying the AST.
///
/// Construction is all-or-nothing: none of these are ever raised after a node
/// has been partially linked into the DAG, so a failed build call leaves the
/// context exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AstError {
    /// A binary bit-vector operator was given operands of differing widths.
    WidthMismatch {
        /// Width of the left-hand operand.
        lhs: u32,
        /// Width of the right-hand operand.
        rhs: u32,
    },
    /// An `EXTRACT` index pair, or a normalized rotation amount, falls
    /// outside the operand's width.
    OutOfRange {
        /// Human-readable description of which bound was violated.
        detail: &'static str,
    },
    /// `get_variable_value`/`get_variable_node` was called with a name that
    /// has no binding, or `reference` named an unknown expression id.
    UnknownVariable {
        /// The name or expression id that could not be resolved.
        name: String,
    },
    /// `init_variable` was called for a name that is already bound.
    DuplicateVariable {
        /// The name that was already present.
        name: String,
    },
    /// `get_integer`/`get_string`/`get_symbolic_expression`/
    /// `get_symbolic_variable` was called on a node whose kind does not
    /// carry that payload.
    KindMismatch {
        /// The accessor that was called.
        accessor: &'static str,
        /// The kind that was actually found.
        found: &'static str,
    },
    /// Node construction could not proceed (e.g. allocation exhaustion).
    /// Fatal to the current build call; prior state is left intact.
    AllocationFailure,
}

impl fmt::Display for AstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstError::WidthMismatch { lhs, rhs } => {
                write!(f, "width mismatch: {lhs} bits vs {rhs} bits")
            }
            AstError::OutOfRange { detail } => write!(f, "out of range: {detail}"),
            AstError::UnknownVariable { name } => write!(f, "unknown variable or reference: {name}"),
            AstError::DuplicateVariable { name } => {
                write!(f, "variable already bound: {name}")
            }
            AstError::KindMismatch { accessor, found } => {
                write!(f, "`{accessor}` called on a {found} node")
            }
            AstError::AllocationFailure => write!(f, "node allocation failed"),
        }
    }
}

impl std::error::Error for AstError {}

/// Convenience alias used throughout the builder surface.
pub type AstResult<T> = Result<T, AstError>;
