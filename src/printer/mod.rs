//! Pluggable pretty-printing (§4.7): a representation mode selects which
//! surface syntax `AstContext::print` renders through. New modes are added
//! by implementing [`Printer`] and extending [`RepresentationMode`], mirroring
//! how `cranelift-codegen`'s `DataFlowGraph` keeps its textual form and its
//! IR decoupled behind a small trait rather than a `Display` impl baked into
//! the node type itself.

mod infix;
mod smtlib;

#[cfg(test)]
pub(crate) mod smtlib_parse;

use crate::node::Node;
use std::fmt;

/// Which surface syntax `AstContext::print` renders through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RepresentationMode {
    /// Prefix S-expressions, SMT-LIB 2 flavored (§4.7).
    #[default]
    Smtlib,
    /// Infix, language-neutral imperative syntax with explicit masking.
    Infix,
}

/// A pluggable pretty-printer for a single representation mode.
pub trait Printer {
    /// Render `node` (and its whole subtree) into `out`.
    fn print(&self, out: &mut dyn fmt::Write, node: &Node) -> fmt::Result;
}

/// Render `node` under `mode`, returning the formatted text.
pub fn render(mode: RepresentationMode, node: &Node) -> String {
    let mut out = String::new();
    let printer: &dyn Printer = match mode {
        RepresentationMode::Smtlib => &smtlib::SmtlibPrinter,
        RepresentationMode::Infix => &infix::InfixPrinter,
    };
    printer
        .print(&mut out, node)
        .expect("formatting into a String never fails");
    out
}
