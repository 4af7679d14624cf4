//! Prefix S-expression ("SMT-LIB-like") pretty-printer (§4.7).

use super::Printer;
use crate::node::{AstKind, Node};
use std::fmt;

pub(super) struct SmtlibPrinter;

impl Printer for SmtlibPrinter {
    fn print(&self, out: &mut dyn fmt::Write, node: &Node) -> fmt::Result {
        write_node(out, node)
    }
}

fn write_node(out: &mut dyn fmt::Write, node: &Node) -> fmt::Result {
    let kind = node.kind();
    match &*kind {
        AstKind::Integer(bv) => write!(out, "{bv}"),
        AstKind::Bv(bv) => write!(out, "(_ bv{bv} {})", bv.width()),
        AstKind::Str(s) => write!(out, "\"{s}\""),
        AstKind::Variable(sv) => write!(out, "{}", sv.name()),
        AstKind::Reference(id) => write!(out, "(_ ref {id})"),

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
        | AstKind::Bvsge
        | AstKind::Bvsgt
        | AstKind::Bvsle
        | AstKind::Bvslt
        | AstKind::Bvuge
        | AstKind::Bvugt
        | AstKind::Bvule
        | AstKind::Bvult => {
            let children = node.children();
            drop(kind);
            write!(out, "({} ", node_head(node))?;
            write_node(out, &children[0])?;
            write!(out, " ")?;
            write_node(out, &children[1])?;
            write!(out, ")")
        }

        AstKind::BvNeg | AstKind::BvNot | AstKind::Lnot => {
            let children = node.children();
            drop(kind);
            write!(out, "({} ", node_head(node))?;
            write_node(out, &children[0])?;
            write!(out, ")")
        }

        AstKind::BvRol | AstKind::BvRor => {
            let children = node.children();
            let op = match &*node.kind() {
                AstKind::BvRol => "rotate_left",
                _ => "rotate_right",
            };
            let k = children[1].eval();
            drop(kind);
            write!(out, "((_ {op} {k}) ")?;
            write_node(out, &children[0])?;
            write!(out, ")")
        }

        AstKind::Equal | AstKind::Iff => {
            let children = node.children();
            drop(kind);
            write!(out, "(= ")?;
            write_node(out, &children[0])?;
            write!(out, " ")?;
            write_node(out, &children[1])?;
            write!(out, ")")
        }
        AstKind::Distinct => {
            let children = node.children();
            drop(kind);
            write!(out, "(distinct ")?;
            write_node(out, &children[0])?;
            write!(out, " ")?;
            write_node(out, &children[1])?;
            write!(out, ")")
        }

        AstKind::Land | AstKind::Lor | AstKind::Concat => {
            let children = node.children();
            let head = node_head(node);
            drop(kind);
            write!(out, "({head}")?;
            for c in &children {
                write!(out, " ")?;
                write_node(out, c)?;
            }
            write!(out, ")")
        }

        AstKind::Ite => {
            let children = node.children();
            drop(kind);
            write!(out, "(ite ")?;
            write_node(out, &children[0])?;
            write!(out, " ")?;
            write_node(out, &children[1])?;
            write!(out, " ")?;
            write_node(out, &children[2])?;
            write!(out, ")")
        }

        AstKind::Extract(hi, lo) => {
            let (hi, lo) = (*hi, *lo);
            let children = node.children();
            drop(kind);
            write!(out, "((_ extract {hi} {lo}) ")?;
            write_node(out, &children[0])?;
            write!(out, ")")
        }
        AstKind::Sx(k) => {
            let k = *k;
            let children = node.children();
            drop(kind);
            write!(out, "((_ sign_extend {k}) ")?;
            write_node(out, &children[0])?;
            write!(out, ")")
        }
        AstKind::Zx(k) => {
            let k = *k;
            let children = node.children();
            drop(kind);
            write!(out, "((_ zero_extend {k}) ")?;
            write_node(out, &children[0])?;
            write!(out, ")")
        }

        AstKind::Let(name) => {
            let name = name.clone();
            let children = node.children();
            drop(kind);
            write!(out, "(let (({name} ")?;
            write_node(out, &children[0])?;
            write!(out, ")) ")?;
            write_node(out, &children[1])?;
            write!(out, ")")
        }

        AstKind::Declare => {
            let children = node.children();
            drop(kind);
            if let AstKind::Variable(sv) = &*children[0].kind() {
                write!(out, "(declare-fun {} () (_ BitVec {}))", sv.name(), sv.size())
            } else {
                write!(out, "(declare ")?;
                write_node(out, &children[0])?;
                write!(out, ")")
            }
        }
        AstKind::Assert => {
            let children = node.children();
            drop(kind);
            write!(out, "(assert ")?;
            write_node(out, &children[0])?;
            write!(out, ")")
        }
        AstKind::Compound => {
            let children = node.children();
            drop(kind);
            for (i, c) in children.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                write_node(out, c)?;
            }
            Ok(())
        }
    }
}

fn node_head(node: &Node) -> &'static str {
    match &*node.kind() {
        AstKind::Equal => "=",
        other => other.name(),
    }
}
