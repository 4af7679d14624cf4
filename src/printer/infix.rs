//! Infix, language-neutral imperative pretty-printer (§4.7): explicit width
//! annotations and `& mask` suffixes so the rendered text enforces the same
//! modular semantics the `BitVec` itself does, without relying on the
//! reader's language having wrapping fixed-width integers.

use super::Printer;
use crate::node::{AstKind, Node};
use std::fmt;

pub(super) struct InfixPrinter;

impl Printer for InfixPrinter {
    fn print(&self, out: &mut dyn fmt::Write, node: &Node) -> fmt::Result {
        write_node(out, node)
    }
}

fn write_masked(out: &mut dyn fmt::Write, node: &Node, inner: impl FnOnce(&mut dyn fmt::Write) -> fmt::Result) -> fmt::Result {
    write!(out, "(")?;
    inner(out)?;
    write!(out, ") & 0x{:x}", node.mask())
}

fn write_node(out: &mut dyn fmt::Write, node: &Node) -> fmt::Result {
    let kind = node.kind();
    match &*kind {
        AstKind::Integer(bv) => write!(out, "{bv}"),
        AstKind::Bv(bv) => write!(out, "0x{bv:x}u{}", bv.width()),
        AstKind::Str(s) => write!(out, "\"{s}\""),
        AstKind::Variable(sv) => write!(out, "{}", sv.name()),
        AstKind::Reference(id) => write!(out, "ref{id}"),

        AstKind::BvAdd => binary(out, node, "+", true),
        AstKind::BvSub => binary(out, node, "-", true),
        AstKind::BvMul => binary(out, node, "*", true),
        AstKind::BvAnd => binary(out, node, "&", false),
        AstKind::BvOr => binary(out, node, "|", false),
        AstKind::BvXor => binary(out, node, "^", false),
        AstKind::BvShl => binary(out, node, "<<", true),
        AstKind::BvLshr | AstKind::BvAshr => binary(out, node, ">>", false),
        AstKind::BvUdiv | AstKind::BvSdiv => binary(out, node, "/", false),
        AstKind::BvUrem | AstKind::BvSrem | AstKind::BvSmod => binary(out, node, "%", false),

        AstKind::BvNand => {
            let children = node.children();
            drop(kind);
            write_masked(out, node, |out| {
                write!(out, "~(")?;
                write_node(out, &children[0])?;
                write!(out, " & ")?;
                write_node(out, &children[1])?;
                write!(out, ")")
            })
        }
        AstKind::BvNor => {
            let children = node.children();
            drop(kind);
            write_masked(out, node, |out| {
                write!(out, "~(")?;
                write_node(out, &children[0])?;
                write!(out, " | ")?;
                write_node(out, &children[1])?;
                write!(out, ")")
            })
        }
        AstKind::BvXnor => {
            let children = node.children();
            drop(kind);
            write_masked(out, node, |out| {
                write!(out, "~(")?;
                write_node(out, &children[0])?;
                write!(out, " ^ ")?;
                write_node(out, &children[1])?;
                write!(out, ")")
            })
        }

        AstKind::BvNeg => {
            let children = node.children();
            drop(kind);
            write_masked(out, node, |out| {
                write!(out, "-")?;
                write_node(out, &children[0])
            })
        }
        AstKind::BvNot => {
            let children = node.children();
            drop(kind);
            write_masked(out, node, |out| {
                write!(out, "~")?;
                write_node(out, &children[0])
            })
        }

        AstKind::BvRol | AstKind::BvRor => {
            let name = if matches!(&*kind, AstKind::BvRol) { "rol" } else { "ror" };
            let children = node.children();
            let k = children[1].eval();
            drop(kind);
            write!(out, "{name}(")?;
            write_node(out, &children[0])?;
            write!(out, ", {k})")
        }

        AstKind::Bvsge => binary(out, node, ">=", false),
        AstKind::Bvsgt => binary(out, node, ">", false),
        AstKind::Bvsle => binary(out, node, "<=", false),
        AstKind::Bvslt => binary(out, node, "<", false),
        AstKind::Bvuge => binary(out, node, ">=", false),
        AstKind::Bvugt => binary(out, node, ">", false),
        AstKind::Bvule => binary(out, node, "<=", false),
        AstKind::Bvult => binary(out, node, "<", false),

        AstKind::Equal => binary(out, node, "==", false),
        AstKind::Distinct => binary(out, node, "!=", false),
        AstKind::Iff => binary(out, node, "==", false),

        AstKind::Land => variadic(out, node, "&&"),
        AstKind::Lor => variadic(out, node, "||"),
        AstKind::Lnot => {
            let children = node.children();
            drop(kind);
            write!(out, "!")?;
            write_node(out, &children[0])
        }

        AstKind::Ite => {
            let children = node.children();
            drop(kind);
            write!(out, "(")?;
            write_node(out, &children[0])?;
            write!(out, " ? ")?;
            write_node(out, &children[1])?;
            write!(out, " : ")?;
            write_node(out, &children[2])?;
            write!(out, ")")
        }

        AstKind::Concat => {
            let children = node.children();
            drop(kind);
            write!(out, "concat(")?;
            for (i, c) in children.iter().enumerate() {
                if i > 0 {
                    write!(out, ", ")?;
                }
                write_node(out, c)?;
            }
            write!(out, ")")
        }

        AstKind::Extract(hi, lo) => {
            let (hi, lo) = (*hi, *lo);
            let children = node.children();
            drop(kind);
            write!(out, "(")?;
            write_node(out, &children[0])?;
            write!(out, "[{hi}:{lo}])")
        }
        AstKind::Sx(k) => {
            let k = *k;
            let children = node.children();
            drop(kind);
            write!(out, "sign_extend(")?;
            write_node(out, &children[0])?;
            write!(out, ", {k})")
        }
        AstKind::Zx(k) => {
            let k = *k;
            let children = node.children();
            drop(kind);
            write!(out, "zero_extend(")?;
            write_node(out, &children[0])?;
            write!(out, ", {k})")
        }

        AstKind::Let(name) => {
            let name = name.clone();
            let children = node.children();
            drop(kind);
            write!(out, "let {name} = ")?;
            write_node(out, &children[0])?;
            write!(out, " in ")?;
            write_node(out, &children[1])
        }

        AstKind::Declare => {
            let children = node.children();
            drop(kind);
            write!(out, "declare ")?;
            write_node(out, &children[0])
        }
        AstKind::Assert => {
            let children = node.children();
            drop(kind);
            write!(out, "assert ")?;
            write_node(out, &children[0])
        }
        AstKind::Compound => {
            let children = node.children();
            drop(kind);
            for (i, c) in children.iter().enumerate() {
                if i > 0 {
                    writeln!(out, ";")?;
                }
                write_node(out, c)?;
            }
            Ok(())
        }
    }
}

fn binary(out: &mut dyn fmt::Write, node: &Node, op: &str, masked: bool) -> fmt::Result {
    let children = node.children();
    if masked {
        write_masked(out, node, |out| {
            write!(out, "(")?;
            write_node(out, &children[0])?;
            write!(out, " {op} ")?;
            write_node(out, &children[1])?;
            write!(out, ")")
        })
    } else {
        write!(out, "(")?;
        write_node(out, &children[0])?;
        write!(out, " {op} ")?;
        write_node(out, &children[1])?;
        write!(out, ")")
    }
}

fn variadic(out: &mut dyn fmt::Write, node: &Node, op: &str) -> fmt::Result {
    let children = node.children();
    write!(out, "(")?;
    for (i, c) in children.iter().enumerate() {
        if i > 0 {
            write!(out, " {op} ")?;
        }
        write_node(out, c)?;
    }
    write!(out, ")")
}
