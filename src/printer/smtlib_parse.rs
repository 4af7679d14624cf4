//! A minimal reader for the prefix S-expression form [`super::smtlib`]
//! writes, used only by this crate's own round-trip test (§8 property 8:
//! "parsing a prefix-rendered expression back produces an AST structurally
//! equal to the original"). Not part of the public builder surface — a
//! real SMT-LIB reader belongs in the solver back end, not in the core.
//!
//! Supports the subset of the grammar `SmtlibPrinter` actually emits:
//! bit-vector literals, bound variables (looked up by name in the supplied
//! context, so the caller must have already created them), the binary/unary
//! bit-vector and logical operators, `ite`, variadic `concat`/`land`/`lor`,
//! and the indexed `extract`/`sign_extend`/`zero_extend`/`rotate_left`/
//! `rotate_right` forms. `let`/`declare-fun`/`assert`/compound sequences are
//! out of scope for the round trip this exists to test.

use crate::context::AstContext;
use crate::error::{AstError, AstResult};
use crate::node::Node;

/// Parse a single prefix-form expression rendered by [`super::render`] in
/// [`super::RepresentationMode::Smtlib`], rebuilding it through `ctx`.
///
/// Any symbol used as a bare variable reference must already be bound in
/// `ctx` (e.g. via `variable_named`) — this reader has no way to invent a
/// width for a name it has never seen.
pub(crate) fn parse(ctx: &AstContext, text: &str) -> AstResult<Node> {
    let tokens = tokenize(text);
    let mut pos = 0;
    let node = parse_expr(ctx, &tokens, &mut pos)?;
    Ok(node)
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '(' | ')' => {
                tokens.push(c.to_string());
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '"' => {
                chars.next();
                let mut s = String::from("\"");
                for c in chars.by_ref() {
                    s.push(c);
                    if c == '"' {
                        break;
                    }
                }
                tokens.push(s);
            }
            _ => {
                let mut s = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '(' || c == ')' || c.is_whitespace() {
                        break;
                    }
                    s.push(c);
                    chars.next();
                }
                tokens.push(s);
            }
        }
    }
    tokens
}

fn expect<'a>(tokens: &'a [String], pos: &mut usize, expected: &str) -> AstResult<&'a str> {
    let tok = tokens.get(*pos).ok_or(AstError::OutOfRange {
        detail: "unexpected end of input while parsing an s-expression",
    })?;
    if tok != expected {
        return Err(AstError::OutOfRange {
            detail: "unexpected token while parsing an s-expression",
        });
    }
    *pos += 1;
    Ok(tok.as_str())
}

fn peek<'a>(tokens: &'a [String], pos: usize) -> Option<&'a str> {
    tokens.get(pos).map(String::as_str)
}

fn parse_u32(s: &str) -> AstResult<u32> {
    s.parse().map_err(|_| AstError::OutOfRange {
        detail: "expected an integer literal",
    })
}

fn parse_u128(s: &str) -> AstResult<u128> {
    s.parse().map_err(|_| AstError::OutOfRange {
        detail: "expected an integer literal",
    })
}

/// Parse one expression starting at `tokens[*pos]`, advancing `*pos` past it.
fn parse_expr(ctx: &AstContext, tokens: &[String], pos: &mut usize) -> AstResult<Node> {
    match peek(tokens, *pos) {
        Some("(") => parse_list(ctx, tokens, pos),
        Some(tok) if tok.starts_with('"') => {
            let s = tok.trim_matches('"').to_string();
            *pos += 1;
            ctx.string(s)
        }
        Some(tok) => {
            let name = tok.to_string();
            *pos += 1;
            ctx.get_variable_node(&name)
        }
        None => Err(AstError::OutOfRange {
            detail: "unexpected end of input while parsing an s-expression",
        }),
    }
}

fn parse_list(ctx: &AstContext, tokens: &[String], pos: &mut usize) -> AstResult<Node> {
    expect(tokens, pos, "(")?;

    // `(_ bvN W)`: a flat literal, the whole list is the `_` form.
    if peek(tokens, *pos) == Some("_") {
        *pos += 1;
        let head = tokens.get(*pos).cloned().ok_or(AstError::OutOfRange {
            detail: "unexpected end of input after `_`",
        })?;
        *pos += 1;
        let digits = head.strip_prefix("bv").ok_or(AstError::OutOfRange {
            detail: "expected a `bvN` literal after a bare `_`",
        })?;
        let value = parse_u128(digits)?;
        let width = parse_u32(tokens.get(*pos).ok_or(AstError::OutOfRange {
            detail: "missing width in `(_ bvN W)`",
        })?)?;
        *pos += 1;
        expect(tokens, pos, ")")?;
        return ctx.bv(value, width);
    }

    // `((_ op args...) operand...)`: an indexed operator applied to its
    // operand(s), the operator itself written as a nested `_` list.
    if peek(tokens, *pos) == Some("(") {
        expect(tokens, pos, "(")?;
        expect(tokens, pos, "_")?;
        let head = tokens.get(*pos).cloned().ok_or(AstError::OutOfRange {
            detail: "unexpected end of input after `_`",
        })?;
        *pos += 1;
        let node = match head.as_str() {
            "extract" => {
                let hi = parse_u32(tokens.get(*pos).ok_or(AstError::OutOfRange {
                    detail: "missing extract index",
                })?)?;
                *pos += 1;
                let lo = parse_u32(tokens.get(*pos).ok_or(AstError::OutOfRange {
                    detail: "missing extract index",
                })?)?;
                *pos += 1;
                expect(tokens, pos, ")")?;
                let x = parse_expr(ctx, tokens, pos)?;
                ctx.extract(hi, lo, x)
            }
            "sign_extend" | "zero_extend" | "rotate_left" | "rotate_right" => {
                let k = parse_u32(tokens.get(*pos).ok_or(AstError::OutOfRange {
                    detail: "missing indexed operator argument",
                })?)?;
                *pos += 1;
                expect(tokens, pos, ")")?;
                let x = parse_expr(ctx, tokens, pos)?;
                match head.as_str() {
                    "sign_extend" => ctx.sx(k, x),
                    "zero_extend" => ctx.zx(k, x),
                    "rotate_left" => ctx.bvrol_const(x, k),
                    _ => ctx.bvror_const(x, k),
                }
            }
            _ => Err(AstError::OutOfRange {
                detail: "unsupported indexed operator in s-expression",
            }),
        }?;
        expect(tokens, pos, ")")?;
        return Ok(node);
    }

    let head = tokens.get(*pos).cloned().ok_or(AstError::OutOfRange {
        detail: "unexpected end of input after `(`",
    })?;
    *pos += 1;

    if head == "declare-fun" || head == "let" {
        return Err(AstError::OutOfRange {
            detail: "declare-fun/let are not supported by the round-trip reader",
        });
    }

    let node = match head.as_str() {
        "bvadd" | "bvsub" | "bvmul" | "bvand" | "bvor" | "bvxor" | "bvnand" | "bvnor"
        | "bvxnor" | "bvshl" | "bvlshr" | "bvashr" | "bvsdiv" | "bvudiv" | "bvsmod" | "bvsrem"
        | "bvurem" | "bvsge" | "bvsgt" | "bvsle" | "bvslt" | "bvuge" | "bvugt" | "bvule"
        | "bvult" | "=" | "distinct" => {
            let a = parse_expr(ctx, tokens, pos)?;
            let b = parse_expr(ctx, tokens, pos)?;
            binary_op(ctx, &head, a, b)
        }
        "bvneg" => ctx.bvneg(parse_expr(ctx, tokens, pos)?),
        "bvnot" => ctx.bvnot(parse_expr(ctx, tokens, pos)?),
        "lnot" => ctx.lnot(parse_expr(ctx, tokens, pos)?),
        "ite" => {
            let c = parse_expr(ctx, tokens, pos)?;
            let t = parse_expr(ctx, tokens, pos)?;
            let e = parse_expr(ctx, tokens, pos)?;
            ctx.ite(c, t, e)
        }
        "concat" | "land" | "lor" => {
            let mut operands = Vec::new();
            while peek(tokens, *pos) != Some(")") {
                operands.push(parse_expr(ctx, tokens, pos)?);
            }
            match head.as_str() {
                "concat" => ctx.concat(operands),
                "land" => ctx.land(operands),
                _ => ctx.lor(operands),
            }
        }
        _ => Err(AstError::OutOfRange {
            detail: "unsupported operator in s-expression",
        }),
    }?;

    expect(tokens, pos, ")")?;
    Ok(node)
}

fn binary_op(ctx: &AstContext, head: &str, a: Node, b: Node) -> AstResult<Node> {
    match head {
        "bvadd" => ctx.bvadd(a, b),
        "bvsub" => ctx.bvsub(a, b),
        "bvmul" => ctx.bvmul(a, b),
        "bvand" => ctx.bvand(a, b),
        "bvor" => ctx.bvor(a, b),
        "bvxor" => ctx.bvxor(a, b),
        "bvnand" => ctx.bvnand(a, b),
        "bvnor" => ctx.bvnor(a, b),
        "bvxnor" => ctx.bvxnor(a, b),
        "bvshl" => ctx.bvshl(a, b),
        "bvlshr" => ctx.bvlshr(a, b),
        "bvashr" => ctx.bvashr(a, b),
        "bvsdiv" => ctx.bvsdiv(a, b),
        "bvudiv" => ctx.bvudiv(a, b),
        "bvsmod" => ctx.bvsmod(a, b),
        "bvsrem" => ctx.bvsrem(a, b),
        "bvurem" => ctx.bvurem(a, b),
        "bvsge" => ctx.bvsge(a, b),
        "bvsgt" => ctx.bvsgt(a, b),
        "bvsle" => ctx.bvsle(a, b),
        "bvslt" => ctx.bvslt(a, b),
        "bvuge" => ctx.bvuge(a, b),
        "bvugt" => ctx.bvugt(a, b),
        "bvule" => ctx.bvule(a, b),
        "bvult" => ctx.bvult(a, b),
        "=" => ctx.equal(a, b),
        "distinct" => ctx.distinct(a, b),
        _ => unreachable!("binary_op called with non-binary head {head}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::FlagModes;
    use crate::printer::RepresentationMode;

    fn ctx() -> AstContext {
        AstContext::new(FlagModes::none())
    }

    #[test]
    fn round_trips_a_literal() {
        let ctx = ctx();
        let bv = ctx.bv(5, 8).unwrap();
        let text = ctx.print_as(RepresentationMode::Smtlib, &bv);
        let parsed = parse(&ctx, &text).unwrap();
        assert!(parsed.equal_to(&bv));
    }

    #[test]
    fn round_trips_an_arithmetic_expression() {
        let ctx = ctx();
        let a = ctx.variable_named("a", 8).unwrap();
        let b = ctx.variable_named("b", 8).unwrap();
        let expr = ctx.bvadd(ctx.bvxor(a, b).unwrap(), ctx.bv(3, 8).unwrap()).unwrap();
        let text = ctx.print_as(RepresentationMode::Smtlib, &expr);
        let parsed = parse(&ctx, &text).unwrap();
        assert!(parsed.equal_to(&expr));
    }

    #[test]
    fn round_trips_extract_and_extend() {
        let ctx = ctx();
        let x = ctx.variable_named("x", 16).unwrap();
        let expr = ctx
            .zx(8, ctx.extract(7, 0, x).unwrap())
            .unwrap();
        let text = ctx.print_as(RepresentationMode::Smtlib, &expr);
        let parsed = parse(&ctx, &text).unwrap();
        assert!(parsed.equal_to(&expr));
    }

    #[test]
    fn round_trips_a_constant_rotation() {
        let ctx = ctx();
        let x = ctx.variable_named("x", 8).unwrap();
        let expr = ctx.bvrol_const(x, 3).unwrap();
        let text = ctx.print_as(RepresentationMode::Smtlib, &expr);
        let parsed = parse(&ctx, &text).unwrap();
        assert!(parsed.equal_to(&expr));
    }

    #[test]
    fn round_trip_is_idempotent_on_a_second_pass() {
        let ctx = ctx();
        let x = ctx.variable_named("x", 8).unwrap();
        let cond = ctx.bvult(x.clone(), ctx.bv(10, 8).unwrap()).unwrap();
        let expr = ctx
            .ite(cond, ctx.bv(1, 8).unwrap(), ctx.bv(0, 8).unwrap())
            .unwrap();
        let once = parse(&ctx, &ctx.print_as(RepresentationMode::Smtlib, &expr)).unwrap();
        let twice = parse(&ctx, &ctx.print_as(RepresentationMode::Smtlib, &once)).unwrap();
        assert!(once.equal_to(&twice));
        assert!(once.equal_to(&expr));
    }
}
