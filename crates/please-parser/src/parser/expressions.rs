//! Expression grammar.
//!
//! There are no precedence levels. An expression is a head (optional unary
//! `-`/`not` plus a value) followed by an optional operator and another
//! expression, so binary chains nest to the right: `1 + 2 + 3` parses as
//! `1 + (2 + 3)`. A trailing `if ... else ...` applies to the whole chain.
//!
//! Chains are built iteratively: each operand after an operator opens a
//! nested `EXPRESSION` node and all of them are closed together at the end.
//! Each of those nodes takes one level of the depth limit.

use super::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse an expression. Operands after an operator and ternary conditions
/// are parsed with `allow_ternary == false`.
pub(crate) fn expression(p: &mut Parser, allow_ternary: bool) -> bool {
    if !p.enter() {
        return false;
    }
    let parsed = expression_inner(p, allow_ternary);
    p.exit();
    parsed
}

fn expression_inner(p: &mut Parser, allow_ternary: bool) -> bool {
    let outer = p.open();
    if !head(p) {
        return false;
    }

    // Every operand is one level deeper in the tree, so it counts against
    // the depth limit like a nested bracket does.
    let mut operands = Vec::new();
    let mut too_deep = false;
    loop {
        let cp = p.checkpoint();
        if !operator(p) {
            break;
        }
        if !p.enter() {
            too_deep = true;
            break;
        }
        let m = p.open();
        if !head(p) {
            p.exit();
            p.rollback(cp);
            break;
        }
        operands.push(m);
    }
    for m in operands.into_iter().rev() {
        p.close(m, SyntaxKind::EXPRESSION);
        p.exit();
    }
    if too_deep {
        return false;
    }

    if allow_ternary && p.at(SyntaxKind::IF_KW) {
        let cp = p.checkpoint();
        p.advance(); // if
        let parsed =
            expression(p, false) && p.expect(SyntaxKind::ELSE_KW) && expression(p, true);
        if !parsed {
            p.rollback(cp);
        }
    }

    p.close(outer, SyntaxKind::EXPRESSION);
    true
}

/// Optional unary operator, then a value.
fn head(p: &mut Parser) -> bool {
    if p.at_any(&[SyntaxKind::MINUS, SyntaxKind::NOT_KW]) {
        p.advance();
    }
    value(p)
}

/// Binary operator. `is not` and `not in` are single two-token operators;
/// a `not` that is not followed by `in` is not an operator.
fn operator(p: &mut Parser) -> bool {
    let two_tokens = match p.current() {
        SyntaxKind::IS_KW => p.nth(1) == SyntaxKind::NOT_KW,
        SyntaxKind::NOT_KW if p.nth(1) == SyntaxKind::IN_KW => true,
        SyntaxKind::PLUS
        | SyntaxKind::MINUS
        | SyntaxKind::STAR
        | SyntaxKind::SLASH
        | SyntaxKind::PERCENT
        | SyntaxKind::LT
        | SyntaxKind::GT
        | SyntaxKind::LT_EQ
        | SyntaxKind::GT_EQ
        | SyntaxKind::EQ_EQ
        | SyntaxKind::NOT_EQ
        | SyntaxKind::AND_KW
        | SyntaxKind::OR_KW
        | SyntaxKind::IN_KW
        | SyntaxKind::PIPE => false,
        _ => return false,
    };
    let m = p.open();
    p.advance();
    if two_tokens {
        p.advance();
    }
    p.close(m, SyntaxKind::OPERATOR);
    true
}

fn value(p: &mut Parser) -> bool {
    let m = p.open();
    let parsed = match p.current() {
        SyntaxKind::IDENT => {
            // A call when the name is followed by a well-formed argument
            // list, a plain name otherwise.
            if !(p.nth(1) == SyntaxKind::L_PAREN && p.attempt("function call", function_call)) {
                p.advance();
            }
            true
        }
        SyntaxKind::INT_LITERAL | SyntaxKind::STRING_LITERAL => {
            p.advance();
            true
        }
        SyntaxKind::L_BRACKET => list_lit(p),
        SyntaxKind::L_BRACE => dict_lit(p),
        SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW => {
            let lit = p.open();
            p.advance();
            p.close(lit, SyntaxKind::BOOL_LIT);
            true
        }
        _ => {
            p.note_expected("expression");
            false
        }
    };
    if parsed {
        p.close(m, SyntaxKind::VALUE);
    }
    parsed
}

/// `name(args)`
fn function_call(p: &mut Parser) -> bool {
    let m = p.open();
    p.advance(); // name
    if !p.expect(SyntaxKind::L_PAREN)
        || !delimited(p, SyntaxKind::R_PAREN, &[SyntaxKind::CLOSE_BLOCK], call_param)
    {
        return false;
    }
    p.close(m, SyntaxKind::FUNCTION_CALL);
    true
}

/// `name = expr` or a positional `expr`.
fn call_param(p: &mut Parser) -> bool {
    let m = p.open();
    if p.at(SyntaxKind::IDENT) && p.nth(1) == SyntaxKind::EQ {
        p.advance(); // name
        p.advance(); // =
    }
    if !expression(p, true) {
        return false;
    }
    p.close(m, SyntaxKind::FUNCTION_CALL_PARAM);
    true
}

/// `[a, b]`
fn list_lit(p: &mut Parser) -> bool {
    let m = p.open();
    p.advance(); // [
    if !delimited(
        p,
        SyntaxKind::R_BRACKET,
        &[SyntaxKind::CLOSE_BLOCK],
        |p| expression(p, true),
    ) {
        return false;
    }
    p.close(m, SyntaxKind::LIST_LIT);
    true
}

/// `{"key": value}`. Entries have no node of their own.
fn dict_lit(p: &mut Parser) -> bool {
    let m = p.open();
    p.advance(); // {
    if !delimited(p, SyntaxKind::R_BRACE, &[SyntaxKind::CLOSE_BLOCK], dict_entry) {
        return false;
    }
    p.close(m, SyntaxKind::DICT_LIT);
    true
}

fn dict_entry(p: &mut Parser) -> bool {
    p.expect(SyntaxKind::STRING_LITERAL) && p.expect(SyntaxKind::COLON) && expression(p, true)
}

/// The inside of a bracketed, comma-separated list, opener already consumed:
/// `OPEN_BLOCK* (item (',' item)*)? ','? trailing* close`.
pub(crate) fn delimited<'src>(
    p: &mut Parser<'src>,
    close: SyntaxKind,
    trailing: &[SyntaxKind],
    mut item: impl FnMut(&mut Parser<'src>) -> bool,
) -> bool {
    while p.at(SyntaxKind::OPEN_BLOCK) {
        p.advance();
    }

    let ends_items = |kind: SyntaxKind| {
        kind == close || kind == SyntaxKind::COMMA || trailing.contains(&kind)
    };
    if !ends_items(p.current()) {
        if !item(p) {
            return false;
        }
        loop {
            if !p.at(SyntaxKind::COMMA) {
                p.note_expected(SyntaxKind::COMMA.describe());
                break;
            }
            let after = p.nth(1);
            if after == close || trailing.contains(&after) {
                break;
            }
            p.advance(); // ,
            if !item(p) {
                return false;
            }
        }
    }

    p.eat(SyntaxKind::COMMA);
    while p.at_any(trailing) {
        p.advance();
    }
    p.expect(close)
}
