//! Statement grammar: the file, statement lists, `def`, `if`/`elif`/`else`,
//! assignments and statement-level error recovery.

use super::expressions::{delimited, expression};
use super::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse a whole file. The root `FILE` node covers every token, including
/// leading and trailing trivia and the zero-width end-of-file token.
pub(crate) fn parse_file(p: &mut Parser) {
    let root = p.open();
    statement_list(p, true);
    // Trailing trivia, then EOF itself.
    p.advance();
    p.close(root, SyntaxKind::FILE);
}

/// Parse statements until the end of the enclosing block (or of the file).
/// Returns how many statements were parsed, malformed ones included.
fn statement_list(p: &mut Parser, top_level: bool) -> usize {
    let mut count = 0;
    loop {
        p.eat_newlines();
        match p.current() {
            SyntaxKind::EOF => break,
            SyntaxKind::CLOSE_BLOCK if !top_level => break,
            SyntaxKind::CLOSE_BLOCK => {
                p.error("unexpected dedent");
                let m = p.open();
                p.advance();
                p.close(m, SyntaxKind::ERROR_NODE);
            }
            SyntaxKind::OPEN_BLOCK => {
                p.error("unexpected indent");
                let m = p.open();
                skip_to_statement_end(p);
                p.close(m, SyntaxKind::ERROR_NODE);
                p.reset_delimiters();
            }
            _ => {
                statement(p);
                count += 1;
            }
        }
    }
    count
}

/// Parse one statement, or wrap it in an `ERROR_NODE` when no alternative
/// matches.
fn statement(p: &mut Parser) {
    p.reset_failure();
    let m = p.open();
    let cp = p.checkpoint();

    let parsed = p.enter() && {
        let parsed = match p.current() {
            SyntaxKind::DEF_KW => p.attempt("function definition", function_def),
            SyntaxKind::IF_KW => p.attempt("if statement", if_statement),
            SyntaxKind::PASS_KW | SyntaxKind::CONTINUE_KW => p.attempt("keyword statement", |p| {
                p.advance();
                at_statement_end(p)
            }),
            SyntaxKind::IDENT
                if p.attempt("assignment", |p| assignment(p) && at_statement_end(p)) =>
            {
                true
            }
            _ => p.attempt("expression statement", |p| {
                expression(p, true) && at_statement_end(p)
            }),
        };
        p.exit();
        parsed
    };

    if parsed {
        p.close(m, SyntaxKind::STATEMENT);
        return;
    }

    p.rollback(cp);
    p.report_failure();
    let start = p.current_span();
    skip_to_statement_end(p);
    log::debug!(
        "recovered from malformed statement at {}..{}",
        start.start,
        p.current_span().start
    );
    p.close(m, SyntaxKind::ERROR_NODE);
    p.reset_delimiters();
}

/// A statement ends at a line break (plain or block-opening), at the end of
/// a block, or at the end of the file.
fn at_statement_end(p: &mut Parser) -> bool {
    if p.at_any(&[
        SyntaxKind::NEWLINE,
        SyntaxKind::OPEN_BLOCK,
        SyntaxKind::CLOSE_BLOCK,
        SyntaxKind::EOF,
    ]) {
        true
    } else {
        p.note_expected(SyntaxKind::NEWLINE.describe());
        false
    }
}

/// Skip raw tokens up to the next point where a statement can start.
///
/// Stops before a line break at bracket balance zero, before a line break
/// whose next line starts at column 0 with a statement keyword or name,
/// before the `CLOSE_BLOCK` of an enclosing block, and at the end of the
/// file. An indented block met on the way is swallowed whole.
fn skip_to_statement_end(p: &mut Parser) {
    let mut balance: u32 = 0;
    loop {
        match p.raw_current() {
            SyntaxKind::EOF => break,
            SyntaxKind::NEWLINE if balance == 0 || statement_starts_after_newline(p) => break,
            SyntaxKind::CLOSE_BLOCK if p.block_depth() > 0 => break,
            SyntaxKind::OPEN_BLOCK => {
                skip_block(p);
                break;
            }
            SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => balance += 1,
            SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                balance = balance.saturating_sub(1);
            }
            _ => {}
        }
        p.bump_raw();
    }
}

fn statement_starts_after_newline(p: &Parser) -> bool {
    matches!(
        p.raw_nth(1),
        SyntaxKind::DEF_KW
            | SyntaxKind::IF_KW
            | SyntaxKind::IDENT
            | SyntaxKind::PASS_KW
            | SyntaxKind::CONTINUE_KW
    )
}

/// Consume an `OPEN_BLOCK` and everything up to its matching `CLOSE_BLOCK`.
fn skip_block(p: &mut Parser) {
    let mut depth = 0u32;
    loop {
        match p.raw_current() {
            SyntaxKind::EOF => break,
            SyntaxKind::OPEN_BLOCK => depth += 1,
            SyntaxKind::CLOSE_BLOCK => {
                p.bump_raw();
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
                continue;
            }
            _ => {}
        }
        p.bump_raw();
    }
}

/// `:` before an indented block. Always noted when absent, only fatal when
/// the colon is required.
fn colon_before_block(p: &mut Parser) -> bool {
    if p.eat(SyntaxKind::COLON) {
        return true;
    }
    p.note_expected(SyntaxKind::COLON.describe());
    !p.require_colon()
}

/// An indented block of statements, starting at its `OPEN_BLOCK`.
///
/// Never fails: an empty body or a missing end of block is reported and the
/// enclosing node is still built.
fn block_body(p: &mut Parser, require_close: bool) {
    let open_span = p.current_span();
    p.advance(); // OPEN_BLOCK
    if statement_list(p, false) == 0 {
        p.error("expected indented block");
    }
    if !p.eat(SyntaxKind::CLOSE_BLOCK) && require_close {
        p.error_with_related("expected end of block", open_span, "block opened here");
    }
}

fn expect_block(p: &mut Parser) -> bool {
    if p.at(SyntaxKind::OPEN_BLOCK) {
        true
    } else {
        p.note_expected(SyntaxKind::OPEN_BLOCK.describe());
        false
    }
}

// ── def ────────────────────────────────────────────────────────────────

/// `def name(params):` and its body.
fn function_def(p: &mut Parser) -> bool {
    let m = p.open();
    p.advance(); // def
    if !p.expect(SyntaxKind::IDENT) || !p.expect(SyntaxKind::L_PAREN) {
        return false;
    }
    let trailing = [SyntaxKind::OPEN_BLOCK, SyntaxKind::CLOSE_BLOCK];
    if !delimited(p, SyntaxKind::R_PAREN, &trailing, def_param) {
        return false;
    }
    if !colon_before_block(p) || !expect_block(p) {
        return false;
    }
    block_body(p, true);
    p.close(m, SyntaxKind::FUNCTION_DEF);
    true
}

/// `name`, `name: type | type`, `name: type = default` or `name = default`.
fn def_param(p: &mut Parser) -> bool {
    let m = p.open();
    if !p.expect(SyntaxKind::IDENT) {
        return false;
    }
    if p.eat(SyntaxKind::COLON) {
        if !type_name(p) {
            return false;
        }
        while p.eat(SyntaxKind::PIPE) {
            if !type_name(p) {
                return false;
            }
        }
    }
    if p.eat(SyntaxKind::EQ) && !expression(p, true) {
        return false;
    }
    p.close(m, SyntaxKind::FUNCTION_DEF_PARAM);
    true
}

fn type_name(p: &mut Parser) -> bool {
    let m = p.open();
    if !p.expect(SyntaxKind::IDENT) {
        return false;
    }
    p.close(m, SyntaxKind::TYPE);
    true
}

// ── if / elif / else ───────────────────────────────────────────────────

/// An `if` branch followed by any number of `elif` branches and an optional
/// `else`. Branch tokens and bodies are direct children of `IF_STATEMENT`.
fn if_statement(p: &mut Parser) -> bool {
    let m = p.open();
    if !if_branch(p) {
        return false;
    }
    loop {
        let cp = p.checkpoint();
        p.eat_newlines();
        let keyword = p.current();
        let parsed = match keyword {
            SyntaxKind::ELIF_KW => p.attempt("elif branch", if_branch),
            SyntaxKind::ELSE_KW => p.attempt("else branch", if_branch),
            _ => false,
        };
        if !parsed {
            p.rollback(cp);
            break;
        }
        if keyword == SyntaxKind::ELSE_KW {
            break;
        }
    }
    p.close(m, SyntaxKind::IF_STATEMENT);
    true
}

/// `if cond:`, `elif cond:` or `else:` (a condition after `else` is
/// tolerated), then the branch body.
fn if_branch(p: &mut Parser) -> bool {
    let keyword = p.current();
    p.advance();
    let needs_condition = keyword != SyntaxKind::ELSE_KW
        || !p.at_any(&[SyntaxKind::COLON, SyntaxKind::OPEN_BLOCK]);
    if needs_condition && !expression(p, true) {
        return false;
    }
    if !colon_before_block(p) || !expect_block(p) {
        return false;
    }
    block_body(p, false);
    true
}

// ── assignment ─────────────────────────────────────────────────────────

/// `a = expr` or `a, b = expr`.
fn assignment(p: &mut Parser) -> bool {
    let m = p.open();
    p.advance(); // first target
    while p.eat(SyntaxKind::COMMA) {
        if !p.expect(SyntaxKind::IDENT) {
            return false;
        }
    }
    if !p.expect(SyntaxKind::EQ) || !expression(p, true) {
        return false;
    }
    p.close(m, SyntaxKind::ASSIGNMENT);
    true
}
