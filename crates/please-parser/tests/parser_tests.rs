//! Parser integration tests using insta snapshots.
//!
//! Each test parses a BUILD snippet, builds the CST, and snapshots the
//! debug tree output to verify statement alternation, right-nested chains,
//! trivia placement and error recovery.

use insta::assert_snapshot;
use please_parser::{debug_tree, parse};

fn parse_and_debug(source: &str) -> String {
    let parse = parse(source);
    let tree = debug_tree(&parse.syntax());
    if !parse.errors().is_empty() {
        format!(
            "{}\nerrors:\n{}",
            tree,
            parse
                .errors()
                .iter()
                .map(|e| format!("  - {} @{}..{}", e.message, e.span.start, e.span.end))
                .collect::<Vec<_>>()
                .join("\n")
        )
    } else {
        tree
    }
}

// ── Statements ─────────────────────────────────────────────────────────

#[test]
fn assignment() {
    assert_snapshot!(parse_and_debug("x = 1"), @r###"
    FILE@0..5
      STATEMENT@0..5
        ASSIGNMENT@0..5
          IDENT@0..1 "x"
          WHITESPACE@1..2 " "
          EQ@2..3 "="
          WHITESPACE@3..4 " "
          EXPRESSION@4..5
            VALUE@4..5
              INT_LITERAL@4..5 "1"
      EOF@5..5 ""
    "###);
}

#[test]
fn call_statement() {
    assert_snapshot!(parse_and_debug("f(x)"), @r###"
    FILE@0..4
      STATEMENT@0..4
        EXPRESSION@0..4
          VALUE@0..4
            FUNCTION_CALL@0..4
              IDENT@0..1 "f"
              L_PAREN@1..2 "("
              FUNCTION_CALL_PARAM@2..3
                EXPRESSION@2..3
                  VALUE@2..3
                    IDENT@2..3 "x"
              R_PAREN@3..4 ")"
      EOF@4..4 ""
    "###);
}

#[test]
fn call_spanning_lines() {
    assert_snapshot!(parse_and_debug("f(\n  a,\n)"), @r###"
    FILE@0..9
      STATEMENT@0..9
        EXPRESSION@0..9
          VALUE@0..9
            FUNCTION_CALL@0..9
              IDENT@0..1 "f"
              L_PAREN@1..2 "("
              NEWLINE@2..3 "\n"
              WHITESPACE@3..5 "  "
              FUNCTION_CALL_PARAM@5..6
                EXPRESSION@5..6
                  VALUE@5..6
                    IDENT@5..6 "a"
              COMMA@6..7 ","
              NEWLINE@7..8 "\n"
              R_PAREN@8..9 ")"
      EOF@9..9 ""
    "###);
}

#[test]
fn comments_stay_between_statements() {
    assert_snapshot!(parse_and_debug("# c\nx = 1  # t\n"), @r###"
    FILE@0..15
      COMMENT@0..3 "# c"
      NEWLINE@3..4 "\n"
      STATEMENT@4..9
        ASSIGNMENT@4..9
          IDENT@4..5 "x"
          WHITESPACE@5..6 " "
          EQ@6..7 "="
          WHITESPACE@7..8 " "
          EXPRESSION@8..9
            VALUE@8..9
              INT_LITERAL@8..9 "1"
      WHITESPACE@9..11 "  "
      COMMENT@11..14 "# t"
      NEWLINE@14..15 "\n"
      EOF@15..15 ""
    "###);
}

// ── Expressions ────────────────────────────────────────────────────────

#[test]
fn binary_chain_nests_right() {
    assert_snapshot!(parse_and_debug("1 + 2 + 3"), @r###"
    FILE@0..9
      STATEMENT@0..9
        EXPRESSION@0..9
          VALUE@0..1
            INT_LITERAL@0..1 "1"
          WHITESPACE@1..2 " "
          OPERATOR@2..3
            PLUS@2..3 "+"
          WHITESPACE@3..4 " "
          EXPRESSION@4..9
            VALUE@4..5
              INT_LITERAL@4..5 "2"
            WHITESPACE@5..6 " "
            OPERATOR@6..7
              PLUS@6..7 "+"
            WHITESPACE@7..8 " "
            EXPRESSION@8..9
              VALUE@8..9
                INT_LITERAL@8..9 "3"
      EOF@9..9 ""
    "###);
}

#[test]
fn ternary_applies_to_whole_chain() {
    assert_snapshot!(parse_and_debug("1 + 1 if True else 2"), @r###"
    FILE@0..20
      STATEMENT@0..20
        EXPRESSION@0..20
          VALUE@0..1
            INT_LITERAL@0..1 "1"
          WHITESPACE@1..2 " "
          OPERATOR@2..3
            PLUS@2..3 "+"
          WHITESPACE@3..4 " "
          EXPRESSION@4..5
            VALUE@4..5
              INT_LITERAL@4..5 "1"
          WHITESPACE@5..6 " "
          IF_KW@6..8 "if"
          WHITESPACE@8..9 " "
          EXPRESSION@9..13
            VALUE@9..13
              BOOL_LIT@9..13
                TRUE_KW@9..13 "True"
          WHITESPACE@13..14 " "
          ELSE_KW@14..18 "else"
          WHITESPACE@18..19 " "
          EXPRESSION@19..20
            VALUE@19..20
              INT_LITERAL@19..20 "2"
      EOF@20..20 ""
    "###);
}

#[test]
fn list_with_trailing_comma() {
    assert_snapshot!(parse_and_debug("x = [1, 2, 3,]"), @r###"
    FILE@0..14
      STATEMENT@0..14
        ASSIGNMENT@0..14
          IDENT@0..1 "x"
          WHITESPACE@1..2 " "
          EQ@2..3 "="
          WHITESPACE@3..4 " "
          EXPRESSION@4..14
            VALUE@4..14
              LIST_LIT@4..14
                L_BRACKET@4..5 "["
                EXPRESSION@5..6
                  VALUE@5..6
                    INT_LITERAL@5..6 "1"
                COMMA@6..7 ","
                WHITESPACE@7..8 " "
                EXPRESSION@8..9
                  VALUE@8..9
                    INT_LITERAL@8..9 "2"
                COMMA@9..10 ","
                WHITESPACE@10..11 " "
                EXPRESSION@11..12
                  VALUE@11..12
                    INT_LITERAL@11..12 "3"
                COMMA@12..13 ","
                R_BRACKET@13..14 "]"
      EOF@14..14 ""
    "###);
}

// ── Blocks ─────────────────────────────────────────────────────────────

#[test]
fn function_def_with_typed_default() {
    assert_snapshot!(parse_and_debug("def f(a, b: int = 1):\n  pass"), @r###"
    FILE@0..28
      STATEMENT@0..28
        FUNCTION_DEF@0..28
          DEF_KW@0..3 "def"
          WHITESPACE@3..4 " "
          IDENT@4..5 "f"
          L_PAREN@5..6 "("
          FUNCTION_DEF_PARAM@6..7
            IDENT@6..7 "a"
          COMMA@7..8 ","
          WHITESPACE@8..9 " "
          FUNCTION_DEF_PARAM@9..19
            IDENT@9..10 "b"
            COLON@10..11 ":"
            WHITESPACE@11..12 " "
            TYPE@12..15
              IDENT@12..15 "int"
            WHITESPACE@15..16 " "
            EQ@16..17 "="
            WHITESPACE@17..18 " "
            EXPRESSION@18..19
              VALUE@18..19
                INT_LITERAL@18..19 "1"
          R_PAREN@19..20 ")"
          COLON@20..21 ":"
          OPEN_BLOCK@21..22 "\n"
          WHITESPACE@22..24 "  "
          STATEMENT@24..28
            PASS_KW@24..28 "pass"
          CLOSE_BLOCK@28..28 ""
      EOF@28..28 ""
    "###);
}

#[test]
fn if_elif_else() {
    assert_snapshot!(parse_and_debug("if x:\n  pass\nelif y:\n  pass\nelse:\n  pass"), @r###"
    FILE@0..40
      STATEMENT@0..40
        IF_STATEMENT@0..40
          IF_KW@0..2 "if"
          WHITESPACE@2..3 " "
          EXPRESSION@3..4
            VALUE@3..4
              IDENT@3..4 "x"
          COLON@4..5 ":"
          OPEN_BLOCK@5..6 "\n"
          WHITESPACE@6..8 "  "
          STATEMENT@8..12
            PASS_KW@8..12 "pass"
          CLOSE_BLOCK@12..13 "\n"
          ELIF_KW@13..17 "elif"
          WHITESPACE@17..18 " "
          EXPRESSION@18..19
            VALUE@18..19
              IDENT@18..19 "y"
          COLON@19..20 ":"
          OPEN_BLOCK@20..21 "\n"
          WHITESPACE@21..23 "  "
          STATEMENT@23..27
            PASS_KW@23..27 "pass"
          CLOSE_BLOCK@27..28 "\n"
          ELSE_KW@28..32 "else"
          COLON@32..33 ":"
          OPEN_BLOCK@33..34 "\n"
          WHITESPACE@34..36 "  "
          STATEMENT@36..40
            PASS_KW@36..40 "pass"
          CLOSE_BLOCK@40..40 ""
      EOF@40..40 ""
    "###);
}

// ── Error recovery ─────────────────────────────────────────────────────

#[test]
fn missing_value_recovers_at_next_line() {
    assert_snapshot!(parse_and_debug("x = \ny = 1"), @r###"
    FILE@0..10
      ERROR_NODE@0..4
        IDENT@0..1 "x"
        WHITESPACE@1..2 " "
        EQ@2..3 "="
        WHITESPACE@3..4 " "
      NEWLINE@4..5 "\n"
      STATEMENT@5..10
        ASSIGNMENT@5..10
          IDENT@5..6 "y"
          WHITESPACE@6..7 " "
          EQ@7..8 "="
          WHITESPACE@8..9 " "
          EXPRESSION@9..10
            VALUE@9..10
              INT_LITERAL@9..10 "1"
      EOF@10..10 ""
    errors:
      - expected expression @4..5
    "###);
}

#[test]
fn malformed_statement_in_block_stops_at_dedent() {
    let parse = parse("def f():\n  x = )\n  pass\ny = 1\n");
    let messages: Vec<_> = parse
        .errors()
        .iter()
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(messages, vec!["expected expression"]);

    let file = parse.file();
    let def = file.function_defs().next().unwrap();
    // The error node stays inside the body, the `pass` after it still parses.
    assert_eq!(def.body().count(), 1);
    assert_eq!(file.statements().count(), 2);
}

#[test]
fn unexpected_tokens_report_once_per_statement() {
    let parse = parse(") ]\nx = 1\n} {\n");
    let messages: Vec<_> = parse
        .errors()
        .iter()
        .map(|e| (e.message.as_str(), e.span.start))
        .collect();
    assert_eq!(
        messages,
        vec![("expected statement", 0), ("expected statement", 10)]
    );
    assert_eq!(parse.file().statements().count(), 1);
}

#[test]
fn lexer_errors_are_not_reported_twice() {
    let parse = parse("x = $\n");
    assert_eq!(parse.errors().len(), 1);
    assert_eq!(parse.errors()[0].message, "unexpected character: '$'");
}

#[test]
fn unclosed_call_does_not_swallow_following_defs() {
    let parse = parse("x = f(\ndef g():\n  pass\ndef h():\n  pass\ny = 1\n");
    assert_eq!(parse.errors().len(), 1, "{:?}", parse.errors());

    let file = parse.file();
    let names: Vec<_> = file
        .function_defs()
        .filter_map(|def| def.name().ok())
        .map(|name| name.text().to_string())
        .collect();
    assert_eq!(names, vec!["g", "h"]);
    assert_eq!(file.statements().count(), 3);
}
