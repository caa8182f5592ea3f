use insta::assert_snapshot;
use please_lexer::Lexer;
use proptest::prelude::*;

/// Render tokens one per line as `Kind@start..end "text"`.
fn tokenize_snapshot(source: &str) -> String {
    Lexer::tokenize(source)
        .iter()
        .map(|tok| format!("{:?}@{}..{} {:?}", tok.kind, tok.span.start, tok.span.end, tok.text(source)))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule calls ───────────────────────────────────────────────────────────

#[test]
fn test_multiline_call() {
    let source = "go_library(\n    name = \"lib\",\n)\n";
    assert_snapshot!(tokenize_snapshot(source), @r###"
    Ident@0..10 "go_library"
    LParen@10..11 "("
    Newline@11..12 "\n"
    Whitespace@12..16 "    "
    Ident@16..20 "name"
    Whitespace@20..21 " "
    Eq@21..22 "="
    Whitespace@22..23 " "
    StringLiteral@23..28 "\"lib\""
    Comma@28..29 ","
    Newline@29..30 "\n"
    RParen@30..31 ")"
    Newline@31..32 "\n"
    Eof@32..32 ""
    "###);
}

// ── Blocks ───────────────────────────────────────────────────────────────

#[test]
fn test_if_else_blocks() {
    let source = "if x:\n  pass\nelse:\n  y = 1";
    assert_snapshot!(tokenize_snapshot(source), @r###"
    If@0..2 "if"
    Whitespace@2..3 " "
    Ident@3..4 "x"
    Colon@4..5 ":"
    OpenBlock@5..6 "\n"
    Whitespace@6..8 "  "
    Pass@8..12 "pass"
    CloseBlock@12..13 "\n"
    Else@13..17 "else"
    Colon@17..18 ":"
    OpenBlock@18..19 "\n"
    Whitespace@19..21 "  "
    Ident@21..22 "y"
    Whitespace@22..23 " "
    Eq@23..24 "="
    Whitespace@24..25 " "
    IntLiteral@25..26 "1"
    CloseBlock@26..26 ""
    Eof@26..26 ""
    "###);
}

#[test]
fn test_comment_and_docstring_trivia() {
    let source = "def f():\n    \"\"\"Doc.\"\"\"\n    pass  # done\n";
    assert_snapshot!(tokenize_snapshot(source), @r###"
    Def@0..3 "def"
    Whitespace@3..4 " "
    Ident@4..5 "f"
    LParen@5..6 "("
    RParen@6..7 ")"
    Colon@7..8 ":"
    OpenBlock@8..9 "\n"
    Whitespace@9..13 "    "
    DocComment@13..23 "\"\"\"Doc.\"\"\""
    Newline@23..24 "\n"
    Whitespace@24..28 "    "
    Pass@28..32 "pass"
    Whitespace@32..34 "  "
    Comment@34..40 "# done"
    Newline@40..41 "\n"
    CloseBlock@41..41 ""
    Eof@41..41 ""
    "###);
}

// ── Recovery and long inputs ─────────────────────────────────────────────

#[test]
fn test_unclosed_call_before_def() {
    let source = "x = f(\ndef g():\n  pass\n";
    assert_snapshot!(tokenize_snapshot(source), @r###"
    Ident@0..1 "x"
    Whitespace@1..2 " "
    Eq@2..3 "="
    Whitespace@3..4 " "
    Ident@4..5 "f"
    LParen@5..6 "("
    Newline@6..7 "\n"
    Def@7..10 "def"
    Whitespace@10..11 " "
    Ident@11..12 "g"
    LParen@12..13 "("
    RParen@13..14 ")"
    Colon@14..15 ":"
    OpenBlock@15..16 "\n"
    Whitespace@16..18 "  "
    Pass@18..22 "pass"
    Newline@22..23 "\n"
    CloseBlock@23..23 ""
    Eof@23..23 ""
    "###);
}

#[test]
fn long_runs_of_blank_and_comment_lines_lex_in_linear_time() {
    let mut source = String::from("if x:\n  y = 1\n");
    for _ in 0..100_000 {
        source.push_str("  # note\n\n");
    }
    source.push_str("z = 2\n");

    let started = std::time::Instant::now();
    let tokens = Lexer::tokenize(&source);
    assert!(
        started.elapsed() < std::time::Duration::from_secs(10),
        "lexing took {:?}",
        started.elapsed()
    );

    let text: String = tokens.iter().map(|t| t.text(&source)).collect();
    assert_eq!(text, source);
    let closes = tokens
        .iter()
        .filter(|t| t.kind == please_common::token::TokenKind::CloseBlock)
        .count();
    assert_eq!(closes, 1);
}

// ── Properties ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn tokens_concatenate_to_source(source in "\\PC{0,200}") {
        let tokens = Lexer::tokenize(&source);
        let text: String = tokens.iter().map(|t| t.text(&source)).collect();
        prop_assert_eq!(text, source.clone());
    }

    #[test]
    fn spans_are_contiguous_and_end_with_eof(source in "[ \t\n#a-z0-9():=,'\"\\[\\]{}]{0,120}") {
        let tokens = Lexer::tokenize(&source);
        let mut offset = 0;
        for token in &tokens {
            prop_assert_eq!(token.span.start, offset);
            offset = token.span.end;
        }
        prop_assert_eq!(offset as usize, source.len());
        let last = tokens.last().map(|t| t.kind);
        prop_assert_eq!(last, Some(please_common::token::TokenKind::Eof));
    }

    #[test]
    fn block_tokens_are_balanced(source in "([ ]{0,4}(x|if x:|pass|# c)?\n){0,20}") {
        use please_common::token::TokenKind;
        let mut depth: i64 = 0;
        for token in Lexer::tokenize(&source) {
            match token.kind {
                TokenKind::OpenBlock => depth += 1,
                TokenKind::CloseBlock => depth -= 1,
                _ => {}
            }
            prop_assert!(depth >= 0);
        }
        prop_assert_eq!(depth, 0);
    }
}
