use serde::Serialize;

use crate::span::Span;

/// A token produced by the Please lexer.
///
/// Tokens carry only a kind and a span. Literal values are decoded from the
/// token text on demand with [`int_value`] and [`unescape_string`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Create a new token from a kind and byte offsets.
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }

    /// The source text this token covers.
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        &source[self.span.range()]
    }
}

/// Every kind of token in a BUILD file.
///
/// Trivia (whitespace, newlines, comments, doc strings) is tokenized like
/// everything else so that the token texts concatenate back to the input.
/// `OpenBlock` and `CloseBlock` are synthesized from indentation changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Keywords (13) ──────────────────────────────────────────────────
    And,
    Continue,
    Def,
    Elif,
    Else,
    False,
    If,
    In,
    Is,
    Not,
    Or,
    Pass,
    True,

    // ── Operators (13) ─────────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `=`
    Eq,
    /// `|`, used both as an operator and between parameter types.
    Pipe,

    // ── Delimiters (6) ─────────────────────────────────────────────────
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,

    // ── Punctuation (2) ────────────────────────────────────────────────
    /// `,`
    Comma,
    /// `:`
    Colon,

    // ── Literals and identifiers (3) ───────────────────────────────────
    /// Decimal integer literal, e.g. `42`.
    IntLiteral,
    /// Single- or double-quoted string on one line, e.g. `"//src:lib"`.
    StringLiteral,
    /// Identifier, e.g. `go_library`, `_`.
    Ident,

    // ── Trivia (4) ─────────────────────────────────────────────────────
    /// Run of spaces and tabs.
    Whitespace,
    /// Line terminator that does not change indentation.
    Newline,
    /// Line comment (`# ...`).
    Comment,
    /// Triple-quoted string used as a docstring (`"""..."""`).
    DocComment,

    // ── Blocks (2) ─────────────────────────────────────────────────────
    /// Line terminator followed by a deeper-indented line.
    OpenBlock,
    /// End of an indented block. Carries the line terminator for the first
    /// level closed on a line and is zero-width otherwise.
    CloseBlock,

    // ── Special (2) ────────────────────────────────────────────────────
    /// End of file.
    Eof,
    /// Invalid/unexpected input. Used for error recovery.
    Error,
}

impl TokenKind {
    /// Whether this token carries no grammatical meaning.
    ///
    /// `Newline` is not trivia: it terminates statements outside brackets.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment
        )
    }
}

/// Look up a keyword from its string representation.
///
/// Keywords are case-sensitive: `True` is a keyword, `true` is an identifier.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s {
        "and" => Some(TokenKind::And),
        "continue" => Some(TokenKind::Continue),
        "def" => Some(TokenKind::Def),
        "elif" => Some(TokenKind::Elif),
        "else" => Some(TokenKind::Else),
        "False" => Some(TokenKind::False),
        "if" => Some(TokenKind::If),
        "in" => Some(TokenKind::In),
        "is" => Some(TokenKind::Is),
        "not" => Some(TokenKind::Not),
        "or" => Some(TokenKind::Or),
        "pass" => Some(TokenKind::Pass),
        "True" => Some(TokenKind::True),
        _ => None,
    }
}

/// Decode the text of an `IntLiteral` token.
///
/// Returns `None` if the text is not all ASCII digits or overflows `i64`.
pub fn int_value(text: &str) -> Option<i64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Decode the text of a `StringLiteral` token, quotes included.
///
/// Handles `\n`, `\t`, `\r`, `\0`, `\\`, `\'` and `\"`. Any other escape is
/// kept verbatim with its backslash. Returns `None` if the text is not a
/// closed quoted string.
pub fn unescape_string(text: &str) -> Option<String> {
    let quote = text.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    if text.len() < 2 || !text.ends_with(quote) {
        return None;
    }
    let body = &text[1..text.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            // The closing quote was escaped, so the literal never closed.
            None => return None,
        }
    }
    Some(out)
}
