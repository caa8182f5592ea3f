//! SyntaxKind enum for the Please CST.
//!
//! This is a superset of `TokenKind` (mapped to SCREAMING_SNAKE_CASE) plus
//! composite node kinds for CST nodes produced by the parser.

use please_common::token::TokenKind;

/// Every kind of syntax element in the Please CST.
///
/// Token kinds (leaves) are mapped 1:1 from [`TokenKind`]. Composite node kinds
/// are one per grammar rule. The first two values are sentinels used by the
/// event-based parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // ── Sentinels ──────────────────────────────────────────────────────
    /// Placeholder kind for an opened node that has not been closed yet.
    TOMBSTONE = 0,
    /// Wrapper for tokens that couldn't be parsed.
    ERROR_NODE = 1,

    // ── Keywords (13) ──────────────────────────────────────────────────
    AND_KW,
    CONTINUE_KW,
    DEF_KW,
    ELIF_KW,
    ELSE_KW,
    FALSE_KW,
    IF_KW,
    IN_KW,
    IS_KW,
    NOT_KW,
    OR_KW,
    PASS_KW,
    TRUE_KW,

    // ── Operators (13) ─────────────────────────────────────────────────
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    EQ_EQ,
    NOT_EQ,
    LT,
    GT,
    LT_EQ,
    GT_EQ,
    EQ,
    PIPE,

    // ── Delimiters and punctuation (8) ─────────────────────────────────
    L_PAREN,
    R_PAREN,
    L_BRACKET,
    R_BRACKET,
    L_BRACE,
    R_BRACE,
    COMMA,
    COLON,

    // ── Literals and identifiers (3) ───────────────────────────────────
    INT_LITERAL,
    STRING_LITERAL,
    IDENT,

    // ── Trivia and line structure (6) ──────────────────────────────────
    WHITESPACE,
    NEWLINE,
    COMMENT,
    DOC_COMMENT,
    OPEN_BLOCK,
    CLOSE_BLOCK,

    // ── Special (2) ────────────────────────────────────────────────────
    EOF,
    /// Lexer error token (unrecognized input).
    ERROR,

    // ── Composite nodes ────────────────────────────────────────────────
    /// Root node spanning the whole file.
    FILE,
    /// One statement: wraps a definition, conditional, assignment,
    /// expression, `pass` or `continue`.
    STATEMENT,
    /// `def name(params):` followed by an indented body.
    FUNCTION_DEF,
    /// `name: type | type = default` inside a `def` parameter list.
    FUNCTION_DEF_PARAM,
    /// A parameter type name.
    TYPE,
    /// `if`/`elif`/`else` chain. Branches are direct children.
    IF_STATEMENT,
    /// `a, b = expr`
    ASSIGNMENT,
    /// Operand, optional operator chain and optional `if ... else ...`.
    EXPRESSION,
    /// Binary operator, including the two-word `is not` and `not in`.
    OPERATOR,
    /// Primary operand of an expression.
    VALUE,
    /// `name(args)`
    FUNCTION_CALL,
    /// `expr` or `name = expr` inside a call.
    FUNCTION_CALL_PARAM,
    /// `[a, b]`
    LIST_LIT,
    /// `{"k": v}`
    DICT_LIT,
    /// `True` or `False`.
    BOOL_LIT,
}

impl SyntaxKind {
    /// Whether the parser's lookahead always skips this kind.
    ///
    /// Newlines are not included: they terminate statements outside brackets.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::WHITESPACE | SyntaxKind::COMMENT | SyntaxKind::DOC_COMMENT
        )
    }

    /// Human-readable name used in "expected ..." diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            SyntaxKind::AND_KW => "`and`",
            SyntaxKind::CONTINUE_KW => "`continue`",
            SyntaxKind::DEF_KW => "`def`",
            SyntaxKind::ELIF_KW => "`elif`",
            SyntaxKind::ELSE_KW => "`else`",
            SyntaxKind::FALSE_KW => "`False`",
            SyntaxKind::IF_KW => "`if`",
            SyntaxKind::IN_KW => "`in`",
            SyntaxKind::IS_KW => "`is`",
            SyntaxKind::NOT_KW => "`not`",
            SyntaxKind::OR_KW => "`or`",
            SyntaxKind::PASS_KW => "`pass`",
            SyntaxKind::TRUE_KW => "`True`",
            SyntaxKind::PLUS => "`+`",
            SyntaxKind::MINUS => "`-`",
            SyntaxKind::STAR => "`*`",
            SyntaxKind::SLASH => "`/`",
            SyntaxKind::PERCENT => "`%`",
            SyntaxKind::EQ_EQ => "`==`",
            SyntaxKind::NOT_EQ => "`!=`",
            SyntaxKind::LT => "`<`",
            SyntaxKind::GT => "`>`",
            SyntaxKind::LT_EQ => "`<=`",
            SyntaxKind::GT_EQ => "`>=`",
            SyntaxKind::EQ => "`=`",
            SyntaxKind::PIPE => "`|`",
            SyntaxKind::L_PAREN => "`(`",
            SyntaxKind::R_PAREN => "`)`",
            SyntaxKind::L_BRACKET => "`[`",
            SyntaxKind::R_BRACKET => "`]`",
            SyntaxKind::L_BRACE => "`{`",
            SyntaxKind::R_BRACE => "`}`",
            SyntaxKind::COMMA => "`,`",
            SyntaxKind::COLON => "`:`",
            SyntaxKind::INT_LITERAL => "integer",
            SyntaxKind::STRING_LITERAL => "string",
            SyntaxKind::IDENT => "identifier",
            SyntaxKind::NEWLINE => "newline",
            SyntaxKind::OPEN_BLOCK => "indented block",
            SyntaxKind::CLOSE_BLOCK => "dedent",
            SyntaxKind::EOF => "end of file",
            _ => "token",
        }
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            // Keywords
            TokenKind::And => SyntaxKind::AND_KW,
            TokenKind::Continue => SyntaxKind::CONTINUE_KW,
            TokenKind::Def => SyntaxKind::DEF_KW,
            TokenKind::Elif => SyntaxKind::ELIF_KW,
            TokenKind::Else => SyntaxKind::ELSE_KW,
            TokenKind::False => SyntaxKind::FALSE_KW,
            TokenKind::If => SyntaxKind::IF_KW,
            TokenKind::In => SyntaxKind::IN_KW,
            TokenKind::Is => SyntaxKind::IS_KW,
            TokenKind::Not => SyntaxKind::NOT_KW,
            TokenKind::Or => SyntaxKind::OR_KW,
            TokenKind::Pass => SyntaxKind::PASS_KW,
            TokenKind::True => SyntaxKind::TRUE_KW,
            // Operators
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Minus => SyntaxKind::MINUS,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Slash => SyntaxKind::SLASH,
            TokenKind::Percent => SyntaxKind::PERCENT,
            TokenKind::EqEq => SyntaxKind::EQ_EQ,
            TokenKind::NotEq => SyntaxKind::NOT_EQ,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::LtEq => SyntaxKind::LT_EQ,
            TokenKind::GtEq => SyntaxKind::GT_EQ,
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::Pipe => SyntaxKind::PIPE,
            // Delimiters and punctuation
            TokenKind::LParen => SyntaxKind::L_PAREN,
            TokenKind::RParen => SyntaxKind::R_PAREN,
            TokenKind::LBracket => SyntaxKind::L_BRACKET,
            TokenKind::RBracket => SyntaxKind::R_BRACKET,
            TokenKind::LBrace => SyntaxKind::L_BRACE,
            TokenKind::RBrace => SyntaxKind::R_BRACE,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Colon => SyntaxKind::COLON,
            // Literals and identifiers
            TokenKind::IntLiteral => SyntaxKind::INT_LITERAL,
            TokenKind::StringLiteral => SyntaxKind::STRING_LITERAL,
            TokenKind::Ident => SyntaxKind::IDENT,
            // Trivia and line structure
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Comment => SyntaxKind::COMMENT,
            TokenKind::DocComment => SyntaxKind::DOC_COMMENT,
            TokenKind::OpenBlock => SyntaxKind::OPEN_BLOCK,
            TokenKind::CloseBlock => SyntaxKind::CLOSE_BLOCK,
            // Special
            TokenKind::Eof => SyntaxKind::EOF,
            TokenKind::Error => SyntaxKind::ERROR,
        }
    }
}
