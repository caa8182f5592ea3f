use std::fmt;

use serde::Serialize;

use crate::span::Span;

/// A lexer error with location information.
///
/// The lexer never stops on bad input. Errors are collected alongside the
/// token stream and the offending text is still emitted as a token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    /// Create a new lexer error.
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The specific kind of lexer error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LexErrorKind {
    /// A character that cannot start any token.
    UnexpectedCharacter(char),
    /// A quoted string reached the end of its line without a closing quote.
    UnterminatedString,
    /// A triple-quoted docstring reached end of input without closing.
    UnterminatedDocComment,
    /// A dedent that does not return to any enclosing indentation level.
    InconsistentDedent,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCharacter(c) => write!(f, "unexpected character: {c:?}"),
            Self::UnterminatedString => write!(f, "unterminated string literal"),
            Self::UnterminatedDocComment => write!(f, "unterminated docstring"),
            Self::InconsistentDedent => {
                write!(f, "unindent does not match any outer indentation level")
            }
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for LexError {}
