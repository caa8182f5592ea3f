//! Diagnostics produced while lexing and parsing a BUILD file.

use std::fmt;

use please_common::error::LexError;
use please_common::span::Span;

/// One problem in the input. Every diagnostic has error severity; lexical
/// and syntax errors share this type once they leave [`crate::parse`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    /// Where the problem was detected. Zero-width at end of input.
    pub span: Span,
    /// A second location that explains the first, such as the line that
    /// opened an unterminated block.
    pub related: Option<Related>,
}

/// Secondary location attached to a [`ParseError`].
#[derive(Debug, Clone, PartialEq)]
pub struct Related {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            related: None,
        }
    }

    /// Attach a secondary location.
    pub fn related_to(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related = Some(Related {
            message: message.into(),
            span,
        });
        self
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::new(err.kind.to_string(), err.span)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use please_common::error::LexErrorKind;

    #[test]
    fn plain_error_has_no_related_location() {
        let err = ParseError::new("expected expression", Span::new(5, 10));
        assert_eq!(err.to_string(), "expected expression");
        assert!(err.related.is_none());
    }

    #[test]
    fn related_location_is_attached() {
        let err = ParseError::new("expected end of block", Span::empty_at(50))
            .related_to(Span::new(10, 11), "block opened here");
        assert_eq!(
            err.related,
            Some(Related {
                message: "block opened here".to_string(),
                span: Span::new(10, 11),
            })
        );
    }

    #[test]
    fn lex_error_keeps_message_and_span() {
        let lex = LexError::new(LexErrorKind::UnterminatedString, Span::new(4, 8));
        let err = ParseError::from(lex);
        assert_eq!(err.to_string(), "unterminated string literal");
        assert_eq!(err.span, Span::new(4, 8));
    }
}
