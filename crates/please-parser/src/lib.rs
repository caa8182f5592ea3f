//! Please parser: recursive descent parser producing a rowan-based CST.
//!
//! This crate transforms the token stream from `please-lexer` into a lossless
//! concrete syntax tree (CST) using the `rowan` library. The CST preserves
//! all tokens including whitespace, comments and block tokens, so the text
//! of the root node is always exactly the input.
//!
//! Parsing never fails: malformed statements are wrapped in `ERROR_NODE`s
//! and reported through [`Parse::errors`].

pub mod ast;
pub mod cst;
pub mod diagnostics;
pub mod error;
pub mod options;
mod parser;
pub mod syntax_kind;

use std::fmt::Write;

use please_common::span::LineIndex;
use please_lexer::Lexer;

pub use cst::{SyntaxElement, SyntaxNode, SyntaxToken};
pub use error::ParseError;
pub use options::ParseOptions;
pub use syntax_kind::SyntaxKind;

/// Result of parsing a BUILD file.
///
/// Contains the green tree (the immutable, cheap-to-clone CST) and every
/// lexical and syntax error encountered, ordered by position.
#[derive(Debug, Clone)]
pub struct Parse {
    green: rowan::GreenNode,
    errors: Vec<ParseError>,
    line_index: LineIndex,
}

impl Parse {
    /// Build the syntax tree root from the green node.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The typed root of the tree.
    pub fn file(&self) -> ast::stmt::File {
        ast::stmt::File {
            syntax: self.syntax(),
        }
    }

    /// Lexical and syntax errors, ordered by start offset.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Whether parsing completed without errors.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors as 1-based `(line, column, message)` triples.
    pub fn diagnostics_with_positions(&self) -> Vec<(u32, u32, String)> {
        self.errors
            .iter()
            .map(|error| {
                let (line, col) = self.line_index.line_col(error.span.start);
                (line, col, error.message.clone())
            })
            .collect()
    }
}

/// Parse a BUILD file into a CST with the default options.
///
/// This is the main entry point for the parser. It lexes the source,
/// parses the token stream, and returns a [`Parse`] result containing
/// the syntax tree and any errors.
pub fn parse(source: &str) -> Parse {
    parse_with_options(source, &ParseOptions::default())
}

/// Parse a BUILD file into a CST.
pub fn parse_with_options(source: &str, options: &ParseOptions) -> Parse {
    let (tokens, lex_errors) = Lexer::tokenize_with_errors(source);
    log::trace!("lexed {} tokens from {} bytes", tokens.len(), source.len());

    let mut p = parser::Parser::new(tokens, source, options);
    parser::statements::parse_file(&mut p);
    let (green, syntax_errors) = p.build_tree();

    let mut errors: Vec<ParseError> = lex_errors.into_iter().map(ParseError::from).collect();
    errors.extend(syntax_errors);
    // Stable: a lexical error sorts before a syntax error at the same offset.
    errors.sort_by_key(|error| error.span.start);
    if !errors.is_empty() {
        log::debug!("parse finished with {} error(s)", errors.len());
    }

    Parse {
        green,
        errors,
        line_index: LineIndex::new(source),
    }
}

/// Render a tree as indented text, one element per line.
///
/// Nodes print as `KIND@start..end`, tokens as `KIND@start..end "text"`,
/// indented by two spaces per level.
pub fn debug_tree(node: &SyntaxNode) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    for event in node.preorder_with_tokens() {
        match event {
            rowan::WalkEvent::Enter(element) => {
                if !out.is_empty() {
                    out.push('\n');
                }
                let range = element.text_range();
                let start = u32::from(range.start());
                let end = u32::from(range.end());
                let indent = depth * 2;
                let _ = write!(out, "{:indent$}{:?}@{start}..{end}", "", element.kind());
                match element {
                    rowan::NodeOrToken::Node(_) => depth += 1,
                    rowan::NodeOrToken::Token(token) => {
                        let _ = write!(out, " {:?}", token.text());
                    }
                }
            }
            rowan::WalkEvent::Leave(element) => {
                if element.as_node().is_some() {
                    depth -= 1;
                }
            }
        }
    }
    out
}
