//! Shared types for the Please BUILD-file parser.
//!
//! Spans and line lookup, the token vocabulary produced by the lexer, and
//! lexical error types. Everything here is plain data with no dependency on
//! the tree library.

pub mod error;
pub mod span;
pub mod token;
