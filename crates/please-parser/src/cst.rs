//! The BUILD file tree as rowan sees it.
//!
//! The root is always a `FILE` node. Whitespace, comments and newlines are
//! leaves like any other. So are `OPEN_BLOCK`/`CLOSE_BLOCK`, which either
//! carry the line break that changed the indentation or are empty, so
//! concatenating the leaves gives back the source. Malformed
//! statements sit under `ERROR_NODE`s rather than being dropped.

use crate::syntax_kind::SyntaxKind;

/// Ties [`SyntaxKind`] to rowan's untyped `u16` kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PleaseLanguage {}

impl rowan::Language for PleaseLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::BOOL_LIT as u16);
        // Safety: SyntaxKind is #[repr(u16)] with contiguous discriminants
        // from TOMBSTONE to BOOL_LIT, and the bound was checked above.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

/// A node such as `STATEMENT` or `FUNCTION_CALL`, with its absolute range.
pub type SyntaxNode = rowan::SyntaxNode<PleaseLanguage>;

/// A leaf holding source text, trivia included.
pub type SyntaxToken = rowan::SyntaxToken<PleaseLanguage>;

/// What [`SyntaxNode::children_with_tokens`] yields.
pub type SyntaxElement = rowan::SyntaxElement<PleaseLanguage>;

#[cfg(test)]
mod tests {
    use rowan::Language;

    use super::*;

    #[test]
    fn kinds_survive_the_raw_conversion() {
        for kind in [SyntaxKind::TOMBSTONE, SyntaxKind::FILE, SyntaxKind::BOOL_LIT] {
            let raw = PleaseLanguage::kind_to_raw(kind);
            assert_eq!(PleaseLanguage::kind_from_raw(raw), kind);
        }
    }
}
