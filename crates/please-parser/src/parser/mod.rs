//! Event-based parser for Please BUILD files.
//!
//! The parser consumes a token stream and produces events (Open/Close/Advance)
//! that are later converted into a rowan green tree. This decouples parsing
//! logic from tree construction.
//!
//! # Architecture
//!
//! The parser uses matklad's event-based approach (as in rust-analyzer):
//!
//! 1. Parse functions call `open()` to start a node, `advance()` to consume
//!    tokens, and `close()` to finish a node with its actual kind.
//! 2. Events are collected into a flat `Vec<Event>`.
//! 3. `build_tree()` converts events into a rowan `GreenNode`.
//!
//! # Backtracking
//!
//! The grammar uses ordered alternation (`assignment | expression | ...`).
//! A [`Checkpoint`] records the token position, the event and error counts
//! and the depth counters. [`Parser::rollback`] truncates everything back to
//! it, so a failed attempt leaves nothing in the tree. Rule functions return
//! `false` on failure and may leave partial events behind; the nearest
//! enclosing [`Parser::attempt`] (ultimately the statement rule) discards them.
//!
//! Failed expectations are not errors by themselves. Each one is noted with
//! its position, and when a whole statement fails the expectations at the
//! furthest position become the diagnostic ("expected `)` or `,`").
//!
//! # Newline Significance
//!
//! Newlines end statements UNLESS the parser is inside delimiters (`()`,
//! `[]`, `{}`). The `current()` and `nth()` methods transparently skip
//! insignificant newlines. Whitespace and comments are always skipped by
//! lookahead. The `advance()` method emits Advance events for all skipped
//! trivia tokens so they appear in the CST.

pub(crate) mod expressions;
pub(crate) mod statements;

use please_common::span::Span;
use please_common::token::{Token, TokenKind};

use crate::error::ParseError;
use crate::options::ParseOptions;
use crate::syntax_kind::SyntaxKind;

/// A parser event. Events are collected during parsing and later converted
/// into a rowan green tree by [`Parser::build_tree`].
#[derive(Debug)]
enum Event {
    /// Start a new CST node. The `kind` is initially TOMBSTONE and gets
    /// patched by `close()` with the real node kind.
    Open { kind: SyntaxKind },
    /// Finish the current CST node.
    Close,
    /// Consume the next token.
    Advance,
}

/// An opaque marker for a started but not-yet-closed CST node.
/// Contains the index into the events list where the corresponding
/// `Event::Open` was placed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkOpened {
    index: usize,
}

/// Saved parser state for backtracking.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    pos: usize,
    events: usize,
    errors: usize,
    paren_depth: u32,
    bracket_depth: u32,
    brace_depth: u32,
    block_depth: i32,
}

/// Expectations that failed at the furthest token reached so far.
#[derive(Debug, Default)]
struct Failure {
    /// Token index where the current statement starts.
    start: usize,
    /// Token index of the failure.
    pos: usize,
    expected: Vec<&'static str>,
    /// Set when the depth guard tripped during the current statement.
    too_deep: Option<usize>,
}

/// Event-based parser for BUILD file source code.
///
/// # Usage
///
/// ```ignore
/// let tokens = please_lexer::Lexer::tokenize(source);
/// let mut parser = Parser::new(tokens, source, &ParseOptions::default());
/// statements::parse_file(&mut parser);
/// let (green, errors) = parser.build_tree();
/// ```
pub(crate) struct Parser<'src> {
    /// All tokens from the lexer (including Eof).
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    /// Collected parser events.
    events: Vec<Event>,
    /// Original source text (for extracting token text via spans).
    source: &'src str,
    /// Parenthesis nesting depth for newline significance.
    paren_depth: u32,
    /// Bracket nesting depth for newline significance.
    bracket_depth: u32,
    /// Brace nesting depth for newline significance.
    brace_depth: u32,
    /// `OPEN_BLOCK` tokens consumed minus `CLOSE_BLOCK` tokens consumed.
    block_depth: i32,
    /// Collected parse errors.
    errors: Vec<ParseError>,
    /// Current rule nesting, bounded by `max_depth`.
    depth: u32,
    max_depth: u32,
    require_colon: bool,
    failure: Failure,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source text.
    pub(crate) fn new(tokens: Vec<Token>, source: &'src str, options: &ParseOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            source,
            paren_depth: 0,
            bracket_depth: 0,
            brace_depth: 0,
            block_depth: 0,
            errors: Vec::new(),
            depth: 0,
            max_depth: options.max_depth,
            require_colon: options.require_colon_before_block,
            failure: Failure::default(),
        }
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    /// Returns the SyntaxKind of the current significant token.
    ///
    /// Skips trivia and insignificant newlines (newlines inside delimiters).
    /// Returns `SyntaxKind::EOF` if past the end of the token stream.
    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Returns the SyntaxKind of the Nth significant token ahead.
    ///
    /// `nth(0)` is equivalent to `current()`. Skips trivia and
    /// insignificant newlines. Returns `SyntaxKind::EOF` if past end.
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        let mut pos = self.pos;
        let mut remaining = n;
        while pos < self.tokens.len() {
            let token_kind = self.tokens[pos].kind;
            if self.should_skip(token_kind) {
                pos += 1;
                continue;
            }
            if remaining == 0 {
                return SyntaxKind::from(token_kind);
            }
            remaining -= 1;
            pos += 1;
        }
        SyntaxKind::EOF
    }

    /// Returns the span of the current significant token.
    pub(crate) fn current_span(&self) -> Span {
        self.span_at(self.skip_to_significant(self.pos))
    }

    /// Check if the current significant token matches the given kind.
    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Check if the current significant token matches any of the given kinds.
    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    /// Kind of the very next token, trivia included.
    pub(crate) fn raw_current(&self) -> SyntaxKind {
        self.raw_nth(0)
    }

    /// Kind of the token `n` positions ahead, trivia included.
    pub(crate) fn raw_nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map_or(SyntaxKind::EOF, |token| SyntaxKind::from(token.kind))
    }

    /// Whether `colon_before_block` requires the colon.
    pub(crate) fn require_colon(&self) -> bool {
        self.require_colon
    }

    /// Number of indented blocks the parser is currently inside.
    pub(crate) fn block_depth(&self) -> i32 {
        self.block_depth
    }

    // ── Mutation: node management ──────────────────────────────────────

    /// Start a new CST node. Returns a marker that must be passed to
    /// `close()` to finish the node.
    ///
    /// Pending trivia is flushed into the parent first, so every node starts
    /// at a significant token. The node kind is initially `TOMBSTONE` and
    /// gets patched by `close()`.
    pub(crate) fn open(&mut self) -> MarkOpened {
        // The root has no parent to hand trivia to.
        if !self.events.is_empty() {
            self.skip_trivia();
        }
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
        });
        mark
    }

    /// Close a CST node, patching its Open event with the actual kind.
    pub(crate) fn close(&mut self, m: MarkOpened, kind: SyntaxKind) {
        if let Event::Open { kind: slot_kind } = &mut self.events[m.index] {
            *slot_kind = kind;
        }
        self.events.push(Event::Close);
    }

    // ── Mutation: token consumption ────────────────────────────────────

    /// Consume the current token, emitting Advance events for all skipped
    /// trivia tokens and then for the significant token itself.
    pub(crate) fn advance(&mut self) {
        self.skip_trivia();
        self.bump_raw();
    }

    /// Consume exactly the next token, trivia or not.
    ///
    /// Updates delimiter depth when consuming `(`, `)`, `[`, `]`, `{`, `}`
    /// and block depth for `OPEN_BLOCK`/`CLOSE_BLOCK`.
    pub(crate) fn bump_raw(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            let kind = token.kind;
            self.update_depths(kind);
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    /// If the current token matches `kind`, consume it and return true.
    /// Otherwise note the expectation and return false. No error is
    /// recorded; the enclosing statement reports the furthest failure.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.note_expected(kind.describe());
            false
        }
    }

    /// If the current token matches `kind`, consume it and return true.
    /// Otherwise, return false (nothing noted).
    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume significant newlines (statement separators).
    pub(crate) fn eat_newlines(&mut self) {
        while self.at(SyntaxKind::NEWLINE) {
            self.advance();
        }
    }

    // ── Backtracking ───────────────────────────────────────────────────

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            events: self.events.len(),
            errors: self.errors.len(),
            paren_depth: self.paren_depth,
            bracket_depth: self.bracket_depth,
            brace_depth: self.brace_depth,
            block_depth: self.block_depth,
        }
    }

    /// Discard every token, event and error since `cp`.
    pub(crate) fn rollback(&mut self, cp: Checkpoint) {
        self.pos = cp.pos;
        self.events.truncate(cp.events);
        self.errors.truncate(cp.errors);
        self.paren_depth = cp.paren_depth;
        self.bracket_depth = cp.bracket_depth;
        self.brace_depth = cp.brace_depth;
        self.block_depth = cp.block_depth;
    }

    /// Run `rule`, rolling back everything it did if it returns false.
    pub(crate) fn attempt(&mut self, name: &str, rule: impl FnOnce(&mut Self) -> bool) -> bool {
        let cp = self.checkpoint();
        if rule(self) {
            return true;
        }
        log::trace!("{name} failed at token {}, rolling back to {}", self.pos, cp.pos);
        self.rollback(cp);
        false
    }

    /// Enter a nested rule. Returns false (and notes the failure) once
    /// `max_depth` is reached; callers must then fail without calling `exit`.
    pub(crate) fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            let pos = self.skip_to_significant(self.pos);
            self.failure.too_deep.get_or_insert(pos);
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // ── Error reporting ────────────────────────────────────────────────

    /// Note that `what` was expected at the current token.
    pub(crate) fn note_expected(&mut self, what: &'static str) {
        let pos = self.skip_to_significant(self.pos);
        if pos > self.failure.pos {
            self.failure.pos = pos;
            self.failure.expected.clear();
        }
        if pos == self.failure.pos && !self.failure.expected.contains(&what) {
            self.failure.expected.push(what);
        }
    }

    /// Start failure tracking for a statement at the current token.
    ///
    /// Expectations noted beyond this point by an earlier, rolled-back
    /// attempt (a malformed `elif` header, say) are kept.
    pub(crate) fn reset_failure(&mut self) {
        let start = self.skip_to_significant(self.pos);
        if self.failure.pos > start {
            self.failure.start = start;
            self.failure.too_deep = None;
            return;
        }
        self.failure = Failure {
            start,
            pos: start,
            expected: Vec::new(),
            too_deep: None,
        };
    }

    /// Turn the furthest noted failure into a diagnostic.
    ///
    /// A failure on the first token of the statement is reported as
    /// "expected statement". Nothing is reported when the failure sits on a
    /// lexer `ERROR` token, since the lexer has already reported it.
    pub(crate) fn report_failure(&mut self) {
        if let Some(pos) = self.failure.too_deep.take() {
            self.errors
                .push(ParseError::new("nesting too deep", self.span_at(pos)));
            return;
        }
        let pos = self.failure.pos;
        if self
            .tokens
            .get(pos)
            .is_some_and(|token| token.kind == TokenKind::Error)
        {
            return;
        }
        let expected = if pos == self.failure.start {
            &[][..]
        } else {
            self.failure.expected.as_slice()
        };
        let message = match expected {
            [] => "expected statement".to_string(),
            [only] => format!("expected {only}"),
            [init @ .., last] => format!("expected {} or {last}", init.join(", ")),
        };
        self.errors.push(ParseError::new(message, self.span_at(pos)));
    }

    /// Record a parse error at the current position.
    pub(crate) fn error(&mut self, message: &str) {
        let span = self.current_span();
        self.errors.push(ParseError::new(message, span));
    }

    /// Record a parse error at the current position that points back at
    /// `related_span` as well.
    pub(crate) fn error_with_related(&mut self, message: &str, related_span: Span, related_msg: &str) {
        let span = self.current_span();
        self.errors
            .push(ParseError::new(message, span).related_to(related_span, related_msg));
    }

    // ── Newline significance ───────────────────────────────────────────

    /// Whether newlines are currently insignificant (inside delimiters).
    fn is_newline_insignificant(&self) -> bool {
        self.paren_depth > 0 || self.bracket_depth > 0 || self.brace_depth > 0
    }

    /// Forget unbalanced delimiters swallowed by error recovery.
    pub(crate) fn reset_delimiters(&mut self) {
        self.paren_depth = 0;
        self.bracket_depth = 0;
        self.brace_depth = 0;
    }

    /// Whether a token should be skipped by lookahead methods.
    fn should_skip(&self, kind: TokenKind) -> bool {
        match kind {
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment => true,
            TokenKind::Newline => self.is_newline_insignificant(),
            _ => false,
        }
    }

    /// Find the position of the next significant token starting from `pos`.
    fn skip_to_significant(&self, mut pos: usize) -> usize {
        while pos < self.tokens.len() && self.should_skip(self.tokens[pos].kind) {
            pos += 1;
        }
        pos
    }

    /// Emit Advance events for trivia up to the next significant token.
    fn skip_trivia(&mut self) {
        while self.pos < self.tokens.len() && self.should_skip(self.tokens[self.pos].kind) {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    fn span_at(&self, pos: usize) -> Span {
        match self.tokens.get(pos) {
            Some(token) => token.span,
            None => Span::empty_at(self.source.len() as u32),
        }
    }

    /// Update delimiter and block depth when consuming a token.
    fn update_depths(&mut self, kind: TokenKind) {
        match kind {
            TokenKind::LParen => self.paren_depth += 1,
            TokenKind::RParen => self.paren_depth = self.paren_depth.saturating_sub(1),
            TokenKind::LBracket => self.bracket_depth += 1,
            TokenKind::RBracket => self.bracket_depth = self.bracket_depth.saturating_sub(1),
            TokenKind::LBrace => self.brace_depth += 1,
            TokenKind::RBrace => self.brace_depth = self.brace_depth.saturating_sub(1),
            TokenKind::OpenBlock => self.block_depth += 1,
            TokenKind::CloseBlock => self.block_depth -= 1,
            _ => {}
        }
    }

    // ── Tree building ──────────────────────────────────────────────────

    /// Convert collected events into a rowan `GreenNode` and errors.
    ///
    /// This consumes the parser. Rolled-back attempts have already been
    /// truncated away, so events map 1:1 onto the tree: every Advance takes
    /// the next token in order.
    pub(crate) fn build_tree(self) -> (rowan::GreenNode, Vec<ParseError>) {
        let mut builder = rowan::GreenNodeBuilder::new();
        let mut tokens = self.tokens.iter();

        for event in &self.events {
            match event {
                Event::Open { kind } => {
                    builder.start_node(rowan::SyntaxKind(*kind as u16));
                }
                Event::Close => builder.finish_node(),
                Event::Advance => {
                    if let Some(token) = tokens.next() {
                        let kind = SyntaxKind::from(token.kind);
                        builder.token(rowan::SyntaxKind(kind as u16), token.text(self.source));
                    }
                }
            }
        }

        (builder.finish(), self.errors)
    }
}
