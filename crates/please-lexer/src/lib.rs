// Please lexer -- tokenizer for Please BUILD files.

mod cursor;

use std::collections::VecDeque;

use cursor::Cursor;
use please_common::error::{LexError, LexErrorKind};
use please_common::span::Span;
use please_common::token::{keyword_from_str, Token, TokenKind};

/// Columns a tab advances to (the next multiple of this width).
const TAB_WIDTH: u32 = 8;

/// The Please lexer. Converts source text into a stream of tokens.
///
/// Every byte of the input ends up in exactly one token, trivia included.
/// Indentation is tracked with a stack of widths: a line break followed by a
/// deeper line is emitted as `OpenBlock`, a line break followed by a
/// shallower line as one `CloseBlock` per level left. Inside `()`, `[]` and
/// `{}` line breaks are plain `Newline` tokens.
///
/// Implements `Iterator<Item = Token>`; the last item is always `Eof`.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    source: &'src str,
    /// Whether we have already queued the `Eof` token.
    emitted_eof: bool,
    /// Tokens to hand out before resuming normal lexing.
    pending: VecDeque<Token>,
    /// Indentation widths of the open blocks. The first entry is the base
    /// level of the file and is never popped.
    indent_stack: Vec<u32>,
    /// Nesting depth of `()`, `[]` and `{}` combined.
    bracket_depth: u32,
    /// Last code line found by [`logical_line_indent`], reused while the
    /// cursor has not reached it so runs of blank lines are scanned once.
    next_code_line: Option<LineIndent>,
    /// Set once a scan found only blank and comment lines up to EOF.
    no_code_left: bool,
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        let first = logical_line_indent(source, 0);
        Self {
            cursor: Cursor::new(source),
            source,
            emitted_eof: false,
            pending: VecDeque::new(),
            indent_stack: vec![first.map_or(0, |line| line.width)],
            bracket_depth: 0,
            next_code_line: first,
            no_code_left: first.is_none(),
            errors: Vec::new(),
        }
    }

    /// Convenience: tokenize the entire source into a `Vec<Token>`.
    ///
    /// The returned vector includes the final `Eof` token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    /// Tokenize the entire source and also return the lexical errors found.
    pub fn tokenize_with_errors(source: &str) -> (Vec<Token>, Vec<LexError>) {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.by_ref().collect();
        (tokens, lexer.errors)
    }

    /// Lexical errors recorded so far.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    fn next_token(&mut self) -> Token {
        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            // ── Trivia and line structure ─────────────────────────────────
            ' ' | '\t' => {
                self.cursor.eat_while(|c| c == ' ' || c == '\t');
                Token::new(TokenKind::Whitespace, start, self.cursor.pos())
            }
            '\n' | '\r' => self.lex_newline(start),
            '#' => self.lex_comment(start),

            // ── Delimiters ───────────────────────────────────────────────
            '(' => self.open_delimiter(TokenKind::LParen, start),
            '[' => self.open_delimiter(TokenKind::LBracket, start),
            '{' => self.open_delimiter(TokenKind::LBrace, start),
            ')' => self.close_delimiter(TokenKind::RParen, start),
            ']' => self.close_delimiter(TokenKind::RBracket, start),
            '}' => self.close_delimiter(TokenKind::RBrace, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            ':' => self.single_char_token(TokenKind::Colon, start),

            // ── Operators ────────────────────────────────────────────────
            '+' => self.single_char_token(TokenKind::Plus, start),
            '-' => self.single_char_token(TokenKind::Minus, start),
            '*' => self.single_char_token(TokenKind::Star, start),
            '/' => self.single_char_token(TokenKind::Slash, start),
            '%' => self.single_char_token(TokenKind::Percent, start),
            '|' => self.single_char_token(TokenKind::Pipe, start),
            '=' => self.lex_with_eq(TokenKind::Eq, TokenKind::EqEq, start),
            '<' => self.lex_with_eq(TokenKind::Lt, TokenKind::LtEq, start),
            '>' => self.lex_with_eq(TokenKind::Gt, TokenKind::GtEq, start),
            '!' => self.lex_bang(start),

            // ── Literals ─────────────────────────────────────────────────
            '0'..='9' => {
                self.cursor.eat_while(|c| c.is_ascii_digit());
                Token::new(TokenKind::IntLiteral, start, self.cursor.pos())
            }
            '"' | '\'' => self.lex_string(start, c),

            // ── Identifiers and keywords ─────────────────────────────────
            c if is_ident_start(c) => self.lex_ident(start),

            // ── Unknown character (error recovery) ───────────────────────
            _ => {
                self.cursor.advance();
                self.error_token(LexErrorKind::UnexpectedCharacter(c), start)
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    /// Consume one character and return a token of the given kind.
    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    fn open_delimiter(&mut self, kind: TokenKind, start: u32) -> Token {
        self.bracket_depth += 1;
        self.single_char_token(kind, start)
    }

    fn close_delimiter(&mut self, kind: TokenKind, start: u32) -> Token {
        self.bracket_depth = self.bracket_depth.saturating_sub(1);
        self.single_char_token(kind, start)
    }

    /// Record an error and return an `Error` token covering `start..pos`.
    fn error_token(&mut self, kind: LexErrorKind, start: u32) -> Token {
        let span = Span::new(start, self.cursor.pos());
        self.errors.push(LexError::new(kind, span));
        Token::new(TokenKind::Error, span.start, span.end)
    }

    fn current_indent(&self) -> u32 {
        self.indent_stack.last().copied().unwrap_or(0)
    }

    // ── Line structure ───────────────────────────────────────────────────

    /// The first code line starting at or after `pos`, which must be at the
    /// start of a line.
    fn code_line_after(&mut self, pos: u32) -> Option<LineIndent> {
        if self.no_code_left {
            return None;
        }
        if let Some(line) = self.next_code_line.filter(|line| line.line_start >= pos) {
            return Some(line);
        }
        let line = logical_line_indent(self.source, pos as usize);
        self.next_code_line = line;
        self.no_code_left = line.is_none();
        line
    }

    /// Lex a line terminator, deciding whether it opens or closes blocks.
    fn lex_newline(&mut self, start: u32) -> Token {
        self.cursor.eat_line_break();
        let end = self.cursor.pos();

        // Only blank or comment lines remain: EOF closes whatever is open.
        let Some(next) = self.code_line_after(end) else {
            return Token::new(TokenKind::Newline, start, end);
        };

        if self.bracket_depth > 0 {
            // A block header back at statement level means the brackets were
            // never closed. Lex it as a fresh statement.
            if !(next.opens_block && next.width <= self.current_indent()) {
                return Token::new(TokenKind::Newline, start, end);
            }
            log::debug!(
                "{} unclosed bracket(s) before the block header at offset {}",
                self.bracket_depth,
                next.code_start
            );
            self.bracket_depth = 0;
        }

        if next.width > self.current_indent() {
            self.indent_stack.push(next.width);
            return Token::new(TokenKind::OpenBlock, start, end);
        }

        let mut closed = 0;
        while self.indent_stack.len() > 1
            && next.width <= self.indent_stack[self.indent_stack.len() - 2]
        {
            self.indent_stack.pop();
            closed += 1;
        }
        if next.width < self.current_indent() {
            log::debug!(
                "inconsistent dedent to width {} (enclosing level is {})",
                next.width,
                self.current_indent()
            );
            self.errors.push(LexError::new(
                LexErrorKind::InconsistentDedent,
                Span::new(next.line_start, next.code_start),
            ));
            // Adopt the new width so the rest of the block lexes consistently.
            if let Some(top) = self.indent_stack.last_mut() {
                *top = next.width;
            }
        }

        if closed == 0 {
            return Token::new(TokenKind::Newline, start, end);
        }
        for _ in 1..closed {
            self.pending
                .push_back(Token::new(TokenKind::CloseBlock, end, end));
        }
        Token::new(TokenKind::CloseBlock, start, end)
    }

    /// `# ...` up to (not including) the line terminator.
    fn lex_comment(&mut self, start: u32) -> Token {
        self.cursor.eat_to_line_end();
        Token::new(TokenKind::Comment, start, self.cursor.pos())
    }

    // ── Operator lexing ──────────────────────────────────────────────────

    /// `=`/`<`/`>` optionally followed by `=`.
    fn lex_with_eq(&mut self, single: TokenKind, with_eq: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('=') {
            Token::new(with_eq, start, self.cursor.pos())
        } else {
            Token::new(single, start, self.cursor.pos())
        }
    }

    /// `!=` -> `NotEq`, single `!` -> `Error`
    fn lex_bang(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume '!'
        if self.cursor.eat('=') {
            Token::new(TokenKind::NotEq, start, self.cursor.pos())
        } else {
            self.error_token(LexErrorKind::UnexpectedCharacter('!'), start)
        }
    }

    // ── String lexing ────────────────────────────────────────────────────

    /// A quoted string on a single line, or a triple-quoted docstring.
    fn lex_string(&mut self, start: u32, quote: char) -> Token {
        let triple = if quote == '"' { "\"\"\"" } else { "'''" };
        if self.cursor.starts_with(triple) {
            return self.lex_doc_comment(start, triple);
        }

        self.cursor.advance(); // opening quote
        loop {
            match self.cursor.peek() {
                Some(c) if c == quote => {
                    self.cursor.advance();
                    return Token::new(TokenKind::StringLiteral, start, self.cursor.pos());
                }
                Some('\\') => {
                    self.cursor.advance();
                    if !self.cursor.at_line_end() {
                        self.cursor.advance();
                    }
                }
                Some('\n' | '\r') | None => {
                    return self.error_token(LexErrorKind::UnterminatedString, start);
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn lex_doc_comment(&mut self, start: u32, delimiter: &str) -> Token {
        self.cursor.eat_str(delimiter);
        loop {
            if self.cursor.eat_str(delimiter) {
                return Token::new(TokenKind::DocComment, start, self.cursor.pos());
            }
            match self.cursor.advance() {
                Some('\\') => {
                    self.cursor.advance();
                }
                Some(_) => {}
                None => return self.error_token(LexErrorKind::UnterminatedDocComment, start),
            }
        }
    }

    // ── Identifier / keyword lexing ──────────────────────────────────────

    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume first char
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.text_since(start);

        let kind = keyword_from_str(text).unwrap_or(TokenKind::Ident);
        Token::new(kind, start, self.cursor.pos())
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }
        if self.emitted_eof {
            return None;
        }

        if self.cursor.is_eof() {
            self.emitted_eof = true;
            let end = self.cursor.pos();
            while self.indent_stack.len() > 1 {
                self.indent_stack.pop();
                self.pending
                    .push_back(Token::new(TokenKind::CloseBlock, end, end));
            }
            self.pending.push_back(Token::new(TokenKind::Eof, end, end));
            return self.pending.pop_front();
        }

        Some(self.next_token())
    }
}

/// Indentation of the next line that holds code.
#[derive(Debug, Clone, Copy)]
struct LineIndent {
    line_start: u32,
    code_start: u32,
    width: u32,
    /// The line is a `def`/`if`/`elif`/`else` header ending in `:`.
    opens_block: bool,
}

/// Find the first line at or after `pos` that is neither blank nor
/// comment-only, and measure its indentation.
///
/// `pos` must be at the start of a line. Returns `None` if no such line
/// remains.
fn logical_line_indent(source: &str, mut pos: usize) -> Option<LineIndent> {
    let bytes = source.as_bytes();
    loop {
        let line_start = pos;
        let mut width = 0u32;
        while let Some(&b) = bytes.get(pos) {
            match b {
                b' ' => width += 1,
                b'\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
                _ => break,
            }
            pos += 1;
        }
        match bytes.get(pos) {
            None => return None,
            Some(b'\n' | b'\r') => pos += 1,
            Some(b'#') => {
                while !matches!(bytes.get(pos), None | Some(b'\n' | b'\r')) {
                    pos += 1;
                }
            }
            Some(_) => {
                let line_end = bytes[pos..]
                    .iter()
                    .position(|&b| b == b'\n' || b == b'\r')
                    .map_or(bytes.len(), |len| pos + len);
                return Some(LineIndent {
                    line_start: line_start as u32,
                    code_start: pos as u32,
                    width,
                    opens_block: source.get(pos..line_end).is_some_and(is_block_header),
                });
            }
        }
    }
}

/// Whether a line of code looks like `def ...:`, `if ...:`, `elif ...:` or
/// `else:`. A `#` ends the line for this check, even inside a string.
fn is_block_header(line: &str) -> bool {
    let keyword_len = line
        .find(|c: char| !is_ident_continue(c))
        .unwrap_or(line.len());
    let code = line.split('#').next().unwrap_or(line);
    matches!(&line[..keyword_len], "def" | "if" | "elif" | "else")
        && code.trim_end().ends_with(':')
}

/// Identifiers are ASCII: `[A-Za-z_][A-Za-z0-9_]*`.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).iter().map(|t| t.kind).collect()
    }

    /// Kinds with `Whitespace` filtered out, for readability.
    fn significant(source: &str) -> Vec<TokenKind> {
        kinds(source)
            .into_iter()
            .filter(|k| *k != TokenKind::Whitespace)
            .collect()
    }

    #[test]
    fn lex_simple_assignment() {
        assert_eq!(
            kinds("x = 1"),
            vec![
                TokenKind::Ident,
                TokenKind::Whitespace,
                TokenKind::Eq,
                TokenKind::Whitespace,
                TokenKind::IntLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_operators() {
        use TokenKind::*;
        assert_eq!(
            significant("+ - * / % == != < > <= >= = |"),
            vec![Plus, Minus, Star, Slash, Percent, EqEq, NotEq, Lt, Gt, LtEq, GtEq, Eq, Pipe, Eof]
        );
    }

    #[test]
    fn lex_keywords_and_idents() {
        use TokenKind::*;
        assert_eq!(
            significant("def if elif else and or is not in pass continue True False true _x"),
            vec![
                Def, If, Elif, Else, And, Or, Is, Not, In, Pass, Continue, True, False, Ident,
                Ident, Eof
            ]
        );
    }

    #[test]
    fn lex_block_open_and_close_at_eof() {
        use TokenKind::*;
        let tokens = Lexer::tokenize("def f():\n  pass\n");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                Def, Whitespace, Ident, LParen, RParen, Colon, OpenBlock, Whitespace, Pass,
                Newline, CloseBlock, Eof
            ]
        );
        assert_eq!(tokens[6].span, Span::new(8, 9));
        assert_eq!(tokens[10].span, Span::new(16, 16));
    }

    #[test]
    fn lex_nested_dedent_emits_one_close_per_level() {
        use TokenKind::*;
        let source = "if a:\n  if b:\n    pass\nx\n";
        let tokens = Lexer::tokenize(source);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                If, Whitespace, Ident, Colon, OpenBlock, Whitespace, If, Whitespace, Ident, Colon,
                OpenBlock, Whitespace, Pass, CloseBlock, CloseBlock, Ident, Newline, Eof
            ]
        );
        // The first close carries the line break, the second is zero-width.
        assert_eq!(tokens[13].span, Span::new(22, 23));
        assert_eq!(tokens[14].span, Span::new(23, 23));
    }

    #[test]
    fn lex_brackets_suppress_blocks() {
        use TokenKind::*;
        assert_eq!(
            significant("x = [\n  1,\n]\n"),
            vec![Ident, Eq, LBracket, Newline, IntLiteral, Comma, Newline, RBracket, Newline, Eof]
        );
    }

    #[test]
    fn lex_blank_and_comment_lines_do_not_affect_indentation() {
        use TokenKind::*;
        assert_eq!(
            kinds("if a:\n\n  # c\n  pass\n"),
            vec![
                If, Whitespace, Ident, Colon, OpenBlock, Newline, Whitespace, Comment, Newline,
                Whitespace, Pass, Newline, CloseBlock, Eof
            ]
        );
    }

    #[test]
    fn lex_tab_counts_to_next_multiple_of_eight() {
        use TokenKind::*;
        assert_eq!(
            significant("if a:\n\tx\n        y\n"),
            vec![If, Ident, Colon, OpenBlock, Ident, Newline, Ident, Newline, CloseBlock, Eof]
        );
    }

    #[test]
    fn lex_crlf_line_breaks() {
        let tokens = Lexer::tokenize("if a:\r\n  pass\r\n");
        assert_eq!(tokens[4].kind, TokenKind::OpenBlock);
        assert_eq!(tokens[4].span, Span::new(5, 7));
    }

    #[test]
    fn lex_inconsistent_dedent_is_reported_once() {
        use TokenKind::*;
        let (tokens, errors) = Lexer::tokenize_with_errors("if a:\n    x\n  y\n  z\n");
        let kinds: Vec<_> = tokens
            .iter()
            .map(|t| t.kind)
            .filter(|k| *k != Whitespace)
            .collect();
        assert_eq!(
            kinds,
            vec![If, Ident, Colon, OpenBlock, Ident, Newline, Ident, Newline, Ident, Newline, CloseBlock, Eof]
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::InconsistentDedent);
        assert_eq!(errors[0].span, Span::new(12, 14));
    }

    #[test]
    fn lex_indented_first_line_sets_base_level() {
        use TokenKind::*;
        assert_eq!(
            significant("  x = 1\n  y = 2"),
            vec![Ident, Eq, IntLiteral, Newline, Ident, Eq, IntLiteral, Eof]
        );
    }

    #[test]
    fn lex_strings() {
        use TokenKind::*;
        assert_eq!(
            significant(r#"'a' "b\"c" """#),
            vec![StringLiteral, StringLiteral, StringLiteral, Eof]
        );
    }

    #[test]
    fn lex_docstring_spans_lines() {
        let tokens = Lexer::tokenize("\"\"\"doc\nmore\"\"\"\nx");
        assert_eq!(tokens[0].kind, TokenKind::DocComment);
        assert_eq!(tokens[0].span, Span::new(0, 14));
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!(tokens[2].kind, TokenKind::Ident);
    }

    #[test]
    fn lex_unterminated_string_stops_at_line_end() {
        use TokenKind::*;
        let (tokens, errors) = Lexer::tokenize_with_errors("x = 'abc\ny");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![Ident, Whitespace, Eq, Whitespace, Error, Newline, Ident, Eof]
        );
        assert_eq!(tokens[4].span, Span::new(4, 8));
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn lex_unterminated_docstring_runs_to_eof() {
        let (tokens, errors) = Lexer::tokenize_with_errors("'''open\nstill");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].span, Span::new(0, 13));
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedDocComment);
    }

    #[test]
    fn lex_unexpected_character_becomes_error_token() {
        use TokenKind::*;
        let (tokens, errors) = Lexer::tokenize_with_errors("a $ b ! c");
        let kinds: Vec<_> = tokens
            .iter()
            .map(|t| t.kind)
            .filter(|k| *k != Whitespace)
            .collect();
        assert_eq!(kinds, vec![Ident, Error, Ident, Error, Ident, Eof]);
        assert_eq!(
            errors,
            vec![
                LexError::new(LexErrorKind::UnexpectedCharacter('$'), Span::new(2, 3)),
                LexError::new(LexErrorKind::UnexpectedCharacter('!'), Span::new(6, 7)),
            ]
        );
    }

    #[test]
    fn unclosed_bracket_ends_at_block_header() {
        use TokenKind::*;
        assert_eq!(
            significant("x = f(\ndef g():\n  pass\n"),
            vec![
                Ident, Eq, Ident, LParen, Newline, Def, Ident, LParen, RParen, Colon, OpenBlock,
                Pass, Newline, CloseBlock, Eof
            ]
        );
    }

    #[test]
    fn else_inside_brackets_stays_in_the_expression() {
        use TokenKind::*;
        assert_eq!(
            significant("x = (1 if y\nelse 2)\n"),
            vec![
                Ident, Eq, LParen, IntLiteral, If, Ident, Newline, Else, IntLiteral, RParen,
                Newline, Eof
            ]
        );
    }

    #[test]
    fn indented_block_header_inside_brackets_is_not_a_statement() {
        use TokenKind::*;
        assert_eq!(
            significant("x = [\n    def\n]\n"),
            vec![Ident, Eq, LBracket, Newline, Def, Newline, RBracket, Newline, Eof]
        );
    }

    #[test]
    fn lex_empty_source() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn tokens_reproduce_source() {
        let source = "def f(a,\n      b):\n\t\"\"\"x\"\"\"  # c\r\n\tpass\n\n# end";
        let text: String = Lexer::tokenize(source)
            .iter()
            .map(|t| t.text(source))
            .collect();
        assert_eq!(text, source);
    }
}
