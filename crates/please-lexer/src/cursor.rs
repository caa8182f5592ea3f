/// Forward-only reader over BUILD source.
///
/// Positions are byte offsets, the unit every `Span` uses. The cursor never
/// looks back; multi-character tokens (`"""`, `\r\n`, `==`) are recognised
/// by matching on the unconsumed rest of the input.
pub struct Cursor<'src> {
    source: &'src str,
    rest: &'src str,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
        }
    }

    /// The next character, if any.
    pub fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Whether the next character ends a physical line (or the input does).
    pub fn at_line_end(&self) -> bool {
        matches!(self.peek(), Some('\n' | '\r') | None)
    }

    /// Whether the unconsumed input starts with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.rest.starts_with(prefix)
    }

    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(c)
    }

    /// Consume `expected` if it is next.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `prefix` if the input starts with it.
    pub fn eat_str(&mut self, prefix: &str) -> bool {
        match self.rest.strip_prefix(prefix) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    /// Consume one line break: `\n`, `\r\n` or a lone `\r`.
    pub fn eat_line_break(&mut self) -> bool {
        self.eat_str("\r\n") || self.eat('\n') || self.eat('\r')
    }

    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        let len = self
            .rest
            .find(|c| !predicate(c))
            .unwrap_or(self.rest.len());
        self.rest = &self.rest[len..];
    }

    /// Skip to the next line break without consuming it.
    pub fn eat_to_line_end(&mut self) {
        self.eat_while(|c| c != '\n' && c != '\r');
    }

    /// Byte offset of the next character.
    pub fn pos(&self) -> u32 {
        (self.source.len() - self.rest.len()) as u32
    }

    pub fn is_eof(&self) -> bool {
        self.rest.is_empty()
    }

    /// Source text from `start` up to the current position.
    pub fn text_since(&self, start: u32) -> &'src str {
        let end = self.source.len() - self.rest.len();
        self.source.get(start as usize..end).unwrap_or("")
    }
}
