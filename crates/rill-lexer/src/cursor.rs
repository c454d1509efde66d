//! Character cursor over Rill source text.
//!
//! Tracks a byte offset while stepping through the source one character at a
//! time. The lexer drives it with single-character lookahead (plus one extra
//! character for `0x`, `::`, and `${`) and slices token text back out of the
//! source by the offsets it recorded.

pub struct Cursor<'src> {
    source: &'src str,
    chars: std::str::Chars<'src>,
    pos: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.chars(),
            pos: 0,
        }
    }

    /// The current character, without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// The character after the current one.
    pub fn peek_next(&self) -> Option<char> {
        let mut lookahead = self.chars.clone();
        lookahead.next();
        lookahead.next()
    }

    /// Consume the current character. Does nothing at end of input.
    pub fn advance(&mut self) {
        if let Some(c) = self.chars.next() {
            self.pos += c.len_utf8() as u32;
        }
    }

    /// Current byte offset into the source.
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Consume characters while the predicate holds.
    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// The source text between two byte offsets recorded via [`Cursor::pos`].
    pub fn slice(&self, start: u32, end: u32) -> &'src str {
        &self.source[start as usize..end as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_consume() {
        let cursor = Cursor::new("$x");
        assert_eq!(cursor.peek(), Some('$'));
        assert_eq!(cursor.peek(), Some('$'));
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn lookahead_sees_the_second_colon() {
        let mut cursor = Cursor::new("a::b");
        cursor.advance();
        assert_eq!(cursor.peek(), Some(':'));
        assert_eq!(cursor.peek_next(), Some(':'));
    }

    #[test]
    fn pos_counts_bytes_not_chars() {
        let mut cursor = Cursor::new("'héllo'");
        cursor.advance();
        cursor.advance();
        cursor.advance();
        // ' + h + the two-byte é
        assert_eq!(cursor.pos(), 4);
    }

    #[test]
    fn eat_while_stops_at_the_delimiter() {
        let mut cursor = Cursor::new("notify {");
        cursor.eat_while(|c| c.is_ascii_alphanumeric());
        assert_eq!(cursor.pos(), 6);
        assert_eq!(cursor.peek(), Some(' '));
    }

    #[test]
    fn slice_recovers_token_text() {
        let mut cursor = Cursor::new("$var = 1");
        let start = cursor.pos();
        cursor.advance();
        cursor.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        assert_eq!(cursor.slice(start, cursor.pos()), "$var");
    }

    #[test]
    fn advance_past_the_end_is_harmless() {
        let mut cursor = Cursor::new("1");
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.pos(), 1);
        assert_eq!(cursor.peek(), None);
    }
}
