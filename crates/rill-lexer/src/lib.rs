//! Rill lexer -- tokenizer for the Rill configuration language.

mod cursor;

use cursor::Cursor;
use rill_common::token::{keyword_from_str, Token, TokenKind};

/// Tracks whether the lexer is inside a double-quoted string.
#[derive(Debug, Clone, Copy, PartialEq)]
enum StringMode {
    /// Not inside a string.
    None,
    /// Inside a double-quoted string (after StringStart emitted).
    Double,
}

/// The Rill lexer. Converts source text into a stream of tokens.
///
/// Wraps a [`Cursor`] for byte-level iteration and implements
/// `Iterator<Item = Token>` so callers can consume tokens lazily or collect
/// them into a `Vec`.
///
/// Double-quoted strings are lexed as a token sequence (`StringStart`,
/// `StringText`/`Var`/`InterpStart`..`InterpEnd`, `StringEnd`) driven by a
/// string mode and a brace-depth stack for `${...}` interpolations.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    /// Whether we have already emitted the `Eof` token.
    emitted_eof: bool,
    /// Tracks whether we are inside a string and need to lex content next.
    string_mode: StringMode,
    /// Brace depth for each open `${...}` interpolation, innermost last.
    interp_depths: Vec<u32>,
    /// Kind of the last non-trivia token, for regex-vs-division decisions.
    prev_kind: Option<TokenKind>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
            string_mode: StringMode::None,
            interp_depths: Vec::new(),
            prev_kind: None,
        }
    }

    /// Convenience: tokenize the entire source into a `Vec<Token>`.
    ///
    /// The returned vector includes the final `Eof` token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    /// Produce the next token from the source (normal mode, not inside a string).
    fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            // ── Single-character delimiters ───────────────────────────────
            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            '[' => self.single_char_token(TokenKind::LBracket, start),
            ']' => self.single_char_token(TokenKind::RBracket, start),
            '{' => {
                if let Some(depth) = self.interp_depths.last_mut() {
                    *depth += 1;
                }
                self.single_char_token(TokenKind::LBrace, start)
            }
            '}' => self.lex_rbrace(start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            ':' => self.single_char_token(TokenKind::Colon, start),
            ';' => self.single_char_token(TokenKind::Semicolon, start),

            // ── Multi-character operators ─────────────────────────────────
            '=' => self.lex_eq(start),
            '!' => self.lex_bang(start),
            '<' => self.lex_lt(start),
            '>' => self.lex_gt(start),
            '+' => self.single_char_token(TokenKind::Plus, start),
            '-' => self.single_char_token(TokenKind::Minus, start),
            '*' => self.single_char_token(TokenKind::Star, start),
            '/' => self.lex_slash(start),

            // ── Literals, variables, names ────────────────────────────────
            '0'..='9' => self.lex_number(start),
            '\'' => self.lex_single_string(start),
            '"' => self.lex_string_start(start),
            '$' => self.lex_var(start),

            c if c.is_ascii_lowercase() || c == '_' => self.lex_word(start),
            c if c.is_ascii_uppercase() => self.lex_type_name(start),

            // ── Unknown character (error recovery) ────────────────────────
            _ => {
                self.cursor.advance();
                Token::new(TokenKind::Error, start, self.cursor.pos())
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    /// Skip whitespace and `#` line comments.
    fn skip_trivia(&mut self) {
        loop {
            self.cursor
                .eat_while(|c| c == ' ' || c == '\t' || c == '\r' || c == '\n');
            if self.cursor.peek() == Some('#') {
                self.cursor.eat_while(|c| c != '\n');
            } else {
                break;
            }
        }
    }

    /// Consume one character and return a token of the given kind.
    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    // ── Operator lexing ──────────────────────────────────────────────────

    /// `}` -- either closes an interpolation or is a plain right brace.
    fn lex_rbrace(&mut self, start: u32) -> Token {
        self.cursor.advance();
        match self.interp_depths.last_mut() {
            Some(0) => {
                self.interp_depths.pop();
                self.string_mode = StringMode::Double;
                Token::new(TokenKind::InterpEnd, start, self.cursor.pos())
            }
            Some(depth) => {
                *depth -= 1;
                Token::new(TokenKind::RBrace, start, self.cursor.pos())
            }
            None => Token::new(TokenKind::RBrace, start, self.cursor.pos()),
        }
    }

    /// `=` -> `Eq`, `==` -> `EqEq`, `=>` -> `FatArrow`, `=~` -> `MatchOp`
    fn lex_eq(&mut self, start: u32) -> Token {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('=') => self.single_char_token(TokenKind::EqEq, start),
            Some('>') => self.single_char_token(TokenKind::FatArrow, start),
            Some('~') => self.single_char_token(TokenKind::MatchOp, start),
            _ => Token::new(TokenKind::Eq, start, self.cursor.pos()),
        }
    }

    /// `!` -> `Bang`, `!=` -> `NotEq`, `!~` -> `NotMatchOp`
    fn lex_bang(&mut self, start: u32) -> Token {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('=') => self.single_char_token(TokenKind::NotEq, start),
            Some('~') => self.single_char_token(TokenKind::NotMatchOp, start),
            _ => Token::new(TokenKind::Bang, start, self.cursor.pos()),
        }
    }

    /// `<` -> `Lt`, `<=` -> `LtEq`
    fn lex_lt(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.single_char_token(TokenKind::LtEq, start)
        } else {
            Token::new(TokenKind::Lt, start, self.cursor.pos())
        }
    }

    /// `>` -> `Gt`, `>=` -> `GtEq`
    fn lex_gt(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.single_char_token(TokenKind::GtEq, start)
        } else {
            Token::new(TokenKind::Gt, start, self.cursor.pos())
        }
    }

    /// `/` -- division after an operand, otherwise a `/regex/` literal.
    fn lex_slash(&mut self, start: u32) -> Token {
        if self.prev_is_operand() {
            return self.single_char_token(TokenKind::Slash, start);
        }
        self.cursor.advance(); // opening '/'
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    // Unterminated regex
                    return Token::new(TokenKind::Error, start, self.cursor.pos());
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('/') => {
                    self.cursor.advance();
                    return Token::new(TokenKind::Regex, start, self.cursor.pos());
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Whether the previous token can end an operand, making `/` a division.
    fn prev_is_operand(&self) -> bool {
        matches!(
            self.prev_kind,
            Some(
                TokenKind::Int
                    | TokenKind::Float
                    | TokenKind::SingleString
                    | TokenKind::StringEnd
                    | TokenKind::Regex
                    | TokenKind::Word
                    | TokenKind::TypeName
                    | TokenKind::Var
                    | TokenKind::RParen
                    | TokenKind::RBracket
            )
        )
    }

    // ── Literal lexing ───────────────────────────────────────────────────

    /// Decimal integer, `0x` hexadecimal integer, or float.
    fn lex_number(&mut self, start: u32) -> Token {
        if self.cursor.peek() == Some('0')
            && matches!(self.cursor.peek_next(), Some('x') | Some('X'))
        {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_hexdigit());
            return Token::new(TokenKind::Int, start, self.cursor.pos());
        }
        self.cursor.eat_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance(); // '.'
            self.cursor.eat_while(|c| c.is_ascii_digit());
            Token::new(TokenKind::Float, start, self.cursor.pos())
        } else {
            Token::new(TokenKind::Int, start, self.cursor.pos())
        }
    }

    /// `'...'` with `\'` and `\\` escapes. Span covers the quotes.
    fn lex_single_string(&mut self, start: u32) -> Token {
        self.cursor.advance(); // opening quote
        loop {
            match self.cursor.peek() {
                None => return Token::new(TokenKind::Error, start, self.cursor.pos()),
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('\'') => {
                    self.cursor.advance();
                    return Token::new(TokenKind::SingleString, start, self.cursor.pos());
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Opening `"` -- emits `StringStart` and switches to string mode.
    fn lex_string_start(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.string_mode = StringMode::Double;
        Token::new(TokenKind::StringStart, start, self.cursor.pos())
    }

    /// `$name` variable reference. A bare `$` is an error token.
    fn lex_var(&mut self, start: u32) -> Token {
        self.cursor.advance(); // '$'
        if self
            .cursor
            .peek()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        {
            self.cursor
                .eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
            Token::new(TokenKind::Var, start, self.cursor.pos())
        } else {
            Token::new(TokenKind::Error, start, self.cursor.pos())
        }
    }

    /// Bare word (possibly `::`-qualified) or keyword.
    fn lex_word(&mut self, start: u32) -> Token {
        self.cursor
            .eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        while self.cursor.peek() == Some(':') && self.cursor.peek_next() == Some(':') {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor
                .eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        }
        let text = self.cursor.slice(start, self.cursor.pos());
        let kind = keyword_from_str(text).unwrap_or(TokenKind::Word);
        Token::new(kind, start, self.cursor.pos())
    }

    /// Capitalised identifier, used by type annotations.
    fn lex_type_name(&mut self, start: u32) -> Token {
        self.cursor
            .eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        Token::new(TokenKind::TypeName, start, self.cursor.pos())
    }

    // ── String-mode lexing ───────────────────────────────────────────────

    /// Produce the next token while inside a double-quoted string.
    fn next_string_token(&mut self) -> Token {
        let start = self.cursor.pos();
        match self.cursor.peek() {
            None => {
                // Unterminated string
                self.string_mode = StringMode::None;
                Token::new(TokenKind::Error, start, self.cursor.pos())
            }
            Some('"') => {
                self.cursor.advance();
                self.string_mode = StringMode::None;
                Token::new(TokenKind::StringEnd, start, self.cursor.pos())
            }
            Some('$') if self.cursor.peek_next() == Some('{') => {
                self.cursor.advance();
                self.cursor.advance();
                self.string_mode = StringMode::None;
                self.interp_depths.push(0);
                Token::new(TokenKind::InterpStart, start, self.cursor.pos())
            }
            Some('$')
                if self
                    .cursor
                    .peek_next()
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_') =>
            {
                self.cursor.advance(); // '$'
                self.cursor
                    .eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
                Token::new(TokenKind::Var, start, self.cursor.pos())
            }
            Some(_) => {
                // Literal text until the next quote, interpolation, or variable.
                loop {
                    match self.cursor.peek() {
                        None | Some('"') => break,
                        Some('$')
                            if matches!(self.cursor.peek_next(), Some('{'))
                                || self
                                    .cursor
                                    .peek_next()
                                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_') =>
                        {
                            break
                        }
                        Some('\\') => {
                            self.cursor.advance();
                            self.cursor.advance();
                        }
                        Some(_) => {
                            self.cursor.advance();
                        }
                    }
                }
                Token::new(TokenKind::StringText, start, self.cursor.pos())
            }
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = if self.string_mode == StringMode::Double {
            self.next_string_token()
        } else {
            self.next_token()
        };
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        self.prev_kind = Some(token.kind);
        Some(token)
    }
}
