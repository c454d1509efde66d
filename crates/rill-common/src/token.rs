use serde::Serialize;

use crate::span::Span;

/// A token produced by the Rill lexer.
///
/// Tokens carry no payloads; consumers slice the token's text out of the
/// source string by span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Create a new token from a kind and byte offsets.
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}

/// Every kind of token in the Rill language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    // ── Keywords ───────────────────────────────────────────────────────
    And,
    Class,
    Define,
    Else,
    Elsif,
    If,
    Or,
    Undef,

    // ── Literals and names ─────────────────────────────────────────────
    /// Decimal or hexadecimal integer literal.
    Int,
    /// Floating-point literal.
    Float,
    /// Single-quoted string literal, span covers the quotes.
    SingleString,
    /// `/regex/` literal, span covers the slashes.
    Regex,
    /// Bare word: lowercase identifier, possibly `::`-qualified.
    Word,
    /// Capitalised identifier, used by type annotations (`String`, `Integer`).
    TypeName,
    /// `$name` variable reference, span covers the sigil.
    Var,

    // ── Double-quoted string machinery ─────────────────────────────────
    /// Opening `"` of a double-quoted string.
    StringStart,
    /// A run of literal text inside a double-quoted string.
    StringText,
    /// `${` opening an interpolated expression.
    InterpStart,
    /// `}` closing an interpolated expression.
    InterpEnd,
    /// Closing `"` of a double-quoted string.
    StringEnd,

    // ── Operators ──────────────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `=~`
    MatchOp,
    /// `!~`
    NotMatchOp,
    /// `!`
    Bang,
    /// `=>`
    FatArrow,

    // ── Delimiters ─────────────────────────────────────────────────────
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,

    // ── Special ────────────────────────────────────────────────────────
    /// An unrecognised character (error recovery).
    Error,
    /// End of input. Always the final token.
    Eof,
}

/// Map an identifier to its keyword kind, if it is one.
pub fn keyword_from_str(ident: &str) -> Option<TokenKind> {
    match ident {
        "and" => Some(TokenKind::And),
        "class" => Some(TokenKind::Class),
        "define" => Some(TokenKind::Define),
        "else" => Some(TokenKind::Else),
        "elsif" => Some(TokenKind::Elsif),
        "if" => Some(TokenKind::If),
        "or" => Some(TokenKind::Or),
        "undef" => Some(TokenKind::Undef),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_new_builds_span() {
        let tok = Token::new(TokenKind::Int, 2, 4);
        assert_eq!(tok.kind, TokenKind::Int);
        assert_eq!(tok.span, Span::new(2, 4));
    }

    #[test]
    fn keywords_resolve() {
        assert_eq!(keyword_from_str("define"), Some(TokenKind::Define));
        assert_eq!(keyword_from_str("undef"), Some(TokenKind::Undef));
        assert_eq!(keyword_from_str("notify"), None);
    }
}
