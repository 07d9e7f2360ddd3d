//! Token types for the inf lexer.

use inf_core::{IntKind, Operand};
use std::fmt;

/// A token: its kind plus the operand it carries.
///
/// Integer tokens carry their literal, label tokens their interned label and
/// error tokens the tag of the recorded error. Every other token carries
/// [`Operand::Empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    /// The type of token.
    pub kind: TokenKind,
    /// The value of the token, if it has one.
    pub payload: Operand,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, payload: Operand) -> Self {
        Self { kind, payload }
    }

    /// A token with no payload.
    #[inline]
    pub fn bare(kind: TokenKind) -> Self {
        Self::new(kind, Operand::Empty)
    }

    #[inline]
    pub fn end() -> Self {
        Self::bare(TokenKind::End)
    }
}

/// All token types of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input.
    End,
    /// A lexical error; the payload is the error operand.
    Error,
    /// Integer literal of the given kind: `42`, `300u32`, `-1i8`
    Integer(IntKind),
    /// Identifier
    Label,

    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `;`
    Semicolon,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
}

impl TokenKind {
    /// Whether a token of this kind can be the last token of an expression.
    ///
    /// A `-` directly before a digit only starts a negative literal when the
    /// previous token cannot end an expression.
    pub fn ends_operand(self) -> bool {
        matches!(
            self,
            TokenKind::Integer(_) | TokenKind::Label | TokenKind::RightParen | TokenKind::Error
        )
    }

    /// Single-character punctuation for `ch`.
    pub fn punctuation(ch: char) -> Option<TokenKind> {
        Some(match ch {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::End => "end of input",
            TokenKind::Error => "error",
            TokenKind::Integer(kind) => return write!(f, "{kind} literal"),
            TokenKind::Label => "label",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Semicolon => ";",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
        };
        f.write_str(s)
    }
}
