//! The scanner.
//!
//! The [`Lexer`] produces one [`Token`] per call, dispatching on the first
//! character. Literal values and identifiers are resolved while scanning, so
//! tokens carry operands instead of lexemes. Failures become error tokens
//! whose payload is an error recorded in the [`Context`].

use std::path::Path;
use std::sync::Arc;

use inf_core::{CompileError, Context, IntKind, Integer, Location, Operand};
use tracing::trace;

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind};

/// Lexer for inf source code.
///
/// After each call to [`next_token`](Self::next_token),
/// [`location`](Self::location) covers the text of the returned token.
pub struct Lexer<'src> {
    /// Low-level character cursor.
    cursor: Cursor<'src>,
    /// Extent of the most recent token.
    location: Location,
    /// Kind of the most recent token, if any.
    previous: Option<TokenKind>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str, path: Option<Arc<Path>>) -> Self {
        Self {
            cursor: Cursor::new(source),
            location: Location::new(path),
            previous: None,
        }
    }

    /// Location of the most recently scanned token.
    #[inline]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Consume and return the next token.
    ///
    /// Once the input is exhausted every call returns an end token.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn next_token(&mut self, ctx: &mut Context) -> Token {
        let token = self.scan_token(ctx);
        self.previous = Some(token.kind);
        trace!(kind = %token.kind, payload = %token.payload, at = %self.location, "token");
        token
    }

    // =========================================
    // Internal: Token scanning
    // =========================================

    fn scan_token(&mut self, ctx: &mut Context) -> Token {
        self.skip_whitespace();
        self.location.step();

        let Some(c) = self.cursor.peek() else {
            return Token::end();
        };

        match c {
            c if c.is_ascii_digit() => self.scan_number(ctx, false),
            '-' if self.starts_negative_literal() => self.scan_number(ctx, true),
            c if is_ident_start(c) => self.scan_label(ctx),
            _ => self.scan_operator(ctx),
        }
    }

    fn skip_whitespace(&mut self) {
        let start = self.cursor.offset();
        self.cursor.eat_while(char::is_whitespace);
        let skipped = self.cursor.slice_from(start);
        self.location.step();
        self.location.advance(skipped);
    }

    /// Mark the text consumed since `start` as part of the current token.
    fn consume(&mut self, start: usize) {
        let text = self.cursor.slice_from(start);
        self.location.advance(text);
    }

    /// Record `error` at the current token and return an error token.
    fn make_error(&mut self, ctx: &mut Context, error: CompileError) -> Token {
        Token::new(TokenKind::Error, ctx.fail_at(error, &self.location))
    }

    // =========================================
    // Scanning: Numbers
    // =========================================

    /// Whether a `-` here belongs to an integer literal.
    fn starts_negative_literal(&self) -> bool {
        let digit_follows = self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit());
        digit_follows && !self.previous.is_some_and(TokenKind::ends_operand)
    }

    /// Scan digits, an optional suffix, and range-check the value.
    fn scan_number(&mut self, ctx: &mut Context, negative: bool) -> Token {
        let start = self.cursor.offset();
        if negative {
            self.cursor.advance();
        }
        let digits = self.cursor.eat_while(|c| c.is_ascii_digit());
        let suffix = self.scan_suffix();
        self.consume(start);

        // Digits only fail to parse when they overflow.
        let magnitude = digits.parse::<u128>().ok().and_then(|m| i128::try_from(m).ok());
        let value = magnitude.map(|m| if negative { -m } else { m });

        let literal = match suffix {
            Some(kind) => match value.and_then(|v| Integer::new(kind, v)) {
                Some(literal) => literal,
                None => return self.make_error(ctx, CompileError::IntegerOutOfBounds),
            },
            None => {
                let inferred = value.and_then(|v| {
                    Integer::new(IntKind::I64, v).or_else(|| Integer::new(IntKind::U64, v))
                });
                match inferred {
                    Some(literal) => literal,
                    None => return self.make_error(ctx, CompileError::IntegerOverflow),
                }
            }
        };

        Token::new(TokenKind::Integer(literal.kind()), Operand::from(literal))
    }

    /// Consume a width/sign suffix if one follows.
    ///
    /// A suffix only counts when no identifier character follows it, so
    /// `12u8x` scans as `12` followed by the label `u8x`.
    fn scan_suffix(&mut self) -> Option<IntKind> {
        let kind = IntKind::ALL.into_iter().find(|kind| {
            let suffix = kind.suffix();
            self.cursor.check_str(suffix)
                && !self.cursor.peek_nth(suffix.len()).is_some_and(is_ident_continue)
        })?;
        self.cursor.advance_bytes(kind.suffix().len());
        Some(kind)
    }

    // =========================================
    // Scanning: Labels
    // =========================================

    fn scan_label(&mut self, ctx: &mut Context) -> Token {
        let start = self.cursor.offset();
        let text = self.cursor.eat_while(is_ident_continue);
        self.consume(start);
        Token::new(TokenKind::Label, Operand::Label(ctx.intern_label(text)))
    }

    // =========================================
    // Scanning: Operators
    // =========================================

    fn scan_operator(&mut self, ctx: &mut Context) -> Token {
        let start = self.cursor.offset();
        let Some(c) = self.cursor.advance() else {
            return Token::end();
        };
        self.consume(start);

        match TokenKind::punctuation(c) {
            Some(kind) => Token::bare(kind),
            None => self.make_error(ctx, CompileError::UnexpectedCharacter { ch: c }),
        }
    }
}
