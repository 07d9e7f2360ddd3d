//! Precedence-climbing parser fused with lowering.
//!
//! There is no syntax tree: every reduction calls straight into the
//! arithmetic compiler, so the operand returned by [`Parser::parse`] is
//! already a folded literal, a register holding the emitted result, or the
//! error that stopped the expression.

use std::path::Path;
use std::sync::Arc;

use inf_compiler::{
    compile_add, compile_div, compile_mod, compile_mul, compile_neg, compile_sub,
};
use inf_core::{CompileError, Context, Location, Operand};
use tracing::debug;

use super::rules::{Infix, Precedence, Prefix, rule_of};
use crate::lexer::{Lexer, Token, TokenKind};

/// Parser over one source view, lowering into a borrowed [`Context`].
///
/// Usage: [`set_source`](Self::set_source), [`prime`](Self::prime), then
/// [`parse`](Self::parse) until [`done`](Self::done).
pub struct Parser<'src, 'ctx> {
    ctx: &'ctx mut Context,
    lexer: Lexer<'src>,
    /// Lookahead token.
    current: Token,
    /// Location of the lookahead token.
    location: Location,
}

impl<'src, 'ctx> Parser<'src, 'ctx> {
    /// Create a parser with an empty source.
    pub fn new(ctx: &'ctx mut Context) -> Self {
        let lexer = Lexer::new("", None);
        let location = lexer.location().clone();
        Self {
            ctx,
            lexer,
            current: Token::end(),
            location,
        }
    }

    /// Replace the source. `path` only appears in diagnostic locations.
    pub fn set_source(&mut self, source: &'src str, path: Option<Arc<Path>>) {
        self.lexer = Lexer::new(source, path);
        self.location = self.lexer.location().clone();
        self.current = Token::end();
    }

    /// Fetch the first token.
    pub fn prime(&mut self) {
        self.advance();
        self.skip_empty_statements();
    }

    /// True once the end of input is the lookahead.
    pub fn done(&self) -> bool {
        self.current.kind == TokenKind::End
    }

    /// The current lookahead token.
    pub fn current(&self) -> Token {
        self.current
    }

    pub fn context(&self) -> &Context {
        &*self.ctx
    }

    /// Parse one expression statement.
    ///
    /// A trailing `;` is consumed. After a failure the rest of the statement
    /// is skipped so the next call starts at the following one.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse(&mut self) -> Operand {
        let result = self.parse_precedence(Precedence::Assignment);
        self.ctx.set_focus(None);

        if let Operand::Error(tag) = result {
            debug!(%tag, at = %self.location, "recovering from failed statement");
            self.synchronize();
        } else if self.current.kind == TokenKind::Semicolon {
            self.advance();
        }
        self.skip_empty_statements();
        result
    }

    // =========================================
    // Token handling
    // =========================================

    fn advance(&mut self) {
        self.current = self.lexer.next_token(self.ctx);
        self.location = self.lexer.location().clone();
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn skip_empty_statements(&mut self) {
        while self.check(TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// Skip past the next `;`, or to the end of input.
    fn synchronize(&mut self) {
        loop {
            match self.current.kind {
                TokenKind::End => return,
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                _ => self.advance(),
            }
        }
    }

    // =========================================
    // Reduction
    // =========================================

    /// Parse an expression whose operators bind at least as tightly as `min`.
    fn parse_precedence(&mut self, min: Precedence) -> Operand {
        let Some(prefix) = rule_of(self.current.kind).prefix else {
            return self.ctx.fail_at(CompileError::ExpectedExpression, &self.location);
        };

        let mut left = self.prefix(prefix);
        if left.is_error() {
            return left;
        }

        loop {
            let rule = rule_of(self.current.kind);
            if rule.precedence < min {
                break;
            }
            let Some(infix) = rule.infix else {
                break;
            };
            left = self.infix(infix, rule.precedence, left);
            if left.is_error() {
                return left;
            }
        }
        left
    }

    fn prefix(&mut self, prefix: Prefix) -> Operand {
        match prefix {
            Prefix::Operand | Prefix::Error => {
                let payload = self.current.payload;
                self.advance();
                payload
            }
            Prefix::Grouping => self.grouping(),
            Prefix::Unary => self.unary(),
        }
    }

    fn infix(&mut self, infix: Infix, precedence: Precedence, left: Operand) -> Operand {
        match infix {
            Infix::Binary => self.binary(precedence, left),
        }
    }

    fn grouping(&mut self) -> Operand {
        self.advance();
        let inner = self.parse_precedence(Precedence::Assignment);
        if inner.is_error() {
            return inner;
        }
        if !self.check(TokenKind::RightParen) {
            return self.ctx.fail_at(CompileError::ExpectedRightParen, &self.location);
        }
        self.advance();
        inner
    }

    fn unary(&mut self) -> Operand {
        let op = self.current.kind;
        let op_location = self.location.clone();
        self.advance();

        let operand = self.parse_precedence(Precedence::Unary);
        if operand.is_error() {
            return operand;
        }

        self.ctx.set_focus(Some(op_location));
        match op {
            TokenKind::Minus => compile_neg(self.ctx, operand),
            _ => self.ctx.fail(CompileError::UnexpectedUnop),
        }
    }

    /// Left-associative: the right side binds one level tighter.
    fn binary(&mut self, precedence: Precedence, left: Operand) -> Operand {
        let op = self.current.kind;
        let op_location = self.location.clone();
        self.advance();

        let right = self.parse_precedence(precedence.next());

        self.ctx.set_focus(Some(op_location));
        let ctx = &mut *self.ctx;
        match op {
            TokenKind::Plus => compile_add(ctx, left, right),
            TokenKind::Minus => compile_sub(ctx, left, right),
            TokenKind::Star => compile_mul(ctx, left, right),
            TokenKind::Slash => compile_div(ctx, left, right),
            TokenKind::Percent => compile_mod(ctx, left, right),
            _ => ctx.fail(CompileError::UnexpectedBinop),
        }
    }
}
