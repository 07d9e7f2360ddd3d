//! Precedence ladder and per-token parse rules.

use crate::lexer::TokenKind;

/// Binding strength, lowest first.
///
/// Levels without rules are reserved for future grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    None,
    Assignment,
    Or,
    And,
    Equality,
    Comparison,
    Term,
    Factor,
    Unary,
    Call,
    Primary,
}

impl Precedence {
    /// The next stronger level; `Primary` is its own successor.
    pub fn next(self) -> Precedence {
        use Precedence::*;
        match self {
            None => Assignment,
            Assignment => Or,
            Or => And,
            And => Equality,
            Equality => Comparison,
            Comparison => Term,
            Term => Factor,
            Factor => Unary,
            Unary => Call,
            Call | Primary => Primary,
        }
    }
}

/// What to do when a token starts an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    /// Integer literal or label: the payload is the operand.
    Operand,
    /// A recorded lexical error: the payload is the result.
    Error,
    /// `( expression )`
    Grouping,
    /// Unary operator.
    Unary,
}

/// What to do when a token continues an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Infix {
    /// Left-associative binary operator.
    Binary,
}

/// Parse rule of one token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub prefix: Option<Prefix>,
    pub infix: Option<Infix>,
    /// Binding precedence of the infix handler (`None` when there is none).
    pub precedence: Precedence,
}

impl Rule {
    const fn new(prefix: Option<Prefix>, infix: Option<Infix>, precedence: Precedence) -> Self {
        Self {
            prefix,
            infix,
            precedence,
        }
    }
}

/// Look up the rule for a token kind.
#[rustfmt::skip]
pub fn rule_of(kind: TokenKind) -> Rule {
    use Precedence as P;
    match kind {
        TokenKind::End        => Rule::new(None,                   None,                P::None),
        TokenKind::Error      => Rule::new(Some(Prefix::Error),    None,                P::None),
        TokenKind::Integer(_) => Rule::new(Some(Prefix::Operand),  None,                P::None),
        TokenKind::Label      => Rule::new(Some(Prefix::Operand),  None,                P::None),
        TokenKind::LeftParen  => Rule::new(Some(Prefix::Grouping), None,                P::None),
        TokenKind::RightParen => Rule::new(None,                   None,                P::None),
        TokenKind::Semicolon  => Rule::new(None,                   None,                P::None),
        TokenKind::Plus       => Rule::new(None,                   Some(Infix::Binary), P::Term),
        TokenKind::Minus      => Rule::new(Some(Prefix::Unary),    Some(Infix::Binary), P::Term),
        TokenKind::Star       => Rule::new(None,                   Some(Infix::Binary), P::Factor),
        TokenKind::Slash      => Rule::new(None,                   Some(Infix::Binary), P::Factor),
        TokenKind::Percent    => Rule::new(None,                   Some(Infix::Binary), P::Factor),
    }
}
