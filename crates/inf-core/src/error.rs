//! Error kinds and the append-only diagnostic list.
//!
//! Nothing in the compiler raises for control flow. A failure is recorded once
//! in the [`ErrorList`] owned by the context, and the resulting [`ErrorTag`]
//! travels through the pipeline as an ordinary operand.
//!
//! ## Error Categories
//!
//! ```text
//! CompileError
//! ├── Lexical     - unexpected character
//! ├── Syntactic   - expected expression, expected ')', unexpected unop/binop
//! ├── Semantic    - operation unsupported on type, local not found
//! ├── Arithmetic  - integer overflow, integer out of bounds, division by zero
//! └── Environment - misuse of the context (no current function, frames, symbols)
//! ```

use std::fmt;

use thiserror::Error;

use crate::LocationTag;

// ============================================================================
// Error Kinds
// ============================================================================

/// Every failure the scanner, parser, compiler and evaluator can report.
///
/// The `Display` text of each variant is the message stored in the error list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CompileError {
    /// The scanner met a character that starts no token.
    #[error("unexpected character")]
    UnexpectedCharacter { ch: char },

    /// A token with no prefix rule appeared where an expression must start.
    #[error("expected expression")]
    ExpectedExpression,

    /// A parenthesized expression was not closed.
    #[error("expected ')'")]
    ExpectedRightParen,

    /// A prefix rule was bound to a token that is not a unary operator.
    #[error("unexpected unop")]
    UnexpectedUnop,

    /// An infix rule was bound to a token that is not a binary operator.
    #[error("unexpected binop")]
    UnexpectedBinop,

    /// An operand is empty or its type is not one of the integer kinds.
    #[error("operation unsupported on type")]
    UnsupportedType,

    /// A label resolves neither to a local nor to a global symbol.
    #[error("local not found")]
    LocalNotFound,

    /// The exact result does not fit the widest kind of its signedness.
    #[error("integer overflow")]
    IntegerOverflow,

    /// The exact result has a sign its kind cannot represent.
    #[error("integer out of bounds")]
    IntegerOutOfBounds,

    /// Division or modulo by a zero literal.
    #[error("division by zero")]
    DivisionByZero,

    /// An instruction was emitted with no function under construction.
    #[error("no function under construction")]
    NoActiveFunction,

    /// Pushing another frame would exceed `MaxFrameDepth`.
    #[error("frame depth exceeded")]
    FrameDepthExceeded,

    /// A symbol used as a function does not hold a function body.
    #[error("symbol is not a function")]
    NotAFunction,

    /// A function was evaluated with the wrong number of arguments.
    #[error("argument count mismatch")]
    ArgumentMismatch,
}

impl CompileError {
    /// The phase this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        use CompileError::*;
        match self {
            UnexpectedCharacter { .. } => ErrorCategory::Lexical,
            ExpectedExpression | ExpectedRightParen | UnexpectedUnop | UnexpectedBinop => {
                ErrorCategory::Syntactic
            }
            UnsupportedType | LocalNotFound => ErrorCategory::Semantic,
            IntegerOverflow | IntegerOutOfBounds | DivisionByZero => ErrorCategory::Arithmetic,
            NoActiveFunction | FrameDepthExceeded | NotAFunction | ArgumentMismatch => {
                ErrorCategory::Environment
            }
        }
    }
}

/// Broad grouping of [`CompileError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Lexical,
    Syntactic,
    Semantic,
    Arithmetic,
    Environment,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Lexical => "lexical",
            ErrorCategory::Syntactic => "syntactic",
            ErrorCategory::Semantic => "semantic",
            ErrorCategory::Arithmetic => "arithmetic",
            ErrorCategory::Environment => "environment",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Error List
// ============================================================================

/// Stable handle to an entry of the [`ErrorList`].
///
/// Tags are insertion indices, never references, so they remain valid while
/// the list keeps growing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ErrorTag(pub u32);

impl ErrorTag {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error#{}", self.0)
    }
}

/// One recorded failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong.
    pub error: CompileError,
    /// Where it went wrong, if a location was known.
    pub location: Option<LocationTag>,
}

impl Diagnostic {
    pub fn new(error: CompileError, location: Option<LocationTag>) -> Self {
        Self { error, location }
    }

    /// The stored message text.
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// Append-only log of diagnostics.
#[derive(Debug, Default)]
pub struct ErrorList {
    entries: Vec<Diagnostic>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic and return its tag.
    pub fn push(&mut self, diagnostic: Diagnostic) -> ErrorTag {
        let tag = ErrorTag(self.entries.len() as u32);
        self.entries.push(diagnostic);
        tag
    }

    pub fn get(&self, tag: ErrorTag) -> Option<&Diagnostic> {
        self.entries.get(tag.index())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all diagnostics with their tags, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (ErrorTag, &Diagnostic)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, d)| (ErrorTag(i as u32), d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_error_kinds() {
        assert_eq!(
            CompileError::UnexpectedCharacter { ch: '$' }.to_string(),
            "unexpected character"
        );
        assert_eq!(CompileError::ExpectedExpression.to_string(), "expected expression");
        assert_eq!(CompileError::ExpectedRightParen.to_string(), "expected ')'");
        assert_eq!(CompileError::UnsupportedType.to_string(), "operation unsupported on type");
        assert_eq!(CompileError::LocalNotFound.to_string(), "local not found");
        assert_eq!(CompileError::IntegerOverflow.to_string(), "integer overflow");
        assert_eq!(CompileError::IntegerOutOfBounds.to_string(), "integer out of bounds");
        assert_eq!(CompileError::DivisionByZero.to_string(), "division by zero");
    }

    #[test]
    fn categories() {
        assert_eq!(
            CompileError::UnexpectedCharacter { ch: '#' }.category(),
            ErrorCategory::Lexical
        );
        assert_eq!(CompileError::UnexpectedBinop.category(), ErrorCategory::Syntactic);
        assert_eq!(CompileError::LocalNotFound.category(), ErrorCategory::Semantic);
        assert_eq!(CompileError::DivisionByZero.category(), ErrorCategory::Arithmetic);
        assert_eq!(CompileError::NoActiveFunction.category(), ErrorCategory::Environment);
    }

    #[test]
    fn tags_are_insertion_indices() {
        let mut list = ErrorList::new();
        let a = list.push(Diagnostic::new(CompileError::IntegerOverflow, None));
        let b = list.push(Diagnostic::new(CompileError::DivisionByZero, None));

        assert_eq!(a, ErrorTag(0));
        assert_eq!(b, ErrorTag(1));
        assert_eq!(list.get(a).map(|d| d.error), Some(CompileError::IntegerOverflow));
        assert_eq!(list.iter().count(), 2);
    }
}
