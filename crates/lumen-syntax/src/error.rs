//! Error handling types and utilities for the Lumen toolchain.
//!
//! Every stage (lexer, parser, evaluator) reports faults through the same
//! [`Error`] struct. The [`ErrorKind`] tag tells callers which stage produced
//! the fault and lets them decide whether to recover or give up on the line.
//!
//! # Examples
//!
//! ```rust
//! use lumen_syntax::error::{Error, ErrorKind, Result, error};
//!
//! fn must_be_positive(n: i64) -> Result<i64> {
//!     if n < 0 {
//!         error(ErrorKind::Type, "number must be positive")
//!     } else {
//!         Ok(n)
//!     }
//! }
//!
//! let err = must_be_positive(-1).unwrap_err();
//! assert_eq!(err.kind, ErrorKind::Type);
//! ```

use std::fmt;

/// Which part of the pipeline raised an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unrecognised character in the source text. Recovered by the lexer.
    Lexical,
    /// The token stream does not match the grammar. No tree is produced.
    Syntax,
    /// A variable was read before anything was assigned to it.
    UndefinedVariable,
    /// A call named something that neither the symbol table nor the builtin
    /// registry knows about.
    UnknownFunction,
    /// A call named a binding that holds a plain value.
    NotCallable,
    /// A callable was found but failed while running.
    CallFailure,
    /// Operand types do not support the operation.
    Type,
    /// Division by zero.
    DivisionByZero,
    /// Integer arithmetic left the 64-bit range.
    Overflow,
    /// The tree violates an invariant the parser is supposed to uphold.
    Internal,
}

impl ErrorKind {
    /// Short human-readable name used as a prefix in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            ErrorKind::Lexical => "Lex error",
            ErrorKind::Syntax => "Syntax error",
            ErrorKind::UndefinedVariable => "Undefined variable",
            ErrorKind::UnknownFunction => "Unknown function",
            ErrorKind::NotCallable => "Not callable",
            ErrorKind::CallFailure => "Call failed",
            ErrorKind::Type => "Type error",
            ErrorKind::DivisionByZero => "Division by zero",
            ErrorKind::Overflow => "Overflow",
            ErrorKind::Internal => "Internal error",
        }
    }

    /// Faults that a call site may turn into an error-sentinel value instead of
    /// aborting the evaluation.
    pub fn is_call_fault(self) -> bool {
        matches!(
            self,
            ErrorKind::UnknownFunction | ErrorKind::NotCallable | ErrorKind::CallFailure
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// An error that occurred while lexing, parsing or evaluating a line.
///
/// # Fields
///
/// - `kind`: the stage and category of the fault
/// - `msg`: human-readable description
/// - `line`/`col`: optional 1-based source position
///
/// # Examples
///
/// ```rust
/// use lumen_syntax::{Error, ErrorKind};
///
/// let err = Error::with_span(ErrorKind::Syntax, "Unexpected token ')'", 1, 7);
/// assert_eq!(err.to_string(), "Unexpected token ')' at 1:7");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// Category of the fault
    pub kind: ErrorKind,

    /// Human-readable error message
    pub msg: String,

    /// Optional line number in the source (1-based)
    pub line: Option<usize>,

    /// Optional column number in the source (1-based)
    pub col: Option<usize>,
}

impl Error {
    /// Creates an error without source location.
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line: None,
            col: None,
        }
    }

    /// Creates an error pointing at a line and column of the input.
    pub fn with_span(kind: ErrorKind, msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line: Some(line),
            col: Some(col),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(l), Some(c)) = (self.line, self.col) {
            write!(f, "{} at {}:{}", self.msg, l, c)
        } else {
            write!(f, "{}", self.msg)
        }
    }
}

impl std::error::Error for Error {}

/// A specialized `Result` type for Lumen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::new(kind, msg))`.
pub fn error<T>(kind: ErrorKind, msg: impl Into<String>) -> Result<T> {
    Err(Error::new(kind, msg))
}

/// Shorthand for `Err(Error::with_span(kind, msg, line, col))`.
pub fn error_at<T>(kind: ErrorKind, line: usize, col: usize, msg: impl Into<String>) -> Result<T> {
    Err(Error::with_span(kind, msg, line, col))
}
