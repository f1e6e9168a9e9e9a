//! Definitions of errors that can occur while reading or evaluating code.

use std::fmt::Display;

use miette::Diagnostic;
use thiserror::Error;

/// A location is a point of a source text, used to report reader errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub file: Option<String>,
}

impl Location {
    pub fn new(file: Option<String>) -> Self {
        Self {
            line: 1,
            column: 0,
            file,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:", file)?;
        }
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Runtime errors abort the current evaluation and are handed back to the caller. Values are
/// kept by their printed form, so errors stay cheap to clone and free of reference cycles.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("unbound identifier '{0}'")]
    #[diagnostic(code(blueprint::unbound_identifier))]
    UnboundIdentifier(String),

    #[error("cannot set! '{0}', it is not bound")]
    #[diagnostic(
        code(blueprint::unbound_assignment),
        help("use define to create a new binding")
    )]
    UnboundAssignment(String),

    #[error("can't get \"{0}\" of '{1}'")]
    #[diagnostic(code(blueprint::empty_sequence_access))]
    EmptySequenceAccess(&'static str, String),

    #[error("'{0}' isn't applicable")]
    #[diagnostic(code(blueprint::not_applicable))]
    NotApplicable(String),

    #[error("wrong arity, expected {0} arguments, got {1}")]
    #[diagnostic(code(blueprint::arity_mismatch))]
    ArityMismatch(usize, usize),

    #[error("'{0}' cannot be applied to {1}")]
    #[diagnostic(code(blueprint::type_mismatch))]
    TypeMismatch(String, String),

    #[error("'{0}' needs at least one argument")]
    #[diagnostic(code(blueprint::missing_arguments))]
    MissingArguments(String),

    #[error("division by zero")]
    #[diagnostic(code(blueprint::division_by_zero))]
    DivisionByZero,

    #[error("integer overflow in '{0}'")]
    #[diagnostic(code(blueprint::integer_overflow))]
    IntegerOverflow(String),

    #[error("malformed {0} expression: {1}")]
    #[diagnostic(code(blueprint::malformed_form))]
    MalformedForm(&'static str, String),

    #[error("expected an identifier but got '{0}'")]
    #[diagnostic(code(blueprint::expected_identifier))]
    ExpectedIdentifier(String),

    #[error("expected a list but got '{0}'")]
    #[diagnostic(code(blueprint::expected_list))]
    ExpectedList(String),

    #[error("expected a string but got '{0}'")]
    #[diagnostic(code(blueprint::expected_string))]
    ExpectedString(String),

    #[error("maximum recursion depth of {0} calls exceeded")]
    #[diagnostic(
        code(blueprint::recursion_limit),
        help("check that the recursion has a reachable base case")
    )]
    RecursionLimit(usize),

    #[error("unmatched parenthesis at {0}")]
    #[diagnostic(code(blueprint::reader))]
    UnmatchedParenthesis(Location),

    #[error("unclosed parenthesis at {0}")]
    #[diagnostic(code(blueprint::reader))]
    UnclosedParenthesis(Location),

    #[error("unclosed string at {0}")]
    #[diagnostic(code(blueprint::reader))]
    UnclosedString(Location),

    #[error("unmatched quote at {0}")]
    #[diagnostic(code(blueprint::reader))]
    UnmatchedQuote(Location),

    #[error("invalid escape at {0}")]
    #[diagnostic(code(blueprint::reader))]
    InvalidEscape(Location),

    #[error("cannot read '{0}': {1}")]
    #[diagnostic(code(blueprint::io))]
    Io(String, String),
}

pub type Result<T, E = RuntimeError> = std::result::Result<T, E>;
