//! Error and diagnostic types for the minic toolchain.
//!
//! Two families live here:
//!
//! - **Diagnostics** ([`LexicalError`], [`SyntaxError`], [`SemanticError`])
//!   describe problems in the analyzed source. Stages collect them into
//!   vectors and keep going; they are results, not failures.
//! - **[`Error`]** is for the tool itself failing: unreadable files, a
//!   socket that will not bind, a request body that is not JSON.
//!
//! Every diagnostic renders as `Line <n>: <message>`, which is also the text
//! sent to clients of the analysis endpoint.
//!
//! # Examples
//!
//! ```rust
//! use minic_syntax::error::{Error, Result, SyntaxError, error};
//!
//! let diag = SyntaxError::new(1, "expected ';' after declaration");
//! assert_eq!(diag.to_string(), "Line 1: expected ';' after declaration");
//!
//! fn read_port(s: &str) -> Result<u16> {
//!     s.parse().map_err(|_| Error::new(format!("Invalid port: {}", s)))
//! }
//!
//! fn refuse() -> Result<()> {
//!     error("refused")
//! }
//! assert!(read_port("http").is_err());
//! assert!(refuse().is_err());
//! ```

use std::fmt;

/// A character the lexer could not place in any token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalError {
    pub line: usize,
    pub col: usize,
    pub message: String,
}

impl LexicalError {
    pub fn new(line: usize, col: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            col,
            message: message.into(),
        }
    }
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// Input that does not match the grammar at some position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// Categorical identifier for semantic diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticErrorKind {
    /// The name is already bound in the innermost open scope.
    DuplicateDeclaration,
    /// No open scope binds the name at the point of use.
    UndefinedReference,
}

/// Grammatically valid input that breaks a declaration or scoping rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticError {
    pub line: usize,
    pub message: String,
    /// The offending name.
    pub symbol: String,
    pub kind: SemanticErrorKind,
}

impl SemanticError {
    pub fn duplicate_declaration(name: &str, line: usize) -> Self {
        Self {
            line,
            message: format!("duplicate declaration of {}", name),
            symbol: name.to_string(),
            kind: SemanticErrorKind::DuplicateDeclaration,
        }
    }

    pub fn undefined_reference(name: &str, line: usize) -> Self {
        Self {
            line,
            message: format!("undefined or out-of-scope reference to {}", name),
            symbol: name.to_string(),
            kind: SemanticErrorKind::UndefinedReference,
        }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// An error raised by the tooling around the analyzer.
///
/// # Fields
///
/// - `msg`: Human-readable error description
/// - `line`: Optional 1-based line number in source file
/// - `col`: Optional 1-based column number in source file
#[derive(Debug, Clone)]
pub struct Error {
    /// Human-readable error message
    pub msg: String,

    /// Optional line number in source file (1-based)
    pub line: Option<usize>,

    /// Optional column number in source file (1-based)
    pub col: Option<usize>,
}

impl Error {
    /// Creates a new error with the given message and no location.
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            line: None,
            col: None,
        }
    }

    /// Creates a new error with the given message and source location.
    pub fn with_span(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
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

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::new(s)
    }
}
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::new(s)
    }
}
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::new(e.to_string())
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.line() > 0 {
            Error::with_span(format!("Invalid JSON: {}", e), e.line(), e.column())
        } else {
            Error::new(format!("Invalid JSON: {}", e))
        }
    }
}

/// A specialized `Result` type for minic tooling operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::new(msg))`.
pub fn error<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::new(msg))
}
