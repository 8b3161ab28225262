//! Token definitions for the minic language.
//!
//! Tokens are the smallest meaningful units of minic source. The lexer never
//! emits tokens for whitespace or comments, and characters it rejects only
//! show up as [`LexicalError`](crate::error::LexicalError)s, never inside a
//! token.
//!
//! # Token Categories
//!
//! Every [`TokenKind`] belongs to exactly one [`TokenType`]:
//!
//! - **Keywords**: `int`, `if`, `while`
//! - **Identifiers**: variable names (`x`, `total_2`)
//! - **Numbers**: unsigned integer literals (`0`, `42`)
//! - **Operators**: `=`, `==`, `<`, `>`, `+`, `-`, `*`, `/`
//! - **Punctuation**: `(`, `)`, `{`, `}`, `;`
//!
//! # Examples
//!
//! ```rust
//! use minic_syntax::{Token, TokenKind, TokenType};
//!
//! let keyword = Token { kind: TokenKind::Int, line: 1, col: 1 };
//! assert_eq!(keyword.token_type(), TokenType::Keyword);
//! assert_eq!(keyword.lexeme(), "int");
//!
//! let name = Token { kind: TokenKind::Ident("x".to_string()), line: 1, col: 5 };
//! assert_eq!(name.token_type(), TokenType::Identifier);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Token types that can be produced by the minic lexer.
///
/// Identifiers and numbers carry their source text; every other variant has a
/// fixed spelling, available through [`TokenKind::lexeme`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // === Literals ===

    /// An identifier: a letter or `_` followed by letters, digits or `_`.
    Ident(String),

    /// An unsigned integer literal, kept as its source digits.
    Number(String),

    // === Keywords ===

    /// The `int` keyword, the only declarable type
    Int,

    /// The `if` keyword
    If,

    /// The `while` keyword
    While,

    // === Operators ===

    /// Assignment operator `=`
    Equal,

    /// Equality comparison operator `==`
    EqEq,

    /// Less-than comparison operator `<`
    Less,

    /// Greater-than comparison operator `>`
    Greater,

    /// Addition operator `+`
    Plus,

    /// Subtraction operator `-`
    Minus,

    /// Multiplication operator `*`
    Star,

    /// Division operator `/`
    Slash,

    // === Punctuation ===

    /// Left parenthesis `(`
    LParen,

    /// Right parenthesis `)`
    RParen,

    /// Left brace `{`
    LBrace,

    /// Right brace `}`
    RBrace,

    /// Statement terminator `;`
    Semicolon,
}

impl TokenKind {
    /// Maps a scanned word to its keyword, if it is one.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        match word {
            "int" => Some(TokenKind::Int),
            "if" => Some(TokenKind::If),
            "while" => Some(TokenKind::While),
            _ => None,
        }
    }

    /// The exact source text of this token.
    pub fn lexeme(&self) -> &str {
        match self {
            TokenKind::Ident(s) | TokenKind::Number(s) => s,
            TokenKind::Int => "int",
            TokenKind::If => "if",
            TokenKind::While => "while",
            TokenKind::Equal => "=",
            TokenKind::EqEq => "==",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Semicolon => ";",
        }
    }

    /// The display category of this token.
    pub fn token_type(&self) -> TokenType {
        match self {
            TokenKind::Ident(_) => TokenType::Identifier,
            TokenKind::Number(_) => TokenType::Number,
            TokenKind::Int | TokenKind::If | TokenKind::While => TokenType::Keyword,
            TokenKind::Equal
            | TokenKind::EqEq
            | TokenKind::Less
            | TokenKind::Greater
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash => TokenType::Operator,
            TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::LBrace
            | TokenKind::RBrace
            | TokenKind::Semicolon => TokenType::Punctuation,
        }
    }

    /// Whether a statement may begin with this token.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::If | TokenKind::While | TokenKind::LBrace | TokenKind::Ident(_)
        )
    }

    /// Human-readable description used in "expected ..., found ..." messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(s) => format!("identifier '{}'", s),
            TokenKind::Number(s) => format!("number '{}'", s),
            other => format!("'{}'", other.lexeme()),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lexeme())
    }
}

/// Display category of a token, serialized the way the analysis report
/// spells it (`"KEYWORD"`, `"IDENTIFIER"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenType {
    Keyword,
    Identifier,
    Number,
    Operator,
    Punctuation,
}

impl TokenType {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Keyword => "KEYWORD",
            TokenType::Identifier => "IDENTIFIER",
            TokenType::Number => "NUMBER",
            TokenType::Operator => "OPERATOR",
            TokenType::Punctuation => "PUNCTUATION",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token with its source location information.
///
/// # Fields
///
/// - `kind`: The type and content of the token
/// - `line`: 1-based line number of the token's first character
/// - `col`: 1-based column number of the token's first character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The type and semantic content of this token
    pub kind: TokenKind,

    /// Line number in the source file (1-based)
    pub line: usize,

    /// Column number in the source file (1-based)
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, col: usize) -> Self {
        Self { kind, line, col }
    }

    pub fn token_type(&self) -> TokenType {
        self.kind.token_type()
    }

    pub fn lexeme(&self) -> &str {
        self.kind.lexeme()
    }
}
