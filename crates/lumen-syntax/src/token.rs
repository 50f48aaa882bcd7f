//! Token definitions produced by the Lumen lexer.
//!
//! Tokens carry their semantic content (the number, the identifier text, the
//! string body) together with their position in the source line, so the parser
//! can report precise syntax errors.
//!
//! # Token categories
//!
//! - **Literals**: integers, floats and strings (`3`, `2.5`, `"img.png"`)
//! - **Identifiers**: variable and function names (`x`, `load_image`)
//! - **Keywords**: `if` and `else`
//! - **Operators**: arithmetic, comparison, logical, assignment and flow (`->`)
//! - **Punctuation**: `(`, `)`, `,`, `:`, `?`
//! - **Special**: end-of-input marker
//!
//! # Examples
//!
//! ```rust
//! use lumen_syntax::{Token, TokenKind};
//!
//! let tok = Token { kind: TokenKind::Int(3), offset: 0, line: 1, col: 1 };
//! assert_eq!(tok.kind.to_string(), "3");
//! ```

use std::fmt;

/// Token types the lexer can produce.
///
/// Numeric literals are typed at lex time: a literal containing a decimal
/// point becomes [`Float`](TokenKind::Float), anything else
/// [`Int`](TokenKind::Int).
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // === Literals ===
    /// Integer literal, e.g. `42`
    Int(i64),

    /// Floating literal, e.g. `2.5` or `3.`
    Float(f64),

    /// Identifier (variable or function name), e.g. `x`, `gen_matrix`
    Ident(String),

    /// String literal body without the surrounding quotes
    String(String),

    // === Keywords ===
    /// `if`
    If,

    /// `else`
    Else,

    // === Punctuation ===
    /// `(`
    LParen,

    /// `)`
    RParen,

    /// `,`
    Comma,

    /// `:`
    Colon,

    /// `?` - ternary conditional marker
    Question,

    // === Operators ===
    /// `=`
    Equal,

    /// `+`
    Plus,

    /// `-`
    Minus,

    /// `*`
    Star,

    /// `/`
    Slash,

    /// `^`
    Caret,

    /// `->` - flow connector
    Arrow,

    /// `>`
    Greater,

    /// `<`
    Less,

    /// `>=`
    GreaterEq,

    /// `<=`
    LessEq,

    /// `==`
    EqEq,

    /// `!=`
    NotEq,

    /// `&&`
    AndAnd,

    /// `||`
    OrOr,

    /// End-of-input marker
    Eof,
}

impl TokenKind {
    /// Upper-case category name, as printed by token dumps.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Int(_) | TokenKind::Float(_) => "NUMBER",
            TokenKind::Ident(_) => "VARIABLE",
            TokenKind::String(_) => "STRING",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Comma => "COMMA",
            TokenKind::Colon => "COLON",
            TokenKind::Question => "QUESTION",
            TokenKind::Equal => "SETTO",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "TIMES",
            TokenKind::Slash => "DIVIDE",
            TokenKind::Caret => "EXP",
            TokenKind::Arrow => "CONNECT",
            TokenKind::Greater => "GT",
            TokenKind::Less => "LT",
            TokenKind::GreaterEq => "GE",
            TokenKind::LessEq => "LE",
            TokenKind::EqEq => "EQ",
            TokenKind::NotEq => "NE",
            TokenKind::AndAnd => "AND",
            TokenKind::OrOr => "OR",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(n) => write!(f, "{}", n),
            TokenKind::Float(x) => write!(f, "{:?}", x),
            TokenKind::Ident(s) => write!(f, "{}", s),
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::If => f.write_str("if"),
            TokenKind::Else => f.write_str("else"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Colon => f.write_str(":"),
            TokenKind::Question => f.write_str("?"),
            TokenKind::Equal => f.write_str("="),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Caret => f.write_str("^"),
            TokenKind::Arrow => f.write_str("->"),
            TokenKind::Greater => f.write_str(">"),
            TokenKind::Less => f.write_str("<"),
            TokenKind::GreaterEq => f.write_str(">="),
            TokenKind::LessEq => f.write_str("<="),
            TokenKind::EqEq => f.write_str("=="),
            TokenKind::NotEq => f.write_str("!="),
            TokenKind::AndAnd => f.write_str("&&"),
            TokenKind::OrOr => f.write_str("||"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

/// A token with its source location.
///
/// `offset` is the character index into the source text; `line` and `col`
/// are 1-based and used for error rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The type and semantic content of this token
    pub kind: TokenKind,

    /// Character offset of the first character of the token
    pub offset: usize,

    /// Line number in the source (1-based)
    pub line: usize,

    /// Column number in the source (1-based)
    pub col: usize,
}
