//! Lumen lexer: converts a source line into tokens.
//!
//! Lexing never fails. An unrecognised character is recorded as a
//! [`ErrorKind::Lexical`] diagnostic, skipped, and scanning resumes at the
//! next character.
use lumen_syntax::error::{Error, ErrorKind};
use lumen_syntax::token::{Token, TokenKind};

/// Streaming character scanner that produces tokens with positions.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    diagnostics: Vec<Error>,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            diagnostics: Vec::new(),
        }
    }

    /// Lexical errors reported by the last call to [`tokenize`](Self::tokenize).
    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Error> {
        self.diagnostics
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\n' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn report(&mut self, line: usize, col: usize, msg: String) {
        log::debug!("{} at {}:{}", msg, line, col);
        self.diagnostics
            .push(Error::with_span(ErrorKind::Lexical, msg, line, col));
    }

    /// Digits, an optional decimal point, then optional digits. The decimal
    /// point alone decides between integer and floating literals, except that
    /// an integer too large for `i64` is reported and read as a float.
    fn read_number(&mut self) -> Option<TokenKind> {
        let (line, col) = (self.line, self.col);
        let mut s = String::new();
        while let Some(c) = self.peek().filter(|c| c.is_ascii_digit()) {
            s.push(c);
            self.advance();
        }
        if self.peek() == Some('.') {
            s.push('.');
            self.advance();
            while let Some(c) = self.peek().filter(|c| c.is_ascii_digit()) {
                s.push(c);
                self.advance();
            }
            return match s.parse::<f64>() {
                Ok(x) => Some(TokenKind::Float(x)),
                Err(_) => {
                    self.report(line, col, format!("Invalid number '{}'", s));
                    None
                }
            };
        }
        match s.parse::<i64>() {
            Ok(n) => Some(TokenKind::Int(n)),
            Err(_) => {
                self.report(
                    line,
                    col,
                    format!("Integer literal '{}' out of range, read as a float", s),
                );
                s.parse::<f64>().ok().map(TokenKind::Float)
            }
        }
    }

    fn read_ident_or_keyword(&mut self) -> TokenKind {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        match s.as_str() {
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            _ => TokenKind::Ident(s),
        }
    }

    /// Strings have no escapes and extend to the last quote on the current
    /// line, so `"a" + "b"` is a single literal. Returns `None` when the
    /// opening quote has no partner.
    fn read_string(&mut self) -> Option<TokenKind> {
        let line_end = self.src[self.pos..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(self.src.len(), |n| self.pos + n);
        let close = (self.pos + 1..line_end).rev().find(|&i| self.src[i] == '"')?;
        let body: String = self.src[self.pos + 1..close].iter().collect();
        while self.pos <= close {
            self.advance();
        }
        Some(TokenKind::String(body))
    }

    fn two_char(&mut self, second: char, double: TokenKind, single: Option<TokenKind>) -> Option<TokenKind> {
        if self.peek_next() == Some(second) {
            self.advance();
            self.advance();
            Some(double)
        } else {
            if single.is_some() {
                self.advance();
            }
            single
        }
    }

    /// Tokenize the entire input into a vector of tokens ending with Eof.
    pub fn tokenize(&mut self) -> Vec<Token> {
        self.diagnostics.clear();
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let (offset, line, col) = (self.pos, self.line, self.col);
            let c = match self.peek() {
                None => {
                    tokens.push(Token {
                        kind: TokenKind::Eof,
                        offset,
                        line,
                        col,
                    });
                    break;
                }
                Some(c) => c,
            };
            let kind = match c {
                '(' | ')' | ',' | ':' | '?' | '+' | '*' | '/' | '^' => {
                    self.advance();
                    Some(match c {
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        ',' => TokenKind::Comma,
                        ':' => TokenKind::Colon,
                        '?' => TokenKind::Question,
                        '+' => TokenKind::Plus,
                        '*' => TokenKind::Star,
                        '/' => TokenKind::Slash,
                        _ => TokenKind::Caret,
                    })
                }
                '-' => self.two_char('>', TokenKind::Arrow, Some(TokenKind::Minus)),
                '=' => self.two_char('=', TokenKind::EqEq, Some(TokenKind::Equal)),
                '>' => self.two_char('=', TokenKind::GreaterEq, Some(TokenKind::Greater)),
                '<' => self.two_char('=', TokenKind::LessEq, Some(TokenKind::Less)),
                '!' => self.two_char('=', TokenKind::NotEq, None),
                '&' => self.two_char('&', TokenKind::AndAnd, None),
                '|' => self.two_char('|', TokenKind::OrOr, None),
                '"' => self.read_string(),
                c if c.is_ascii_digit() => match self.read_number() {
                    Some(kind) => Some(kind),
                    None => continue,
                },
                c if c.is_ascii_alphabetic() => Some(self.read_ident_or_keyword()),
                _ => None,
            };
            match kind {
                Some(kind) => tokens.push(Token {
                    kind,
                    offset,
                    line,
                    col,
                }),
                None => {
                    self.report(line, col, format!("Unexpected character '{}'", c));
                    self.advance();
                }
            }
        }
        tokens
    }
}

/// Convenience wrapper returning only the token kinds, without the Eof marker.
pub fn tokenize(input: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(input);
    let mut kinds: Vec<TokenKind> = lexer.tokenize().into_iter().map(|t| t.kind).collect();
    kinds.pop();
    kinds
}
