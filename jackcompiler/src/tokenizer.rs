//! Tokenizer for the Jack language.
//!
//! A byte-cursor scanner that strips `//` and `/* ... */` comments (block
//! comments may span lines), splits the 19 punctuation symbols from
//! adjacent text, and produces line-tagged tokens. String constants keep
//! their content verbatim: a `/*` inside quotes is text, not a comment.

use crate::error::JackError;
use phf::phf_set;

/// The 21 reserved words.
static KEYWORDS: phf::Set<&'static str> = phf_set! {
    "class",
    "constructor",
    "function",
    "method",
    "field",
    "static",
    "var",
    "int",
    "char",
    "boolean",
    "void",
    "true",
    "false",
    "null",
    "this",
    "let",
    "do",
    "if",
    "else",
    "while",
    "return",
};

/// Largest legal integer constant (15-bit).
pub const MAX_INT_CONSTANT: u32 = 32767;

const SYMBOLS: &[u8] = b"{}()[].,;+-*/&|<>=~";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(&'static str),
    Symbol(char),
    IntConst(u16),
    StringConst(String),
    Identifier(String),
}

/// One token plus the 1-based source line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

/// Scans one `.jack` source into a token sequence. `unit` is the file stem
/// used in error messages.
pub fn tokenize(unit: &str, source: &str) -> Result<Vec<Token>, JackError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut line = 1;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\n' => {
                line += 1;
                pos += 1;
            }
            b' ' | b'\t' | b'\r' => pos += 1,
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                while pos < bytes.len() && bytes[pos] != b'\n' {
                    pos += 1;
                }
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                let opened_at = line;
                pos += 2;
                loop {
                    if pos + 1 >= bytes.len() {
                        return Err(JackError::Lex {
                            unit: unit.to_string(),
                            line: opened_at,
                            message: "unterminated block comment".to_string(),
                        });
                    }
                    if bytes[pos] == b'*' && bytes[pos + 1] == b'/' {
                        pos += 2;
                        break;
                    }
                    if bytes[pos] == b'\n' {
                        line += 1;
                    }
                    pos += 1;
                }
            }
            b'"' => {
                let start = pos + 1;
                let mut end = start;
                loop {
                    match bytes.get(end) {
                        Some(b'"') => break,
                        Some(b'\n') | None => {
                            return Err(JackError::Lex {
                                unit: unit.to_string(),
                                line,
                                message: "unterminated string constant".to_string(),
                            });
                        }
                        Some(_) => end += 1,
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::StringConst(source[start..end].to_string()),
                    line,
                });
                pos = end + 1;
            }
            b'0'..=b'9' => {
                let start = pos;
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    pos += 1;
                }
                let text = &source[start..pos];
                let value = text
                    .parse::<u32>()
                    .ok()
                    .filter(|v| *v <= MAX_INT_CONSTANT)
                    .ok_or_else(|| JackError::IntOutOfRange {
                        unit: unit.to_string(),
                        line,
                        value: text.to_string(),
                    })?;
                tokens.push(Token {
                    kind: TokenKind::IntConst(value as u16),
                    line,
                });
            }
            b if SYMBOLS.contains(&b) => {
                tokens.push(Token {
                    kind: TokenKind::Symbol(b as char),
                    line,
                });
                pos += 1;
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                let start = pos;
                while pos < bytes.len()
                    && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                let word = &source[start..pos];
                let kind = match KEYWORDS.get_key(word).copied() {
                    Some(keyword) => TokenKind::Keyword(keyword),
                    None => TokenKind::Identifier(word.to_string()),
                };
                tokens.push(Token { kind, line });
            }
            b => {
                return Err(JackError::Lex {
                    unit: unit.to_string(),
                    line,
                    message: format!("illegal character `{}`", b as char),
                });
            }
        }
    }

    Ok(tokens)
}

/// Cursor over a token sequence, with grammar-expectation helpers that
/// produce syntax errors naming what was expected and what was found.
pub struct TokenStream {
    unit: String,
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    #[must_use]
    pub fn new(unit: &str, tokens: Vec<Token>) -> Self {
        TokenStream {
            unit: unit.to_string(),
            tokens,
            pos: 0,
        }
    }

    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    #[must_use]
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Line of the current token, or of the last token once exhausted.
    #[must_use]
    pub fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.line)
    }

    /// Consumes and returns the current token.
    pub fn bump(&mut self) -> Result<Token, JackError> {
        let token = self.tokens.get(self.pos).cloned().ok_or_else(|| {
            JackError::UnexpectedEof {
                unit: self.unit.clone(),
            }
        })?;
        self.pos += 1;
        Ok(token)
    }

    #[must_use]
    pub fn at_symbol(&self, symbol: char) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Symbol(c), .. }) if *c == symbol)
    }

    #[must_use]
    pub fn at_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Keyword(k), .. }) if *k == keyword)
    }

    /// Consumes the current token if it is the given symbol.
    pub fn eat_symbol(&mut self, symbol: char) -> bool {
        if self.at_symbol(symbol) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect_symbol(&mut self, symbol: char) -> Result<(), JackError> {
        if self.eat_symbol(symbol) {
            Ok(())
        } else {
            Err(self.syntax_error(&format!("`{symbol}`")))
        }
    }

    pub fn expect_keyword(&mut self, keyword: &str) -> Result<(), JackError> {
        if self.at_keyword(keyword) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.syntax_error(&format!("`{keyword}`")))
        }
    }

    pub fn expect_identifier(&mut self) -> Result<String, JackError> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Identifier(name),
                ..
            }) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.syntax_error("an identifier")),
        }
    }

    /// Builds a syntax error at the current position.
    pub fn syntax_error(&self, expected: &str) -> JackError {
        let found = match self.peek() {
            Some(token) => match &token.kind {
                TokenKind::Keyword(k) => format!("`{k}`"),
                TokenKind::Symbol(c) => format!("`{c}`"),
                TokenKind::IntConst(v) => format!("`{v}`"),
                TokenKind::StringConst(_) => "a string constant".to_string(),
                TokenKind::Identifier(name) => format!("`{name}`"),
            },
            None => "end of input".to_string(),
        };
        JackError::Syntax {
            unit: self.unit.clone(),
            line: self.line(),
            expected: expected.to_string(),
            found,
        }
    }
}
