//! Tokens produced by the argument tokenizer.
//!
//! A [`TokenSequence`] is the ordered, left-to-right view of an argument list:
//! literal runs interleaved with `,` and `=` delimiters. The closing `}` is consumed
//! by the tokenizer and never appears here.
//!
//! ## Examples
//!
//! ```rust
//! use compact_markup::{Delimiter, Token, TokenSequence};
//!
//! let tokens: TokenSequence = vec![
//!     Token::literal("Path"),
//!     Token::Delimiter(Delimiter::Equals),
//!     Token::literal("Name"),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens.get(0).and_then(Token::as_literal), Some("Path"));
//! ```

use std::fmt;

/// A structural separator between arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Comma,
    Equals,
}

impl Delimiter {
    /// Returns the character this delimiter is written as.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Equals => '=',
        }
    }

    pub(crate) fn from_char(ch: char) -> Option<Self> {
        match ch {
            ',' => Some(Delimiter::Comma),
            '=' => Some(Delimiter::Equals),
            _ => None,
        }
    }
}

/// One token of an argument list.
///
/// Literal text keeps its escapes (`a\,b` stays `a\,b`); unescaping happens when the
/// bound value is used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Delimiter(Delimiter),
}

impl Token {
    pub fn literal(text: impl Into<String>) -> Self {
        Token::Literal(text.into())
    }

    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Token::Literal(text) => Some(text),
            Token::Delimiter(_) => None,
        }
    }

    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Token::Literal(_))
    }

    #[must_use]
    pub fn is_delimiter(&self, kind: Delimiter) -> bool {
        matches!(self, Token::Delimiter(d) if *d == kind)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(text) => f.write_str(text),
            Token::Delimiter(d) => write!(f, "{}", d.as_char()),
        }
    }
}

/// An ordered sequence of tokens in source order.
///
/// An empty sequence means the argument list held no arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenSequence(Vec<Token>);

impl TokenSequence {
    #[must_use]
    pub fn new() -> Self {
        TokenSequence(Vec::new())
    }

    pub(crate) fn push(&mut self, token: Token) {
        self.0.push(token);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.0.get(index)
    }

    /// Returns the most recently pushed token.
    #[must_use]
    pub fn last(&self) -> Option<&Token> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Token] {
        &self.0
    }

    /// Returns the literal texts in order, skipping delimiters.
    pub fn literals(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(Token::as_literal)
    }
}

impl fmt::Display for TokenSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.0 {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl IntoIterator for TokenSequence {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Token> for TokenSequence {
    fn from_iter<T: IntoIterator<Item = Token>>(iter: T) -> Self {
        TokenSequence(Vec::from_iter(iter))
    }
}

impl From<Vec<Token>> for TokenSequence {
    fn from(tokens: Vec<Token>) -> Self {
        TokenSequence(tokens)
    }
}
