//! Splitting a token sequence into positional and named arguments.
//!
//! The binder scans tokens once. A bare literal is positional until the first
//! `Name=Value` pair shows up; the name half of that first pair was already taken as
//! positional by the time its `=` is seen, so it is moved out again.
//!
//! ```rust
//! use compact_markup::{bind, tokenize};
//!
//! let tokens = tokenize("x, y, Mode=OneWay}").unwrap().into_sequence();
//! let bound = bind(&tokens);
//!
//! assert_eq!(bound.positional, vec!["x", "y"]);
//! assert_eq!(bound.named.get("Mode"), Some("OneWay"));
//! ```

use crate::escape::unescape;
use crate::token::{Delimiter, Token, TokenSequence};
use crate::NamedArguments;

/// Arguments of one markup extension, still in raw escaped form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArguments {
    /// Constructor arguments, in order.
    pub positional: Vec<String>,
    /// Property assignments, in first-occurrence order.
    pub named: NamedArguments,
    /// Bare literals that appeared after the first named argument and were not bound.
    pub unbound: Vec<String>,
}

impl BoundArguments {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Positional arguments with one level of escaping removed.
    #[must_use]
    pub fn positional_values(&self) -> Vec<String> {
        self.positional.iter().map(|raw| unescape(raw)).collect()
    }

    /// Named arguments with one level of escaping removed from names and values.
    #[must_use]
    pub fn named_values(&self) -> Vec<(String, String)> {
        self.named
            .iter()
            .map(|(name, value)| (unescape(name), unescape(value)))
            .collect()
    }
}

/// Binds a token sequence into positional and named arguments.
pub fn bind(tokens: &TokenSequence) -> BoundArguments {
    let tokens = tokens.as_slice();
    let mut bound = BoundArguments::default();
    let mut first_equals_seen = false;
    // Token index of the most recent positional entry.
    let mut last_positional: Option<usize> = None;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Literal(text) => {
                let is_value = i > 0 && tokens[i - 1].is_delimiter(Delimiter::Equals);
                if is_value {
                    continue;
                }
                if bound.named.is_empty() {
                    bound.positional.push(text.clone());
                    last_positional = Some(i);
                } else if !tokens
                    .get(i + 1)
                    .is_some_and(|t| t.is_delimiter(Delimiter::Equals))
                {
                    tracing::warn!(
                        literal = text.as_str(),
                        "positional argument after named arguments ignored"
                    );
                    bound.unbound.push(text.clone());
                }
            }
            Token::Delimiter(Delimiter::Equals) => {
                let name = i.checked_sub(1).and_then(|n| tokens[n].as_literal());
                let value = tokens.get(i + 1).and_then(Token::as_literal);
                let (Some(name), Some(value)) = (name, value) else {
                    tracing::debug!(index = i, "'=' without a name and value on both sides");
                    continue;
                };

                if !first_equals_seen {
                    first_equals_seen = true;
                    if last_positional == Some(i - 1) {
                        bound.positional.pop();
                    }
                }
                bound.named.insert(name.to_string(), value.to_string());
            }
            Token::Delimiter(Delimiter::Comma) => {}
        }
    }

    bound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;

    fn bind_args(args: &str) -> BoundArguments {
        let tokenized = tokenize(args).unwrap();
        assert!(!tokenized.is_malformed(), "malformed: {:?}", args);
        bind(&tokenized.into_sequence())
    }

    #[test]
    fn test_positional_and_named() {
        let bound = bind_args("x, y, N=v}");
        assert_eq!(bound.positional, vec!["x", "y"]);
        assert_eq!(bound.named.len(), 1);
        assert_eq!(bound.named.get("N"), Some("v"));
        assert!(bound.unbound.is_empty());
    }

    #[test]
    fn test_first_equals_removes_name_from_positional() {
        let bound = bind_args("N=v}");
        assert!(bound.positional.is_empty());
        assert_eq!(bound.named.get("N"), Some("v"));
    }

    #[test]
    fn test_duplicate_name_overwrites_in_place() {
        let bound = bind_args("A=1, B=2, A=3}");
        let pairs: Vec<_> = bound.named.iter().collect();
        assert_eq!(
            pairs,
            vec![
                (&"A".to_string(), &"3".to_string()),
                (&"B".to_string(), &"2".to_string())
            ]
        );
    }

    #[test]
    fn test_bare_literal_after_named_is_dropped() {
        let bound = bind_args("a, N=v, b, M=w}");
        assert_eq!(bound.positional, vec!["a"]);
        assert_eq!(bound.named.get("N"), Some("v"));
        assert_eq!(bound.named.get("M"), Some("w"));
        assert_eq!(bound.unbound, vec!["b"]);
    }

    #[test]
    fn test_chained_equals() {
        let bound = bind_args("a=b=c}");
        assert!(bound.positional.is_empty());
        assert_eq!(bound.named.get("a"), Some("b"));
        assert_eq!(bound.named.get("b"), Some("c"));
    }

    #[test]
    fn test_values_stay_escaped_until_used() {
        let bound = bind_args(r"a\,b, Text=x\=y}");
        assert_eq!(bound.positional, vec![r"a\,b"]);
        assert_eq!(bound.positional_values(), vec!["a,b"]);
        assert_eq!(bound.named.get("Text"), Some(r"x\=y"));
        assert_eq!(
            bound.named_values(),
            vec![("Text".to_string(), "x=y".to_string())]
        );
    }

    #[test]
    fn test_hand_built_sequence_without_value() {
        let tokens: TokenSequence = vec![
            Token::literal("N"),
            Token::Delimiter(Delimiter::Equals),
        ]
        .into();
        let bound = bind(&tokens);
        assert_eq!(bound.positional, vec!["N"]);
        assert!(bound.named.is_empty());
    }

    #[test]
    fn test_empty() {
        let bound = bind(&TokenSequence::new());
        assert!(bound.is_empty());
    }
}
