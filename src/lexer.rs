//! Tokenizer for compact markup-extension argument lists.
//!
//! The tokenizer receives the text that follows the type name, e.g. for
//! `{Binding Path=Name, Mode=OneWay}` it sees `Path=Name, Mode=OneWay}`, and turns it
//! into a [`TokenSequence`] in a single left-to-right pass.
//!
//! ## Grammar
//!
//! ```text
//! args       := (ws)* (argument (delim argument)*)? ws* '}' trailing_ws*
//! argument   := quoted | braced | plain
//! quoted     := quote_char raw_chars_until_matching_quote quote_char
//! braced     := '{' raw_chars_with_balanced_braces '}'
//! plain      := char+            -- stops at unescaped ',', '=', '}', or opening quote
//! delim      := ',' | '='
//! ```
//!
//! ## Rules
//!
//! - A `\` escapes the next character. The pair is kept in the literal as written.
//! - `'` or `"` opens a quoted literal only at the start of an argument. Quoted text is
//!   kept verbatim, including surrounding whitespace.
//! - A quote right after `[` is part of a collection indexer (`Items['key']`), not a
//!   string boundary. The indexer ends at a quote followed by `]`.
//! - Nested `{...}` expressions pass through as one opaque literal. Braces inside a
//!   quoted literal are counted too, but the matching quote always closes it.
//! - `,` and `=` separate arguments only outside quotes and nested braces.
//! - The first top-level `}` ends the list; only whitespace may follow it.
//!
//! Doubled, leading or trailing delimiters and misplaced quotes give
//! [`Tokenized::Malformed`]. A missing `}` or text after it is an [`Error`].
//!
//! ```rust
//! use compact_markup::{tokenize, Token, Tokenized};
//!
//! let tokenized = tokenize("'a,b=c'}").unwrap();
//! let tokens = tokenized.into_sequence();
//! assert_eq!(tokens.as_slice(), &[Token::literal("a,b=c")]);
//!
//! assert!(tokenize("a,,b}").unwrap().is_malformed());
//! assert!(tokenize("a").is_err());
//! ```

use crate::token::{Delimiter, Token, TokenSequence};
use crate::{Error, Result};

/// Outcome of a tokenize call that did not hit a structural error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tokenized {
    /// The argument list was well formed. May be empty.
    Arguments(TokenSequence),
    /// Delimiters or quotes were misplaced. The caller reports this against the
    /// original source text.
    Malformed,
}

impl Tokenized {
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Tokenized::Malformed)
    }

    #[must_use]
    pub fn tokens(&self) -> Option<&TokenSequence> {
        match self {
            Tokenized::Arguments(tokens) => Some(tokens),
            Tokenized::Malformed => None,
        }
    }

    /// Collapses the outcome into a plain sequence; a malformed list becomes empty.
    #[must_use]
    pub fn into_sequence(self) -> TokenSequence {
        match self {
            Tokenized::Arguments(tokens) => tokens,
            Tokenized::Malformed => TokenSequence::new(),
        }
    }
}

enum Step {
    Continue,
    Terminated,
    Malformed,
}

/// Per-call scanner state.
struct Scanner {
    quote_active: bool,
    quote_char: char,
    escape_pending: bool,
    brace_depth: usize,
    collection_indexer_active: bool,
    // Non-whitespace seen since the last delimiter.
    output_started: bool,
    // A quoted literal was emitted and no delimiter has followed yet.
    quote_closed: bool,
    accumulator: String,
    tokens: TokenSequence,
}

impl Scanner {
    fn new() -> Self {
        Scanner {
            quote_active: false,
            quote_char: '\'',
            escape_pending: false,
            brace_depth: 0,
            collection_indexer_active: false,
            output_started: false,
            quote_closed: false,
            accumulator: String::new(),
            tokens: TokenSequence::new(),
        }
    }

    fn step(&mut self, ch: char, prev: Option<char>, next: Option<char>) -> Step {
        if self.escape_pending {
            self.escape_pending = false;
            self.accumulator.push('\\');
            self.accumulator.push(ch);
            return Step::Continue;
        }

        if ch == '\\' {
            if self.quote_closed && self.brace_depth == 0 {
                return Step::Malformed;
            }
            self.escape_pending = true;
            self.output_started = true;
            return Step::Continue;
        }

        if self.quote_active {
            self.step_quoted(ch, prev, next);
            Step::Continue
        } else {
            self.step_plain(ch, prev, next)
        }
    }

    fn step_quoted(&mut self, ch: char, prev: Option<char>, next: Option<char>) {
        match ch {
            '\'' | '"' if prev == Some('[') && opens_indexer(next) => {
                self.collection_indexer_active = true;
                self.accumulator.push(ch);
            }
            '\'' | '"' if self.collection_indexer_active && next == Some(']') => {
                self.collection_indexer_active = false;
                self.accumulator.push(ch);
            }
            c if c == self.quote_char && !self.collection_indexer_active => {
                self.quote_active = false;
                self.brace_depth = 0;
                let text = std::mem::take(&mut self.accumulator);
                self.tokens.push(Token::Literal(text));
                self.quote_closed = true;
            }
            '{' => {
                self.brace_depth += 1;
                self.accumulator.push(ch);
            }
            '}' => {
                self.brace_depth = self.brace_depth.saturating_sub(1);
                self.accumulator.push(ch);
            }
            _ => self.accumulator.push(ch),
        }
    }

    fn step_plain(&mut self, ch: char, prev: Option<char>, next: Option<char>) -> Step {
        if self.brace_depth > 0 {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => self.brace_depth -= 1,
                _ => {}
            }
            self.accumulator.push(ch);
            return Step::Continue;
        }

        if self.quote_closed && !matches!(ch, ',' | '=' | '}') {
            return if ch.is_whitespace() {
                Step::Continue
            } else {
                Step::Malformed
            };
        }

        match ch {
            '\'' | '"' if prev == Some('[') => {
                self.collection_indexer_active = true;
                self.accumulator.push(ch);
            }
            '\'' | '"' if self.collection_indexer_active => {
                if next == Some(']') {
                    self.collection_indexer_active = false;
                }
                self.accumulator.push(ch);
            }
            '\'' | '"' => {
                if !self.accumulator.is_empty() {
                    return Step::Malformed;
                }
                self.quote_active = true;
                self.quote_char = ch;
                self.output_started = true;
            }
            '{' => {
                self.brace_depth += 1;
                self.output_started = true;
                self.accumulator.push(ch);
            }
            '}' => return Step::Terminated,
            ',' | '=' => return self.delimiter(ch),
            c if c.is_whitespace() && !self.output_started => {}
            _ => {
                self.output_started = true;
                self.accumulator.push(ch);
            }
        }
        Step::Continue
    }

    fn delimiter(&mut self, ch: char) -> Step {
        let Some(kind) = Delimiter::from_char(ch) else {
            return Step::Malformed;
        };

        if !self.accumulator.is_empty() {
            self.flush();
        } else if !self.tokens.last().is_some_and(Token::is_literal) {
            return Step::Malformed;
        }

        self.tokens.push(Token::Delimiter(kind));
        self.output_started = false;
        self.quote_closed = false;
        Step::Continue
    }

    fn flush(&mut self) {
        let text = std::mem::take(&mut self.accumulator);
        self.tokens.push(Token::literal(trim_literal(&text)));
    }

    fn finish(mut self) -> Tokenized {
        if !self.accumulator.is_empty() {
            self.flush();
        } else if self.tokens.last().is_some_and(|t| !t.is_literal()) {
            return Tokenized::Malformed;
        }
        Tokenized::Arguments(self.tokens)
    }
}

// A quote after `[` that is followed by the end of the argument closes a quoted
// literal ending in `[` rather than opening an indexer.
fn opens_indexer(next: Option<char>) -> bool {
    next.is_some_and(|c| !matches!(c, '}' | ',' | '=') && !c.is_whitespace())
}

/// Trims surrounding whitespace, keeping a trailing whitespace character that is
/// itself escaped (`a\ `).
fn trim_literal(raw: &str) -> &str {
    let start = raw.trim_start();
    let end = start.trim_end();
    let slashes = end.chars().rev().take_while(|&c| c == '\\').count();
    if slashes % 2 == 1 {
        if let Some(ws) = start[end.len()..].chars().next() {
            return &start[..end.len() + ws.len_utf8()];
        }
    }
    end
}

/// Splits an argument list into tokens.
///
/// `args` is everything after the type name and its separating space, up to and
/// including the closing `}`.
///
/// # Errors
///
/// Returns [`Error::MissingTerminator`] if no top-level `}` is found and
/// [`Error::TrailingContent`] if anything but whitespace follows it.
pub fn tokenize(args: &str) -> Result<Tokenized> {
    let mut scanner = Scanner::new();
    let mut chars = args.char_indices().peekable();
    let mut prev = None;

    while let Some((offset, ch)) = chars.next() {
        let next = chars.peek().map(|&(_, c)| c);
        match scanner.step(ch, prev, next) {
            Step::Continue => prev = Some(ch),
            Step::Malformed => {
                tracing::debug!(args, offset, "malformed markup extension arguments");
                return Ok(Tokenized::Malformed);
            }
            Step::Terminated => {
                let rest_start = offset + ch.len_utf8();
                let rest = &args[rest_start..];
                if let Some(pos) = rest.find(|c: char| !c.is_whitespace()) {
                    return Err(Error::trailing_content(
                        rest_start + pos,
                        rest[pos..].trim_end(),
                    ));
                }
                let tokenized = scanner.finish();
                if tokenized.is_malformed() {
                    tracing::debug!(args, "markup extension arguments end with a delimiter");
                }
                return Ok(tokenized);
            }
        }
    }

    Err(Error::missing_terminator(args))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Token {
        Token::literal(s)
    }

    const COMMA: Token = Token::Delimiter(Delimiter::Comma);
    const EQUALS: Token = Token::Delimiter(Delimiter::Equals);

    fn tokens(args: &str) -> Vec<Token> {
        match tokenize(args).unwrap() {
            Tokenized::Arguments(tokens) => tokens.into_iter().collect(),
            Tokenized::Malformed => panic!("Expected arguments for {:?}", args),
        }
    }

    #[test]
    fn test_empty_argument_list() {
        assert_eq!(tokens("}"), vec![]);
        assert_eq!(tokens("   }  "), vec![]);
    }

    #[test]
    fn test_positional_and_named() {
        assert_eq!(
            tokens("x, y, N=v}"),
            vec![lit("x"), COMMA, lit("y"), COMMA, lit("N"), EQUALS, lit("v")]
        );
    }

    #[test]
    fn test_plain_literal_is_trimmed() {
        assert_eq!(tokens("  hello world  , b }"), vec![lit("hello world"), COMMA, lit("b")]);
    }

    #[test]
    fn test_quoted_literal_keeps_whitespace() {
        assert_eq!(tokens("' padded ' }"), vec![lit(" padded ")]);
        assert_eq!(tokens(r#""a}b"}"#), vec![lit("a}b")]);
    }

    #[test]
    fn test_empty_quoted_literal() {
        assert_eq!(tokens("'', b}"), vec![lit(""), COMMA, lit("b")]);
    }

    #[test]
    fn test_other_quote_inside_quotes() {
        assert_eq!(tokens(r#""it's"}"#), vec![lit("it's")]);
    }

    #[test]
    fn test_escape_kept_in_literal() {
        assert_eq!(tokens(r"a\}b}"), vec![lit(r"a\}b")]);
        assert_eq!(tokens(r"'a\'b'}"), vec![lit(r"a\'b")]);
        assert_eq!(tokens(r"a\\}"), vec![lit(r"a\\")]);
    }

    #[test]
    fn test_escaped_trailing_space_survives_trim() {
        assert_eq!(tokens(r"a\ , b}"), vec![lit(r"a\ "), COMMA, lit("b")]);
    }

    #[test]
    fn test_nested_extension_is_opaque() {
        assert_eq!(
            tokens("Source={StaticResource Key, Mode=x}, Path=Name}"),
            vec![
                lit("Source"),
                EQUALS,
                lit("{StaticResource Key, Mode=x}"),
                COMMA,
                lit("Path"),
                EQUALS,
                lit("Name"),
            ]
        );
    }

    #[test]
    fn test_plain_text_opening_nested_braces() {
        assert_eq!(tokens("pre{a,b}post}"), vec![lit("pre{a,b}post")]);
    }

    #[test]
    fn test_collection_indexer_does_not_hide_delimiters() {
        assert_eq!(
            tokens("Items['a,b'].Name}"),
            vec![lit("Items['a"), COMMA, lit("b'].Name")]
        );
        assert_eq!(tokens("Items['k=v']}"), vec![lit("Items['k"), EQUALS, lit("v']")]);
    }

    #[test]
    fn test_quoted_literal_ending_in_bracket() {
        assert_eq!(tokens("' a['}"), vec![lit(" a[")]);
        assert_eq!(tokens("' a[', b}"), vec![lit(" a["), COMMA, lit("b")]);
        assert_eq!(tokens("N=' ['  }"), vec![lit("N"), EQUALS, lit(" [")]);
    }

    #[test]
    fn test_matching_quote_closes_despite_open_brace() {
        assert_eq!(tokens("'{'}"), vec![lit("{")]);
        assert_eq!(tokens("Text='{', b}"), vec![lit("Text"), EQUALS, lit("{"), COMMA, lit("b")]);
        assert_eq!(tokens("'}'}"), vec![lit("}")]);
    }

    #[test]
    fn test_collection_indexer_inside_quotes() {
        assert_eq!(
            tokens(r#"'Items['He said \"hi\"']'}"#),
            vec![lit(r#"Items['He said \"hi\"']"#)]
        );
    }

    #[test]
    fn test_mid_argument_quote_is_malformed() {
        assert!(tokenize("ab'c'}").unwrap().is_malformed());
    }

    #[test]
    fn test_text_after_closing_quote_is_malformed() {
        assert!(tokenize("'a'b}").unwrap().is_malformed());
        assert_eq!(tokens("'a'  , b}"), vec![lit("a"), COMMA, lit("b")]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(matches!(
            tokenize("'abc}"),
            Err(Error::MissingTerminator { .. })
        ));
    }

    #[test]
    fn test_unbalanced_nested_brace() {
        assert!(matches!(
            tokenize("{abc}"),
            Err(Error::MissingTerminator { .. })
        ));
    }

    #[test]
    fn test_escaped_terminator_does_not_terminate() {
        assert!(matches!(
            tokenize(r"abc\}"),
            Err(Error::MissingTerminator { .. })
        ));
    }

    #[test]
    fn test_trailing_content_offset() {
        match tokenize("a}  junk ") {
            Err(Error::TrailingContent { offset, trailing }) => {
                assert_eq!(offset, 4);
                assert_eq!(trailing, "junk");
            }
            other => panic!("Expected trailing content error, got {:?}", other),
        }
    }

    #[test]
    fn test_into_sequence_of_malformed_is_empty() {
        let tokenized = tokenize(",a}").unwrap();
        assert!(tokenized.tokens().is_none());
        assert!(tokenized.into_sequence().is_empty());
    }
}
