//! Configuration options for compact markup output.
//!
//! - [`MarkupOptions`]: main configuration struct
//! - [`ArgumentSeparator`]: what is written between arguments
//! - [`QuoteStyle`]: which quote wraps values that must be quoted
//!
//! ## Examples
//!
//! ```rust
//! use compact_markup::{to_string_with_options, ArgumentSeparator, MarkupOptions};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct Binding { path: String, mode: String }
//!
//! let binding = Binding { path: "Name".into(), mode: "OneWay".into() };
//!
//! let options = MarkupOptions::new().with_separator(ArgumentSeparator::CommaSpace);
//! let text = to_string_with_options(&binding, options).unwrap();
//! assert_eq!(text, "{Binding Path=Name, Mode=OneWay}");
//! ```

/// Separator written between consecutive arguments.
///
/// Whitespace around delimiters is insignificant when reading, so both forms parse
/// the same way.
///
/// ```rust
/// use compact_markup::ArgumentSeparator;
///
/// assert_eq!(ArgumentSeparator::Comma.as_str(), ",");
/// assert_eq!(ArgumentSeparator::CommaSpace.as_str(), ", ");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ArgumentSeparator {
    #[default]
    Comma,
    CommaSpace,
}

impl ArgumentSeparator {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ArgumentSeparator::Comma => ",",
            ArgumentSeparator::CommaSpace => ", ",
        }
    }
}

/// Quote character for values that are empty or have surrounding whitespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    #[default]
    Single,
    Double,
}

impl QuoteStyle {
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        }
    }
}

/// Configuration options for compact markup serialization.
#[derive(Clone, Debug, Default)]
pub struct MarkupOptions {
    /// Prefix applied to type names written without one.
    pub default_prefix: Option<String>,
    pub separator: ArgumentSeparator,
    pub quote: QuoteStyle,
}

impl MarkupOptions {
    /// Creates default options: no default prefix, `,` separator, single quotes.
    ///
    /// ```rust
    /// use compact_markup::{ArgumentSeparator, MarkupOptions};
    ///
    /// let options = MarkupOptions::new();
    /// assert_eq!(options.separator, ArgumentSeparator::Comma);
    /// assert!(options.default_prefix.is_none());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefix written before unprefixed type names.
    ///
    /// ```rust
    /// use compact_markup::MarkupOptions;
    ///
    /// let options = MarkupOptions::new().with_default_prefix("wf");
    /// assert_eq!(options.default_prefix.as_deref(), Some("wf"));
    /// ```
    #[must_use]
    pub fn with_default_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.default_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: ArgumentSeparator) -> Self {
        self.separator = separator;
        self
    }

    #[must_use]
    pub fn with_quote(mut self, quote: QuoteStyle) -> Self {
        self.quote = quote;
        self
    }
}
