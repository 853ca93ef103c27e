//! Error types for compact markup-extension parsing, binding and serialization.
//!
//! Errors fall into three groups that callers are expected to treat differently:
//!
//! - **Structural errors**: the argument list has no closing `}` or has text after it.
//!   The whole expression is invalid and the surrounding attribute should be rejected.
//! - **Malformed argument lists**: doubled, leading or trailing delimiters and misplaced
//!   quotes. Reported with the original source text.
//! - **Binding errors**: an unknown property or a value that failed to convert. These are
//!   per-argument and do not abort binding of sibling arguments.
//!
//! ## Examples
//!
//! ```rust
//! use compact_markup::{parse, Error};
//!
//! let err = parse("{Binding Path=Name").unwrap_err();
//! assert!(err.is_structural());
//! assert!(matches!(err, Error::MissingTerminator { .. }));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all errors produced while reading or writing compact markup extensions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The argument list ended without a top-level `}`.
    #[error("Markup extension is missing its closing '}}': {input}")]
    MissingTerminator { input: String },

    /// Non-whitespace text follows the closing `}`.
    #[error("Unexpected content after closing '}}' at offset {offset}: {trailing}")]
    TrailingContent { offset: usize, trailing: String },

    /// Doubled, leading or trailing delimiters, or a quote where none is allowed.
    #[error("Malformed argument list in markup extension: {source_text}")]
    MalformedArguments { source_text: String },

    /// The text does not start with `{`.
    #[error("Not a markup extension: {0}")]
    NotAnExtension(String),

    /// `{` is not followed by a type name.
    #[error("Markup extension has no type name: {0}")]
    MissingTypeName(String),

    /// No constructor takes the number of positional arguments supplied.
    #[error("Type '{type_name}' has no constructor taking {arity} argument(s)")]
    NoMatchingConstructor { type_name: String, arity: usize },

    /// A named argument does not match any property of the target.
    #[error("Type '{type_name}' has no property named '{property}'")]
    UnknownProperty { type_name: String, property: String },

    /// A value could not be converted to the type its target expects.
    #[error("Cannot convert '{value}' for '{name}': expected {expected}")]
    Conversion {
        name: String,
        value: String,
        expected: String,
    },

    /// The extension names a different type than the one being read.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A Rust value has no compact markup representation.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Writing to the output sink failed.
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a missing-terminator error for the given argument text.
    pub fn missing_terminator(input: &str) -> Self {
        Error::MissingTerminator {
            input: input.to_string(),
        }
    }

    /// Creates a trailing-content error. `offset` is the byte offset of the first
    /// non-whitespace character after the terminator.
    pub fn trailing_content(offset: usize, trailing: &str) -> Self {
        Error::TrailingContent {
            offset,
            trailing: trailing.to_string(),
        }
    }

    /// Creates a malformed-argument-list error that quotes the original source text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_markup::Error;
    ///
    /// let err = Error::malformed("{Binding a,,b}");
    /// assert!(err.to_string().contains("{Binding a,,b}"));
    /// ```
    pub fn malformed(source_text: &str) -> Self {
        Error::MalformedArguments {
            source_text: source_text.to_string(),
        }
    }

    pub fn no_matching_constructor(type_name: &str, arity: usize) -> Self {
        Error::NoMatchingConstructor {
            type_name: type_name.to_string(),
            arity,
        }
    }

    pub fn unknown_property(type_name: &str, property: &str) -> Self {
        Error::UnknownProperty {
            type_name: type_name.to_string(),
            property: property.to_string(),
        }
    }

    /// Creates a conversion error for a named or positional value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_markup::Error;
    ///
    /// let err = Error::conversion("Width", "wide", "f64");
    /// assert!(err.to_string().contains("expected f64"));
    /// assert!(err.is_binding());
    /// ```
    pub fn conversion(name: &str, value: &str, expected: &str) -> Self {
        Error::Conversion {
            name: name.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for errors that invalidate the whole expression.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::MissingTerminator { .. } | Error::TrailingContent { .. }
        )
    }

    /// Returns `true` for per-argument errors that leave sibling arguments bound.
    #[must_use]
    pub fn is_binding(&self) -> bool {
        matches!(
            self,
            Error::UnknownProperty { .. } | Error::Conversion { .. }
        )
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Error::Io("formatter error".to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(Error::missing_terminator("a").is_structural());
        assert!(Error::trailing_content(2, "junk").is_structural());
        assert!(!Error::malformed("{A ,}").is_structural());

        assert!(Error::unknown_property("Binding", "Pth").is_binding());
        assert!(!Error::no_matching_constructor("Binding", 3).is_binding());
    }

    #[test]
    fn test_messages() {
        let err = Error::trailing_content(3, "junk");
        assert_eq!(
            err.to_string(),
            "Unexpected content after closing '}' at offset 3: junk"
        );

        let err = Error::no_matching_constructor("x:Static", 2);
        assert!(err.to_string().contains("2 argument(s)"));
    }
}
