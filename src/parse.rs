//! Parsing a whole `{TypeName args}` expression.
//!
//! [`parse`] splits off the type name, tokenizes what follows and binds the tokens.
//! Attribute values that merely look like extensions can be protected with a leading
//! `{}`, which [`strip_literal_escape`] removes.

use crate::{bind, tokenize, BoundArguments, Error, Result, Tokenized, TypeName};

/// A parsed compact markup extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkupExtension {
    pub type_name: TypeName,
    pub arguments: BoundArguments,
}

/// Returns `true` if `text` should be read as a markup extension rather than a
/// literal string.
///
/// ```rust
/// use compact_markup::is_markup_extension;
///
/// assert!(is_markup_extension("{Binding Path=Name}"));
/// assert!(!is_markup_extension("{}{Binding Path=Name}"));
/// assert!(!is_markup_extension("plain text"));
/// ```
#[must_use]
pub fn is_markup_extension(text: &str) -> bool {
    let text = text.trim();
    text.starts_with('{') && !text.starts_with("{}") && text.ends_with('}')
}

/// Removes a leading `{}` literal escape, returning the text that follows it.
///
/// ```rust
/// use compact_markup::strip_literal_escape;
///
/// assert_eq!(strip_literal_escape("{}{not an extension}"), Some("{not an extension}"));
/// assert_eq!(strip_literal_escape("{Binding}"), None);
/// ```
#[must_use]
pub fn strip_literal_escape(text: &str) -> Option<&str> {
    text.strip_prefix("{}")
}

/// Parses `{TypeName arguments}`.
///
/// ```rust
/// use compact_markup::parse;
///
/// let ext = parse("{x:Static Colors.Red}").unwrap();
/// assert_eq!(ext.type_name.to_string(), "x:Static");
/// assert_eq!(ext.arguments.positional, vec!["Colors.Red"]);
/// ```
///
/// # Errors
///
/// - [`Error::NotAnExtension`] if the text does not start with `{`
/// - [`Error::MissingTypeName`] if no type name follows the `{`
/// - [`Error::MissingTerminator`] / [`Error::TrailingContent`] for structural problems
/// - [`Error::MalformedArguments`] for misplaced delimiters or quotes
pub fn parse(text: &str) -> Result<MarkupExtension> {
    let body = text
        .trim_start()
        .strip_prefix('{')
        .ok_or_else(|| Error::NotAnExtension(text.to_string()))?;

    let name_end = body
        .find(|c: char| c.is_whitespace() || c == '}')
        .unwrap_or(body.len());
    let name = &body[..name_end];
    if name.is_empty() {
        return Err(Error::MissingTypeName(text.to_string()));
    }

    let mut args = &body[name_end..];
    if let Some(sep) = args.chars().next().filter(|c| c.is_whitespace()) {
        args = &args[sep.len_utf8()..];
    }

    match tokenize(args)? {
        Tokenized::Arguments(tokens) => Ok(MarkupExtension {
            type_name: TypeName::parse(name),
            arguments: bind(&tokens),
        }),
        Tokenized::Malformed => Err(Error::malformed(text)),
    }
}
