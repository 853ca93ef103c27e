//! # compact_markup
//!
//! Reader and writer for the compact markup-extension syntax used in XML workflow
//! markup attributes:
//!
//! ```text
//! {TypeName arg1, arg2, Name1=Value1, Name2=Value2}
//! ```
//!
//! ## What's Inside
//!
//! - **Tokenizer** ([`tokenize`]): a single-pass, quote-, escape- and nesting-aware
//!   scanner for the argument list
//! - **Binder** ([`bind`]): splits tokens into positional (constructor) and named
//!   (property) arguments
//! - **Escaping** ([`escape`], [`unescape`]): backslash escapes for `= , " ' { } \`
//! - **Serializer** ([`write_extension`], [`to_string`]): writes constructor and property
//!   state back into compact text
//! - **Host binding** ([`construct`]): the constructor-arity and property policies, over
//!   a host-supplied [`construct::ExtensionType`]
//!
//! ## Quick Start
//!
//! ```rust
//! use compact_markup::parse;
//!
//! let ext = parse("{Binding Items, Mode=OneWay, StringFormat='{0:N2}'}").unwrap();
//!
//! assert_eq!(ext.type_name.name, "Binding");
//! assert_eq!(ext.arguments.positional, vec!["Items"]);
//! assert_eq!(ext.arguments.named.get("Mode"), Some("OneWay"));
//! assert_eq!(ext.arguments.named.get("StringFormat"), Some("{0:N2}"));
//! ```
//!
//! ### Writing
//!
//! ```rust
//! use compact_markup::{extension_to_string, ExtensionData, MarkupOptions, TypeName};
//!
//! let data = ExtensionData::new(TypeName::with_prefix("wf", "ActivityBind"))
//!     .with_positional("Workflow1")
//!     .with_named("Path", "Items[0].Name");
//!
//! let text = extension_to_string(&data, &MarkupOptions::default());
//! assert_eq!(text, "{wf:ActivityBind Workflow1,Path=Items[0].Name}");
//! ```
//!
//! ### With Serde
//!
//! ```rust
//! use compact_markup::{from_str, to_string};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! #[serde(rename_all = "PascalCase")]
//! struct Binding {
//!     path: String,
//!     delay: u32,
//! }
//!
//! let binding = Binding { path: "a,b".to_string(), delay: 10 };
//! let text = to_string(&binding).unwrap();
//! assert_eq!(text, r"{Binding Path=a\,b,Delay=10}");
//!
//! let back: Binding = from_str(&text).unwrap();
//! assert_eq!(back, binding);
//! ```
//!
//! ## Error Model
//!
//! - A missing closing `}` or text after it is a structural [`Error`].
//! - Misplaced delimiters or quotes make [`tokenize`] return [`Tokenized::Malformed`];
//!   [`parse`] turns that into [`Error::MalformedArguments`] quoting the source.
//! - Unknown properties and bad values are per-argument diagnostics when binding to a
//!   host type.
//!
//! All operations are synchronous and allocate their own state; nothing is shared
//! between calls.

pub mod bind;
pub mod construct;
pub mod de;
pub mod error;
pub mod escape;
pub mod lexer;
pub mod map;
pub mod options;
pub mod parse;
pub mod ser;
pub mod token;
pub mod value;

pub use bind::{bind, BoundArguments};
pub use de::Deserializer;
pub use error::{Error, Result};
pub use escape::{escape, unescape};
pub use lexer::{tokenize, Tokenized};
pub use map::NamedArguments;
pub use options::{ArgumentSeparator, MarkupOptions, QuoteStyle};
pub use parse::{is_markup_extension, parse, strip_literal_escape, MarkupExtension};
pub use ser::{extension_to_string, write_extension, Serializer};
pub use token::{Delimiter, Token, TokenSequence};
pub use value::{ArgumentValue, ExtensionData, TypeName};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Serialize a struct-like `T` to compact markup.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] if `T` or one of its fields has no compact
/// markup form.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, MarkupOptions::default())
}

/// Serialize a struct-like `T` to compact markup with custom options.
///
/// ```rust
/// use compact_markup::{to_string_with_options, MarkupOptions};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Null;
///
/// let text = to_string_with_options(&Null, MarkupOptions::new().with_default_prefix("x")).unwrap();
/// assert_eq!(text, "{x:Null}");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: MarkupOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::new(options);
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

/// Serialize a struct-like `T` to a writer.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize a `T` from one compact markup extension.
///
/// # Errors
///
/// Returns any parse error, or a binding error if the arguments do not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(Deserializer::from_str(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct ActivityBind {
        name: String,
        path: Option<String>,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    #[serde(rename = "x:Type")]
    struct TypeRef(String);

    #[test]
    fn test_struct_round_trip() {
        let bind = ActivityBind {
            name: "Workflow1".to_string(),
            path: Some("Items['a=b'].Value".to_string()),
        };
        let text = to_string(&bind).unwrap();
        assert_eq!(
            text,
            r"{ActivityBind Name=Workflow1,Path=Items[\'a\=b\'].Value}"
        );
        assert_eq!(from_str::<ActivityBind>(&text).unwrap(), bind);
    }

    #[test]
    fn test_none_fields_skipped() {
        let bind = ActivityBind {
            name: "Workflow1".to_string(),
            path: None,
        };
        let text = to_string(&bind).unwrap();
        assert_eq!(text, "{ActivityBind Name=Workflow1}");
        assert_eq!(from_str::<ActivityBind>(&text).unwrap(), bind);
    }

    #[test]
    fn test_prefixed_newtype_round_trip() {
        let value = TypeRef("ns0:Widget".to_string());
        let text = to_string(&value).unwrap();
        assert_eq!(text, "{x:Type ns0:Widget}");
        assert_eq!(from_str::<TypeRef>(&text).unwrap(), value);
    }

    #[test]
    fn test_non_struct_rejected() {
        assert!(matches!(to_string(&42), Err(Error::UnsupportedType(_))));
        assert!(matches!(
            to_string(&vec![1, 2]),
            Err(Error::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_nested_struct_field_rejected() {
        #[derive(Serialize)]
        struct Outer {
            inner: TypeRef,
        }

        let outer = Outer {
            inner: TypeRef("x".to_string()),
        };
        // Newtype structs are transparent inside arguments.
        assert_eq!(to_string(&outer).unwrap(), "{Outer inner=x}");

        #[derive(Serialize)]
        struct Deep {
            bind: ActivityBind,
        }
        let deep = Deep {
            bind: ActivityBind {
                name: "a".to_string(),
                path: None,
            },
        };
        assert!(matches!(to_string(&deep), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn test_to_writer() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &TypeRef("T".to_string())).unwrap();
        assert_eq!(buffer, b"{x:Type T}");
    }
}
