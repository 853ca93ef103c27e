//! Values handed to the compact serializer.
//!
//! ## Core Types
//!
//! - [`TypeName`]: a type name with an optional namespace prefix (`x:Static`)
//! - [`ArgumentValue`]: one constructor argument or property value
//! - [`ExtensionData`]: everything needed to write one `{Type ...}` expression
//!
//! ```rust
//! use compact_markup::{ArgumentValue, ExtensionData, TypeName};
//!
//! let data = ExtensionData::new(TypeName::new("Binding"))
//!     .with_positional("Items")
//!     .with_named("Mode", "OneWay")
//!     .with_named("Converter", ArgumentValue::extension("{StaticResource Conv}"));
//!
//! assert_eq!(data.positional.len(), 1);
//! assert_eq!(data.named.len(), 2);
//! ```

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A possibly prefixed type name, written `prefix:Name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeName {
    pub prefix: Option<String>,
    pub name: String,
}

impl TypeName {
    /// Creates an unprefixed type name.
    pub fn new(name: impl Into<String>) -> Self {
        TypeName {
            prefix: None,
            name: name.into(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        TypeName {
            prefix: Some(prefix.into()),
            name: name.into(),
        }
    }

    /// Splits `prefix:Name` at the first colon. Text without a colon has no prefix.
    ///
    /// ```rust
    /// use compact_markup::TypeName;
    ///
    /// let ty = TypeName::parse("x:Static");
    /// assert_eq!(ty.prefix.as_deref(), Some("x"));
    /// assert_eq!(ty.name, "Static");
    /// assert_eq!(TypeName::parse("Binding").prefix, None);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.split_once(':') {
            Some((prefix, name)) if !prefix.is_empty() => TypeName::with_prefix(prefix, name),
            Some((_, name)) => TypeName::new(name),
            None => TypeName::new(text),
        }
    }

    /// Returns `true` if `other` names this type, either by local name or in full.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.name == other || self.to_string() == other
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for TypeName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TypeName::parse(s))
    }
}

impl Serialize for TypeName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// One argument value, already reduced to text by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgumentValue {
    /// Plain text; escaped on output.
    String(String),
    /// A type reference; written as its qualified name without escaping.
    Type(TypeName),
    /// An already serialized nested extension; written verbatim.
    Extension(String),
}

impl ArgumentValue {
    pub fn extension(text: impl Into<String>) -> Self {
        ArgumentValue::Extension(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgumentValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for ArgumentValue {
    fn from(s: &str) -> Self {
        ArgumentValue::String(s.to_string())
    }
}

impl From<String> for ArgumentValue {
    fn from(s: String) -> Self {
        ArgumentValue::String(s)
    }
}

impl From<TypeName> for ArgumentValue {
    fn from(ty: TypeName) -> Self {
        ArgumentValue::Type(ty)
    }
}

/// The state of one object as a compact markup extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionData {
    pub type_name: TypeName,
    pub positional: Vec<ArgumentValue>,
    pub named: Vec<(String, ArgumentValue)>,
    /// Property names whose values are already written as constructor arguments.
    pub covered: Vec<String>,
}

impl ExtensionData {
    #[must_use]
    pub fn new(type_name: TypeName) -> Self {
        ExtensionData {
            type_name,
            positional: Vec::new(),
            named: Vec::new(),
            covered: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_positional(mut self, value: impl Into<ArgumentValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    #[must_use]
    pub fn with_named(mut self, name: impl Into<String>, value: impl Into<ArgumentValue>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }

    /// Marks a property as already supplied through a constructor argument, so it is
    /// not written again as `Name=Value`.
    #[must_use]
    pub fn covering(mut self, property: impl Into<String>) -> Self {
        self.covered.push(property.into());
        self
    }

    #[must_use]
    pub fn is_covered(&self, property: &str) -> bool {
        self.covered.iter().any(|p| p == property)
    }
}
