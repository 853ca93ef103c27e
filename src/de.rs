//! Reading compact markup extensions into Rust types.
//!
//! The [`Deserializer`] parses one `{TypeName ...}` expression and hands its arguments
//! to serde:
//!
//! - a struct receives named arguments by exact field name; positional arguments fill
//!   the first fields in declaration order, like constructor parameters
//! - a tuple or newtype struct receives positional arguments
//! - an enum picks its variant from the type name
//! - a map receives every argument, positional ones keyed by index (`"0"`, `"1"`, ...)
//!
//! Values are unescaped once and parsed on demand, so `Width=12.5` can land in an
//! `f64` field and `Mode=OneWay` in a unit enum.
//!
//! ```rust
//! use compact_markup::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! #[serde(rename_all = "PascalCase")]
//! struct Binding {
//!     path: String,
//!     mode: Option<String>,
//! }
//!
//! let binding: Binding = from_str("{Binding Name, Mode=OneWay}").unwrap();
//! assert_eq!(binding.path, "Name");
//! assert_eq!(binding.mode.as_deref(), Some("OneWay"));
//! ```

use crate::escape::unescape;
use crate::{parse, Error, MarkupExtension, NamedArguments, Result};
use serde::de::value::StringDeserializer;
use serde::de::{self, DeserializeSeed, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

/// Deserializer over one parsed markup extension.
pub struct Deserializer {
    extension: MarkupExtension,
}

impl Deserializer {
    /// Parses `text` and prepares it for deserialization.
    ///
    /// # Errors
    ///
    /// Returns any error [`parse`] reports.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Result<Self> {
        Ok(Deserializer {
            extension: parse(text)?,
        })
    }

    pub fn from_extension(extension: MarkupExtension) -> Self {
        Deserializer { extension }
    }

    fn type_name(&self) -> String {
        self.extension.type_name.to_string()
    }

    fn expect_type(&self, name: &str) -> Result<()> {
        if self.extension.type_name.matches(name) {
            Ok(())
        } else {
            Err(Error::type_mismatch(name, &self.type_name()))
        }
    }

    fn reject_named(&self) -> Result<()> {
        match self.extension.arguments.named.keys().next() {
            Some(name) => Err(Error::unknown_property(&self.type_name(), &unescape(name))),
            None => Ok(()),
        }
    }

    fn expect_arity(&self, arity: usize) -> Result<()> {
        let found = self.extension.arguments.positional.len();
        if found == arity {
            Ok(())
        } else {
            Err(Error::no_matching_constructor(&self.type_name(), found))
        }
    }

    fn positional_seq(self, len: usize) -> Result<ArgumentSeq> {
        self.reject_named()?;
        self.expect_arity(len)?;
        Ok(ArgumentSeq::new(self.extension.arguments.positional))
    }

    fn single(self) -> Result<ArgumentDeserializer> {
        self.reject_named()?;
        self.expect_arity(1)?;
        let raw = self
            .extension
            .arguments
            .positional
            .into_iter()
            .next()
            .unwrap_or_default();
        Ok(ArgumentDeserializer::new("0".to_string(), unescape(&raw)))
    }

    fn struct_map(self, fields: &'static [&'static str]) -> Result<ArgumentMap> {
        let positional = &self.extension.arguments.positional;
        if positional.len() > fields.len() {
            return Err(Error::no_matching_constructor(
                &self.type_name(),
                positional.len(),
            ));
        }

        let mut entries: NamedArguments = fields
            .iter()
            .zip(positional)
            .map(|(field, raw)| (field.to_string(), unescape(raw)))
            .collect();
        for (name, value) in &self.extension.arguments.named {
            entries.insert(unescape(name), unescape(value));
        }
        Ok(ArgumentMap::new(entries))
    }
}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let arguments = &self.extension.arguments;
        if !arguments.named.is_empty() {
            // Positional arguments are keyed by their index.
            let mut entries: NamedArguments = arguments
                .positional
                .iter()
                .enumerate()
                .map(|(index, raw)| (index.to_string(), unescape(raw)))
                .collect();
            for (name, value) in &arguments.named {
                entries.insert(unescape(name), unescape(value));
            }
            visitor.visit_map(ArgumentMap::new(entries))
        } else if !arguments.positional.is_empty() {
            visitor.visit_seq(ArgumentSeq::new(self.extension.arguments.positional))
        } else {
            visitor.visit_unit()
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.expect_type(name)?;
        self.reject_named()?;
        self.expect_arity(0)?;
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.expect_type(name)?;
        visitor.visit_newtype_struct(self.single()?)
    }

    fn deserialize_tuple_struct<V>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.expect_type(name)?;
        visitor.visit_seq(self.positional_seq(len)?)
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.expect_type(name)?;
        visitor.visit_map(self.struct_map(fields)?)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_enum(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit seq tuple map identifier ignored_any
    }
}

impl<'de> de::EnumAccess<'de> for Deserializer {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self)>
    where
        V: DeserializeSeed<'de>,
    {
        let variant: StringDeserializer<Error> =
            self.extension.type_name.name.clone().into_deserializer();
        let value = seed.deserialize(variant)?;
        Ok((value, self))
    }
}

impl<'de> de::VariantAccess<'de> for Deserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        self.reject_named()?;
        self.expect_arity(0)
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(self.single()?)
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(self.positional_seq(len)?)
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(self.struct_map(fields)?)
    }
}

/// Positional arguments as a serde sequence. Values are unescaped as they are read.
struct ArgumentSeq {
    args: std::iter::Enumerate<std::vec::IntoIter<String>>,
    remaining: usize,
}

impl ArgumentSeq {
    fn new(args: Vec<String>) -> Self {
        ArgumentSeq {
            remaining: args.len(),
            args: args.into_iter().enumerate(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for ArgumentSeq {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.args.next() {
            Some((index, raw)) => {
                self.remaining -= 1;
                seed.deserialize(ArgumentDeserializer::new(index.to_string(), unescape(&raw)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// Unescaped name/value pairs as a serde map.
struct ArgumentMap {
    entries: indexmap::map::IntoIter<String, String>,
    pending: Option<(String, String)>,
}

impl ArgumentMap {
    fn new(entries: NamedArguments) -> Self {
        ArgumentMap {
            entries: entries.into_iter(),
            pending: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for ArgumentMap {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.entries.next() {
            Some((name, value)) => {
                let key: StringDeserializer<Error> = name.clone().into_deserializer();
                self.pending = Some((name, value));
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let (name, value) = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("next_value_seed called before next_key_seed"))?;
        seed.deserialize(ArgumentDeserializer::new(name, value))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// One unescaped argument value. Primitives are parsed from the text on request.
struct ArgumentDeserializer {
    name: String,
    value: String,
}

impl ArgumentDeserializer {
    fn new(name: String, value: String) -> Self {
        ArgumentDeserializer { name, value }
    }

    fn conversion_error(&self, expected: &str) -> Error {
        Error::conversion(&self.name, &self.value, expected)
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                let parsed = self
                    .value
                    .trim()
                    .parse::<$ty>()
                    .map_err(|_| self.conversion_error(stringify!($ty)))?;
                visitor.$visit(parsed)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ArgumentDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.value)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let text = self.value.trim();
        if text.eq_ignore_ascii_case("true") {
            visitor.visit_bool(true)
        } else if text.eq_ignore_ascii_case("false") {
            visitor.visit_bool(false)
        } else {
            Err(self.conversion_error("bool"))
        }
    }

    deserialize_parsed! {
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_f32 => visit_f32(f32),
        deserialize_f64 => visit_f64(f64),
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let mut chars = self.value.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => visitor.visit_char(ch),
            _ => Err(self.conversion_error("char")),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let variant: StringDeserializer<Error> = self.value.into_deserializer();
        visitor.visit_enum(variant)
    }

    forward_to_deserialize_any! {
        i128 u128 str string bytes byte_buf unit_struct seq tuple tuple_struct
        map struct identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    enum Mode {
        OneWay,
        TwoWay,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct Binding {
        path: String,
        mode: Option<Mode>,
        delay: Option<u32>,
        validates: Option<bool>,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Point(i32, i32);

    #[derive(Deserialize, Debug, PartialEq)]
    struct Null;

    #[derive(Deserialize, Debug, PartialEq)]
    #[serde(rename = "x:Static")]
    struct Static(String);

    fn read<T: de::DeserializeOwned>(text: &str) -> Result<T> {
        T::deserialize(Deserializer::from_str(text)?)
    }

    #[test]
    fn test_named_fields() {
        let binding: Binding =
            read("{Binding Path=Name, Mode=TwoWay, Delay=250, Validates=True}").unwrap();
        assert_eq!(
            binding,
            Binding {
                path: "Name".to_string(),
                mode: Some(Mode::TwoWay),
                delay: Some(250),
                validates: Some(true),
            }
        );
    }

    #[test]
    fn test_positional_fills_leading_fields() {
        let binding: Binding = read("{Binding Items\\[0\\], Delay=5}").unwrap();
        assert_eq!(binding.path, "Items[0]");
        assert_eq!(binding.delay, Some(5));
        assert_eq!(binding.mode, None);
    }

    #[test]
    fn test_too_many_positional() {
        let err = read::<Binding>("{Binding a, b, c, d, e}").unwrap_err();
        assert_eq!(err, Error::no_matching_constructor("Binding", 5));
    }

    #[test]
    fn test_conversion_error() {
        let err = read::<Binding>("{Binding Path=a, Delay=soon}").unwrap_err();
        assert_eq!(err, Error::conversion("Delay", "soon", "u32"));
    }

    #[test]
    fn test_tuple_struct() {
        let point: Point = read("{Point 3, -4}").unwrap();
        assert_eq!(point, Point(3, -4));

        let err = read::<Point>("{Point 3}").unwrap_err();
        assert!(matches!(err, Error::NoMatchingConstructor { arity: 1, .. }));
    }

    #[test]
    fn test_tuple_struct_rejects_named() {
        let err = read::<Point>("{Point X=3}").unwrap_err();
        assert_eq!(err, Error::unknown_property("Point", "X"));
    }

    #[test]
    fn test_unit_struct() {
        assert_eq!(read::<Null>("{Null}").unwrap(), Null);
        assert!(read::<Null>("{Null x}").is_err());
    }

    #[test]
    fn test_prefixed_newtype() {
        let value: Static = read(r"{x:Static Colors.Red\,Blue}").unwrap();
        assert_eq!(value, Static("Colors.Red,Blue".to_string()));
    }

    #[test]
    fn test_type_mismatch() {
        let err = read::<Point>("{Size 1, 2}").unwrap_err();
        assert_eq!(err, Error::type_mismatch("Point", "Size"));
    }

    #[test]
    fn test_map_keeps_positional_and_named() {
        use std::collections::BTreeMap;

        let map: BTreeMap<String, String> =
            read(r"{Binding Items, Extra\,Item, Mode=OneWay}").unwrap();
        let expected: BTreeMap<String, String> = [
            ("0", "Items"),
            ("1", "Extra,Item"),
            ("Mode", "OneWay"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(map, expected);
    }

    #[test]
    fn test_enum_of_extensions() {
        #[derive(Deserialize, Debug, PartialEq)]
        enum Markup {
            Null,
            Static(String),
            Point(i32, i32),
            Binding { path: String },
        }

        assert_eq!(read::<Markup>("{Null}").unwrap(), Markup::Null);
        assert_eq!(
            read::<Markup>("{Static Key}").unwrap(),
            Markup::Static("Key".to_string())
        );
        assert_eq!(read::<Markup>("{Point 1,2}").unwrap(), Markup::Point(1, 2));
        assert_eq!(
            read::<Markup>("{Binding path=Name}").unwrap(),
            Markup::Binding {
                path: "Name".to_string()
            }
        );
    }
}
