//! Compact markup serialization.
//!
//! Two entry points:
//!
//! - [`write_extension`] / [`extension_to_string`]: write an [`ExtensionData`] that the
//!   caller assembled from an object's constructor arguments and properties.
//! - [`Serializer`]: a serde serializer that turns a struct into named arguments and a
//!   tuple struct into positional arguments.
//!
//! ## Output Shape
//!
//! ```text
//! {prefix:Type pos1,pos2,Name1=Value1,Name2=Value2}
//! ```
//!
//! String values are escaped, so anything written can be read back unchanged:
//!
//! ```rust
//! use compact_markup::{extension_to_string, ExtensionData, MarkupOptions, TypeName};
//!
//! let data = ExtensionData::new(TypeName::with_prefix("x", "Static"))
//!     .with_positional("a,b")
//!     .with_named("Note", "{not nested}");
//!
//! let text = extension_to_string(&data, &MarkupOptions::default());
//! assert_eq!(text, r"{x:Static a\,b,Note=\{not nested\}}");
//! ```

use crate::escape::escape_into;
use crate::{ArgumentValue, Error, ExtensionData, MarkupOptions, Result, TypeName};
use serde::ser::{self, Impossible, Serializer as _};
use serde::Serialize;
use std::fmt;

fn push_type_name(out: &mut String, type_name: &TypeName, options: &MarkupOptions) {
    let prefix = type_name
        .prefix
        .as_deref()
        .or(options.default_prefix.as_deref());
    if let Some(prefix) = prefix {
        out.push_str(prefix);
        out.push(':');
    }
    out.push_str(&type_name.name);
}

// Values the tokenizer would trim away or read as an adjacent delimiter need quotes.
fn needs_quotes(s: &str) -> bool {
    s.is_empty() || s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace)
}

fn push_value(out: &mut String, value: &ArgumentValue, options: &MarkupOptions) {
    match value {
        ArgumentValue::String(s) if needs_quotes(s) => {
            let quote = options.quote.as_char();
            out.push(quote);
            escape_into(out, s);
            out.push(quote);
        }
        ArgumentValue::String(s) => escape_into(out, s),
        ArgumentValue::Type(type_name) => push_type_name(out, type_name, options),
        ArgumentValue::Extension(text) => out.push_str(text),
    }
}

fn push_extension(out: &mut String, data: &ExtensionData, options: &MarkupOptions) {
    out.push('{');
    push_type_name(out, &data.type_name, options);

    let mut first = true;
    let mut separator = |out: &mut String| {
        if first {
            out.push(' ');
            first = false;
        } else {
            out.push_str(options.separator.as_str());
        }
    };

    for value in &data.positional {
        separator(out);
        push_value(out, value, options);
    }

    for (name, value) in &data.named {
        if data.is_covered(name) {
            continue;
        }
        separator(out);
        escape_into(out, name);
        out.push('=');
        push_value(out, value, options);
    }

    out.push('}');
}

/// Renders one extension to a string.
#[must_use]
pub fn extension_to_string(data: &ExtensionData, options: &MarkupOptions) -> String {
    let mut out = String::with_capacity(64);
    push_extension(&mut out, data, options);
    out
}

/// Writes one extension to `sink`.
///
/// # Errors
///
/// Returns an error only if the sink fails.
pub fn write_extension<W>(sink: &mut W, data: &ExtensionData, options: &MarkupOptions) -> Result<()>
where
    W: fmt::Write + ?Sized,
{
    sink.write_str(&extension_to_string(data, options))?;
    Ok(())
}

/// The serde serializer for compact markup extensions.
///
/// Only struct-like values have a markup form:
///
/// | Rust shape | Output |
/// |---|---|
/// | `struct Binding { path: .. }` | `{Binding path=..}` |
/// | `struct Static(String)` | `{Static ..}` |
/// | `struct Null;` | `{Null}` |
/// | enum variants of those shapes | the variant name is the type name |
///
/// Field values must be primitives, strings, unit enum variants or options; `None`
/// fields are left out.
pub struct Serializer {
    output: String,
    options: MarkupOptions,
}

impl Serializer {
    pub fn new(options: MarkupOptions) -> Self {
        Serializer {
            output: String::with_capacity(64),
            options,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    fn finish(&mut self, data: &ExtensionData) {
        push_extension(&mut self.output, data, &self.options);
    }

    fn start(&mut self, name: &str) -> ExtensionSerializer<'_> {
        ExtensionSerializer {
            data: ExtensionData::new(TypeName::parse(name)),
            ser: self,
        }
    }
}

fn not_an_extension(what: &str) -> Error {
    Error::unsupported_type(&format!("{} cannot be written as a markup extension", what))
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = ExtensionSerializer<'a>;
    type SerializeTupleVariant = ExtensionSerializer<'a>;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = ExtensionSerializer<'a>;
    type SerializeStructVariant = ExtensionSerializer<'a>;

    fn serialize_bool(self, _v: bool) -> Result<()> {
        Err(not_an_extension("bool"))
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, _v: i64) -> Result<()> {
        Err(not_an_extension("integer"))
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, _v: u64) -> Result<()> {
        Err(not_an_extension("integer"))
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, _v: f64) -> Result<()> {
        Err(not_an_extension("float"))
    }

    fn serialize_char(self, _v: char) -> Result<()> {
        Err(not_an_extension("char"))
    }

    fn serialize_str(self, _v: &str) -> Result<()> {
        Err(not_an_extension("string"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(not_an_extension("bytes"))
    }

    fn serialize_none(self) -> Result<()> {
        Err(not_an_extension("None"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Err(not_an_extension("()"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<()> {
        let data = ExtensionData::new(TypeName::parse(name));
        self.finish(&data);
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.serialize_unit_struct(variant)
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let mut ext = self.start(name);
        ser::SerializeTupleStruct::serialize_field(&mut ext, value)?;
        ser::SerializeTupleStruct::end(ext)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.serialize_newtype_struct(variant, value)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(not_an_extension("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(not_an_extension("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(self.start(name))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(self.start(variant))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(not_an_extension("map"))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(self.start(name))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(self.start(variant))
    }
}

/// Collects the arguments of one struct-like value.
pub struct ExtensionSerializer<'a> {
    ser: &'a mut Serializer,
    data: ExtensionData,
}

impl ExtensionSerializer<'_> {
    fn positional<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match value.serialize(ArgumentSerializer)? {
            Some(arg) => {
                self.data.positional.push(arg);
                Ok(())
            }
            None => Err(Error::unsupported_type(
                "positional argument of a markup extension cannot be None",
            )),
        }
    }

    fn named<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(arg) = value.serialize(ArgumentSerializer)? {
            self.data.named.push((key.to_string(), arg));
        }
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.ser.finish(&self.data);
        Ok(())
    }
}

impl ser::SerializeTupleStruct for ExtensionSerializer<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.positional(value)
    }

    fn end(self) -> Result<()> {
        self.close()
    }
}

impl ser::SerializeTupleVariant for ExtensionSerializer<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.positional(value)
    }

    fn end(self) -> Result<()> {
        self.close()
    }
}

impl ser::SerializeStruct for ExtensionSerializer<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.named(key, value)
    }

    fn end(self) -> Result<()> {
        self.close()
    }
}

impl ser::SerializeStructVariant for ExtensionSerializer<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.named(key, value)
    }

    fn end(self) -> Result<()> {
        self.close()
    }
}

/// Reduces one field value to an [`ArgumentValue`]. `None` means "leave it out".
struct ArgumentSerializer;

fn not_an_argument(what: &str) -> Error {
    Error::unsupported_type(&format!(
        "{} cannot be written as a markup extension argument",
        what
    ))
}

type Argument = Option<ArgumentValue>;

impl ser::Serializer for ArgumentSerializer {
    type Ok = Argument;
    type Error = Error;

    type SerializeSeq = Impossible<Argument, Error>;
    type SerializeTuple = Impossible<Argument, Error>;
    type SerializeTupleStruct = Impossible<Argument, Error>;
    type SerializeTupleVariant = Impossible<Argument, Error>;
    type SerializeMap = Impossible<Argument, Error>;
    type SerializeStruct = Impossible<Argument, Error>;
    type SerializeStructVariant = Impossible<Argument, Error>;

    fn serialize_bool(self, v: bool) -> Result<Argument> {
        Ok(Some(ArgumentValue::String(v.to_string())))
    }

    fn serialize_i8(self, v: i8) -> Result<Argument> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Argument> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Argument> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Argument> {
        Ok(Some(ArgumentValue::String(v.to_string())))
    }

    fn serialize_u8(self, v: u8) -> Result<Argument> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Argument> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Argument> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Argument> {
        Ok(Some(ArgumentValue::String(v.to_string())))
    }

    fn serialize_f32(self, v: f32) -> Result<Argument> {
        Ok(Some(ArgumentValue::String(v.to_string())))
    }

    fn serialize_f64(self, v: f64) -> Result<Argument> {
        Ok(Some(ArgumentValue::String(v.to_string())))
    }

    fn serialize_char(self, v: char) -> Result<Argument> {
        Ok(Some(ArgumentValue::String(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Argument> {
        Ok(Some(ArgumentValue::String(v.to_string())))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Argument> {
        Err(not_an_argument("bytes"))
    }

    fn serialize_none(self) -> Result<Argument> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Argument>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Argument> {
        Ok(None)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Argument> {
        Err(not_an_argument(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Argument> {
        Ok(Some(ArgumentValue::String(variant.to_string())))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Argument>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<Argument>
    where
        T: ?Sized + Serialize,
    {
        Err(not_an_argument(variant))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(not_an_argument("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(not_an_argument("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(not_an_argument(name))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(not_an_argument(variant))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(not_an_argument("map"))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(not_an_argument(name))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(not_an_argument(variant))
    }
}
