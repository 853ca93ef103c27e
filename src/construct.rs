//! Applying bound arguments to a host type.
//!
//! Type reflection lives outside this crate. A host describes one target type through
//! [`ExtensionType`], and [`instantiate`] applies the binding policy:
//!
//! - **Construction**: the first constructor, in the order the host lists them, whose
//!   parameter count equals the number of positional arguments. Parameter types are not
//!   considered. No match aborts the call.
//! - **Properties**: each named argument is unescaped once and applied by exact,
//!   case-sensitive name. An unknown name or a rejected value is recorded as a
//!   diagnostic and the remaining arguments are still applied.
//!
//! ```rust
//! use compact_markup::construct::{instantiate, ExtensionType};
//! use compact_markup::{parse, Error, Result};
//!
//! #[derive(Default)]
//! struct Binding { path: String, mode: String }
//!
//! struct BindingType;
//!
//! impl ExtensionType for BindingType {
//!     type Instance = Binding;
//!
//!     fn type_name(&self) -> &str { "Binding" }
//!
//!     fn constructor_arities(&self) -> Vec<usize> { vec![0, 1] }
//!
//!     fn construct(&self, _index: usize, args: Vec<String>) -> Result<Binding> {
//!         let path = args.into_iter().next().unwrap_or_default();
//!         Ok(Binding { path, ..Binding::default() })
//!     }
//!
//!     fn has_property(&self, name: &str) -> bool {
//!         matches!(name, "Path" | "Mode")
//!     }
//!
//!     fn set_property(&self, target: &mut Binding, name: &str, value: &str) -> Result<()> {
//!         match name {
//!             "Path" => target.path = value.to_string(),
//!             _ => target.mode = value.to_string(),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let ext = parse("{Binding Name, Mode=OneWay, Colour=Red}").unwrap();
//! let built = instantiate(&BindingType, &ext.arguments).unwrap();
//!
//! assert_eq!(built.instance.path, "Name");
//! assert_eq!(built.instance.mode, "OneWay");
//! assert_eq!(built.diagnostics.len(), 1);
//! assert!(matches!(built.diagnostics[0], Error::UnknownProperty { .. }));
//! ```

use crate::escape::unescape;
use crate::{BoundArguments, Error, Result};

/// A host type that compact markup extensions can be bound to.
pub trait ExtensionType {
    type Instance;

    /// Name used in diagnostics.
    fn type_name(&self) -> &str;

    /// Parameter counts of the available constructors, in enumeration order.
    fn constructor_arities(&self) -> Vec<usize>;

    /// Invokes the constructor at `index` (into [`constructor_arities`]) with unescaped
    /// positional arguments.
    ///
    /// [`constructor_arities`]: ExtensionType::constructor_arities
    fn construct(&self, index: usize, args: Vec<String>) -> Result<Self::Instance>;

    /// Returns `true` if `name` is a declared or attached property of this type.
    fn has_property(&self, name: &str) -> bool;

    /// Converts `value` and assigns it. Only called for names accepted by
    /// [`has_property`](ExtensionType::has_property).
    fn set_property(&self, instance: &mut Self::Instance, name: &str, value: &str)
        -> Result<()>;
}

/// A constructed instance together with the non-fatal problems met while binding it.
#[derive(Debug)]
pub struct Materialized<T> {
    pub instance: T,
    pub diagnostics: Vec<Error>,
}

impl<T> Materialized<T> {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Returns the index of the first constructor taking exactly `arity` arguments.
#[must_use]
pub fn select_constructor(arities: &[usize], arity: usize) -> Option<usize> {
    arities.iter().position(|&a| a == arity)
}

/// Constructs an instance of `ty` from `arguments` and applies its named arguments.
///
/// # Errors
///
/// Returns [`Error::NoMatchingConstructor`] if no constructor has the right arity, or
/// the host's error if the selected constructor fails. Property problems are returned
/// in [`Materialized::diagnostics`] instead.
pub fn instantiate<M>(ty: &M, arguments: &BoundArguments) -> Result<Materialized<M::Instance>>
where
    M: ExtensionType + ?Sized,
{
    let arity = arguments.positional.len();
    let index = select_constructor(&ty.constructor_arities(), arity)
        .ok_or_else(|| Error::no_matching_constructor(ty.type_name(), arity))?;

    let mut instance = ty.construct(index, arguments.positional_values())?;
    let mut diagnostics = Vec::new();

    for (raw_name, raw_value) in &arguments.named {
        let name = unescape(raw_name);
        let value = unescape(raw_value);

        let outcome = if ty.has_property(&name) {
            ty.set_property(&mut instance, &name, &value)
        } else {
            Err(Error::unknown_property(ty.type_name(), &name))
        };

        if let Err(err) = outcome {
            tracing::warn!(
                type_name = ty.type_name(),
                property = name.as_str(),
                error = %err,
                "markup extension argument not applied"
            );
            diagnostics.push(err);
        }
    }

    Ok(Materialized {
        instance,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[derive(Debug, Default, PartialEq)]
    struct Thickness {
        ctor: usize,
        left: f64,
        top: f64,
        label: String,
    }

    struct ThicknessType;

    impl ExtensionType for ThicknessType {
        type Instance = Thickness;

        fn type_name(&self) -> &str {
            "Thickness"
        }

        fn constructor_arities(&self) -> Vec<usize> {
            vec![0, 2, 2]
        }

        fn construct(&self, index: usize, args: Vec<String>) -> Result<Thickness> {
            let mut t = Thickness {
                ctor: index,
                ..Thickness::default()
            };
            if let [left, top] = args.as_slice() {
                t.left = left
                    .parse()
                    .map_err(|_| Error::conversion("left", left, "f64"))?;
                t.top = top
                    .parse()
                    .map_err(|_| Error::conversion("top", top, "f64"))?;
            }
            Ok(t)
        }

        fn has_property(&self, name: &str) -> bool {
            matches!(name, "Left" | "Top" | "Label")
        }

        fn set_property(&self, t: &mut Thickness, name: &str, value: &str) -> Result<()> {
            match name {
                "Label" => t.label = value.to_string(),
                _ => {
                    let v = value
                        .parse()
                        .map_err(|_| Error::conversion(name, value, "f64"))?;
                    if name == "Left" {
                        t.left = v;
                    } else {
                        t.top = v;
                    }
                }
            }
            Ok(())
        }
    }

    fn build(text: &str) -> Result<Materialized<Thickness>> {
        let ext = parse(text)?;
        instantiate(&ThicknessType, &ext.arguments)
    }

    #[test]
    fn test_default_constructor() {
        let built = build("{Thickness}").unwrap();
        assert_eq!(built.instance.ctor, 0);
        assert!(built.is_clean());
    }

    #[test]
    fn test_first_arity_match_wins() {
        let built = build("{Thickness 1, 2}").unwrap();
        assert_eq!(built.instance.ctor, 1);
        assert_eq!(built.instance.left, 1.0);
        assert_eq!(built.instance.top, 2.0);
    }

    #[test]
    fn test_no_matching_constructor_aborts() {
        let err = build("{Thickness 1}").unwrap_err();
        assert_eq!(err, Error::no_matching_constructor("Thickness", 1));
    }

    #[test]
    fn test_constructor_failure_aborts() {
        let err = build("{Thickness a, 2}").unwrap_err();
        assert!(matches!(err, Error::Conversion { .. }));
    }

    #[test]
    fn test_property_errors_do_not_stop_siblings() {
        let built = build("{Thickness Left=x, Colour=Red, Top=4, Label=a\\,b}").unwrap();
        assert_eq!(built.instance.top, 4.0);
        assert_eq!(built.instance.label, "a,b");
        assert_eq!(built.diagnostics.len(), 2);
        assert!(built.diagnostics.iter().all(Error::is_binding));
        assert_eq!(
            built.diagnostics[1],
            Error::unknown_property("Thickness", "Colour")
        );
    }

    #[test]
    fn test_property_names_are_case_sensitive() {
        let built = build("{Thickness left=1}").unwrap();
        assert_eq!(built.instance.left, 0.0);
        assert_eq!(
            built.diagnostics,
            vec![Error::unknown_property("Thickness", "left")]
        );
    }

    #[test]
    fn test_select_constructor() {
        assert_eq!(select_constructor(&[1, 2, 2], 2), Some(1));
        assert_eq!(select_constructor(&[1, 2], 0), None);
    }
}
