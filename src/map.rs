//! Ordered map of named arguments.
//!
//! [`NamedArguments`] wraps an [`IndexMap`] so that `Name=Value` pairs keep the order
//! they were written in. Re-inserting an existing name replaces its value but keeps
//! the position of its first occurrence.
//!
//! ```rust
//! use compact_markup::NamedArguments;
//!
//! let mut named = NamedArguments::new();
//! named.insert("Path".to_string(), "Name".to_string());
//! named.insert("Mode".to_string(), "OneWay".to_string());
//! named.insert("Path".to_string(), "Title".to_string());
//!
//! let keys: Vec<_> = named.keys().cloned().collect();
//! assert_eq!(keys, vec!["Path", "Mode"]);
//! assert_eq!(named.get("Path"), Some("Title"));
//! ```

use indexmap::IndexMap;

/// Named arguments in first-occurrence order. Values are raw, still-escaped text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedArguments(IndexMap<String, String>);

impl NamedArguments {
    #[must_use]
    pub fn new() -> Self {
        NamedArguments(IndexMap::new())
    }

    /// Inserts a pair, returning the previous value for `name` if there was one.
    pub fn insert(&mut self, name: String, value: String) -> Option<String> {
        self.0.insert(name, value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, String> {
        self.0.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl IntoIterator for NamedArguments {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a NamedArguments {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, String)> for NamedArguments {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        NamedArguments(IndexMap::from_iter(iter))
    }
}
