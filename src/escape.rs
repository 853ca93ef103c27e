//! Backslash escaping for argument text.
//!
//! The characters `= , " ' { } \` are syntactically significant inside a compact
//! markup extension. [`escape`] prefixes each of them with `\` when writing, and
//! [`unescape`] removes one level of escaping when a bound argument is used.
//!
//! ```rust
//! use compact_markup::{escape, unescape};
//!
//! let raw = "a,b={c}";
//! let escaped = escape(raw);
//! assert_eq!(escaped, r"a\,b\=\{c\}");
//! assert_eq!(unescape(&escaped), raw);
//! ```

/// Characters that must be escaped inside argument text.
pub const SIGNIFICANT: [char; 7] = ['=', ',', '"', '\'', '{', '}', '\\'];

#[inline]
fn is_significant(ch: char) -> bool {
    SIGNIFICANT.contains(&ch)
}

/// Returns `s` with every significant character prefixed by a backslash.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    escape_into(&mut out, s);
    out
}

/// Appends the escaped form of `s` to `out`.
pub fn escape_into(out: &mut String, s: &str) {
    for ch in s.chars() {
        if is_significant(ch) {
            out.push('\\');
        }
        out.push(ch);
    }
}

/// Returns `true` if `s` contains any character [`escape`] would change.
#[must_use]
pub fn needs_escape(s: &str) -> bool {
    s.chars().any(is_significant)
}

/// Removes one level of backslash escaping.
///
/// Every unescaped `\` is dropped and the following character is copied verbatim,
/// whatever it is. A trailing lone `\` is dropped.
#[must_use]
pub fn unescape(s: &str) -> String {
    if !s.contains('\\') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Returns `true` if the raw (still escaped) argument is itself a nested markup
/// extension, i.e. it opens with an unescaped `{`.
///
/// ```rust
/// use compact_markup::escape::is_nested_extension;
///
/// assert!(is_nested_extension("{StaticResource Key}"));
/// assert!(!is_nested_extension(r"\{literal\}"));
/// ```
#[must_use]
pub fn is_nested_extension(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.starts_with('{') && !trimmed.starts_with("{}") && trimmed.ends_with('}')
}
