//! Property-based tests for the escaping and round-trip guarantees.

use compact_markup::{
    bind, escape, extension_to_string, tokenize, unescape, ExtensionData, MarkupOptions,
    TypeName,
};
use proptest::prelude::*;

fn value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9]([a-zA-Z0-9 _.:\\[\\]=,{}'\"\\\\]{0,20}[a-zA-Z0-9])?",
        // Empty, whitespace-edged and bracket-edged values take the quoting path.
        "[ \t]{0,2}[\\[\\]]?[a-zA-Z0-9 _.:\\[\\]=,{}'\"\\\\]{0,12}[\\[\\]]?[ \t]{0,2}",
    ]
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9]{0,10}"
}

proptest! {
    #[test]
    fn prop_unescape_inverts_escape(s in any::<String>()) {
        prop_assert_eq!(unescape(&escape(&s)), s);
    }

    #[test]
    fn prop_unescape_never_panics(s in "\\PC*") {
        let _ = unescape(&s);
    }

    #[test]
    fn prop_tokenize_never_panics(s in "\\PC*") {
        let _ = tokenize(&s);
    }

    #[test]
    fn prop_serialize_bind_round_trip(
        positional in prop::collection::vec(value_strategy(), 0..4),
        named in prop::collection::btree_map(name_strategy(), value_strategy(), 0..4),
    ) {
        let mut data = ExtensionData::new(TypeName::new("Ext"));
        for value in &positional {
            data = data.with_positional(value.as_str());
        }
        for (name, value) in &named {
            data = data.with_named(name.as_str(), value.as_str());
        }

        let text = extension_to_string(&data, &MarkupOptions::default());
        let args = text.strip_prefix("{Ext").unwrap().trim_start_matches(' ');

        let tokens = tokenize(args).unwrap().tokens().cloned();
        prop_assert!(tokens.is_some(), "malformed: {}", text);
        let bound = bind(&tokens.unwrap_or_default());

        prop_assert_eq!(bound.positional_values(), positional);
        let expected: Vec<(String, String)> = named.into_iter().collect();
        prop_assert_eq!(bound.named_values(), expected);
    }
}
