//! Reading, inspecting and rewriting a compact markup extension.
//!
//! Run with: cargo run --example round_trip

use compact_markup::{
    extension_to_string, parse, tokenize, ArgumentSeparator, ExtensionData, MarkupOptions,
    Tokenized,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let source = r"{wf:ActivityBind Workflow1, Path=Items[\'key\'].Value, Note='a, b'}";

    let ext = parse(source)?;
    println!("type:       {}", ext.type_name);
    println!("positional: {:?}", ext.arguments.positional_values());
    for (name, value) in ext.arguments.named_values() {
        println!("named:      {} = {:?}", name, value);
    }

    // Write it back with a spaced separator
    let mut data = ExtensionData::new(ext.type_name.clone());
    for value in ext.arguments.positional_values() {
        data = data.with_positional(value);
    }
    for (name, value) in ext.arguments.named_values() {
        data = data.with_named(name, value);
    }
    let options = MarkupOptions::new().with_separator(ArgumentSeparator::CommaSpace);
    println!("\nrewritten:  {}", extension_to_string(&data, &options));

    // Malformed lists are reported, not silently empty
    match tokenize("a,,b}")? {
        Tokenized::Arguments(tokens) => println!("tokens: {}", tokens.len()),
        Tokenized::Malformed => println!("\n'a,,b}}' is a malformed argument list"),
    }

    Ok(())
}
