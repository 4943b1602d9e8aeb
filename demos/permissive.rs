//! Shows how strict, permissive and repairing documents treat the same
//! malformed input.
//!
//! Run with `cargo run --example permissive`.

use xmlsmith::{CharDataOptions, Document, ElementOptions};

const NAME: &str = "my element";
const TEXT: &str = "bell\u{7} and ]]> inside";

fn main() -> xmlsmith::Result<()> {
    let mut strict = Document::new();
    match strict.element(strict.root(), NAME) {
        Ok(_) => println!("strict: accepted"),
        Err(err) => println!("strict: {err}"),
    }

    let mut permissive = Document::with_validation(false);
    let root = permissive.element(permissive.root(), NAME)?;
    permissive.char_data(root, TEXT)?;
    println!("permissive: {}", permissive.to_xml()?);

    let mut repaired = Document::new();
    let root = repaired.element(
        repaired.root(),
        ElementOptions::new(NAME).replace_invalid_chars_in_name(true),
    )?;
    repaired.char_data(
        root,
        CharDataOptions::new(TEXT).replace_invalid_chars_in_char_data(true),
    )?;
    println!("repaired: {}", repaired.to_xml()?);
    Ok(())
}
