//! Builds a small XHTML page and prints it.
//!
//! Run with `cargo run --example xhtml`.

use xmlsmith::{DeclOptions, Document, DtdOptions, FormatOptions};

fn main() -> xmlsmith::Result<()> {
    let mut doc = Document::new();
    doc.decl(DeclOptions::new().encoding("UTF-8"))?;
    doc.dtd(
        DtdOptions::new("html")
            .pub_id("-//W3C//DTD XHTML 1.0 Strict//EN")
            .sys_id("http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd"),
    )?;
    doc.root_cursor()
        .element("html")?
        .attribute(("xmlns", "http://www.w3.org/1999/xhtml"))?
        .up()
        .element("head")?
        .element("title")?
        .char_data("My page title")?
        .up()
        .up()
        .up()
        .element("body")?
        .element("h1")?
        .char_data("Welcome!")?;

    let options = FormatOptions::default().double_quotes(true);
    println!("{}", doc.to_xml_with(&options)?);
    Ok(())
}
