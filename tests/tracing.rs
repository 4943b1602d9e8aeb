//! Smoke test running the builders with the `tracing` feature enabled and
//! a subscriber installed, so the trace and debug events are emitted.

#![cfg(feature = "tracing")]
#![allow(clippy::unwrap_used)]

use std::sync::Once;
use xmlsmith::{CharDataOptions, Document, ElementOptions};

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .with_target(false)
            .init();
    });
}

#[test]
fn test_build_with_tracing() {
    init_tracing();
    let mut doc = Document::new();
    let root = doc
        .element(
            doc.root(),
            ElementOptions::new("bad name").replace_invalid_chars_in_name(true),
        )
        .unwrap();
    let text = doc
        .char_data(
            root,
            CharDataOptions::new("nul\u{0}").replace_invalid_chars_in_char_data(true),
        )
        .unwrap();
    doc.remove_child(root, text).unwrap();
    doc.insert_child(root, text, Some(0)).unwrap();
    assert_eq!(doc.to_xml().unwrap(), "<bad\u{FFFD}name>nul\u{FFFD}</bad\u{FFFD}name>");
}
