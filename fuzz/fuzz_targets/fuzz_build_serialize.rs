#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlsmith::{Document, FormatOptions};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let mut parts = s.split('\u{0}');
    let name = parts.next().unwrap_or_default();
    let text = parts.next().unwrap_or_default();

    // Permissive documents accept anything and must always render
    let mut doc = Document::with_validation(false);
    let root = doc.root();
    let Ok(element) = doc.element(root, name) else {
        return;
    };
    let _ = doc.attribute(element, (name, text));
    let _ = doc.char_data(element, text);
    let _ = doc.comment(element, text);
    let _ = doc.cdata(element, text);
    let _ = doc.char_ref(element, text);
    let _ = doc.dtd(name);
    let _ = doc.to_xml();
    let _ = doc.to_xml_with(&FormatOptions::default().double_quotes(true).pretty(false));

    // Strict documents either reject input or render it
    let mut doc = Document::new();
    let root = doc.root();
    if let Ok(element) = doc.element(root, name) {
        let _ = doc.char_data(element, text);
        let _ = doc.attribute(element, (name, text));
        let _ = doc.to_xml();
    }
});
