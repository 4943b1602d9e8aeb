//! End-to-end tests building complete documents and checking the exact
//! rendered text.

#![allow(clippy::unwrap_used)]

use indoc::indoc;
use pretty_assertions::assert_eq;
use xmlsmith::tree::DtdDeclOptions;
use xmlsmith::{
    CdataOptions, CharRefOptions, CommentOptions, DeclOptions, Document, DtdOptions,
    ElementOptions, FormatOptions, ProcInstOptions,
};

fn xhtml_page() -> Document {
    let mut doc = Document::new();
    doc.decl(DeclOptions::new().encoding("UTF-8")).unwrap();
    doc.dtd(
        DtdOptions::new("html")
            .pub_id("-//W3C//DTD XHTML 1.0 Strict//EN")
            .sys_id("http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd"),
    )
    .unwrap();
    let html = doc.element(doc.root(), "html").unwrap();
    doc.attribute(html, ("xmlns", "http://www.w3.org/1999/xhtml"))
        .unwrap();
    let head = doc.element(html, "head").unwrap();
    let title = doc.element(head, "title").unwrap();
    doc.char_data(title, "My page title").unwrap();
    let body = doc.element(html, "body").unwrap();
    let h1 = doc.element(body, "h1").unwrap();
    doc.char_data(h1, "Welcome!").unwrap();
    doc
}

#[test]
fn test_xhtml_page_double_quotes() {
    let doc = xhtml_page();
    let expected = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">
        <html xmlns="http://www.w3.org/1999/xhtml">
            <head>
                <title>My page title</title>
            </head>
            <body>
                <h1>Welcome!</h1>
            </body>
        </html>"#};
    let options = FormatOptions::default().double_quotes(true);
    assert_eq!(doc.to_xml_with(&options).unwrap(), expected);
}

#[test]
fn test_xhtml_page_default_options() {
    let doc = xhtml_page();
    let expected = indoc! {r#"
        <?xml version='1.0' encoding='UTF-8'?>
        <!DOCTYPE html PUBLIC '-//W3C//DTD XHTML 1.0 Strict//EN' 'http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd'>
        <html xmlns='http://www.w3.org/1999/xhtml'>
            <head>
                <title>My page title</title>
            </head>
            <body>
                <h1>Welcome!</h1>
            </body>
        </html>"#};
    assert_eq!(doc.to_xml().unwrap(), expected);
}

#[test]
fn test_xhtml_page_via_cursor_matches_factories() {
    let mut doc = Document::new();
    doc.decl(DeclOptions::new().encoding("UTF-8")).unwrap();
    doc.dtd(
        DtdOptions::new("html")
            .pub_id("-//W3C//DTD XHTML 1.0 Strict//EN")
            .sys_id("http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd"),
    )
    .unwrap();
    let _ = doc
        .root_cursor()
        .element("html")
        .unwrap()
        .attribute(("xmlns", "http://www.w3.org/1999/xhtml"))
        .unwrap()
        .up()
        .element("head")
        .unwrap()
        .element("title")
        .unwrap()
        .char_data("My page title")
        .unwrap()
        .up()
        .up()
        .up()
        .element("body")
        .unwrap()
        .element("h1")
        .unwrap()
        .char_data("Welcome!")
        .unwrap();
    assert_eq!(doc.to_xml().unwrap(), xhtml_page().to_xml().unwrap());
}

#[test]
fn test_compact_output() {
    let doc = xhtml_page();
    let options = FormatOptions::default().pretty(false);
    assert_eq!(
        doc.to_xml_with(&options).unwrap(),
        "<?xml version='1.0' encoding='UTF-8'?>\
         <!DOCTYPE html PUBLIC '-//W3C//DTD XHTML 1.0 Strict//EN' \
         'http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd'>\
         <html xmlns='http://www.w3.org/1999/xhtml'><head><title>My page title</title></head>\
         <body><h1>Welcome!</h1></body></html>"
    );
}

#[test]
fn test_mixed_content_layout() {
    let mut doc = Document::new();
    let a = doc.element(doc.root(), "a").unwrap();
    doc.char_data(a, "bbb").unwrap();
    doc.entity_ref(a, "c").unwrap();
    doc.char_ref(a, 'd').unwrap();
    assert_eq!(doc.to_xml().unwrap(), "<a>bbb&c;&#100;</a>");

    doc.comment(a, "note").unwrap();
    doc.char_data(a, "tail").unwrap();
    doc.char_ref(a, CharRefOptions::new("e").hex(true)).unwrap();
    let expected = indoc! {"
        <a>
            bbb&c;&#100;
            <!--note-->
            tail&#x65;
        </a>"};
    assert_eq!(doc.to_xml().unwrap(), expected);
}

#[test]
fn test_document_with_full_dtd_and_prolog_nodes() {
    let mut doc = Document::new();
    doc.decl(DeclOptions::new().version("1.1").standalone("no"))
        .unwrap();
    doc.proc_inst(
        doc.root(),
        ProcInstOptions::new("xml-stylesheet").content("href='style.xsl' type='text/xsl'"),
    )
    .unwrap();
    let dtd = doc.dtd(DtdOptions::new("library").sys_id("library.dtd")).unwrap();
    doc.dtd_element(dtd, "library (book*)").unwrap();
    doc.dtd_attlist(dtd, DtdDeclOptions::new("book isbn CDATA #REQUIRED"))
        .unwrap();
    doc.dtd_entity(dtd, "publisher \"ACME Books\"").unwrap();
    doc.dtd_notation(dtd, "gif SYSTEM \"image/gif\"").unwrap();
    doc.dtd_param_entity_ref(dtd, "extras").unwrap();
    doc.comment(dtd, " end of subset ").unwrap();
    doc.comment(doc.root(), " generated ").unwrap();

    let library = doc.element(doc.root(), "library").unwrap();
    let book = doc.element(library, "book").unwrap();
    doc.attribute(book, ("isbn", "0-123")).unwrap();
    doc.entity_ref(book, "publisher").unwrap();
    doc.cdata(book, CdataOptions::new("if (a < b && c) {}"))
        .unwrap();
    doc.element(library, ElementOptions::new("shelf").use_self_closing_tag_if_empty(false))
        .unwrap();

    let expected = indoc! {r#"
        <?xml version='1.1' standalone='no'?>
        <?xml-stylesheet href='style.xsl' type='text/xsl'?>
        <!DOCTYPE library SYSTEM 'library.dtd' [
            <!ELEMENT library (book*)>
            <!ATTLIST book isbn CDATA #REQUIRED>
            <!ENTITY publisher "ACME Books">
            <!NOTATION gif SYSTEM "image/gif">
            %extras;
            <!-- end of subset -->
        ]>
        <!-- generated -->
        <library>
            <book isbn='0-123'>
                &publisher;
                <![CDATA[if (a < b && c) {}]]>
            </book>
            <shelf></shelf>
        </library>"#};
    assert_eq!(doc.to_xml().unwrap(), expected);
}

#[test]
fn test_repaired_fields_render() {
    let mut doc = Document::new();
    let root = doc
        .element(
            doc.root(),
            ElementOptions::new("1st item").replace_invalid_chars_in_name(true),
        )
        .unwrap();
    doc.comment(
        root,
        CommentOptions::new("a--b-").replace_invalid_chars_in_char_data(true),
    )
    .unwrap();
    doc.cdata(
        root,
        CdataOptions::new("x]]>y").replace_invalid_chars_in_char_data(true),
    )
    .unwrap();
    assert_eq!(
        doc.to_xml_with(&FormatOptions::default().pretty(false))
            .unwrap(),
        "<\u{FFFD}st\u{FFFD}item><!--a\u{FFFD}\u{FFFD}b\u{FFFD}-->\
         <![CDATA[x\u{FFFD}\u{FFFD}\u{FFFD}y]]></\u{FFFD}st\u{FFFD}item>"
    );
}

#[test]
fn test_crlf_newlines_and_tab_indent() {
    let mut doc = Document::new();
    doc.decl(DeclOptions::new()).unwrap();
    let root = doc.element(doc.root(), "root").unwrap();
    let child = doc.element(root, "child").unwrap();
    doc.element(child, "leaf").unwrap();
    let options = FormatOptions::default().indent("\t").newline("\r\n");
    assert_eq!(
        doc.to_xml_with(&options).unwrap(),
        "<?xml version='1.0'?>\r\n<root>\r\n\t<child>\r\n\t\t<leaf/>\r\n\t</child>\r\n</root>"
    );
}
