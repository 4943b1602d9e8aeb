//! XML serializer.
//!
//! Renders a `Document` tree, or a single subtree, into an XML string by a
//! depth-first walk that concatenates each node's markup.

use super::FormatOptions;
use crate::error::{Error, Result};
use crate::tree::{Document, NodeId, NodeKind};
use crate::util::escape::{
    escape_ampersands, escape_cdata_terminators, escape_left_angle_brackets, escape_quotes,
};

/// Serializes a document to an XML string with default [`FormatOptions`].
///
/// # Errors
///
/// See [`serialize_with_options`].
///
/// # Examples
///
/// ```
/// use xmlsmith::Document;
/// use xmlsmith::serial::serialize;
///
/// let mut doc = Document::new();
/// let root = doc.element(doc.root(), "root")?;
/// doc.char_data(root, "Hello")?;
/// assert_eq!(serialize(&doc)?, "<root>Hello</root>");
/// # Ok::<(), xmlsmith::Error>(())
/// ```
pub fn serialize(doc: &Document) -> Result<String> {
    serialize_with_options(doc, &FormatOptions::default())
}

/// Serializes a document to an XML string with the given options.
///
/// Document children are rendered one per line when `options.pretty` is
/// set, with no trailing newline.
///
/// # Errors
///
/// In strict mode: the document does not have exactly one root element, or
/// a doctype identifier contains the configured quote character.
pub fn serialize_with_options(doc: &Document, options: &FormatOptions) -> Result<String> {
    serialize_node(doc, doc.root(), options)
}

/// Serializes the subtree rooted at `id`, rendered as if it were at the top
/// level (no leading indentation).
///
/// # Errors
///
/// As for [`serialize_with_options`], for the nodes inside the subtree.
///
/// # Examples
///
/// ```
/// use xmlsmith::{Document, FormatOptions};
/// use xmlsmith::serial::serialize_node;
///
/// let mut doc = Document::new();
/// let root = doc.element(doc.root(), "root")?;
/// let link = doc.element(root, "a")?;
/// let href = doc.attribute(link, ("href", "x.html?a=1&b=2"))?;
/// let opts = FormatOptions::default();
/// assert_eq!(serialize_node(&doc, href, &opts)?, "href='x.html?a=1&amp;b=2'");
/// assert_eq!(serialize_node(&doc, link, &opts)?, "<a href='x.html?a=1&amp;b=2'/>");
/// # Ok::<(), xmlsmith::Error>(())
/// ```
pub fn serialize_node(doc: &Document, id: NodeId, options: &FormatOptions) -> Result<String> {
    let mut output = String::new();
    let serializer = Serializer {
        doc,
        options,
        quote: options.quote(),
    };
    serializer.write_node(id, "", &mut output)?;
    Ok(output)
}

struct Serializer<'a> {
    doc: &'a Document,
    options: &'a FormatOptions,
    quote: char,
}

impl Serializer<'_> {
    fn write_node(&self, id: NodeId, indent: &str, out: &mut String) -> Result<()> {
        let q = self.quote;
        match &self.doc.node(id).kind {
            NodeKind::Document => self.write_document(id, out)?,
            NodeKind::Decl(decl) => {
                out.push_str("<?xml version=");
                push_quoted(out, q, &decl.version);
                if let Some(encoding) = &decl.encoding {
                    out.push_str(" encoding=");
                    push_quoted(out, q, encoding);
                }
                if let Some(standalone) = &decl.standalone {
                    out.push_str(" standalone=");
                    push_quoted(out, q, standalone);
                }
                out.push_str("?>");
            }
            NodeKind::Dtd(_) => self.write_dtd(id, indent, out)?,
            NodeKind::Element(_) => self.write_element(id, indent, out)?,
            NodeKind::Attribute(attribute) => {
                out.push_str(&attribute.name);
                out.push('=');
                out.push(q);
                for child in self.doc.children(id) {
                    let mut fragment = String::new();
                    self.write_node(child, indent, &mut fragment)?;
                    out.push_str(&escape_quotes(&fragment, q));
                }
                out.push(q);
            }
            NodeKind::AttributeText(text) => {
                out.push_str(&escape_left_angle_brackets(&escape_ampersands(
                    &text.char_data,
                )));
            }
            NodeKind::CharData(text) => {
                out.push_str(&escape_cdata_terminators(&escape_left_angle_brackets(
                    &escape_ampersands(&text.char_data),
                )));
            }
            NodeKind::Cdata(text) => {
                out.push_str("<![CDATA[");
                out.push_str(&text.char_data);
                out.push_str("]]>");
            }
            NodeKind::CharRef(reference) => write_char_ref(out, &reference.char, reference.hex),
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(&text.char_data);
                out.push_str("-->");
            }
            NodeKind::EntityRef(reference) => {
                out.push('&');
                out.push_str(&reference.name);
                out.push(';');
            }
            NodeKind::ProcInst(pi) => {
                out.push_str("<?");
                out.push_str(&pi.target);
                if let Some(content) = &pi.content {
                    out.push(' ');
                    out.push_str(content);
                }
                out.push_str("?>");
            }
            NodeKind::DtdAttlist(decl) => write_markup_decl(out, "ATTLIST", &decl.text),
            NodeKind::DtdElement(decl) => write_markup_decl(out, "ELEMENT", &decl.char_data),
            NodeKind::DtdEntity(decl) => write_markup_decl(out, "ENTITY", &decl.text),
            NodeKind::DtdNotation(decl) => write_markup_decl(out, "NOTATION", &decl.text),
            NodeKind::DtdParamEntityRef(reference) => {
                out.push('%');
                out.push_str(&reference.name);
                out.push(';');
            }
        }
        Ok(())
    }

    fn write_document(&self, id: NodeId, out: &mut String) -> Result<()> {
        if self.doc.node(id).validation {
            let elements = self
                .doc
                .children(id)
                .filter(|&c| matches!(self.doc.node(c).kind, NodeKind::Element(_)))
                .count();
            if elements != 1 {
                return Err(Error::Structure {
                    context: self.doc.context(id),
                    message: format!(
                        "a document must contain exactly one root element, found {elements}"
                    ),
                });
            }
        }

        let start = out.len();
        for child in self.doc.children(id) {
            self.write_node(child, "", out)?;
            if self.options.pretty {
                out.push_str(&self.options.newline);
            }
        }
        let newline = &self.options.newline;
        if self.options.pretty && out.len() >= start + newline.len() && out.ends_with(newline.as_str())
        {
            out.truncate(out.len() - newline.len());
        }
        Ok(())
    }

    fn write_dtd(&self, id: NodeId, indent: &str, out: &mut String) -> Result<()> {
        let NodeKind::Dtd(dtd) = &self.doc.node(id).kind else {
            return Ok(());
        };
        let q = self.quote;
        if self.doc.node(id).validation {
            for (field, value) in [("system", &dtd.sys_id), ("public", &dtd.pub_id)] {
                if value.as_deref().is_some_and(|v| v.contains(q)) {
                    return Err(Error::Structure {
                        context: self.doc.context(id),
                        message: format!(
                            "{field} identifier contains the quote character {q}; \
                             render with the other quote style"
                        ),
                    });
                }
            }
        }

        out.push_str("<!DOCTYPE ");
        out.push_str(&dtd.name);
        match (&dtd.pub_id, &dtd.sys_id) {
            (Some(pub_id), sys_id) => {
                out.push_str(" PUBLIC ");
                push_quoted(out, q, pub_id);
                if let Some(sys_id) = sys_id {
                    out.push(' ');
                    push_quoted(out, q, sys_id);
                }
            }
            (None, Some(sys_id)) => {
                out.push_str(" SYSTEM ");
                push_quoted(out, q, sys_id);
            }
            (None, None) => {}
        }

        if self.doc.first_child(id).is_some() {
            let nested = format!("{indent}{}", self.options.indent);
            out.push_str(" [");
            for child in self.doc.children(id) {
                if self.options.pretty {
                    out.push_str(&self.options.newline);
                    out.push_str(&nested);
                }
                self.write_node(child, &nested, out)?;
            }
            if self.options.pretty {
                out.push_str(&self.options.newline);
                out.push_str(indent);
            }
            out.push(']');
        }
        out.push('>');
        Ok(())
    }

    fn write_element(&self, id: NodeId, indent: &str, out: &mut String) -> Result<()> {
        let NodeKind::Element(element) = &self.doc.node(id).kind else {
            return Ok(());
        };
        out.push('<');
        out.push_str(&element.name);

        let mut content = Vec::new();
        for child in self.doc.children(id) {
            match &self.doc.node(child).kind {
                NodeKind::Attribute(_) => {
                    out.push(' ');
                    self.write_node(child, indent, out)?;
                }
                NodeKind::CharData(text) if text.char_data.is_empty() => {}
                _ => content.push(child),
            }
        }

        if content.is_empty() {
            if element.use_self_closing_tag_if_empty {
                out.push_str("/>");
            } else {
                out.push_str("></");
                out.push_str(&element.name);
                out.push('>');
            }
            return Ok(());
        }

        out.push('>');
        let is_inline = |c: &NodeId| self.doc.node(*c).kind.is_inline();
        let block = self.options.pretty && !content.iter().all(is_inline);
        let nested = format!("{indent}{}", self.options.indent);
        let mut prev_inline = false;
        for child in &content {
            let inline = is_inline(child);
            if block && !(prev_inline && inline) {
                out.push_str(&self.options.newline);
                out.push_str(&nested);
            }
            self.write_node(*child, &nested, out)?;
            prev_inline = inline;
        }
        if block {
            out.push_str(&self.options.newline);
            out.push_str(indent);
        }

        out.push_str("</");
        out.push_str(&element.name);
        out.push('>');
        Ok(())
    }
}

fn push_quoted(out: &mut String, quote: char, value: &str) {
    out.push(quote);
    out.push_str(value);
    out.push(quote);
}

fn write_markup_decl(out: &mut String, keyword: &str, text: &str) {
    out.push_str("<!");
    out.push_str(keyword);
    out.push(' ');
    out.push_str(text);
    out.push('>');
}

/// Writes `&#N;` or `&#xH;` for the first character of `char`. An empty
/// value (only storable in permissive mode) renders as `&#;`.
fn write_char_ref(out: &mut String, char: &str, hex: bool) {
    use std::fmt::Write;
    let _ = match char.chars().next() {
        Some(c) if hex => write!(out, "&#x{:x};", u32::from(c)),
        Some(c) => write!(out, "&#{};", u32::from(c)),
        None => write!(out, "&#;"),
    };
}
