//! Node type definitions.
//!
//! The `NodeKind` enum is the closed set of node types a document can
//! contain. Each variant carries a payload struct holding the node's scalar
//! fields. Navigation links (parent, children, siblings) are stored in
//! `NodeData`, not here, and only the container kinds ([`NodeKind::Document`],
//! [`NodeKind::Element`], [`NodeKind::Attribute`], [`NodeKind::Dtd`]) ever
//! have children.
//!
//! Payload fields are read through the accessors below. They are written
//! through [`Document`](super::Document) setters, which validate the new
//! value against the rules for the node's kind.

use std::collections::HashSet;

/// The kind of a node and its associated data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node. There is exactly one per `Document`.
    Document,
    /// The XML declaration, e.g. `<?xml version="1.0"?>`.
    Decl(Decl),
    /// A document type declaration, e.g. `<!DOCTYPE html>`.
    Dtd(Dtd),
    /// An element, e.g. `<div class="x">...</div>`.
    Element(Element),
    /// An attribute of an element, e.g. `class="x"`.
    Attribute(Attribute),
    /// Literal text inside an attribute value.
    AttributeText(AttributeText),
    /// Character data inside an element.
    CharData(CharData),
    /// A CDATA section, e.g. `<![CDATA[...]]>`.
    Cdata(Cdata),
    /// A character reference, e.g. `&#100;` or `&#x64;`.
    CharRef(CharRef),
    /// A comment, e.g. `<!-- ... -->`.
    Comment(Comment),
    /// An entity reference, e.g. `&copy;`.
    EntityRef(EntityRef),
    /// A processing instruction, e.g. `<?xml-stylesheet href="a.xsl"?>`.
    ProcInst(ProcInst),
    /// An attribute-list declaration in a DTD, e.g. `<!ATTLIST ...>`.
    DtdAttlist(DtdAttlist),
    /// An element type declaration in a DTD, e.g. `<!ELEMENT ...>`.
    DtdElement(DtdElement),
    /// An entity declaration in a DTD, e.g. `<!ENTITY ...>`.
    DtdEntity(DtdEntity),
    /// A notation declaration in a DTD, e.g. `<!NOTATION ...>`.
    DtdNotation(DtdNotation),
    /// A parameter-entity reference in a DTD, e.g. `%common;`.
    DtdParamEntityRef(DtdParamEntityRef),
}

impl NodeKind {
    /// Returns a short human-readable name for this kind of node.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Decl(_) => "declaration",
            Self::Dtd(_) => "doctype",
            Self::Element(_) => "element",
            Self::Attribute(_) => "attribute",
            Self::AttributeText(_) => "attribute text",
            Self::CharData(_) => "character data",
            Self::Cdata(_) => "CDATA section",
            Self::CharRef(_) => "character reference",
            Self::Comment(_) => "comment",
            Self::EntityRef(_) => "entity reference",
            Self::ProcInst(_) => "processing instruction",
            Self::DtdAttlist(_) => "attribute-list declaration",
            Self::DtdElement(_) => "element declaration",
            Self::DtdEntity(_) => "entity declaration",
            Self::DtdNotation(_) => "notation declaration",
            Self::DtdParamEntityRef(_) => "parameter entity reference",
        }
    }

    /// Describes this node for error contexts: the label, followed by the
    /// node's name in quotes for named kinds.
    pub(crate) fn describe(&self) -> String {
        match self.name() {
            Some(name) => format!("{} \"{name}\"", self.label()),
            None => self.label().to_string(),
        }
    }

    /// Returns the node's name: the element, attribute, doctype or
    /// referenced entity name, or the processing instruction target.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Dtd(Dtd { name, .. })
            | Self::Element(Element { name, .. })
            | Self::Attribute(Attribute { name, .. })
            | Self::EntityRef(EntityRef { name })
            | Self::DtdParamEntityRef(DtdParamEntityRef { name })
            | Self::ProcInst(ProcInst { target: name, .. }) => Some(name),
            _ => None,
        }
    }

    /// Returns the text payload of text-bearing kinds.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::AttributeText(AttributeText {
                char_data: text, ..
            })
            | Self::CharData(CharData {
                char_data: text, ..
            })
            | Self::Cdata(Cdata {
                char_data: text, ..
            })
            | Self::Comment(Comment {
                char_data: text, ..
            })
            | Self::DtdElement(DtdElement { char_data: text })
            | Self::DtdAttlist(DtdAttlist { text })
            | Self::DtdEntity(DtdEntity { text })
            | Self::DtdNotation(DtdNotation { text }) => Some(text),
            _ => None,
        }
    }

    /// Returns `true` for the kinds that stay on the same line as
    /// neighbouring inline nodes when pretty-printing: character data,
    /// character references and entity references.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Self::CharData(_) | Self::CharRef(_) | Self::EntityRef(_)
        )
    }

    /// Returns `true` if nodes of this kind can never have children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        match self {
            Self::Document | Self::Element(_) | Self::Attribute(_) | Self::Dtd(_) => false,
            Self::Decl(_)
            | Self::AttributeText(_)
            | Self::CharData(_)
            | Self::Cdata(_)
            | Self::CharRef(_)
            | Self::Comment(_)
            | Self::EntityRef(_)
            | Self::ProcInst(_)
            | Self::DtdAttlist(_)
            | Self::DtdElement(_)
            | Self::DtdEntity(_)
            | Self::DtdNotation(_)
            | Self::DtdParamEntityRef(_) => true,
        }
    }

    /// Returns `true` if a node of kind `child` may be a child of a node
    /// of this kind.
    #[must_use]
    pub fn accepts(&self, child: &NodeKind) -> bool {
        match self {
            Self::Document => matches!(
                child,
                Self::Decl(_)
                    | Self::Dtd(_)
                    | Self::Element(_)
                    | Self::Comment(_)
                    | Self::ProcInst(_)
            ),
            Self::Element(_) => matches!(
                child,
                Self::Attribute(_)
                    | Self::Cdata(_)
                    | Self::CharData(_)
                    | Self::CharRef(_)
                    | Self::Comment(_)
                    | Self::Element(_)
                    | Self::EntityRef(_)
                    | Self::ProcInst(_)
            ),
            Self::Attribute(_) => matches!(
                child,
                Self::AttributeText(_) | Self::CharRef(_) | Self::EntityRef(_)
            ),
            Self::Dtd(_) => matches!(
                child,
                Self::Comment(_)
                    | Self::DtdAttlist(_)
                    | Self::DtdElement(_)
                    | Self::DtdEntity(_)
                    | Self::DtdNotation(_)
                    | Self::DtdParamEntityRef(_)
                    | Self::ProcInst(_)
            ),
            _ => false,
        }
    }
}

/// The XML declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    pub(crate) version: String,
    pub(crate) encoding: Option<String>,
    pub(crate) standalone: Option<String>,
}

impl Decl {
    /// The XML version, `"1.0"` unless set otherwise.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The declared encoding, if any.
    #[must_use]
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// The standalone flag (`"yes"` or `"no"`), if any.
    #[must_use]
    pub fn standalone(&self) -> Option<&str> {
        self.standalone.as_deref()
    }
}

/// A document type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dtd {
    pub(crate) name: String,
    pub(crate) sys_id: Option<String>,
    pub(crate) pub_id: Option<String>,
}

impl Dtd {
    /// The declared root element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The system identifier, if any.
    #[must_use]
    pub fn sys_id(&self) -> Option<&str> {
        self.sys_id.as_deref()
    }

    /// The public identifier, if any. Only present alongside a system identifier.
    #[must_use]
    pub fn pub_id(&self) -> Option<&str> {
        self.pub_id.as_deref()
    }
}

/// An element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub(crate) name: String,
    pub(crate) replace_invalid_chars_in_name: bool,
    pub(crate) use_self_closing_tag_if_empty: bool,
    /// Names of the attribute children, for the uniqueness check.
    pub(crate) attribute_names: HashSet<String>,
}

impl Element {
    /// The element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an element without content renders as `<name/>` rather than
    /// `<name></name>`.
    #[must_use]
    pub fn use_self_closing_tag_if_empty(&self) -> bool {
        self.use_self_closing_tag_if_empty
    }

    /// Returns `true` if an attribute named `name` has been added.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute_names.contains(name)
    }
}

/// An attribute. Its value is the concatenation of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub(crate) name: String,
    pub(crate) replace_invalid_chars_in_name: bool,
}

impl Attribute {
    /// The attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Literal text inside an attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeText {
    pub(crate) char_data: String,
    pub(crate) replace_invalid_chars_in_char_data: bool,
}

/// Character data inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharData {
    pub(crate) char_data: String,
    pub(crate) replace_invalid_chars_in_char_data: bool,
}

/// A CDATA section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cdata {
    pub(crate) char_data: String,
    pub(crate) replace_invalid_chars_in_char_data: bool,
}

/// A comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub(crate) char_data: String,
    pub(crate) replace_invalid_chars_in_char_data: bool,
}

/// A character reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharRef {
    pub(crate) char: String,
    pub(crate) hex: bool,
}

impl CharRef {
    /// The referenced character.
    #[must_use]
    pub fn char(&self) -> &str {
        &self.char
    }

    /// Whether the reference renders in hexadecimal (`&#x64;`).
    #[must_use]
    pub fn hex(&self) -> bool {
        self.hex
    }
}

/// An entity reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub(crate) name: String,
}

/// A processing instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcInst {
    pub(crate) target: String,
    pub(crate) content: Option<String>,
}

impl ProcInst {
    /// The instruction target.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The instruction content, if any.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// An attribute-list declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtdAttlist {
    pub(crate) text: String,
}

/// An element type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtdElement {
    pub(crate) char_data: String,
}

/// An entity declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtdEntity {
    pub(crate) text: String,
}

/// A notation declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtdNotation {
    pub(crate) text: String,
}

/// A parameter-entity reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtdParamEntityRef {
    pub(crate) name: String,
}
