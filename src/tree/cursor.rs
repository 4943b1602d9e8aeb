//! Fluent, chainable editing handle.

use super::options::{
    AttributeOptions, AttributeTextOptions, CdataOptions, CharDataOptions, CharRefOptions,
    CommentOptions, DeclOptions, DtdDeclOptions, DtdOptions, DtdParamEntityRefOptions,
    ElementOptions, EntityRefOptions, ProcInstOptions,
};
use super::{Document, NodeId, NodeKind};
use crate::error::{Error, Result};
use crate::serial::{serialize_node, FormatOptions};

/// A mutable cursor positioned at one node of a [`Document`].
///
/// Factory methods consume the cursor and return a cursor positioned at
/// the new child; [`up`](Self::up) walks back to the parent. This gives a
/// chained construction style where the indentation of the code mirrors
/// the tree:
///
/// ```
/// use xmlsmith::Document;
///
/// let mut doc = Document::new();
/// let _list = doc
///     .root_cursor()
///     .element("ul")?
///         .element("li")?.char_data("one")?.up().up()
///         .element("li")?.char_data("two")?.up().up();
/// assert_eq!(doc.to_xml()?, "<ul>\n    <li>one</li>\n    <li>two</li>\n</ul>");
/// # Ok::<(), xmlsmith::Error>(())
/// ```
///
/// Setters are checked against the node's kind at runtime and fail with
/// [`Error::WrongKind`] when the field does not exist.
#[derive(Debug)]
pub struct NodeMut<'a> {
    doc: &'a mut Document,
    id: NodeId,
}

macro_rules! child_factories {
    ($($(#[$meta:meta])* $name:ident($opts:ty);)*) => {
        $(
            $(#[$meta])*
            ///
            /// # Errors
            ///
            /// See the [`Document`] method of the same name.
            pub fn $name(self, options: impl Into<$opts>) -> Result<Self> {
                let id = self.doc.$name(self.id, options)?;
                Ok(Self { doc: self.doc, id })
            }
        )*
    };
}

impl<'a> NodeMut<'a> {
    pub(crate) fn new(doc: &'a mut Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    /// The id of the node under the cursor.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Read access to the whole document.
    #[must_use]
    pub fn document(&self) -> &Document {
        self.doc
    }

    /// The kind and payload of the node under the cursor.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        self.doc.kind(self.id)
    }

    /// Moves to the parent. Stays put at the document node or at the top of
    /// a detached subtree.
    #[must_use]
    pub fn up(self) -> NodeMut<'a> {
        let id = self.doc.parent(self.id).unwrap_or(self.id);
        NodeMut { doc: self.doc, id }
    }

    /// Moves to the outermost ancestor.
    #[must_use]
    pub fn top(self) -> NodeMut<'a> {
        let id = self.doc.top(self.id);
        NodeMut { doc: self.doc, id }
    }

    /// Moves to another node of the same document.
    #[must_use]
    pub fn goto(self, id: NodeId) -> NodeMut<'a> {
        NodeMut { doc: self.doc, id }
    }

    /// Adds the XML declaration. The cursor must be at the document node.
    ///
    /// # Errors
    ///
    /// The cursor is not at the document node, or see [`Document::decl`].
    pub fn decl(self, options: DeclOptions) -> Result<NodeMut<'a>> {
        self.require_document("declaration")?;
        let id = self.doc.decl(options)?;
        Ok(NodeMut { doc: self.doc, id })
    }

    /// Adds a doctype. The cursor must be at the document node.
    ///
    /// # Errors
    ///
    /// The cursor is not at the document node, or see [`Document::dtd`].
    pub fn dtd(self, options: impl Into<DtdOptions>) -> Result<NodeMut<'a>> {
        self.require_document("doctype")?;
        let id = self.doc.dtd(options)?;
        Ok(NodeMut { doc: self.doc, id })
    }

    fn require_document(&self, child: &'static str) -> Result<()> {
        let kind = self.doc.kind(self.id);
        if matches!(kind, NodeKind::Document) {
            return Ok(());
        }
        let context = self.doc.context(self.id);
        Err(if kind.is_leaf() {
            Error::NoChildren {
                context,
                kind: kind.label(),
            }
        } else {
            Error::ChildNotAllowed {
                context,
                parent: kind.label(),
                child,
            }
        })
    }

    child_factories! {
        /// Adds an element.
        element(ElementOptions);
        /// Adds an attribute.
        attribute(AttributeOptions);
        /// Adds attribute text.
        attribute_text(AttributeTextOptions);
        /// Adds character data.
        char_data(CharDataOptions);
        /// Adds a CDATA section.
        cdata(CdataOptions);
        /// Adds a character reference.
        char_ref(CharRefOptions);
        /// Adds a comment.
        comment(CommentOptions);
        /// Adds an entity reference.
        entity_ref(EntityRefOptions);
        /// Adds a processing instruction.
        proc_inst(ProcInstOptions);
        /// Adds an `<!ATTLIST ...>` declaration.
        dtd_attlist(DtdDeclOptions);
        /// Adds an `<!ELEMENT ...>` declaration.
        dtd_element(DtdDeclOptions);
        /// Adds an `<!ENTITY ...>` declaration.
        dtd_entity(DtdDeclOptions);
        /// Adds a `<!NOTATION ...>` declaration.
        dtd_notation(DtdDeclOptions);
        /// Adds a parameter-entity reference.
        dtd_param_entity_ref(DtdParamEntityRefOptions);
    }

    /// Renames the node. See [`Document::set_name`].
    ///
    /// # Errors
    ///
    /// See [`Document::set_name`].
    pub fn set_name(self, name: impl Into<String>) -> Result<Self> {
        self.doc.set_name(self.id, name)?;
        Ok(self)
    }

    /// Replaces the node's text. See [`Document::set_char_data`].
    ///
    /// # Errors
    ///
    /// See [`Document::set_char_data`].
    pub fn set_char_data(self, char_data: impl Into<String>) -> Result<Self> {
        self.doc.set_char_data(self.id, char_data)?;
        Ok(self)
    }

    /// See [`Document::set_char`].
    ///
    /// # Errors
    ///
    /// See [`Document::set_char`].
    pub fn set_char(self, char: impl Into<String>) -> Result<Self> {
        self.doc.set_char(self.id, char)?;
        Ok(self)
    }

    /// See [`Document::set_hex`].
    ///
    /// # Errors
    ///
    /// See [`Document::set_hex`].
    pub fn set_hex(self, hex: bool) -> Result<Self> {
        self.doc.set_hex(self.id, hex)?;
        Ok(self)
    }

    /// See [`Document::set_target`].
    ///
    /// # Errors
    ///
    /// See [`Document::set_target`].
    pub fn set_target(self, target: impl Into<String>) -> Result<Self> {
        self.doc.set_target(self.id, target)?;
        Ok(self)
    }

    /// See [`Document::set_content`].
    ///
    /// # Errors
    ///
    /// See [`Document::set_content`].
    pub fn set_content(self, content: Option<String>) -> Result<Self> {
        self.doc.set_content(self.id, content)?;
        Ok(self)
    }

    /// See [`Document::set_version`].
    ///
    /// # Errors
    ///
    /// See [`Document::set_version`].
    pub fn set_version(self, version: impl Into<String>) -> Result<Self> {
        self.doc.set_version(self.id, version)?;
        Ok(self)
    }

    /// See [`Document::set_encoding`].
    ///
    /// # Errors
    ///
    /// See [`Document::set_encoding`].
    pub fn set_encoding(self, encoding: Option<String>) -> Result<Self> {
        self.doc.set_encoding(self.id, encoding)?;
        Ok(self)
    }

    /// See [`Document::set_standalone`].
    ///
    /// # Errors
    ///
    /// See [`Document::set_standalone`].
    pub fn set_standalone(self, standalone: Option<String>) -> Result<Self> {
        self.doc.set_standalone(self.id, standalone)?;
        Ok(self)
    }

    /// See [`Document::set_sys_id`].
    ///
    /// # Errors
    ///
    /// See [`Document::set_sys_id`].
    pub fn set_sys_id(self, sys_id: Option<String>) -> Result<Self> {
        self.doc.set_sys_id(self.id, sys_id)?;
        Ok(self)
    }

    /// See [`Document::set_pub_id`].
    ///
    /// # Errors
    ///
    /// See [`Document::set_pub_id`].
    pub fn set_pub_id(self, pub_id: Option<String>) -> Result<Self> {
        self.doc.set_pub_id(self.id, pub_id)?;
        Ok(self)
    }

    /// See [`Document::set_use_self_closing_tag_if_empty`].
    ///
    /// # Errors
    ///
    /// See [`Document::set_use_self_closing_tag_if_empty`].
    pub fn set_use_self_closing_tag_if_empty(self, enabled: bool) -> Result<Self> {
        self.doc.set_use_self_closing_tag_if_empty(self.id, enabled)?;
        Ok(self)
    }

    /// Renders the subtree under the cursor.
    ///
    /// # Errors
    ///
    /// See [`serialize_node`].
    pub fn to_xml_with(&self, options: &FormatOptions) -> Result<String> {
        serialize_node(self.doc, self.id, options)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_factories_return_child_cursor() {
        let mut doc = Document::new();
        let body = doc.root_cursor().element("html").unwrap().element("body").unwrap();
        assert_eq!(body.document().name(body.id()), Some("body"));
        let html = body.up();
        assert_eq!(html.kind().name(), Some("html"));
        let root = html.up();
        assert!(matches!(root.kind(), NodeKind::Document));
        let still_root = root.up();
        assert!(matches!(still_root.kind(), NodeKind::Document));
    }

    #[test]
    fn test_top_from_deep_node() {
        let mut doc = Document::new();
        let deep = doc
            .root_cursor()
            .element("a")
            .unwrap()
            .element("b")
            .unwrap()
            .char_data("c")
            .unwrap();
        let top = deep.top();
        assert!(matches!(top.kind(), NodeKind::Document));
    }

    #[test]
    fn test_setters_are_kind_checked() {
        let mut doc = Document::new();
        let comment = doc.root_cursor().comment("x").unwrap();
        let err = comment.set_name("y").unwrap_err();
        assert!(matches!(
            err,
            Error::WrongKind {
                kind: "comment",
                field: "name",
                ..
            }
        ));
    }

    #[test]
    fn test_decl_only_at_document() {
        let mut doc = Document::new();
        let elem = doc.root_cursor().element("r").unwrap();
        let err = elem.decl(DeclOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::ChildNotAllowed {
                parent: "element",
                child: "declaration",
                ..
            }
        ));
    }

    #[test]
    fn test_chained_setters() {
        let mut doc = Document::new();
        let r = doc
            .root_cursor()
            .element("r")
            .unwrap()
            .set_name("root")
            .unwrap()
            .set_use_self_closing_tag_if_empty(false)
            .unwrap();
        assert_eq!(
            r.to_xml_with(&FormatOptions::default()).unwrap(),
            "<root></root>"
        );
    }
}
