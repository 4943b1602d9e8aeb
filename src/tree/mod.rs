//! Arena-based document tree with validating builders.
//!
//! All nodes live in a contiguous `Vec<NodeData>` owned by the `Document`,
//! and are referenced by `NodeId`, a newtype over `NonZeroU32`. Parent and
//! sibling links are indices too, so `up()` is O(1) and there are no
//! reference cycles or per-node allocations to manage.
//!
//! # Validation
//!
//! A document is either strict (the default) or permissive, fixed at
//! construction and copied into every node. In strict mode every factory
//! and setter checks its input and fails fast with a context-qualified
//! [`Error`]. In permissive mode character, name and ordering rules are
//! skipped and the input is stored as given. Independently of the mode,
//! fields created with a `replace_invalid_*` option are repaired with
//! U+FFFD instead of being rejected.
//!
//! Which kinds may be children of which is a property of the node types,
//! not of the data, and is enforced in both modes.
//!
//! # Building
//!
//! Factories take the intended parent and return the new child's id:
//!
//! ```
//! use xmlsmith::Document;
//!
//! let mut doc = Document::new();
//! let html = doc.element(doc.root(), "html")?;
//! let body = doc.element(html, "body")?;
//! doc.char_data(body, "Hello")?;
//! assert_eq!(doc.to_xml()?, "<html>\n    <body>Hello</body>\n</html>");
//! # Ok::<(), xmlsmith::Error>(())
//! ```
//!
//! The fluent [`NodeMut`] cursor wraps the same operations for chained
//! construction.

mod cursor;
mod node;
mod options;
mod rules;

pub use cursor::NodeMut;
pub use node::{
    Attribute, AttributeText, CharData, CharRef, Cdata, Comment, Decl, Dtd, DtdAttlist,
    DtdElement, DtdEntity, DtdNotation, DtdParamEntityRef, Element, EntityRef, NodeKind,
    ProcInst,
};
pub use options::{
    AttributeOptions, AttributeTextOptions, CdataOptions, CharDataOptions, CharRefOptions,
    CommentOptions, DeclOptions, DtdDeclOptions, DtdOptions, DtdParamEntityRefOptions,
    ElementOptions, EntityRefOptions, NameOptions, ProcInstOptions, TextOptions,
};

use crate::error::{Error, Result, Violation};
use crate::serial::FormatOptions;
use crate::trace::trace;
use std::collections::HashSet;
use std::num::NonZeroU32;

/// A typed index into the document's node arena.
///
/// `NodeId` is a newtype over `NonZeroU32`, meaning it can never be zero
/// and `Option<NodeId>` has the same size as `NodeId` (niche optimization).
/// An id is only meaningful for the `Document` that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates a `NodeId` from a raw index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0.
    #[allow(clippy::expect_used, clippy::cast_possible_truncation)]
    fn from_index(index: usize) -> Self {
        Self(NonZeroU32::new(index as u32).expect("NodeId index must be non-zero"))
    }

    /// Returns the raw index as a `usize` for indexing into the arena.
    fn as_index(self) -> usize {
        self.0.get() as usize
    }

    /// Returns the raw arena index. Always non-zero.
    #[must_use]
    pub fn into_raw(self) -> u32 {
        self.0.get()
    }
}

/// Storage for a single node in the document arena.
///
/// Each node stores its kind, the validation flag it was created with, and
/// links to parent, children, and siblings for tree navigation. Access
/// individual nodes via [`Document::node`].
#[derive(Debug, Clone)]
pub struct NodeData {
    /// What kind of node this is and its payload.
    pub kind: NodeKind,
    /// Whether rules are checked for this node. Copied from the document.
    pub validation: bool,
    /// Parent node, if any. The document node and detached nodes have none.
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Last child node (for O(1) append).
    pub last_child: Option<NodeId>,
    /// Next sibling.
    pub next_sibling: Option<NodeId>,
    /// Previous sibling.
    pub prev_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind, validation: bool) -> Self {
        Self {
            kind,
            validation,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// An XML document under construction.
///
/// The `Document` owns all nodes in an arena and provides methods for
/// building, navigating, editing and serializing the tree. All operations
/// go through `&Document` (navigation) or `&mut Document` (mutation), so a
/// document is never mutated from two places at once.
///
/// # Examples
///
/// ```
/// use xmlsmith::{DeclOptions, Document};
///
/// let mut doc = Document::new();
/// doc.decl(DeclOptions::new().encoding("UTF-8"))?;
/// let root = doc.element(doc.root(), "root")?;
/// doc.comment(root, "empty for now")?;
/// assert_eq!(
///     doc.to_xml()?,
///     "<?xml version='1.0' encoding='UTF-8'?>\n<root>\n    <!--empty for now-->\n</root>"
/// );
/// # Ok::<(), xmlsmith::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    /// The node arena. Index 0 is unused (placeholder for `NonZeroU32`).
    nodes: Vec<NodeData>,
    /// The document node id.
    root: NodeId,
    /// Whether rules are checked. Fixed for the lifetime of the document.
    validation: bool,
}

impl Document {
    /// Creates a new, empty, strict document.
    #[must_use]
    pub fn new() -> Self {
        Self::with_validation(true)
    }

    /// Creates a new, empty document, strict if `validation` is `true` and
    /// permissive otherwise.
    #[must_use]
    pub fn with_validation(validation: bool) -> Self {
        let mut nodes = Vec::with_capacity(64);
        // Index 0: placeholder (NodeId uses NonZeroU32)
        nodes.push(NodeData::new(NodeKind::Document, validation));
        // Index 1: the document node
        nodes.push(NodeData::new(NodeKind::Document, validation));
        Self {
            nodes,
            root: NodeId::from_index(1),
            validation,
        }
    }

    /// Returns `true` if this document checks rules (strict mode).
    #[must_use]
    pub fn validation(&self) -> bool {
        self.validation
    }

    /// Returns the document node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the first element child of the document node, if any.
    #[must_use]
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root)
            .find(|&id| matches!(self.node(id).kind, NodeKind::Element(_)))
    }

    /// Returns a reference to the `NodeData` for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a node of this document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    /// Returns a mutable reference to the `NodeData` for the given node.
    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    /// Returns the kind and payload of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Returns the name of a node, if its kind has one. See [`NodeKind::name`].
    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.kind(id).name()
    }

    /// Returns the text of a node, if its kind has one. See [`NodeKind::text`].
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.kind(id).text()
    }

    /// Describes where a node sits in the tree, from the document down,
    /// e.g. `document > element "html" > attribute "src"`.
    #[must_use]
    pub fn context(&self, id: NodeId) -> String {
        let mut parts: Vec<String> = self
            .ancestors(id)
            .map(|a| self.node(a).kind.describe())
            .collect();
        parts.reverse();
        parts.join(" > ")
    }

    /// Returns a function turning a rule violation into an error located
    /// at `id`.
    fn blame(&self, id: NodeId) -> impl Fn(Violation) -> Error + '_ {
        move |violation| violation.at(self.context(id))
    }

    // --- Navigation ---

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the parent of a node. Alias of [`parent`](Self::parent).
    #[must_use]
    pub fn up(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id)
    }

    /// Returns the outermost ancestor of a node: the document node for
    /// attached nodes, or the top of a detached subtree.
    #[must_use]
    pub fn top(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Returns the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    /// Returns the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    /// Returns the next sibling of a node.
    #[must_use]
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    /// Returns the previous sibling of a node.
    #[must_use]
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    /// Returns an iterator over the children of a node.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.node(id).first_child,
        }
    }

    /// Returns the number of children of a node.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Returns the child of a node at `index`, if there is one.
    #[must_use]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).nth(index)
    }

    /// Returns an iterator over a node and its ancestors (walking up to root).
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: Some(id),
        }
    }

    /// Returns an iterator over all descendants of a node (depth-first).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            root: id,
            next: self.first_child(id),
        }
    }

    /// Returns the total number of nodes in the arena, including detached ones.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1 // subtract placeholder at index 0
    }

    // --- Factories ---

    /// Adds the XML declaration to the document.
    ///
    /// # Errors
    ///
    /// In strict mode: the document already has children, or a field value
    /// is malformed.
    pub fn decl(&mut self, options: DeclOptions) -> Result<NodeId> {
        let root = self.root;
        let v = self.validation;
        let version = options.version.unwrap_or_else(|| "1.0".to_string());
        let version = rules::version(version, v).map_err(self.blame(root))?;
        let encoding = options
            .encoding
            .map(|e| rules::encoding(e, v))
            .transpose()
            .map_err(self.blame(root))?;
        let standalone = options
            .standalone
            .map(|s| rules::standalone(s, v))
            .transpose()
            .map_err(self.blame(root))?;
        self.append_new(
            root,
            NodeKind::Decl(Decl {
                version,
                encoding,
                standalone,
            }),
        )
    }

    /// Adds a document type declaration to the document.
    ///
    /// # Errors
    ///
    /// Always: an identifier contains both quote characters. In strict
    /// mode: the document already has a doctype or a root element, a
    /// public identifier is given without a system identifier, or a field
    /// value is malformed.
    pub fn dtd(&mut self, options: impl Into<DtdOptions>) -> Result<NodeId> {
        let options = options.into();
        let root = self.root;
        let v = self.validation;
        let name = rules::name("doctype name", options.name, v, false).map_err(self.blame(root))?;
        let sys_id = options
            .sys_id
            .map(|s| rules::sys_id(s, v))
            .transpose()
            .map_err(self.blame(root))?;
        let pub_id = options
            .pub_id
            .map(|p| rules::pub_id(p, v))
            .transpose()
            .map_err(self.blame(root))?;
        if v && pub_id.is_some() && sys_id.is_none() {
            return Err(self.blame(root)(Violation::Structure(
                "a public identifier requires a system identifier".to_string(),
            )));
        }
        self.append_new(
            root,
            NodeKind::Dtd(Dtd {
                name,
                sys_id,
                pub_id,
            }),
        )
    }

    /// Adds an element under `parent` (the document node or an element).
    ///
    /// # Errors
    ///
    /// Always: `parent` cannot contain elements. In strict mode: the name
    /// is not a valid XML name (unless repaired).
    pub fn element(&mut self, parent: NodeId, options: impl Into<ElementOptions>) -> Result<NodeId> {
        let options = options.into();
        let name = rules::name(
            "element name",
            options.name,
            self.validation,
            options.replace_invalid_chars_in_name,
        )
        .map_err(self.blame(parent))?;
        self.append_new(
            parent,
            NodeKind::Element(Element {
                name,
                replace_invalid_chars_in_name: options.replace_invalid_chars_in_name,
                use_self_closing_tag_if_empty: options.use_self_closing_tag_if_empty,
                attribute_names: HashSet::new(),
            }),
        )
    }

    /// Adds an attribute to the element `parent`, with an initial text
    /// value if `options.value` is set.
    ///
    /// # Errors
    ///
    /// Always: `parent` is not an element. In strict mode: the name is not
    /// a valid XML name (unless repaired), the element already has an
    /// attribute of that name, or the value contains illegal characters.
    pub fn attribute(
        &mut self,
        parent: NodeId,
        options: impl Into<AttributeOptions>,
    ) -> Result<NodeId> {
        let options = options.into();
        let name = rules::name(
            "attribute name",
            options.name,
            self.validation,
            options.replace_invalid_chars_in_name,
        )
        .map_err(self.blame(parent))?;
        let id = self.append_new(
            parent,
            NodeKind::Attribute(Attribute {
                name,
                replace_invalid_chars_in_name: options.replace_invalid_chars_in_name,
            }),
        )?;
        if let Some(value) = options.value {
            if let Err(err) = self.attribute_text(id, value) {
                self.detach(id);
                return Err(err);
            }
        }
        Ok(id)
    }

    /// Adds literal text to the value of the attribute `parent`.
    ///
    /// # Errors
    ///
    /// Always: `parent` is not an attribute. In strict mode: the text
    /// contains illegal characters (unless repaired).
    pub fn attribute_text(
        &mut self,
        parent: NodeId,
        options: impl Into<AttributeTextOptions>,
    ) -> Result<NodeId> {
        let options = options.into();
        let char_data = rules::chars(
            "attribute text",
            options.char_data,
            self.validation,
            options.replace_invalid_chars_in_char_data,
        )
        .map_err(self.blame(parent))?;
        self.append_new(
            parent,
            NodeKind::AttributeText(AttributeText {
                char_data,
                replace_invalid_chars_in_char_data: options.replace_invalid_chars_in_char_data,
            }),
        )
    }

    /// Adds character data to the element `parent`.
    ///
    /// # Errors
    ///
    /// Always: `parent` is not an element. In strict mode: the text
    /// contains illegal characters (unless repaired).
    pub fn char_data(
        &mut self,
        parent: NodeId,
        options: impl Into<CharDataOptions>,
    ) -> Result<NodeId> {
        let options = options.into();
        let char_data = rules::chars(
            "character data",
            options.char_data,
            self.validation,
            options.replace_invalid_chars_in_char_data,
        )
        .map_err(self.blame(parent))?;
        self.append_new(
            parent,
            NodeKind::CharData(CharData {
                char_data,
                replace_invalid_chars_in_char_data: options.replace_invalid_chars_in_char_data,
            }),
        )
    }

    /// Adds a CDATA section to the element `parent`.
    ///
    /// # Errors
    ///
    /// Always: `parent` is not an element. In strict mode: the text
    /// contains illegal characters or `]]>` (unless repaired).
    pub fn cdata(&mut self, parent: NodeId, options: impl Into<CdataOptions>) -> Result<NodeId> {
        let options = options.into();
        let char_data = rules::cdata(
            options.char_data,
            self.validation,
            options.replace_invalid_chars_in_char_data,
        )
        .map_err(self.blame(parent))?;
        self.append_new(
            parent,
            NodeKind::Cdata(Cdata {
                char_data,
                replace_invalid_chars_in_char_data: options.replace_invalid_chars_in_char_data,
            }),
        )
    }

    /// Adds a character reference to `parent` (an element or attribute).
    ///
    /// # Errors
    ///
    /// Always: `parent` cannot contain character references. In strict
    /// mode: `options.char` is not exactly one legal character.
    pub fn char_ref(&mut self, parent: NodeId, options: impl Into<CharRefOptions>) -> Result<NodeId> {
        let options = options.into();
        let char = rules::char_ref(options.char, self.validation).map_err(self.blame(parent))?;
        self.append_new(
            parent,
            NodeKind::CharRef(CharRef {
                char,
                hex: options.hex,
            }),
        )
    }

    /// Adds a comment to `parent` (the document node, an element, or a doctype).
    ///
    /// # Errors
    ///
    /// Always: `parent` cannot contain comments. In strict mode: the text
    /// contains illegal characters, `--`, or ends with `-` (unless repaired).
    pub fn comment(&mut self, parent: NodeId, options: impl Into<CommentOptions>) -> Result<NodeId> {
        let options = options.into();
        let char_data = rules::comment(
            options.char_data,
            self.validation,
            options.replace_invalid_chars_in_char_data,
        )
        .map_err(self.blame(parent))?;
        self.append_new(
            parent,
            NodeKind::Comment(Comment {
                char_data,
                replace_invalid_chars_in_char_data: options.replace_invalid_chars_in_char_data,
            }),
        )
    }

    /// Adds an entity reference to `parent` (an element or attribute).
    ///
    /// # Errors
    ///
    /// Always: `parent` cannot contain entity references. In strict mode:
    /// the name is not a valid XML name.
    pub fn entity_ref(
        &mut self,
        parent: NodeId,
        options: impl Into<EntityRefOptions>,
    ) -> Result<NodeId> {
        let options = options.into();
        let name = rules::name("entity reference name", options.name, self.validation, false)
            .map_err(self.blame(parent))?;
        self.append_new(parent, NodeKind::EntityRef(EntityRef { name }))
    }

    /// Adds a processing instruction to `parent` (the document node, an
    /// element, or a doctype).
    ///
    /// # Errors
    ///
    /// Always: `parent` cannot contain processing instructions. In strict
    /// mode: the target is not a name or is `xml`, or the content contains
    /// illegal characters or `?>`.
    pub fn proc_inst(
        &mut self,
        parent: NodeId,
        options: impl Into<ProcInstOptions>,
    ) -> Result<NodeId> {
        let options = options.into();
        let v = self.validation;
        let target = rules::proc_inst_target(options.target, v).map_err(self.blame(parent))?;
        let content = options
            .content
            .map(|c| rules::proc_inst_content(c, v))
            .transpose()
            .map_err(self.blame(parent))?;
        self.append_new(parent, NodeKind::ProcInst(ProcInst { target, content }))
    }

    /// Adds an `<!ATTLIST ...>` declaration to the doctype `parent`.
    ///
    /// # Errors
    ///
    /// Always: `parent` is not a doctype. In strict mode: the text contains
    /// illegal characters.
    pub fn dtd_attlist(
        &mut self,
        parent: NodeId,
        options: impl Into<DtdDeclOptions>,
    ) -> Result<NodeId> {
        let text = self.dtd_decl_text(parent, "attribute-list declaration", options)?;
        self.append_new(parent, NodeKind::DtdAttlist(DtdAttlist { text }))
    }

    /// Adds an `<!ELEMENT ...>` declaration to the doctype `parent`.
    ///
    /// # Errors
    ///
    /// Always: `parent` is not a doctype. In strict mode: the text contains
    /// illegal characters.
    pub fn dtd_element(
        &mut self,
        parent: NodeId,
        options: impl Into<DtdDeclOptions>,
    ) -> Result<NodeId> {
        let char_data = self.dtd_decl_text(parent, "element declaration", options)?;
        self.append_new(parent, NodeKind::DtdElement(DtdElement { char_data }))
    }

    /// Adds an `<!ENTITY ...>` declaration to the doctype `parent`.
    ///
    /// # Errors
    ///
    /// Always: `parent` is not a doctype. In strict mode: the text contains
    /// illegal characters.
    pub fn dtd_entity(
        &mut self,
        parent: NodeId,
        options: impl Into<DtdDeclOptions>,
    ) -> Result<NodeId> {
        let text = self.dtd_decl_text(parent, "entity declaration", options)?;
        self.append_new(parent, NodeKind::DtdEntity(DtdEntity { text }))
    }

    /// Adds a `<!NOTATION ...>` declaration to the doctype `parent`.
    ///
    /// # Errors
    ///
    /// Always: `parent` is not a doctype. In strict mode: the text contains
    /// illegal characters.
    pub fn dtd_notation(
        &mut self,
        parent: NodeId,
        options: impl Into<DtdDeclOptions>,
    ) -> Result<NodeId> {
        let text = self.dtd_decl_text(parent, "notation declaration", options)?;
        self.append_new(parent, NodeKind::DtdNotation(DtdNotation { text }))
    }

    /// Adds a parameter-entity reference (`%name;`) to the doctype `parent`.
    ///
    /// # Errors
    ///
    /// Always: `parent` is not a doctype. In strict mode: the name is not a
    /// valid XML name.
    pub fn dtd_param_entity_ref(
        &mut self,
        parent: NodeId,
        options: impl Into<DtdParamEntityRefOptions>,
    ) -> Result<NodeId> {
        let options = options.into();
        let name = rules::name(
            "parameter entity reference name",
            options.name,
            self.validation,
            false,
        )
        .map_err(self.blame(parent))?;
        self.append_new(parent, NodeKind::DtdParamEntityRef(DtdParamEntityRef { name }))
    }

    fn dtd_decl_text(
        &self,
        parent: NodeId,
        field: &str,
        options: impl Into<DtdDeclOptions>,
    ) -> Result<String> {
        rules::chars(field, options.into().text, self.validation, false).map_err(self.blame(parent))
    }

    /// Allocates a node, checks that `parent` may take it, and appends it.
    fn append_new(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId> {
        self.check_insertion(parent, &kind, None, None)?;
        let id = self.create_node(kind);
        self.append_child(parent, id);
        self.note_attached(parent, id);
        trace!(
            kind = self.node(id).kind.label(),
            parent = parent.into_raw(),
            "appended node"
        );
        Ok(id)
    }

    // --- Field setters ---

    /// Sets the name of an element, attribute, entity reference, doctype or
    /// parameter-entity reference, under the same rules as at creation.
    ///
    /// # Errors
    ///
    /// Always: the node's kind has no name. In strict mode: the name is
    /// invalid (unless the node repairs names), or a sibling attribute
    /// already uses it.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        let v = self.node(id).validation;
        let checked = match &self.node(id).kind {
            NodeKind::Element(e) => {
                rules::name("element name", name, v, e.replace_invalid_chars_in_name)
            }
            NodeKind::Attribute(a) => {
                rules::name("attribute name", name, v, a.replace_invalid_chars_in_name)
            }
            NodeKind::EntityRef(_) => rules::name("entity reference name", name, v, false),
            NodeKind::Dtd(_) => rules::name("doctype name", name, v, false),
            NodeKind::DtdParamEntityRef(_) => {
                rules::name("parameter entity reference name", name, v, false)
            }
            _ => return Err(self.wrong_kind(id, "name")),
        };
        let name = checked.map_err(self.blame(id))?;

        let owner = self
            .parent(id)
            .filter(|_| matches!(self.node(id).kind, NodeKind::Attribute(_)));
        if let Some(element) = owner.filter(|_| v) {
            let taken = self.children(element).any(|sibling| {
                sibling != id
                    && matches!(&self.node(sibling).kind, NodeKind::Attribute(a) if a.name == name)
            });
            if taken {
                return Err(self.blame(element)(Violation::Structure(format!(
                    "element already has an attribute named {name:?}"
                ))));
            }
        }

        match &mut self.node_mut(id).kind {
            NodeKind::Element(Element { name: slot, .. })
            | NodeKind::Attribute(Attribute { name: slot, .. })
            | NodeKind::EntityRef(EntityRef { name: slot })
            | NodeKind::Dtd(Dtd { name: slot, .. })
            | NodeKind::DtdParamEntityRef(DtdParamEntityRef { name: slot }) => *slot = name,
            _ => {}
        }
        if let Some(element) = owner {
            self.refresh_attribute_names(element);
        }
        Ok(())
    }

    /// Sets the text of attribute text, character data, a CDATA section, a
    /// comment, or a DTD markup declaration, under the same rules as at
    /// creation.
    ///
    /// # Errors
    ///
    /// Always: the node's kind has no text. In strict mode: the text breaks
    /// the kind's rules (unless the node repairs its text).
    pub fn set_char_data(&mut self, id: NodeId, char_data: impl Into<String>) -> Result<()> {
        let text = char_data.into();
        let v = self.node(id).validation;
        let checked = match &self.node(id).kind {
            NodeKind::AttributeText(t) => rules::chars(
                "attribute text",
                text,
                v,
                t.replace_invalid_chars_in_char_data,
            ),
            NodeKind::CharData(t) => rules::chars(
                "character data",
                text,
                v,
                t.replace_invalid_chars_in_char_data,
            ),
            NodeKind::Cdata(t) => rules::cdata(text, v, t.replace_invalid_chars_in_char_data),
            NodeKind::Comment(t) => rules::comment(text, v, t.replace_invalid_chars_in_char_data),
            kind @ (NodeKind::DtdAttlist(_)
            | NodeKind::DtdElement(_)
            | NodeKind::DtdEntity(_)
            | NodeKind::DtdNotation(_)) => rules::chars(kind.label(), text, v, false),
            _ => return Err(self.wrong_kind(id, "text")),
        };
        let text = checked.map_err(self.blame(id))?;
        match &mut self.node_mut(id).kind {
            NodeKind::AttributeText(AttributeText { char_data: slot, .. })
            | NodeKind::CharData(CharData { char_data: slot, .. })
            | NodeKind::Cdata(Cdata { char_data: slot, .. })
            | NodeKind::Comment(Comment { char_data: slot, .. })
            | NodeKind::DtdElement(DtdElement { char_data: slot })
            | NodeKind::DtdAttlist(DtdAttlist { text: slot })
            | NodeKind::DtdEntity(DtdEntity { text: slot })
            | NodeKind::DtdNotation(DtdNotation { text: slot }) => *slot = text,
            _ => {}
        }
        Ok(())
    }

    /// Sets the referenced character of a character reference.
    ///
    /// # Errors
    ///
    /// Always: the node is not a character reference. In strict mode:
    /// `char` is not exactly one legal character.
    pub fn set_char(&mut self, id: NodeId, char: impl Into<String>) -> Result<()> {
        let v = self.node(id).validation;
        if !matches!(self.node(id).kind, NodeKind::CharRef(_)) {
            return Err(self.wrong_kind(id, "character"));
        }
        let char = rules::char_ref(char.into(), v).map_err(self.blame(id))?;
        if let NodeKind::CharRef(r) = &mut self.node_mut(id).kind {
            r.char = char;
        }
        Ok(())
    }

    /// Chooses hexadecimal or decimal form for a character reference.
    ///
    /// # Errors
    ///
    /// Always: the node is not a character reference.
    pub fn set_hex(&mut self, id: NodeId, hex: bool) -> Result<()> {
        match &mut self.node_mut(id).kind {
            NodeKind::CharRef(r) => {
                r.hex = hex;
                Ok(())
            }
            _ => Err(self.wrong_kind(id, "hex flag")),
        }
    }

    /// Sets the target of a processing instruction.
    ///
    /// # Errors
    ///
    /// Always: the node is not a processing instruction. In strict mode:
    /// the target is not a name or is `xml`.
    pub fn set_target(&mut self, id: NodeId, target: impl Into<String>) -> Result<()> {
        let v = self.node(id).validation;
        if !matches!(self.node(id).kind, NodeKind::ProcInst(_)) {
            return Err(self.wrong_kind(id, "target"));
        }
        let target = rules::proc_inst_target(target.into(), v).map_err(self.blame(id))?;
        if let NodeKind::ProcInst(p) = &mut self.node_mut(id).kind {
            p.target = target;
        }
        Ok(())
    }

    /// Sets or clears the content of a processing instruction.
    ///
    /// # Errors
    ///
    /// Always: the node is not a processing instruction. In strict mode:
    /// the content contains illegal characters or `?>`.
    pub fn set_content(&mut self, id: NodeId, content: Option<String>) -> Result<()> {
        let v = self.node(id).validation;
        if !matches!(self.node(id).kind, NodeKind::ProcInst(_)) {
            return Err(self.wrong_kind(id, "content"));
        }
        let content = content
            .map(|c| rules::proc_inst_content(c, v))
            .transpose()
            .map_err(self.blame(id))?;
        if let NodeKind::ProcInst(p) = &mut self.node_mut(id).kind {
            p.content = content;
        }
        Ok(())
    }

    /// Sets the version of a declaration.
    ///
    /// # Errors
    ///
    /// Always: the node is not a declaration. In strict mode: the version
    /// does not match `1.[0-9]+`.
    pub fn set_version(&mut self, id: NodeId, version: impl Into<String>) -> Result<()> {
        let v = self.node(id).validation;
        if !matches!(self.node(id).kind, NodeKind::Decl(_)) {
            return Err(self.wrong_kind(id, "version"));
        }
        let version = rules::version(version.into(), v).map_err(self.blame(id))?;
        if let NodeKind::Decl(d) = &mut self.node_mut(id).kind {
            d.version = version;
        }
        Ok(())
    }

    /// Sets or clears the encoding of a declaration.
    ///
    /// # Errors
    ///
    /// Always: the node is not a declaration. In strict mode: the encoding
    /// name is malformed.
    pub fn set_encoding(&mut self, id: NodeId, encoding: Option<String>) -> Result<()> {
        let v = self.node(id).validation;
        if !matches!(self.node(id).kind, NodeKind::Decl(_)) {
            return Err(self.wrong_kind(id, "encoding"));
        }
        let encoding = encoding
            .map(|e| rules::encoding(e, v))
            .transpose()
            .map_err(self.blame(id))?;
        if let NodeKind::Decl(d) = &mut self.node_mut(id).kind {
            d.encoding = encoding;
        }
        Ok(())
    }

    /// Sets or clears the standalone flag of a declaration.
    ///
    /// # Errors
    ///
    /// Always: the node is not a declaration. In strict mode: the value is
    /// neither `yes` nor `no`.
    pub fn set_standalone(&mut self, id: NodeId, standalone: Option<String>) -> Result<()> {
        let v = self.node(id).validation;
        if !matches!(self.node(id).kind, NodeKind::Decl(_)) {
            return Err(self.wrong_kind(id, "standalone flag"));
        }
        let standalone = standalone
            .map(|s| rules::standalone(s, v))
            .transpose()
            .map_err(self.blame(id))?;
        if let NodeKind::Decl(d) = &mut self.node_mut(id).kind {
            d.standalone = standalone;
        }
        Ok(())
    }

    /// Sets or clears the system identifier of a doctype.
    ///
    /// # Errors
    ///
    /// Always: the node is not a doctype, or the value contains both quote
    /// characters. In strict mode: the value contains illegal characters,
    /// or it is cleared while a public identifier is set.
    pub fn set_sys_id(&mut self, id: NodeId, sys_id: Option<String>) -> Result<()> {
        let v = self.node(id).validation;
        let NodeKind::Dtd(dtd) = &self.node(id).kind else {
            return Err(self.wrong_kind(id, "system identifier"));
        };
        if v && sys_id.is_none() && dtd.pub_id.is_some() {
            return Err(self.blame(id)(Violation::Structure(
                "cannot remove the system identifier while a public identifier is set"
                    .to_string(),
            )));
        }
        let sys_id = sys_id
            .map(|s| rules::sys_id(s, v))
            .transpose()
            .map_err(self.blame(id))?;
        if let NodeKind::Dtd(d) = &mut self.node_mut(id).kind {
            d.sys_id = sys_id;
        }
        Ok(())
    }

    /// Sets or clears the public identifier of a doctype.
    ///
    /// # Errors
    ///
    /// Always: the node is not a doctype, or the value contains both quote
    /// characters. In strict mode: the value contains characters outside
    /// the public identifier class, or no system identifier is set.
    pub fn set_pub_id(&mut self, id: NodeId, pub_id: Option<String>) -> Result<()> {
        let v = self.node(id).validation;
        let NodeKind::Dtd(dtd) = &self.node(id).kind else {
            return Err(self.wrong_kind(id, "public identifier"));
        };
        if v && pub_id.is_some() && dtd.sys_id.is_none() {
            return Err(self.blame(id)(Violation::Structure(
                "a public identifier requires a system identifier".to_string(),
            )));
        }
        let pub_id = pub_id
            .map(|p| rules::pub_id(p, v))
            .transpose()
            .map_err(self.blame(id))?;
        if let NodeKind::Dtd(d) = &mut self.node_mut(id).kind {
            d.pub_id = pub_id;
        }
        Ok(())
    }

    /// Chooses between `<name/>` and `<name></name>` for an element without content.
    ///
    /// # Errors
    ///
    /// Always: the node is not an element.
    pub fn set_use_self_closing_tag_if_empty(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        match &mut self.node_mut(id).kind {
            NodeKind::Element(e) => {
                e.use_self_closing_tag_if_empty = enabled;
                Ok(())
            }
            _ => Err(self.wrong_kind(id, "self-closing flag")),
        }
    }

    fn wrong_kind(&self, id: NodeId, field: &'static str) -> Error {
        Error::WrongKind {
            context: self.context(id),
            kind: self.node(id).kind.label(),
            field,
        }
    }

    // --- Generic tree editing ---

    /// Inserts `child` under `parent` at `index` (appends when `None`).
    ///
    /// A child that already has a parent is detached from it first, so
    /// this also moves nodes within the document.
    ///
    /// # Errors
    ///
    /// Always: `parent`'s kind cannot hold `child`'s kind, `child` is
    /// `parent` or one of its ancestors, or `index` is past the end. In
    /// strict mode: the result would break the document ordering rules or
    /// duplicate an attribute name.
    pub fn insert_child(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) -> Result<()> {
        if self.ancestors(parent).any(|a| a == child) {
            return Err(Error::Cycle {
                context: self.context(parent),
            });
        }
        let siblings: Vec<NodeId> = self.children(parent).filter(|&c| c != child).collect();
        let index = index.unwrap_or(siblings.len());
        if index > siblings.len() {
            return Err(Error::IndexOutOfRange {
                context: self.context(parent),
                index,
                len: siblings.len(),
            });
        }
        self.check_insertion(parent, &self.node(child).kind, Some(child), Some(index))?;

        self.detach(child);
        match siblings.get(index) {
            Some(&reference) => self.insert_before(reference, child),
            None => self.append_child(parent, child),
        }
        self.note_attached(parent, child);
        trace!(
            kind = self.node(child).kind.label(),
            parent = parent.into_raw(),
            index,
            "inserted node"
        );
        Ok(())
    }

    /// Detaches `child` from `parent`. The node stays allocated but is no
    /// longer reachable from the document.
    ///
    /// # Errors
    ///
    /// `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.parent(child) != Some(parent) {
            return Err(Error::NotAChild {
                context: self.context(parent),
            });
        }
        self.detach(child);
        trace!(parent = parent.into_raw(), "removed node");
        Ok(())
    }

    /// Detaches the child of `parent` at `index` and returns it.
    ///
    /// # Errors
    ///
    /// `index` is past the end of `parent`'s children.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<NodeId> {
        let Some(child) = self.child_at(parent, index) else {
            return Err(Error::IndexOutOfRange {
                context: self.context(parent),
                index,
                len: self.child_count(parent),
            });
        };
        self.remove_child(parent, child)?;
        Ok(child)
    }

    /// Checks that a node of `kind` may be placed under `parent` at `index`.
    ///
    /// `moving` is the node being re-inserted, if it already exists; it is
    /// left out of the sibling checks.
    fn check_insertion(
        &self,
        parent: NodeId,
        kind: &NodeKind,
        moving: Option<NodeId>,
        index: Option<usize>,
    ) -> Result<()> {
        let parent_kind = &self.node(parent).kind;
        if !parent_kind.accepts(kind) {
            let context = self.context(parent);
            return Err(if parent_kind.is_leaf() {
                Error::NoChildren {
                    context,
                    kind: parent_kind.label(),
                }
            } else {
                Error::ChildNotAllowed {
                    context,
                    parent: parent_kind.label(),
                    child: kind.label(),
                }
            });
        }
        if !self.node(parent).validation {
            return Ok(());
        }
        match (parent_kind, kind) {
            (NodeKind::Document, _) => {
                let mut order: Vec<&NodeKind> = self
                    .children(parent)
                    .filter(|&c| Some(c) != moving)
                    .map(|c| &self.node(c).kind)
                    .collect();
                let at = index.unwrap_or(order.len()).min(order.len());
                order.insert(at, kind);
                check_document_order(&order).map_err(self.blame(parent))
            }
            (NodeKind::Element(_), NodeKind::Attribute(attribute)) => {
                let taken = self.children(parent).any(|sibling| {
                    Some(sibling) != moving
                        && matches!(&self.node(sibling).kind, NodeKind::Attribute(a) if a.name == attribute.name)
                });
                if taken {
                    return Err(self.blame(parent)(Violation::Structure(format!(
                        "element already has an attribute named {:?}",
                        attribute.name
                    ))));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Updates bookkeeping after `child` has been linked under `parent`.
    fn note_attached(&mut self, parent: NodeId, child: NodeId) {
        let NodeKind::Attribute(Attribute { name, .. }) = &self.node(child).kind else {
            return;
        };
        let name = name.clone();
        if let NodeKind::Element(element) = &mut self.node_mut(parent).kind {
            element.attribute_names.insert(name);
        }
    }

    /// Rebuilds an element's attribute name set from its attribute children.
    fn refresh_attribute_names(&mut self, element: NodeId) {
        let names: HashSet<String> = self
            .children(element)
            .filter_map(|c| match &self.node(c).kind {
                NodeKind::Attribute(a) => Some(a.name.clone()),
                _ => None,
            })
            .collect();
        if let NodeKind::Element(e) = &mut self.node_mut(element).kind {
            e.attribute_names = names;
        }
    }

    // --- Raw arena operations ---

    /// Allocates a new detached node in the arena and returns its `NodeId`.
    pub(crate) fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(NodeData::new(kind, self.validation));
        NodeId::from_index(index)
    }

    /// Appends a child node to the end of a parent's child list.
    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.node(child).parent.is_none(),
            "child already has a parent; detach it first"
        );

        self.node_mut(child).parent = Some(parent);

        if let Some(last) = self.node(parent).last_child {
            self.node_mut(last).next_sibling = Some(child);
            self.node_mut(child).prev_sibling = Some(last);
            self.node_mut(parent).last_child = Some(child);
        } else {
            self.node_mut(parent).first_child = Some(child);
            self.node_mut(parent).last_child = Some(child);
        }
    }

    /// Inserts `new_child` before `reference` in the parent's child list.
    ///
    /// # Panics
    ///
    /// Panics if `reference` has no parent.
    #[allow(clippy::expect_used)]
    fn insert_before(&mut self, reference: NodeId, new_child: NodeId) {
        debug_assert!(
            self.node(new_child).parent.is_none(),
            "new_child already has a parent; detach it first"
        );

        let parent = self
            .node(reference)
            .parent
            .expect("reference has no parent");
        self.node_mut(new_child).parent = Some(parent);

        if let Some(prev) = self.node(reference).prev_sibling {
            self.node_mut(prev).next_sibling = Some(new_child);
            self.node_mut(new_child).prev_sibling = Some(prev);
        } else {
            self.node_mut(parent).first_child = Some(new_child);
        }

        self.node_mut(new_child).next_sibling = Some(reference);
        self.node_mut(reference).prev_sibling = Some(new_child);
    }

    /// Detaches a node from its parent (but does not free it from the arena).
    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };

        let prev = self.node(id).prev_sibling;
        let next = self.node(id).next_sibling;

        match prev {
            Some(p) => self.node_mut(p).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }

        match next {
            Some(n) => self.node_mut(n).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }

        self.node_mut(id).parent = None;
        self.node_mut(id).prev_sibling = None;
        self.node_mut(id).next_sibling = None;

        if matches!(self.node(id).kind, NodeKind::Attribute(_)) {
            self.refresh_attribute_names(parent);
        }
    }

    // --- Builder and output ---

    /// Returns a fluent cursor positioned at `id`.
    pub fn cursor(&mut self, id: NodeId) -> NodeMut<'_> {
        NodeMut::new(self, id)
    }

    /// Returns a fluent cursor positioned at the document node.
    pub fn root_cursor(&mut self) -> NodeMut<'_> {
        let root = self.root;
        NodeMut::new(self, root)
    }

    /// Serializes the document with default formatting.
    ///
    /// # Errors
    ///
    /// See [`serialize_with_options`](crate::serial::serialize_with_options).
    pub fn to_xml(&self) -> Result<String> {
        crate::serial::serialize(self)
    }

    /// Serializes the document with the given formatting.
    ///
    /// # Errors
    ///
    /// See [`serialize_with_options`](crate::serial::serialize_with_options).
    pub fn to_xml_with(&self, options: &FormatOptions) -> Result<String> {
        crate::serial::serialize_with_options(self, options)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks the ordering rules among the document node's children: at most
/// one declaration, which must come first, and at most one doctype, which
/// must precede every element.
fn check_document_order(order: &[&NodeKind]) -> std::result::Result<(), Violation> {
    let mut decls = 0;
    let mut dtds = 0;
    let mut seen_element = false;
    for (position, kind) in order.iter().enumerate() {
        match kind {
            NodeKind::Decl(_) => {
                decls += 1;
                if decls > 1 {
                    return Err(Violation::Structure(
                        "a document may contain only one declaration".to_string(),
                    ));
                }
                if position != 0 {
                    return Err(Violation::Structure(
                        "the declaration must be the first node in the document".to_string(),
                    ));
                }
            }
            NodeKind::Dtd(_) => {
                dtds += 1;
                if dtds > 1 {
                    return Err(Violation::Structure(
                        "a document may contain only one doctype".to_string(),
                    ));
                }
                if seen_element {
                    return Err(Violation::Structure(
                        "the doctype must precede the root element".to_string(),
                    ));
                }
            }
            NodeKind::Element(_) => seen_element = true,
            _ => {}
        }
    }
    Ok(())
}

// --- Iterators ---

/// Iterator over the children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).next_sibling;
        Some(current)
    }
}

/// Iterator over a node and its ancestors.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).parent;
        Some(current)
    }
}

/// Depth-first iterator over all descendants of a node.
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        // Try to go deeper first
        if let Some(child) = self.doc.first_child(current) {
            self.next = Some(child);
            return Some(current);
        }

        // Try next sibling
        if let Some(sibling) = self.doc.next(current) {
            self.next = Some(sibling);
            return Some(current);
        }

        // Walk up to find an ancestor with a next sibling
        let mut ancestor = self.doc.parent(current);
        while let Some(anc) = ancestor {
            if anc == self.root {
                self.next = None;
                return Some(current);
            }
            if let Some(sibling) = self.doc.next(anc) {
                self.next = Some(sibling);
                return Some(current);
            }
            ancestor = self.doc.parent(anc);
        }

        self.next = None;
        Some(current)
    }
}
