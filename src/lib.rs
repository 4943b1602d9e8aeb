//! # xmlsmith
//!
//! Build XML documents programmatically. Nodes are created through typed
//! factories that validate names, characters and document structure as
//! they go, and the finished tree renders to text with configurable
//! quoting, indentation and line endings.
//!
//! ## Quick Start
//!
//! ```
//! use xmlsmith::{DeclOptions, Document, DtdOptions, FormatOptions};
//!
//! let mut doc = Document::new();
//! doc.decl(DeclOptions::new().encoding("UTF-8"))?;
//! doc.dtd(
//!     DtdOptions::new("html")
//!         .pub_id("-//W3C//DTD XHTML 1.0 Strict//EN")
//!         .sys_id("http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd"),
//! )?;
//! doc.root_cursor()
//!     .element("html")?
//!     .attribute(("xmlns", "http://www.w3.org/1999/xhtml"))?
//!     .up()
//!     .element("body")?
//!     .element("h1")?
//!     .char_data("Welcome!")?;
//!
//! let xml = doc.to_xml_with(&FormatOptions::default().double_quotes(true))?;
//! assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE html PUBLIC"));
//! assert!(xml.ends_with("<body>\n        <h1>Welcome!</h1>\n    </body>\n</html>"));
//! # Ok::<(), xmlsmith::Error>(())
//! ```
//!
//! ## Strict and permissive documents
//!
//! [`Document::new`] checks every value and structural rule and fails with
//! an [`Error`] describing where in the tree the problem is.
//! [`Document::with_validation(false)`](Document::with_validation) accepts
//! any input and renders it as given, which is useful when the caller
//! already trusts its data. Either way, fields created with a
//! `replace_invalid_*` option have illegal characters replaced by U+FFFD.

pub mod error;
pub mod serial;
pub mod tree;
pub mod util;

mod trace;

// Re-export primary types at the crate root for convenience.
pub use error::{Error, Result};
pub use serial::FormatOptions;
pub use tree::{
    AttributeOptions, CdataOptions, CharDataOptions, CharRefOptions, CommentOptions,
    DeclOptions, Document, DtdOptions, ElementOptions, NodeId, NodeKind, NodeMut,
    ProcInstOptions, TextOptions,
};
