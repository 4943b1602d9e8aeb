//! Error types for tree construction and serialization.
//!
//! Every error is raised synchronously at the offending call and carries a
//! context string describing where in the tree it happened, built by
//! walking the parent chain (for example
//! `document > element "html" > attribute "src"`).
//!
//! Whether an error is raised at all depends on the document's validation
//! mode for [`Error::InvalidValue`] and most [`Error::Structure`] cases.
//! The remaining variants describe API contract violations and are raised
//! in every mode.

use thiserror::Error;

/// Result type alias for xmlsmith operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or serializing a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A field value is not legal markup: illegal characters, an invalid
    /// name, a forbidden sequence, or a malformed declaration value.
    #[error("{message} (in {context})")]
    InvalidValue {
        /// Location of the offending node.
        context: String,
        /// Human-readable description of the violation.
        message: String,
    },

    /// A structural rule between nodes was violated, e.g. a declaration
    /// that is not the first child of the document.
    #[error("{message} (in {context})")]
    Structure {
        /// Location of the offending node.
        context: String,
        /// Human-readable description of the violation.
        message: String,
    },

    /// A child was added to a node kind that never has children.
    #[error("{kind} nodes cannot have children (in {context})")]
    NoChildren {
        /// Location of the would-be parent.
        context: String,
        /// The parent's kind.
        kind: &'static str,
    },

    /// A child kind is not permitted under the given parent kind.
    #[error("{child} nodes are not allowed in {parent} nodes (in {context})")]
    ChildNotAllowed {
        /// Location of the would-be parent.
        context: String,
        /// The parent's kind.
        parent: &'static str,
        /// The rejected child's kind.
        child: &'static str,
    },

    /// The node passed to a removal is not a child of the given parent.
    #[error("node is not a child of this parent (in {context})")]
    NotAChild {
        /// Location of the parent.
        context: String,
    },

    /// A child index is past the end of the child list.
    #[error("index {index} is out of range for {len} children (in {context})")]
    IndexOutOfRange {
        /// Location of the parent.
        context: String,
        /// The requested index.
        index: usize,
        /// The number of children.
        len: usize,
    },

    /// A node would become its own ancestor.
    #[error("cannot insert a node into itself or its descendants (in {context})")]
    Cycle {
        /// Location of the would-be parent.
        context: String,
    },

    /// A field was read or written on a node kind that does not have it.
    #[error("{kind} nodes have no {field} (in {context})")]
    WrongKind {
        /// Location of the node.
        context: String,
        /// The node's kind.
        kind: &'static str,
        /// The requested field.
        field: &'static str,
    },
}

impl Error {
    /// Returns the location description carried by this error.
    #[must_use]
    pub fn context(&self) -> &str {
        match self {
            Self::InvalidValue { context, .. }
            | Self::Structure { context, .. }
            | Self::NoChildren { context, .. }
            | Self::ChildNotAllowed { context, .. }
            | Self::NotAChild { context }
            | Self::IndexOutOfRange { context, .. }
            | Self::Cycle { context }
            | Self::WrongKind { context, .. } => context,
        }
    }
}

/// A rule violation detected before the tree location is known.
///
/// Field rules are pure functions of a value; the tree attaches the
/// context when turning a violation into an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Violation {
    Value(String),
    Structure(String),
}

impl Violation {
    pub(crate) fn at(self, context: String) -> Error {
        match self {
            Self::Value(message) => Error::InvalidValue { context, message },
            Self::Structure(message) => Error::Structure { context, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_invalid_value_display() {
        let err = Error::InvalidValue {
            context: "document > element \"html\"".to_string(),
            message: "attribute name \"1x\" is not a valid XML name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "attribute name \"1x\" is not a valid XML name (in document > element \"html\")"
        );
    }

    #[test]
    fn test_no_children_display() {
        let err = Error::NoChildren {
            context: "document > comment".to_string(),
            kind: "comment",
        };
        assert_eq!(
            err.to_string(),
            "comment nodes cannot have children (in document > comment)"
        );
        assert_eq!(err.context(), "document > comment");
    }

    #[test]
    fn test_violation_at_attaches_context() {
        let err = Violation::Structure("only one doctype is allowed".to_string())
            .at("document".to_string());
        assert_eq!(
            err,
            Error::Structure {
                context: "document".to_string(),
                message: "only one doctype is allowed".to_string(),
            }
        );
    }

    #[test]
    fn test_error_is_error_trait() {
        let err = Error::Cycle {
            context: "document".to_string(),
        };
        let _: &dyn std::error::Error = &err;
    }
}
