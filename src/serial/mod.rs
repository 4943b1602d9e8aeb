//! XML serialization.
//!
//! This module renders a `Document` tree (or any subtree of it) to XML
//! text. Escaping is applied here, at render time, so stored field values
//! are always the unescaped text the caller supplied. Layout is controlled
//! by [`FormatOptions`].

pub mod xml;

pub use xml::{serialize, serialize_node, serialize_with_options};

/// Options controlling rendered output.
///
/// # Examples
///
/// ```
/// use xmlsmith::{Document, FormatOptions};
///
/// let mut doc = Document::new();
/// let root = doc.element(doc.root(), "root")?;
/// doc.attribute(root, ("id", "r1"))?;
/// doc.element(root, "child")?;
///
/// let compact = FormatOptions::default().double_quotes(true).pretty(false);
/// assert_eq!(doc.to_xml_with(&compact)?, r#"<root id="r1"><child/></root>"#);
///
/// let tabs = FormatOptions::default().indent("\t");
/// assert_eq!(doc.to_xml_with(&tabs)?, "<root id='r1'>\n\t<child/>\n</root>");
/// # Ok::<(), xmlsmith::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Quote attribute values and declaration fields with `"` instead of `'`.
    /// Defaults to `false`.
    pub double_quotes: bool,
    /// The string added per nesting level when pretty-printing.
    /// Defaults to four spaces.
    pub indent: String,
    /// The line separator used when pretty-printing. Defaults to `"\n"`.
    pub newline: String,
    /// Whether to put block-level children on their own indented lines.
    /// Defaults to `true`.
    pub pretty: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            double_quotes: false,
            indent: "    ".to_string(),
            newline: "\n".to_string(),
            pretty: true,
        }
    }
}

impl FormatOptions {
    /// Chooses `"` (when `true`) or `'` (when `false`) as the quote character.
    #[must_use]
    pub fn double_quotes(mut self, double_quotes: bool) -> Self {
        self.double_quotes = double_quotes;
        self
    }

    /// Sets the indentation unit, e.g. `"\t"` or `"  "`.
    #[must_use]
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Sets the line separator, e.g. `"\r\n"`.
    #[must_use]
    pub fn newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = newline.into();
        self
    }

    /// Enables or disables pretty-printing.
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// The configured quote character.
    #[must_use]
    pub fn quote(&self) -> char {
        if self.double_quotes {
            '"'
        } else {
            '\''
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let opts = FormatOptions::default();
        assert!(!opts.double_quotes);
        assert_eq!(opts.indent, "    ");
        assert_eq!(opts.newline, "\n");
        assert!(opts.pretty);
        assert_eq!(opts.quote(), '\'');
    }

    #[test]
    fn test_chained_setters() {
        let opts = FormatOptions::default()
            .double_quotes(true)
            .indent("\t")
            .newline("\r\n")
            .pretty(false);
        assert_eq!(opts.quote(), '"');
        assert_eq!(opts.indent, "\t");
        assert_eq!(opts.newline, "\r\n");
        assert!(!opts.pretty);
    }
}
