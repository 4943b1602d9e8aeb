//! Option records passed to the child factories.
//!
//! Each record carries the initial field values of one node kind plus the
//! per-field flags that switch validation failures to U+FFFD replacement.
//! Records with a single required field convert from `&str` and `String`,
//! so `cursor.element("body")` is shorthand for
//! `cursor.element(ElementOptions::new("body"))`.

/// Options for an XML declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclOptions {
    /// The XML version. Defaults to `"1.0"` when `None`.
    pub version: Option<String>,
    /// The encoding name, e.g. `"UTF-8"`.
    pub encoding: Option<String>,
    /// The standalone flag, `"yes"` or `"no"`.
    pub standalone: Option<String>,
}

impl DeclOptions {
    /// Creates options for a declaration with default version and no
    /// encoding or standalone flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the encoding.
    #[must_use]
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Sets the standalone flag.
    #[must_use]
    pub fn standalone(mut self, standalone: impl Into<String>) -> Self {
        self.standalone = Some(standalone.into());
        self
    }
}

/// Options for a document type declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DtdOptions {
    /// The root element name.
    pub name: String,
    /// The system identifier.
    pub sys_id: Option<String>,
    /// The public identifier. Requires `sys_id`.
    pub pub_id: Option<String>,
}

impl DtdOptions {
    /// Creates options for a doctype named `name` with no identifiers.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the system identifier.
    #[must_use]
    pub fn sys_id(mut self, sys_id: impl Into<String>) -> Self {
        self.sys_id = Some(sys_id.into());
        self
    }

    /// Sets the public identifier.
    #[must_use]
    pub fn pub_id(mut self, pub_id: impl Into<String>) -> Self {
        self.pub_id = Some(pub_id.into());
        self
    }
}

/// Options for an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementOptions {
    /// The element name.
    pub name: String,
    /// Replace illegal name characters with U+FFFD instead of failing.
    pub replace_invalid_chars_in_name: bool,
    /// Render an element without content as `<name/>`. Defaults to `true`.
    pub use_self_closing_tag_if_empty: bool,
}

impl Default for ElementOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            replace_invalid_chars_in_name: false,
            use_self_closing_tag_if_empty: true,
        }
    }
}

impl ElementOptions {
    /// Creates options for an element named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Enables or disables name repair.
    #[must_use]
    pub fn replace_invalid_chars_in_name(mut self, replace: bool) -> Self {
        self.replace_invalid_chars_in_name = replace;
        self
    }

    /// Chooses between `<name/>` and `<name></name>` for empty elements.
    #[must_use]
    pub fn use_self_closing_tag_if_empty(mut self, self_closing: bool) -> Self {
        self.use_self_closing_tag_if_empty = self_closing;
        self
    }
}

/// Options for an attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeOptions {
    /// The attribute name.
    pub name: String,
    /// Replace illegal name characters with U+FFFD instead of failing.
    pub replace_invalid_chars_in_name: bool,
    /// Initial text value. When set, an attribute text child holding it is
    /// created along with the attribute.
    pub value: Option<String>,
}

impl AttributeOptions {
    /// Creates options for an attribute named `name` with no value yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the initial text value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Enables or disables name repair.
    #[must_use]
    pub fn replace_invalid_chars_in_name(mut self, replace: bool) -> Self {
        self.replace_invalid_chars_in_name = replace;
        self
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for AttributeOptions {
    fn from((name, value): (N, V)) -> Self {
        Self::new(name).value(value)
    }
}

/// Options shared by the text-bearing kinds that support character repair:
/// attribute text, character data, CDATA sections and comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextOptions {
    /// The text.
    pub char_data: String,
    /// Replace illegal characters and forbidden sequences with U+FFFD
    /// instead of failing.
    pub replace_invalid_chars_in_char_data: bool,
}

impl TextOptions {
    /// Creates options holding `char_data`.
    #[must_use]
    pub fn new(char_data: impl Into<String>) -> Self {
        Self {
            char_data: char_data.into(),
            replace_invalid_chars_in_char_data: false,
        }
    }

    /// Enables or disables character repair.
    #[must_use]
    pub fn replace_invalid_chars_in_char_data(mut self, replace: bool) -> Self {
        self.replace_invalid_chars_in_char_data = replace;
        self
    }
}

/// Options for attribute text.
pub type AttributeTextOptions = TextOptions;
/// Options for character data.
pub type CharDataOptions = TextOptions;
/// Options for a CDATA section.
pub type CdataOptions = TextOptions;
/// Options for a comment.
pub type CommentOptions = TextOptions;

/// Options for a character reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharRefOptions {
    /// The referenced character, as a one-character string.
    pub char: String,
    /// Render in hexadecimal (`&#x64;`) rather than decimal (`&#100;`).
    pub hex: bool,
}

impl CharRefOptions {
    /// Creates options referencing `char` in decimal form.
    #[must_use]
    pub fn new(char: impl Into<String>) -> Self {
        Self {
            char: char.into(),
            hex: false,
        }
    }

    /// Chooses hexadecimal or decimal form.
    #[must_use]
    pub fn hex(mut self, hex: bool) -> Self {
        self.hex = hex;
        self
    }
}

impl From<char> for CharRefOptions {
    fn from(c: char) -> Self {
        Self::new(c)
    }
}

/// Options for a processing instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcInstOptions {
    /// The target name.
    pub target: String,
    /// The instruction content, if any.
    pub content: Option<String>,
}

impl ProcInstOptions {
    /// Creates options for an instruction with target `target` and no content.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            content: None,
        }
    }

    /// Sets the content.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Options for the kinds holding a single name: entity references and
/// parameter-entity references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameOptions {
    /// The referenced name.
    pub name: String,
}

impl NameOptions {
    /// Creates options holding `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Options for an entity reference.
pub type EntityRefOptions = NameOptions;
/// Options for a parameter-entity reference.
pub type DtdParamEntityRefOptions = NameOptions;

/// Options for the DTD markup declarations (`ATTLIST`, `ELEMENT`, `ENTITY`,
/// `NOTATION`), which hold the text after the keyword verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DtdDeclOptions {
    /// The declaration body, e.g. `"img src CDATA #REQUIRED"`.
    pub text: String,
}

impl DtdDeclOptions {
    /// Creates options holding `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

macro_rules! from_str_impls {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<&str> for $ty {
                fn from(s: &str) -> Self {
                    Self::new(s)
                }
            }

            impl From<String> for $ty {
                fn from(s: String) -> Self {
                    Self::new(s)
                }
            }
        )*
    };
}

from_str_impls!(
    DtdOptions,
    ElementOptions,
    AttributeOptions,
    TextOptions,
    CharRefOptions,
    ProcInstOptions,
    NameOptions,
    DtdDeclOptions,
);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_element_options_defaults() {
        let opts = ElementOptions::from("div");
        assert_eq!(opts.name, "div");
        assert!(opts.use_self_closing_tag_if_empty);
        assert!(!opts.replace_invalid_chars_in_name);
    }

    #[test]
    fn test_attribute_options_from_pair() {
        let opts = AttributeOptions::from(("href", "a.html"));
        assert_eq!(opts.name, "href");
        assert_eq!(opts.value.as_deref(), Some("a.html"));
    }

    #[test]
    fn test_decl_options_chain() {
        let opts = DeclOptions::new().encoding("UTF-8").standalone("yes");
        assert_eq!(opts.version, None);
        assert_eq!(opts.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(opts.standalone.as_deref(), Some("yes"));
    }

    #[test]
    fn test_char_ref_options_from_char() {
        let opts = CharRefOptions::from('d').hex(true);
        assert_eq!(opts.char, "d");
        assert!(opts.hex);
    }
}
