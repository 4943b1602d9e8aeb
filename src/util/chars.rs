//! Character and name legality checks.
//!
//! Implements the `Char`, `Name` and `PubidChar` productions of XML 1.0
//! (Fifth Edition), §2.2 and §2.3, together with "fix" counterparts that
//! replace every offending code point with U+FFFD instead of rejecting
//! the whole string.
//!
//! Rust strings cannot hold unpaired surrogates, so the `&str` functions
//! here only ever see scalar values. Callers holding raw UTF-16 (for
//! example text received over FFI) should use the [`utf16`] variants,
//! which treat a lone high or low surrogate as an illegal code point.

/// The character substituted for illegal code points by the `fix_*` functions.
pub const REPLACEMENT_CHAR: char = char::REPLACEMENT_CHARACTER;

/// Returns `true` if `c` is a valid `Char` per XML 1.0 §2.2 `[2]`.
///
/// `#x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]`
#[must_use]
pub fn is_xml_char(c: char) -> bool {
    matches!(c as u32,
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x0001_0000..=0x0010_FFFF
    )
}

/// Returns `true` if `c` is a valid `NameStartChar` per XML 1.0 §2.3 `[4]`.
#[must_use]
pub fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z' |
        '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}' |
        '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' |
        '\u{200C}'..='\u{200D}' | '\u{2070}'..='\u{218F}' |
        '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}' |
        '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' |
        '\u{10000}'..='\u{EFFFF}'
    )
}

/// Returns `true` if `c` is a valid `NameChar` per XML 1.0 §2.3 `[4a]`.
#[must_use]
pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' |
            '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

/// Returns `true` if `c` is a valid `PubidChar` per XML 1.0 §2.3 `[13]`.
///
/// `PubidChar ::= #x20 | #xD | #xA | [a-zA-Z0-9] | [-'()+,./:=?;!*#@$_%]`
#[must_use]
pub fn is_pubid_char(c: char) -> bool {
    matches!(c,
        ' ' | '\r' | '\n' |
        'a'..='z' | 'A'..='Z' | '0'..='9' |
        '-' | '\'' | '(' | ')' | '+' | ',' | '.' | '/' | ':' |
        '=' | '?' | ';' | '!' | '*' | '#' | '@' | '$' | '_' | '%'
    )
}

/// Returns `true` if every character of `s` is a legal XML `Char`.
///
/// # Examples
///
/// ```
/// use xmlsmith::util::chars::validate_char;
///
/// assert!(validate_char("tab\tand newline\n"));
/// assert!(!validate_char("bell\u{7}"));
/// ```
#[must_use]
pub fn validate_char(s: &str) -> bool {
    s.chars().all(is_xml_char)
}

/// Replaces every character of `s` that is not a legal XML `Char` with U+FFFD.
#[must_use]
pub fn fix_char(s: &str) -> String {
    s.chars()
        .map(|c| if is_xml_char(c) { c } else { REPLACEMENT_CHAR })
        .collect()
}

/// Returns `true` if `s` consists of exactly one legal XML `Char`.
#[must_use]
pub fn validate_single_char(s: &str) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if is_xml_char(c))
}

/// Returns `true` if `s` matches the XML `Name` production.
///
/// The empty string is not a name.
///
/// # Examples
///
/// ```
/// use xmlsmith::util::chars::validate_name;
///
/// assert!(validate_name("xsl:template"));
/// assert!(!validate_name("1st"));
/// assert!(!validate_name(""));
/// ```
#[must_use]
pub fn validate_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

/// Replaces every character of `s` that is illegal at its position in an
/// XML `Name` with U+FFFD.
///
/// An empty input stays empty: there is nothing to build a name from.
#[must_use]
pub fn fix_name(s: &str) -> String {
    s.chars()
        .enumerate()
        .map(|(i, c)| {
            let legal = if i == 0 {
                is_name_start_char(c)
            } else {
                is_name_char(c)
            };
            if legal {
                c
            } else {
                REPLACEMENT_CHAR
            }
        })
        .collect()
}

/// Returns `true` if every character of `s` is a legal `PubidChar`.
#[must_use]
pub fn validate_pub_id(s: &str) -> bool {
    s.chars().all(is_pubid_char)
}

/// The same checks over UTF-16 code units.
///
/// A surrogate pair is decoded into a single supplementary code point and
/// judged as such. An unpaired surrogate is always illegal; the fixers
/// replace it with U+FFFD.
pub mod utf16 {
    use super::{is_name_char, is_name_start_char, is_xml_char, REPLACEMENT_CHAR};

    /// Decodes `units`, yielding `None` for each unpaired surrogate.
    fn decode(units: &[u16]) -> impl Iterator<Item = Option<char>> + '_ {
        char::decode_utf16(units.iter().copied()).map(Result::ok)
    }

    /// Returns `true` if `units` decode to legal XML `Char`s only.
    #[must_use]
    pub fn validate_char(units: &[u16]) -> bool {
        decode(units).all(|c| c.is_some_and(is_xml_char))
    }

    /// Decodes `units`, replacing illegal code points and lone surrogates
    /// with U+FFFD.
    #[must_use]
    pub fn fix_char(units: &[u16]) -> String {
        decode(units)
            .map(|c| c.filter(|&c| is_xml_char(c)).unwrap_or(REPLACEMENT_CHAR))
            .collect()
    }

    /// Returns `true` if `units` hold exactly one legal character: a
    /// single code unit or one surrogate pair.
    #[must_use]
    pub fn validate_single_char(units: &[u16]) -> bool {
        let mut chars = decode(units);
        matches!((chars.next(), chars.next()), (Some(Some(c)), None) if is_xml_char(c))
    }

    /// Returns `true` if `units` decode to a legal XML `Name`.
    #[must_use]
    pub fn validate_name(units: &[u16]) -> bool {
        let mut chars = decode(units);
        match chars.next() {
            Some(Some(first)) if is_name_start_char(first) => {
                chars.all(|c| c.is_some_and(is_name_char))
            }
            _ => false,
        }
    }

    /// Decodes `units` into a name, replacing every illegal code point or
    /// lone surrogate with U+FFFD.
    #[must_use]
    pub fn fix_name(units: &[u16]) -> String {
        decode(units)
            .enumerate()
            .map(|(i, c)| {
                let legal: fn(char) -> bool = if i == 0 {
                    is_name_start_char
                } else {
                    is_name_char
                };
                c.filter(|&c| legal(c)).unwrap_or(REPLACEMENT_CHAR)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validate_char_accepts_whitespace_controls() {
        assert!(validate_char("\t\n\r"));
        assert!(validate_char(""));
        assert!(validate_char("plain text \u{10000} \u{FFFD}"));
    }

    #[test]
    fn test_validate_char_rejects_controls() {
        assert!(!validate_char("\u{0}"));
        assert!(!validate_char("a\u{1F}b"));
        assert!(!validate_char("\u{FFFE}"));
        assert!(!validate_char("\u{FFFF}"));
    }

    #[test]
    fn test_fix_char_replaces_each_illegal_char() {
        assert_eq!(fix_char("a\u{1}b\u{2}c"), "a\u{FFFD}b\u{FFFD}c");
        assert_eq!(fix_char("\u{FFFE}"), "\u{FFFD}");
    }

    #[test]
    fn test_fix_char_is_identity_on_valid_input() {
        for s in ["", "abc", "\t\r\n", "\u{10FFFF}", "ünïcödé"] {
            assert!(validate_char(s));
            assert_eq!(fix_char(s), s);
        }
    }

    #[test]
    fn test_fixed_chars_always_validate() {
        for s in ["\u{0}", "x\u{8}y", "\u{FFFF}\u{FFFE}", "\u{B}\u{C}"] {
            assert!(!validate_char(s));
            assert!(validate_char(&fix_char(s)));
        }
    }

    #[test]
    fn test_validate_single_char() {
        assert!(validate_single_char("a"));
        assert!(validate_single_char("\u{1F600}"));
        assert!(!validate_single_char(""));
        assert!(!validate_single_char("ab"));
        assert!(!validate_single_char("\u{1}"));
    }

    #[test]
    fn test_validate_name_edge_cases() {
        assert!(!validate_name(""));
        assert!(validate_name(":"));
        assert!(validate_name("_abc"));
        assert!(validate_name("a-bc"));
        assert!(validate_name("a.b\u{B7}c"));
        assert!(!validate_name("."));
        assert!(!validate_name("-a"));
        assert!(!validate_name("9a"));
        assert!(!validate_name("a b"));
    }

    #[test]
    fn test_fix_name() {
        assert_eq!(fix_name(""), "");
        assert_eq!(fix_name("abc"), "abc");
        assert_eq!(fix_name("1ab"), "\u{FFFD}ab");
        assert_eq!(fix_name("a b"), "a\u{FFFD}b");
        assert_eq!(fix_name("-1"), "\u{FFFD}1");
        assert!(validate_name(&fix_name("<bad name>")));
    }

    #[test]
    fn test_validate_pub_id() {
        assert!(validate_pub_id("-//W3C//DTD XHTML 1.0 Strict//EN"));
        assert!(validate_pub_id(""));
        assert!(!validate_pub_id("quote\"d"));
        assert!(!validate_pub_id("tab\t"));
        assert!(!validate_pub_id("ü"));
    }

    #[test]
    fn test_utf16_lone_surrogates_are_illegal() {
        assert!(!utf16::validate_char(&[0x61, 0xD800]));
        assert!(!utf16::validate_char(&[0xDC00, 0x61]));
        assert!(utf16::validate_char(&[0xD800, 0xDC00]));
        assert_eq!(utf16::fix_char(&[0x61, 0xD800]), "a\u{FFFD}");
        assert_eq!(utf16::fix_char(&[0xDC00, 0x62]), "\u{FFFD}b");
        assert_eq!(utf16::fix_char(&[0xD800, 0xDC00]), "\u{10000}");
    }

    #[test]
    fn test_utf16_single_char() {
        assert!(utf16::validate_single_char(&[0x61]));
        assert!(utf16::validate_single_char(&[0xD83D, 0xDE00]));
        assert!(!utf16::validate_single_char(&[0xD83D]));
        assert!(!utf16::validate_single_char(&[0x61, 0x62]));
        assert!(!utf16::validate_single_char(&[]));
    }

    #[test]
    fn test_utf16_names() {
        assert!(utf16::validate_name(&[0x61, 0xD800, 0xDC00]));
        assert!(!utf16::validate_name(&[0xD800]));
        assert!(!utf16::validate_name(&[0x61, 0xDC00]));
        assert!(!utf16::validate_name(&[0x61, 0xD800, 0x62]));
        assert!(!utf16::validate_name(&[]));
        assert_eq!(utf16::fix_name(&[0x61, 0xD800, 0x62]), "a\u{FFFD}b");
        assert_eq!(utf16::fix_name(&[]), "");
    }
}
