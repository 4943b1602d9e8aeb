//! Escaping of reserved markup characters.
//!
//! These are applied at render time only. Stored node values are always
//! the unescaped text the caller supplied.

/// Replaces `&` with `&amp;`.
///
/// Not idempotent: an already escaped `&amp;` becomes `&amp;amp;`.
#[must_use]
pub fn escape_ampersands(s: &str) -> String {
    s.replace('&', "&amp;")
}

/// Replaces `<` with `&lt;`.
#[must_use]
pub fn escape_left_angle_brackets(s: &str) -> String {
    s.replace('<', "&lt;")
}

/// Replaces the CDATA section terminator `]]>` with `]]&gt;`.
///
/// A literal `]]>` is not allowed in character data, but a lone `>` is, so
/// only the terminator sequence is touched.
#[must_use]
pub fn escape_cdata_terminators(s: &str) -> String {
    s.replace("]]>", "]]&gt;")
}

/// Replaces `'` with `&apos;`, for single-quoted attribute values.
#[must_use]
pub fn escape_single_quotes(s: &str) -> String {
    s.replace('\'', "&apos;")
}

/// Replaces `"` with `&quot;`, for double-quoted attribute values.
#[must_use]
pub fn escape_double_quotes(s: &str) -> String {
    s.replace('"', "&quot;")
}

/// Escapes the quote character `quote` for use inside an attribute value
/// delimited by it.
#[must_use]
pub(crate) fn escape_quotes(s: &str, quote: char) -> String {
    if quote == '"' {
        escape_double_quotes(s)
    } else {
        escape_single_quotes(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_ampersands_is_not_idempotent() {
        assert_eq!(escape_ampersands("a & b"), "a &amp; b");
        assert_eq!(escape_ampersands("&amp;"), "&amp;amp;");
        assert_eq!(escape_ampersands(&escape_ampersands("&")), "&amp;amp;");
    }

    #[test]
    fn test_escape_left_angle_brackets() {
        assert_eq!(escape_left_angle_brackets("a < b > c"), "a &lt; b > c");
    }

    #[test]
    fn test_escape_cdata_terminators() {
        assert_eq!(escape_cdata_terminators("a]]>b]]"), "a]]&gt;b]]");
        assert_eq!(escape_cdata_terminators("a > b"), "a > b");
        assert_eq!(escape_cdata_terminators("]]]>"), "]]]&gt;");
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_single_quotes(r#"it's "x""#), r#"it&apos;s "x""#);
        assert_eq!(escape_double_quotes(r#"it's "x""#), "it's &quot;x&quot;");
        assert_eq!(escape_quotes("'\"", '\''), "&apos;\"");
        assert_eq!(escape_quotes("'\"", '"'), "'&quot;");
    }
}
