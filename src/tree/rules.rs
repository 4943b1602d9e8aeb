//! Field rules for each node kind.
//!
//! Each rule takes the proposed value, the node's validation flag and, where
//! the kind supports it, the field's replace flag, and returns the value to
//! store. With `replace` set the value is repaired with U+FFFD and never
//! rejected for character or name legality. Otherwise an illegal value is
//! rejected when `validation` is on and stored as-is when it is off.

use crate::error::Violation;
use crate::trace::debug;
use crate::util::chars::{
    fix_char, fix_name, validate_char, validate_name, validate_pub_id, validate_single_char,
    REPLACEMENT_CHAR,
};

type RuleResult<T = String> = Result<T, Violation>;

/// A markup name (element, attribute, entity, doctype names).
pub(crate) fn name(field: &str, value: String, validation: bool, replace: bool) -> RuleResult {
    if replace {
        let fixed = fix_name(&value);
        if fixed != value {
            debug!(field, "replaced illegal name characters");
        }
        if validation && fixed.is_empty() {
            return Err(Violation::Value(format!("{field} must not be empty")));
        }
        return Ok(fixed);
    }
    if validation && !validate_name(&value) {
        return Err(Violation::Value(format!(
            "{field} {value:?} is not a valid XML name"
        )));
    }
    Ok(value)
}

/// Free text that must consist of legal XML characters.
pub(crate) fn chars(field: &str, value: String, validation: bool, replace: bool) -> RuleResult {
    if replace {
        if validate_char(&value) {
            return Ok(value);
        }
        debug!(field, "replaced illegal characters");
        return Ok(fix_char(&value));
    }
    if validation && !validate_char(&value) {
        return Err(Violation::Value(format!(
            "{field} {value:?} contains characters not allowed in XML"
        )));
    }
    Ok(value)
}

/// CDATA section content: legal characters, and no `]]>` terminator.
pub(crate) fn cdata(value: String, validation: bool, replace: bool) -> RuleResult {
    let value = chars("CDATA content", value, validation, replace)?;
    if value.contains("]]>") {
        if replace {
            debug!("replaced CDATA terminator");
            return Ok(value.replace("]]>", "\u{FFFD}\u{FFFD}\u{FFFD}"));
        }
        if validation {
            return Err(Violation::Value(format!(
                "CDATA content {value:?} must not contain \"]]>\""
            )));
        }
    }
    Ok(value)
}

/// Comment content: legal characters, no `--`, and no trailing `-`.
pub(crate) fn comment(value: String, validation: bool, replace: bool) -> RuleResult {
    let mut value = chars("comment content", value, validation, replace)?;
    if replace {
        if value.contains("--") {
            value = value.replace("--", "\u{FFFD}\u{FFFD}");
        }
        if value.ends_with('-') {
            value.pop();
            value.push(REPLACEMENT_CHAR);
        }
        return Ok(value);
    }
    if validation {
        if value.contains("--") {
            return Err(Violation::Value(format!(
                "comment content {value:?} must not contain \"--\""
            )));
        }
        if value.ends_with('-') {
            return Err(Violation::Value(format!(
                "comment content {value:?} must not end with \"-\""
            )));
        }
    }
    Ok(value)
}

/// The character of a character reference: exactly one legal character.
pub(crate) fn char_ref(value: String, validation: bool) -> RuleResult {
    if validation && !validate_single_char(&value) {
        return Err(Violation::Value(format!(
            "character reference {value:?} must be exactly one legal XML character"
        )));
    }
    Ok(value)
}

/// A processing instruction target: a name other than `xml`.
pub(crate) fn proc_inst_target(value: String, validation: bool) -> RuleResult {
    let value = name("processing instruction target", value, validation, false)?;
    if validation && value == "xml" {
        return Err(Violation::Value(
            "processing instruction target must not be \"xml\"".to_string(),
        ));
    }
    Ok(value)
}

/// Processing instruction content: legal characters, and no `?>`.
pub(crate) fn proc_inst_content(value: String, validation: bool) -> RuleResult {
    let value = chars("processing instruction content", value, validation, false)?;
    if validation && value.contains("?>") {
        return Err(Violation::Value(format!(
            "processing instruction content {value:?} must not contain \"?>\""
        )));
    }
    Ok(value)
}

/// The declaration version: `1.` followed by one or more digits.
pub(crate) fn version(value: String, validation: bool) -> RuleResult {
    let well_formed = value
        .strip_prefix("1.")
        .is_some_and(|minor| !minor.is_empty() && minor.bytes().all(|b| b.is_ascii_digit()));
    if validation && !well_formed {
        return Err(Violation::Value(format!(
            "version {value:?} must match the pattern 1.[0-9]+"
        )));
    }
    Ok(value)
}

/// The declaration encoding name: `[A-Za-z][A-Za-z0-9._-]*`.
pub(crate) fn encoding(value: String, validation: bool) -> RuleResult {
    let mut bytes = value.bytes();
    let well_formed = bytes.next().is_some_and(|b| b.is_ascii_alphabetic())
        && bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'));
    if validation && !well_formed {
        return Err(Violation::Value(format!(
            "encoding {value:?} must match the pattern [A-Za-z][A-Za-z0-9._-]*"
        )));
    }
    Ok(value)
}

/// The declaration standalone flag: `yes` or `no`.
pub(crate) fn standalone(value: String, validation: bool) -> RuleResult {
    if validation && value != "yes" && value != "no" {
        return Err(Violation::Value(format!(
            "standalone value {value:?} must be \"yes\" or \"no\""
        )));
    }
    Ok(value)
}

/// A doctype system identifier.
///
/// A value holding both quote characters cannot be quoted at all, so it is
/// rejected in every mode.
pub(crate) fn sys_id(value: String, validation: bool) -> RuleResult {
    let value = chars("system identifier", value, validation, false)?;
    reject_both_quotes("system identifier", &value)?;
    Ok(value)
}

/// A doctype public identifier. See [`sys_id`] for the quoting rule.
pub(crate) fn pub_id(value: String, validation: bool) -> RuleResult {
    if validation && !validate_pub_id(&value) {
        return Err(Violation::Value(format!(
            "public identifier {value:?} contains characters not allowed in a public identifier"
        )));
    }
    reject_both_quotes("public identifier", &value)?;
    Ok(value)
}

fn reject_both_quotes(field: &str, value: &str) -> RuleResult<()> {
    if value.contains('\'') && value.contains('"') {
        return Err(Violation::Value(format!(
            "{field} {value:?} must not contain both single and double quotes"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ok(result: RuleResult) -> String {
        result.unwrap_or_else(|v| panic!("unexpected violation: {v:?}"))
    }

    #[test]
    fn test_name_strict_rejects() {
        assert!(name("element name", "1a".into(), true, false).is_err());
        assert!(name("element name", String::new(), true, false).is_err());
        assert_eq!(ok(name("element name", "a1".into(), true, false)), "a1");
    }

    #[test]
    fn test_name_permissive_accepts_as_is() {
        assert_eq!(ok(name("element name", "1 a".into(), false, false)), "1 a");
    }

    #[test]
    fn test_name_replace() {
        assert_eq!(ok(name("element name", "1 a".into(), true, true)), "\u{FFFD}\u{FFFD}a");
        assert!(name("element name", String::new(), true, true).is_err());
        assert_eq!(ok(name("element name", String::new(), false, true)), "");
    }

    #[test]
    fn test_cdata_terminator() {
        assert!(cdata("a]]>b".into(), true, false).is_err());
        assert_eq!(ok(cdata("a]]>b".into(), false, false)), "a]]>b");
        assert_eq!(
            ok(cdata("a]]>b\u{1}".into(), true, true)),
            "a\u{FFFD}\u{FFFD}\u{FFFD}b\u{FFFD}"
        );
    }

    #[test]
    fn test_comment_rules() {
        assert!(comment("a--b".into(), true, false).is_err());
        assert!(comment("ab-".into(), true, false).is_err());
        assert_eq!(ok(comment("a-b".into(), true, false)), "a-b");
        assert_eq!(ok(comment("a--b-".into(), false, false)), "a--b-");
    }

    #[test]
    fn test_comment_replace() {
        assert_eq!(ok(comment("a--b".into(), true, true)), "a\u{FFFD}\u{FFFD}b");
        assert_eq!(ok(comment("ab-".into(), true, true)), "ab\u{FFFD}");
        assert_eq!(
            ok(comment("a---".into(), true, true)),
            "a\u{FFFD}\u{FFFD}\u{FFFD}"
        );
    }

    #[test]
    fn test_char_ref() {
        assert!(char_ref("ab".into(), true).is_err());
        assert!(char_ref(String::new(), true).is_err());
        assert_eq!(ok(char_ref("\u{1F600}".into(), true)), "\u{1F600}");
        assert_eq!(ok(char_ref("ab".into(), false)), "ab");
    }

    #[test]
    fn test_proc_inst() {
        assert!(proc_inst_target("xml".into(), true).is_err());
        assert_eq!(ok(proc_inst_target("xml-stylesheet".into(), true)), "xml-stylesheet");
        assert!(proc_inst_content("a?>b".into(), true).is_err());
        assert_eq!(ok(proc_inst_content("a?>b".into(), false)), "a?>b");
    }

    #[test]
    fn test_decl_values() {
        assert_eq!(ok(version("1.0".into(), true)), "1.0");
        assert_eq!(ok(version("1.10".into(), true)), "1.10");
        assert!(version("2.0".into(), true).is_err());
        assert!(version("1.".into(), true).is_err());
        assert!(version("1.x".into(), true).is_err());
        assert_eq!(ok(encoding("UTF-8".into(), true)), "UTF-8");
        assert_eq!(ok(encoding("iso_8859.1".into(), true)), "iso_8859.1");
        assert!(encoding("8bit".into(), true).is_err());
        assert!(encoding(String::new(), true).is_err());
        assert!(standalone("maybe".into(), true).is_err());
        assert_eq!(ok(standalone("no".into(), true)), "no");
    }

    #[test]
    fn test_identifiers_with_both_quotes_always_rejected() {
        assert!(sys_id("a'b\"c".into(), true).is_err());
        assert!(sys_id("a'b\"c".into(), false).is_err());
        assert!(pub_id("a'b\"c".into(), false).is_err());
        assert_eq!(ok(sys_id("it's".into(), true)), "it's");
    }

    #[test]
    fn test_pub_id_chars() {
        assert!(pub_id("tab\there".into(), true).is_err());
        assert_eq!(ok(pub_id("tab\there".into(), false)), "tab\there");
    }
}
