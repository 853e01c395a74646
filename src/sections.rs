//! Section classification: definition headers, free-text headers, and
//! trigger lines.
//!
//! Matching is structural (prefix patterns on the cleaned line), never a
//! parse of the section body.

use once_cell::sync::Lazy;
use regex::Regex;

static DEF_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[(\w+)\s+([^\]]+)\]").unwrap());
static COMMENT_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\[COMMENT(?:\s+[^\]]+)?\]").unwrap());
static TRIGGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*ON\s*=\s*@?.+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
/// What a cleaned line means for section tracking.
pub enum LineClass<'a> {
    /// `[COMMENT ...]`: unconditional free text.
    CommentHeader,
    /// `[TYPE args]` with the type uppercased.
    Header { kind: String, args: &'a str },
    /// `ON=@Event`
    Trigger,
    Body,
}

pub fn classify(line: &str) -> LineClass<'_> {
    if COMMENT_HEADER.is_match(line) {
        return LineClass::CommentHeader;
    }
    if let Some(caps) = DEF_HEADER.captures(line) {
        if let (Some(kind), Some(args)) = (caps.get(1), caps.get(2)) {
            return LineClass::Header {
                kind: kind.as_str().to_ascii_uppercase(),
                args: args.as_str().trim(),
            };
        }
    }
    if TRIGGER.is_match(line) {
        return LineClass::Trigger;
    }
    LineClass::Body
}

/// Sections whose bodies are prose.
pub fn is_free_text(kind: &str) -> bool {
    kind == "BOOK" || kind == "COMMENT"
}

/// `[DEFNAME x]`: the first word of every line is a declared name.
pub fn is_defname_table(kind: &str) -> bool {
    kind == "DEFNAME"
}

/// Compatibility alias tables: every token on every line is a declared name.
pub fn is_alias_table(kind: &str) -> bool {
    kind == "RESDEFNAME" || kind == "RES_RESDEFNAME"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_headers() {
        assert_eq!(
            classify("[itemdef i_test]"),
            LineClass::Header {
                kind: "ITEMDEF".into(),
                args: "i_test"
            }
        );
        assert_eq!(
            classify("[DIALOG d_x  BUTTON ]"),
            LineClass::Header {
                kind: "DIALOG".into(),
                args: "d_x  BUTTON"
            }
        );
        // terminal marker carries no args, so it is not a header
        assert_eq!(classify("[EOF]"), LineClass::Body);
    }

    #[test]
    fn test_classify_comment_before_header() {
        assert_eq!(classify("[COMMENT notes]"), LineClass::CommentHeader);
        assert_eq!(classify("[comment]"), LineClass::CommentHeader);
    }

    #[test]
    fn test_classify_triggers() {
        assert_eq!(classify("ON=@Create"), LineClass::Trigger);
        assert_eq!(classify("on = @DropOn Char"), LineClass::Trigger);
        assert_eq!(classify("ONCLICK=1"), LineClass::Body);
        assert_eq!(classify("ON="), LineClass::Body);
    }

    #[test]
    fn test_section_kinds() {
        assert!(is_free_text("BOOK"));
        assert!(is_alias_table("RES_RESDEFNAME"));
        assert!(!is_alias_table("DEFNAME"));
        assert!(is_defname_table("DEFNAME"));
    }
}
