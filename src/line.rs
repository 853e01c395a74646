//! Line normalization and first-token helpers.

/// Words whose payload is display text rather than script.
const TEXT_KEYWORDS: &[&str] = &[
    "SAY",
    "SYSMESSAGE",
    "MESSAGE",
    "EMOTE",
    "SAYU",
    "SAYUA",
    "TITLE",
    "NAME",
    "DESC",
    "PROMPTCONSOLE",
    "BARK",
    "GROUP",
    "EVENTS",
    "FLAGS",
    "RECT",
    "P",
    "AUTHOR",
    "PAGES",
];

const WRITEFILE_PREFIX: &str = "SERV.WRITEFILE ";

/// Strip everything from the first `//` and trim surrounding whitespace.
pub fn clean_line(raw: &str) -> &str {
    let line = match raw.find("//") {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    line.trim()
}

/// First whitespace-delimited token, or `""` for a blank line.
pub fn first_token(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

/// Statement keyword of a cleaned line: the first token cut at `(`,
/// uppercased, so `IF(<x>)` and `IF (<x>)` read the same.
pub fn keyword(line: &str) -> String {
    let token = first_token(line);
    let end = token.find('(').unwrap_or(token.len());
    token[..end].to_ascii_uppercase()
}

/// Whether anything follows the statement keyword.
pub fn has_arguments(line: &str, keyword_len: usize) -> bool {
    line.get(keyword_len..)
        .map(|rest| !rest.trim().is_empty())
        .unwrap_or(false)
}

/// ASCII case-insensitive prefix test.
pub fn has_prefix_fold(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

pub fn is_write_file(line: &str) -> bool {
    has_prefix_fold(line, WRITEFILE_PREFIX)
}

/// Text keywords match on the last dotted segment, so `SRC.SYSMESSAGE`
/// counts like `SYSMESSAGE`.
pub fn is_text_keyword(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let word = match token.rfind('.') {
        Some(dot) if dot + 1 < token.len() => &token[dot + 1..],
        _ => token,
    };
    TEXT_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

/// Numeric literal as used for counts and ranges: optional sign, a leading
/// digit, then alphanumerics (hex ids such as `0a1f`).
pub fn is_numeric_token(token: &str) -> bool {
    let body = token.strip_prefix('-').unwrap_or(token);
    let mut chars = body.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_line_strips_comment_and_whitespace() {
        assert_eq!(clean_line("  IF 1 // check"), "IF 1");
        assert_eq!(clean_line("// only comment"), "");
        assert_eq!(clean_line("\t\t"), "");
    }

    #[test]
    fn test_keyword_cuts_at_paren() {
        assert_eq!(keyword("if(<src.npc>)"), "IF");
        assert_eq!(keyword("ENDIF"), "ENDIF");
        assert_eq!(keyword(""), "");
        assert!(!has_arguments("WHILE", 5));
        assert!(has_arguments("WHILE(<x>)", 5));
    }

    #[test]
    fn test_text_keyword_uses_last_segment() {
        assert!(is_text_keyword("SRC.SYSMESSAGE"));
        assert!(is_text_keyword("say"));
        assert!(!is_text_keyword("NAME=Bob"));
        assert!(!is_text_keyword("SRC."));
    }

    #[test]
    fn test_write_file_prefix_fold() {
        assert!(is_write_file("serv.writefile log.txt <x"));
        assert!(!is_write_file("SERV.WRITEFILEX"));
    }

    #[test]
    fn test_numeric_tokens() {
        assert!(is_numeric_token("3"));
        assert!(is_numeric_token("-10"));
        assert!(is_numeric_token("0a1f"));
        assert!(!is_numeric_token("i_gold"));
        assert!(!is_numeric_token("-"));
    }
}
