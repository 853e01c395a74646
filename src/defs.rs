//! Definition index builder: headers, naming directives, and alias tables.

use crate::line::is_numeric_token;
use crate::models::index::{DefIndex, DefKey, DefType, Location};
use crate::models::{Category, Issue};

const NAMING_KEY: &str = "DEFNAME";
const DIALOG_SUBTYPES: &[&str] = &["TEXT", "BUTTON"];

/// Record a definition header of a tracked type.
///
/// The first argument is the id. It always enters the identifier table;
/// the typed key is stored on first sight and reported as a duplicate on
/// every later sight.
pub fn register_header(
    kind: &str,
    args: &str,
    file: &str,
    line: usize,
    index: &mut DefIndex,
) -> Option<Issue> {
    let def_type = DefType::from_section(kind)?;
    let mut fields = args.split_whitespace();
    let id = fields.next()?;
    index.record_identifier(id, Location::new(file, line));

    let mut key = DefKey::new(def_type, id);
    if def_type == DefType::Dialog {
        if let Some(sub) = fields.next() {
            if DIALOG_SUBTYPES.iter().any(|s| s.eq_ignore_ascii_case(sub)) {
                key = key.with_subtype(sub);
            }
        }
    }
    let label = key.to_string();
    index
        .record_definition(key, Location::new(file, line))
        .map(|prev| {
            Issue::new(
                file,
                line,
                Category::Duplicate,
                format!("DUPLICATE: '{}' already defined at {}.", label, prev),
            )
        })
}

/// Value of a `DEFNAME=<name>` line: the first word after `=`.
pub fn naming_directive(line: &str) -> Option<&str> {
    let (key, value) = line.split_once('=')?;
    if !key.trim().eq_ignore_ascii_case(NAMING_KEY) {
        return None;
    }
    value.split_whitespace().next()
}

/// Capture a naming directive inside any section. Inside id-bearing
/// sections the name also becomes a typed definition, so the construct is
/// citable by name as well as by numeric id.
pub fn register_naming(
    line: &str,
    section: Option<&str>,
    file: &str,
    line_no: usize,
    index: &mut DefIndex,
) -> bool {
    let Some(name) = naming_directive(line) else {
        return false;
    };
    index.record_alias(name, Location::new(file, line_no));
    if let Some(def_type) = section.and_then(DefType::from_section) {
        if def_type.is_id_bearing() {
            index.ensure_definition(DefKey::new(def_type, name), Location::new(file, line_no));
        }
    }
    true
}

/// `[DEFNAME x]` body line: `name value` or `name=value`.
pub fn register_defname_line(line: &str, file: &str, line_no: usize, index: &mut DefIndex) {
    let name = line
        .split(|c: char| c.is_whitespace() || c == '=')
        .next()
        .unwrap_or("");
    if !name.is_empty() {
        index.record_alias(name, Location::new(file, line_no));
    }
}

/// Compatibility alias table line: every token is declared. Mapped values
/// are not checked against existing resources.
pub fn register_alias_table_line(line: &str, file: &str, line_no: usize, index: &mut DefIndex) {
    for token in line
        .split(|c: char| c.is_whitespace() || matches!(c, '=' | ',' | '{' | '}'))
        .filter(|t| !t.is_empty() && !is_numeric_token(t))
    {
        index.record_alias(token, Location::new(file, line_no));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_duplicate_names_first_location() {
        let mut ix = DefIndex::new();
        assert!(register_header("ITEMDEF", "i_dup", "a.scp", 1, &mut ix).is_none());
        let issue = register_header("ITEMDEF", "I_DUP extra", "b.scp", 4, &mut ix).unwrap();
        assert_eq!(issue.kind, Category::Duplicate);
        assert_eq!(issue.line, 4);
        assert_eq!(
            issue.message,
            "DUPLICATE: 'ITEMDEF I_DUP' already defined at a.scp:1."
        );
    }

    #[test]
    fn test_untracked_header_is_ignored() {
        let mut ix = DefIndex::new();
        assert!(register_header("MULTIDEF", "01431", "a", 1, &mut ix).is_none());
        assert!(register_header("MULTIDEF", "01431", "a", 2, &mut ix).is_none());
        assert!(ix.identifier("01431").is_none());
    }

    #[test]
    fn test_dialog_subtypes() {
        let mut ix = DefIndex::new();
        assert!(register_header("DIALOG", "dialog", "a", 1, &mut ix).is_none());
        assert!(register_header("DIALOG", "dialog TEXT", "a", 2, &mut ix).is_none());
        assert!(register_header("DIALOG", "dialog button", "a", 3, &mut ix).is_none());
        // unknown subtype collapses onto the base key
        assert!(register_header("DIALOG", "dialog other", "a", 4, &mut ix).is_some());
        let dup = register_header("DIALOG", "dialog TEXT", "a", 5, &mut ix).unwrap();
        assert!(dup.message.contains("'DIALOG DIALOG TEXT' already defined at a:2"));
    }

    #[test]
    fn test_naming_directive_forms() {
        assert_eq!(naming_directive("DEFNAME=i_fire_column"), Some("i_fire_column"));
        assert_eq!(naming_directive("defname = c_guard extra"), Some("c_guard"));
        assert_eq!(naming_directive("DEFNAME="), None);
        assert_eq!(naming_directive("NAME=x"), None);
    }

    #[test]
    fn test_naming_in_itemdef_registers_typed_key() {
        let mut ix = DefIndex::new();
        assert!(register_naming("DEFNAME=i_fire_column", Some("ITEMDEF"), "a", 2, &mut ix));
        assert!(ix.alias("I_FIRE_COLUMN").is_some());
        assert!(ix
            .definition(&DefKey::new(DefType::ItemDef, "i_fire_column"))
            .is_some());

        assert!(register_naming("DEFNAME=m_house", Some("MULTIDEF"), "a", 5, &mut ix));
        assert!(ix.alias("m_house").is_some());
        assert!(ix.definition(&DefKey::new(DefType::Menu, "m_house")).is_none());
    }

    #[test]
    fn test_alias_tables() {
        let mut ix = DefIndex::new();
        register_defname_line("random_candy { i_a 1 }", "a", 2, &mut ix);
        assert!(ix.alias("RANDOM_CANDY").is_some());
        assert!(ix.alias("i_a").is_none());

        register_alias_table_line("i_dragon_egg_lamp_s i_lamp_dragon_s", "a", 3, &mut ix);
        assert!(ix.alias("i_dragon_egg_lamp_s").is_some());
        assert!(ix.alias("i_lamp_dragon_s").is_some());
    }
}
