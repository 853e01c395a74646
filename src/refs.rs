//! Reference collection (per file) and resolution (once per run).
//!
//! Collection only records `ReferenceUse`s; nothing is resolved until
//! every file has been indexed, so a reference may point at a definition
//! in a file scanned later.

use crate::models::index::{DefIndex, DefType, ReferenceUse};
use crate::models::{Category, Issue};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

struct RefPattern {
    re: Regex,
    def_types: &'static [DefType],
}

/// Identifier prefixes and the definition types they imply.
const PREFIXES: &[(&str, &[DefType])] = &[
    ("i_", &[DefType::ItemDef]),
    ("c_", &[DefType::CharDef]),
    ("spawn_", &[DefType::Spawn]),
    ("t_", &[DefType::TypeDef]),
    ("s_", &[DefType::Spell]),
    ("r_", &[DefType::RegionType, DefType::AreaDef]),
    ("e_", &[DefType::Events]),
    ("m_", &[DefType::Menu]),
    ("d_", &[DefType::Dialog]),
    ("f_", &[DefType::Function]),
];

static PATTERNS: Lazy<Vec<RefPattern>> = Lazy::new(|| {
    PREFIXES
        .iter()
        .map(|(prefix, def_types)| RefPattern {
            re: Regex::new(&format!(r"(?i)\b{}[a-z0-9_]+\b", prefix)).unwrap(),
            def_types,
        })
        .collect()
});

/// Candidate types for template `ITEM=` values.
pub const ITEM_OR_TEMPLATE: &[DefType] = &[DefType::ItemDef, DefType::Template];
/// Candidate types for template `CONTAINER=` values.
pub const ITEM_ONLY: &[DefType] = &[DefType::ItemDef];

/// Record every prefix-convention identifier on `line`.
///
/// A match directly followed by `<` is a fragment of a name assembled at
/// runtime (`<DEF.F_MULTIS_<SRC.LANG>>`) and is skipped.
pub fn collect_references(line: &str, file: &str, line_no: usize, out: &mut Vec<ReferenceUse>) {
    for pattern in PATTERNS.iter() {
        for m in pattern.re.find_iter(line) {
            if line[m.end()..].starts_with('<') {
                continue;
            }
            out.push(ReferenceUse {
                file: file.to_string(),
                line: line_no,
                def_types: pattern.def_types,
                id: m.as_str().to_ascii_uppercase(),
            });
        }
    }
}

/// Resolve every pending reference against the finished index.
///
/// Unresolved uses are reported once per (file, line, id, type label).
pub fn resolve_references(references: &[ReferenceUse], index: &DefIndex) -> Vec<Issue> {
    let mut seen: HashSet<(String, usize, String, String)> = HashSet::new();
    let mut issues = Vec::new();
    for r in references {
        if index.resolves(r) {
            continue;
        }
        let label = r.type_label();
        if !seen.insert((r.file.clone(), r.line, r.id.clone(), label.clone())) {
            continue;
        }
        issues.push(Issue::new(
            &r.file,
            r.line,
            Category::Undeclared,
            format!("UNDECLARED: '{}' not defined as {} or DEFNAME.", r.id, label),
        ));
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::index::{DefKey, Location};

    fn collect(line: &str) -> Vec<ReferenceUse> {
        let mut out = Vec::new();
        collect_references(line, "a.scp", 3, &mut out);
        out
    }

    #[test]
    fn test_collect_prefixes_case_insensitive() {
        let refs = collect("SERV.NEWITEM I_Gold, c_Guard r_town");
        let ids: Vec<_> = refs.iter().map(|r| (r.id.as_str(), r.type_label())).collect();
        assert!(ids.contains(&("I_GOLD", "ITEMDEF".to_string())));
        assert!(ids.contains(&("C_GUARD", "CHARDEF".to_string())));
        assert!(ids.contains(&("R_TOWN", "REGIONTYPE/AREADEF".to_string())));
    }

    #[test]
    fn test_collect_requires_word_boundary() {
        assert!(collect("xi_gold abc_def").is_empty());
        let refs = collect("SRC.FINDID.i_rune");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].id, "I_RUNE");
    }

    #[test]
    fn test_collect_skips_dynamic_fragments() {
        assert!(collect("SERV.LOG <DEF.F_MULTIS_<SRC.CTAG0.ACCOUNTLANG>_MULTI_CENTER>").is_empty());
    }

    #[test]
    fn test_resolve_dedupes_same_line() {
        let mut refs = collect("i_missing i_missing");
        refs.extend(collect("i_missing"));
        let issues = resolve_references(&refs, &DefIndex::new());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, Category::Undeclared);
        assert_eq!(
            issues[0].message,
            "UNDECLARED: 'I_MISSING' not defined as ITEMDEF or DEFNAME."
        );
    }

    #[test]
    fn test_resolve_against_later_definitions() {
        let refs = collect("EVENTS=+e_guard");
        let mut ix = DefIndex::new();
        assert_eq!(resolve_references(&refs, &ix).len(), 1);
        ix.ensure_definition(DefKey::new(DefType::Events, "e_guard"), Location::new("z.scp", 1));
        assert!(resolve_references(&refs, &ix).is_empty());
    }
}
