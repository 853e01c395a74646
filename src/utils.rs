//! Supporting helpers: stderr prefixes, path labels and ignore filters.

use owo_colors::OwoColorize;
use std::path::Path;

fn stderr_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if stderr_colors() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if stderr_colors() {
        "note:".yellow().bold().to_string()
    } else {
        "note:".to_string()
    }
}

pub fn info_prefix() -> String {
    if stderr_colors() {
        "info:".blue().bold().to_string()
    } else {
        "info:".to_string()
    }
}

/// Path of `path` relative to `root`, with forward slashes. Falls back to
/// the path as given when no relative form exists.
pub fn relative_label(root: &Path, path: &Path) -> String {
    match pathdiff::diff_paths(path, root) {
        Some(rel) if !rel.as_os_str().is_empty() && rel != Path::new(".") => {
            rel.to_string_lossy().replace('\\', "/")
        }
        _ => path.to_string_lossy().to_string(),
    }
}

/// Whether `path` ends with one of `extensions` (case-insensitive).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let lower = path.to_string_lossy().to_ascii_lowercase();
    extensions
        .iter()
        .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()))
}

/// Compile directory ignore entries. Each entry is a glob over a single
/// directory name (`backup*`); entries that fail to parse match literally.
pub fn ignore_patterns(ignore: &[String]) -> Vec<glob::Pattern> {
    ignore
        .iter()
        .filter_map(|ig| {
            glob::Pattern::new(ig)
                .or_else(|_| glob::Pattern::new(&glob::Pattern::escape(ig)))
                .ok()
        })
        .collect()
}

/// Whether a directory named `name` is excluded from traversal.
pub fn is_ignored_dir(name: &str, patterns: &[glob::Pattern]) -> bool {
    patterns.iter().any(|p| p.matches(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_relative_label_uses_forward_slashes() {
        let root = PathBuf::from("/srv/scripts");
        let p = root.join("items").join("weapons.scp");
        assert_eq!(relative_label(&root, &p), "items/weapons.scp");
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let exts = vec![".scp".to_string()];
        assert!(has_extension(Path::new("a/B.SCP"), &exts));
        assert!(!has_extension(Path::new("a/b.scp.bak"), &exts));
    }

    #[test]
    fn test_ignore_entries_match_whole_directory_names() {
        let pats = ignore_patterns(&["backup".to_string(), ".git".to_string(), "old_*".to_string()]);
        assert!(is_ignored_dir("backup", &pats));
        assert!(is_ignored_dir(".git", &pats));
        assert!(is_ignored_dir("old_2019", &pats));
        assert!(!is_ignored_dir("backups2", &pats));
        assert!(!is_ignored_dir("items", &pats));
    }

    #[test]
    fn test_malformed_ignore_entry_matches_literally() {
        let pats = ignore_patterns(&["[bak".to_string()]);
        assert_eq!(pats.len(), 1);
        assert!(is_ignored_dir("[bak", &pats));
        assert!(!is_ignored_dir("b", &pats));
    }
}
