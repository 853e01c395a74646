//! Shared data models for lint output and the cross-file definition index.

pub mod index;

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
/// Issue category tag. Every finding carries exactly one.
pub enum Category {
    Critical,
    Block,
    Syntax,
    Logic,
    Duplicate,
    Typo,
    Undeclared,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Critical => "CRITICAL",
            Category::Block => "BLOCK",
            Category::Syntax => "SYNTAX",
            Category::Logic => "LOGIC",
            Category::Duplicate => "DUPLICATE",
            Category::Typo => "TYPO",
            Category::Undeclared => "UNDECLARED",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single lint issue with category and location.
///
/// `message` is self-describing and starts with the category tag, e.g.
/// `BLOCK: unclosed 'IF' block.`
pub struct Issue {
    pub file: String,
    pub line: usize,
    pub kind: Category,
    pub message: String,
}

impl Issue {
    pub fn new(file: &str, line: usize, kind: Category, message: impl Into<String>) -> Self {
        Issue {
            file: file.to_string(),
            line: line.max(1),
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
/// Aggregated lint summary used by printers.
pub struct Summary {
    pub files: usize,
    pub files_with_issues: usize,
    pub issues: usize,
}

#[derive(Debug, Default, Serialize)]
/// Lint results container.
pub struct LintResult {
    pub issues: Vec<Issue>,
    pub summary: Summary,
}

impl LintResult {
    /// Build a result from collected issues, deriving the summary.
    pub fn from_issues(issues: Vec<Issue>, files: usize) -> Self {
        let touched: std::collections::HashSet<&str> =
            issues.iter().map(|is| is.file.as_str()).collect();
        let summary = Summary {
            files,
            files_with_issues: touched.len(),
            issues: issues.len(),
        };
        LintResult { issues, summary }
    }
}
