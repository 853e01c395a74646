//! `ITEM=` / `CONTAINER=` directives inside `[TEMPLATE]` sections.
//!
//! Values are lists of identifiers mixed with selectors: plain numbers
//! (counts and weights), `R<n>` variant selectors, and `{min max}` range
//! selectors. Identifiers become pending references; malformed selectors
//! are reported immediately.

use crate::line::is_numeric_token;
use crate::models::index::{DefType, ReferenceUse};
use crate::models::{Category, Issue};
use crate::refs::{ITEM_ONLY, ITEM_OR_TEMPLATE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Item,
    Container,
}

impl Directive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Directive::Item => "ITEM",
            Directive::Container => "CONTAINER",
        }
    }

    pub fn def_types(&self) -> &'static [DefType] {
        match self {
            Directive::Item => ITEM_OR_TEMPLATE,
            Directive::Container => ITEM_ONLY,
        }
    }
}

/// Split `ITEM=value` / `CONTAINER=value` into the directive and its
/// trimmed value.
pub fn parse_directive(line: &str) -> Option<(Directive, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let directive = if key.eq_ignore_ascii_case("ITEM") {
        Directive::Item
    } else if key.eq_ignore_ascii_case("CONTAINER") {
        Directive::Container
    } else {
        return None;
    };
    Some((directive, value.trim()))
}

/// Validate one template line and queue its references. Returns false when
/// the line is not a template directive.
pub fn check_template_line(
    line: &str,
    file: &str,
    line_no: usize,
    issues: &mut Vec<Issue>,
    refs: &mut Vec<ReferenceUse>,
) -> bool {
    let Some((directive, value)) = parse_directive(line) else {
        return false;
    };
    if value.is_empty() {
        issues.push(Issue::new(
            file,
            line_no,
            Category::Logic,
            format!("LOGIC: {} missing value.", directive.as_str()),
        ));
        return true;
    }

    for group in brace_groups(value) {
        if let Some(msg) = range_selector_error(group) {
            issues.push(Issue::new(file, line_no, Category::Syntax, msg));
        }
    }

    for token in value
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '{' | '}'))
        .filter(|t| !t.is_empty())
    {
        if is_numeric_token(token) {
            continue;
        }
        if let Some(valid) = variant_selector(token) {
            if !valid {
                issues.push(Issue::new(
                    file,
                    line_no,
                    Category::Syntax,
                    format!(
                        "SYNTAX: template R selector '{}' (expected R<number>).",
                        token
                    ),
                ));
            }
            continue;
        }
        if !token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            continue;
        }
        refs.push(ReferenceUse {
            file: file.to_string(),
            line: line_no,
            def_types: directive.def_types(),
            id: token.to_ascii_uppercase(),
        });
    }
    true
}

/// Inner text of every balanced `{...}` group, innermost first.
/// Unbalanced braces are left to the bracket validator.
fn brace_groups(value: &str) -> Vec<&str> {
    let mut opens = Vec::new();
    let mut groups = Vec::new();
    for (i, c) in value.char_indices() {
        match c {
            '{' => opens.push(i),
            '}' => {
                if let Some(start) = opens.pop() {
                    groups.push(&value[start + 1..i]);
                }
            }
            _ => {}
        }
    }
    groups
}

/// A group of only numbers is a range selector and must read `{min max}`.
/// Groups holding identifiers are weighted picks and are not checked here.
fn range_selector_error(inner: &str) -> Option<String> {
    let tokens: Vec<&str> = inner.split_whitespace().collect();
    if tokens.is_empty() || !tokens.iter().all(|t| is_numeric_token(t)) {
        return None;
    }
    let padded = inner.starts_with(char::is_whitespace) || inner.ends_with(char::is_whitespace);
    if tokens.len() == 2 && !padded {
        return None;
    }
    Some(format!(
        "SYNTAX: template range selector '{{{}}}' (expected {{min max}}).",
        inner
    ))
}

/// `R` followed by a digit marks a variant selector: `Some(true)` when the
/// remainder is all digits, `Some(false)` when it is malformed (`R1A`).
fn variant_selector(token: &str) -> Option<bool> {
    let rest = token.strip_prefix('R').or_else(|| token.strip_prefix('r'))?;
    if !rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some(rest.chars().all(|c| c.is_ascii_digit()))
}
