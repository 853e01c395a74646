//! Output rendering for lint results.
//!
//! Supports `human` (default), `json`, and `github` workflow annotations.
//! Every mode ends with the same three summary counters except `json`,
//! which carries them in a top-level `summary` object.

use crate::config::OutputMode;
use crate::models::{Category, Issue, LintResult};
use owo_colors::OwoColorize;
use serde_json::Value as JsonVal;

fn use_colors(mode: OutputMode) -> bool {
    mode == OutputMode::Human && std::env::var_os("NO_COLOR").is_none()
}

/// Print lint results in the requested format.
pub fn print_lint(res: &LintResult, mode: OutputMode) {
    match mode {
        OutputMode::Json => match serde_json::to_string_pretty(&compose_lint_json(res)) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
        },
        OutputMode::Github => {
            for is in &res.issues {
                println!("{}", github_annotation(is));
            }
            print_summary(res, false);
        }
        OutputMode::Human => {
            let color = use_colors(mode);
            for is in &res.issues {
                println!("{}", human_line(is, color));
            }
            print_summary(res, color);
        }
    }
}

fn human_line(is: &Issue, color: bool) -> String {
    let loc = format!("{}:{}", is.file, is.line);
    if !color {
        return format!("ERROR {}: {}", loc, is.message);
    }
    let tag = format!("⟦{}⟧", is.kind);
    let tag = match is.kind {
        Category::Critical | Category::Block => tag.red().bold().to_string(),
        Category::Syntax | Category::Logic | Category::Typo => tag.yellow().bold().to_string(),
        Category::Duplicate | Category::Undeclared => tag.blue().bold().to_string(),
    };
    format!("{} {} {}: {}", "✖".red(), tag, loc.bold(), is.message)
}

fn print_summary(res: &LintResult, color: bool) {
    let lines = [
        "---------------------------------------------".to_string(),
        format!("Files scanned: {}", res.summary.files),
        format!("Files with errors: {}", res.summary.files_with_issues),
        format!("Total errors: {}", res.summary.issues),
    ];
    for line in lines {
        if color {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
}

/// One `::error` workflow command per issue.
pub fn github_annotation(is: &Issue) -> String {
    let msg = format!("{}:{}: {}", is.file, is.line, is.message);
    format!(
        "::error file={},line={}::{}",
        is.file,
        is.line,
        escape_annotation(&msg)
    )
}

fn escape_annotation(msg: &str) -> String {
    msg.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Compose lint JSON object (pure) for testing/snapshot purposes.
pub fn compose_lint_json(res: &LintResult) -> JsonVal {
    serde_json::to_value(res).unwrap_or(JsonVal::Null)
}
