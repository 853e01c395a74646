//! Lint runner: per-file structural scan and corpus-wide resolution.
//!
//! Each file is fed line by line through normalization and section
//! classification, then to the block, bracket, definition and reference
//! passes. The shared `DefIndex` and pending reference list accumulate
//! across files; `resolve_references` runs once after the last scan.

use crate::blocks::{statement_issues, BlockStack};
use crate::brackets::check_brackets;
use crate::defs::{
    register_alias_table_line, register_defname_line, register_header, register_naming,
};
use crate::line::{
    clean_line, first_token, has_arguments, has_prefix_fold, is_text_keyword, is_write_file,
    keyword,
};
use crate::models::index::{DefIndex, ReferenceUse};
use crate::models::{Category, Issue, LintResult};
use crate::refs::{collect_references, resolve_references};
use crate::sections::{classify, is_alias_table, is_defname_table, is_free_text, LineClass};
use crate::template::check_template_line;
use crate::utils::{has_extension, ignore_patterns, is_ignored_dir, relative_label};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const EOF_MARKER: &str = "[EOF]";
const TEMPLATE_SECTION: &str = "TEMPLATE";

/// Inputs for a whole-corpus run.
#[derive(Debug, Clone)]
pub struct LintOptions {
    pub scripts_dir: PathBuf,
    pub extensions: Vec<String>,
    pub ignore: Vec<String>,
}

/// Scan every script under `opts.scripts_dir`, then resolve references.
///
/// Files are read in parallel but scanned sequentially in sorted path
/// order, so duplicate attribution is stable across runs.
pub fn run_lint(opts: &LintOptions) -> LintResult {
    let root = opts.scripts_dir.as_path();
    let (targets, mut issues) = collect_targets(root, &opts.extensions, &opts.ignore);

    let loaded: Vec<(String, io::Result<Vec<u8>>)> = targets
        .par_iter()
        .map(|path| (relative_label(root, path), fs::read(path)))
        .collect();

    let mut index = DefIndex::new();
    let mut references: Vec<ReferenceUse> = Vec::new();
    for (label, data) in loaded {
        let found = match data {
            Ok(bytes) => lint_source(
                &label,
                &String::from_utf8_lossy(&bytes),
                &mut index,
                &mut references,
            ),
            Err(e) => vec![read_failure(&label, &e)],
        };
        debug!(file = %label, issues = found.len(), "scanned");
        issues.extend(found);
    }

    info!(pending = references.len(), "resolving references");
    issues.extend(resolve_references(&references, &index));
    LintResult::from_issues(issues, targets.len())
}

/// Read and scan one file. An unreadable file yields a single CRITICAL
/// issue and leaves the shared tables untouched.
pub fn lint_file(
    path: &Path,
    label: &str,
    index: &mut DefIndex,
    references: &mut Vec<ReferenceUse>,
) -> Vec<Issue> {
    match fs::read(path) {
        Ok(bytes) => lint_source(label, &String::from_utf8_lossy(&bytes), index, references),
        Err(e) => vec![read_failure(label, &e)],
    }
}

/// Scan one file's text against the shared index and reference list.
pub fn lint_source(
    file: &str,
    source: &str,
    index: &mut DefIndex,
    references: &mut Vec<ReferenceUse>,
) -> Vec<Issue> {
    let mut scan = FileScan {
        file,
        index,
        references,
        issues: Vec::new(),
        stack: BlockStack::new(),
        free_text: false,
        section: None,
    };
    let mut line_no = 0usize;
    let mut last_non_blank = "";
    for raw in source.lines() {
        line_no += 1;
        let cleaned = clean_line(raw);
        if cleaned.is_empty() {
            continue;
        }
        last_non_blank = cleaned;
        scan.line(raw, cleaned, line_no);
    }
    scan.finish(line_no, last_non_blank)
}

fn read_failure(label: &str, err: &io::Error) -> Issue {
    Issue::new(
        label,
        1,
        Category::Critical,
        format!("CRITICAL: unable to read file: {}", err),
    )
}

struct FileScan<'a> {
    file: &'a str,
    index: &'a mut DefIndex,
    references: &'a mut Vec<ReferenceUse>,
    issues: Vec<Issue>,
    stack: BlockStack,
    free_text: bool,
    section: Option<String>,
}

impl FileScan<'_> {
    fn push(&mut self, line: usize, kind: Category, message: impl Into<String>) {
        self.issues.push(Issue::new(self.file, line, kind, message));
    }

    fn line(&mut self, raw: &str, line: &str, n: usize) {
        // Inside prose, only a header or trigger at column zero ends the block.
        let indented = raw.starts_with(char::is_whitespace);
        if !(self.free_text && indented) {
            match classify(line) {
                LineClass::CommentHeader => {
                    self.close_frames("before new section");
                    self.free_text = true;
                    self.section = Some("COMMENT".to_string());
                    return;
                }
                LineClass::Header { kind, args } => {
                    self.close_frames("before new section");
                    self.free_text = is_free_text(&kind);
                    if let Some(dup) = register_header(&kind, args, self.file, n, self.index) {
                        self.issues.push(dup);
                    }
                    self.section = Some(kind);
                    return;
                }
                LineClass::Trigger => {
                    self.close_frames("before new trigger");
                    self.free_text = false;
                    self.section = None;
                    return;
                }
                LineClass::Body => {}
            }
        }
        if !self.free_text {
            self.body(line, n);
        }
    }

    fn body(&mut self, line: &str, n: usize) {
        let section = self.section.clone();
        let section = section.as_deref();
        let alias_table = section.is_some_and(is_alias_table);
        if section.is_some_and(is_defname_table) {
            register_defname_line(line, self.file, n, self.index);
        } else if alias_table {
            register_alias_table_line(line, self.file, n, self.index);
        }
        register_naming(line, section, self.file, n, self.index);

        let token = first_token(line);
        let word = keyword(line);
        let text_line = is_text_keyword(token);
        let write_file = is_write_file(line);
        let flow = matches!(word.as_str(), "IF" | "ELIF" | "ELSEIF" | "WHILE");
        let assignment = line.contains('=') && !flow;

        if !text_line && !write_file {
            if let Err(e) = check_brackets(line) {
                self.push(n, Category::Syntax, format!("SYNTAX: brackets -> {}", e));
            }
        }
        if !text_line && !assignment {
            self.statement(line, &word, n);
        }
        if text_line || write_file || alias_table {
            return;
        }
        if section == Some(TEMPLATE_SECTION)
            && check_template_line(line, self.file, n, &mut self.issues, self.references)
        {
            return;
        }
        collect_references(line, self.file, n, self.references);
    }

    fn statement(&mut self, line: &str, word: &str, n: usize) {
        if word.is_empty() {
            return;
        }
        for (kind, msg) in statement_issues(word, has_arguments(line, word.len())) {
            self.push(n, kind, msg);
        }
        if has_prefix_fold(line, EOF_MARKER) && !line.eq_ignore_ascii_case(EOF_MARKER) {
            self.push(n, Category::Critical, "CRITICAL: text found after [EOF].");
        }
        if let Err(e) = self.stack.apply(word, n) {
            self.push(n, Category::Block, format!("BLOCK: {}", e));
        }
    }

    /// Report residual frames at their own opening lines.
    fn close_frames(&mut self, context: &str) {
        for frame in self.stack.drain() {
            self.push(
                frame.line,
                Category::Block,
                format!("BLOCK: unclosed '{}' block {}.", frame.keyword, context),
            );
        }
    }

    fn finish(mut self, line_no: usize, last_non_blank: &str) -> Vec<Issue> {
        if !last_non_blank.eq_ignore_ascii_case(EOF_MARKER) {
            self.push(
                line_no.max(1),
                Category::Critical,
                "CRITICAL: missing [EOF] at end of file.",
            );
        }
        for frame in self.stack.drain() {
            self.push(
                frame.line,
                Category::Block,
                format!("BLOCK: unclosed '{}' block.", frame.keyword),
            );
        }
        self.issues
    }
}

/// Script files under `root`, sorted. Ignored directories are pruned
/// before descent. Traversal failures are reported as CRITICAL issues.
fn collect_targets(
    root: &Path,
    extensions: &[String],
    ignore: &[String],
) -> (Vec<PathBuf>, Vec<Issue>) {
    let mut targets: Vec<PathBuf> = Vec::new();
    let mut issues: Vec<Issue> = Vec::new();
    let patterns = ignore_patterns(ignore);

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(move |e| {
            let is_dir = e.file_type().is_some_and(|t| t.is_dir());
            !(is_dir && e.depth() > 0 && is_ignored_dir(&e.file_name().to_string_lossy(), &patterns))
        });
    for entry in builder.build() {
        match entry {
            Ok(e) => {
                let p = e.path();
                if e.file_type().is_some_and(|t| t.is_file()) && has_extension(p, extensions) {
                    targets.push(p.to_path_buf());
                }
            }
            Err(e) => {
                issues.push(Issue::new(
                    &root.to_string_lossy(),
                    1,
                    Category::Critical,
                    format!("CRITICAL: {}", e),
                ));
            }
        }
    }
    targets.sort();
    debug!(found = targets.len(), "collected script files");
    (targets, issues)
}
