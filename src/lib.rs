//! scplint core library.
//!
//! Static analysis for Sphere `.scp` script trees: structural defects
//! (unbalanced blocks and brackets, missing `[EOF]`), duplicate global
//! definitions, malformed template selectors, and references to ids that
//! nothing in the corpus declares.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `lint`: Per-file scan and whole-corpus run.
//! - `line`: Comment stripping and first-token helpers.
//! - `sections`: Header, free-text and trigger classification.
//! - `blocks`: Control-block stack and statement checks.
//! - `brackets`: Bracket and angle-expression balance.
//! - `defs`: Definition index builder.
//! - `refs`: Reference collection and resolution.
//! - `template`: `[TEMPLATE]` directive checks.
//! - `models`: Issue, summary and index data models.
//! - `output`: Human/JSON/GitHub printers.
//! - `utils`: Supporting helpers.
pub mod blocks;
pub mod brackets;
pub mod cli;
pub mod config;
pub mod defs;
pub mod line;
pub mod lint;
pub mod models;
pub mod output;
pub mod refs;
pub mod sections;
pub mod template;
pub mod utils;
