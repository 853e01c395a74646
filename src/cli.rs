//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "scplint",
    version,
    about = "Static checks for Sphere .scp script trees",
    long_about = "Scan a tree of .scp scripts for block, bracket and [EOF] defects, duplicate definitions, and references to undeclared ids.\n\nConfiguration precedence: CLI > scplint.toml > defaults.",
    after_help = "Examples:\n  scplint lint\n  scplint lint --scripts-dir scripts --output json\n  scplint lint --ignore backup --ignore trash",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current scplint version.")]
    Version,
    /// Lint every script under the scripts directory
    #[command(
        about = "Run lint checks",
        long_about = "Scan all matching scripts, then resolve references across the whole tree. Exits 1 when any issue is found.",
        after_help = "Examples:\n  scplint lint --repo-root ../server\n  scplint lint --output github"
    )]
    Lint {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Scripts directory relative to the repository root")]
        scripts_dir: Option<String>,
        #[arg(long, help = "Output mode: human|json|github (default: human)")]
        output: Option<String>,
        #[arg(long = "ext", help = "File extension to scan, repeatable (default: .scp)")]
        extensions: Vec<String>,
        #[arg(long, help = "Directory name to skip, repeatable")]
        ignore: Vec<String>,
        #[arg(long, short = 'v', action = clap::ArgAction::SetTrue, help = "Emit debug tracing to stderr")]
        verbose: bool,
    },
}
