//! scplint CLI binary entry point.
//! Resolves configuration, runs the lint, and prints results.

use clap::Parser;
use scplint::cli::{Cli, Commands};
use scplint::config::{self, OutputMode};
use scplint::lint::{self, LintOptions};
use scplint::{output, utils};
use tracing::Level;

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Lint {
            repo_root,
            scripts_dir,
            output,
            extensions,
            ignore,
            verbose,
        } => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
                .init();

            let eff = match config::resolve_effective(
                repo_root.as_deref(),
                scripts_dir.as_deref(),
                output.as_deref(),
                &extensions,
                &ignore,
            ) {
                Ok(eff) => eff,
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(2);
                }
            };
            if !eff.scripts_dir.is_dir() {
                eprintln!(
                    "{} Scripts directory not found: {}",
                    utils::error_prefix(),
                    eff.scripts_dir.to_string_lossy()
                );
                std::process::exit(2);
            }
            if eff.output == OutputMode::Human {
                if !eff.config_found {
                    eprintln!(
                        "{} No scplint.toml found in {}; using defaults.",
                        utils::note_prefix(),
                        eff.repo_root.to_string_lossy()
                    );
                }
                eprintln!(
                    "{} Scanning {} for [{}]",
                    utils::info_prefix(),
                    eff.scripts_dir.to_string_lossy(),
                    eff.extensions.join(", ")
                );
            }

            let result = lint::run_lint(&LintOptions {
                scripts_dir: eff.scripts_dir.clone(),
                extensions: eff.extensions.clone(),
                ignore: eff.ignore.clone(),
            });
            output::print_lint(&result, eff.output);
            if result.summary.issues > 0 {
                std::process::exit(1);
            }
        }
    }
}
