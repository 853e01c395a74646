//! Configuration discovery and effective settings resolution.
//!
//! scplint reads `scplint.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an
//! `Effective` config.
//! Defaults:
//! - `scripts_dir`: the repository root
//! - `output`: `github` under GitHub Actions, otherwise `human`
//! - `extensions`: `[".scp"]`
//! - `ignore`: `.git`, `backups`, `backup`, `trash`, `.github`
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_TOML: &str = "scplint.toml";
const CONFIG_YAML: [&str; 2] = ["scplint.yaml", "scplint.yml"];

pub const DEFAULT_EXTENSIONS: &[&str] = &[".scp"];
pub const DEFAULT_IGNORE: &[&str] = &[".git", "backups", "backup", "trash", ".github"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unknown output mode '{0}' (expected human|json|github)")]
    Output(String),
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `scplint.toml|yaml`.
pub struct LintConfig {
    pub scripts_dir: Option<String>,
    pub output: Option<String>,
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub ignore: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Github,
}

impl OutputMode {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(OutputMode::Human),
            "json" => Ok(OutputMode::Json),
            "github" => Ok(OutputMode::Github),
            _ => Err(ConfigError::Output(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub scripts_dir: PathBuf,
    pub output: OutputMode,
    pub extensions: Vec<String>,
    pub ignore: Vec<String>,
    pub config_found: bool,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `scplint.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join(CONFIG_TOML).exists() || CONFIG_YAML.iter().any(|y| cur.join(y).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `LintConfig` from `scplint.toml` or `scplint.yaml|yml` if present.
pub fn load_config(root: &Path) -> Result<Option<LintConfig>, ConfigError> {
    let toml_path = root.join(CONFIG_TOML);
    if toml_path.exists() {
        let s = read(&toml_path)?;
        let cfg = toml::from_str(&s).map_err(|source| ConfigError::Toml {
            path: toml_path.clone(),
            source,
        })?;
        return Ok(Some(cfg));
    }
    for yml in CONFIG_YAML {
        let p = root.join(yml);
        if p.exists() {
            let s = read(&p)?;
            let cfg = serde_yaml::from_str(&s)
                .map_err(|source| ConfigError::Yaml { path: p.clone(), source })?;
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn running_in_github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").map(|v| v == "true").unwrap_or(false)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_scripts_dir: Option<&str>,
    cli_output: Option<&str>,
    cli_extensions: &[String],
    cli_ignore: &[String],
) -> Result<Effective, ConfigError> {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let loaded = load_config(&repo_root)?;
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    let scripts_dir = cli_scripts_dir
        .map(|s| s.to_string())
        .or(cfg.scripts_dir)
        .map(|s| repo_root.join(s))
        .unwrap_or_else(|| repo_root.clone());

    let output = match cli_output.map(|s| s.to_string()).or(cfg.output) {
        Some(s) => OutputMode::parse(&s)?,
        None if running_in_github_actions() => OutputMode::Github,
        None => OutputMode::Human,
    };

    let extensions = if !cli_extensions.is_empty() {
        cli_extensions.to_vec()
    } else {
        cfg.extensions
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect())
    };
    let extensions = extensions
        .into_iter()
        .map(|e| if e.starts_with('.') { e } else { format!(".{}", e) })
        .collect();

    let ignore = if !cli_ignore.is_empty() {
        cli_ignore.to_vec()
    } else {
        cfg.ignore
            .unwrap_or_else(|| DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect())
    };

    Ok(Effective {
        repo_root,
        scripts_dir,
        output,
        extensions,
        ignore,
        config_found,
    })
}
