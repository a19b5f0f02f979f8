// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// One command: print the contents of one or more files from a repository.
//
//   github-content --repo doowb/handlebars-helpers --branch docs \
//       scaffolds.json package.json
//
// Rust concepts:
// - Derive macros: #[derive(Parser)] generates the argument parser
// - ValueEnum: lets clap parse a string into an enum
// =============================================================================

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use github_content::ClientConfig;

#[derive(Parser, Debug)]
#[command(
    name = "github-content",
    version,
    about = "Print raw file contents from a GitHub repository",
    long_about = "github-content downloads files from raw.githubusercontent.com for the given \
                  owner, repository and branch, and prints them. All files are requested at once; \
                  if any download fails the command fails."
)]
pub struct Cli {
    /// Files to download, relative to the repository root
    ///
    /// Example: package.json docs/README.md
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Repository owner (user or organization)
    #[arg(short, long)]
    pub owner: Option<String>,

    /// Repository name, or "owner/repo"
    #[arg(short, long)]
    pub repo: String,

    /// Branch to read from (default: master)
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Token sent in the Authorization header (for private repositories)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output results in JSON format instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Log level for this tool (RUST_LOG is honoured for other crates)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    /// Client configuration built from the flags.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default().repo(&self.repo);
        if let Some(owner) = &self.owner {
            config = config.owner(owner);
        }
        if let Some(branch) = &self.branch {
            config = config.branch(branch);
        }
        if let Some(token) = &self.token {
            config = config.token(token);
        }
        config
    }
}
