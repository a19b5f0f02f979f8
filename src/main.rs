// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Download every requested file (all at once)
// 4. Print them as plain text or JSON
// 5. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use github_content::{FileResult, GithubContent};

// The #[tokio::main] attribute creates a tokio runtime and runs our async
// main inside it
#[tokio::main]
async fn main() {
    // Run the application and turn the outcome into an exit code
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain: "Failed to ...: cause"
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
//
// Returns:
//   Ok(()) = every file downloaded and printed
//   Err = bad configuration, network failure, or output failure
async fn run() -> Result<()> {
    // Parse command-line arguments (handles --help and --version too)
    let cli = Cli::parse();

    // A second logger can only exist if something else installed one first
    if let Err(e) = github_content::logging::init_logger(cli.log_level.into()) {
        eprintln!("Warning: logger not installed: {}", e);
    }

    let client = GithubContent::new(cli.client_config())
        .context("Failed to create HTTP client")?;

    // Download all files at once; the first failure aborts the lot
    let files = client
        .files(cli.paths.clone())
        .await
        .with_context(|| format!("Failed to download files from {}", cli.repo))?;

    log::info!("downloaded {} file(s)", files.len());

    print_files(&files, cli.json)
}

// Prints downloaded files either as JSON or as plain text
//
// Parameters:
//   files: downloaded files, in the order they were requested
//   json: whether to output a JSON array instead of
//           ---- path ----
//           contents
fn print_files(files: &[FileResult], json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(files)?;
        println!("{}", json_output);
    } else {
        for file in files {
            println!("---- {} ----", file.path());
            println!("{}", file.text());
            println!();
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is run() separate from main()?
//    - main() can't return our exit codes through `?`
//    - run() uses `?` freely and main() maps the Result to 0 or 2
//
// 2. What do .context() and .with_context() do?
//    - They wrap an error with a message describing what we were doing
//    - with_context takes a closure, so the message is only built on error
//
// 3. Why clone cli.paths?
//    - files() takes ownership of its input, and we still use `cli` after
// -----------------------------------------------------------------------------
