// src/logging.rs
// =============================================================================
// Logger setup for the command-line tool.
//
// The library only emits records through the `log` facade. The binary calls
// init_logger() once to print them on stderr with env_logger.
//
// RUST_LOG is read first; --log-level then overrides the level for this
// crate, so `RUST_LOG=reqwest=debug github-content ...` still works.
// =============================================================================

use std::io::Write;

use log::LevelFilter;

/// Installs env_logger with a compact `LEVEL target: message` format.
///
/// Fails if a logger was already installed in this process.
pub fn init_logger(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_module("github_content", level);

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{:<5} {}: {}",
            record.level(),
            record.target(),
            record.args()
        )
    });

    builder.try_init()
}
