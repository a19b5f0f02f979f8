// src/github/error.rs
// =============================================================================
// Error types for downloading files.
//
// Two layers:
// - TransportError: anything that goes wrong while talking HTTP
// - ContentError: what callers of GithubContent see (config problems plus
//   transport errors passed through untouched)
//
// Rust concepts:
// - thiserror: derive Display/Error for enums instead of writing them by hand
// - #[error(transparent)]: forward Display and source() to the inner error
// =============================================================================

use thiserror::Error;

/// Errors raised by a [`Transport`](super::Transport) while performing a GET.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The base URL cannot have path segments appended (e.g. `mailto:` urls).
    #[error("base url cannot carry a path: {0}")]
    InvalidBaseUrl(String),

    /// A `:name` placeholder in the url template had no value.
    #[error("no value for url segment ':{0}'")]
    MissingParam(String),

    /// Network, DNS, TLS or timeout failure from reqwest.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Failure reported by a custom transport implementation.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors returned by [`GithubContent`](super::GithubContent) operations.
#[derive(Error, Debug)]
pub enum ContentError {
    /// No repository was configured on the client or supplied for the call.
    #[error("missing repository: set `repo` (or `owner/repo`) before fetching files")]
    MissingRepository,

    /// The path is empty or contains "." / ".." segments.
    #[error("invalid file path {0:?}: expected a path inside the repository")]
    InvalidPath(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ContentError {
    pub fn is_missing_repository(&self) -> bool {
        matches!(self, ContentError::MissingRepository)
    }
}
