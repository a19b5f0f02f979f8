// src/github/mod.rs
// =============================================================================
// This module downloads raw files from GitHub repositories.
//
// Submodules:
// - config: owner/repo/branch defaults and per-call overrides
// - fetch: GithubContent, single and batch downloads
// - transport: the HTTP layer (raw.githubusercontent.com via reqwest)
// - error: error types shared by the above
// =============================================================================

mod config;
mod error;
mod fetch;
mod transport;

pub use config::{ClientConfig, FetchOptions, ResolvedTarget, DEFAULT_BRANCH};
pub use error::{ContentError, TransportError};
pub use fetch::{FileResult, GithubContent, PathList};
pub use transport::{
    expand_template, RawTransport, RawTransportBuilder, RequestOptions, Transport,
    TransportOptions, RAW_CONTENT_URL,
};
