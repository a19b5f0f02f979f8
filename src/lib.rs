// src/lib.rs
// =============================================================================
// Library root.
//
// Everything useful lives in the `github` module; the most common items are
// re-exported here so callers can write `github_content::GithubContent`.
// =============================================================================

pub mod github;
pub mod logging;

pub use github::{
    ClientConfig, ContentError, FetchOptions, FileResult, GithubContent, PathList, RawTransport,
    Transport, TransportError,
};
