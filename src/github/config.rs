// src/github/config.rs
// =============================================================================
// Which repository and branch to read files from.
//
// - ClientConfig: defaults stored on the client (owner, repo, branch, plus
//   options for the transport such as a token)
// - FetchOptions: per-call overrides with the same fields
// - ResolvedTarget: the result of merging the two, ready to build a URL
//
// Merge order: call overrides > client config > built-in default
// (branch = "master"). A repo written as "owner/repo" is split, and its owner
// replaces whatever owner was resolved before.
//
// Rust concepts:
// - Builder methods taking `self` by value: ClientConfig::default().repo(..)
// - Option<String> and Option::or: picking the first value that is set
// =============================================================================

use std::collections::BTreeMap;

use super::error::ContentError;
use super::transport::TransportOptions;

/// Branch used when neither the client nor the call names one.
pub const DEFAULT_BRANCH: &str = "master";

/// Repository settings stored on a [`GithubContent`](super::GithubContent).
///
/// ```
/// use github_content::ClientConfig;
///
/// let config = ClientConfig::default()
///     .owner("doowb")
///     .repo("handlebars-helpers")
///     .branch("docs");
/// assert_eq!(config.branch_name(), "docs");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    owner: Option<String>,
    repo: Option<String>,
    branch: Option<String>,
    transport: TransportOptions,
}

impl ClientConfig {
    /// GitHub user or organization.
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Repository name, or `"owner/repo"`.
    pub fn repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Token forwarded to the transport as an Authorization header.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.transport.token = Some(token.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.transport.user_agent = Some(user_agent.into());
        self
    }

    pub fn owner_name(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn repo_name(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    /// Configured branch, or [`DEFAULT_BRANCH`].
    pub fn branch_name(&self) -> &str {
        non_empty(&self.branch).unwrap_or(DEFAULT_BRANCH)
    }

    pub fn transport_options(&self) -> &TransportOptions {
        &self.transport
    }

    /// Merges `overrides` over this config and validates the result.
    ///
    /// Returns [`ContentError::MissingRepository`] when no repo is left after
    /// merging. Nothing is sent over the network here.
    pub fn resolve(&self, overrides: &FetchOptions) -> Result<ResolvedTarget, ContentError> {
        let mut owner = non_empty(&overrides.owner)
            .or_else(|| non_empty(&self.owner))
            .map(str::to_string);
        let mut repo = non_empty(&overrides.repo)
            .or_else(|| non_empty(&self.repo))
            .map(str::to_string);
        let branch = non_empty(&overrides.branch)
            .or_else(|| non_empty(&self.branch))
            .unwrap_or(DEFAULT_BRANCH)
            .to_string();

        if let Some((shorthand_owner, shorthand_repo)) = repo.as_deref().and_then(split_shorthand) {
            owner = shorthand_owner;
            repo = shorthand_repo;
        }

        let repo = match repo {
            Some(repo) if !repo.is_empty() => repo,
            _ => return Err(ContentError::MissingRepository),
        };

        Ok(ResolvedTarget {
            owner,
            repo,
            branch,
            transport: self.transport.merged(&overrides.transport),
        })
    }
}

/// Per-call overrides for [`ClientConfig`]. Unset fields fall back to the
/// client's values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    owner: Option<String>,
    repo: Option<String>,
    branch: Option<String>,
    transport: TransportOptions,
}

impl FetchOptions {
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.transport.token = Some(token.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.transport.user_agent = Some(user_agent.into());
        self
    }
}

/// Fully merged settings for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub owner: Option<String>,
    pub repo: String,
    pub branch: String,
    pub transport: TransportOptions,
}

impl ResolvedTarget {
    /// URL template for the transport; the owner segment is left out when no
    /// owner was resolved.
    pub fn template(&self) -> &'static str {
        if self.owner.is_some() {
            "/:owner/:repo/:branch/:path"
        } else {
            "/:repo/:branch/:path"
        }
    }

    /// Placeholder values for [`template`](Self::template) and one file path.
    pub fn params(&self, path: &str) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        if let Some(owner) = &self.owner {
            params.insert("owner".to_string(), owner.clone());
        }
        params.insert("repo".to_string(), self.repo.clone());
        params.insert("branch".to_string(), self.branch.clone());
        params.insert("path".to_string(), path.to_string());
        params
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// "owner/repo" -> (Some("owner"), Some("repo")). Anything after a second '/'
// is dropped. Returns None when there is no '/' at all.
fn split_shorthand(repo: &str) -> Option<(Option<String>, Option<String>)> {
    let (owner, rest) = repo.split_once('/')?;
    let name = rest.split('/').next().unwrap_or_default();
    let as_field = |s: &str| (!s.is_empty()).then(|| s.to_string());
    Some((as_field(owner), as_field(name)))
}
