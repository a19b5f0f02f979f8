// src/github/fetch.rs
// =============================================================================
// Downloads raw files from a GitHub repository.
//
// Strategy:
// - Resolve owner/repo/branch once per call (see config.rs)
// - Build "/{owner}/{repo}/{branch}/{path}" through the transport template
// - Wrap each body as a FileResult that remembers the path as requested
//
// Batches:
// - Every path is requested at the same time (no limit)
// - Results come back in the order the paths were given, not the order the
//   responses arrived
// - The first error ends the whole batch; files that already arrived are
//   dropped
//
// Rust concepts:
// - Arc<dyn Transport>: shared ownership of a trait object
// - try_join_all: run futures together, keep their order, stop on first Err
// - impl Into<PathList>: one method accepting a path, a list, or None
// =============================================================================

use std::borrow::Cow;
use std::sync::Arc;

use futures::future::try_join_all;
use serde::{Serialize, Serializer};

use super::config::{ClientConfig, FetchOptions, ResolvedTarget};
use super::error::ContentError;
use super::transport::{RawTransport, RequestOptions, Transport};

/// One downloaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResult {
    /// The path exactly as it was requested.
    path: String,
    /// Body returned by the transport. May be an error page such as
    /// `"404: Not Found"`; no status check is done on it.
    #[serde(serialize_with = "serialize_lossy")]
    contents: Vec<u8>,
}

impl FileResult {
    pub fn new(path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        FileResult {
            path: path.into(),
            contents: contents.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Contents as text, invalid UTF-8 replaced with U+FFFD.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.contents)
    }

    pub fn into_contents(self) -> Vec<u8> {
        self.contents
    }
}

fn serialize_lossy<S: Serializer>(contents: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(contents))
}

/// Paths for a batch download.
///
/// Built from a single path, a list of paths, or an `Option` of either;
/// `None` gives an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathList(Vec<String>);

impl PathList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<&str> for PathList {
    fn from(path: &str) -> Self {
        PathList(vec![path.to_string()])
    }
}

impl From<String> for PathList {
    fn from(path: String) -> Self {
        PathList(vec![path])
    }
}

impl From<&String> for PathList {
    fn from(path: &String) -> Self {
        PathList(vec![path.clone()])
    }
}

impl From<Vec<String>> for PathList {
    fn from(paths: Vec<String>) -> Self {
        PathList(paths)
    }
}

impl From<Vec<&str>> for PathList {
    fn from(paths: Vec<&str>) -> Self {
        PathList(paths.into_iter().map(str::to_string).collect())
    }
}

impl From<&[String]> for PathList {
    fn from(paths: &[String]) -> Self {
        PathList(paths.to_vec())
    }
}

impl From<&[&str]> for PathList {
    fn from(paths: &[&str]) -> Self {
        PathList(paths.iter().map(|p| p.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PathList {
    fn from(paths: [&str; N]) -> Self {
        PathList(paths.iter().map(|p| p.to_string()).collect())
    }
}

impl<T: Into<PathList>> From<Option<T>> for PathList {
    fn from(paths: Option<T>) -> Self {
        paths.map(Into::into).unwrap_or_default()
    }
}

/// Client for downloading raw files from one configured repository.
///
/// ```no_run
/// use github_content::{ClientConfig, GithubContent};
///
/// # async fn demo() -> Result<(), github_content::ContentError> {
/// let client = GithubContent::new(
///     ClientConfig::default()
///         .owner("doowb")
///         .repo("handlebars-helpers")
///         .branch("docs"),
/// )?;
/// for file in client.files(["scaffolds.json", "package.json"]).await? {
///     println!("---- {} ----\n{}", file.path(), file.text());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GithubContent {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for GithubContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubContent")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GithubContent {
    // Creates a client that downloads from raw.githubusercontent.com
    //
    // Parameters:
    //   config: owner/repo/branch defaults used by every call
    //
    // Returns: the client, or an error if the HTTP client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self, ContentError> {
        let transport = RawTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    // Creates a client on top of any Transport (a mirror, a stub in tests)
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        GithubContent { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // Downloads one file using the client's configuration
    //
    // Parameters:
    //   path: file path inside the repository (e.g., "docs/README.md")
    //
    // Returns: FileResult with the same path and the raw body
    pub async fn file(&self, path: &str) -> Result<FileResult, ContentError> {
        self.file_with(path, &FetchOptions::default()).await
    }

    // Downloads one file with per-call overrides
    //
    // Parameters:
    //   path: file path inside the repository
    //   overrides: owner/repo/branch/token used for this call only
    //
    // Returns: FileResult, or MissingRepository / InvalidPath / the
    //   transport's error
    pub async fn file_with(
        &self,
        path: &str,
        overrides: &FetchOptions,
    ) -> Result<FileResult, ContentError> {
        let target = self.config.resolve(overrides)?;
        self.fetch_resolved(&target, path).await
    }

    // Downloads every path at once with the client's configuration
    pub async fn files(
        &self,
        paths: impl Into<PathList>,
    ) -> Result<Vec<FileResult>, ContentError> {
        self.files_with(paths, &FetchOptions::default()).await
    }

    // Downloads every path at once with per-call overrides
    //
    // Parameters:
    //   paths: a single path, a list of paths, or None
    //   overrides: owner/repo/branch/token used for this call only
    //
    // Returns: one FileResult per path, result[i] belonging to paths[i]
    //   Empty input: Ok(vec![]) without checking the configuration
    //   Any failure: that error, the other downloads are dropped
    pub async fn files_with(
        &self,
        paths: impl Into<PathList>,
        overrides: &FetchOptions,
    ) -> Result<Vec<FileResult>, ContentError> {
        let paths = paths.into();
        if paths.is_empty() {
            return Ok(Vec::new());
        }

        // Merge settings once; every download below shares the same target
        let target = self.config.resolve(overrides)?;
        log::info!(
            "downloading {} file(s) from {}/{}@{}",
            paths.len(),
            target.owner.as_deref().unwrap_or("-"),
            target.repo,
            target.branch
        );

        // One future per path, all polled together on this task.
        // try_join_all keeps input order and returns on the first Err.
        let downloads = paths.iter().map(|path| self.fetch_resolved(&target, path));
        try_join_all(downloads).await
    }

    // Downloads one path against an already resolved target
    async fn fetch_resolved(
        &self,
        target: &ResolvedTarget,
        path: &str,
    ) -> Result<FileResult, ContentError> {
        validate_path(path)?;

        let options = RequestOptions {
            params: target.params(path),
            transport: target.transport.clone(),
        };

        let contents = self
            .transport
            .get(target.template(), &options)
            .await
            .map_err(|e| {
                log::debug!("download of {} failed: {}", path, e);
                e
            })?;

        // Keep the path as the caller wrote it, not the URL we requested
        Ok(FileResult::new(path, contents))
    }
}

// Checks that a path names a file inside the repository
//
// Rejected:
//   - "" or "/" (no segment left, the GET would hit the branch root)
//   - "." and ".." segments (URL normalization would silently rewrite
//     "../secret.md" into "secret.md")
//
// Empty segments ("docs//a.md") are allowed; the URL just skips them.
fn validate_path(path: &str) -> Result<(), ContentError> {
    let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();
    if segments.peek().is_none() || segments.any(|s| s == "." || s == "..") {
        return Err(ContentError::InvalidPath(path.to_string()));
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<dyn Transport>?
//    - dyn Transport = "any type implementing Transport", chosen at runtime
//    - Arc = shared ownership, so cloning GithubContent is cheap
//    - Tests pass a stub, the CLI passes RawTransport, this file doesn't care
//
// 2. What does try_join_all do?
//    - Takes many futures and polls them all at the same time
//    - Ok(Vec) in the SAME order as the input when every future succeeds
//    - Err(e) as soon as one fails; the others are dropped (cancelled)
//
// 3. Why impl Into<PathList>?
//    - One method accepts "a.md", vec!["a.md", "b.md"], ["a", "b"] or None
//    - The From impls above do the conversion
//
// 4. Why Vec<u8> for contents?
//    - Files are not always UTF-8 (images, archives)
//    - text() gives a lossy String view when you need one
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::error::TransportError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    // A transport that records every request and answers from memory.
    //
    // `delays` holds per-path sleeps so tests can make later paths finish
    // first; `failures` lists paths that answer with an error.
    #[derive(Default)]
    struct StubTransport {
        calls: Mutex<Vec<(String, RequestOptions)>>,
        delays: HashMap<String, u64>,
        failures: Vec<String>,
    }

    impl StubTransport {
        fn with_delays(delays: &[(&str, u64)]) -> Self {
            StubTransport {
                delays: delays.iter().map(|(p, d)| (p.to_string(), *d)).collect(),
                ..Default::default()
            }
        }

        fn failing(paths: &[&str]) -> Self {
            StubTransport {
                failures: paths.iter().map(|p| p.to_string()).collect(),
                ..Default::default()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get(
            &self,
            template: &str,
            options: &RequestOptions,
        ) -> Result<Vec<u8>, TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push((template.to_string(), options.clone()));

            let path = options.params.get("path").cloned().unwrap_or_default();
            if let Some(ms) = self.delays.get(&path) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.failures.contains(&path) {
                return Err(TransportError::Other(anyhow::anyhow!("Fake Error")));
            }
            Ok(format!("contents of {}", path).into_bytes())
        }
    }

    fn client(config: ClientConfig, transport: &Arc<StubTransport>) -> GithubContent {
        GithubContent::with_transport(config, transport.clone())
    }

    #[tokio::test]
    async fn test_file_wraps_body_with_requested_path() {
        let transport = Arc::new(StubTransport::default());
        let gc = client(ClientConfig::default().owner("doowb").repo("github-content"), &transport);

        let file = gc.file("package.json").await.unwrap();
        assert_eq!(file.path(), "package.json");
        assert_eq!(file.text(), "contents of package.json");

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (template, options) = &calls[0];
        assert_eq!(template, "/:owner/:repo/:branch/:path");
        assert_eq!(options.params["owner"], "doowb");
        assert_eq!(options.params["repo"], "github-content");
        assert_eq!(options.params["branch"], "master");
    }

    #[tokio::test]
    async fn test_file_without_repo_makes_no_request() {
        let transport = Arc::new(StubTransport::default());
        let gc = client(ClientConfig::default().owner("doowb"), &transport);

        let err = gc.file("package.json").await.unwrap_err();
        assert!(err.is_missing_repository());
        assert_eq!(transport.call_count(), 0);

        let err = gc.files(["a", "b"]).await.unwrap_err();
        assert!(err.is_missing_repository());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_file_with_overrides_for_one_call() {
        let transport = Arc::new(StubTransport::default());
        let gc = client(ClientConfig::default().repo("a/b"), &transport);

        let overrides = FetchOptions::default().repo("c/d").branch("dev").token("t");
        gc.file_with("x.md", &overrides).await.unwrap();
        gc.file("x.md").await.unwrap();

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].1.params["owner"], "c");
        assert_eq!(calls[0].1.params["repo"], "d");
        assert_eq!(calls[0].1.params["branch"], "dev");
        assert_eq!(calls[0].1.transport.token.as_deref(), Some("t"));
        assert_eq!(calls[1].1.params["owner"], "a");
        assert_eq!(calls[1].1.params["branch"], "master");
        assert_eq!(calls[1].1.transport.token, None);
    }

    #[tokio::test]
    async fn test_transport_error_is_passed_through() {
        let transport = Arc::new(StubTransport::failing(&["package.json"]));
        let gc = client(ClientConfig::default().repo("o/r"), &transport);

        let err = gc.file("package.json").await.unwrap_err();
        assert!(matches!(err, ContentError::Transport(TransportError::Other(_))));
        assert_eq!(err.to_string(), "Fake Error");
    }

    #[tokio::test]
    async fn test_files_keeps_input_order() {
        // The first path is the slowest, the last the fastest
        let transport = Arc::new(StubTransport::with_delays(&[
            ("one.md", 60),
            ("two.md", 30),
            ("three.md", 0),
        ]));
        let gc = client(ClientConfig::default().repo("o/r"), &transport);

        let files = gc.files(vec!["one.md", "two.md", "three.md"]).await.unwrap();
        let paths: Vec<&str> = files.iter().map(FileResult::path).collect();
        assert_eq!(paths, vec!["one.md", "two.md", "three.md"]);
        assert_eq!(files[0].text(), "contents of one.md");
        assert_eq!(files[2].text(), "contents of three.md");
    }

    #[tokio::test]
    async fn test_files_runs_requests_concurrently() {
        let transport = Arc::new(StubTransport::with_delays(&[
            ("a", 200),
            ("b", 200),
            ("c", 200),
            ("d", 200),
        ]));
        let gc = client(ClientConfig::default().repo("o/r"), &transport);

        let started = tokio::time::Instant::now();
        let files = gc.files(["a", "b", "c", "d"]).await.unwrap();
        assert_eq!(files.len(), 4);
        // Sequential would take 800ms
        assert!(started.elapsed() < Duration::from_millis(600));
    }

    #[tokio::test]
    async fn test_files_none_is_empty_without_requests() {
        let transport = Arc::new(StubTransport::default());
        // No repo configured: an empty batch must still succeed
        let gc = client(ClientConfig::default(), &transport);

        let files = gc.files(None::<&str>).await.unwrap();
        assert!(files.is_empty());
        let files = gc.files(None::<Vec<String>>).await.unwrap();
        assert!(files.is_empty());
        let files = gc.files(Vec::<String>::new()).await.unwrap();
        assert!(files.is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_files_single_path_is_one_element_batch() {
        let transport = Arc::new(StubTransport::default());
        let gc = client(ClientConfig::default().repo("o/r"), &transport);

        let single = gc.files("package.json").await.unwrap();
        let listed = gc.files(vec!["package.json".to_string()]).await.unwrap();
        assert_eq!(single, listed);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].path(), "package.json");
    }

    #[tokio::test]
    async fn test_files_fails_fast_on_any_error() {
        let transport = Arc::new(StubTransport::failing(&["broken.md"]));
        let gc = client(ClientConfig::default().repo("o/r"), &transport);

        let result = gc.files(["ok.md", "broken.md", "also-ok.md"]).await;
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Fake Error");
    }

    #[tokio::test]
    async fn test_files_resolves_config_once_for_all_paths() {
        let transport = Arc::new(StubTransport::default());
        let gc = client(ClientConfig::default().owner("x").repo("y"), &transport);

        let overrides = FetchOptions::default().branch("docs");
        gc.files_with(["a", "b"], &overrides).await.unwrap();

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        for (_, options) in calls.iter() {
            assert_eq!(options.params["owner"], "x");
            assert_eq!(options.params["repo"], "y");
            assert_eq!(options.params["branch"], "docs");
        }
    }

    #[tokio::test]
    async fn test_paths_outside_the_repository_are_rejected() {
        let transport = Arc::new(StubTransport::default());
        let gc = client(ClientConfig::default().repo("o/r"), &transport);

        for bad in ["", "/", "//", "../secret.md", "a/./b.md", "docs/.."] {
            let err = gc.file(bad).await.unwrap_err();
            assert!(
                matches!(err, ContentError::InvalidPath(ref p) if p == bad),
                "{:?} should be rejected",
                bad
            );
        }
        assert_eq!(transport.call_count(), 0);

        // One bad path fails the whole batch
        let err = gc.files(["ok.md", "../secret.md"]).await.unwrap_err();
        assert!(matches!(err, ContentError::InvalidPath(_)));

        // Doubled slashes are tolerated and the path is kept verbatim
        let file = gc.file("docs//a.md").await.unwrap();
        assert_eq!(file.path(), "docs//a.md");
    }

    #[tokio::test]
    async fn test_client_keeps_its_config() {
        let transport = Arc::new(StubTransport::default());
        let config = ClientConfig::default().owner("doowb").repo("github-content");
        let gc = client(config.clone(), &transport);
        assert_eq!(gc.config(), &config);
        assert_eq!(gc.config().branch_name(), "master");
    }

    #[test]
    fn test_path_list_conversions() {
        assert_eq!(PathList::from("a").len(), 1);
        assert_eq!(PathList::from(["a", "b"]).len(), 2);
        assert!(PathList::from(None::<Vec<&str>>).is_empty());
        assert_eq!(PathList::from(Some("a")), PathList::from(vec!["a"]));
        let owned = vec!["x".to_string(), "y".to_string()];
        assert_eq!(
            PathList::from(owned.as_slice()).iter().collect::<Vec<_>>(),
            vec!["x", "y"]
        );
    }

    #[test]
    fn test_file_result_serializes_contents_as_text() {
        let file = FileResult::new("README.md", b"# Title\n".to_vec());
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["path"], "README.md");
        assert_eq!(json["contents"], "# Title\n");
        assert_eq!(file.into_contents(), b"# Title\n".to_vec());
    }
}
