// src/github/client.rs
// =============================================================================
// The GitHub contents API, behind a small trait.
//
// The tree walk only needs one operation: "list the contents of this path at
// this ref". `ContentsApi` names that operation so the walk can run against
// the real API (`GitHubClient`) or an in-memory fake in tests.
//
// Authentication:
// - An optional token is passed in by the caller (read from GITHUB_TOKEN in
//   main.rs) and attached as a bearer credential to every request.
// - Without a token requests are anonymous and subject to stricter rate
//   limits. Nothing here retries.
//
// One request is split into three steps so each can be tested on its own:
// 1. contents_url: owner/repo/path/ref -> https://api.github.com/repos/...
// 2. request: URL -> reqwest::RequestBuilder (with the token, if any)
// 3. decode_response: status code + body -> Contents or ApiError
//
// Rust concepts:
// - async-trait: lets a trait have async methods and still be used as
//   `&dyn ContentsApi`
// - thiserror: derives Display and std::error::Error for ApiError
// =============================================================================

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::types::Contents;

const GITHUB_API_URL: &str = "https://api.github.com";

// GitHub rejects requests without a User-Agent
const USER_AGENT: &str = concat!("vimwasm-try-plugin/", env!("CARGO_PKG_VERSION"));

/// Failures reported by a contents API implementation
#[derive(Debug, Error)]
pub enum ApiError {
    /// 404: the repository, path or ref does not exist
    #[error("404 {0}")]
    NotFound(String),

    /// Transport failure (DNS, TLS, timeout, ...)
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Any other non-2xx answer, e.g. 403 when rate limited
    #[error("GitHub API error {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// 2xx answer whose body is not a contents listing
    #[error("could not decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// "Get directory contents" on a hosted repository.
///
/// `reference` is a commit, branch or tag; `None` means the default branch.
#[async_trait]
pub trait ContentsApi: Send + Sync {
    async fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> Result<Contents, ApiError>;
}

/// reqwest-backed client for api.github.com
pub struct GitHubClient {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self, ApiError> {
        // Ask for the v3 JSON representation on every request
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        // One client for the whole walk, so connections are reused
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(GitHubClient {
            client,
            api_base: GITHUB_API_URL.to_string(),
            token,
        })
    }

    // Builds /repos/{owner}/{repo}/contents/{path}?ref={reference}
    //
    // path_segments_mut() escapes each segment, so a file named "a b.vim"
    // becomes "a%20b.vim". The root path "" leaves a trailing slash:
    //   https://api.github.com/repos/rhysd/clever-f.vim/contents/
    fn contents_url(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.api_base)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["repos", owner, repo, "contents"])
            .extend(path.split('/'));

        // No ref means GitHub picks the default branch
        if let Some(reference) = reference {
            url.query_pairs_mut().append_pair("ref", reference);
        }
        Ok(url)
    }

    // A GET for `url`, carrying the bearer token when one was configured
    fn request(&self, url: Url) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ContentsApi for GitHubClient {
    async fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> Result<Contents, ApiError> {
        let url = self.contents_url(owner, repo, path, reference)?;
        debug!(%url, "requesting contents");

        let response = self.request(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        decode_response(status, &body, &url)
    }
}

/// Turns a contents API answer into `Contents`.
///
/// - 404 -> `NotFound`, keeping GitHub's message ("Not Found",
///   "No commit found for the ref ...")
/// - other non-2xx -> `Status`
/// - 2xx with a body that is neither an object nor an array of entries
///   -> `Decode`
fn decode_response(status: StatusCode, body: &str, url: &Url) -> Result<Contents, ApiError> {
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(api_message(body, "Not Found")));
    }
    if !status.is_success() {
        return Err(ApiError::Status {
            status,
            message: api_message(body, "Unknown error"),
        });
    }

    serde_json::from_str(body).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

// GitHub error bodies look like {"message": "...", "documentation_url": "..."}
fn api_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("message").and_then(|m| m.as_str().map(String::from)))
        .unwrap_or_else(|| fallback.to_string())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait for one method?
//    - The tree walk takes `&dyn ContentsApi`, not `&GitHubClient`
//    - Tests pass an in-memory fake and never touch the network
//
// 2. Why read the body before checking the status?
//    - GitHub explains most failures in a JSON body
//    - 404 bodies say whether the repo or the ref is missing, and that
//      message ends up in the error shown to the user
//
// 3. Why is decode_response not async?
//    - It only looks at data that has already arrived
//    - Plain functions are easy to test with hand-written inputs
// -----------------------------------------------------------------------------
