// src/error.rs
// =============================================================================
// Error types for fetching a plugin and building the vim.wasm URL.
//
// Every failure is fatal to a run. Functions never swallow errors; they add
// the path or input that was in scope and pass the error up. The `Fetch`
// variant boxes its cause so that nested directory failures keep their
// whole chain:
//
//   Fetch("") -> Fetch("autoload") -> Api(Status 500)
//
// Rust concepts:
// - thiserror: derives Display and std::error::Error from attributes
// - #[source]: exposes the wrapped cause through Error::source()
// =============================================================================

use thiserror::Error;

/// Failures of a single run, from slug parsing to opening the browser.
#[derive(Debug, Error)]
pub enum Error {
    #[error("repository {0:?} is invalid. Did you forget giving an argument? Please specify in owner/repo format")]
    InvalidRepositorySlug(String),

    #[error("file path {path:?} of repository \"{repo}\" not found: {message}")]
    NotFound {
        path: String,
        repo: String,
        message: String,
    },

    #[error("could not fetch contents of {path:?} in repository \"{repo}\"")]
    Fetch {
        path: String,
        repo: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("repository \"{0}\" contains no Vim script file (filename ends with .vim)")]
    NoPluginFiles(String),

    #[error("URL {url:?} specified with --base is broken")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("URL given with --base does not have 'http' or 'https' scheme: {0:?}")]
    UnsupportedScheme(String),

    #[error("could not open URL with browser")]
    BrowserLaunch(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Walks the cause chain and returns the innermost `NotFound`, if any.
    ///
    /// Recursive fetches wrap a missing subdirectory in one `Fetch` per
    /// level, so the 404 is usually a few links down the chain.
    pub fn not_found(&self) -> Option<&Error> {
        let mut current: &(dyn std::error::Error + 'static) = self;
        loop {
            if let Some(err) = current.downcast_ref::<Error>() {
                if matches!(err, Error::NotFound { .. }) {
                    return Some(err);
                }
            }
            current = current.source()?;
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[error("...")] do?
//    - It becomes the Display implementation of that variant
//    - {0} and {path} refer to the variant's fields, {0:?} adds quotes
//
// 2. Why Box<dyn std::error::Error + Send + Sync>?
//    - A Fetch error can wrap an ApiError or another Fetch error
//    - Boxing lets one field hold either, and Send + Sync lets the error
//      cross into anyhow
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_found_through_fetch_chain() {
        let inner = Error::NotFound {
            path: "autoload/foo".to_string(),
            repo: "owner/repo".to_string(),
            message: "Not Found".to_string(),
        };
        let middle = Error::Fetch {
            path: "autoload".to_string(),
            repo: "owner/repo".to_string(),
            source: Box::new(inner),
        };
        let outer = Error::Fetch {
            path: String::new(),
            repo: "owner/repo".to_string(),
            source: Box::new(middle),
        };

        match outer.not_found() {
            Some(Error::NotFound { path, .. }) => assert_eq!(path, "autoload/foo"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found_absent() {
        let err = Error::NoPluginFiles("owner/repo".to_string());
        assert!(err.not_found().is_none());
    }

    #[test]
    fn test_fetch_message_names_path() {
        let err = Error::Fetch {
            path: "plugin".to_string(),
            repo: "owner/repo".to_string(),
            source: "boom".into(),
        };
        assert_eq!(
            err.to_string(),
            "could not fetch contents of \"plugin\" in repository \"owner/repo\""
        );
        assert_eq!(std::error::Error::source(&err).unwrap().to_string(), "boom");
    }
}
