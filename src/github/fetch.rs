// src/github/fetch.rs
// =============================================================================
// Walks a GitHub repository and collects the files of a Vim plugin.
//
// Strategy:
// - Start at the repository root (path "") and list its contents
// - Keep every file whose name ends with `.vim`
// - Descend only into plugin directories (autoload/, plugin/, ...). Docs,
//   tests and CI config are never visited, which bounds the number of API
//   requests to the size of the plugin itself
// - One request per directory, sequential and depth-first
//
// Each level of the walk returns its own FetchResult and the caller merges
// it, so there is no shared accumulator. Sorting happens once, after the
// whole walk.
// =============================================================================

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, info};

use super::client::{ApiError, ContentsApi};
use super::types::{Contents, EntryKind, FetchResult};
use crate::error::{Error, Result};
use crate::plugin::DirectorySet;

/// `owner/name` identifier of a hosted repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slug {
    pub owner: String,
    pub name: String,
}

impl Slug {
    /// Parses "owner/name". Both halves must be non-empty and the name may
    /// not contain another '/'.
    pub fn parse(input: &str) -> Result<Self> {
        match input.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Slug {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(Error::InvalidRepositorySlug(input.to_string())),
        }
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Recursively lists `path` and returns Vim script files and plugin
/// directories in listing order (not sorted).
///
/// Errors from nested directories are wrapped in a `Fetch` naming `path`,
/// so the outermost error names the top of the walk and `source()` leads
/// down to the original failure.
pub fn fetch_tree<'a>(
    api: &'a dyn ContentsApi,
    slug: &'a Slug,
    reference: Option<&'a str>,
    path: String,
    plugin_dirs: DirectorySet,
) -> BoxFuture<'a, Result<FetchResult>> {
    async move {
        debug!(path = %path, "listing directory");

        let contents = api
            .get_contents(&slug.owner, &slug.name, &path, reference)
            .await
            .map_err(|err| api_error(err, slug, &path))?;

        let mut result = FetchResult::default();

        let entries = match contents {
            Contents::Single(entry) => {
                if entry.is_vim_script() {
                    result.files.push(entry);
                }
                return Ok(result);
            }
            Contents::Listing(entries) => entries,
        };

        for entry in entries {
            match entry.kind {
                EntryKind::File => {
                    if entry.is_vim_script() {
                        result.files.push(entry);
                    }
                }
                EntryKind::Directory => {
                    if !plugin_dirs.covers(&entry.path) {
                        continue;
                    }

                    let child_path = entry.path.clone();
                    result.dirs.push(entry);

                    let child = fetch_tree(api, slug, reference, child_path, plugin_dirs)
                        .await
                        .map_err(|err| Error::Fetch {
                            path: path.clone(),
                            repo: slug.to_string(),
                            source: Box::new(err),
                        })?;
                    result.merge(child);
                }
                EntryKind::Other => {}
            }
        }

        Ok(result)
    }
    .boxed()
}

fn api_error(err: ApiError, slug: &Slug, path: &str) -> Error {
    match err {
        ApiError::NotFound(message) => Error::NotFound {
            path: path.to_string(),
            repo: slug.to_string(),
            message,
        },
        other => Error::Fetch {
            path: path.to_string(),
            repo: slug.to_string(),
            source: Box::new(other),
        },
    }
}

/// Fetches the whole plugin and sorts it by path.
///
/// Fails with `NoPluginFiles` if the repository holds no `.vim` file.
pub async fn fetch_plugin(
    api: &dyn ContentsApi,
    slug: &Slug,
    reference: Option<&str>,
    plugin_dirs: DirectorySet,
) -> Result<FetchResult> {
    let mut result = fetch_tree(api, slug, reference, String::new(), plugin_dirs).await?;

    if result.files.is_empty() {
        return Err(Error::NoPluginFiles(slug.to_string()));
    }

    result.sort_by_path();
    info!(
        repo = %slug,
        files = result.files.len(),
        dirs = result.dirs.len(),
        "fetched plugin tree"
    );

    Ok(result)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why BoxFuture for fetch_tree?
//    - An async fn that calls itself would have an infinitely sized future
//    - Boxing the future (.boxed()) gives it a fixed size on the heap
//    - BoxFuture<'a, T> is Pin<Box<dyn Future<Output = T> + Send + 'a>>
//
// 2. Why &dyn ContentsApi?
//    - The walk does not care whether it talks to GitHub or a test fake
//    - ContentsApi: Send + Sync, so the boxed future stays Send
// -----------------------------------------------------------------------------
