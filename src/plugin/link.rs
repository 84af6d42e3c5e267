// src/plugin/link.rs
// =============================================================================
// Builds the vim.wasm URL that loads a plugin.
//
// vim.wasm reads its startup files from query parameters:
//   dir=<path>          create a directory in the virtual filesystem
//   file=<path>=<url>   fetch <url> and write it to <path>
//   arg=<value>         pass <value> as a Vim command line argument
//   debug               enable debug logging in vim.wasm
//
// Files land either in /usr/local/share/vim (thrown away on reload) or in
// /home/web_user/.vim (kept in the browser with --persistent).
//
// Example, plugin/foo.vim with default options:
//   https://rhysd.github.io/vim.wasm/?file=%2Fusr%2Flocal%2Fshare%2Fvim%2Fplugin%2Ffoo.vim%3D...
//
// Rust concepts:
// - BTreeMap: a map that iterates its keys in sorted order
// - url::form_urlencoded: application/x-www-form-urlencoded encoding
// - url::Position: slicing a parsed URL into its parts
// =============================================================================

use std::collections::BTreeMap;
use url::{form_urlencoded, Position, Url};

use super::dirs::PREINSTALLED_DIRS;
use crate::app::RequestOptions;
use crate::error::{Error, Result};
use crate::github::RepoEntry;

// Where plugin files go inside vim.wasm's virtual filesystem
pub const SYSTEM_PREFIX: &str = "/usr/local/share/vim";
pub const PERSISTENT_PREFIX: &str = "/home/web_user/.vim";

/// Parses the --base URL and checks it is http(s)
pub fn validate_base_url(base: &str) -> Result<Url> {
    // Url::parse rejects things like ":localhost:1234" (no scheme)
    let url = Url::parse(base).map_err(|source| Error::InvalidBaseUrl {
        url: base.to_string(),
        source,
    })?;

    // vim.wasm is served over the web; file://, ftp:// etc. can't host it
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::UnsupportedScheme(other.to_string())),
    }
}

/// Builds the URL to open. `files` and `dirs` must be sorted by path.
///
/// A directory gets a `dir` parameter when it contains at least one of
/// `files` and, outside persistent mode, is not one of the preinstalled
/// top-level directories. Pure: the same inputs give the same string.
pub fn build_url(
    files: &[RepoEntry],
    dirs: &[RepoEntry],
    options: &RequestOptions,
) -> Result<String> {
    let mut url = validate_base_url(&options.base_url)?;

    // Persistent installs survive a page reload; system ones do not
    let prefix = if options.persistent {
        PERSISTENT_PREFIX
    } else {
        SYSTEM_PREFIX
    };

    // Keys come out sorted, values keep insertion order per key:
    //   arg < debug < dir < file
    let mut params: BTreeMap<&str, Vec<String>> = BTreeMap::new();

    // `debug` is a flag; only its presence matters
    if options.debug {
        params.entry("debug").or_default().push(String::new());
    }

    for dir in dirs {
        // Nothing would be written into it
        if !contains_any_file(&dir.path, files) {
            continue;
        }
        // Already exists under /usr/local/share/vim
        if !options.persistent && PREINSTALLED_DIRS.contains(&dir.path) {
            continue;
        }
        params
            .entry("dir")
            .or_default()
            .push(format!("{}/{}", prefix, dir.path));
    }

    // "<destination>=<source>": vim.wasm splits on the first '='
    for file in files {
        params
            .entry("file")
            .or_default()
            .push(format!("{}/{}={}", prefix, file.path, file.download_url()));
    }

    for arg in &options.extra_args {
        params.entry("arg").or_default().push(arg.clone());
    }

    // Space becomes '+', everything outside [A-Za-z0-9*-._] is %XX
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, values) in &params {
        for value in values {
            query.append_pair(key, value);
        }
    }
    let query = query.finish();

    // Any query already on --base is replaced; the fragment stays
    url.set_query(if query.is_empty() { None } else { Some(query.as_str()) });

    Ok(serialize_like_typed(&url, &options.base_url))
}

// True if `file` lives somewhere below `dir`. "autoload/fo" does not
// contain "autoload/foo.vim".
fn contains_any_file(dir: &str, files: &[RepoEntry]) -> bool {
    files.iter().any(|file| {
        file.path
            .strip_prefix(dir)
            .is_some_and(|rest| rest.starts_with('/'))
    })
}

// Url always serializes an empty http(s) path as "/". When the user typed
// no path at all ("http://localhost:1234"), drop that slash again so the
// output reads "http://localhost:1234?file=...".
fn serialize_like_typed(url: &Url, typed: &str) -> String {
    let typed = typed.trim();
    let before_query = typed.split(['?', '#']).next().unwrap_or(typed);
    let typed_no_path = before_query
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.contains('/'));

    if typed_no_path && url.path() == "/" {
        format!("{}{}", &url[..Position::BeforePath], &url[Position::AfterPath..])
    } else {
        url.to_string()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why BTreeMap instead of HashMap?
//    - HashMap iterates in a random order, so the URL would change between
//      runs
//    - BTreeMap iterates keys sorted, which gives arg, debug, dir, file
//    - Each key maps to a Vec, so repeated values keep the order we pushed
//
// 2. Why not format the query by hand?
//    - Values contain '/', ':', '=' and spaces that must be escaped
//    - form_urlencoded::Serializer does the escaping and the '&' joining
//
// 3. What is &url[..Position::BeforePath]?
//    - Url implements Index for ranges of Position
//    - It slices the serialized URL at component boundaries, e.g.
//      "http://localhost:1234" is everything before the path
// -----------------------------------------------------------------------------
