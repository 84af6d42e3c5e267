// src/github/types.rs
// =============================================================================
// Data model for entries returned by the GitHub contents API.
//
// `GET /repos/{owner}/{repo}/contents/{path}` answers with either:
// - a JSON object, when `path` is a file
// - a JSON array, when `path` is a directory (one object per child)
//
// Rust concepts:
// - #[serde(untagged)]: try each enum variant until one deserializes
// - #[serde(other)]: catch-all variant for values we don't care about
// =============================================================================

use serde::Deserialize;

/// Kind of a repository entry. Symlinks and submodules fold into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EntryKind {
    #[serde(rename = "file")]
    File,
    #[serde(rename = "dir")]
    Directory,
    #[serde(other)]
    Other,
}

/// One node of the repository tree, immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoEntry {
    /// Final path segment, e.g. "clever_f.vim"
    pub name: String,
    /// Repository-relative, slash-separated path, e.g. "autoload/clever_f.vim"
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Raw content URL at the requested revision (files only)
    #[serde(default)]
    pub download_url: Option<String>,
}

#[cfg(test)]
impl RepoEntry {
    pub fn file(path: &str, download_url: &str) -> Self {
        RepoEntry {
            name: final_segment(path).to_string(),
            path: path.to_string(),
            kind: EntryKind::File,
            download_url: Some(download_url.to_string()),
        }
    }

    pub fn dir(path: &str) -> Self {
        RepoEntry {
            name: final_segment(path).to_string(),
            path: path.to_string(),
            kind: EntryKind::Directory,
            download_url: None,
        }
    }
}

impl RepoEntry {
    /// True for files whose name ends with `.vim`
    pub fn is_vim_script(&self) -> bool {
        self.kind == EntryKind::File && self.name.ends_with(".vim")
    }

    pub fn download_url(&self) -> &str {
        self.download_url.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
fn final_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Body of a contents API response
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Contents {
    Listing(Vec<RepoEntry>),
    Single(RepoEntry),
}

/// Vim script files and plugin directories found in a repository.
///
/// Both sequences are sorted by path (byte-wise, ascending) once
/// `sort_by_path` has run; the walk itself keeps listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResult {
    pub files: Vec<RepoEntry>,
    pub dirs: Vec<RepoEntry>,
}

impl FetchResult {
    pub fn merge(&mut self, other: FetchResult) {
        self.files.extend(other.files);
        self.dirs.extend(other.dirs);
    }

    pub fn sort_by_path(&mut self) {
        self.files.sort_by(|a, b| a.path.as_bytes().cmp(b.path.as_bytes()));
        self.dirs.sort_by(|a, b| a.path.as_bytes().cmp(b.path.as_bytes()));
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Option<String> for download_url?
//    - GitHub sends null for directories
//    - #[serde(default)] also accepts the field being missing
//
// 2. Why compare path.as_bytes()?
//    - It makes the byte-wise order explicit: "Z" (0x5A) sorts before "a"
//    - "clever_f.vim" sorts before "clever_f/" because '.' < '/'
// -----------------------------------------------------------------------------
