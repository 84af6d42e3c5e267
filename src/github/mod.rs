// src/github/mod.rs
// =============================================================================
// This module fetches the files of a Vim plugin from a GitHub repository.
//
// Submodules:
// - types: entries returned by the contents API
// - client: the contents API trait and its reqwest implementation
// - fetch: the recursive tree walk and `owner/repo` slug parsing
// =============================================================================

mod client;
mod fetch;
mod types;

pub use client::{ContentsApi, GitHubClient};
pub use fetch::{fetch_plugin, Slug};
pub use types::RepoEntry;

#[cfg(test)]
pub(crate) use fetch::tests as fake;
