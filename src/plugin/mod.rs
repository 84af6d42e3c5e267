// src/plugin/mod.rs
// =============================================================================
// This module turns a fetched plugin into a vim.wasm URL.
//
// Submodules:
// - dirs: the known Vim runtime directory sets
// - link: query parameter construction against the --base URL
// =============================================================================

mod dirs;
mod link;

pub use dirs::{DirectorySet, PLUGIN_DIRS};
pub use link::{build_url, validate_base_url};
