// src/cli.rs
// =============================================================================
// This file defines the command-line interface using the `clap` crate.
//
//   vimwasm-try-plugin [FLAGS] owner/repo [-- ARGS...]
//
// Everything after a literal `--` is passed on to Vim, so
//   vimwasm-try-plugin morhetz/gruvbox -- -c 'colorscheme gruvbox'
// ends up as `arg=-c&arg=colorscheme+gruvbox` in the URL.
// =============================================================================

use clap::Parser;

use crate::app::RequestOptions;

pub const DEFAULT_BASE_URL: &str = "https://rhysd.github.io/vim.wasm/";

const AFTER_HELP: &str = "\
vimwasm-try-plugin is a URL generator to try a Vim plugin hosted on GitHub with
https://rhysd.github.io/vim.wasm. Vim is compiled to WebAssembly and runs in
your browser. All plugin files are fetched into memory and loaded by Vim, so
you can try a plugin or colorscheme without installing it.

Example: Open vim.wasm URL including clever-f.vim plugin

  $ vimwasm-try-plugin 'rhysd/clever-f.vim'

Example: Load and apply gruvbox colorscheme

  $ vimwasm-try-plugin 'morhetz/gruvbox' -- -c 'colorscheme gruvbox'

Set GITHUB_TOKEN to raise the GitHub API rate limit.";

#[derive(Parser, Debug)]
#[command(
    name = "vimwasm-try-plugin",
    version,
    about = "Try a Vim plugin hosted on GitHub in your browser with vim.wasm",
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Repository of the plugin in owner/repo format
    pub repo: String,

    /// Base URL where vim.wasm is hosted
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base: String,

    /// Enable debug logging in vim.wasm
    #[arg(long)]
    pub debug: bool,

    /// Print URL to stdout instead of opening it in browser
    #[arg(long)]
    pub url: bool,

    /// Name of commit/branch/tag such as 'master', 'd2f17bb', 'v1.0.0'
    #[arg(long, value_name = "REF")]
    pub revision: Option<String>,

    /// Use ~/.vim instead of /usr/local/share/vim for persistently installing the plugin
    #[arg(long)]
    pub persistent: bool,

    /// Log what the tool is doing to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Extra arguments for Vim, given after `--`
    #[arg(last = true, value_name = "ARGS")]
    pub extra_args: Vec<String>,
}

impl Cli {
    pub fn into_options(self) -> RequestOptions {
        RequestOptions {
            repo: self.repo,
            base_url: self.base,
            // An empty --revision means the default branch
            revision: self.revision.filter(|r| !r.is_empty()),
            debug: self.debug,
            persistent: self.persistent,
            print_url: self.url,
            extra_args: self.extra_args,
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[arg(last = true)] do?
//    - The field only takes values that come after a literal `--`
//    - So `-c` after `--` is a Vim argument, not an unknown flag
//
// 2. Why convert Cli into RequestOptions?
//    - Cli mirrors the command line, RequestOptions is what a run needs
//    - Tests can build RequestOptions directly without parsing arguments
// -----------------------------------------------------------------------------
