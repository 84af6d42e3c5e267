// src/plugin/dirs.rs
// =============================================================================
// Vim runtime directories we know about.
//
// - PLUGIN_DIRS: top-level directories a Vim plugin puts scripts in. The tree
//   walk only descends into these.
// - PREINSTALLED_DIRS: directories that already exist under vim.wasm's
//   /usr/local/share/vim, so they need no `dir` parameter unless the plugin
//   is installed into the persistent ~/.vim instead.
//
// `ftdetect` is a plugin directory but is not preinstalled.
// `compiler` is left out since vim.wasm cannot run shell commands.
// =============================================================================

/// An immutable set of top-level directory names
#[derive(Debug, Clone, Copy)]
pub struct DirectorySet(&'static [&'static str]);

pub const PLUGIN_DIRS: DirectorySet = DirectorySet(&[
    "autoload", "colors", "ftplugin", "indent", "plugin", "syntax", "ftdetect",
]);

pub const PREINSTALLED_DIRS: DirectorySet =
    DirectorySet(&["autoload", "colors", "ftplugin", "indent", "plugin", "syntax"]);

impl DirectorySet {
    /// Exact match against one of the names
    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|name| *name == path)
    }

    /// True if `path` is one of the names or nested under one
    pub fn covers(&self, path: &str) -> bool {
        self.0.iter().any(|name| {
            path == *name
                || path
                    .strip_prefix(name)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why &'static [&'static str]?
//    - The names are fixed at compile time, so the sets cost nothing to copy
//    - DirectorySet is Copy and can be passed by value into the async walk
//
// 2. Why not path.starts_with(name)?
//    - "pluginfoo" starts with "plugin" but is not inside plugin/
//    - covers() requires the next character to be '/'
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_dirs_cover_nested_paths() {
        assert!(PLUGIN_DIRS.covers("autoload"));
        assert!(PLUGIN_DIRS.covers("autoload/clever_f/migemo"));
        assert!(PLUGIN_DIRS.covers("ftdetect"));
        assert!(!PLUGIN_DIRS.covers("autoloadx"));
        assert!(!PLUGIN_DIRS.covers("doc"));
        assert!(!PLUGIN_DIRS.covers("test/autoload"));
        assert!(!PLUGIN_DIRS.covers("compiler"));
    }

    #[test]
    fn test_preinstalled_is_top_level_only() {
        assert!(PREINSTALLED_DIRS.contains("plugin"));
        assert!(!PREINSTALLED_DIRS.contains("plugin/sub"));
        assert!(!PREINSTALLED_DIRS.contains("ftdetect"));
    }
}
