// src/app.rs
// =============================================================================
// One run of the tool: fetch -> build -> output.
//
// What happens here:
// 1. Check the `owner/repo` slug and the --base URL (no network yet)
// 2. Walk the repository through the contents API
// 3. Build the vim.wasm URL
// 4. Print it (--url) or open it in the default browser
//
// The contents API and the browser are passed in, so tests can run the
// whole flow without network access or a desktop.
// =============================================================================

use anyhow::{Context, Result};
use std::io::Write;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::github::{self, ContentsApi, Slug};
use crate::plugin::{self, PLUGIN_DIRS};

/// Inputs of one run, read-only once built from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// `owner/repo`
    pub repo: String,
    pub base_url: String,
    /// Commit, branch or tag. `None` means the default branch
    pub revision: Option<String>,
    pub debug: bool,
    pub persistent: bool,
    /// Print the URL instead of opening a browser
    pub print_url: bool,
    /// Passed to Vim as command line arguments
    pub extra_args: Vec<String>,
}

/// Opens a URL somewhere a human can see it
pub trait Launcher {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// The system's default browser
pub struct SystemBrowser;

impl Launcher for SystemBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        open::that(url)
    }
}

pub async fn run(
    options: &RequestOptions,
    api: &dyn ContentsApi,
    launcher: &dyn Launcher,
    out: &mut dyn Write,
) -> Result<()> {
    let slug = Slug::parse(&options.repo)?;
    plugin::validate_base_url(&options.base_url)?;

    let plugin = match github::fetch_plugin(api, &slug, options.revision.as_deref(), PLUGIN_DIRS)
        .await
    {
        Ok(plugin) => plugin,
        Err(err) => {
            if err.not_found().is_some() {
                warn!(repo = %slug, "check the repository name and --revision");
            }
            return Err(anyhow::Error::new(err).context("could not fetch Vim plugin"));
        }
    };

    let url = plugin::build_url(&plugin.files, &plugin.dirs, options)
        .context("could not build URL to open")?;
    debug!(%url, "built URL");

    if options.print_url {
        write!(out, "{}", url)?;
        out.flush()?;
        return Ok(());
    }

    info!(%url, "opening browser");
    launcher.open(&url).map_err(Error::BrowserLaunch)?;
    Ok(())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why `&mut dyn Write` instead of println!?
//    - main.rs passes a locked stdout, tests pass a Vec<u8>
//    - write! does not add a newline, so the URL is printed as-is
//
// 2. What does .context() do?
//    - It wraps an error in a message that names the step that failed
//    - main.rs prints the whole chain with {:#}:
//      "could not fetch Vim plugin: file path \"\" of repository ... not found"
//
// 3. Why check the slug and --base before fetching?
//    - Both are cheap local checks
//    - A typo should not cost a round of GitHub API requests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::fake::{clever_f, FakeApi};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingLauncher {
        opened: RefCell<Vec<String>>,
        fail: bool,
    }

    impl Launcher for RecordingLauncher {
        fn open(&self, url: &str) -> std::io::Result<()> {
            if self.fail {
                return Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no browser"));
            }
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    fn options() -> RequestOptions {
        RequestOptions {
            repo: "rhysd/clever-f.vim".to_string(),
            base_url: "https://rhysd.github.io/vim.wasm/".to_string(),
            print_url: true,
            ..RequestOptions::default()
        }
    }

    async fn run_to_string(options: &RequestOptions, api: &FakeApi) -> Result<String> {
        let launcher = RecordingLauncher::default();
        let mut out = Vec::new();
        run(options, api, &launcher, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    const CLEVER_F: &str = "https://rhysd.github.io/vim.wasm/?dir=%2Fusr%2Flocal%2Fshare%2Fvim%2Fautoload%2Fclever_f&dir=%2Fusr%2Flocal%2Fshare%2Fvim%2Fautoload%2Fclever_f%2Fmigemo&file=%2Fusr%2Flocal%2Fshare%2Fvim%2Fautoload%2Fclever_f.vim%3Dhttps%3A%2F%2Fraw.githubusercontent.com%2Frhysd%2Fclever-f.vim%2Fmaster%2Fautoload%2Fclever_f.vim&file=%2Fusr%2Flocal%2Fshare%2Fvim%2Fautoload%2Fclever_f%2Fcompat.vim%3Dhttps%3A%2F%2Fraw.githubusercontent.com%2Frhysd%2Fclever-f.vim%2Fmaster%2Fautoload%2Fclever_f%2Fcompat.vim&file=%2Fusr%2Flocal%2Fshare%2Fvim%2Fautoload%2Fclever_f%2Fmigemo%2Fcp932.vim%3Dhttps%3A%2F%2Fraw.githubusercontent.com%2Frhysd%2Fclever-f.vim%2Fmaster%2Fautoload%2Fclever_f%2Fmigemo%2Fcp932.vim&file=%2Fusr%2Flocal%2Fshare%2Fvim%2Fautoload%2Fclever_f%2Fmigemo%2Feucjp.vim%3Dhttps%3A%2F%2Fraw.githubusercontent.com%2Frhysd%2Fclever-f.vim%2Fmaster%2Fautoload%2Fclever_f%2Fmigemo%2Feucjp.vim&file=%2Fusr%2Flocal%2Fshare%2Fvim%2Fautoload%2Fclever_f%2Fmigemo%2Futf8.vim%3Dhttps%3A%2F%2Fraw.githubusercontent.com%2Frhysd%2Fclever-f.vim%2Fmaster%2Fautoload%2Fclever_f%2Fmigemo%2Futf8.vim&file=%2Fusr%2Flocal%2Fshare%2Fvim%2Fplugin%2Fclever-f.vim%3Dhttps%3A%2F%2Fraw.githubusercontent.com%2Frhysd%2Fclever-f.vim%2Fmaster%2Fplugin%2Fclever-f.vim";

    #[tokio::test]
    async fn test_print_clever_f() {
        let printed = run_to_string(&options(), &clever_f()).await.unwrap();
        assert_eq!(printed, CLEVER_F);
        assert!(!printed.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_persistent_clever_f() {
        let opts = RequestOptions {
            persistent: true,
            ..options()
        };
        let printed = run_to_string(&opts, &clever_f()).await.unwrap();
        assert!(printed.starts_with(
            "https://rhysd.github.io/vim.wasm/?dir=%2Fhome%2Fweb_user%2F.vim%2Fautoload&dir=%2Fhome%2Fweb_user%2F.vim%2Fautoload%2Fclever_f&dir=%2Fhome%2Fweb_user%2F.vim%2Fautoload%2Fclever_f%2Fmigemo&dir=%2Fhome%2Fweb_user%2F.vim%2Fplugin&file="
        ));
    }

    #[tokio::test]
    async fn test_opens_browser_without_print_flag() {
        let opts = RequestOptions {
            print_url: false,
            ..options()
        };
        let launcher = RecordingLauncher::default();
        let mut out = Vec::new();
        run(&opts, &clever_f(), &launcher, &mut out).await.unwrap();

        assert!(out.is_empty());
        assert_eq!(launcher.opened.borrow().as_slice(), [CLEVER_F.to_string()]);
    }

    #[tokio::test]
    async fn test_browser_failure_is_reported() {
        let opts = RequestOptions {
            print_url: false,
            ..options()
        };
        let launcher = RecordingLauncher {
            fail: true,
            ..RecordingLauncher::default()
        };
        let mut out = Vec::new();
        let err = run(&opts, &clever_f(), &launcher, &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::BrowserLaunch(_))));
        assert_eq!(format!("{:#}", err), "could not open URL with browser: no browser");
    }

    #[tokio::test]
    async fn test_invalid_slug_fails_before_network() {
        for repo in ["foo", ""] {
            let api = clever_f();
            let opts = RequestOptions {
                repo: repo.to_string(),
                ..options()
            };
            let err = run_to_string(&opts, &api).await.unwrap_err();

            assert!(matches!(
                err.downcast_ref::<Error>(),
                Some(Error::InvalidRepositorySlug(_))
            ));
            assert!(err.to_string().contains(&format!("repository {:?} is invalid", repo)));
            assert!(api.requested_paths().is_empty());
        }
    }

    #[tokio::test]
    async fn test_unsupported_scheme_fails_before_network() {
        let api = clever_f();
        let opts = RequestOptions {
            base_url: "file://localhost/vim.wasm".to_string(),
            ..options()
        };
        let err = run_to_string(&opts, &api).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::UnsupportedScheme(s)) if s == "file"
        ));
        assert!(api.requested_paths().is_empty());
    }

    #[tokio::test]
    async fn test_no_plugin_files_names_repository() {
        let api = FakeApi::default().with(
            "",
            vec![crate::github::RepoEntry::file("main.go", "https://example.com/main.go")],
        );
        let opts = RequestOptions {
            repo: "rhysd/vimwasm-try-plugin".to_string(),
            ..options()
        };
        let err = run_to_string(&opts, &api).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::NoPluginFiles(repo)) if repo == "rhysd/vimwasm-try-plugin"
        ));
        assert_eq!(
            format!("{:#}", err),
            "could not fetch Vim plugin: repository \"rhysd/vimwasm-try-plugin\" contains no Vim script file (filename ends with .vim)"
        );
    }

    #[tokio::test]
    async fn test_missing_revision_is_not_found() {
        let api = FakeApi::default();
        let opts = RequestOptions {
            revision: Some("this-ref-does-not-exist".to_string()),
            ..options()
        };
        let err = run_to_string(&opts, &api).await.unwrap_err();

        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NotFound { .. })));
        assert!(format!("{:#}", err).starts_with("could not fetch Vim plugin: "));
    }

    #[tokio::test]
    async fn test_extra_args_come_first() {
        let opts = RequestOptions {
            extra_args: vec!["-c".to_string(), "colorscheme spring-night".to_string()],
            ..options()
        };
        let printed = run_to_string(&opts, &clever_f()).await.unwrap();
        assert!(printed.starts_with(
            "https://rhysd.github.io/vim.wasm/?arg=-c&arg=colorscheme+spring-night&dir="
        ));
    }
}
