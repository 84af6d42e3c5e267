// src/main.rs
// =============================================================================
// This is the entry point of vimwasm-try-plugin.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging to stderr
// 3. Build the GitHub client (with GITHUB_TOKEN if it is set)
// 4. Run: fetch the plugin, build the URL, print or open it
// 5. Exit with 0 on success, 1 on any failure ("ERROR: ..." on stderr)
// =============================================================================

mod app;
mod cli;
mod error;
mod github;
mod plugin;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{RequestOptions, SystemBrowser};
use cli::Cli;
use github::GitHubClient;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version are not failures
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("ERROR: {}", usage_error(&e));
            std::process::exit(1);
        }
    };

    init_logging(cli.verbose);

    if let Err(e) = run(cli.into_options()).await {
        eprintln!("ERROR: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(options: RequestOptions) -> anyhow::Result<()> {
    let token = std::env::var("GITHUB_TOKEN")
        .ok()
        .filter(|token| !token.is_empty());
    let api = GitHubClient::new(token)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app::run(&options, &api, &SystemBrowser, &mut out).await
}

// clap renders multi-line errors; keep the run's one-line ERROR format
fn usage_error(e: &clap::Error) -> String {
    if e.kind() == ErrorKind::MissingRequiredArgument {
        return "one 'owner/repo' must be specified as first argument. Please read --help output"
            .to_string();
    }
    let message = e.to_string();
    message
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_string()
}

// Logs go to stderr so that --url output on stdout stays clean.
fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(verbose, rust_log.as_deref()))
        .try_init();
}

// RUST_LOG directives win when present. The level from --verbose is only the
// default for targets RUST_LOG does not mention.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(rust_log.unwrap_or_default())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why try_parse() instead of parse()?
//    - parse() exits with code 2 on bad arguments
//    - This tool reports every failure as "ERROR: ..." with exit code 1
//
// 2. What is EnvFilter?
//    - A tracing-subscriber filter built from directives like
//      "debug" or "vimwasm_try_plugin=trace,reqwest=warn"
//    - The default directive applies when RUST_LOG names nothing
// -----------------------------------------------------------------------------
