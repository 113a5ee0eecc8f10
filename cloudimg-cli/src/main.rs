//! cloudimg - query the published Ubuntu cloud-image release catalog

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cloudimg_core::catalog::{CatalogClient, UNKNOWN};

/// Environment override for the catalog endpoint.
const CATALOG_URL_ENV: &str = "CLOUDIMG_CATALOG_URL";

#[derive(Parser, Debug)]
#[clap(
    name = "cloudimg",
    about = "Query the published Ubuntu cloud-image release catalog",
    version,
    after_help = "Examples:\n    cloudimg --list-releases\n    cloudimg --hash 2025-04-03"
)]
struct Cli {
    /// List all supported Ubuntu releases
    #[clap(long)]
    list_releases: bool,

    /// Get the current Ubuntu LTS version
    #[clap(long)]
    current_lts: bool,

    /// Get the SHA256 hash digest of the 'disk1.img' file for a specific release
    #[clap(long, value_name = "RELEASE_DATE")]
    hash: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    ListReleases,
    CurrentLts,
    Hash(String),
}

impl Cli {
    /// Exactly one query flag must be selected; anything else is a
    /// usage error.
    fn action(&self) -> Option<Action> {
        match (self.list_releases, self.current_lts, &self.hash) {
            (true, false, None) => Some(Action::ListReleases),
            (false, true, None) => Some(Action::CurrentLts),
            (false, false, Some(date)) => Some(Action::Hash(date.clone())),
            _ => None,
        }
    }
}

/// Initialize tracing from `RUST_LOG`.
///
/// Logs go to stderr; stdout carries only the query output.
fn initialize_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Usage goes to stdout on both the help path (exit 0) and the bad
/// arguments path (exit 1).
fn print_usage_and_exit(code: i32) -> ! {
    let mut cmd = Cli::command();
    let _ = cmd.print_help();
    std::process::exit(code);
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            std::process::exit(0);
        }
        Err(_) => print_usage_and_exit(1),
    };

    initialize_tracing();

    let Some(action) = cli.action() else {
        print_usage_and_exit(1);
    };

    match run(action).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            // Diagnostic line and exit code are part of the external
            // contract; callers parse stdout.
            println!("Error : Unhandled Exception : {err}");
            std::process::exit(1);
        }
    }
}

async fn run(action: Action) -> Result<i32> {
    let mut client = CatalogClient::new();
    if let Ok(url) = std::env::var(CATALOG_URL_ENV) {
        tracing::debug!("catalog URL overridden: {url}");
        client = client.with_url(url);
    }

    match action {
        Action::ListReleases => {
            println!("Date           Version   Codename");
            println!("------------------------------------------");
            for row in client.supported_releases(None).await? {
                println!("{row}");
            }
            Ok(0)
        }
        Action::CurrentLts => {
            let version = client.current_lts_version().await?;
            println!("Current Ubuntu LTS version: {version}");
            Ok(0)
        }
        Action::Hash(date) => {
            let digest = client.disk1_sha256(&date).await?;
            println!("Hash SHA256 digest of file 'disk1.img' for release date {date}: {digest}");
            Ok(if digest == UNKNOWN { 1 } else { 0 })
        }
    }
}
