#![warn(missing_docs)]
//! # phish-guard binary
//!
//! Terminal entry point running the popup and page-context flows against a
//! live analysis backend.

use std::process::ExitCode;
use std::sync::mpsc;

use clap::{Parser, Subcommand};
use phish_guard_app::{
    AppConfig, AppError, ENDPOINT_ENV, PageOutcome, PageReporter, PopupController, ScanOutcome,
    TIMEOUT_ENV, app_version, deliver_messages,
};
use phish_guard_relay::{IconSet, RelayOutcome, StatusRelay};
use phish_guard_render::PageDocument;
use tracing_subscriber::prelude::*;

/// Classify URLs with a phishing analysis backend.
#[derive(Parser)]
#[command(name = "phish-guard", version = app_version(), about)]
struct Cli {
    /// Backend base URL (`/analyze` is appended).
    #[arg(long, global = true, env = ENDPOINT_ENV)]
    endpoint: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, global = true, env = TIMEOUT_ENV)]
    timeout_ms: Option<u64>,

    /// Enable debug logging (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Popup flow: scan a URL and print the status summary.
    Scan {
        /// URL of the active tab.
        url: String,
        /// Print the popup HTML fragment instead of text.
        #[arg(long)]
        html: bool,
    },
    /// Page-context flow: analyse a loaded page and print any banner.
    Page {
        /// URL of the loaded page.
        url: String,
    },
}

/// CLI entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(error = %error, "phish-guard failed");
            eprintln!("phish-guard: {error}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let config = AppConfig::new(cli.endpoint, cli.timeout_ms)?;
    tracing::debug!(
        backend = %config.backend_url,
        timeout_ms = config.timeout.as_millis() as u64,
        "configuration resolved"
    );
    let client = config.build_client()?;

    match cli.command {
        Command::Scan { url, html } => {
            let mut popup = PopupController::new(client);
            let outcome = popup.scan(&url);
            if html {
                println!("{}", popup.render_html());
            } else {
                print!("{}", popup.render_text());
            }
            Ok(match outcome {
                ScanOutcome::Completed(_) => ExitCode::SUCCESS,
                ScanOutcome::Failed(_) | ScanOutcome::Busy => ExitCode::FAILURE,
            })
        }
        Command::Page { url } => {
            let mut relay = StatusRelay::new();
            relay.on_installed();

            let (outbox, inbox) = mpsc::channel();
            let mut reporter = PageReporter::new(client, url, PageDocument::default(), outbox);
            let outcome = reporter.initialize()?;

            for relay_outcome in deliver_messages(&mut relay, &inbox) {
                if let RelayOutcome::IconChanged(icons) = relay_outcome {
                    print_icons(&icons);
                }
            }

            match &outcome {
                PageOutcome::BannerShown => {
                    if let Some(banner) = reporter.document().banner_html() {
                        println!("{banner}");
                    }
                }
                PageOutcome::NoBanner(severity) => println!("no banner ({severity})"),
                PageOutcome::Failed(message) => println!("analysis failed: {message}"),
            }
            println!("icon state: {:?}", relay.state());

            Ok(match outcome {
                PageOutcome::Failed(_) => ExitCode::FAILURE,
                _ => ExitCode::SUCCESS,
            })
        }
    }
}

fn print_icons(icons: &IconSet) {
    for (size, path) in &icons.paths {
        println!("icon {size}px -> {path}");
    }
}
