//! ConnHub CLI - share text and files with every browser on your LAN
//!
//! ConnHub serves a small web page that keeps one text buffer and a list of
//! uploaded files in sync across all connected browsers.
//!
//! ## Quick Start
//!
//! ```bash
//! # Start the server on the default port (8000)
//! connhub serve
//!
//! # Then open the printed URL on any device on the same network
//! ```

#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::Parser;

mod commands;

use commands::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => commands::serve::run(args).await,
        Command::Restore(args) => commands::restore::run(args).await,
        Command::Config(args) => commands::config::run(args),
        Command::Completions(args) => {
            commands::completions::run(args.shell);
            Ok(())
        }
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,connhub=info,connhub_core=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
