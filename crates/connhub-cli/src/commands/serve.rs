//! Serve command implementation.

use anyhow::Result;

use connhub_core::config::Config;
use connhub_core::web::WebServer;

use super::ServeArgs;

/// Run the serve command.
pub async fn run(args: ServeArgs) -> Result<()> {
    let config = apply_overrides(super::load_config(), args);
    let port = config.server.port;

    let server = match WebServer::bind(config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server on port {}: {}", port, e);
            if let Some(hint) = e.suggestion() {
                eprintln!();
                eprintln!("{hint}");
                eprintln!();
            }
            return Err(e.into());
        }
    };

    println!();
    println!("ConnHub v{}", connhub_core::VERSION);
    println!("{}", "-".repeat(40));
    println!();
    for url in server.addresses()? {
        tracing::info!("Listening on {}", url);
        println!("  {url}");
    }
    println!();
    println!("  Staging: {}", server.state().store.root().display());
    println!();
    println!("Press Ctrl+C to stop the server.");

    server.run(shutdown_signal()).await?;

    println!();
    println!("Server stopped.");

    Ok(())
}

/// Command-line arguments take precedence over the config file.
fn apply_overrides(mut config: Config, args: ServeArgs) -> Config {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.localhost_only {
        config.server.localhost_only = true;
    }
    if let Some(dir) = args.temp_dir {
        config.storage.temp_dir = dir;
    }
    config
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
