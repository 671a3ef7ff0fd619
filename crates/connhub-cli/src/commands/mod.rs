//! CLI command definitions and handlers.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub mod completions;
pub mod config;
pub mod restore;
pub mod serve;

/// Load configuration with graceful fallback to defaults.
///
/// A missing or unreadable config file never stops the server from starting.
pub fn load_config() -> connhub_core::config::Config {
    connhub_core::config::Config::load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring config file: {}", e);
        connhub_core::config::Config::default()
    })
}

/// ConnHub - share text and files with every browser on your local network
#[derive(Parser)]
#[command(name = "connhub")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand)]
pub enum Command {
    /// Start the web server
    Serve(ServeArgs),

    /// Rename hex-named files left in a staging directory back to their
    /// original names
    Restore(RestoreArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Print shell completions to stdout
    Completions(CompletionsArgs),
}

/// Arguments for the serve command
#[derive(Parser)]
pub struct ServeArgs {
    /// Port to listen on (defaults to the configured port, 8000)
    pub port: Option<u16>,

    /// Only accept connections from this machine
    #[arg(long)]
    pub localhost_only: bool,

    /// Staging directory for uploads (wiped at startup)
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,
}

/// Arguments for the restore command
#[derive(Parser)]
pub struct RestoreArgs {
    /// Staging directory to restore
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,
}

/// Arguments for the config command
#[derive(Parser)]
pub struct ConfigArgs {
    /// Config action
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config actions
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Print the config file location
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Arguments for the completions command
#[derive(Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: ShellType,
}

/// Supported shell types
#[derive(Clone, Copy, ValueEnum)]
pub enum ShellType {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["connhub", "serve"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, None);
        assert!(!args.localhost_only);
        assert!(args.temp_dir.is_none());
    }

    #[test]
    fn test_serve_with_port_and_flags() {
        let cli = Cli::parse_from([
            "connhub",
            "serve",
            "9000",
            "--localhost-only",
            "--temp-dir",
            "/tmp/hub",
        ]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, Some(9000));
        assert!(args.localhost_only);
        assert_eq!(args.temp_dir, Some(PathBuf::from("/tmp/hub")));
    }

    #[test]
    fn test_serve_rejects_bad_port() {
        assert!(Cli::try_parse_from(["connhub", "serve", "99999"]).is_err());
    }
}
