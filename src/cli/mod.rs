//! CLI module for the admin console
//!
//! Provides command-line access to every admin operation. Without a
//! subcommand the GUI is started.

mod commands;
mod output;

use clap::{Parser, Subcommand};

use crate::backend::Services;
use crate::config::Config;

pub use output::OutputFormat;

/// WeddingPix Admin - wedding gallery admin console
#[derive(Parser, Debug)]
#[command(name = "weddingpix-admin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[command(flatten)]
    pub output: OutputOptions,

    /// Use the offline demo backend instead of the configured server
    #[arg(long, global = true)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output formatting options
#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// Output in JSON format (for machine parsing)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl OutputOptions {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Public access of the website
    Status {
        #[command(subcommand)]
        command: commands::status::StatusCommands,
    },

    /// Gallery, music wishlist and stories switches
    Feature {
        #[command(subcommand)]
        command: commands::feature::FeatureCommands,
    },

    /// Uploaded media and ZIP download
    Media {
        #[command(subcommand)]
        command: commands::media::MediaCommands,
    },

    /// Photo-book services
    Services {
        #[command(subcommand)]
        command: commands::services::ServicesCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },
}

/// Settings shared by all commands
pub struct CliContext {
    pub format: OutputFormat,
    pub quiet: bool,
    pub demo: bool,
}

impl CliContext {
    /// Load config and connect to the backend (or the demo store)
    pub fn connect(&self) -> anyhow::Result<(Config, Services)> {
        let config = Config::load()?;
        let services = Services::from_config(&config.backend, self.demo)?;
        Ok((config, services))
    }
}

/// Run the CLI with a parsed command
pub async fn run(command: Commands, cli: CliContext) -> anyhow::Result<()> {
    match command {
        Commands::Status { command } => commands::status::run(command, &cli).await,
        Commands::Feature { command } => commands::feature::run(command, &cli).await,
        Commands::Media { command } => commands::media::run(command, &cli).await,
        Commands::Services { command } => commands::services::run(command, &cli).await,
        Commands::Config { command } => commands::config::run(command, &cli).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_opens_gui() {
        let cli = Cli::try_parse_from(["weddingpix-admin", "--demo"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.demo);
    }

    #[test]
    fn test_parses_feature_toggle() {
        let cli =
            Cli::try_parse_from(["weddingpix-admin", "feature", "toggle", "music-wishlist", "--json"])
                .unwrap();
        assert_eq!(cli.output.format(), OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Some(Commands::Feature {
                command: commands::feature::FeatureCommands::Toggle { .. }
            })
        ));
    }

    #[test]
    fn test_rejects_unknown_feature() {
        assert!(Cli::try_parse_from(["weddingpix-admin", "feature", "enable", "guestbook"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
