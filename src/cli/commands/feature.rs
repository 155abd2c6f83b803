//! Feature switch commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{print_formatted, print_status, print_success};
use crate::cli::{CliContext, OutputFormat};
use crate::dialog::Dialog;
use crate::site_status::{Feature, FeatureToggles};

fn parse_feature(name: &str) -> Result<Feature, String> {
    Feature::from_cli_name(name).ok_or_else(|| {
        let names: Vec<&str> = Feature::all().iter().map(|f| f.cli_name()).collect();
        format!("unknown feature '{}' (expected one of: {})", name, names.join(", "))
    })
}

#[derive(Subcommand, Debug)]
pub enum FeatureCommands {
    /// Show all feature switches
    Show,

    /// Turn a feature on
    Enable {
        #[arg(value_parser = parse_feature)]
        feature: Feature,
    },

    /// Turn a feature off
    Disable {
        #[arg(value_parser = parse_feature)]
        feature: Feature,
    },

    /// Flip a feature
    Toggle {
        #[arg(value_parser = parse_feature)]
        feature: Feature,
    },
}

#[derive(Serialize)]
struct FeatureRow {
    feature: &'static str,
    label: &'static str,
    enabled: bool,
}

pub async fn run(command: FeatureCommands, cli: &CliContext) -> Result<()> {
    match command {
        FeatureCommands::Show => show(cli).await,
        FeatureCommands::Enable { feature } => set(cli, feature, Some(true)).await,
        FeatureCommands::Disable { feature } => set(cli, feature, Some(false)).await,
        FeatureCommands::Toggle { feature } => set(cli, feature, None).await,
    }
}

async fn show(cli: &CliContext) -> Result<()> {
    let (_, services) = cli.connect()?;
    let toggles = FeatureToggles::from(&services.site.fetch_status().await?);

    let rows: Vec<FeatureRow> = Feature::all()
        .iter()
        .map(|&f| FeatureRow {
            feature: f.cli_name(),
            label: f.label(),
            enabled: toggles.get(f),
        })
        .collect();

    if cli.format == OutputFormat::Json {
        print_formatted(&rows, cli.format, |_| String::new());
    } else {
        for row in &rows {
            print_status(row.enabled, &format!("{} ({})", row.label, row.feature));
        }
    }

    Ok(())
}

/// `enabled = None` flips the current value
async fn set(cli: &CliContext, feature: Feature, enabled: Option<bool>) -> Result<()> {
    let (config, services) = cli.connect()?;
    let current = FeatureToggles::from(&services.site.fetch_status().await?);

    let target = enabled.unwrap_or(!current.get(feature));
    if current.get(feature) == target && enabled.is_some() {
        print_success(
            &format!("{} ist bereits {}.", feature.label(), state_word(target)),
            cli.quiet,
        );
        return Ok(());
    }

    let toggles = current.with(feature, target);
    tracing::info!("CLI: setting {:?} to {}", feature, target);

    if let Err(e) = services
        .site
        .update_feature_toggles(toggles, &config.console.actor)
        .await
    {
        tracing::error!("Feature update failed: {}", e);
        anyhow::bail!("{}", Dialog::feature_failed(feature).body());
    }

    print_success(
        &format!("{} ist jetzt {}.", feature.label(), state_word(target)),
        cli.quiet,
    );
    Ok(())
}

fn state_word(enabled: bool) -> &'static str {
    if enabled { "aktiviert" } else { "deaktiviert" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feature() {
        assert_eq!(parse_feature("gallery"), Ok(Feature::Gallery));
        assert_eq!(parse_feature("music-wishlist"), Ok(Feature::MusicWishlist));
        assert!(parse_feature("guestbook").unwrap_err().contains("stories"));
    }
}
