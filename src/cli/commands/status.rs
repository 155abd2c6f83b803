//! Site status commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{confirm, print_formatted, print_success};
use crate::cli::CliContext;
use crate::dialog::Dialog;
use crate::site_status::{status_label, Feature, FeatureToggles, SiteStatus};

#[derive(Subcommand, Debug)]
pub enum StatusCommands {
    /// Show whether the website is locked and which features are on
    Show,

    /// Lock the website (visitors see the under construction page)
    Lock {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Unlock the website for all visitors
    Unlock {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Serialize)]
struct StatusResult {
    label: String,
    #[serde(flatten)]
    status: SiteStatus,
}

pub async fn run(command: StatusCommands, cli: &CliContext) -> Result<()> {
    match command {
        StatusCommands::Show => show(cli).await,
        StatusCommands::Lock { yes } => set(cli, true, yes).await,
        StatusCommands::Unlock { yes } => set(cli, false, yes).await,
    }
}

async fn show(cli: &CliContext) -> Result<()> {
    let (_, services) = cli.connect()?;
    let status = services.site.fetch_status().await?;

    let result = StatusResult {
        label: status_label(Some(&status)).to_string(),
        status,
    };

    print_formatted(&result, cli.format, |r| {
        let toggles = FeatureToggles::from(&r.status);
        let mut lines = vec![r.label.clone()];
        for &feature in Feature::all() {
            let state = if toggles.get(feature) {
                "Aktiviert"
            } else {
                "Deaktiviert"
            };
            lines.push(format!("  {:<16} {}", feature.label(), state));
        }
        if let Some(at) = r.status.last_updated {
            lines.push(format!(
                "Zuletzt geändert: {} von {}",
                at.with_timezone(&chrono::Local).format("%d.%m.%Y %H:%M"),
                r.status.updated_by.as_deref().unwrap_or("unbekannt")
            ));
        }
        lines.join("\n")
    });

    Ok(())
}

async fn set(cli: &CliContext, under_construction: bool, yes: bool) -> Result<()> {
    let (config, services) = cli.connect()?;
    let current = services.site.fetch_status().await?;

    if current.is_under_construction == under_construction {
        print_success(
            &format!("Website ist bereits {}.", current.access_word().to_lowercase()),
            cli.quiet,
        );
        return Ok(());
    }

    // Same wording as the console's confirmation dialog
    let question = Dialog::confirm_site_status(current.is_under_construction);
    if !confirm(question.body(), yes)? {
        print_success("Abgebrochen.", cli.quiet);
        return Ok(());
    }

    let actor = &config.console.actor;
    tracing::info!(
        "CLI: setting under_construction={} as {}",
        under_construction,
        actor
    );

    match services
        .site
        .update_site_status(under_construction, actor)
        .await
    {
        Ok(()) => {
            print_success(
                Dialog::site_status_updated(under_construction).body(),
                cli.quiet,
            );
            Ok(())
        }
        Err(e) => {
            let failure = Dialog::site_status_failed(under_construction, &e.to_string());
            anyhow::bail!("{}", failure.body())
        }
    }
}
