//! Photo-book service commands

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::app_data::ServiceCatalog;
use crate::cli::output::{print_formatted, print_success};
use crate::cli::CliContext;
use crate::config::Config;

#[derive(Subcommand, Debug)]
pub enum ServicesCommands {
    /// List the photo-book services
    List,

    /// Open a service's website in the browser
    Open {
        /// Service name or prefix, e.g. "cewe" or "mein"
        name: String,
    },
}

pub async fn run(command: ServicesCommands, cli: &CliContext) -> Result<()> {
    let config = Config::load()?;
    let path = config.catalog.path.as_ref().map(PathBuf::from);
    let catalog = ServiceCatalog::load_or_builtin(path.as_deref());

    match command {
        ServicesCommands::List => list(&catalog, cli),
        ServicesCommands::Open { name } => open_service(&catalog, &name, cli),
    }
}

#[derive(Serialize)]
struct ServiceRow<'a> {
    name: &'a str,
    url: &'a str,
    price: &'a str,
    free: bool,
    features: &'a [String],
}

fn list(catalog: &ServiceCatalog, cli: &CliContext) -> Result<()> {
    let rows: Vec<ServiceRow<'_>> = catalog
        .services
        .iter()
        .map(|s| ServiceRow {
            name: &s.name,
            url: &s.url,
            price: &s.price,
            free: s.free,
            features: &s.features,
        })
        .collect();

    print_formatted(&rows, cli.format, |rows| {
        let mut lines = vec![catalog.title.clone()];
        for row in rows {
            lines.push(format!(
                "  {:<16} {:<12} {}{}",
                row.name,
                row.price,
                row.url,
                if row.free { "  (kostenlos)" } else { "" }
            ));
        }
        if !catalog.tip.is_empty() {
            lines.push(String::new());
            lines.push(catalog.tip.clone());
        }
        lines.join("\n")
    });

    Ok(())
}

fn open_service(catalog: &ServiceCatalog, name: &str, cli: &CliContext) -> Result<()> {
    let Some(service) = catalog.find(name) else {
        let names: Vec<&str> = catalog.services.iter().map(|s| s.name.as_str()).collect();
        anyhow::bail!(
            "Unbekannter Service '{}'. Verfügbar: {}",
            name,
            names.join(", ")
        );
    };

    tracing::info!("Opening {} at {}", service.name, service.url);
    open::that(&service.url)
        .map_err(|e| anyhow::anyhow!("Konnte {} nicht öffnen: {}", service.url, e))?;

    print_success(&format!("{} geöffnet: {}", service.name, service.url), cli.quiet);
    Ok(())
}
