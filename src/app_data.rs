//! Application data embedded from TOML at compile time.
//!
//! This module provides access to application-level data that is:
//! - Embedded at compile time via `include_str!`
//! - Parsed lazily on first access via `OnceLock`
//! - Immutable at runtime, apart from an optional catalog override file
//!
//! This is distinct from `config.rs` which handles user preferences.
//! App data defines *what the console offers* (photo-book services, admin
//! web pages), while config defines *user choices* (theme, backend URL).
//!
//! Data files are located in `embedded/`:
//! - `photo_services.toml` - Photo-book service catalog and admin web paths

use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;
use thiserror::Error;

// Embed data files at compile time
const PHOTO_SERVICES_TOML: &str = include_str!("../embedded/photo_services.toml");

/// Errors loading a catalog override
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

// ============================================================================
// Photo-book services
// ============================================================================

/// An external photo-book service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoService {
    pub name: String,
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub features: Vec<String>,
    /// Starting price as shown, e.g. "ab 7,95€"
    pub price: String,
    /// Country flag emoji
    #[serde(default)]
    pub flag: String,
    /// Whether the design software is free
    #[serde(default)]
    pub free: bool,
}

/// Content of the photo-book overlay
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceCatalog {
    pub title: String,
    pub subtitle: String,
    /// Markdown
    pub instructions: String,
    #[serde(default)]
    pub tip: String,
    pub services: Vec<PhotoService>,
}

impl ServiceCatalog {
    /// Parse and validate catalog TOML
    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        let catalog: ServiceCatalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load an override catalog from disk
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load the override at `path` if given, falling back to the built-in
    /// catalog when it is missing or invalid
    pub fn load_or_builtin(path: Option<&Path>) -> ServiceCatalog {
        match path {
            Some(path) => match Self::load(path) {
                Ok(catalog) => {
                    tracing::info!(
                        "Loaded {} photo services from {}",
                        catalog.services.len(),
                        path.display()
                    );
                    catalog
                }
                Err(e) => {
                    tracing::warn!("Ignoring catalog override: {}", e);
                    catalog().clone()
                }
            },
            None => catalog().clone(),
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.services.is_empty() {
            return Err(CatalogError::Invalid("no services listed".to_string()));
        }

        for (i, service) in self.services.iter().enumerate() {
            if service.name.trim().is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "service #{} has an empty name",
                    i + 1
                )));
            }
            if !service.url.starts_with("https://") && !service.url.starts_with("http://") {
                return Err(CatalogError::Invalid(format!(
                    "{}: URL must start with http:// or https://",
                    service.name
                )));
            }
        }

        Ok(())
    }

    /// Look up a service by case-insensitive name or name prefix
    pub fn find(&self, query: &str) -> Option<&PhotoService> {
        let query = query.to_lowercase();
        self.services
            .iter()
            .find(|s| s.name.to_lowercase() == query)
            .or_else(|| {
                self.services
                    .iter()
                    .find(|s| s.name.to_lowercase().starts_with(&query))
            })
    }
}

/// Get the built-in service catalog (lazy-loaded)
pub fn catalog() -> &'static ServiceCatalog {
    static CATALOG: OnceLock<ServiceCatalog> = OnceLock::new();
    CATALOG.get_or_init(|| {
        ServiceCatalog::parse(PHOTO_SERVICES_TOML).unwrap_or_else(|e| {
            panic!("Failed to parse photo_services.toml: {}", e);
        })
    })
}

// ============================================================================
// Admin web paths
// ============================================================================

/// Paths of the web app's admin pages, relative to the backend base URL
#[derive(Debug, Deserialize)]
pub struct AdminPaths {
    pub post_wedding_recap: String,
    pub user_management: String,
    pub music_admin: String,
    pub showcase: String,
}

#[derive(Deserialize)]
struct AdminPathsFile {
    admin_paths: AdminPaths,
}

/// Get the admin web paths (lazy-loaded)
pub fn admin_paths() -> &'static AdminPaths {
    static PATHS: OnceLock<AdminPaths> = OnceLock::new();
    PATHS.get_or_init(|| {
        toml::from_str::<AdminPathsFile>(PHOTO_SERVICES_TOML)
            .map(|file| file.admin_paths)
            .unwrap_or_else(|e| {
                panic!("Failed to parse admin paths: {}", e);
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = catalog();
        assert_eq!(catalog.services.len(), 6);
        assert!(!catalog.instructions.is_empty());

        let free: Vec<&str> = catalog
            .services
            .iter()
            .filter(|s| s.free)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(free, vec!["CEWE Fotobuch", "Albelli", "Mein Fotobuch"]);

        let albelli = catalog.find("albelli").unwrap();
        assert_eq!(albelli.flag, "🇪🇺");
        assert_eq!(albelli.price, "ab 9,99€");
    }

    #[test]
    fn test_find_by_prefix() {
        let catalog = catalog();
        assert_eq!(catalog.find("cewe").unwrap().name, "CEWE Fotobuch");
        assert_eq!(catalog.find("Pixum").unwrap().url, "https://www.pixum.de/fotobuch");
        assert!(catalog.find("saal digital").is_none());
    }

    #[test]
    fn test_admin_paths() {
        assert_eq!(admin_paths().post_wedding_recap, "/admin/post-wedding-recap");
    }

    #[test]
    fn test_override_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
title = "Fotobücher"
subtitle = "Test"
instructions = "1. Hochladen"

[[services]]
name = "Saal Digital"
description = "Fotobücher aus Freiburg"
url = "https://www.saal-digital.de"
price = "ab 19,95€"
"#
        )
        .unwrap();

        let catalog = ServiceCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.services.len(), 1);
        assert!(!catalog.services[0].free);
        assert!(catalog.services[0].features.is_empty());
    }

    #[test]
    fn test_override_validation() {
        let no_services = r#"
title = "x"
subtitle = "y"
instructions = "z"
services = []
"#;
        assert!(matches!(
            ServiceCatalog::parse(no_services),
            Err(CatalogError::Invalid(_))
        ));

        let bad_url = r#"
title = "x"
subtitle = "y"
instructions = "z"

[[services]]
name = "Foto"
description = "d"
url = "ftp://foto.example"
price = "ab 1€"
"#;
        assert!(matches!(
            ServiceCatalog::parse(bad_url),
            Err(CatalogError::Invalid(_))
        ));

        assert!(matches!(
            ServiceCatalog::parse("title = "),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_override_falls_back() {
        let catalog = ServiceCatalog::load_or_builtin(Some(Path::new("/nonexistent/catalog.toml")));
        assert_eq!(catalog.services.len(), 6);
    }
}
