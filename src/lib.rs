pub mod config;
pub mod models;
pub mod catalog;
pub mod units;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

use catalog::{CatalogError, MarkerCatalog};

/// Install the fmt subscriber. Logs go to stderr so stdout can carry data.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// The catalog named by configuration, or the built-in one.
pub fn load_catalog() -> Result<MarkerCatalog, CatalogError> {
    match config::catalog_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading marker catalog");
            MarkerCatalog::load(&path)
        }
        None => Ok(MarkerCatalog::builtin()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // Single test so nothing else races on the variable.
    #[test]
    fn catalog_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"panel":"cbc","code":"HGB","name":"Hemoglobin","canonical_unit":"g/L"}}]"#
        )
        .unwrap();

        std::env::set_var(config::CATALOG_ENV, file.path());
        assert_eq!(config::catalog_path().as_deref(), Some(file.path()));
        let catalog = load_catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.by_code("HGB").is_some());

        let dir = tempfile::tempdir().unwrap();
        std::env::set_var(config::CATALOG_ENV, dir.path().join("missing.json"));
        assert!(matches!(
            load_catalog().unwrap_err(),
            CatalogError::ReferenceDataLoad(..)
        ));

        std::env::set_var(config::CATALOG_ENV, "");
        assert_ne!(config::catalog_path().as_deref(), Some(std::path::Path::new("")));

        std::env::remove_var(config::CATALOG_ENV);
    }
}
