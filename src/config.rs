use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "labnorm";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming an explicit catalog JSON file.
pub const CATALOG_ENV: &str = "LABNORM_CATALOG";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "labnorm=info"
}

/// Get the application data directory (~/.labnorm/).
/// `None` when the home directory cannot be determined.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(format!(".{APP_NAME}")))
}

/// Catalog file picked up from the data directory when present.
pub fn catalog_override_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join("markers.json"))
}

/// Catalog file to load, if any: `LABNORM_CATALOG` first, then the
/// data-directory file when it exists.
pub fn catalog_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CATALOG_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(explicit));
    }
    catalog_override_path().filter(|p| p.is_file())
}
