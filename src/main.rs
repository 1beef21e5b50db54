use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use labnorm::catalog::MarkerCatalog;
use labnorm::config;
use labnorm::pipeline::extraction::MarkerExtractor;

#[derive(Parser)]
#[command(name = "labnorm", version)]
#[command(about = "Extract lab markers from a report and normalize them to SI units")]
struct Cli {
    /// Plain-text report to read (stdin when omitted or "-")
    file: Option<PathBuf>,
    /// Marker catalog JSON (overrides LABNORM_CATALOG and ~/.labnorm/markers.json)
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Print one record per line instead of a pretty array
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    labnorm::init_tracing();
    let cli = Cli::parse();
    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);

    let text = match read_input(cli.file.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read report");
            return ExitCode::FAILURE;
        }
    };

    let catalog = match cli.catalog.as_deref() {
        Some(path) => MarkerCatalog::load(path),
        None => labnorm::load_catalog(),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load marker catalog");
            return ExitCode::FAILURE;
        }
    };

    let records = MarkerExtractor::new(Arc::new(catalog)).extract(&text);

    let output = if cli.compact {
        records
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()
            .map(|lines| lines.join("\n"))
    } else {
        serde_json::to_string_pretty(&records)
    };

    match output {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize records");
            ExitCode::FAILURE
        }
    }
}

fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
