use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use super::category::{category_for_code, resolve_code};
use super::fallback::FallbackMarker;
use super::types::ExtractionConfig;
use super::{canonical_record, extract_catalog_matches, extract_table_rows, FallbackError};
use crate::catalog::MarkerCatalog;
use crate::models::{CanonicalMarkerRecord, RawMeasurement};

/// Secondary extractor consulted when deterministic matching finds too
/// little. Returns raw marker objects; the extractor validates them.
pub trait FallbackExtractor: Send + Sync {
    fn extract_markers(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<Value>, FallbackError>> + Send;
}

/// Turns plain report text (or raw value/unit pairs) into canonical
/// marker records against a shared, read-only catalog.
#[derive(Debug, Clone)]
pub struct MarkerExtractor {
    catalog: Arc<MarkerCatalog>,
    config: ExtractionConfig,
}

impl MarkerExtractor {
    pub fn new(catalog: Arc<MarkerCatalog>) -> Self {
        Self {
            catalog,
            config: ExtractionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &MarkerCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Catalog matches followed by table rows. Never fails; no matches
    /// is an empty list.
    pub fn extract(&self, text: &str) -> Vec<CanonicalMarkerRecord> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut records =
            extract_catalog_matches(&self.catalog, text, self.config.range_window_chars);
        let catalog_matches = records.len();
        let rows = extract_table_rows(text, &records);
        let table_rows = rows.len();
        records.extend(rows);

        tracing::debug!(catalog_matches, table_rows, "Marker extraction complete");
        self.cap(records)
    }

    pub fn needs_fallback(&self, records: &[CanonicalMarkerRecord]) -> bool {
        records.len() < self.config.fallback_threshold
    }

    /// Deterministic extraction, topped up by `fallback` when fewer than
    /// `fallback_threshold` records were found. A failing fallback is
    /// logged and the deterministic records are returned as-is.
    pub async fn extract_with_fallback<F: FallbackExtractor>(
        &self,
        text: &str,
        fallback: &F,
    ) -> Vec<CanonicalMarkerRecord> {
        let mut records = self.extract(text);
        if text.trim().is_empty() || !self.needs_fallback(&records) {
            return records;
        }

        tracing::info!(
            found = records.len(),
            threshold = self.config.fallback_threshold,
            "Below threshold, requesting fallback extraction"
        );

        match fallback.extract_markers(text).await {
            Ok(items) => {
                let extra = self.normalize_fallback(&items);
                tracing::info!(
                    received = items.len(),
                    accepted = extra.len(),
                    "Fallback markers normalized"
                );
                records.extend(extra);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Fallback extraction failed");
            }
        }

        self.cap(records)
    }

    /// Validate and convert fallback items. Invalid items are dropped.
    pub fn normalize_fallback(&self, items: &[Value]) -> Vec<CanonicalMarkerRecord> {
        items
            .iter()
            .filter_map(|item| {
                let marker = FallbackMarker::validate(item);
                if marker.is_none() {
                    tracing::debug!("Dropping invalid fallback marker");
                }
                marker
            })
            .map(|m| {
                let code = m.code.unwrap_or_else(|| self.code_for(&m.name));
                let category = m.category.unwrap_or_else(|| category_for_code(&code));
                canonical_record(
                    code,
                    m.name,
                    m.value,
                    m.unit,
                    m.flag,
                    (m.ref_range_low, m.ref_range_high),
                    category,
                )
            })
            .collect()
    }

    /// Normalize caller-supplied value/unit pairs.
    pub fn normalize_measurements(
        &self,
        measurements: &[RawMeasurement],
    ) -> Vec<CanonicalMarkerRecord> {
        measurements
            .iter()
            .filter(|m| !m.marker_name.trim().is_empty())
            .map(|m| {
                let (code, name) = match self.catalog.find_by_name(&m.marker_name) {
                    Some(def) => (def.code.clone(), def.name.clone()),
                    None => (resolve_code(&m.marker_name), m.marker_name.trim().to_string()),
                };
                let category = category_for_code(&code);
                canonical_record(
                    code,
                    name,
                    m.value.clone(),
                    m.unit.trim().to_string(),
                    None,
                    (None, None),
                    category,
                )
            })
            .collect()
    }

    /// Catalog code for a name, else the alias table or a derived code.
    fn code_for(&self, name: &str) -> String {
        self.catalog
            .find_by_name(name)
            .map(|d| d.code.clone())
            .unwrap_or_else(|| resolve_code(name))
    }

    fn cap(&self, mut records: Vec<CanonicalMarkerRecord>) -> Vec<CanonicalMarkerRecord> {
        if records.len() > self.config.max_results {
            tracing::warn!(
                found = records.len(),
                max = self.config.max_results,
                "Excessive marker records capped"
            );
            records.truncate(self.config.max_results);
        }
        records
    }
}
