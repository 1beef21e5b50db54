//! Marker catalog: static reference data for known lab tests.
//!
//! Read-only once built. Patterns are compiled eagerly at construction;
//! an entry whose patterns do not compile stays in the catalog for
//! lookups but is left out of text matching.

pub mod builtin;
pub mod matcher;

pub use matcher::{MarkerMatcher, PatternMatch};

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use crate::models::MarkerDefinition;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read marker catalog {0}: {1}")]
    ReferenceDataLoad(String, String),

    #[error("Failed to parse marker catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate marker code in catalog: {0}")]
    DuplicateCode(String),

    #[error("Marker definition with empty code (name: {0})")]
    EmptyCode(String),
}

/// Why a definition was left out of text matching.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    #[error("Marker {0} has no synonyms or name to match on")]
    EmptySynonyms(String),

    #[error("Marker {code}: invalid pattern {pattern:?}: {reason}")]
    InvalidRegex {
        code: String,
        pattern: String,
        reason: String,
    },

    #[error("Marker {code}: pattern {pattern:?} has no value capture group")]
    MissingValueGroup { code: String, pattern: String },
}

struct CatalogEntry {
    definition: MarkerDefinition,
    matcher: Option<MarkerMatcher>,
}

pub struct MarkerCatalog {
    entries: Vec<CatalogEntry>,
    skipped: Vec<PatternError>,
}

impl MarkerCatalog {
    /// Build a catalog, rejecting empty or duplicate codes.
    pub fn new(definitions: Vec<MarkerDefinition>) -> Result<Self, CatalogError> {
        let mut seen: HashSet<String> = HashSet::with_capacity(definitions.len());
        for def in &definitions {
            if def.code.trim().is_empty() {
                return Err(CatalogError::EmptyCode(def.name.clone()));
            }
            if !seen.insert(def.code.clone()) {
                return Err(CatalogError::DuplicateCode(def.code.clone()));
            }
        }
        Ok(Self::assemble(definitions))
    }

    /// The built-in catalog. Code uniqueness is covered by tests.
    pub fn builtin() -> Self {
        Self::assemble(builtin::definitions())
    }

    /// Parse a JSON array of marker definitions.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let definitions: Vec<MarkerDefinition> = serde_json::from_str(json)?;
        Self::new(definitions)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::ReferenceDataLoad(path.display().to_string(), e.to_string())
        })?;
        Self::from_json(&json)
    }

    fn assemble(definitions: Vec<MarkerDefinition>) -> Self {
        let mut skipped = Vec::new();
        let entries: Vec<CatalogEntry> = definitions
            .into_iter()
            .map(|definition| {
                let matcher = match MarkerMatcher::compile(&definition) {
                    Ok(m) => Some(m),
                    Err(e) => {
                        tracing::warn!(
                            code = %definition.code,
                            error = %e,
                            "Skipping marker patterns"
                        );
                        skipped.push(e);
                        None
                    }
                };
                CatalogEntry { definition, matcher }
            })
            .collect();

        tracing::debug!(
            markers = entries.len(),
            skipped = skipped.len(),
            "Marker catalog built"
        );

        Self { entries, skipped }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All definitions in catalog order.
    pub fn definitions(&self) -> impl Iterator<Item = &MarkerDefinition> {
        self.entries.iter().map(|e| &e.definition)
    }

    /// Definitions whose patterns compiled, with their matcher.
    pub fn matchers(&self) -> impl Iterator<Item = (&MarkerDefinition, &MarkerMatcher)> {
        self.entries
            .iter()
            .filter_map(|e| e.matcher.as_ref().map(|m| (&e.definition, m)))
    }

    /// Definitions tagged with `panel` (case-insensitive), catalog order.
    pub fn by_panel(&self, panel: &str) -> Vec<&MarkerDefinition> {
        self.definitions()
            .filter(|d| d.panel.eq_ignore_ascii_case(panel))
            .collect()
    }

    /// Exact code lookup.
    pub fn by_code(&self, code: &str) -> Option<&MarkerDefinition> {
        self.definitions().find(|d| d.code == code)
    }

    /// Resolve a name as written on a report (code, full name or synonym).
    pub fn find_by_name(&self, name: &str) -> Option<&MarkerDefinition> {
        self.definitions().find(|d| d.answers_to(name))
    }

    /// Entries left out of text matching, with the reason.
    pub fn skipped(&self) -> &[PatternError] {
        &self.skipped
    }
}

impl std::fmt::Debug for MarkerCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerCatalog")
            .field("markers", &self.entries.len())
            .field("skipped", &self.skipped.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn def(code: &str, panel: &str) -> MarkerDefinition {
        MarkerDefinition {
            panel: panel.into(),
            code: code.into(),
            name: format!("{code} name"),
            synonyms: vec![code.into()],
            extraction_patterns: vec![],
            canonical_unit: "mmol/L".into(),
            reference_range: None,
        }
    }

    #[test]
    fn builtin_codes_unique_and_resolvable() {
        let catalog = MarkerCatalog::builtin();
        let codes: Vec<String> = catalog.definitions().map(|d| d.code.clone()).collect();
        for code in &codes {
            let hits: Vec<_> = catalog.definitions().filter(|d| &d.code == code).collect();
            assert_eq!(hits.len(), 1, "code {code} not unique");
            assert_eq!(&catalog.by_code(code).unwrap().code, code);
        }
    }

    #[test]
    fn builtin_patterns_all_compile() {
        let catalog = MarkerCatalog::builtin();
        assert!(catalog.skipped().is_empty(), "{:?}", catalog.skipped());
        assert_eq!(catalog.matchers().count(), catalog.len());
    }

    #[test]
    fn by_panel_preserves_order() {
        let catalog = MarkerCatalog::builtin();
        let lipids: Vec<&str> = catalog
            .by_panel("lipid")
            .into_iter()
            .map(|d| d.code.as_str())
            .collect();
        assert_eq!(lipids, vec!["CHOL", "HDL", "LDL", "TRIG"]);
        assert_eq!(catalog.by_panel("LIPID").len(), 4);
        assert!(catalog.by_panel("astrology").is_empty());
    }

    #[test]
    fn by_code_is_exact() {
        let catalog = MarkerCatalog::builtin();
        assert_eq!(catalog.by_code("HDL").unwrap().name, "HDL Cholesterol");
        assert!(catalog.by_code("hdl").is_none());
        assert!(catalog.by_code("NOPE").is_none());
    }

    #[test]
    fn find_by_name_uses_synonyms() {
        let catalog = MarkerCatalog::builtin();
        assert_eq!(catalog.find_by_name("haemoglobin").unwrap().code, "HGB");
        assert_eq!(catalog.find_by_name("SGPT").unwrap().code, "ALT");
        assert!(catalog.find_by_name("Fasting Glucose").is_none());
    }

    #[test]
    fn duplicate_codes_rejected() {
        let err = MarkerCatalog::new(vec![def("A", "x"), def("A", "y")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCode(c) if c == "A"));
    }

    #[test]
    fn empty_code_rejected() {
        let err = MarkerCatalog::new(vec![def(" ", "x")]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyCode(_)));
    }

    #[test]
    fn malformed_pattern_isolated_to_its_entry() {
        let mut bad = def("BAD", "x");
        bad.extraction_patterns = vec!["(".into()];
        let catalog = MarkerCatalog::new(vec![def("GOOD", "x"), bad]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.matchers().count(), 1);
        assert_eq!(catalog.skipped().len(), 1);
        // Still available for lookups.
        assert!(catalog.by_code("BAD").is_some());
    }

    #[test]
    fn from_json_parses_definitions() {
        let json = r#"[
            {"panel":"lipid","code":"HDL","name":"HDL Cholesterol","synonyms":["HDL"],
             "canonical_unit":"mmol/L","reference_range":{"min":1.0,"max":null,"unit":"mmol/L"}}
        ]"#;
        let catalog = MarkerCatalog::from_json(json).unwrap();
        let hdl = catalog.by_code("HDL").unwrap();
        assert_eq!(hdl.reference_range.as_ref().unwrap().min, Some(1.0));
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(matches!(
            MarkerCatalog::from_json("{not json").unwrap_err(),
            CatalogError::Json(_)
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"panel":"cbc","code":"HGB","name":"Hemoglobin","canonical_unit":"g/L"}}]"#
        )
        .unwrap();
        let catalog = MarkerCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = MarkerCatalog::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CatalogError::ReferenceDataLoad(..)));
    }

    #[test]
    fn catalog_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MarkerCatalog>();
    }
}
