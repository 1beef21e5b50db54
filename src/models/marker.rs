use serde::{Deserialize, Serialize};

/// Reference range in the marker's canonical SI unit. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit: String,
}

/// One known lab test in the catalog.
///
/// `synonyms` and `extraction_patterns` are ordered: matching tries them
/// in declaration order and the first hit wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerDefinition {
    pub panel: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub extraction_patterns: Vec<String>,
    pub canonical_unit: String,
    #[serde(default)]
    pub reference_range: Option<ReferenceRange>,
}

impl MarkerDefinition {
    /// True when `text` names this marker by code, full name, or synonym
    /// (case-insensitive, surrounding whitespace ignored).
    pub fn answers_to(&self, text: &str) -> bool {
        let needle = text.trim();
        if needle.is_empty() {
            return false;
        }
        self.code.eq_ignore_ascii_case(needle)
            || self.name.to_lowercase() == needle.to_lowercase()
            || self
                .synonyms
                .iter()
                .any(|s| s.to_lowercase() == needle.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hdl() -> MarkerDefinition {
        MarkerDefinition {
            panel: "lipid".into(),
            code: "HDL".into(),
            name: "HDL Cholesterol".into(),
            synonyms: vec!["HDL".into(), "HDL-C".into(), "High-Density Lipoprotein".into()],
            extraction_patterns: vec![],
            canonical_unit: "mmol/L".into(),
            reference_range: Some(ReferenceRange {
                min: Some(1.0),
                max: None,
                unit: "mmol/L".into(),
            }),
        }
    }

    #[test]
    fn answers_to_code_name_and_synonyms() {
        let def = hdl();
        assert!(def.answers_to("hdl"));
        assert!(def.answers_to("HDL Cholesterol"));
        assert!(def.answers_to("  hdl-c "));
        assert!(def.answers_to("HIGH-DENSITY LIPOPROTEIN"));
        assert!(!def.answers_to("LDL"));
        assert!(!def.answers_to("   "));
    }

    #[test]
    fn deserializes_with_optional_fields_missing() {
        let json = r#"{"panel":"cbc","code":"HGB","name":"Hemoglobin","canonical_unit":"g/L"}"#;
        let def: MarkerDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.code, "HGB");
        assert!(def.synonyms.is_empty());
        assert!(def.extraction_patterns.is_empty());
        assert!(def.reference_range.is_none());
    }
}
