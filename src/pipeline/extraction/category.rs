//! Code → category mapping and best-effort codes for names the catalog
//! does not know.

use crate::models::MarkerCategory;

const CBC_CODES: &[&str] = &["HGB", "HCT", "WBC", "RBC", "PLT", "MCV", "MCH", "MCHC", "RDW"];

const CHEMISTRY_CODES: &[&str] = &[
    "GLU", "CREAT", "BUN", "NA", "K", "CL", "CO2", "CA", "MG", "PHOS", "ALB", "TP", "TBIL", "ALT",
    "AST", "ALP", "UA", "EGFR", "HBA1C",
];

const LIPID_CODES: &[&str] = &["CHOL", "HDL", "LDL", "TRIG", "VLDL"];

const INFLAMMATORY_CODES: &[&str] = &["CRP", "HSCRP", "ESR"];

/// Report spellings → code, for table rows. Keys are lowercase with
/// single spaces.
const NAME_TO_CODE: &[(&str, &str)] = &[
    ("hemoglobin", "HGB"),
    ("haemoglobin", "HGB"),
    ("hematocrit", "HCT"),
    ("haematocrit", "HCT"),
    ("white blood cell count", "WBC"),
    ("white blood cells", "WBC"),
    ("wbc", "WBC"),
    ("red blood cell count", "RBC"),
    ("red blood cells", "RBC"),
    ("rbc", "RBC"),
    ("platelet count", "PLT"),
    ("platelets", "PLT"),
    ("glucose", "GLU"),
    ("creatinine", "CREAT"),
    ("blood urea nitrogen", "BUN"),
    ("bun", "BUN"),
    ("sodium", "NA"),
    ("potassium", "K"),
    ("chloride", "CL"),
    ("calcium", "CA"),
    ("albumin", "ALB"),
    ("total protein", "TP"),
    ("total bilirubin", "TBIL"),
    ("alkaline phosphatase", "ALP"),
    ("alt", "ALT"),
    ("ast", "AST"),
    ("total cholesterol", "CHOL"),
    ("cholesterol", "CHOL"),
    ("hdl cholesterol", "HDL"),
    ("ldl cholesterol", "LDL"),
    ("triglycerides", "TRIG"),
    ("c-reactive protein", "CRP"),
    ("hemoglobin a1c", "HBA1C"),
    ("hba1c", "HBA1C"),
    ("tsh", "TSH"),
    ("ferritin", "FERR"),
    ("vitamin d", "VITD"),
    ("vitamin b12", "B12"),
];

pub fn category_for_code(code: &str) -> MarkerCategory {
    let code = code.trim().to_uppercase();
    let code = code.as_str();
    if CBC_CODES.contains(&code) {
        MarkerCategory::Cbc
    } else if CHEMISTRY_CODES.contains(&code) {
        MarkerCategory::Chemistry
    } else if LIPID_CODES.contains(&code) {
        MarkerCategory::LipidPanel
    } else if INFLAMMATORY_CODES.contains(&code) {
        MarkerCategory::Inflammatory
    } else {
        MarkerCategory::Other
    }
}

/// Alias-table lookup, case-insensitive with whitespace collapsed.
pub fn code_for_name(name: &str) -> Option<&'static str> {
    let normalized = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    NAME_TO_CODE
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, code)| *code)
}

/// Best-effort short code for an unrecognized name: initials of a
/// multi-word name, else the first four characters, uppercased.
pub fn derive_code(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() > 1 {
        words
            .iter()
            .filter_map(|w| w.chars().find(|c| c.is_alphanumeric()))
            .flat_map(char::to_uppercase)
            .collect()
    } else {
        name.trim().chars().take(4).flat_map(char::to_uppercase).collect()
    }
}

/// Alias table first, then a derived code.
pub fn resolve_code(name: &str) -> String {
    match code_for_name(name) {
        Some(code) => code.to_string(),
        None => derive_code(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_from_fixed_table() {
        assert_eq!(category_for_code("HGB"), MarkerCategory::Cbc);
        assert_eq!(category_for_code("GLU"), MarkerCategory::Chemistry);
        assert_eq!(category_for_code("ldl"), MarkerCategory::LipidPanel);
        assert_eq!(category_for_code("CRP"), MarkerCategory::Inflammatory);
        assert_eq!(category_for_code("TSH"), MarkerCategory::Other);
        assert_eq!(category_for_code("FG"), MarkerCategory::Other);
    }

    #[test]
    fn alias_lookup_normalizes_whitespace_and_case() {
        assert_eq!(code_for_name("Total   Cholesterol"), Some("CHOL"));
        assert_eq!(code_for_name("PLATELET COUNT"), Some("PLT"));
        assert_eq!(code_for_name("Fasting Glucose"), None);
    }

    #[test]
    fn derive_code_from_initials() {
        assert_eq!(derive_code("Fasting Glucose"), "FG");
        assert_eq!(derive_code("Gamma glutamyl transferase"), "GGT");
        assert_eq!(derive_code("(Free) Testosterone"), "FT");
    }

    #[test]
    fn derive_code_from_single_word_prefix() {
        assert_eq!(derive_code("Lipase"), "LIPA");
        assert_eq!(derive_code("Zinc"), "ZINC");
        assert_eq!(derive_code("Pb"), "PB");
    }

    #[test]
    fn resolve_prefers_alias_table() {
        assert_eq!(resolve_code("Hemoglobin"), "HGB");
        assert_eq!(resolve_code("Fasting Glucose"), "FG");
    }
}
