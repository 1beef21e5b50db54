//! Static conversion data: marker-name aliases and the `{marker}_{unit}`
//! conversion table. Factors are the standard conventional→SI factors.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::ConversionOp;
use crate::models::ConversionOp::{Divide, Multiply};

/// One row of the conversion table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRule {
    pub key: &'static str,
    pub factor: f64,
    pub op: ConversionOp,
    pub si_unit: &'static str,
}

const fn rule(
    key: &'static str,
    factor: f64,
    op: ConversionOp,
    si_unit: &'static str,
) -> ConversionRule {
    ConversionRule { key, factor, op, si_unit }
}

const MMOL_L: &str = "mmol/L";
const UMOL_L: &str = "\u{b5}mol/L";
const NMOL_L: &str = "nmol/L";
const PMOL_L: &str = "pmol/L";
const G_L: &str = "g/L";

/// Keys use the normalized marker key and the normalized unit
/// (lowercase, no whitespace, micro sign folded to `u`).
pub const CONVERSIONS: &[ConversionRule] = &[
    // Glucose and lipids
    rule("glucose_mg/dl", 18.0, Divide, MMOL_L),
    rule("cholesterol_mg/dl", 38.67, Divide, MMOL_L),
    rule("hdl_cholesterol_mg/dl", 38.67, Divide, MMOL_L),
    rule("ldl_cholesterol_mg/dl", 38.67, Divide, MMOL_L),
    rule("triglycerides_mg/dl", 88.57, Divide, MMOL_L),
    // Renal
    rule("creatinine_mg/dl", 88.4, Multiply, UMOL_L),
    rule("bun_mg/dl", 0.357, Multiply, MMOL_L),
    rule("urea_mg/dl", 0.1665, Multiply, MMOL_L),
    rule("uric_acid_mg/dl", 59.48, Multiply, UMOL_L),
    // Proteins and hematology
    rule("hemoglobin_g/dl", 10.0, Multiply, G_L),
    rule("albumin_g/dl", 10.0, Multiply, G_L),
    rule("total_protein_g/dl", 10.0, Multiply, G_L),
    // Liver
    rule("bilirubin_mg/dl", 17.1, Multiply, UMOL_L),
    // Minerals
    rule("calcium_mg/dl", 0.2495, Multiply, MMOL_L),
    rule("magnesium_mg/dl", 0.4114, Multiply, MMOL_L),
    rule("phosphate_mg/dl", 0.3229, Multiply, MMOL_L),
    rule("iron_ug/dl", 0.1791, Multiply, UMOL_L),
    rule("ferritin_ng/ml", 1.0, Multiply, "\u{b5}g/L"),
    // Vitamins
    rule("vitamin_d_ng/ml", 2.496, Multiply, NMOL_L),
    rule("vitamin_b12_pg/ml", 0.7378, Multiply, PMOL_L),
    rule("folate_ng/ml", 2.266, Multiply, NMOL_L),
    // Endocrine
    rule("free_t4_ng/dl", 12.87, Multiply, PMOL_L),
    rule("insulin_uiu/ml", 6.945, Multiply, PMOL_L),
    rule("cortisol_ug/dl", 27.59, Multiply, NMOL_L),
    rule("testosterone_ng/dl", 0.0347, Multiply, NMOL_L),
    // Inflammatory
    rule("crp_mg/dl", 10.0, Multiply, "mg/L"),
];

static CONVERSION_INDEX: LazyLock<HashMap<&'static str, &'static ConversionRule>> =
    LazyLock::new(|| CONVERSIONS.iter().map(|r| (r.key, r)).collect());

pub fn find_rule(key: &str) -> Option<&'static ConversionRule> {
    CONVERSION_INDEX.get(key).copied()
}

/// Spelling → canonical marker key. Left side is already normalized
/// (lowercase, separators collapsed to `_`).
pub const MARKER_ALIASES: &[(&str, &str)] = &[
    ("glu", "glucose"),
    ("fasting_glucose", "glucose"),
    ("glucose_fasting", "glucose"),
    ("blood_glucose", "glucose"),
    ("fasting_blood_sugar", "glucose"),
    ("fbs", "glucose"),
    ("chol", "cholesterol"),
    ("total_cholesterol", "cholesterol"),
    ("cholesterol_total", "cholesterol"),
    ("tc", "cholesterol"),
    ("hdl", "hdl_cholesterol"),
    ("hdl_c", "hdl_cholesterol"),
    ("ldl", "ldl_cholesterol"),
    ("ldl_c", "ldl_cholesterol"),
    ("ldl_calculated", "ldl_cholesterol"),
    ("trig", "triglycerides"),
    ("tg", "triglycerides"),
    ("triglyceride", "triglycerides"),
    ("creat", "creatinine"),
    ("crea", "creatinine"),
    ("cr", "creatinine"),
    ("serum_creatinine", "creatinine"),
    ("creatinine_serum", "creatinine"),
    ("blood_urea_nitrogen", "bun"),
    ("urea_nitrogen", "bun"),
    ("ua", "uric_acid"),
    ("urate", "uric_acid"),
    ("hgb", "hemoglobin"),
    ("hb", "hemoglobin"),
    ("haemoglobin", "hemoglobin"),
    ("alb", "albumin"),
    ("tp", "total_protein"),
    ("protein_total", "total_protein"),
    ("tbil", "bilirubin"),
    ("total_bilirubin", "bilirubin"),
    ("bilirubin_total", "bilirubin"),
    ("ca", "calcium"),
    ("mg", "magnesium"),
    ("phos", "phosphate"),
    ("phosphorus", "phosphate"),
    ("fe", "iron"),
    ("serum_iron", "iron"),
    ("ferr", "ferritin"),
    ("vitd", "vitamin_d"),
    ("25_oh_vitamin_d", "vitamin_d"),
    ("vitamin_d_25_oh", "vitamin_d"),
    ("25_hydroxy_vitamin_d", "vitamin_d"),
    ("b12", "vitamin_b12"),
    ("vitb12", "vitamin_b12"),
    ("cobalamin", "vitamin_b12"),
    ("fol", "folate"),
    ("folic_acid", "folate"),
    ("ft4", "free_t4"),
    ("t4_free", "free_t4"),
    ("free_thyroxine", "free_t4"),
    ("c_reactive_protein", "crp"),
    ("hscrp", "crp"),
    ("hs_crp", "crp"),
    ("ins", "insulin"),
    ("cort", "cortisol"),
    ("testo", "testosterone"),
];

pub fn resolve_alias(key: &str) -> Option<&'static str> {
    MARKER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
}
