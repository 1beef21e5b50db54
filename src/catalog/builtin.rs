//! Built-in marker catalog. Units and ranges are canonical SI.

use crate::models::{MarkerDefinition, ReferenceRange};

struct BuiltinMarker {
    panel: &'static str,
    code: &'static str,
    name: &'static str,
    synonyms: &'static [&'static str],
    patterns: &'static [&'static str],
    unit: &'static str,
    range: (Option<f64>, Option<f64>),
}

const fn marker(
    panel: &'static str,
    code: &'static str,
    name: &'static str,
    synonyms: &'static [&'static str],
    unit: &'static str,
    range: (Option<f64>, Option<f64>),
) -> BuiltinMarker {
    BuiltinMarker { panel, code, name, synonyms, patterns: &[], unit, range }
}

const fn between(min: f64, max: f64) -> (Option<f64>, Option<f64>) {
    (Some(min), Some(max))
}

const fn at_most(max: f64) -> (Option<f64>, Option<f64>) {
    (None, Some(max))
}

const fn at_least(min: f64) -> (Option<f64>, Option<f64>) {
    (Some(min), None)
}

const UMOL_L: &str = "\u{b5}mol/L";

// Bare "Cholesterol" is deliberately absent: it would match inside
// "HDL Cholesterol" lines.
const BUILTIN: &[BuiltinMarker] = &[
    // CBC
    marker(
        "cbc",
        "HGB",
        "Hemoglobin",
        &["Hemoglobin", "Haemoglobin", "Hgb", "Hb"],
        "g/L",
        between(120.0, 170.0),
    ),
    marker(
        "cbc",
        "HCT",
        "Hematocrit",
        &["Hematocrit", "Haematocrit", "Hct", "PCV"],
        "%",
        between(36.0, 50.0),
    ),
    marker(
        "cbc",
        "WBC",
        "White Blood Cells",
        &["White Blood Cell Count", "White Blood Cells", "WBC", "Leukocytes"],
        "10^9/L",
        between(4.0, 11.0),
    ),
    marker(
        "cbc",
        "RBC",
        "Red Blood Cells",
        &["Red Blood Cell Count", "Red Blood Cells", "RBC", "Erythrocytes"],
        "10^12/L",
        between(4.2, 5.9),
    ),
    marker(
        "cbc",
        "PLT",
        "Platelets",
        &["Platelet Count", "Platelets", "PLT", "Thrombocytes"],
        "10^9/L",
        between(150.0, 400.0),
    ),
    marker(
        "cbc",
        "MCV",
        "Mean Corpuscular Volume",
        &["Mean Corpuscular Volume", "MCV"],
        "fL",
        between(80.0, 100.0),
    ),
    marker(
        "cbc",
        "MCH",
        "Mean Corpuscular Hemoglobin",
        &["Mean Corpuscular Hemoglobin", "MCH"],
        "pg",
        between(27.0, 33.0),
    ),
    marker(
        "cbc",
        "MCHC",
        "Mean Corpuscular Hemoglobin Concentration",
        &["Mean Corpuscular Hemoglobin Concentration", "MCHC"],
        "g/L",
        between(320.0, 360.0),
    ),
    marker(
        "cbc",
        "RDW",
        "Red Cell Distribution Width",
        &["Red Cell Distribution Width", "RDW"],
        "%",
        between(11.5, 14.5),
    ),
    // Chemistry
    marker(
        "chemistry",
        "GLU",
        "Glucose",
        &["Glucose", "Blood Glucose", "GLU"],
        "mmol/L",
        between(3.9, 5.6),
    ),
    marker(
        "chemistry",
        "CREAT",
        "Creatinine",
        &["Creatinine", "Creat", "CREA"],
        UMOL_L,
        between(60.0, 110.0),
    ),
    marker(
        "chemistry",
        "BUN",
        "Blood Urea Nitrogen",
        &["Blood Urea Nitrogen", "Urea Nitrogen", "BUN"],
        "mmol/L",
        between(2.5, 7.1),
    ),
    marker("chemistry", "NA", "Sodium", &["Sodium", "Na"], "mmol/L", between(135.0, 145.0)),
    marker("chemistry", "K", "Potassium", &["Potassium", "K"], "mmol/L", between(3.5, 5.1)),
    marker("chemistry", "CL", "Chloride", &["Chloride", "Cl"], "mmol/L", between(98.0, 107.0)),
    marker(
        "chemistry",
        "CO2",
        "Bicarbonate",
        &["Bicarbonate", "HCO3", "CO2"],
        "mmol/L",
        between(22.0, 29.0),
    ),
    marker("chemistry", "CA", "Calcium", &["Calcium", "Ca"], "mmol/L", between(2.15, 2.55)),
    marker("chemistry", "MG", "Magnesium", &["Magnesium"], "mmol/L", between(0.7, 1.0)),
    marker(
        "chemistry",
        "PHOS",
        "Phosphate",
        &["Phosphate", "Phosphorus"],
        "mmol/L",
        between(0.8, 1.5),
    ),
    marker("chemistry", "ALB", "Albumin", &["Albumin", "ALB"], "g/L", between(35.0, 50.0)),
    marker("chemistry", "TP", "Total Protein", &["Total Protein"], "g/L", between(60.0, 80.0)),
    marker(
        "chemistry",
        "TBIL",
        "Total Bilirubin",
        &["Total Bilirubin", "Bilirubin, Total", "Bilirubin", "TBIL"],
        UMOL_L,
        between(3.0, 21.0),
    ),
    marker(
        "chemistry",
        "ALT",
        "Alanine Aminotransferase",
        &["Alanine Aminotransferase", "ALT", "SGPT"],
        "U/L",
        at_most(40.0),
    ),
    marker(
        "chemistry",
        "AST",
        "Aspartate Aminotransferase",
        &["Aspartate Aminotransferase", "AST", "SGOT"],
        "U/L",
        at_most(40.0),
    ),
    marker(
        "chemistry",
        "ALP",
        "Alkaline Phosphatase",
        &["Alkaline Phosphatase", "ALP"],
        "U/L",
        between(40.0, 130.0),
    ),
    marker("chemistry", "UA", "Uric Acid", &["Uric Acid", "Urate"], UMOL_L, between(200.0, 430.0)),
    marker(
        "chemistry",
        "EGFR",
        "Estimated GFR",
        &["eGFR", "Estimated GFR"],
        "mL/min/1.73m2",
        at_least(90.0),
    ),
    BuiltinMarker {
        panel: "diabetes",
        code: "HBA1C",
        name: "Hemoglobin A1c",
        synonyms: &["Hemoglobin A1c", "Haemoglobin A1c", "Glycated Hemoglobin", "HbA1c", "A1c"],
        patterns: &[
            r"(?i)\b(?:hb)?a1c\b[^\d\n]{0,20}(?P<value>\d+(?:[.,]\d+)?)[ \t]*(?P<unit>%)?",
        ],
        unit: "%",
        range: between(4.0, 5.6),
    },
    marker(
        "diabetes",
        "INS",
        "Insulin",
        &["Fasting Insulin", "Insulin"],
        "pmol/L",
        between(18.0, 173.0),
    ),
    // Lipids
    marker(
        "lipid",
        "CHOL",
        "Total Cholesterol",
        &["Total Cholesterol", "Cholesterol, Total", "Cholesterol Total", "CHOL"],
        "mmol/L",
        at_most(5.2),
    ),
    marker(
        "lipid",
        "HDL",
        "HDL Cholesterol",
        &["HDL Cholesterol", "HDL-C", "HDL"],
        "mmol/L",
        at_least(1.0),
    ),
    marker(
        "lipid",
        "LDL",
        "LDL Cholesterol",
        &["LDL Cholesterol", "LDL-C", "LDL"],
        "mmol/L",
        at_most(3.4),
    ),
    marker(
        "lipid",
        "TRIG",
        "Triglycerides",
        &["Triglycerides", "Triglyceride", "TRIG", "TG"],
        "mmol/L",
        at_most(1.7),
    ),
    // Thyroid
    marker(
        "thyroid",
        "TSH",
        "Thyroid Stimulating Hormone",
        &["Thyroid Stimulating Hormone", "Thyrotropin", "TSH"],
        "mIU/L",
        between(0.4, 4.0),
    ),
    marker(
        "thyroid",
        "FT4",
        "Free T4",
        &["Free Thyroxine", "Free T4", "FT4"],
        "pmol/L",
        between(10.0, 23.0),
    ),
    marker(
        "thyroid",
        "FT3",
        "Free T3",
        &["Free Triiodothyronine", "Free T3", "FT3"],
        "pmol/L",
        between(3.1, 6.8),
    ),
    // Inflammatory
    marker(
        "inflammatory",
        "CRP",
        "C-Reactive Protein",
        &["C-Reactive Protein", "hs-CRP", "CRP"],
        "mg/L",
        at_most(5.0),
    ),
    marker(
        "inflammatory",
        "ESR",
        "Erythrocyte Sedimentation Rate",
        &["Erythrocyte Sedimentation Rate", "Sed Rate", "ESR"],
        "mm/h",
        at_most(20.0),
    ),
    // Iron and vitamins
    marker("iron", "FE", "Iron", &["Serum Iron", "Iron"], UMOL_L, between(10.0, 30.0)),
    marker("iron", "FERR", "Ferritin", &["Ferritin"], "\u{b5}g/L", between(30.0, 300.0)),
    marker(
        "vitamins",
        "VITD",
        "Vitamin D",
        &["25-Hydroxyvitamin D", "25-OH Vitamin D", "Vitamin D"],
        "nmol/L",
        between(75.0, 250.0),
    ),
    marker(
        "vitamins",
        "B12",
        "Vitamin B12",
        &["Vitamin B12", "Cobalamin", "B12"],
        "pmol/L",
        between(150.0, 600.0),
    ),
    marker("vitamins", "FOL", "Folate", &["Folate", "Folic Acid"], "nmol/L", between(7.0, 45.0)),
];

/// Materialize the built-in definitions in catalog order.
pub fn definitions() -> Vec<MarkerDefinition> {
    BUILTIN
        .iter()
        .map(|m| MarkerDefinition {
            panel: m.panel.to_string(),
            code: m.code.to_string(),
            name: m.name.to_string(),
            synonyms: m.synonyms.iter().map(|s| s.to_string()).collect(),
            extraction_patterns: m.patterns.iter().map(|s| s.to_string()).collect(),
            canonical_unit: m.unit.to_string(),
            reference_range: match m.range {
                (None, None) => None,
                (min, max) => Some(ReferenceRange {
                    min,
                    max,
                    unit: m.unit.to_string(),
                }),
            },
        })
        .collect()
}
