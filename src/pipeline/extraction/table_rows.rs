//! Table-row matching: `<name> <value> [H|L] [unit] <low> - <high>`,
//! one row per line. Names need not be in the catalog.

use std::sync::LazyLock;

use regex::Regex;

use super::canonical_record;
use super::category::{category_for_code, resolve_code};
use crate::catalog::matcher::{NUMBER, UNIT};
use crate::models::{CanonicalMarkerRecord, MarkerValue};

static TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        concat!(
            r"^\s*(?P<name>[A-Za-z0-9][A-Za-z0-9 ,()/'\-\.]*?)",
            r"\s+(?P<value>{number})",
            r"(?:\s*(?P<flag>[HL])\b)?",
            r"(?:\s+(?P<unit>{unit}))?",
            r"\s+(?P<low>{number})\s*(?:-|\x{{2013}})\s*(?P<high>{number})",
        ),
        number = NUMBER,
        unit = UNIT,
    ))
    .expect("Invalid table row regex")
});

/// Records for table rows whose name is not already in `existing` or an
/// earlier row. Names are compared exactly as written.
pub fn extract_table_rows(
    text: &str,
    existing: &[CanonicalMarkerRecord],
) -> Vec<CanonicalMarkerRecord> {
    let mut rows: Vec<CanonicalMarkerRecord> = Vec::new();

    for line in text.lines() {
        let Some(caps) = TABLE_ROW.captures(line) else {
            continue;
        };

        let name = caps["name"].trim();
        if !name.chars().any(char::is_alphabetic) {
            continue;
        }
        if existing.iter().chain(rows.iter()).any(|r| r.name == name) {
            tracing::trace!("Duplicate table row name skipped");
            continue;
        }

        let value = match MarkerValue::parse(&caps["value"]) {
            MarkerValue::Number(v) => v,
            MarkerValue::Text(_) => continue,
        };
        let range = match (
            MarkerValue::parse(&caps["low"]).as_f64(),
            MarkerValue::parse(&caps["high"]).as_f64(),
        ) {
            (Some(low), Some(high)) if low <= high => (Some(low), Some(high)),
            _ => (None, None),
        };

        let code = resolve_code(name);
        let category = category_for_code(&code);
        rows.push(canonical_record(
            code,
            name.to_string(),
            MarkerValue::Number(value),
            caps.name("unit").map(|m| m.as_str().to_string()).unwrap_or_default(),
            caps.name("flag").and_then(|m| m.as_str().parse().ok()),
            range,
            category,
        ));
    }

    rows
}
