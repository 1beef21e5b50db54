//! Unit converter: (marker, raw value, raw unit) → (SI value, SI unit).
//!
//! Pure and infallible. Unknown combinations and non-numeric values are
//! passed through unchanged; `ConversionOutcome` says which path was taken.

pub mod table;

pub use table::{ConversionRule, CONVERSIONS, MARKER_ALIASES};

use serde::Serialize;

use crate::models::MarkerValue;

/// Unit spellings accepted as already-SI (normalized form).
const SI_UNITS: &[&str] = &["mmol/l", "umol/l", "nmol/l", "pmol/l", "g/l", "%"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// A table rule matched and was applied.
    Converted,
    /// No rule, but the unit is already an accepted SI form.
    AlreadySi,
    /// No rule and not SI; value and unit returned as given.
    PassThrough,
    /// The value was not a finite number; nothing attempted.
    NonNumeric,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiConversion {
    pub value: MarkerValue,
    pub unit: String,
    pub outcome: ConversionOutcome,
}

/// Normalize a marker name or code into a canonical marker key:
/// lowercase, separators (whitespace, `_`, `-`, `/`) collapsed to one `_`,
/// other punctuation dropped, then known aliases collapsed.
pub fn normalize_marker_key(marker: &str) -> String {
    let lower = marker.trim().to_lowercase();
    let mut key = String::with_capacity(lower.len());
    let mut pending_sep = false;

    for ch in lower.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !key.is_empty() {
                key.push('_');
            }
            pending_sep = false;
            key.push(ch);
        } else if ch.is_whitespace() || matches!(ch, '_' | '-' | '/') {
            pending_sep = true;
        }
    }

    match table::resolve_alias(&key) {
        Some(canonical) => canonical.to_string(),
        None => key,
    }
}

/// Normalize a unit for lookup: lowercase, whitespace removed, micro
/// sign / Greek mu folded to `u`, `mcg` folded to `ug`.
pub fn normalize_unit(unit: &str) -> String {
    let compact: String = unit
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '\u{b5}' | '\u{3bc}' | '\u{39c}' => 'u',
            other => other,
        })
        .collect::<String>()
        .to_lowercase();
    compact.replace("mcg", "ug")
}

/// Combined lookup key `"{marker}_{unit}"`.
pub fn lookup_key(marker: &str, unit: &str) -> String {
    format!("{}_{}", normalize_marker_key(marker), normalize_unit(unit))
}

pub fn is_si_unit(unit: &str) -> bool {
    let normalized = normalize_unit(unit);
    SI_UNITS.contains(&normalized.as_str())
}

/// Whether the converter knows any rule for this marker (under any unit).
pub fn has_rules_for(marker: &str) -> bool {
    let prefix = format!("{}_", normalize_marker_key(marker));
    CONVERSIONS.iter().any(|r| {
        r.key
            .strip_prefix(prefix.as_str())
            .is_some_and(|unit| !unit.contains('_'))
    })
}

/// Convert a numeric value to SI. NaN and infinities are treated as
/// non-numeric and returned unchanged.
pub fn convert_to_si(marker: &str, value: f64, unit: &str) -> SiConversion {
    if !value.is_finite() {
        return SiConversion {
            value: MarkerValue::Number(value),
            unit: unit.to_string(),
            outcome: ConversionOutcome::NonNumeric,
        };
    }

    let key = lookup_key(marker, unit);
    match table::find_rule(&key) {
        Some(rule) => SiConversion {
            value: MarkerValue::Number(round2(rule.op.apply(value, rule.factor))),
            unit: rule.si_unit.to_string(),
            outcome: ConversionOutcome::Converted,
        },
        None => {
            let outcome = if is_si_unit(unit) {
                ConversionOutcome::AlreadySi
            } else {
                ConversionOutcome::PassThrough
            };
            tracing::trace!(key = %key, ?outcome, "No conversion rule");
            SiConversion {
                value: MarkerValue::Number(value),
                unit: unit.to_string(),
                outcome,
            }
        }
    }
}

/// Convert a value that may be free text. Text is never parsed here;
/// callers that hold report text should use `MarkerValue::parse` first.
pub fn convert_value(marker: &str, value: &MarkerValue, unit: &str) -> SiConversion {
    match value {
        MarkerValue::Number(v) => convert_to_si(marker, *v, unit),
        MarkerValue::Text(_) => SiConversion {
            value: value.clone(),
            unit: unit.to_string(),
            outcome: ConversionOutcome::NonNumeric,
        },
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
