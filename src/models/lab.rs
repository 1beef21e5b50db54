use serde::{Deserialize, Serialize};

use super::enums::{AbnormalFlag, MarkerCategory};

/// A measured value as it appears on a report: numeric, or free text
/// such as "positive" / "<0.1" that is carried through unconverted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkerValue {
    Number(f64),
    Text(String),
}

impl MarkerValue {
    /// Parse report text into a value. Comma-grouped thousands ("7,500")
    /// lose their commas; any other comma is a decimal comma ("14,3").
    /// Non-finite or non-numeric text is kept as `Text`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let normalized = if is_grouped_thousands(trimmed) {
            trimmed.replace(',', "")
        } else {
            trimmed.replace(',', ".")
        };
        match normalized.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Number(v),
            _ => Self::Text(trimmed.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }
}

/// "7,500", "250,000", "1,250.5": a 1-3 digit lead without a leading
/// zero, then one or more groups of exactly three digits.
fn is_grouped_thousands(s: &str) -> bool {
    let int_part = s.split_once('.').map_or(s, |(int, _)| int);
    let mut groups = int_part.split(',');
    let lead_ok = groups.next().is_some_and(|g| {
        (1..=3).contains(&g.len())
            && g.chars().all(|c| c.is_ascii_digit())
            && !g.starts_with('0')
    });
    let mut rest = groups.peekable();
    lead_ok
        && rest.peek().is_some()
        && rest.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

impl From<f64> for MarkerValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl std::fmt::Display for MarkerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(t) => f.write_str(t),
        }
    }
}

/// Normalized output for one recognized measurement.
///
/// `value`/`unit` are as reported; `value_si`/`unit_si` are normalized.
/// Reference range comes from the source text, never from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMarkerRecord {
    pub code: String,
    pub name: String,
    pub value: MarkerValue,
    pub unit: String,
    pub value_si: MarkerValue,
    pub unit_si: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_range_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_range_high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<MarkerCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<AbnormalFlag>,
}

/// Untrusted value/unit pair handed in by a caller, keyed by the marker
/// name as written on the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMeasurement {
    pub marker_name: String,
    pub value: MarkerValue,
    #[serde(default)]
    pub unit: String,
}

impl RawMeasurement {
    pub fn new(
        marker_name: impl Into<String>,
        value: impl Into<MarkerValue>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            marker_name: marker_name.into(),
            value: value.into(),
            unit: unit.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_numeric_and_text_values() {
        assert_eq!(MarkerValue::parse("14.3"), MarkerValue::Number(14.3));
        assert_eq!(MarkerValue::parse(" 14,3 "), MarkerValue::Number(14.3));
        assert_eq!(MarkerValue::parse("positive"), MarkerValue::Text("positive".into()));
        assert_eq!(MarkerValue::parse("<0.1"), MarkerValue::Text("<0.1".into()));
        assert_eq!(MarkerValue::parse("NaN"), MarkerValue::Text("NaN".into()));
    }

    #[test]
    fn grouped_thousands_are_not_decimal_commas() {
        assert_eq!(MarkerValue::parse("7,500"), MarkerValue::Number(7500.0));
        assert_eq!(MarkerValue::parse("250,000"), MarkerValue::Number(250000.0));
        assert_eq!(MarkerValue::parse("1,250"), MarkerValue::Number(1250.0));
        assert_eq!(MarkerValue::parse("1,250,000.5"), MarkerValue::Number(1250000.5));
        assert_eq!(MarkerValue::parse("14,3"), MarkerValue::Number(14.3));
        assert_eq!(MarkerValue::parse("0,125"), MarkerValue::Number(0.125));
        assert_eq!(MarkerValue::parse("1,2345"), MarkerValue::Number(1.2345));
    }

    #[test]
    fn as_f64_only_for_finite_numbers() {
        assert_eq!(MarkerValue::Number(5.0).as_f64(), Some(5.0));
        assert_eq!(MarkerValue::Number(f64::NAN).as_f64(), None);
        assert_eq!(MarkerValue::Text("5".into()).as_f64(), None);
    }

    #[test]
    fn record_serializes_flat_and_omits_empty_optionals() {
        let record = CanonicalMarkerRecord {
            code: "GLU".into(),
            name: "Glucose".into(),
            value: MarkerValue::Number(90.0),
            unit: "mg/dL".into(),
            value_si: MarkerValue::Number(5.0),
            unit_si: "mmol/L".into(),
            ref_range_low: Some(70.0),
            ref_range_high: Some(100.0),
            category: Some(MarkerCategory::Chemistry),
            flag: None,
        };
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["code"], "GLU");
        assert_eq!(json["value"], 90.0);
        assert_eq!(json["value_si"], 5.0);
        assert_eq!(json["unit_si"], "mmol/L");
        assert_eq!(json["ref_range_low"], 70.0);
        assert_eq!(json["category"], "Chemistry");
        assert!(json.get("flag").is_none());
    }

    #[test]
    fn text_value_serializes_as_string() {
        let json = serde_json::to_string(&MarkerValue::Text("positive".into())).unwrap();
        assert_eq!(json, "\"positive\"");
        let back: MarkerValue = serde_json::from_str("7.5").unwrap();
        assert_eq!(back, MarkerValue::Number(7.5));
    }
}
