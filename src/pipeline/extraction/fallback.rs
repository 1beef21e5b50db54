//! Validation for marker lists returned by the fallback extractor.
//!
//! The fallback is untrusted: items are parsed leniently and anything
//! without a usable name and value is dropped.

use serde::Deserialize;
use serde_json::Value;

use super::FallbackError;
use crate::models::{AbnormalFlag, MarkerCategory, MarkerValue};

#[derive(Debug, Deserialize)]
struct RawFallbackMarker {
    #[serde(alias = "test_name", alias = "marker")]
    name: String,
    #[serde(default, alias = "test_code")]
    code: Option<String>,
    value: Value,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default, alias = "reference_range_low")]
    ref_range_low: Option<Value>,
    #[serde(default, alias = "reference_range_high")]
    ref_range_high: Option<Value>,
    #[serde(default, alias = "abnormal_flag")]
    flag: Option<Value>,
    #[serde(default)]
    category: Option<Value>,
}

/// A fallback item that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackMarker {
    pub name: String,
    pub code: Option<String>,
    pub value: MarkerValue,
    pub unit: String,
    pub ref_range_low: Option<f64>,
    pub ref_range_high: Option<f64>,
    pub flag: Option<AbnormalFlag>,
    pub category: Option<MarkerCategory>,
}

impl FallbackMarker {
    /// Validate one untrusted item. `None` means drop it.
    pub fn validate(item: &Value) -> Option<Self> {
        let raw: RawFallbackMarker = serde_json::from_value(item.clone()).ok()?;

        let name = raw.name.trim();
        if name.is_empty() {
            return None;
        }
        let value = json_marker_value(&raw.value)?;

        Some(Self {
            name: name.to_string(),
            code: raw
                .code
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            value,
            unit: raw.unit.map(|u| u.trim().to_string()).unwrap_or_default(),
            ref_range_low: raw.ref_range_low.as_ref().and_then(json_number),
            ref_range_high: raw.ref_range_high.as_ref().and_then(json_number),
            flag: raw
                .flag
                .as_ref()
                .and_then(Value::as_str)
                .and_then(AbnormalFlag::parse_lenient),
            category: raw
                .category
                .as_ref()
                .and_then(Value::as_str)
                .and_then(|c| c.parse().ok()),
        })
    }
}

/// Pull the marker list out of a fallback response. Accepts a bare JSON
/// array, an object holding `markers` or `lab_results`, and either of
/// those inside a ```json fenced block.
pub fn parse_fallback_response(response: &str) -> Result<Vec<Value>, FallbackError> {
    let json_str = extract_json_block(response)?;
    let parsed: Value =
        serde_json::from_str(json_str).map_err(|e| FallbackError::JsonParsing(e.to_string()))?;

    match parsed {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => ["markers", "lab_results"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| FallbackError::MalformedResponse("No marker array in object".into())),
        _ => Err(FallbackError::MalformedResponse(
            "Expected a JSON array or object".into(),
        )),
    }
}

fn extract_json_block(response: &str) -> Result<&str, FallbackError> {
    let Some(fence) = response.find("```json") else {
        return Ok(response.trim());
    };
    let content_start = fence + "```json".len();
    let content_len = response[content_start..]
        .find("```")
        .ok_or_else(|| FallbackError::MalformedResponse("Unclosed JSON block".into()))?;
    Ok(response[content_start..content_start + content_len].trim())
}

fn json_marker_value(v: &Value) -> Option<MarkerValue> {
    match v {
        Value::Number(n) => n.as_f64().map(MarkerValue::Number),
        Value::String(s) if !s.trim().is_empty() => Some(MarkerValue::parse(s)),
        _ => None,
    }
}

fn json_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => MarkerValue::parse(s).as_f64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_minimal_item() {
        let m = FallbackMarker::validate(&json!({"name": "Glucose", "value": 90})).unwrap();
        assert_eq!(m.name, "Glucose");
        assert_eq!(m.value, MarkerValue::Number(90.0));
        assert_eq!(m.unit, "");
        assert!(m.code.is_none());
    }

    #[test]
    fn accepts_string_values_and_aliases() {
        let m = FallbackMarker::validate(&json!({
            "test_name": "HIV Screen",
            "value": "negative",
            "unit": null,
            "reference_range_low": "0.5",
            "abnormal_flag": "high",
            "category": "Chemistry"
        }))
        .unwrap();
        assert_eq!(m.value, MarkerValue::Text("negative".into()));
        assert_eq!(m.ref_range_low, Some(0.5));
        assert_eq!(m.flag, Some(AbnormalFlag::High));
        assert_eq!(m.category, Some(MarkerCategory::Chemistry));
    }

    #[test]
    fn rejects_missing_or_empty_fields() {
        assert!(FallbackMarker::validate(&json!({"value": 5})).is_none());
        assert!(FallbackMarker::validate(&json!({"name": "  ", "value": 5})).is_none());
        assert!(FallbackMarker::validate(&json!({"name": "Glucose"})).is_none());
        assert!(FallbackMarker::validate(&json!({"name": "Glucose", "value": null})).is_none());
        assert!(FallbackMarker::validate(&json!({"name": "Glucose", "value": ""})).is_none());
        assert!(FallbackMarker::validate(&json!({"name": "Glucose", "value": [1, 2]})).is_none());
        assert!(FallbackMarker::validate(&json!("Glucose 90")).is_none());
    }

    #[test]
    fn unknown_flag_and_category_ignored() {
        let m = FallbackMarker::validate(&json!({
            "name": "Glucose", "value": 5.1, "flag": "normal", "category": "Cardiac"
        }))
        .unwrap();
        assert!(m.flag.is_none());
        assert!(m.category.is_none());
    }

    #[test]
    fn parses_bare_array() {
        let items = parse_fallback_response(r#"[{"name":"Glucose","value":90}]"#).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn parses_fenced_object() {
        let response = concat!(
            "Here you go:\n```json\n",
            r#"{"markers": [{"name":"TSH","value":2.1}]}"#,
            "\n```\nDone.",
        );
        let items = parse_fallback_response(response).unwrap();
        assert_eq!(items[0]["name"], "TSH");
    }

    #[test]
    fn lab_results_key_accepted() {
        let items = parse_fallback_response(r#"{"lab_results": []}"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn malformed_responses_error() {
        assert!(matches!(
            parse_fallback_response("```json\n[1,2"),
            Err(FallbackError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_fallback_response("not json"),
            Err(FallbackError::JsonParsing(_))
        ));
        assert!(matches!(
            parse_fallback_response(r#"{"other": 1}"#),
            Err(FallbackError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_fallback_response("42"),
            Err(FallbackError::MalformedResponse(_))
        ));
    }
}
