pub mod types;
pub mod category;
pub mod catalog_match;
pub mod table_rows;
pub mod fallback;
pub mod orchestrator;

pub use types::*;
pub use catalog_match::*;
pub use table_rows::*;
pub use fallback::*;
pub use orchestrator::*;

use thiserror::Error;

use crate::models::{AbnormalFlag, CanonicalMarkerRecord, MarkerCategory, MarkerValue};
use crate::units;

#[derive(Error, Debug)]
pub enum FallbackError {
    #[error("Fallback extractor unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed fallback response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),
}

/// Assemble a record and fill its SI fields. The converter is keyed by
/// code when it knows the code, otherwise by the name as written.
pub(crate) fn canonical_record(
    code: String,
    name: String,
    value: MarkerValue,
    unit: String,
    flag: Option<AbnormalFlag>,
    (ref_range_low, ref_range_high): (Option<f64>, Option<f64>),
    category: MarkerCategory,
) -> CanonicalMarkerRecord {
    let marker_key = if units::has_rules_for(&code) { &code } else { &name };
    let si = units::convert_value(marker_key, &value, &unit);

    CanonicalMarkerRecord {
        code,
        name,
        value,
        unit,
        value_si: si.value,
        unit_si: si.unit,
        ref_range_low,
        ref_range_high,
        category: Some(category),
        flag,
    }
}
