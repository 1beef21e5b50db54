//! Catalog-pattern matching: for each catalog marker, the first hit of
//! its patterns anywhere in the text.

use std::sync::LazyLock;

use regex::Regex;

use super::category::category_for_code;
use super::canonical_record;
use crate::catalog::matcher::NUMBER;
use crate::catalog::{MarkerCatalog, PatternMatch};
use crate::models::{CanonicalMarkerRecord, MarkerDefinition, MarkerValue};

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"({NUMBER})[ \t]*(?:-|\x{{2013}}|(?i:to))[ \t]*({NUMBER})"
    ))
    .expect("Invalid reference range regex")
});

/// One record per catalog marker found in `text`. Later occurrences of
/// the same marker are ignored.
pub fn extract_catalog_matches(
    catalog: &MarkerCatalog,
    text: &str,
    range_window: usize,
) -> Vec<CanonicalMarkerRecord> {
    let mut records = Vec::new();

    for (definition, matcher) in catalog.matchers() {
        let Some(hit) = matcher.find(text) else {
            continue;
        };
        match record_from_match(definition, &hit, text, range_window) {
            Some(record) => records.push(record),
            None => {
                tracing::debug!(code = %definition.code, "Unparseable value, marker skipped");
            }
        }
    }

    records
}

fn record_from_match(
    definition: &MarkerDefinition,
    hit: &PatternMatch,
    text: &str,
    range_window: usize,
) -> Option<CanonicalMarkerRecord> {
    let value = match MarkerValue::parse(&hit.value) {
        MarkerValue::Number(v) => v,
        MarkerValue::Text(_) => return None,
    };
    let (low, high) = match find_reference_range(text, hit.start, hit.end, range_window) {
        Some((low, high)) => (Some(low), Some(high)),
        None => (None, None),
    };

    Some(canonical_record(
        definition.code.clone(),
        definition.name.clone(),
        MarkerValue::Number(value),
        hit.unit.clone(),
        hit.flag.as_deref().and_then(|f| f.parse().ok()),
        (low, high),
        category_for_code(&definition.code),
    ))
}

/// Find a `low - high` range for the match at `start..end`. The match's
/// own line is searched first; failing that, `window` characters either
/// side. Within a region the nearest range after the match wins, else the
/// nearest before it. Ranges overlapping the match or with low > high
/// (dates, for instance) are ignored.
pub fn find_reference_range(
    text: &str,
    start: usize,
    end: usize,
    window: usize,
) -> Option<(f64, f64)> {
    let lo = chars_back(text, start, window);
    let hi = chars_forward(text, end, window);

    let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[end..].find('\n').map_or(text.len(), |i| end + i);

    nearest_range(text, lo.max(line_start), hi.min(line_end), start, end)
        .or_else(|| nearest_range(text, lo, hi, start, end))
}

fn nearest_range(text: &str, lo: usize, hi: usize, start: usize, end: usize) -> Option<(f64, f64)> {
    let mut before = None;
    for caps in RANGE_PATTERN.captures_iter(&text[lo..hi]) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let (Some(low), Some(high)) = (parse_number(&caps[1]), parse_number(&caps[2])) else {
            continue;
        };
        if low > high {
            continue;
        }
        let (abs_start, abs_end) = (lo + whole.start(), lo + whole.end());
        if abs_start >= end {
            return Some((low, high));
        }
        if abs_end <= start {
            before = Some((low, high));
        }
    }
    before
}

fn parse_number(s: &str) -> Option<f64> {
    MarkerValue::parse(s).as_f64()
}

/// Byte index `n` characters before `from`.
fn chars_back(text: &str, from: usize, n: usize) -> usize {
    if n == 0 {
        return from;
    }
    text[..from]
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(from)
}

/// Byte index `n` characters after `from`.
fn chars_forward(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| from + i)
        .unwrap_or(text.len())
}
