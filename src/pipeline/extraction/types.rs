use serde::{Deserialize, Serialize};

/// Below this many deterministic matches the extractor hands off to the
/// fallback extractor.
pub const DEFAULT_FALLBACK_THRESHOLD: usize = 3;

/// Characters searched either side of a catalog match for a `low - high`
/// reference range.
pub const DEFAULT_RANGE_WINDOW: usize = 100;

/// Maximum plausible lab results from a single document.
pub const MAX_RESULTS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub fallback_threshold: usize,
    pub range_window_chars: usize,
    pub max_results: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
            range_window_chars: DEFAULT_RANGE_WINDOW,
            max_results: MAX_RESULTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ExtractionConfig::default();
        assert_eq!(c.fallback_threshold, 3);
        assert_eq!(c.range_window_chars, 100);
        assert_eq!(c.max_results, 200);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let c: ExtractionConfig = serde_json::from_str(r#"{"fallback_threshold":5}"#).unwrap();
        assert_eq!(c.fallback_threshold, 5);
        assert_eq!(c.range_window_chars, 100);
    }
}
