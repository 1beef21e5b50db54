//! Compiled per-marker matchers. Built once when the catalog is
//! constructed; a definition whose patterns fail to compile is skipped.

use regex::Regex;

use super::PatternError;
use crate::models::MarkerDefinition;

/// Numeric capture shared by every generated pattern. Comma-grouped
/// thousands ("7,500") are tried before a decimal comma ("14,3").
pub const NUMBER: &str = r"(?:[1-9]\d{0,2}(?:,\d{3})+\b(?:\.\d+)?|\d+(?:[.,]\d+)?)";

/// Unit capture: counts ("x10^9/L", "10E3/uL"), per-volume units ("/uL"),
/// or text starting with a letter, micro sign or percent.
pub const UNIT: &str = concat!(
    r"(?:x?10(?:\^|\*|[Ee])\d+/[A-Za-z\x{b5}\x{3bc}]+",
    r"|/[A-Za-z\x{b5}\x{3bc}][A-Za-z0-9\x{b5}\x{3bc}/]*",
    r"|[A-Za-z%\x{b5}\x{3bc}][A-Za-z0-9%\x{b5}\x{3bc}/\^\.]*)",
);

/// One hit for a marker in a block of text.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    /// Byte span of the whole match.
    pub start: usize,
    pub end: usize,
    pub value: String,
    pub flag: Option<String>,
    pub unit: String,
}

#[derive(Debug, Clone)]
pub struct MarkerMatcher {
    custom: Vec<Regex>,
    synonyms: Regex,
}

impl MarkerMatcher {
    pub fn compile(definition: &MarkerDefinition) -> Result<Self, PatternError> {
        let code = definition.code.as_str();

        let custom = definition
            .extraction_patterns
            .iter()
            .map(|p| compile_custom(code, p))
            .collect::<Result<Vec<_>, _>>()?;

        let synonyms = synonym_pattern(definition)?;
        let synonyms = Regex::new(&synonyms).map_err(|e| PatternError::InvalidRegex {
            code: code.to_string(),
            pattern: synonyms.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self { custom, synonyms })
    }

    /// First match in `text`. Catalog-supplied patterns are tried in
    /// order before the synonym pattern.
    pub fn find(&self, text: &str) -> Option<PatternMatch> {
        self.custom
            .iter()
            .chain(std::iter::once(&self.synonyms))
            .find_map(|re| capture(re, text))
    }
}

fn compile_custom(code: &str, pattern: &str) -> Result<Regex, PatternError> {
    let re = Regex::new(pattern).map_err(|e| PatternError::InvalidRegex {
        code: code.to_string(),
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    let has_value = re.capture_names().flatten().any(|n| n == "value");
    if !has_value && re.captures_len() < 2 {
        return Err(PatternError::MissingValueGroup {
            code: code.to_string(),
            pattern: pattern.to_string(),
        });
    }
    Ok(re)
}

/// `<synonym> [:=]? <number> [H|L]? <unit>?` with synonyms escaped and
/// longest first, so "HDL Cholesterol" wins over "HDL".
fn synonym_pattern(definition: &MarkerDefinition) -> Result<String, PatternError> {
    let mut names: Vec<&str> = definition
        .synonyms
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if names.is_empty() && !definition.name.trim().is_empty() {
        names.push(definition.name.trim());
    }
    if names.is_empty() {
        return Err(PatternError::EmptySynonyms(definition.code.clone()));
    }
    names.sort_by_key(|s| std::cmp::Reverse(s.chars().count()));

    let alternation = names
        .iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|");

    Ok(format!(
        concat!(
            r"(?i)\b(?:{alternation})[ \t]*(?:\([^)\n]{{0,20}}\))?[ \t]*[:=]?[ \t]*",
            r"(?P<value>{number})",
            r"(?:[ \t]*(?-i:(?P<flag>[HL]))\b)?",
            r"(?:[ \t]*(?P<unit>{unit}))?",
        ),
        alternation = alternation,
        number = NUMBER,
        unit = UNIT,
    ))
}

fn capture(re: &Regex, text: &str) -> Option<PatternMatch> {
    let caps = re.captures(text)?;
    let whole = caps.get(0)?;
    let value = caps.name("value").or_else(|| caps.get(1))?;
    Some(PatternMatch {
        start: whole.start(),
        end: whole.end(),
        value: value.as_str().to_string(),
        flag: caps.name("flag").map(|m| m.as_str().to_string()),
        unit: caps
            .name("unit")
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
    })
}
