//! Score parser: turns a model reply into an ATS score.
//!
//! The model is told to emit `{"ats_score": <number>}` but is not trusted to.
//! Fallback chain, in order:
//! 1. strict JSON: the whole trimmed reply is an object with a numeric
//!    (or numeric-string) `ats_score`
//! 2. the FIRST run of ASCII digits `0-9` anywhere in the reply
//!    ("Score: 85 out of 100" → 85, even though 100 follows). Digits from
//!    other scripts ("٨٥") do not count.
//! 3. 0.0
//!
//! Parsing never fails. Out-of-range values are passed through unchanged and
//! flagged via `ParsedScore::is_suspect`.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

pub const SCORE_KEY: &str = "ats_score";
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Json,
    DigitRun,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParsedScore {
    pub value: f64,
    pub source: ScoreSource,
}

impl ParsedScore {
    /// True when the value lies outside [0, 100], which points at a parse
    /// misfire rather than a real score.
    pub fn is_suspect(&self) -> bool {
        !(MIN_SCORE..=MAX_SCORE).contains(&self.value)
    }
}

pub fn parse_score(reply: &str) -> ParsedScore {
    if let Some(value) = parse_strict(reply) {
        return ParsedScore {
            value,
            source: ScoreSource::Json,
        };
    }

    if let Some(value) = first_digit_run(reply) {
        return ParsedScore {
            value,
            source: ScoreSource::DigitRun,
        };
    }

    ParsedScore {
        value: 0.0,
        source: ScoreSource::Fallback,
    }
}

fn parse_strict(reply: &str) -> Option<f64> {
    let parsed: Value = serde_json::from_str(reply.trim()).ok()?;
    match parsed.get(SCORE_KEY)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn first_digit_run(reply: &str) -> Option<f64> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let digits = DIGITS.get_or_init(|| Regex::new(r"[0-9]+").expect("valid digit-run regex"));

    digits
        .find(reply)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_json_integer() {
        let score = parse_score(r#"{"ats_score": 85}"#);
        assert_eq!(score.value, 85.0);
        assert_eq!(score.source, ScoreSource::Json);
    }

    #[test]
    fn test_strict_json_returns_exact_value_across_range() {
        for n in [0.0, 1.0, 42.5, 72.25, 99.9, 100.0] {
            let reply = format!("{{\"ats_score\": {n}}}");
            assert_eq!(parse_score(&reply).value, n, "reply {reply}");
        }
    }

    #[test]
    fn test_strict_json_with_surrounding_whitespace() {
        let reply = "\n   {\n    \"ats_score\": 64\n}\n  ";
        let score = parse_score(reply);
        assert_eq!(score.value, 64.0);
        assert_eq!(score.source, ScoreSource::Json);
    }

    #[test]
    fn test_numeric_string_value_is_coerced() {
        let score = parse_score(r#"{"ats_score": "77.5"}"#);
        assert_eq!(score.value, 77.5);
        assert_eq!(score.source, ScoreSource::Json);
    }

    #[test]
    fn test_prose_takes_first_digit_run() {
        let score = parse_score("Score: 85 out of 100");
        assert_eq!(score.value, 85.0);
        assert_eq!(score.source, ScoreSource::DigitRun);
    }

    #[test]
    fn test_prose_with_percent() {
        assert_eq!(parse_score("The ATS score is 85%").value, 85.0);
    }

    #[test]
    fn test_decimal_in_prose_reads_integer_part_only() {
        assert_eq!(parse_score("Roughly 72.5 overall").value, 72.0);
    }

    #[test]
    fn test_preamble_number_wins_over_score() {
        // Known misfire: an unrelated leading number is taken.
        assert_eq!(parse_score("Compared 3 sections; score 80").value, 3.0);
    }

    #[test]
    fn test_missing_key_falls_back_to_digits() {
        let score = parse_score(r#"{"score": 70}"#);
        assert_eq!(score.value, 70.0);
        assert_eq!(score.source, ScoreSource::DigitRun);
    }

    #[test]
    fn test_non_numeric_value_falls_back_to_digits() {
        let score = parse_score(r#"{"ats_score": "high", "confidence": 9}"#);
        assert_eq!(score.value, 9.0);
        assert_eq!(score.source, ScoreSource::DigitRun);
    }

    #[test]
    fn test_fenced_json_uses_digit_fallback() {
        let score = parse_score("```json\n{\"ats_score\": 88}\n```");
        assert_eq!(score.value, 88.0);
        assert_eq!(score.source, ScoreSource::DigitRun);
    }

    #[test]
    fn test_no_digits_returns_zero() {
        let score = parse_score("I cannot evaluate this CV.");
        assert_eq!(score.value, 0.0);
        assert_eq!(score.source, ScoreSource::Fallback);
    }

    #[test]
    fn test_only_ascii_digits_count() {
        let score = parse_score("Score: ٨٥");
        assert_eq!(score.value, 0.0);
        assert_eq!(score.source, ScoreSource::Fallback);

        assert_eq!(parse_score("٨٥ / score 72").value, 72.0);
    }

    #[test]
    fn test_empty_reply_returns_zero() {
        assert_eq!(parse_score("").value, 0.0);
    }

    #[test]
    fn test_out_of_range_is_flagged_not_clamped() {
        let score = parse_score(r#"{"ats_score": 850}"#);
        assert_eq!(score.value, 850.0);
        assert!(score.is_suspect());

        let negative = parse_score(r#"{"ats_score": -5}"#);
        assert_eq!(negative.value, -5.0);
        assert!(negative.is_suspect());
    }

    #[test]
    fn test_bounds_are_not_suspect() {
        assert!(!parse_score(r#"{"ats_score": 0}"#).is_suspect());
        assert!(!parse_score(r#"{"ats_score": 100}"#).is_suspect());
    }
}
