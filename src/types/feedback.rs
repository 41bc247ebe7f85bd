//! Structured coaching feedback returned by the generation backend

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upper bound of every score on the feedback scale
pub const MAX_SCORE: f64 = 10.0;

/// Output schema the generation backend must fill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackOutput {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub rewrites: Vec<String>,
    #[serde(default)]
    pub risk_flags: Vec<String>,
    #[serde(default)]
    pub scores: Scores,
}

/// Numeric scores: an optional overall value plus any named dimensions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall: Option<f64>,
    #[serde(flatten)]
    pub dimensions: BTreeMap<String, f64>,
}

impl Scores {
    /// `Err` names the offending score when `overall` leaves the 0..=10 range
    pub fn check_overall(&self) -> Result<(), String> {
        match self.overall {
            Some(value) if !(0.0..=MAX_SCORE).contains(&value) => Err(format!(
                "overall score {} outside 0..={}",
                value, MAX_SCORE
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_output() {
        let json = r#"{
            "summary": "Klar strukturiert.",
            "strengths": ["Offene Fragen"],
            "improvements": ["Mehr Pausen"],
            "rewrites": [],
            "riskFlags": ["Zeitdruck"],
            "scores": {"overall": 7.5, "empathy": 6}
        }"#;
        let output: FeedbackOutput = serde_json::from_str(json).unwrap();
        assert_eq!(output.risk_flags, vec!["Zeitdruck".to_string()]);
        assert_eq!(output.scores.overall, Some(7.5));
        assert_eq!(output.scores.dimensions.get("empathy"), Some(&6.0));
        assert!(output.scores.check_overall().is_ok());
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let output: FeedbackOutput = serde_json::from_str(r#"{"summary": "ok"}"#).unwrap();
        assert!(output.strengths.is_empty());
        assert!(output.scores.overall.is_none());
    }

    #[test]
    fn test_overall_out_of_range() {
        let scores = Scores {
            overall: Some(11.0),
            dimensions: BTreeMap::new(),
        };
        assert!(scores.check_overall().is_err());
    }
}
