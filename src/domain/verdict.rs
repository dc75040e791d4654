// ============================================================
// Layer 3 — Verdict Fusion
// ============================================================
// Combines the two signals of a check into a final decision:
//
//   similarity  — max cosine similarity vs the reference corpus (0-100)
//   probability — average per-chunk plagiarism probability (0-100)
//
// Decision table (default thresholds):
//
//   similarity < 30             → Original  (overrides the classifier)
//   probability > 70            → Plagiarized
//   probability < 30            → Original
//   otherwise                   → Manual Review
//
// Nothing is learnt here; the thresholds are configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DetectError;

/// Final categorical decision for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Original,
    Plagiarized,
    ManualReview,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Original     => write!(f, "✅ Original"),
            Verdict::Plagiarized  => write!(f, "❌ Likely Plagiarized"),
            Verdict::ManualReview => write!(f, "⚠️ Manual Review Suggested"),
        }
    }
}

/// Which row of the decision table fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionRule {
    SimilarityBelowFloor,
    ProbabilityAbove,
    ProbabilityBelow,
    Undecided,
}

/// A verdict together with the rule and thresholds that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub verdict: Verdict,
    pub rule:    DecisionRule,
    pub policy:  FusionPolicy,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule {
            DecisionRule::SimilarityBelowFloor => write!(
                f,
                "{} (Cosine similarity < {}%)",
                self.verdict, self.policy.similarity_floor
            ),
            _ => write!(f, "{}", self.verdict),
        }
    }
}

/// Threshold policy, all values in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionPolicy {
    /// Below this similarity the document is Original regardless of the classifier
    pub similarity_floor: f64,
    /// Average probability strictly above this → Plagiarized
    pub plagiarized_above: f64,
    /// Average probability strictly below this → Original
    pub original_below: f64,
}

impl Default for FusionPolicy {
    fn default() -> Self {
        Self {
            similarity_floor:  30.0,
            plagiarized_above: 70.0,
            original_below:    30.0,
        }
    }
}

impl FusionPolicy {
    pub fn new(similarity_floor: f64, plagiarized_above: f64, original_below: f64) -> Self {
        Self { similarity_floor, plagiarized_above, original_below }
    }

    /// Every threshold must be a percentage and every row of the table reachable.
    pub fn validate(&self) -> Result<(), DetectError> {
        let thresholds = [
            ("similarity floor", self.similarity_floor),
            ("plagiarized-above", self.plagiarized_above),
            ("original-below", self.original_below),
        ];
        for (name, value) in thresholds {
            if !(0.0..=100.0).contains(&value) {
                return Err(DetectError::InvalidConfig(format!(
                    "{name} threshold {value} is outside 0-100%"
                )));
            }
        }
        if self.original_below > self.plagiarized_above {
            return Err(DetectError::InvalidConfig(format!(
                "original-below ({}) must not exceed plagiarized-above ({})",
                self.original_below, self.plagiarized_above
            )));
        }
        Ok(())
    }

    /// Apply the decision table to one (similarity, average probability) pair.
    pub fn decide(&self, similarity: f64, avg_probability: f64) -> Decision {
        let (verdict, rule) = if similarity < self.similarity_floor {
            (Verdict::Original, DecisionRule::SimilarityBelowFloor)
        } else if avg_probability > self.plagiarized_above {
            (Verdict::Plagiarized, DecisionRule::ProbabilityAbove)
        } else if avg_probability < self.original_below {
            (Verdict::Original, DecisionRule::ProbabilityBelow)
        } else {
            (Verdict::ManualReview, DecisionRule::Undecided)
        };
        Decision { verdict, rule, policy: *self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(similarity: f64, avg: f64) -> Verdict {
        FusionPolicy::default().decide(similarity, avg).verdict
    }

    #[test]
    fn test_low_similarity_overrides_confident_classifier() {
        assert_eq!(verdict(20.0, 99.0), Verdict::Original);
        let d = FusionPolicy::default().decide(20.0, 99.0);
        assert_eq!(d.rule, DecisionRule::SimilarityBelowFloor);
    }

    #[test]
    fn test_high_probability_is_plagiarized() {
        assert_eq!(verdict(50.0, 80.0), Verdict::Plagiarized);
    }

    #[test]
    fn test_middle_band_needs_manual_review() {
        assert_eq!(verdict(50.0, 50.0), Verdict::ManualReview);
    }

    #[test]
    fn test_low_probability_is_original() {
        assert_eq!(verdict(50.0, 10.0), Verdict::Original);
        assert_eq!(
            FusionPolicy::default().decide(50.0, 10.0).rule,
            DecisionRule::ProbabilityBelow
        );
    }

    #[test]
    fn test_thresholds_are_strict() {
        // exactly on a threshold falls through to the next row
        assert_eq!(verdict(30.0, 70.0), Verdict::ManualReview);
        assert_eq!(verdict(30.0, 30.0), Verdict::ManualReview);
    }

    #[test]
    fn test_custom_policy() {
        let policy = FusionPolicy::new(10.0, 90.0, 20.0);
        assert_eq!(policy.decide(15.0, 80.0).verdict, Verdict::ManualReview);
        assert_eq!(policy.decide(5.0, 100.0).verdict, Verdict::Original);
    }

    #[test]
    fn test_overlapping_probability_thresholds_are_rejected() {
        assert!(FusionPolicy::default().validate().is_ok());
        assert!(FusionPolicy::new(30.0, 70.0, 70.0).validate().is_ok());
        assert!(matches!(
            FusionPolicy::new(30.0, 70.0, 90.0).validate(),
            Err(DetectError::InvalidConfig(_))
        ));
        assert!(matches!(
            FusionPolicy::new(130.0, 70.0, 30.0).validate(),
            Err(DetectError::InvalidConfig(_))
        ));
        assert!(FusionPolicy::new(f64::NAN, 70.0, 30.0).validate().is_err());
    }

    #[test]
    fn test_display_mentions_override() {
        let text = FusionPolicy::default().decide(12.0, 90.0).to_string();
        assert!(text.contains("Cosine similarity < 30%"));
    }
}
