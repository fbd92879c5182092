//! Outcome synthesis - a finished round plus the judgment to a verdict and vitals change

use crate::config::TuningConstants;
use crate::dosing::{is_overload, load};
use crate::engine::RoundResult;
use crate::judgment::Judgment;
use crate::types::Protocol;
use serde::{Deserialize, Serialize};

pub const MSG_CLEARED_BUT_REJECTED: &str = "Bacteria Eradicated, but Clinical Failure";
pub const MSG_APPROVED_BUT_OVERWHELMED: &str =
    "Clinical Choice Valid, but Bacterial Load Overwhelming";
pub const MSG_INEFFECTIVE: &str = "Treatment Failed: Ineffective Regimen";

/// Change to apply to the player's vitals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VitalsDelta {
    /// Systolic drop (positive lowers pressure)
    pub pressure_drop: f64,
    pub kidney_rise: f64,
    pub resistance_rise: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub success: bool,
    pub message: String,
    pub reasoning: String,
    pub vitals_delta: VitalsDelta,
}

/// [`synthesize_with`] using the default tuning
pub fn synthesize(
    result: &RoundResult,
    prescribed: &Protocol,
    reference: &Protocol,
    judgment: &Judgment,
) -> RoundOutcome {
    synthesize_with(
        &TuningConstants::default(),
        result,
        prescribed,
        reference,
        judgment,
    )
}

pub fn synthesize_with(
    tuning: &TuningConstants,
    result: &RoundResult,
    prescribed: &Protocol,
    reference: &Protocol,
    judgment: &Judgment,
) -> RoundOutcome {
    let rules = &tuning.outcome;

    let pressure_drop = result.remaining_targets as f64 * rules.pressure_per_target;

    let mut kidney_rise = result.accumulated_toxicity;
    if is_overload(load(reference), load(prescribed), tuning.dosing.overload_factor) {
        kidney_rise += rules.overload_penalty;
    }
    let excess_ammo = result.remaining_ammo.saturating_sub(rules.ammo_allowance);
    kidney_rise += excess_ammo as f64 * rules.excess_ammo_penalty;

    let mut resistance_rise = 0.0;
    let (success, message) = match (result.is_cleared(), judgment.approved) {
        (true, true) => (true, judgment.title.clone()),
        (true, false) => {
            resistance_rise = rules.resistance_penalty;
            (false, MSG_CLEARED_BUT_REJECTED.to_string())
        }
        (false, true) => (false, MSG_APPROVED_BUT_OVERWHELMED.to_string()),
        (false, false) => (false, MSG_INEFFECTIVE.to_string()),
    };

    RoundOutcome {
        success,
        message,
        reasoning: judgment.reasoning.clone(),
        vitals_delta: VitalsDelta {
            pressure_drop,
            kidney_rise,
            resistance_rise,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn judgment(approved: bool) -> Judgment {
        Judgment {
            approved,
            efficacy_score: if approved { 95.0 } else { 10.0 },
            safety_score: 100.0,
            title: "Gold Standard Therapy".to_string(),
            reasoning: "Penicillin remains first line.".to_string(),
        }
    }

    fn round(remaining_targets: u32, remaining_ammo: u32, toxicity: f64) -> RoundResult {
        RoundResult {
            remaining_targets,
            remaining_ammo,
            accumulated_toxicity: toxicity,
        }
    }

    fn reference() -> Protocol {
        Protocol::new("pen_v", 500.0, 12.0, 7)
    }

    #[test]
    fn test_cleared_and_approved_uses_title() {
        let outcome = synthesize(&round(0, 1, 0.0), &reference(), &reference(), &judgment(true));
        assert!(outcome.success);
        assert_eq!(outcome.message, "Gold Standard Therapy");
        assert_eq!(outcome.reasoning, "Penicillin remains first line.");
        assert_eq!(outcome.vitals_delta, VitalsDelta::default());
    }

    #[test]
    fn test_cleared_but_rejected_raises_resistance() {
        let outcome = synthesize(&round(0, 0, 0.0), &reference(), &reference(), &judgment(false));
        assert!(!outcome.success);
        assert_eq!(outcome.message, MSG_CLEARED_BUT_REJECTED);
        assert!((outcome.vitals_delta.resistance_rise - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_remaining_targets_drop_pressure() {
        let outcome = synthesize(&round(3, 0, 0.0), &reference(), &reference(), &judgment(true));
        assert!(!outcome.success);
        assert_eq!(outcome.message, MSG_APPROVED_BUT_OVERWHELMED);
        assert!((outcome.vitals_delta.pressure_drop - 12.0).abs() < f64::EPSILON);
        assert_eq!(outcome.vitals_delta.resistance_rise, 0.0);
    }

    #[test]
    fn test_ineffective_regimen() {
        let prescribed = Protocol::new("cipro", 500.0, 12.0, 3);
        let outcome = synthesize(&round(6, 0, 0.6), &prescribed, &reference(), &judgment(false));
        assert!(!outcome.success);
        assert_eq!(outcome.message, MSG_INEFFECTIVE);
        assert!((outcome.vitals_delta.kidney_rise - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_overload_and_excess_ammo_hurt_kidneys() {
        // 7000 reference against 21000 prescribed, 10 shots left over
        let prescribed = Protocol::new("pen_v", 1500.0, 12.0, 7);
        let outcome = synthesize(&round(0, 10, 0.25), &prescribed, &reference(), &judgment(true));

        // 0.25 + 0.3 + (10 - 4) × 0.05
        assert!((outcome.vitals_delta.kidney_rise - 0.85).abs() < 1e-12);
        assert!(outcome.success);
    }

    #[test]
    fn test_ammo_allowance_is_free() {
        let outcome = synthesize(&round(0, 4, 0.0), &reference(), &reference(), &judgment(true));
        assert_eq!(outcome.vitals_delta.kidney_rise, 0.0);
    }
}
