//! Player vitals carried across rounds

use crate::config::VitalsConstants;
use crate::outcome::VitalsDelta;
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    SepticShock,
    RenalFailure,
}

impl fmt::Display for GameOverCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOverCause::SepticShock => write!(f, "Septic Shock"),
            GameOverCause::RenalFailure => write!(f, "Acute Renal Failure"),
        }
    }
}

/// Blood pressure, kidney marker, resistance and level of the current run
///
/// Committed values change only through [`VitalsState::apply`] at round end.
/// Misses during a round move a provisional reading that is shown live and
/// discarded when the round's delta is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct VitalsState {
    limits: VitalsConstants,
    systolic_pressure: f64,
    kidney_marker: f64,
    resistance_score: f64,
    level: u32,
    provisional_toxicity: f64,
}

impl Default for VitalsState {
    fn default() -> Self {
        Self::new(VitalsConstants::default())
    }
}

impl VitalsState {
    pub fn new(limits: VitalsConstants) -> Self {
        VitalsState {
            systolic_pressure: limits.initial_systolic,
            kidney_marker: limits.initial_kidney_marker,
            resistance_score: 0.0,
            level: 1,
            provisional_toxicity: 0.0,
            limits,
        }
    }

    pub fn limits(&self) -> &VitalsConstants {
        &self.limits
    }

    pub fn systolic_pressure(&self) -> f64 {
        self.systolic_pressure
    }

    pub fn diastolic_pressure(&self) -> f64 {
        self.systolic_pressure * self.limits.diastolic_ratio
    }

    /// Committed kidney marker
    pub fn kidney_marker(&self) -> f64 {
        self.kidney_marker
    }

    /// Kidney marker including toxicity from the round in progress
    pub fn displayed_kidney_marker(&self) -> f64 {
        self.kidney_marker + self.provisional_toxicity
    }

    pub fn provisional_toxicity(&self) -> f64 {
        self.provisional_toxicity
    }

    pub fn resistance_score(&self) -> f64 {
        self.resistance_score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Live toxicity from misses in the current round
    pub fn record_provisional_toxicity(&mut self, amount: f64) {
        if amount > 0.0 {
            self.provisional_toxicity += amount;
        }
    }

    /// Commit a round's outcome and clear the provisional reading
    pub fn apply(&mut self, delta: &VitalsDelta) {
        self.systolic_pressure = (self.systolic_pressure - delta.pressure_drop).max(0.0);
        self.kidney_marker += delta.kidney_rise;
        self.resistance_score += delta.resistance_rise;
        self.provisional_toxicity = 0.0;

        info!(
            systolic = self.systolic_pressure,
            kidney = self.kidney_marker,
            resistance = self.resistance_score,
            level = self.level,
            "vitals updated"
        );
    }

    pub fn game_over_cause(&self) -> Option<GameOverCause> {
        if self.systolic_pressure < self.limits.shock_threshold {
            Some(GameOverCause::SepticShock)
        } else if self.kidney_marker > self.limits.renal_failure_threshold {
            Some(GameOverCause::RenalFailure)
        } else {
            None
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over_cause().is_some()
    }

    pub fn pressure_warning(&self) -> bool {
        self.systolic_pressure < self.limits.pressure_warning
    }

    pub fn kidney_warning(&self) -> bool {
        self.displayed_kidney_marker() > self.limits.kidney_warning
    }

    /// Fresh vitals for a new run; the resistance score carries over
    pub fn begin_run(&mut self) {
        self.systolic_pressure = self.limits.initial_systolic;
        self.kidney_marker = self.limits.initial_kidney_marker;
        self.level = 1;
        self.provisional_toxicity = 0.0;
    }

    pub fn advance_level(&mut self) {
        self.level += 1;
    }

    /// Return to start: everything back to initial values
    pub fn reset(&mut self) {
        *self = Self::new(self.limits.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_vitals() {
        let vitals = VitalsState::default();
        assert_eq!(vitals.systolic_pressure(), 120.0);
        assert_eq!(vitals.kidney_marker(), 0.8);
        assert_eq!(vitals.resistance_score(), 0.0);
        assert_eq!(vitals.level(), 1);
        assert!((vitals.diastolic_pressure() - 79.2).abs() < 1e-9);
        assert!(!vitals.is_game_over());
    }

    #[test]
    fn test_provisional_toxicity_is_not_committed_twice() {
        let mut vitals = VitalsState::default();
        vitals.record_provisional_toxicity(0.2);
        vitals.record_provisional_toxicity(0.2);
        assert!((vitals.displayed_kidney_marker() - 1.2).abs() < 1e-9);
        assert_eq!(vitals.kidney_marker(), 0.8);

        // Round-end delta already contains the 0.4 from misses
        vitals.apply(&VitalsDelta {
            pressure_drop: 0.0,
            kidney_rise: 0.4,
            resistance_rise: 0.0,
        });
        assert!((vitals.kidney_marker() - 1.2).abs() < 1e-9);
        assert_eq!(vitals.provisional_toxicity(), 0.0);
    }

    #[test]
    fn test_septic_shock() {
        let mut vitals = VitalsState::default();
        vitals.apply(&VitalsDelta {
            pressure_drop: 36.0,
            ..Default::default()
        });
        assert!(vitals.pressure_warning());
        assert!(!vitals.is_game_over());

        vitals.apply(&VitalsDelta {
            pressure_drop: 8.0,
            ..Default::default()
        });
        assert_eq!(vitals.game_over_cause(), Some(GameOverCause::SepticShock));
        assert_eq!(GameOverCause::SepticShock.to_string(), "Septic Shock");
    }

    #[test]
    fn test_renal_failure() {
        let mut vitals = VitalsState::default();
        vitals.apply(&VitalsDelta {
            kidney_rise: 1.0,
            ..Default::default()
        });
        assert!(vitals.kidney_warning());
        assert!(!vitals.is_game_over());

        vitals.apply(&VitalsDelta {
            kidney_rise: 0.8,
            ..Default::default()
        });
        assert_eq!(vitals.game_over_cause(), Some(GameOverCause::RenalFailure));
    }

    #[test]
    fn test_pressure_floors_at_zero() {
        let mut vitals = VitalsState::default();
        vitals.apply(&VitalsDelta {
            pressure_drop: 500.0,
            ..Default::default()
        });
        assert_eq!(vitals.systolic_pressure(), 0.0);
    }

    #[test]
    fn test_begin_run_keeps_resistance() {
        let mut vitals = VitalsState::default();
        vitals.apply(&VitalsDelta {
            pressure_drop: 20.0,
            kidney_rise: 0.5,
            resistance_rise: 10.0,
        });
        vitals.advance_level();
        vitals.begin_run();

        assert_eq!(vitals.systolic_pressure(), 120.0);
        assert_eq!(vitals.kidney_marker(), 0.8);
        assert_eq!(vitals.level(), 1);
        assert_eq!(vitals.resistance_score(), 10.0);

        vitals.reset();
        assert_eq!(vitals, VitalsState::default());
    }
}
