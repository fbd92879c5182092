//! Tunable game constants

use super::ConfigError;
use serde::{Deserialize, Serialize};

/// All tunable constants, grouped by the component that reads them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TuningConstants {
    #[serde(default)]
    pub dosing: DosingConstants,
    #[serde(default)]
    pub difficulty: DifficultyConstants,
    #[serde(default)]
    pub arena: ArenaConstants,
    #[serde(default)]
    pub outcome: OutcomeConstants,
    #[serde(default)]
    pub vitals: VitalsConstants,
}

impl TuningConstants {
    /// Constants from the bundled `config/tuning.toml`
    pub fn embedded() -> Self {
        Self::parse_or_default(include_str!("../../config/tuning.toml"))
    }

    fn parse_or_default(content: &str) -> Self {
        super::parse_toml(content).unwrap_or_else(|err| {
            tracing::error!(error = %err, "bundled tuning failed to load");
            TuningConstants::default()
        })
    }

    /// Reject values that would make the model divide by zero or never terminate
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("dosing.unit_per_shot", self.dosing.unit_per_shot),
            ("difficulty.efficacy_divisor", self.difficulty.efficacy_divisor),
            ("difficulty.safety_divisor", self.difficulty.safety_divisor),
            ("arena.width", self.arena.width),
            ("arena.height", self.arena.height),
            ("arena.projectile_speed", self.arena.projectile_speed),
            ("arena.particle_decay", self.arena.particle_decay),
            ("arena.reference_fps", self.arena.reference_fps),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.arena.columns < 2 {
            return Err(ConfigError::ValidationError(
                "arena.columns must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DosingConstants {
    /// Milligrams represented by one projectile / one target
    pub unit_per_shot: f64,
    /// Prescribed load above reference × factor counts as an overload
    pub overload_factor: f64,
}

impl Default for DosingConstants {
    fn default() -> Self {
        DosingConstants {
            unit_per_shot: 1000.0,
            overload_factor: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConstants {
    /// Target multiplier = 1 + (100 - efficacy) / efficacy_divisor
    pub efficacy_divisor: f64,
    /// Toxicity per shot = rating × toxicity_scale × (1 + (100 - safety) / safety_divisor)
    pub toxicity_scale: f64,
    pub safety_divisor: f64,
    /// Efficacy below this uses `fast_speed`
    pub medium_efficacy_threshold: f64,
    /// Efficacy at or above this uses `slow_speed`
    pub slow_efficacy_threshold: f64,
    pub fast_speed: f64,
    pub medium_speed: f64,
    pub slow_speed: f64,
}

impl Default for DifficultyConstants {
    fn default() -> Self {
        DifficultyConstants {
            efficacy_divisor: 80.0,
            toxicity_scale: 0.1,
            safety_divisor: 50.0,
            medium_efficacy_threshold: 60.0,
            slow_efficacy_threshold: 90.0,
            fast_speed: 3.0,
            medium_speed: 1.5,
            slow_speed: 0.5,
        }
    }
}

/// Geometry and physics of the simulation area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConstants {
    pub width: f64,
    pub height: f64,
    /// Targets per grid row
    pub columns: u32,
    /// Horizontal margin of the grid
    pub padding: f64,
    pub first_row_y: f64,
    pub row_spacing: f64,
    pub target_radius: f64,
    /// Added to the target radius for hit detection
    pub collision_slack: f64,
    /// Hit points of targets when the drug is not the right one
    pub resistant_hit_points: u32,
    /// Projectile speed in units per reference frame
    pub projectile_speed: f64,
    pub projectile_radius: f64,
    pub particles_per_hit: u32,
    /// Particle velocity components are drawn from ±spread/2
    pub particle_spread: f64,
    /// Particle life lost per second
    pub particle_decay: f64,
    /// Target oscillation phase advanced per second
    pub phase_rate: f64,
    /// Downward drift per second per unit of target speed
    pub drift_scale: f64,
    /// Fraction of per-shot toxicity charged for a missed shot
    pub miss_toxicity_factor: f64,
    /// Frame rate at which projectile and particle velocities are expressed
    pub reference_fps: f64,
}

impl Default for ArenaConstants {
    fn default() -> Self {
        ArenaConstants {
            width: 800.0,
            height: 600.0,
            columns: 8,
            padding: 40.0,
            first_row_y: 50.0,
            row_spacing: 45.0,
            target_radius: 18.0,
            collision_slack: 5.0,
            resistant_hit_points: 4,
            projectile_speed: 15.0,
            projectile_radius: 5.0,
            particles_per_hit: 5,
            particle_spread: 10.0,
            particle_decay: 2.0,
            phase_rate: 3.0,
            drift_scale: 5.0,
            miss_toxicity_factor: 0.5,
            reference_fps: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeConstants {
    /// Systolic drop per surviving target
    pub pressure_per_target: f64,
    /// Kidney-marker rise for an overloaded prescription
    pub overload_penalty: f64,
    /// Leftover ammo tolerated without penalty
    pub ammo_allowance: u32,
    /// Kidney-marker rise per leftover ammo unit above the allowance
    pub excess_ammo_penalty: f64,
    /// Resistance added when targets are cleared by a rejected regimen
    pub resistance_penalty: f64,
}

impl Default for OutcomeConstants {
    fn default() -> Self {
        OutcomeConstants {
            pressure_per_target: 4.0,
            overload_penalty: 0.3,
            ammo_allowance: 4,
            excess_ammo_penalty: 0.05,
            resistance_penalty: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalsConstants {
    pub initial_systolic: f64,
    pub initial_kidney_marker: f64,
    /// Systolic below this is septic shock
    pub shock_threshold: f64,
    /// Kidney marker above this is renal failure
    pub renal_failure_threshold: f64,
    pub pressure_warning: f64,
    pub kidney_warning: f64,
    /// Diastolic shown as systolic × ratio
    pub diastolic_ratio: f64,
}

impl Default for VitalsConstants {
    fn default() -> Self {
        VitalsConstants {
            initial_systolic: 120.0,
            initial_kidney_marker: 0.8,
            shock_threshold: 80.0,
            renal_failure_threshold: 2.5,
            pressure_warning: 90.0,
            kidney_warning: 1.5,
            diastolic_ratio: 0.66,
        }
    }
}
