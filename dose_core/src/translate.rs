//! Difficulty translation - prescription plus judgment to round parameters
//!
//! The reference protocol fixes how much infection there is (targets), the
//! prescription fixes how much drug is available (ammo), and the judgment
//! scales both the toughness of the infection and the cost of every shot.

use crate::catalog::Catalog;
use crate::config::TuningConstants;
use crate::dosing::load;
use crate::judgment::Judgment;
use crate::types::{Disease, Protocol, Rgb};
use serde::{Deserialize, Serialize};

/// Frozen difficulty parameters for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Projectiles available
    pub ammo_count: u32,
    /// Hit points removed per hit: 1 for an approved regimen, 0 otherwise
    pub damage_per_shot: u32,
    /// Kidney-marker cost of a shot; a miss charges a fraction of it
    pub toxicity_per_shot: f64,
    pub target_count: u32,
    /// Downward drift multiplier
    pub target_speed: f64,
    pub target_color: Rgb,
    pub is_correct_drug: bool,
}

impl SimulationConfig {
    pub fn with_target_color(mut self, color: Rgb) -> Self {
        self.target_color = color;
        self
    }
}

/// [`translate_with`] using the default tuning
pub fn translate(
    reference: &Protocol,
    prescribed: &Protocol,
    judgment: &Judgment,
    toxicity_rating: u32,
) -> SimulationConfig {
    translate_with(
        &TuningConstants::default(),
        reference,
        prescribed,
        judgment,
        toxicity_rating,
    )
}

/// Derive round parameters from both protocols, the judgment and the drug's toxicity rating
///
/// An approved regimen always gets at least one spare shot over the number of targets.
pub fn translate_with(
    tuning: &TuningConstants,
    reference: &Protocol,
    prescribed: &Protocol,
    judgment: &Judgment,
    toxicity_rating: u32,
) -> SimulationConfig {
    let unit = tuning.dosing.unit_per_shot;
    let difficulty = &tuning.difficulty;
    let efficacy = judgment.efficacy_score;
    let safety = judgment.safety_score;

    let base_target_count = (load(reference) / unit).ceil();

    // Zero efficacy is left unscaled; it only reaches here on a rejected regimen
    let mut target_count = if efficacy > 0.0 && efficacy < 100.0 {
        let multiplier = 1.0 + (100.0 - efficacy) / difficulty.efficacy_divisor;
        (base_target_count * multiplier).ceil() as u32
    } else {
        base_target_count as u32
    };

    let ammo_count = (load(prescribed) / unit).floor() as u32;

    if judgment.approved && target_count >= ammo_count {
        target_count = ammo_count.saturating_sub(1).max(1);
    }

    let damage_per_shot = if judgment.approved { 1 } else { 0 };

    let toxicity_per_shot = toxicity_rating as f64
        * difficulty.toxicity_scale
        * (1.0 + (100.0 - safety) / difficulty.safety_divisor);

    let target_speed = if efficacy < difficulty.medium_efficacy_threshold {
        difficulty.fast_speed
    } else if efficacy < difficulty.slow_efficacy_threshold {
        difficulty.medium_speed
    } else {
        difficulty.slow_speed
    };

    SimulationConfig {
        ammo_count,
        damage_per_shot,
        toxicity_per_shot: toxicity_per_shot.max(0.0),
        target_count,
        target_speed,
        target_color: Rgb::default(),
        is_correct_drug: judgment.approved,
    }
}

/// Round parameters for a catalog case, colored like the case's pathogen
///
/// A drug missing from the catalog is treated as non-toxic.
pub fn translate_case(
    tuning: &TuningConstants,
    catalog: &Catalog,
    disease: &Disease,
    prescribed: &Protocol,
    judgment: &Judgment,
) -> SimulationConfig {
    let toxicity_rating = catalog
        .drug(&prescribed.substance_id)
        .map(|drug| drug.nephrotoxicity)
        .unwrap_or(0);
    translate_with(tuning, &disease.reference, prescribed, judgment, toxicity_rating)
        .with_target_color(disease.color)
}
