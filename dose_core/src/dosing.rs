//! Dosing model - total administered load of a protocol
//!
//! Load is the cumulative amount a protocol delivers over its full course:
//!
//! `load = dose × (24 / interval_hours) × duration_days`
//!
//! Examples:
//! - 500 mg q12h for 7 days: 500 × 2 × 7 = 7000
//! - 1000 mg q8h for 5 days: 1000 × 3 × 5 = 15000

use crate::types::Protocol;

/// Default overload factor: more than 150% of the reference load
pub const DEFAULT_OVERLOAD_FACTOR: f64 = 1.5;

/// Total load delivered by a protocol
///
/// Never negative. A non-positive interval delivers nothing rather than dividing by zero.
pub fn load(protocol: &Protocol) -> f64 {
    let total = protocol.dose_units * protocol.doses_per_day() * protocol.duration_days as f64;
    total.max(0.0)
}

/// True when the prescribed load exceeds the reference load by more than `factor`
pub fn is_overload(reference_load: f64, prescribed_load: f64, factor: f64) -> bool {
    prescribed_load > reference_load * factor
}

/// [`is_overload`] with the default 1.5 factor
pub fn is_overload_default(reference_load: f64, prescribed_load: f64) -> bool {
    is_overload(reference_load, prescribed_load, DEFAULT_OVERLOAD_FACTOR)
}

/// How many projectiles a prescription will buy
pub fn estimated_ammo(protocol: &Protocol, unit_per_shot: f64) -> u32 {
    if unit_per_shot <= 0.0 {
        return 0;
    }
    (load(protocol) / unit_per_shot).floor() as u32
}
