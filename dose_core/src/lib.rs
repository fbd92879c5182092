//! dose_core - Dosing model and arcade round simulation for Dose Defender
//!
//! This library provides:
//! - Dosing: total load of a protocol and overload detection
//! - Judgment: clinical verdicts from a provider, with a strict-match fallback
//! - Translate: prescription plus judgment to round difficulty
//! - Engine: the real-time round simulation
//! - Outcome: round result to verdict and vitals change
//! - Vitals / Progression: state carried across rounds

pub mod catalog;
pub mod config;
pub mod dosing;
pub mod engine;
pub mod judgment;
pub mod outcome;
pub mod prelude;
pub mod progression;
pub mod translate;
pub mod types;
pub mod vitals;

// Re-export core types for convenience
pub use catalog::{Catalog, PrescriptionOptions};
pub use config::{default_catalog, ConfigError, TuningConstants};
pub use engine::{Engine, FrameReport, RoundPhase, RoundResult};
pub use judgment::{
    CaseDescription, Judgment, JudgmentError, JudgmentProvider, OfflineProvider, PendingJudgment,
};
pub use outcome::{synthesize, synthesize_with, RoundOutcome, VitalsDelta};
pub use progression::{GameMode, Progression};
pub use translate::{translate, translate_case, translate_with, SimulationConfig};
pub use types::{Disease, Drug, Protocol, Rgb};
pub use vitals::{GameOverCause, VitalsState};
