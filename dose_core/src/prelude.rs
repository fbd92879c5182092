//! Prelude module for convenient imports
//!
//! ```rust
//! use dose_core::prelude::*;
//! ```

// Content
pub use crate::catalog::Catalog;
pub use crate::types::{Disease, Drug, Protocol, Rgb};

// Dosing and difficulty
pub use crate::dosing::{estimated_ammo, is_overload, load};
pub use crate::translate::{translate, translate_case, translate_with, SimulationConfig};

// Judgment
pub use crate::judgment::{CaseDescription, Judgment, JudgmentProvider, PendingJudgment};

// Round
pub use crate::engine::{Engine, FrameReport, RoundPhase, RoundResult};
pub use crate::outcome::{synthesize, synthesize_with, RoundOutcome};

// Run state
pub use crate::progression::{GameMode, Progression};
pub use crate::vitals::{GameOverCause, VitalsState};

// Config
pub use crate::config::{default_catalog, TuningConstants};
