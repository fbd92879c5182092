//! Case progression across levels of a run

use crate::vitals::VitalsState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    /// Catalog order starting from the chosen chapter, wrapping at the end
    #[default]
    Sequential,
    /// Uniform pick every level
    Random,
}

/// Index of the case after `current`; `None` for an empty catalog
pub fn next_case_index<R: Rng>(
    mode: GameMode,
    current: usize,
    case_count: usize,
    rng: &mut R,
) -> Option<usize> {
    if case_count == 0 {
        return None;
    }
    match mode {
        GameMode::Sequential => Some((current + 1) % case_count),
        GameMode::Random => Some(rng.gen_range(0..case_count)),
    }
}

/// Which case is being played and how the next one is chosen
#[derive(Debug, Clone)]
pub struct Progression {
    mode: GameMode,
    case_index: usize,
    rng: StdRng,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl Progression {
    pub fn new(rng: StdRng) -> Self {
        Progression {
            mode: GameMode::Sequential,
            case_index: 0,
            rng,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn case_index(&self) -> usize {
        self.case_index
    }

    /// Start a sequential run at the chosen case
    pub fn begin_sequential(&mut self, case_index: usize, vitals: &mut VitalsState) {
        self.mode = GameMode::Sequential;
        self.case_index = case_index;
        vitals.begin_run();
    }

    /// Start a random run; `None` for an empty catalog
    pub fn begin_random(&mut self, case_count: usize, vitals: &mut VitalsState) -> Option<usize> {
        if case_count == 0 {
            return None;
        }
        self.mode = GameMode::Random;
        self.case_index = self.rng.gen_range(0..case_count);
        vitals.begin_run();
        Some(self.case_index)
    }

    /// Move to the next level and pick its case
    pub fn advance(&mut self, case_count: usize, vitals: &mut VitalsState) -> Option<usize> {
        let next = next_case_index(self.mode, self.case_index, case_count, &mut self.rng)?;
        self.case_index = next;
        vitals.advance_level();
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::VitalsDelta;

    fn seeded() -> Progression {
        Progression::new(StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_sequential_wraps() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(next_case_index(GameMode::Sequential, 3, 5, &mut rng), Some(4));
        assert_eq!(next_case_index(GameMode::Sequential, 4, 5, &mut rng), Some(0));
        assert_eq!(next_case_index(GameMode::Random, 0, 0, &mut rng), None);
    }

    #[test]
    fn test_random_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let index = next_case_index(GameMode::Random, 0, 18, &mut rng).unwrap();
            assert!(index < 18);
        }
    }

    #[test]
    fn test_advance_bumps_level() {
        let mut vitals = VitalsState::default();
        let mut progression = seeded();
        progression.begin_sequential(16, &mut vitals);

        assert_eq!(progression.advance(18, &mut vitals), Some(17));
        assert_eq!(progression.advance(18, &mut vitals), Some(0));
        assert_eq!(vitals.level(), 3);
    }

    #[test]
    fn test_begin_random_resets_run_but_not_resistance() {
        let mut vitals = VitalsState::default();
        vitals.apply(&VitalsDelta {
            pressure_drop: 30.0,
            kidney_rise: 0.0,
            resistance_rise: 10.0,
        });
        vitals.advance_level();

        let mut progression = seeded();
        let index = progression.begin_random(18, &mut vitals).unwrap();
        assert!(index < 18);
        assert_eq!(progression.mode(), GameMode::Random);
        assert_eq!(vitals.level(), 1);
        assert_eq!(vitals.systolic_pressure(), 120.0);
        assert_eq!(vitals.resistance_score(), 10.0);
    }

    #[test]
    fn test_empty_catalog() {
        let mut vitals = VitalsState::default();
        let mut progression = seeded();
        assert_eq!(progression.begin_random(0, &mut vitals), None);
        assert_eq!(progression.advance(0, &mut vitals), None);
        assert_eq!(vitals.level(), 1);
    }
}
