//! Initial target placement

use super::entities::{Target, Vec2};
use crate::config::ArenaConstants;
use rand::Rng;
use std::f64::consts::TAU;

/// Lay `count` targets out in a staggered grid, odd rows shifted by half a column
pub fn layout_targets<R: Rng>(
    arena: &ArenaConstants,
    count: u32,
    hit_points: u32,
    rng: &mut R,
) -> Vec<Target> {
    let columns = arena.columns.max(2);
    let spacing = (arena.width - arena.padding * 2.0) / (columns - 1) as f64;

    (0..count)
        .map(|i| {
            let row = i / columns;
            let col = i % columns;
            let offset = if row % 2 == 0 { 0.0 } else { spacing / 2.0 };
            Target {
                position: Vec2::new(
                    arena.padding + col as f64 * spacing + offset,
                    arena.first_row_y + row as f64 * arena.row_spacing,
                ),
                radius: arena.target_radius,
                hit_points: hit_points.max(1),
                active: true,
                phase: rng.gen::<f64>() * TAU,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_grid_positions() {
        let arena = ArenaConstants::default();
        let mut rng = StdRng::seed_from_u64(42);
        let targets = layout_targets(&arena, 10, 1, &mut rng);

        assert_eq!(targets.len(), 10);
        // spacing = (800 - 80) / 7
        let spacing = 720.0 / 7.0;
        assert!((targets[0].position.x - 40.0).abs() < 1e-9);
        assert!((targets[0].position.y - 50.0).abs() < 1e-9);
        assert!((targets[7].position.x - (40.0 + 7.0 * spacing)).abs() < 1e-9);
        // Second row is staggered and one row lower
        assert!((targets[8].position.x - (40.0 + spacing / 2.0)).abs() < 1e-9);
        assert!((targets[8].position.y - 95.0).abs() < 1e-9);
        assert!((targets[9].position.x - (40.0 + spacing * 1.5)).abs() < 1e-9);
    }

    #[test]
    fn test_phases_are_seeded() {
        let arena = ArenaConstants::default();
        let a = layout_targets(&arena, 5, 4, &mut StdRng::seed_from_u64(7));
        let b = layout_targets(&arena, 5, 4, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.iter().all(|t| t.hit_points == 4 && (0.0..TAU).contains(&t.phase)));
    }
}
