//! Simulation engine - one round of the shooter
//!
//! An [`Engine`] is built from a frozen [`SimulationConfig`], started once,
//! then driven by [`Engine::step`] once per rendered frame until it reports
//! a [`RoundResult`]. Everything random is drawn from a seeded RNG, so a round
//! is reproducible from `(config, arena, seed)` plus the input sequence.

mod entities;
mod layout;

pub use entities::{Particle, Projectile, Target, Vec2};
pub use layout::layout_targets;

use crate::config::ArenaConstants;
use crate::translate::SimulationConfig;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use tracing::{debug, info};

/// Longest frame simulated in one call; longer stalls are truncated
pub const MAX_FRAME_SECONDS: f64 = 0.1;
/// Display amplitude of the target wobble
pub const WOBBLE_AMPLITUDE: f64 = 2.0;
/// Minimum vertical share of a shot's speed, so no shot bounces sideways forever
const MIN_VERTICAL_FRACTION: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Initializing,
    Running,
    Terminated,
}

/// Terminal state of a round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub remaining_targets: u32,
    pub remaining_ammo: u32,
    /// Toxicity charged by missed shots during the round
    pub accumulated_toxicity: f64,
}

impl RoundResult {
    pub fn is_cleared(&self) -> bool {
        self.remaining_targets == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissEdge {
    /// Passed every target and left through the top
    Top,
    /// Fired downward out of the arena
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Miss {
    pub edge: MissEdge,
    pub toxicity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    /// Index into [`Engine::targets`]
    pub target: usize,
    pub remaining_hit_points: u32,
    pub destroyed: bool,
}

/// What happened during one call to [`Engine::step`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub hits: Vec<Hit>,
    pub misses: Vec<Miss>,
    /// Sum of the toxicity of this frame's misses
    pub miss_toxicity: f64,
    /// Set on the frame the round ends, and only that frame
    pub result: Option<RoundResult>,
}

impl FrameReport {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_miss(&mut self, edge: MissEdge, toxicity: f64) {
        self.misses.push(Miss { edge, toxicity });
        self.miss_toxicity += toxicity;
    }

    pub fn targets_destroyed(&self) -> usize {
        self.hits.iter().filter(|hit| hit.destroyed).count()
    }
}

/// State of one round
#[derive(Debug, Clone)]
pub struct Engine {
    config: SimulationConfig,
    arena: ArenaConstants,
    rng: ChaCha8Rng,
    phase: RoundPhase,
    projectiles: Vec<Projectile>,
    targets: Vec<Target>,
    particles: Vec<Particle>,
    ammo: u32,
    accumulated_toxicity: f64,
    aim_angle: f64,
    result: Option<RoundResult>,
}

impl Engine {
    pub fn new(config: SimulationConfig, arena: ArenaConstants, seed: u64) -> Self {
        Engine {
            ammo: config.ammo_count,
            config,
            arena,
            rng: ChaCha8Rng::seed_from_u64(seed),
            phase: RoundPhase::Initializing,
            projectiles: Vec::new(),
            targets: Vec::new(),
            particles: Vec::new(),
            accumulated_toxicity: 0.0,
            aim_angle: -FRAC_PI_2,
            result: None,
        }
    }

    /// Lay out targets and begin the round. Only valid once.
    pub fn start(&mut self) {
        if self.phase != RoundPhase::Initializing {
            debug!(phase = ?self.phase, "start ignored, round already started");
            return;
        }

        let hit_points = if self.config.is_correct_drug {
            1
        } else {
            self.arena.resistant_hit_points
        };
        self.targets = layout_targets(
            &self.arena,
            self.config.target_count,
            hit_points,
            &mut self.rng,
        );
        self.projectiles.clear();
        self.particles.clear();
        self.ammo = self.config.ammo_count;
        self.accumulated_toxicity = 0.0;
        self.result = None;
        self.phase = RoundPhase::Running;

        info!(
            targets = self.config.target_count,
            ammo = self.ammo,
            damage_per_shot = self.config.damage_per_shot,
            toxicity_per_shot = self.config.toxicity_per_shot,
            target_speed = self.config.target_speed,
            "round started"
        );
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn arena(&self) -> &ArenaConstants {
        &self.arena
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn accumulated_toxicity(&self) -> f64 {
        self.accumulated_toxicity
    }

    /// Radians, 0 pointing right and -π/2 straight up
    pub fn aim_angle(&self) -> f64 {
        self.aim_angle
    }

    pub fn result(&self) -> Option<&RoundResult> {
        self.result.as_ref()
    }

    pub fn active_target_count(&self) -> u32 {
        self.targets.iter().filter(|t| t.active).count() as u32
    }

    pub fn projectiles_in_flight(&self) -> usize {
        self.projectiles.iter().filter(|p| p.active).count()
    }

    /// Firing origin at bottom center
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.arena.width / 2.0, self.arena.height)
    }

    /// Aim at a point in arena coordinates
    pub fn aim_at(&mut self, x: f64, y: f64) {
        let origin = self.origin();
        let (dx, dy) = (x - origin.x, y - origin.y);
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.set_aim(dy.atan2(dx));
    }

    pub fn set_aim(&mut self, angle: f64) {
        if self.phase != RoundPhase::Running || !angle.is_finite() {
            return;
        }
        self.aim_angle = angle;
    }

    pub fn nudge_aim(&mut self, delta: f64) {
        self.set_aim(self.aim_angle + delta);
    }

    /// Fire one shot along the current aim. Returns false when nothing was fired.
    pub fn fire(&mut self) -> bool {
        if self.phase != RoundPhase::Running || self.ammo == 0 {
            return false;
        }

        let speed = self.arena.projectile_speed;
        let mut velocity = Vec2::new(self.aim_angle.cos() * speed, self.aim_angle.sin() * speed);
        let min_vertical = speed * MIN_VERTICAL_FRACTION;
        if velocity.y.abs() < min_vertical {
            velocity.y = if velocity.y > 0.0 {
                min_vertical
            } else {
                -min_vertical
            };
        }

        self.projectiles.push(Projectile::new(self.origin(), velocity));
        self.ammo -= 1;
        debug!(angle = self.aim_angle, ammo = self.ammo, "shot fired");
        true
    }

    /// Advance the round by `dt` seconds
    ///
    /// Long frames are split into sub-steps of at most one reference frame so
    /// shots cannot tunnel through targets.
    pub fn step(&mut self, dt: f64) -> FrameReport {
        let mut report = FrameReport::new();
        match self.phase {
            RoundPhase::Initializing => {
                debug!("step before start ignored");
                return report;
            }
            RoundPhase::Terminated => return report,
            RoundPhase::Running => {}
        }

        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_SECONDS)
        } else {
            0.0
        };
        let frame_seconds = 1.0 / self.arena.reference_fps;
        let substeps = ((dt / frame_seconds).ceil() as u32).max(1);
        let sub_dt = dt / substeps as f64;

        for _ in 0..substeps {
            self.update(sub_dt, &mut report);
            self.check_termination(&mut report);
            if self.phase == RoundPhase::Terminated {
                break;
            }
        }

        report
    }

    fn update(&mut self, dt: f64, report: &mut FrameReport) {
        let frames = dt * self.arena.reference_fps;
        let width = self.arena.width;
        let height = self.arena.height;
        let miss_toxicity = self.config.toxicity_per_shot * self.arena.miss_toxicity_factor;

        for projectile in self.projectiles.iter_mut().filter(|p| p.active) {
            projectile.advance(frames, width);

            let edge = if projectile.position.y < 0.0 {
                Some(MissEdge::Top)
            } else if projectile.position.y > height {
                Some(MissEdge::Bottom)
            } else {
                None
            };

            if let Some(edge) = edge {
                projectile.active = false;
                self.accumulated_toxicity += miss_toxicity;
                report.add_miss(edge, miss_toxicity);
                debug!(?edge, toxicity = miss_toxicity, "shot missed");
            }
        }

        let drift = if self.config.target_speed > 0.0 {
            self.config.target_speed * dt * self.arena.drift_scale
        } else {
            0.0
        };
        let reach = self.arena.collision_slack;
        let spread = self.arena.particle_spread;

        for (index, target) in self.targets.iter_mut().enumerate() {
            if !target.active {
                continue;
            }
            target.phase += dt * self.arena.phase_rate;
            target.position.y += drift;

            for projectile in self.projectiles.iter_mut() {
                if !projectile.active || !target.active {
                    continue;
                }
                if projectile.position.distance(target.position) >= target.radius + reach {
                    continue;
                }

                projectile.active = false;
                let destroyed = target.take_hit(self.config.damage_per_shot);
                report.hits.push(Hit {
                    target: index,
                    remaining_hit_points: target.hit_points,
                    destroyed,
                });

                for _ in 0..self.arena.particles_per_hit {
                    let velocity = Vec2::new(
                        (self.rng.gen::<f64>() - 0.5) * spread,
                        (self.rng.gen::<f64>() - 0.5) * spread,
                    );
                    self.particles.push(Particle {
                        position: target.position,
                        velocity,
                        life: 1.0,
                        color: self.config.target_color,
                    });
                }

                debug!(
                    target = index,
                    hit_points = target.hit_points,
                    destroyed,
                    "target hit"
                );
            }
        }

        let decay = dt * self.arena.particle_decay;
        for particle in self.particles.iter_mut() {
            particle.position.x += particle.velocity.x * frames;
            particle.position.y += particle.velocity.y * frames;
            particle.life -= decay;
        }
        self.particles.retain(|p| p.life > 0.0);
        self.projectiles.retain(|p| p.active);
    }

    fn check_termination(&mut self, report: &mut FrameReport) {
        let active_targets = self.active_target_count();
        if active_targets == 0 {
            self.finish(0, self.ammo, report);
        } else if self.ammo == 0 && self.projectiles_in_flight() == 0 {
            self.finish(active_targets, 0, report);
        }
    }

    fn finish(&mut self, remaining_targets: u32, remaining_ammo: u32, report: &mut FrameReport) {
        if self.result.is_some() {
            debug!("duplicate round termination ignored");
            return;
        }

        let result = RoundResult {
            remaining_targets,
            remaining_ammo,
            accumulated_toxicity: self.accumulated_toxicity,
        };
        self.result = Some(result);
        self.phase = RoundPhase::Terminated;
        report.result = Some(result);

        info!(
            remaining_targets,
            remaining_ammo,
            toxicity = self.accumulated_toxicity,
            "round ended"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;

    const FRAME: f64 = 1.0 / 60.0;

    fn make_config(approved: bool, ammo: u32, targets: u32) -> SimulationConfig {
        SimulationConfig {
            ammo_count: ammo,
            damage_per_shot: if approved { 1 } else { 0 },
            toxicity_per_shot: 0.4,
            target_count: targets,
            target_speed: 0.0,
            target_color: Rgb::new(0x22, 0xc5, 0x5e),
            is_correct_drug: approved,
        }
    }

    fn started(config: SimulationConfig) -> Engine {
        let mut engine = Engine::new(config, ArenaConstants::default(), 42);
        engine.start();
        engine
    }

    /// Step until no shot is in flight or the round ends
    fn settle(engine: &mut Engine) -> FrameReport {
        let mut combined = FrameReport::new();
        for _ in 0..600 {
            let report = engine.step(FRAME);
            combined.hits.extend(report.hits);
            combined.misses.extend(report.misses);
            combined.miss_toxicity += report.miss_toxicity;
            if report.result.is_some() {
                combined.result = report.result;
            }
            if engine.projectiles().is_empty() || !engine.is_running() {
                break;
            }
        }
        combined
    }

    fn shoot_first_target(engine: &mut Engine) -> FrameReport {
        let target = engine
            .targets()
            .iter()
            .find(|t| t.active)
            .map(|t| t.position)
            .unwrap();
        engine.aim_at(target.x, target.y);
        assert!(engine.fire());
        settle(engine)
    }

    #[test]
    fn test_start_moves_to_running() {
        let mut engine = Engine::new(make_config(true, 5, 3), ArenaConstants::default(), 1);
        assert_eq!(engine.phase(), RoundPhase::Initializing);
        assert!(!engine.fire());
        assert_eq!(engine.step(FRAME), FrameReport::new());

        engine.start();
        assert_eq!(engine.phase(), RoundPhase::Running);
        assert_eq!(engine.targets().len(), 3);
        assert!(engine.targets().iter().all(|t| t.hit_points == 1));
        assert_eq!(engine.ammo(), 5);
    }

    #[test]
    fn test_rejected_targets_are_tough() {
        let engine = started(make_config(false, 5, 3));
        assert!(engine.targets().iter().all(|t| t.hit_points == 4));
    }

    #[test]
    fn test_fire_spends_ammo_until_empty() {
        let mut engine = started(make_config(true, 2, 3));
        assert!(engine.fire());
        assert!(engine.fire());
        assert!(!engine.fire());
        assert_eq!(engine.ammo(), 0);
        assert_eq!(engine.projectiles().len(), 2);
    }

    #[test]
    fn test_clearing_round_reports_leftover_ammo() {
        let mut engine = started(make_config(true, 3, 2));

        let first = shoot_first_target(&mut engine);
        assert_eq!(first.targets_destroyed(), 1);
        assert!(first.result.is_none());

        let second = shoot_first_target(&mut engine);
        let result = second.result.unwrap();
        assert!(result.is_cleared());
        assert_eq!(result.remaining_ammo, 1);
        assert_eq!(result.accumulated_toxicity, 0.0);
        assert_eq!(engine.phase(), RoundPhase::Terminated);
    }

    #[test]
    fn test_hit_spawns_particles_that_fade() {
        let mut engine = started(make_config(false, 2, 1));
        let report = shoot_first_target(&mut engine);

        assert_eq!(report.hits.len(), 1);
        assert!(!report.hits[0].destroyed);
        assert!(!engine.particles().is_empty());
        assert!(engine
            .particles()
            .iter()
            .all(|p| p.color == Rgb::new(0x22, 0xc5, 0x5e)));

        for _ in 0..40 {
            engine.step(FRAME);
        }
        assert!(engine.particles().is_empty());
    }

    #[test]
    fn test_rejected_regimen_never_clears() {
        let mut engine = started(make_config(false, 6, 1));
        let mut result = None;
        for _ in 0..6 {
            let report = shoot_first_target(&mut engine);
            if report.result.is_some() {
                result = report.result;
            }
        }

        let result = result.unwrap();
        assert_eq!(result.remaining_targets, 1);
        assert_eq!(result.remaining_ammo, 0);
        assert_eq!(engine.targets()[0].hit_points, 4);
    }

    #[test]
    fn test_bottom_miss_accrues_toxicity() {
        let mut engine = started(make_config(true, 1, 1));
        engine.set_aim(FRAC_PI_2);
        assert!(engine.fire());

        let report = engine.step(FRAME);
        assert_eq!(report.misses.len(), 1);
        assert_eq!(report.misses[0].edge, MissEdge::Bottom);
        assert!((report.miss_toxicity - 0.2).abs() < 1e-12);

        let result = report.result.unwrap();
        assert_eq!(result.remaining_targets, 1);
        assert!((result.accumulated_toxicity - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_top_miss_accrues_toxicity() {
        // The only target sits at the far left; straight up passes it
        let mut engine = started(make_config(true, 2, 1));
        engine.set_aim(-FRAC_PI_2);
        assert!(engine.fire());

        let report = settle(&mut engine);
        assert_eq!(report.misses.len(), 1);
        assert_eq!(report.misses[0].edge, MissEdge::Top);
        assert!((engine.accumulated_toxicity() - 0.2).abs() < 1e-12);
        assert!(engine.is_running());
    }

    #[test]
    fn test_horizontal_shot_still_resolves() {
        let mut engine = started(make_config(true, 1, 1));
        engine.set_aim(0.0);
        assert!(engine.fire());

        let mut result = None;
        for _ in 0..3000 {
            if let Some(done) = engine.step(FRAME).result {
                result = Some(done);
                break;
            }
        }
        assert!(result.is_some());
    }

    #[test]
    fn test_termination_reported_once() {
        let mut engine = started(make_config(true, 0, 2));
        let first = engine.step(FRAME);
        let result = first.result.unwrap();
        assert_eq!(result.remaining_targets, 2);
        assert_eq!(result.remaining_ammo, 0);

        for _ in 0..5 {
            assert_eq!(engine.step(FRAME).result, None);
        }
        assert_eq!(engine.result(), Some(&result));

        engine.start();
        assert_eq!(engine.phase(), RoundPhase::Terminated);
    }

    #[test]
    fn test_no_targets_ends_immediately() {
        let mut engine = started(make_config(true, 4, 0));
        let result = engine.step(0.0).result.unwrap();
        assert!(result.is_cleared());
        assert_eq!(result.remaining_ammo, 4);
    }

    #[test]
    fn test_targets_drift_down() {
        let mut config = make_config(true, 3, 1);
        config.target_speed = 3.0;
        let mut engine = started(config);
        let before = engine.targets()[0].position.y;

        engine.step(0.1);
        // 3.0 × 0.1 × 5
        assert!((engine.targets()[0].position.y - before - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_inputs_after_end_are_ignored() {
        let mut engine = started(make_config(true, 0, 1));
        engine.step(FRAME);
        engine.set_aim(0.3);
        assert!((engine.aim_angle() + FRAC_PI_2).abs() < f64::EPSILON);
        assert!(!engine.fire());
    }

    #[test]
    fn test_same_seed_same_round() {
        let run = || {
            let mut engine = started(make_config(true, 4, 3));
            shoot_first_target(&mut engine);
            (engine.targets().to_vec(), engine.particles().to_vec())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut config = make_config(true, 3, 1);
        config.target_speed = 3.0;
        let mut capped = started(config.clone());
        let mut reference = started(config);

        capped.step(5.0);
        reference.step(MAX_FRAME_SECONDS);
        assert_eq!(capped.targets(), reference.targets());
    }

    #[test]
    fn test_non_finite_frame_changes_nothing() {
        let mut config = make_config(true, 3, 1);
        config.target_speed = 3.0;
        let mut engine = started(config);
        engine.step(0.1);
        let before = engine.targets().to_vec();

        for dt in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -1.0] {
            let report = engine.step(dt);
            assert!(report.hits.is_empty() && report.result.is_none());
            assert_eq!(engine.targets(), &before[..]);
        }
        assert!(engine.is_running());
    }
}
