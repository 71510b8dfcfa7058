//! Race state and core simulation types
//!
//! Everything a race needs to advance deterministically lives here: the
//! balls, the course layout, the seeded RNG, and the cosmetic effects.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::map::{LayoutProvider, MapLayout};
use crate::consts::*;

/// Current phase of a race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    /// Balls are falling, no winner yet
    Racing,
    /// A ball crossed the finish line
    Finished { winner: u32 },
}

/// A racing ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    /// Opaque identity label (skin username in the original game)
    pub name: String,
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub mass: f64,
}

impl Ball {
    pub fn new(id: u32, name: String, pos: DVec2, vel: DVec2) -> Self {
        Self {
            id,
            name,
            pos,
            vel,
            radius: BALL_RADIUS,
            mass: 1.0,
        }
    }

    /// One integration step: gravity, semi-implicit Euler, then clamp to the
    /// side walls with a damped horizontal bounce. There is no vertical
    /// boundary; the corridor is open above and below.
    pub fn integrate(&mut self) {
        debug_assert!(self.radius > 0.0 && self.mass > 0.0);
        self.vel.y += GRAVITY;
        self.pos += self.vel;

        if self.pos.x - self.radius < 0.0 {
            self.pos.x = self.radius;
            self.vel.x *= -FRICTION;
        } else if self.pos.x + self.radius > SCREEN_WIDTH {
            self.pos.x = SCREEN_WIDTH - self.radius;
            self.vel.x *= -FRICTION;
        }
    }
}

/// A sparkle particle spawned on ball-ball contact. Purely cosmetic; never
/// feeds back into the physics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Remaining ticks before the particle is dropped
    pub lifespan: u32,
    pub color: [u8; 3],
    pub radius: f64,
}

impl Particle {
    pub fn spawn(pos: DVec2, rng: &mut Pcg32) -> Self {
        Self {
            pos,
            vel: DVec2::new(rng.random_range(-3.0..3.0), rng.random_range(-3.0..3.0)),
            lifespan: rng.random_range(20..=40),
            color: SPARKLE_COLORS[rng.random_range(0..SPARKLE_COLORS.len())],
            radius: rng.random_range(2..=5) as f64,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.lifespan = self.lifespan.saturating_sub(1);
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.lifespan > 0
    }
}

/// A piece of celebratory confetti, rained from the top of the screen once
/// a winner is declared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confetti {
    pub pos: DVec2,
    pub vel: DVec2,
    pub color: [u8; 3],
    pub width: f64,
    pub height: f64,
}

impl Confetti {
    pub fn spawn(rng: &mut Pcg32) -> Self {
        Self {
            pos: DVec2::new(
                rng.random_range(0.0..=SCREEN_WIDTH),
                rng.random_range(-SCREEN_HEIGHT..=0.0),
            ),
            vel: DVec2::new(rng.random_range(-1.0..1.0), rng.random_range(3.0..7.0)),
            color: CONFETTI_COLORS[rng.random_range(0..CONFETTI_COLORS.len())],
            width: rng.random_range(5..=10) as f64,
            height: rng.random_range(10..=15) as f64,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
    }
}

/// Scroll position following the race leader. Render-side data, but it is
/// part of the deterministic state so recordings replay identically.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Camera {
    pub y: f64,
}

impl Camera {
    /// Ease toward keeping the leader at the upper third of the screen.
    pub fn follow(&mut self, leader_y: f64) {
        let target = leader_y - SCREEN_HEIGHT / 1.5;
        self.y += (target - self.y) * CAMERA_LERP;
    }
}

/// Events emitted by a tick, consumed by cosmetic-effects and ranking
/// collaborators. The physics core never depends on anyone handling them.
#[derive(Debug, Clone, PartialEq)]
pub enum RaceEvent {
    /// Two balls collided; `sparks` is the particle count rolled for the
    /// contact point.
    BallCollision { point: DVec2, sparks: u32 },
    /// A ball crossed the finish line
    Finished { winner: u32 },
}

/// Read-only view of one ball for a frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub id: u32,
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
}

/// Read-only per-tick view handed to rendering and recording collaborators
/// strictly after a step's mutations are complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub tick: u64,
    pub phase: RacePhase,
    pub camera_y: f64,
    pub balls: Vec<BallSnapshot>,
}

/// Complete race state, deterministic given its seed
#[derive(Debug, Clone)]
pub struct RaceState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter
    pub tick: u64,
    pub phase: RacePhase,
    /// Racing balls, in spawn order. Never added to or removed mid-race.
    pub balls: Vec<Ball>,
    /// Static course geometry, supplied once and never mutated
    pub layout: MapLayout,
    pub particles: Vec<Particle>,
    pub confetti: Vec<Confetti>,
    pub camera: Camera,
    pub(crate) rng: Pcg32,
}

impl RaceState {
    /// Build a race: generate the course, then spawn `num_balls` balls with
    /// jittered positions and velocities in the band above the screen. Both
    /// draws come from the same seeded RNG, so a seed fixes the whole race.
    pub fn new(
        seed: u64,
        provider: &dyn LayoutProvider,
        names: &[String],
        num_balls: usize,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let layout = provider.generate(&mut rng);
        log::info!(
            "course generated: {} obstacles, {} ramps, finish at y={}",
            layout.obstacles.len(),
            layout.ramps.len(),
            layout.finish_line_y
        );

        let mut balls = Vec::with_capacity(num_balls);
        for i in 0..num_balls {
            let name = names
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("Ball {}", rng.random_range(100..=999)));
            let pos = DVec2::new(
                rng.random_range(BALL_RADIUS..=SCREEN_WIDTH - BALL_RADIUS),
                rng.random_range(-SCREEN_HEIGHT..=0.0),
            );
            let vel = DVec2::new(rng.random_range(-2.0..2.0), rng.random_range(-5.0..0.0));
            balls.push(Ball::new(i as u32, name, pos, vel));
        }

        Self {
            seed,
            tick: 0,
            phase: RacePhase::Racing,
            balls,
            layout,
            particles: Vec::new(),
            confetti: Vec::new(),
            camera: Camera::default(),
            rng,
        }
    }

    /// Build a race from externally supplied parts: an already-generated
    /// course and an ordered list of initial ball states.
    pub fn from_parts(seed: u64, layout: MapLayout, balls: Vec<Ball>) -> Self {
        Self {
            seed,
            tick: 0,
            phase: RacePhase::Racing,
            balls,
            layout,
            particles: Vec::new(),
            confetti: Vec::new(),
            camera: Camera::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// The ball furthest down the course, if any
    pub fn leader(&self) -> Option<&Ball> {
        self.balls
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
    }

    /// Balls ordered by progress, furthest first
    pub fn standings(&self) -> Vec<&Ball> {
        let mut order: Vec<&Ball> = self.balls.iter().collect();
        order.sort_by(|a, b| b.pos.y.total_cmp(&a.pos.y));
        order
    }

    /// Capture the read-only frame view for renderers and recorders
    pub fn snapshot(&self) -> RaceSnapshot {
        RaceSnapshot {
            tick: self.tick,
            phase: self.phase,
            camera_y: self.camera.y,
            balls: self
                .balls
                .iter()
                .map(|b| BallSnapshot {
                    id: b.id,
                    pos: b.pos,
                    vel: b.vel,
                    radius: b.radius,
                })
                .collect(),
        }
    }
}
