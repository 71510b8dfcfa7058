//! Deterministic simulation module
//!
//! All race logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geom;
pub mod map;
pub mod state;
pub mod tick;

pub use collision::{
    collide_ball_rect, collide_ball_segment, elastic_normal_velocities, reflect_velocity,
    resolve_ball_pair,
};
pub use geom::{Rect, Segment};
pub use map::{ClassicLayout, Difficulty, LayoutProvider, MapLayout, Obstacle, Ramp, SeededLayout};
pub use state::{
    Ball, BallSnapshot, Camera, Confetti, Particle, RaceEvent, RacePhase, RaceSnapshot, RaceState,
};
pub use tick::tick;
