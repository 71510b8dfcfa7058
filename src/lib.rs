//! Drop Derby - a falling-ball race simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, race state)
//! - `config`: Data-driven race setup
//!
//! The simulation is headless: rendering, skins, and video capture are
//! external collaborators that consume per-tick [`sim::RaceSnapshot`]s and
//! the [`sim::RaceEvent`] stream.

pub mod config;
pub mod sim;

pub use config::{Difficulty, LayoutKind, RaceConfig};

/// Simulation constants
pub mod consts {
    /// Simulation steps per second (one physics step per rendered frame)
    pub const TICK_RATE: u32 = 60;

    /// Play field dimensions (the field is an unbounded vertical corridor;
    /// only the x axis is walled)
    pub const SCREEN_WIDTH: f64 = 480.0;
    pub const SCREEN_HEIGHT: f64 = 800.0;

    /// Constant downward acceleration, added to vy every tick
    pub const GRAVITY: f64 = 0.13;
    /// Velocity damping applied after every collision and wall bounce
    pub const FRICTION: f64 = 0.85;
    /// Ball collision radius
    pub const BALL_RADIUS: f64 = 15.0;
    /// Extra lateral multiplier on ramp bounces, keeps the race moving
    pub const RAMP_LATERAL_BOOST: f64 = 1.15;

    /// Camera smoothing factor toward the race leader
    pub const CAMERA_LERP: f64 = 0.08;

    /// Sparkle palette for collision particles (RGB)
    pub const SPARKLE_COLORS: [[u8; 3]; 4] = [
        [255, 255, 0],
        [255, 200, 0],
        [255, 150, 0],
        [255, 255, 255],
    ];

    /// Confetti palette for the winner celebration (RGB)
    pub const CONFETTI_COLORS: [[u8; 3]; 6] = [
        [255, 87, 87],
        [255, 195, 0],
        [87, 255, 87],
        [87, 169, 255],
        [185, 87, 255],
        [255, 255, 255],
    ];
}
