//! Fixed timestep simulation tick
//!
//! One call advances the race by exactly one step, in a fixed order:
//! integrate every ball against the static course, run the pairwise
//! ball-ball pass, animate cosmetic effects, then check for a winner.

use rand::Rng;

use super::collision::resolve_ball_pair;
use super::state::{Confetti, Particle, RaceEvent, RacePhase, RaceState};

/// Confetti pieces rained down when a winner is declared
const CONFETTI_BURST: usize = 200;

/// Advance the race by one fixed timestep.
///
/// Returns the events produced this tick. Collision events carry the spark
/// count already rolled from the race RNG; spawning the matching particles
/// is driven off those events, so a caller that ignores them loses nothing
/// but cosmetics.
pub fn tick(state: &mut RaceState) -> Vec<RaceEvent> {
    let mut events = Vec::new();

    if let RacePhase::Finished { .. } = state.phase {
        // The race is decided; only the celebration keeps animating.
        for piece in &mut state.confetti {
            piece.update();
        }
        for particle in &mut state.particles {
            particle.update();
        }
        state.particles.retain(Particle::alive);
        state.tick += 1;
        return events;
    }

    // Integrate each ball, then resolve it against the static course in
    // supplied order: obstacles first, ramps second.
    for ball in &mut state.balls {
        ball.integrate();
        for obstacle in &state.layout.obstacles {
            obstacle.collide_with_ball(ball);
        }
        for ramp in &state.layout.ramps {
            ramp.collide_with_ball(ball);
        }
    }

    // Pairwise ball-ball pass over unordered pairs (i < j). The cast is
    // bounded by the number of skins, so the quadratic scan stays cheap.
    let n = state.balls.len();
    for i in 0..n {
        let (left, right) = state.balls.split_at_mut(i + 1);
        let a = &mut left[i];
        for b in right.iter_mut() {
            if let Some(point) = resolve_ball_pair(a, b) {
                let sparks = state.rng.random_range(5..=15u32);
                for _ in 0..sparks {
                    state.particles.push(Particle::spawn(point, &mut state.rng));
                }
                log::trace!("balls {} and {} collided at {point}", a.id, b.id);
                events.push(RaceEvent::BallCollision { point, sparks });
            }
        }
    }

    // Cosmetic particles decay independently of the physics
    for particle in &mut state.particles {
        particle.update();
    }
    state.particles.retain(Particle::alive);

    // Winner check: first ball in spawn order across the line takes it
    let finish_y = state.layout.finish_line_y;
    if let Some(winner) = state
        .balls
        .iter()
        .find(|b| b.pos.y + b.radius > finish_y)
    {
        let winner_id = winner.id;
        log::info!("'{}' wins on tick {}", winner.name, state.tick);
        state.phase = RacePhase::Finished { winner: winner_id };
        events.push(RaceEvent::Finished { winner: winner_id });
        for _ in 0..CONFETTI_BURST {
            let piece = Confetti::spawn(&mut state.rng);
            state.confetti.push(piece);
        }
    }

    if let Some(leader_y) = state.leader().map(|b| b.pos.y) {
        state.camera.follow(leader_y);
    }
    state.tick += 1;

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::map::{ClassicLayout, MapLayout, Ramp};
    use crate::sim::state::Ball;
    use glam::DVec2;

    /// A bare course: one horizontal ramp at y=500 spanning the screen,
    /// finish line far below.
    fn flat_ramp_course() -> MapLayout {
        MapLayout {
            obstacles: Vec::new(),
            ramps: vec![Ramp::new(0.0, 500.0, SCREEN_WIDTH, 500.0)],
            finish_line_y: 100_000.0,
        }
    }

    fn empty_course(finish_line_y: f64) -> MapLayout {
        MapLayout {
            obstacles: Vec::new(),
            ramps: Vec::new(),
            finish_line_y,
        }
    }

    #[test]
    fn test_dropped_ball_never_passes_through_ramp() {
        let ball = Ball::new(0, "drop".into(), DVec2::new(240.0, 400.0), DVec2::ZERO);
        let mut state = RaceState::from_parts(1, flat_ramp_course(), vec![ball]);

        let floor = 500.0 - BALL_RADIUS;
        for _ in 0..3000 {
            tick(&mut state);
            assert!(
                state.balls[0].pos.y <= floor + 1e-6,
                "ball sank through the ramp: y={}",
                state.balls[0].pos.y
            );
        }
    }

    #[test]
    fn test_bounces_decay_under_friction() {
        let ball = Ball::new(0, "drop".into(), DVec2::new(240.0, 400.0), DVec2::ZERO);
        let mut state = RaceState::from_parts(1, flat_ramp_course(), vec![ball]);

        // Record upward speed at each bounce (vy flipping downward to upward)
        let mut rebounds: Vec<f64> = Vec::new();
        let mut prev_vy = 0.0;
        for _ in 0..3000 {
            tick(&mut state);
            let vy = state.balls[0].vel.y;
            if prev_vy > 0.0 && vy < 0.0 {
                rebounds.push(-vy);
            }
            prev_vy = vy;
        }

        assert!(rebounds.len() >= 3, "expected repeated bounces");
        for pair in rebounds.windows(2) {
            // Discretized gravity gives a little slack, but every rebound
            // must be slower than the one before
            assert!(pair[1] <= pair[0] + GRAVITY, "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_overlapping_balls_separate_after_one_tick() {
        let r = BALL_RADIUS;
        let balls = vec![
            Ball::new(0, "a".into(), DVec2::new(200.0, 300.0), DVec2::ZERO),
            Ball::new(1, "b".into(), DVec2::new(200.0 + 2.0 * r - 1.0, 300.0), DVec2::ZERO),
        ];
        let mut state = RaceState::from_parts(1, empty_course(100_000.0), balls);

        let events = tick(&mut state);

        let dist = (state.balls[1].pos - state.balls[0].pos).length();
        assert!(dist >= 2.0 * r - 1e-9);
        assert!(matches!(
            events[0],
            RaceEvent::BallCollision { sparks: 5..=15, .. }
        ));
    }

    #[test]
    fn test_collision_events_drive_particle_spawns() {
        let r = BALL_RADIUS;
        let balls = vec![
            Ball::new(0, "a".into(), DVec2::new(200.0, 300.0), DVec2::ZERO),
            Ball::new(1, "b".into(), DVec2::new(200.0 + r, 300.0), DVec2::ZERO),
        ];
        let mut state = RaceState::from_parts(4, empty_course(100_000.0), balls);

        let events = tick(&mut state);

        let spark_total: u32 = events
            .iter()
            .filter_map(|e| match e {
                RaceEvent::BallCollision { sparks, .. } => Some(*sparks),
                _ => None,
            })
            .sum();
        assert!(spark_total > 0);
        // Every rolled spark became a particle (none can expire on tick 1)
        assert_eq!(state.particles.len(), spark_total as usize);
    }

    #[test]
    fn test_particles_expire() {
        let ball = Ball::new(0, "solo".into(), DVec2::new(240.0, 0.0), DVec2::ZERO);
        let mut state = RaceState::from_parts(1, empty_course(100_000.0), vec![ball]);
        state.particles.push(Particle {
            pos: DVec2::ZERO,
            vel: DVec2::ZERO,
            lifespan: 2,
            color: [255, 255, 255],
            radius: 3.0,
        });

        tick(&mut state);
        assert_eq!(state.particles.len(), 1);
        tick(&mut state);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_winner_declared_at_finish_line() {
        let ball = Ball::new(0, "leader".into(), DVec2::new(240.0, 990.0), DVec2::new(0.0, 5.0));
        let mut state = RaceState::from_parts(1, empty_course(1000.0), vec![ball]);

        let mut finished = None;
        for _ in 0..10 {
            let events = tick(&mut state);
            if let Some(RaceEvent::Finished { winner }) = events
                .iter()
                .find(|e| matches!(e, RaceEvent::Finished { .. }))
            {
                finished = Some(*winner);
                break;
            }
        }

        assert_eq!(finished, Some(0));
        assert_eq!(state.phase, RacePhase::Finished { winner: 0 });
        assert_eq!(state.confetti.len(), 200);
    }

    #[test]
    fn test_finished_race_freezes_physics() {
        let ball = Ball::new(0, "w".into(), DVec2::new(240.0, 990.0), DVec2::new(0.0, 20.0));
        let mut state = RaceState::from_parts(1, empty_course(1000.0), vec![ball]);
        tick(&mut state);
        assert!(matches!(state.phase, RacePhase::Finished { .. }));

        let frozen = state.balls[0].pos;
        let confetti_before = state.confetti[0].pos;
        tick(&mut state);
        assert_eq!(state.balls[0].pos, frozen);
        // Confetti keeps falling
        assert_ne!(state.confetti[0].pos, confetti_before);
    }

    #[test]
    fn test_races_with_same_seed_are_identical() {
        let mut a = RaceState::new(20260826, &ClassicLayout, &[], 8);
        let mut b = RaceState::new(20260826, &ClassicLayout, &[], 8);

        for _ in 0..600 {
            let ea = tick(&mut a);
            let eb = tick(&mut b);
            assert_eq!(ea, eb);
        }
        for (x, y) in a.balls.iter().zip(&b.balls) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.vel, y.vel);
        }
        assert_eq!(a.camera.y, b.camera.y);
    }

    #[test]
    fn test_full_race_stays_sane() {
        let mut state = RaceState::new(11, &ClassicLayout, &[], 10);
        for _ in 0..2000 {
            tick(&mut state);
            for ball in &state.balls {
                assert!(ball.pos.x.is_finite() && ball.pos.y.is_finite());
                assert!(ball.vel.x.is_finite() && ball.vel.y.is_finite());
                // An obstacle push-out can momentarily beat the wall clamp,
                // but never by more than one radius
                assert!(ball.pos.x >= -ball.radius);
                assert!(ball.pos.x <= SCREEN_WIDTH + ball.radius);
            }
            if matches!(state.phase, RacePhase::Finished { .. }) {
                break;
            }
        }
        // Ten balls under gravity for 2000 ticks should make real progress
        assert!(state.leader().unwrap().pos.y > 500.0);
    }

    #[test]
    fn test_snapshot_reflects_post_step_state() {
        let mut state = RaceState::new(2, &ClassicLayout, &[], 4);
        tick(&mut state);
        let snap = state.snapshot();
        assert_eq!(snap.tick, state.tick);
        assert_eq!(snap.balls.len(), 4);
        for (s, b) in snap.balls.iter().zip(&state.balls) {
            assert_eq!(s.pos, b.pos);
            assert_eq!(s.vel, b.vel);
        }
    }
}
