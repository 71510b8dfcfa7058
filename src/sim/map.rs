//! Course layouts
//!
//! A course is plain data: rectangles, ramps, and a finish-line height.
//! Generators are interchangeable behind [`LayoutProvider`]; the physics
//! core only ever reads the resulting [`MapLayout`].

use glam::DVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{collide_ball_rect, collide_ball_segment};
use super::geom::{Rect, Segment};
use super::state::Ball;
use crate::consts::SCREEN_WIDTH;

/// Obstacle and ramp display palette (RGB)
const COLOR_PALETTE: [[u8; 3]; 7] = [
    [45, 129, 215],
    [215, 67, 45],
    [45, 215, 129],
    [215, 177, 45],
    [129, 45, 215],
    [45, 215, 215],
    [215, 100, 45],
];

fn palette_color(rng: &mut Pcg32) -> [u8; 3] {
    COLOR_PALETTE[rng.random_range(0..COLOR_PALETTE.len())]
}

/// A static rectangular obstacle. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
    pub color: [u8; 3],
}

impl Obstacle {
    pub fn new(x: f64, y: f64, w: f64, h: f64, color: [u8; 3]) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            color,
        }
    }

    /// Check and resolve a collision with a ball.
    pub fn collide_with_ball(&self, ball: &mut Ball) -> bool {
        collide_ball_rect(ball, &self.rect)
    }
}

/// A static inclined line segment (a ramp). Immutable after creation.
/// `thickness` is the rendered line width; collision uses the ball radius
/// only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ramp {
    pub seg: Segment,
    pub thickness: f64,
}

impl Ramp {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            seg: Segment::new(DVec2::new(x1, y1), DVec2::new(x2, y2)),
            thickness: 5.0,
        }
    }

    /// Check and resolve a collision with a ball.
    pub fn collide_with_ball(&self, ball: &mut Ball) -> bool {
        collide_ball_segment(ball, &self.seg)
    }
}

/// A complete course: static geometry plus the finish line height
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapLayout {
    pub obstacles: Vec<Obstacle>,
    pub ramps: Vec<Ramp>,
    pub finish_line_y: f64,
}

/// Anything that can lay out a course. Generators draw from the supplied
/// RNG only, so a seed fixes the layout.
pub trait LayoutProvider {
    fn generate(&self, rng: &mut Pcg32) -> MapLayout;
}

/// The original fixed course: opener ramps, a staggered peg grid,
/// alternating shelves, dual tunnels, and a final drop to the line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicLayout;

impl LayoutProvider for ClassicLayout {
    fn generate(&self, rng: &mut Pcg32) -> MapLayout {
        let w = SCREEN_WIDTH;
        let mut obstacles = Vec::new();
        let mut ramps = Vec::new();

        // Opener: mirrored ramps and side posts
        ramps.push(Ramp::new(0.0, 200.0, 120.0, 210.0));
        ramps.push(Ramp::new(w, 200.0, w - 120.0, 210.0));
        obstacles.push(Obstacle::new(160.0, 400.0, 20.0, 100.0, palette_color(rng)));
        obstacles.push(Obstacle::new(
            w - 180.0,
            400.0,
            20.0,
            100.0,
            palette_color(rng),
        ));
        ramps.push(Ramp::new(0.0, 600.0, w / 2.0 - 40.0, 610.0));
        ramps.push(Ramp::new(w, 600.0, w / 2.0 + 40.0, 610.0));

        // Staggered peg grid, ~85% fill
        let y_start = 800.0;
        let cols = (w / 60.0) as u32;
        for row in 0..12u32 {
            let y_pos = y_start + row as f64 * 80.0;
            let offset = if row % 2 == 1 { 30.0 } else { 0.0 };
            for col in 0..cols {
                let x_pos = col as f64 * 60.0 + offset;
                if rng.random::<f64>() > 0.15 {
                    obstacles.push(Obstacle::new(x_pos, y_pos, 15.0, 15.0, palette_color(rng)));
                }
            }
        }

        // Alternating shelf ramps
        ramps.push(Ramp::new(100.0, 1810.0, w, 1790.0));
        ramps.push(Ramp::new(0.0, 1990.0, w - 100.0, 2010.0));
        ramps.push(Ramp::new(100.0, 2210.0, w, 2190.0));
        ramps.push(Ramp::new(0.0, 2390.0, w - 100.0, 2410.0));

        // Dual tunnels
        let tunnel_y = 2650.0;
        let tunnel_h = 700.0;
        let tunnel_w = 80.0;
        let gap = 150.0;
        let left_x = w / 2.0 - gap / 2.0 - tunnel_w;
        let right_x = w / 2.0 + gap / 2.0;
        for x in [left_x - 20.0, left_x + tunnel_w, right_x - 20.0, right_x + tunnel_w] {
            obstacles.push(Obstacle::new(x, tunnel_y, 20.0, tunnel_h, palette_color(rng)));
        }

        // Final drop
        ramps.push(Ramp::new(0.0, 3450.0, w / 3.0, 3465.0));
        ramps.push(Ramp::new(w, 3450.0, w * 2.0 / 3.0, 3465.0));
        ramps.push(Ramp::new(w / 2.0 - 50.0, 3650.0, w / 2.0 + 50.0, 3660.0));

        MapLayout {
            obstacles,
            ramps,
            finish_line_y: 4500.0,
        }
    }
}

/// Difficulty setting for the seeded course generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Per-difficulty layout knobs
struct Knobs {
    bumper_count: usize,
    bumper_min_dist: f64,
    tunnel_gap: f64,
    bowl_hole_width: f64,
    chicane_width: f64,
    gutter_width: f64,
    flipper_rows: u32,
    peg_rows: u32,
}

impl Difficulty {
    fn knobs(self) -> Knobs {
        match self {
            Difficulty::Easy => Knobs {
                bumper_count: 12,
                bumper_min_dist: 80.0,
                tunnel_gap: 180.0,
                bowl_hole_width: 80.0,
                chicane_width: 140.0,
                gutter_width: 120.0,
                flipper_rows: 7,
                peg_rows: 11,
            },
            Difficulty::Normal => Knobs {
                bumper_count: 18,
                bumper_min_dist: 65.0,
                tunnel_gap: 140.0,
                bowl_hole_width: 60.0,
                chicane_width: 120.0,
                gutter_width: 100.0,
                flipper_rows: 8,
                peg_rows: 12,
            },
            Difficulty::Hard => Knobs {
                bumper_count: 24,
                bumper_min_dist: 55.0,
                tunnel_gap: 110.0,
                bowl_hole_width: 48.0,
                chicane_width: 100.0,
                gutter_width: 80.0,
                flipper_rows: 9,
                peg_rows: 13,
            },
        }
    }
}

/// Greedy bumper placement with rejection: keeps a minimum spacing between
/// bumpers and leaves a central gutter clear so the race cannot softlock.
fn place_bumpers(
    rng: &mut Pcg32,
    count: usize,
    y_min: f64,
    y_max: f64,
    min_dist: f64,
    gutter_width: f64,
) -> Vec<Obstacle> {
    let x_margin = 24.0;
    let gutter_center = SCREEN_WIDTH / 2.0;
    let mut placed: Vec<DVec2> = Vec::new();
    let mut out = Vec::new();
    let max_attempts = count * 40;
    let mut attempts = 0;

    while out.len() < count && attempts < max_attempts {
        attempts += 1;
        let x = rng.random_range(x_margin..=SCREEN_WIDTH - x_margin);
        let y = rng.random_range(y_min..=y_max);
        if (x - gutter_center).abs() < gutter_width / 2.0 {
            continue;
        }
        if placed.iter().any(|p| p.distance(DVec2::new(x, y)) < min_dist) {
            continue;
        }
        placed.push(DVec2::new(x, y));
        out.push(Obstacle::new(x, y, 25.0, 25.0, palette_color(rng)));
    }
    out
}

/// Difficulty-scaled course generator: flipper clusters, spaced bumpers, a
/// serpentine chicane, tunnels, a split fork, a gutter-protected peg grid,
/// and a convergence bowl over the finish line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeededLayout {
    pub difficulty: Difficulty,
}

impl LayoutProvider for SeededLayout {
    fn generate(&self, rng: &mut Pcg32) -> MapLayout {
        let w = SCREEN_WIDTH;
        let k = self.difficulty.knobs();
        let mut obstacles = Vec::new();
        let mut ramps = Vec::new();

        // Gentle opener with mirrored ramps and side posts
        ramps.push(Ramp::new(0.0, 200.0, 120.0, 210.0));
        ramps.push(Ramp::new(w, 200.0, w - 120.0, 210.0));
        obstacles.push(Obstacle::new(160.0, 400.0, 20.0, 110.0, palette_color(rng)));
        obstacles.push(Obstacle::new(
            w - 180.0,
            400.0,
            20.0,
            110.0,
            palette_color(rng),
        ));
        ramps.push(Ramp::new(0.0, 600.0, w / 2.0 - 90.0, 650.0));
        ramps.push(Ramp::new(w, 600.0, w / 2.0 + 90.0, 650.0));

        // Diamond flipper clusters with occasional side mirrors
        let y_start = 820.0;
        let spread_x = if self.difficulty == Difficulty::Hard {
            40.0
        } else {
            50.0
        };
        for i in 0..k.flipper_rows {
            let fx = rng.random_range(60.0..=w - 60.0);
            let fy = y_start + i as f64 * 120.0 + rng.random_range(-28.0..=28.0);
            ramps.push(Ramp::new(fx, fy, fx + 25.0, fy + 25.0));
            ramps.push(Ramp::new(fx, fy, fx - 25.0, fy + 25.0));
            ramps.push(Ramp::new(fx + 25.0, fy + 25.0, fx, fy + 50.0));
            ramps.push(Ramp::new(fx - 25.0, fy + 25.0, fx, fy + 50.0));
            if rng.random::<f64>() < 0.7 {
                let mx = (fx + spread_x).clamp(40.0, w - 40.0);
                ramps.push(Ramp::new(mx, fy + 10.0, mx + 20.0, fy + 30.0));
            }
            if rng.random::<f64>() < 0.7 {
                let mx = (fx - spread_x).clamp(40.0, w - 40.0);
                ramps.push(Ramp::new(mx, fy + 10.0, mx - 20.0, fy + 30.0));
            }
        }

        obstacles.extend(place_bumpers(
            rng,
            k.bumper_count,
            y_start,
            y_start + 1050.0,
            k.bumper_min_dist,
            k.gutter_width,
        ));

        // Rhythm shelves
        ramps.push(Ramp::new(110.0, 1880.0, w, 1840.0));
        ramps.push(Ramp::new(0.0, 1990.0, w - 80.0, 2055.0));
        ramps.push(Ramp::new(120.0, 2210.0, w, 2195.0));
        ramps.push(Ramp::new(0.0, 2390.0, w - 90.0, 2415.0));

        // Serpentine chicane: alternating pinches force S-moves
        let chicane_y = 2560.0;
        let chicane_h = 520.0;
        let left_wall = w / 2.0 - k.chicane_width - 40.0;
        let right_wall = w / 2.0 + k.chicane_width + 40.0;
        let segments = 5;
        let seg_h = chicane_h / segments as f64;
        for s in 0..segments {
            let y0 = chicane_y + s as f64 * seg_h;
            let (lw, rw) = if s % 2 == 0 { (30.0, 18.0) } else { (18.0, 30.0) };
            obstacles.push(Obstacle::new(left_wall, y0, lw, seg_h - 20.0, palette_color(rng)));
            obstacles.push(Obstacle::new(right_wall, y0, rw, seg_h - 20.0, palette_color(rng)));
        }
        // Entry lips
        obstacles.push(Obstacle::new(
            left_wall - 22.0,
            chicane_y - 10.0,
            22.0,
            14.0,
            palette_color(rng),
        ));
        obstacles.push(Obstacle::new(
            right_wall + 2.0,
            chicane_y - 10.0,
            22.0,
            14.0,
            palette_color(rng),
        ));

        // Dual tunnels with difficulty-scaled gap
        let tunnel_y = chicane_y + chicane_h + 40.0;
        let tunnel_h = 680.0;
        let tunnel_w = 84.0;
        let left_x = w / 2.0 - k.tunnel_gap / 2.0 - tunnel_w;
        let right_x = w / 2.0 + k.tunnel_gap / 2.0;
        for x in [left_x - 20.0, left_x + tunnel_w, right_x - 20.0, right_x + tunnel_w] {
            obstacles.push(Obstacle::new(x, tunnel_y, 20.0, tunnel_h, palette_color(rng)));
        }

        // Funnel into the split fork
        let funnel_y = tunnel_y + tunnel_h + 180.0;
        obstacles.push(Obstacle::new(
            w / 2.0 - 10.0,
            funnel_y,
            20.0,
            360.0,
            palette_color(rng),
        ));
        ramps.push(Ramp::new(0.0, funnel_y, w / 2.0 - 90.0, funnel_y + 150.0));
        ramps.push(Ramp::new(w / 2.0 - 10.0, funnel_y + 200.0, 90.0, funnel_y + 360.0));
        ramps.push(Ramp::new(w, funnel_y, w / 2.0 + 90.0, funnel_y + 150.0));
        ramps.push(Ramp::new(
            w / 2.0 + 10.0,
            funnel_y + 200.0,
            w - 90.0,
            funnel_y + 360.0,
        ));

        // Split fork: left is short and technical, right safe and long
        let fork_y = funnel_y + 380.0;
        let left_x0 = 80.0;
        let step_w = w / 2.0 - 120.0;
        for i in 0..3 {
            let y0 = fork_y + i as f64 * 90.0;
            ramps.push(Ramp::new(
                left_x0,
                y0,
                left_x0 + step_w - i as f64 * 30.0,
                y0 + 18.0 + i as f64 * 4.0,
            ));
            obstacles.push(Obstacle::new(
                left_x0 - 16.0,
                y0 - 6.0,
                16.0,
                24.0,
                palette_color(rng),
            ));
        }
        ramps.push(Ramp::new(w - 60.0, fork_y, w / 2.0 + 100.0, fork_y + 240.0));
        obstacles.push(Obstacle::new(
            w - 120.0,
            fork_y + 80.0,
            18.0,
            80.0,
            palette_color(rng),
        ));
        obstacles.push(Obstacle::new(
            w - 170.0,
            fork_y + 180.0,
            18.0,
            80.0,
            palette_color(rng),
        ));

        // Rejoin platform
        let rejoin_y = fork_y + 320.0;
        ramps.push(Ramp::new(60.0, rejoin_y + 60.0, w - 60.0, rejoin_y + 40.0));

        // Peg grid with a protected central gutter
        let peg_start = rejoin_y + 180.0;
        let cols = (w / 60.0) as u32;
        for row in 0..k.peg_rows {
            let y_pos = peg_start + row as f64 * 76.0;
            let offset = if row % 2 == 1 { 30.0 } else { 0.0 };
            for col in 0..cols {
                let x_pos = col as f64 * 60.0 + offset;
                if (x_pos - w / 2.0).abs() < k.gutter_width / 2.0 {
                    continue;
                }
                if rng.random::<f64>() > 0.18 {
                    obstacles.push(Obstacle::new(x_pos, y_pos, 15.0, 15.0, palette_color(rng)));
                }
            }
        }

        // Convergence bowl with a difficulty-scaled hole over the line
        let bowl_top = peg_start + k.peg_rows as f64 * 76.0 + 120.0;
        let bowl_bottom = bowl_top + 200.0;
        let left_hole = w / 2.0 - k.bowl_hole_width / 2.0;
        let right_hole = w / 2.0 + k.bowl_hole_width / 2.0;
        let left_points = [
            DVec2::new(0.0, bowl_top),
            DVec2::new(60.0, bowl_top + 110.0),
            DVec2::new(130.0, bowl_top + 180.0),
            DVec2::new(160.0, bowl_top + 210.0),
            DVec2::new(left_hole, bowl_bottom),
        ];
        for pair in left_points.windows(2) {
            ramps.push(Ramp::new(pair[0].x, pair[0].y, pair[1].x, pair[1].y));
        }
        let right_points = [
            DVec2::new(w, bowl_top),
            DVec2::new(w - 60.0, bowl_top + 110.0),
            DVec2::new(w - 130.0, bowl_top + 180.0),
            DVec2::new(w - 160.0, bowl_top + 210.0),
            DVec2::new(right_hole, bowl_bottom),
        ];
        for pair in right_points.windows(2) {
            ramps.push(Ramp::new(pair[0].x, pair[0].y, pair[1].x, pair[1].y));
        }

        // Ceiling lips that block big-air bypasses of the bowl
        let lip_y = bowl_top - 160.0;
        obstacles.push(Obstacle::new(0.0, lip_y, 120.0, 12.0, palette_color(rng)));
        obstacles.push(Obstacle::new(w - 120.0, lip_y, 120.0, 12.0, palette_color(rng)));

        MapLayout {
            obstacles,
            ramps,
            finish_line_y: bowl_bottom + 380.0,
        }
    }
}
