//! Shape geometry, bounce reflection and color cycling.
//!
//! A [`ShapeState`] is a closed polyline of `P` points, each with its own
//! velocity. It lives inside exactly one simulator thread and is never shared;
//! the renderable part crosses thread boundaries only as a copied
//! [`Snapshot`].
//!
//! All coordinates are in pixels with `(0, 0)` at the top-left corner and the
//! bounds inclusive on both ends: after every [`ShapeState::advance`], each
//! point lies in `[0, width] × [0, height]`.

use fastrand::Rng;
use raylib::prelude::Vector2;
use smallvec::SmallVec;

/// Identifier of a simulated shape (its index at startup).
pub type ShapeId = usize;

/// Inline storage for a shape's points. Six points is the usual count, so
/// snapshots rarely hit the heap.
pub type PointBuf = SmallVec<[Vector2; 8]>;

/// Inclusive rectangular area the points bounce inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Right edge in pixels.
    pub width: f32,
    /// Bottom edge in pixels.
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether `p` is inside the area, edges included.
    pub fn contains(&self, p: Vector2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }
}

/// Parameters used to randomize a new shape.
#[derive(Debug, Clone, Copy)]
pub struct SpawnParams {
    /// Number of points in the polyline.
    pub point_count: usize,
    /// Inward margin from every edge for initial positions.
    pub margin: f32,
    /// Minimum initial speed in pixels per second.
    pub min_speed: f32,
    /// Maximum initial speed in pixels per second.
    pub max_speed: f32,
    /// Number of colors in the palette.
    pub palette_len: usize,
}

/// Full simulation state of one shape.
#[derive(Debug, Clone)]
pub struct ShapeState {
    /// Polyline vertices, in drawing order.
    pub points: PointBuf,
    /// Per-point velocity in pixels per second, index-aligned with `points`.
    pub velocities: PointBuf,
    /// Index into the palette, reduced modulo the palette length when drawn.
    pub color_index: usize,
}

/// Immutable renderable copy of a shape, sent from a simulator to the
/// coordinator. Velocities stay behind.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub shape_id: ShapeId,
    pub points: PointBuf,
    pub color_index: usize,
}

impl ShapeState {
    /// Build a shape with uniformly random positions inside the margin,
    /// random headings and speeds, and a random starting color.
    ///
    /// When the bounds are too small for the margin, the margin collapses to
    /// the center of the area instead of producing an inverted range.
    pub fn random(bounds: Bounds, params: &SpawnParams, rng: &mut Rng) -> Self {
        let margin_x = params.margin.min(bounds.width / 2.0);
        let margin_y = params.margin.min(bounds.height / 2.0);

        let mut points = PointBuf::with_capacity(params.point_count);
        let mut velocities = PointBuf::with_capacity(params.point_count);

        for _ in 0..params.point_count {
            points.push(Vector2 {
                x: uniform(rng, margin_x, bounds.width - margin_x),
                y: uniform(rng, margin_y, bounds.height - margin_y),
            });
        }
        for _ in 0..params.point_count {
            let angle = uniform(rng, 0.0, std::f32::consts::TAU);
            let speed = uniform(rng, params.min_speed, params.max_speed);
            velocities.push(Vector2 {
                x: angle.cos() * speed,
                y: angle.sin() * speed,
            });
        }

        Self {
            points,
            velocities,
            color_index: rng.usize(..params.palette_len.max(1)),
        }
    }

    /// Move every point by `velocity * dt`, then reflect it off the walls.
    pub fn advance(&mut self, dt: f32, bounds: Bounds) {
        for (point, velocity) in self.points.iter_mut().zip(self.velocities.iter_mut()) {
            point.x += velocity.x * dt;
            point.y += velocity.y * dt;
            bounce_point(point, velocity, bounds);
        }
    }

    /// Copy the renderable part of the state.
    pub fn snapshot(&self, shape_id: ShapeId) -> Snapshot {
        Snapshot {
            shape_id,
            points: self.points.clone(),
            color_index: self.color_index,
        }
    }
}

/// Clamp a point into `bounds`, independently per axis.
///
/// Crossing the low edge clamps to 0 and makes the velocity component
/// non-negative; crossing the high edge clamps to the bound and makes it
/// non-positive. A point past a corner bounces off both walls at once.
/// Interior points are left untouched.
pub fn bounce_point(point: &mut Vector2, velocity: &mut Vector2, bounds: Bounds) {
    bounce_axis(&mut point.x, &mut velocity.x, bounds.width);
    bounce_axis(&mut point.y, &mut velocity.y, bounds.height);
}

fn bounce_axis(coord: &mut f32, velocity: &mut f32, max: f32) {
    if *coord < 0.0 {
        *coord = 0.0;
        *velocity = velocity.abs();
    } else if *coord > max {
        *coord = max;
        *velocity = -velocity.abs();
    }
}

/// Periodic recoloring driven by accumulated simulated time.
#[derive(Debug, Clone, Copy)]
pub struct ColorCycle {
    /// Seconds between recolors.
    pub period: f32,
    timer: f32,
}

impl ColorCycle {
    pub fn new(period: f32) -> Self {
        Self { period, timer: 0.0 }
    }

    /// Seconds accumulated since the last recolor.
    pub fn elapsed(&self) -> f32 {
        self.timer
    }

    /// Accumulate `dt`; once the timer passes the period, step `color_index`
    /// forward by 1 or 2 (chosen by `rng`) modulo `palette_len` and reset.
    ///
    /// Returns `true` when the color changed.
    pub fn advance(
        &mut self,
        dt: f32,
        color_index: &mut usize,
        palette_len: usize,
        rng: &mut Rng,
    ) -> bool {
        self.timer += dt;
        if self.timer <= self.period {
            return false;
        }
        let step = 1 + rng.usize(..2);
        *color_index = (*color_index + step) % palette_len.max(1);
        self.timer = 0.0;
        true
    }
}

fn uniform(rng: &mut Rng, lo: f32, hi: f32) -> f32 {
    lo + rng.f32() * (hi - lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;
    const BOUNDS: Bounds = Bounds {
        width: 800.0,
        height: 600.0,
    };

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn single_point(x: f32, y: f32, vx: f32, vy: f32) -> ShapeState {
        let mut points = PointBuf::new();
        points.push(Vector2 { x, y });
        let mut velocities = PointBuf::new();
        velocities.push(Vector2 { x: vx, y: vy });
        ShapeState {
            points,
            velocities,
            color_index: 0,
        }
    }

    fn spawn_params() -> SpawnParams {
        SpawnParams {
            point_count: 6,
            margin: 80.0,
            min_speed: 80.0,
            max_speed: 200.0,
            palette_len: 8,
        }
    }

    // ==================== BOUNCE TESTS ====================

    #[test]
    fn test_bounce_right_edge() {
        let mut p = Vector2 {
            x: BOUNDS.width + 5.0,
            y: 300.0,
        };
        let mut v = Vector2 { x: 10.0, y: 3.0 };
        bounce_point(&mut p, &mut v, BOUNDS);
        assert!(approx_eq(p.x, BOUNDS.width));
        assert!(v.x <= 0.0);
        assert!(approx_eq(v.x, -10.0));
        assert!(approx_eq(v.y, 3.0));
    }

    #[test]
    fn test_bounce_left_edge() {
        let mut p = Vector2 { x: -5.0, y: 300.0 };
        let mut v = Vector2 { x: -10.0, y: 0.0 };
        bounce_point(&mut p, &mut v, BOUNDS);
        assert!(approx_eq(p.x, 0.0));
        assert!(approx_eq(v.x, 10.0));
    }

    #[test]
    fn test_bounce_bottom_edge() {
        let mut p = Vector2 {
            x: 400.0,
            y: BOUNDS.height + 5.0,
        };
        let mut v = Vector2 { x: 1.0, y: 10.0 };
        bounce_point(&mut p, &mut v, BOUNDS);
        assert!(approx_eq(p.y, BOUNDS.height));
        assert!(approx_eq(v.y, -10.0));
        assert!(approx_eq(v.x, 1.0));
    }

    #[test]
    fn test_bounce_top_edge() {
        let mut p = Vector2 { x: 400.0, y: -5.0 };
        let mut v = Vector2 { x: 0.0, y: -10.0 };
        bounce_point(&mut p, &mut v, BOUNDS);
        assert!(approx_eq(p.y, 0.0));
        assert!(approx_eq(v.y, 10.0));
    }

    #[test]
    fn test_bounce_keeps_sign_already_pointing_inward() {
        // Velocity already points back inside: it must stay that way.
        let mut p = Vector2 { x: -1.0, y: 10.0 };
        let mut v = Vector2 { x: 4.0, y: 0.0 };
        bounce_point(&mut p, &mut v, BOUNDS);
        assert!(approx_eq(v.x, 4.0));
    }

    #[test]
    fn test_bounce_corner_flips_both_axes() {
        let mut p = Vector2 {
            x: BOUNDS.width + 2.0,
            y: -3.0,
        };
        let mut v = Vector2 { x: 7.0, y: -9.0 };
        bounce_point(&mut p, &mut v, BOUNDS);
        assert!(approx_eq(p.x, BOUNDS.width));
        assert!(approx_eq(p.y, 0.0));
        assert!(v.x <= 0.0);
        assert!(v.y >= 0.0);
    }

    #[test]
    fn test_advance_crossing_edge_in_one_step() {
        let mut shape = single_point(BOUNDS.width - 1.0, 300.0, 10.0, 0.0);
        shape.advance(1.0, BOUNDS);
        assert!(approx_eq(shape.points[0].x, BOUNDS.width));
        assert!(approx_eq(shape.velocities[0].x, -10.0));
    }

    #[test]
    fn test_advance_interior_preserves_velocity() {
        let mut shape = single_point(100.0, 100.0, 30.0, -20.0);
        shape.advance(0.5, BOUNDS);
        assert!(approx_eq(shape.points[0].x, 115.0));
        assert!(approx_eq(shape.points[0].y, 90.0));
        assert!(approx_eq(shape.velocities[0].x, 30.0));
        assert!(approx_eq(shape.velocities[0].y, -20.0));
    }

    #[test]
    fn test_advance_zero_dt_is_noop() {
        let mut shape = single_point(10.0, 20.0, 30.0, 40.0);
        shape.advance(0.0, BOUNDS);
        assert!(approx_eq(shape.points[0].x, 10.0));
        assert!(approx_eq(shape.points[0].y, 20.0));
    }

    // ==================== SPAWN TESTS ====================

    #[test]
    fn test_random_shape_respects_margin_and_speed() {
        let params = spawn_params();
        let mut rng = Rng::with_seed(7);
        for _ in 0..50 {
            let shape = ShapeState::random(BOUNDS, &params, &mut rng);
            assert_eq!(shape.points.len(), 6);
            assert_eq!(shape.velocities.len(), 6);
            assert!(shape.color_index < 8);
            for p in shape.points.iter() {
                assert!(p.x >= 80.0 && p.x <= BOUNDS.width - 80.0);
                assert!(p.y >= 80.0 && p.y <= BOUNDS.height - 80.0);
            }
            for v in shape.velocities.iter() {
                let speed = (v.x * v.x + v.y * v.y).sqrt();
                assert!(speed >= 80.0 - EPSILON && speed <= 200.0 + EPSILON);
            }
        }
    }

    #[test]
    fn test_random_shape_tiny_bounds_stays_inside() {
        let params = spawn_params();
        let tiny = Bounds::new(100.0, 50.0);
        let mut rng = Rng::with_seed(3);
        let shape = ShapeState::random(tiny, &params, &mut rng);
        assert!(shape.points.iter().all(|p| tiny.contains(*p)));
    }

    #[test]
    fn test_same_seed_same_shape() {
        let params = spawn_params();
        let a = ShapeState::random(BOUNDS, &params, &mut Rng::with_seed(42));
        let b = ShapeState::random(BOUNDS, &params, &mut Rng::with_seed(42));
        assert_eq!(a.points, b.points);
        assert_eq!(a.velocities, b.velocities);
        assert_eq!(a.color_index, b.color_index);
    }

    #[test]
    fn test_bounds_invariant_over_many_steps() {
        let params = spawn_params();
        let mut rng = Rng::with_seed(99);
        let mut shape = ShapeState::random(BOUNDS, &params, &mut rng);
        for i in 0..5_000 {
            // Mix regular ticks with the odd long stall.
            let dt = if i % 500 == 0 { 2.0 } else { 1.0 / 45.0 };
            shape.advance(dt, BOUNDS);
            assert!(shape.points.iter().all(|p| BOUNDS.contains(*p)));
            assert_eq!(shape.points.len(), shape.velocities.len());
        }
    }

    #[test]
    fn test_snapshot_copies_points_and_color() {
        let mut shape = single_point(1.0, 2.0, 3.0, 4.0);
        shape.color_index = 5;
        let snap = shape.snapshot(9);
        shape.points[0].x = 100.0;
        assert_eq!(snap.shape_id, 9);
        assert_eq!(snap.color_index, 5);
        assert!(approx_eq(snap.points[0].x, 1.0));
    }

    // ==================== COLOR CYCLE TESTS ====================

    #[test]
    fn test_color_cycle_waits_for_period() {
        let mut cycle = ColorCycle::new(3.5);
        let mut rng = Rng::with_seed(1);
        let mut color = 2;
        assert!(!cycle.advance(3.0, &mut color, 8, &mut rng));
        assert_eq!(color, 2);
        assert!(approx_eq(cycle.elapsed(), 3.0));
    }

    #[test]
    fn test_color_cycle_steps_by_one_or_two() {
        let mut rng = Rng::with_seed(5);
        for start in 0..8 {
            let mut cycle = ColorCycle::new(3.5);
            let mut color = start;
            let mut changed = false;
            for _ in 0..200 {
                if cycle.advance(1.0 / 45.0, &mut color, 8, &mut rng) {
                    changed = true;
                    break;
                }
            }
            assert!(changed);
            assert!(color == (start + 1) % 8 || color == (start + 2) % 8);
            assert!(approx_eq(cycle.elapsed(), 0.0));
        }
    }

    #[test]
    fn test_color_cycle_single_color_palette() {
        let mut cycle = ColorCycle::new(0.1);
        let mut rng = Rng::with_seed(5);
        let mut color = 0;
        assert!(cycle.advance(1.0, &mut color, 1, &mut rng));
        assert_eq!(color, 0);
    }
}
