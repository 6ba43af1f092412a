//! Damped velocity integration with speed cap and canvas clamping.

use crate::params::{Bounds, LayoutParams};
use nalgebra::Vector2;

/// Advances one entity by one iteration.
///
/// Returns the post-cap speed. Velocity is not reset when the position is
/// clamped, so an entity pinned against an edge keeps pushing into it.
pub fn step(
    position: &mut Vector2<f32>,
    velocity: &mut Vector2<f32>,
    force: Vector2<f32>,
    params: &LayoutParams,
    bounds: &Bounds,
) -> f32 {
    *velocity = (*velocity + force) * params.damping;

    // An overflowed force has no usable direction; the entity sits this step out.
    if !velocity.iter().all(|c| c.is_finite()) {
        *velocity = Vector2::zeros();
    }

    let mut speed = velocity.norm();
    if speed > params.velocity_cap {
        *velocity = if speed.is_finite() {
            *velocity / speed * params.velocity_cap
        } else {
            // Finite components whose norm overflows.
            (*velocity / velocity.amax()).normalize() * params.velocity_cap
        };
        speed = params.velocity_cap;
    }

    let next = *position + *velocity;
    if next.iter().all(|c| c.is_finite()) {
        *position = next;
    }
    *position = bounds.clamp(*position);
    speed
}

/// Applies [`step`] to every slot. Slices must have equal length.
///
/// Returns the largest post-cap speed of the iteration.
pub fn integrate_all(
    positions: &mut [Vector2<f32>],
    velocities: &mut [Vector2<f32>],
    forces: &[Vector2<f32>],
    params: &LayoutParams,
    bounds: &Bounds,
) -> f32 {
    positions
        .iter_mut()
        .zip(velocities.iter_mut())
        .zip(forces)
        .map(|((p, v), f)| step(p, v, *f, params, bounds))
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Canvas;
    use approx::assert_relative_eq;

    fn bounds() -> Bounds {
        Canvas::default().bounds(100.0)
    }

    #[test]
    fn test_damped_update_below_cap() {
        let params = LayoutParams::default();
        let mut p = Vector2::new(1000.0, 1000.0);
        let mut v = Vector2::new(10.0, 0.0);

        let speed = step(&mut p, &mut v, Vector2::new(0.0, 20.0), &params, &bounds());

        assert_relative_eq!(v.x, 9.0, epsilon = 1e-5);
        assert_relative_eq!(v.y, 18.0, epsilon = 1e-5);
        assert_relative_eq!(speed, v.norm());
        assert_relative_eq!(p.x, 1009.0, epsilon = 1e-3);
        assert_relative_eq!(p.y, 1018.0, epsilon = 1e-3);
    }

    #[test]
    fn test_velocity_cap_preserves_direction() {
        let params = LayoutParams::default();
        let mut p = Vector2::new(2000.0, 2000.0);
        let mut v = Vector2::zeros();

        let speed = step(&mut p, &mut v, Vector2::new(3000.0, 4000.0), &params, &bounds());

        assert_eq!(speed, 50.0);
        assert_relative_eq!(v.norm(), 50.0, epsilon = 1e-3);
        assert_relative_eq!(v.x, 30.0, epsilon = 1e-3);
        assert_relative_eq!(v.y, 40.0, epsilon = 1e-3);
    }

    #[test]
    fn test_position_clamped_but_velocity_kept() {
        let params = LayoutParams::default();
        let mut p = Vector2::new(10.0, 3890.0);
        let mut v = Vector2::zeros();

        step(&mut p, &mut v, Vector2::new(-30.0, 30.0), &params, &bounds());

        assert_eq!(p, Vector2::new(0.0, 3900.0));
        assert_relative_eq!(v.x, -27.0, epsilon = 1e-4);
        assert_relative_eq!(v.y, 27.0, epsilon = 1e-4);
    }

    #[test]
    fn test_non_finite_force_drops_motion() {
        let params = LayoutParams::default();

        for force in [Vector2::new(f32::INFINITY, 0.0), Vector2::new(f32::NAN, 1.0)] {
            let mut p = Vector2::new(4500.0, 200.0);
            let mut v = Vector2::new(5.0, 5.0);

            let speed = step(&mut p, &mut v, force, &params, &bounds());

            assert_eq!(speed, 0.0);
            assert_eq!(v, Vector2::zeros());
            assert_eq!(p, Vector2::new(3900.0, 200.0));
        }
    }

    #[test]
    fn test_overflowing_norm_is_still_capped() {
        let params = LayoutParams::default();
        let mut p = Vector2::new(1000.0, 1000.0);
        let mut v = Vector2::new(3.0e38, 3.0e38);

        let speed = step(&mut p, &mut v, Vector2::zeros(), &params, &bounds());

        assert_eq!(speed, 50.0);
        assert_relative_eq!(v.x, 50.0 / 2.0f32.sqrt(), epsilon = 1e-3);
        assert_relative_eq!(v.y, 50.0 / 2.0f32.sqrt(), epsilon = 1e-3);
        assert!(bounds().contains(&p));
    }

    #[test]
    fn test_integrate_all_reports_max_speed() {
        let params = LayoutParams::default();
        let mut positions = vec![Vector2::new(500.0, 500.0), Vector2::new(800.0, 800.0)];
        let mut velocities = vec![Vector2::zeros(); 2];
        let forces = vec![Vector2::new(10.0, 0.0), Vector2::new(0.0, -1000.0)];

        let max_speed =
            integrate_all(&mut positions, &mut velocities, &forces, &params, &bounds());

        assert_eq!(max_speed, 50.0);
        assert_relative_eq!(positions[0].x, 509.0, epsilon = 1e-3);
        assert_relative_eq!(positions[1].y, 750.0, epsilon = 1e-3);
    }
}
