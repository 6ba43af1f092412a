//! Tuning parameters and canvas geometry.

use crate::error::{LayoutError, Result};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Force model and integration parameters.
///
/// Every field has a serde default, so a JSON document only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Inverse-square repulsion strength between every pair
    pub repulsion_constant: f32,

    /// Spring constant pulling group members together
    pub attraction_constant: f32,

    /// Repulsion amplification per negative event of either pair member
    pub conflict_multiplier: f32,

    /// Velocity retained after each step (0 = no memory, 1 = no friction)
    pub damping: f32,

    /// Maximum speed in canvas units per iteration
    pub velocity_cap: f32,

    /// Fixed number of iterations; there is no convergence check
    pub iterations: usize,

    /// Added to squared distances so coincident points stay finite
    pub softening: f32,

    /// Space reserved at the right and bottom edges for the seat footprint
    pub canvas_margin: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            repulsion_constant: 500_000.0,
            attraction_constant: 0.05,
            conflict_multiplier: 2.5,
            damping: 0.9,
            velocity_cap: 50.0,
            iterations: 50,
            softening: 0.01,
            canvas_margin: 100.0,
        }
    }
}

impl LayoutParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repulsion(mut self, constant: f32) -> Self {
        self.repulsion_constant = constant;
        self
    }

    pub fn with_attraction(mut self, constant: f32) -> Self {
        self.attraction_constant = constant;
        self
    }

    pub fn with_conflict_multiplier(mut self, multiplier: f32) -> Self {
        self.conflict_multiplier = multiplier;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_velocity_cap(mut self, cap: f32) -> Self {
        self.velocity_cap = cap;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Checks every parameter is finite and in range.
    pub fn validate(&self) -> Result<()> {
        non_negative("repulsion_constant", self.repulsion_constant)?;
        non_negative("attraction_constant", self.attraction_constant)?;
        non_negative("conflict_multiplier", self.conflict_multiplier)?;
        non_negative("canvas_margin", self.canvas_margin)?;

        if !(0.0..=1.0).contains(&self.damping) {
            return Err(LayoutError::parameter(
                "damping",
                format!("{} is outside [0, 1]", self.damping),
            ));
        }
        if self.iterations == 0 {
            return Err(LayoutError::parameter("iterations", "at least one iteration is required"));
        }
        if !self.softening.is_finite() || self.softening <= 0.0 {
            return Err(LayoutError::parameter(
                "softening",
                format!("{} must be positive to keep coincident pairs finite", self.softening),
            ));
        }
        if !(self.repulsion_constant / self.softening).is_finite() {
            return Err(LayoutError::parameter(
                "repulsion_constant",
                format!(
                    "{} over softening {} overflows for coincident pairs",
                    self.repulsion_constant, self.softening
                ),
            ));
        }
        if !self.velocity_cap.is_finite() || self.velocity_cap <= 0.0 {
            return Err(LayoutError::parameter(
                "velocity_cap",
                format!("{} is not a positive finite speed", self.velocity_cap),
            ));
        }
        Ok(())
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::parameter(
            name,
            format!("{} is not a non-negative finite number", value),
        ))
    }
}

/// Logical canvas the layout lives on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 4000.0,
            height: 4000.0,
        }
    }
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Rejects non-positive or non-finite dimensions.
    pub fn validate(&self) -> Result<()> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(LayoutError::InvalidCanvas {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Position bounds once the margin is reserved.
    ///
    /// A canvas narrower than the margin collapses that axis to zero rather
    /// than producing an inverted range.
    pub fn bounds(&self, margin: f32) -> Bounds {
        Bounds {
            max: Vector2::new(
                (self.width - margin).max(0.0),
                (self.height - margin).max(0.0),
            ),
        }
    }
}

/// Closed box `[0, max.x] × [0, max.y]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub max: Vector2<f32>,
}

impl Bounds {
    /// Clamps a point into the box.
    pub fn clamp(&self, p: Vector2<f32>) -> Vector2<f32> {
        Vector2::new(p.x.clamp(0.0, self.max.x), p.y.clamp(0.0, self.max.y))
    }

    /// Returns true if the point lies inside the box (edges included).
    pub fn contains(&self, p: &Vector2<f32>) -> bool {
        (0.0..=self.max.x).contains(&p.x) && (0.0..=self.max.y).contains(&p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let params = LayoutParams::default();
        assert_eq!(params.repulsion_constant, 500_000.0);
        assert_eq!(params.attraction_constant, 0.05);
        assert_eq!(params.conflict_multiplier, 2.5);
        assert_eq!(params.damping, 0.9);
        assert_eq!(params.velocity_cap, 50.0);
        assert_eq!(params.iterations, 50);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides() {
        let params: LayoutParams =
            serde_json::from_str(r#"{"iterations": 10, "damping": 0.5}"#).unwrap();
        assert_eq!(params.iterations, 10);
        assert_eq!(params.damping, 0.5);
        assert_eq!(params.velocity_cap, 50.0);
    }

    #[test]
    fn test_invalid_parameters() {
        let err = LayoutParams::new().with_damping(1.5).validate().unwrap_err();
        assert!(matches!(err, LayoutError::InvalidParameter { name: "damping", .. }));

        let err = LayoutParams::new().with_velocity_cap(0.0).validate().unwrap_err();
        assert!(matches!(err, LayoutError::InvalidParameter { name: "velocity_cap", .. }));

        let err = LayoutParams { softening: 0.0, ..LayoutParams::default() }
            .validate()
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidParameter { name: "softening", .. }));

        let err = LayoutParams::new().with_iterations(0).validate().unwrap_err();
        assert!(matches!(err, LayoutError::InvalidParameter { name: "iterations", .. }));

        let err = LayoutParams::new().with_repulsion(f32::INFINITY).validate().unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidParameter { name: "repulsion_constant", .. }
        ));
    }

    #[test]
    fn test_overflowing_repulsion_ratio_rejected() {
        let params = LayoutParams {
            repulsion_constant: 3.0e38,
            softening: 1.0e-30,
            ..LayoutParams::default()
        };

        let err = params.validate().unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidParameter { name: "repulsion_constant", .. }
        ));
    }

    #[test]
    fn test_canvas_validation() {
        assert!(Canvas::default().validate().is_ok());
        assert!(Canvas::new(0.0, 100.0).validate().is_err());
        assert!(Canvas::new(100.0, -1.0).validate().is_err());
        assert!(Canvas::new(f32::NAN, 100.0).validate().is_err());
    }

    #[test]
    fn test_bounds() {
        let bounds = Canvas::default().bounds(100.0);
        assert_eq!(bounds.max, Vector2::new(3900.0, 3900.0));
        assert_eq!(bounds.clamp(Vector2::new(-5.0, 4500.0)), Vector2::new(0.0, 3900.0));
        assert!(bounds.contains(&Vector2::new(3900.0, 0.0)));
        assert!(!bounds.contains(&Vector2::new(3900.5, 0.0)));

        let narrow = Canvas::new(50.0, 400.0).bounds(100.0);
        assert_eq!(narrow.max, Vector2::new(0.0, 300.0));
    }
}
