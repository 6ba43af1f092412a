//! Force accumulation for one iteration.
//!
//! Two contributions make up the net force on each entity:
//! 1. **Repulsion**: inverse-square push between every unordered pair,
//!    amplified when either member has negative behaviour on record.
//! 2. **Attraction**: linear spring between members of the same group.
//!
//! All contributions are summed into a per-slot buffer before any position
//! moves, so integration always sees a complete force field.

use crate::params::LayoutParams;
use nalgebra::Vector2;

/// Golden angle in radians, used to spread coincident pairs.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Computes net forces from the current positions.
#[derive(Debug, Clone, Copy)]
pub struct ForceAccumulator<'a> {
    params: &'a LayoutParams,
    /// Conflict score per roster slot
    scores: &'a [f32],
    /// Member slots per group
    groups: &'a [Vec<usize>],
}

impl<'a> ForceAccumulator<'a> {
    pub fn new(params: &'a LayoutParams, scores: &'a [f32], groups: &'a [Vec<usize>]) -> Self {
        Self {
            params,
            scores,
            groups,
        }
    }

    /// Overwrites `forces` with the net force on every slot.
    ///
    /// `positions`, `forces` and the score slice must have the same length.
    pub fn accumulate(&self, positions: &[Vector2<f32>], forces: &mut [Vector2<f32>]) {
        debug_assert_eq!(positions.len(), forces.len());
        debug_assert_eq!(positions.len(), self.scores.len());

        forces.fill(Vector2::zeros());
        self.add_repulsion(positions, forces);
        self.add_attraction(positions, forces);
    }

    fn add_repulsion(&self, positions: &[Vector2<f32>], forces: &mut [Vector2<f32>]) {
        let n = positions.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let push = self.repulsion(i, j, positions[i] - positions[j]);
                forces[i] += push;
                forces[j] -= push;
            }
        }
    }

    /// Force exerted on slot `i` by slot `j`, with `delta = p_i - p_j`.
    fn repulsion(&self, i: usize, j: usize, delta: Vector2<f32>) -> Vector2<f32> {
        let distance_sq = delta.x * delta.x + delta.y * delta.y + self.params.softening;
        let distance = distance_sq.sqrt();

        let mut magnitude = self.params.repulsion_constant / distance_sq;
        let (score_i, score_j) = (self.scores[i], self.scores[j]);
        if score_i > 0.0 || score_j > 0.0 {
            magnitude *= 1.0 + (score_i + score_j) * self.params.conflict_multiplier;
        }

        if delta.x == 0.0 && delta.y == 0.0 {
            // Exactly stacked: no direction to push along, pick one per pair.
            coincident_direction(i, j) * magnitude
        } else {
            (delta / distance) * magnitude
        }
    }

    fn add_attraction(&self, positions: &[Vector2<f32>], forces: &mut [Vector2<f32>]) {
        let k = self.params.attraction_constant;
        for members in self.groups {
            for (a, &i) in members.iter().enumerate() {
                for &j in &members[a + 1..] {
                    let pull = (positions[i] - positions[j]) * k;
                    forces[i] -= pull;
                    forces[j] += pull;
                }
            }
        }
    }
}

/// Deterministic unit vector for a pair of slots.
fn coincident_direction(i: usize, j: usize) -> Vector2<f32> {
    let angle = (i as f32 * 31.0 + j as f32) * GOLDEN_ANGLE;
    Vector2::new(angle.cos(), angle.sin())
}
