//! The layout orchestrator.
//!
//! Runs a fixed number of force/integrate rounds over a dense copy of the
//! roster and hands back one position per input entity:
//!
//! ```text
//! entities ──► Roster (slots) ──┐
//! events ───► ConflictScoreTable ┴─► [ForceAccumulator ─► integrate_all] × N ─► LayoutMap
//! ```
//!
//! Every call owns its buffers. Nothing survives between calls, so the
//! optimizer is a pure function of its inputs.

use crate::conflict::ConflictScoreTable;
use crate::error::Result;
use crate::forces::ForceAccumulator;
use crate::integrator::integrate_all;
use crate::params::{Canvas, LayoutParams};
use crate::roster::{Entity, EntityId, HistoricalEvent, Roster};
use nalgebra::Vector2;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Optimized positions keyed by entity id.
pub type LayoutMap = HashMap<EntityId, Vector2<f32>>;

/// Rosters above this size are flagged as expensive (cost is O(iterations · n²)).
pub const LARGE_ROSTER: usize = 500;

/// Read-only view of the simulation after one integration step.
#[derive(Debug, Clone, Copy)]
pub struct IterationFrame<'a> {
    iteration: usize,
    roster: &'a Roster,
    positions: &'a [Vector2<f32>],
    velocities: &'a [Vector2<f32>],
    max_speed: f32,
}

impl<'a> IterationFrame<'a> {
    /// 1-based iteration number.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Entity ids, aligned with [`positions`](Self::positions).
    pub fn ids(&self) -> &'a [EntityId] {
        self.roster.ids()
    }

    pub fn positions(&self) -> &'a [Vector2<f32>] {
        self.positions
    }

    pub fn velocities(&self) -> &'a [Vector2<f32>] {
        self.velocities
    }

    /// Largest speed reached in this iteration.
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Current position of an entity.
    pub fn position_of(&self, id: EntityId) -> Option<Vector2<f32>> {
        self.roster.slot(id).map(|slot| self.positions[slot])
    }
}

/// Force-directed seating optimizer.
#[derive(Debug, Clone, Default)]
pub struct LayoutOptimizer {
    params: LayoutParams,
    canvas: Canvas,
}

impl LayoutOptimizer {
    /// Creates an optimizer after validating parameters and canvas.
    pub fn new(params: LayoutParams, canvas: Canvas) -> Result<Self> {
        params.validate()?;
        canvas.validate()?;
        Ok(Self { params, canvas })
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Computes new positions for `entities`.
    pub fn optimize(&self, entities: &[Entity], events: &[HistoricalEvent]) -> Result<LayoutMap> {
        self.optimize_observed(entities, events, |_| {})
    }

    /// Like [`optimize`](Self::optimize), calling `observer` after every
    /// iteration.
    pub fn optimize_observed<F>(
        &self,
        entities: &[Entity],
        events: &[HistoricalEvent],
        mut observer: F,
    ) -> Result<LayoutMap>
    where
        F: FnMut(&IterationFrame<'_>),
    {
        let roster = Roster::from_entities(entities)?;
        let table = ConflictScoreTable::from_events(events);
        let scores = table.dense_scores(&roster);
        let bounds = self.canvas.bounds(self.params.canvas_margin);

        if roster.len() > LARGE_ROSTER {
            warn!(
                "Optimizing {} entities: {} iterations of O(n²) pair forces",
                roster.len(),
                self.params.iterations
            );
        }
        debug!(
            "Layout start: {} entities, {} groups, {} with conflicts, {} iterations",
            roster.len(),
            roster.groups().len(),
            table.len(),
            self.params.iterations
        );

        let mut positions = roster.positions().to_vec();
        let mut velocities = vec![Vector2::zeros(); roster.len()];
        let mut forces = vec![Vector2::zeros(); roster.len()];
        let accumulator = ForceAccumulator::new(&self.params, &scores, roster.groups());

        for iteration in 1..=self.params.iterations {
            accumulator.accumulate(&positions, &mut forces);
            let max_speed =
                integrate_all(&mut positions, &mut velocities, &forces, &self.params, &bounds);

            trace!("  iteration {} | max speed {:.2}", iteration, max_speed);

            observer(&IterationFrame {
                iteration,
                roster: &roster,
                positions: &positions,
                velocities: &velocities,
                max_speed,
            });
        }

        debug!("Layout done: {} positions", positions.len());

        Ok(roster.ids().iter().copied().zip(positions).collect())
    }
}

/// Optimizes on the default 4000×4000 canvas with default parameters.
pub fn optimize(entities: &[Entity], events: &[HistoricalEvent]) -> Result<LayoutMap> {
    LayoutOptimizer::default().optimize(entities, events)
}

/// Optimizes on a custom canvas with default parameters.
pub fn optimize_on_canvas(
    entities: &[Entity],
    events: &[HistoricalEvent],
    canvas: Canvas,
) -> Result<LayoutMap> {
    LayoutOptimizer::new(LayoutParams::default(), canvas)?.optimize(entities, events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::roster::GroupId;

    #[test]
    fn test_empty_roster() {
        let layout = optimize(&[], &[]).unwrap();
        assert!(layout.is_empty());
    }

    #[test]
    fn test_single_entity_unchanged() {
        let entities = vec![Entity::new(1, 1234.5, 87.25)];
        let events = vec![HistoricalEvent::new(1, "Negative", 0)];

        let layout = optimize(&entities, &events).unwrap();

        assert_eq!(layout[&1], Vector2::new(1234.5, 87.25));
    }

    #[test]
    fn test_single_entity_out_of_bounds_is_clamped() {
        let layout = optimize(&[Entity::new(1, 3990.0, -20.0)], &[]).unwrap();
        assert_eq!(layout[&1], Vector2::new(3900.0, 0.0));
    }

    #[test]
    fn test_extreme_positions_end_on_canvas() {
        let entities = vec![Entity::new(1, 2.0e38, 0.0), Entity::new(2, -2.0e38, 0.0)];
        let bounds = Canvas::default().bounds(100.0);

        let layout = optimize(&entities, &[]).unwrap();

        assert!(layout.values().all(|p| bounds.contains(p)), "{:?}", layout);
    }

    #[test]
    fn test_overflowing_conflict_force_stays_on_canvas() {
        let params = LayoutParams {
            softening: 1.0,
            ..LayoutParams::new().with_repulsion(3.0e38)
        };
        let optimizer = LayoutOptimizer::new(params, Canvas::default()).unwrap();
        let entities = vec![Entity::new(1, 500.0, 500.0), Entity::new(2, 500.0, 500.0)];
        let events: Vec<HistoricalEvent> = (0..5)
            .flat_map(|n| {
                [
                    HistoricalEvent::new(1, "Negative Participation", n),
                    HistoricalEvent::new(2, "Negative Participation", n),
                ]
            })
            .collect();
        let bounds = optimizer.canvas().bounds(optimizer.params().canvas_margin);

        let layout = optimizer.optimize(&entities, &events).unwrap();

        assert!(layout.values().all(|p| bounds.contains(p)), "{:?}", layout);
    }

    #[test]
    fn test_overflowing_parameters_rejected() {
        let params = LayoutParams {
            repulsion_constant: 3.0e38,
            softening: 1.0e-30,
            ..LayoutParams::default()
        };
        let err = LayoutOptimizer::new(params, Canvas::default()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidParameter { .. }));
    }

    #[test]
    fn test_observer_sees_every_iteration() {
        let optimizer =
            LayoutOptimizer::new(LayoutParams::new().with_iterations(7), Canvas::default())
                .unwrap();
        let entities = vec![Entity::new(1, 100.0, 100.0), Entity::new(2, 150.0, 100.0)];

        let mut seen = Vec::new();
        let layout = optimizer
            .optimize_observed(&entities, &[], |frame| {
                seen.push((frame.iteration(), frame.position_of(2)));
            })
            .unwrap();

        assert_eq!(seen.len(), 7);
        assert_eq!(seen[0].0, 1);
        assert_eq!(seen[6], (7, Some(layout[&2])));
    }

    #[test]
    fn test_invalid_canvas_rejected() {
        let err = optimize_on_canvas(&[Entity::new(1, 0.0, 0.0)], &[], Canvas::new(0.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidCanvas { .. }));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let entities = vec![
            Entity::new(3, 0.0, 0.0).in_group(GroupId(1)),
            Entity::new(3, 100.0, 0.0),
        ];
        assert_eq!(
            optimize(&entities, &[]).unwrap_err(),
            LayoutError::DuplicateEntity(3)
        );
    }

    #[test]
    fn test_unknown_event_ids_have_no_effect() {
        let entities = vec![Entity::new(1, 400.0, 400.0), Entity::new(2, 520.0, 430.0)];
        let noise = vec![
            HistoricalEvent::new(77, "Negative Participation", 0),
            HistoricalEvent::new(1, "Talking", 0),
        ];

        assert_eq!(optimize(&entities, &noise).unwrap(), optimize(&entities, &[]).unwrap());
    }
}
