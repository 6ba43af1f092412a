//! JSON exporter for layout runs.
//!
//! Exports per-iteration frames so a run can be replayed by an external
//! visualizer.

use crate::error::SimError;
use seatplan_core::{Canvas, EntityId, IterationFrame, LayoutMap};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Position of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedEntity {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
}

impl PlacedEntity {
    /// Flattens a layout map, sorted by id for stable output.
    pub fn from_layout(layout: &LayoutMap) -> Vec<Self> {
        let mut placed: Vec<Self> = layout
            .iter()
            .map(|(&id, p)| Self { id, x: p.x, y: p.y })
            .collect();
        placed.sort_by_key(|p| p.id);
        placed
    }
}

/// A single iteration of a layout run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutFrame {
    /// 1-based iteration number
    pub iteration: usize,

    /// Largest speed in this iteration
    pub max_speed: f32,

    /// Entity positions, in roster order
    pub entities: Vec<PlacedEntity>,
}

impl LayoutFrame {
    /// Captures an observer frame.
    pub fn capture(frame: &IterationFrame<'_>) -> Self {
        Self {
            iteration: frame.iteration(),
            max_speed: frame.max_speed(),
            entities: frame
                .ids()
                .iter()
                .zip(frame.positions())
                .map(|(&id, p)| PlacedEntity { id, x: p.x, y: p.y })
                .collect(),
        }
    }
}

/// Complete layout run export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutExport {
    /// Scenario or input name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Canvas the run was bounded by
    pub canvas: Canvas,

    /// Recorded frames
    pub frames: Vec<LayoutFrame>,

    /// Final result
    pub passed: bool,
}

impl LayoutExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64, canvas: Canvas) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            canvas,
            frames: Vec::new(),
            passed: false,
        }
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: LayoutFrame) {
        self.frames.push(frame);
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, passed: bool) {
        self.passed = passed;
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;
    use seatplan_core::{Entity, LayoutOptimizer};

    #[test]
    fn test_placed_entities_sorted_by_id() {
        let mut layout = LayoutMap::new();
        layout.insert(9, Vector2::new(1.0, 2.0));
        layout.insert(3, Vector2::new(5.0, 6.0));

        let placed = PlacedEntity::from_layout(&layout);

        assert_eq!(placed[0], PlacedEntity { id: 3, x: 5.0, y: 6.0 });
        assert_eq!(placed[1].id, 9);
    }

    #[test]
    fn test_capture_and_write() {
        let entities = vec![Entity::new(1, 100.0, 100.0), Entity::new(2, 140.0, 100.0)];
        let mut export = LayoutExport::new("repel", 42, Canvas::default());

        LayoutOptimizer::default()
            .optimize_observed(&entities, &[], |frame| {
                export.add_frame(LayoutFrame::capture(frame))
            })
            .unwrap();
        export.finalize(true);

        assert_eq!(export.frames.len(), 50);
        assert_eq!(export.frames[49].iteration, 50);
        assert_eq!(export.frames[0].entities.len(), 2);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.json");
        export.write_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let restored: LayoutExport = serde_json::from_str(&text).unwrap();
        assert_eq!(restored.scenario, "repel");
        assert!(restored.passed);
        assert_eq!(restored.frames.len(), 50);
    }
}
