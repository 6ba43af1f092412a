//! Roster snapshot files.
//!
//! The host app hands the optimizer a JSON snapshot of its roster and
//! behaviour log, and reads back a report with the new positions and the
//! list of seats that moved.

use crate::error::SimError;
use crate::exporter::PlacedEntity;
use seatplan_core::metrics::LayoutMetrics;
use seatplan_core::{plan_moves, Canvas, Entity, EntityMove, HistoricalEvent, LayoutMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Optimizer input as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub students: Vec<Entity>,

    #[serde(default)]
    pub events: Vec<HistoricalEvent>,

    /// Canvas override; the default 4000×4000 canvas when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas: Option<Canvas>,
}

impl RosterSnapshot {
    /// Reads a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Canvas to optimize on.
    pub fn canvas(&self) -> Canvas {
        self.canvas.unwrap_or_default()
    }
}

/// Optimizer output as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutReport {
    /// New position of every student, sorted by id
    pub positions: Vec<PlacedEntity>,

    /// Students whose seat changed, in roster order
    pub moves: Vec<EntityMove>,

    /// Closest pair after optimization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_pair_distance: Option<f32>,

    /// Mean distance between group mates after optimization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_group_distance: Option<f32>,
}

impl LayoutReport {
    /// Builds the report for `layout` computed from `snapshot`.
    pub fn new(snapshot: &RosterSnapshot, layout: &LayoutMap) -> Self {
        let metrics = LayoutMetrics::measure(&snapshot.students, layout);
        Self {
            positions: PlacedEntity::from_layout(layout),
            moves: plan_moves(&snapshot.students, layout),
            min_pair_distance: metrics.min_pair_distance,
            mean_group_distance: metrics.mean_group_distance,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the report to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
