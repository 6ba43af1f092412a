//! Seat Plan Scenario Harness
//!
//! Drives `seatplan_core` through fixed and seeded classroom scenarios and
//! through roster snapshot files.
//!
//! # Pieces
//!
//! - **Scenarios**: named layout checks with a pass/fail verdict
//! - **Generator**: reproducible random classrooms from a 64-bit seed
//! - **Exporter**: per-iteration frames as JSON for external replay
//! - **Snapshots**: JSON roster in, JSON layout report out
//!
//! # Usage
//!
//! ```ignore
//! use seatplan_sim::{ScenarioRunner, ScenarioId};
//!
//! let result = ScenarioRunner::new(42)
//!     .with_students(40)
//!     .run(ScenarioId::CrowdedRoom);
//! assert!(result.passed);
//! ```

mod error;
mod exporter;
mod generator;
mod runner;
pub mod scenarios;
mod snapshot;

pub use error::SimError;
pub use exporter::{LayoutExport, LayoutFrame, PlacedEntity};
pub use generator::RosterGenerator;
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use scenarios::ScenarioId;
pub use snapshot::{LayoutReport, RosterSnapshot};
