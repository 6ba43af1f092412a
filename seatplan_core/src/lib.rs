//! seatplan core - force-directed seating layout optimizer
//!
//! Computes new 2D seat positions for a roster of students on a bounded
//! canvas by simulating three forces:
//! 1. **Repulsion**: every pair pushes apart (inverse-square)
//! 2. **Conflict amplification**: pairs involving students with negative
//!    behaviour history push apart harder
//! 3. **Group attraction**: members of the same group are pulled together
//!
//! The simulation runs a fixed number of damped, speed-capped iterations and
//! keeps every seat inside the canvas.
//!
//! ```ignore
//! use seatplan_core::{optimize, Entity, GroupId, HistoricalEvent};
//!
//! let students = vec![
//!     Entity::new(1, 100.0, 100.0).in_group(GroupId(7)),
//!     Entity::new(2, 900.0, 400.0).in_group(GroupId(7)),
//!     Entity::new(3, 120.0, 110.0),
//! ];
//! let log = vec![HistoricalEvent::new(3, "Negative Participation", 1_702_934_400_000)];
//!
//! let layout = optimize(&students, &log)?;
//! ```

pub mod conflict;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod metrics;
pub mod moves;
pub mod optimizer;
pub mod params;
pub mod roster;

// Re-export key types for convenience
pub use conflict::ConflictScoreTable;
pub use error::LayoutError;
pub use metrics::LayoutMetrics;
pub use moves::{plan_moves, EntityMove};
pub use optimizer::{optimize, optimize_on_canvas, IterationFrame, LayoutMap, LayoutOptimizer};
pub use params::{Bounds, Canvas, LayoutParams};
pub use roster::{Entity, EntityId, GroupId, HistoricalEvent};
