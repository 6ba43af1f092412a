//! Scenario runner - executes layout verification scenarios.

use crate::error::SimError;
use crate::exporter::{LayoutExport, LayoutFrame};
use crate::generator::RosterGenerator;
use crate::scenarios::ScenarioId;

use seatplan_core::metrics::{min_pairwise_distance, pair_distance, LayoutMetrics};
use seatplan_core::{
    plan_moves, Bounds, Canvas, Entity, GroupId, HistoricalEvent, IterationFrame, LayoutMap,
    LayoutOptimizer, LayoutParams,
};
use tracing::{debug, info, warn};

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Iterations per optimizer call
    pub iterations: usize,

    /// Number of entities in the main run
    pub entity_count: usize,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default)]
pub struct ScenarioMetrics {
    /// Highest speed seen in any iteration
    pub max_speed: f32,

    /// Positions observed outside the canvas bounds
    pub out_of_bounds: usize,

    /// Entities whose seat changed
    pub moved: usize,

    /// Closest pair in the final layout
    pub min_pair_distance: Option<f32>,

    /// Mean intra-group distance in the final layout
    pub mean_group_distance: Option<f32>,
}

/// Observes the main run of a scenario.
struct Recorder {
    bounds: Bounds,
    max_speed: f32,
    out_of_bounds: usize,
    export: Option<LayoutExport>,
}

impl Recorder {
    fn observe(&mut self, frame: &IterationFrame<'_>) {
        self.max_speed = self.max_speed.max(frame.max_speed());
        self.out_of_bounds += frame
            .positions()
            .iter()
            .filter(|p| !self.bounds.contains(p))
            .count();
        if let Some(export) = self.export.as_mut() {
            export.add_frame(LayoutFrame::capture(frame));
        }
    }
}

/// What a scenario function reports back.
struct Outcome {
    entities: Vec<Entity>,
    layout: LayoutMap,
    failure: Option<String>,
}

/// Runs layout scenarios.
pub struct ScenarioRunner {
    /// Seed for generated rosters
    seed: u64,

    /// Students in generated rosters
    students: usize,

    /// Optimizer parameters
    params: LayoutParams,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            students: 30,
            params: LayoutParams::default(),
        }
    }

    /// Sets the size of generated rosters.
    pub fn with_students(mut self, students: usize) -> Self {
        self.students = students;
        self
    }

    /// Sets the optimizer parameters.
    pub fn with_params(mut self, params: LayoutParams) -> Self {
        self.params = params;
        self
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        self.execute(scenario, None).0
    }

    /// Runs a scenario, recording every iteration of its main run.
    pub fn run_with_export(&self, scenario: ScenarioId) -> (ScenarioResult, LayoutExport) {
        let export = LayoutExport::new(scenario.name(), self.seed, Canvas::default());
        let (result, export) = self.execute(scenario, Some(export));
        let mut export = export.unwrap_or_else(|| {
            LayoutExport::new(scenario.name(), self.seed, Canvas::default())
        });
        export.finalize(result.passed);
        (result, export)
    }

    /// Runs a scenario and writes its frames to `path`.
    ///
    /// A failed write is an error even when the scenario itself passed.
    pub fn run_to_file(
        &self,
        scenario: ScenarioId,
        path: impl AsRef<std::path::Path>,
    ) -> Result<ScenarioResult, SimError> {
        let (result, export) = self.run_with_export(scenario);
        export.write_to_file(&path)?;
        info!(
            "Exported {} frames to {}",
            export.frames.len(),
            path.as_ref().display()
        );
        Ok(result)
    }

    fn execute(
        &self,
        scenario: ScenarioId,
        export: Option<LayoutExport>,
    ) -> (ScenarioResult, Option<LayoutExport>) {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);

        let mut recorder = Recorder {
            bounds: Canvas::default().bounds(self.params.canvas_margin),
            max_speed: 0.0,
            out_of_bounds: 0,
            export,
        };

        let outcome = match scenario {
            ScenarioId::Repel => self.run_repel(&mut recorder),
            ScenarioId::GroupPull => self.run_group_pull(&mut recorder),
            ScenarioId::ConflictSpread => self.run_conflict_spread(&mut recorder),
            ScenarioId::CrowdedRoom => self.run_crowded_room(&mut recorder),
            ScenarioId::Stacked => self.run_stacked(&mut recorder),
        };

        let result = match outcome {
            Ok(outcome) => self.finish(scenario, &recorder, outcome),
            Err(e) => {
                warn!("Scenario {} aborted: {}", scenario.name(), e);
                ScenarioResult {
                    scenario,
                    seed: self.seed,
                    passed: false,
                    iterations: self.params.iterations,
                    entity_count: 0,
                    failure_reason: Some(e.to_string()),
                    metrics: ScenarioMetrics::default(),
                }
            }
        };

        (result, recorder.export)
    }

    fn finish(&self, scenario: ScenarioId, recorder: &Recorder, outcome: Outcome) -> ScenarioResult {
        let summary = LayoutMetrics::measure(&outcome.entities, &outcome.layout);
        let metrics = ScenarioMetrics {
            max_speed: recorder.max_speed,
            out_of_bounds: recorder.out_of_bounds,
            moved: plan_moves(&outcome.entities, &outcome.layout).len(),
            min_pair_distance: summary.min_pair_distance,
            mean_group_distance: summary.mean_group_distance,
        };

        // Invariants checked for every scenario on top of its own assertion.
        let speed_limit = self.params.velocity_cap * (1.0 + 1e-5);
        let failure = outcome
            .failure
            .or_else(|| {
                (metrics.out_of_bounds > 0)
                    .then(|| format!("{} positions left the canvas", metrics.out_of_bounds))
            })
            .or_else(|| {
                (metrics.max_speed > speed_limit).then(|| {
                    format!(
                        "speed {:.3} exceeds cap {:.1}",
                        metrics.max_speed, self.params.velocity_cap
                    )
                })
            });

        ScenarioResult {
            scenario,
            seed: self.seed,
            passed: failure.is_none(),
            iterations: self.params.iterations,
            entity_count: summary.entity_count,
            failure_reason: failure,
            metrics,
        }
    }

    fn optimizer(&self) -> Result<LayoutOptimizer, SimError> {
        Ok(LayoutOptimizer::new(self.params.clone(), Canvas::default())?)
    }

    fn observed(
        &self,
        recorder: &mut Recorder,
        entities: &[Entity],
        events: &[HistoricalEvent],
    ) -> Result<LayoutMap, SimError> {
        Ok(self
            .optimizer()?
            .optimize_observed(entities, events, |frame| recorder.observe(frame))?)
    }

    /// LAY-001: Repel - two students 14 units apart.
    ///
    /// **Assertion**: final distance > 10.
    fn run_repel(&self, recorder: &mut Recorder) -> Result<Outcome, SimError> {
        info!("LAY-001: Repel - close strangers");

        let entities = vec![Entity::new(1, 0.0, 0.0), Entity::new(2, 10.0, 10.0)];
        let layout = self.observed(recorder, &entities, &[])?;

        let distance = pair_distance(&layout, 1, 2).unwrap_or(0.0);
        info!("✓ Repel complete: distance {:.1}", distance);

        Ok(Outcome {
            failure: (distance <= 10.0)
                .then(|| format!("distance {:.2} did not grow past 10", distance)),
            entities,
            layout,
        })
    }

    /// LAY-002: GroupPull - group mates in opposite corners.
    ///
    /// **Assertion**: final distance below the initial ≈5515.
    fn run_group_pull(&self, recorder: &mut Recorder) -> Result<Outcome, SimError> {
        info!("LAY-002: GroupPull - distant group mates");

        let entities = vec![
            Entity::new(1, 0.0, 0.0).in_group(GroupId(1)),
            Entity::new(2, 3900.0, 3900.0).in_group(GroupId(1)),
        ];
        let initial = (entities[0].position() - entities[1].position()).norm();
        let layout = self.observed(recorder, &entities, &[])?;

        let distance = pair_distance(&layout, 1, 2).unwrap_or(f32::INFINITY);
        info!("✓ GroupPull complete: {:.1} -> {:.1}", initial, distance);

        Ok(Outcome {
            failure: (distance >= initial).then(|| {
                format!("distance {:.1} not below initial {:.1}", distance, initial)
            }),
            entities,
            layout,
        })
    }

    /// LAY-003: ConflictSpread - same pair with and without negative history.
    ///
    /// **Assertion**: the run with 5 negative events ends further apart.
    fn run_conflict_spread(&self, recorder: &mut Recorder) -> Result<Outcome, SimError> {
        info!("LAY-003: ConflictSpread - negative history");

        let entities = vec![Entity::new(1, 500.0, 500.0), Entity::new(2, 600.0, 500.0)];
        let events: Vec<HistoricalEvent> = (0..5)
            .map(|n| HistoricalEvent::new(1, "Negative Participation", n))
            .collect();

        let baseline = self.optimizer()?.optimize(&entities, &[])?;
        let layout = self.observed(recorder, &entities, &events)?;

        let calm = pair_distance(&baseline, 1, 2).unwrap_or(0.0);
        let tense = pair_distance(&layout, 1, 2).unwrap_or(0.0);
        info!("✓ ConflictSpread complete: baseline {:.1}, conflict {:.1}", calm, tense);

        Ok(Outcome {
            failure: (tense <= calm).then(|| {
                format!("conflict distance {:.1} not above baseline {:.1}", tense, calm)
            }),
            entities,
            layout,
        })
    }

    /// LAY-004: CrowdedRoom - seeded random classroom.
    ///
    /// **Assertion**: a second run over the same input is identical; the
    /// shared bounds and speed checks cover the rest.
    fn run_crowded_room(&self, recorder: &mut Recorder) -> Result<Outcome, SimError> {
        info!("LAY-004: CrowdedRoom - {} students", self.students);

        let (entities, events) = RosterGenerator::new(self.seed).generate(self.students);
        debug!("  generated {} students, {} events", entities.len(), events.len());

        let layout = self.observed(recorder, &entities, &events)?;
        let replay = self.optimizer()?.optimize(&entities, &events)?;

        let spacing = min_pairwise_distance(&layout);
        info!("✓ CrowdedRoom complete: closest pair {:?}", spacing);

        Ok(Outcome {
            failure: (replay != layout).then(|| "replay produced a different layout".to_string()),
            entities,
            layout,
        })
    }

    /// LAY-005: Stacked - five students on one seat.
    ///
    /// **Assertion**: every pair ends more than one unit apart.
    fn run_stacked(&self, recorder: &mut Recorder) -> Result<Outcome, SimError> {
        info!("LAY-005: Stacked - coincident seats");

        let entities: Vec<Entity> = (1..=5).map(|id| Entity::new(id, 2000.0, 2000.0)).collect();
        let layout = self.observed(recorder, &entities, &[])?;

        let spacing = min_pairwise_distance(&layout).unwrap_or(0.0);
        info!("✓ Stacked complete: closest pair {:.1}", spacing);

        Ok(Outcome {
            failure: (spacing <= 1.0)
                .then(|| format!("closest pair only {:.2} apart", spacing)),
            entities,
            layout,
        })
    }
}
