//! Seeded roster generator.
//!
//! Produces reproducible classrooms for stress scenarios:
//! - Random seat positions across the usable canvas
//! - Random group membership
//! - A behaviour log mixing negative and neutral categories

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use seatplan_core::{Canvas, Entity, GroupId, HistoricalEvent, LayoutParams};

/// Categories drawn for generated behaviour events.
const CATEGORIES: &[&str] = &[
    "Negative Participation",
    "negative attitude",
    "Talking",
    "Out of Seat",
    "Positive Participation",
];

/// Epoch of generated events (2024-01-01 00:00:00 UTC, milliseconds)
const EPOCH_MS: i64 = 1_704_067_200_000;

/// Generates rosters and behaviour logs from a single seed.
pub struct RosterGenerator {
    /// RNG for positions, groups and events
    rng: ChaCha8Rng,

    /// Canvas seats are spread over
    canvas: Canvas,

    /// Number of distinct groups (0 = nobody grouped)
    group_count: i64,

    /// Probability that a student belongs to a group
    grouped_ratio: f64,

    /// Average number of logged events per student
    events_per_student: u32,
}

impl RosterGenerator {
    /// Creates a generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            canvas: Canvas::default(),
            group_count: 4,
            grouped_ratio: 0.6,
            events_per_student: 2,
        }
    }

    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn with_groups(mut self, group_count: i64, grouped_ratio: f64) -> Self {
        self.group_count = group_count;
        self.grouped_ratio = grouped_ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_events_per_student(mut self, events: u32) -> Self {
        self.events_per_student = events;
        self
    }

    /// Generates `count` students with ids `1..=count` plus their behaviour log.
    pub fn generate(&mut self, count: usize) -> (Vec<Entity>, Vec<HistoricalEvent>) {
        let bounds = self.canvas.bounds(LayoutParams::default().canvas_margin);
        let mut entities = Vec::with_capacity(count);
        let mut events = Vec::new();

        for i in 0..count {
            let id = i as i64 + 1;
            let x = self.rng.gen_range(0.0..=bounds.max.x);
            let y = self.rng.gen_range(0.0..=bounds.max.y);
            let mut entity = Entity::new(id, x, y);

            if self.group_count > 0 && self.rng.gen_bool(self.grouped_ratio) {
                entity.group = Some(GroupId(self.rng.gen_range(0..self.group_count)));
            }
            entities.push(entity);

            let logged = self.rng.gen_range(0..=self.events_per_student * 2);
            for n in 0..logged {
                let category = CATEGORIES.choose(&mut self.rng).copied().unwrap_or("Talking");
                let timestamp = EPOCH_MS + i64::from(n) * 60_000;
                events.push(HistoricalEvent::new(id, category, timestamp));
            }
        }

        (entities, events)
    }
}
