//! Conflict score precomputation.
//!
//! Reduces the behaviour log to a per-entity count of negative events. The
//! whole history counts: there is no recency window and no decay, so a
//! conflict-prone student stays that way for the layout.

use crate::roster::{EntityId, HistoricalEvent, Roster};
use std::collections::HashMap;

/// Marker matched case-insensitively against event categories.
pub const NEGATIVE_MARKER: &str = "negative";

/// Returns true if the category names a negative behaviour.
pub fn is_negative(category: &str) -> bool {
    category.to_lowercase().contains(NEGATIVE_MARKER)
}

/// Per-entity count of negative events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictScoreTable {
    counts: HashMap<EntityId, u32>,
}

impl ConflictScoreTable {
    /// Counts negative events per entity id.
    ///
    /// Ids that are not in the current roster are counted too; they are
    /// never looked up, so they have no effect on the layout.
    pub fn from_events(events: &[HistoricalEvent]) -> Self {
        let mut counts: HashMap<EntityId, u32> = HashMap::new();
        for event in events.iter().filter(|e| is_negative(&e.category)) {
            *counts.entry(event.entity_id).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Negative event count for an entity, zero when unknown.
    pub fn count(&self, id: EntityId) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Score used by the force model.
    pub fn score(&self, id: EntityId) -> f32 {
        self.count(id) as f32
    }

    /// Number of entities with at least one negative event.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if no negative event was found.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Scores laid out in roster slot order.
    pub fn dense_scores(&self, roster: &Roster) -> Vec<f32> {
        roster.ids().iter().map(|&id| self.score(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Entity;

    fn event(id: EntityId, category: &str) -> HistoricalEvent {
        HistoricalEvent::new(id, category, 1_702_934_400_000)
    }

    #[test]
    fn test_negative_match_is_case_insensitive_substring() {
        assert!(is_negative("Negative Participation"));
        assert!(is_negative("NEGATIVE"));
        assert!(is_negative("non-negative-ish"));
        assert!(!is_negative("Talking"));
        assert!(!is_negative("Out of Seat"));
        assert!(!is_negative(""));
    }

    #[test]
    fn test_counts_only_negative_events() {
        let events = vec![
            event(1, "Negative Participation"),
            event(1, "negative attitude"),
            event(1, "Positive Participation"),
            event(2, "Talking"),
            event(3, "Negative"),
        ];

        let table = ConflictScoreTable::from_events(&events);

        assert_eq!(table.count(1), 2);
        assert_eq!(table.count(2), 0);
        assert_eq!(table.count(3), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_unknown_ids_default_to_zero() {
        let table = ConflictScoreTable::from_events(&[]);
        assert!(table.is_empty());
        assert_eq!(table.score(42), 0.0);
    }

    #[test]
    fn test_dense_scores_ignore_ids_outside_roster() {
        let events = vec![event(2, "Negative"), event(99, "Negative"), event(99, "Negative")];
        let table = ConflictScoreTable::from_events(&events);
        let roster =
            Roster::from_entities(&[Entity::new(1, 0.0, 0.0), Entity::new(2, 5.0, 5.0)]).unwrap();

        assert_eq!(table.dense_scores(&roster), vec![0.0, 1.0]);
        assert_eq!(table.count(99), 2);
    }
}
