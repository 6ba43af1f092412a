//! Snapshot intake: the roster of entities and their behaviour history.
//!
//! The host application owns students and events. The optimizer only reads
//! `id`, position and group from each [`Entity`] and builds a dense, indexed
//! [`Roster`] for the duration of one call.

use crate::error::{LayoutError, Result};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Unique identifier of an entity within one roster.
pub type EntityId = i64;

/// Group membership tag. Entities sharing a tag attract each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group-{}", self.0)
    }
}

/// A student placed on the seating canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique entity ID
    pub id: EntityId,

    /// Horizontal position in logical canvas units
    pub x: f32,

    /// Vertical position in logical canvas units
    pub y: f32,

    /// Optional group tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupId>,
}

impl Entity {
    /// Creates an ungrouped entity at the given position.
    pub fn new(id: EntityId, x: f32, y: f32) -> Self {
        Self { id, x, y, group: None }
    }

    /// Sets the group tag.
    pub fn in_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    /// Returns the position as a vector.
    pub fn position(&self) -> Vector2<f32> {
        Vector2::new(self.x, self.y)
    }
}

/// A logged behaviour event for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalEvent {
    /// Entity this event refers to (may be absent from the roster)
    pub entity_id: EntityId,

    /// Free-form category, e.g. "Negative Participation"
    pub category: String,

    /// Unix milliseconds. Carried for collaborators, ignored by the optimizer.
    #[serde(default)]
    pub timestamp: i64,
}

impl HistoricalEvent {
    /// Creates a new event.
    pub fn new(entity_id: EntityId, category: impl Into<String>, timestamp: i64) -> Self {
        Self {
            entity_id,
            category: category.into(),
            timestamp,
        }
    }
}

/// Dense per-call view of the input entities.
///
/// Index `i` in every vector refers to the same entity; `index` maps ids
/// back to those slots. Built once per call and never resized.
#[derive(Debug, Clone)]
pub struct Roster {
    ids: Vec<EntityId>,
    positions: Vec<Vector2<f32>>,
    index: HashMap<EntityId, usize>,
    /// Member indices per group, groups in order of first appearance
    groups: Vec<Vec<usize>>,
}

impl Roster {
    /// Builds the roster, rejecting duplicate ids and non-finite coordinates.
    pub fn from_entities(entities: &[Entity]) -> Result<Self> {
        let mut ids = Vec::with_capacity(entities.len());
        let mut positions = Vec::with_capacity(entities.len());
        let mut index = HashMap::with_capacity(entities.len());
        let mut group_slots: HashMap<GroupId, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();

        for (slot, entity) in entities.iter().enumerate() {
            if !entity.x.is_finite() || !entity.y.is_finite() {
                return Err(LayoutError::NonFinitePosition { id: entity.id });
            }
            if index.insert(entity.id, slot).is_some() {
                return Err(LayoutError::DuplicateEntity(entity.id));
            }

            ids.push(entity.id);
            positions.push(entity.position());

            if let Some(group) = entity.group {
                let group_slot = *group_slots.entry(group).or_insert_with(|| {
                    groups.push(Vec::new());
                    groups.len() - 1
                });
                groups[group_slot].push(slot);
            }
        }

        Ok(Self {
            ids,
            positions,
            index,
            groups,
        })
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the roster has no entities.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Entity ids in input order.
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    /// Initial positions in input order.
    pub fn positions(&self) -> &[Vector2<f32>] {
        &self.positions
    }

    /// Slot of an entity id.
    pub fn slot(&self, id: EntityId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Member slots of every group with at least one member.
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }
}
