//! Layout quality metrics.
//!
//! Used to judge a finished layout:
//! - **Pair distance**: separation of two specific students
//! - **Minimum spacing**: closest pair anywhere on the canvas
//! - **Group cohesion**: mean distance between members of the same group

use crate::optimizer::LayoutMap;
use crate::roster::{Entity, EntityId, GroupId};
use std::collections::BTreeMap;

/// Summary of a layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutMetrics {
    /// Number of placed entities
    pub entity_count: usize,
    /// Smallest distance between any two entities (None with fewer than two)
    pub min_pair_distance: Option<f32>,
    /// Mean distance over intra-group pairs (None without grouped pairs)
    pub mean_group_distance: Option<f32>,
}

impl LayoutMetrics {
    /// Computes every metric for `layout`.
    pub fn measure(entities: &[Entity], layout: &LayoutMap) -> Self {
        Self {
            entity_count: layout.len(),
            min_pair_distance: min_pairwise_distance(layout),
            mean_group_distance: mean_group_distance(entities, layout),
        }
    }
}

/// Distance between two placed entities.
pub fn pair_distance(layout: &LayoutMap, a: EntityId, b: EntityId) -> Option<f32> {
    let (pa, pb) = (layout.get(&a)?, layout.get(&b)?);
    Some((pa - pb).norm())
}

/// Smallest distance between any two placed entities.
pub fn min_pairwise_distance(layout: &LayoutMap) -> Option<f32> {
    let points: Vec<_> = layout.values().collect();
    let mut best: Option<f32> = None;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let d = (*a - *b).norm();
            best = Some(best.map_or(d, |current| current.min(d)));
        }
    }
    best
}

/// Mean distance between members of the same group.
pub fn mean_group_distance(entities: &[Entity], layout: &LayoutMap) -> Option<f32> {
    let mut groups: BTreeMap<GroupId, Vec<EntityId>> = BTreeMap::new();
    for entity in entities {
        if let Some(group) = entity.group {
            groups.entry(group).or_default().push(entity.id);
        }
    }

    let mut total = 0.0;
    let mut pairs = 0usize;
    for members in groups.values() {
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                if let Some(d) = pair_distance(layout, a, b) {
                    total += d;
                    pairs += 1;
                }
            }
        }
    }

    (pairs > 0).then(|| total / pairs as f32)
}
