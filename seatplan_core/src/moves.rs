//! Turns an optimized layout into the list of seats that actually moved.
//!
//! The host applies the result as one batch so a whole rearrangement can be
//! undone in a single step.

use crate::optimizer::LayoutMap;
use crate::roster::{Entity, EntityId};
use serde::{Deserialize, Serialize};

/// Old and new position of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMove {
    pub id: EntityId,
    pub old_x: f32,
    pub old_y: f32,
    pub new_x: f32,
    pub new_y: f32,
}

impl EntityMove {
    /// Euclidean length of the move.
    pub fn distance(&self) -> f32 {
        (self.new_x - self.old_x).hypot(self.new_y - self.old_y)
    }
}

/// Lists, in roster order, every entity whose position changed.
///
/// Entities missing from `layout` are skipped.
pub fn plan_moves(entities: &[Entity], layout: &LayoutMap) -> Vec<EntityMove> {
    entities
        .iter()
        .filter_map(|entity| {
            let new = layout.get(&entity.id)?;
            if new.x == entity.x && new.y == entity.y {
                return None;
            }
            Some(EntityMove {
                id: entity.id,
                old_x: entity.x,
                old_y: entity.y,
                new_x: new.x,
                new_y: new.y,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    #[test]
    fn test_only_changed_entities_are_planned() {
        let entities = vec![
            Entity::new(1, 10.0, 10.0),
            Entity::new(2, 20.0, 20.0),
            Entity::new(3, 30.0, 30.0),
        ];
        let mut layout = LayoutMap::new();
        layout.insert(1, Vector2::new(10.0, 10.0));
        layout.insert(2, Vector2::new(23.0, 24.0));

        let moves = plan_moves(&entities, &layout);

        assert_eq!(
            moves,
            vec![EntityMove {
                id: 2,
                old_x: 20.0,
                old_y: 20.0,
                new_x: 23.0,
                new_y: 24.0,
            }]
        );
        assert_eq!(moves[0].distance(), 5.0);
    }

    #[test]
    fn test_empty_layout_plans_nothing() {
        let entities = vec![Entity::new(1, 10.0, 10.0)];
        assert!(plan_moves(&entities, &LayoutMap::new()).is_empty());
    }
}
