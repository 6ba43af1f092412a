//! Classroom Demo
//! ==============
//!
//! Lays out a small class:
//! - Two students stacked on the same desk
//! - A study group split across the room
//! - One student with a history of negative behaviour next to a classmate
//!
//! Run:
//! ```bash
//! cargo run -p seatplan_core --example classroom_demo
//! ```

use seatplan_core::{plan_moves, Entity, GroupId, HistoricalEvent, LayoutMetrics, LayoutOptimizer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🪑 Classroom Layout Demo");
    println!("========================\n");

    let students = vec![
        Entity::new(1, 800.0, 800.0),
        Entity::new(2, 800.0, 800.0),
        Entity::new(3, 300.0, 3000.0).in_group(GroupId(7)),
        Entity::new(4, 3500.0, 400.0).in_group(GroupId(7)),
        Entity::new(5, 2000.0, 2000.0),
        Entity::new(6, 2060.0, 2000.0),
    ];
    let events = vec![
        HistoricalEvent::new(5, "Negative Participation", 0),
        HistoricalEvent::new(5, "Negative Attitude", 1),
        HistoricalEvent::new(6, "Positive Participation", 2),
    ];

    let optimizer = LayoutOptimizer::default();
    let layout = optimizer.optimize_observed(&students, &events, |frame| {
        if frame.iteration() % 10 == 0 {
            println!(
                "  iteration {:>2} | max speed {:>6.2}",
                frame.iteration(),
                frame.max_speed()
            );
        }
    })?;

    println!("\nMoves:");
    for m in plan_moves(&students, &layout) {
        println!(
            "  #{:<2} ({:>7.1}, {:>7.1}) -> ({:>7.1}, {:>7.1})  {:>6.1} units",
            m.id,
            m.old_x,
            m.old_y,
            m.new_x,
            m.new_y,
            m.distance()
        );
    }

    let metrics = LayoutMetrics::measure(&students, &layout);
    println!("\nClosest pair:        {:?}", metrics.min_pair_distance);
    println!("Mean group distance: {:?}", metrics.mean_group_distance);

    Ok(())
}
