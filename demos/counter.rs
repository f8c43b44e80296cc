//! Counter
//!
//! This example walks a counter through recorded and unrecorded updates.
//!
//! Key concepts:
//! - Mutations of a draft are recorded and can be undone
//! - Replacement values commit without touching history
//! - A new recorded mutation after an undo discards the redo stack
//!
//! Run with: RUST_LOG=rewind=debug cargo run --example counter

use rewind::builder::HistoryBuilder;
use rewind::JsonHistory;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Counter {
    count: i64,
}

fn report(label: &str, history: &JsonHistory<Counter>) {
    println!(
        "  {:<28} count = {:>3}   undo: {}   redo: {}",
        label,
        history.state().count,
        history.undo_len(),
        history.redo_len()
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Counter Example ===\n");

    let mut history = HistoryBuilder::new()
        .initial(Counter::default())
        .max_depth(100)
        .build()
        .unwrap();

    history.subscribe(|previous, next| {
        if previous.state() != next.state() {
            println!(
                "  [listener] {} -> {}",
                previous.state().count,
                next.state().count
            );
        }
    });

    println!("Scenario 1: Recorded increments");
    history.mutate(|c| c.count += 1).unwrap();
    history.mutate(|c| c.count += 1).unwrap();
    report("after two increments", &history);
    history.undo().unwrap();
    report("after undo", &history);
    history.redo().unwrap();
    report("after redo", &history);

    println!("\nScenario 2: Increment without history");
    history.replace_with(|c| Counter { count: c.count + 1 });
    report("after silent increment", &history);
    history.undo().unwrap();
    report("after undo", &history);

    println!("\nScenario 3: Reset without history");
    history.set(Counter::default());
    report("after reset", &history);
    history.undo().unwrap();
    report("after undo", &history);

    println!("\nScenario 4: Branching discards redo");
    history.mutate(|c| c.count -= 5).unwrap();
    report("after decrement by five", &history);
    let redone = history.redo().unwrap();
    println!("  redo applied: {}", redone);

    println!("\nScenario 5: Draining history");
    while history.undo().unwrap() {}
    report("after undoing everything", &history);
    history.clear_history();
    report("after clearing history", &history);

    println!("\n=== Example Complete ===");
}
