//! Todo List
//!
//! This example edits a todo list from several threads and from untagged
//! producers, then rewinds the edits.
//!
//! Key concepts:
//! - Untagged producers classified as mutation or replacement
//! - Partial updates merged into the top-level fields
//! - A shared writer serializing concurrent edits
//! - The recorded patches behind each history entry
//!
//! Run with: RUST_LOG=rewind=debug cargo run --example todo_list

use rewind::builder::HistoryBuilder;
use rewind::core::SetAction;
use rewind::sync::SharedWriter;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::thread;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Todo {
    title: String,
    done: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct TodoList {
    items: Vec<Todo>,
    filter: String,
}

fn print_list(list: &TodoList) {
    for (i, todo) in list.items.iter().enumerate() {
        let mark = if todo.done { "x" } else { " " };
        println!("    {}. [{}] {}", i + 1, mark, todo.title);
    }
    println!("    filter: {:?}", list.filter);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Todo List Example ===\n");

    let mut history = HistoryBuilder::new()
        .initial(TodoList::default())
        .build()
        .unwrap();

    println!("Step 1: Producers");
    let add_milk = SetAction::producer(|list: &mut TodoList| {
        list.items.push(Todo {
            title: "buy milk".to_string(),
            done: false,
        });
        None
    });
    println!("  add_milk classified as {:?}", add_milk.kind());
    history.write(add_milk, false).unwrap();

    let add_bread = SetAction::producer(|list: &mut TodoList| {
        list.items.push(Todo {
            title: "bake bread".to_string(),
            done: false,
        });
        None
    });
    history.write(add_bread, false).unwrap();

    let archive = SetAction::producer(|list: &mut TodoList| {
        Some(TodoList {
            items: list.items.iter().filter(|t| !t.done).cloned().collect(),
            filter: list.filter.clone(),
        })
    });
    println!("  archive classified as {:?}", archive.kind());
    history.write(archive, false).unwrap();
    print_list(history.state());

    println!("\nStep 2: Partial update");
    history.merge(json!({ "filter": "open" })).unwrap();
    print_list(history.state());
    println!("  undo entries: {}", history.undo_len());

    for entry in history.snapshot().undo_history() {
        println!(
            "  entry {} at {}: {}",
            entry.id(),
            entry.recorded_at().format("%H:%M:%S%.3f"),
            serde_json::to_string(entry.forward()).unwrap()
        );
    }

    println!("\nStep 3: Concurrent edits");
    let shared = SharedWriter::new(history);
    let handles: Vec<_> = ["water plants", "call home", "file taxes"]
        .into_iter()
        .map(|title| {
            let shared = shared.clone();
            thread::spawn(move || {
                shared
                    .mutate(move |list| {
                        list.items.push(Todo {
                            title: title.to_string(),
                            done: false,
                        })
                    })
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    shared.mutate(|list| list.items[0].done = true).unwrap();
    print_list(&shared.state());

    println!("\nStep 4: Rewind");
    let mut undone = 0;
    while shared.undo().unwrap() {
        undone += 1;
    }
    println!("  undid {} edits", undone);
    print_list(&shared.state());
    println!("  can redo: {}", shared.can_redo());

    println!("\n=== Example Complete ===");
}
