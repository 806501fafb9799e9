//! Example 01: Basic List Operations
//!
//! This example walks through the four list operations - append, toggle,
//! remove, and reorder - against a file-backed store.
//!
//! Run with: cargo run --example 01_basic_list

use eyre::Result;
use taskpad::{FileBackend, TaskList};

fn main() -> Result<()> {
    // Create a temporary directory for this example
    let temp_dir = tempfile::tempdir()?;

    println!("Taskpad Basic List Example");
    println!("==========================\n");
    println!("Store path: {}\n", temp_dir.path().display());

    let mut list = TaskList::new(FileBackend::open(temp_dir.path())?);
    list.hydrate();

    // Append a few tasks
    let milk = list.append("Buy milk").expect("non-empty text");
    let dog = list.append("Walk dog").expect("non-empty text");
    list.append("Water plants");
    println!("After three appends:");
    print_tasks(&list);

    // Whitespace-only input is rejected
    assert!(list.append("   ").is_none());

    // Complete one
    list.toggle(&milk);
    println!("\nAfter toggling 'Buy milk':");
    print_tasks(&list);

    // Drag-and-drop style reorder: the dog takes the milk's slot
    list.reorder(&dog, &milk);
    println!("\nAfter moving 'Walk dog' onto 'Buy milk':");
    print_tasks(&list);

    // And remove it
    list.remove(&dog);
    println!("\nAfter removing 'Walk dog':");
    print_tasks(&list);

    Ok(())
}

fn print_tasks(list: &TaskList<FileBackend>) {
    for task in list.tasks() {
        let marker = if task.completed { "x" } else { " " };
        println!("  [{}] {}", marker, task.text);
    }
    println!("  ({} of {} remaining)", list.remaining(), list.total());
}
