//! Example 02: Hydration Sequencing
//!
//! This example shows the two-phase lifecycle of the persisted store: the
//! initial value is usable immediately, writes are suppressed until the store
//! is hydrated, and hydration adopts whatever a previous session persisted.
//!
//! Run with: cargo run --example 02_hydration

use eyre::Result;
use taskpad::{FileBackend, StorageBackend, TASKS_KEY, TaskList};

fn main() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;

    println!("Taskpad Hydration Example");
    println!("=========================\n");

    // A first session writes two tasks
    {
        let mut list = TaskList::new(FileBackend::open(temp_dir.path())?);
        list.hydrate();
        list.append("Buy milk");
        list.append("Walk dog");
        println!("Session 1 persisted {} tasks", list.total());
    }

    // A second session starts from the default...
    let mut list = TaskList::new(FileBackend::open(temp_dir.path())?);
    println!(
        "Session 2 before hydration: {} tasks (hydrated: {})",
        list.total(),
        list.is_hydrated()
    );

    // ...and a mutation at this point stays in memory only
    list.append("Ephemeral");
    let backend = FileBackend::open(temp_dir.path())?;
    let on_disk = backend.read(TASKS_KEY)?.unwrap_or_default();
    println!(
        "Pre-hydration append visible in memory ({} tasks), not on disk ({})",
        list.total(),
        if on_disk.contains("Ephemeral") {
            "leaked!"
        } else {
            "still session 1's blob"
        }
    );

    // Hydration adopts the persisted value
    list.hydrate();
    println!(
        "Session 2 after hydration: {} tasks (hydrated: {})",
        list.total(),
        list.is_hydrated()
    );
    for task in list.tasks() {
        println!("  - {}", task.text);
    }

    Ok(())
}
