use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use eyre::Result;
use std::path::{Path, PathBuf};
use taskpad::{FileBackend, Task, TaskList, Theme, ThemePreference};

#[derive(Parser)]
#[command(name = "taskpad")]
#[command(about = "Taskpad CLI - persisted task list with light/dark theme")]
#[command(version)]
struct Cli {
    /// Path to the storage directory (default: per-user data directory)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task to the end of the list
    Add {
        /// Task text; surrounding whitespace is trimmed
        text: String,
    },

    /// Show the list
    List,

    /// Flip a task between open and completed
    Toggle {
        /// Task id (a unique prefix is enough)
        id: String,
    },

    /// Delete a task
    Remove {
        /// Task id (a unique prefix is enough)
        id: String,
    },

    /// Move a task into another task's position
    Move {
        /// Id of the task to move
        source_id: String,
        /// Id of the task whose position it should take
        target_id: String,
    },

    /// Show or change the color theme
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeMode>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeMode {
    Light,
    Dark,
    Toggle,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let store_path = cli.store_path.unwrap_or_else(default_store_path);

    match cli.command {
        Commands::Add { text } => {
            let mut list = open_list(&store_path)?;
            match list.append(&text) {
                Some(id) => println!("Added {}", short(&id).cyan()),
                None => println!("Nothing to add: text is empty"),
            }
        }
        Commands::List => {
            let list = open_list(&store_path)?;
            print_list(&list);
        }
        Commands::Toggle { id } => {
            let mut list = open_list(&store_path)?;
            if let Some(id) = resolve_id(&list, &id) {
                list.toggle(&id);
                print_list(&list);
            }
        }
        Commands::Remove { id } => {
            let mut list = open_list(&store_path)?;
            if let Some(id) = resolve_id(&list, &id) {
                list.remove(&id);
                print_list(&list);
            }
        }
        Commands::Move {
            source_id,
            target_id,
        } => {
            let mut list = open_list(&store_path)?;
            let source = resolve_id(&list, &source_id);
            let target = resolve_id(&list, &target_id);
            if let (Some(source), Some(target)) = (source, target) {
                list.reorder(&source, &target);
                print_list(&list);
            }
        }
        Commands::Theme { mode } => {
            let mut prefs = ThemePreference::new(FileBackend::open(&store_path)?);
            prefs.hydrate();
            match mode {
                Some(ThemeMode::Light) => prefs.set(Theme::Light),
                Some(ThemeMode::Dark) => prefs.set(Theme::Dark),
                Some(ThemeMode::Toggle) => prefs.toggle(),
                None => {}
            }
            println!(
                "Theme: {}",
                if prefs.is_dark() { "dark" } else { "light" }
            );
        }
    }

    Ok(())
}

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("taskpad"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// The CLI is the client execution context, so hydrate right after opening.
fn open_list(store_path: &Path) -> Result<TaskList<FileBackend>> {
    let mut list = TaskList::new(FileBackend::open(store_path)?);
    list.hydrate();
    Ok(list)
}

/// Resolve a full id or unique id prefix against the current list.
fn resolve_id(list: &TaskList<FileBackend>, prefix: &str) -> Option<String> {
    let matches: Vec<&Task> = list
        .tasks()
        .iter()
        .filter(|task| task.id.starts_with(prefix))
        .collect();

    match matches.as_slice() {
        [task] => Some(task.id.clone()),
        [] => {
            println!("No task matches id {}", prefix);
            None
        }
        _ => {
            println!("Ambiguous id {}: matches {} tasks", prefix, matches.len());
            None
        }
    }
}

fn print_list(list: &TaskList<FileBackend>) {
    if list.total() == 0 {
        println!("No tasks yet");
        return;
    }

    for task in list.tasks() {
        let marker = if task.completed {
            "[x]".green()
        } else {
            "[ ]".normal()
        };
        let text = if task.completed {
            task.text.strikethrough().dimmed()
        } else {
            task.text.normal()
        };
        println!(
            "{} {} {} {}",
            short(&task.id).cyan(),
            marker,
            text,
            format_ts(task.created_at).dimmed()
        );
    }

    println!("{} of {} remaining", list.remaining(), list.total());
}

fn short(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn format_ts(ms: i64) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}
