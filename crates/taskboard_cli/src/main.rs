//! Terminal front end for the task board.
//!
//! # Responsibility
//! - Parse one user gesture per invocation and route it through a
//!   `BoardSession`.
//! - Print the resulting board state or a short status line.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use taskboard_core::db::open_db;
use taskboard_core::{
    default_log_level, init_logging, render_board, render_card, BoardSession, CardAction,
    CardDetail, DragEndEvent, DragLocation, DropOutcome, Priority, SqliteKvRepository,
    SubmitOutcome, TaskStatus, TaskStore, DEFAULT_STORAGE_KEY,
};

#[derive(Parser, Debug)]
#[command(name = "taskboard", version, about = "Kanban task board")]
struct Cli {
    /// SQLite file holding board state.
    #[arg(long, default_value = "taskboard.sqlite3")]
    db: PathBuf,
    /// Key under which the task array is stored.
    #[arg(long, default_value = DEFAULT_STORAGE_KEY)]
    storage_key: String,
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the three status columns.
    Board {
        #[arg(long)]
        expanded: bool,
    },
    /// Print tasks in storage order.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print one task card with its full description.
    Show { id: String },
    /// Create a task.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        #[arg(long, default_value = "todo")]
        status: TaskStatus,
    },
    /// Edit fields of an existing task.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Delete a task.
    Delete { id: String },
    /// Drag a task to a column; omit `--to` to drop it outside the board.
    Drag {
        id: String,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        index: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open board database `{}`", cli.db.display()))?;
    let store = TaskStore::load_with_key(SqliteKvRepository::new(&conn), cli.storage_key.as_str())?;
    info!(
        "event=cli_start module=cli status=ok source={:?} task_count={}",
        store.load_source(),
        store.len()
    );
    let mut session = BoardSession::new(store);

    run(&mut session, cli.command)
}

fn run(session: &mut BoardSession<SqliteKvRepository<'_>>, command: Command) -> Result<()> {
    match command {
        Command::Board { expanded } => {
            let detail = if expanded {
                CardDetail::Expanded
            } else {
                CardDetail::Collapsed
            };
            print!("{}", render_board(&session.board(), detail));
        }
        Command::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(session.tasks())?);
            } else {
                for task in session.tasks() {
                    println!(
                        "{}\t{}\t{}\t{}",
                        task.id, task.status, task.priority, task.title
                    );
                }
            }
        }
        Command::Show { id } => {
            let Some(task) = session.store().get(&id) else {
                bail!("task not found: {id}");
            };
            print!("{}", render_card(task, CardDetail::Expanded));
        }
        Command::Add {
            title,
            description,
            priority,
            status,
        } => {
            let form = session.open_create_form();
            form.set_title(title);
            form.set_description(description);
            form.set_priority(priority);
            form.set_status(status);
            if let SubmitOutcome::Created(task) = session.submit_form()? {
                println!("created task id={}", task.id);
            }
        }
        Command::Edit {
            id,
            title,
            description,
            priority,
            status,
        } => {
            if !session.apply(CardAction::Edit(id.clone()))? {
                bail!("task not found: {id}");
            }
            let Some(form) = session.form_mut() else {
                bail!("task form did not open for {id}");
            };
            if let Some(title) = title {
                form.set_title(title);
            }
            if let Some(description) = description {
                form.set_description(description);
            }
            if let Some(priority) = priority {
                form.set_priority(priority);
            }
            if let Some(status) = status {
                form.set_status(status);
            }
            match session.submit_form()? {
                SubmitOutcome::Updated { applied: true } => println!("updated task id={id}"),
                _ => println!("no change: task {id} not found"),
            }
        }
        Command::Delete { id } => {
            if session.apply(CardAction::Delete(id.clone()))? {
                println!("deleted task id={id}");
            } else {
                println!("no change: task {id} not found");
            }
        }
        Command::Drag { id, to, index } => {
            let event = drag_event(session, id, to, index);
            match session.drag_end(&event)? {
                DropOutcome::Moved { task_id, from, to } => {
                    println!("moved task id={task_id} from={from} to={to}");
                }
                DropOutcome::Ignored(reason) => println!("ignored drop: {reason:?}"),
            }
        }
    }
    Ok(())
}

/// Builds the drag-end event a pointer gesture would produce.
///
/// The source is the task's current slot; the destination index defaults
/// to the end of the target column.
fn drag_event(
    session: &BoardSession<SqliteKvRepository<'_>>,
    id: String,
    to: Option<String>,
    index: Option<usize>,
) -> DragEndEvent {
    let board = session.board();
    let source = board
        .locate(&id)
        .unwrap_or_else(|| DragLocation::new(String::new(), 0));
    let destination = to.map(|column| {
        let index = index.unwrap_or_else(|| {
            TaskStatus::from_column_id(&column)
                .map(|status| board.column(status).count())
                .unwrap_or_default()
        });
        DragLocation::new(column, index)
    });
    DragEndEvent {
        draggable_id: id,
        source,
        destination,
    }
}
