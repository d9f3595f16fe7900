use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use sharehub_core::edit;
use sharehub_core::time::parse_calendar_date;
use sharehub_core::{
    Assignee, Frequency, Hub, Priority, Task, TimeHorizon, consistency_percent,
};
use sharehub_notify::HubStore;

use crate::context::AppContext;

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a task to the shared hub
    Add {
        title: String,
        /// low | medium | high | urgent
        #[arg(long)]
        priority: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// today | this-week | this-month | someday
        #[arg(long)]
        horizon: Option<String>,
        /// Participant name (default: Both)
        #[arg(long)]
        assign: Option<String>,
    },
    /// Mark a task done
    Done { id: String },
    /// Mark a done task pending again
    Reopen { id: String },
    /// Show open tasks
    Ls,
}

#[derive(Subcommand, Debug)]
pub enum ListCommand {
    /// Create a list
    Add {
        name: String,
        #[arg(long)]
        emoji: Option<String>,
        /// Item text (repeatable)
        #[arg(long = "item")]
        items: Vec<String>,
    },
    /// Toggle an item (0-based index)
    Check { id: String, index: usize },
    /// Archive a list
    Archive { id: String },
}

#[derive(Subcommand, Debug)]
pub enum HabitCommand {
    /// Start tracking a habit
    Add {
        name: String,
        /// daily | weekdays | weekends | weekly | custom
        #[arg(long, default_value = "daily")]
        frequency: String,
        /// Weekdays for custom habits, e.g. mon,wed,fri
        #[arg(long, value_delimiter = ',')]
        days: Vec<String>,
    },
    /// Toggle a check-in (default: today)
    Log {
        id: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Archive a habit
    Archive { id: String },
    /// Rolling 30-day consistency for each active habit
    Stats,
}

fn load_or_empty(ctx: &AppContext) -> Result<Hub> {
    Ok(ctx.store.load_hub()?.unwrap_or_default())
}

fn parse_day(raw: &str) -> Result<NaiveDate> {
    parse_calendar_date(raw).with_context(|| format!("invalid date '{raw}' (expected YYYY-MM-DD)"))
}

/// Load, apply one edit, save.
fn with_hub<T>(ctx: &AppContext, f: impl FnOnce(&mut Hub) -> Result<T, edit::EditError>) -> Result<T> {
    let mut hub = load_or_empty(ctx)?;
    let out = f(&mut hub)?;
    ctx.store.save_hub(&hub)?;
    Ok(out)
}

pub fn run_task(ctx: &AppContext, cmd: TaskCommand) -> Result<()> {
    match cmd {
        TaskCommand::Add {
            title,
            priority,
            due,
            horizon,
            assign,
        } => {
            if let Some(d) = &due {
                parse_day(d)?;
            }
            let mut task = Task::new("", title)
                .with_priority(Priority::from(priority))
                .with_horizon(TimeHorizon::from(horizon))
                .assigned(Assignee::from(assign));
            if let Some(d) = due {
                task = task.with_due(d);
            }
            let id = with_hub(ctx, |hub| edit::add_task(hub, task))?;
            println!("Added task {id}");
        }
        TaskCommand::Done { id } => {
            with_hub(ctx, |hub| edit::complete_task(hub, &id))?;
            println!("Completed {id}");
        }
        TaskCommand::Reopen { id } => {
            with_hub(ctx, |hub| edit::reopen_task(hub, &id))?;
            println!("Reopened {id}");
        }
        TaskCommand::Ls => {
            let hub = load_or_empty(ctx)?;
            for t in hub.tasks.iter().filter(|t| !t.is_done()) {
                println!(
                    "{} {} | {} | due {}",
                    t.priority.flag(),
                    t.id,
                    t.title,
                    t.due_text().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}

pub fn run_list(ctx: &AppContext, cmd: ListCommand) -> Result<()> {
    match cmd {
        ListCommand::Add { name, emoji, items } => {
            let id = with_hub(ctx, |hub| edit::add_list(hub, &name, emoji, items))?;
            println!("Added list {id}");
        }
        ListCommand::Check { id, index } => {
            let checked = with_hub(ctx, |hub| edit::toggle_list_item(hub, &id, index))?;
            println!("Item {index} {}", if checked { "checked" } else { "unchecked" });
        }
        ListCommand::Archive { id } => {
            with_hub(ctx, |hub| edit::archive_list(hub, &id))?;
            println!("Archived {id}");
        }
    }
    Ok(())
}

pub fn run_habit(ctx: &AppContext, cmd: HabitCommand) -> Result<()> {
    match cmd {
        HabitCommand::Add {
            name,
            frequency,
            days,
        } => {
            let today = ctx.today();
            let frequency = Frequency::from(Some(frequency));
            let id = with_hub(ctx, |hub| edit::add_habit(hub, &name, frequency, days, today))?;
            println!("Added habit {id}");
        }
        HabitCommand::Log { id, date } => {
            let day = match date {
                Some(d) => parse_day(&d)?,
                None => ctx.today(),
            };
            let checked = with_hub(ctx, |hub| edit::toggle_habit_day(hub, &id, day))?;
            println!("{} {}", day, if checked { "checked" } else { "unchecked" });
        }
        HabitCommand::Archive { id } => {
            with_hub(ctx, |hub| edit::archive_habit(hub, &id))?;
            println!("Archived {id}");
        }
        HabitCommand::Stats => {
            let hub = load_or_empty(ctx)?;
            let today = ctx.today();
            let active: Vec<_> = hub.habits.iter().filter(|h| h.is_active()).collect();
            if active.is_empty() {
                println!("No active habits.");
            }
            for h in active {
                println!(
                    "{} {}: {}% consistent",
                    h.emoji.as_deref().unwrap_or("🎯"),
                    h.name,
                    consistency_percent(h, today)
                );
            }
        }
    }
    Ok(())
}
