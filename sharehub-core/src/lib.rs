//! sharehub-core: shared hub model and the weekly digest (aggregate + render).

pub mod digest;
pub mod edit;
pub mod habit;
pub mod hub;
pub mod list;
pub mod render;
pub mod task;
pub mod time;

pub use digest::{HabitRollup, WeeklyDigestData, aggregate};
pub use edit::EditError;
pub use habit::{Frequency, Habit, HabitTier, consistency_percent};
pub use hub::{Hub, Registrations};
pub use list::{ItemStatus, ListItem, SharedList};
pub use render::{Digest, RenderOptions, render};
pub use task::{Assignee, Priority, Task, TaskStatus, TimeHorizon};
pub use time::WeekWindow;

/// Aggregate and render in one step.
pub fn build_weekly_digest(hub: &Hub, today: chrono::NaiveDate, opts: &RenderOptions) -> Digest {
    render(&aggregate(hub, today), opts)
}
