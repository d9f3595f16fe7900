//! Weekly digest aggregation over a hub snapshot.

use chrono::NaiveDate;

use crate::habit::{HabitTier, completion_percent};
use crate::time::WeekWindow;
use crate::{Habit, Hub, SharedList, Task};

/// One active habit's check-ins for the current week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitRollup {
    pub name: String,
    pub emoji: Option<String>,
    pub observed: u32,
    pub expected: u32,
    pub percent: u8,
    pub tier: HabitTier,
}

impl HabitRollup {
    pub fn for_week(habit: &Habit, window: &WeekWindow) -> Self {
        let observed = habit.checkins_within(window);
        let expected = habit.expected_per_week();
        let percent = completion_percent(observed, expected);
        Self {
            name: habit.name.clone(),
            emoji: habit.emoji.clone(),
            observed,
            expected,
            percent,
            tier: HabitTier::from_percent(percent),
        }
    }
}

/// The three views the renderer works from.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyDigestData {
    pub today: NaiveDate,
    pub window: WeekWindow,
    pub tasks: Vec<Task>,
    pub lists: Vec<SharedList>,
    pub habits: Vec<HabitRollup>,
}

/// Not done, and due this week, tagged today/this-week, or overdue.
///
/// Overdue has no lower bound: a task stays in the digest until completed.
pub fn is_relevant_this_week(task: &Task, window: &WeekWindow, today: NaiveDate) -> bool {
    if task.is_done() {
        return false;
    }
    if task.time_horizon.is_immediate() {
        return true;
    }
    match task.due_day() {
        Some(due) => window.contains(due) || due <= today,
        None => false,
    }
}

/// Weekly tasks, ordered by priority rank. `sort_by_key` is stable, so equal
/// ranks keep their hub order.
pub fn weekly_tasks(tasks: &[Task], window: &WeekWindow, today: NaiveDate) -> Vec<Task> {
    let mut out: Vec<Task> = tasks
        .iter()
        .filter(|t| is_relevant_this_week(t, window, today))
        .cloned()
        .collect();
    out.sort_by_key(|t| t.priority.rank());
    out
}

pub fn pending_lists(lists: &[SharedList]) -> Vec<SharedList> {
    lists.iter().filter(|l| l.has_pending()).cloned().collect()
}

pub fn habit_rollups(habits: &[Habit], window: &WeekWindow) -> Vec<HabitRollup> {
    habits
        .iter()
        .filter(|h| h.is_active())
        .map(|h| HabitRollup::for_week(h, window))
        .collect()
}

pub fn aggregate(hub: &Hub, today: NaiveDate) -> WeeklyDigestData {
    let window = WeekWindow::containing(today);
    WeeklyDigestData {
        today,
        window,
        tasks: weekly_tasks(&hub.tasks, &window, today),
        lists: pending_lists(&hub.lists),
        habits: habit_rollups(&hub.habits, &window),
    }
}
