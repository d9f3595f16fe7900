//! Deterministic plain-text rendering of the weekly digest.

use serde::{Deserialize, Serialize};

use crate::digest::{HabitRollup, WeeklyDigestData};
use crate::time::{format_full_date, format_short_date};
use crate::{SharedList, Task};

/// Lists shown in the body before collapsing into "...and N more".
pub const MAX_LISTS_SHOWN: usize = 5;

pub const NO_TASKS_LINE: &str = "✨ You have no tasks due this week.";

const DEFAULT_LIST_EMOJI: &str = "📝";
const DEFAULT_HABIT_EMOJI: &str = "🎯";

/// Rendered notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub participants: [String; 2],
    pub app_url: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            participants: ["Mike".to_string(), "Adam".to_string()],
            app_url: "https://sharehub.app".to_string(),
        }
    }
}

fn header(data: &WeeklyDigestData, opts: &RenderOptions) -> String {
    format!(
        "👋 Hi {} & {}!\nYour week ahead: {}",
        opts.participants[0],
        opts.participants[1],
        format_full_date(data.today)
    )
}

fn task_line(task: &Task) -> String {
    let mut line = format!("{} {}", task.priority.flag(), task.title);
    if let Some(due) = task.due_day() {
        line.push_str(&format!(" ({})", format_short_date(due)));
    }
    if let Some(person) = task.assigned_to.person() {
        line.push_str(&format!(" [{person}]"));
    }
    line
}

fn tasks_section(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return NO_TASKS_LINE.to_string();
    }
    let mut lines = vec!["📋 Tasks this week:".to_string()];
    lines.extend(tasks.iter().map(task_line));
    lines.join("\n")
}

fn lists_section(lists: &[SharedList]) -> Option<String> {
    if lists.is_empty() {
        return None;
    }
    let mut lines = vec!["📝 Lists with open items:".to_string()];
    for list in lists.iter().take(MAX_LISTS_SHOWN) {
        let emoji = list.emoji.as_deref().unwrap_or(DEFAULT_LIST_EMOJI);
        lines.push(format!("• {} {}", emoji, list.display_name()));
    }
    if lists.len() > MAX_LISTS_SHOWN {
        lines.push(format!("...and {} more", lists.len() - MAX_LISTS_SHOWN));
    }
    Some(lines.join("\n"))
}

fn habit_line(h: &HabitRollup) -> String {
    format!(
        "{} {} {} — {}/{} ({}%)",
        h.tier.emoji(),
        h.emoji.as_deref().unwrap_or(DEFAULT_HABIT_EMOJI),
        h.name,
        h.observed,
        h.expected,
        h.percent
    )
}

fn habits_section(habits: &[HabitRollup]) -> Option<String> {
    if habits.is_empty() {
        return None;
    }
    let mut lines = vec!["💪 Habits this week:".to_string()];
    lines.extend(habits.iter().map(habit_line));
    Some(lines.join("\n"))
}

pub fn render_title(data: &WeeklyDigestData) -> String {
    format!(
        "📋 {} tasks, {} lists this week",
        data.tasks.len(),
        data.lists.len()
    )
}

pub fn render_body(data: &WeeklyDigestData, opts: &RenderOptions) -> String {
    let mut sections = vec![header(data, opts), tasks_section(&data.tasks)];
    sections.extend(lists_section(&data.lists));
    sections.extend(habits_section(&data.habits));
    sections.push(format!("Open the hub: {}", opts.app_url));
    sections.join("\n\n")
}

pub fn render(data: &WeeklyDigestData, opts: &RenderOptions) -> Digest {
    Digest {
        title: render_title(data),
        body: render_body(data, opts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::aggregate;
    use crate::habit::Frequency;
    use crate::task::{Assignee, Priority};
    use crate::{Habit, Hub};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn digest_for(hub: &Hub) -> Digest {
        render(&aggregate(hub, today()), &RenderOptions::default())
    }

    #[test]
    fn single_high_priority_task() {
        let mut hub = Hub::default();
        hub.tasks.push(
            Task::new("t1", "Buy milk")
                .with_priority(Priority::High)
                .with_due("2026-10-14")
                .assigned(Assignee::Person("Mike".into())),
        );
        let out = digest_for(&hub);
        assert_eq!(out.title, "📋 1 tasks, 0 lists this week");
        assert!(out.body.lines().any(|l| l == "🔴 Buy milk (Oct 14) [Mike]"));
    }

    #[test]
    fn assignee_both_and_missing_date_are_omitted() {
        let mut hub = Hub::default();
        hub.tasks.push(
            Task::new("t1", "Plan dinner")
                .with_priority(Priority::Medium)
                .with_horizon(crate::task::TimeHorizon::Today),
        );
        let out = digest_for(&hub);
        assert!(out.body.lines().any(|l| l == "🟡 Plan dinner"));
    }

    #[test]
    fn empty_hub_has_sentinel_and_no_lists_section() {
        let out = digest_for(&Hub::default());
        assert_eq!(out.title, "📋 0 tasks, 0 lists this week");
        assert!(out.body.contains("no tasks due this week"));
        assert!(!out.body.contains("Lists with open items"));
        assert!(!out.body.contains("Habits this week"));
        assert_eq!(
            out.body,
            "👋 Hi Mike & Adam!\nYour week ahead: Friday, October 16\n\n\
             ✨ You have no tasks due this week.\n\n\
             Open the hub: https://sharehub.app"
        );
    }

    #[test]
    fn lists_are_capped_but_title_counts_all() {
        let mut hub = Hub::default();
        for i in 0..7 {
            let mut l = SharedList::new(format!("l{i}"), format!("List {i}")).with_items(["x"]);
            if i == 0 {
                l.emoji = Some("🛒".into());
            }
            hub.lists.push(l);
        }
        let out = digest_for(&hub);
        assert_eq!(out.title, "📋 0 tasks, 7 lists this week");
        assert!(out.body.contains("• 🛒 List 0\n• 📝 List 1"));
        assert!(out.body.contains("• 📝 List 4\n...and 2 more"));
        assert!(!out.body.contains("List 5"));
    }

    #[test]
    fn habit_line_format() {
        let mut h = Habit::new("h", "Run", Frequency::Daily);
        h.emoji = Some("🏃".into());
        for day in ["2026-10-12", "2026-10-13", "2026-10-15"] {
            h.log.insert(day.into(), true.into());
        }
        let hub = Hub {
            habits: vec![h],
            ..Hub::default()
        };
        let out = digest_for(&hub);
        assert!(out.body.contains("💪 Habits this week:\n🔴 🏃 Run — 3/7 (43%)"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut hub = Hub::default();
        hub.tasks.push(Task::new("t1", "A").with_due("2026-10-10"));
        hub.lists.push(SharedList::new("l", "B").with_items(["c"]));
        assert_eq!(digest_for(&hub), digest_for(&hub));
    }
}
