//! In-place edits to a hub snapshot: the writes the hub UI performs.
//!
//! Callers load a snapshot, apply one edit, and save it back; the last
//! write wins.

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::habit::Frequency;
use crate::list::ItemStatus;
use crate::task::TaskStatus;
use crate::{Habit, Hub, ListItem, SharedList, Task};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("no {kind} with id {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("list {list_id} has no item {index}")]
    NoSuchItem { list_id: String, index: usize },
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn task_mut<'a>(hub: &'a mut Hub, id: &str) -> Result<&'a mut Task, EditError> {
    hub.tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| EditError::NotFound { kind: "task", id: id.to_string() })
}

fn list_mut<'a>(hub: &'a mut Hub, id: &str) -> Result<&'a mut SharedList, EditError> {
    hub.lists
        .iter_mut()
        .find(|l| l.id == id)
        .ok_or_else(|| EditError::NotFound { kind: "list", id: id.to_string() })
}

fn habit_mut<'a>(hub: &'a mut Hub, id: &str) -> Result<&'a mut Habit, EditError> {
    hub.habits
        .iter_mut()
        .find(|h| h.id == id)
        .ok_or_else(|| EditError::NotFound { kind: "habit", id: id.to_string() })
}

/// Append a task, assigning a fresh id when it has none. Returns the id.
pub fn add_task(hub: &mut Hub, mut task: Task) -> Result<String, EditError> {
    if task.title.trim().is_empty() {
        return Err(EditError::Empty("task title"));
    }
    if task.id.is_empty() {
        task.id = new_id();
    }
    let id = task.id.clone();
    hub.tasks.push(task);
    Ok(id)
}

pub fn complete_task(hub: &mut Hub, id: &str) -> Result<(), EditError> {
    task_mut(hub, id)?.status = TaskStatus::Done;
    Ok(())
}

pub fn reopen_task(hub: &mut Hub, id: &str) -> Result<(), EditError> {
    task_mut(hub, id)?.status = TaskStatus::Pending;
    Ok(())
}

pub fn add_list(
    hub: &mut Hub,
    name: &str,
    emoji: Option<String>,
    items: Vec<String>,
) -> Result<String, EditError> {
    if name.trim().is_empty() {
        return Err(EditError::Empty("list name"));
    }
    let mut list = SharedList::new(new_id(), name.trim());
    list.emoji = emoji;
    list.items = items.into_iter().map(ListItem::new).collect();
    let id = list.id.clone();
    hub.lists.push(list);
    Ok(id)
}

/// Flip one item's checked flag; returns the new state.
pub fn toggle_list_item(hub: &mut Hub, list_id: &str, index: usize) -> Result<bool, EditError> {
    let list = list_mut(hub, list_id)?;
    let item = list.items.get_mut(index).ok_or_else(|| EditError::NoSuchItem {
        list_id: list_id.to_string(),
        index,
    })?;
    item.checked = !item.checked;
    Ok(item.checked)
}

pub fn archive_list(hub: &mut Hub, id: &str) -> Result<(), EditError> {
    list_mut(hub, id)?.status = ItemStatus::Archived;
    Ok(())
}

pub fn add_habit(
    hub: &mut Hub,
    name: &str,
    frequency: Frequency,
    custom_days: Vec<String>,
    created: NaiveDate,
) -> Result<String, EditError> {
    if name.trim().is_empty() {
        return Err(EditError::Empty("habit name"));
    }
    let mut habit = Habit::new(new_id(), name.trim(), frequency);
    habit.custom_days = custom_days;
    habit.created_at = Some(Value::String(created.format("%Y-%m-%d").to_string()));
    let id = habit.id.clone();
    hub.habits.push(habit);
    Ok(id)
}

/// Flip the check-in for `day`; returns the new state. A non-boolean entry
/// counts as unchecked, so the first toggle checks it.
pub fn toggle_habit_day(hub: &mut Hub, id: &str, day: NaiveDate) -> Result<bool, EditError> {
    let habit = habit_mut(hub, id)?;
    let key = day.format("%Y-%m-%d").to_string();
    let entry = habit.log.entry(key).or_insert(Value::Bool(false));
    let checked = *entry != Value::Bool(true);
    *entry = Value::Bool(checked);
    Ok(checked)
}

pub fn archive_habit(hub: &mut Hub, id: &str) -> Result<(), EditError> {
    habit_mut(hub, id)?.status = ItemStatus::Archived;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn add_and_complete_task() {
        let mut hub = Hub::default();
        let id = add_task(&mut hub, Task::new("", "Book flights")).unwrap();
        assert!(!id.is_empty());
        complete_task(&mut hub, &id).unwrap();
        assert!(hub.tasks[0].is_done());
        reopen_task(&mut hub, &id).unwrap();
        assert!(!hub.tasks[0].is_done());
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut hub = Hub::default();
        assert_eq!(
            add_task(&mut hub, Task::new("", "  ")),
            Err(EditError::Empty("task title"))
        );
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut hub = Hub::default();
        assert!(matches!(
            complete_task(&mut hub, "nope"),
            Err(EditError::NotFound { kind: "task", .. })
        ));
        assert!(matches!(
            toggle_habit_day(&mut hub, "nope", day()),
            Err(EditError::NotFound { kind: "habit", .. })
        ));
    }

    #[test]
    fn toggling_list_items() {
        let mut hub = Hub::default();
        let id = add_list(&mut hub, "Groceries", None, vec!["milk".into()]).unwrap();
        assert!(toggle_list_item(&mut hub, &id, 0).unwrap());
        assert!(!hub.lists[0].has_pending());
        assert!(!toggle_list_item(&mut hub, &id, 0).unwrap());
        assert_eq!(
            toggle_list_item(&mut hub, &id, 3),
            Err(EditError::NoSuchItem { list_id: id.clone(), index: 3 })
        );
        archive_list(&mut hub, &id).unwrap();
        assert!(!hub.lists[0].has_pending());
    }

    #[test]
    fn habit_log_toggles() {
        let mut hub = Hub::default();
        let id = add_habit(&mut hub, "Read", Frequency::Daily, vec![], day()).unwrap();
        assert_eq!(hub.habits[0].created_day(), Some(day()));
        assert!(toggle_habit_day(&mut hub, &id, day()).unwrap());
        assert_eq!(hub.habits[0].log.get("2026-10-16"), Some(&Value::Bool(true)));
        assert!(!toggle_habit_day(&mut hub, &id, day()).unwrap());
        archive_habit(&mut hub, &id).unwrap();
        assert!(!hub.habits[0].is_active());
    }

    #[test]
    fn null_log_entry_toggles_to_checked() {
        let mut hub = Hub::default();
        let id = add_habit(&mut hub, "Read", Frequency::Daily, vec![], day()).unwrap();
        hub.habits[0].log.insert("2026-10-16".into(), Value::Null);
        assert!(toggle_habit_day(&mut hub, &id, day()).unwrap());
        assert_eq!(hub.habits[0].checked_days().len(), 1);
    }
}
