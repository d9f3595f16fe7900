//! Shared task model as stored in the hub document.
//!
//! Enumerated fields deserialize from free-form strings so that a record
//! written by an older client never fails the whole snapshot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::time::parse_calendar_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl From<Option<String>> for TaskStatus {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim).map(str::to_lowercase).as_deref() {
            Some("done") | Some("completed") | Some("complete") => TaskStatus::Done,
            Some("in-progress") | Some("in_progress") | Some("inprogress") => TaskStatus::InProgress,
            _ => TaskStatus::Pending,
        }
    }
}

impl From<TaskStatus> for String {
    fn from(s: TaskStatus) -> Self {
        match s {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
    #[default]
    Unspecified,
}

impl Priority {
    /// Sort rank for the weekly view: lower sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent | Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low | Priority::Unspecified => 2,
        }
    }

    pub fn flag(self) -> &'static str {
        match self.rank() {
            0 => "🔴",
            1 => "🟡",
            _ => "🟢",
        }
    }
}

impl From<Option<String>> for Priority {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim).map(str::to_lowercase).as_deref() {
            Some("urgent") => Priority::Urgent,
            Some("high") => Priority::High,
            Some("medium") => Priority::Medium,
            Some("low") => Priority::Low,
            _ => Priority::Unspecified,
        }
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        match p {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Unspecified => "",
        }
        .to_string()
    }
}

/// Coarse urgency tag set independently of a due date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum TimeHorizon {
    Today,
    ThisWeek,
    ThisMonth,
    Someday,
    Other(String),
    #[default]
    Unset,
}

impl TimeHorizon {
    /// Horizons that pull a task into this week's digest.
    pub fn is_immediate(&self) -> bool {
        matches!(self, TimeHorizon::Today | TimeHorizon::ThisWeek)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, TimeHorizon::Unset)
    }
}

impl From<Option<String>> for TimeHorizon {
    fn from(raw: Option<String>) -> Self {
        let Some(raw) = raw else {
            return TimeHorizon::Unset;
        };
        match raw.trim().to_lowercase().as_str() {
            "" => TimeHorizon::Unset,
            "today" => TimeHorizon::Today,
            "this-week" | "this_week" | "thisweek" | "week" => TimeHorizon::ThisWeek,
            "this-month" | "this_month" | "thismonth" | "month" => TimeHorizon::ThisMonth,
            "someday" | "later" => TimeHorizon::Someday,
            _ => TimeHorizon::Other(raw),
        }
    }
}

impl From<TimeHorizon> for String {
    fn from(h: TimeHorizon) -> Self {
        match h {
            TimeHorizon::Today => "today".to_string(),
            TimeHorizon::ThisWeek => "this-week".to_string(),
            TimeHorizon::ThisMonth => "this-month".to_string(),
            TimeHorizon::Someday => "someday".to_string(),
            TimeHorizon::Other(s) => s,
            TimeHorizon::Unset => String::new(),
        }
    }
}

/// Who a task belongs to: one of the two participants, or both.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Assignee {
    #[default]
    Both,
    Person(String),
}

impl Assignee {
    pub fn person(&self) -> Option<&str> {
        match self {
            Assignee::Both => None,
            Assignee::Person(name) => Some(name),
        }
    }
}

impl From<Option<String>> for Assignee {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim) {
            None | Some("") => Assignee::Both,
            Some(s) if s.eq_ignore_ascii_case("both") => Assignee::Both,
            Some(s) => Assignee::Person(s.to_string()),
        }
    }
}

impl From<Assignee> for String {
    fn from(a: Assignee) -> Self {
        match a {
            Assignee::Both => "Both".to_string(),
            Assignee::Person(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, deserialize_with = "crate::hub::id_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    /// Usually `YYYY-MM-DD`; kept untyped because older clients wrote
    /// timestamps and objects here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Value>,
    #[serde(default, skip_serializing_if = "TimeHorizon::is_unset")]
    pub time_horizon: TimeHorizon,
    #[serde(default)]
    pub assigned_to: Assignee,

    /// Fields the digest does not read (notes, links, timestamps).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: TaskStatus::Pending,
            priority: Priority::Unspecified,
            due_date: None,
            time_horizon: TimeHorizon::Unset,
            assigned_to: Assignee::Both,
            extra: Map::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due(mut self, due: impl Into<String>) -> Self {
        self.due_date = Some(Value::String(due.into()));
        self
    }

    pub fn with_horizon(mut self, horizon: TimeHorizon) -> Self {
        self.time_horizon = horizon;
        self
    }

    pub fn assigned(mut self, assignee: Assignee) -> Self {
        self.assigned_to = assignee;
        self
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// The stored due date when it is a string.
    pub fn due_text(&self) -> Option<&str> {
        self.due_date.as_ref().and_then(Value::as_str)
    }

    /// Parsed due date; non-string values and malformed strings read as
    /// "no due date".
    pub fn due_day(&self) -> Option<NaiveDate> {
        self.due_text().and_then(parse_calendar_date)
    }
}
