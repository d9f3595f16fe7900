//! Habit model, frequency rules and the rolling consistency percentage.
//!
//! Both the weekly digest rollup and the in-app consistency figure use the
//! same frequency semantics; only their windows differ (fixed Monday–Sunday
//! week vs. trailing 30 days).

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::list::ItemStatus;
use crate::time::{WeekWindow, parse_calendar_date};

/// Trailing window used for the consistency percentage.
pub const CONSISTENCY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Frequency {
    #[default]
    Daily,
    Weekdays,
    Weekends,
    Weekly,
    Custom,
}

impl From<Option<String>> for Frequency {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim).map(str::to_lowercase).as_deref() {
            Some("weekdays") => Frequency::Weekdays,
            Some("weekends") => Frequency::Weekends,
            Some("weekly") => Frequency::Weekly,
            Some("custom") => Frequency::Custom,
            _ => Frequency::Daily,
        }
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        match f {
            Frequency::Daily => "daily",
            Frequency::Weekdays => "weekdays",
            Frequency::Weekends => "weekends",
            Frequency::Weekly => "weekly",
            Frequency::Custom => "custom",
        }
        .to_string()
    }
}

fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// Good / fair / poor badge for a completion percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitTier {
    Good,
    Fair,
    Poor,
}

impl HabitTier {
    pub fn from_percent(pct: u8) -> Self {
        if pct >= 80 {
            HabitTier::Good
        } else if pct >= 50 {
            HabitTier::Fair
        } else {
            HabitTier::Poor
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            HabitTier::Good => "🟢",
            HabitTier::Fair => "🟡",
            HabitTier::Poor => "🔴",
        }
    }
}

/// `round(100 * observed / expected)`, clamped to 0..=100; 0 when nothing is expected.
pub fn completion_percent(observed: u32, expected: u32) -> u8 {
    if expected == 0 {
        return 0;
    }
    let pct = (200 * u64::from(observed) + u64::from(expected)) / (2 * u64::from(expected));
    pct.min(100) as u8
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    #[serde(default, deserialize_with = "crate::hub::id_string")]
    pub id: String,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_days: Vec<String>,
    /// ISO date -> checked. Only a literal `true` is a check-in; `null`,
    /// `false` and anything else are kept but not counted.
    #[serde(default)]
    pub log: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Habit {
    pub fn new(id: impl Into<String>, name: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            id: id.into(),
            status: ItemStatus::Active,
            name: name.into(),
            emoji: None,
            frequency,
            custom_days: Vec::new(),
            log: BTreeMap::new(),
            created_at: None,
            extra: Map::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ItemStatus::Active
    }

    pub fn created_day(&self) -> Option<NaiveDate> {
        self.created_at
            .as_ref()
            .and_then(Value::as_str)
            .and_then(parse_calendar_date)
    }

    /// Distinct, parseable custom weekdays in the order they were stored.
    pub fn custom_weekdays(&self) -> Vec<Weekday> {
        let mut out = Vec::new();
        for raw in &self.custom_days {
            if let Ok(day) = raw.trim().parse::<Weekday>() {
                if !out.contains(&day) {
                    out.push(day);
                }
            }
        }
        out
    }

    /// Check-ins per Monday–Sunday week; independent of the log.
    pub fn expected_per_week(&self) -> u32 {
        match self.frequency {
            Frequency::Daily => 7,
            Frequency::Weekdays => 5,
            Frequency::Weekends => 2,
            Frequency::Weekly => 1,
            Frequency::Custom => self.custom_weekdays().len() as u32,
        }
    }

    /// Whether a check-in is expected on `day`.
    ///
    /// Weekly habits are due on the weekday they were created on (Monday
    /// when the creation date is unknown).
    pub fn applies_on(&self, day: NaiveDate) -> bool {
        let weekday = day.weekday();
        match self.frequency {
            Frequency::Daily => true,
            Frequency::Weekdays => !is_weekend(weekday),
            Frequency::Weekends => is_weekend(weekday),
            Frequency::Weekly => {
                let anchor = self.created_day().map(|c| c.weekday()).unwrap_or(Weekday::Mon);
                weekday == anchor
            }
            Frequency::Custom => self.custom_weekdays().contains(&weekday),
        }
    }

    /// Days logged as checked. Malformed keys are skipped.
    pub fn checked_days(&self) -> BTreeSet<NaiveDate> {
        self.log
            .iter()
            .filter(|(_, checked)| **checked == Value::Bool(true))
            .filter_map(|(key, _)| parse_calendar_date(key))
            .collect()
    }

    pub fn checkins_within(&self, window: &WeekWindow) -> u32 {
        self.checked_days()
            .into_iter()
            .filter(|d| window.contains(*d))
            .count() as u32
    }
}

/// Rolling consistency over `min(30, days since creation + 1)` days ending `today`.
pub fn consistency_percent(habit: &Habit, today: NaiveDate) -> u8 {
    let window_days = match habit.created_day() {
        Some(created) if created > today => 0,
        Some(created) => ((today - created).num_days() + 1).min(CONSISTENCY_WINDOW_DAYS),
        None => CONSISTENCY_WINDOW_DAYS,
    };

    let checked = habit.checked_days();
    let mut applicable = 0u32;
    let mut hits = 0u32;

    for offset in 0..window_days {
        let day = today - Duration::days(offset);
        if !habit.applies_on(day) {
            continue;
        }
        applicable += 1;
        if checked.contains(&day) {
            hits += 1;
        }
    }

    completion_percent(hits, applicable)
}
