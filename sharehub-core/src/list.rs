//! Shared checklists (groceries, packing, gift ideas).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum ItemStatus {
    #[default]
    Active,
    Archived,
}

impl From<Option<String>> for ItemStatus {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("archived") => ItemStatus::Archived,
            _ => ItemStatus::Active,
        }
    }
}

impl From<ItemStatus> for String {
    fn from(s: ItemStatus) -> Self {
        match s {
            ItemStatus::Active => "active",
            ItemStatus::Archived => "archived",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ListItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checked: false,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedList {
    #[serde(default, deserialize_with = "crate::hub::id_string")]
    pub id: String,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<ListItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SharedList {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: ItemStatus::Active,
            category: String::new(),
            emoji: None,
            name: Some(name.into()),
            title: None,
            items: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items.extend(items.into_iter().map(ListItem::new));
        self
    }

    /// Older records carry `title` instead of `name`.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.title.as_deref().filter(|s| !s.trim().is_empty()))
            .unwrap_or("Untitled list")
    }

    pub fn unchecked_count(&self) -> usize {
        self.items.iter().filter(|i| !i.checked).count()
    }

    /// Active with at least one unchecked item. An empty list is never pending.
    pub fn has_pending(&self) -> bool {
        self.status == ItemStatus::Active && self.unchecked_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_not_pending() {
        let l = SharedList::new("l1", "Groceries");
        assert!(!l.has_pending());
    }

    #[test]
    fn fully_checked_list_is_not_pending() {
        let mut l = SharedList::new("l1", "Groceries").with_items(["eggs"]);
        l.items[0].checked = true;
        assert!(!l.has_pending());
    }

    #[test]
    fn archived_list_is_not_pending() {
        let mut l = SharedList::new("l1", "Packing").with_items(["socks"]);
        l.status = ItemStatus::Archived;
        assert!(!l.has_pending());
    }

    #[test]
    fn display_name_falls_back_to_title() {
        let l: SharedList =
            serde_json::from_str(r#"{"id":"l","title":"Gifts","items":[{"text":"book"}]}"#).unwrap();
        assert_eq!(l.display_name(), "Gifts");
        assert!(l.has_pending());

        let blank: SharedList = serde_json::from_str(r#"{"id":"l","name":"  "}"#).unwrap();
        assert_eq!(blank.display_name(), "Untitled list");
    }
}
