//! The single shared hub document and the push registration document.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{Habit, SharedList, Task};

/// Accepts a string or a number (client-generated timestamp ids); anything
/// else reads as an empty id.
pub(crate) fn id_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// A collection as raw records: arrays as-is, index-keyed objects by value,
/// `null` and scalars as empty.
fn records<'de, D>(de: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        _ => Vec::new(),
    })
}

/// Splits raw records into the ones that read as `T` and the ones that do not.
fn split_records<T: DeserializeOwned>(raw: Vec<Value>) -> (Vec<T>, Vec<Value>) {
    let mut read = Vec::with_capacity(raw.len());
    let mut unreadable = Vec::new();
    for record in raw {
        match T::deserialize(&record) {
            Ok(item) => read.push(item),
            Err(_) => unreadable.push(record),
        }
    }
    (read, unreadable)
}

/// Records that failed to deserialize. They take no part in the digest and
/// are written back unchanged on save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unreadable {
    pub tasks: Vec<Value>,
    pub lists: Vec<Value>,
    pub habits: Vec<Value>,
}

impl Unreadable {
    pub fn len(&self) -> usize {
        self.tasks.len() + self.lists.len() + self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Snapshot of the shared hub. Missing or `null` collections read as empty
/// and a record that does not deserialize is set aside in `unreadable`
/// instead of failing the snapshot. Everything the digest does not model
/// (social plans, ideas, trips) is kept in `extra` so a save never drops it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "HubDocument", into = "HubDocument")]
pub struct Hub {
    pub tasks: Vec<Task>,
    pub lists: Vec<SharedList>,
    pub habits: Vec<Habit>,
    pub extra: Map<String, Value>,
    pub unreadable: Unreadable,
}

/// Wire shape of [`Hub`]: every collection as untyped records.
#[derive(Default, Serialize, Deserialize)]
struct HubDocument {
    #[serde(default, deserialize_with = "records")]
    tasks: Vec<Value>,
    #[serde(default, deserialize_with = "records")]
    lists: Vec<Value>,
    #[serde(default, deserialize_with = "records")]
    habits: Vec<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<HubDocument> for Hub {
    fn from(doc: HubDocument) -> Self {
        let (tasks, bad_tasks) = split_records(doc.tasks);
        let (lists, bad_lists) = split_records(doc.lists);
        let (habits, bad_habits) = split_records(doc.habits);
        Hub {
            tasks,
            lists,
            habits,
            extra: doc.extra,
            unreadable: Unreadable {
                tasks: bad_tasks,
                lists: bad_lists,
                habits: bad_habits,
            },
        }
    }
}

fn to_records<T: Serialize>(items: Vec<T>, unreadable: Vec<Value>) -> Vec<Value> {
    items
        .into_iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .chain(unreadable)
        .collect()
}

impl From<Hub> for HubDocument {
    fn from(hub: Hub) -> Self {
        HubDocument {
            tasks: to_records(hub.tasks, hub.unreadable.tasks),
            lists: to_records(hub.lists, hub.unreadable.lists),
            habits: to_records(hub.habits, hub.unreadable.habits),
            extra: hub.extra,
        }
    }
}

/// Recipient name -> push delivery token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registrations(pub BTreeMap<String, String>);

impl Registrations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Recipients in a stable (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn insert(&mut self, recipient: impl Into<String>, token: impl Into<String>) -> Option<String> {
        self.0.insert(recipient.into(), token.into())
    }

    pub fn remove(&mut self, recipient: &str) -> Option<String> {
        self.0.remove(recipient)
    }

    pub fn contains(&self, recipient: &str) -> bool {
        self.0.contains_key(recipient)
    }
}
