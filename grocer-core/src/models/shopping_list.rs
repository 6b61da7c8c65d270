//! Saved shopping lists.
//!
//! Shopping lists are built in memory by the aggregator. A list is only
//! written to the `shopping_lists` collection when a caller explicitly saves
//! a snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Entry;
use crate::collection::Record;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: String,
    pub name: String,
    pub entries: Vec<Entry>,
    pub created_at: DateTime<Utc>,
}

impl ShoppingList {
    pub fn new(name: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            entries,
            created_at: Utc::now(),
        }
    }

    /// Sum of entry totals.
    pub fn total_amount(&self) -> f64 {
        self.entries.iter().map(Entry::total).sum()
    }
}

/// Partial update for a [`ShoppingList`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShoppingListPatch {
    pub name: Option<String>,
    pub entries: Option<Vec<Entry>>,
}

impl Record for ShoppingList {
    type Patch = ShoppingListPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &ShoppingListPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(entries) = &patch.entries {
            self.entries = entries.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_amount() {
        let mut eggs = Entry::new("Eggs", "tray", 6.5);
        eggs.set_quantity(2);
        let list = ShoppingList::new("Weekly", vec![eggs, Entry::new("Bread", "loaf", 4.5)]);
        assert_eq!(list.total_amount(), 17.5);
    }

    #[test]
    fn test_json_roundtrip_keeps_entries() {
        let list = ShoppingList::new("Weekly", vec![Entry::new("Milk", "1L box", 11.0)]);
        let json = serde_json::to_string(&list).unwrap();
        assert!(json.contains("createdAt"));

        let parsed: ShoppingList = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, list);
    }

    #[test]
    fn test_patch_keeps_id() {
        let mut list = ShoppingList::new("Weekly", Vec::new());
        let id = list.id.clone();
        list.apply(&ShoppingListPatch {
            name: Some("Monthly".into()),
            entries: None,
        });
        assert_eq!(list.id, id);
        assert_eq!(list.name, "Monthly");
    }
}
