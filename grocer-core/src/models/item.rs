use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::collection::Record;

/// A priced catalog record.
///
/// Serialized as `{"id","name","unit","pricePerUnit","createdAt"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub price_per_unit: f64,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Creates an item with a fresh id, stamped now.
    pub fn new(name: impl Into<String>, unit: impl Into<String>, price_per_unit: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            unit: unit.into(),
            price_per_unit,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) @ {:.2}", self.name, self.unit, self.price_per_unit)
    }
}

/// Partial update for an [`Item`]. Unset fields are left as they are.
///
/// There is no id or timestamp field: an update never changes a record's
/// identity or creation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub price_per_unit: Option<f64>,
}

impl ItemPatch {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_price(mut self, price_per_unit: f64) -> Self {
        self.price_per_unit = Some(price_per_unit);
        self
    }

    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.unit.is_none() && self.price_per_unit.is_none()
    }
}

impl Record for Item {
    type Patch = ItemPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &ItemPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(unit) = &patch.unit {
            self.unit = unit.clone();
        }
        if let Some(price) = patch.price_per_unit {
            self.price_per_unit = price;
        }
    }
}
