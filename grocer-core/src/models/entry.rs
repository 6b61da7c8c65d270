use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::Item;

/// One line of a shopping list.
///
/// `price` is a snapshot of the source item's price at the time the entry
/// was added. `total` is always `quantity * price`; the fields are private so
/// it can only change through [`Entry::set_quantity`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "EntryFields")]
pub struct Entry {
    id: String,
    name: String,
    unit: String,
    price: f64,
    quantity: u32,
    total: f64,
}

/// Wire shape of an entry; `total` is recomputed on decode.
#[derive(Deserialize)]
struct EntryFields {
    id: String,
    name: String,
    unit: String,
    price: f64,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl From<EntryFields> for Entry {
    fn from(fields: EntryFields) -> Self {
        let mut entry = Self {
            id: fields.id,
            name: fields.name,
            unit: fields.unit,
            price: fields.price,
            quantity: 1,
            total: fields.price,
        };
        entry.set_quantity(fields.quantity);
        entry
    }
}

impl Entry {
    /// Creates an entry with quantity 1 and a fresh id.
    pub fn new(name: impl Into<String>, unit: impl Into<String>, price: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            unit: unit.into(),
            price,
            quantity: 1,
            total: price,
        }
    }

    /// Copies name, unit and price from a catalog item.
    pub fn from_item(item: &Item) -> Self {
        Self::new(item.name.clone(), item.unit.clone(), item.price_per_unit)
    }

    /// Sets the quantity (minimum 1) and recomputes the total.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
        self.total = f64::from(self.quantity) * self.price;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {:.2} / {} = {:.2}",
            self.quantity, self.price, self.unit, self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_item_snapshots_price() {
        let mut item = Item::new("Eggs", "tray", 6.5);
        let entry = Entry::from_item(&item);

        assert_eq!(entry.name(), "Eggs");
        assert_eq!(entry.unit(), "tray");
        assert_eq!(entry.price(), 6.5);
        assert_eq!(entry.quantity(), 1);
        assert_eq!(entry.total(), 6.5);
        assert_ne!(entry.id(), item.id);

        item.price_per_unit = 9.0;
        assert_eq!(entry.price(), 6.5);
    }

    #[test]
    fn test_set_quantity_recomputes_total() {
        let mut entry = Entry::new("Eggs", "tray", 6.5);
        entry.set_quantity(3);
        assert_eq!(entry.quantity(), 3);
        assert_eq!(entry.total(), 19.5);
    }

    #[test]
    fn test_set_quantity_clamps_to_one() {
        let mut entry = Entry::new("Eggs", "tray", 6.5);
        entry.set_quantity(0);
        assert_eq!(entry.quantity(), 1);
        assert_eq!(entry.total(), 6.5);
    }

    #[test]
    fn test_decode_recomputes_stale_total() {
        let json = r#"{"id":"e1","name":"Rice","unit":"5kg","price":20.0,"quantity":2,"total":999.0}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.quantity(), 2);
        assert_eq!(entry.total(), 40.0);
    }

    #[test]
    fn test_decode_defaults_and_clamps_quantity() {
        let missing = r#"{"id":"e1","name":"Milk","unit":"1L box","price":11.0}"#;
        let entry: Entry = serde_json::from_str(missing).unwrap();
        assert_eq!(entry.quantity(), 1);

        let zero = r#"{"id":"e2","name":"Milk","unit":"1L box","price":11.0,"quantity":0}"#;
        let entry: Entry = serde_json::from_str(zero).unwrap();
        assert_eq!(entry.quantity(), 1);
        assert_eq!(entry.total(), 11.0);
    }

    #[test]
    fn test_entry_display() {
        let mut entry = Entry::new("Bread", "loaf", 4.5);
        entry.set_quantity(2);
        assert_eq!(entry.to_string(), "2 x 4.50 / loaf = 9.00");
    }
}
