//! Validation of user-entered item fields.

use std::fmt;
use thiserror::Error;

use crate::models::Item;

/// A single field problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Item name is required")]
    NameRequired,
    #[error("Unit is required")]
    UnitRequired,
    #[error("Price is required")]
    PriceRequired,
    #[error("Price must be a valid number greater than 0")]
    PriceInvalid,
}

/// All field problems found in one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn contains(&self, error: FieldError) -> bool {
        self.errors.contains(&error)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Item fields that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub unit: String,
    pub price: f64,
}

impl NewItem {
    /// Validates raw form input. Name and unit are trimmed.
    pub fn parse(name: &str, unit: &str, price: &str) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();

        let name = name.trim();
        if name.is_empty() {
            errors.push(FieldError::NameRequired);
        }

        let unit = unit.trim();
        if unit.is_empty() {
            errors.push(FieldError::UnitRequired);
        }

        let price = price.trim();
        let parsed = if price.is_empty() {
            errors.push(FieldError::PriceRequired);
            None
        } else {
            match parse_price(price) {
                Some(value) => Some(value),
                None => {
                    errors.push(FieldError::PriceInvalid);
                    None
                }
            }
        };

        match parsed {
            Some(price) if errors.is_empty() => Ok(Self {
                name: name.to_string(),
                unit: unit.to_string(),
                price,
            }),
            _ => Err(ValidationError { errors }),
        }
    }

    /// Builds a catalog item with a fresh id.
    pub fn into_item(self) -> Item {
        Item::new(self.name, self.unit, self.price)
    }
}

/// Parses a positive, finite price.
pub fn parse_price(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0)
}
