// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Checks raw user input before it becomes an [`Expense`].
//!
//! The store accepts whatever it is given; anything entering through the
//! CLI passes through [`ExpenseDraft::validate`] first.

use crate::models::{Category, CategoryKind, Expense};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Largest amount a single record may carry (1_000_000_000_000). Keeps
/// every sum over the collection far from `Decimal`'s limits.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Description is required")]
    MissingDescription,
    #[error("Please enter a valid positive amount (got '{0}')")]
    InvalidAmount(String),
    #[error("Please select a category ({0})")]
    InvalidCategory(String),
    #[error("Please select a date")]
    MissingDate,
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Every problem found in a draft, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        f.write_str(&msgs.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: String,
    pub category: Option<String>,
    pub date: Option<String>,
}

impl ExpenseDraft {
    /// Pre-populates a draft from a stored record, for edits.
    pub fn from_expense(e: &Expense) -> Self {
        Self {
            description: e.description.clone(),
            amount: e.amount.to_string(),
            category: Some(e.category.value.clone()),
            date: Some(e.date.format("%Y-%m-%d").to_string()),
        }
    }

    pub fn validate(&self, id: impl Into<String>) -> Result<Expense, ValidationErrors> {
        let mut errors = Vec::new();

        let description = self.description.trim();
        if description.is_empty() {
            errors.push(ValidationError::MissingDescription);
        }

        let amount = match self.amount.trim().parse::<Decimal>() {
            Ok(a) if a > Decimal::ZERO && a <= MAX_AMOUNT => Some(a),
            _ => {
                errors.push(ValidationError::InvalidAmount(self.amount.clone()));
                None
            }
        };

        let kind = match self.category.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push(ValidationError::InvalidCategory("none selected".into()));
                None
            }
            Some(c) => match c.parse::<CategoryKind>() {
                Ok(k) => Some(k),
                Err(msg) => {
                    errors.push(ValidationError::InvalidCategory(msg));
                    None
                }
            },
        };

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push(ValidationError::MissingDate);
                None
            }
            Some(d) => match NaiveDate::parse_from_str(d, "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.push(ValidationError::InvalidDate(d.to_string()));
                    None
                }
            },
        };

        match (amount, kind, date) {
            (Some(amount), Some(kind), Some(date)) if errors.is_empty() => Ok(Expense {
                id: id.into(),
                description: description.to_string(),
                amount,
                date,
                category: Category::from(kind),
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}
