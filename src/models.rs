// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key used when a record carries no category at all.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, with = "amount_serde")]
    pub amount: Decimal,
    #[serde(with = "date_serde")]
    pub date: NaiveDate,
    #[serde(default)]
    pub category: Category,
}

impl Expense {
    /// Fresh opaque identifier for a record about to be added.
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Canonical category key used for grouping and filtering.
    pub fn category_value(&self) -> &str {
        &self.category.value
    }
}

/// A `{value, label}` category. Old data stored a bare label string; both
/// forms (and `null`) are folded into this one shape when read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "CategoryRepr")]
pub struct Category {
    pub value: String,
    pub label: String,
}

impl Category {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// The fixed option this category corresponds to, if any.
    pub fn kind(&self) -> Option<CategoryKind> {
        CategoryKind::ALL
            .iter()
            .copied()
            .find(|k| k.value() == self.value)
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::new(UNKNOWN_CATEGORY, UNKNOWN_CATEGORY)
    }
}

impl From<CategoryKind> for Category {
    fn from(k: CategoryKind) -> Self {
        Self::new(k.value(), k.label())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryRepr {
    Structured {
        value: String,
        #[serde(default)]
        label: Option<String>,
    },
    Legacy(String),
    // null, numbers, objects without a value
    Other(serde::de::IgnoredAny),
}

impl From<CategoryRepr> for Category {
    fn from(r: CategoryRepr) -> Self {
        match r {
            CategoryRepr::Structured { value, label } => {
                let label = label.unwrap_or_else(|| value.clone());
                Category { value, label }
            }
            CategoryRepr::Legacy(s) => Category::new(s.clone(), s),
            CategoryRepr::Other(_) => Category::default(),
        }
    }
}

/// The closed set of categories offered when creating a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Food,
    Transport,
    Entertainment,
    Healthcare,
    Utilities,
    Others,
}

impl CategoryKind {
    pub const ALL: [CategoryKind; 6] = [
        CategoryKind::Food,
        CategoryKind::Transport,
        CategoryKind::Entertainment,
        CategoryKind::Healthcare,
        CategoryKind::Utilities,
        CategoryKind::Others,
    ];

    pub fn value(self) -> &'static str {
        match self {
            CategoryKind::Food => "Food",
            CategoryKind::Transport => "Transport",
            CategoryKind::Entertainment => "Entertainment",
            CategoryKind::Healthcare => "Healthcare",
            CategoryKind::Utilities => "Utilities",
            CategoryKind::Others => "Others",
        }
    }

    pub fn label(self) -> &'static str {
        // labels and values coincide for the built-in set
        self.value()
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        CategoryKind::ALL
            .iter()
            .copied()
            .find(|k| k.value().eq_ignore_ascii_case(s) || k.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown category '{}'", s))
    }
}

/// Calendar date of a stored record. Accepts `YYYY-MM-DD` and older values
/// that carried a time of day after the date.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn null_as_empty<'de, D: serde::Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

mod amount_serde {
    use rust_decimal::Decimal;
    use rust_decimal::prelude::ToPrimitive;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(d: &Decimal, s: S) -> Result<S::Ok, S::Error> {
        if d.fract().is_zero() {
            if let Some(i) = d.to_i64() {
                return s.serialize_i64(i);
            }
        }
        s.serialize_f64(d.to_f64().unwrap_or(0.0))
    }

    // Anything that is not a number (or numeric text) counts as zero.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(match v {
            Value::Number(n) => lenient(&n.to_string()),
            Value::String(s) => lenient(s.trim()),
            _ => Decimal::ZERO,
        })
    }

    fn lenient(s: &str) -> Decimal {
        s.parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(s))
            .unwrap_or(Decimal::ZERO)
    }
}

mod date_serde {
    use chrono::NaiveDate;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&d.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_calendar_date(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw)))
    }
}
