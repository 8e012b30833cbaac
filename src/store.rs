// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The expense collection and its persistence.
//!
//! [`ExpenseStore`] is the only owner of the collection. Every mutation
//! rewrites the whole collection under [`STORAGE_KEY`]; a failed write is
//! logged and handed back in the [`Report`] while the in-memory change stays.
//! A stored document that could not be fully read is copied to
//! [`CORRUPT_KEY`] before the first save replaces it.
//! Mutations take `&mut self`, so there is a single writer by construction.

use crate::models::Expense;
use crate::storage::{Storage, StorageError};
use serde::Serialize;
use serde::de::Error as _;
use serde_json::Value;

pub const STORAGE_KEY: &str = "expenses";
/// Holds a stored document that could not be fully read.
pub const CORRUPT_KEY: &str = "expenses.corrupt";
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    expenses: &'a [Expense],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    NotFound,
}

/// Result of a mutation. `warning` is set when the write to storage failed.
#[derive(Debug)]
#[must_use]
pub struct Report {
    pub outcome: Outcome,
    pub warning: Option<StorageError>,
}

impl Report {
    fn not_found() -> Self {
        Self {
            outcome: Outcome::NotFound,
            warning: None,
        }
    }

    pub fn applied(&self) -> bool {
        self.outcome == Outcome::Applied
    }

    pub fn persisted(&self) -> bool {
        self.applied() && self.warning.is_none()
    }
}

pub fn encode(expenses: &[Expense]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Envelope {
        version: SCHEMA_VERSION,
        expenses,
    })
}

/// What could be read back from a stored document.
#[derive(Debug, Default)]
pub struct Decoded {
    pub expenses: Vec<Expense>,
    /// records dropped because they could not be read
    pub skipped: usize,
}

/// Reads a stored document record by record. Only a document that is not
/// JSON, or holds no expense list at all, is an error; unreadable records
/// are skipped and counted.
pub fn decode_lenient(raw: &str) -> Result<Decoded, serde_json::Error> {
    let items = match serde_json::from_str::<Value>(raw)? {
        // older data is a bare array with no version tag
        Value::Array(items) => items,
        Value::Object(mut obj) => {
            let version = obj.get("version").and_then(Value::as_u64).unwrap_or(0);
            if version > u64::from(SCHEMA_VERSION) {
                tracing::warn!(
                    "stored expenses use schema version {}, newer than {}; reading best-effort",
                    version,
                    SCHEMA_VERSION
                );
            }
            match obj.remove("expenses") {
                Some(Value::Array(items)) => items,
                _ => return Err(serde_json::Error::custom("no expense list in stored document")),
            }
        }
        _ => return Err(serde_json::Error::custom("stored document is not an expense list")),
    };

    let mut out = Decoded::default();
    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Expense>(item) {
            Ok(e) => out.expenses.push(e),
            Err(e) => {
                tracing::warn!("skipping stored expense #{}: {}", idx, e);
                out.skipped += 1;
            }
        }
    }
    Ok(out)
}

pub fn decode(raw: &str) -> Result<Vec<Expense>, serde_json::Error> {
    decode_lenient(raw).map(|d| d.expenses)
}

/// Collection plus the raw document when some of it could not be read.
fn read<S: Storage>(storage: &S) -> (Vec<Expense>, Option<String>) {
    let raw = match storage.get_item(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (Vec::new(), None),
        Err(e) => {
            tracing::warn!("could not read stored expenses, starting empty: {}", e);
            return (Vec::new(), None);
        }
    };
    match decode_lenient(&raw) {
        Ok(d) if d.skipped == 0 => (d.expenses, None),
        Ok(d) => (d.expenses, Some(raw)),
        Err(e) => {
            tracing::warn!("stored expenses are malformed, starting empty: {}", e);
            (Vec::new(), Some(raw))
        }
    }
}

/// Reads the persisted collection. Absent or unreadable data comes back as
/// an empty collection; records that cannot be read are left out.
pub fn load_expenses<S: Storage>(storage: &S) -> Vec<Expense> {
    read(storage).0
}

pub struct ExpenseStore<S: Storage> {
    storage: S,
    expenses: Vec<Expense>,
    // raw document to copy under CORRUPT_KEY before it is first overwritten
    unreadable: Option<String>,
}

impl<S: Storage> ExpenseStore<S> {
    pub fn load(storage: S) -> Self {
        let (expenses, unreadable) = read(&storage);
        tracing::debug!("loaded {} expenses", expenses.len());
        Self {
            storage,
            expenses,
            unreadable,
        }
    }

    /// Re-reads storage, discarding the in-memory collection.
    pub fn reload(&mut self) {
        let (expenses, unreadable) = read(&self.storage);
        self.expenses = expenses;
        if unreadable.is_some() {
            self.unreadable = unreadable;
        }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn get(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Appends the record. Id uniqueness is the caller's job.
    pub fn add(&mut self, expense: Expense) -> Report {
        tracing::debug!("add expense {}", expense.id);
        self.expenses.push(expense);
        self.persist()
    }

    /// Replaces the record with the same id in place.
    pub fn update(&mut self, expense: Expense) -> Report {
        match self.expenses.iter().position(|e| e.id == expense.id) {
            Some(idx) => {
                tracing::debug!("update expense {}", expense.id);
                self.expenses[idx] = expense;
                self.persist()
            }
            None => Report::not_found(),
        }
    }

    pub fn delete(&mut self, id: &str) -> Report {
        match self.expenses.iter().position(|e| e.id == id) {
            Some(idx) => {
                tracing::debug!("delete expense {}", id);
                self.expenses.remove(idx);
                self.persist()
            }
            None => Report::not_found(),
        }
    }

    fn persist(&mut self) -> Report {
        let res = self
            .back_up_unreadable()
            .and_then(|()| encode(&self.expenses).map_err(StorageError::from))
            .and_then(|raw| self.storage.set_item(STORAGE_KEY, &raw));
        let warning = match res {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("could not save expenses, change kept in memory only: {}", e);
                Some(e)
            }
        };
        Report {
            outcome: Outcome::Applied,
            warning,
        }
    }

    // The main key is never overwritten while this copy is still pending.
    fn back_up_unreadable(&mut self) -> Result<(), StorageError> {
        if let Some(raw) = &self.unreadable {
            self.storage.set_item(CORRUPT_KEY, raw)?;
            tracing::warn!("kept unreadable stored expenses under '{}'", CORRUPT_KEY);
            self.unreadable = None;
        }
        Ok(())
    }
}
