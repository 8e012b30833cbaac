// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Expense;
use crate::utils::{fmt_amount, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// `(issue, detail)` pairs for records that break the collection's rules.
pub fn find_issues(expenses: &[Expense]) -> Vec<(String, String)> {
    let mut rows = Vec::new();

    // 1) Ids must be unique
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for e in expenses {
        if !seen.insert(e.id.as_str()) && reported.insert(e.id.as_str()) {
            rows.push(("duplicate_id".into(), e.id.clone()));
        }
    }

    // 2) Field checks the add path would have rejected
    for e in expenses {
        if e.amount <= Decimal::ZERO {
            rows.push((
                "non_positive_amount".into(),
                format!("{} {}", e.id, fmt_amount(&e.amount)),
            ));
        }
        if e.description.trim().is_empty() {
            rows.push(("empty_description".into(), e.id.clone()));
        }
        if e.category.kind().is_none() {
            rows.push((
                "unknown_category".into(),
                format!("{} '{}'", e.id, e.category.value),
            ));
        }
    }
    rows
}

pub fn handle(expenses: &[Expense]) -> Result<()> {
    let rows: Vec<Vec<String>> = find_issues(expenses)
        .into_iter()
        .map(|(a, b)| vec![a, b])
        .collect();
    if rows.is_empty() {
        println!("doctor: no issues found in {} expenses", expenses.len());
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
