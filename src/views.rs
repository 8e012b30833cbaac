// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only projections over the expense collection: filtered listings,
//! pages, per-category and per-day totals, and the grand total.
//!
//! Nothing here mutates its input. Category grouping always goes through
//! [`category_value`], so old string categories and `{value, label}`
//! categories land in the same bucket.

use crate::models::{Category, Expense};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

pub fn category_value(e: &Expense) -> &str {
    e.category_value()
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub search: String,
    pub category: Option<Category>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn matches(&self, e: &Expense) -> bool {
        self.matches_lowered(e, &self.search.to_lowercase())
    }

    fn matches_lowered(&self, e: &Expense, needle: &str) -> bool {
        e.description.to_lowercase().contains(needle)
            && self
                .category
                .as_ref()
                .is_none_or(|c| category_value(e) == c.value)
            && self.start.is_none_or(|s| e.date >= s)
            && self.end.is_none_or(|end| e.date <= end)
    }

    pub fn apply<'a>(&self, expenses: &'a [Expense]) -> Vec<&'a Expense> {
        let needle = self.search.to_lowercase();
        expenses
            .iter()
            .filter(|e| self.matches_lowered(e, &needle))
            .collect()
    }
}

/// Records whose description contains `search` (any case) and that pass the
/// optional category and inclusive date bounds. Input order is kept.
pub fn filter_list<'a>(
    expenses: &'a [Expense],
    search: &str,
    category: Option<&Category>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<&'a Expense> {
    ExpenseFilter {
        search: search.to_string(),
        category: category.cloned(),
        start,
        end,
    }
    .apply(expenses)
}

/// 1-indexed page of `items`. Pages past the end (and page 0) are empty.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub key: String,
    pub total: Decimal,
}

pub fn group_by_category(expenses: &[Expense]) -> BTreeMap<String, Decimal> {
    let mut acc: BTreeMap<String, Decimal> = BTreeMap::new();
    for e in expenses {
        let slot = acc
            .entry(category_value(e).to_string())
            .or_insert(Decimal::ZERO);
        *slot = add_amount(*slot, e.amount);
    }
    acc
}

fn ranked(map: BTreeMap<String, Decimal>) -> Vec<Bucket> {
    let mut items: Vec<Bucket> = map
        .into_iter()
        .map(|(key, total)| Bucket { key, total })
        .collect();
    // stable sort keeps name order among equal totals
    items.sort_by(|a, b| b.total.cmp(&a.total));
    items
}

/// Every category with its total, largest first. Zero totals stay.
pub fn category_summary(expenses: &[Expense]) -> Vec<Bucket> {
    ranked(group_by_category(expenses))
}

/// Category totals for charting; zero totals are dropped.
pub fn category_chart(expenses: &[Expense]) -> Vec<Bucket> {
    let mut items = ranked(group_by_category(expenses));
    items.retain(|b| !b.total.is_zero());
    items
}

/// Totals per rendered date label, oldest first. Dates that render to the
/// same label (with a coarse `date_format`) are merged.
pub fn group_by_date(expenses: &[Expense], date_format: &str) -> Vec<Bucket> {
    let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for e in expenses {
        let slot = by_day.entry(e.date).or_insert(Decimal::ZERO);
        *slot = add_amount(*slot, e.amount);
    }
    let mut out: Vec<Bucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (day, amt) in by_day {
        let key = date_label(day, date_format);
        match index.get(&key) {
            Some(&i) => out[i].total = add_amount(out[i].total, amt),
            None => {
                index.insert(key.clone(), out.len());
                out.push(Bucket { key, total: amt });
            }
        }
    }
    out
}

/// Renders `day` with a strftime-style format, falling back to ISO form
/// when the format is unusable.
pub fn date_label(day: NaiveDate, date_format: &str) -> String {
    let mut s = String::new();
    if write!(s, "{}", day.format(date_format)).is_err() {
        return day.format("%Y-%m-%d").to_string();
    }
    s
}

pub fn total(expenses: &[Expense]) -> Decimal {
    expenses
        .iter()
        .fold(Decimal::ZERO, |acc, e| add_amount(acc, e.amount))
}

/// Sum that saturates at `Decimal::MAX`/`MIN` instead of overflowing.
pub fn add_amount(acc: Decimal, amount: Decimal) -> Decimal {
    acc.checked_add(amount).unwrap_or_else(|| {
        tracing::warn!("expense total overflowed; clamping to the largest representable amount");
        if amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}
