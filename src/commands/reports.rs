// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::models::Expense;
use crate::utils::{fmt_amount, maybe_print_json, pretty_table};
use crate::views::{self, Bucket};
use anyhow::Result;
use serde::Serialize;

pub fn handle(expenses: &[Expense], settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(expenses, sub)?,
        Some(("by-category", sub)) => by_category(expenses, sub)?,
        Some(("by-date", sub)) => by_date(expenses, settings, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TotalRow {
    pub key: String,
    pub total: String,
}

impl From<Bucket> for TotalRow {
    fn from(b: Bucket) -> Self {
        Self {
            key: b.key,
            total: fmt_amount(&b.total),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: String,
    pub count: usize,
    pub categories: Vec<TotalRow>,
}

pub fn build_summary(expenses: &[Expense]) -> Summary {
    Summary {
        total: fmt_amount(&views::total(expenses)),
        count: expenses.len(),
        categories: views::category_summary(expenses)
            .into_iter()
            .map(TotalRow::from)
            .collect(),
    }
}

fn summary(expenses: &[Expense], sub: &clap::ArgMatches) -> Result<()> {
    let data = build_summary(expenses);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    println!("Total Amount: {} ({} expenses)", data.total, data.count);
    let rows = data
        .categories
        .into_iter()
        .map(|r| vec![r.key, r.total])
        .collect();
    println!("{}", pretty_table(&["Category", "Total"], rows));
    Ok(())
}

pub fn category_rows(expenses: &[Expense]) -> Vec<TotalRow> {
    views::category_chart(expenses)
        .into_iter()
        .map(TotalRow::from)
        .collect()
}

pub fn date_rows(expenses: &[Expense], settings: &Settings) -> Vec<TotalRow> {
    views::group_by_date(expenses, &settings.date_format)
        .into_iter()
        .map(TotalRow::from)
        .collect()
}

fn by_category(expenses: &[Expense], sub: &clap::ArgMatches) -> Result<()> {
    let data = category_rows(expenses);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data.into_iter().map(|r| vec![r.key, r.total]).collect();
        println!("{}", pretty_table(&["Category", "Total"], rows));
    }
    Ok(())
}

fn by_date(expenses: &[Expense], settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let data = date_rows(expenses, settings);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data.into_iter().map(|r| vec![r.key, r.total]).collect();
        println!("{}", pretty_table(&["Date", "Total"], rows));
    }
    Ok(())
}
