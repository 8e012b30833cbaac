// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::models::{Category, CategoryKind, Expense};
use crate::storage::Storage;
use crate::store::{ExpenseStore, Outcome};
use crate::utils::{fmt_amount, maybe_print_json, parse_date, pretty_table, today, warn_unsaved};
use crate::validation::ExpenseDraft;
use crate::views::{self, ExpenseFilter};
use anyhow::{Context, Result};
use serde::Serialize;

pub fn handle<S: Storage>(
    store: &mut ExpenseStore<S>,
    settings: &Settings,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            add(store, sub)?;
        }
        Some(("edit", sub)) => {
            edit(store, sub)?;
        }
        Some(("rm", sub)) => {
            rm(store, sub)?;
        }
        Some(("show", sub)) => show(store.expenses(), settings, sub)?,
        Some(("list", sub)) => list(store.expenses(), settings, sub)?,
        _ => {}
    }
    Ok(())
}

fn arg<'a>(sub: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    sub.get_one::<String>(name)
        .map(|s| s.trim())
        .with_context(|| format!("Missing <{}>", name))
}

pub fn add<S: Storage>(store: &mut ExpenseStore<S>, sub: &clap::ArgMatches) -> Result<Expense> {
    let draft = ExpenseDraft {
        description: sub
            .get_one::<String>("description")
            .cloned()
            .unwrap_or_default(),
        amount: sub.get_one::<String>("amount").cloned().unwrap_or_default(),
        category: sub.get_one::<String>("category").cloned(),
        date: Some(
            sub.get_one::<String>("date")
                .cloned()
                .unwrap_or_else(|| today().format("%Y-%m-%d").to_string()),
        ),
    };
    let expense = draft
        .validate(Expense::new_id())
        .context("Expense rejected")?;

    let report = store.add(expense.clone());
    warn_unsaved(&report);
    println!(
        "Recorded {} on {} for '{}' ({}) id={}",
        fmt_amount(&expense.amount),
        expense.date,
        expense.description,
        expense.category.label,
        expense.id
    );
    Ok(expense)
}

/// Merges the given fields over the stored record, re-validates, replaces.
pub fn edit<S: Storage>(store: &mut ExpenseStore<S>, sub: &clap::ArgMatches) -> Result<Outcome> {
    let id = arg(sub, "id")?;
    let Some(existing) = store.get(id) else {
        eprintln!("No expense with id '{}'", id);
        return Ok(Outcome::NotFound);
    };
    let mut draft = ExpenseDraft::from_expense(existing);
    if let Some(v) = sub.get_one::<String>("description") {
        draft.description = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("amount") {
        draft.amount = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("category") {
        draft.category = Some(v.clone());
    }
    if let Some(v) = sub.get_one::<String>("date") {
        draft.date = Some(v.clone());
    }
    let updated = draft
        .validate(id)
        .with_context(|| format!("Edit of '{}' rejected", id))?;

    let report = store.update(updated);
    warn_unsaved(&report);
    match report.outcome {
        Outcome::Applied => println!("Updated expense {}", id),
        Outcome::NotFound => eprintln!("No expense with id '{}'", id),
    }
    Ok(report.outcome)
}

pub fn rm<S: Storage>(store: &mut ExpenseStore<S>, sub: &clap::ArgMatches) -> Result<Outcome> {
    let id = arg(sub, "id")?;
    let report = store.delete(id);
    warn_unsaved(&report);
    match report.outcome {
        Outcome::Applied => println!("Removed expense {}", id),
        Outcome::NotFound => eprintln!("No expense with id '{}'", id),
    }
    Ok(report.outcome)
}

#[derive(Debug, Serialize)]
pub struct ExpenseRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub category: String,
}

impl ExpenseRow {
    pub fn new(e: &Expense, settings: &Settings) -> Self {
        Self {
            id: e.id.clone(),
            date: views::date_label(e.date, &settings.date_format),
            description: e.description.clone(),
            amount: fmt_amount(&e.amount),
            category: e.category.label.clone(),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.date.clone(),
            self.description.clone(),
            self.amount.clone(),
            self.category.clone(),
        ]
    }
}

const HEADERS: [&str; 5] = ["Id", "Date", "Description", "Amount", "Category"];

fn show(expenses: &[Expense], settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id")?;
    let Some(e) = expenses.iter().find(|e| e.id == id) else {
        eprintln!("No expense with id '{}'", id);
        return Ok(());
    };
    let row = ExpenseRow::new(e, settings);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &row)? {
        println!("{}", pretty_table(&HEADERS, vec![row.cells()]));
    }
    Ok(())
}

#[derive(Debug)]
pub struct ListPage {
    pub rows: Vec<ExpenseRow>,
    pub page: usize,
    pub total_pages: usize,
    pub matched: usize,
}

/// Category filter value: a known option in its canonical spelling,
/// otherwise the text as given (matches older free-text categories).
fn category_filter(raw: &str) -> Category {
    match raw.parse::<CategoryKind>() {
        Ok(k) => Category::from(k),
        Err(_) => Category::new(raw.trim(), raw.trim()),
    }
}

pub fn query_page(
    expenses: &[Expense],
    settings: &Settings,
    sub: &clap::ArgMatches,
) -> Result<ListPage> {
    let filter = ExpenseFilter {
        search: sub.get_one::<String>("search").cloned().unwrap_or_default(),
        category: sub
            .get_one::<String>("category")
            .map(|c| category_filter(c)),
        start: sub
            .get_one::<String>("from")
            .map(|s| parse_date(s))
            .transpose()?,
        end: sub
            .get_one::<String>("to")
            .map(|s| parse_date(s))
            .transpose()?,
    };
    let page_size = sub
        .get_one::<usize>("page-size")
        .copied()
        .unwrap_or(settings.page_size);
    let page = sub.get_one::<usize>("page").copied().unwrap_or(1);
    anyhow::ensure!(page >= 1 && page_size >= 1, "page and page size start at 1");

    let matched = filter.apply(expenses);
    let rows = views::paginate(&matched, page_size, page)
        .iter()
        .map(|e| ExpenseRow::new(e, settings))
        .collect();
    Ok(ListPage {
        rows,
        page,
        total_pages: views::total_pages(matched.len(), page_size),
        matched: matched.len(),
    })
}

fn list(expenses: &[Expense], settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_page(expenses, settings, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data.rows)? {
        return Ok(());
    }
    if data.rows.is_empty() {
        println!("No expenses found.");
    } else {
        let rows = data.rows.iter().map(ExpenseRow::cells).collect();
        println!("{}", pretty_table(&HEADERS, rows));
    }
    if data.total_pages > 1 {
        println!(
            "Page {} of {} ({} matching)",
            data.page, data.total_pages, data.matched
        );
    }
    Ok(())
}
