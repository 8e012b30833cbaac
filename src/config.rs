// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow, bail};
use chrono::format::{Item, StrftimeItems};
use rusqlite::{Connection, OptionalExtension, params};

pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";
pub const DEFAULT_PAGE_SIZE: usize = 5;

pub const KEYS: [&str; 2] = ["date_format", "page_size"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// strftime-style format for date labels in lists and reports
    pub date_format: String,
    pub page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// Stored values, with defaults for anything unset or unusable.
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut s = Settings::default();
        if let Some(v) = get_setting(conn, "date_format")? {
            match check_date_format(&v) {
                Ok(()) => s.date_format = v,
                Err(e) => tracing::warn!("ignoring stored date_format: {}", e),
            }
        }
        if let Some(v) = get_setting(conn, "page_size")? {
            match parse_page_size(&v) {
                Ok(n) => s.page_size = n,
                Err(e) => tracing::warn!("ignoring stored page_size: {}", e),
            }
        }
        Ok(s)
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Validates and stores one of [`KEYS`].
pub fn set_checked(conn: &Connection, key: &str, value: &str) -> Result<()> {
    match key {
        "date_format" => check_date_format(value)?,
        "page_size" => {
            parse_page_size(value)?;
        }
        _ => bail!("Unknown setting '{}' (use {})", key, KEYS.join("|")),
    }
    set_setting(conn, key, value.trim())
}

pub fn check_date_format(fmt: &str) -> Result<()> {
    if fmt.trim().is_empty() {
        bail!("date format must not be empty");
    }
    if StrftimeItems::new(fmt).any(|i| matches!(i, Item::Error)) {
        return Err(anyhow!("Invalid date format '{}'", fmt));
    }
    Ok(())
}

pub fn parse_page_size(s: &str) -> Result<usize> {
    let n: usize = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid page size '{}'", s))?;
    if n == 0 {
        bail!("page size must be at least 1");
    }
    Ok(n)
}
