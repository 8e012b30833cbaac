// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{self, KEYS, Settings};
use crate::utils::pretty_table;
use anyhow::{Context, Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let s = Settings::load(conn)?;
            let all = vec![
                vec!["date_format".to_string(), s.date_format.clone()],
                vec!["page_size".to_string(), s.page_size.to_string()],
            ];
            match sub.get_one::<String>("key").map(|k| k.trim()) {
                None => println!("{}", pretty_table(&["Key", "Value"], all)),
                Some(k) => match all.into_iter().find(|r| r[0] == k) {
                    Some(r) => println!("{}", r[1]),
                    None => bail!("Unknown setting '{}' (use {})", k, KEYS.join("|")),
                },
            }
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").context("Missing <key>")?;
            let value = sub.get_one::<String>("value").context("Missing <value>")?;
            config::set_checked(conn, key.trim(), value)?;
            println!("Set {} = {}", key.trim(), value.trim());
        }
        _ => {}
    }
    Ok(())
}
