// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::CategoryKind;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CategoryOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn options() -> Vec<CategoryOption> {
    CategoryKind::ALL
        .iter()
        .map(|k| CategoryOption {
            value: k.value(),
            label: k.label(),
        })
        .collect()
}

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let data = options();
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
            let rows = data
                .iter()
                .map(|o| vec![o.value.to_string(), o.label.to_string()])
                .collect();
            println!("{}", pretty_table(&["Value", "Label"], rows));
        }
    }
    Ok(())
}
