// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::builder::RangedU64ValueParser;
use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;

// pages and page sizes start at 1
fn positive() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..)
}

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn expense_fields(cmd: Command) -> Command {
    cmd.arg(Arg::new("description").long("description").short('d'))
        .arg(
            Arg::new("amount")
                .long("amount")
                .short('a')
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("category")
                .long("category")
                .short('c')
                .help("Food|Transport|Entertainment|Healthcare|Utilities|Others"),
        )
        .arg(Arg::new("date").long("date").help("YYYY-MM-DD"))
}

pub fn build_cli() -> Command {
    Command::new("spendbook")
        .about("Local expense tracker: record, list, summarise and chart your spending")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Database file (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output on stderr (-v info, -vv debug)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("expense")
                .alias("tx")
                .about("Add, edit, remove and list expenses")
                .subcommand(expense_fields(Command::new("add").about("Record an expense")))
                .subcommand(expense_fields(
                    Command::new("edit")
                        .about("Change fields of an existing expense")
                        .arg(Arg::new("id").required(true)),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete an expense")
                        .arg(Arg::new("id").required(true)),
                )
                .subcommand(json_args(
                    Command::new("show")
                        .about("Show one expense")
                        .arg(Arg::new("id").required(true)),
                ))
                .subcommand(json_args(
                    Command::new("list")
                        .about("List expenses, filtered and paginated")
                        .arg(Arg::new("search").long("search").short('s'))
                        .arg(Arg::new("category").long("category").short('c'))
                        .arg(Arg::new("from").long("from").help("Start date, inclusive"))
                        .arg(Arg::new("to").long("to").help("End date, inclusive"))
                        .arg(
                            Arg::new("page")
                                .long("page")
                                .short('p')
                                .value_parser(positive())
                                .default_value("1"),
                        )
                        .arg(
                            Arg::new("page-size")
                                .long("page-size")
                                .value_parser(positive()),
                        ),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Totals and chart data")
                .subcommand(json_args(
                    Command::new("summary").about("Grand total and per-category totals"),
                ))
                .subcommand(json_args(
                    Command::new("by-category").about("Category totals for a pie chart"),
                ))
                .subcommand(json_args(
                    Command::new("by-date").about("Daily totals for a time series"),
                )),
        )
        .subcommand(
            Command::new("category")
                .about("Category options")
                .subcommand(json_args(Command::new("list"))),
        )
        .subcommand(
            Command::new("config")
                .about("Read or change settings (date_format, page_size)")
                .subcommand(Command::new("get").arg(Arg::new("key")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true).allow_hyphen_values(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored expenses for problems"))
}
