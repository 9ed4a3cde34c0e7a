// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command, value_parser};

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .short('m')
        .value_name("YYYY-MM")
        .help("Reference month (defaults to the current month)")
}

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print JSON lines"),
    ]
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_name("ID")
        .help("Record id or a unique prefix of it")
}

pub fn build_cli() -> Command {
    command!()
        .name("spendsmart")
        .about("Personal ledger, shared household tracker, and portfolio")
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .value_name("DIR")
                .value_parser(value_parser!(std::path::PathBuf))
                .help("Directory holding the JSON collections"),
        )
        .subcommand(Command::new("init").about("Create the data directory"))
        .subcommand(
            Command::new("tx")
                .about("Personal and shared transactions")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .short('t')
                                .value_parser(["income", "expense"])
                                .default_value("expense"),
                        )
                        .arg(Arg::new("category").long("category").short('c').required(true))
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("list")
                        .about("Personal transactions of a month, grouped by day")
                        .arg(month_arg())
                        .args(json_args()),
                )
                .subcommand(Command::new("rm").about("Delete a transaction").arg(id_arg())),
        )
        .subcommand(Command::new("categories").about("Suggested categories"))
        .subcommand(
            Command::new("parents")
                .about("Shared household statement with carry-forward balance")
                .arg(month_arg())
                .args(json_args()),
        )
        .subcommand(
            Command::new("stats")
                .about("Daily income vs expense")
                .arg(month_arg())
                .arg(
                    Arg::new("exclude")
                        .long("exclude")
                        .action(ArgAction::Append)
                        .value_name("CATEGORY")
                        .help("Expense categories left out of the chart (default: Saving)"),
                )
                .args(json_args()),
        )
        .subcommand(
            Command::new("spend")
                .about("Personal spending by category")
                .arg(month_arg())
                .args(json_args()),
        )
        .subcommand(
            Command::new("portfolio")
                .about("Shares and funds")
                .subcommand_required(true)
                .subcommand(
                    Command::new("share")
                        .subcommand_required(true)
                        .subcommand(
                            Command::new("add")
                                .arg(Arg::new("name").long("name").required(true))
                                .arg(Arg::new("code").long("code"))
                                .arg(Arg::new("units").long("units").required(true))
                                .arg(Arg::new("buy-price").long("buy-price").required(true))
                                .arg(Arg::new("current-price").long("current-price"))
                                .arg(Arg::new("buy-date").long("buy-date"))
                                .arg(Arg::new("dividend-date").long("dividend-date"))
                                .arg(Arg::new("dividend-amount").long("dividend-amount")),
                        )
                        .subcommand(Command::new("list").args(json_args()))
                        .subcommand(Command::new("rm").arg(id_arg())),
                )
                .subcommand(
                    Command::new("fund")
                        .subcommand_required(true)
                        .subcommand(
                            Command::new("add")
                                .arg(Arg::new("name").long("name").required(true))
                                .arg(Arg::new("invested").long("invested").required(true))
                                .arg(Arg::new("current-value").long("current-value").required(true))
                                .arg(Arg::new("buy-date").long("buy-date")),
                        )
                        .subcommand(Command::new("list").args(json_args()))
                        .subcommand(Command::new("rm").arg(id_arg())),
                )
                .subcommand(Command::new("summary").args(json_args())),
        )
        .subcommand(
            Command::new("insights")
                .about("AI summary of a month's personal spending")
                .arg(month_arg()),
        )
        .subcommand(
            Command::new("export")
                .about("Back up all transactions to a file")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("json")
                        .help("json or csv"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_name("PATH")
                        .help("Output file (defaults to spendsmart_backup_<date>.<ext>)"),
                ),
        )
}
