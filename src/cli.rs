// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .help("Print as pretty JSON")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print as JSON lines")
            .action(ArgAction::SetTrue),
    )
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Billing period (defaults to the current month)")
}

fn scope_arg() -> Arg {
    Arg::new("scope")
        .long("scope")
        .value_name("SCOPE")
        .default_value("single")
        .help("How far the action reaches across an installment group: single|all|future|past")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_name("ID")
        .help("Transaction id or unique prefix")
}

pub fn build_cli() -> Command {
    Command::new("parcela")
        .about("Installment-aware household ledger with credit-card billing cycles")
        .version(crate_version!())
        .subcommand(Command::new("init").about("Initialize the ledger database"))
        .subcommand(
            Command::new("owner")
                .about("Manage household members")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("color").long("color").value_name("HEX")),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("rm").arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage spending categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("color").long("color").value_name("HEX")),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("rm").arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("card")
                .about("Manage credit cards")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("owner")
                                .long("owner")
                                .required(true)
                                .help("Owner id or name"),
                        )
                        .arg(
                            Arg::new("closing-day")
                                .long("closing-day")
                                .required(true)
                                .value_parser(value_parser!(u32).range(1..=31))
                                .help("Invoice cutoff day; purchases on/after it bill next month"),
                        )
                        .arg(
                            Arg::new("due-day")
                                .long("due-day")
                                .required(true)
                                .value_parser(value_parser!(u32).range(1..=31)),
                        ),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("rm").arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and maintain transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a purchase or income, splitting installments")
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .required(true),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Total amount; split across installments when > 1"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .value_name("YYYY-MM-DD")
                                .help("Purchase date"),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("expense")
                                .help("income|expense"),
                        )
                        .arg(
                            Arg::new("method")
                                .long("method")
                                .default_value("cash")
                                .help("credit-card|pix|boleto|cash|debit-card"),
                        )
                        .arg(Arg::new("category").long("category").help("Category id or name"))
                        .arg(Arg::new("owner").long("owner").help("Owner id or name"))
                        .arg(
                            Arg::new("card")
                                .long("card")
                                .help("Card id or name; required for credit-card purchases"),
                        )
                        .arg(
                            Arg::new("installments")
                                .long("installments")
                                .default_value("1")
                                .value_parser(value_parser!(u32).range(1..=120))
                                .help("Number of monthly installments"),
                        )
                        .arg(
                            Arg::new("paid")
                                .long("paid")
                                .action(ArgAction::SetTrue)
                                .help("Mark as already settled"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("Filtered monthly view with totals")
                        .arg(month_arg())
                        .arg(
                            Arg::new("day")
                                .long("day")
                                .value_parser(value_parser!(u32).range(1..=31))
                                .help("Only entries billed on this day of the month"),
                        )
                        .arg(Arg::new("owner").long("owner").help("Owner id or name"))
                        .arg(Arg::new("card").long("card").help("Card id or name"))
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .default_value("all")
                                .help("all|paid|pending"),
                        )
                        .arg(
                            Arg::new("search")
                                .long("search")
                                .help("Match description, category or owner"),
                        )
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .default_value("date")
                                .help("date|description|category|amount"),
                        )
                        .arg(
                            Arg::new("direction")
                                .long("direction")
                                .help("asc|desc (defaults per sort key)"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Edit a transaction, optionally across its group")
                        .arg(id_arg())
                        .arg(scope_arg())
                        .arg(Arg::new("description").long("description"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .help("New per-installment amount"),
                        )
                        .arg(Arg::new("category").long("category").help("Category id or name"))
                        .arg(Arg::new("owner").long("owner").help("Owner id or name")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction, optionally across its group")
                        .arg(id_arg())
                        .arg(scope_arg()),
                )
                .subcommand(
                    Command::new("pay")
                        .about("Mark paid, optionally across the group")
                        .arg(id_arg())
                        .arg(scope_arg()),
                )
                .subcommand(
                    Command::new("unpay")
                        .about("Mark pending again, optionally across the group")
                        .arg(id_arg())
                        .arg(scope_arg()),
                ),
        )
        .subcommand(
            Command::new("invoice")
                .about("Credit-card invoice views")
                .subcommand(json_flags(
                    Command::new("show")
                        .arg(
                            Arg::new("card")
                                .long("card")
                                .required(true)
                                .help("Card id or name"),
                        )
                        .arg(month_arg())
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .default_value("all")
                                .help("all|paid|pending"),
                        ),
                ))
                .subcommand(
                    Command::new("pay")
                        .about("Settle every pending charge on the invoice")
                        .arg(
                            Arg::new("card")
                                .long("card")
                                .required(true)
                                .help("Card id or name"),
                        )
                        .arg(month_arg()),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Monthly summaries")
                .subcommand(json_flags(
                    Command::new("summary")
                        .arg(month_arg())
                        .arg(Arg::new("owner").long("owner").help("Owner id or name")),
                ))
                .subcommand(json_flags(
                    Command::new("by-category").arg(month_arg()),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export ledger data")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("out")
                                .long("out")
                                .required(true)
                                .value_name("FILE"),
                        )
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(month_arg()),
                ),
        )
        .subcommand(Command::new("doctor").about("Scan the ledger for integrity issues"))
}
