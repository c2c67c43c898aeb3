// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn root_arg() -> Arg {
    Arg::new("root").long("root").help("Project root directory")
}

pub fn build_cli() -> Command {
    Command::new("ledgest")
        .version(crate_version!())
        .about("Bank-export ingestion pipeline for a plain-text ledger")
        .subcommand(
            Command::new("import")
                .about("Import bank transactions into the staging journal")
                .subcommand(
                    Command::new("csv")
                        .about("Import a bank CSV export using a source profile")
                        .arg(
                            Arg::new("path")
                                .long("path")
                                .short('f')
                                .required(true)
                                .help("CSV file to import"),
                        )
                        .arg(
                            Arg::new("profile")
                                .long("profile")
                                .short('p')
                                .required(true)
                                .help("Source profile name (e.g. chase, amex)"),
                        )
                        .arg(root_arg()),
                )
                .subcommand(
                    Command::new("simplefin")
                        .about("Pull settled transactions from the SimpleFIN bridge")
                        .arg(
                            Arg::new("days")
                                .long("days")
                                .default_value("30")
                                .help("How many days back to fetch"),
                        )
                        .arg(root_arg()),
                ),
        )
        .subcommand(
            Command::new("post")
                .about("Promote staged entries into dated storage and rebuild the manifest")
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Report intended moves without touching any file"),
                )
                .arg(root_arg()),
        )
        .subcommand(
            Command::new("review")
                .about("Review staged transactions before posting")
                .arg(
                    Arg::new("uncategorized")
                        .long("uncategorized")
                        .short('u')
                        .action(ArgAction::SetTrue)
                        .help("Show only uncategorized transactions"),
                )
                .arg(root_arg()),
        )
        .subcommand(
            Command::new("rules")
                .about("Manage payee and account categorization rules")
                .subcommand(
                    Command::new("add-payee")
                        .about("Add a payee cleanup rule")
                        .arg(
                            Arg::new("pattern")
                                .long("pattern")
                                .required(true)
                                .help("Case-insensitive regex matched against the raw payee"),
                        )
                        .arg(
                            Arg::new("name")
                                .long("name")
                                .required(true)
                                .help("Clean payee name"),
                        )
                        .arg(root_arg()),
                )
                .subcommand(
                    Command::new("add-account")
                        .about("Add an account categorization rule")
                        .arg(
                            Arg::new("payee")
                                .long("payee")
                                .required(true)
                                .help("Clean payee name to match"),
                        )
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .help("Expense account path"),
                        )
                        .arg(root_arg()),
                )
                .subcommand(Command::new("list").about("List all rules").arg(root_arg())),
        )
        .subcommand(
            Command::new("query")
                .about("Query the posted ledger through hledger")
                .subcommand(
                    Command::new("balance")
                        .about("Account balances, optionally for a period")
                        .arg(Arg::new("period").help("Period such as 2026-02"))
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .short('a')
                                .default_value("expenses")
                                .help("Account to query"),
                        )
                        .arg(root_arg()),
                )
                .subcommand(
                    Command::new("register")
                        .about("Transaction register with optional filters")
                        .arg(Arg::new("query").help("Free-form hledger query"))
                        .arg(Arg::new("period").long("period").short('p'))
                        .arg(root_arg()),
                )
                .subcommand(
                    Command::new("stats")
                        .about("Journal statistics")
                        .arg(root_arg()),
                ),
        )
}
