// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use ledgest::{cli, commands};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("import", sub)) => commands::import::handle(sub)?,
        Some(("post", sub)) => commands::post::handle(sub)?,
        Some(("review", sub)) => commands::review::handle(sub)?,
        Some(("rules", sub)) => commands::rules::handle(sub)?,
        Some(("query", sub)) => commands::query::handle(sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
