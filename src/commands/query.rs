// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Thin pass-through to the external hledger query engine. No state of its
//! own; the posted journal plus manifest is the whole interface.

use anyhow::{Context, Result, bail};
use std::io;
use std::path::Path;
use std::process::Command;

use crate::utils::project_root;

// Caps unbounded queries
const MAX_OUTPUT_LINES: usize = 500;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let (sub_name, sub) = match m.subcommand() {
        Some(pair) => pair,
        None => return Ok(()),
    };
    let root = project_root(sub.get_one::<String>("root").map(String::as_str));
    let journal = root.join("journal").join("main.journal");
    if !journal.exists() {
        bail!("Journal not found: {}", journal.display());
    }

    let mut args: Vec<String> = Vec::new();
    match sub_name {
        "balance" => {
            let account = sub.get_one::<String>("account").unwrap();
            args.extend(["bal".to_string(), account.clone(), "--tree".to_string()]);
            if let Some(period) = sub.get_one::<String>("period") {
                args.extend(["--period".to_string(), period.clone()]);
            }
        }
        "register" => {
            args.push("reg".to_string());
            if let Some(query) = sub.get_one::<String>("query") {
                args.push(query.clone());
            }
            if let Some(period) = sub.get_one::<String>("period") {
                args.extend(["--period".to_string(), period.clone()]);
            }
        }
        "stats" => args.push("stats".to_string()),
        _ => return Ok(()),
    }

    println!("{}", run_hledger(&journal, &args)?);
    Ok(())
}

pub fn run_hledger(journal: &Path, args: &[String]) -> Result<String> {
    let output = Command::new("hledger")
        .arg("-f")
        .arg(journal)
        .args(args)
        .output()
        .map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                anyhow::anyhow!("hledger not found. Install it to use query commands")
            } else {
                anyhow::Error::from(err).context("Run hledger")
            }
        })?;

    if !output.status.success() {
        bail!(
            "hledger failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let stdout = String::from_utf8(output.stdout).context("hledger output was not UTF-8")?;
    let lines: Vec<&str> = stdout.lines().collect();
    if lines.len() > MAX_OUTPUT_LINES {
        let mut capped = lines[..MAX_OUTPUT_LINES].join("\n");
        capped.push_str(&format!("\n... (truncated, {} total lines)", lines.len()));
        return Ok(capped);
    }
    Ok(stdout)
}
