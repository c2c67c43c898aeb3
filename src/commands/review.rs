// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::rules::UNCATEGORIZED;
use crate::utils::{pretty_table, project_root};

use super::post::staged_files;

// "2026-02-15 Payee Name  ; fingerprint:abc123"
static ENTRY_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})\s+(.+?)(?:\s{2,};\s*fingerprint:(\S+))?$").unwrap()
});

#[derive(Debug, Clone)]
pub struct StagedEntry {
    pub date: String,
    pub payee: String,
    pub amount: String,
    pub expense_account: String,
    pub source_account: String,
    pub fingerprint: String,
    pub file: String,
}

/// Parse staged journal files back into structured rows for review.
pub fn parse_staged_entries(staging_dir: &Path) -> Result<Vec<StagedEntry>> {
    let mut entries = Vec::new();
    for journal_file in staged_files(staging_dir)? {
        let file_name = journal_file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let content = fs::read_to_string(&journal_file)
            .with_context(|| format!("Read staged file {}", journal_file.display()))?;
        let lines: Vec<&str> = content.lines().collect();

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i].trim_end();
            let Some(caps) = ENTRY_HEADER.captures(line) else {
                i += 1;
                continue;
            };
            let date = caps[1].to_string();
            let payee = caps[2].to_string();
            let fingerprint = caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default();

            let mut expense_account = String::new();
            let mut source_account = String::new();
            let mut amount = String::new();

            i += 1;
            while i < lines.len() && lines[i].starts_with("    ") {
                let posting = lines[i].trim();
                if let Some((account, amt)) = posting.rsplit_once('$') {
                    expense_account = account.trim().to_string();
                    amount = amt.trim().to_string();
                } else if !expense_account.is_empty() && source_account.is_empty() {
                    source_account = posting.to_string();
                }
                i += 1;
            }

            entries.push(StagedEntry {
                date,
                payee,
                amount,
                expense_account,
                source_account,
                fingerprint,
                file: file_name.clone(),
            });
        }
    }
    Ok(entries)
}

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let root = project_root(m.get_one::<String>("root").map(String::as_str));
    let only_uncategorized = m.get_flag("uncategorized");

    let staging_dir = root.join("journal").join("staging");
    let mut entries = parse_staged_entries(&staging_dir)?;
    if entries.is_empty() {
        println!("No staged transactions to review.");
        return Ok(());
    }

    let uncategorized = entries
        .iter()
        .filter(|e| e.expense_account == UNCATEGORIZED)
        .count();
    if only_uncategorized {
        entries.retain(|e| e.expense_account == UNCATEGORIZED);
    }

    println!("\nStaged transactions: {}", entries.len());
    println!("Uncategorized: {uncategorized}\n");

    let rows = entries
        .iter()
        .map(|e| {
            vec![
                e.date.clone(),
                e.payee.clone(),
                format!("${}", e.amount),
                e.expense_account.clone(),
                e.file.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Payee", "Amount", "Account", "File"], rows)
    );

    if uncategorized > 0 {
        println!(
            "\n{uncategorized} uncategorized transaction(s). Add rules with \
             'ledgest rules add-payee' and 'ledgest rules add-account', then re-import."
        );
    }
    println!("\nRun 'ledgest post' to finalize staged transactions into the ledger.");
    Ok(())
}
