// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::canonical::{normalize_csv, write_canonical};
use crate::journal::write_staging;
use crate::models::{CanonicalTransaction, SourceProfile};
use crate::rules::RuleSet;
use crate::simplefin::{self, SimpleFinClient};
use crate::store::SeenStore;
use crate::utils::project_root;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("csv", sub)) => import_csv(sub),
        Some(("simplefin", sub)) => import_simplefin(sub),
        _ => Ok(()),
    }
}

fn import_csv(sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let profile_name = sub.get_one::<String>("profile").unwrap().trim();
    let root = project_root(sub.get_one::<String>("root").map(String::as_str));

    let profile_path = root
        .join("import")
        .join("rules")
        .join("csv_profiles")
        .join(format!("{profile_name}.toml"));
    if !profile_path.exists() {
        bail!("Profile not found: {}", profile_path.display());
    }
    let profile = SourceProfile::load(&profile_path)?;

    let csv_path = PathBuf::from(path);
    println!(
        "Importing {} with profile '{}'...",
        csv_path.display(),
        profile_name
    );

    let month_dir = Utc::now().format("%Y-%m").to_string();
    archive_raw(&root, profile_name, &csv_path, &month_dir)?;

    let transactions = normalize_csv(&csv_path, &profile)?;
    println!("  Parsed {} transactions", transactions.len());
    if transactions.is_empty() {
        println!("  No transactions found.");
        return Ok(());
    }

    let canonical_path = root
        .join("import")
        .join("canonical")
        .join(&month_dir)
        .join(format!("{profile_name}.jsonl"));
    write_canonical(&transactions, &canonical_path)?;

    stage(&root, &transactions)
}

fn import_simplefin(sub: &clap::ArgMatches) -> Result<()> {
    let days: i64 = sub
        .get_one::<String>("days")
        .unwrap()
        .trim()
        .parse()
        .context("Invalid --days value")?;
    let root = project_root(sub.get_one::<String>("root").map(String::as_str));

    let state_dir = root.join("import").join("state");
    let access_url = simplefin::load_access_url(&state_dir)?.ok_or_else(|| {
        anyhow!(
            "SimpleFIN is not configured; save an access URL to {}",
            state_dir.join("simplefin_access.json").display()
        )
    })?;

    let client = SimpleFinClient::new(&access_url)?;
    let end = Utc::now().timestamp();
    let start = end - days * 86_400;
    let accounts = client.accounts_windowed(start, end)?;
    let transactions = simplefin::to_canonical(&accounts);
    println!(
        "Fetched {} settled transactions across {} account(s)",
        transactions.len(),
        accounts.len()
    );
    if transactions.is_empty() {
        return Ok(());
    }

    // Canonical JSONL per institution for this run's month bucket
    let month_dir = Utc::now().format("%Y-%m").to_string();
    let mut by_institution: BTreeMap<&str, Vec<CanonicalTransaction>> = BTreeMap::new();
    for txn in &transactions {
        by_institution
            .entry(txn.institution.as_str())
            .or_default()
            .push(txn.clone());
    }
    for (institution, batch) in &by_institution {
        let canonical_path = root
            .join("import")
            .join("canonical")
            .join(&month_dir)
            .join(format!("{institution}.jsonl"));
        write_canonical(batch, &canonical_path)?;
    }

    stage(&root, &transactions)
}

/// Keep a content-addressed copy of the raw export so imports are auditable
/// after the original download is gone.
fn archive_raw(root: &Path, profile_name: &str, csv_path: &Path, month_dir: &str) -> Result<()> {
    let bytes =
        fs::read(csv_path).with_context(|| format!("Read CSV {}", csv_path.display()))?;
    let digest = format!("{:x}", Sha256::digest(&bytes));
    let short: String = digest.chars().take(16).collect();

    let raw_dir = root
        .join("import")
        .join("raw")
        .join(profile_name)
        .join(month_dir);
    fs::create_dir_all(&raw_dir)
        .with_context(|| format!("Create archive dir {}", raw_dir.display()))?;
    let archive_path = raw_dir.join(format!("sha256_{short}.csv"));
    if !archive_path.exists() {
        fs::copy(csv_path, &archive_path)
            .with_context(|| format!("Archive to {}", archive_path.display()))?;
        println!("  Archived to {}", archive_path.display());
    }
    Ok(())
}

/// Shared tail of both import paths: open rules and the seen store, write
/// staging entries, report counts. The store must open before any staging
/// write is attempted.
fn stage(root: &Path, transactions: &[CanonicalTransaction]) -> Result<()> {
    let rules = RuleSet::load(&root.join("import").join("rules"))?;
    let seen = SeenStore::open(
        &root
            .join("import")
            .join("state")
            .join("seen_transactions.sqlite"),
    )?;

    let staging_dir = root.join("journal").join("staging");
    let stats = write_staging(transactions, &rules, &seen, &staging_dir)?;

    let total: u32 = stats.values().sum();
    if total == 0 {
        println!("  No new transactions (all duplicates)");
    } else {
        println!("  Wrote {} new transactions to staging/", total);
        for (institution, count) in &stats {
            println!("    {institution}: {count}");
        }
    }
    println!("Done. Run 'ledgest review' to review staged transactions.");
    Ok(())
}
