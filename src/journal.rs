// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Staging writer: converts canonical transactions into ledger entry text
//! and appends them to per-source, per-month staging files, skipping
//! fingerprints the seen store already knows.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::fingerprint::fingerprint_txn;
use crate::models::CanonicalTransaction;
use crate::rules::RuleSet;
use crate::store::SeenStore;
use crate::utils::month_key;

/// Render one ledger entry. The fingerprint rides along as a comment so a
/// duplicate written during a crash window stays detectable by inspection.
///
/// ```text
/// 2026-02-15 Trader Joe's  ; fingerprint:<64-hex>
///     Expenses:Groceries    $42.50
///     Liabilities:CreditCard:Chase
/// ```
pub fn format_entry(
    date: &str,
    payee: &str,
    expense_account: &str,
    source_account: &str,
    amount: &str,
    fp: &str,
) -> String {
    format!(
        "{date} {payee}  ; fingerprint:{fp}\n    {expense_account}    ${amount}\n    {source_account}\n"
    )
}

/// Write a batch to staging. Already-seen fingerprints are skipped as
/// duplicates, not errors. Entries are grouped by `(institution, month)`;
/// a transaction whose date does not parse lands in the `unknown` bucket
/// rather than being dropped. Fingerprints are marked seen after all file
/// appends so a retry after a crash re-stages at most the tail batch.
///
/// Returns per-institution counts of newly written entries; all-zero means
/// nothing new.
pub fn write_staging(
    transactions: &[CanonicalTransaction],
    rules: &RuleSet,
    seen: &SeenStore,
    staging_dir: &Path,
) -> Result<BTreeMap<String, u32>> {
    fs::create_dir_all(staging_dir)
        .with_context(|| format!("Create staging dir {}", staging_dir.display()))?;

    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut written: Vec<(String, String)> = Vec::new();
    let mut batch_seen: HashSet<String> = HashSet::new();
    let mut stats: BTreeMap<String, u32> = BTreeMap::new();

    for txn in transactions {
        let fp = fingerprint_txn(txn);
        if batch_seen.contains(&fp) || seen.is_seen(&fp)? {
            continue;
        }

        let (clean_payee, expense_account) = rules.apply(&txn.payee);
        let entry = format_entry(
            &txn.date,
            &clean_payee,
            &expense_account,
            &txn.account,
            &txn.amount,
            &fp,
        );

        let file_key = format!("{}_{}", txn.institution, month_key(&txn.date));
        grouped.entry(file_key).or_default().push(entry);
        batch_seen.insert(fp.clone());
        written.push((fp, txn.institution.clone()));
        *stats.entry(txn.institution.clone()).or_insert(0) += 1;
    }

    for (file_key, entries) in &grouped {
        let path = staging_dir.join(format!("{file_key}.journal"));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Open staging file {}", path.display()))?;
        for entry in entries {
            // entry text ends with a newline; one more leaves a blank line
            // between entries
            writeln!(file, "{entry}")?;
        }
    }

    for (fp, institution) in &written {
        seen.mark_seen(fp, institution)?;
    }

    Ok(stats)
}
