// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Delimited-text source adapter: parses institution-specific exports into
//! canonical transactions using a declarative profile. Malformed rows (bad
//! date or amount) are skipped, not errors; trailing junk rows are common in
//! bank exports.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::models::{CanonicalTransaction, SourceProfile};

/// Parse one export file with the given profile. Returns zero or more
/// canonical transactions; rows that cannot be canonicalized are dropped.
pub fn normalize_csv(path: &Path, profile: &SourceProfile) -> Result<Vec<CanonicalTransaction>> {
    let bytes = fs::read(path).with_context(|| format!("Read CSV {}", path.display()))?;
    let content = String::from_utf8_lossy(&bytes);

    let mut lines: Vec<&str> = content.lines().collect();
    if profile.csv.skip_rows > 0 {
        let skip = profile.csv.skip_rows.min(lines.len());
        lines.drain(..skip);
    }
    let body = lines.join("\n");

    let delimiter = profile.csv.delimiter.as_bytes().first().copied().unwrap_or(b',');
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(profile.csv.has_header)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = if profile.csv.has_header {
        rdr.headers()
            .context("Read CSV header row")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect()
    } else {
        Vec::new()
    };

    let col = |field: &str| -> Option<usize> {
        let name = profile.columns.get(field)?;
        if profile.csv.has_header {
            headers.iter().position(|h| h == name)
        } else {
            name.parse::<usize>().ok()
        }
    };
    let date_col = col("date");
    let amount_col = col("amount");
    let description_col = col("description");
    let memo_col = col("memo");
    let reference_col = col("reference");

    let mut transactions = Vec::new();
    for record in rdr.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => continue,
        };

        let date_str = get_field(&record, date_col);
        if date_str.is_empty() {
            continue;
        }
        let parsed_date = match NaiveDate::parse_from_str(&date_str, &profile.date_format) {
            Ok(d) => d,
            Err(_) => continue,
        };

        let raw_amount = match amount_col {
            Some(i) => record.get(i).unwrap_or("0").trim().to_string(),
            None => "0".to_string(),
        };
        let mut amount = match raw_amount.replace(',', "").parse::<Decimal>() {
            Ok(a) => a,
            Err(_) => continue,
        };
        if profile.amount_invert {
            amount = -amount;
        }

        transactions.push(CanonicalTransaction {
            date: parsed_date.format("%Y-%m-%d").to_string(),
            amount: format!("{:.2}", amount.round_dp(2)),
            payee: get_field(&record, description_col),
            memo: get_field(&record, memo_col),
            account: profile.default_account.clone(),
            source_id: get_field(&record, reference_col),
            institution: profile.institution.clone(),
        });
    }

    Ok(transactions)
}

fn get_field(record: &StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| record.get(i)).unwrap_or("").trim().to_string()
}

/// Append canonical transactions as JSONL, creating parent directories.
pub fn write_canonical(transactions: &[CanonicalTransaction], output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Create canonical dir {}", parent.display()))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_path)
        .with_context(|| format!("Open canonical file {}", output_path.display()))?;
    for txn in transactions {
        writeln!(file, "{}", txn.to_json()?)?;
    }
    Ok(())
}
