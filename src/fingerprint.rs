// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::models::CanonicalTransaction;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());
static WS_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a payee string for consistent fingerprinting: trim, lowercase,
/// drop everything outside `[a-z0-9 ]`, collapse whitespace runs. Idempotent.
pub fn normalize_payee(raw_payee: &str) -> String {
    let s = raw_payee.trim().to_lowercase();
    let s = NON_ALNUM.replace_all(&s, "");
    let s = WS_RUNS.replace_all(&s, " ");
    s.trim().to_string()
}

/// Stable identity digest for one economic event.
///
/// The five inputs are joined with `|` (payee normalized first) and hashed
/// with SHA-256; the hex digest is returned. The memo field is deliberately
/// not part of the identity.
pub fn fingerprint(account: &str, date: &str, amount: &str, payee: &str, source_id: &str) -> String {
    let normalized = normalize_payee(payee);
    let parts = format!("{account}|{date}|{amount}|{normalized}|{source_id}");
    let mut hasher = Sha256::new();
    hasher.update(parts.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn fingerprint_txn(txn: &CanonicalTransaction) -> String {
    fingerprint(
        &txn.account,
        &txn.date,
        &txn.amount,
        &txn.payee,
        &txn.source_id,
    )
}
