// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ledgest::fingerprint::{fingerprint, fingerprint_txn, normalize_payee};
use ledgest::models::CanonicalTransaction;

#[test]
fn normalize_payee_strips_and_lowercases() {
    assert_eq!(normalize_payee("  TRADER JOE'S #123  "), "trader joes 123");
    assert_eq!(normalize_payee("AMZN Mktp US*AB1CD2EF3"), "amzn mktp usab1cd2ef3");
}

#[test]
fn normalize_payee_collapses_whitespace_runs() {
    assert_eq!(normalize_payee("A   B\t C"), "a b c");
}

#[test]
fn normalize_payee_is_idempotent() {
    for raw in ["Some Merchant", "  TRADER JOE'S #123  ", "A   B\t C", ""] {
        assert_eq!(normalize_payee(&normalize_payee(raw)), normalize_payee(raw));
    }
}

#[test]
fn fingerprint_is_deterministic() {
    let fp1 = fingerprint("Liabilities:Chase", "2026-02-15", "42.50", "TRADER JOE'S", "");
    let fp2 = fingerprint("Liabilities:Chase", "2026-02-15", "42.50", "TRADER JOE'S", "");
    assert_eq!(fp1, fp2);
}

#[test]
fn fingerprint_changes_with_each_identity_field() {
    let base = fingerprint("Liabilities:Chase", "2026-02-15", "42.50", "Store", "t1");
    assert_ne!(
        base,
        fingerprint("Liabilities:Chase", "2026-02-15", "42.51", "Store", "t1")
    );
    assert_ne!(
        base,
        fingerprint("Liabilities:Chase", "2026-02-16", "42.50", "Store", "t1")
    );
    assert_ne!(
        base,
        fingerprint("Assets:Checking", "2026-02-15", "42.50", "Store", "t1")
    );
    assert_ne!(
        base,
        fingerprint("Liabilities:Chase", "2026-02-15", "42.50", "Other Store", "t1")
    );
    assert_ne!(
        base,
        fingerprint("Liabilities:Chase", "2026-02-15", "42.50", "Store", "t2")
    );
}

#[test]
fn fingerprint_ignores_payee_punctuation_and_case() {
    let fp1 = fingerprint("acc", "2026-01-01", "10.00", "TRADER JOE'S #123", "");
    let fp2 = fingerprint("acc", "2026-01-01", "10.00", "trader joes 123", "");
    assert_eq!(fp1, fp2);
}

#[test]
fn fingerprint_is_sha256_hex() {
    let fp = fingerprint("acc", "2026-01-01", "10.00", "payee", "");
    assert_eq!(fp.len(), 64);
    assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn memo_is_not_part_of_the_identity() {
    let base = CanonicalTransaction {
        date: "2026-02-15".to_string(),
        amount: "42.50".to_string(),
        payee: "Test Store".to_string(),
        memo: String::new(),
        account: "Liabilities:Chase".to_string(),
        source_id: "abc".to_string(),
        institution: "chase".to_string(),
    };
    let mut with_memo = base.clone();
    with_memo.memo = "order #42".to_string();
    assert_eq!(fingerprint_txn(&base), fingerprint_txn(&with_memo));
}
