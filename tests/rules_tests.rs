// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ledgest::rules::{RuleSet, UNCATEGORIZED};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_rules(dir: &Path, payees: &str, accounts: &str) {
    fs::write(dir.join("payees.toml"), payees).unwrap();
    fs::write(dir.join("accounts.toml"), accounts).unwrap();
}

#[test]
fn empty_rules_pass_payee_through_uncategorized() {
    let rules = RuleSet::empty();
    let (clean, account) = rules.apply("RANDOM STORE");
    assert_eq!(clean, "RANDOM STORE");
    assert_eq!(account, UNCATEGORIZED);
}

#[test]
fn load_treats_missing_files_as_empty() {
    let dir = TempDir::new().unwrap();
    let rules = RuleSet::load(dir.path()).unwrap();
    assert!(rules.payee_rules().is_empty());
    assert!(rules.account_rules().is_empty());
}

#[test]
fn payee_rules_match_case_insensitively() {
    let dir = TempDir::new().unwrap();
    write_rules(
        dir.path(),
        "[[rules]]\npattern = \"^trader joe\"\nname = \"Trader Joe's\"\n",
        "",
    );
    let rules = RuleSet::load(dir.path()).unwrap();
    assert_eq!(rules.clean_payee("TRADER JOE'S #123"), "Trader Joe's");
    assert_eq!(rules.clean_payee("WALMART"), "WALMART");
}

#[test]
fn first_matching_rule_wins() {
    let rules = RuleSet::empty()
        .with_payee_rule("STORE", "First Match")
        .unwrap()
        .with_payee_rule("RANDOM STORE", "Second Match")
        .unwrap();
    assert_eq!(rules.clean_payee("RANDOM STORE"), "First Match");

    let rules = RuleSet::empty()
        .with_account_rule("Coffee", "Expenses:Coffee")
        .with_account_rule("Coffee", "Expenses:Dining");
    assert_eq!(rules.account_for("Coffee"), Some("Expenses:Coffee"));
}

#[test]
fn account_match_is_exact_and_case_insensitive() {
    let dir = TempDir::new().unwrap();
    write_rules(
        dir.path(),
        "[[rules]]\npattern = \"AMZN|AMAZON\"\nname = \"Amazon\"\n",
        "[[rules]]\npayee = \"amazon\"\naccount = \"Expenses:Shopping\"\n",
    );
    let rules = RuleSet::load(dir.path()).unwrap();
    let (clean, account) = rules.apply("AMZN Mktp US*123");
    assert_eq!(clean, "Amazon");
    assert_eq!(account, "Expenses:Shopping");

    // substring of the clean name must not match
    assert_eq!(rules.account_for("Amazon Fresh"), None);
}

#[test]
fn add_then_save_then_reload() {
    let dir = TempDir::new().unwrap();
    let rules = RuleSet::load(dir.path())
        .unwrap()
        .with_payee_rule("^NETFLIX", "Netflix")
        .unwrap()
        .with_account_rule("Netflix", "Expenses:Subscriptions");
    rules.save(dir.path()).unwrap();

    let reloaded = RuleSet::load(dir.path()).unwrap();
    let (clean, account) = reloaded.apply("NETFLIX.COM");
    assert_eq!(clean, "Netflix");
    assert_eq!(account, "Expenses:Subscriptions");
}

#[test]
fn save_rewrites_files_in_full() {
    let dir = TempDir::new().unwrap();
    write_rules(
        dir.path(),
        "[[rules]]\npattern = \"^OLD\"\nname = \"Old\"\n",
        "",
    );
    let rules = RuleSet::empty()
        .with_payee_rule("^NEW", "New")
        .unwrap();
    rules.save(dir.path()).unwrap();

    let raw = fs::read_to_string(dir.path().join("payees.toml")).unwrap();
    assert!(raw.contains("NEW"));
    assert!(!raw.contains("OLD"));
}

#[test]
fn invalid_pattern_in_file_fails_load() {
    let dir = TempDir::new().unwrap();
    write_rules(
        dir.path(),
        "[[rules]]\npattern = \"(?P<\"\nname = \"Broken\"\n",
        "",
    );
    let err = RuleSet::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid regex pattern"));
}
