// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ledgest::cli;
use ledgest::commands::import;
use ledgest::store::SeenStore;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CHASE_PROFILE: &str = r#"
institution = "chase"
name = "Chase"
date_format = "%m/%d/%Y"
amount_invert = true
default_account = "Liabilities:CreditCard:Chase"

[columns]
date = "Transaction Date"
description = "Description"
amount = "Amount"
memo = "Memo"
"#;

const CHASE_CSV: &str = "Transaction Date,Post Date,Description,Category,Type,Amount,Memo\n\
02/15/2026,02/16/2026,TRADER JOE'S #123,Groceries,Sale,-42.50,\n\
02/14/2026,02/15/2026,AMAZON.COM,Shopping,Sale,-29.99,\n";

fn setup_root() -> TempDir {
    let root = TempDir::new().unwrap();
    let profiles = root
        .path()
        .join("import")
        .join("rules")
        .join("csv_profiles");
    fs::create_dir_all(&profiles).unwrap();
    fs::write(profiles.join("chase.toml"), CHASE_PROFILE).unwrap();
    root
}

fn run_import_csv(root: &Path, csv_path: &Path) {
    let matches = cli::build_cli().get_matches_from([
        "ledgest",
        "import",
        "csv",
        "--path",
        csv_path.to_str().unwrap(),
        "--profile",
        "chase",
        "--root",
        root.to_str().unwrap(),
    ]);
    if let Some(("import", sub)) = matches.subcommand() {
        import::handle(sub).unwrap();
    } else {
        panic!("import command not parsed");
    }
}

#[test]
fn csv_import_stages_canonicalized_transactions() {
    let root = setup_root();
    let csv_path = root.path().join("export.csv");
    fs::write(&csv_path, CHASE_CSV).unwrap();

    run_import_csv(root.path(), &csv_path);

    let staged = root
        .path()
        .join("journal")
        .join("staging")
        .join("chase_2026-02.journal");
    let content = fs::read_to_string(&staged).unwrap();
    assert_eq!(content.matches("fingerprint:").count(), 2);
    assert!(content.contains("$42.50"));
    assert!(content.contains("$29.99"));
    assert!(content.contains("2026-02-15"));
    assert!(content.contains("2026-02-14"));

    // canonical JSONL was appended for the run month
    let canonical_root = root.path().join("import").join("canonical");
    let month_dir = fs::read_dir(&canonical_root).unwrap().next().unwrap().unwrap();
    let jsonl = fs::read_to_string(month_dir.path().join("chase.jsonl")).unwrap();
    assert_eq!(jsonl.lines().count(), 2);

    // the raw export was archived content-addressed
    let raw_dir = root.path().join("import").join("raw").join("chase");
    assert!(raw_dir.exists());

    let seen = SeenStore::open(
        &root
            .path()
            .join("import")
            .join("state")
            .join("seen_transactions.sqlite"),
    )
    .unwrap();
    assert_eq!(seen.count().unwrap(), 2);
}

#[test]
fn reimporting_the_same_file_stages_nothing_new() {
    let root = setup_root();
    let csv_path = root.path().join("export.csv");
    fs::write(&csv_path, CHASE_CSV).unwrap();

    run_import_csv(root.path(), &csv_path);
    let staged = root
        .path()
        .join("journal")
        .join("staging")
        .join("chase_2026-02.journal");
    let first = fs::read_to_string(&staged).unwrap();

    run_import_csv(root.path(), &csv_path);
    let second = fs::read_to_string(&staged).unwrap();
    assert_eq!(first, second);

    let seen = SeenStore::open(
        &root
            .path()
            .join("import")
            .join("state")
            .join("seen_transactions.sqlite"),
    )
    .unwrap();
    assert_eq!(seen.count().unwrap(), 2);
}

#[test]
fn missing_profile_is_a_fatal_configuration_error() {
    let root = setup_root();
    let csv_path = root.path().join("export.csv");
    fs::write(&csv_path, CHASE_CSV).unwrap();

    let matches = cli::build_cli().get_matches_from([
        "ledgest",
        "import",
        "csv",
        "--path",
        csv_path.to_str().unwrap(),
        "--profile",
        "nonexistent",
        "--root",
        root.path().to_str().unwrap(),
    ]);
    if let Some(("import", sub)) = matches.subcommand() {
        let err = import::handle(sub).unwrap_err();
        assert!(err.to_string().contains("Profile not found"));
    } else {
        panic!("import command not parsed");
    }

    // no side effects before the failure
    assert!(!root.path().join("journal").exists());
}
