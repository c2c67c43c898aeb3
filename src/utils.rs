// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use std::env;
use std::path::PathBuf;

/// Resolve the ledger project root: an explicit override wins, otherwise
/// walk up from the current directory to the first one containing
/// `journal/main.journal`, falling back to the current directory.
pub fn project_root(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut dir = cwd.clone();
    loop {
        if dir.join("journal").join("main.journal").exists() {
            return dir;
        }
        if !dir.pop() {
            return cwd;
        }
    }
}

/// Month bucket for a canonical date string; anything unparsable lands in
/// the `unknown` bucket.
pub fn month_key(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%Y-%m").to_string(),
        Err(_) => "unknown".to_string(),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}
