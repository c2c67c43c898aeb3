// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Normalized transaction record, the common shape between every source
/// adapter and the journal writer. Serialized one JSON object per line as
/// the canonical interchange format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTransaction {
    /// YYYY-MM-DD
    pub date: String,
    /// Two-decimal string, positive = money leaving the source account
    pub amount: String,
    /// Raw payee text from the bank, uncleansed
    pub payee: String,
    pub memo: String,
    /// Source account path (e.g. Liabilities:CreditCard:Chase)
    pub account: String,
    /// Institution reference ID if available
    pub source_id: String,
    /// Source tag (e.g. "chase")
    pub institution: String,
}

impl CanonicalTransaction {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Serialize canonical transaction")
    }

    pub fn from_json(line: &str) -> Result<Self> {
        serde_json::from_str(line).context("Parse canonical transaction")
    }
}

/// Declarative description of one delimited-text source, loaded from a TOML
/// profile. Loaded once per ingestion run and never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceProfile {
    pub institution: String,
    pub name: String,
    #[serde(default)]
    pub csv: CsvOptions,
    /// Logical field -> source column header. With `has_header = false` the
    /// values are zero-based column indexes instead.
    pub columns: BTreeMap<String, String>,
    pub date_format: String,
    #[serde(default)]
    pub amount_invert: bool,
    pub default_account: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CsvOptions {
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub skip_rows: usize,
    #[serde(default = "default_true")]
    pub has_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            encoding: default_encoding(),
            delimiter: default_delimiter(),
            skip_rows: 0,
            has_header: true,
        }
    }
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_true() -> bool {
    true
}

impl SourceProfile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Read profile {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Parse profile {}", path.display()))
    }
}
