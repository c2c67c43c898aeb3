// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Payee normalization and account categorization rules.
//!
//! Rules live in two user-editable TOML files, `payees.toml` and
//! `accounts.toml`, each an ordered list evaluated first-match-wins. A
//! `RuleSet` is an explicit value owned by the caller: additions are pure
//! transforms and persistence is a separate whole-file rewrite.

use anyhow::{Context, Result, anyhow};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const UNCATEGORIZED: &str = "Expenses:Uncategorized";

const PAYEES_FILE: &str = "payees.toml";
const ACCOUNTS_FILE: &str = "accounts.toml";

/// Case-insensitive regex match against the raw bank payee.
#[derive(Debug, Clone)]
pub struct PayeeRule {
    pub pattern: String,
    pub name: String,
    regex: Regex,
}

/// Case-insensitive exact match against the cleaned payee name.
#[derive(Debug, Clone)]
pub struct AccountRule {
    pub payee: String,
    pub account: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PayeeRuleDoc {
    pattern: String,
    name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountRuleDoc {
    payee: String,
    account: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PayeesFile {
    #[serde(default)]
    rules: Vec<PayeeRuleDoc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AccountsFile {
    #[serde(default)]
    rules: Vec<AccountRuleDoc>,
}

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    payee_rules: Vec<PayeeRule>,
    account_rules: Vec<AccountRule>,
}

impl RuleSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load both rule files from `dir`. Missing files mean empty lists.
    /// Patterns are compiled eagerly so a bad rule fails the run up front
    /// instead of surfacing mid-batch.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut set = RuleSet::empty();

        let payees_path = dir.join(PAYEES_FILE);
        if payees_path.exists() {
            let raw = fs::read_to_string(&payees_path)
                .with_context(|| format!("Read {}", payees_path.display()))?;
            let doc: PayeesFile = toml::from_str(&raw)
                .with_context(|| format!("Parse {}", payees_path.display()))?;
            for rule in doc.rules {
                set = set.with_payee_rule(&rule.pattern, &rule.name)?;
            }
        }

        let accounts_path = dir.join(ACCOUNTS_FILE);
        if accounts_path.exists() {
            let raw = fs::read_to_string(&accounts_path)
                .with_context(|| format!("Read {}", accounts_path.display()))?;
            let doc: AccountsFile = toml::from_str(&raw)
                .with_context(|| format!("Parse {}", accounts_path.display()))?;
            for rule in doc.rules {
                set = set.with_account_rule(&rule.payee, &rule.account);
            }
        }

        Ok(set)
    }

    /// Append a payee rule, compiling its pattern. Does not persist.
    pub fn with_payee_rule(mut self, pattern: &str, name: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|err| anyhow!("Invalid regex pattern '{}': {}", pattern, err))?;
        self.payee_rules.push(PayeeRule {
            pattern: pattern.to_string(),
            name: name.to_string(),
            regex,
        });
        Ok(self)
    }

    /// Append an account rule. Does not persist.
    pub fn with_account_rule(mut self, payee: &str, account: &str) -> Self {
        self.account_rules.push(AccountRule {
            payee: payee.to_string(),
            account: account.to_string(),
        });
        self
    }

    /// Apply payee rules in file order; the first match's clean name wins.
    /// No match passes the raw payee through unchanged.
    pub fn clean_payee(&self, raw_payee: &str) -> String {
        for rule in &self.payee_rules {
            if rule.regex.is_match(raw_payee) {
                return rule.name.clone();
            }
        }
        raw_payee.to_string()
    }

    /// Find the expense account for a cleaned payee name, first match wins.
    pub fn account_for(&self, clean_payee: &str) -> Option<&str> {
        self.account_rules
            .iter()
            .find(|rule| rule.payee.eq_ignore_ascii_case(clean_payee))
            .map(|rule| rule.account.as_str())
    }

    /// Apply both stages. Unmatched clean payees land in the sentinel
    /// uncategorized account.
    pub fn apply(&self, raw_payee: &str) -> (String, String) {
        let clean = self.clean_payee(raw_payee);
        let account = self
            .account_for(&clean)
            .unwrap_or(UNCATEGORIZED)
            .to_string();
        (clean, account)
    }

    pub fn payee_rules(&self) -> &[PayeeRule] {
        &self.payee_rules
    }

    pub fn account_rules(&self) -> &[AccountRule] {
        &self.account_rules
    }

    /// Serialize the full current rule set back to both files, overwriting
    /// them wholesale.
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).with_context(|| format!("Create rules dir {}", dir.display()))?;

        let payees = PayeesFile {
            rules: self
                .payee_rules
                .iter()
                .map(|r| PayeeRuleDoc {
                    pattern: r.pattern.clone(),
                    name: r.name.clone(),
                })
                .collect(),
        };
        let payees_path = dir.join(PAYEES_FILE);
        fs::write(&payees_path, toml::to_string_pretty(&payees)?)
            .with_context(|| format!("Write {}", payees_path.display()))?;

        let accounts = AccountsFile {
            rules: self
                .account_rules
                .iter()
                .map(|r| AccountRuleDoc {
                    payee: r.payee.clone(),
                    account: r.account.clone(),
                })
                .collect(),
        };
        let accounts_path = dir.join(ACCOUNTS_FILE);
        fs::write(&accounts_path, toml::to_string_pretty(&accounts)?)
            .with_context(|| format!("Write {}", accounts_path.display()))?;

        Ok(())
    }
}
