// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use crate::rules::RuleSet;
use crate::utils::{pretty_table, project_root};

fn rules_dir(m: &clap::ArgMatches) -> PathBuf {
    project_root(m.get_one::<String>("root").map(String::as_str))
        .join("import")
        .join("rules")
}

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add-payee", sub)) => {
            let pattern = sub.get_one::<String>("pattern").unwrap().trim();
            let name = sub.get_one::<String>("name").unwrap().trim();
            let dir = rules_dir(sub);
            let rules = RuleSet::load(&dir)?.with_payee_rule(pattern, name)?;
            rules.save(&dir)?;
            println!("Added payee rule: /{}/ -> {}", pattern, name);
        }
        Some(("add-account", sub)) => {
            let payee = sub.get_one::<String>("payee").unwrap().trim();
            let account = sub.get_one::<String>("account").unwrap().trim();
            let dir = rules_dir(sub);
            let rules = RuleSet::load(&dir)?.with_account_rule(payee, account);
            rules.save(&dir)?;
            println!("Added account rule: {} -> {}", payee, account);
        }
        Some(("list", sub)) => {
            let rules = RuleSet::load(&rules_dir(sub))?;
            let mut rows = Vec::new();
            for rule in rules.payee_rules() {
                rows.push(vec![
                    "payee".to_string(),
                    format!("/{}/", rule.pattern),
                    rule.name.clone(),
                ]);
            }
            for rule in rules.account_rules() {
                rows.push(vec![
                    "account".to_string(),
                    rule.payee.clone(),
                    rule.account.clone(),
                ]);
            }
            println!("{}", pretty_table(&["Kind", "Match", "Target"], rows));
        }
        _ => {}
    }
    Ok(())
}
