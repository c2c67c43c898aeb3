// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Promotion: moves staged journal files into permanent dated storage and
//! regenerates the top-level manifest.
//!
//! The run walks four states over the staging directory: Scanning (find the
//! months actually present in each staged file), Promoting (append each
//! file's content to its dated destinations), Finalizing (delete staged
//! files, rebuild the manifest wholesale), Posted. A staging file's name
//! month is only its creation-time bucket; re-partitioning happens here so
//! cross-month batches land in the right dated files. Finalizing is safe to
//! re-run after a partial promotion.

use anyhow::{Context, Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::utils::project_root;

static ENTRY_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-\d{2}\s").unwrap());

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let root = project_root(m.get_one::<String>("root").map(String::as_str));
    let dry_run = m.get_flag("dry-run");

    let staging_dir = root.join("journal").join("staging");
    let postings_dir = root.join("journal").join("postings");
    let main_journal = root.join("journal").join("main.journal");

    let staged = staged_files(&staging_dir)?;
    if staged.is_empty() {
        println!("No staged transactions to post.");
        return Ok(());
    }

    // Promotion must not run concurrently with another promotion of the
    // same staging directory; hold the lock from Scanning through
    // Finalizing. Dry runs mutate nothing, including the lock.
    let _lock = if dry_run {
        None
    } else {
        Some(PostLock::acquire(&staging_dir)?)
    };

    println!("Found {} staging file(s):", staged.len());

    // Scanning
    let mut moves: Vec<(PathBuf, PathBuf)> = Vec::new();
    for staged_file in &staged {
        let file_name = staged_file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let institution = institution_from_filename(file_name);
        for month in extract_months(staged_file)? {
            let year = &month[..4];
            let dest = postings_dir
                .join(year)
                .join(&month)
                .join(format!("{institution}.journal"));
            println!(
                "  {} -> {}",
                file_name,
                dest.strip_prefix(&root).unwrap_or(&dest).display()
            );
            moves.push((staged_file.clone(), dest));
        }
    }

    if dry_run {
        println!("\n[dry-run] No changes made.");
        return Ok(());
    }

    // Promoting: append-only, existing promoted content is preserved
    for (src, dest) in &moves {
        let parent = dest.parent().context("Posting path has no parent")?;
        fs::create_dir_all(parent)
            .with_context(|| format!("Create postings dir {}", parent.display()))?;
        let content = fs::read_to_string(src)
            .with_context(|| format!("Read staged file {}", src.display()))?;
        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dest)
            .with_context(|| format!("Open posting file {}", dest.display()))?;
        out.write_all(content.as_bytes())?;
    }

    // Finalizing
    for staged_file in &staged {
        fs::remove_file(staged_file)
            .with_context(|| format!("Remove staged file {}", staged_file.display()))?;
    }
    println!("\nRemoved {} staging file(s).", staged.len());

    rebuild_manifest(&main_journal, &postings_dir)?;
    println!("Updated {} includes.", main_journal.display());
    println!("\nDone. Transactions are now live in the ledger.");
    Ok(())
}

/// Staged `*.journal` files in sorted order; an absent directory means
/// nothing staged.
pub fn staged_files(staging_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !staging_dir.exists() {
        return Ok(files);
    }
    for entry in fs::read_dir(staging_dir)
        .with_context(|| format!("Read staging dir {}", staging_dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "journal") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Months (YYYY-MM) actually present in a staged file's entry headers.
pub fn extract_months(journal_path: &Path) -> Result<BTreeSet<String>> {
    let content = fs::read_to_string(journal_path)
        .with_context(|| format!("Read staged file {}", journal_path.display()))?;
    let mut months = BTreeSet::new();
    for line in content.lines() {
        if let Some(caps) = ENTRY_DATE.captures(line) {
            months.insert(format!("{}-{}", &caps[1], &caps[2]));
        }
    }
    Ok(months)
}

/// Institution tag from a staging filename like `chase_2026-02.journal`.
pub fn institution_from_filename(filename: &str) -> String {
    match filename.split_once('_') {
        Some((institution, _)) => institution.to_string(),
        None => filename.trim_end_matches(".journal").to_string(),
    }
}

/// Regenerate the manifest wholesale: one include directive per promoted
/// file in sorted path order. Idempotent, so a partially-promoted state
/// converges on the next run.
pub fn rebuild_manifest(main_journal: &Path, postings_dir: &Path) -> Result<()> {
    let mut files = Vec::new();
    collect_journals(postings_dir, &mut files)?;
    if files.is_empty() {
        return Ok(());
    }
    files.sort();

    let base = main_journal
        .parent()
        .context("Main journal has no parent directory")?;
    let mut content = String::from(
        "; Main ledger journal -- generated include list\n\
         ; DO NOT edit by hand -- run `ledgest post` to add transactions\n\n",
    );
    for file in &files {
        let rel = file.strip_prefix(base).unwrap_or(file);
        content.push_str(&format!("include {}\n", rel.display()));
    }
    fs::write(main_journal, content)
        .with_context(|| format!("Write manifest {}", main_journal.display()))?;
    Ok(())
}

fn collect_journals(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir).with_context(|| format!("Read dir {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            collect_journals(&path, out)?;
        } else if path.extension().is_some_and(|e| e == "journal") {
            out.push(path);
        }
    }
    Ok(())
}

struct PostLock {
    path: PathBuf,
}

impl PostLock {
    fn acquire(staging_dir: &Path) -> Result<Self> {
        let path = staging_dir.join(".post.lock");
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(Self { path }),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => bail!(
                "Another post run appears to be in progress (lock file {} exists); \
                 remove it if that run crashed",
                path.display()
            ),
            Err(err) => {
                Err(err).with_context(|| format!("Acquire post lock {}", path.display()))
            }
        }
    }
}

impl Drop for PostLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
