//! Fingerprint command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::utils::{fingerprint_file, short_hash};

/// Execute the fingerprint command.
pub fn execute(file: PathBuf, json: bool, quiet: bool) -> Result<()> {
    let fingerprint = fingerprint_file(&file)?;

    if json {
        let output =
            serde_json::to_string_pretty(&fingerprint).context("Failed to serialize fingerprint")?;
        println!("{output}");
        return Ok(());
    }

    if quiet {
        println!("{}", fingerprint.exact_hash);
        return Ok(());
    }

    let ones = fingerprint
        .perceptual_hash
        .bytes()
        .filter(|b| *b == b'1')
        .count();

    println!();
    println!("{} {}", "Fingerprint:".bold(), file.display());
    println!("   {} {}", "Exact hash:".dimmed(), fingerprint.exact_hash.cyan());
    println!(
        "   {} {}... ({} bits, {} set)",
        "Perceptual:".dimmed(),
        short_hash(&fingerprint.perceptual_hash),
        fingerprint.perceptual_hash.len(),
        ones
    );

    Ok(())
}
