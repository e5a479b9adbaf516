//! Distance command implementation.

use std::path::Path;

use anyhow::{bail, Result};
use colored::Colorize;
use imprint_core::hamming_distance;
use tracing::debug;

use crate::utils::fingerprint_file;

/// Resolve an argument to a perceptual hash: an existing file is
/// fingerprinted, anything else must be a bit string.
fn resolve_hash(arg: &str) -> Result<String> {
    let path = Path::new(arg);
    if path.is_file() {
        debug!(path = %path.display(), "Fingerprinting file argument");
        return Ok(fingerprint_file(path)?.perceptual_hash);
    }

    if arg.is_empty() || !arg.bytes().all(|b| b == b'0' || b == b'1') {
        bail!("Invalid perceptual hash '{arg}': expected an image path or a string of 0 and 1");
    }

    Ok(arg.to_string())
}

/// Execute the distance command.
pub fn execute(a: &str, b: &str, threshold: u32, quiet: bool) -> Result<()> {
    let left = resolve_hash(a)?;
    let right = resolve_hash(b)?;

    let distance = hamming_distance(&left, &right)?;
    let similar = distance <= threshold;

    if quiet {
        println!("{distance}");
        return Ok(());
    }

    println!("{} {}", "Hamming distance:".bold(), distance);
    if similar {
        println!(
            "   {} within threshold {} (same work)",
            "MATCH".green().bold(),
            threshold
        );
    } else {
        println!(
            "   {} beyond threshold {} (different works)",
            "DISTINCT".yellow().bold(),
            threshold
        );
    }

    Ok(())
}
