//! Claim command implementation.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use tracing::info;

use super::post_to_registry;
use crate::utils::{fingerprint_file, format_timestamp};

/// Execute the claim command.
pub async fn execute(
    file: PathBuf,
    claimant: String,
    claim_type: Option<String>,
    evidence: Option<u32>,
    server: String,
    quiet: bool,
) -> Result<()> {
    let fingerprint = fingerprint_file(&file)?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let mut body = json!({
        "claimant": claimant,
        "exactHash": fingerprint.exact_hash,
        "perceptualHash": fingerprint.perceptual_hash,
        "fileName": file_name,
    });
    if let Some(claim_type) = claim_type {
        body["claimType"] = json!(claim_type);
    }
    if let Some(evidence) = evidence {
        body["evidenceCount"] = json!(evidence);
    }

    let (_, response) = post_to_registry(&server, "/claim", &body).await?;
    info!(outcome = %response["status"], "Claim answered");

    if quiet {
        return Ok(());
    }

    println!();
    if response["status"] == "resolved" {
        let same_user = response["sameUser"].as_bool().unwrap_or(false);
        let owner = response["originalOwner"].as_str().unwrap_or_default();

        if same_user {
            println!("{} {}", "Original owner:".bold(), owner.green().bold());
        } else {
            println!("{} {}", "Original owner:".bold(), owner.yellow().bold());
        }
        println!(
            "   {} {}",
            "Matched:".dimmed(),
            response["matchedFile"].as_str().unwrap_or_default()
        );
        println!("   {} {}", "Distance:".dimmed(), response["distance"]);
        println!(
            "   {} {}",
            "Registered:".dimmed(),
            format_timestamp(&response["registeredAt"])
        );
        println!(
            "   {} {} ({} document(s))",
            "Claim:".dimmed(),
            response["claimType"].as_str().unwrap_or_default(),
            response["evidenceCount"]
        );
    } else {
        println!("{}", "No prior registration found".dimmed());
    }

    if let Some(message) = response["message"].as_str() {
        println!();
        println!("   {}", message);
    }

    Ok(())
}
