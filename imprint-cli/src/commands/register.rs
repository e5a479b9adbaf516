//! Register command implementation.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use tracing::info;

use super::post_to_registry;
use crate::utils::{device_fingerprint, fingerprint_file, format_timestamp, short_hash};

/// Execute the register command.
pub async fn execute(
    file: PathBuf,
    owner: String,
    code: String,
    device: Option<String>,
    server: String,
    quiet: bool,
) -> Result<()> {
    let fingerprint = fingerprint_file(&file)?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let body = json!({
        "owner": owner,
        "exactHash": fingerprint.exact_hash,
        "perceptualHash": fingerprint.perceptual_hash,
        "fileName": file_name,
        "deviceFingerprint": device.unwrap_or_else(device_fingerprint),
        "verificationCode": code,
    });

    let (status, response) = post_to_registry(&server, "/register", &body).await?;
    info!(status, outcome = %response["status"], "Registration answered");

    if quiet {
        return Ok(());
    }

    println!();
    if response["status"] == "minted" {
        println!("{}", "╔════════════════════════════════════════╗".green());
        println!(
            "{}",
            "║              REGISTERED                ║".green().bold()
        );
        println!("{}", "╚════════════════════════════════════════╝".green());
        println!();
        println!("   {} {}", "Record:".dimmed(), response["id"]);
        println!("   {} {}", "Owner:".dimmed(), owner);
        println!(
            "   {} {}...",
            "Exact hash:".dimmed(),
            short_hash(&fingerprint.exact_hash)
        );
        println!(
            "   {} {}",
            "Registered:".dimmed(),
            format_timestamp(&response["createdAt"])
        );
        if let Some(notifiers) = response["notifications"]["notifiers"].as_array() {
            let names: Vec<&str> = notifiers.iter().filter_map(|n| n.as_str()).collect();
            if !names.is_empty() {
                println!("   {} {}", "Notifying:".dimmed(), names.join(", "));
            }
        }
    } else {
        println!("{}", "╔════════════════════════════════════════╗".yellow());
        println!(
            "{}",
            "║          ALREADY REGISTERED            ║".yellow().bold()
        );
        println!("{}", "╚════════════════════════════════════════╝".yellow());
        println!();
        println!(
            "   {} {}",
            "Owner:".dimmed(),
            response["owner"].as_str().unwrap_or_default().bold()
        );
        println!(
            "   {} {} ({})",
            "Matched:".dimmed(),
            response["matchedFile"].as_str().unwrap_or_default(),
            response["matchKind"].as_str().unwrap_or_default()
        );
        if let Some(distance) = response["distance"].as_u64() {
            println!("   {} {}", "Distance:".dimmed(), distance);
        }
        println!(
            "   {} {}",
            "Registered:".dimmed(),
            format_timestamp(&response["registeredAt"])
        );
    }

    if let Some(message) = response["message"].as_str() {
        println!();
        println!("   {}", message);
    }

    Ok(())
}
