//! Fingerprints computed from raw image bytes.
//!
//! # Algorithm
//!
//! - Exact hash: SHA3-256 of the file bytes, lowercase hex (64 chars).
//! - Perceptual hash: average hash over a 32x32 RGB thumbnail. Each pixel's
//!   channel mean is compared to the mean over all pixels; brighter pixels
//!   become `'1'`, the rest `'0'`, giving a 1024-character bit string.
//!
//! Re-encoding, mild compression and resizing flip only a few bits of the
//! perceptual hash, so near-duplicates land within the similarity threshold.
//!
//! # Usage
//!
//! ```no_run
//! use imprint_core::fingerprint::Fingerprint;
//!
//! let bytes = std::fs::read("cat.png").unwrap();
//! let fingerprint = Fingerprint::from_bytes(&bytes).unwrap();
//! assert_eq!(fingerprint.perceptual_hash.len(), 1024);
//! ```

use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

use crate::error::{RegistryError, Result};

/// Side length of the thumbnail the perceptual hash is computed on.
pub const HASH_GRID_SIZE: u32 = 32;

/// Perceptual hash length in bits (one character per bit).
pub const PERCEPTUAL_HASH_BITS: usize = (HASH_GRID_SIZE * HASH_GRID_SIZE) as usize;

/// Exact and perceptual hash of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    pub exact_hash: String,
    pub perceptual_hash: String,
}

impl Fingerprint {
    /// Fingerprint encoded image bytes (JPEG, PNG, GIF or WebP).
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data)
            .map_err(|e| RegistryError::Fingerprint(format!("Failed to decode image: {e}")))?;

        Ok(Self {
            exact_hash: exact_hash(data),
            perceptual_hash: perceptual_hash(&image),
        })
    }

    /// Check if the bytes look like a supported image format.
    pub fn is_supported_format(data: &[u8]) -> bool {
        image::guess_format(data).is_ok()
    }
}

/// SHA3-256 of `data` as lowercase hex.
pub fn exact_hash(data: &[u8]) -> String {
    hex::encode(Sha3_256::digest(data))
}

/// Average hash of an image as a bit string.
pub fn perceptual_hash(image: &DynamicImage) -> String {
    let thumbnail = image
        .resize_exact(HASH_GRID_SIZE, HASH_GRID_SIZE, FilterType::Triangle)
        .to_rgb8();

    let values: Vec<f64> = thumbnail
        .pixels()
        .map(|pixel| {
            let [r, g, b] = pixel.0;
            (f64::from(r) + f64::from(g) + f64::from(b)) / 3.0
        })
        .collect();

    let mean = values.iter().sum::<f64>() / values.len() as f64;

    values
        .iter()
        .map(|&value| if value > mean { '1' } else { '0' })
        .collect()
}
