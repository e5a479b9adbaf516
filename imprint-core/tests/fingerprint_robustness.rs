//! Robustness tests for image fingerprints.
//!
//! Common transformations (re-encoding, resizing) must keep the perceptual
//! hash within the registry's similarity threshold while changing the exact
//! hash.

#![cfg(feature = "codec")]

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imprint_core::{hamming_distance, Fingerprint, Registry, Submission, DEFAULT_SIMILARITY_THRESHOLD};

/// 256x256 checkerboard of 64px squares, aligned with the 32x32 hash grid.
fn create_test_image() -> RgbImage {
    RgbImage::from_fn(256, 256, |x, y| {
        if (x / 64 + y / 64) % 2 == 0 {
            Rgb([25, 30, 35])
        } else {
            Rgb([220, 215, 210])
        }
    })
}

fn inverted(img: &RgbImage) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let Rgb([r, g, b]) = *img.get_pixel(x, y);
        Rgb([255 - r, 255 - g, 255 - b])
    })
}

fn encode_png(img: &DynamicImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)
        .expect("PNG encoding failed");
    buffer.into_inner()
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    img.write_with_encoder(encoder)
        .expect("JPEG encoding failed");
    buffer.into_inner()
}

fn distance(a: &Fingerprint, b: &Fingerprint) -> u32 {
    hamming_distance(&a.perceptual_hash, &b.perceptual_hash).expect("comparable hashes")
}

#[test]
fn test_jpeg_reencode_stays_within_threshold() {
    let original = DynamicImage::ImageRgb8(create_test_image());
    let png = Fingerprint::from_bytes(&encode_png(&original)).unwrap();
    let jpeg = Fingerprint::from_bytes(&encode_jpeg(&original, 85)).unwrap();

    assert_ne!(png.exact_hash, jpeg.exact_hash);
    let d = distance(&png, &jpeg);
    assert!(
        d <= DEFAULT_SIMILARITY_THRESHOLD,
        "JPEG re-encode moved {d} bits"
    );
}

#[test]
fn test_downscale_stays_within_threshold() {
    let original = DynamicImage::ImageRgb8(create_test_image());
    let half = original.resize_exact(128, 128, image::imageops::FilterType::Lanczos3);

    let a = Fingerprint::from_bytes(&encode_png(&original)).unwrap();
    let b = Fingerprint::from_bytes(&encode_png(&half)).unwrap();

    let d = distance(&a, &b);
    assert!(d <= DEFAULT_SIMILARITY_THRESHOLD, "downscale moved {d} bits");
}

#[test]
fn test_different_images_are_far_apart() {
    let original = create_test_image();
    let a = Fingerprint::from_bytes(&encode_png(&DynamicImage::ImageRgb8(original.clone())))
        .unwrap();
    let b = Fingerprint::from_bytes(&encode_png(&DynamicImage::ImageRgb8(inverted(&original))))
        .unwrap();

    assert!(distance(&a, &b) > 500);
}

#[test]
fn test_reencoded_copy_is_rejected_by_registry() {
    let original = DynamicImage::ImageRgb8(create_test_image());
    let png = Fingerprint::from_bytes(&encode_png(&original)).unwrap();
    let jpeg = Fingerprint::from_bytes(&encode_jpeg(&original, 85)).unwrap();

    let registry = Registry::default();
    let first = registry
        .register(Submission::new(
            "alice",
            png.exact_hash,
            png.perceptual_hash,
            "board.png",
            "dev-a",
        ))
        .unwrap();
    assert!(first.outcome.is_minted());

    let copy = registry
        .register(Submission::new(
            "mallory",
            jpeg.exact_hash,
            jpeg.perceptual_hash,
            "board.jpg",
            "dev-m",
        ))
        .unwrap();
    assert!(!copy.outcome.is_minted());
    assert_eq!(copy.outcome.record().owner, "alice");
}
