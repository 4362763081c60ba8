//! Shared test utilities for the imageserver test suite.
//!
//! Builders for registry candidates and synthetic source images, so selector
//! and pipeline tests read as a list of scenarios rather than struct literals.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let candidates = vec![
//!     candidate(1, 800, 600),
//!     candidate_with_crop(2, 800, 560, Rect::new(0, 100, 800, 560)),
//! ];
//! ```

use std::path::Path;

use image::{ImageEncoder, RgbImage};

use crate::geometry::{Rect, Size};
use crate::types::{Candidate, Modification, ResolutionId};

// =========================================================================
// Candidates
// =========================================================================

/// A registered modification without crop whose effective size equals its
/// resolution.
pub fn candidate(id: u64, width: i32, height: i32) -> Candidate {
    let resolution = Size::new(width, height);
    (
        Modification::new(resolution, None).with_resolution_id(ResolutionId(id)),
        resolution,
    )
}

/// Like [`candidate`], with an explicit crop of the source image.
pub fn candidate_with_crop(id: u64, width: i32, height: i32, crop: Rect) -> Candidate {
    let resolution = Size::new(width, height);
    (
        Modification::new(resolution, Some(crop)).with_resolution_id(ResolutionId(id)),
        resolution,
    )
}

// =========================================================================
// Source images
// =========================================================================

/// Write a gradient JPEG of the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}
