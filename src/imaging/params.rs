//! Parameter types for resize operations.
//!
//! These structs describe *what* to render, not *how*. They are the interface
//! between [`operations`](super::operations) (which turns a resolved
//! modification into a render) and the [`backend`](super::backend) (which
//! does the pixel work), so a mock resizer can stand in during tests.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`ResizeParams`] — Source, output path, optional crop and optional target size.

use crate::geometry::{Rect, Size};
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Parameters for a crop + resize.
///
/// The crop is applied to the source first, then the result is scaled to
/// `target_size`. A target side of 0 is derived from the other side.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub target_size: Option<Size>,
    pub crop: Option<Rect>,
    pub quality: Quality,
}
