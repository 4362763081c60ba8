//! Resizer trait and shared error type.
//!
//! The [`ImageResizer`] trait is the boundary between deciding *what* to
//! render (selection and cropping, all pure) and the pixel work itself. It
//! has two operations: read the size of a source, and render a crop of it at
//! a target size.
//!
//! The production implementation is
//! [`RustResizer`](super::rust_backend::RustResizer), built on the `image`
//! crate.

use super::params::ResizeParams;
use crate::geometry::{Rect, Size};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source image missing: {0}")]
    SourceMissing(PathBuf),
    #[error("Crop {crop} exceeds source image of {image}")]
    CropOutOfBounds { crop: Rect, image: Size },
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for resizer implementations.
///
/// Implementations must be `Sync`: renders for several resolutions of the
/// same source run in parallel.
pub trait ImageResizer: Sync {
    /// Pixel size of the image at `path`.
    fn get_size(&self, path: &Path) -> Result<Size, ScaleError>;

    /// Extract `params.crop` (if any) from the source, scale the result to
    /// `params.target_size` (if any) and write it to `params.output`.
    fn resize(&self, params: &ResizeParams) -> Result<(), ScaleError>;
}
