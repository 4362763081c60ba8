//! High-level image operations.
//!
//! These functions take resolved modifications, compute resize parameters,
//! and call the backend. Renders of one source run in parallel on the
//! current rayon pool.

use super::backend::{ImageResizer, ScaleError};
use super::params::{Quality, ResizeParams};
use crate::geometry::Size;
use crate::resolver::ResolvedModification;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// One rendered output file.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedVariant {
    pub path: PathBuf,
    pub resolution: Size,
    pub reused: bool,
}

/// `<stem>-<width>x<height>.<extension>`
pub fn variant_filename(stem: &str, resolution: Size, extension: &str) -> String {
    format!("{}-{}.{}", stem, resolution, extension)
}

/// Plan a render without executing it.
pub fn plan_resize(
    source: &Path,
    output: &Path,
    resolved: &ResolvedModification,
    quality: Quality,
) -> ResizeParams {
    ResizeParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        target_size: Some(resolved.resolution),
        crop: resolved.crop,
        quality,
    }
}

/// Render every resolved modification of `source` into `output_dir`.
///
/// Output order follows `resolved`. The first failing render aborts the
/// batch.
pub fn render_all(
    resizer: &impl ImageResizer,
    source: &Path,
    output_dir: &Path,
    stem: &str,
    extension: &str,
    resolved: &[ResolvedModification],
    quality: Quality,
) -> Result<Vec<RenderedVariant>, ScaleError> {
    resolved
        .par_iter()
        .map(|modification| -> Result<RenderedVariant, ScaleError> {
            let path = output_dir.join(variant_filename(stem, modification.resolution, extension));
            resizer.resize(&plan_resize(source, &path, modification, quality))?;
            Ok(RenderedVariant {
                path,
                resolution: modification.resolution,
                reused: modification.reused,
            })
        })
        .collect()
}
