//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Crop
//!
//! ```text
//! 1600x1200 → 16/9
//!     Crop: 1600x900+0+150
//! ```
//!
//! ## Resolve
//!
//! ```text
//! 800x600
//!     Reused: #2
//!     Crop: 800x600+0+80
//!     Scale: 800x600 → 800x600
//! ```
//!
//! ## Render
//!
//! ```text
//! photo.jpg (1600x1200)
//!     800x600: reused → out/photo-800x600.jpg
//!     160x90: cropped → out/photo-160x90.jpg
//!
//! Rendered 2 files
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::geometry::{ExactRatio, Rect, Size};
use crate::imaging::RenderedVariant;
use crate::resolver::ResolvedModification;
use crate::types::{Image, Modification, ResolutionId};
use std::path::Path;

fn crop_line(crop: Option<Rect>) -> String {
    match crop {
        Some(crop) => format!("    Crop: {}", crop),
        None => "    Crop: full image".to_string(),
    }
}

fn base_line(base: Option<ResolutionId>, reused: bool) -> String {
    match (reused, base) {
        (true, Some(id)) => format!("    Reused: {}", id),
        (true, None) => "    Reused: unnamed modification".to_string(),
        (false, _) => "    New: centered crop".to_string(),
    }
}

// ============================================================================
// Crop
// ============================================================================

pub fn format_crop_output(source: Size, ratio: ExactRatio, crop: Rect) -> Vec<String> {
    vec![
        format!("{} → {}", source, ratio),
        crop_line(Some(crop)),
    ]
}

pub fn print_crop_output(source: Size, ratio: ExactRatio, crop: Rect) {
    for line in format_crop_output(source, ratio, crop) {
        println!("{}", line);
    }
}

// ============================================================================
// Register
// ============================================================================

pub fn format_register_output(key: &str, modification: &Modification, total: usize) -> Vec<String> {
    let label = match modification.resolution_id {
        Some(id) => format!("{} {}", id, modification.resolution),
        None => modification.resolution.to_string(),
    };
    vec![
        format!("Registered {}", label),
        crop_line(modification.crop),
        format!("    Image: {}", key),
        format!("    Modifications: {}", total),
    ]
}

pub fn print_register_output(key: &str, modification: &Modification, total: usize) {
    for line in format_register_output(key, modification, total) {
        println!("{}", line);
    }
}

// ============================================================================
// Resolve
// ============================================================================

pub fn format_resolve_output(resolved: &ResolvedModification, image: &Image) -> Vec<String> {
    vec![
        resolved.resolution.to_string(),
        base_line(resolved.base_resolution_id, resolved.reused),
        crop_line(resolved.crop),
        format!("    Scale: {} → {}", resolved.source_size(image), resolved.resolution),
    ]
}

pub fn print_resolve_output(resolved: &ResolvedModification, image: &Image) {
    for line in format_resolve_output(resolved, image) {
        println!("{}", line);
    }
}

// ============================================================================
// Render
// ============================================================================

pub fn format_render_output(
    source: &Path,
    dimensions: Size,
    variants: &[RenderedVariant],
) -> Vec<String> {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());

    let mut lines = vec![format!("{} ({})", name, dimensions)];
    for variant in variants {
        let how = if variant.reused { "reused" } else { "cropped" };
        lines.push(format!(
            "    {}: {} → {}",
            variant.resolution,
            how,
            variant.path.display()
        ));
    }
    lines.push(String::new());
    let noun = if variants.len() == 1 { "file" } else { "files" };
    lines.push(format!("Rendered {} {}", variants.len(), noun));
    lines
}

pub fn print_render_output(source: &Path, dimensions: Size, variants: &[RenderedVariant]) {
    for line in format_render_output(source, dimensions, variants) {
        println!("{}", line);
    }
}
