//! Pure calculation functions for crops and output dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! They cover the two gates a caller passes before manufacturing a new
//! modification: the default centered crop ([`calculate_crop_rect`]) and the
//! upscale guard ([`may_scale`]).

use crate::geometry::{ExactRatio, GeometryError, Rect, Size};
use std::cmp::Ordering;

/// Calculate the largest centered crop of `source` with `target_ratio`.
///
/// The relative ratio `target / source` decides which axis is cut:
/// - `== 1`: the full source, nothing is cropped
/// - `> 1`: the target is wider, top and bottom are cut
/// - `< 1`: the target is taller, left and right are cut
///
/// Centering uses integer division, so an odd margin leaves the extra pixel
/// on the far side.
///
/// An empty source or an undefined/negative target yields the full source.
///
/// # Examples
/// ```
/// # use imageserver::geometry::{ExactRatio, Rect, Size};
/// # use imageserver::imaging::calculate_crop_rect;
/// // 4:3 source cropped to 16:9 loses 150px top and bottom
/// let crop = calculate_crop_rect(Size::new(1600, 1200), ExactRatio::new(16, 9)).unwrap();
/// assert_eq!(crop, Rect::new(0, 150, 1600, 900));
/// ```
pub fn calculate_crop_rect(source: Size, target_ratio: ExactRatio) -> Result<Rect, GeometryError> {
    let full = Rect::at_origin(source);
    if source.is_empty() || target_ratio.is_undefined() || target_ratio.is_negative() {
        return Ok(full);
    }

    let relative = target_ratio.divide(source.ratio())?;

    match relative.compare(&ExactRatio::ONE) {
        Ordering::Equal => Ok(full),
        Ordering::Greater => {
            let height = relative.descale(source.height);
            let dy = (source.height - height) / 2;
            Ok(Rect::new(0, dy, source.width, height))
        }
        Ordering::Less => {
            let width = relative.scale(source.width);
            let dx = (source.width - width) / 2;
            Ok(Rect::new(dx, 0, width, source.height))
        }
    }
}

/// Upscale guard: true if `target` is no larger than `source` on either side.
pub fn may_scale(source: Size, target: Size) -> bool {
    target.width <= source.width && target.height <= source.height
}

/// Fill in unknown (zero) sides of `requested` from the ratio of `boundaries`.
///
/// Both sides unknown means "the boundaries themselves".
pub fn normalize_dimensions(requested: Size, boundaries: Size) -> Size {
    let ratio = boundaries.ratio();
    match (requested.width, requested.height) {
        (0, 0) => boundaries,
        (width, 0) => Size::new(width, ratio.calculate_height_for_width(width)),
        (0, height) => Size::new(ratio.calculate_width_for_height(height), height),
        _ => requested,
    }
}

/// Bring `dimensions` to `ratio`, keeping the side the ratio is larger on.
pub fn normalize_to_ratio(dimensions: Size, ratio: ExactRatio) -> Size {
    if ratio.is_undefined() || dimensions.ratio() == ratio {
        return dimensions;
    }
    if ratio.is_larger_on_width() {
        Size::new(
            dimensions.width,
            ratio.calculate_height_for_width(dimensions.width),
        )
    } else {
        Size::new(
            ratio.calculate_width_for_height(dimensions.height),
            dimensions.height,
        )
    }
}

/// Normalize against `boundaries`, then downscale to fit inside them.
///
/// Never upscales. The side matching the ratio's larger side is tried first;
/// if rounding pushes the other side out of bounds the opposite side is used.
pub fn scale_to_fit_in(dimensions: Size, boundaries: Size) -> Size {
    let normalized = normalize_dimensions(dimensions, boundaries);
    if normalized.fits_in(boundaries) {
        return normalized;
    }

    let ratio = normalized.ratio();
    let by_width = Size::new(
        boundaries.width,
        ratio.calculate_height_for_width(boundaries.width),
    );
    let by_height = Size::new(
        ratio.calculate_width_for_height(boundaries.height),
        boundaries.height,
    );

    let (first, second) = if ratio.is_larger_on_width() {
        (by_width, by_height)
    } else {
        (by_height, by_width)
    };

    if first.fits_in(boundaries) {
        first
    } else {
        second
    }
}
