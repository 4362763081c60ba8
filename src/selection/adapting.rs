use super::ImageModificationSelector;
use crate::geometry::{ExactRatio, Point, Rect, Size};
use crate::types::{Candidate, Image, Modification, RequestedResolution};
use std::cmp::Ordering;
use tracing::debug;

/// Reshapes a registered crop to serve a request no registered resolution
/// matches exactly.
///
/// The first pass handles a one-axis match. Only 1:1 modifications qualify:
/// the crop must be exactly as large as the resolution, so growing or
/// shrinking it on the other axis never scales pixels. The crop is grown or
/// shrunk symmetrically around its center and must stay inside the source
/// image. The candidate needing the least adaptation wins, first-seen on ties.
///
/// Candidates matching the request on neither side get a second chance.
/// Those with the requested ratio or an undefined one are left out, the
/// rest are ordered by distance to the requested ratio, then by distance to
/// the requested area. The first crop that can be extended from its center
/// to the requested ratio without leaving the image wins. Failing that, the
/// first crop that can be cut down to the requested ratio and still holds
/// the requested pixels wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptingImageModificationSelector;

/// Which side of the candidate already matches the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchedAxis {
    Width,
    Height,
}

fn matched_axis(resolution: Size, requested: Size) -> Option<MatchedAxis> {
    if resolution.width == requested.width {
        Some(MatchedAxis::Width)
    } else if resolution.height == requested.height {
        Some(MatchedAxis::Height)
    } else {
        None
    }
}

/// Give `crop` the new `size`, keeping its center.
fn recenter(crop: Rect, size: Size) -> Rect {
    Rect {
        top_left: Point::new(
            crop.left() - (size.width - crop.width()) / 2,
            crop.top() - (size.height - crop.height()) / 2,
        ),
        size,
    }
}

/// Grow or shrink `crop` on the unmatched axis by `delta`.
fn adapt_crop(crop: Rect, axis: MatchedAxis, delta: i32) -> Rect {
    let size = match axis {
        MatchedAxis::Width => Size::new(crop.width(), crop.height() + delta),
        MatchedAxis::Height => Size::new(crop.width() + delta, crop.height()),
    };
    recenter(crop, size)
}

/// Grow the short side of `crop` until it has `ratio`.
fn extend_crop(crop: Rect, ratio: ExactRatio) -> Rect {
    let size = match crop.size.ratio().compare(&ratio) {
        Ordering::Less => {
            Size::new(ratio.calculate_width_for_height(crop.height()), crop.height())
        }
        Ordering::Greater => {
            Size::new(crop.width(), ratio.calculate_height_for_width(crop.width()))
        }
        Ordering::Equal => crop.size,
    };
    recenter(crop, size)
}

/// Cut the long side of `crop` until it has `ratio`.
fn shrink_crop(crop: Rect, ratio: ExactRatio) -> Rect {
    let size = match crop.size.ratio().compare(&ratio) {
        Ordering::Less => {
            Size::new(crop.width(), ratio.calculate_height_for_width(crop.width()))
        }
        Ordering::Greater => {
            Size::new(ratio.calculate_width_for_height(crop.height()), crop.height())
        }
        Ordering::Equal => crop.size,
    };
    recenter(crop, size)
}

/// Order `a` and `b` by their distance to `target`.
///
/// Compares `|a - t| / (a.den * t.den)` against the same for `b`; the common
/// `t.den` cancels out. Ratios come from `i32` sizes so `i128` cannot overflow.
fn compare_ratio_distance(target: ExactRatio, a: ExactRatio, b: ExactRatio) -> Ordering {
    let offset = |r: ExactRatio| {
        (r.numerator() as i128 * target.denominator() as i128
            - target.numerator() as i128 * r.denominator() as i128)
            .abs()
    };
    (offset(a) * b.denominator() as i128).cmp(&(offset(b) * a.denominator() as i128))
}

/// Larger resolutions first, closest area first; then smaller ones, closest first.
fn area_distance_key(requested: Size, resolution: Size) -> (bool, i64) {
    let distance = resolution.area() - requested.area();
    (distance <= 0, distance.abs())
}

impl AdaptingImageModificationSelector {
    fn adapt_one_axis(
        image: &Image,
        candidates: &[Candidate],
        requested_size: Size,
    ) -> Option<Modification> {
        let bounds = image.bounds();
        let mut best: Option<(&Modification, Rect, i32)> = None;

        for (modification, resolution) in candidates {
            let Some(crop) = modification.crop else {
                continue;
            };
            if crop.size != *resolution {
                continue;
            }
            let Some(axis) = matched_axis(*resolution, requested_size) else {
                continue;
            };

            let delta = match axis {
                MatchedAxis::Width => requested_size.height - resolution.height,
                MatchedAxis::Height => requested_size.width - resolution.width,
            };
            let new_crop = adapt_crop(crop, axis, delta);
            if new_crop.size.is_empty() || !new_crop.within_rect(&bounds) {
                continue;
            }

            if best.is_none_or(|(_, _, best_delta)| delta.abs() < best_delta.abs()) {
                best = Some((modification, new_crop, delta));
            }
        }

        let (modification, crop, delta) = best?;
        debug!(%crop, delta, id = ?modification.resolution_id, "Adapted registered crop");
        Some(adapted(modification, requested_size, crop))
    }

    /// Crops of candidates off on both sides, closest to the request first.
    fn reshape_candidates(
        candidates: &[Candidate],
        requested_size: Size,
    ) -> Vec<(&Modification, Rect)> {
        let ratio = requested_size.ratio();
        let mut eligible: Vec<(&Modification, Rect, Size)> = candidates
            .iter()
            .filter(|(_, resolution)| {
                matched_axis(*resolution, requested_size).is_none()
                    && !resolution.ratio().is_undefined()
                    && resolution.ratio() != ratio
            })
            .filter_map(|(modification, resolution)| {
                let crop = modification.crop.filter(|crop| !crop.size.is_empty())?;
                Some((modification, crop, *resolution))
            })
            .collect();

        eligible.sort_by(|(_, _, left), (_, _, right)| {
            compare_ratio_distance(ratio, left.ratio(), right.ratio()).then_with(|| {
                area_distance_key(requested_size, *left)
                    .cmp(&area_distance_key(requested_size, *right))
            })
        });
        eligible
            .into_iter()
            .map(|(modification, crop, _)| (modification, crop))
            .collect()
    }

    fn reshape(
        image: &Image,
        candidates: &[Candidate],
        requested_size: Size,
    ) -> Option<Modification> {
        let ratio = requested_size.ratio();
        if ratio.is_undefined() {
            return None;
        }
        let ordered = Self::reshape_candidates(candidates, requested_size);
        let bounds = image.bounds();

        let extended = ordered.iter().find_map(|(modification, crop)| {
            let extended = extend_crop(*crop, ratio);
            extended.within_rect(&bounds).then_some((*modification, extended))
        });
        if let Some((modification, crop)) = extended {
            debug!(%crop, id = ?modification.resolution_id, "Extended registered crop to ratio");
            return Some(adapted(modification, requested_size, crop));
        }

        let (modification, crop) = ordered.iter().find_map(|(modification, crop)| {
            let shrunk = shrink_crop(*crop, ratio);
            requested_size.fits_in(shrunk.size).then_some((*modification, shrunk))
        })?;
        debug!(%crop, id = ?modification.resolution_id, "Shrunk registered crop to ratio");
        Some(adapted(modification, requested_size, crop))
    }
}

fn adapted(modification: &Modification, resolution: Size, crop: Rect) -> Modification {
    Modification {
        resolution,
        crop: Some(crop),
        ..modification.clone()
    }
}

impl ImageModificationSelector for AdaptingImageModificationSelector {
    fn select(
        &self,
        image: &Image,
        candidates: &[Candidate],
        requested: &RequestedResolution,
    ) -> Option<Modification> {
        let requested_size = requested.size();
        Self::adapt_one_axis(image, candidates, requested_size)
            .or_else(|| Self::reshape(image, candidates, requested_size))
    }
}
