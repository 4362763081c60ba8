use super::ImageModificationSelector;
use crate::types::{Candidate, Image, Modification, RequestedResolution};
use tracing::debug;

/// Closest fit among modifications with exactly the requested aspect ratio.
///
/// - The smallest resolution covering the request on both sides wins, it can
///   be downscaled to the request without loss.
/// - Otherwise, the largest smaller resolution whose crop still holds at
///   least the requested number of pixels on both sides. Such a crop can be
///   re-rendered at the requested size without upscaling.
///
/// Ties go to the first candidate supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct AspectRatioImageModificationSelector;

impl ImageModificationSelector for AspectRatioImageModificationSelector {
    fn select(
        &self,
        _image: &Image,
        candidates: &[Candidate],
        requested: &RequestedResolution,
    ) -> Option<Modification> {
        let requested_size = requested.size();
        let requested_ratio = requested_size.ratio();
        if requested_ratio.is_undefined() {
            return None;
        }

        let same_ratio = candidates
            .iter()
            .filter(|(_, resolution)| resolution.ratio() == requested_ratio);

        let mut covering: Option<&Candidate> = None;
        let mut undersized: Option<&Candidate> = None;

        for candidate in same_ratio {
            let (modification, resolution) = candidate;

            if requested_size.fits_in(*resolution) {
                if covering.is_none_or(|(_, best)| resolution.area() < best.area()) {
                    covering = Some(candidate);
                }
                continue;
            }

            let holds_enough_pixels = modification
                .crop
                .is_some_and(|crop| requested_size.fits_in(crop.size));

            if holds_enough_pixels
                && undersized.is_none_or(|(_, best)| resolution.area() > best.area())
            {
                undersized = Some(candidate);
            }
        }

        let selected = covering.or(undersized)?;
        debug!(
            resolution = %selected.1,
            covering = covering.is_some(),
            ratio = %requested_ratio,
            "Aspect ratio match"
        );
        Some(selected.0.clone())
    }
}
