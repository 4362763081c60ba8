//! Modification resolution: the single entry point a request goes through.
//!
//! ```text
//! requested ──normalize──▶ selector chain ──Some──▶ reuse (maybe adapted)
//!                               │
//!                              None
//!                               ▼
//!                    centered crop + upscale guard ──▶ new modification
//! ```
//!
//! Selectors run in configured order and the first match wins. Candidates
//! registered for the caller's context are tried before all others; the
//! sort is stable so registry order still breaks ties within each group.

use crate::geometry::{GeometryError, Rect, Size};
use crate::imaging::{calculate_crop_rect, may_scale, normalize_dimensions};
use crate::selection::{ImageModificationSelector, SelectorKind};
use crate::types::{Candidate, ContextId, Image, RequestedResolution, ResolutionId};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("{requested} would upscale crop {crop}")]
    WouldUpscale { crop: Size, requested: Size },
}

/// What to render for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModification {
    /// The registered resolution this was derived from; `None` for a fresh crop.
    pub base_resolution_id: Option<ResolutionId>,
    /// Region of the source to render. `None` renders the whole image.
    pub crop: Option<Rect>,
    /// Output size, with unknown sides already filled in.
    pub resolution: Size,
    /// Whether a registered modification was reused.
    pub reused: bool,
}

impl ResolvedModification {
    /// Size of the source region that gets scaled to `resolution`.
    pub fn source_size(&self, image: &Image) -> Size {
        self.crop.map_or(image.dimensions, |crop| crop.size)
    }
}

/// Ordered selector chain with a centered-crop fallback.
pub struct ModificationResolver {
    selectors: Vec<Box<dyn ImageModificationSelector>>,
    allow_upscale: bool,
}

impl ModificationResolver {
    pub fn new(selectors: Vec<Box<dyn ImageModificationSelector>>, allow_upscale: bool) -> Self {
        Self {
            selectors,
            allow_upscale,
        }
    }

    pub fn from_kinds(kinds: &[SelectorKind], allow_upscale: bool) -> Self {
        Self::new(
            kinds.iter().map(|kind| kind.selector()).collect(),
            allow_upscale,
        )
    }

    pub fn resolve(
        &self,
        image: &Image,
        candidates: &[Candidate],
        requested: &RequestedResolution,
        context: Option<ContextId>,
    ) -> Result<ResolvedModification, ResolveError> {
        let ordered = prefer_context(candidates, context);
        let resolution =
            normalize_dimensions(requested.size(), request_boundaries(image, &ordered, requested));
        let normalized = RequestedResolution {
            width: resolution.width,
            height: resolution.height,
            ..*requested
        };

        for selector in &self.selectors {
            if let Some(modification) = selector.select(image, &ordered, &normalized) {
                debug!(
                    %resolution,
                    base = ?modification.resolution_id,
                    "Reusing registered modification"
                );
                return Ok(ResolvedModification {
                    base_resolution_id: modification.resolution_id,
                    crop: modification.crop,
                    resolution,
                    reused: true,
                });
            }
        }

        let crop = calculate_crop_rect(image.dimensions, resolution.ratio())?;
        if !self.allow_upscale && !may_scale(crop.size, resolution) {
            return Err(ResolveError::WouldUpscale {
                crop: crop.size,
                requested: resolution,
            });
        }

        debug!(%resolution, %crop, "No reusable modification, using centered crop");
        Ok(ResolvedModification {
            base_resolution_id: None,
            crop: Some(crop),
            resolution,
            reused: false,
        })
    }
}

impl Default for ModificationResolver {
    fn default() -> Self {
        Self::from_kinds(&SelectorKind::ALL, false)
    }
}

/// What unknown request sides are filled in from: the effective size of the
/// registered resolution a request names, else the whole image.
fn request_boundaries(
    image: &Image,
    ordered: &[Candidate],
    requested: &RequestedResolution,
) -> Size {
    requested
        .id
        .and_then(|id| {
            ordered
                .iter()
                .find(|(modification, _)| modification.resolution_id == Some(id))
        })
        .map_or(image.dimensions, |(_, effective)| *effective)
}

/// Candidates made for `context` first, registry order otherwise.
fn prefer_context(candidates: &[Candidate], context: Option<ContextId>) -> Vec<Candidate> {
    let mut ordered = candidates.to_vec();
    if context.is_some() {
        ordered.sort_by_key(|(modification, _)| modification.context_id != context);
    }
    ordered
}
