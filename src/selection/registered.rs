use super::ImageModificationSelector;
use crate::types::{Candidate, Image, Modification, RequestedResolution};
use tracing::debug;

/// Exact match by identity.
///
/// A request carrying a resolution id only ever matches the modification
/// registered for that id, whatever its dimensions. Without an id the first
/// candidate with exactly the requested width and height wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisteredImageModificationSelector;

impl ImageModificationSelector for RegisteredImageModificationSelector {
    fn select(
        &self,
        _image: &Image,
        candidates: &[Candidate],
        requested: &RequestedResolution,
    ) -> Option<Modification> {
        let found = match requested.id {
            Some(id) => candidates
                .iter()
                .find(|(modification, _)| modification.resolution_id == Some(id)),
            None => candidates.iter().find(|(_, resolution)| {
                resolution.width == requested.width && resolution.height == requested.height
            }),
        };

        if let Some((modification, resolution)) = found {
            debug!(%resolution, id = ?modification.resolution_id, "Registered modification matches");
        }
        found.map(|(modification, _)| modification.clone())
    }
}
