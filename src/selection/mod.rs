//! Modification selection: decide whether an already registered
//! modification can serve a requested resolution.
//!
//! Every strategy is a stateless [`ImageModificationSelector`]. A selector
//! gets the source [`Image`], the registered candidates in registry order
//! and the [`RequestedResolution`], and returns the modification to reuse
//! (possibly with an adapted crop) or `None`. "No match" is the common case
//! and never an error; the caller then generates a fresh crop.
//!
//! | Strategy | Matches on |
//! |---|---|
//! | [`RegisteredImageModificationSelector`] | resolution id, else exact width and height |
//! | [`AspectRatioImageModificationSelector`] | identical aspect ratio, smallest covering or best undersized |
//! | [`AdaptingImageModificationSelector`] | one matching side: crop grown or shrunk around its center; else extended or cut to the requested ratio |
//!
//! Candidate order matters: wherever two candidates tie, the first one
//! supplied wins.

mod adapting;
mod aspect_ratio;
mod registered;

pub use adapting::AdaptingImageModificationSelector;
pub use aspect_ratio::AspectRatioImageModificationSelector;
pub use registered::RegisteredImageModificationSelector;

use crate::types::{Candidate, Image, Modification, RequestedResolution};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A strategy for reusing registered modifications.
///
/// Implementations must be pure: the same input always yields the same
/// output and nothing is mutated, so one selector can serve many threads.
pub trait ImageModificationSelector: Send + Sync {
    fn select(
        &self,
        image: &Image,
        candidates: &[Candidate],
        requested: &RequestedResolution,
    ) -> Option<Modification>;
}

/// Named selector strategies, as used in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectorKind {
    Registered,
    AspectRatio,
    Adapting,
}

impl SelectorKind {
    /// The default chain order.
    pub const ALL: [SelectorKind; 3] = [
        SelectorKind::Registered,
        SelectorKind::AspectRatio,
        SelectorKind::Adapting,
    ];

    pub fn selector(self) -> Box<dyn ImageModificationSelector> {
        match self {
            SelectorKind::Registered => Box::new(RegisteredImageModificationSelector),
            SelectorKind::AspectRatio => Box::new(AspectRatioImageModificationSelector),
            SelectorKind::Adapting => Box::new(AdaptingImageModificationSelector),
        }
    }
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SelectorKind::Registered => "registered",
            SelectorKind::AspectRatio => "aspect-ratio",
            SelectorKind::Adapting => "adapting",
        };
        f.write_str(name)
    }
}
