//! Shared types passed between the registry, the selectors and the resolver.
//!
//! These types are serialized into the registry JSON and must stay stable
//! across releases.

use crate::geometry::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a registered output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolutionId(pub u64);

impl fmt::Display for ResolutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of the context (site, channel) a modification was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(pub u64);

/// A previously produced derived image: the output resolution plus the crop
/// of the original that was rendered at that resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_id: Option<ResolutionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<ContextId>,
    pub resolution: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<Rect>,
}

impl Modification {
    pub fn new(resolution: Size, crop: Option<Rect>) -> Self {
        Self {
            resolution_id: None,
            context_id: None,
            resolution,
            crop,
        }
    }

    pub fn with_resolution_id(mut self, id: ResolutionId) -> Self {
        self.resolution_id = Some(id);
        self
    }

    pub fn with_context(mut self, context: ContextId) -> Self {
        self.context_id = Some(context);
        self
    }
}

/// A registered modification together with the effective output size it
/// stands for. The registry resolves the size (e.g. a width-only resolution
/// normalized to the image ratio); selectors compare against this size.
pub type Candidate = (Modification, Size);

/// The resolution a caller asks for.
///
/// With `id` set the caller wants exactly that registered resolution,
/// whatever its dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedResolution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResolutionId>,
    pub width: i32,
    pub height: i32,
}

impl RequestedResolution {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            id: None,
            width,
            height,
        }
    }

    pub fn registered(id: ResolutionId, width: i32, height: i32) -> Self {
        Self {
            id: Some(id),
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// The original source image. Its dimensions bound every crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub dimensions: Size,
}

impl Image {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            dimensions: Size::new(width, height),
        }
    }

    /// The whole image as a rect at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::at_origin(self.dimensions)
    }
}
