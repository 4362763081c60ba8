//! # imageserver
//!
//! The decision engine of an image server: given a source image, a requested
//! output resolution and the modifications already produced for that image,
//! decide which crop to render. Reusing an earlier crop keeps every
//! rendition of an image consistent with what an editor once chose.
//!
//! # Architecture: Reuse First, Crop Second
//!
//! ```text
//! request ──▶ registry candidates ──▶ selector chain ──▶ resolved crop ──▶ resizer
//!                                          │ none
//!                                          ▼
//!                               centered crop + upscale guard
//! ```
//!
//! Everything up to the resolved crop is pure geometry over value types; only
//! the [`registry`] and the [`imaging`] backend touch the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`geometry`] | `ExactRatio`, `Size`, `Point`, `Rect`: exact integer geometry |
//! | [`types`] | `Modification`, `RequestedResolution`, `Image` and their ids |
//! | [`selection`] | The three reuse strategies behind `ImageModificationSelector` |
//! | [`resolver`] | Selector chain, context preference, fallback crop, quality gate |
//! | [`registry`] | Content-addressed JSON store of registered modifications |
//! | [`imaging`] | Crop math, the `ImageResizer` contract and its `image`-crate backend |
//! | [`config`] | Layered `imageserver.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Exact Ratios, No Floats
//!
//! Aspect ratios are reduced integer fractions ([`geometry::ExactRatio`]).
//! Two resolutions either have the same ratio or they don't; there is no
//! epsilon to tune. Arithmetic that would leave the `i32` range is an error
//! rather than a wrapped value.
//!
//! ## First Match Wins
//!
//! Candidates keep registry order end to end, and every tie inside a
//! selector goes to the earlier candidate. The same registry and request
//! always resolve to the same crop.
//!
//! ## No Silent Upscaling
//!
//! A freshly generated crop that holds fewer pixels than the requested
//! resolution is refused unless `quality.allow_upscale` is set. Reused
//! modifications were accepted when they were registered and are not
//! re-checked.

pub mod config;
pub mod geometry;
pub mod imaging;
pub mod output;
pub mod registry;
pub mod resolver;
pub mod selection;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
