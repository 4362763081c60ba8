//! Integer geometry for crop and resolution arithmetic.
//!
//! Everything here is a small `Copy` value type. Ratios are kept as reduced
//! fractions ([`ExactRatio`]) so two resolutions either have the same aspect
//! ratio or they don't; there is no float tolerance anywhere in the selection
//! engine.
//!
//! | Type | Role |
//! |---|---|
//! | [`ExactRatio`] | Reduced `numerator/denominator`, `0/0` = undefined |
//! | [`Size`] | Non-negative `width x height`, scaled by an [`ExactRatio`] |
//! | [`Point`] | Top-left corner of a [`Rect`] |
//! | [`Rect`] | Crop rectangle, half-open on the right and bottom edges |

mod ratio;
mod rect;
mod size;

pub use ratio::ExactRatio;
pub use rect::{Point, Rect};
pub use size::Size;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Ratio overflow: {numerator}/{denominator} does not fit in 32 bits")]
    RatioOverflow { numerator: i128, denominator: i128 },
    #[error("Sizes are not proportional: {size} vs {base}")]
    NotProportional { size: Size, base: Size },
    #[error("Invalid ratio {0:?}: expected \"p/q\"")]
    InvalidRatio(String),
}
