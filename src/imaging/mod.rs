//! Image processing: geometry decisions in, pixels out.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Crop** | `DynamicImage::crop_imm` |
//! | **Resize** | Lanczos3 via `resize_exact` |
//! | **Encode** | JPEG with quality, PNG / WebP / TIFF lossless |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop and dimension math (unit testable)
//! - **Parameters**: Data structures describing one render
//! - **Backend**: [`ImageResizer`] trait + [`RustResizer`]
//! - **Operations**: Turn resolved modifications into renders on a backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{ImageResizer, ScaleError};
pub use calculations::{
    calculate_crop_rect, may_scale, normalize_dimensions, normalize_to_ratio, scale_to_fit_in,
};
pub use operations::{RenderedVariant, plan_resize, render_all, variant_filename};
pub use params::{Quality, ResizeParams};
pub use rust_backend::RustResizer;
