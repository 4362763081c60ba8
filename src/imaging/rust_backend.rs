//! Pure Rust resizer on top of the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header only, no decode) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` |
//! | Crop | `DynamicImage::crop_imm` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode → PNG, TIFF, WebP | `DynamicImage::save_with_format` (lossless) |
//!
//! Output is always converted to 8-bit RGB(A) so CMYK or 16-bit sources
//! encode consistently.

use super::backend::{ImageResizer, ScaleError};
use super::params::ResizeParams;
use crate::geometry::{Rect, Size};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;
use tracing::{debug, info};

/// Pure Rust resizer using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustResizer;

impl RustResizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustResizer {
    fn default() -> Self {
        Self::new()
    }
}

fn verify_exists(path: &Path) -> Result<(), ScaleError> {
    if !path.exists() {
        return Err(ScaleError::SourceMissing(path.to_path_buf()));
    }
    Ok(())
}

fn to_i32(value: u32) -> Result<i32, ScaleError> {
    i32::try_from(value)
        .map_err(|_| ScaleError::ProcessingFailed(format!("Dimension {value} out of range")))
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, ScaleError> {
    verify_exists(path)?;
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| {
            ScaleError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

fn apply_crop(img: DynamicImage, crop: Rect) -> Result<DynamicImage, ScaleError> {
    let image = Size::new(to_i32(img.width())?, to_i32(img.height())?);
    if crop.size.is_empty() || !crop.within_rect(&Rect::at_origin(image)) {
        return Err(ScaleError::CropOutOfBounds { crop, image });
    }
    Ok(img.crop_imm(
        crop.left() as u32,
        crop.top() as u32,
        crop.width() as u32,
        crop.height() as u32,
    ))
}

/// Scale to `target`; a zero side follows the other side at the current ratio.
fn apply_target_size(img: DynamicImage, target: Size) -> Result<DynamicImage, ScaleError> {
    let current = Size::new(to_i32(img.width())?, to_i32(img.height())?);
    let ratio = current.ratio();
    let (width, height) = match (target.width, target.height) {
        (w, h) if w > 0 && h > 0 => (w, h),
        (w, _) if w > 0 => (w, ratio.calculate_height_for_width(w)),
        (_, h) if h > 0 => (ratio.calculate_width_for_height(h), h),
        _ => return Ok(img),
    };
    if width <= 0 || height <= 0 {
        return Err(ScaleError::ProcessingFailed(format!(
            "Target size {target} resolves to {width}x{height}"
        )));
    }
    if (width, height) == (current.width, current.height) {
        debug!(%current, "Image already at target size, skipping resize");
        return Ok(img);
    }
    Ok(img.resize_exact(width as u32, height as u32, FilterType::Lanczos3))
}

/// Save a DynamicImage to the given path, inferring format from extension.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), ScaleError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let encode_failed =
        |e: image::ImageError| ScaleError::ProcessingFailed(format!("Encode failed: {}", e));

    match ext.as_str() {
        "jpg" | "jpeg" => {
            let file = std::fs::File::create(path)?;
            let writer = std::io::BufWriter::new(file);
            let encoder = JpegEncoder::new_with_quality(writer, quality as u8);
            DynamicImage::ImageRgb8(img.to_rgb8())
                .write_with_encoder(encoder)
                .map_err(encode_failed)
        }
        "png" => DynamicImage::ImageRgba8(img.to_rgba8())
            .save_with_format(path, ImageFormat::Png)
            .map_err(encode_failed),
        "webp" => DynamicImage::ImageRgba8(img.to_rgba8())
            .save_with_format(path, ImageFormat::WebP)
            .map_err(encode_failed),
        "tif" | "tiff" => DynamicImage::ImageRgb8(img.to_rgb8())
            .save_with_format(path, ImageFormat::Tiff)
            .map_err(encode_failed),
        other => Err(ScaleError::ProcessingFailed(format!(
            "Unsupported output format: {}",
            other
        ))),
    }
}

impl ImageResizer for RustResizer {
    fn get_size(&self, path: &Path) -> Result<Size, ScaleError> {
        verify_exists(path)?;
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            ScaleError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Size::new(to_i32(width)?, to_i32(height)?))
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), ScaleError> {
        let mut img = load_image(&params.source)?;

        if let Some(crop) = params.crop {
            img = apply_crop(img, crop)?;
        }
        if let Some(target) = params.target_size {
            img = apply_target_size(img, target)?;
        }

        if let Some(parent) = params.output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        save_image(&img, &params.output, params.quality.value())?;

        info!(
            source = %params.source.display(),
            output = %params.output.display(),
            width = img.width(),
            height = img.height(),
            "Rendered modification"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use crate::test_helpers::create_test_jpeg;

    fn params(source: &Path, output: &Path) -> ResizeParams {
        ResizeParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            target_size: None,
            crop: None,
            quality: Quality::new(85),
        }
    }

    #[test]
    fn get_size_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let size = RustResizer::new().get_size(&path).unwrap();
        assert_eq!(size, Size::new(200, 150));
    }

    #[test]
    fn get_size_nonexistent_file_is_source_missing() {
        let result = RustResizer::new().get_size(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(ScaleError::SourceMissing(_))));
    }

    #[test]
    fn resize_crop_then_scale() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 400, 300);

        let output = tmp.path().join("out.jpg");
        let resizer = RustResizer::new();
        resizer
            .resize(&ResizeParams {
                target_size: Some(Size::new(160, 90)),
                crop: Some(Rect::new(0, 37, 400, 225)),
                ..params(&source, &output)
            })
            .unwrap();

        assert_eq!(resizer.get_size(&output).unwrap(), Size::new(160, 90));
    }

    #[test]
    fn resize_crop_only_keeps_crop_size() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 400, 300);

        let output = tmp.path().join("out.png");
        let resizer = RustResizer::new();
        resizer
            .resize(&ResizeParams {
                crop: Some(Rect::new(50, 0, 300, 300)),
                ..params(&source, &output)
            })
            .unwrap();

        assert_eq!(resizer.get_size(&output).unwrap(), Size::new(300, 300));
    }

    #[test]
    fn resize_width_only_derives_height() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 400, 300);

        let output = tmp.path().join("out.jpg");
        let resizer = RustResizer::new();
        resizer
            .resize(&ResizeParams {
                target_size: Some(Size::new(200, 0)),
                ..params(&source, &output)
            })
            .unwrap();

        assert_eq!(resizer.get_size(&output).unwrap(), Size::new(200, 150));
    }

    #[test]
    fn resize_creates_output_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 100, 100);

        let output = tmp.path().join("nested/dir/out.jpg");
        RustResizer::new()
            .resize(&ResizeParams {
                target_size: Some(Size::new(50, 50)),
                ..params(&source, &output)
            })
            .unwrap();

        assert!(output.exists());
    }

    #[test]
    fn resize_crop_outside_image_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 400, 300);

        let result = RustResizer::new().resize(&ResizeParams {
            crop: Some(Rect::new(0, -20, 400, 300)),
            ..params(&source, &tmp.path().join("out.jpg"))
        });
        assert!(matches!(result, Err(ScaleError::CropOutOfBounds { .. })));
    }

    #[test]
    fn resize_unsupported_format_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 100, 100);

        let result = RustResizer::new().resize(&params(&source, &tmp.path().join("out.bmp")));
        assert!(matches!(result, Err(ScaleError::ProcessingFailed(_))));
    }

    #[test]
    fn resize_missing_source_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = RustResizer::new().resize(&params(
            &tmp.path().join("missing.jpg"),
            &tmp.path().join("out.jpg"),
        ));
        assert!(matches!(result, Err(ScaleError::SourceMissing(_))));
    }
}
