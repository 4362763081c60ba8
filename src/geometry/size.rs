use super::{ExactRatio, GeometryError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel dimensions. A zero side means "unknown" for requested resolutions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Aspect ratio as `width:height`.
    pub fn ratio(&self) -> ExactRatio {
        ExactRatio::new(self.width as i64, self.height as i64)
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// True if both sides are at most those of `boundaries`.
    pub fn fits_in(&self, boundaries: Size) -> bool {
        self.width <= boundaries.width && self.height <= boundaries.height
    }

    /// Scale both sides; the identity ratio hands back `self` untouched.
    pub fn scale_by(self, ratio: ExactRatio) -> Size {
        if ratio == ExactRatio::ONE {
            return self;
        }
        Size::new(ratio.scale(self.width), ratio.scale(self.height))
    }

    /// Downscale proportionally so the height is at most `max_height`.
    pub fn scale_if_higher(self, max_height: i32) -> Size {
        if self.height <= max_height || self.height == 0 {
            return self;
        }
        let width = self.width as i64 * max_height as i64 / self.height as i64;
        Size::new(width as i32, max_height)
    }

    /// Downscale proportionally so the width is at most `max_width`.
    pub fn scale_if_wider(self, max_width: i32) -> Size {
        if self.width <= max_width || self.width == 0 {
            return self;
        }
        let height = self.height as i64 * max_width as i64 / self.width as i64;
        Size::new(max_width, height as i32)
    }

    pub fn is_proportional_to(&self, other: Size) -> bool {
        self.width as i64 * other.height as i64 == self.height as i64 * other.width as i64
    }

    /// Factor that turns `base` into `self`.
    ///
    /// Fails with [`GeometryError::NotProportional`] if the two sizes have
    /// different aspect ratios.
    pub fn relative_size(&self, base: Size) -> Result<ExactRatio, GeometryError> {
        if !self.is_proportional_to(base) {
            return Err(GeometryError::NotProportional { size: *self, base });
        }
        Ok(self.relative_size_unchecked(base))
    }

    /// Like [`relative_size`](Self::relative_size) without the proportionality
    /// check; only the widths are compared unless they are zero.
    pub fn relative_size_unchecked(&self, base: Size) -> ExactRatio {
        if base.width != 0 {
            ExactRatio::new(self.width as i64, base.width as i64)
        } else {
            ExactRatio::new(self.height as i64, base.height as i64)
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_reduced() {
        assert_eq!(Size::new(1600, 1200).ratio(), ExactRatio::new(4, 3));
        assert!(Size::new(1600, 0).ratio().is_undefined());
    }

    #[test]
    fn scale_by_identity_is_noop() {
        for size in [Size::new(0, 0), Size::new(1, 1), Size::new(1920, 1080), Size::new(7, 3)] {
            assert_eq!(size.scale_by(ExactRatio::ONE), size);
            assert_eq!(size.scale_by(ExactRatio::new(5, 5)), size);
        }
    }

    #[test]
    fn scale_by_truncates() {
        assert_eq!(Size::new(1600, 1200).scale_by(ExactRatio::new(1, 2)), Size::new(800, 600));
        assert_eq!(Size::new(1001, 751).scale_by(ExactRatio::new(1, 2)), Size::new(500, 375));
    }

    #[test]
    fn scale_if_higher_keeps_ratio() {
        assert_eq!(Size::new(1600, 1200).scale_if_higher(600), Size::new(800, 600));
        assert_eq!(Size::new(1600, 1200).scale_if_higher(1200), Size::new(1600, 1200));
        // 1000 * 333 / 750 = 444 (truncated)
        assert_eq!(Size::new(1000, 750).scale_if_higher(333), Size::new(444, 333));
    }

    #[test]
    fn scale_if_wider_keeps_ratio() {
        assert_eq!(Size::new(1600, 1200).scale_if_wider(800), Size::new(800, 600));
        assert_eq!(Size::new(400, 300).scale_if_wider(800), Size::new(400, 300));
        assert_eq!(Size::new(1000, 751).scale_if_wider(500), Size::new(500, 375));
    }

    #[test]
    fn proportional_sizes() {
        assert!(Size::new(400, 300).is_proportional_to(Size::new(800, 600)));
        assert!(!Size::new(400, 300).is_proportional_to(Size::new(800, 601)));
        // Products beyond i32 must not overflow
        assert!(Size::new(i32::MAX, i32::MAX).is_proportional_to(Size::new(1, 1)));
    }

    #[test]
    fn relative_size_of_proportional_sizes() {
        let rel = Size::new(400, 300).relative_size(Size::new(800, 600)).unwrap();
        assert_eq!(rel, ExactRatio::new(1, 2));
        assert_eq!(Size::new(800, 600).scale_by(rel), Size::new(400, 300));
    }

    #[test]
    fn relative_size_rejects_different_ratios() {
        let result = Size::new(400, 400).relative_size(Size::new(800, 600));
        assert!(matches!(result, Err(GeometryError::NotProportional { .. })));
        assert_eq!(
            Size::new(400, 400).relative_size_unchecked(Size::new(800, 600)),
            ExactRatio::new(1, 2)
        );
    }

    #[test]
    fn fits_in_is_inclusive() {
        let boundaries = Size::new(1600, 1200);
        assert!(Size::new(1024, 768).fits_in(boundaries));
        assert!(boundaries.fits_in(boundaries));
        assert!(!Size::new(1024, 1201).fits_in(boundaries));
        assert!(!Size::new(1601, 768).fits_in(boundaries));
    }
}
