//! Exact fractions for aspect ratios and relative scale factors.

use super::GeometryError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A fraction stored in lowest terms with a non-negative denominator.
///
/// A zero denominator never fails construction: it normalizes to `0/0`,
/// [`ExactRatio::UNDEFINED`]. Arithmetic is checked against the `i32` range
/// because every ratio in this crate is derived from pixel dimensions.
///
/// ```
/// use imageserver::geometry::ExactRatio;
///
/// assert_eq!(ExactRatio::new(1600, 1200), ExactRatio::new(4, 3));
/// assert_eq!(ExactRatio::new(120, -40).numerator(), -3);
/// assert!(ExactRatio::new(5, 0).is_undefined());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExactRatio {
    numerator: i64,
    denominator: i64,
}

impl ExactRatio {
    pub const ONE: ExactRatio = ExactRatio {
        numerator: 1,
        denominator: 1,
    };

    pub const UNDEFINED: ExactRatio = ExactRatio {
        numerator: 0,
        denominator: 0,
    };

    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self::reduce(numerator as i128, denominator as i128)
    }

    fn reduce(numerator: i128, denominator: i128) -> Self {
        if denominator == 0 {
            return Self::UNDEFINED;
        }
        let divisor = gcd(numerator, denominator);
        let sign = if denominator < 0 { -1 } else { 1 };
        // -i64::MIN has no i64 form
        match (
            i64::try_from(sign * numerator / divisor),
            i64::try_from(sign * denominator / divisor),
        ) {
            (Ok(numerator), Ok(denominator)) => Self {
                numerator,
                denominator,
            },
            _ => Self::UNDEFINED,
        }
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    /// True if either side is zero.
    pub fn is_undefined(&self) -> bool {
        self.numerator == 0 || self.denominator == 0
    }

    pub fn is_negative(&self) -> bool {
        self.numerator < 0
    }

    pub fn is_larger_on_width(&self) -> bool {
        self.numerator > self.denominator
    }

    /// A square ratio is larger on neither side.
    pub fn is_larger_on_height(&self) -> bool {
        self.numerator < self.denominator
    }

    pub fn multiply(&self, other: ExactRatio) -> Result<ExactRatio, GeometryError> {
        bounds_check(
            self.numerator as i128 * other.numerator as i128,
            self.denominator as i128 * other.denominator as i128,
        )
    }

    pub fn divide(&self, other: ExactRatio) -> Result<ExactRatio, GeometryError> {
        bounds_check(
            self.numerator as i128 * other.denominator as i128,
            self.denominator as i128 * other.numerator as i128,
        )
    }

    pub fn add_integer(&self, addend: i32) -> Result<ExactRatio, GeometryError> {
        bounds_check(
            self.denominator as i128 * addend as i128 + self.numerator as i128,
            self.denominator as i128,
        )
    }

    /// Compare by cross-multiplication. Both denominators are non-negative,
    /// so the sign of the products is the sign of the difference.
    pub fn compare(&self, other: &ExactRatio) -> Ordering {
        let left = self.numerator as i128 * other.denominator as i128;
        let right = other.numerator as i128 * self.denominator as i128;
        left.cmp(&right)
    }

    /// `value * numerator / denominator`, truncating toward zero.
    ///
    /// Returns 0 for an undefined ratio and saturates at the `i32` range.
    pub fn scale(&self, value: i32) -> i32 {
        if self.denominator == 0 {
            return 0;
        }
        saturate(value as i128 * self.numerator as i128 / self.denominator as i128)
    }

    /// `value * denominator / numerator`, the inverse of [`scale`](Self::scale).
    pub fn descale(&self, value: i32) -> i32 {
        if self.numerator == 0 {
            return 0;
        }
        saturate(value as i128 * self.denominator as i128 / self.numerator as i128)
    }

    /// Width matching `height` at this ratio, rounded half away from zero.
    pub fn calculate_width_for_height(&self, height: i32) -> i32 {
        if self.denominator == 0 {
            return 0;
        }
        saturate(round_div(
            self.numerator as i128 * height as i128,
            self.denominator as i128,
        ))
    }

    /// Height matching `width` at this ratio, rounded half away from zero.
    pub fn calculate_height_for_width(&self, width: i32) -> i32 {
        if self.numerator == 0 {
            return 0;
        }
        saturate(round_div(
            self.denominator as i128 * width as i128,
            self.numerator as i128,
        ))
    }
}

fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

fn bounds_check(numerator: i128, denominator: i128) -> Result<ExactRatio, GeometryError> {
    let fits = |v: i128| (i32::MIN as i128..=i32::MAX as i128).contains(&v);
    if !fits(numerator) || !fits(denominator) {
        return Err(GeometryError::RatioOverflow {
            numerator,
            denominator,
        });
    }
    Ok(ExactRatio::reduce(numerator, denominator))
}

fn saturate(value: i128) -> i32 {
    value.clamp(i32::MIN as i128, i32::MAX as i128) as i32
}

fn round_div(numerator: i128, denominator: i128) -> i128 {
    let (n, d) = if denominator < 0 {
        (-numerator, -denominator)
    } else {
        (numerator, denominator)
    };
    if n >= 0 {
        (2 * n + d) / (2 * d)
    } else {
        -((-2 * n + d) / (2 * d))
    }
}

impl fmt::Display for ExactRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::UNDEFINED {
            return write!(f, "undefined");
        }
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for ExactRatio {
    type Err = GeometryError;

    /// Parses `"p/q"` where both sides are unsigned integers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GeometryError::InvalidRatio(s.to_string());
        if s == "undefined" {
            return Ok(Self::UNDEFINED);
        }
        let (p, q) = s.split_once('/').ok_or_else(invalid)?;
        let digits = |v: &str| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit());
        if !digits(p) || !digits(q) {
            return Err(invalid());
        }
        let p: i32 = p.parse().map_err(|_| invalid())?;
        let q: i32 = q.parse().map_err(|_| invalid())?;
        Ok(Self::new(p as i64, q as i64))
    }
}

impl Serialize for ExactRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExactRatio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
