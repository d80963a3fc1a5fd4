// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named points in the axis plane.

use alloc::string::String;
use core::cmp::Ordering;
use core::fmt;

use crate::error::{OpticsError, numeric};

/// A labelled `(x, y)` coordinate.
///
/// `y` is the axis position and `x` the transverse offset. Arithmetic is
/// exposed as named pure functions that return new points; the label is
/// carried over from `self`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Point {
    /// Transverse position.
    pub x: f64,
    /// Axis position.
    pub y: f64,
    /// Free-form label.
    pub name: String,
}

impl Point {
    /// Creates an unnamed point without validating the coordinates; see
    /// [`try_new`](Self::try_new).
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            name: String::new(),
        }
    }

    /// Creates an unnamed point, rejecting NaN coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if either coordinate is NaN.
    pub fn try_new(x: f64, y: f64) -> Result<Self, OpticsError> {
        Ok(Self::new(numeric(x, "point x is not a number")?, numeric(y, "point y is not a number")?))
    }

    /// Returns this point with the given label.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Creates an unnamed point from a kurbo point.
    #[inline]
    #[must_use]
    pub const fn from_kurbo(p: kurbo::Point) -> Self {
        Self::new(p.x, p.y)
    }

    /// The coordinates as a kurbo point.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }

    /// Componentwise sum.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        self.with_position(self.x + other.x, self.y + other.y)
    }

    /// Componentwise difference `self - other`.
    #[must_use]
    pub fn minus(&self, other: &Self) -> Self {
        self.with_position(self.x - other.x, self.y - other.y)
    }

    /// `k` added to both coordinates; subtract with a negative `k`.
    #[must_use]
    pub fn offset_by(&self, k: f64) -> Self {
        self.with_position(self.x + k, self.y + k)
    }

    /// Both coordinates multiplied by `k`.
    #[must_use]
    pub fn scaled(&self, k: f64) -> Self {
        self.with_position(self.x * k, self.y * k)
    }

    /// Componentwise product.
    #[must_use]
    pub fn scale_by(&self, other: &Self) -> Self {
        self.with_position(self.x * other.x, self.y * other.y)
    }

    /// Euclidean distance from the origin.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.position().to_vec2().hypot()
    }

    /// Total order along the axis: by `y`, then by `x`.
    ///
    /// NaN sorts after every number, per [`f64::total_cmp`].
    #[must_use]
    pub fn axial_cmp(&self, other: &Self) -> Ordering {
        self.y
            .total_cmp(&other.y)
            .then_with(|| self.x.total_cmp(&other.x))
    }

    /// Whether light reaches `self` before `other` (larger `y` comes first).
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.y > other.y
    }

    fn with_position(&self, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            name: self.name.clone(),
        }
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self::from_kurbo(p)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point \"{}\": ({:.2}, {:.2})", self.name, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_pure() {
        let a = Point::new(1.0, 2.0).named("a");
        let b = Point::new(3.0, -4.0);
        let sum = a.plus(&b);
        assert_eq!((sum.x, sum.y), (4.0, -2.0));
        assert_eq!(sum.name, "a");
        let diff = a.minus(&b);
        assert_eq!((diff.x, diff.y), (-2.0, 6.0));
        assert_eq!(a.scaled(2.0).position(), kurbo::Point::new(2.0, 4.0));
        assert_eq!(a.scale_by(&b).position(), kurbo::Point::new(3.0, -8.0));
        assert_eq!((a.x, a.y), (1.0, 2.0));
    }

    #[test]
    fn scalar_offset_shifts_both_coordinates() {
        let a = Point::new(1.0, 2.0).named("a");
        let up = a.offset_by(0.5);
        assert_eq!(up.position(), kurbo::Point::new(1.5, 2.5));
        assert_eq!(up.name, "a");
        assert_eq!(a.offset_by(-3.0).position(), kurbo::Point::new(-2.0, -1.0));
    }

    #[test]
    fn magnitude() {
        assert!((Point::new(3.0, 4.0).magnitude() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn try_new_rejects_nan() {
        assert!(Point::try_new(f64::NAN, 0.0).is_err());
        assert!(Point::try_new(0.0, f64::NAN).is_err());
        assert!(Point::try_new(f64::INFINITY, 0.0).is_ok());
    }

    #[test]
    fn axial_order_is_total_and_consistent() {
        let low = Point::new(5.0, 1.0);
        let high = Point::new(-5.0, 2.0);
        let high_right = Point::new(0.0, 2.0);
        assert_eq!(low.axial_cmp(&high), Ordering::Less);
        assert_eq!(high.axial_cmp(&low), Ordering::Greater);
        assert_eq!(high.axial_cmp(&high_right), Ordering::Less);
        assert_eq!(high_right.axial_cmp(&high), Ordering::Greater);
        assert_eq!(low.axial_cmp(&low.clone()), Ordering::Equal);
        assert!(high.is_before(&low));
        assert!(!low.is_before(&high));
    }

    #[test]
    fn display_summary() {
        let p = Point::new(1.0, 2.5).named("tip");
        assert_eq!(alloc::format!("{p}"), "Point \"tip\": (1.00, 2.50)");
    }
}
