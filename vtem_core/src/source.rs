// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ray emitters.

use alloc::format;
use alloc::string::String;
use core::fmt;

use kurbo::Line;

use crate::angle::reduce;
use crate::error::{OpticsError, finite, numeric};
use crate::path::Path;
use crate::point::Point;
use crate::segment::{self, FixedEnd, Segment};

/// An extended source at the top of the column.
///
/// Rays leave from a point across the source aperture and travel toward
/// decreasing `y`.
#[derive(Clone, Debug, PartialEq)]
pub struct Source {
    x: f64,
    y: f64,
    size: f64,
    name: String,
}

impl Source {
    /// Creates a source at axis position `y` with the given aperture,
    /// centred on the axis.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if a value is not finite.
    pub fn new(name: impl Into<String>, y: f64, size: f64) -> Result<Self, OpticsError> {
        Ok(Self {
            x: 0.0,
            y: finite(y, "source position is not finite")?,
            size: finite(size, "aperture is not finite")?.abs(),
            name: name.into(),
        })
    }

    /// Returns this source moved to transverse offset `x`.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `x` is not finite.
    pub fn with_offset(mut self, x: f64) -> Result<Self, OpticsError> {
        self.set_offset(x)?;
        Ok(self)
    }

    /// The source label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Axis position of the source plane.
    #[must_use]
    pub const fn axis_position(&self) -> f64 {
        self.y
    }

    /// Transverse offset of the source center.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.x
    }

    /// Aperture (full width).
    #[must_use]
    pub const fn aperture(&self) -> f64 {
        self.size
    }

    /// The source plane across its aperture, for drawing.
    #[must_use]
    pub fn marker(&self) -> Line {
        let half = self.size / 2.0;
        Line::new((self.x - half, self.y), (self.x + half, self.y))
    }

    /// Moves the source along the axis.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `y` is not finite.
    pub fn set_axis_position(&mut self, y: f64) -> Result<(), OpticsError> {
        self.y = finite(y, "source position is not finite")?;
        Ok(())
    }

    /// Moves the source transversely.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `x` is not finite.
    pub fn set_offset(&mut self, x: f64) -> Result<(), OpticsError> {
        self.x = finite(x, "source offset is not finite")?;
        Ok(())
    }

    /// Changes the aperture; negative values are taken by magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `size` is not finite.
    pub fn set_aperture(&mut self, size: f64) -> Result<(), OpticsError> {
        self.size = finite(size, "aperture is not finite")?.abs();
        Ok(())
    }

    /// Point on the source plane at `fraction` of the half-aperture from
    /// the center: `-1` is the left edge and `1` the right edge.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `fraction` is not finite.
    pub fn emission_point(&self, fraction: f64) -> Result<kurbo::Point, OpticsError> {
        let fraction = finite(fraction, "emission fraction is not finite")?;
        Ok(kurbo::Point::new(self.x + fraction * self.size / 2.0, self.y))
    }

    /// Emits a single-segment ray from [`emission_point`](Self::emission_point)
    /// at `angle` degrees, spanning `|length|` along the axis.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `angle` is NaN or does not
    /// point down the axis (`|angle| >= 90°` after reduction), if `fraction`
    /// or `length` is not finite, or if `length` is zero.
    pub fn emit(&self, angle: f64, fraction: f64, length: f64) -> Result<Path, OpticsError> {
        let angle = numeric(angle, "emission angle is not a number")?;
        if reduce(angle).abs() >= 90.0 {
            return Err(OpticsError::InvalidArgument(
                "emission angle must point down the axis",
            ));
        }
        let length = finite(length, "emission length is not finite")?.abs();
        if length == 0.0 {
            return Err(OpticsError::InvalidArgument("emission length must be non-zero"));
        }
        let start = self.emission_point(fraction)?;
        let stop = segment::place(start, length, angle, FixedEnd::Start);
        Ok(Path::from_segment(
            Segment::new(
                Point::from_kurbo(start).named(format!("{} (emission)", self.name)),
                Point::from_kurbo(stop),
            )
            .named(self.name.clone()),
        ))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Source {}: {:.2} | {:.2}/{:.2}",
            self.name, self.y, self.x, self.size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::AngleUnit;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn source() -> Source {
        Source::new("Source", 220.0, 10.0).unwrap()
    }

    #[test]
    fn emission_point_spans_aperture() {
        let s = source().with_offset(1.0).unwrap();
        assert_eq!(s.emission_point(0.0).unwrap(), kurbo::Point::new(1.0, 220.0));
        assert_eq!(s.emission_point(1.0).unwrap(), kurbo::Point::new(6.0, 220.0));
        assert_eq!(s.emission_point(-1.0).unwrap(), kurbo::Point::new(-4.0, 220.0));
        assert!(s.emission_point(f64::NAN).is_err());
    }

    #[test]
    fn emitted_ray_travels_down_the_axis() {
        let ray = source().emit(10.0, 1.0, -3.0).unwrap();
        assert_eq!(ray.segment_count(), 1);
        assert!(close(ray.current_start().x, 5.0));
        assert!(close(ray.end_position().y, 217.0));
        assert!(close(ray.angle(AngleUnit::Degrees), 10.0));
        assert_eq!(ray.last_segment().name, "Source");
        assert_eq!(ray.last_segment().start.name, "Source (emission)");
    }

    #[test]
    fn emit_validates_input() {
        let s = source();
        assert!(s.emit(f64::NAN, 0.0, 1.0).is_err());
        assert!(s.emit(0.0, f64::INFINITY, 1.0).is_err());
        assert_eq!(
            s.emit(0.0, 0.0, 0.0).err(),
            Some(OpticsError::InvalidArgument("emission length must be non-zero"))
        );
    }

    #[test]
    fn emit_rejects_rays_that_leave_upward() {
        let s = source();
        for angle in [90.0, -90.0, 120.0, 180.0, -135.0, 270.0] {
            assert_eq!(
                s.emit(angle, 0.0, 1.0).err(),
                Some(OpticsError::InvalidArgument(
                    "emission angle must point down the axis"
                )),
                "angle {angle}"
            );
        }
        // Reduced into range first.
        let ray = s.emit(370.0, 0.0, 1.0).unwrap();
        assert!(close(ray.angle(AngleUnit::Degrees), 10.0));
        assert!(ray.end_position().y < ray.current_start().y);
    }

    #[test]
    fn setters_reject_non_finite() {
        let mut s = source();
        assert!(s.set_axis_position(f64::NAN).is_err());
        assert!(s.set_offset(f64::INFINITY).is_err());
        s.set_aperture(-4.0).unwrap();
        assert_eq!(s.aperture(), 4.0);
        assert_eq!(s.axis_position(), 220.0);
        assert_eq!(s.marker(), Line::new((-2.0, 220.0), (2.0, 220.0)));
    }

    #[test]
    fn summary_line() {
        assert_eq!(alloc::format!("{}", source()), "Source Source: 220.00 | 0.00/10.00");
    }
}
