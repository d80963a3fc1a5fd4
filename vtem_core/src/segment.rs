// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directed straight segments between two points.
//!
//! Light travels toward decreasing `y`; a segment's angle is always derived
//! from its current endpoints (see [`angle`](crate::angle) for the sign
//! convention). Setting an angle moves exactly one endpoint and preserves the
//! segment's extent along the axis, `|dy|`.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::angle::{self, AngleUnit};
use crate::error::{OpticsError, numeric};
use crate::point::Point;

/// Which endpoint stays put when a segment is re-aimed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FixedEnd {
    /// Keep the start point; move the stop.
    #[default]
    Start,
    /// Keep the stop point; move the start.
    Stop,
}

impl FixedEnd {
    /// Parses `"start"` or `"stop"`.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] for any other string.
    pub fn parse(s: &str) -> Result<Self, OpticsError> {
        match s {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            _ => Err(OpticsError::InvalidArgument(
                "fixed end must be \"start\" or \"stop\"",
            )),
        }
    }
}

impl FromStr for FixedEnd {
    type Err = OpticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Position of the free endpoint for a segment anchored at `fixed` with the
/// given axial extent and direction angle (degrees).
///
/// Axial (0°, 180°) and perpendicular (±90°) directions are placed exactly;
/// perpendicular ones put the free end at `x = ±∞` on the fixed end's axis
/// position.
pub(crate) fn place(
    fixed: kurbo::Point,
    axial_length: f64,
    degrees: f64,
    end: FixedEnd,
) -> kurbo::Point {
    let sign = match end {
        FixedEnd::Start => 1.0,
        FixedEnd::Stop => -1.0,
    };
    let r = angle::reduce(degrees);
    if r == 0.0 {
        kurbo::Point::new(fixed.x, fixed.y - sign * axial_length)
    } else if r == 180.0 {
        kurbo::Point::new(fixed.x, fixed.y + sign * axial_length)
    } else if r % 90.0 == 0.0 {
        let x = if r < 0.0 {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        kurbo::Point::new(x, fixed.y)
    } else if r.abs() < 90.0 {
        kurbo::Point::new(
            fixed.x + sign * angle::tan(r) * axial_length,
            fixed.y - sign * axial_length,
        )
    } else {
        kurbo::Point::new(
            fixed.x - sign * angle::tan(r) * axial_length,
            fixed.y + sign * axial_length,
        )
    }
}

/// Moves the stop of `start → stop` to axis position `y`, keeping the
/// direction seen from `start`.
pub(crate) fn extended(start: kurbo::Point, stop: kurbo::Point, y: f64) -> kurbo::Point {
    let degrees = angle::direction(stop - start);
    place(start, (y - start.y).abs(), degrees, FixedEnd::Start)
}

/// A directed segment from `start` to `stop`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Segment {
    /// Where the segment begins.
    pub start: Point,
    /// Where the segment ends.
    pub stop: Point,
    /// Free-form label.
    pub name: String,
}

impl Segment {
    /// Creates an unnamed segment. The endpoints are taken as given; build
    /// them with [`Point::try_new`] to reject NaN.
    #[must_use]
    pub const fn new(start: Point, stop: Point) -> Self {
        Self {
            start,
            stop,
            name: String::new(),
        }
    }

    /// Creates a segment and immediately aims it at `degrees`, keeping the
    /// start fixed. The angle is only applied when the segment has a
    /// non-zero axial extent.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `degrees` is NaN.
    pub fn with_angle(start: Point, stop: Point, degrees: f64) -> Result<Self, OpticsError> {
        let mut segment = Self::new(start, stop);
        numeric(degrees, "angle is not a number")?;
        if segment.dy().abs() > 0.0 {
            segment.set_angle(degrees, FixedEnd::Start, AngleUnit::Degrees)?;
        }
        Ok(segment)
    }

    /// Returns this segment with the given label.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Transverse extent, `stop.x - start.x`.
    #[inline]
    #[must_use]
    pub fn dx(&self) -> f64 {
        self.stop.x - self.start.x
    }

    /// Axial extent, `stop.y - start.y` (negative for forward travel).
    #[inline]
    #[must_use]
    pub fn dy(&self) -> f64 {
        self.stop.y - self.start.y
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.position().distance(self.stop.position())
    }

    /// Signed angle relative to forward propagation, in `(-180°, 180°]` (or
    /// the radian equivalent).
    #[must_use]
    pub fn angle(&self, unit: AngleUnit) -> f64 {
        unit.from_degrees(angle::direction(self.stop.position() - self.start.position()))
    }

    /// Re-aims the segment, moving the end that is not `fixed` and keeping
    /// `|dy|`.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `value` is NaN.
    pub fn set_angle(
        &mut self,
        value: f64,
        fixed: FixedEnd,
        unit: AngleUnit,
    ) -> Result<(), OpticsError> {
        let degrees = unit.to_degrees(numeric(value, "angle is not a number")?);
        let axial_length = self.dy().abs();
        match fixed {
            FixedEnd::Start => {
                let p = place(self.start.position(), axial_length, degrees, fixed);
                (self.stop.x, self.stop.y) = (p.x, p.y);
            }
            FixedEnd::Stop => {
                let p = place(self.stop.position(), axial_length, degrees, fixed);
                (self.start.x, self.start.y) = (p.x, p.y);
            }
        }
        Ok(())
    }

    /// Rotates the segment by `delta` about the fixed end.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `delta` is NaN.
    pub fn tilt(&mut self, delta: f64, fixed: FixedEnd, unit: AngleUnit) -> Result<(), OpticsError> {
        let current = self.angle(unit);
        self.set_angle(current + numeric(delta, "tilt is not a number")?, fixed, unit)
    }

    /// Moves the stop to axis position `y` (or `start.y + y` when
    /// `relative`), keeping the current angle.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `y` is NaN.
    pub fn extend(&mut self, y: f64, relative: bool) -> Result<(), OpticsError> {
        let y = numeric(y, "axis position is not a number")?;
        let target = if relative { self.start.y + y } else { y };
        let p = extended(self.start.position(), self.stop.position(), target);
        (self.stop.x, self.stop.y) = (p.x, p.y);
        Ok(())
    }

    /// Shortens or lengthens the segment so that it spans exactly
    /// `|axial_length|` in the direction of travel, keeping its angle.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `axial_length` is NaN.
    pub fn cut(&mut self, axial_length: f64) -> Result<(), OpticsError> {
        let axial_length = numeric(axial_length, "length is not a number")?.abs();
        let degrees = self.angle(AngleUnit::Degrees);
        let p = place(self.start.position(), axial_length, degrees, FixedEnd::Start);
        (self.stop.x, self.stop.y) = (p.x, p.y);
        Ok(())
    }

    /// Transverse position where the segment crosses axis position `y` (or
    /// `start.y + y` when `relative`).
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::OutOfRange`] unless the position lies strictly
    /// between the two endpoint axis positions; this never extrapolates.
    pub fn x_at_y(&self, y: f64, relative: bool) -> Result<f64, OpticsError> {
        let target = if relative { self.start.y + y } else { y };
        let (lo, hi) = if self.start.y < self.stop.y {
            (self.start.y, self.stop.y)
        } else {
            (self.stop.y, self.start.y)
        };
        if !(lo < target && target < hi) {
            return Err(OpticsError::OutOfRange {
                y: target,
                start: self.start.y,
                stop: self.stop.y,
            });
        }
        Ok(self.start.x + self.dx() * (target - self.start.y) / self.dy())
    }

    /// The segment as a kurbo line.
    #[inline]
    #[must_use]
    pub fn to_line(&self) -> kurbo::Line {
        kurbo::Line::new(self.start.position(), self.stop.position())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Segment \"{}\": ({:.2}, {:.2}) -> ({:.2}, {:.2}) ({:.2} deg)",
            self.name,
            self.start.x,
            self.start.y,
            self.stop.x,
            self.stop.y,
            self.angle(AngleUnit::Degrees),
        )
    }
}
