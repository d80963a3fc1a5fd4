// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Idealized thin lenses.
//!
//! A thin lens sits at one axis position and bends a ray without moving its
//! arrival point. The bend is the thin-lens law: a ray arriving at transverse
//! offset `h` from the lens center leaves rotated by `-atan(h / f)`, so every
//! ray parallel to the axis crosses the back focal point.

use alloc::format;
use alloc::string::String;
use core::cmp::Ordering;
use core::fmt;

use kurbo::Line;

use crate::angle::{self, AngleUnit};
use crate::error::{OpticsError, finite};
use crate::path::Path;
use crate::point::Point;
use crate::segment::{self, FixedEnd, Segment};

/// Axial extent of a freshly transmitted ray, measured from the lens plane.
pub const TRANSMITTED_LENGTH: f64 = 1.0;

/// Line extents for drawing a lens: the lens plane and both focal planes,
/// each as wide as the aperture and centred on the lens offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LensMarkers {
    /// The lens plane.
    pub lens: Line,
    /// Front focal plane, `focal_length` above the lens.
    pub front_focal_plane: Line,
    /// Back focal plane, `focal_length` below the lens.
    pub back_focal_plane: Line,
}

/// A thin lens on the optical axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Lens {
    y: f64,
    focal_length: f64,
    x: f64,
    size: f64,
    name: String,
}

impl Lens {
    /// Creates a lens at axis position `y` with the given focal length,
    /// centred on the axis with unit aperture.
    ///
    /// Negative focal lengths are taken by magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `y` or `focal_length` is
    /// not finite.
    pub fn new(name: impl Into<String>, y: f64, focal_length: f64) -> Result<Self, OpticsError> {
        Ok(Self {
            y: finite(y, "lens position is not finite")?,
            focal_length: finite(focal_length, "focal length is not finite")?.abs(),
            x: 0.0,
            size: 1.0,
            name: name.into(),
        })
    }

    /// Assembles a lens from parameters that were validated elsewhere.
    pub(crate) fn from_parts(name: String, y: f64, focal_length: f64, x: f64, size: f64) -> Self {
        Self {
            y,
            focal_length,
            x,
            size,
            name,
        }
    }

    /// Returns this lens with its center moved to transverse offset `x`.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `x` is not finite.
    pub fn with_offset(mut self, x: f64) -> Result<Self, OpticsError> {
        self.set_offset(x)?;
        Ok(self)
    }

    /// Returns this lens with the given aperture.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `size` is not finite.
    pub fn with_aperture(mut self, size: f64) -> Result<Self, OpticsError> {
        self.set_aperture(size)?;
        Ok(self)
    }

    // -- Accessors --

    /// The lens label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Axis position of the lens plane.
    #[must_use]
    pub const fn axis_position(&self) -> f64 {
        self.y
    }

    /// Focal length (never negative).
    #[must_use]
    pub const fn focal_length(&self) -> f64 {
        self.focal_length
    }

    /// Transverse offset of the lens center.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.x
    }

    /// Aperture (full width).
    #[must_use]
    pub const fn aperture(&self) -> f64 {
        self.size
    }

    /// Axis position of the front focal plane.
    #[must_use]
    pub const fn front_focal_plane(&self) -> f64 {
        self.y + self.focal_length
    }

    /// Axis position of the back focal plane.
    #[must_use]
    pub const fn back_focal_plane(&self) -> f64 {
        self.y - self.focal_length
    }

    /// The back focal point, where rays parallel to the axis converge.
    #[must_use]
    pub const fn focal_point(&self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.back_focal_plane())
    }

    /// Drawing extents for the lens and its focal planes.
    #[must_use]
    pub fn markers(&self) -> LensMarkers {
        let half = self.size / 2.0;
        let across = |y: f64| Line::new((self.x - half, y), (self.x + half, y));
        LensMarkers {
            lens: across(self.y),
            front_focal_plane: across(self.front_focal_plane()),
            back_focal_plane: across(self.back_focal_plane()),
        }
    }

    /// Travel-order comparison: the lens light reaches first sorts first.
    #[must_use]
    pub fn travel_cmp(&self, other: &Self) -> Ordering {
        other
            .y
            .total_cmp(&self.y)
            .then_with(|| self.name.cmp(&other.name))
    }

    // -- Setters --

    /// Moves the lens plane.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `y` is not finite.
    pub fn set_axis_position(&mut self, y: f64) -> Result<(), OpticsError> {
        self.y = finite(y, "lens position is not finite")?;
        Ok(())
    }

    /// Changes the focal length; negative values are taken by magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `f` is not finite.
    pub fn set_focal_length(&mut self, f: f64) -> Result<(), OpticsError> {
        self.focal_length = finite(f, "focal length is not finite")?.abs();
        Ok(())
    }

    /// Moves the lens center transversely.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `x` is not finite.
    pub fn set_offset(&mut self, x: f64) -> Result<(), OpticsError> {
        self.x = finite(x, "lens offset is not finite")?;
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

    /// Widens or narrows the aperture so the lens spans at least out to
    /// whichever of `left` and `right` is farther from its center.
    ///
    /// Non-finite bounds leave the aperture unchanged.
    pub fn fit_aperture(&mut self, left: f64, right: f64) {
        if let Some(size) = fitted_aperture(self.x, left, right) {
            self.size = size;
        }
    }

    // -- Transmission --

    /// Checks that `incoming` can be transmitted by this lens, without
    /// touching it.
    ///
    /// # Errors
    ///
    /// - [`OpticsError::TransmissionOrder`] unless the ray currently starts
    ///   strictly above the lens plane.
    /// - [`OpticsError::SingularTransmission`] if the focal length is zero
    ///   or the ray never reaches the lens plane because it runs
    ///   perpendicular to the axis or back up it.
    pub fn check(&self, incoming: &Path) -> Result<(), OpticsError> {
        self.arrival(incoming).map(|_| ())
    }

    /// Where `incoming` would meet the lens plane.
    fn arrival(&self, incoming: &Path) -> Result<kurbo::Point, OpticsError> {
        let start = incoming.current_start();
        if start.y <= self.y {
            return Err(OpticsError::TransmissionOrder {
                element_y: self.y,
                ray_y: start.y,
            });
        }
        let heading = angle::direction(incoming.end_position() - start);
        if self.focal_length == 0.0 || heading.abs() >= 90.0 {
            return Err(OpticsError::SingularTransmission { element_y: self.y });
        }
        let arrival = segment::extended(start, incoming.end_position(), self.y);
        if !arrival.x.is_finite() {
            return Err(OpticsError::SingularTransmission { element_y: self.y });
        }
        Ok(arrival)
    }

    /// Transmits a ray through the lens.
    ///
    /// The final segment of `incoming` is extended (at its current angle) so
    /// that it ends on the lens plane. The returned path starts at that
    /// arrival point and leaves at the incoming angle minus
    /// `atan((arrival.x - offset) / focal_length)`, travelling toward
    /// decreasing `y` with an axial extent of [`TRANSMITTED_LENGTH`]. A ray
    /// bent exactly perpendicular to the axis instead ends at `x = ±∞` on the
    /// lens plane, on the side its exit angle points to.
    ///
    /// # Errors
    ///
    /// See [`check`](Self::check). On error `incoming` is left unmodified.
    pub fn transmit(&self, incoming: &mut Path) -> Result<Path, OpticsError> {
        let arrival = self.arrival(incoming)?;
        let incoming_angle = incoming.angle(AngleUnit::Degrees);

        let deviation = angle::atan_ratio(arrival.x - self.x, self.focal_length);
        let exit_angle = angle::reduce(incoming_angle - deviation);

        // Aim at the back focal point first so the axial extent equals f.
        let mut ray = Segment::new(
            Point::from_kurbo(arrival).named(format!("{} (start)", self.name)),
            Point::from_kurbo(self.focal_point()).named(format!("{} (end)", self.name)),
        )
        .named(self.name.clone());
        ray.set_angle(exit_angle, FixedEnd::Start, AngleUnit::Degrees)?;

        if ray.stop.y > ray.start.y {
            // Bent back past the perpendicular: run the same line forward.
            ray.stop.x = 2.0 * ray.start.x - ray.stop.x;
            ray.stop.y = 2.0 * ray.start.y - ray.stop.y;
        }
        ray.cut(TRANSMITTED_LENGTH)?;

        incoming.extend(self.y)?;
        Ok(Path::from_segment(ray))
    }
}

/// Full aperture that reaches from `center` out to the farther of `left`
/// and `right`, or `None` if either bound is not finite.
pub(crate) fn fitted_aperture(center: f64, left: f64, right: f64) -> Option<f64> {
    if !(left.is_finite() && right.is_finite()) {
        return None;
    }
    Some(2.0 * (left - center).abs().max((right - center).abs()))
}

impl fmt::Display for Lens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lens {}: {:.2} ({:.2}) | {:.2}/{:.2}",
            self.name, self.y, self.focal_length, self.x, self.size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// A ray parallel to the axis at height `h`, starting at `y`.
    fn parallel(h: f64, y: f64) -> Path {
        Path::new(Point::new(h, y), Point::new(h, y - 1.0))
    }

    /// Axis position where the ray's line crosses `x = 0`.
    fn axis_crossing(ray: &Path) -> f64 {
        let s = ray.last_segment();
        s.start.y - s.start.x * s.dy() / s.dx()
    }

    #[test]
    fn parallel_ray_focuses_at_back_focal_point() {
        let lens = Lens::new("CL1", 200.0, 2.0).unwrap();
        let mut incoming = parallel(1.0, 220.0);
        let out = lens.transmit(&mut incoming).unwrap();

        assert!(close(incoming.end_position().y, 200.0));
        assert!(close(incoming.end_position().x, 1.0));

        assert!(close(out.current_start().y, 200.0));
        assert!((out.angle(AngleUnit::Degrees) - -26.565_051_177_077_99).abs() < 1e-6);
        assert!((axis_crossing(&out) - 198.0).abs() < 1e-9);
        assert!(close(out.end_position().y, 200.0 - TRANSMITTED_LENGTH));
    }

    #[test]
    fn ray_through_center_is_undeviated() {
        let lens = Lens::new("L", 0.0, 5.0).unwrap().with_offset(2.0).unwrap();
        let mut incoming = Path::from_segment(
            Segment::with_angle(Point::new(2.0, 10.0), Point::new(2.0, 9.0), 0.0).unwrap(),
        );
        let out = lens.transmit(&mut incoming).unwrap();
        assert!(close(out.angle(AngleUnit::Degrees), 0.0));
        assert!(close(out.current_start().x, 2.0));
    }

    #[test]
    fn tilted_ray_keeps_incoming_angle_through_center() {
        let lens = Lens::new("L", 0.0, 3.0).unwrap();
        let mut incoming = Path::from_segment(
            Segment::with_angle(Point::new(-10.0, 10.0), Point::new(-10.0, 9.0), 45.0).unwrap(),
        );
        let out = lens.transmit(&mut incoming).unwrap();
        // Arrives at the center, so no bend.
        assert!(close(out.current_start().x, 0.0));
        assert!(close(out.angle(AngleUnit::Degrees), 45.0));
    }

    #[test]
    fn order_violation_leaves_ray_untouched() {
        let lens = Lens::new("L", 50.0, 2.0).unwrap();
        let mut incoming = parallel(1.0, 40.0);
        let before = incoming.polyline();
        assert_eq!(
            lens.transmit(&mut incoming).err(),
            Some(OpticsError::TransmissionOrder {
                element_y: 50.0,
                ray_y: 40.0
            })
        );
        assert_eq!(incoming.polyline(), before);
    }

    #[test]
    fn ray_starting_on_lens_plane_is_out_of_order() {
        let lens = Lens::new("L", 40.0, 2.0).unwrap();
        let mut incoming = parallel(0.0, 40.0);
        assert!(matches!(
            lens.transmit(&mut incoming),
            Err(OpticsError::TransmissionOrder { .. })
        ));
    }

    #[test]
    fn zero_focal_length_is_singular() {
        let lens = Lens::new("L", 0.0, 0.0).unwrap();
        let mut incoming = parallel(1.0, 5.0);
        let before = incoming.polyline();
        assert!(matches!(
            lens.transmit(&mut incoming),
            Err(OpticsError::SingularTransmission { .. })
        ));
        assert_eq!(incoming.polyline(), before);
    }

    #[test]
    fn perpendicular_ray_is_singular() {
        let lens = Lens::new("L", 0.0, 1.0).unwrap();
        let mut seg = Segment::new(Point::new(0.0, 5.0), Point::new(0.0, 4.0));
        seg.set_angle(90.0, FixedEnd::Start, AngleUnit::Degrees)
            .unwrap();
        let mut incoming = Path::from_segment(seg);
        assert!(matches!(
            lens.transmit(&mut incoming),
            Err(OpticsError::SingularTransmission { .. })
        ));
    }

    #[test]
    fn ray_heading_back_up_the_axis_is_singular() {
        let lens = Lens::new("L", 200.0, 2.0).unwrap();
        let mut seg = Segment::new(Point::new(0.0, 220.0), Point::new(0.0, 219.0));
        seg.set_angle(120.0, FixedEnd::Start, AngleUnit::Degrees)
            .unwrap();
        let mut incoming = Path::from_segment(seg);
        let before = incoming.polyline();
        assert_eq!(
            lens.check(&incoming),
            Err(OpticsError::SingularTransmission { element_y: 200.0 })
        );
        assert!(matches!(
            lens.transmit(&mut incoming),
            Err(OpticsError::SingularTransmission { .. })
        ));
        assert_eq!(incoming.polyline(), before);
    }

    #[test]
    fn check_matches_transmit_without_touching_the_ray() {
        let lens = Lens::new("L", 10.0, 2.0).unwrap();
        let incoming = parallel(1.0, 20.0);
        assert_eq!(lens.check(&incoming), Ok(()));
        assert!(close(incoming.end_position().y, 19.0));
        assert!(matches!(
            lens.check(&parallel(1.0, 5.0)),
            Err(OpticsError::TransmissionOrder { .. })
        ));
    }

    #[test]
    fn zero_length_final_segment_counts_as_axial() {
        let lens = Lens::new("L", 0.0, 1.0).unwrap();
        let mut incoming = Path::new(Point::new(1.0, 20.0), Point::new(1.0, 10.0));
        incoming.insert_node(Point::new(1.0, 10.0)).unwrap();
        assert_eq!(incoming.angle(AngleUnit::Degrees), 0.0);

        let out = lens.transmit(&mut incoming).unwrap();
        assert_eq!(out.current_start(), kurbo::Point::new(1.0, 0.0));
        assert!(close(incoming.end_position().y, 0.0));
        assert!(close(incoming.end_position().x, 1.0));
    }

    #[test]
    fn perpendicular_exit_runs_to_infinity() {
        // 45° in, arriving one focal length left of center: bent by +45°.
        let lens = Lens::new("L", 0.0, 1.0).unwrap();
        let mut incoming = Path::new(Point::new(-2.0, 1.0), Point::new(-1.0, 0.0));
        let out = lens.transmit(&mut incoming).unwrap();
        let s = out.last_segment();
        assert_eq!(s.start.position(), kurbo::Point::new(-1.0, 0.0));
        assert_eq!(s.stop.x, f64::INFINITY);
        assert_eq!(s.stop.y, 0.0);
        assert_eq!(out.angle(AngleUnit::Degrees), 90.0);

        // Nothing below can be reached from there.
        let next = Lens::new("M", -10.0, 1.0).unwrap();
        let mut ray = out.clone();
        assert!(matches!(
            next.transmit(&mut ray),
            Err(OpticsError::SingularTransmission { .. })
        ));
    }

    #[test]
    fn strong_bend_still_travels_forward() {
        // Arrives at 80° about 94 left of center, so the bend exceeds 90°.
        let lens = Lens::new("L", 0.0, 1.0).unwrap();
        let mut incoming = Path::from_segment(
            Segment::with_angle(Point::new(-100.0, 1.0), Point::new(-100.0, 0.0), 80.0).unwrap(),
        );
        let out = lens.transmit(&mut incoming).unwrap();
        let s = out.last_segment();
        assert!(s.stop.y < s.start.y);
        assert!(close(s.dy(), -TRANSMITTED_LENGTH));
    }

    #[test]
    fn constructor_validates_and_normalises() {
        assert!(Lens::new("L", f64::NAN, 1.0).is_err());
        assert!(Lens::new("L", 0.0, f64::INFINITY).is_err());
        let lens = Lens::new("L", 0.0, -3.0).unwrap().with_aperture(-4.0).unwrap();
        assert_eq!(lens.focal_length(), 3.0);
        assert_eq!(lens.aperture(), 4.0);
    }

    #[test]
    fn setter_failure_keeps_state() {
        let mut lens = Lens::new("L", 1.0, 2.0).unwrap();
        assert!(lens.set_focal_length(f64::NAN).is_err());
        assert!(lens.set_axis_position(f64::INFINITY).is_err());
        assert_eq!(lens.focal_length(), 2.0);
        assert_eq!(lens.axis_position(), 1.0);
    }

    #[test]
    fn markers_span_aperture() {
        let lens = Lens::new("L", 10.0, 2.0)
            .unwrap()
            .with_offset(1.0)
            .unwrap()
            .with_aperture(4.0)
            .unwrap();
        let m = lens.markers();
        assert_eq!(m.lens, Line::new((-1.0, 10.0), (3.0, 10.0)));
        assert_eq!(m.front_focal_plane.p0.y, 12.0);
        assert_eq!(m.back_focal_plane.p1, kurbo::Point::new(3.0, 8.0));
    }

    #[test]
    fn fit_aperture_uses_farther_bound() {
        let mut lens = Lens::new("L", 0.0, 1.0).unwrap().with_offset(1.0).unwrap();
        lens.fit_aperture(-4.0, 2.0);
        assert_eq!(lens.aperture(), 10.0);
        lens.fit_aperture(f64::NEG_INFINITY, 2.0);
        assert_eq!(lens.aperture(), 10.0);
        lens.fit_aperture(0.0, f64::NAN);
        assert_eq!(lens.aperture(), 10.0);
    }

    #[test]
    fn travel_order_puts_higher_lens_first() {
        let upper = Lens::new("B", 20.0, 1.0).unwrap();
        let lower = Lens::new("A", 10.0, 1.0).unwrap();
        assert_eq!(upper.travel_cmp(&lower), Ordering::Less);
        assert_eq!(lower.travel_cmp(&upper), Ordering::Greater);
        let twin = Lens::new("C", 20.0, 1.0).unwrap();
        assert_eq!(upper.travel_cmp(&twin), Ordering::Less);
    }

    #[test]
    fn summary_line() {
        let lens = Lens::new("CL1", 200.0, 2.0).unwrap();
        assert_eq!(alloc::format!("{lens}"), "Lens CL1: 200.00 (2.00) | 0.00/1.00");
    }
}
