// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Angle conventions relative to the optical axis.
//!
//! An angle of 0° points straight down the axis (toward decreasing `y`).
//! Positive angles rotate toward increasing `x`; ±180° points back up the
//! axis. All internal computation is in degrees, reduced to `(-180, 180]`.

use kurbo::Vec2;

/// Unit of an angle passed to or returned from the public API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AngleUnit {
    /// Degrees.
    #[default]
    Degrees,
    /// Radians.
    Radians,
}

impl AngleUnit {
    /// Converts `value` in this unit to degrees.
    #[inline]
    #[must_use]
    pub fn to_degrees(self, value: f64) -> f64 {
        match self {
            Self::Degrees => value,
            Self::Radians => value.to_degrees(),
        }
    }

    /// Converts `degrees` to this unit.
    #[inline]
    #[must_use]
    pub fn from_degrees(self, degrees: f64) -> f64 {
        match self {
            Self::Degrees => degrees,
            Self::Radians => degrees.to_radians(),
        }
    }
}

/// Reduces an angle in degrees to the half-open range `(-180, 180]`.
#[must_use]
pub fn reduce(degrees: f64) -> f64 {
    let mut r = degrees % 360.0;
    if r < 0.0 {
        r += 360.0;
    }
    if r > 180.0 { r - 360.0 } else { r }
}

/// Signed angle in degrees of the direction `start → stop`.
///
/// Zero-length directions report 0°.
#[inline]
pub(crate) fn direction(delta: Vec2) -> f64 {
    if delta == Vec2::ZERO {
        return 0.0;
    }
    // Measured from -y toward +x.
    reduce(Vec2::new(-delta.y, delta.x).atan2().to_degrees())
}

/// Tangent of an angle in degrees.
#[inline]
pub(crate) fn tan(degrees: f64) -> f64 {
    let unit = Vec2::from_angle(degrees.to_radians());
    unit.y / unit.x
}

/// `atan(num / den)` in degrees, for `den > 0`.
#[inline]
pub(crate) fn atan_ratio(num: f64, den: f64) -> f64 {
    Vec2::new(den, num).atan2().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn reduce_stays_in_half_open_range() {
        for deg in [-720.0, -540.0, -181.0, -180.0, -90.0, 0.0, 45.0, 180.0, 181.0, 359.0, 900.0] {
            let r = reduce(deg);
            assert!(r > -180.0 && r <= 180.0, "reduce({deg}) = {r}");
        }
        assert_eq!(reduce(-180.0), 180.0);
        assert_eq!(reduce(540.0), 180.0);
        assert_eq!(reduce(270.0), -90.0);
    }

    #[test]
    fn reduce_is_periodic() {
        for deg in [-170.0, -33.5, 0.0, 12.25, 90.0, 179.0] {
            for k in -3..=3 {
                let shifted = deg + 360.0 * f64::from(k);
                assert!(close(reduce(deg), reduce(shifted)), "{deg} vs {shifted}");
            }
        }
    }

    #[test]
    fn direction_convention() {
        assert!(close(direction(Vec2::new(0.0, -1.0)), 0.0));
        assert!(close(direction(Vec2::new(1.0, -1.0)), 45.0));
        assert!(close(direction(Vec2::new(-1.0, -1.0)), -45.0));
        assert!(close(direction(Vec2::new(1.0, 0.0)), 90.0));
        assert!(close(direction(Vec2::new(0.0, 1.0)), 180.0));
        assert!(close(direction(Vec2::new(1.0, 1.0)), 135.0));
        assert_eq!(direction(Vec2::ZERO), 0.0);
        assert_eq!(direction(Vec2::new(-0.0, 0.0)), 0.0);
    }

    #[test]
    fn unit_conversion() {
        assert!(close(AngleUnit::Radians.to_degrees(core::f64::consts::PI), 180.0));
        assert!(close(AngleUnit::Radians.from_degrees(90.0), core::f64::consts::FRAC_PI_2));
        assert_eq!(AngleUnit::Degrees.to_degrees(12.0), 12.0);
    }

    #[test]
    fn trig_helpers() {
        assert!(close(tan(45.0), 1.0));
        assert!(close(tan(-30.0), -0.577_350_269_189_625_7));
        assert!(close(atan_ratio(1.0, 2.0), 26.565_051_177_077_99));
    }
}
