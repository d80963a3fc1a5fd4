// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types shared by every fallible geometry and lens operation.
//!
//! Every operation validates its inputs before it mutates anything, so an
//! `Err` always means the receiver is unchanged.

use core::fmt;

use crate::path::NodeId;

/// Coarse classification of an [`OpticsError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed constructor or setter input.
    InvalidArgument,
    /// A path mutation or interpolation would break a structural invariant.
    GeometryConstraintViolation,
    /// An element was asked to act on a ray that has already passed it.
    TransmissionOrder,
    /// The transmission is undefined (zero focal length, ray never reaches
    /// the element plane).
    SingularTransmission,
}

/// Errors produced by the optics engine.
#[derive(Clone, Debug, PartialEq)]
pub enum OpticsError {
    /// Non-numeric (NaN), non-finite, or otherwise malformed input.
    InvalidArgument(&'static str),
    /// Interpolation requested outside the open axial range of a segment.
    OutOfRange {
        /// Requested axis position.
        y: f64,
        /// Axis position of the segment start.
        start: f64,
        /// Axis position of the segment stop.
        stop: f64,
    },
    /// No segment of the path brackets the requested axis position.
    NodeNotPlaceable {
        /// Axis position of the rejected node.
        y: f64,
    },
    /// The handle does not name an interior node of the path.
    NodeNotFound(NodeId),
    /// The ray already starts at or past the element.
    TransmissionOrder {
        /// Axis position of the element.
        element_y: f64,
        /// Axis position where the ray currently starts.
        ray_y: f64,
    },
    /// The transmission through the element at this axis position is
    /// undefined.
    SingularTransmission {
        /// Axis position of the element.
        element_y: f64,
    },
}

impl OpticsError {
    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::OutOfRange { .. } | Self::NodeNotPlaceable { .. } | Self::NodeNotFound(_) => {
                ErrorKind::GeometryConstraintViolation
            }
            Self::TransmissionOrder { .. } => ErrorKind::TransmissionOrder,
            Self::SingularTransmission { .. } => ErrorKind::SingularTransmission,
        }
    }
}

impl fmt::Display for OpticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
            Self::OutOfRange { y, start, stop } => {
                write!(f, "position {y} does not lie strictly between {start} and {stop}")
            }
            Self::NodeNotPlaceable { y } => {
                write!(f, "no segment brackets axis position {y}")
            }
            Self::NodeNotFound(id) => write!(f, "{id:?} is not an interior node of the path"),
            Self::TransmissionOrder { element_y, ray_y } => write!(
                f,
                "element at {element_y} lies behind the ray starting at {ray_y}"
            ),
            Self::SingularTransmission { element_y } => {
                write!(f, "transmission through element at {element_y} is singular")
            }
        }
    }
}

impl core::error::Error for OpticsError {}

/// Rejects NaN, passing every other value through.
pub(crate) fn numeric(v: f64, what: &'static str) -> Result<f64, OpticsError> {
    if v.is_nan() {
        Err(OpticsError::InvalidArgument(what))
    } else {
        Ok(v)
    }
}

/// Rejects NaN and infinities.
pub(crate) fn finite(v: f64, what: &'static str) -> Result<f64, OpticsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(OpticsError::InvalidArgument(what))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            OpticsError::InvalidArgument("x").kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            OpticsError::NodeNotPlaceable { y: 1.0 }.kind(),
            ErrorKind::GeometryConstraintViolation
        );
        assert_eq!(
            OpticsError::OutOfRange {
                y: 0.0,
                start: 1.0,
                stop: 2.0
            }
            .kind(),
            ErrorKind::GeometryConstraintViolation
        );
        assert_eq!(
            OpticsError::TransmissionOrder {
                element_y: 1.0,
                ray_y: 0.0
            }
            .kind(),
            ErrorKind::TransmissionOrder
        );
        assert_eq!(
            OpticsError::SingularTransmission { element_y: 1.0 }.kind(),
            ErrorKind::SingularTransmission
        );
    }

    #[test]
    fn numeric_rejects_nan_only() {
        assert!(numeric(f64::NAN, "x").is_err());
        assert_eq!(numeric(f64::INFINITY, "x"), Ok(f64::INFINITY));
        assert!(finite(f64::INFINITY, "x").is_err());
        assert_eq!(finite(-2.5, "x"), Ok(-2.5));
    }
}
