// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Objective lenses modelled as a pair of thin lenses.
//!
//! The prefield lens sits `gap / 2` above the objective's axis position and
//! the postfield lens `gap / 2` below it. A ray crosses the prefield first,
//! so every transmission yields two rays. When the objective is *coupled*
//! both fields share one focal length, controlled through the postfield.

use alloc::format;
use alloc::string::String;
use core::fmt;

use crate::error::{OpticsError, finite};
use crate::lens::{self, Lens, LensMarkers};
use crate::path::Path;

/// A two-field objective lens.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectiveLens {
    y: f64,
    prefield: f64,
    postfield: f64,
    gap: f64,
    coupled: bool,
    x: f64,
    size: f64,
    name: String,
}

impl ObjectiveLens {
    /// Creates a decoupled objective centred on axis position `y` with
    /// `(prefield, postfield)` focal lengths and the given field gap.
    ///
    /// Focal lengths are taken by magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if any value is not finite
    /// or if `gap` is not strictly positive.
    pub fn new(
        name: impl Into<String>,
        y: f64,
        (prefield, postfield): (f64, f64),
        gap: f64,
    ) -> Result<Self, OpticsError> {
        Ok(Self {
            y: finite(y, "objective position is not finite")?,
            prefield: finite(prefield, "prefield focal length is not finite")?.abs(),
            postfield: finite(postfield, "postfield focal length is not finite")?.abs(),
            gap: positive_gap(gap)?,
            coupled: false,
            x: 0.0,
            size: 1.0,
            name: name.into(),
        })
    }

    /// Returns this objective with its fields coupled or decoupled.
    #[must_use]
    pub fn coupled(mut self, coupled: bool) -> Self {
        self.couple(coupled);
        self
    }

    /// Returns this objective with its center moved to transverse offset
    /// `x`.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `x` is not finite.
    pub fn with_offset(mut self, x: f64) -> Result<Self, OpticsError> {
        self.set_offset(x)?;
        Ok(self)
    }

    /// Returns this objective with the given aperture.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `size` is not finite.
    pub fn with_aperture(mut self, size: f64) -> Result<Self, OpticsError> {
        self.set_aperture(size)?;
        Ok(self)
    }

    // -- Accessors --

    /// The objective label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Axis position midway between the two fields.
    #[must_use]
    pub const fn axis_position(&self) -> f64 {
        self.y
    }

    /// Prefield focal length.
    #[must_use]
    pub const fn prefield(&self) -> f64 {
        self.prefield
    }

    /// Postfield focal length.
    #[must_use]
    pub const fn postfield(&self) -> f64 {
        self.postfield
    }

    /// The controlling focal length, which is the postfield.
    #[must_use]
    pub const fn focal_length(&self) -> f64 {
        self.postfield
    }

    /// Axial distance between the two fields.
    #[must_use]
    pub const fn gap(&self) -> f64 {
        self.gap
    }

    /// Whether both fields share one focal length.
    #[must_use]
    pub const fn is_coupled(&self) -> bool {
        self.coupled
    }

    /// Transverse offset of both fields.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.x
    }

    /// Aperture of both fields.
    #[must_use]
    pub const fn aperture(&self) -> f64 {
        self.size
    }

    /// The prefield as a standalone lens named `"<name> prefield"`.
    #[must_use]
    pub fn prefield_lens(&self) -> Lens {
        Lens::from_parts(
            format!("{} prefield", self.name),
            self.y + self.gap / 2.0,
            self.prefield,
            self.x,
            self.size,
        )
    }

    /// The postfield as a standalone lens named `"<name> postfield"`.
    #[must_use]
    pub fn postfield_lens(&self) -> Lens {
        Lens::from_parts(
            format!("{} postfield", self.name),
            self.y - self.gap / 2.0,
            self.postfield,
            self.x,
            self.size,
        )
    }

    /// Drawing extents for both fields, prefield first.
    #[must_use]
    pub fn markers(&self) -> [LensMarkers; 2] {
        [self.prefield_lens().markers(), self.postfield_lens().markers()]
    }

    // -- Setters --

    /// Moves the objective along the axis.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `y` is not finite.
    pub fn set_axis_position(&mut self, y: f64) -> Result<(), OpticsError> {
        self.y = finite(y, "objective position is not finite")?;
        Ok(())
    }

    /// Changes the prefield focal length. A coupled objective moves the
    /// postfield with it.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `f` is not finite.
    pub fn set_prefield(&mut self, f: f64) -> Result<(), OpticsError> {
        let f = finite(f, "prefield focal length is not finite")?.abs();
        self.prefield = f;
        if self.coupled {
            self.postfield = f;
        }
        Ok(())
    }

    /// Changes the postfield focal length. A coupled objective moves the
    /// prefield with it.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `f` is not finite.
    pub fn set_postfield(&mut self, f: f64) -> Result<(), OpticsError> {
        let f = finite(f, "postfield focal length is not finite")?.abs();
        self.postfield = f;
        if self.coupled {
            self.prefield = f;
        }
        Ok(())
    }

    /// Same as [`set_postfield`](Self::set_postfield).
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `f` is not finite.
    pub fn set_focal_length(&mut self, f: f64) -> Result<(), OpticsError> {
        self.set_postfield(f)
    }

    /// Changes the field gap.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] unless `gap` is finite and
    /// strictly positive.
    pub fn set_gap(&mut self, gap: f64) -> Result<(), OpticsError> {
        self.gap = positive_gap(gap)?;
        Ok(())
    }

    /// Couples or decouples the fields. Coupling copies the postfield
    /// focal length onto the prefield.
    pub fn couple(&mut self, coupled: bool) {
        self.coupled = coupled;
        if coupled {
            self.prefield = self.postfield;
        }
    }

    /// Moves both fields transversely.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `x` is not finite.
    pub fn set_offset(&mut self, x: f64) -> Result<(), OpticsError> {
        self.x = finite(x, "objective offset is not finite")?;
        Ok(())
    }

    /// Changes the aperture of both fields; negative values are taken by
    /// magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `size` is not finite.
    pub fn set_aperture(&mut self, size: f64) -> Result<(), OpticsError> {
        self.size = finite(size, "aperture is not finite")?.abs();
        Ok(())
    }

    /// See [`Lens::fit_aperture`].
    pub fn fit_aperture(&mut self, left: f64, right: f64) {
        if let Some(size) = lens::fitted_aperture(self.x, left, right) {
            self.size = size;
        }
    }

    // -- Transmission --

    /// Transmits a ray through the prefield and then the postfield,
    /// returning both refracted rays in travel order.
    ///
    /// `incoming` is extended to the prefield plane and the first returned
    /// ray is extended to the postfield plane.
    ///
    /// # Errors
    ///
    /// Any error of [`Lens::transmit`] from either field. Both fields are
    /// checked before `incoming` is touched, so on error it is unchanged.
    pub fn transmit(&self, incoming: &mut Path) -> Result<[Path; 2], OpticsError> {
        let prefield = self.prefield_lens();
        prefield.check(incoming)?;
        let postfield = self.postfield_lens();

        let mut scratch = incoming.clone();
        let mut first = prefield.transmit(&mut scratch)?;
        let second = postfield.transmit(&mut first)?;

        *incoming = scratch;
        Ok([first, second])
    }
}

impl fmt::Display for ObjectiveLens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ObjectiveLens {}: {:.2} ({:.2}/{:.2}, gap {:.2}, {}) | {:.2}/{:.2}",
            self.name,
            self.y,
            self.prefield,
            self.postfield,
            self.gap,
            if self.coupled { "coupled" } else { "decoupled" },
            self.x,
            self.size
        )
    }
}

fn positive_gap(gap: f64) -> Result<f64, OpticsError> {
    let gap = finite(gap, "gap is not finite")?;
    if gap > 0.0 {
        Ok(gap)
    } else {
        Err(OpticsError::InvalidArgument("gap must be positive"))
    }
}
