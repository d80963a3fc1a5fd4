// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A microscope column: named elements and the ray-trace loop over them.
//!
//! Elements are visited in *travel order*: descending axis position, ties
//! broken by name and then by insertion order. Each visit yields an explicit
//! [`Transmission`]; the loop accumulates rays, skips elements the ray has
//! already passed, and stops at the first singular element. A trace owns all
//! of its output and never writes to the column, so tracing can be repeated
//! any number of times.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::angle::AngleUnit;
use crate::error::{ErrorKind, OpticsError, finite, numeric};
use crate::lens::{Lens, LensMarkers};
use crate::objective::ObjectiveLens;
use crate::path::Path;
use crate::source::Source;
use crate::trace::{
    ElementKind, SkipEvent, StopEvent, TraceBeginEvent, TraceSummaryBuilder, Tracer, TransmitEvent,
};

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// One optical element of a column.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    /// A single thin lens.
    Lens(Lens),
    /// A two-field objective lens.
    Objective(ObjectiveLens),
}

/// Outcome of offering the current ray to one element.
#[derive(Clone, Debug)]
pub enum Transmission {
    /// The element produced these rays, in travel order.
    Rays(Vec<Path>),
    /// The ray has already passed the element; it is unchanged.
    Skipped(OpticsError),
    /// The transmission is undefined and the trace ends here; the ray is
    /// unchanged.
    Stopped(OpticsError),
}

impl Element {
    /// The element label.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Lens(lens) => lens.name(),
            Self::Objective(ol) => ol.name(),
        }
    }

    /// The element kind.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Lens(_) => ElementKind::Lens,
            Self::Objective(_) => ElementKind::Objective,
        }
    }

    /// Axis position of the element.
    #[must_use]
    pub const fn axis_position(&self) -> f64 {
        match self {
            Self::Lens(lens) => lens.axis_position(),
            Self::Objective(ol) => ol.axis_position(),
        }
    }

    /// Aperture of the element.
    #[must_use]
    pub const fn aperture(&self) -> f64 {
        match self {
            Self::Lens(lens) => lens.aperture(),
            Self::Objective(ol) => ol.aperture(),
        }
    }

    /// Drawing extents of every lens plane in the element, in travel order.
    #[must_use]
    pub fn markers(&self) -> Vec<LensMarkers> {
        match self {
            Self::Lens(lens) => vec![lens.markers()],
            Self::Objective(ol) => ol.markers().to_vec(),
        }
    }

    /// See [`Lens::fit_aperture`].
    pub fn fit_aperture(&mut self, left: f64, right: f64) {
        match self {
            Self::Lens(lens) => lens.fit_aperture(left, right),
            Self::Objective(ol) => ol.fit_aperture(left, right),
        }
    }

    /// Offers `incoming` to the element.
    ///
    /// Order violations become [`Transmission::Skipped`]; every other error
    /// becomes [`Transmission::Stopped`]. `incoming` is only modified when
    /// rays are returned.
    pub fn transmit(&self, incoming: &mut Path) -> Transmission {
        let result = match self {
            Self::Lens(lens) => lens.transmit(incoming).map(|ray| vec![ray]),
            Self::Objective(ol) => ol.transmit(incoming).map(Vec::from),
        };
        match result {
            Ok(rays) => Transmission::Rays(rays),
            Err(e) if e.kind() == ErrorKind::TransmissionOrder => Transmission::Skipped(e),
            Err(e) => Transmission::Stopped(e),
        }
    }
}

impl From<Lens> for Element {
    fn from(lens: Lens) -> Self {
        Self::Lens(lens)
    }
}

impl From<ObjectiveLens> for Element {
    fn from(ol: ObjectiveLens) -> Self {
        Self::Objective(ol)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lens(lens) => fmt::Display::fmt(lens, f),
            Self::Objective(ol) => fmt::Display::fmt(ol, f),
        }
    }
}

// ---------------------------------------------------------------------------
// Options and results
// ---------------------------------------------------------------------------

/// Knobs for a single trace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceOptions {
    /// Axial extent of rays emitted by [`Column::trace_symmetric`].
    pub emission_length: f64,
    /// Axis position of a viewing screen. When set, a trace that was not
    /// stopped has its last ray extended to the screen if the ray starts
    /// above it and heads down the axis.
    pub screen: Option<f64>,
    /// Counter reported in diagnostic events.
    pub trace_index: u64,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            emission_length: 1.0,
            screen: None,
            trace_index: 0,
        }
    }
}

impl TraceOptions {
    /// Returns these options with a viewing screen at axis position `y`.
    #[must_use]
    pub fn with_screen(mut self, y: f64) -> Self {
        self.screen = Some(y);
        self
    }

    fn validate(&self) -> Result<(), OpticsError> {
        finite(self.emission_length, "emission length is not finite")?;
        if let Some(screen) = self.screen {
            finite(screen, "screen position is not finite")?;
        }
        Ok(())
    }
}

/// The element that ended a trace.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceStop {
    /// Element label.
    pub element: String,
    /// Why the element could not transmit.
    pub error: OpticsError,
}

/// Output of one trace.
#[derive(Clone, Debug)]
pub struct RayTrace {
    /// Every ray in travel order; the emitted ray comes first.
    pub rays: Vec<Path>,
    /// Number of elements skipped because the ray had already passed them.
    pub skipped: usize,
    /// Set when an element stopped the trace.
    pub stop: Option<TraceStop>,
}

impl RayTrace {
    /// Whether every active element was either transmitted or skipped.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stop.is_none()
    }

    /// The ray the trace ended with.
    #[must_use]
    pub fn last_ray(&self) -> Option<&Path> {
        self.rays.last()
    }

    /// Smallest and largest finite transverse position over every node of
    /// every ray, or `None` if there is none.
    #[must_use]
    pub fn x_range(&self) -> Option<(f64, f64)> {
        self.rays
            .iter()
            .flat_map(Path::polyline)
            .map(|p| p.x)
            .filter(|x| x.is_finite())
            .fold(None, |range, x| match range {
                None => Some((x, x)),
                Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
            })
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
struct Entry {
    element: Element,
    active: bool,
}

/// An ordered set of uniquely named elements with per-element active flags.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Column {
    entries: Vec<Entry>,
}

impl Column {
    /// Creates an empty column.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements, active or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the column has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds an active element.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if an element with the same
    /// name already exists.
    pub fn push(&mut self, element: impl Into<Element>) -> Result<(), OpticsError> {
        let element = element.into();
        if self.position_of(element.name()).is_some() {
            return Err(OpticsError::InvalidArgument("duplicate element name"));
        }
        self.entries.push(Entry {
            element,
            active: true,
        });
        Ok(())
    }

    /// Removes the named element.
    pub fn remove(&mut self, name: &str) -> Option<Element> {
        let idx = self.position_of(name)?;
        Some(self.entries.remove(idx).element)
    }

    /// The named element.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Element> {
        self.position_of(name).map(|idx| &self.entries[idx].element)
    }

    /// The named element, mutably. Renaming it through this reference is
    /// allowed as long as names stay unique.
    #[must_use]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Element> {
        let idx = self.position_of(name)?;
        Some(&mut self.entries[idx].element)
    }

    /// Whether the named element takes part in traces.
    #[must_use]
    pub fn is_active(&self, name: &str) -> Option<bool> {
        self.position_of(name).map(|idx| self.entries[idx].active)
    }

    /// Includes or excludes the named element from traces.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if no element has that name.
    pub fn set_active(&mut self, name: &str, active: bool) -> Result<(), OpticsError> {
        let idx = self
            .position_of(name)
            .ok_or(OpticsError::InvalidArgument("no element with that name"))?;
        self.entries[idx].active = active;
        Ok(())
    }

    /// Every element with its active flag, in travel order.
    pub fn elements(&self) -> impl Iterator<Item = (&Element, bool)> + '_ {
        self.travel_order()
            .into_iter()
            .map(|idx| (&self.entries[idx].element, self.entries[idx].active))
    }

    /// Active elements in travel order.
    pub fn active(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements()
            .filter_map(|(element, active)| active.then_some(element))
    }

    /// Drawing extents of every active element, in travel order.
    #[must_use]
    pub fn markers(&self) -> Vec<(&str, LensMarkers)> {
        self.active()
            .flat_map(|element| {
                let name = element.name();
                element.markers().into_iter().map(move |m| (name, m))
            })
            .collect()
    }

    /// Resizes every active element's aperture to reach the farther of
    /// `left` and `right`.
    pub fn fit_apertures(&mut self, left: f64, right: f64) {
        for entry in self.entries.iter_mut().filter(|e| e.active) {
            entry.element.fit_aperture(left, right);
        }
    }

    // -- Tracing --

    /// Traces `emitted` through every active element with default options
    /// and no diagnostics.
    #[must_use]
    pub fn trace(&self, emitted: Path) -> RayTrace {
        let mut tracer = Tracer::none();
        self.run(emitted, &TraceOptions::default(), &mut tracer)
    }

    /// Traces `emitted` through every active element.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `options` holds a
    /// non-finite value. Element failures are reported in the returned
    /// [`RayTrace`], not as errors.
    pub fn trace_with(
        &self,
        emitted: Path,
        options: &TraceOptions,
        tracer: &mut Tracer<'_>,
    ) -> Result<RayTrace, OpticsError> {
        options.validate()?;
        Ok(self.run(emitted, options, tracer))
    }

    /// Emits a ray at `angle` degrees from the right edge of `source` and
    /// its mirror image (`-angle` from the left edge), and traces both.
    ///
    /// The mirrored trace reports `options.trace_index + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `angle` is NaN, does not
    /// point down the axis, or `options` is invalid.
    pub fn trace_symmetric(
        &self,
        source: &Source,
        angle: f64,
        options: &TraceOptions,
        tracer: &mut Tracer<'_>,
    ) -> Result<[RayTrace; 2], OpticsError> {
        let angle = numeric(angle, "emission angle is not a number")?;
        options.validate()?;
        let right = source.emit(angle, 1.0, options.emission_length)?;
        let left = source.emit(-angle, -1.0, options.emission_length)?;
        let mirrored = TraceOptions {
            trace_index: options.trace_index.wrapping_add(1),
            ..*options
        };
        Ok([
            self.run(right, options, tracer),
            self.run(left, &mirrored, tracer),
        ])
    }

    fn run(&self, emitted: Path, options: &TraceOptions, tracer: &mut Tracer<'_>) -> RayTrace {
        let trace_index = options.trace_index;
        let begin = TraceBeginEvent {
            trace_index,
            origin: emitted.current_start(),
            angle: emitted.angle(AngleUnit::Degrees),
            element_count: u32::try_from(self.active().count()).unwrap_or(u32::MAX),
        };
        tracer.trace_begin(&begin);
        let mut summary = TraceSummaryBuilder::new(&begin);

        let mut rays = vec![emitted];
        let mut skipped = 0;
        let mut stop = None;

        for element in self.active() {
            let Some(current) = rays.last_mut() else {
                break;
            };
            let ray_y = current.current_start().y;
            match element.transmit(current) {
                Transmission::Rays(produced) => {
                    let count = u32::try_from(produced.len()).unwrap_or(u32::MAX);
                    if let (Some(first), Some(last)) = (produced.first(), produced.last()) {
                        tracer.transmit(&TransmitEvent {
                            trace_index,
                            element: element.name(),
                            kind: element.kind(),
                            element_y: element.axis_position(),
                            arrival: first.current_start(),
                            exit_angle: last.angle(AngleUnit::Degrees),
                            rays: count,
                        });
                    }
                    summary.transmitted(count);
                    rays.extend(produced);
                }
                Transmission::Skipped(_) => {
                    tracer.skip(&SkipEvent {
                        trace_index,
                        element: element.name(),
                        element_y: element.axis_position(),
                        ray_y,
                    });
                    summary.skipped();
                    skipped += 1;
                }
                Transmission::Stopped(error) => {
                    tracer.stop(&StopEvent {
                        trace_index,
                        element: element.name(),
                        element_y: element.axis_position(),
                        reason: error.kind(),
                    });
                    summary.stopped();
                    stop = Some(TraceStop {
                        element: element.name().into(),
                        error,
                    });
                    break;
                }
            }
        }

        if stop.is_none()
            && let (Some(screen), Some(last)) = (options.screen, rays.last_mut())
            && last.current_start().y > screen
            && last.angle(AngleUnit::Degrees).abs() < 90.0
        {
            last.stretch_to(screen);
        }

        let end = rays.last().map_or(kurbo::Point::ZERO, Path::end_position);
        tracer.trace_summary(&summary.finish(end));

        #[cfg(feature = "trace-rich")]
        for (i, ray) in rays.iter().enumerate() {
            tracer.ray(
                trace_index,
                u32::try_from(i).unwrap_or(u32::MAX),
                &ray.polyline(),
            );
        }

        RayTrace {
            rays,
            skipped,
            stop,
        }
    }

    /// Slot indices in travel order. The sort is stable, so equal keys keep
    /// insertion order.
    fn travel_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (&self.entries[a].element, &self.entries[b].element);
            b.axis_position()
                .total_cmp(&a.axis_position())
                .then_with(|| a.name().cmp(b.name()))
        });
        order
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.element.name() == name)
    }
}
