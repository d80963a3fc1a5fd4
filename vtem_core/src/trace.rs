// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the ray-trace loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! [`Column::trace_with`](crate::column::Column::trace_with) calls as it walks the
//! column. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`TraceSummaryBuilder`] tallies element outcomes during one trace and
//! produces a [`TraceSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates the per-ray polyline event and
//!   the corresponding `TraceSink` method.

use crate::error::ErrorKind;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which kind of column element an event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A single thin lens.
    Lens,
    /// A two-field objective lens.
    Objective,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted once before the first element is visited.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceBeginEvent {
    /// Caller-chosen trace counter.
    pub trace_index: u64,
    /// Where the emitted ray starts.
    pub origin: kurbo::Point,
    /// Emission angle in degrees.
    pub angle: f64,
    /// Number of active elements that will be visited.
    pub element_count: u32,
}

/// Emitted when an element produced one or more rays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransmitEvent<'a> {
    /// Trace counter.
    pub trace_index: u64,
    /// Element label.
    pub element: &'a str,
    /// Element kind.
    pub kind: ElementKind,
    /// Axis position of the element.
    pub element_y: f64,
    /// Where the ray met the first lens plane of the element.
    pub arrival: kurbo::Point,
    /// Angle in degrees of the last ray the element produced.
    pub exit_angle: f64,
    /// Number of rays produced.
    pub rays: u32,
}

/// Emitted when an element lies behind the current ray and is skipped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkipEvent<'a> {
    /// Trace counter.
    pub trace_index: u64,
    /// Element label.
    pub element: &'a str,
    /// Axis position of the element.
    pub element_y: f64,
    /// Axis position where the current ray starts.
    pub ray_y: f64,
}

/// Emitted when an element ends the trace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StopEvent<'a> {
    /// Trace counter.
    pub trace_index: u64,
    /// Element label.
    pub element: &'a str,
    /// Axis position of the element.
    pub element_y: f64,
    /// Why the element could not transmit.
    pub reason: ErrorKind,
}

/// Per-trace outcome summary produced by [`TraceSummaryBuilder`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceSummary {
    /// Trace counter.
    pub trace_index: u64,
    /// Elements that transmitted the ray.
    pub transmitted: u32,
    /// Elements skipped because the ray had already passed them.
    pub skipped: u32,
    /// Whether an element stopped the trace.
    pub stopped: bool,
    /// Total number of rays, including the emitted one.
    pub rays: u32,
    /// Where the last ray ends.
    pub end: kurbo::Point,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the ray-trace loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called before the first element is visited.
    fn on_trace_begin(&mut self, e: &TraceBeginEvent) {
        _ = e;
    }

    /// Called when an element transmits the ray.
    fn on_transmit(&mut self, e: &TransmitEvent<'_>) {
        _ = e;
    }

    /// Called when an element is skipped.
    fn on_skip(&mut self, e: &SkipEvent<'_>) {
        _ = e;
    }

    /// Called when an element stops the trace.
    fn on_stop(&mut self, e: &StopEvent<'_>) {
        _ = e;
    }

    /// Called with the per-trace summary.
    fn on_trace_summary(&mut self, s: &TraceSummary) {
        _ = s;
    }

    /// Called with the polyline of every ray of a finished trace (requires
    /// `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_ray(&mut self, trace_index: u64, ray_index: u32, points: &[kurbo::Point]) {
        _ = (trace_index, ray_index, points);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TraceBeginEvent`].
    #[inline]
    pub fn trace_begin(&mut self, e: &TraceBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_trace_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransmitEvent`].
    #[inline]
    pub fn transmit(&mut self, e: &TransmitEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transmit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SkipEvent`].
    #[inline]
    pub fn skip(&mut self, e: &SkipEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_skip(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StopEvent`].
    #[inline]
    pub fn stop(&mut self, e: &StopEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_stop(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TraceSummary`].
    #[inline]
    pub fn trace_summary(&mut self, s: &TraceSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_trace_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits one ray polyline (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn ray(&mut self, trace_index: u64, ray_index: u32, points: &[kurbo::Point]) {
        if let Some(s) = &mut self.sink {
            s.on_ray(trace_index, ray_index, points);
        }
    }
}

// ---------------------------------------------------------------------------
// TraceSummaryBuilder
// ---------------------------------------------------------------------------

/// Tallies element outcomes during one trace and produces a
/// [`TraceSummary`].
#[derive(Debug)]
pub struct TraceSummaryBuilder {
    trace_index: u64,
    transmitted: u32,
    skipped: u32,
    stopped: bool,
    rays: u32,
}

impl TraceSummaryBuilder {
    /// Starts a summary for the trace announced by `begin`. The emitted ray
    /// is counted.
    #[must_use]
    pub fn new(begin: &TraceBeginEvent) -> Self {
        Self {
            trace_index: begin.trace_index,
            transmitted: 0,
            skipped: 0,
            stopped: false,
            rays: 1,
        }
    }

    /// Records an element that produced `rays` rays.
    pub fn transmitted(&mut self, rays: u32) {
        self.transmitted += 1;
        self.rays += rays;
    }

    /// Records a skipped element.
    pub fn skipped(&mut self) {
        self.skipped += 1;
    }

    /// Records that the trace was stopped.
    pub fn stopped(&mut self) {
        self.stopped = true;
    }

    /// Consumes the builder and produces the final [`TraceSummary`].
    #[must_use]
    pub fn finish(self, end: kurbo::Point) -> TraceSummary {
        TraceSummary {
            trace_index: self.trace_index,
            transmitted: self.transmitted,
            skipped: self.skipped,
            stopped: self.stopped,
            rays: self.rays,
            end,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> TraceBeginEvent {
        TraceBeginEvent {
            trace_index: 7,
            origin: kurbo::Point::new(5.0, 220.0),
            angle: 1.5,
            element_count: 10,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_trace_begin(&sample_begin());
        sink.on_skip(&SkipEvent {
            trace_index: 7,
            element: "CL1",
            element_y: 200.0,
            ray_y: 190.0,
        });
        sink.on_trace_summary(&TraceSummaryBuilder::new(&sample_begin()).finish(kurbo::Point::ZERO));
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.trace_begin(&sample_begin());
        tracer.stop(&StopEvent {
            trace_index: 7,
            element: "PL",
            element_y: 20.0,
            reason: ErrorKind::SingularTransmission,
        });
    }

    #[test]
    fn summary_builder_tallies_outcomes() {
        let mut builder = TraceSummaryBuilder::new(&sample_begin());
        builder.transmitted(1);
        builder.transmitted(2);
        builder.skipped();
        builder.stopped();

        let summary = builder.finish(kurbo::Point::new(0.0, 19.0));
        assert_eq!(summary.trace_index, 7);
        assert_eq!(summary.transmitted, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.rays, 4);
        assert!(summary.stopped);
        assert_eq!(summary.end, kurbo::Point::new(0.0, 19.0));
    }

    #[test]
    fn summary_builder_counts_emitted_ray() {
        let summary = TraceSummaryBuilder::new(&sample_begin()).finish(kurbo::Point::ZERO);
        assert_eq!(summary.rays, 1);
        assert_eq!(summary.transmitted, 0);
        assert!(!summary.stopped);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::string::{String, ToString};
        use alloc::vec::Vec;

        struct RecordingSink {
            skipped: Vec<String>,
        }
        impl TraceSink for RecordingSink {
            fn on_skip(&mut self, e: &SkipEvent<'_>) {
                self.skipped.push(e.element.to_string());
            }
        }

        let mut sink = RecordingSink {
            skipped: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.skip(&SkipEvent {
            trace_index: 0,
            element: "CM",
            element_y: 140.0,
            ray_y: 139.0,
        });
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.skipped, &["CM"]);
    }
}
