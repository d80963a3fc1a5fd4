// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use vtem_core::trace::{
    ElementKind, SkipEvent, StopEvent, TraceBeginEvent, TraceSink, TraceSummary, TransmitEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn kind_name(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::Lens => "lens",
        ElementKind::Objective => "objective",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_trace_begin(&mut self, e: &TraceBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[begin] trace={} origin=({:.2}, {:.2}) angle={:.2}° elements={}",
            e.trace_index, e.origin.x, e.origin.y, e.angle, e.element_count,
        );
    }

    fn on_transmit(&mut self, e: &TransmitEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[transmit] trace={} {} ({}) at {:.2}: arrival=({:.2}, {:.2}) exit={:.2}° rays={}",
            e.trace_index,
            e.element,
            kind_name(e.kind),
            e.element_y,
            e.arrival.x,
            e.arrival.y,
            e.exit_angle,
            e.rays,
        );
    }

    fn on_skip(&mut self, e: &SkipEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[skip] trace={} {} at {:.2}: ray starts at {:.2}",
            e.trace_index, e.element, e.element_y, e.ray_y,
        );
    }

    fn on_stop(&mut self, e: &StopEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[stop] trace={} {} at {:.2}: {:?}",
            e.trace_index, e.element, e.element_y, e.reason,
        );
    }

    fn on_trace_summary(&mut self, s: &TraceSummary) {
        let stopped = if s.stopped { "STOPPED" } else { "complete" };
        let _ = writeln!(
            self.writer,
            "[summary] trace={} transmitted={} skipped={} rays={} \
             end=({:.2}, {:.2}) {stopped}",
            s.trace_index, s.transmitted, s.skipped, s.rays, s.end.x, s.end.y,
        );
    }

    fn on_ray(&mut self, trace_index: u64, ray_index: u32, points: &[kurbo::Point]) {
        let _ = writeln!(
            self.writer,
            "[ray] trace={trace_index} #{ray_index} points={}",
            points.len(),
        );
    }
}
