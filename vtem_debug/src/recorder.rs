// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. Floats are stored as their IEEE bit
//! patterns and element labels as a `u32` byte length followed by UTF-8.
//! [`decode`] reads them back as an iterator of [`RecordedEvent`].

use kurbo::Point;
use vtem_core::error::ErrorKind;
use vtem_core::trace::{
    ElementKind, SkipEvent, StopEvent, TraceBeginEvent, TraceSink, TraceSummary, TransmitEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_TRACE_BEGIN: u8 = 1;
const TAG_TRANSMIT: u8 = 2;
const TAG_SKIP: u8 = 3;
const TAG_STOP: u8 = 4;
const TAG_TRACE_SUMMARY: u8 = 5;
const TAG_RAY: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_point(&mut self, p: Point) {
        self.write_f64(p.x);
        self.write_f64(p.y);
    }

    fn write_len(&mut self, len: usize) {
        self.write_u32(u32::try_from(len).unwrap_or(u32::MAX));
    }

    fn write_str(&mut self, s: &str) {
        // Labels longer than u32::MAX bytes are truncated.
        let bytes = &s.as_bytes()[..s.len().min(u32::MAX as usize)];
        self.write_len(bytes.len());
        self.buf.extend_from_slice(bytes);
    }

    fn write_kind(&mut self, k: ElementKind) {
        self.write_u8(match k {
            ElementKind::Lens => 0,
            ElementKind::Objective => 1,
        });
    }

    fn write_reason(&mut self, r: ErrorKind) {
        self.write_u8(match r {
            ErrorKind::InvalidArgument => 0,
            ErrorKind::GeometryConstraintViolation => 1,
            ErrorKind::TransmissionOrder => 2,
            ErrorKind::SingularTransmission => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_trace_begin(&mut self, e: &TraceBeginEvent) {
        self.write_u8(TAG_TRACE_BEGIN);
        self.write_u64(e.trace_index);
        self.write_point(e.origin);
        self.write_f64(e.angle);
        self.write_u32(e.element_count);
    }

    fn on_transmit(&mut self, e: &TransmitEvent<'_>) {
        self.write_u8(TAG_TRANSMIT);
        self.write_u64(e.trace_index);
        self.write_str(e.element);
        self.write_kind(e.kind);
        self.write_f64(e.element_y);
        self.write_point(e.arrival);
        self.write_f64(e.exit_angle);
        self.write_u32(e.rays);
    }

    fn on_skip(&mut self, e: &SkipEvent<'_>) {
        self.write_u8(TAG_SKIP);
        self.write_u64(e.trace_index);
        self.write_str(e.element);
        self.write_f64(e.element_y);
        self.write_f64(e.ray_y);
    }

    fn on_stop(&mut self, e: &StopEvent<'_>) {
        self.write_u8(TAG_STOP);
        self.write_u64(e.trace_index);
        self.write_str(e.element);
        self.write_f64(e.element_y);
        self.write_reason(e.reason);
    }

    fn on_trace_summary(&mut self, s: &TraceSummary) {
        self.write_u8(TAG_TRACE_SUMMARY);
        self.write_u64(s.trace_index);
        self.write_u32(s.transmitted);
        self.write_u32(s.skipped);
        self.write_u8(u8::from(s.stopped));
        self.write_u32(s.rays);
        self.write_point(s.end);
    }

    fn on_ray(&mut self, trace_index: u64, ray_index: u32, points: &[Point]) {
        let points = &points[..points.len().min(u32::MAX as usize)];
        self.write_u8(TAG_RAY);
        self.write_u64(trace_index);
        self.write_u32(ray_index);
        self.write_len(points.len());
        for p in points {
            self.write_point(*p);
        }
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`TraceBeginEvent`].
    TraceBegin(TraceBeginEvent),
    /// A [`TransmitEvent`] with an owned label.
    Transmit {
        /// Trace counter.
        trace_index: u64,
        /// Element label.
        element: String,
        /// Element kind.
        kind: ElementKind,
        /// Axis position of the element.
        element_y: f64,
        /// Where the ray met the element.
        arrival: Point,
        /// Angle in degrees of the last produced ray.
        exit_angle: f64,
        /// Number of rays produced.
        rays: u32,
    },
    /// A [`SkipEvent`] with an owned label.
    Skip {
        /// Trace counter.
        trace_index: u64,
        /// Element label.
        element: String,
        /// Axis position of the element.
        element_y: f64,
        /// Axis position where the ray starts.
        ray_y: f64,
    },
    /// A [`StopEvent`] with an owned label.
    Stop {
        /// Trace counter.
        trace_index: u64,
        /// Element label.
        element: String,
        /// Axis position of the element.
        element_y: f64,
        /// Why the element could not transmit.
        reason: ErrorKind,
    },
    /// A [`TraceSummary`].
    TraceSummary(TraceSummary),
    /// The polyline of one ray.
    Ray {
        /// Trace counter.
        trace_index: u64,
        /// Position of the ray within its trace.
        ray_index: u32,
        /// Node positions, source first.
        points: Vec<Point>,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_bytes(&mut self, n: usize) -> Option<&[u8]> {
        if self.remaining() < n {
            return None;
        }
        let v = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Some(v)
    }

    fn read_u8(&mut self) -> Option<u8> {
        Some(self.read_bytes(1)?[0])
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.read_bytes(4)?.try_into().ok()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.read_bytes(8)?.try_into().ok()?))
    }

    fn read_f64(&mut self) -> Option<f64> {
        Some(f64::from_bits(self.read_u64()?))
    }

    fn read_point(&mut self) -> Option<Point> {
        Some(Point::new(self.read_f64()?, self.read_f64()?))
    }

    fn read_string(&mut self) -> Option<String> {
        let len = usize::try_from(self.read_u32()?).ok()?;
        String::from_utf8(self.read_bytes(len)?.to_vec()).ok()
    }

    fn read_kind(&mut self) -> Option<ElementKind> {
        Some(match self.read_u8()? {
            0 => ElementKind::Lens,
            _ => ElementKind::Objective,
        })
    }

    fn read_reason(&mut self) -> Option<ErrorKind> {
        Some(match self.read_u8()? {
            0 => ErrorKind::InvalidArgument,
            1 => ErrorKind::GeometryConstraintViolation,
            2 => ErrorKind::TransmissionOrder,
            _ => ErrorKind::SingularTransmission,
        })
    }

    fn decode_trace_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TraceBegin(TraceBeginEvent {
            trace_index: self.read_u64()?,
            origin: self.read_point()?,
            angle: self.read_f64()?,
            element_count: self.read_u32()?,
        }))
    }

    fn decode_transmit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Transmit {
            trace_index: self.read_u64()?,
            element: self.read_string()?,
            kind: self.read_kind()?,
            element_y: self.read_f64()?,
            arrival: self.read_point()?,
            exit_angle: self.read_f64()?,
            rays: self.read_u32()?,
        })
    }

    fn decode_skip(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Skip {
            trace_index: self.read_u64()?,
            element: self.read_string()?,
            element_y: self.read_f64()?,
            ray_y: self.read_f64()?,
        })
    }

    fn decode_stop(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Stop {
            trace_index: self.read_u64()?,
            element: self.read_string()?,
            element_y: self.read_f64()?,
            reason: self.read_reason()?,
        })
    }

    fn decode_trace_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TraceSummary(TraceSummary {
            trace_index: self.read_u64()?,
            transmitted: self.read_u32()?,
            skipped: self.read_u32()?,
            stopped: self.read_u8()? != 0,
            rays: self.read_u32()?,
            end: self.read_point()?,
        }))
    }

    fn decode_ray(&mut self) -> Option<RecordedEvent> {
        let trace_index = self.read_u64()?;
        let ray_index = self.read_u32()?;
        let count = usize::try_from(self.read_u32()?).ok()?;
        // Each point takes 16 bytes; refuse counts the buffer cannot hold.
        if self.remaining() / 16 < count {
            return None;
        }
        let points = (0..count)
            .map(|_| self.read_point())
            .collect::<Option<Vec<_>>>()?;
        Some(RecordedEvent::Ray {
            trace_index,
            ray_index,
            points,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_TRACE_BEGIN => self.decode_trace_begin(),
            TAG_TRANSMIT => self.decode_transmit(),
            TAG_SKIP => self.decode_skip(),
            TAG_STOP => self.decode_stop(),
            TAG_TRACE_SUMMARY => self.decode_trace_summary(),
            TAG_RAY => self.decode_ray(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
