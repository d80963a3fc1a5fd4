// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export for recordings, ray traces, and column geometry.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes one JSON object per event. [`write_scene`] dumps everything a
//! renderer needs to draw a column: the source, every element with its
//! marker lines and summary, and the polylines of each trace.
//!
//! Non-finite coordinates (rays that never reach a plane) are written as
//! `null`.

use std::io::{self, Write};

use kurbo::{Line, Point};
use serde_json::{Value, json};

use vtem_core::column::{Column, RayTrace};
use vtem_core::lens::LensMarkers;
use vtem_core::path::Path;
use vtem_core::source::Source;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a JSON array of event objects.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes).map(|e| event_to_value(&e)).collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

/// Writes a column, its source, and the given traces as one JSON object.
pub fn write_scene(
    column: &Column,
    source: &Source,
    traces: &[RayTrace],
    writer: &mut dyn Write,
) -> io::Result<()> {
    let scene = json!({
        "source": {
            "name": source.name(),
            "summary": source.to_string(),
            "marker": line(source.marker()),
        },
        "elements": column_to_value(column),
        "traces": traces.iter().map(trace_to_value).collect::<Vec<_>>(),
    });
    serde_json::to_writer_pretty(writer, &scene)?;
    Ok(())
}

/// Every element of `column` in travel order, with its active flag and
/// drawing extents.
#[must_use]
pub fn column_to_value(column: &Column) -> Value {
    column
        .elements()
        .map(|(element, active)| {
            json!({
                "name": element.name(),
                "kind": format!("{:?}", element.kind()),
                "active": active,
                "y": element.axis_position(),
                "aperture": element.aperture(),
                "summary": element.to_string(),
                "markers": element.markers().iter().map(markers).collect::<Vec<_>>(),
            })
        })
        .collect()
}

/// The rays of one trace as polylines, plus how the trace ended.
#[must_use]
pub fn trace_to_value(trace: &RayTrace) -> Value {
    json!({
        "rays": trace.rays.iter().map(polyline).collect::<Vec<_>>(),
        "skipped": trace.skipped,
        "stopped_by": trace.stop.as_ref().map(|s| json!({
            "element": s.element,
            "error": s.error.to_string(),
        })),
    })
}

fn event_to_value(event: &RecordedEvent) -> Value {
    match event {
        RecordedEvent::TraceBegin(e) => json!({
            "event": "TraceBegin",
            "trace": e.trace_index,
            "origin": point(e.origin),
            "angle": e.angle,
            "elements": e.element_count,
        }),
        RecordedEvent::Transmit {
            trace_index,
            element,
            kind,
            element_y,
            arrival,
            exit_angle,
            rays,
        } => json!({
            "event": "Transmit",
            "trace": trace_index,
            "element": element,
            "kind": format!("{kind:?}"),
            "y": element_y,
            "arrival": point(*arrival),
            "exit_angle": exit_angle,
            "rays": rays,
        }),
        RecordedEvent::Skip {
            trace_index,
            element,
            element_y,
            ray_y,
        } => json!({
            "event": "Skip",
            "trace": trace_index,
            "element": element,
            "y": element_y,
            "ray_y": ray_y,
        }),
        RecordedEvent::Stop {
            trace_index,
            element,
            element_y,
            reason,
        } => json!({
            "event": "Stop",
            "trace": trace_index,
            "element": element,
            "y": element_y,
            "reason": format!("{reason:?}"),
        }),
        RecordedEvent::TraceSummary(s) => json!({
            "event": "TraceSummary",
            "trace": s.trace_index,
            "transmitted": s.transmitted,
            "skipped": s.skipped,
            "stopped": s.stopped,
            "rays": s.rays,
            "end": point(s.end),
        }),
        RecordedEvent::Ray {
            trace_index,
            ray_index,
            points,
        } => json!({
            "event": "Ray",
            "trace": trace_index,
            "ray": ray_index,
            "points": points.iter().copied().map(point).collect::<Vec<_>>(),
        }),
    }
}

fn point(p: Point) -> Value {
    json!([p.x, p.y])
}

fn line(l: Line) -> Value {
    json!([point(l.p0), point(l.p1)])
}

fn polyline(path: &Path) -> Value {
    path.polyline().into_iter().map(point).collect()
}

fn markers(m: &LensMarkers) -> Value {
    json!({
        "lens": line(m.lens),
        "ffp": line(m.front_focal_plane),
        "bfp": line(m.back_focal_plane),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use vtem_core::column::TraceOptions;
    use vtem_core::lens::Lens;
    use vtem_core::trace::Tracer;

    fn column() -> Column {
        let mut column = Column::new();
        column.push(Lens::new("L1", 100.0, 2.0).unwrap()).unwrap();
        column.push(Lens::new("L2", 50.0, 0.0).unwrap()).unwrap();
        column
    }

    #[test]
    fn export_produces_valid_json() {
        let source = Source::new("Source", 120.0, 2.0).unwrap();
        let mut rec = RecorderSink::new();
        let mut tracer = Tracer::new(&mut rec);
        column()
            .trace_with(
                source.emit(0.0, 1.0, 1.0).unwrap(),
                &TraceOptions::default(),
                &mut tracer,
            )
            .unwrap();
        drop(tracer);

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        // Should parse as a JSON array.
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed[0]["event"], "TraceBegin");
        assert_eq!(parsed[1]["event"], "Transmit");
        assert_eq!(parsed[1]["element"], "L1");
        assert_eq!(parsed[2]["event"], "Stop");
        assert_eq!(parsed[2]["reason"], "SingularTransmission");
        assert_eq!(parsed[3]["event"], "TraceSummary");
        assert_eq!(parsed[3]["stopped"], true);
        assert_eq!(parsed[4]["event"], "Ray");
        assert_eq!(parsed[4]["points"][0], json!([1.0, 120.0]));
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn scene_lists_elements_and_traces() {
        let column = column();
        let source = Source::new("Source", 120.0, 2.0).unwrap();
        let trace = column.trace(source.emit(0.0, -1.0, 1.0).unwrap());

        let mut out = Vec::new();
        write_scene(&column, &source, &[trace], &mut out).unwrap();
        let scene: Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(scene["source"]["marker"], json!([[-1.0, 120.0], [1.0, 120.0]]));
        assert_eq!(scene["elements"][0]["name"], "L1");
        assert_eq!(scene["elements"][0]["summary"], "Lens L1: 100.00 (2.00) | 0.00/1.00");
        assert_eq!(scene["elements"][0]["markers"][0]["bfp"][0], json!([-0.5, 98.0]));
        assert_eq!(scene["traces"][0]["rays"].as_array().unwrap().len(), 2);
        assert_eq!(scene["traces"][0]["stopped_by"]["element"], "L2");
    }

    #[test]
    fn infinite_coordinates_become_null() {
        assert_eq!(point(Point::new(f64::INFINITY, 1.0)), json!([null, 1.0]));
    }
}
