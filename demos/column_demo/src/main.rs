// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traces a symmetric pair of rays through a reference TEM column.
//!
//! Builds a ten-element column (three condenser lenses, a condenser
//! mini-lens, the objective, an objective mini-lens, three intermediate
//! lenses and a projector), prints each element's summary, and traces rays
//! leaving both edges of the source at `±angle` degrees. Events go to both a
//! [`PrettyPrintSink`](vtem_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](vtem_debug::recorder::RecorderSink); the recording is
//! exported to `trace.json` and the scene geometry to `column.json`.
//!
//! Usage: `column_demo [angle]` (default 1°).

use std::fs::File;
use std::io::BufWriter;

use vtem_core::column::{Column, RayTrace, TraceOptions};
use vtem_core::error::OpticsError;
use vtem_core::lens::Lens;
use vtem_core::objective::ObjectiveLens;
use vtem_core::source::Source;
use vtem_core::trace::{
    SkipEvent, StopEvent, TraceBeginEvent, TraceSink, TraceSummary, Tracer, TransmitEvent,
};

use vtem_debug::pretty::PrettyPrintSink;
use vtem_debug::recorder::RecorderSink;

const DEFAULT_ANGLE: f64 = 1.0;
/// Axis position of the viewing screen.
const SCREEN_Y: f64 = 0.0;

/// Thin lenses of the reference column: name, axis position, focal length.
const LENSES: [(&str, f64, f64); 9] = [
    ("CL1", 200.0, 2.0),
    ("CL2", 180.0, 2.0),
    ("CL3", 160.0, 2.0),
    ("CM", 140.0, 2.0),
    ("OM", 100.0, 2.0),
    ("IL1", 80.0, 2.0),
    ("IL2", 60.0, 2.0),
    ("IL3", 40.0, 2.0),
    ("PL", 20.0, 2.0),
];

fn main() {
    let angle = match std::env::args().nth(1) {
        Some(arg) => arg.parse().expect("angle must be a number"),
        None => DEFAULT_ANGLE,
    };

    let source = Source::new("Source", 220.0, 10.0).expect("valid source");
    let mut column = reference_column().expect("valid reference column");

    println!("{source}");
    for (element, active) in column.elements() {
        let state = if active { "" } else { " (inactive)" };
        println!("{element}{state}");
    }

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    // -- trace -------------------------------------------------------------
    let options = TraceOptions::default().with_screen(SCREEN_Y);
    let traces = {
        let mut both = Both {
            a: &mut pretty,
            b: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut both);
        column
            .trace_symmetric(&source, angle, &options, &mut tracer)
            .expect("angle must point down the axis")
    };

    // Widen every lens so the drawn apertures cover both rays.
    let range = traces
        .iter()
        .filter_map(RayTrace::x_range)
        .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)));
    if let Some((left, right)) = range {
        column.fit_apertures(left, right);
    }

    // -- export ------------------------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    vtem_debug::json::export(recorder.as_bytes(), &mut writer).expect("failed to write trace");

    let scene_path = "column.json";
    let file = File::create(scene_path).expect("failed to create column.json");
    let mut writer = BufWriter::new(file);
    vtem_debug::json::write_scene(&column, &source, &traces, &mut writer)
        .expect("failed to write scene");

    println!("Wrote {path} and {scene_path} (angle ±{angle}°)");
}

fn reference_column() -> Result<Column, OpticsError> {
    let mut column = Column::new();
    for (name, y, f) in LENSES {
        column.push(Lens::new(name, y, f)?)?;
    }
    column.push(ObjectiveLens::new("OL", 120.0, (2.0, 2.0), 10.0)?.coupled(true))?;
    Ok(column)
}

/// Forwards every event to two sinks.
struct Both<'a> {
    a: &'a mut dyn TraceSink,
    b: &'a mut dyn TraceSink,
}

impl TraceSink for Both<'_> {
    fn on_trace_begin(&mut self, e: &TraceBeginEvent) {
        self.a.on_trace_begin(e);
        self.b.on_trace_begin(e);
    }

    fn on_transmit(&mut self, e: &TransmitEvent<'_>) {
        self.a.on_transmit(e);
        self.b.on_transmit(e);
    }

    fn on_skip(&mut self, e: &SkipEvent<'_>) {
        self.a.on_skip(e);
        self.b.on_skip(e);
    }

    fn on_stop(&mut self, e: &StopEvent<'_>) {
        self.a.on_stop(e);
        self.b.on_stop(e);
    }

    fn on_trace_summary(&mut self, s: &TraceSummary) {
        self.a.on_trace_summary(s);
        self.b.on_trace_summary(s);
    }

    fn on_ray(&mut self, trace_index: u64, ray_index: u32, points: &[kurbo::Point]) {
        self.a.on_ray(trace_index, ray_index, points);
        self.b.on_ray(trace_index, ray_index, points);
    }
}
