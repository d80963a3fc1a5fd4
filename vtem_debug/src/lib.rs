// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON export for vtem diagnostics.
//!
//! This crate provides [`TraceSink`](vtem_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`] — compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`json`] — writes recorded events, ray traces and column geometry as
//!   JSON for external renderers.

pub mod json;
pub mod pretty;
pub mod recorder;
