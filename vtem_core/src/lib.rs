// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thin-lens ray geometry for transmission electron microscope columns.
//!
//! `vtem_core` models the lenses of a TEM column as idealized thin lenses on
//! a vertical optical axis and traces rays through them. It is `no_std`
//! compatible (with `alloc`); coordinates are `f64` and math goes through
//! `kurbo` so no platform float intrinsics are needed.
//!
//! # Architecture
//!
//! Light travels toward decreasing `y`. A trace feeds the newest ray into
//! each active element in turn:
//!
//! ```text
//!   Source::emit() ──► Path
//!                        │
//!                        ▼
//!   Column::trace() ──► Element::transmit() ──► Transmission
//!        ▲                                          │
//!        │     Rays: append, continue               │
//!        ├──── Skipped: keep ray, continue ◄────────┤
//!        │                                          │
//!        └──── Stopped: end trace ◄─────────────────┘
//!                        │
//!                        ▼
//!                    RayTrace
//! ```
//!
//! **[`angle`]** — Angle convention and reduction to `(-180°, 180°]`.
//!
//! **[`point`]** and **[`segment`]** — Named points and directed segments
//! that can be re-aimed, extended, cut and interpolated.
//!
//! **[`path`]** — Multi-segment rays whose segments share boundary nodes by
//! identity, addressed through generational handles.
//!
//! **[`lens`]** — The thin lens and its transmission protocol.
//!
//! **[`objective`]** — Two-field objective lens, optionally coupled.
//!
//! **[`source`]** — Ray emitter across an aperture.
//!
//! **[`column`]** — Element collection and the trace loop.
//!
//! **[`error`]** — [`OpticsError`](error::OpticsError) and its
//! [`ErrorKind`](error::ErrorKind) taxonomy.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! trace-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-ray
//!   polyline events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod angle;
pub mod column;
pub mod error;
pub mod lens;
pub mod objective;
pub mod path;
pub mod point;
pub mod segment;
pub mod source;
pub mod trace;
