// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-segment ray paths.
//!
//! A *path* is the full route of a ray: an ordered chain of segments where
//! each segment's stop node **is** the next segment's start node. Nodes are
//! addressed by generational [`NodeId`] handles, so splitting and merging
//! locate the specific boundary instance rather than any point that happens
//! to share its coordinates.
//!
//! - [`Path::insert_node`] splits the segment bracketing a new node's axis
//!   position.
//! - [`Path::remove_node`] merges the segment ending at a node with its
//!   successor; the removed handle becomes stale.
//! - [`Path::segments`] exposes a read-only, ordered view for rendering.

mod id;
mod store;
mod traverse;

pub use id::NodeId;
pub use store::Path;
pub use traverse::{SegmentView, Segments};
