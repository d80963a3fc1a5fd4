// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node arena and segment chain for a multi-segment ray path.

use alloc::string::String;
use alloc::vec::Vec;

use crate::angle::{self, AngleUnit};
use crate::error::{OpticsError, numeric};
use crate::point::Point;
use crate::segment::{self, Segment};

use super::id::NodeId;
use super::traverse::Segments;

/// One segment of the chain, stored as node slot indices.
#[derive(Clone, Debug)]
pub(crate) struct Link {
    pub(crate) start: u32,
    pub(crate) stop: u32,
    pub(crate) name: String,
}

/// A ray path: a contiguous chain of segments from a source node to an end
/// node.
///
/// Nodes live in struct-of-arrays storage and are addressed by [`NodeId`]
/// handles. Consecutive segments share their boundary node by identity, so
/// moving a boundary with [`set_position`](Self::set_position) moves the end
/// of one segment and the start of the next together. Removed nodes are
/// recycled via a free list, and generation counters make their old handles
/// stale.
#[derive(Clone, Debug)]
pub struct Path {
    // -- Nodes --
    pub(crate) position: Vec<kurbo::Point>,
    pub(crate) name: Vec<String>,
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Segments, in travel order; never empty --
    pub(crate) links: Vec<Link>,
}

impl Path {
    /// Creates a single-segment path from `source` to `end`.
    ///
    /// The coordinates are not validated; use [`try_new`](Self::try_new) for
    /// caller-supplied input.
    #[must_use]
    pub fn new(source: Point, end: Point) -> Self {
        Self::from_segment(Segment::new(source, end))
    }

    /// Creates a single-segment path from `source` to `end`, rejecting NaN
    /// coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if any coordinate is NaN.
    pub fn try_new(source: Point, end: Point) -> Result<Self, OpticsError> {
        Self::try_from_segment(Segment::new(source, end))
    }

    /// Like [`from_segment`](Self::from_segment), rejecting NaN coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if any coordinate is NaN.
    pub fn try_from_segment(segment: Segment) -> Result<Self, OpticsError> {
        for p in [&segment.start, &segment.stop] {
            numeric(p.x, "node x is not a number")?;
            numeric(p.y, "node y is not a number")?;
        }
        Ok(Self::from_segment(segment))
    }

    /// Creates a single-segment path from an existing segment, keeping its
    /// label. The coordinates are not validated.
    #[must_use]
    pub fn from_segment(segment: Segment) -> Self {
        let mut path = Self {
            position: Vec::new(),
            name: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            links: Vec::new(),
        };
        let start = path.alloc(segment.start);
        let stop = path.alloc(segment.stop);
        path.links.push(Link {
            start,
            stop,
            name: segment.name,
        });
        path
    }

    // -- Queries --

    /// Handle of the node where the path begins.
    #[must_use]
    pub fn source(&self) -> NodeId {
        self.handle(self.links[0].start)
    }

    /// Handle of the node where the path currently ends.
    #[must_use]
    pub fn end(&self) -> NodeId {
        self.handle(self.last_link().stop)
    }

    /// Number of segments (always at least one).
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.links.len()
    }

    /// Returns whether the handle refers to a live node of this path.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Coordinates of a node.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::NodeNotFound`] if the handle is stale.
    pub fn position(&self, id: NodeId) -> Result<kurbo::Point, OpticsError> {
        self.validate(id)?;
        Ok(self.position[id.idx as usize])
    }

    /// A node as an owned, labelled [`Point`].
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::NodeNotFound`] if the handle is stale.
    pub fn point(&self, id: NodeId) -> Result<Point, OpticsError> {
        self.validate(id)?;
        Ok(self.point_at(id.idx))
    }

    /// Node handles in travel order, source first.
    #[must_use]
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes = Vec::with_capacity(self.links.len() + 1);
        nodes.push(self.source());
        nodes.extend(self.links.iter().map(|link| self.handle(link.stop)));
        nodes
    }

    /// Node coordinates in travel order, for drawing.
    #[must_use]
    pub fn polyline(&self) -> Vec<kurbo::Point> {
        let mut points = Vec::with_capacity(self.links.len() + 1);
        points.push(self.position[self.links[0].start as usize]);
        points.extend(
            self.links
                .iter()
                .map(|link| self.position[link.stop as usize]),
        );
        points
    }

    /// Read-only iteration over the segments in travel order.
    #[must_use]
    pub fn segments(&self) -> Segments<'_> {
        Segments::new(self)
    }

    /// An owned copy of segment `i`.
    #[must_use]
    pub fn segment(&self, i: usize) -> Option<Segment> {
        self.links.get(i).map(|link| self.segment_of(link))
    }

    /// An owned copy of the final segment.
    #[must_use]
    pub fn last_segment(&self) -> Segment {
        self.segment_of(self.last_link())
    }

    /// Angle of the final segment.
    #[must_use]
    pub fn angle(&self, unit: AngleUnit) -> f64 {
        let (start, stop) = self.last_positions();
        unit.from_degrees(angle::direction(stop - start))
    }

    /// Where the final segment starts, i.e. the current start of the ray.
    #[must_use]
    pub fn current_start(&self) -> kurbo::Point {
        self.position[self.last_link().start as usize]
    }

    /// Where the path ends.
    #[must_use]
    pub fn end_position(&self) -> kurbo::Point {
        self.position[self.last_link().stop as usize]
    }

    // -- Mutation --

    /// Moves a node. Both segments sharing the node see the new position.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::NodeNotFound`] if the handle is stale, or
    /// [`OpticsError::InvalidArgument`] if a coordinate is NaN.
    pub fn set_position(&mut self, id: NodeId, p: kurbo::Point) -> Result<(), OpticsError> {
        self.validate(id)?;
        numeric(p.x, "node x is not a number")?;
        numeric(p.y, "node y is not a number")?;
        self.position[id.idx as usize] = p;
        Ok(())
    }

    /// Moves the end node to axis position `y`, keeping the final segment's
    /// angle.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::InvalidArgument`] if `y` is NaN.
    pub fn extend(&mut self, y: f64) -> Result<(), OpticsError> {
        self.stretch_to(numeric(y, "axis position is not a number")?);
        Ok(())
    }

    /// [`extend`](Self::extend) for a `y` already known not to be NaN.
    pub(crate) fn stretch_to(&mut self, y: f64) {
        let (start, stop) = self.last_positions();
        let end = self.last_link().stop;
        self.position[end as usize] = segment::extended(start, stop, y);
    }

    /// Splits the segment whose axial range brackets `point.y` (inclusive)
    /// into two segments that share the new node.
    ///
    /// The new node is placed exactly at `point`; both halves keep the
    /// original segment's label.
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::NodeNotPlaceable`] if no segment brackets the
    /// position, or [`OpticsError::InvalidArgument`] if a coordinate is NaN.
    /// The path is unchanged on error.
    pub fn insert_node(&mut self, point: Point) -> Result<NodeId, OpticsError> {
        numeric(point.x, "node x is not a number")?;
        let y = numeric(point.y, "node y is not a number")?;
        let Some(i) = self.links.iter().position(|link| {
            let a = self.position[link.start as usize].y;
            let b = self.position[link.stop as usize].y;
            (a >= y && y >= b) || (b >= y && y >= a)
        }) else {
            return Err(OpticsError::NodeNotPlaceable { y });
        };

        let idx = self.alloc(point);
        let stop = self.links[i].stop;
        let name = self.links[i].name.clone();
        self.links[i].stop = idx;
        self.links.insert(
            i + 1,
            Link {
                start: idx,
                stop,
                name,
            },
        );
        Ok(self.handle(idx))
    }

    /// Removes an interior node, merging the segment that stops at it with
    /// its successor.
    ///
    /// The node is matched by handle identity, never by coordinates.
    /// Returns the removed node as a [`Point`].
    ///
    /// # Errors
    ///
    /// Returns [`OpticsError::NodeNotFound`] if the handle is stale or is not
    /// the stop of a segment that has a successor (the source and end nodes
    /// cannot be removed). The path is unchanged on error.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Point, OpticsError> {
        self.validate(id)?;
        let Some(i) = self.links[..self.links.len() - 1]
            .iter()
            .position(|link| link.stop == id.idx)
        else {
            return Err(OpticsError::NodeNotFound(id));
        };

        let next = self.links.remove(i + 1);
        debug_assert_eq!(next.start, id.idx, "segments must share boundary nodes");
        self.links[i].stop = next.stop;

        let removed = self.point_at(id.idx);
        self.generation[id.idx as usize] += 1;
        self.free_list.push(id.idx);
        Ok(removed)
    }

    // -- Internal helpers --

    fn alloc(&mut self, point: Point) -> u32 {
        if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; its generation was bumped on removal.
            self.position[idx as usize] = point.position();
            self.name[idx as usize] = point.name;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.position.push(point.position());
            self.name.push(point.name);
            self.generation.push(0);
            idx
        }
    }

    fn validate(&self, id: NodeId) -> Result<(), OpticsError> {
        if self.is_alive(id) {
            Ok(())
        } else {
            Err(OpticsError::NodeNotFound(id))
        }
    }

    pub(crate) fn handle(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    fn last_link(&self) -> &Link {
        &self.links[self.links.len() - 1]
    }

    fn last_positions(&self) -> (kurbo::Point, kurbo::Point) {
        let link = self.last_link();
        (
            self.position[link.start as usize],
            self.position[link.stop as usize],
        )
    }

    fn point_at(&self, idx: u32) -> Point {
        Point::from_kurbo(self.position[idx as usize]).named(self.name[idx as usize].clone())
    }

    fn segment_of(&self, link: &Link) -> Segment {
        Segment::new(self.point_at(link.start), self.point_at(link.stop)).named(link.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn vertical(top: f64, bottom: f64) -> Path {
        Path::new(Point::new(0.0, top).named("source"), Point::new(0.0, bottom))
    }

    #[test]
    fn checked_constructors_reject_nan() {
        assert_eq!(
            Path::try_new(Point::new(0.0, 1.0), Point::new(f64::NAN, 0.0)).err(),
            Some(OpticsError::InvalidArgument("node x is not a number"))
        );
        assert!(
            Path::try_from_segment(Segment::new(
                Point::new(0.0, f64::NAN),
                Point::new(0.0, 0.0)
            ))
            .is_err()
        );
        let path = Path::try_new(Point::new(0.0, 1.0), Point::new(0.5, 0.0)).unwrap();
        assert_eq!(path.polyline(), vec![kurbo::Point::new(0.0, 1.0), kurbo::Point::new(0.5, 0.0)]);
    }

    #[test]
    fn inserting_at_the_end_leaves_an_axial_stub() {
        let mut path = Path::new(Point::new(1.0, 20.0), Point::new(1.0, 10.0));
        path.insert_node(Point::new(1.0, 10.0)).unwrap();
        assert_eq!(path.segment_count(), 2);
        let last = path.last_segment();
        assert_eq!(last.length(), 0.0);
        assert_eq!(path.angle(AngleUnit::Degrees), 0.0);
    }

    #[test]
    fn new_path_has_one_segment() {
        let path = vertical(10.0, 0.0);
        assert_eq!(path.segment_count(), 1);
        assert_eq!(path.nodes(), vec![path.source(), path.end()]);
        assert_eq!(path.point(path.source()).unwrap().name, "source");
    }

    #[test]
    fn insert_splits_bracketing_segment() {
        let mut path = vertical(10.0, 0.0);
        let mid = path.insert_node(Point::new(1.0, 4.0)).unwrap();
        assert_eq!(path.segment_count(), 2);
        assert_eq!(path.nodes(), vec![path.source(), mid, path.end()]);

        let segs: Vec<_> = path.segments().collect();
        assert_eq!(segs[0].stop, mid);
        assert_eq!(segs[1].start, mid);
        assert_eq!(
            path.polyline(),
            vec![
                kurbo::Point::new(0.0, 10.0),
                kurbo::Point::new(1.0, 4.0),
                kurbo::Point::new(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn insert_on_boundary_is_inclusive() {
        let mut path = vertical(10.0, 0.0);
        assert!(path.insert_node(Point::new(0.0, 0.0)).is_ok());
        assert!(path.insert_node(Point::new(0.0, 10.0)).is_ok());
        assert_eq!(path.segment_count(), 3);
    }

    #[test]
    fn insert_outside_fails_without_change() {
        let mut path = vertical(10.0, 0.0);
        assert_eq!(
            path.insert_node(Point::new(0.0, 11.0)),
            Err(OpticsError::NodeNotPlaceable { y: 11.0 })
        );
        assert_eq!(path.segment_count(), 1);
        assert_eq!(path.len, 2);
    }

    #[test]
    fn split_then_merge_restores_chain() {
        let mut path = vertical(10.0, 0.0);
        let before = path.polyline();
        let (source, end) = (path.source(), path.end());

        let mid = path.insert_node(Point::new(0.5, 3.0).named("probe")).unwrap();
        let removed = path.remove_node(mid).unwrap();

        assert_eq!(removed.name, "probe");
        assert_eq!(path.segment_count(), 1);
        assert_eq!(path.polyline(), before);
        assert_eq!(path.nodes(), vec![source, end]);
        assert!(!path.is_alive(mid));
    }

    #[test]
    fn remove_matches_identity_not_coordinates() {
        let mut path = vertical(10.0, 0.0);
        let first = path.insert_node(Point::new(0.0, 5.0)).unwrap();
        let twin = path.insert_node(Point::new(0.0, 5.0)).unwrap();
        assert_ne!(first, twin);
        assert_eq!(path.segment_count(), 3);

        path.remove_node(twin).unwrap();
        assert!(path.is_alive(first));
        assert_eq!(path.nodes(), vec![path.source(), first, path.end()]);
    }

    #[test]
    fn remove_rejects_endpoints_and_stale_handles() {
        let mut path = vertical(10.0, 0.0);
        let end = path.end();
        assert_eq!(path.remove_node(end), Err(OpticsError::NodeNotFound(end)));
        let source = path.source();
        assert_eq!(
            path.remove_node(source),
            Err(OpticsError::NodeNotFound(source))
        );

        let mid = path.insert_node(Point::new(0.0, 2.0)).unwrap();
        path.remove_node(mid).unwrap();
        assert_eq!(path.remove_node(mid), Err(OpticsError::NodeNotFound(mid)));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut path = vertical(10.0, 0.0);
        let a = path.insert_node(Point::new(0.0, 6.0)).unwrap();
        path.remove_node(a).unwrap();
        let b = path.insert_node(Point::new(0.0, 4.0)).unwrap();
        assert_eq!(a.index(), b.index());
        assert_ne!(a.generation(), b.generation());
        assert!(path.position(a).is_err());
        assert_eq!(path.position(b).unwrap(), kurbo::Point::new(0.0, 4.0));
    }

    #[test]
    fn shared_node_moves_both_segments() {
        let mut path = vertical(10.0, 0.0);
        let mid = path.insert_node(Point::new(0.0, 5.0)).unwrap();
        path.set_position(mid, kurbo::Point::new(2.0, 5.0)).unwrap();
        assert_eq!(path.segment(0).unwrap().stop.x, 2.0);
        assert_eq!(path.segment(1).unwrap().start.x, 2.0);
    }

    #[test]
    fn extend_keeps_final_angle() {
        let seg = Segment::with_angle(Point::new(0.0, 10.0), Point::new(0.0, 9.0), 20.0).unwrap();
        let mut path = Path::from_segment(seg.named("emitted"));
        let before = path.angle(AngleUnit::Degrees);
        path.extend(2.0).unwrap();
        assert!((path.end_position().y - 2.0).abs() < 1e-12);
        assert!((path.angle(AngleUnit::Degrees) - before).abs() < 1e-9);
        assert_eq!(path.last_segment().name, "emitted");
        assert_eq!(path.current_start(), kurbo::Point::new(0.0, 10.0));
    }
}
