// Copyright 2026 the vtem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only segment iteration.

use super::id::NodeId;
use super::store::Path;

/// A borrowed view of one segment of a [`Path`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentView<'a> {
    /// Node the segment starts at.
    pub start: NodeId,
    /// Node the segment stops at (the next segment's start).
    pub stop: NodeId,
    /// The segment's current extent.
    pub line: kurbo::Line,
    /// The segment's label.
    pub name: &'a str,
}

/// An iterator over the segments of a path in travel order.
///
/// Created by [`Path::segments`].
#[derive(Debug)]
pub struct Segments<'a> {
    path: &'a Path,
    current: usize,
}

impl<'a> Segments<'a> {
    pub(crate) fn new(path: &'a Path) -> Self {
        Self { path, current: 0 }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = SegmentView<'a>;

    fn next(&mut self) -> Option<SegmentView<'a>> {
        let link = self.path.links.get(self.current)?;
        self.current += 1;
        Some(SegmentView {
            start: self.path.handle(link.start),
            stop: self.path.handle(link.stop),
            line: kurbo::Line::new(
                self.path.position[link.start as usize],
                self.path.position[link.stop as usize],
            ),
            name: &link.name,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.path.links.len() - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Segments<'_> {}
