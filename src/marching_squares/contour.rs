//! Contour stitching: links per-cell segments into polylines.

use indexmap::IndexMap;

use super::types::{Isoline, IsolineCollection, Point, Segment};

/// Scratch state for stitching one isovalue's segments. Consumed as contours
/// are traced.
struct SegmentChains {
    /// Start point to the segment leaving it. Later segments overwrite earlier
    /// ones with the same start.
    outgoing: IndexMap<Point, Segment>,
    /// `true` for points only ever seen as a segment start.
    open_start: IndexMap<Point, bool>,
}

impl SegmentChains {
    fn new<I>(segments: I) -> Self
    where
        I: IntoIterator<Item = Segment>,
    {
        let segments = segments.into_iter();
        let (lower, _) = segments.size_hint();
        let mut outgoing = IndexMap::with_capacity(lower);
        let mut open_start = IndexMap::with_capacity(lower * 2);

        for segment in segments {
            outgoing.insert(segment.start, segment);
            open_start.entry(segment.start).or_insert(true);
            open_start.insert(segment.end, false);
        }

        Self {
            outgoing,
            open_start,
        }
    }

    /// Heads of non-closed polylines, in the order they are traced.
    fn open_heads(&self) -> Vec<Point> {
        // Traced as a stack: last registered head first.
        self.outgoing
            .keys()
            .rev()
            .filter(|point| self.open_start.get(*point).copied().unwrap_or(false))
            .copied()
            .collect()
    }

    /// Follows segments from `start` until a point has no outgoing segment.
    /// On a loop that point is `start` itself, whose segment was removed on
    /// the first step, so the isoline ends where it began.
    fn trace(&mut self, start: Point) -> Isoline {
        let mut isoline = Isoline::new();
        let mut point = start;
        loop {
            isoline.push(point);
            match self.outgoing.swap_remove(&point) {
                Some(segment) => point = segment.end,
                None => break,
            }
        }
        isoline
    }

    fn any_remaining(&self) -> Option<Point> {
        self.outgoing.keys().next().copied()
    }
}

/// Stitches directed segments into isolines.
///
/// Open polylines are traced first from every point that starts a segment but
/// never ends one; whatever remains forms closed loops.
pub fn stitch_segments<I>(segments: I) -> IsolineCollection
where
    I: IntoIterator<Item = Segment>,
{
    let mut chains = SegmentChains::new(segments);
    let mut contours = IsolineCollection::new();

    for head in chains.open_heads() {
        contours.add(chains.trace(head));
    }
    let open_count = contours.len();

    while let Some(start) = chains.any_remaining() {
        contours.add(chains.trace(start));
    }

    log::trace!(
        "[stitch_segments] {} open, {} closed",
        open_count,
        contours.len() - open_count
    );

    contours
}
