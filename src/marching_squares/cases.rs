//! Cell classification and the 16-case segment table.

use crate::error::{IsolineError, Result};

use super::edges::{corner_bit, CellCrossings};
use super::grid::Cell;
use super::types::{Point, Segment};

/// One side of a cell, named by the corners it joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellEdge {
    /// v0 - v1, crossing `p01`
    Bottom,
    /// v1 - v2, crossing `p12`
    Right,
    /// v2 - v3, crossing `p23`
    Top,
    /// v3 - v0, crossing `p30`
    Left,
}

impl CellEdge {
    /// Corner indices (into `v0..v3`) at the ends of this edge.
    pub fn corners(self) -> (usize, usize) {
        match self {
            CellEdge::Bottom => (0, 1),
            CellEdge::Right => (1, 2),
            CellEdge::Top => (2, 3),
            CellEdge::Left => (3, 0),
        }
    }

    fn crossing(self, crossings: &CellCrossings) -> Option<Point> {
        match self {
            CellEdge::Bottom => crossings.p01,
            CellEdge::Right => crossings.p12,
            CellEdge::Top => crossings.p23,
            CellEdge::Left => crossings.p30,
        }
    }
}

/// Directed segment expressed as (start edge, end edge).
pub type EdgePair = (CellEdge, CellEdge);

use CellEdge::{Bottom, Left, Right, Top};

/// Segment topology per lookup code. Codes 5 and 10 are saddles and are
/// resolved by [`resolve_saddle`] instead.
const SEGMENT_TABLE: [&[EdgePair]; 16] = [
    &[], // 0
    &[(Left, Bottom)], // 1
    &[(Bottom, Right)], // 2
    &[(Left, Right)], // 3
    &[(Right, Top)], // 4
    &[], // 5 saddle
    &[(Bottom, Top)], // 6
    &[(Left, Top)], // 7
    &[(Top, Left)], // 8
    &[(Top, Bottom)], // 9
    &[], // 10 saddle
    &[(Top, Right)], // 11
    &[(Right, Left)], // 12
    &[(Right, Bottom)], // 13
    &[(Bottom, Left)], // 14
    &[], // 15
];

static SADDLE_5_BELOW: [EdgePair; 2] = [(Right, Top), (Left, Bottom)];
static SADDLE_5_ABOVE: [EdgePair; 2] = [(Right, Bottom), (Left, Top)];
static SADDLE_10_BELOW: [EdgePair; 2] = [(Bottom, Right), (Top, Left)];
static SADDLE_10_ABOVE: [EdgePair; 2] = [(Top, Right), (Bottom, Left)];

/// 4-bit code `b0 | b1 << 1 | b2 << 2 | b3 << 3` of the corners' positions
/// relative to the isovalue.
pub fn lookup_code(cell: &Cell<'_>, isovalue: f64) -> u8 {
    let [z0, z1, z2, z3] = cell.values();
    corner_bit(z0, isovalue)
        | (corner_bit(z1, isovalue) << 1)
        | (corner_bit(z2, isovalue) << 2)
        | (corner_bit(z3, isovalue) << 3)
}

#[inline]
pub fn is_saddle(code: u8) -> bool {
    code == 5 || code == 10
}

/// Value of the bilinear interpolant at the intersection of its asymptotes
/// (the asymptotic decider).
///
/// Uses `(b00 * b11 - b10 * b01) / (b00 + b11 - b01 - b10)`; the numerator in
/// Nielson and Hamann's paper has the wrong sign.
pub fn asymptotic_decider(cell: &Cell<'_>) -> f64 {
    let b00 = cell.v0.z;
    let b10 = cell.v1.z;
    let b11 = cell.v2.z;
    let b01 = cell.v3.z;
    (b00 * b11 - b10 * b01) / (b00 + b11 - b01 - b10)
}

/// Picks the diagonal pairing for saddle codes 5 and 10.
///
/// For finite corner values the decider denominator cannot vanish in a
/// saddle. A NaN decider (non-finite corners) compares false and takes the
/// second pairing.
pub fn resolve_saddle(code: u8, cell: &Cell<'_>, isovalue: f64) -> Result<&'static [EdgePair]> {
    let bi = asymptotic_decider(cell);
    if !bi.is_finite() {
        log::warn!(
            "[resolve_saddle] Non-finite decider {} for code {} at corners {:?}",
            bi,
            code,
            cell.values()
        );
    }
    let below = bi < isovalue;
    match (code, below) {
        (5, true) => Ok(&SADDLE_5_BELOW),
        (5, false) => Ok(&SADDLE_5_ABOVE),
        (10, true) => Ok(&SADDLE_10_BELOW),
        (10, false) => Ok(&SADDLE_10_ABOVE),
        _ => Err(IsolineError::InvalidLookupCode(code)),
    }
}

/// Edge pairs for a non-saddle code. Saddles return an empty slice here.
pub fn table_edges(code: u8) -> Result<&'static [EdgePair]> {
    SEGMENT_TABLE
        .get(code as usize)
        .copied()
        .ok_or(IsolineError::InvalidLookupCode(code))
}

/// Edge pairs a cell contributes for a given code, resolving saddles.
pub fn cell_edge_pairs(code: u8, cell: &Cell<'_>, isovalue: f64) -> Result<&'static [EdgePair]> {
    if is_saddle(code) {
        resolve_saddle(code, cell, isovalue)
    } else {
        table_edges(code)
    }
}

/// Zero, one or two segments produced by a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum CellSegments {
    #[default]
    Empty,
    One(Segment),
    Two(Segment, Segment),
}

impl CellSegments {
    pub fn len(&self) -> usize {
        match self {
            CellSegments::Empty => 0,
            CellSegments::One(_) => 1,
            CellSegments::Two(_, _) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellSegments::Empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = Segment> {
        let (first, second) = match *self {
            CellSegments::Empty => (None, None),
            CellSegments::One(a) => (Some(a), None),
            CellSegments::Two(a, b) => (Some(a), Some(b)),
        };
        first.into_iter().chain(second)
    }
}

/// Builds the directed segments of cell `[row][col]` from its lookup code
/// and edge crossings.
pub fn cell_segments(
    row: usize,
    col: usize,
    code: u8,
    cell: &Cell<'_>,
    crossings: &CellCrossings,
    isovalue: f64,
) -> Result<CellSegments> {
    let pairs = cell_edge_pairs(code, cell, isovalue)?;

    let point = |edge: CellEdge| {
        edge.crossing(crossings)
            .ok_or(IsolineError::MissingEdgeCrossing { row, col, edge })
    };
    let segment = |(from, to): EdgePair| -> Result<Segment> {
        Ok(Segment::new(point(from)?, point(to)?))
    };

    match pairs {
        [] => Ok(CellSegments::Empty),
        [a] => Ok(CellSegments::One(segment(*a)?)),
        [a, b] => Ok(CellSegments::Two(segment(*a)?, segment(*b)?)),
        _ => Err(IsolineError::InvalidLookupCode(code)),
    }
}
