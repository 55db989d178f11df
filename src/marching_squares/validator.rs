use std::collections::HashSet;

use crate::error::Result;

use super::cases::{cell_edge_pairs, lookup_code, CellEdge};
use super::edges::{CellCrossings, EdgeCrossings};
use super::grid::{Cell, Grid};
use super::types::{IsolineCollection, Point, Segment};
use super::MarchingSquares;

/// Result of validating the isolines of one isovalue.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Cells with a segment that has a below-isovalue corner on its right.
    pub misoriented: Vec<(usize, usize)>,
    /// Last points of open isolines that still start a segment.
    pub dangling_ends: Vec<Point>,
    /// Segments that do not appear as consecutive points of any isoline.
    pub uncovered_segments: usize,
    pub is_valid: bool,
}

/// Signed area of the parallelogram spanned by `a -> b` and `a -> c` in the
/// xy plane. Positive when `c` lies to the left of `a -> b`.
fn cross(a: &Point, b: &Point, c: &Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn crossing_of(edge: CellEdge, crossings: &CellCrossings) -> Option<Point> {
    match edge {
        CellEdge::Bottom => crossings.p01,
        CellEdge::Right => crossings.p12,
        CellEdge::Top => crossings.p23,
        CellEdge::Left => crossings.p30,
    }
}

/// Check that every segment of a cell keeps the below-isovalue corner of each
/// edge it touches on its left. Assumes `v0..v3` run counter-clockwise in the
/// xy plane, as [`points_from_heights`](super::points_from_heights) lays them
/// out. Zero-length segments are skipped.
pub fn validate_cell_orientation(
    cell: &Cell<'_>,
    crossings: &CellCrossings,
    isovalue: f64,
) -> Result<bool> {
    let code = lookup_code(cell, isovalue);
    let corners = cell.corners();

    for &(from, to) in cell_edge_pairs(code, cell, isovalue)? {
        let (Some(start), Some(end)) = (crossing_of(from, crossings), crossing_of(to, crossings))
        else {
            return Ok(false);
        };
        if start.x == end.x && start.y == end.y {
            continue;
        }

        for edge in [from, to] {
            let (i, j) = edge.corners();
            let below = if corners[i].z < isovalue {
                corners[i]
            } else {
                corners[j]
            };
            if cross(&start, &end, below) <= 0.0 {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Cells whose segments break the lower-on-the-left orientation rule.
pub fn validate_orientation(grid: &Grid<'_>, isovalue: f64) -> Result<Vec<(usize, usize)>> {
    let crossings = EdgeCrossings::compute(grid, isovalue);
    let mut misoriented = Vec::new();
    for (row, col, cell) in grid.cells() {
        if !validate_cell_orientation(cell, &crossings.cell_crossings(row, col), isovalue)? {
            misoriented.push((row, col));
        }
    }
    Ok(misoriented)
}

/// Check stitched isolines against the segments they were built from: open
/// isolines must stop at a point with no outgoing segment, and every segment
/// must be walked by some isoline.
pub fn validate_collection(segments: &[Segment], collection: &IsolineCollection) -> (Vec<Point>, usize) {
    let starts: HashSet<Point> = segments.iter().map(|s| s.start).collect();
    let mut walked: HashSet<(Point, Point)> = HashSet::new();

    let mut dangling_ends = Vec::new();
    for isoline in collection {
        for pair in isoline.points().windows(2) {
            walked.insert((pair[0], pair[1]));
        }
        if !isoline.is_closed() {
            if let Some(last) = isoline.last() {
                if starts.contains(last) {
                    dangling_ends.push(*last);
                }
            }
        }
    }

    let uncovered = segments
        .iter()
        .filter(|s| !walked.contains(&(s.start, s.end)))
        .count();

    (dangling_ends, uncovered)
}

/// Run the full pipeline for one isovalue and validate the result.
pub fn validate_isovalue(grid: &Grid<'_>, isovalue: f64) -> Result<ValidationResult> {
    let misoriented = validate_orientation(grid, isovalue)?;

    let mut marching = MarchingSquares::new(grid, isovalue);
    marching.compute_segments()?;
    let segments: Vec<Segment> = marching.segments().iter().flat_map(|s| s.iter()).collect();
    let collection = marching.compute_contours();

    let (dangling_ends, uncovered_segments) = validate_collection(&segments, &collection);
    let is_valid = misoriented.is_empty() && dangling_ends.is_empty() && uncovered_segments == 0;

    if !is_valid {
        log::warn!(
            "[validate_isovalue] isovalue {}: {} misoriented cells, {} dangling ends, {} uncovered segments",
            isovalue,
            misoriented.len(),
            dangling_ends.len(),
            uncovered_segments
        );
    }

    Ok(ValidationResult {
        misoriented,
        dangling_ends,
        uncovered_segments,
        is_valid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marching_squares::grid::points_from_heights;
    use crate::marching_squares::Isoline;

    /// Corner values `[v0, v1, v2, v3]` as a single cell.
    fn single_cell(values: [f64; 4]) -> Vec<Vec<Point>> {
        points_from_heights(&[vec![values[0], values[1]], vec![values[3], values[2]]])
    }

    fn assert_valid(points: &[Vec<Point>], isovalue: f64, label: &str) {
        let grid = Grid::new(points).unwrap();
        let result = validate_isovalue(&grid, isovalue).unwrap();
        assert!(
            result.is_valid,
            "{}: misoriented={:?}, dangling={:?}, uncovered={}",
            label,
            result.misoriented,
            result.dangling_ends,
            result.uncovered_segments
        );
    }

    #[test]
    fn test_every_code_is_oriented() {
        for code in 1u8..15 {
            let values = [0, 1, 2, 3].map(|i| if (code >> i) & 1 == 1 { 1.0 } else { 0.0 });
            for isovalue in [0.3, 0.5, 0.7] {
                assert_valid(&single_cell(values), isovalue, &format!("code {}", code));
            }
        }
    }

    #[test]
    fn test_uneven_corners_are_oriented() {
        let cases: [(&str, [f64; 4]); 6] = [
            ("steep corner", [9.0, 1.0, 0.5, 2.0]),
            ("ramp", [0.0, 1.0, 3.0, 2.0]),
            ("saddle 5", [4.0, 0.0, 3.0, 1.0]),
            ("saddle 10", [1.0, 4.0, 0.0, 3.0]),
            ("single raised", [1.6, 1.4, 1.45, 1.2]),
            ("negative", [-3.0, -1.0, 2.0, -0.5]),
        ];
        for (label, values) in &cases {
            assert_valid(&single_cell(*values), 1.5, label);
        }
    }

    #[test]
    fn test_larger_fields_validate() {
        let volcano = points_from_heights(&[
            vec![1.0, 1.0, 1.0, 1.0, 1.0],
            vec![1.0, 2.0, 3.0, 2.0, 1.0],
            vec![1.0, 3.0, 3.0, 3.0, 1.0],
            vec![1.0, 2.0, 3.0, 2.0, 1.0],
            vec![1.0, 1.0, 1.0, 1.0, 1.0],
        ]);
        for isovalue in [1.1, 1.5, 2.5, 2.9] {
            assert_valid(&volcano, isovalue, &format!("volcano {}", isovalue));
        }

        let ripples: Vec<Vec<f64>> = (0..12)
            .map(|r| {
                (0..15)
                    .map(|c| ((r as f64) * 0.7).sin() * ((c as f64) * 0.45).cos())
                    .collect()
            })
            .collect();
        let points = points_from_heights(&ripples);
        for isovalue in [-0.5, -0.1, 0.25, 0.6] {
            assert_valid(&points, isovalue, &format!("ripples {}", isovalue));
        }
    }

    #[test]
    fn test_reversed_segment_is_misoriented() {
        let points = single_cell([0.0, 1.0, 0.0, 0.0]);
        let grid = Grid::new(&points).unwrap();
        let crossings = EdgeCrossings::compute(&grid, 0.5);
        let good = crossings.cell_crossings(0, 0);
        assert!(validate_cell_orientation(grid.cell(0, 0), &good, 0.5).unwrap());

        // Swapping the bottom and right crossings reverses the segment.
        let reversed = CellCrossings {
            p01: good.p12,
            p12: good.p01,
            ..good
        };
        assert!(!validate_cell_orientation(grid.cell(0, 0), &reversed, 0.5).unwrap());
    }

    #[test]
    fn test_collection_checks_detect_problems() {
        let a = Point::new(0.0, 0.0, 0.5);
        let b = Point::new(1.0, 0.0, 0.5);
        let c = Point::new(2.0, 0.0, 0.5);
        let segments = vec![Segment::new(a, b), Segment::new(b, c)];

        let mut complete = IsolineCollection::new();
        complete.add(Isoline::from(vec![a, b, c]));
        assert_eq!(validate_collection(&segments, &complete), (vec![], 0));

        let mut truncated = IsolineCollection::new();
        truncated.add(Isoline::from(vec![a, b]));
        assert_eq!(validate_collection(&segments, &truncated), (vec![b], 1));
    }
}
