//! Edge interpolation pass.
//!
//! Every grid edge whose endpoints straddle the isovalue gets exactly one
//! crossing point, shared by the (up to) two cells that border it.

use super::grid::Grid;
use super::types::Point;

/// Given `(u0, v0)` and `(u1, v1)`, finds `u` such that `(u, isovalue)` lies on
/// the line through them.
#[inline]
pub fn lerp(u0: f64, v0: f64, u1: f64, v1: f64, isovalue: f64) -> f64 {
    u0 + (isovalue - v0) * (u1 - u0) / (v1 - v0)
}

/// 0 when the value is below the isovalue, 1 when at or above it.
#[inline]
pub(crate) fn corner_bit(value: f64, isovalue: f64) -> u8 {
    if value < isovalue {
        0
    } else {
        1
    }
}

/// Row-major 2D array of optional crossing points.
#[derive(Clone, Debug)]
struct EdgeGrid {
    data: Vec<Option<Point>>,
    cols: usize,
}

impl EdgeGrid {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![None; rows * cols],
            cols,
        }
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> Option<Point> {
        self.data[row * self.cols + col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, point: Point) {
        self.data[row * self.cols + col] = Some(point);
    }

    fn count(&self) -> usize {
        self.data.iter().filter(|p| p.is_some()).count()
    }
}

/// Interpolated crossings of one isovalue over a whole grid.
///
/// Horizontal edges form a `(rows + 1) x cols` array: row `r` holds the
/// bottom edges of cell row `r`, and the extra top row holds the top edges of
/// the last cell row. Vertical edges form a `rows x (cols + 1)` array in the
/// same way, with the extra column for the right edges of the last cell
/// column.
#[derive(Clone, Debug)]
pub struct EdgeCrossings {
    horizontal: EdgeGrid,
    vertical: EdgeGrid,
}

impl EdgeCrossings {
    pub fn compute(grid: &Grid<'_>, isovalue: f64) -> Self {
        let rows = grid.rows();
        let cols = grid.cols();
        let mut horizontal = EdgeGrid::new(rows + 1, cols);
        let mut vertical = EdgeGrid::new(rows, cols + 1);

        // Bottom and left edge of every cell
        for (r, c, cell) in grid.cells() {
            let (v0, v1, v3) = (cell.v0, cell.v1, cell.v3);
            let b0 = corner_bit(v0.z, isovalue);
            let b1 = corner_bit(v1.z, isovalue);
            let b3 = corner_bit(v3.z, isovalue);

            if b0 != b1 {
                let x01 = lerp(v0.x, v0.z, v1.x, v1.z, isovalue);
                horizontal.set(r, c, Point::new(x01, v0.y, isovalue));
            }

            if b3 != b0 {
                let y30 = lerp(v3.y, v3.z, v0.y, v0.z, isovalue);
                vertical.set(r, c, Point::new(v3.x, y30, isovalue));
            }
        }

        // Top edges of the last cell row
        let top = rows - 1;
        for c in 0..cols {
            let cell = grid.cell(top, c);
            let (v2, v3) = (cell.v2, cell.v3);
            if corner_bit(v2.z, isovalue) != corner_bit(v3.z, isovalue) {
                let x23 = lerp(v2.x, v2.z, v3.x, v3.z, isovalue);
                horizontal.set(rows, c, Point::new(x23, v2.y, isovalue));
            }
        }

        // Right edges of the last cell column
        let right = cols - 1;
        for r in 0..rows {
            let cell = grid.cell(r, right);
            let (v1, v2) = (cell.v1, cell.v2);
            if corner_bit(v1.z, isovalue) != corner_bit(v2.z, isovalue) {
                let y12 = lerp(v1.y, v1.z, v2.y, v2.z, isovalue);
                vertical.set(r, cols, Point::new(v1.x, y12, isovalue));
            }
        }

        Self {
            horizontal,
            vertical,
        }
    }

    /// Crossings on the bottom (`p01`), right (`p12`), top (`p23`) and left
    /// (`p30`) edges of cell `[row][col]`.
    pub fn cell_crossings(&self, row: usize, col: usize) -> CellCrossings {
        CellCrossings {
            p01: self.horizontal.get(row, col),
            p12: self.vertical.get(row, col + 1),
            p23: self.horizontal.get(row + 1, col),
            p30: self.vertical.get(row, col),
        }
    }

    /// Number of edges that carry a crossing.
    pub fn len(&self) -> usize {
        self.horizontal.count() + self.vertical.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The four edge crossings bordering one cell; `None` where the edge does not
/// straddle the isovalue.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellCrossings {
    pub p01: Option<Point>,
    pub p12: Option<Point>,
    pub p23: Option<Point>,
    pub p30: Option<Point>,
}
