use crate::error::{IsolineError, Result};

use super::types::Point;

/// Four corners of one grid square, counter-clockwise from the lower left.
///
/// Corners are borrowed from the caller's point grid; an interior point is
/// shared by up to four cells.
#[derive(Clone, Copy, Debug)]
pub struct Cell<'a> {
    pub v0: &'a Point,
    pub v1: &'a Point,
    pub v2: &'a Point,
    pub v3: &'a Point,
}

impl<'a> Cell<'a> {
    pub fn corners(&self) -> [&'a Point; 4] {
        [self.v0, self.v1, self.v2, self.v3]
    }

    /// Scalar values in corner order v0..v3.
    pub fn values(&self) -> [f64; 4] {
        [self.v0.z, self.v1.z, self.v2.z, self.v3.z]
    }
}

/// Cells of a rectangular point grid. Built once per field and shared
/// read-only by every isovalue.
#[derive(Debug)]
pub struct Grid<'a> {
    cells: Vec<Cell<'a>>,
    rows: usize,
    cols: usize,
}

impl<'a> Grid<'a> {
    /// Builds the `(R-1) x (C-1)` cells of an `R x C` point grid.
    ///
    /// Cell `[r][c]` takes `points[r][c]`, `points[r][c+1]`, `points[r+1][c+1]`
    /// and `points[r+1][c]` as `v0..v3`.
    pub fn new(points: &'a [Vec<Point>]) -> Result<Self> {
        let vertex_rows = points.len();
        if vertex_rows < 2 {
            return Err(IsolineError::invalid_input(format!(
                "grid needs at least 2 rows, got {}",
                vertex_rows
            )));
        }

        let vertex_cols = points[0].len();
        if vertex_cols < 2 {
            return Err(IsolineError::invalid_input(format!(
                "grid needs at least 2 columns, got {}",
                vertex_cols
            )));
        }

        if let Some((row, ragged)) = points
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != vertex_cols)
        {
            return Err(IsolineError::invalid_input(format!(
                "row {} has {} points, expected {}",
                row,
                ragged.len(),
                vertex_cols
            )));
        }

        let rows = vertex_rows - 1;
        let cols = vertex_cols - 1;
        let mut cells = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                cells.push(Cell {
                    v0: &points[r][c],
                    v1: &points[r][c + 1],
                    v2: &points[r + 1][c + 1],
                    v3: &points[r + 1][c],
                });
            }
        }

        log::debug!(
            "[grid] Built {} cells from {}x{} points",
            cells.len(),
            vertex_rows,
            vertex_cols
        );

        Ok(Self { cells, rows, cols })
    }

    /// Number of cell rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cell columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> &Cell<'a> {
        &self.cells[row * self.cols + col]
    }

    /// Cells in row-major order with their `(row, col)` position.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &Cell<'a>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i / self.cols, i % self.cols, cell))
    }
}

/// Lifts a height map into points with `x = column`, `y = row`, `z = height`.
pub fn points_from_heights(heights: &[Vec<f64>]) -> Vec<Vec<Point>> {
    heights
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, &z)| Point::new(j as f64, i as f64, z))
                .collect()
        })
        .collect()
}
