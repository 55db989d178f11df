// Marching squares isolines: grid, edge interpolation, cell lookup, stitching
mod cases;
mod contour;
mod edges;
mod grid;
mod types;
pub mod validator;

pub use cases::*;
pub use contour::*;
pub use edges::*;
pub use grid::*;
pub use types::*;

use crate::diagnostics::IsolineStats;
use crate::error::Result;

/// Isoline extraction for a single isovalue over a shared grid.
///
/// All working state (edge crossings, lookup codes, per-cell segments) is
/// private to this value; only the grid is borrowed.
pub struct MarchingSquares<'g, 'a> {
    grid: &'g Grid<'a>,
    isovalue: f64,
    crossings: Option<EdgeCrossings>,
    lookup_codes: Vec<u8>,
    segments: Vec<CellSegments>,
}

impl<'g, 'a> MarchingSquares<'g, 'a> {
    pub fn new(grid: &'g Grid<'a>, isovalue: f64) -> Self {
        let cell_count = grid.rows() * grid.cols();
        Self {
            grid,
            isovalue,
            crossings: None,
            lookup_codes: Vec::with_capacity(cell_count),
            segments: Vec::with_capacity(cell_count),
        }
    }

    pub fn isovalue(&self) -> f64 {
        self.isovalue
    }

    /// Runs every stage and returns the traced isolines.
    pub fn compute_iso_lines(&mut self) -> Result<IsolineCollection> {
        self.compute_interpolation_points();
        self.compute_segments()?;
        let contours = self.compute_contours();

        let stats = IsolineStats::from_collection(&contours);
        log::debug!("[marching_squares] isovalue {}: {}", self.isovalue, stats);

        Ok(contours)
    }

    /// Interpolates the crossing on every edge that straddles the isovalue.
    pub fn compute_interpolation_points(&mut self) -> &EdgeCrossings {
        self.crossings
            .insert(EdgeCrossings::compute(self.grid, self.isovalue))
    }

    /// Classifies every cell and builds its directed segments. Computes the
    /// edge crossings first if that has not happened yet.
    pub fn compute_segments(&mut self) -> Result<()> {
        let isovalue = self.isovalue;
        let grid = self.grid;
        let crossings = self
            .crossings
            .get_or_insert_with(|| EdgeCrossings::compute(grid, isovalue));

        self.lookup_codes.clear();
        self.segments.clear();
        for (row, col, cell) in grid.cells() {
            let code = lookup_code(cell, isovalue);
            self.lookup_codes.push(code);
            self.segments.push(cell_segments(
                row,
                col,
                code,
                cell,
                &crossings.cell_crossings(row, col),
                isovalue,
            )?);
        }
        Ok(())
    }

    /// Stitches the segments built by [`compute_segments`](Self::compute_segments)
    /// into isolines, consuming them.
    pub fn compute_contours(&mut self) -> IsolineCollection {
        let segments = std::mem::take(&mut self.segments);
        let segment_count: usize = segments.iter().map(CellSegments::len).sum();
        log::trace!(
            "[marching_squares] isovalue {}: stitching {} segments",
            self.isovalue,
            segment_count
        );
        stitch_segments(segments.iter().flat_map(CellSegments::iter))
    }

    /// Per-cell lookup codes in row-major order, filled by
    /// [`compute_segments`](Self::compute_segments). Empty before that.
    pub fn lookup_codes(&self) -> &[u8] {
        &self.lookup_codes
    }

    /// Lookup code of cell `[row][col]`, or `None` outside the grid or before
    /// [`compute_segments`](Self::compute_segments) has run.
    pub fn lookup_code_at(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.grid.rows() || col >= self.grid.cols() {
            return None;
        }
        self.lookup_codes.get(row * self.grid.cols() + col).copied()
    }

    /// Per-cell segments in row-major order. Empty once contours are computed.
    pub fn segments(&self) -> &[CellSegments] {
        &self.segments
    }
}

/// Traces the isolines of one isovalue.
pub fn trace_isovalue(grid: &Grid<'_>, isovalue: f64) -> Result<IsolineCollection> {
    MarchingSquares::new(grid, isovalue).compute_iso_lines()
}
