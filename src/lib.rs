pub mod config;
pub mod diagnostics;
pub mod error;
pub mod isoline_worker;
pub mod marching_squares;
pub mod noise_field;

use std::sync::Arc;

pub use config::WorkerConfig;
pub use error::{IsolineError, Result};
pub use isoline_worker::IsolineWorkerPool;
pub use marching_squares::{
    points_from_heights, trace_isovalue, Grid, Isoline, IsolineCollection, IsolineMap,
    MarchingSquares, Point, Segment,
};
pub use noise_field::NoiseField;

/// Traces the isolines of every isovalue over one shared grid, one isovalue
/// after another. Duplicate isovalues collapse to a single entry.
pub fn compute_iso_lines(points: &[Vec<Point>], isovalues: &[f64]) -> Result<IsolineMap> {
    let grid = Grid::new(points)?;
    let mut iso_lines = IsolineMap::with_capacity(isovalues.len());
    for &isovalue in isovalues {
        iso_lines.insert(isovalue, trace_isovalue(&grid, isovalue)?);
    }

    log::debug!(
        "[compute_iso_lines] {} isovalues over {}x{} cells",
        isovalues.len(),
        grid.rows(),
        grid.cols()
    );
    Ok(iso_lines)
}

/// Same contract as [`compute_iso_lines`], with isovalues traced concurrently
/// on a worker pool sized by [`WorkerConfig::default`].
pub fn parallel_compute_iso_lines(points: &[Vec<Point>], isovalues: &[f64]) -> Result<IsolineMap> {
    parallel_compute_iso_lines_with(points, isovalues, &WorkerConfig::default())
}

/// Builds a worker pool from `config` for this call and drops it afterwards.
/// Starting the pool's threads costs more than tracing a small grid; callers
/// tracing many grids should keep an [`IsolineWorkerPool`] and use
/// [`parallel_compute_iso_lines_on`].
pub fn parallel_compute_iso_lines_with(
    points: &[Vec<Point>],
    isovalues: &[f64],
    config: &WorkerConfig,
) -> Result<IsolineMap> {
    let grid = Grid::new(points)?;
    let mut pool = IsolineWorkerPool::new(config)?;
    trace_on_pool(&mut pool, grid, isovalues)
}

/// Same contract as [`compute_iso_lines`], traced on an existing pool.
pub fn parallel_compute_iso_lines_on(
    pool: &mut IsolineWorkerPool,
    points: &[Vec<Point>],
    isovalues: &[f64],
) -> Result<IsolineMap> {
    let grid = Grid::new(points)?;
    trace_on_pool(pool, grid, isovalues)
}

fn trace_on_pool(
    pool: &mut IsolineWorkerPool,
    grid: Grid<'_>,
    isovalues: &[f64],
) -> Result<IsolineMap> {
    let iso_lines = pool.compute_iso_lines(Arc::new(grid), isovalues)?;

    log::debug!(
        "[parallel_compute_iso_lines] {} isovalues on {} threads",
        isovalues.len(),
        pool.thread_count()
    );
    Ok(iso_lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn volcano() -> Vec<Vec<Point>> {
        points_from_heights(&[
            vec![1.0, 1.0, 1.0, 1.0, 1.0],
            vec![1.0, 2.0, 3.0, 2.0, 1.0],
            vec![1.0, 3.0, 3.0, 3.0, 1.0],
            vec![1.0, 2.0, 3.0, 2.0, 1.0],
            vec![1.0, 1.0, 1.0, 1.0, 1.0],
        ])
    }

    fn assert_isoline(isoline: &Isoline, expected: &[(f64, f64)]) {
        assert_eq!(isoline.len(), expected.len(), "isoline {:?}", isoline);
        for (point, &(x, y)) in isoline.iter().zip(expected) {
            assert_relative_eq!(point.x, x, epsilon = 1e-12);
            assert_relative_eq!(point.y, y, epsilon = 1e-12);
        }
    }

    fn saddle(isovalue: f64, heights: [[f64; 2]; 2]) -> IsolineCollection {
        let points = points_from_heights(&[heights[0].to_vec(), heights[1].to_vec()]);
        let iso_lines = compute_iso_lines(&points, &[isovalue]).unwrap();
        iso_lines.get(isovalue).cloned().unwrap()
    }

    #[test]
    fn test_volcano() {
        let iso_lines = compute_iso_lines(&volcano(), &[1.1]).unwrap();
        let collection = iso_lines.get(1.1).unwrap();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.isolines()[0].len(), 13);
        assert!(collection.isolines()[0].is_closed());
    }

    #[test]
    fn test_binary_field() {
        let heights = vec![
            vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            vec![0.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 1.0, 1.0, 0.0],
            vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0],
            vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0],
        ];
        let iso_lines = compute_iso_lines(&points_from_heights(&heights), &[0.5]).unwrap();
        let collection = iso_lines.get(0.5).unwrap();

        assert_eq!(collection.len(), 5);
        let mut sizes: Vec<usize> = collection.iter().map(Isoline::len).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![3, 7, 8, 8, 13]);
        assert!(collection.iter().all(|isoline| !isoline.is_closed()));
    }

    #[test]
    fn test_saddle_5() {
        let heights = [[1.0, 0.0], [0.0, 1.0]];

        let high = saddle(0.7, heights);
        assert_eq!(high.len(), 2);
        assert_isoline(&high.isolines()[0], &[(0.0, 0.3), (0.3, 0.0)]);
        assert_isoline(&high.isolines()[1], &[(1.0, 0.7), (0.7, 1.0)]);

        let low = saddle(0.3, heights);
        assert_eq!(low.len(), 2);
        assert_isoline(&low.isolines()[0], &[(0.0, 0.7), (0.3, 1.0)]);
        assert_isoline(&low.isolines()[1], &[(1.0, 0.3), (0.7, 0.0)]);
    }

    #[test]
    fn test_saddle_10() {
        let heights = [[0.0, 1.0], [1.0, 0.0]];

        let high = saddle(0.7, heights);
        assert_eq!(high.len(), 2);
        assert_isoline(&high.isolines()[0], &[(0.3, 1.0), (0.0, 0.7)]);
        assert_isoline(&high.isolines()[1], &[(0.7, 0.0), (1.0, 0.3)]);

        let low = saddle(0.3, heights);
        assert_eq!(low.len(), 2);
        assert_isoline(&low.isolines()[0], &[(0.3, 0.0), (0.0, 0.3)]);
        assert_isoline(&low.isolines()[1], &[(0.7, 1.0), (1.0, 0.7)]);
    }

    #[test]
    fn test_duplicate_isovalues_collapse() {
        let iso_lines = compute_iso_lines(&volcano(), &[1.1, 2.5, 1.1]).unwrap();
        assert_eq!(iso_lines.len(), 2);
        assert_eq!(iso_lines.isovalues().collect::<Vec<_>>(), vec![1.1, 2.5]);
    }

    #[test]
    fn test_invalid_input_aborts_both_modes() {
        let ragged = vec![
            vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 1.0)],
            vec![Point::new(0.0, 1.0, 1.0)],
        ];
        assert!(matches!(
            compute_iso_lines(&ragged, &[0.5]),
            Err(IsolineError::InvalidInput { .. })
        ));
        assert!(matches!(
            parallel_compute_iso_lines(&ragged, &[0.5]),
            Err(IsolineError::InvalidInput { .. })
        ));

        let single_row = points_from_heights(&[vec![0.0, 1.0, 2.0]]);
        assert!(compute_iso_lines(&single_row, &[0.5]).is_err());
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let field = NoiseField::new(42, 4, 0.07, 1.0);
        let points = field.sample_grid(48, 40, 1.0);
        let isovalues = [0.35, -0.2, 0.05, 0.1, -0.45, 0.2, -0.05];

        let sequential = compute_iso_lines(&points, &isovalues).unwrap();
        let config = WorkerConfig::default().with_threads(4).with_batch_size(3);
        let parallel = parallel_compute_iso_lines_with(&points, &isovalues, &config).unwrap();

        assert_eq!(sequential.len(), isovalues.len());
        assert_eq!(
            parallel.isovalues().collect::<Vec<_>>(),
            isovalues.to_vec(),
            "Parallel results should keep caller order"
        );
        for ((seq_iso, seq), (par_iso, par)) in sequential.iter().zip(parallel.iter()) {
            assert_eq!(seq_iso, par_iso);
            assert_eq!(seq, par, "isovalue {} differs between modes", seq_iso);
        }
    }

    #[test]
    fn test_parallel_on_reused_pool() {
        let mut pool = IsolineWorkerPool::new(&WorkerConfig::new(2, 4)).unwrap();

        let volcano_lines = parallel_compute_iso_lines_on(&mut pool, &volcano(), &[1.1]).unwrap();
        assert_eq!(volcano_lines.get(1.1).unwrap().isolines()[0].len(), 13);

        let field = NoiseField::new(7, 3, 0.1, 1.0).sample_grid(20, 20, 1.0);
        let isovalues = [-0.2, 0.15];
        let reused = parallel_compute_iso_lines_on(&mut pool, &field, &isovalues).unwrap();
        let sequential = compute_iso_lines(&field, &isovalues).unwrap();
        for ((_, a), (_, b)) in reused.iter().zip(sequential.iter()) {
            assert_eq!(a, b, "Reused pool should match sequential tracing");
        }

        let ragged = vec![vec![Point::new(0.0, 0.0, 0.0)]];
        assert!(parallel_compute_iso_lines_on(&mut pool, &ragged, &[0.5]).is_err());
    }

    #[test]
    fn test_parallel_default_pool() {
        let iso_lines = parallel_compute_iso_lines(&volcano(), &[1.1, 2.5]).unwrap();
        assert_eq!(iso_lines.get(1.1).unwrap().isolines()[0].len(), 13);
        assert_eq!(iso_lines.get(2.5).unwrap().isolines()[0].len(), 13);
    }
}
