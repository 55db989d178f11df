//! Errors raised while building grids and tracing isolines.

use thiserror::Error;

use crate::marching_squares::CellEdge;

/// Crate result type
pub type Result<T> = std::result::Result<T, IsolineError>;

#[derive(Debug, Error)]
pub enum IsolineError {
    /// The point grid is too small or not rectangular.
    #[error("invalid input grid: {reason}")]
    InvalidInput { reason: String },

    /// A classification code outside 0..=15 reached the lookup table.
    #[error("invalid lookup code: {0}")]
    InvalidLookupCode(u8),

    /// The lookup table referenced an edge that has no interpolated crossing.
    #[error("cell ({row}, {col}) has no crossing on its {edge:?} edge")]
    MissingEdgeCrossing {
        row: usize,
        col: usize,
        edge: CellEdge,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The result channel closed before every isovalue reported back.
    #[error("worker result channel disconnected")]
    WorkerDisconnected,
}

impl IsolineError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = IsolineError::invalid_input("grid needs at least 2 rows, got 1");
        assert_eq!(
            err.to_string(),
            "invalid input grid: grid needs at least 2 rows, got 1"
        );

        let err = IsolineError::InvalidLookupCode(16);
        assert_eq!(err.to_string(), "invalid lookup code: 16");

        let err = IsolineError::MissingEdgeCrossing {
            row: 2,
            col: 3,
            edge: CellEdge::Top,
        };
        assert_eq!(err.to_string(), "cell (2, 3) has no crossing on its Top edge");
    }
}
