//! Summary statistics for traced isolines, used in debug logging and tests.

use std::collections::HashMap;
use std::fmt;

use crate::marching_squares::{IsolineCollection, Point};

/// Statistics about the isolines of one isovalue
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IsolineStats {
    pub isoline_count: usize,
    pub closed_count: usize,
    pub open_count: usize,
    pub point_count: usize,
    pub longest: usize,
}

impl IsolineStats {
    pub fn from_collection(collection: &IsolineCollection) -> Self {
        let mut stats = Self {
            isoline_count: collection.len(),
            ..Self::default()
        };

        for isoline in collection {
            if isoline.is_closed() {
                stats.closed_count += 1;
            } else {
                stats.open_count += 1;
            }
            stats.point_count += isoline.len();
            stats.longest = stats.longest.max(isoline.len());
        }

        stats
    }
}

impl fmt::Display for IsolineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "isolines={} (closed={}, open={}), points={}, longest={}",
            self.isoline_count, self.closed_count, self.open_count, self.point_count, self.longest
        )
    }
}

/// Count points that appear in more than one place across a collection.
/// The repeated endpoint of a closed isoline is not counted.
/// Returns the number of duplicated point groups found
pub fn count_duplicate_points(collection: &IsolineCollection) -> usize {
    let mut point_counts: HashMap<Point, usize> = HashMap::new();

    for isoline in collection {
        let points = isoline.points();
        let distinct = if isoline.is_closed() {
            &points[..points.len() - 1]
        } else {
            points
        };
        for point in distinct {
            *point_counts.entry(*point).or_insert(0) += 1;
        }
    }

    point_counts.values().filter(|&&count| count > 1).count()
}
