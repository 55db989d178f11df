use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

// =====================
// ===== Point  ========
// =====================

/// A sample of the scalar field: `z = f(x, y)`.
///
/// Equality and hashing compare the raw bit patterns of all three coordinates,
/// so two points are the same key exactly when they were computed to the same
/// values. Contour stitching relies on this to join segments across cells.
#[derive(Clone, Copy, Debug)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn to_bits(self) -> [u64; 3] {
        [self.x.to_bits(), self.y.to_bits(), self.z.to_bits()]
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bits().hash(state);
    }
}

// =====================
// ===== Segment  ======
// =====================

/// Directed piece of an isoline inside one cell. Walking from `start` to
/// `end`, values below the isovalue lie to the left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

// =====================
// ===== Isolines  =====
// =====================

/// One polyline of a level set. Closed contours repeat their first point at
/// the end.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Isoline {
    points: Vec<Point>,
}

impl Isoline {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// True when the polyline has more than one point and ends where it began.
    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl From<Vec<Point>> for Isoline {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl<'a> IntoIterator for &'a Isoline {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// All isolines traced for a single isovalue, in discovery order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IsolineCollection {
    isolines: Vec<Isoline>,
}

impl IsolineCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, isoline: Isoline) {
        self.isolines.push(isoline);
    }

    pub fn get(&self, index: usize) -> Option<&Isoline> {
        self.isolines.get(index)
    }

    pub fn isolines(&self) -> &[Isoline] {
        &self.isolines
    }

    pub fn len(&self) -> usize {
        self.isolines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.isolines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Isoline> {
        self.isolines.iter()
    }

    pub fn into_isolines(self) -> Vec<Isoline> {
        self.isolines
    }
}

impl<'a> IntoIterator for &'a IsolineCollection {
    type Item = &'a Isoline;
    type IntoIter = std::slice::Iter<'a, Isoline>;

    fn into_iter(self) -> Self::IntoIter {
        self.isolines.iter()
    }
}

/// Isoline collections keyed by isovalue, iterated in the order the
/// isovalues were first requested.
///
/// Keys compare by bit pattern. Inserting an isovalue that is already present
/// replaces its collection but keeps its original position.
#[derive(Clone, Debug, Default)]
pub struct IsolineMap {
    entries: IndexMap<u64, IsolineCollection>,
}

impl IsolineMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(
        &mut self,
        isovalue: f64,
        collection: IsolineCollection,
    ) -> Option<IsolineCollection> {
        self.entries.insert(isovalue.to_bits(), collection)
    }

    pub fn get(&self, isovalue: f64) -> Option<&IsolineCollection> {
        self.entries.get(&isovalue.to_bits())
    }

    pub fn contains(&self, isovalue: f64) -> bool {
        self.entries.contains_key(&isovalue.to_bits())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn isovalues(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.keys().map(|bits| f64::from_bits(*bits))
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &IsolineCollection)> + '_ {
        self.entries
            .iter()
            .map(|(bits, collection)| (f64::from_bits(*bits), collection))
    }
}
