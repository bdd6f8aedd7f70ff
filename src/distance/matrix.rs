//! Dense in-memory distance/duration/cost matrix.

use super::DistanceMatrixProvider;

/// A dense n×n matrix of `(distance, duration, cost)` triples, stored
/// row-major, one `Vec<f64>` for distance/cost and a `Vec<i64>` for duration.
///
/// # Examples
///
/// ```
/// use routecraft::distance::DenseMatrix;
///
/// let coords = vec![(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)];
/// let dm = DenseMatrix::from_coordinates(&coords, 1.0);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DenseMatrix {
    size: usize,
    distance: Vec<f64>,
    duration: Vec<i64>,
    cost: Vec<f64>,
}

impl DenseMatrix {
    /// Creates a matrix of the given size with all entries zero.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            distance: vec![0.0; size * size],
            duration: vec![0; size * size],
            cost: vec![0.0; size * size],
        }
    }

    /// Builds a Euclidean distance matrix from 2D coordinates.
    ///
    /// `duration` is set equal to `distance` (unit speed) and `cost` is
    /// `distance * cost_per_unit`.
    pub fn from_coordinates(coords: &[(f64, f64)], cost_per_unit: f64) -> Self {
        let n = coords.len();
        let mut m = Self::new(n);
        for i in 0..n {
            for j in 0..n {
                let (xi, yi) = coords[i];
                let (xj, yj) = coords[j];
                let d = ((xi - xj).powi(2) + (yi - yj).powi(2)).sqrt();
                m.set(i, j, d, d.round() as i64, d * cost_per_unit);
            }
        }
        m
    }

    /// Creates a matrix from explicit n×n grids.
    ///
    /// Returns `None` if any grid's length doesn't match `size * size`.
    pub fn from_grids(size: usize, distance: Vec<f64>, duration: Vec<i64>, cost: Vec<f64>) -> Option<Self> {
        if distance.len() != size * size || duration.len() != size * size || cost.len() != size * size {
            return None;
        }
        Some(Self { size, distance, duration, cost })
    }

    /// Sets the `(distance, duration, cost)` triple for an ordered pair.
    pub fn set(&mut self, from: usize, to: usize, distance: f64, duration: i64, cost: f64) {
        let idx = from * self.size + to;
        self.distance[idx] = distance;
        self.duration[idx] = duration;
        self.cost[idx] = cost;
    }
}

impl DistanceMatrixProvider for DenseMatrix {
    fn size(&self) -> usize {
        self.size
    }

    fn distance(&self, from: usize, to: usize) -> f64 {
        self.distance[from * self.size + to]
    }

    fn duration(&self, from: usize, to: usize) -> i64 {
        self.duration[from * self.size + to]
    }

    fn cost(&self, from: usize, to: usize) -> f64 {
        self.cost[from * self.size + to]
    }
}
