//! Bounded dynamic time warping over 3-D sequences.

use ndarray::{Array2, s};
use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Point distance used by the warping recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMeasure {
    #[default]
    Euclidean,
    SquaredEuclidean,
    Manhattan,
}

impl DistanceMeasure {
    #[inline]
    pub fn distance(&self, a: &Vec3, b: &Vec3) -> f32 {
        let d = a - b;
        match self {
            Self::Euclidean => d.norm(),
            Self::SquaredEuclidean => d.norm_squared(),
            Self::Manhattan => d.abs().sum(),
        }
    }
}

/// DTW with a Sakoe-Chiba band and a reusable cost buffer.
///
/// The band half width (`warp`) is half the training length. The buffer is
/// sized `train_len x (train_len + warp)` up front and only grows if a
/// longer pair is ever passed in.
#[derive(Debug, Clone)]
pub struct Dtw {
    cost: Array2<f32>,
    warp: usize,
}

impl Dtw {
    pub fn new(train_len: usize) -> Self {
        let warp = train_len / 2;
        let rows = train_len.max(1);
        Self {
            cost: Array2::from_elem((rows, rows + warp), f32::INFINITY),
            warp,
        }
    }

    /// Maximum index offset between aligned samples.
    pub fn warp(&self) -> usize {
        self.warp
    }

    /// Warping cost of `test` against `train`, divided by the training length.
    ///
    /// Infinite when either sequence is empty or the end cell lies outside
    /// the band.
    pub fn distance(&mut self, train: &[Vec3], test: &[Vec3], measure: DistanceMeasure) -> f32 {
        let (n, m) = (train.len(), test.len());
        if n == 0 || m == 0 {
            return f32::INFINITY;
        }
        let (rows, cols) = self.cost.dim();
        if rows < n || cols < m {
            self.cost = Array2::from_elem((rows.max(n), cols.max(m)), f32::INFINITY);
        } else {
            self.cost.slice_mut(s![..n, ..m]).fill(f32::INFINITY);
        }

        let warp = self.warp;
        let cost = &mut self.cost;
        cost[[0, 0]] = measure.distance(&train[0], &test[0]);
        for i in 1..n.min(warp + 1) {
            cost[[i, 0]] = cost[[i - 1, 0]] + measure.distance(&train[i], &test[0]);
        }
        for j in 1..m.min(warp + 1) {
            cost[[0, j]] = cost[[0, j - 1]] + measure.distance(&train[0], &test[j]);
        }

        for i in 1..n {
            let lo = i.saturating_sub(warp).max(1);
            let hi = (i + warp + 1).min(m);
            for j in lo..hi {
                let best = cost[[i - 1, j]].min(cost[[i, j - 1]]).min(cost[[i - 1, j - 1]]);
                if best.is_finite() {
                    cost[[i, j]] = measure.distance(&train[i], &test[j]) + best;
                }
            }
        }

        cost[[n - 1, m - 1]] / n as f32
    }
}
