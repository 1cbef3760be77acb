//! Candidate lattice of die centers covering the wafer.
//!
//! Purpose
//! - Enumerate lattice points `(i·px, j·py)` in canonical order (i ascending,
//!   then j ascending) inside a square window that covers the effective circle.
//! - Classify points by quadrant symmetry so the engine can validate one
//!   quadrant and mirror the results.
//! - Provide the coarse distance pre-filter radius.
//!
//! Bounds
//! - `max_i = ceil(R / px) + 1`, `max_j = ceil(R / py) + 1`; the window is
//!   `[-max_i, max_i] × [-max_j, max_j]`.
//!
//! Code cross-refs: `engine::DieCalculator`.

use nalgebra::Vector2;

/// Relative slack on the pre-filter radius so floating round-off can never
/// reject a footprint that still touches the circle.
const PREFILTER_SLACK: f64 = 1e-9;

/// Number of mirror images a lattice point stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymmetryClass {
    /// `(0, 0)`.
    Origin,
    /// On exactly one axis.
    Axis,
    /// Off both axes.
    Interior,
}

impl SymmetryClass {
    pub fn of(i: i64, j: i64) -> Self {
        match (i == 0, j == 0) {
            (true, true) => Self::Origin,
            (true, false) | (false, true) => Self::Axis,
            (false, false) => Self::Interior,
        }
    }

    pub fn multiplicity(&self) -> usize {
        match self {
            Self::Origin => 1,
            Self::Axis => 2,
            Self::Interior => 4,
        }
    }
}

/// Rectangular window of lattice indices around the wafer center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lattice {
    pitch: Vector2<f64>,
    max_i: i64,
    max_j: i64,
}

impl Lattice {
    /// Window covering the circle of radius `effective_radius`. Both pitch
    /// components must be positive.
    pub fn covering(pitch: Vector2<f64>, effective_radius: f64) -> Self {
        // `as` saturates, so absurd ratios end up in the candidate ceiling.
        let max_i = (effective_radius / pitch.x).ceil() as i64;
        let max_j = (effective_radius / pitch.y).ceil() as i64;
        Self {
            pitch,
            max_i: max_i.saturating_add(1),
            max_j: max_j.saturating_add(1),
        }
    }

    pub fn pitch(&self) -> Vector2<f64> {
        self.pitch
    }

    /// `(max_i, max_j)`.
    pub fn bounds(&self) -> (i64, i64) {
        (self.max_i, self.max_j)
    }

    /// Number of lattice points in the full window (saturating).
    pub fn candidate_count(&self) -> usize {
        let nx = side_len(self.max_i);
        let ny = side_len(self.max_j);
        usize::try_from(nx.saturating_mul(ny)).unwrap_or(usize::MAX)
    }

    /// Number of points in the closed first quadrant `i, j >= 0`.
    pub fn quadrant_count(&self) -> usize {
        let nx = self.max_i.unsigned_abs().saturating_add(1);
        let ny = self.max_j.unsigned_abs().saturating_add(1);
        usize::try_from(nx.saturating_mul(ny)).unwrap_or(usize::MAX)
    }

    #[inline]
    pub fn center(&self, i: i64, j: i64) -> Vector2<f64> {
        Vector2::new(i as f64 * self.pitch.x, j as f64 * self.pitch.y)
    }

    /// All `(i, j)` in canonical order.
    pub fn indices(&self) -> impl Iterator<Item = (i64, i64)> {
        let (mi, mj) = (self.max_i, self.max_j);
        (-mi..=mi).flat_map(move |i| (-mj..=mj).map(move |j| (i, j)))
    }

    /// First-quadrant `(i, j)`, `i, j >= 0`, in canonical order.
    pub fn quadrant_indices(&self) -> impl Iterator<Item = (i64, i64)> {
        let (mi, mj) = (self.max_i, self.max_j);
        (0..=mi).flat_map(move |i| (0..=mj).map(move |j| (i, j)))
    }

    /// Row-major slot of a first-quadrant point in `quadrant_indices` order.
    #[inline]
    pub fn quadrant_slot(&self, i: i64, j: i64) -> usize {
        let (i, j) = (i.unsigned_abs() as usize, j.unsigned_abs() as usize);
        i * (self.max_j as usize + 1) + j
    }

    /// Center distance beyond which a pitch-sized footprint cannot touch the
    /// circle of radius `effective_radius`.
    pub fn prefilter_radius(&self, effective_radius: f64) -> f64 {
        let half_diagonal = 0.5 * self.pitch.norm();
        (effective_radius + half_diagonal) * (1.0 + PREFILTER_SLACK)
    }
}

fn side_len(max: i64) -> u64 {
    max.unsigned_abs().saturating_mul(2).saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn bounds_cover_the_circle_with_one_spare_ring() {
        let l = Lattice::covering(vector![1.05, 2.05], 97.0);
        assert_eq!(l.bounds(), (94, 49));
        assert_eq!(l.candidate_count(), 189 * 99);
        assert_eq!(l.quadrant_count(), 95 * 50);
    }

    #[test]
    fn canonical_order_is_i_then_j() {
        let l = Lattice::covering(vector![10.0, 10.0], 5.0);
        let idx: Vec<_> = l.indices().collect();
        assert_eq!(l.bounds(), (2, 2));
        assert_eq!(idx.len(), l.candidate_count());
        assert_eq!(idx[0], (-2, -2));
        assert_eq!(idx[1], (-2, -1));
        assert_eq!(idx[5], (-1, -2));
        assert_eq!(*idx.last().unwrap(), (2, 2));
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn quadrant_slots_are_dense_and_follow_iteration_order() {
        let l = Lattice::covering(vector![3.0, 2.0], 7.0);
        for (k, (i, j)) in l.quadrant_indices().enumerate() {
            assert_eq!(l.quadrant_slot(i, j), k);
            assert_eq!(l.quadrant_slot(-i, j), k);
            assert_eq!(l.quadrant_slot(i, -j), k);
        }
    }

    #[test]
    fn multiplicities_sum_to_the_full_window() {
        let l = Lattice::covering(vector![1.3, 0.7], 9.0);
        let total: usize = l
            .quadrant_indices()
            .map(|(i, j)| SymmetryClass::of(i, j).multiplicity())
            .sum();
        assert_eq!(total, l.candidate_count());
        assert_eq!(SymmetryClass::of(0, 0), SymmetryClass::Origin);
        assert_eq!(SymmetryClass::of(0, -3), SymmetryClass::Axis);
        assert_eq!(SymmetryClass::of(2, 5), SymmetryClass::Interior);
    }

    #[test]
    fn mirrored_centers_are_exact_negations() {
        let l = Lattice::covering(vector![1.05, 2.05], 97.0);
        for (i, j) in [(3, 7), (17, 1), (92, 48)] {
            let c = l.center(i, j);
            assert_eq!(l.center(-i, j), vector![-c.x, c.y]);
            assert_eq!(l.center(i, -j), vector![c.x, -c.y]);
        }
    }

    #[test]
    fn prefilter_radius_exceeds_radius_plus_half_diagonal() {
        let l = Lattice::covering(vector![3.0, 4.0], 10.0);
        assert!(l.prefilter_radius(10.0) >= 12.5);
        assert!(l.prefilter_radius(10.0) < 12.5 + 1e-6);
    }

    #[test]
    fn tiny_pitch_saturates_instead_of_overflowing() {
        let l = Lattice::covering(vector![1e-300, 1e-300], 150.0);
        assert_eq!(l.candidate_count(), usize::MAX);
    }
}
