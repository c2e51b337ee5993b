// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-scanner pairwise squared distances and per-point distance profiles.
//!
//! Squared distances are invariant under every rigid transform, so everything
//! derived here is independent of the scanner's unknown orientation.

use std::collections::{BTreeMap, BTreeSet};

use probe_geom::Point3;
use rustc_hash::FxHashMap;

/// Exact squared Euclidean distance.
pub type Distance = i64;

/// Distances from one point to every other point of the same scan, keyed by
/// distance value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistanceProfile {
    by_distance: BTreeMap<Distance, BTreeSet<usize>>,
}

impl DistanceProfile {
    fn insert(&mut self, distance: Distance, other: usize) {
        self.by_distance.entry(distance).or_default().insert(other);
    }

    /// Distinct distance values, ascending.
    pub fn distances(&self) -> impl Iterator<Item = Distance> + '_ {
        self.by_distance.keys().copied()
    }

    /// Other points of the scan at exactly `distance`.
    pub fn points_at(&self, distance: Distance) -> Option<&BTreeSet<usize>> {
        self.by_distance.get(&distance)
    }

    /// Number of distinct distance values.
    pub fn len(&self) -> usize {
        self.by_distance.len()
    }

    /// `true` for a point with no neighbours.
    pub fn is_empty(&self) -> bool {
        self.by_distance.is_empty()
    }

    /// Distance values of this profile that are also in `shared`.
    pub fn intersect(&self, shared: &BTreeSet<Distance>) -> BTreeSet<Distance> {
        self.by_distance
            .keys()
            .filter(|d| shared.contains(d))
            .copied()
            .collect()
    }

    /// Size of [`Self::intersect`] without allocating.
    pub fn count_shared(&self, shared: &BTreeSet<Distance>) -> usize {
        self.by_distance.keys().filter(|d| shared.contains(d)).count()
    }
}

/// Immutable distance index of one scan.
///
/// Holds:
/// - the squared distance of every unordered point pair (triangular storage),
/// - the multiset distance value → number of pairs at that value,
/// - one [`DistanceProfile`] per point.
#[derive(Debug, Clone, Default)]
pub struct DistanceIndex {
    point_count: usize,
    pairs: Vec<Distance>,
    counts: FxHashMap<Distance, usize>,
    profiles: Vec<DistanceProfile>,
}

impl DistanceIndex {
    /// Indexes every unordered pair of `points`.
    ///
    /// Fewer than two points yield an empty index.
    pub fn build(points: &[Point3]) -> Self {
        let n = points.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        let mut counts = FxHashMap::default();
        let mut profiles = vec![DistanceProfile::default(); n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].squared_distance(&points[j]);
                pairs.push(d);
                *counts.entry(d).or_insert(0) += 1;
                profiles[i].insert(d, j);
                profiles[j].insert(d, i);
            }
        }
        Self {
            point_count: n,
            pairs,
            counts,
            profiles,
        }
    }

    /// Number of indexed points.
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Number of indexed pairs, `n(n-1)/2`.
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// `true` when no pair was indexed (fewer than two points).
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Squared distance between points `i` and `j` (order irrelevant).
    pub fn pair_distance(&self, i: usize, j: usize) -> Option<Distance> {
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        if lo == hi || hi >= self.point_count {
            return None;
        }
        // Row `lo` starts after rows 0..lo, which hold (n-1) + (n-2) + … entries.
        let row_start = lo * (2 * self.point_count - lo - 1) / 2;
        self.pairs.get(row_start + (hi - lo - 1)).copied()
    }

    /// How many pairs sit at exactly `distance`.
    pub fn multiplicity(&self, distance: Distance) -> usize {
        self.counts.get(&distance).copied().unwrap_or(0)
    }

    /// Number of distinct distance values.
    pub fn distinct_count(&self) -> usize {
        self.counts.len()
    }

    /// Distinct distance values, unordered.
    pub fn distinct_distances(&self) -> impl Iterator<Item = Distance> + '_ {
        self.counts.keys().copied()
    }

    /// The distance multiset in canonical (ascending) order.
    pub fn multiset(&self) -> BTreeMap<Distance, usize> {
        self.counts.iter().map(|(d, c)| (*d, *c)).collect()
    }

    /// Distance profile of point `i`.
    pub fn profile(&self, i: usize) -> Option<&DistanceProfile> {
        self.profiles.get(i)
    }

    /// All profiles, indexed by point.
    pub fn profiles(&self) -> &[DistanceProfile] {
        &self.profiles
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn sample() -> Vec<Point3> {
        vec![
            Point3::new(0, 2, 0),
            Point3::new(4, 1, 0),
            Point3::new(3, 3, 0),
        ]
    }

    #[test]
    fn pair_distances_match_hand_values() {
        let idx = DistanceIndex::build(&sample());
        assert_eq!(idx.pair_count(), 3);
        assert_eq!(idx.pair_distance(0, 1), Some(17));
        assert_eq!(idx.pair_distance(1, 0), Some(17));
        assert_eq!(idx.pair_distance(0, 2), Some(10));
        assert_eq!(idx.pair_distance(1, 2), Some(5));
        assert_eq!(idx.pair_distance(1, 1), None);
        assert_eq!(idx.pair_distance(0, 3), None);
    }

    #[test]
    fn triangular_lookup_covers_every_pair() {
        let pts: Vec<Point3> = (0..7).map(|i| Point3::new(i * i, 3 * i, -i)).collect();
        let idx = DistanceIndex::build(&pts);
        for i in 0..pts.len() {
            for j in 0..pts.len() {
                let expected = (i != j).then(|| pts[i].squared_distance(&pts[j]));
                assert_eq!(idx.pair_distance(i, j), expected, "({i},{j})");
            }
        }
    }

    #[test]
    fn profiles_are_reverse_maps() {
        let idx = DistanceIndex::build(&sample());
        let p0 = idx.profile(0).expect("point 0 profile");
        assert_eq!(p0.distances().collect::<Vec<_>>(), vec![10, 17]);
        assert_eq!(p0.points_at(17), Some(&BTreeSet::from([1])));
        assert_eq!(p0.points_at(5), None);
    }

    #[test]
    fn repeated_distances_are_counted() {
        // Unit square: four sides of 1 and two diagonals of 2.
        let pts = [
            Point3::new(0, 0, 0),
            Point3::new(1, 0, 0),
            Point3::new(1, 1, 0),
            Point3::new(0, 1, 0),
        ];
        let idx = DistanceIndex::build(&pts);
        assert_eq!(idx.multiplicity(1), 4);
        assert_eq!(idx.multiplicity(2), 2);
        assert_eq!(idx.multiplicity(3), 0);
        assert_eq!(idx.distinct_count(), 2);
        assert_eq!(
            idx.profile(0).and_then(|p| p.points_at(1)),
            Some(&BTreeSet::from([1, 3]))
        );
    }

    #[test]
    fn fewer_than_two_points_is_empty() {
        assert!(DistanceIndex::build(&[]).is_empty());
        let one = DistanceIndex::build(&[Point3::new(1, 2, 3)]);
        assert!(one.is_empty());
        assert_eq!(one.point_count(), 1);
        assert!(one.profile(0).is_some_and(DistanceProfile::is_empty));
    }
}
