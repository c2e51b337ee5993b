// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Point correspondences inside a flagged overlap.
//!
//! A shared point sees the other `n - 1` shared points at distances that are
//! all in the overlap's shared set, so its profile intersects that set in at
//! least `n - 1` values. The same holds for its twin on the other side, and
//! only there.

use std::collections::BTreeSet;

use crate::distance::{Distance, DistanceIndex};
use crate::overlap::SharedDistances;

/// A matched point pair: index into scanner `a` and index into scanner `b`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Correspondence {
    /// Point index on the `a` side.
    pub a: usize,
    /// Point index on the `b` side.
    pub b: usize,
}

impl Correspondence {
    /// Creates a correspondence.
    pub const fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }
}

/// Maps individual points between two overlapping scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeMatcher {
    probe_threshold: usize,
}

impl ProbeMatcher {
    /// Matcher for overlaps of `min_shared_points` points.
    pub const fn new(min_shared_points: usize) -> Self {
        Self {
            probe_threshold: min_shared_points.saturating_sub(1),
        }
    }

    /// Required profile hits for a point, lowered by the overlap's duplicate
    /// correction but never below one.
    pub fn threshold_for(&self, shared: &SharedDistances) -> usize {
        self.probe_threshold
            .saturating_sub(shared.duplicate_correction())
            .max(1)
    }

    /// Finds correspondences between scans `a` and `b`, ordered by the `a`
    /// index.
    ///
    /// A point of `a` qualifying against more than one point of `b` is
    /// ambiguous (symmetric geometry) and yields no correspondence.
    pub fn match_points(
        &self,
        a: &DistanceIndex,
        b: &DistanceIndex,
        shared: &SharedDistances,
    ) -> Vec<Correspondence> {
        let threshold = self.threshold_for(shared);
        let mut out = Vec::new();
        for (i, profile) in a.profiles().iter().enumerate() {
            let hits: BTreeSet<Distance> = profile.intersect(shared.distances());
            if hits.len() < threshold {
                continue;
            }
            let mut candidates = b
                .profiles()
                .iter()
                .enumerate()
                .filter(|(_, other)| other.count_shared(&hits) >= threshold)
                .map(|(j, _)| j);
            match (candidates.next(), candidates.next()) {
                (Some(j), None) => out.push(Correspondence::new(i, j)),
                (Some(_), Some(_)) => {
                    tracing::trace!(point = i, "ambiguous distance profile, skipped");
                }
                _ => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::overlap::OverlapDetector;
    use probe_geom::{Point3, Transform, ROTATIONS};

    #[test]
    fn recovers_permuted_points() {
        let a_pts = [
            Point3::new(0, 2, 0),
            Point3::new(4, 1, 0),
            Point3::new(3, 3, 0),
        ];
        // B sees the same points (moved rigidly) in a different order.
        let t = Transform::new(ROTATIONS[9], Point3::new(-5, 7, 11));
        let b_pts = [t.apply(&a_pts[2]), t.apply(&a_pts[0]), t.apply(&a_pts[1])];

        let a = DistanceIndex::build(&a_pts);
        let b = DistanceIndex::build(&b_pts);
        let shared = OverlapDetector::new(3)
            .compare(&a, &b)
            .expect("overlap detected");
        let matches = ProbeMatcher::new(3).match_points(&a, &b, &shared);
        assert_eq!(
            matches,
            vec![
                Correspondence::new(0, 1),
                Correspondence::new(1, 2),
                Correspondence::new(2, 0)
            ]
        );
    }

    #[test]
    fn symmetric_configuration_yields_nothing() {
        // Square: every point has the same profile.
        let square = [
            Point3::new(0, 0, 0),
            Point3::new(1, 0, 0),
            Point3::new(1, 1, 0),
            Point3::new(0, 1, 0),
        ];
        let idx = DistanceIndex::build(&square);
        let shared = OverlapDetector::new(4).compare(&idx, &idx).expect("overlap");
        assert!(ProbeMatcher::new(4).match_points(&idx, &idx, &shared).is_empty());
    }

    #[test]
    fn threshold_never_drops_to_zero() {
        let shared = SharedDistances::default();
        assert_eq!(ProbeMatcher::new(12).threshold_for(&shared), 11);
        assert_eq!(ProbeMatcher::new(1).threshold_for(&shared), 1);
    }
}
