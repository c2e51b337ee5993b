// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Property tests: distance indices are invariant under point order and rigid motion.
#![allow(clippy::expect_used)]

use probe_align::{DistanceIndex, OverlapDetector, Point3, Transform, ROTATIONS};
use proptest::prelude::*;

fn points(max: usize) -> impl Strategy<Value = Vec<Point3>> {
    prop::collection::vec((-500i64..=500, -500i64..=500, -500i64..=500), 2..max)
        .prop_map(|v| v.into_iter().map(Point3::from).collect())
}

fn transform() -> impl Strategy<Value = Transform> {
    (0usize..24, -2_000i64..=2_000, -2_000i64..=2_000, -2_000i64..=2_000)
        .prop_map(|(r, x, y, z)| Transform::new(ROTATIONS[r], Point3::new(x, y, z)))
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, ..ProptestConfig::default() })]

    #[test]
    fn multiset_ignores_point_order(pts in points(24).prop_shuffle()) {
        let mut sorted = pts.clone();
        sorted.sort();
        prop_assert_eq!(DistanceIndex::build(&pts).multiset(), DistanceIndex::build(&sorted).multiset());
    }

    #[test]
    fn multiset_survives_rigid_motion(pts in points(24), t in transform()) {
        let moved: Vec<Point3> = pts.iter().map(|p| t.apply(p)).collect();
        let a = DistanceIndex::build(&pts);
        let b = DistanceIndex::build(&moved);
        prop_assert_eq!(a.multiset(), b.multiset());
        for i in 0..pts.len() {
            prop_assert_eq!(a.profile(i), b.profile(i));
        }
    }

    #[test]
    fn pair_distance_is_symmetric_and_counted_once(pts in points(16)) {
        let idx = DistanceIndex::build(&pts);
        let n = pts.len();
        prop_assert_eq!(idx.pair_count(), n * (n - 1) / 2);
        prop_assert_eq!(idx.multiset().values().sum::<usize>(), idx.pair_count());
        for i in 0..n {
            prop_assert_eq!(idx.pair_distance(i, i), None);
            for j in (i + 1)..n {
                let d = pts[i].squared_distance(&pts[j]);
                prop_assert_eq!(idx.pair_distance(i, j), Some(d));
                prop_assert_eq!(idx.pair_distance(j, i), Some(d));
            }
        }
    }

    #[test]
    fn moved_copy_always_overlaps(pts in points(14), t in transform()) {
        let n = pts.len();
        let moved: Vec<Point3> = pts.iter().rev().map(|p| t.apply(p)).collect();
        let detector = OverlapDetector::new(n);
        let shared = detector.compare(&DistanceIndex::build(&pts), &DistanceIndex::build(&moved));
        prop_assert!(shared.is_some());
    }
}
