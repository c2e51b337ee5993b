// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Synthetic scan workloads shared by the benchmarks.
#![forbid(unsafe_code)]

use std::collections::BTreeSet;

use probe_align::{Point3, Scanner, ScannerId, Transform, ROTATIONS};

/// SplitMix64 step; deterministic across platforms.
fn next(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn coord(state: &mut u64, span: i64) -> i64 {
    let width = (2 * span + 1).unsigned_abs();
    i64::try_from(next(state) % width).unwrap_or(0) - span
}

fn point_near(state: &mut u64, center: Point3, span: i64) -> Point3 {
    center.add(&Point3::new(
        coord(state, span),
        coord(state, span),
        coord(state, span),
    ))
}

/// `count` distinct points within `span` of `center`.
pub fn cloud(seed: u64, center: Point3, span: i64, count: usize) -> Vec<Point3> {
    let mut state = seed;
    let mut seen = BTreeSet::new();
    while seen.len() < count {
        seen.insert(point_near(&mut state, center, span));
    }
    seen.into_iter().collect()
}

/// `len` scanners along x; neighbours share `shared` points, each also sees
/// `private` points of its own. Every scanner but 0 is rotated and moved.
pub fn chain(seed: u64, len: usize, shared: usize, private: usize) -> Vec<Scanner> {
    let mut state = seed;
    let step = 10_000_i64;
    let links: Vec<Vec<Point3>> = (0..len.saturating_sub(1))
        .map(|i| {
            let x = step * i64::try_from(i).unwrap_or(0) + step / 2;
            cloud(next(&mut state), Point3::new(x, 0, 0), 2_000, shared)
        })
        .collect();

    (0..len)
        .map(|i| {
            let x = step * i64::try_from(i).unwrap_or(0);
            let mut pts = cloud(next(&mut state), Point3::new(x, 0, 0), 2_000, private);
            if i > 0 {
                pts.extend(links[i - 1].iter().copied());
            }
            if i + 1 < len {
                pts.extend(links[i].iter().copied());
            }
            let to_local = if i == 0 {
                Transform::identity()
            } else {
                let r = usize::try_from(next(&mut state) % 24).unwrap_or(0);
                Transform::new(ROTATIONS[r], point_near(&mut state, Point3::new(x, 0, 0), 500))
                    .inverse()
            };
            let id = ScannerId::try_from(i).unwrap_or(ScannerId::MAX);
            Scanner::new(id, pts.iter().map(|p| to_local.apply(p)).collect())
        })
        .collect()
}
