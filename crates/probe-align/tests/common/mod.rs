// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(dead_code)]
//! Synthetic scenes with known ground truth.

use std::collections::BTreeSet;

use probe_align::{Point3, Scanner, ScannerId, Transform, ROTATIONS};

/// SplitMix64: small, seedable, deterministic.
pub struct SceneRng(u64);

impl SceneRng {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform-ish integer in `[-span, span]`.
    pub fn coord(&mut self, span: i64) -> i64 {
        let width = (2 * span + 1) as u64;
        (self.next_u64() % width) as i64 - span
    }

    pub fn point_near(&mut self, center: Point3, span: i64) -> Point3 {
        center.add(&Point3::new(
            self.coord(span),
            self.coord(span),
            self.coord(span),
        ))
    }

    pub fn rotation_index(&mut self) -> usize {
        (self.next_u64() % ROTATIONS.len() as u64) as usize
    }
}

/// `count` distinct points around `center`, none already in `taken`.
pub fn cluster(
    rng: &mut SceneRng,
    center: Point3,
    span: i64,
    count: usize,
    taken: &mut BTreeSet<Point3>,
) -> Vec<Point3> {
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let p = rng.point_near(center, span);
        if taken.insert(p) {
            out.push(p);
        }
    }
    out
}

/// A scanner's ground truth: its local→global transform and the global points
/// it observes.
pub struct TruthScanner {
    pub id: ScannerId,
    pub to_global: Transform,
    pub global_points: Vec<Point3>,
}

impl TruthScanner {
    /// The scanner as it would report: local coordinates, shuffled order.
    pub fn observe(&self, rng: &mut SceneRng) -> Scanner {
        let to_local = self.to_global.inverse();
        let mut pts: Vec<Point3> = self.global_points.iter().map(|p| to_local.apply(p)).collect();
        // Fisher–Yates so point order carries no correspondence hints.
        for i in (1..pts.len()).rev() {
            let j = (rng.next_u64() % (i as u64 + 1)) as usize;
            pts.swap(i, j);
        }
        Scanner::new(self.id, pts)
    }
}

/// A scene with known answers.
pub struct Scene {
    pub scanners: Vec<TruthScanner>,
}

impl Scene {
    pub fn observe(&self, seed: u64) -> Vec<Scanner> {
        let mut rng = SceneRng::new(seed);
        self.scanners.iter().map(|s| s.observe(&mut rng)).collect()
    }

    pub fn union(&self, ids: &[ScannerId]) -> BTreeSet<Point3> {
        self.scanners
            .iter()
            .filter(|s| ids.contains(&s.id))
            .flat_map(|s| s.global_points.iter().copied())
            .collect()
    }

    pub fn position(&self, id: ScannerId) -> Option<Point3> {
        self.scanners
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.to_global.origin())
    }

    pub fn max_manhattan(&self, ids: &[ScannerId]) -> i64 {
        let pos: Vec<Point3> = ids.iter().filter_map(|id| self.position(*id)).collect();
        let mut best = 0;
        for (i, a) in pos.iter().enumerate() {
            for b in &pos[i + 1..] {
                best = best.max(a.manhattan_distance(b));
            }
        }
        best
    }
}

/// `len` scanners in a chain along x: neighbours share `shared` points, each
/// scanner also sees `private` points nobody else sees. Scanner 0 is the
/// global frame.
pub fn chain_scene(seed: u64, len: usize, shared: usize, private: usize) -> Scene {
    let mut rng = SceneRng::new(seed);
    let mut taken = BTreeSet::new();
    const STEP: i64 = 10_000;
    const SPAN: i64 = 2_000;

    let links: Vec<Vec<Point3>> = (0..len.saturating_sub(1))
        .map(|i| {
            let center = Point3::new(STEP * i as i64 + STEP / 2, 0, 0);
            cluster(&mut rng, center, SPAN, shared, &mut taken)
        })
        .collect();

    let scanners = (0..len)
        .map(|i| {
            let center = Point3::new(STEP * i as i64, 0, 0);
            let mut global_points = cluster(&mut rng, center, SPAN, private, &mut taken);
            if i > 0 {
                global_points.extend(links[i - 1].iter().copied());
            }
            if i + 1 < len {
                global_points.extend(links[i].iter().copied());
            }
            let to_global = if i == 0 {
                Transform::identity()
            } else {
                let position = rng.point_near(center, 500);
                Transform::new(ROTATIONS[rng.rotation_index()], position)
            };
            TruthScanner {
                id: i as ScannerId,
                to_global,
                global_points,
            }
        })
        .collect();
    Scene { scanners }
}

/// Adds a scanner far from everything else, sharing no points.
pub fn with_isolated(mut scene: Scene, seed: u64, id: ScannerId, count: usize) -> Scene {
    let mut rng = SceneRng::new(seed);
    let mut taken: BTreeSet<Point3> = scene.union(
        &scene.scanners.iter().map(|s| s.id).collect::<Vec<_>>(),
    );
    let center = Point3::new(-500_000, 400_000, 90_000);
    let global_points = cluster(&mut rng, center, 2_000, count, &mut taken);
    scene.scanners.push(TruthScanner {
        id,
        to_global: Transform::new(ROTATIONS[rng.rotation_index()], center),
        global_points,
    });
    scene
}
