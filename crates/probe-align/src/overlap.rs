// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Candidate overlaps between scanner pairs via distance-multiset intersection.
//!
//! Determinism contract:
//! - Pair identity is canonicalized as `(min_id, max_id)`.
//! - The emitted overlap list is sorted by that tuple, whatever the worker count.
//!
//! `n` shared points produce exactly `n(n-1)/2` shared pair distances, so a
//! scanner pair sharing `min_shared_points` points must share at least that
//! many distance values. Repeated values collapse in the intersection and are
//! compensated by the duplicate correction (an approximation; heavily
//! repetitive inputs can still be missed).

use std::collections::BTreeSet;

use probe_geom::Transform;
use tracing::{debug, info, instrument};

use crate::distance::{Distance, DistanceIndex};
use crate::exec::parallel_map;
use crate::matcher::Correspondence;
use crate::scanner::{ScannerId, ScannerSet};

/// Distance values two scanners have in common.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedDistances {
    distances: BTreeSet<Distance>,
    duplicate_correction: usize,
    shared_count: usize,
}

impl SharedDistances {
    /// Common distance values, ascending.
    pub fn distances(&self) -> &BTreeSet<Distance> {
        &self.distances
    }

    /// Extra recurrences of distance values repeated in both scans.
    ///
    /// Zero unless the plain intersection fell short of the threshold.
    pub fn duplicate_correction(&self) -> usize {
        self.duplicate_correction
    }

    /// Intersection size plus the duplicate correction.
    pub fn shared_count(&self) -> usize {
        self.shared_count
    }
}

/// A scanner pair flagged as overlapping, filled progressively:
/// shared distances → correspondences → transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    a: ScannerId,
    b: ScannerId,
    a_slot: usize,
    b_slot: usize,
    shared: SharedDistances,
    correspondences: Vec<Correspondence>,
    transform: Option<Transform>,
}

impl Overlap {
    /// Canonical `(a, b)` ids with `a < b`.
    pub const fn ids(&self) -> (ScannerId, ScannerId) {
        (self.a, self.b)
    }

    /// Arena slots of `(a, b)`.
    pub const fn slots(&self) -> (usize, usize) {
        (self.a_slot, self.b_slot)
    }

    /// Shared distance values.
    pub const fn shared(&self) -> &SharedDistances {
        &self.shared
    }

    /// Matched point pairs (`a`-side index, `b`-side index).
    pub fn correspondences(&self) -> &[Correspondence] {
        &self.correspondences
    }

    /// Transform from `b`'s local frame into `a`'s local frame, once resolved.
    pub const fn transform(&self) -> Option<Transform> {
        self.transform
    }

    /// `true` once a transform has been recorded.
    pub const fn is_resolved(&self) -> bool {
        self.transform.is_some()
    }

    pub(crate) fn record_correspondences(&mut self, correspondences: Vec<Correspondence>) {
        self.correspondences = correspondences;
    }

    pub(crate) fn record_transform(&mut self, transform: Transform) {
        self.transform = Some(transform);
    }
}

/// Pairwise scanner comparison by shared distance values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapDetector {
    min_shared_points: usize,
}

impl OverlapDetector {
    /// Detector requiring `min_shared_points` common points per overlap.
    pub const fn new(min_shared_points: usize) -> Self {
        Self { min_shared_points }
    }

    /// Required common points.
    pub const fn min_shared_points(&self) -> usize {
        self.min_shared_points
    }

    /// `n(n-1)/2` for `n = min_shared_points`.
    pub const fn required_pair_distances(&self) -> usize {
        self.min_shared_points * self.min_shared_points.saturating_sub(1) / 2
    }

    /// Distances each shared point has to the other shared points, `n - 1`.
    pub const fn probe_threshold(&self) -> usize {
        self.min_shared_points.saturating_sub(1)
    }

    /// Intersects the distance multisets of two scans.
    pub fn shared_distances(&self, a: &DistanceIndex, b: &DistanceIndex) -> SharedDistances {
        let (small, large) = if a.distinct_count() <= b.distinct_count() {
            (a, b)
        } else {
            (b, a)
        };
        let distances: BTreeSet<Distance> = small
            .distinct_distances()
            .filter(|d| large.multiplicity(*d) > 0)
            .collect();

        let mut shared_count = distances.len();
        let mut duplicate_correction = 0;
        if shared_count < self.required_pair_distances() {
            duplicate_correction = distances
                .iter()
                .map(|d| (a.multiplicity(*d), b.multiplicity(*d)))
                .filter(|(ca, cb)| *ca > 1 && *cb > 1)
                .map(|(ca, cb)| ca.min(cb) - 1)
                .sum();
            shared_count += (0..duplicate_correction)
                .map(|k| self.probe_threshold().saturating_sub(k))
                .sum::<usize>();
        }

        SharedDistances {
            distances,
            duplicate_correction,
            shared_count,
        }
    }

    /// Compares two scans; `Some` when they meet the overlap threshold.
    pub fn compare(&self, a: &DistanceIndex, b: &DistanceIndex) -> Option<SharedDistances> {
        if a.is_empty() || b.is_empty() {
            return None;
        }
        let shared = self.shared_distances(a, b);
        (shared.shared_count >= self.required_pair_distances()).then_some(shared)
    }

    /// Compares every unordered scanner pair using up to `workers` threads.
    #[instrument(skip(self, scanners), fields(scanners = scanners.len()))]
    pub fn detect(&self, scanners: &ScannerSet, workers: usize) -> Vec<Overlap> {
        let n = scanners.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|a| ((a + 1)..n).map(move |b| (a, b)))
            .collect();
        let all = scanners.as_slice();

        let overlaps: Vec<Overlap> = parallel_map(&pairs, workers, |&(a_slot, b_slot)| {
            let (a, b) = (&all[a_slot], &all[b_slot]);
            let shared = self.compare(a.index(), b.index())?;
            debug!(
                a = a.id(),
                b = b.id(),
                shared = shared.shared_count,
                correction = shared.duplicate_correction,
                "candidate overlap"
            );
            Some(Overlap {
                a: a.id(),
                b: b.id(),
                a_slot,
                b_slot,
                shared,
                correspondences: Vec::new(),
                transform: None,
            })
        })
        .into_iter()
        .flatten()
        .collect();

        info!(
            pairs = pairs.len(),
            overlaps = overlaps.len(),
            "overlap detection complete"
        );
        overlaps
    }
}
