// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scanners and the id-ordered arena the pipeline works on.

use std::collections::BTreeMap;

use probe_geom::Point3;
use tracing::warn;

use crate::distance::DistanceIndex;
use crate::error::RegistrationError;
use crate::exec::parallel_map;

/// Scanner identifier as reported by the input.
pub type ScannerId = u32;

/// A scanner and the points it reported, in its own local frame.
///
/// Built once at parse time and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanner {
    id: ScannerId,
    points: Vec<Point3>,
}

impl Scanner {
    /// Creates a scanner from its id and ordered point list.
    pub fn new(id: ScannerId, points: Vec<Point3>) -> Self {
        Self { id, points }
    }

    /// Scanner id.
    pub const fn id(&self) -> ScannerId {
        self.id
    }

    /// Points in local coordinates, in report order.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Point at `index`, if present.
    pub fn point(&self, index: usize) -> Option<Point3> {
        self.points.get(index).copied()
    }

    /// Number of reported points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` when the scanner reported no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A scan with fewer than two points has no pairwise distances and can
    /// never overlap anything.
    pub fn is_malformed(&self) -> bool {
        self.points.len() < 2
    }
}

/// A scanner together with its once-built distance index.
#[derive(Debug, Clone)]
pub struct IndexedScanner {
    scanner: Scanner,
    index: DistanceIndex,
}

impl IndexedScanner {
    /// Builds the distance index for `scanner`.
    pub fn new(scanner: Scanner) -> Self {
        let index = DistanceIndex::build(scanner.points());
        Self { scanner, index }
    }

    /// The underlying scanner.
    pub const fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Scanner id.
    pub const fn id(&self) -> ScannerId {
        self.scanner.id
    }

    /// The scanner's distance index.
    pub const fn index(&self) -> &DistanceIndex {
        &self.index
    }
}

/// Arena of indexed scanners, ordered by id.
///
/// Slots are dense `usize` positions; slot order equals id order, so a pair of
/// slots `(a, b)` with `a < b` is also canonical by id.
#[derive(Debug, Clone)]
pub struct ScannerSet {
    scanners: Vec<IndexedScanner>,
    slots: BTreeMap<ScannerId, usize>,
}

impl ScannerSet {
    /// Sorts `scanners` by id and builds every distance index, using up to
    /// `workers` threads.
    ///
    /// Fails on duplicate ids and on points outside
    /// [`Point3::COORDINATE_LIMIT`]. Malformed scans are kept (they simply
    /// never overlap) and logged.
    pub fn build(mut scanners: Vec<Scanner>, workers: usize) -> Result<Self, RegistrationError> {
        scanners.sort_by_key(Scanner::id);
        if let Some(dup) = scanners.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(RegistrationError::DuplicateScannerId(dup[0].id));
        }
        for s in &scanners {
            if let Some(index) = s.points.iter().position(|p| !p.is_within_limit()) {
                return Err(RegistrationError::CoordinateOutOfRange {
                    scanner: s.id,
                    index,
                });
            }
        }
        for s in scanners.iter().filter(|s| s.is_malformed()) {
            warn!(scanner = s.id, points = s.len(), "malformed scan: fewer than 2 points");
        }
        let indices = parallel_map(&scanners, workers, |s| DistanceIndex::build(s.points()));
        let scanners: Vec<IndexedScanner> = scanners
            .into_iter()
            .zip(indices)
            .map(|(scanner, index)| IndexedScanner { scanner, index })
            .collect();
        let slots = scanners
            .iter()
            .enumerate()
            .map(|(slot, s)| (s.id(), slot))
            .collect();
        Ok(Self { scanners, slots })
    }

    /// Number of scanners.
    pub fn len(&self) -> usize {
        self.scanners.len()
    }

    /// `true` when the set holds no scanners.
    pub fn is_empty(&self) -> bool {
        self.scanners.is_empty()
    }

    /// Scanner stored at `slot`.
    pub fn get(&self, slot: usize) -> Option<&IndexedScanner> {
        self.scanners.get(slot)
    }

    /// Slot of the scanner with `id`.
    pub fn slot_of(&self, id: ScannerId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    /// Iterates scanners in id order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexedScanner> + '_ {
        self.scanners.iter()
    }

    /// All scanners as a slice, indexable by slot.
    pub fn as_slice(&self) -> &[IndexedScanner] {
        &self.scanners
    }
}
