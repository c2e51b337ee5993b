// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Errors that abort a registration run.
//!
//! Detection-layer weaknesses (malformed scans, ambiguous overlaps,
//! disconnected graphs) are not errors: they are filtered or reported in the
//! result. Only invariant violations and unusable inputs surface here.

use thiserror::Error;

use crate::scanner::ScannerId;
use crate::solver::SolveError;

/// Registration failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Two scanners share an id.
    #[error("duplicate scanner id: {0}")]
    DuplicateScannerId(ScannerId),
    /// The configured root scanner is not in the input.
    #[error("root scanner {0} not present in input")]
    UnknownRoot(ScannerId),
    /// A point lies outside `±Point3::COORDINATE_LIMIT`, where squared
    /// distances could overflow.
    #[error("scanner {scanner} point {index} is out of coordinate range")]
    CoordinateOutOfRange {
        /// Scanner reporting the point.
        scanner: ScannerId,
        /// Index of the point within the scanner.
        index: usize,
    },
    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Matched points admit no rigid transform: the matcher produced an
    /// inconsistent correspondence set.
    #[error("transform inconsistent for overlap ({a}, {b}): {source}")]
    TransformInconsistent {
        /// First scanner of the overlap.
        a: ScannerId,
        /// Second scanner of the overlap.
        b: ScannerId,
        /// Solver diagnosis.
        source: SolveError,
    },
}
