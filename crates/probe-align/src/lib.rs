// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! probe-align: exact multi-scanner point-cloud registration.
//!
//! Scanners report integer points in unknown local frames. Overlapping
//! scanners are found through shared squared distances, individual points are
//! paired through their distance profiles, each overlap's rigid transform is
//! recovered from the 24 axis-aligned rotations, and a breadth-first traversal
//! composes everything into the root scanner's frame.
//!
//! Every stage is integer-exact and deterministic: results do not depend on
//! map iteration order or on the worker count.
#![forbid(unsafe_code)]

/// Breadth-first frame assembly and the global frame.
pub mod assembler;
/// Registration parameters.
pub mod config;
/// Pairwise distance indices.
pub mod distance;
mod error;
/// Scoped-thread work distribution.
pub mod exec;
/// Point correspondence search.
pub mod matcher;
/// Overlap detection.
pub mod overlap;
/// End-to-end pipeline.
pub mod registrar;
/// Text scan report parsing.
pub mod report;
/// Scanners and the scanner arena.
pub mod scanner;
/// Rigid transform recovery.
pub mod solver;

pub use assembler::{FrameAssembler, FrameSummary, GlobalFrame, Hash32, OverlapGraph};
pub use config::{RegistrationConfig, CONFIG_KEY, DEFAULT_MIN_SHARED_POINTS};
pub use distance::{Distance, DistanceIndex, DistanceProfile};
pub use error::RegistrationError;
pub use matcher::{Correspondence, ProbeMatcher};
pub use overlap::{Overlap, OverlapDetector, SharedDistances};
pub use registrar::{register, DropReason, DroppedEdge, Registrar, Registration};
pub use report::{parse_scan_report, write_scan_report, ScanParseError};
pub use scanner::{IndexedScanner, Scanner, ScannerId, ScannerSet};
pub use solver::{SolveError, TransformSolver};

/// Geometry re-exports so callers need only one dependency.
pub use probe_geom::{Point3, Rotation, Transform, ROTATIONS};
