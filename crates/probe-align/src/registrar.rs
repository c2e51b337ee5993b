// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The registration pipeline: index → detect → match → solve → assemble.

use probe_geom::{Rotation, Transform};
use tracing::{debug, info, instrument, warn};

use crate::assembler::{FrameAssembler, FrameSummary, GlobalFrame, OverlapGraph};
use crate::config::RegistrationConfig;
use crate::error::RegistrationError;
use crate::exec::parallel_map;
use crate::matcher::{Correspondence, ProbeMatcher};
use crate::overlap::{Overlap, OverlapDetector};
use crate::scanner::{Scanner, ScannerId, ScannerSet};
use crate::solver::{SolveError, TransformSolver};

/// Why a detected overlap did not become a graph edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Fewer than two correspondences were found.
    TooFewCorrespondences {
        /// Number found.
        found: usize,
    },
    /// Several rotations fit the correspondences.
    Underdetermined {
        /// Number of fitting rotations.
        candidates: usize,
    },
}

/// An overlap edge removed from the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedEdge {
    /// First scanner.
    pub a: ScannerId,
    /// Second scanner.
    pub b: ScannerId,
    /// Why it was dropped.
    pub reason: DropReason,
}

/// Result of a registration run.
#[derive(Debug, Clone)]
pub struct Registration {
    frame: GlobalFrame,
    overlaps: Vec<Overlap>,
    dropped: Vec<DroppedEdge>,
    malformed: Vec<ScannerId>,
}

impl Registration {
    /// The assembled global frame.
    pub const fn frame(&self) -> &GlobalFrame {
        &self.frame
    }

    /// Every detected overlap, resolved or not, in canonical order.
    pub fn overlaps(&self) -> &[Overlap] {
        &self.overlaps
    }

    /// Overlaps that did not yield an edge.
    pub fn dropped(&self) -> &[DroppedEdge] {
        &self.dropped
    }

    /// Scanners with fewer than two points.
    pub fn malformed(&self) -> &[ScannerId] {
        &self.malformed
    }

    /// The output metrics.
    pub fn summary(&self) -> FrameSummary {
        self.frame.summary()
    }

    /// Consumes the result, keeping only the frame.
    pub fn into_frame(self) -> GlobalFrame {
        self.frame
    }
}

enum EdgeOutcome {
    Resolved(Vec<Correspondence>, Transform),
    Dropped(Vec<Correspondence>, DropReason),
    Inconsistent(SolveError),
}

/// Runs the full pipeline under one [`RegistrationConfig`].
#[derive(Debug, Clone)]
pub struct Registrar {
    config: RegistrationConfig,
}

impl Registrar {
    /// Validates `config` and builds a registrar.
    pub fn new(config: RegistrationConfig) -> Result<Self, RegistrationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub const fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    /// Registers `scanners` into the root scanner's frame.
    ///
    /// Ambiguous overlaps are dropped and unreachable scanners reported as
    /// unplaced; an inconsistent correspondence set aborts the run.
    #[instrument(skip_all, fields(scanners = scanners.len(), root = self.config.root_scanner))]
    pub fn register(&self, scanners: Vec<Scanner>) -> Result<Registration, RegistrationError> {
        let cfg = &self.config;
        let set = ScannerSet::build(scanners, cfg.workers)?;
        let root_slot = set
            .slot_of(cfg.root_scanner)
            .ok_or(RegistrationError::UnknownRoot(cfg.root_scanner))?;
        let malformed: Vec<ScannerId> = set
            .iter()
            .filter(|s| s.scanner().is_malformed())
            .map(|s| s.id())
            .collect();

        let detector = OverlapDetector::new(cfg.min_shared_points);
        let mut overlaps = detector.detect(&set, cfg.workers);

        let matcher = ProbeMatcher::new(cfg.min_shared_points);
        let solver = TransformSolver::new(cfg.revalidate_all);
        let outcomes = parallel_map(&overlaps, cfg.workers, |o| {
            resolve_edge(&set, o, &matcher, &solver)
        });

        let mut graph = OverlapGraph::new(set.len());
        let mut dropped = Vec::new();
        for (overlap, outcome) in overlaps.iter_mut().zip(outcomes) {
            let (a, b) = overlap.ids();
            match outcome {
                EdgeOutcome::Resolved(correspondences, transform) => {
                    overlap.record_correspondences(correspondences);
                    overlap.record_transform(transform);
                    let (a_slot, b_slot) = overlap.slots();
                    graph.add_edge(a_slot, b_slot, transform);
                }
                EdgeOutcome::Dropped(correspondences, reason) => {
                    warn!(a, b, ?reason, "overlap dropped");
                    overlap.record_correspondences(correspondences);
                    dropped.push(DroppedEdge { a, b, reason });
                }
                EdgeOutcome::Inconsistent(source) => {
                    return Err(RegistrationError::TransformInconsistent { a, b, source });
                }
            }
        }
        info!(
            overlaps = overlaps.len(),
            resolved = overlaps.iter().filter(|o| o.is_resolved()).count(),
            edges = graph.edge_count(),
            dropped = dropped.len(),
            "overlap graph built"
        );

        let frame = FrameAssembler::new(root_slot).assemble(&set, &graph);
        Ok(Registration {
            frame,
            overlaps,
            dropped,
            malformed,
        })
    }
}

fn resolve_edge(
    set: &ScannerSet,
    overlap: &Overlap,
    matcher: &ProbeMatcher,
    solver: &TransformSolver,
) -> EdgeOutcome {
    let (a_slot, b_slot) = overlap.slots();
    let (Some(a), Some(b)) = (set.get(a_slot), set.get(b_slot)) else {
        return EdgeOutcome::Dropped(Vec::new(), DropReason::TooFewCorrespondences { found: 0 });
    };
    let correspondences = matcher.match_points(a.index(), b.index(), overlap.shared());
    if correspondences.len() < 2 {
        let found = correspondences.len();
        return EdgeOutcome::Dropped(correspondences, DropReason::TooFewCorrespondences { found });
    }
    match solver.solve_correspondences(a.scanner(), b.scanner(), &correspondences) {
        Ok(transform) => EdgeOutcome::Resolved(correspondences, transform),
        Err(SolveError::Underdetermined { candidates }) => {
            let pairs: Vec<_> = correspondences
                .iter()
                .filter_map(|c| a.scanner().point(c.a).zip(b.scanner().point(c.b)))
                .collect();
            let rotations: Vec<usize> = solver
                .candidate_rotations(&pairs)
                .iter()
                .map(Rotation::index)
                .collect();
            debug!(a = a.id(), b = b.id(), ?rotations, "several rotations fit");
            EdgeOutcome::Dropped(correspondences, DropReason::Underdetermined { candidates })
        }
        Err(SolveError::NotEnoughCorrespondences { found }) => {
            EdgeOutcome::Dropped(correspondences, DropReason::TooFewCorrespondences { found })
        }
        Err(e @ (SolveError::Inconsistent | SolveError::IndexOutOfRange(_))) => {
            EdgeOutcome::Inconsistent(e)
        }
    }
}

/// Validates `config` and registers `scanners` in one call.
pub fn register(
    scanners: Vec<Scanner>,
    config: RegistrationConfig,
) -> Result<Registration, RegistrationError> {
    Registrar::new(config)?.register(scanners)
}
