// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Exact rigid transform recovery from point correspondences.
//!
//! For every rotation `R` in the static table the translation is pinned by
//! the first pair, `t = p1A - R·p1B`, and the remaining pairs are checked
//! exactly. The search is `O(24 · k)` for `k` checked pairs.

use probe_geom::{Point3, Rotation, Transform, ROTATIONS};
use thiserror::Error;

use crate::matcher::Correspondence;
use crate::scanner::Scanner;

/// Why no transform was returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// Fewer than two correspondences were supplied.
    #[error("need at least 2 correspondences, got {found}")]
    NotEnoughCorrespondences {
        /// Number of correspondences supplied.
        found: usize,
    },
    /// No rotation maps the `b` points onto the `a` points.
    #[error("no rotation satisfies the correspondences")]
    Inconsistent,
    /// Several rotations fit the checked pairs equally well; a further,
    /// non-degenerate pair is required.
    #[error("{candidates} rotations satisfy the correspondences; need another pair")]
    Underdetermined {
        /// Number of rotations that fit.
        candidates: usize,
    },
    /// A correspondence referenced a point index outside its scanner.
    #[error("correspondence index out of range: {0:?}")]
    IndexOutOfRange(Correspondence),
}

/// Finds the unique transform mapping `b`-side points onto `a`-side points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformSolver {
    revalidate_all: bool,
}

impl Default for TransformSolver {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TransformSolver {
    /// Creates a solver.
    ///
    /// With `revalidate_all` every supplied pair must agree with the
    /// transform; otherwise only the first two pairs are checked.
    pub const fn new(revalidate_all: bool) -> Self {
        Self { revalidate_all }
    }

    /// Whether every pair is checked.
    pub const fn revalidates_all(&self) -> bool {
        self.revalidate_all
    }

    /// Solves `pA = R·pB + t` for `(pA, pB)` pairs.
    ///
    /// Never picks among several fitting rotations: that case is reported as
    /// [`SolveError::Underdetermined`].
    pub fn solve(&self, pairs: &[(Point3, Point3)]) -> Result<Transform, SolveError> {
        let [(p1a, p1b), rest @ ..] = pairs else {
            return Err(SolveError::NotEnoughCorrespondences { found: 0 });
        };
        if rest.is_empty() {
            return Err(SolveError::NotEnoughCorrespondences { found: 1 });
        }
        let checked = if self.revalidate_all { rest } else { &rest[..1] };

        let mut fits = ROTATIONS.iter().filter_map(|r| {
            let t = p1a.sub(&r.apply(p1b));
            checked
                .iter()
                .all(|(pa, pb)| r.apply(pb).add(&t) == *pa)
                .then(|| Transform::new(*r, t))
        });

        match (fits.next(), fits.next()) {
            (Some(transform), None) => Ok(transform),
            (None, _) => Err(SolveError::Inconsistent),
            (Some(_), Some(_)) => Err(SolveError::Underdetermined {
                candidates: 2 + fits.count(),
            }),
        }
    }

    /// Resolves index correspondences against the two scanners and solves.
    ///
    /// The result maps `b`'s local frame into `a`'s local frame.
    pub fn solve_correspondences(
        &self,
        a: &Scanner,
        b: &Scanner,
        correspondences: &[Correspondence],
    ) -> Result<Transform, SolveError> {
        let pairs = correspondences
            .iter()
            .map(|c| match (a.point(c.a), b.point(c.b)) {
                (Some(pa), Some(pb)) => Ok((pa, pb)),
                _ => Err(SolveError::IndexOutOfRange(*c)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.solve(&pairs)
    }

    /// Every rotation consistent with all of the pairs.
    pub(crate) fn candidate_rotations(&self, pairs: &[(Point3, Point3)]) -> Vec<Rotation> {
        let [(p1a, p1b), rest @ ..] = pairs else {
            return ROTATIONS.to_vec();
        };
        ROTATIONS
            .iter()
            .filter(|r| {
                let t = p1a.sub(&r.apply(p1b));
                rest.iter().all(|(pa, pb)| r.apply(pb).add(&t) == *pa)
            })
            .copied()
            .collect()
    }
}
