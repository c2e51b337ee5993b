// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::types::point::Point3;

/// Number of proper rotations of the cube (axis-aligned orientations).
pub const ROTATION_COUNT: usize = 24;

/// Axis permutations paired with their parity (`+1` even, `-1` odd).
const PERMUTATIONS: [([usize; 3], i64); 6] = [
    ([0, 1, 2], 1),
    ([0, 2, 1], -1),
    ([1, 0, 2], -1),
    ([1, 2, 0], 1),
    ([2, 0, 1], 1),
    ([2, 1, 0], -1),
];

/// Orientation-preserving 3×3 integer matrix with exactly one `±1` per row
/// and column (a signed axis permutation with determinant `+1`).
///
/// Conventions:
/// - Row-major: `rows[r][c]` is the coefficient of input axis `c` in output
///   axis `r`.
/// - Every `Rotation` is a member of [`ROTATIONS`]; the inverse is the
///   transpose and composition stays inside the table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rotation {
    rows: [[i64; 3]; 3],
}

/// The 24 axis-aligned rotations, generated once at compile time.
///
/// Index `0` is the identity. The order is fixed (permutation-major, then sign
/// pattern) so searches over the table are deterministic.
pub static ROTATIONS: [Rotation; ROTATION_COUNT] = build_table();

const fn build_table() -> [Rotation; ROTATION_COUNT] {
    let mut out = [Rotation::IDENTITY; ROTATION_COUNT];
    let mut n = 0;
    let mut p = 0;
    while p < PERMUTATIONS.len() {
        let (perm, parity) = PERMUTATIONS[p];
        let mut signs = 0;
        while signs < 8 {
            let sx = if signs & 1 == 0 { 1 } else { -1 };
            let sy = if signs & 2 == 0 { 1 } else { -1 };
            let sz = if signs & 4 == 0 { 1 } else { -1 };
            // det(P·S) = parity(P) · sx · sy · sz
            if parity * sx * sy * sz == 1 {
                let mut rows = [[0i64; 3]; 3];
                rows[0][perm[0]] = sx;
                rows[1][perm[1]] = sy;
                rows[2][perm[2]] = sz;
                out[n] = Rotation { rows };
                n += 1;
            }
            signs += 1;
        }
        p += 1;
    }
    out
}

impl Rotation {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        rows: [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
    };

    /// Returns the rotation stored at `index` in [`ROTATIONS`], if any.
    pub fn from_index(index: usize) -> Option<Self> {
        ROTATIONS.get(index).copied()
    }

    /// Builds a rotation from raw rows, returning `None` unless the matrix is
    /// one of the 24 table entries.
    pub fn from_rows(rows: [[i64; 3]; 3]) -> Option<Self> {
        let candidate = Self { rows };
        ROTATIONS.contains(&candidate).then_some(candidate)
    }

    /// Position of this rotation in [`ROTATIONS`].
    pub fn index(&self) -> usize {
        // Every constructor yields a table member, so the search always hits.
        ROTATIONS.iter().position(|r| r == self).unwrap_or(0)
    }

    /// Raw matrix rows.
    pub const fn rows(&self) -> [[i64; 3]; 3] {
        self.rows
    }

    /// Rotates a point about the origin.
    pub fn apply(&self, p: &Point3) -> Point3 {
        let row = |r: usize| {
            self.rows[r][0] * p.component(0)
                + self.rows[r][1] * p.component(1)
                + self.rows[r][2] * p.component(2)
        };
        Point3::new(row(0), row(1), row(2))
    }

    /// Matrix product `self · other` (apply `other` first, then `self`).
    pub fn compose(&self, other: &Self) -> Self {
        let mut rows = [[0i64; 3]; 3];
        for (r, out_row) in rows.iter_mut().enumerate() {
            for (c, cell) in out_row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.rows[r][k] * other.rows[k][c]).sum();
            }
        }
        Self { rows }
    }

    /// Inverse rotation (the transpose, since the matrix is orthogonal).
    pub fn inverse(&self) -> Self {
        let m = self.rows;
        Self {
            rows: [
                [m[0][0], m[1][0], m[2][0]],
                [m[0][1], m[1][1], m[2][1]],
                [m[0][2], m[1][2], m[2][2]],
            ],
        }
    }

    /// Matrix determinant; `+1` for every table entry.
    pub fn determinant(&self) -> i64 {
        let m = self.rows;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Returns `true` for the identity rotation.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Rotation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Rotation {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = <[[i64; 3]; 3]>::deserialize(deserializer)?;
        Self::from_rows(rows).ok_or_else(|| {
            serde::de::Error::custom("matrix is not an axis-aligned proper rotation")
        })
    }
}
