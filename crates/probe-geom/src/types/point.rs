// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

/// Exact integer point (or offset) in a scanner's local frame.
///
/// * Components are `i64`; every operation is exact, there is no rounding.
/// * Equality and ordering follow the `(x, y, z)` tuple, which makes `Point3`
///   usable as a `BTreeSet` key with a canonical iteration order.
/// * The same type doubles as a displacement vector (e.g. a translation).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3 {
    data: [i64; 3],
}

impl Point3 {
    /// The origin `(0, 0, 0)`.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Largest coordinate magnitude a scan may report, `2^29`.
    ///
    /// Component differences of in-range points stay within `2^30`, so a
    /// squared distance stays below `3 · 2^60` and fits in `i64`.
    pub const COORDINATE_LIMIT: i64 = 1 << 29;

    /// Creates a point from components.
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { data: [x, y, z] }
    }

    /// X component.
    pub const fn x(&self) -> i64 {
        self.data[0]
    }

    /// Y component.
    pub const fn y(&self) -> i64 {
        self.data[1]
    }

    /// Z component.
    pub const fn z(&self) -> i64 {
        self.data[2]
    }

    /// Returns the components as an array.
    pub const fn to_array(self) -> [i64; 3] {
        self.data
    }

    pub(crate) const fn component(&self, idx: usize) -> i64 {
        self.data[idx]
    }

    /// `true` when every component lies within `±COORDINATE_LIMIT`.
    pub const fn is_within_limit(&self) -> bool {
        self.data[0].unsigned_abs() <= Self::COORDINATE_LIMIT.unsigned_abs()
            && self.data[1].unsigned_abs() <= Self::COORDINATE_LIMIT.unsigned_abs()
            && self.data[2].unsigned_abs() <= Self::COORDINATE_LIMIT.unsigned_abs()
    }

    /// Component-wise sum.
    pub const fn add(&self, other: &Self) -> Self {
        Self::new(
            self.data[0] + other.data[0],
            self.data[1] + other.data[1],
            self.data[2] + other.data[2],
        )
    }

    /// Component-wise difference `self - other`.
    pub const fn sub(&self, other: &Self) -> Self {
        Self::new(
            self.data[0] - other.data[0],
            self.data[1] - other.data[1],
            self.data[2] - other.data[2],
        )
    }

    /// Component-wise negation.
    pub const fn neg(&self) -> Self {
        Self::new(-self.data[0], -self.data[1], -self.data[2])
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Never takes a square root, so two distances compare equal exactly when
    /// the underlying integer sums are equal. Exact for any two points within
    /// [`Self::COORDINATE_LIMIT`].
    pub const fn squared_distance(&self, other: &Self) -> i64 {
        let dx = self.data[0] - other.data[0];
        let dy = self.data[1] - other.data[1];
        let dz = self.data[2] - other.data[2];
        dx * dx + dy * dy + dz * dz
    }

    /// Manhattan (taxicab) distance `|dx| + |dy| + |dz|` to `other`.
    pub const fn manhattan_distance(&self, other: &Self) -> i64 {
        (self.data[0] - other.data[0]).abs()
            + (self.data[1] - other.data[1]).abs()
            + (self.data[2] - other.data[2]).abs()
    }
}

/// Converts an `[x, y, z]` array into a `Point3`.
///
/// # Examples
/// ```
/// use probe_geom::Point3;
/// let p = Point3::from([1, -2, 3]);
/// assert_eq!(p.to_array(), [1, -2, 3]);
/// ```
impl From<[i64; 3]> for Point3 {
    fn from(value: [i64; 3]) -> Self {
        Self { data: value }
    }
}

impl From<(i64, i64, i64)> for Point3 {
    fn from((x, y, z): (i64, i64, i64)) -> Self {
        Self::new(x, y, z)
    }
}

impl core::fmt::Display for Point3 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{},{}", self.data[0], self.data[1], self.data[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_distance_is_symmetric_and_exact() {
        let a = Point3::new(0, 2, 0);
        let b = Point3::new(4, 1, 0);
        assert_eq!(a.squared_distance(&b), 17);
        assert_eq!(b.squared_distance(&a), 17);
        // 1^2 + 3^2 and 2^2 + 2^2 stay distinct without a square root.
        assert_ne!(
            Point3::ORIGIN.squared_distance(&Point3::new(1, 3, 0)),
            Point3::ORIGIN.squared_distance(&Point3::new(2, 2, 0))
        );
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut pts = [
            Point3::new(1, 0, 0),
            Point3::new(0, 5, 5),
            Point3::new(0, 5, -1),
        ];
        pts.sort();
        assert_eq!(
            pts,
            [
                Point3::new(0, 5, -1),
                Point3::new(0, 5, 5),
                Point3::new(1, 0, 0)
            ]
        );
    }

    #[test]
    fn manhattan_matches_hand_computation() {
        let a = Point3::new(1105, -1205, 1229);
        let b = Point3::new(-92, -2380, -20);
        assert_eq!(a.manhattan_distance(&b), 3621);
    }

    #[test]
    fn limit_bounds_the_squared_distance() {
        let lim = Point3::COORDINATE_LIMIT;
        let hi = Point3::new(lim, lim, lim);
        let lo = Point3::new(-lim, -lim, -lim);
        assert!(hi.is_within_limit() && lo.is_within_limit());
        assert!(!Point3::new(0, lim + 1, 0).is_within_limit());
        assert!(!Point3::new(0, 0, i64::MIN).is_within_limit());
        // Extreme corners: 3 · (2^30)^2 without overflow.
        assert_eq!(hi.squared_distance(&lo), 3 * (1_i64 << 60));
    }
}
