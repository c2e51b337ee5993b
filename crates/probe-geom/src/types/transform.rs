// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::types::point::Point3;
use crate::types::rotation::Rotation;

/// Exact rigid transform `p ↦ R·p + t` between two scanner frames.
///
/// Conventions:
/// - `rotation` is one of the 24 axis-aligned proper rotations.
/// - `translation` is the image of the source frame's origin, i.e. the source
///   scanner's position expressed in the target frame.
/// - Composition reads right to left: `a.compose(&b)` applies `b` first.
///
/// Determinism:
/// - Integer arithmetic only; `inverse` and `compose` are exact, so any chain
///   of transforms can be replayed and compared bit-for-bit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    rotation: Rotation,
    translation: Point3,
}

impl Transform {
    /// Identity transform (no rotation, no translation).
    pub const fn identity() -> Self {
        Self {
            rotation: Rotation::IDENTITY,
            translation: Point3::ORIGIN,
        }
    }

    /// Creates a transform from components.
    pub const fn new(rotation: Rotation, translation: Point3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Rotation component.
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Translation component.
    pub const fn translation(&self) -> Point3 {
        self.translation
    }

    /// Maps a point from the source frame into the target frame.
    pub fn apply(&self, p: &Point3) -> Point3 {
        self.rotation.apply(p).add(&self.translation)
    }

    /// Function composition `self ∘ other`: `other` runs first.
    ///
    /// `R = R_self · R_other`, `t = R_self · t_other + t_self`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            rotation: self.rotation.compose(&other.rotation),
            translation: self.rotation.apply(&other.translation).add(&self.translation),
        }
    }

    /// Exact inverse: `Rᵀ` and `-Rᵀ·t`.
    pub fn inverse(&self) -> Self {
        let r_inv = self.rotation.inverse();
        Self {
            rotation: r_inv,
            translation: r_inv.apply(&self.translation).neg(),
        }
    }

    /// Where the source frame's origin lands in the target frame.
    pub const fn origin(&self) -> Point3 {
        self.translation
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
