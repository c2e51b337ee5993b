// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Exact integer geometry for scanner registration.

This crate provides:
- Integer points (`Point3`) with squared and Manhattan distances.
- The static table of 24 axis-aligned rotations (`Rotation`, `ROTATIONS`).
- Rigid transforms (`Transform`) with pure apply/compose/inverse.

Design notes:
- Exact: integer arithmetic only, so transform chains round-trip bit-for-bit.
- Deterministic: the rotation table order is fixed at compile time.
- Rustdoc is treated as part of the contract; public items are documented.
"]

/// Foundational geometric types.
pub mod types;

pub use types::point::Point3;
pub use types::rotation::{Rotation, ROTATIONS, ROTATION_COUNT};
pub use types::transform::Transform;
