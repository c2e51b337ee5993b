// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core geometry types used by registration (point, rotation, transform).
//!
//! Determinism notes:
//! - Every coordinate and coefficient is an `i64`; nothing is rounded.
//! - The rotation table is a compile-time constant with a fixed order, so a
//!   linear search over it yields the same answer on every platform.

#[doc = "Exact integer points and offsets."]
pub mod point;
#[doc = "The 24 axis-aligned proper rotations."]
pub mod rotation;
#[doc = "Rigid transforms (rotation + integer translation)."]
pub mod transform;
