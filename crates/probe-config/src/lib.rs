// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON config persistence for probe-align tools.
#![forbid(unsafe_code)]

/// Filesystem store.
pub mod fs;
/// Storage port and service.
pub mod service;

pub use fs::FsConfigStore;
pub use service::{ConfigError, ConfigService, ConfigStore, MemoryConfigStore};
