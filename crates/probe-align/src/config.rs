// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Registration parameters.

use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;
use crate::scanner::ScannerId;

/// Key under which tools persist [`RegistrationConfig`].
pub const CONFIG_KEY: &str = "registration";

/// Default number of points two scanners must share to count as overlapping.
pub const DEFAULT_MIN_SHARED_POINTS: usize = 12;

/// Tunables for one registration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrationConfig {
    /// Points two scanners must have in common (at least 2).
    pub min_shared_points: usize,
    /// Scanner whose frame becomes the global frame.
    pub root_scanner: ScannerId,
    /// Worker threads for the stateless stages (at least 1).
    pub workers: usize,
    /// Check every correspondence against the solved transform, not just the
    /// first two.
    pub revalidate_all: bool,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            min_shared_points: DEFAULT_MIN_SHARED_POINTS,
            root_scanner: 0,
            workers: 1,
            revalidate_all: true,
        }
    }
}

impl RegistrationConfig {
    /// Sets `min_shared_points`.
    pub fn with_min_shared_points(mut self, n: usize) -> Self {
        self.min_shared_points = n;
        self
    }

    /// Sets the root scanner.
    pub fn with_root(mut self, root: ScannerId) -> Self {
        self.root_scanner = root;
        self
    }

    /// Sets the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Enables or disables full re-validation.
    pub fn with_revalidate_all(mut self, on: bool) -> Self {
        self.revalidate_all = on;
        self
    }

    /// Rejects out-of-range values.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.min_shared_points < 2 {
            return Err(RegistrationError::InvalidConfig(format!(
                "min_shared_points must be >= 2, got {}",
                self.min_shared_points
            )));
        }
        if self.workers == 0 {
            return Err(RegistrationError::InvalidConfig(
                "workers must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = RegistrationConfig::default();
        assert_eq!(cfg.min_shared_points, 12);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let cfg = RegistrationConfig::default().with_min_shared_points(1);
        assert!(matches!(cfg.validate(), Err(RegistrationError::InvalidConfig(_))));
        let cfg = RegistrationConfig::default().with_workers(0);
        assert!(matches!(cfg.validate(), Err(RegistrationError::InvalidConfig(_))));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: RegistrationConfig =
            serde_json::from_str(r#"{"min_shared_points": 3}"#).expect("parse");
        assert_eq!(cfg, RegistrationConfig::default().with_min_shared_points(3));
        assert!(serde_json::from_str::<RegistrationConfig>(r#"{"bogus": 1}"#).is_err());
    }
}
