//! Evolution configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{SimError, SimResult};

/// Product-formula order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrotterOrder {
    /// Lie-Trotter, error O(dt).
    #[default]
    First,
    /// Symmetric Suzuki-Trotter, error O(dt²).
    Second,
}

impl std::str::FromStr for TrotterOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "first" => Ok(TrotterOrder::First),
            "2" | "second" => Ok(TrotterOrder::Second),
            other => Err(format!("unknown Trotter order '{other}'")),
        }
    }
}

/// Settings for Trotterized time evolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Time step of one Trotter slice.
    pub dt: f64,
    /// Product-formula order.
    pub order: TrotterOrder,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,
            order: TrotterOrder::First,
        }
    }
}

impl EvolutionConfig {
    /// Set the time step.
    #[must_use]
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Set the product-formula order.
    #[must_use]
    pub fn with_order(mut self, order: TrotterOrder) -> Self {
        self.order = order;
        self
    }

    /// Load overrides from environment variables.
    ///
    /// Environment variables:
    /// - `QTERM_DT`: time step (default: 0.1)
    /// - `QTERM_TROTTER_ORDER`: `1`/`first` or `2`/`second` (default: first)
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`EvolutionConfig::from_env`] with an explicit variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dt) = lookup("QTERM_DT") {
            match dt.trim().parse() {
                Ok(val) => config.dt = val,
                Err(_) => warn!(value = %dt, "ignoring unparsable QTERM_DT"),
            }
        }
        if let Some(order) = lookup("QTERM_TROTTER_ORDER") {
            match order.parse() {
                Ok(val) => config.order = val,
                Err(err) => warn!(%err, "ignoring QTERM_TROTTER_ORDER"),
            }
        }

        config
    }

    /// Check the time step is positive and finite.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidTimeStep(self.dt));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_defaults() {
        let config = EvolutionConfig::from_lookup(lookup(&[]));
        assert_eq!(config, EvolutionConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config =
            EvolutionConfig::from_lookup(lookup(&[("QTERM_DT", "0.05"), ("QTERM_TROTTER_ORDER", "second")]));
        assert_eq!(config.dt, 0.05);
        assert_eq!(config.order, TrotterOrder::Second);
    }

    #[test]
    fn test_bad_values_are_ignored() {
        let config =
            EvolutionConfig::from_lookup(lookup(&[("QTERM_DT", "fast"), ("QTERM_TROTTER_ORDER", "3")]));
        assert_eq!(config, EvolutionConfig::default());
    }

    #[test]
    fn test_validate_rejects_non_positive_dt() {
        assert!(matches!(
            EvolutionConfig::default().with_dt(0.0).validate(),
            Err(SimError::InvalidTimeStep(_))
        ));
        assert!(EvolutionConfig::default().with_dt(f64::NAN).validate().is_err());
    }
}
