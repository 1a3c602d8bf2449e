use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};

/// Hyper-parameters for the Gaussian Naive Bayes estimator.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GaussianNbConfig {
    /// Fraction of the largest attribute variance added to every per-class
    /// variance. `0.0` disables smoothing, so zero-variance attributes are
    /// reported as degenerate at predict time.
    pub var_smoothing: f64,

    /// Compute class statistics and row posteriors on the rayon pool.
    pub parallel: bool,
}

impl Default for GaussianNbConfig {
    fn default() -> Self {
        Self {
            var_smoothing: 0.0,
            parallel: false,
        }
    }
}

impl GaussianNbConfig {
    pub fn new(var_smoothing: f64, parallel: bool) -> Self {
        Self {
            var_smoothing,
            parallel,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.var_smoothing.is_finite() || self.var_smoothing < 0.0 {
            return Err(ClassifierError::InvalidParameter(format!(
                "var_smoothing must be a finite, non-negative number, got {}",
                self.var_smoothing
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_disables_smoothing() {
        let cfg = GaussianNbConfig::default();
        assert_eq!(cfg.var_smoothing, 0.0);
        assert!(!cfg.parallel);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn negative_smoothing_is_rejected() {
        let cfg = GaussianNbConfig::new(-1e-9, false);
        assert!(matches!(
            cfg.validate(),
            Err(ClassifierError::InvalidParameter(_))
        ));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: GaussianNbConfig = serde_json::from_str(r#"{"parallel": true}"#).unwrap();
        assert_eq!(cfg, GaussianNbConfig::new(0.0, true));
    }
}
