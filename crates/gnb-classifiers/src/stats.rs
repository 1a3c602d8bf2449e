//! Descriptive statistics and Gaussian density helpers.
use statrs::distribution::{Continuous, Normal};

use crate::error::{ClassifierError, Result};

/// Arithmetic mean. Returns NaN for an empty slice; callers validate first.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by N) around a precomputed mean.
pub fn population_variance(values: &[f64], mean: f64) -> f64 {
    let sq_dev = values
        .iter()
        .map(|&v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>();
    sq_dev / values.len() as f64
}

/// Population standard deviation.
pub fn population_std_dev(values: &[f64]) -> f64 {
    population_variance(values, mean(values)).sqrt()
}

/// The shared value when every element is identical.
pub fn constant_value(values: &[f64]) -> Option<f64> {
    let (&first, rest) = values.split_first()?;
    rest.iter().all(|&v| v == first).then_some(first)
}

/// Build the per-attribute normal distribution, rejecting `σ <= 0` as
/// degenerate and a non-finite `μ` or `σ` as an invalid parameter.
pub fn normal(mean: f64, std_dev: f64, class: usize, attribute: usize) -> Result<Normal> {
    if !mean.is_finite() || !std_dev.is_finite() {
        return Err(ClassifierError::InvalidParameter(format!(
            "class {} attribute {} has non-finite parameters (mean {}, std dev {})",
            class, attribute, mean, std_dev
        )));
    }
    if std_dev <= 0.0 {
        return Err(ClassifierError::DegenerateDistribution { class, attribute });
    }
    Normal::new(mean, std_dev)
        .map_err(|_| ClassifierError::DegenerateDistribution { class, attribute })
}

/// Natural log of the normal density, evaluated in log space so it never
/// underflows to `ln(0)` for finite inputs.
#[inline]
pub fn gaussian_ln_pdf(dist: &Normal, x: f64) -> f64 {
    dist.ln_pdf(x)
}

/// Turn per-class log-likelihoods into probabilities summing to one.
///
/// The maximum is subtracted before exponentiating so at least one term is
/// exactly `1.0` and the sum never underflows to zero.
pub fn normalize_log_likelihoods(log_likelihoods: &[f64]) -> Vec<f64> {
    let max = log_likelihoods
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = log_likelihoods.iter().map(|&l| (l - max).exp()).collect();
    let total: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / total).collect()
}

/// Index of the first maximum; ties resolve to the lowest index.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &v) in values.iter().enumerate() {
        match best {
            Some((_, best_v)) if v <= best_v => {}
            _ => best = Some((idx, v)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    /// Normal probability density `1 / (sqrt(2π)·σ) · exp(−(x − μ)² / (2σ²))`.
    /// Reference formula for checking the log-space density.
    fn gaussian_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
        let z = x - mean;
        (-(z * z) / (2.0 * std_dev * std_dev)).exp() / ((2.0 * PI).sqrt() * std_dev)
    }

    #[test]
    fn population_std_dev_divides_by_n() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), 5.0);
        assert_eq!(population_std_dev(&values), 2.0);
    }

    #[test]
    fn ln_pdf_matches_linear_density() {
        let dist = normal(1.5, 0.7, 0, 0).unwrap();
        for &x in &[-1.0, 0.0, 1.5, 2.2, 4.0] {
            let linear = gaussian_pdf(x, 1.5, 0.7);
            assert!((gaussian_ln_pdf(&dist, x) - linear.ln()).abs() < 1e-12);
        }
    }

    #[test]
    fn ln_pdf_stays_finite_far_from_mean() {
        let dist = normal(0.0, 0.1, 0, 0).unwrap();
        assert_eq!(gaussian_pdf(100.0, 0.0, 0.1), 0.0);
        assert!(gaussian_ln_pdf(&dist, 100.0).is_finite());
    }

    #[test]
    fn zero_std_dev_is_degenerate() {
        assert_eq!(
            normal(3.0, 0.0, 2, 1).unwrap_err(),
            ClassifierError::DegenerateDistribution {
                class: 2,
                attribute: 1
            }
        );
    }

    #[test]
    fn infinite_std_dev_is_invalid_parameter() {
        assert!(matches!(
            normal(0.0, f64::INFINITY, 0, 0),
            Err(ClassifierError::InvalidParameter(_))
        ));
    }

    #[test]
    fn constant_value_uses_exact_equality() {
        assert_eq!(constant_value(&[0.1, 0.1, 0.1]), Some(0.1));
        assert_eq!(constant_value(&[0.1, 0.1, 0.2]), None);
        assert_eq!(constant_value(&[]), None);
    }

    #[test]
    fn normalize_handles_very_negative_log_likelihoods() {
        let probs = normalize_log_likelihoods(&[-2000.0, -2001.0]);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(probs[0] > probs[1]);
    }

    #[test]
    fn argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.25, 0.5, 0.5, 0.1]), Some(1));
        assert_eq!(argmax(&[]), None);
    }
}
