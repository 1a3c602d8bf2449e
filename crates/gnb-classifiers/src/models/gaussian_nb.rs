use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;

use crate::config::GaussianNbConfig;
use crate::encoding::validate_codes;
use crate::error::{ClassifierError, Result};
use crate::math::Array2;
use crate::models::classifier_trait::{ClassifierModel, Estimator};
use crate::stats;

/// Gaussian Naive Bayes estimator. Holds only hyper-parameters; `fit`
/// produces a [`FittedGaussianNb`].
#[derive(Debug, Clone, Default)]
pub struct GaussianNb {
    config: GaussianNbConfig,
}

/// Per-class training values and their Gaussian parameters, indexed by
/// attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStatistics {
    /// All training values of each attribute belonging to this class.
    pub values: Vec<Vec<f64>>,
    pub mean: Vec<f64>,
    /// Population standard deviation, including any smoothing term.
    pub std_dev: Vec<f64>,
    pub count: usize,
}

/// Immutable fitted model. Refitting builds a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedGaussianNb {
    classes: Vec<ClassStatistics>,
    n_features: usize,
    epsilon: f64,
    parallel: bool,
}

impl GaussianNb {
    pub fn new(config: GaussianNbConfig) -> Self {
        GaussianNb { config }
    }

    pub fn config(&self) -> &GaussianNbConfig {
        &self.config
    }

    /// Estimate per-class per-attribute mean and population standard
    /// deviation.
    ///
    /// `y` must hold dense 0-based class codes in first-appearance order.
    /// Zero-variance attributes are accepted here and reported by `predict`.
    pub fn fit(&self, x: &Array2<f64>, y: &[usize]) -> Result<FittedGaussianNb> {
        self.config.validate()?;
        check_matrix(x, "training rows", "training attributes")?;
        if x.nrows() != y.len() {
            return Err(ClassifierError::ShapeMismatch {
                context: "label vector length",
                expected: x.nrows(),
                found: y.len(),
            });
        }
        let n_classes = validate_codes(y)?;
        let n_features = x.ncols();

        let mut partitions = vec![vec![Vec::new(); n_features]; n_classes];
        for (row, &class) in x.rows().zip(y) {
            for (values, &v) in partitions[class].iter_mut().zip(row) {
                values.push(v);
            }
        }

        let epsilon = if self.config.var_smoothing > 0.0 {
            self.config.var_smoothing * max_attribute_variance(x)
        } else {
            0.0
        };
        if !epsilon.is_finite() {
            return Err(ClassifierError::InvalidParameter(format!(
                "var_smoothing {} overflows the variance smoothing term",
                self.config.var_smoothing
            )));
        }

        let classes: Vec<ClassStatistics> = if self.config.parallel {
            partitions
                .into_par_iter()
                .map(|values| class_statistics(values, epsilon))
                .collect()
        } else {
            partitions
                .into_iter()
                .map(|values| class_statistics(values, epsilon))
                .collect()
        };

        log::debug!(
            "fitted gaussian naive bayes: {} rows, {} attributes, {} classes, epsilon {:e}",
            x.nrows(),
            n_features,
            n_classes,
            epsilon
        );

        Ok(FittedGaussianNb {
            classes,
            n_features,
            epsilon,
            parallel: self.config.parallel,
        })
    }
}

impl Estimator for GaussianNb {
    type Fitted = FittedGaussianNb;

    fn fit(&self, x: &Array2<f64>, y: &[usize]) -> Result<FittedGaussianNb> {
        GaussianNb::fit(self, x, y)
    }
}

fn check_matrix(x: &Array2<f64>, rows_what: &'static str, cols_what: &'static str) -> Result<()> {
    if x.nrows() == 0 {
        return Err(ClassifierError::EmptyInput(rows_what));
    }
    if x.ncols() == 0 {
        return Err(ClassifierError::EmptyInput(cols_what));
    }
    for (row, values) in x.rows().enumerate() {
        if let Some(col) = values.iter().position(|v| !v.is_finite()) {
            return Err(ClassifierError::NonFiniteValue { row, col });
        }
    }
    Ok(())
}

fn max_attribute_variance(x: &Array2<f64>) -> f64 {
    (0..x.ncols())
        .map(|col| {
            let column: Vec<f64> = x.rows().map(|row| row[col]).collect();
            stats::population_variance(&column, stats::mean(&column))
        })
        .fold(0.0, f64::max)
}

fn class_statistics(values: Vec<Vec<f64>>, epsilon: f64) -> ClassStatistics {
    let count = values.first().map(Vec::len).unwrap_or(0);
    let mut mean = Vec::with_capacity(values.len());
    let mut std_dev = Vec::with_capacity(values.len());
    for attribute in &values {
        // Constant columns get exactly zero variance; the two-pass mean of
        // a repeated 0.1 drifts by an ulp.
        let (mu, var) = match stats::constant_value(attribute) {
            Some(value) => {
                if epsilon > 0.0 {
                    log::warn!("smoothing zero-variance attribute with epsilon {:e}", epsilon);
                }
                (value, 0.0)
            }
            None => {
                let mu = stats::mean(attribute);
                (mu, stats::population_variance(attribute, mu))
            }
        };
        mean.push(mu);
        std_dev.push((var + epsilon).sqrt());
    }
    ClassStatistics {
        values,
        mean,
        std_dev,
        count,
    }
}

impl FittedGaussianNb {
    pub fn classes(&self) -> &[ClassStatistics] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Variance smoothing term added during fitting (`0.0` when disabled).
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Predict one 0-based class code per row, picking the highest
    /// posterior and the lowest class code on ties.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        let posteriors = self.predict_proba(x)?;
        posteriors
            .rows()
            .enumerate()
            .map(|(row, probs)| {
                stats::argmax(probs).ok_or(ClassifierError::NumericalUnderflow { row })
            })
            .collect()
    }

    /// Normalized posterior for each class under a uniform prior.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let log_likelihood = self.predict_log_likelihood(x)?;
        let mut out = Vec::with_capacity(log_likelihood.nrows() * self.n_classes());
        for row in log_likelihood.rows() {
            out.extend(stats::normalize_log_likelihoods(row));
        }
        Ok(Array2::from_shape_vec(log_likelihood.shape(), out)?)
    }

    /// Sum over attributes of the log-density of each class.
    pub fn predict_log_likelihood(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        check_matrix(x, "prediction rows", "prediction attributes")?;
        if x.ncols() != self.n_features {
            return Err(ClassifierError::ShapeMismatch {
                context: "prediction attribute count",
                expected: self.n_features,
                found: x.ncols(),
            });
        }
        let distributions = self.distributions()?;

        let rows: Vec<Vec<f64>> = if self.parallel {
            (0..x.nrows())
                .into_par_iter()
                .map(|row| row_log_likelihood(&distributions, x.row_slice(row), row))
                .collect::<Result<_>>()?
        } else {
            (0..x.nrows())
                .map(|row| row_log_likelihood(&distributions, x.row_slice(row), row))
                .collect::<Result<_>>()?
        };

        log::debug!(
            "scored {} rows against {} classes",
            rows.len(),
            self.n_classes()
        );

        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Ok(Array2::from_shape_vec((x.nrows(), self.n_classes()), flat)?)
    }

    fn distributions(&self) -> Result<Vec<Vec<Normal>>> {
        self.classes
            .iter()
            .enumerate()
            .map(|(class, stats_c)| {
                stats_c
                    .mean
                    .iter()
                    .zip(&stats_c.std_dev)
                    .enumerate()
                    .map(|(attribute, (&mu, &sigma))| stats::normal(mu, sigma, class, attribute))
                    .collect::<Result<Vec<Normal>>>()
            })
            .collect()
    }
}

fn row_log_likelihood(distributions: &[Vec<Normal>], x: &[f64], row: usize) -> Result<Vec<f64>> {
    distributions
        .iter()
        .map(|class_dists| {
            let total: f64 = class_dists
                .iter()
                .zip(x)
                .map(|(dist, &xj)| stats::gaussian_ln_pdf(dist, xj))
                .sum();
            if total.is_finite() {
                Ok(total)
            } else {
                Err(ClassifierError::NumericalUnderflow { row })
            }
        })
        .collect()
}

impl ClassifierModel for FittedGaussianNb {
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        FittedGaussianNb::predict(self, x)
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        FittedGaussianNb::predict_proba(self, x)
    }

    fn n_classes(&self) -> usize {
        FittedGaussianNb::n_classes(self)
    }

    fn name(&self) -> &str {
        "gaussian_nb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[f64]) -> Array2<f64> {
        Array2::from_shape_vec((values.len(), 1), values.to_vec()).unwrap()
    }

    #[test]
    fn test_fit_and_predict_two_clusters() {
        let x = column(&[1.0, 1.2, 10.0, 10.2]);
        let y = vec![0, 0, 1, 1];

        let model = GaussianNb::default().fit(&x, &y).unwrap();

        assert_eq!(model.predict(&column(&[1.1])).unwrap(), vec![0]);
        assert_eq!(model.predict(&column(&[10.1])).unwrap(), vec![1]);
    }

    #[test]
    fn test_class_statistics_keep_training_values() {
        let x = Array2::from_rows(vec![vec![1.0, 5.0], vec![9.0, 7.0], vec![3.0, 5.5]]).unwrap();
        let model = GaussianNb::default().fit(&x, &[0, 1, 0]).unwrap();

        let first = &model.classes()[0];
        assert_eq!(first.count, 2);
        assert_eq!(first.values, vec![vec![1.0, 3.0], vec![5.0, 5.5]]);
        assert_eq!(first.mean, vec![2.0, 5.25]);
        assert_eq!(first.std_dev, vec![1.0, 0.25]);
    }

    #[test]
    fn test_repeated_constant_has_exact_zero_std_dev() {
        let x = Array2::from_rows(vec![
            vec![1.0, 0.1],
            vec![1.4, 0.1],
            vec![0.8, 0.1],
            vec![6.0, 2.0],
            vec![7.0, 3.0],
        ])
        .unwrap();
        let model = GaussianNb::default().fit(&x, &[0, 0, 0, 1, 1]).unwrap();

        let first = &model.classes()[0];
        assert_eq!(first.mean[1], 0.1);
        assert_eq!(first.std_dev[1], 0.0);
    }

    #[test]
    fn test_overflowing_smoothing_is_invalid() {
        let x = column(&[0.0, 10.0, 100.0, 110.0]);
        let err = GaussianNb::new(GaussianNbConfig::new(1e308, false))
            .fit(&x, &[0, 0, 1, 1])
            .unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidParameter(_)));
    }

    #[test]
    fn test_label_length_mismatch() {
        let x = column(&[1.0, 2.0, 3.0]);
        let err = GaussianNb::default().fit(&x, &[0, 1]).unwrap_err();
        assert_eq!(
            err,
            ClassifierError::ShapeMismatch {
                context: "label vector length",
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_predict_wrong_attribute_count() {
        let model = GaussianNb::default()
            .fit(&column(&[1.0, 2.0, 5.0, 6.0]), &[0, 0, 1, 1])
            .unwrap();
        let x = Array2::from_rows(vec![vec![1.0, 2.0]]).unwrap();
        assert!(matches!(
            model.predict(&x),
            Err(ClassifierError::ShapeMismatch { expected: 1, found: 2, .. })
        ));
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        let x = column(&[1.0, f64::NAN]);
        assert_eq!(
            GaussianNb::default().fit(&x, &[0, 1]).unwrap_err(),
            ClassifierError::NonFiniteValue { row: 1, col: 0 }
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let x = Array2::from_rows(vec![
            vec![0.1, 3.0],
            vec![0.3, 2.5],
            vec![5.0, -1.0],
            vec![5.5, -1.2],
            vec![9.0, 8.0],
            vec![9.4, 8.8],
        ])
        .unwrap();
        let y = vec![0, 0, 1, 1, 2, 2];

        let seq = GaussianNb::default().fit(&x, &y).unwrap();
        let par = GaussianNb::new(GaussianNbConfig::new(0.0, true))
            .fit(&x, &y)
            .unwrap();

        assert_eq!(seq.classes(), par.classes());
        assert_eq!(seq.predict_proba(&x).unwrap(), par.predict_proba(&x).unwrap());
    }
}
