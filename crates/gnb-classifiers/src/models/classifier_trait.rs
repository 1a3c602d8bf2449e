use crate::error::Result;
use crate::math::Array2;

/// Something that learns a model from a feature matrix and 0-based class
/// codes. Fitting returns a new immutable model instead of mutating `self`.
pub trait Estimator {
    type Fitted: ClassifierModel;

    fn fit(&self, x: &Array2<f64>, y: &[usize]) -> Result<Self::Fitted>;
}

/// A fitted classifier. Implementations are read-only so a single model can
/// serve concurrent callers.
pub trait ClassifierModel: Send + Sync {
    /// Predict one 0-based class code per row.
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>>;

    /// Per-row class probabilities; each row sums to one.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>>;

    fn n_classes(&self) -> usize;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
