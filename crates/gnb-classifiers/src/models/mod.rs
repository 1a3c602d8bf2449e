pub mod classifier_trait;
pub mod gaussian_nb;

pub use classifier_trait::{ClassifierModel, Estimator};
pub use gaussian_nb::{ClassStatistics, FittedGaussianNb, GaussianNb};
