//! Class-code encoding.
//!
//! Class codes are dense 0-based integers `0..K` assigned in first-appearance
//! order. `LabelEncoder` derives them from arbitrary labels and decodes
//! predictions back; `validate_codes` and `from_one_based` check vectors that
//! were encoded elsewhere.
use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{ClassifierError, Result};

/// Check that `y` is a dense first-appearance encoding and return the number
/// of classes.
///
/// The first row must carry code 0 and every code must either repeat an
/// earlier one or be exactly one past the largest code seen so far.
pub fn validate_codes(y: &[usize]) -> Result<usize> {
    if y.is_empty() {
        return Err(ClassifierError::EmptyInput("label vector"));
    }
    let mut n_classes = 0usize;
    for (row, &code) in y.iter().enumerate() {
        if code == n_classes {
            n_classes += 1;
        } else if code > n_classes {
            return Err(ClassifierError::LabelEncoding(format!(
                "row {} introduces class {} before class {}",
                row, code, n_classes
            )));
        }
    }
    Ok(n_classes)
}

/// Convert 1-based codes `1..K` to 0-based codes, validating the same
/// first-appearance rule.
pub fn from_one_based(y: &[u32]) -> Result<Vec<usize>> {
    let codes = y
        .iter()
        .enumerate()
        .map(|(row, &code)| {
            (code as usize).checked_sub(1).ok_or_else(|| {
                ClassifierError::LabelEncoding(format!("row {} has class code 0", row))
            })
        })
        .collect::<Result<Vec<usize>>>()?;
    validate_codes(&codes)?;
    Ok(codes)
}

/// Maps arbitrary labels to dense class codes in first-appearance order.
#[derive(Debug, Clone)]
pub struct LabelEncoder<L> {
    codes: HashMap<L, usize>,
    classes: Vec<L>,
}

impl<L: Eq + Hash + Clone> Default for LabelEncoder<L> {
    fn default() -> Self {
        Self {
            codes: HashMap::new(),
            classes: Vec::new(),
        }
    }
}

impl<L: Eq + Hash + Clone> LabelEncoder<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the encoding from `labels` and return their codes.
    pub fn fit<'a, I>(labels: I) -> (Self, Vec<usize>)
    where
        I: IntoIterator<Item = &'a L>,
        L: 'a,
    {
        let mut encoder = Self::new();
        let codes = labels.into_iter().map(|l| encoder.insert(l)).collect();
        (encoder, codes)
    }

    fn insert(&mut self, label: &L) -> usize {
        if let Some(&code) = self.codes.get(label) {
            return code;
        }
        let code = self.classes.len();
        self.codes.insert(label.clone(), code);
        self.classes.push(label.clone());
        code
    }

    /// Encode labels with the learned table. Unknown labels are an error.
    pub fn transform<'a, I>(&self, labels: I) -> Result<Vec<usize>>
    where
        I: IntoIterator<Item = &'a L>,
        L: 'a,
    {
        labels
            .into_iter()
            .enumerate()
            .map(|(row, label)| {
                self.codes.get(label).copied().ok_or_else(|| {
                    ClassifierError::LabelEncoding(format!(
                        "row {} has a label unseen during encoding",
                        row
                    ))
                })
            })
            .collect()
    }

    pub fn decode(&self, code: usize) -> Option<&L> {
        self.classes.get(code)
    }

    /// Labels indexed by class code.
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_counts_classes() {
        assert_eq!(validate_codes(&[0, 0, 1, 0, 2, 1]).unwrap(), 3);
    }

    #[test]
    fn validate_rejects_gap_and_out_of_order() {
        assert!(matches!(
            validate_codes(&[0, 2]),
            Err(ClassifierError::LabelEncoding(_))
        ));
        assert!(matches!(
            validate_codes(&[1, 0]),
            Err(ClassifierError::LabelEncoding(_))
        ));
    }

    #[test]
    fn validate_rejects_empty() {
        assert_eq!(
            validate_codes(&[]),
            Err(ClassifierError::EmptyInput("label vector"))
        );
    }

    #[test]
    fn one_based_codes_are_shifted() {
        assert_eq!(from_one_based(&[1, 2, 1, 3]).unwrap(), vec![0, 1, 0, 2]);
        assert!(from_one_based(&[0, 1]).is_err());
        assert!(from_one_based(&[2, 1]).is_err());
    }

    #[test]
    fn encoder_uses_first_appearance_order() {
        let labels = vec!["virginica", "setosa", "virginica", "versicolor"];
        let (encoder, codes) = LabelEncoder::fit(&labels);
        assert_eq!(codes, vec![0, 1, 0, 2]);
        assert_eq!(encoder.n_classes(), 3);
        assert_eq!(encoder.decode(1), Some(&"setosa"));
        assert_eq!(encoder.decode(3), None);
    }

    #[test]
    fn encoder_transform_rejects_unknown() {
        let (encoder, _) = LabelEncoder::fit(&["a", "b"]);
        assert_eq!(encoder.transform(&["b", "a"]).unwrap(), vec![1, 0]);
        assert!(encoder.transform(&["c"]).is_err());
    }
}
