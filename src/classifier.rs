//! Nearest-profile classification
//!
//! Holds one aggregate vector per language and labels unknown samples by the
//! highest binary cosine similarity. Labels are kept sorted, so when two
//! profiles score exactly the same the lexicographically smaller label wins.

use crate::error::{LangHdError, Result};
use crate::hypervector::HyperVector;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Trained reference vectors keyed by language label.
pub type LanguageProfiles = BTreeMap<String, HyperVector>;

/// Encoded test documents keyed by document name.
pub type TestSamples = BTreeMap<String, HyperVector>;

/// Best-matching language for one sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub similarity: f64,
}

/// Outcome for one named test sample. `prediction` is `None` when there was
/// nothing to compare against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub sample: String,
    pub prediction: Option<Prediction>,
}

/// Reference set plus the arg-max decision rule.
#[derive(Clone, Debug, Default)]
pub struct Classifier {
    references: LanguageProfiles,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add profiles to the reference set, replacing any with the same label.
    pub fn train<I>(&mut self, profiles: I)
    where
        I: IntoIterator<Item = (String, HyperVector)>,
    {
        self.references.extend(profiles);
        info!(languages = self.references.len(), "reference set trained");
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.references.keys().map(String::as_str)
    }

    pub fn profile(&self, label: &str) -> Option<&HyperVector> {
        self.references.get(label)
    }

    /// Label with the highest similarity to `sample`.
    ///
    /// # Examples
    ///
    /// ```
    /// use langhd::{Classifier, HyperVector};
    ///
    /// let x = HyperVector::from_bits(&[1, 1, 0, 0], 4).unwrap();
    /// let y = HyperVector::from_bits(&[0, 0, 1, 1], 4).unwrap();
    /// let mut clf = Classifier::new();
    /// clf.train([("x".to_string(), x.clone()), ("y".to_string(), y)]);
    ///
    /// assert_eq!(clf.classify(&x).unwrap().label, "x");
    /// assert!(Classifier::new().classify(&x).is_err());
    /// ```
    pub fn classify(&self, sample: &HyperVector) -> Result<Prediction> {
        let mut best: Option<(&str, f64)> = None;
        for (label, reference) in &self.references {
            let score = sample.similarity(reference);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((label.as_str(), score)),
            }
        }
        best.map(|(label, similarity)| Prediction {
            label: label.to_string(),
            similarity,
        })
        .ok_or(LangHdError::EmptyReferenceSet)
    }

    /// Every reference scored against `sample`, best first. Equal scores keep
    /// label order.
    pub fn rank(&self, sample: &HyperVector) -> Vec<Prediction> {
        let mut scored: Vec<Prediction> = self
            .references
            .iter()
            .map(|(label, reference)| Prediction {
                label: label.clone(),
                similarity: sample.similarity(reference),
            })
            .collect();
        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored
    }

    /// Classify every sample, in sample-name order.
    pub fn classify_all(&self, samples: &TestSamples) -> Vec<Verdict> {
        let entries: Vec<(&String, &HyperVector)> = samples.iter().collect();
        let verdicts: Vec<Verdict> = entries
            .par_iter()
            .map(|(name, vector)| Verdict {
                sample: (*name).clone(),
                prediction: self.classify(vector).ok(),
            })
            .collect();
        debug!(samples = verdicts.len(), "classified test samples");
        verdicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(b: &[u8]) -> HyperVector {
        HyperVector::from_bits(b, b.len()).unwrap()
    }

    #[test]
    fn test_empty_reference_set() {
        let clf = Classifier::new();
        assert!(matches!(
            clf.classify(&bits(&[1, 0])),
            Err(LangHdError::EmptyReferenceSet)
        ));

        let mut samples = TestSamples::new();
        samples.insert("t".into(), bits(&[1, 0]));
        let verdicts = clf.classify_all(&samples);
        assert_eq!(verdicts.len(), 1);
        assert!(verdicts[0].prediction.is_none());
    }

    #[test]
    fn test_ties_go_to_smallest_label() {
        let mut clf = Classifier::new();
        clf.train([
            ("zeta".to_string(), bits(&[1, 1, 0, 0])),
            ("alpha".to_string(), bits(&[1, 1, 0, 0])),
        ]);
        let p = clf.classify(&bits(&[1, 1, 0, 0])).unwrap();
        assert_eq!(p.label, "alpha");
        assert!((p.similarity - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_zero_profiles_score_zero() {
        let mut clf = Classifier::new();
        clf.train([
            ("a".to_string(), bits(&[0, 0, 0, 0])),
            ("b".to_string(), bits(&[0, 0, 0, 1])),
        ]);
        let p = clf.classify(&bits(&[1, 1, 1, 1])).unwrap();
        assert_eq!(p.label, "b");
        assert!(p.similarity.is_finite());
    }

    #[test]
    fn test_rank_orders_best_first() {
        let mut clf = Classifier::new();
        clf.train([
            ("far".to_string(), bits(&[0, 0, 1, 1])),
            ("near".to_string(), bits(&[1, 1, 1, 0])),
            ("same".to_string(), bits(&[1, 1, 0, 0])),
        ]);
        let ranked = clf.rank(&bits(&[1, 1, 0, 0]));
        let labels: Vec<&str> = ranked.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["same", "near", "far"]);
    }

    #[test]
    fn test_classify_all_keeps_sample_order() {
        let mut clf = Classifier::new();
        clf.train([
            ("x".to_string(), bits(&[1, 1, 0, 0])),
            ("y".to_string(), bits(&[0, 0, 1, 1])),
        ]);
        let mut samples = TestSamples::new();
        samples.insert("b.txt".into(), bits(&[0, 0, 1, 1]));
        samples.insert("a.txt".into(), bits(&[1, 1, 0, 0]));
        let verdicts = clf.classify_all(&samples);
        assert_eq!(verdicts[0].sample, "a.txt");
        assert_eq!(verdicts[0].prediction.as_ref().unwrap().label, "x");
        assert_eq!(verdicts[1].sample, "b.txt");
        assert_eq!(verdicts[1].prediction.as_ref().unwrap().label, "y");
    }
}
