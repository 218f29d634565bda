//! Naive Bayes over token presence, trained one example at a time.
//!
//! The model keeps running counts per category (documents seen, and how many
//! of those documents contained each token), so `update` only touches the
//! tokens of the new example. Scores are computed in log space:
//!
//! ```text
//! score(c) = ln(docs(c) / N) + Σ ln((count(t, c) + 1) / (docs(c) + 2))
//! ```
//!
//! where the sum runs over the input's tokens that appear anywhere in the
//! training vocabulary. Tokens never seen in training carry no evidence.

use std::collections::{HashMap, HashSet};

use crate::features::FeatureSet;

/// Outcome of classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guess {
    Category(String),
    /// Fewer than two training examples.
    NoGuess,
}

impl Guess {
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::Category(name) => Some(name.as_str()),
            Self::NoGuess => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainingExample {
    pub features: FeatureSet,
    pub category: String,
}

#[derive(Debug, Default)]
struct CategoryCounts {
    name: String,
    documents: usize,
    tokens: HashMap<String, usize>,
}

#[derive(Debug, Default)]
pub struct IncrementalClassifier {
    corpus: Vec<TrainingExample>,
    // First-seen order; ties resolve to the lower position.
    categories: Vec<CategoryCounts>,
    positions: HashMap<String, usize>,
    vocabulary: HashSet<String>,
}

impl IncrementalClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn train<I, S>(examples: I) -> Self
    where
        I: IntoIterator<Item = (FeatureSet, S)>,
        S: Into<String>,
    {
        let mut classifier = Self::new();
        for (features, category) in examples {
            classifier.update(features, category);
        }
        classifier
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.corpus.len() > 1
    }

    pub fn examples(&self) -> &[TrainingExample] {
        &self.corpus
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn update(&mut self, features: FeatureSet, category: impl Into<String>) {
        let category = category.into();
        let position = match self.positions.get(&category) {
            Some(&p) => p,
            None => {
                self.categories.push(CategoryCounts {
                    name: category.clone(),
                    ..Default::default()
                });
                self.positions.insert(category.clone(), self.categories.len() - 1);
                self.categories.len() - 1
            }
        };
        let counts = &mut self.categories[position];
        counts.documents += 1;
        for token in features.tokens() {
            *counts.tokens.entry(token.to_string()).or_default() += 1;
            if !self.vocabulary.contains(token) {
                self.vocabulary.insert(token.to_string());
            }
        }
        self.corpus.push(TrainingExample { features, category });
    }

    pub fn classify(&self, features: &FeatureSet) -> Guess {
        if !self.is_ready() {
            return Guess::NoGuess;
        }
        let total = self.corpus.len() as f64;
        let known: Vec<&str> = features
            .tokens()
            .filter(|t| self.vocabulary.contains(*t))
            .collect();

        let mut best: Option<(f64, &str)> = None;
        for counts in &self.categories {
            let docs = counts.documents as f64;
            let mut score = (docs / total).ln();
            for token in &known {
                let seen = counts.tokens.get(*token).copied().unwrap_or(0) as f64;
                score += ((seen + 1.0) / (docs + 2.0)).ln();
            }
            match best {
                Some((top, _)) if score <= top => {}
                _ => best = Some((score, counts.name.as_str())),
            }
        }
        best.map_or(Guess::NoGuess, |(_, name)| Guess::Category(name.to_string()))
    }
}
