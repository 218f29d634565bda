use std::collections::BTreeSet;

const DELIMITERS: &[char] = &[' ', '/'];

/// Order-independent set of tokens extracted from a description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet(BTreeSet<String>);

impl FeatureSet {
    #[cfg(test)]
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Keep only uppercase ASCII letters and spaces, then split into tokens.
///
/// Digits, punctuation and lowercase letters are dropped before splitting, so
/// `"MUSICROOM 123/DVD"` yields `{MUSICROOM, DVD}`.
pub fn extract(description: &str) -> FeatureSet {
    let normalized: String = description
        .chars()
        .filter(|c| c.is_ascii_uppercase() || *c == ' ')
        .collect();
    normalized
        .split(DELIMITERS)
        .filter(|token| !token.is_empty())
        .collect()
}
