use serde::{Deserialize, Serialize};

/// One bank transaction. Serialized as a history row `date,desc,amount,cat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: String,
    #[serde(rename = "desc")]
    pub description: String,
    pub amount: f64,
    #[serde(rename = "cat")]
    pub category: Option<String>,
}

impl TransactionRecord {
    pub fn unlabeled(date: impl Into<String>, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount,
            category: None,
        }
    }

    pub fn is_labeled(&self) -> bool {
        self.category.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}
