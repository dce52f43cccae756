use serde::{Deserialize, Serialize};

/// Sentiment assessment supplied by an external advisory service.
///
/// The engine treats it as already validated; values outside the documented
/// ranges are clamped when it is turned into a vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryInput {
    /// -1 (bearish) ..= 1 (bullish)
    pub sentiment_score: f64,
    /// 0..=1
    pub confidence: f64,
    #[serde(default)]
    pub rationale_tags: Vec<String>,
}

impl AdvisoryInput {
    pub fn new(sentiment_score: f64, confidence: f64) -> Self {
        Self {
            sentiment_score,
            confidence,
            rationale_tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rationale_tags = tags.into_iter().map(Into::into).collect();
        self
    }
}
