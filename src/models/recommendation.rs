use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One entry of a video's precomputed similarity list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityEdge {
    #[serde(rename = "videoId", alias = "candidateId")]
    pub candidate_id: String,
    pub score: f64,
}

impl SimilarityEdge {
    pub fn new(candidate_id: impl Into<String>, score: f64) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            score,
        }
    }
}

/// Which recommendation strategy produced a result
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Aggregated from the user's watch history
    Personalized,
    /// Trending videos restricted to the user's preferred categories
    #[serde(rename = "trending")]
    ScopedTrending,
    /// Generic trending videos
    Fallback,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Personalized => "personalized",
            Tier::ScopedTrending => "trending",
            Tier::Fallback => "fallback",
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered video ids produced by one aggregation call, tagged with the tier that won
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    pub tier: Tier,
    pub video_ids: Vec<String>,
}

impl RankedResult {
    pub fn new(tier: Tier, video_ids: Vec<String>) -> Self {
        Self { tier, video_ids }
    }

    pub fn empty(tier: Tier) -> Self {
        Self::new(tier, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.video_ids.is_empty()
    }
}
