use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::{
    db::TrendingSource,
    error::{AppError, AppResult},
    models::{RankedResult, SimilarityEdge, Tier, UserPreferences, WatchHistoryEntry},
    services::similarity::SimilarityGateway,
};

/// Tuning of a recommendation call
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendOptions {
    /// Maximum number of video ids returned
    pub cap: usize,
    /// Upper bound on similarity lookups in flight at once
    pub max_concurrent_lookups: usize,
    /// Drop candidates that already appear in the watch history
    pub exclude_watched: bool,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            cap: 12,
            max_concurrent_lookups: 8,
            exclude_watched: true,
        }
    }
}

/// Produces the home feed ordering for a user
///
/// Tiers are tried in order and the first non-empty one wins:
///
/// 1. **Personalized**: the similarity lists of every watched video are summed
///    per candidate and ranked by total score.
/// 2. **Scoped trending**: trending videos in the user's preferred categories.
/// 3. **Fallback**: trending videos across the whole catalog.
///
/// If every similarity lookup fails the call returns
/// [`AppError::LookupUnavailable`] instead of falling back, so callers can tell
/// "nothing to recommend" from "similarity store down".
#[derive(Clone)]
pub struct RecommendationEngine {
    gateway: Arc<dyn SimilarityGateway>,
    trending: Arc<dyn TrendingSource>,
    options: RecommendOptions,
}

impl RecommendationEngine {
    pub fn new(
        gateway: Arc<dyn SimilarityGateway>,
        trending: Arc<dyn TrendingSource>,
        options: RecommendOptions,
    ) -> Self {
        Self {
            gateway,
            trending,
            options,
        }
    }

    /// Recommends up to the configured cap
    pub async fn recommend(
        &self,
        history: &[WatchHistoryEntry],
        preferences: &UserPreferences,
    ) -> AppResult<RankedResult> {
        self.recommend_with_cap(history, preferences, self.options.cap)
            .await
    }

    /// Recommends up to `cap` videos. A `cap` of zero yields an empty result.
    pub async fn recommend_with_cap(
        &self,
        history: &[WatchHistoryEntry],
        preferences: &UserPreferences,
        cap: usize,
    ) -> AppResult<RankedResult> {
        if cap == 0 {
            return Ok(RankedResult::empty(Tier::Fallback));
        }

        if !history.is_empty() {
            let lists = self.gather_similarity(history).await?;
            let scores = aggregate_scores(&lists);

            let excluded: HashSet<&str> = if self.options.exclude_watched {
                history.iter().map(|entry| entry.video_id.as_str()).collect()
            } else {
                HashSet::new()
            };

            let ranked = rank_candidates(scores, &excluded, cap);
            if !ranked.is_empty() {
                tracing::info!(
                    history_len = history.len(),
                    returned = ranked.len(),
                    "Personalized recommendations ranked"
                );
                let video_ids = ranked.into_iter().map(|(video_id, _)| video_id).collect();
                return Ok(RankedResult::new(Tier::Personalized, video_ids));
            }

            tracing::debug!(
                history_len = history.len(),
                "No personalized candidates, falling back"
            );
        }

        if !preferences.is_empty() {
            match self.trending.trending_video_ids(preferences, cap).await {
                Ok(mut video_ids) if !video_ids.is_empty() => {
                    video_ids.truncate(cap);
                    return Ok(RankedResult::new(Tier::ScopedTrending, video_ids));
                }
                Ok(_) => {
                    tracing::debug!(
                        categories = preferences.len(),
                        "No trending videos in preferred categories"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Scoped trending query failed, using fallback");
                }
            }
        }

        let mut video_ids = self
            .trending
            .trending_video_ids(&UserPreferences::new(), cap)
            .await
            .map_err(|e| match e {
                AppError::LookupUnavailable(_) => e,
                other => AppError::LookupUnavailable(other.to_string()),
            })?;
        video_ids.truncate(cap);

        Ok(RankedResult::new(Tier::Fallback, video_ids))
    }

    /// Looks up every history entry concurrently, at most
    /// `max_concurrent_lookups` at a time
    ///
    /// Failed lookups contribute nothing. Fails only when every lookup failed.
    /// Dropping the returned future aborts the outstanding lookups.
    async fn gather_similarity(
        &self,
        history: &[WatchHistoryEntry],
    ) -> AppResult<Vec<Vec<SimilarityEdge>>> {
        let permits = Arc::new(Semaphore::new(
            self.options
                .max_concurrent_lookups
                .clamp(1, Semaphore::MAX_PERMITS),
        ));
        let mut tasks = JoinSet::new();

        for entry in history {
            let gateway = Arc::clone(&self.gateway);
            let permits = Arc::clone(&permits);
            let video_id = entry.video_id.clone();

            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::Internal(e.to_string()))?;
                gateway.lookup(&video_id).await.map_err(|e| {
                    tracing::warn!(video_id = %video_id, error = %e, "Similarity lookup failed");
                    e
                })
            });
        }

        let mut lists = Vec::with_capacity(history.len());
        let mut error_count = 0usize;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(edges)) => lists.push(edges),
                Ok(Err(_)) => error_count += 1,
                Err(e) => {
                    tracing::error!(error = %e, "Similarity lookup task join error");
                    error_count += 1;
                }
            }
        }

        if error_count > 0 {
            tracing::warn!(
                success_count = lists.len(),
                error_count,
                "Partial similarity lookup failure"
            );
        }

        if lists.is_empty() && error_count > 0 {
            return Err(AppError::LookupUnavailable(format!(
                "all {} similarity lookups failed",
                error_count
            )));
        }

        Ok(lists)
    }
}

/// Sums scores per candidate across all similarity lists
pub fn aggregate_scores(lists: &[Vec<SimilarityEdge>]) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for edge in lists.iter().flatten() {
        *totals.entry(edge.candidate_id.clone()).or_insert(0.0) += edge.score;
    }
    totals
}

/// Orders candidates by descending score, then ascending id, and keeps the first `cap`
pub fn rank_candidates(
    scores: HashMap<String, f64>,
    excluded: &HashSet<&str>,
    cap: usize,
) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = scores
        .into_iter()
        .filter(|(video_id, _)| !excluded.contains(video_id.as_str()))
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(cap);
    ranked
}
