use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{AppError, AppResult};

use super::video::is_known_category;

/// One viewing of a video by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryEntry {
    pub video_id: String,
    pub watched_at: DateTime<Utc>,
}

impl WatchHistoryEntry {
    pub fn new(video_id: impl Into<String>, watched_at: DateTime<Utc>) -> Self {
        Self {
            video_id: video_id.into(),
            watched_at,
        }
    }
}

/// Categories a user asked to see more of
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct UserPreferences(BTreeSet<String>);

impl UserPreferences {
    /// Creates empty user preferences
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Builds preferences from user input, rejecting unknown categories
    pub fn parse<I, S>(categories: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for category in categories {
            let category = category.as_ref().trim().to_lowercase();
            if !is_known_category(&category) {
                return Err(AppError::InvalidInput(format!(
                    "Unknown category: {}",
                    category
                )));
            }
            set.insert(category);
        }
        Ok(Self(set))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.contains(category)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl FromIterator<String> for UserPreferences {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Everything the recommendation tiers need to know about a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub watch_history: Vec<WatchHistoryEntry>,
    pub preferences: UserPreferences,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            watch_history: Vec::new(),
            preferences: UserPreferences::new(),
        }
    }

    /// Upserts a history entry keyed by video id: a rewatch refreshes the timestamp
    pub fn record_watch(&mut self, video_id: &str, watched_at: DateTime<Utc>) {
        if let Some(existing) = self
            .watch_history
            .iter_mut()
            .find(|entry| entry.video_id == video_id)
        {
            existing.watched_at = watched_at;
        } else {
            self.watch_history
                .push(WatchHistoryEntry::new(video_id, watched_at));
        }
    }

    /// Removes a video from history, returning whether it was present
    pub fn remove_watch(&mut self, video_id: &str) -> bool {
        let before = self.watch_history.len();
        self.watch_history.retain(|entry| entry.video_id != video_id);
        self.watch_history.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_new_profile_is_empty() {
        let profile = UserProfile::new("u1");
        assert!(profile.watch_history.is_empty());
        assert!(profile.preferences.is_empty());
    }

    #[test]
    fn test_record_watch_appends_new_video() {
        let mut profile = UserProfile::new("u1");
        profile.record_watch("a", at(1));
        profile.record_watch("b", at(2));
        assert_eq!(profile.watch_history.len(), 2);
    }

    #[test]
    fn test_rewatch_refreshes_timestamp() {
        let mut profile = UserProfile::new("u1");
        profile.record_watch("a", at(1));
        profile.record_watch("a", at(1) + Duration::hours(5));
        assert_eq!(profile.watch_history.len(), 1);
        assert_eq!(profile.watch_history[0].watched_at, at(6));
    }

    #[test]
    fn test_remove_watch() {
        let mut profile = UserProfile::new("u1");
        profile.record_watch("a", at(1));
        assert!(profile.remove_watch("a"));
        assert!(!profile.remove_watch("a"));
        assert!(profile.watch_history.is_empty());
    }

    #[test]
    fn test_parse_preferences_normalizes_and_dedups() {
        let prefs = UserPreferences::parse(["Sports", "sports ", "science"]).unwrap();
        assert_eq!(prefs.len(), 2);
        assert!(prefs.contains("sports"));
        assert_eq!(prefs.to_vec(), vec!["science".to_string(), "sports".to_string()]);
    }

    #[test]
    fn test_parse_preferences_rejects_unknown() {
        let err = UserPreferences::parse(["sports", "knitting"]).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_preferences_serialize_as_array() {
        let prefs = UserPreferences::parse(["world", "crime"]).unwrap();
        let json = serde_json::to_string(&prefs).unwrap();
        assert_eq!(json, r#"["crime","world"]"#);
    }
}
