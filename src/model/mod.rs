//! Plain data types for prayers, tags, parameters and session bookkeeping.
//!
//! Entities here are passive data holders: they do not register themselves
//! anywhere on construction. The [`crate::store::Store`] owns the collections
//! and hands out read access; mutation happens through discrete store methods
//! so that selection logic stays side-effect-free.

use crate::constants::DEFAULT_TAG_WEIGHT;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A single prayer record.
///
/// Entries are never deleted; answered prayers keep their record and are
/// marked resolved instead. `display_count` only ever grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identity, used to track what has been shown within a session.
    pub id: Uuid,
    /// The prayer text. Non-empty.
    pub content: String,
    /// Category name. Non-empty; defaults to the configured fallback tag.
    pub tag: String,
    /// Date the prayer was recorded.
    pub created_on: NaiveDate,
    /// How the prayer was answered, once it has been.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Date the resolution was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_on: Option<NaiveDate>,
    /// Number of times this entry has been re-surfaced for review.
    #[serde(default)]
    pub display_count: u32,
}

impl Entry {
    /// Creates a fresh, unresolved entry recorded on `created_on`.
    pub fn new(content: impl Into<String>, tag: impl Into<String>, created_on: NaiveDate) -> Self {
        Entry {
            id: Uuid::new_v4(),
            content: content.into(),
            tag: tag.into(),
            created_on,
            resolution: None,
            resolved_on: None,
            display_count: 0,
        }
    }

    /// Whether this prayer has been marked answered.
    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    /// Records an answer for this prayer.
    pub fn resolve(&mut self, text: impl Into<String>, date: NaiveDate) {
        self.resolution = Some(text.into());
        self.resolved_on = Some(date);
    }

    /// Bumps the display count after the entry has been shown for review.
    pub fn record_display(&mut self) {
        self.display_count += 1;
    }
}

/// A named grouping with a priority weight, used to bias review selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    /// Relative priority. Must be >= 1.
    pub weight: u32,
}

impl Tag {
    pub fn new(name: impl Into<String>, weight: u32) -> Self {
        Tag {
            name: name.into(),
            weight,
        }
    }
}

/// Tunable parameters and session carryover, persisted as `params.json`.
///
/// The tunables (`batch_size`, `fallback_tag`) are read once at startup and
/// never mutated by the core; the carryover fields are updated during the run
/// and written back at orderly shutdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Number of past prayers surfaced per review round.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Tag assigned when the category prompt is left blank.
    #[serde(default = "default_fallback_tag")]
    pub fallback_tag: String,
    /// Index of the devotional panel set shown last session.
    #[serde(default)]
    pub last_panel_set: usize,
    /// Consecutive-day prayer streak.
    #[serde(default)]
    pub streak: u32,
    /// Date of the most recent session.
    #[serde(default)]
    pub last_prayer_date: Option<NaiveDate>,
}

fn default_batch_size() -> usize {
    crate::constants::DEFAULT_BATCH_SIZE
}

fn default_fallback_tag() -> String {
    crate::constants::DEFAULT_FALLBACK_TAG.to_string()
}

impl Default for Params {
    fn default() -> Self {
        Params {
            batch_size: default_batch_size(),
            fallback_tag: default_fallback_tag(),
            last_panel_set: 0,
            streak: 0,
            last_prayer_date: None,
        }
    }
}

impl Params {
    /// Updates the day streak for a session starting on `today`.
    ///
    /// A session the day after the last one extends the streak; a second
    /// session on the same day leaves it alone; any gap resets it to 1.
    pub fn update_streak(&mut self, today: NaiveDate) {
        let yesterday = today - Duration::days(1);
        match self.last_prayer_date {
            Some(last) if last == yesterday => self.streak += 1,
            Some(last) if last == today => {}
            _ => self.streak = 1,
        }
        self.last_prayer_date = Some(today);
    }
}

/// Per-run counters. All start at zero and only grow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// New prayers recorded this run.
    pub added: u32,
    /// Past prayers shown for review this run.
    pub reviewed: u32,
    /// Prayers marked answered this run.
    pub resolved: u32,
}

/// Builds the read-only tag -> entries index for unresolved entries.
///
/// Derived once per session load and rebuilt wholesale rather than patched
/// in place.
pub fn tag_index(entries: &[Entry]) -> BTreeMap<String, Vec<Uuid>> {
    let mut index: BTreeMap<String, Vec<Uuid>> = BTreeMap::new();
    for entry in entries.iter().filter(|e| !e.is_resolved()) {
        index.entry(entry.tag.clone()).or_default().push(entry.id);
    }
    index
}

/// Unions the persisted tag catalogue with tags discovered on loaded entries.
///
/// Discovered tags get the default weight. Catalogue order is preserved;
/// discovered tags follow in entry order.
pub fn union_tags(mut catalogue: Vec<Tag>, entries: &[Entry]) -> Vec<Tag> {
    for entry in entries {
        if !catalogue.iter().any(|t| t.name == entry.tag) {
            catalogue.push(Tag::new(entry.tag.clone(), DEFAULT_TAG_WEIGHT));
        }
    }
    catalogue
}

/// The highest weight present in the catalogue, used as the starting review tier.
pub fn max_weight(tags: &[Tag]) -> u32 {
    tags.iter()
        .map(|t| t.weight)
        .max()
        .unwrap_or(DEFAULT_TAG_WEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_entry_is_unresolved() {
        let entry = Entry::new("Pray for family", "Family", date(2024, 3, 1));
        assert!(!entry.is_resolved());
        assert_eq!(entry.display_count, 0);
        assert!(entry.resolved_on.is_none());
    }

    #[test]
    fn test_resolve_sets_text_and_date() {
        let mut entry = Entry::new("Pray for family", "Family", date(2024, 3, 1));
        entry.resolve("Family reunited", date(2024, 4, 2));
        assert!(entry.is_resolved());
        assert_eq!(entry.resolution.as_deref(), Some("Family reunited"));
        assert_eq!(entry.resolved_on, Some(date(2024, 4, 2)));
    }

    #[test]
    fn test_streak_extends_on_consecutive_days() {
        let mut params = Params {
            streak: 4,
            last_prayer_date: Some(date(2024, 3, 1)),
            ..Params::default()
        };
        params.update_streak(date(2024, 3, 2));
        assert_eq!(params.streak, 5);
        assert_eq!(params.last_prayer_date, Some(date(2024, 3, 2)));
    }

    #[test]
    fn test_streak_unchanged_on_same_day() {
        let mut params = Params {
            streak: 4,
            last_prayer_date: Some(date(2024, 3, 2)),
            ..Params::default()
        };
        params.update_streak(date(2024, 3, 2));
        assert_eq!(params.streak, 4);
    }

    #[test]
    fn test_streak_resets_after_gap() {
        let mut params = Params {
            streak: 9,
            last_prayer_date: Some(date(2024, 2, 1)),
            ..Params::default()
        };
        params.update_streak(date(2024, 3, 2));
        assert_eq!(params.streak, 1);
    }

    #[test]
    fn test_streak_starts_at_one_when_no_history() {
        let mut params = Params::default();
        params.update_streak(date(2024, 3, 2));
        assert_eq!(params.streak, 1);
        assert_eq!(params.last_prayer_date, Some(date(2024, 3, 2)));
    }

    #[test]
    fn test_tag_index_skips_resolved_entries() {
        let mut answered = Entry::new("Answered", "Family", date(2024, 1, 1));
        answered.resolve("Yes", date(2024, 2, 1));
        let open = Entry::new("Open", "Family", date(2024, 1, 2));
        let other = Entry::new("Other", "Work", date(2024, 1, 3));

        let index = tag_index(&[answered, open.clone(), other.clone()]);
        assert_eq!(index.len(), 2);
        assert_eq!(index["Family"], vec![open.id]);
        assert_eq!(index["Work"], vec![other.id]);
    }

    #[test]
    fn test_union_tags_adds_discovered_at_default_weight() {
        let catalogue = vec![Tag::new("Family", 3)];
        let entries = vec![
            Entry::new("a", "Family", date(2024, 1, 1)),
            Entry::new("b", "Health", date(2024, 1, 2)),
        ];
        let tags = union_tags(catalogue, &entries);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0], Tag::new("Family", 3));
        assert_eq!(tags[1], Tag::new("Health", DEFAULT_TAG_WEIGHT));
    }

    #[test]
    fn test_max_weight_defaults_to_one_for_empty_catalogue() {
        assert_eq!(max_weight(&[]), 1);
        assert_eq!(max_weight(&[Tag::new("a", 2), Tag::new("b", 5)]), 5);
    }

    #[test]
    fn test_entry_round_trips_through_json() {
        let entry = Entry::new("Pray for family", "Family", date(2024, 3, 1));
        let json = serde_json::to_string(&entry).unwrap();
        // Optional fields are omitted while unresolved
        assert!(!json.contains("resolution"));
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
