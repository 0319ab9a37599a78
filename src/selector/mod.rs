//! Weighted selection of past prayers for review.
//!
//! Each review round picks a bounded batch from the unresolved entries.
//! Candidates are grouped into tiers by their tag's weight; within a tier the
//! least-shown entries go first, and ties are broken by uniform random
//! sampling. A per-session `already_shown` set guarantees no entry is
//! surfaced twice in one run, and successive rounds start one tier lower so
//! every non-empty tier gets visited before the cycle wraps back to the top.

use crate::constants::DEFAULT_TAG_WEIGHT;
use crate::model::Entry;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::index;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Selects up to `batch_size` entries for one review round.
///
/// Eligible entries are unresolved, not yet shown this session, and not
/// created `today` (same-day prayers are not immediately re-surfaced).
/// Tiers are visited from `priority_tier` down to 1; within each tier only
/// the sub-group with the lowest display count is sampled, uniformly and
/// without replacement, until the quota is filled or the tiers run out.
///
/// Selected entries are added to `already_shown`. A batch shorter than
/// `batch_size` means no more eligible entries exist; it is not an error.
pub fn select_batch(
    entries: &[Entry],
    weights: &HashMap<String, u32>,
    batch_size: usize,
    priority_tier: u32,
    already_shown: &mut HashSet<Uuid>,
    today: NaiveDate,
    rng: &mut StdRng,
) -> Vec<Uuid> {
    let mut picked = Vec::new();
    if batch_size == 0 {
        return picked;
    }

    let mut by_weight: HashMap<u32, Vec<&Entry>> = HashMap::new();
    for entry in entries {
        if entry.is_resolved() || already_shown.contains(&entry.id) || entry.created_on == today {
            continue;
        }
        let weight = weights
            .get(&entry.tag)
            .copied()
            .unwrap_or(DEFAULT_TAG_WEIGHT);
        by_weight.entry(weight).or_default().push(entry);
    }

    let mut quota = batch_size;
    let mut tier = priority_tier;
    while tier > 0 && quota > 0 {
        if let Some(bucket) = by_weight.get(&tier) {
            if let Some(lowest) = bucket.iter().map(|e| e.display_count).min() {
                let pool: Vec<&Entry> = bucket
                    .iter()
                    .filter(|e| e.display_count == lowest)
                    .copied()
                    .collect();
                let take = quota.min(pool.len());
                for idx in index::sample(rng, pool.len(), take) {
                    let entry = pool[idx];
                    picked.push(entry.id);
                    already_shown.insert(entry.id);
                }
                quota -= take;
            }
        }
        tier -= 1;
    }

    picked
}

/// Round-robin tier cycling across review rounds within a session.
///
/// Callers start at the highest tier and pass the returned value as the next
/// round's `priority_tier`, so all weight tiers get visited before wrapping
/// back to the top.
pub fn next_tier(tier: u32, max_tier: u32) -> u32 {
    if tier > 1 {
        tier - 1
    } else {
        max_tier
    }
}
