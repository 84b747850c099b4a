//! Persistent cache of discard decisions.
//!
//! Entries are keyed by model, discard limit and a suit-agnostic rendering
//! of the hand, so `AS KS 2D 3C 4H` and `AH KH 2C 3D 4S` share one entry.
//! Stored decisions name positions in that sorted rendering rather than
//! hand slots, so a hit maps back onto the same cards however they were
//! dealt.
//! The cache is loaded once when an agent is created and written back by
//! [`DecisionCache::flush`], normally at the end of a run.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use fivedraw_engine::agent::DiscardDecision;
use fivedraw_engine::cards::{Card, Suit};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct DecisionCache {
    path: Option<PathBuf>,
    entries: BTreeMap<String, DiscardDecision>,
    dirty: bool,
}

impl DecisionCache {
    /// A cache that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the cache at `path`. A missing file starts an empty cache; an
    /// unreadable one is logged and replaced on the next flush.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring corrupt decision cache");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: Some(path),
            entries,
            dirty: false,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&DiscardDecision> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, decision: DiscardDecision) {
        self.entries.insert(key, decision);
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes the cache back if it changed since loading.
    pub fn flush(&mut self) -> Result<(), CacheError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, text)?;
        self.dirty = false;
        Ok(())
    }
}

/// Hand slots in canonical order: `canonical_order(hand)[i]` is the slot
/// holding the `i`-th card of [`canonical_hand`].
pub fn canonical_order(hand: &[Card]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..hand.len()).collect();
    order.sort_by(|&a, &b| hand[b].cmp(&hand[a]));
    order
}

/// Rewrites a decision's slots as canonical positions for storage.
pub fn to_canonical(hand: &[Card], decision: &DiscardDecision) -> DiscardDecision {
    let order = canonical_order(hand);
    let mut positions: Vec<usize> = decision
        .discard_indices
        .iter()
        .map(|slot| order.iter().position(|s| s == slot).unwrap_or(*slot))
        .collect();
    positions.sort_unstable();
    DiscardDecision {
        discard_indices: positions,
        rationale: decision.rationale.clone(),
    }
}

/// Maps a stored decision back onto the slots of `hand`. `None` when a
/// stored position does not exist in this hand.
///
/// ```
/// use fivedraw_ai::cache::{from_canonical, to_canonical};
/// use fivedraw_engine::agent::DiscardDecision;
/// use fivedraw_engine::cards::parse_cards;
///
/// let dealt = parse_cards("AS KS 2D 3C 4H").unwrap();
/// let stored = to_canonical(&dealt, &DiscardDecision::new(vec![2, 3, 4]));
/// let again = parse_cards("4S 3D 2C KH AH").unwrap();
/// assert_eq!(from_canonical(&again, &stored).unwrap().discard_indices, vec![0, 1, 2]);
/// ```
pub fn from_canonical(hand: &[Card], stored: &DiscardDecision) -> Option<DiscardDecision> {
    let order = canonical_order(hand);
    let mut slots = stored
        .discard_indices
        .iter()
        .map(|&p| order.get(p).copied())
        .collect::<Option<Vec<usize>>>()?;
    slots.sort_unstable();
    Some(DiscardDecision {
        discard_indices: slots,
        rationale: stored.rationale.clone(),
    })
}

/// Hand rendering that ignores which suits are held, only how they group.
///
/// Cards are sorted by rank then suit, highest first, and each suit is
/// relabelled `a`, `b`, `c`, `d` in order of first appearance.
///
/// ```
/// use fivedraw_ai::cache::canonical_hand;
/// use fivedraw_engine::cards::parse_cards;
///
/// let a = parse_cards("AS KS 2D 3C 4H").unwrap();
/// let b = parse_cards("4S 3D 2C KH AH").unwrap();
/// assert_eq!(canonical_hand(&a), "Aa-Ka-4b-3c-2d");
/// assert_eq!(canonical_hand(&a), canonical_hand(&b));
/// ```
pub fn canonical_hand(hand: &[Card]) -> String {
    let mut sorted = hand.to_vec();
    sorted.sort_by(|a, b| b.cmp(a));
    let mut seen: Vec<Suit> = Vec::with_capacity(4);
    sorted
        .iter()
        .map(|c| {
            let label = match seen.iter().position(|&s| s == c.suit) {
                Some(i) => i,
                None => {
                    seen.push(c.suit);
                    seen.len() - 1
                }
            };
            format!("{}{}", c.rank.symbol(), (b'a' + label as u8) as char)
        })
        .collect::<Vec<_>>()
        .join("-")
}

pub fn cache_key(model: &str, max_discards: usize, hand: &[Card]) -> String {
    format!("{model}|{max_discards}|{}", canonical_hand(hand))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fivedraw_engine::cards::parse_cards;

    #[test]
    fn key_includes_model_and_limit() {
        let hand = parse_cards("AS KS 2D 3C 4H").unwrap();
        assert_eq!(cache_key("m1", 3, &hand), "m1|3|Aa-Ka-4b-3c-2d");
        assert_ne!(cache_key("m1", 3, &hand), cache_key("m1", 5, &hand));
    }

    #[test]
    fn paired_ranks_sort_by_suit() {
        let hand = parse_cards("9C 9S 9H 2D 2C").unwrap();
        assert_eq!(canonical_hand(&hand), "9a-9b-9c-2d-2c");
    }

    #[test]
    fn stored_positions_follow_the_cards_not_the_slots() {
        let dealt = parse_cards("9C 2D 9S KH 2C").unwrap();
        assert_eq!(canonical_order(&dealt), vec![3, 2, 0, 1, 4]);
        let keep_nines = DiscardDecision::new(vec![1, 3, 4]).with_rationale("keep nines");
        let stored = to_canonical(&dealt, &keep_nines);
        assert_eq!(stored.discard_indices, vec![0, 3, 4]);

        let reordered = parse_cards("2S KD 9C 2C 9H").unwrap();
        assert_eq!(canonical_hand(&reordered), canonical_hand(&dealt));
        let mapped = from_canonical(&reordered, &stored).unwrap();
        assert_eq!(mapped.discard_indices, vec![0, 1, 3]);
        assert_eq!(mapped.rationale.as_deref(), Some("keep nines"));

        let corrupt = DiscardDecision::new(vec![7]);
        assert!(from_canonical(&reordered, &corrupt).is_none());
    }

    #[test]
    fn flush_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("decisions.json");
        let mut cache = DecisionCache::load(&path).unwrap();
        assert!(cache.is_empty());
        cache.insert(
            "k".to_string(),
            DiscardDecision::new(vec![1, 2]).with_rationale("keep aces"),
        );
        assert!(cache.is_dirty());
        cache.flush().unwrap();
        assert!(!cache.is_dirty());

        let reloaded = DecisionCache::load(&path).unwrap();
        assert_eq!(reloaded.get("k").unwrap().discard_indices, vec![1, 2]);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.json");
        fs::write(&path, "{not json").unwrap();
        let cache = DecisionCache::load(&path).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn clean_cache_does_not_touch_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.json");
        let mut cache = DecisionCache::load(&path).unwrap();
        cache.flush().unwrap();
        assert!(!path.exists());
    }
}
