//! # Reaction Aggregate
//!
//! Per-parent reaction bookkeeping: counts by kind, plus the current user's
//! own reaction id by kind. All mutation goes through the pure transition
//! methods so the two maps cannot drift apart.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::ReactionId;

/// The closed set of reaction kinds the board offers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Laugh,
    Heart,
    Wow,
    Sad,
    Angry,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 6] = [
        ReactionKind::Like,
        ReactionKind::Laugh,
        ReactionKind::Heart,
        ReactionKind::Wow,
        ReactionKind::Sad,
        ReactionKind::Angry,
    ];

    pub fn as_wire(&self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Laugh => "laugh",
            ReactionKind::Heart => "heart",
            ReactionKind::Wow => "wow",
            ReactionKind::Sad => "sad",
            ReactionKind::Angry => "angry",
        }
    }

    /// Parses a wire key. Unknown kinds yield `None`; callers drop them
    /// rather than failing the whole snapshot.
    pub fn from_wire(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_wire() == raw)
    }
}

/// One tree mutation against a parent's aggregate.
#[derive(Debug, Clone, PartialEq)]
pub enum ReactionChange {
    /// The server confirmed an add and issued this reaction id.
    Added(ReactionId),
    /// The caller's reaction of this kind was deleted.
    Removed,
}

/// Counts-by-kind plus the current user's reaction-id-by-kind.
///
/// Invariants: a kind with count 0 is absent from `counts` (never
/// present-as-zero), and a kind appears in `mine` only while its count is
/// at least 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReactionAggregate {
    counts: BTreeMap<ReactionKind, u32>,
    mine: BTreeMap<ReactionKind, ReactionId>,
}

impl ReactionAggregate {
    /// Builds an aggregate from wire parts, enforcing the invariants:
    /// zero counts are dropped, and `mine` entries without a live count
    /// are discarded.
    pub fn from_parts(
        counts: BTreeMap<ReactionKind, u32>,
        mine: BTreeMap<ReactionKind, ReactionId>,
    ) -> Self {
        let counts: BTreeMap<_, _> = counts.into_iter().filter(|(_, n)| *n > 0).collect();
        let mine = mine
            .into_iter()
            .filter(|(kind, _)| counts.contains_key(kind))
            .collect();
        Self { counts, mine }
    }

    pub fn counts(&self) -> &BTreeMap<ReactionKind, u32> {
        &self.counts
    }

    pub fn count_of(&self, kind: ReactionKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// The current user's reaction id for this kind, if they have one.
    pub fn my_reaction(&self, kind: ReactionKind) -> Option<&ReactionId> {
        self.mine.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Kinds with at least one reaction, in stable order.
    pub fn kinds_present(&self) -> impl Iterator<Item = ReactionKind> + '_ {
        self.counts.keys().copied()
    }

    /// Applies a confirmed change, returning the new aggregate.
    pub fn apply(&self, kind: ReactionKind, change: &ReactionChange) -> Self {
        match change {
            ReactionChange::Added(id) => self.with_added(kind, id.clone()),
            ReactionChange::Removed => self.with_removed(kind),
        }
    }

    /// Count +1 (initializing from absent) and records the caller's id.
    pub fn with_added(&self, kind: ReactionKind, id: ReactionId) -> Self {
        let mut next = self.clone();
        *next.counts.entry(kind).or_insert(0) += 1;
        next.mine.insert(kind, id);
        next
    }

    /// Count −1 floored at 0; the key is deleted when it reaches 0, and the
    /// caller's entry for the kind is deleted regardless of the remainder.
    pub fn with_removed(&self, kind: ReactionKind) -> Self {
        let mut next = self.clone();
        match next.counts.get_mut(&kind) {
            Some(n) if *n > 1 => *n -= 1,
            Some(_) => {
                next.counts.remove(&kind);
            }
            None => {}
        }
        next.mine.remove(&kind);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rid(raw: &str) -> ReactionId {
        ReactionId::new(raw)
    }

    #[test]
    fn add_then_remove_leaves_kind_absent() {
        let agg = ReactionAggregate::default()
            .with_added(ReactionKind::Heart, rid("r1"))
            .with_added(ReactionKind::Laugh, rid("r2"))
            .with_removed(ReactionKind::Laugh);

        assert_eq!(agg.count_of(ReactionKind::Laugh), 0);
        assert!(!agg.counts().contains_key(&ReactionKind::Laugh));
        assert!(agg.my_reaction(ReactionKind::Laugh).is_none());
        // Unrelated kinds are untouched.
        assert_eq!(agg.count_of(ReactionKind::Heart), 1);
        assert_eq!(agg.my_reaction(ReactionKind::Heart), Some(&rid("r1")));
    }

    #[test]
    fn remove_floors_at_absent_never_negative() {
        let agg = ReactionAggregate::default()
            .with_removed(ReactionKind::Sad)
            .with_removed(ReactionKind::Sad);

        assert!(agg.counts().is_empty());
        assert_eq!(agg.count_of(ReactionKind::Sad), 0);
    }

    #[test]
    fn remove_keeps_other_users_counts() {
        let counts = BTreeMap::from([(ReactionKind::Laugh, 3)]);
        let mine = BTreeMap::from([(ReactionKind::Laugh, rid("r9"))]);
        let agg = ReactionAggregate::from_parts(counts, mine).with_removed(ReactionKind::Laugh);

        assert_eq!(agg.count_of(ReactionKind::Laugh), 2);
        assert!(agg.my_reaction(ReactionKind::Laugh).is_none());
    }

    #[test]
    fn from_parts_normalizes_wire_shapes() {
        let counts = BTreeMap::from([(ReactionKind::Like, 0), (ReactionKind::Wow, 2)]);
        let mine = BTreeMap::from([
            (ReactionKind::Like, rid("stale")),
            (ReactionKind::Wow, rid("r4")),
        ]);
        let agg = ReactionAggregate::from_parts(counts, mine);

        assert!(!agg.counts().contains_key(&ReactionKind::Like));
        assert!(agg.my_reaction(ReactionKind::Like).is_none());
        assert_eq!(agg.my_reaction(ReactionKind::Wow), Some(&rid("r4")));
    }

    #[test]
    fn wire_keys_round_trip() {
        for kind in ReactionKind::ALL {
            assert_eq!(ReactionKind::from_wire(kind.as_wire()), Some(kind));
        }
        assert_eq!(ReactionKind::from_wire("sparkles"), None);
    }
}
