//! Per-node UI flags and the reaction-picker offering rule.

use domains::reactions::{ReactionAggregate, ReactionKind};

/// The independent booleans a post or comment node tracks. A default node
/// is collapsed, idle, and has its picker closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeUiState {
    /// Replies visible.
    pub expanded: bool,
    /// Reply composer open.
    pub composing_reply: bool,
    /// Edit field open (comments only).
    pub editing: bool,
    /// Reaction picker open.
    pub picker_open: bool,
}

impl NodeUiState {
    /// Edit mode suppresses the reaction/reply controls in the strip.
    pub fn shows_reaction_controls(&self) -> bool {
        !self.editing
    }
}

/// Kinds the picker offers for a node: every registry kind that has no
/// count yet. A kind anyone has already started accumulating under is
/// reacted to by clicking the existing chip, not through the picker.
pub fn available_reactions(aggregate: &ReactionAggregate) -> Vec<ReactionKind> {
    ReactionKind::ALL
        .into_iter()
        .filter(|kind| !aggregate.counts().contains_key(kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::models::ReactionId;

    #[test]
    fn picker_offers_only_zero_count_kinds() {
        let agg = ReactionAggregate::default()
            .with_added(ReactionKind::Laugh, ReactionId::new("r1"))
            .with_added(ReactionKind::Heart, ReactionId::new("r2"));

        let offered = available_reactions(&agg);
        assert!(!offered.contains(&ReactionKind::Laugh));
        assert!(!offered.contains(&ReactionKind::Heart));
        assert_eq!(offered.len(), ReactionKind::ALL.len() - 2);
    }

    #[test]
    fn editing_suppresses_the_control_strip() {
        let mut state = NodeUiState::default();
        assert!(state.shows_reaction_controls());
        state.editing = true;
        assert!(!state.shows_reaction_controls());
    }
}
