//! Character-related domain events
//!
//! [`CharacterEvent`] is what observers hear about. The outcome types tell
//! the caller of a draft mutation what actually happened so it can decide
//! which events to raise.

use serde::{Deserialize, Serialize};

/// The three independent change channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CharacterEvent {
    /// Any player-visible input on the draft changed.
    StateChanged,
    /// The derived-stats cache was recomputed to different values.
    DerivedChanged,
    /// The set of choice groups or their options changed.
    ChoiceGroupsChanged,
}

impl CharacterEvent {
    pub const ALL: [CharacterEvent; 3] = [
        CharacterEvent::StateChanged,
        CharacterEvent::DerivedChanged,
        CharacterEvent::ChoiceGroupsChanged,
    ];
}

/// Outcome of changing race or class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralChange {
    /// The value was already set to this.
    Unchanged,
    /// The value changed. `dependent_cleared` is set when the subrace (for a
    /// race) or subclass (for a class) was dropped because the new record
    /// does not offer it.
    Changed { dependent_cleared: bool },
}

impl StructuralChange {
    pub fn changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// What a full refresh of the derived parts of a draft changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub derived_changed: bool,
    pub choice_groups_changed: bool,
    /// Stored choice selections were dropped or trimmed.
    pub selections_pruned: bool,
    /// Racial bonus layers, automatic grants or choice-derived grants
    /// differ from before.
    pub inputs_changed: bool,
}

impl RefreshOutcome {
    /// Events the refresh alone warrants.
    pub fn events(&self) -> Vec<CharacterEvent> {
        let mut events = Vec::new();
        if self.selections_pruned || self.inputs_changed {
            events.push(CharacterEvent::StateChanged);
        }
        if self.derived_changed {
            events.push(CharacterEvent::DerivedChanged);
        }
        if self.choice_groups_changed {
            events.push(CharacterEvent::ChoiceGroupsChanged);
        }
        events
    }
}
