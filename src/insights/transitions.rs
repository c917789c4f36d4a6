use std::collections::BTreeMap;

use super::types::{DailySummary, Transition, TransitionCount};

/// Group transitions by `(from_room, to_room)`. Output is ordered by room pair.
pub fn count_transitions(transitions: &[Transition]) -> Vec<TransitionCount> {
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for transition in transitions {
        *counts
            .entry((transition.from_room.as_str(), transition.to_room.as_str()))
            .or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((from_room, to_room), count)| TransitionCount {
            from_room: from_room.to_string(),
            to_room: to_room.to_string(),
            count,
        })
        .collect()
}

impl DailySummary {
    pub fn transition_counts(&self) -> Vec<TransitionCount> {
        count_transitions(&self.transitions)
    }
}
