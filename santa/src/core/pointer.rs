//! Typed giver → recipient mapping and its validation rules.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;

use crate::core::types::ParticipantId;

/// Overall shape of a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerState {
    /// Every entry is unset (or there are no entries).
    Unset,
    /// Every entry names a recipient.
    Assigned,
    /// Some entries are set and some are not. Never passes validation.
    Partial,
}

/// Mapping from each giver to the participant they buy a gift for.
///
/// Entries keep insertion order. A `None` value means no recipient has been
/// drawn yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pointer {
    entries: IndexMap<ParticipantId, Option<ParticipantId>>,
}

impl Pointer {
    /// Pointer with an unset entry for every id.
    pub fn unset(ids: impl IntoIterator<Item = ParticipantId>) -> Self {
        ids.into_iter().map(|id| (id, None)).collect()
    }

    /// Fully assigned pointer built from `(giver, recipient)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ParticipantId, ParticipantId)>) -> Self {
        pairs
            .into_iter()
            .map(|(giver, recipient)| (giver, Some(recipient)))
            .collect()
    }

    pub fn get(&self, giver: ParticipantId) -> Option<ParticipantId> {
        self.entries.get(&giver).copied().flatten()
    }

    pub fn contains(&self, giver: ParticipantId) -> bool {
        self.entries.contains_key(&giver)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParticipantId, Option<ParticipantId>)> + '_ {
        self.entries.iter().map(|(giver, recipient)| (*giver, *recipient))
    }

    pub fn givers(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.entries.keys().copied()
    }

    pub fn state(&self) -> PointerState {
        let set = self.entries.values().filter(|value| value.is_some()).count();
        if set == 0 {
            PointerState::Unset
        } else if set == self.entries.len() {
            PointerState::Assigned
        } else {
            PointerState::Partial
        }
    }

    pub(crate) fn insert_unset(&mut self, giver: ParticipantId) {
        self.entries.insert(giver, None);
    }

    pub(crate) fn remove(&mut self, giver: ParticipantId) -> bool {
        self.entries.shift_remove(&giver).is_some()
    }

    pub(crate) fn clear_assignments(&mut self) {
        for value in self.entries.values_mut() {
            *value = None;
        }
    }
}

impl FromIterator<(ParticipantId, Option<ParticipantId>)> for Pointer {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, Option<ParticipantId>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Check `pointer` against the registered participant ids.
///
/// Rules:
/// - Giver set equals `members` exactly
/// - Entries are all unset or all set
/// - No giver is assigned to themselves
/// - Every recipient is a registered participant
/// - A fully set pointer gives every participant exactly one giver
///
/// Returns a list of stable error messages (empty when valid).
pub fn validate_pointer(pointer: &Pointer, members: &[ParticipantId]) -> Vec<String> {
    let mut errors = Vec::new();
    let member_set: BTreeSet<ParticipantId> = members.iter().copied().collect();
    let giver_set: BTreeSet<ParticipantId> = pointer.givers().collect();

    let missing: Vec<String> = member_set
        .difference(&giver_set)
        .map(ToString::to_string)
        .collect();
    if !missing.is_empty() {
        errors.push(format!("missing givers: {}", missing.join(", ")));
    }
    let unexpected: Vec<String> = giver_set
        .difference(&member_set)
        .map(ToString::to_string)
        .collect();
    if !unexpected.is_empty() {
        errors.push(format!("unknown givers: {}", unexpected.join(", ")));
    }

    match pointer.state() {
        PointerState::Unset => return errors,
        PointerState::Partial => {
            let unset: Vec<String> = pointer
                .iter()
                .filter(|(_, recipient)| recipient.is_none())
                .map(|(giver, _)| giver.to_string())
                .collect();
            errors.push(format!(
                "pointer is partially assigned; unset givers: {}",
                unset.join(", ")
            ));
        }
        PointerState::Assigned => {}
    }

    let mut seen = HashSet::new();
    for (giver, recipient) in pointer.iter() {
        let Some(recipient) = recipient else {
            continue;
        };
        if recipient == giver {
            errors.push(format!("{} is assigned to themselves", giver));
        } else if !giver_set.contains(&recipient) {
            errors.push(format!("{} is assigned to non-member {}", giver, recipient));
        }
        if !seen.insert(recipient) {
            errors.push(format!("{} is assigned to more than one giver", recipient));
        }
    }

    errors
}
