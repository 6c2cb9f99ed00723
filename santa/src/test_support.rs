//! Test-only helpers for building rosters and scratch exchange directories.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use tempfile::TempDir;

use crate::core::pointer::PointerState;
use crate::core::roster::Roster;
use crate::core::types::ParticipantId;
use crate::io::store::ExchangeStore;

/// Create a roster named "Test Exchange" (budget 20) with the given people.
pub fn roster_with(people: &[(i64, &str)]) -> Roster {
    let mut roster = Roster::new("Test Exchange", 20.0);
    for &(id, name) in people {
        assert!(
            roster.register(name, ParticipantId(id)),
            "register {} ({})",
            name,
            id
        );
    }
    roster
}

/// Assert the roster's pointer is a fixed-point-free bijection over its
/// participants.
pub fn assert_derangement(roster: &Roster) {
    assert_eq!(roster.pointer_state(), PointerState::Assigned);
    let ids: HashSet<ParticipantId> = roster.ids().into_iter().collect();
    let givers: HashSet<ParticipantId> = roster.pointer().givers().collect();
    assert_eq!(givers, ids, "every participant gives exactly once");

    let mut recipients = HashSet::new();
    for (giver, recipient) in roster.pointer().iter() {
        let recipient = recipient.expect("assigned");
        assert_ne!(giver, recipient, "{} assigned to themselves", giver);
        assert!(ids.contains(&recipient), "{} is not a participant", recipient);
        assert!(
            recipients.insert(recipient),
            "{} receives more than once",
            recipient
        );
    }
    assert_eq!(recipients, ids, "every participant receives exactly once");
}

/// Scratch storage directory removed on drop.
pub struct TestExchangeDir {
    dir: TempDir,
}

impl TestExchangeDir {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> ExchangeStore {
        ExchangeStore::new(self.dir.path())
    }
}
