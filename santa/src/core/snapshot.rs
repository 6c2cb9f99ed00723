//! Structural snapshot of a roster, the persisted form of an exchange.

use std::collections::BTreeSet;

use anyhow::{Context, Result, anyhow, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::pointer::Pointer;
use crate::core::roster::Roster;
use crate::core::types::ParticipantId;

/// Serializable roster state.
///
/// All three tables are keyed by the decimal form of the participant id and
/// share one key set, listed in registration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    pub budget: f64,
    pub people: IndexMap<String, String>,
    pub wishlist: IndexMap<String, Vec<String>>,
    pub pointer: IndexMap<String, Option<StoredId>>,
}

/// Pointer value as stored on disk.
///
/// Written as a decimal string; bare integers are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredId {
    Text(String),
    Number(i64),
}

impl StoredId {
    fn parse(&self) -> Result<ParticipantId> {
        match self {
            StoredId::Text(raw) => raw
                .parse::<ParticipantId>()
                .with_context(|| format!("invalid participant id '{}'", raw)),
            StoredId::Number(value) => Ok(ParticipantId(*value)),
        }
    }
}

impl From<ParticipantId> for StoredId {
    fn from(id: ParticipantId) -> Self {
        StoredId::Text(id.to_string())
    }
}

impl Roster {
    pub fn to_snapshot(&self) -> Snapshot {
        let mut people = IndexMap::new();
        let mut wishlist = IndexMap::new();
        let mut pointer = IndexMap::new();
        for participant in self.participants() {
            let key = participant.id.to_string();
            people.insert(key.clone(), participant.name.clone());
            wishlist.insert(key.clone(), participant.wishlist.clone());
            pointer.insert(key, self.pointer().get(participant.id).map(StoredId::from));
        }
        Snapshot {
            name: self.name().to_string(),
            budget: self.budget(),
            people,
            wishlist,
            pointer,
        }
    }

    /// Rebuild a roster from `snapshot`.
    ///
    /// Participants are registered in the order of the `people` table. The
    /// stored pointer goes through [`Roster::set_pointer`]; if it fails
    /// validation it is dropped and every participant is left unassigned.
    ///
    /// Fails on structural damage: non-integer keys, tables with different key
    /// sets, or duplicate names.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Roster> {
        ensure_same_keys(snapshot)?;

        let mut roster = Roster::new(snapshot.name.clone(), snapshot.budget);
        for (key, name) in &snapshot.people {
            let id: ParticipantId = key
                .parse()
                .with_context(|| format!("invalid participant key '{}'", key))?;
            if !roster.register(name.clone(), id) {
                bail!("duplicate participant '{}' (id {})", name, id);
            }
            if let Some(wishes) = snapshot.wishlist.get(key) {
                for wish in wishes {
                    roster.add_wish(id, wish.clone());
                }
            }
        }

        let pointer = parse_pointer(&snapshot.pointer)?;
        if !roster.set_pointer(pointer) {
            debug!(exchange = %snapshot.name, "stored pointer dropped: failed validation");
        }
        Ok(roster)
    }
}

fn ensure_same_keys(snapshot: &Snapshot) -> Result<()> {
    let people: BTreeSet<&String> = snapshot.people.keys().collect();
    let wishlist: BTreeSet<&String> = snapshot.wishlist.keys().collect();
    let pointer: BTreeSet<&String> = snapshot.pointer.keys().collect();
    if people != wishlist {
        return Err(anyhow!("wishlist keys do not match people keys"));
    }
    if people != pointer {
        return Err(anyhow!("pointer keys do not match people keys"));
    }
    Ok(())
}

fn parse_pointer(table: &IndexMap<String, Option<StoredId>>) -> Result<Pointer> {
    table
        .iter()
        .map(|(key, value)| {
            let giver: ParticipantId = key
                .parse()
                .with_context(|| format!("invalid pointer key '{}'", key))?;
            let recipient = value.as_ref().map(StoredId::parse).transpose()?;
            Ok((giver, recipient))
        })
        .collect()
}
