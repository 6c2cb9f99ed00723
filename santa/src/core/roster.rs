//! The exchange roster: participants, wishlists and the gift assignment.
//!
//! Every mutation reports expected misuse (duplicate names, unknown ids,
//! invalid assignments) through its return value instead of an error. Callers
//! are expected to check the returned flag.

use std::fmt;

use rand::Rng;
use tracing::debug;

use crate::core::draw::draw_recipients;
use crate::core::pointer::{Pointer, PointerState, validate_pointer};
use crate::core::types::{Participant, ParticipantId};

/// A named gift exchange with a budget.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    name: String,
    budget: f64,
    /// Registration order.
    participants: Vec<Participant>,
    /// Keys always equal the participant ids.
    pointer: Pointer,
}

impl Roster {
    pub fn new(name: impl Into<String>, budget: f64) -> Self {
        Self {
            name: name.into(),
            budget,
            participants: Vec::new(),
            pointer: Pointer::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// The participant `giver` buys a gift for, once drawn.
    pub fn recipient_of(&self, giver: ParticipantId) -> Option<&Participant> {
        self.pointer
            .get(giver)
            .and_then(|recipient| self.participant(recipient))
    }

    /// Register `name` under `id`.
    ///
    /// Uniqueness is checked on the display name: a second participant with
    /// an existing name is rejected even when its id is new. An id that is
    /// already registered is rejected as well.
    ///
    /// The new participant starts with an empty wishlist and no recipient. If
    /// gifts were already drawn, the pointer is partial until the next
    /// [`Roster::randomize`].
    pub fn register(&mut self, name: impl Into<String>, id: ParticipantId) -> bool {
        let name = name.into();
        if self.participants.iter().any(|p| p.name == name) {
            debug!(%id, name = %name, "register rejected: duplicate name");
            return false;
        }
        if self.participant(id).is_some() {
            debug!(%id, name = %name, "register rejected: id already registered");
            return false;
        }
        self.participants.push(Participant::new(id, name));
        self.pointer.insert_unset(id);
        true
    }

    /// Append `wish` to the wishlist of `id`. Unknown ids are ignored.
    pub fn add_wish(&mut self, id: ParticipantId, wish: impl Into<String>) {
        match self.participants.iter_mut().find(|p| p.id == id) {
            Some(participant) => participant.wishlist.push(wish.into()),
            None => debug!(%id, "add_wish ignored: unknown participant"),
        }
    }

    /// Remove `id` along with its wishlist and pointer entry.
    ///
    /// A non-empty pointer is redrawn over the remaining participants.
    pub fn remove<R: Rng>(&mut self, id: ParticipantId, rng: &mut R) -> bool {
        let Some(index) = self.participants.iter().position(|p| p.id == id) else {
            debug!(%id, "remove rejected: unknown participant");
            return false;
        };
        self.participants.remove(index);
        self.pointer.remove(id);
        if !self.pointer.is_empty() {
            self.randomize(rng);
        }
        true
    }

    /// Draw a fresh recipient for every participant.
    ///
    /// Returns `false` and leaves every entry unset when there is a single
    /// participant, since nobody else is available to receive their gift.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) -> bool {
        match draw_recipients(&self.ids(), rng) {
            Some(pairs) => {
                self.pointer = Pointer::from_pairs(pairs);
                debug!(exchange = %self.name, participants = self.len(), "pointer randomized");
                true
            }
            None => {
                self.pointer.clear_assignments();
                debug!(exchange = %self.name, "randomize skipped: single participant");
                false
            }
        }
    }

    /// Validation messages for `pointer` against the current participants.
    pub fn check_pointer(&self, pointer: &Pointer) -> Vec<String> {
        validate_pointer(pointer, &self.ids())
    }

    /// Replace the pointer wholesale if `pointer` passes validation.
    pub fn set_pointer(&mut self, pointer: Pointer) -> bool {
        self.try_set_pointer(pointer).is_ok()
    }

    /// Like [`Roster::set_pointer`], but hands back the validation messages on
    /// rejection. The current pointer is untouched in that case.
    pub fn try_set_pointer(&mut self, pointer: Pointer) -> Result<(), Vec<String>> {
        let errors = self.check_pointer(&pointer);
        if !errors.is_empty() {
            debug!(exchange = %self.name, errors = %errors.join("; "), "set_pointer rejected");
            return Err(errors);
        }
        self.pointer = pointer;
        Ok(())
    }

    pub fn pointer_state(&self) -> PointerState {
        self.pointer.state()
    }
}

impl fmt::Display for Roster {
    /// `"<name>:"` followed by one `"- <name>: [<wishes>]"` line per
    /// participant. No trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for participant in &self.participants {
            write!(f, "\n- {}: [", participant.name)?;
            for (index, wish) in participant.wishlist.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(&quote_wish(wish))?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// Quote a wish the way a list literal would: single quotes, unless the text
/// contains a single quote and no double quote.
fn quote_wish(wish: &str) -> String {
    let quote = if wish.contains('\'') && !wish.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(wish.len() + 2);
    out.push(quote);
    for ch in wish.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let code = u32::from(c);
                if code < 0x100 {
                    out.push_str(&format!("\\x{:02x}", code));
                } else {
                    out.push_str(&format!("\\u{:04x}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
