//! Roster and starting-five data supplied by the surrounding match/team layer.

use crate::token::PlayerId;
use serde::{Deserialize, Serialize};

/// Number of position slots in a starting lineup.
pub const STARTER_SLOTS: usize = 5;

/// A known player in the team pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl PlayerRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(id),
            name: name.into(),
            number: None,
            photo: None,
        }
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }
}

/// Player pool plus the starters array, indexed 0..5 for position slots 1..=5.
///
/// Starters may be `None` before the lineup is confirmed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub players: Vec<PlayerRecord>,
    #[serde(default)]
    pub starters: [Option<PlayerId>; STARTER_SLOTS],
}

impl Roster {
    pub fn new(players: Vec<PlayerRecord>) -> Self {
        Self {
            players,
            starters: Default::default(),
        }
    }

    /// Set the starters array from a list of ids (extra entries are ignored).
    pub fn with_starters<I, P>(mut self, starters: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PlayerId>,
    {
        self.starters = Default::default();
        for (slot, id) in self.starters.iter_mut().zip(starters) {
            *slot = Some(id.into());
        }
        self
    }

    pub fn player(&self, id: &PlayerId) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// 1-based position slot of a player in the starting five.
    pub fn slot_of(&self, id: &PlayerId) -> Option<usize> {
        self.starters
            .iter()
            .position(|s| s.as_ref() == Some(id))
            .map(|index| index + 1)
    }

    /// The starter occupying a 1-based slot, if it is set.
    pub fn starter_id(&self, slot: usize) -> Option<&PlayerId> {
        slot.checked_sub(1)
            .and_then(|index| self.starters.get(index))
            .and_then(Option::as_ref)
    }

    /// The full record of the starter at a 1-based slot, if known to the pool.
    pub fn starter(&self, slot: usize) -> Option<&PlayerRecord> {
        self.starter_id(slot).and_then(|id| self.player(id))
    }

    /// Put a player into a 1-based slot. Returns false for an out-of-range slot.
    pub fn set_starter(&mut self, slot: usize, id: Option<PlayerId>) -> bool {
        match slot.checked_sub(1).and_then(|index| self.starters.get_mut(index)) {
            Some(entry) => {
                *entry = id;
                true
            }
            None => false,
        }
    }

    /// Swap `new` into whatever slot `old` occupies. Returns the slot replaced.
    pub fn replace_starter(&mut self, old: &PlayerId, new: PlayerId) -> Option<usize> {
        let slot = self.slot_of(old)?;
        self.set_starter(slot, Some(new));
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(vec![
            PlayerRecord::new("a", "Ana").with_number(4),
            PlayerRecord::new("b", "Bo"),
            PlayerRecord::new("c", "Cy"),
        ])
        .with_starters(["a", "b", "c", "d"])
    }

    #[test]
    fn test_slot_lookup() {
        let roster = roster();
        assert_eq!(roster.slot_of(&PlayerId::from("c")), Some(3));
        assert_eq!(roster.slot_of(&PlayerId::from("z")), None);
        assert_eq!(roster.starter_id(1), Some(&PlayerId::from("a")));
        assert_eq!(roster.starter_id(0), None);
        assert_eq!(roster.starter_id(5), None);
        assert_eq!(roster.starter_id(6), None);
    }

    #[test]
    fn test_starter_requires_known_player() {
        let roster = roster();
        assert_eq!(roster.starter(1).map(|p| p.name.as_str()), Some("Ana"));
        // "d" is a starter but not in the pool
        assert!(roster.starter_id(4).is_some());
        assert!(roster.starter(4).is_none());
    }

    #[test]
    fn test_replace_starter() {
        let mut roster = roster();
        assert_eq!(roster.replace_starter(&PlayerId::from("b"), PlayerId::from("e")), Some(2));
        assert_eq!(roster.starter_id(2), Some(&PlayerId::from("e")));
        assert_eq!(roster.replace_starter(&PlayerId::from("b"), PlayerId::from("f")), None);
        assert!(!roster.set_starter(9, None));
    }

    #[test]
    fn test_deserialize_unconfirmed_lineup() {
        let json = r#"{"players":[{"id":"a","name":"Ana"}],"starters":["a",null,null,null,null]}"#;
        let roster: Roster = serde_json::from_str(json).unwrap();
        assert_eq!(roster.starter_id(1), Some(&PlayerId::from("a")));
        assert_eq!(roster.starter_id(2), None);
    }
}
