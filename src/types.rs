//! Core value types shared by the settings editor and its collaborators

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

use crate::constants::{characters, shortcuts};

/// Index into the fixed character roster (0-11)
pub type CharacterId = u8;

/// Accept any JSON integer as a character id.
///
/// Values that do not fit a `CharacterId` become `CharacterId::MAX`, which is
/// out of roster range, so the load-time repairs treat them like any other
/// unknown character instead of the whole file failing to parse.
pub(crate) fn deserialize_character_id<'de, D>(deserializer: D) -> Result<CharacterId, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(CharacterId::try_from(raw).unwrap_or_else(|_| {
        warn!(character = raw, "character id does not fit, treating as unknown");
        CharacterId::MAX
    }))
}

/// Display name for a character id, `None` when out of range
pub fn character_name(id: CharacterId) -> Option<&'static str> {
    characters::NAMES.get(id as usize).copied()
}

/// A bindable action: select one character, or step through the cycling order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Shortcut {
    Character(CharacterId),
    PreviousCharacter,
    NextCharacter,
}

impl Shortcut {
    /// Every shortcut in the enumeration: 12 character selectors, then previous/next
    pub fn all() -> impl Iterator<Item = Shortcut> {
        (0..characters::COUNT)
            .map(Shortcut::Character)
            .chain([Shortcut::PreviousCharacter, Shortcut::NextCharacter])
    }

    /// Identifier used as the key in the save file (`"0"`..`"11"`, `previousCharacter`, `nextCharacter`)
    pub fn key(&self) -> String {
        match self {
            Shortcut::Character(id) => id.to_string(),
            Shortcut::PreviousCharacter => shortcuts::PREVIOUS_CHARACTER.to_string(),
            Shortcut::NextCharacter => shortcuts::NEXT_CHARACTER.to_string(),
        }
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shortcut::Character(id) => match character_name(*id) {
                Some(name) => write!(f, "{name}"),
                None => write!(f, "character {id}"),
            },
            Shortcut::PreviousCharacter => write!(f, "Previous Character"),
            Shortcut::NextCharacter => write!(f, "Next Character"),
        }
    }
}

impl From<Shortcut> for String {
    fn from(shortcut: Shortcut) -> Self {
        shortcut.key()
    }
}

impl TryFrom<String> for Shortcut {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            shortcuts::PREVIOUS_CHARACTER => Ok(Shortcut::PreviousCharacter),
            shortcuts::NEXT_CHARACTER => Ok(Shortcut::NextCharacter),
            other => match other.parse::<CharacterId>() {
                Ok(id) if id < characters::COUNT => Ok(Shortcut::Character(id)),
                _ => Err(format!("unknown shortcut '{other}'")),
            },
        }
    }
}

/// One slot of the character cycling order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleEntry {
    #[serde(deserialize_with = "deserialize_character_id")]
    pub character_id: CharacterId,
    pub on: bool,
}

impl CycleEntry {
    pub fn new(character_id: CharacterId, on: bool) -> Self {
        Self { character_id, on }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_enumeration_is_complete() {
        let all: Vec<Shortcut> = Shortcut::all().collect();
        assert_eq!(all.len(), 14);
        assert_eq!(all[0], Shortcut::Character(0));
        assert_eq!(all[11], Shortcut::Character(11));
        assert_eq!(all[12], Shortcut::PreviousCharacter);
        assert_eq!(all[13], Shortcut::NextCharacter);
    }

    #[test]
    fn test_shortcut_keys_parse_back() {
        for shortcut in Shortcut::all() {
            assert_eq!(Shortcut::try_from(shortcut.key()), Ok(shortcut));
        }
    }

    #[test]
    fn test_shortcut_rejects_unknown_keys() {
        assert!(Shortcut::try_from("12".to_string()).is_err());
        assert!(Shortcut::try_from("PREVIOUS_CHARACTER".to_string()).is_err());
        assert!(Shortcut::try_from(String::new()).is_err());
    }

    #[test]
    fn test_shortcut_display_uses_character_names() {
        assert_eq!(Shortcut::Character(7).to_string(), "Rosalina");
        assert_eq!(Shortcut::NextCharacter.to_string(), "Next Character");
    }

    #[test]
    fn test_cycle_entry_json_shape() {
        let json = serde_json::to_string(&CycleEntry::new(3, false)).unwrap();
        assert_eq!(json, r#"{"characterId":3,"on":false}"#);
    }

    #[test]
    fn test_cycle_entry_accepts_wide_character_ids() {
        let entries: Vec<CycleEntry> = serde_json::from_str(
            r#"[{"characterId":3,"on":true},{"characterId":300,"on":true},{"characterId":-1,"on":false}]"#,
        )
        .unwrap();
        assert_eq!(entries[0], CycleEntry::new(3, true));
        assert_eq!(entries[1].character_id, CharacterId::MAX);
        assert_eq!(entries[2].character_id, CharacterId::MAX);
    }
}
