use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use web_time::{SystemTime, UNIX_EPOCH};

use crate::error::StoreError;
use crate::ratio::RatioState;
use crate::rotation::RotationCursor;
use crate::types::{GameState, Score, Split, Team};

pub const PLAYERS_KEY: &str = "players";
pub const GAME_KEY: &str = "game";
pub const THEME_KEY: &str = "theme";

/// Version written by this build. Records without a version field are the
/// legacy layout and count as version 1.
pub const RECORD_VERSION: u32 = 2;
const LEGACY_VERSION: u32 = 1;

/// Key/value backend the session persists into.
pub trait StateStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, key: &str, value: &str) -> Self {
        self.records.insert(key.to_string(), value.to_string());
        self
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    version: u32,
    checksum: u32,
    #[serde(default)]
    saved_at_ms: u64,
    data: Value,
}

/// A decoded record and the version it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub value: T,
    pub from_version: u32,
}

impl<T> Decoded<T> {
    pub fn migrated(&self) -> bool {
        self.from_version != RECORD_VERSION
    }
}

pub fn encode_record<T: Serialize>(data: &T) -> Result<String, StoreError> {
    let data = serde_json::to_value(data)?;
    let envelope = Envelope {
        version: RECORD_VERSION,
        checksum: checksum(&data)?,
        saved_at_ms: now_ms(),
        data,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decodes a stored record. `L` is the legacy layout for the same record.
pub fn decode_record<T, L>(raw: &str) -> Result<Decoded<T>, StoreError>
where
    T: DeserializeOwned,
    L: DeserializeOwned + Into<T>,
{
    let value: Value = serde_json::from_str(raw)?;
    let is_enveloped = value.as_object().is_some_and(|obj| obj.contains_key("version"));

    if !is_enveloped {
        let legacy: L = serde_json::from_value(value)?;
        return Ok(Decoded {
            value: legacy.into(),
            from_version: LEGACY_VERSION,
        });
    }

    let envelope: Envelope = serde_json::from_value(value)?;
    if envelope.version != RECORD_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found: envelope.version,
            expected: RECORD_VERSION,
        });
    }

    let actual = checksum(&envelope.data)?;
    if actual != envelope.checksum {
        return Err(StoreError::ChecksumMismatch {
            expected: envelope.checksum,
            actual,
        });
    }

    Ok(Decoded {
        value: serde_json::from_value(envelope.data)?,
        from_version: envelope.version,
    })
}

/// Reads one record, logging and discarding anything unreadable.
pub fn load_record<T, L>(store: &dyn StateStore, key: &str) -> Option<Decoded<T>>
where
    T: DeserializeOwned,
    L: DeserializeOwned + Into<T>,
{
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            log::warn!("could not read {key} record: {err}");
            return None;
        }
    };

    match decode_record::<T, L>(&raw) {
        Ok(decoded) => {
            if decoded.migrated() {
                log::info!(
                    "Migrated {key} record from version {} to {RECORD_VERSION}",
                    decoded.from_version
                );
            }
            Some(decoded)
        }
        Err(err) => {
            log::warn!("discarding {key} record: {err}");
            None
        }
    }
}

fn checksum(data: &Value) -> Result<u32, StoreError> {
    Ok(crc32fast::hash(serde_json::to_string(data)?.as_bytes()))
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Default, Deserialize)]
struct LegacyScore {
    #[serde(default)]
    home: u32,
    #[serde(default)]
    away: u32,
    #[serde(default)]
    history: Vec<Team>,
}

/// Un-enveloped `game` record written by the first release.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyGame {
    #[serde(default)]
    score: LegacyScore,
    #[serde(default = "not_started")]
    points_played: i32,
    #[serde(default)]
    home_team: String,
    #[serde(default)]
    away_team: String,
    #[serde(default = "majority_a")]
    starting_ratio: Split,
    #[serde(default = "majority_a")]
    current_ratio: Split,
    #[serde(default)]
    count_since_last_ratio_change: u32,
    #[serde(default)]
    male_index: usize,
    #[serde(default)]
    female_index: usize,
}

fn not_started() -> i32 {
    GameState::NOT_STARTED
}

fn majority_a() -> Split {
    Split::MajorityA
}

impl From<LegacyGame> for GameState {
    fn from(legacy: LegacyGame) -> Self {
        let counter = legacy.count_since_last_ratio_change.min(u8::MAX as u32) as u8;
        Self {
            score: Score {
                home: legacy.score.home,
                away: legacy.score.away,
                history: legacy.score.history,
            },
            points_played: legacy.points_played,
            home_team: legacy.home_team,
            away_team: legacy.away_team,
            starting_ratio: legacy.starting_ratio,
            ratio: RatioState::new(legacy.current_ratio, counter),
            cursor_a: RotationCursor::new(legacy.male_index),
            cursor_b: RotationCursor::new(legacy.female_index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Roster;
    use crate::types::{Gender, Player, ThemeMode, ThemeRecord};

    #[test]
    fn current_record_decodes_without_migration() {
        let mut game = GameState::new();
        game.score.record(Team::Home);
        game.points_played = 1;

        let raw = encode_record(&game).unwrap();
        let decoded = decode_record::<GameState, LegacyGame>(&raw).unwrap();

        assert_eq!(decoded.value, game);
        assert!(!decoded.migrated());
    }

    #[test]
    fn tampered_data_fails_checksum() {
        let raw = encode_record(&ThemeRecord { mode: ThemeMode::Light }).unwrap();
        let tampered = raw.replace("light", "dark");

        let err = decode_record::<ThemeRecord, ThemeRecord>(&tampered).unwrap_err();
        assert!(matches!(err, StoreError::ChecksumMismatch { .. }));
    }

    #[test]
    fn future_version_is_rejected() {
        let raw = r#"{"version":9,"checksum":0,"data":{"mode":"dark"}}"#;
        let err = decode_record::<ThemeRecord, ThemeRecord>(raw).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedVersion { found: 9, expected: RECORD_VERSION }
        ));
    }

    #[test]
    fn legacy_player_array_migrates_to_roster() {
        let raw = r#"[{"id":1700000000001,"name":"Ana","gender":"female"},{"id":1700000000002,"name":"Bo","gender":"male"}]"#;
        let decoded = decode_record::<Roster, Vec<Player>>(raw).unwrap();

        assert!(decoded.migrated());
        assert_eq!(decoded.value.players().len(), 2);
        assert_eq!(decoded.value.players()[1].gender, Gender::A);
    }

    #[test]
    fn legacy_game_object_migrates_with_clamped_counter() {
        let raw = r#"{"score":{"home":2,"away":1},"pointsPlayed":3,"homeTeam":"Discs","awayTeam":"Hucks",
            "startingRatio":"female","currentRatio":"male","countSinceLastRatioChange":10,
            "maleIndex":5,"femaleIndex":2}"#;
        let decoded = decode_record::<GameState, LegacyGame>(raw).unwrap();
        let game = decoded.value;

        assert_eq!(decoded.from_version, 1);
        assert_eq!((game.score.home, game.score.away), (2, 1));
        assert!(game.score.history.is_empty());
        assert_eq!(game.starting_ratio, Split::MajorityB);
        assert_eq!(game.ratio, RatioState::new(Split::MajorityA, 1));
        assert_eq!(game.cursor_a.index, 5);
        assert_eq!(game.home_team, "Discs");
    }

    #[test]
    fn load_record_discards_garbage() {
        let store = MemoryStore::new().with_record(THEME_KEY, "{not json");
        assert!(load_record::<ThemeRecord, ThemeRecord>(&store, THEME_KEY).is_none());
        assert!(load_record::<ThemeRecord, ThemeRecord>(&store, GAME_KEY).is_none());
    }
}
