use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LineupError;
use crate::ratio::RatioState;
use crate::rotation::RotationCursor;

/// Binary partition tag that drives how the roster is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "a", alias = "male")]
    A,
    #[serde(rename = "b", alias = "female")]
    B,
}

impl FromStr for Gender {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "male" => Ok(Self::A),
            "b" | "female" => Ok(Self::B),
            _ => Err(LineupError::UnknownGender(s.to_string())),
        }
    }
}

/// Which partition fields the larger share of players for a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Split {
    #[serde(rename = "majorityA", alias = "male")]
    MajorityA,
    #[serde(rename = "majorityB", alias = "female")]
    MajorityB,
}

impl Split {
    pub fn flipped(self) -> Self {
        match self {
            Self::MajorityA => Self::MajorityB,
            Self::MajorityB => Self::MajorityA,
        }
    }
}

impl FromStr for Split {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "majoritya" | "male" => Ok(Self::MajorityA),
            "b" | "majorityb" | "female" => Ok(Self::MajorityB),
            _ => Err(LineupError::UnknownSplit(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Home,
    Away,
}

impl FromStr for Team {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Self::Home),
            "away" => Ok(Self::Away),
            _ => Err(LineupError::UnknownTeam(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Persisted `theme` record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeRecord {
    pub mode: ThemeMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: u64,
    pub name: String,
    pub gender: Gender,
}

/// Running score plus the order in which points were won.
///
/// `history` is what makes undo unambiguous: the tallies alone cannot tell
/// which team scored last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
    #[serde(default)]
    pub history: Vec<Team>,
}

impl Score {
    pub fn tally(&self, team: Team) -> u32 {
        match team {
            Team::Home => self.home,
            Team::Away => self.away,
        }
    }

    fn tally_mut(&mut self, team: Team) -> &mut u32 {
        match team {
            Team::Home => &mut self.home,
            Team::Away => &mut self.away,
        }
    }

    pub fn can_record(&self, team: Team) -> bool {
        self.tally(team) < u32::MAX
    }

    pub fn record(&mut self, team: Team) {
        *self.tally_mut(team) += 1;
        self.history.push(team);
    }

    /// Pops the last recorded point. Tallies never go below zero.
    pub fn undo_last(&mut self) -> Option<Team> {
        let team = self.history.pop()?;
        let tally = self.tally_mut(team);
        *tally = tally.saturating_sub(1);
        Some(team)
    }

    /// Manual correction that leaves `history` alone.
    pub fn adjust(&mut self, team: Team, delta: i32) {
        let tally = self.tally_mut(team);
        *tally = tally.saturating_add_signed(delta);
    }
}

/// Persisted `game` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub score: Score,
    /// `-1` until the game is started.
    pub points_played: i32,
    pub home_team: String,
    pub away_team: String,
    pub starting_ratio: Split,
    pub ratio: RatioState,
    pub cursor_a: RotationCursor,
    pub cursor_b: RotationCursor,
}

impl GameState {
    pub const NOT_STARTED: i32 = -1;

    pub fn new() -> Self {
        Self {
            score: Score::default(),
            points_played: Self::NOT_STARTED,
            home_team: String::new(),
            away_team: String::new(),
            starting_ratio: Split::MajorityA,
            ratio: RatioState::new(Split::MajorityA, 0),
            cursor_a: RotationCursor::default(),
            cursor_b: RotationCursor::default(),
        }
    }

    pub fn is_started(&self) -> bool {
        self.points_played >= 0
    }

    pub fn cursor(&self, gender: Gender) -> RotationCursor {
        match gender {
            Gender::A => self.cursor_a,
            Gender::B => self.cursor_b,
        }
    }

    pub fn cursor_mut(&mut self, gender: Gender) -> &mut RotationCursor {
        match gender {
            Gender::A => &mut self.cursor_a,
            Gender::B => &mut self.cursor_b,
        }
    }

    /// Brings restored values back inside their invariants.
    pub fn normalize(&mut self, len_a: usize, len_b: usize) {
        self.cursor_a = self.cursor_a.normalized(len_a);
        self.cursor_b = self.cursor_b.normalized(len_b);
        self.ratio = RatioState::new(self.ratio.current_split, self.ratio.points_since_split_change);
        self.points_played = self.points_played.max(Self::NOT_STARTED);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// A fielded player with their 1-based place in the partition order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSlot {
    pub number: usize,
    pub player: Player,
}

/// Who is on the field for the current point.
///
/// Contract:
/// - `wanted_*` is the count the current split asks for.
/// - `short_*` is how many of those the partition could not supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub split: Split,
    pub a: Vec<FieldSlot>,
    pub b: Vec<FieldSlot>,
    pub wanted_a: usize,
    pub wanted_b: usize,
    pub short_a: usize,
    pub short_b: usize,
}

/// Public session state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub score_history: Vec<Team>,
    pub points_played: i32,
    pub is_started: bool,
    pub can_undo: bool,
    pub starting_ratio: Split,
    pub ratio: RatioState,
    pub cursor_a: usize,
    pub cursor_b: usize,
    pub field: FieldView,
    pub players: Vec<Player>,
    pub theme: ThemeMode,
}
