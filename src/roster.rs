use serde::{Deserialize, Serialize};

use crate::error::LineupError;
use crate::types::{Gender, Player};

/// Splits the roster by partition tag, keeping roster order in each half.
pub fn partition(players: &[Player]) -> (Vec<&Player>, Vec<&Player>) {
    players.iter().partition(|player| player.gender == Gender::A)
}

/// Ordered player list plus the id high-water mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    next_id: u64,
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            players: Vec::new(),
        }
    }

    pub fn from_players(players: Vec<Player>) -> Self {
        let mut roster = Self {
            next_id: 1,
            players,
        };
        roster.repair_next_id();
        roster
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn get(&self, id: u64) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn partition(&self) -> (Vec<&Player>, Vec<&Player>) {
        partition(&self.players)
    }

    pub fn len_of(&self, gender: Gender) -> usize {
        self.players.iter().filter(|p| p.gender == gender).count()
    }

    pub fn add(&mut self, name: &str, gender: Gender) -> Result<u64, LineupError> {
        let name = clean_name(name)?;
        let id = self.next_id;
        if self.get(id).is_some() {
            return Err(LineupError::IdsExhausted);
        }
        self.next_id = id.saturating_add(1);
        self.players.push(Player { id, name, gender });
        Ok(id)
    }

    /// Removes a player and returns them with their former position
    /// inside their partition.
    pub fn remove(&mut self, id: u64) -> Result<(Player, usize), LineupError> {
        let idx = self
            .players
            .iter()
            .position(|player| player.id == id)
            .ok_or(LineupError::UnknownPlayer(id))?;
        let gender = self.players[idx].gender;
        let slot = self.players[..idx]
            .iter()
            .filter(|player| player.gender == gender)
            .count();

        Ok((self.players.remove(idx), slot))
    }

    pub fn rename(&mut self, id: u64, name: &str) -> Result<(), LineupError> {
        let name = clean_name(name)?;
        let player = self
            .players
            .iter_mut()
            .find(|player| player.id == id)
            .ok_or(LineupError::UnknownPlayer(id))?;
        player.name = name;
        Ok(())
    }

    /// Keeps `next_id` ahead of every id on the roster. Needed after loading
    /// data written by older builds.
    pub fn repair_next_id(&mut self) {
        let max_id = self.players.iter().map(|player| player.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id.saturating_add(1));
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Player>> for Roster {
    fn from(players: Vec<Player>) -> Self {
        Self::from_players(players)
    }
}

fn clean_name(name: &str) -> Result<String, LineupError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LineupError::BlankName);
    }
    Ok(name.to_string())
}
