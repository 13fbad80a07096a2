use crate::config::FieldConfig;
use crate::error::LineupError;
use crate::ratio::RatioState;
use crate::roster::Roster;
use crate::rotation::{RotationCursor, window};
use crate::store::{self, GAME_KEY, LegacyGame, MemoryStore, PLAYERS_KEY, StateStore, THEME_KEY};
use crate::types::{
    FieldSlot, FieldView, GameSnapshot, GameState, Gender, Player, Score, Split, Team, ThemeMode,
    ThemeRecord,
};

/// One device's roster, game and theme, persisted after every change.
pub struct GameSession {
    roster: Roster,
    game: GameState,
    theme: ThemeMode,
    config: FieldConfig,
    store: Box<dyn StateStore>,
}

impl GameSession {
    /// Restores whatever `store` holds. Unreadable records fall back to
    /// fresh defaults; legacy records are migrated and written back.
    pub fn new(config: FieldConfig, store: Box<dyn StateStore>) -> Result<Self, LineupError> {
        config.validate()?;

        let roster = store::load_record::<Roster, Vec<Player>>(store.as_ref(), PLAYERS_KEY);
        let game = store::load_record::<GameState, LegacyGame>(store.as_ref(), GAME_KEY);
        let theme = store::load_record::<ThemeRecord, ThemeRecord>(store.as_ref(), THEME_KEY);
        let migrated = [
            roster.as_ref().is_some_and(|r| r.migrated()),
            game.as_ref().is_some_and(|g| g.migrated()),
            theme.as_ref().is_some_and(|t| t.migrated()),
        ];

        let mut session = Self {
            roster: roster.map(|r| r.value).unwrap_or_default(),
            game: game.map(|g| g.value).unwrap_or_default(),
            theme: theme.map(|t| t.value.mode).unwrap_or_default(),
            config,
            store,
        };
        session.roster.repair_next_id();
        session
            .game
            .normalize(session.roster.len_of(Gender::A), session.roster.len_of(Gender::B));

        if migrated[0] {
            session.persist_roster();
        }
        if migrated[1] {
            session.persist_game();
        }
        if migrated[2] {
            session.persist_theme();
        }

        log::debug!(
            "session restored: {} players, points_played={}",
            session.roster.players().len(),
            session.game.points_played
        );
        Ok(session)
    }

    pub fn in_memory(config: FieldConfig) -> Result<Self, LineupError> {
        Self::new(config, Box::new(MemoryStore::new()))
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn home_score(&self) -> u32 {
        self.game.score.home
    }

    pub fn away_score(&self) -> u32 {
        self.game.score.away
    }

    pub fn score(&self) -> &Score {
        &self.game.score
    }

    pub fn points_played(&self) -> i32 {
        self.game.points_played
    }

    pub fn home_team(&self) -> &str {
        &self.game.home_team
    }

    pub fn away_team(&self) -> &str {
        &self.game.away_team
    }

    pub fn starting_ratio(&self) -> Split {
        self.game.starting_ratio
    }

    pub fn ratio(&self) -> RatioState {
        self.game.ratio
    }

    pub fn cursor(&self, gender: Gender) -> RotationCursor {
        self.game.cursor(gender)
    }

    pub fn is_started(&self) -> bool {
        self.game.is_started()
    }

    /// True when [`GameSession::undo_point`] would succeed.
    pub fn can_undo(&self) -> bool {
        self.has_point_to_undo() && self.require_both_partitions().is_ok()
    }

    pub fn add_player(&mut self, name: &str, gender: Gender) -> Result<u64, LineupError> {
        let id = self.roster.add(name, gender)?;
        self.persist_roster();
        Ok(id)
    }

    /// Removes a player. The cursor of their partition is re-indexed so the
    /// player who was next up stays next up.
    pub fn remove_player(&mut self, id: u64) -> Result<Player, LineupError> {
        let (player, slot) = self.roster.remove(id)?;
        let remaining = self.roster.len_of(player.gender);
        let cursor = self.game.cursor_mut(player.gender);
        *cursor = cursor.after_removal(slot, remaining);

        self.persist_roster();
        self.persist_game();
        Ok(player)
    }

    pub fn rename_player(&mut self, id: u64, name: &str) -> Result<(), LineupError> {
        self.roster.rename(id, name)?;
        self.persist_roster();
        Ok(())
    }

    pub fn current_field(&self) -> FieldView {
        let (seq_a, seq_b) = self.roster.partition();
        let split = self.game.ratio.current_split;
        let (wanted_a, wanted_b) = self.config.counts(split);
        let a = field_window(&seq_a, self.game.cursor_a.index, wanted_a);
        let b = field_window(&seq_b, self.game.cursor_b.index, wanted_b);

        FieldView {
            split,
            short_a: wanted_a - a.len(),
            short_b: wanted_b - b.len(),
            a,
            b,
            wanted_a,
            wanted_b,
        }
    }

    pub fn start_game(&mut self, starting_ratio: Split) -> Result<(), LineupError> {
        self.require_both_partitions()?;

        self.game.starting_ratio = starting_ratio;
        self.game.points_played = 0;
        self.game.score = Score::default();
        self.game.ratio = RatioState::new(starting_ratio, self.config.pattern.start_counter());
        self.game.cursor_a = Default::default();
        self.game.cursor_b = Default::default();

        log::info!("game started with {starting_ratio:?}");
        self.persist_game();
        Ok(())
    }

    pub fn advance_point(&mut self, team: Team) -> Result<(), LineupError> {
        if !self.game.is_started() {
            return Err(LineupError::NotStarted);
        }
        let (len_a, len_b) = self.require_both_partitions()?;
        let points_played = self
            .game
            .points_played
            .checked_add(1)
            .filter(|_| self.game.score.can_record(team))
            .ok_or(LineupError::CounterLimit)?;

        self.game.score.record(team);
        self.game.points_played = points_played;

        let (count_a, count_b) = self.config.counts(self.game.ratio.current_split);
        self.game.cursor_a = self.game.cursor_a.advanced(len_a, count_a);
        self.game.cursor_b = self.game.cursor_b.advanced(len_b, count_b);
        self.game.ratio = self.game.ratio.advance();

        log::debug!(
            "point {} to {team:?}, next split {:?}",
            self.game.points_played,
            self.game.ratio.current_split
        );
        self.persist_game();
        Ok(())
    }

    /// Exact inverse of [`GameSession::advance_point`].
    pub fn undo_point(&mut self) -> Result<(), LineupError> {
        if !self.has_point_to_undo() {
            return Err(LineupError::NothingToUndo);
        }
        let (len_a, len_b) = self.require_both_partitions()?;

        self.game.ratio = self.game.ratio.retreat();

        let (count_a, count_b) = self.config.counts(self.game.ratio.current_split);
        self.game.cursor_a = self.game.cursor_a.retreated(len_a, count_a);
        self.game.cursor_b = self.game.cursor_b.retreated(len_b, count_b);

        self.game.points_played -= 1;
        let undone = self.game.score.undo_last();

        log::debug!("undid point, removed score {undone:?}");
        self.persist_game();
        Ok(())
    }

    pub fn reset_game(&mut self) {
        let (home_team, away_team) = if self.config.reset_clears_team_names {
            (String::new(), String::new())
        } else {
            (
                std::mem::take(&mut self.game.home_team),
                std::mem::take(&mut self.game.away_team),
            )
        };
        let starting_ratio = self.game.starting_ratio;

        self.game = GameState {
            home_team,
            away_team,
            starting_ratio,
            ratio: RatioState::new(starting_ratio, 0),
            ..GameState::new()
        };

        log::info!("game reset");
        self.persist_game();
    }

    pub fn set_team_names(&mut self, home: &str, away: &str) {
        self.game.home_team = home.to_string();
        self.game.away_team = away.to_string();
        self.persist_game();
    }

    pub fn set_starting_ratio(&mut self, split: Split) -> Result<(), LineupError> {
        if self.game.is_started() {
            return Err(LineupError::AlreadyStarted);
        }
        self.game.starting_ratio = split;
        self.game.ratio = RatioState::new(split, 0);
        self.persist_game();
        Ok(())
    }

    /// Manual score correction by one step in the direction of `delta`.
    /// Does not touch the undo history.
    pub fn adjust_score(&mut self, team: Team, delta: i32) {
        self.game.score.adjust(team, delta.signum());
        self.persist_game();
    }

    /// Manually rotates one partition by a single slot.
    pub fn shift_cursor(&mut self, gender: Gender, forward: bool) {
        let len = self.roster.len_of(gender);
        let cursor = self.game.cursor_mut(gender);
        *cursor = cursor.shifted(len, forward);
        self.persist_game();
    }

    /// Overrides the live ratio state; the counter is clamped.
    pub fn set_ratio(&mut self, split: Split, points_since_split_change: u8) {
        self.game.ratio = RatioState::new(split, points_since_split_change);
        self.persist_game();
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme = self.theme.toggled();
        self.persist_theme();
        self.theme
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            home_team: self.game.home_team.clone(),
            away_team: self.game.away_team.clone(),
            home_score: self.game.score.home,
            away_score: self.game.score.away,
            score_history: self.game.score.history.clone(),
            points_played: self.game.points_played,
            is_started: self.is_started(),
            can_undo: self.can_undo(),
            starting_ratio: self.game.starting_ratio,
            ratio: self.game.ratio,
            cursor_a: self.game.cursor_a.index,
            cursor_b: self.game.cursor_b.index,
            field: self.current_field(),
            players: self.roster.players().to_vec(),
            theme: self.theme,
        }
    }

    fn has_point_to_undo(&self) -> bool {
        self.game.points_played > 0 && !self.game.score.history.is_empty()
    }

    fn require_both_partitions(&self) -> Result<(usize, usize), LineupError> {
        let len_a = self.roster.len_of(Gender::A);
        let len_b = self.roster.len_of(Gender::B);
        if len_a == 0 {
            return Err(LineupError::EmptyPartition(Gender::A));
        }
        if len_b == 0 {
            return Err(LineupError::EmptyPartition(Gender::B));
        }
        Ok((len_a, len_b))
    }

    fn persist_roster(&mut self) {
        self.persist(PLAYERS_KEY, |s| store::encode_record(&s.roster));
    }

    fn persist_game(&mut self) {
        self.persist(GAME_KEY, |s| store::encode_record(&s.game));
    }

    fn persist_theme(&mut self) {
        self.persist(THEME_KEY, |s| store::encode_record(&ThemeRecord { mode: s.theme }));
    }

    fn persist(
        &mut self,
        key: &str,
        encode: impl FnOnce(&Self) -> Result<String, crate::error::StoreError>,
    ) {
        let result = encode(self).and_then(|raw| self.store.write(key, &raw));
        if let Err(err) = result {
            log::warn!("failed to persist {key} record: {err}");
        }
    }
}

fn field_window(seq: &[&Player], cursor: usize, count: usize) -> Vec<FieldSlot> {
    let numbered: Vec<(usize, &Player)> = seq
        .iter()
        .enumerate()
        .map(|(idx, player)| (idx + 1, *player))
        .collect();

    window(&numbered, cursor, count)
        .into_iter()
        .map(|(number, player)| FieldSlot {
            number,
            player: player.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RatioPattern;
    use proptest::prelude::*;

    fn session_with(a: usize, b: usize, config: FieldConfig) -> GameSession {
        let mut session = GameSession::in_memory(config).unwrap();
        for i in 1..=a {
            session.add_player(&format!("m{i}"), Gender::A).unwrap();
        }
        for i in 1..=b {
            session.add_player(&format!("f{i}"), Gender::B).unwrap();
        }
        session
    }

    fn field_names(slots: &[FieldSlot]) -> Vec<&str> {
        slots.iter().map(|slot| slot.player.name.as_str()).collect()
    }

    #[test]
    fn fresh_session_is_not_started() {
        let session = GameSession::in_memory(FieldConfig::default()).unwrap();

        assert_eq!(session.points_played(), -1);
        assert!(!session.is_started());
        assert!(!session.can_undo());
        assert_eq!(session.theme(), ThemeMode::Dark);
    }

    #[test]
    fn four_three_scenario_clamps_short_partition_and_undoes() {
        let mut session = session_with(4, 3, FieldConfig::default());
        session.start_game(Split::MajorityA).unwrap();

        let field = session.current_field();
        assert_eq!(field_names(&field.a), vec!["m1", "m2", "m3", "m4"]);
        assert_eq!(field_names(&field.b), vec!["f1", "f2", "f3"]);

        session.advance_point(Team::Home).unwrap();
        assert_eq!((session.game().cursor_a.index, session.game().cursor_b.index), (0, 0));
        assert_eq!(session.home_score(), 1);

        // Pairs: the first advance keeps the split, the second flips it.
        session.advance_point(Team::Away).unwrap();
        let field = session.current_field();
        assert_eq!(field.split, Split::MajorityB);
        assert_eq!(field.b.len(), 3);
        assert_eq!(field.short_b, 1);
        assert_eq!(field.a.len(), 3);

        session.undo_point().unwrap();
        session.undo_point().unwrap();
        assert_eq!((session.game().cursor_a.index, session.game().cursor_b.index), (0, 0));
        assert_eq!(session.ratio(), RatioState::new(Split::MajorityA, 0));
        assert_eq!(session.home_score(), 0);
        assert_eq!(session.points_played(), 0);
    }

    #[test]
    fn abba_first_point_flip_short_partition_and_undo() {
        let config = FieldConfig {
            pattern: RatioPattern::Abba,
            ..FieldConfig::default()
        };
        let mut session = session_with(4, 3, config);
        session.start_game(Split::MajorityA).unwrap();
        session.advance_point(Team::Home).unwrap();

        assert_eq!((session.game().cursor_a.index, session.game().cursor_b.index), (0, 0));
        let field = session.current_field();
        assert_eq!(field.split, Split::MajorityB);
        assert_eq!((field.wanted_a, field.wanted_b), (3, 4));
        assert_eq!(field_names(&field.b), vec!["f1", "f2", "f3"]);
        assert_eq!(field.short_b, 1);

        session.undo_point().unwrap();
        assert_eq!(session.ratio().current_split, Split::MajorityA);
        assert_eq!(session.home_score(), 0);
        assert_eq!((session.game().cursor_a.index, session.game().cursor_b.index), (0, 0));
    }

    #[test]
    fn split_sequence_alternates_in_pairs() {
        let mut session = session_with(6, 6, FieldConfig::default());
        session.start_game(Split::MajorityA).unwrap();

        let mut splits = vec![session.ratio().current_split];
        for _ in 0..7 {
            session.advance_point(Team::Home).unwrap();
            splits.push(session.ratio().current_split);
        }

        use Split::{MajorityA as A, MajorityB as B};
        assert_eq!(splits, vec![A, A, B, B, A, A, B, B]);
    }

    #[test]
    fn abba_pattern_flips_after_first_point() {
        let config = FieldConfig {
            pattern: RatioPattern::Abba,
            ..FieldConfig::default()
        };
        let mut session = session_with(5, 5, config);
        session.start_game(Split::MajorityB).unwrap();

        let mut splits = vec![session.ratio().current_split];
        for _ in 0..4 {
            session.advance_point(Team::Away).unwrap();
            splits.push(session.ratio().current_split);
        }

        use Split::{MajorityA as A, MajorityB as B};
        assert_eq!(splits, vec![B, A, A, B, B]);
    }

    #[test]
    fn rotation_moves_windows_through_the_partition() {
        let mut session = session_with(6, 5, FieldConfig::default());
        session.start_game(Split::MajorityA).unwrap();
        session.advance_point(Team::Home).unwrap();

        let field = session.current_field();
        assert_eq!(field_names(&field.a), vec!["m5", "m6", "m1", "m2"]);
        assert_eq!(field_names(&field.b), vec!["f4", "f5", "f1"]);
        assert_eq!(field.a[0].number, 5);
        assert_eq!(field.a.len() + field.b.len(), 7);
    }

    #[test]
    fn guards_reject_without_mutating() {
        let mut session = session_with(3, 0, FieldConfig::default());
        let before = session.game().clone();

        assert_eq!(session.advance_point(Team::Home), Err(LineupError::NotStarted));
        assert_eq!(
            session.start_game(Split::MajorityA),
            Err(LineupError::EmptyPartition(Gender::B))
        );
        assert_eq!(session.undo_point(), Err(LineupError::NothingToUndo));
        assert_eq!(session.game(), &before);
    }

    #[test]
    fn emptied_partition_blocks_advance_and_undo() {
        let mut session = session_with(4, 2, FieldConfig::default());
        session.start_game(Split::MajorityA).unwrap();
        session.advance_point(Team::Home).unwrap();
        let b_ids: Vec<u64> = session
            .roster()
            .players()
            .iter()
            .filter(|p| p.gender == Gender::B)
            .map(|p| p.id)
            .collect();
        for id in b_ids {
            session.remove_player(id).unwrap();
        }
        let before = session.game().clone();

        assert!(!session.can_undo());
        assert_eq!(
            session.advance_point(Team::Away),
            Err(LineupError::EmptyPartition(Gender::B))
        );
        assert_eq!(session.undo_point(), Err(LineupError::EmptyPartition(Gender::B)));
        assert_eq!(session.game(), &before);
    }

    #[test]
    fn legacy_game_without_history_cannot_undo() {
        let store = MemoryStore::new()
            .with_record(
                PLAYERS_KEY,
                r#"[{"id":1,"name":"Bo","gender":"male"},{"id":2,"name":"Ana","gender":"female"}]"#,
            )
            .with_record(
                GAME_KEY,
                r#"{"score":{"home":2,"away":0},"pointsPlayed":2,"currentRatio":"male",
                "countSinceLastRatioChange":0,"maleIndex":0,"femaleIndex":0}"#,
            );
        let mut session = GameSession::new(FieldConfig::default(), Box::new(store)).unwrap();
        let before = session.game().clone();

        assert!(!session.can_undo());
        assert_eq!(session.undo_point(), Err(LineupError::NothingToUndo));
        assert_eq!(session.game(), &before);
    }

    #[test]
    fn saturated_legacy_counters_reject_advance() {
        let store = MemoryStore::new()
            .with_record(
                PLAYERS_KEY,
                r#"[{"id":1,"name":"Bo","gender":"male"},{"id":2,"name":"Ana","gender":"female"}]"#,
            )
            .with_record(GAME_KEY, r#"{"score":{"home":4294967295,"away":0},"pointsPlayed":2147483647}"#);
        let mut session = GameSession::new(FieldConfig::default(), Box::new(store)).unwrap();
        let before = session.game().clone();

        assert_eq!(session.advance_point(Team::Away), Err(LineupError::CounterLimit));
        assert_eq!(session.advance_point(Team::Home), Err(LineupError::CounterLimit));
        assert_eq!(session.game(), &before);
    }

    #[test]
    fn maximal_legacy_player_id_loads() {
        let store = MemoryStore::new().with_record(
            PLAYERS_KEY,
            r#"[{"id":18446744073709551615,"name":"Bo","gender":"male"}]"#,
        );
        let mut session = GameSession::new(FieldConfig::default(), Box::new(store)).unwrap();

        assert_eq!(session.roster().players().len(), 1);
        assert_eq!(session.add_player("Cy", Gender::B), Err(LineupError::IdsExhausted));
    }

    #[test]
    fn undo_at_zero_points_is_noop() {
        let mut session = session_with(4, 4, FieldConfig::default());
        session.start_game(Split::MajorityA).unwrap();

        assert_eq!(session.undo_point(), Err(LineupError::NothingToUndo));
        assert_eq!(session.points_played(), 0);
    }

    #[test]
    fn scores_track_points_played() {
        let mut session = session_with(5, 5, FieldConfig::default());
        session.start_game(Split::MajorityB).unwrap();
        for team in [Team::Home, Team::Away, Team::Away, Team::Home, Team::Home] {
            session.advance_point(team).unwrap();
            let played = session.points_played() as u32;
            assert_eq!(session.home_score() + session.away_score(), played);
            assert_eq!(session.score().history.len() as u32, played);
        }
        session.undo_point().unwrap();
        assert_eq!((session.home_score(), session.away_score()), (2, 2));
    }

    #[test]
    fn removing_player_before_cursor_keeps_next_up() {
        let mut session = session_with(6, 4, FieldConfig::default());
        session.start_game(Split::MajorityA).unwrap();
        session.advance_point(Team::Home).unwrap();
        // A cursor now points at m5.
        let m2 = session.roster().players()[1].id;
        session.remove_player(m2).unwrap();

        let field = session.current_field();
        assert_eq!(field_names(&field.a), vec!["m5", "m6", "m1", "m3"]);
        assert_eq!(session.game().cursor_a.index, 3);
    }

    #[test]
    fn reset_keeps_roster_and_names_by_default() {
        let mut session = session_with(4, 4, FieldConfig::default());
        session.set_team_names("Discs", "Hucks");
        session.start_game(Split::MajorityB).unwrap();
        session.advance_point(Team::Away).unwrap();

        session.reset_game();
        assert_eq!(session.points_played(), -1);
        assert_eq!(session.away_score(), 0);
        assert!(session.score().history.is_empty());
        assert_eq!(session.home_team(), "Discs");
        assert_eq!(session.starting_ratio(), Split::MajorityB);
        assert_eq!(session.roster().players().len(), 8);

        let mut clearing = session_with(
            4,
            4,
            FieldConfig {
                reset_clears_team_names: true,
                ..FieldConfig::default()
            },
        );
        clearing.set_team_names("Discs", "Hucks");
        clearing.reset_game();
        assert_eq!(clearing.home_team(), "");
    }

    #[test]
    fn manual_adjustments() {
        let mut session = session_with(3, 3, FieldConfig::default());
        assert!(session.set_starting_ratio(Split::MajorityB).is_ok());
        session.start_game(Split::MajorityA).unwrap();
        assert_eq!(
            session.set_starting_ratio(Split::MajorityB),
            Err(LineupError::AlreadyStarted)
        );

        session.adjust_score(Team::Home, -1);
        assert_eq!(session.home_score(), 0);
        session.adjust_score(Team::Home, 5);
        assert_eq!(session.home_score(), 1);
        assert!(session.score().history.is_empty());

        session.shift_cursor(Gender::B, false);
        assert_eq!(session.cursor(Gender::B).index, 2);
        session.shift_cursor(Gender::B, true);
        assert_eq!(session.game().cursor_b.index, 0);

        session.set_ratio(Split::MajorityB, 5);
        assert_eq!(session.ratio(), RatioState::new(Split::MajorityB, 1));

        assert_eq!(session.toggle_theme(), ThemeMode::Light);
    }

    #[test]
    fn state_survives_reload_through_store() {
        let mut session = session_with(4, 3, FieldConfig::default());
        session.start_game(Split::MajorityA).unwrap();
        session.advance_point(Team::Away).unwrap();
        session.toggle_theme();

        let game = session.game().clone();
        let roster = session.roster().clone();
        let mut store = MemoryStore::new();
        for key in [PLAYERS_KEY, GAME_KEY, THEME_KEY] {
            let raw = session.store.read(key).unwrap().unwrap();
            store.write(key, &raw).unwrap();
        }

        let restored = GameSession::new(FieldConfig::default(), Box::new(store)).unwrap();
        assert_eq!(restored.game(), &game);
        assert_eq!(restored.roster(), &roster);
        assert_eq!(restored.theme(), ThemeMode::Light);
    }

    #[test]
    fn legacy_records_are_migrated_on_load() {
        let store = MemoryStore::new()
            .with_record(
                PLAYERS_KEY,
                r#"[{"id":11,"name":"Ana","gender":"female"},{"id":12,"name":"Bo","gender":"male"}]"#,
            )
            .with_record(
                GAME_KEY,
                r#"{"score":{"home":0,"away":0},"pointsPlayed":0,"homeTeam":"","awayTeam":"",
                "startingRatio":"male","currentRatio":"male","countSinceLastRatioChange":0,
                "maleIndex":7,"femaleIndex":0}"#,
            )
            .with_record(THEME_KEY, r#"{"mode":"light"}"#);

        let mut session = GameSession::new(FieldConfig::default(), Box::new(store)).unwrap();
        assert_eq!(session.roster().players().len(), 2);
        // Stale cursor is normalized against the one-player partition.
        assert_eq!(session.game().cursor_a.index, 0);
        assert_eq!(session.theme(), ThemeMode::Light);
        assert_eq!(session.add_player("Cy", Gender::A).unwrap(), 13);

        let written = session.store.read(GAME_KEY).unwrap().unwrap();
        assert!(written.contains("\"version\":2"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = FieldConfig {
            field_size: 7,
            majority_count: 2,
            ..FieldConfig::default()
        };
        assert!(GameSession::in_memory(config).is_err());
    }

    fn teams() -> impl Strategy<Value = Vec<Team>> {
        prop::collection::vec(prop_oneof![Just(Team::Home), Just(Team::Away)], 0..15)
    }

    proptest! {
        #[test]
        fn prop_undo_restores_exact_state(
            len_a in 1usize..9,
            len_b in 1usize..9,
            start_b in any::<bool>(),
            abba in any::<bool>(),
            history in teams(),
            shift_a in 0usize..9,
            last_home in any::<bool>(),
        ) {
            let config = FieldConfig {
                pattern: if abba { RatioPattern::Abba } else { RatioPattern::Pairs },
                ..FieldConfig::default()
            };
            let mut session = session_with(len_a, len_b, config);
            let split = if start_b { Split::MajorityB } else { Split::MajorityA };
            session.start_game(split).unwrap();
            for team in history {
                session.advance_point(team).unwrap();
            }
            for _ in 0..shift_a {
                session.shift_cursor(Gender::A, true);
            }

            let before = session.game().clone();
            let team = if last_home { Team::Home } else { Team::Away };
            session.advance_point(team).unwrap();
            session.undo_point().unwrap();
            prop_assert_eq!(session.game(), &before);
        }

        #[test]
        fn prop_field_fills_when_partitions_are_deep(
            len_a in 4usize..10,
            len_b in 4usize..10,
            points in 0usize..20,
        ) {
            let mut session = session_with(len_a, len_b, FieldConfig::default());
            session.start_game(Split::MajorityA).unwrap();
            for _ in 0..points {
                session.advance_point(Team::Home).unwrap();
                let field = session.current_field();
                prop_assert_eq!(field.a.len() + field.b.len(), 7);
                prop_assert_eq!(field.short_a + field.short_b, 0);
            }
        }
    }
}
