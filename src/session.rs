use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::{
    ENEMY_DEFAULT_POSITION, GAME_OVER_BLINK, GAME_OVER_DURATION, LEADERBOARD_ROWS, STARTING_LIVES,
};
use crate::input::{InputFrame, Intent};
use crate::round::{Cue, Round, RoundStatus};
use crate::scores::{Scope, ScoreStore};
use crate::screens::{LeaderboardAction, LeaderboardView, NameEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    MainMenu,
    Playing,
    /// Formation cleared; the next round starts once the banner times out
    RoundTransition,
    GameOver,
    NameEntry,
    Leaderboard,
}

/// Whether the frame loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Top-level game state: which screen is up, the current round and
/// everything that outlives a single round.
#[derive(Debug)]
pub struct Session {
    mode: Mode,
    mode_since: u64,
    round: Option<Round>,
    score: u32,
    lives: u8,
    start_y: i32,
    name_entry: NameEntry,
    leaderboard: LeaderboardView,
    player_name: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Session {
    pub fn new(now: u64) -> Self {
        Self {
            mode: Mode::MainMenu,
            mode_since: now,
            round: None,
            score: 0,
            lives: STARTING_LIVES,
            start_y: ENEMY_DEFAULT_POSITION,
            name_entry: NameEntry::new(),
            leaderboard: LeaderboardView::default(),
            player_name: None,
        }
    }

    /// Advances one frame. Edge intents are handled for the mode the frame
    /// started in; whatever is left after a mode change is dropped.
    pub fn update<S, R>(&mut self, now: u64, input: &InputFrame, store: &mut S, rng: &mut R) -> Flow
    where
        S: ScoreStore + ?Sized,
        R: Rng,
    {
        if input.contains(Intent::Quit) {
            info!(mode = ?self.mode, "quit requested");
            return Flow::Quit;
        }

        match self.mode {
            Mode::MainMenu => {
                if input.contains(Intent::Confirm) || input.contains(Intent::Fire) {
                    self.start_game(now);
                }
            }
            Mode::Playing | Mode::RoundTransition => self.update_round(now, input, rng),
            Mode::GameOver => {
                if now.saturating_sub(self.mode_since) >= GAME_OVER_DURATION {
                    self.name_entry.clear();
                    self.enter(Mode::NameEntry, now);
                }
            }
            Mode::NameEntry => self.update_name_entry(now, input, store),
            Mode::Leaderboard => self.update_leaderboard(now, input),
        }
        Flow::Continue
    }

    fn start_game(&mut self, now: u64) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.start_y = ENEMY_DEFAULT_POSITION;
        self.player_name = None;
        self.round = Some(Round::new(1, self.start_y, self.score, self.lives, now));
        info!("new game");
        self.enter(Mode::Playing, now);
    }

    fn update_round<R: Rng>(&mut self, now: u64, input: &InputFrame, rng: &mut R) {
        let Some(round) = &mut self.round else {
            self.enter(Mode::MainMenu, now);
            return;
        };

        let status = round.update(now, input, rng);
        self.score = round.score();
        self.lives = round.lives();
        self.start_y = round.start_y();

        match status {
            RoundStatus::Active => {
                if self.mode != Mode::Playing {
                    self.enter(Mode::Playing, now);
                }
            }
            RoundStatus::Clearing => {
                if self.mode != Mode::RoundTransition {
                    self.enter(Mode::RoundTransition, now);
                }
            }
            RoundStatus::NextRound => {
                let next = round.next_round(now);
                self.start_y = next.start_y();
                debug!(round = next.number(), "next round queued");
                *round = next;
                // Stays in RoundTransition until the new round reports Active
            }
            RoundStatus::Lost => {
                self.start_y = ENEMY_DEFAULT_POSITION;
                info!(score = self.score, "game over");
                self.enter(Mode::GameOver, now);
            }
        }
    }

    fn update_name_entry<S: ScoreStore + ?Sized>(
        &mut self,
        now: u64,
        input: &InputFrame,
        store: &mut S,
    ) {
        for intent in &input.pressed {
            match intent {
                Intent::Type(c) => self.name_entry.push(*c),
                Intent::Back => self.name_entry.pop(),
                Intent::Confirm => {
                    let Some(name) = self.name_entry.submit() else {
                        continue;
                    };
                    if let Err(e) = store.record_score(&name, self.score) {
                        warn!(error = %e, "could not record score");
                    }
                    self.player_name = Some(name);
                    self.open_leaderboard(now, store);
                    return;
                }
                _ => {}
            }
        }
    }

    fn open_leaderboard<S: ScoreStore + ?Sized>(&mut self, now: u64, store: &S) {
        let fetch = |scope| {
            store
                .top_scores(scope, LEADERBOARD_ROWS)
                .unwrap_or_else(|e| {
                    warn!(error = %e, ?scope, "could not load scores");
                    Vec::new()
                })
        };
        self.leaderboard = LeaderboardView::open(fetch(Scope::AllTime), fetch(Scope::Today));
        self.enter(Mode::Leaderboard, now);
    }

    fn update_leaderboard(&mut self, now: u64, input: &InputFrame) {
        for intent in &input.pressed {
            match intent {
                Intent::MoveLeft => self.leaderboard.focus_prev(),
                Intent::MoveRight => self.leaderboard.focus_next(),
                Intent::Confirm => {
                    if self.leaderboard.activate() == LeaderboardAction::MainMenu {
                        self.return_to_menu(now);
                        return;
                    }
                }
                Intent::Back => {
                    self.return_to_menu(now);
                    return;
                }
                _ => {}
            }
        }
    }

    /// Throws the finished game away
    fn return_to_menu(&mut self, now: u64) {
        *self = Self::new(now);
        debug!("back to main menu");
    }

    fn enter(&mut self, mode: Mode, now: u64) {
        debug!(from = ?self.mode, to = ?mode, "mode change");
        self.mode = mode;
        self.mode_since = now;
    }

    /// The blinking final score is only drawn during alternate slices
    pub fn game_over_score_visible(&self, now: u64) -> bool {
        let passed = now.saturating_sub(self.mode_since);
        passed < GAME_OVER_DURATION && (passed / GAME_OVER_BLINK) % 2 == 0
    }

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        self.round.as_mut().map(Round::drain_cues).unwrap_or_default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn mode_since(&self) -> u64 {
        self.mode_since
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn start_y(&self) -> i32 {
        self.start_y
    }

    pub fn name_entry(&self) -> &NameEntry {
        &self.name_entry
    }

    pub fn leaderboard(&self) -> &LeaderboardView {
        &self.leaderboard
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }
}
