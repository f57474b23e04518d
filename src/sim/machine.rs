//! Phase transitions
//!
//! ```text
//! Loading -> Menu -> Playing -> LevelComplete -> Playing (next level)
//!                       |              \-> GameOver(Victory) after the last level
//!                       \-> GameOver(Defeat) -> Menu
//! ```
//!
//! Externally requested transitions return `TransitionError` from the wrong
//! phase and leave the state untouched.

use super::level::load_level;
use super::state::{GameEvent, GamePhase, GameState, Outcome, Player};
use crate::consts::*;
use crate::error::TransitionError;

impl GameState {
    fn require(&self, ok: bool, action: &'static str) -> Result<(), TransitionError> {
        if ok {
            Ok(())
        } else {
            Err(TransitionError {
                from: self.phase,
                action,
            })
        }
    }

    /// Movement input only counts while playing
    pub fn accepts_input(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Asset barrier passed. With a non-zero grace period the loading screen
    /// stays up for that many ticks before the menu appears.
    pub fn finish_loading(&mut self, grace_ticks: u32) -> Result<(), TransitionError> {
        self.require(self.phase == GamePhase::Loading, "finish loading")?;
        if self.assets_ready {
            return Ok(());
        }
        self.assets_ready = true;
        if grace_ticks == 0 {
            self.enter_menu();
        } else {
            self.hold_ticks = grace_ticks;
        }
        Ok(())
    }

    pub(crate) fn enter_menu(&mut self) {
        log::info!("Assets ready, showing menu");
        self.phase = GamePhase::Menu;
        self.emit(GameEvent::AssetsReady);
    }

    /// Menu -> Playing with a fresh player on level 1
    pub fn start_game(&mut self) -> Result<(), TransitionError> {
        self.require(self.phase == GamePhase::Menu, "start a game")?;

        self.player = Player::default();
        self.particles.clear();
        self.time_ticks = 0;
        self.hold_ticks = 0;
        self.emit(GameEvent::GameStarted);
        load_level(self, 0);
        self.phase = GamePhase::Playing;

        log::info!("New game started (seed {})", self.seed);
        Ok(())
    }

    /// Playing -> LevelComplete, awarding the health bonus
    pub(crate) fn complete_level(&mut self) {
        let bonus = (self.player.health / HEALTH_BONUS_STEP).max(0) as u64 * HEALTH_BONUS_POINTS;
        self.player.score += bonus;
        self.phase = GamePhase::LevelComplete;
        self.hold_ticks = LEVEL_COMPLETE_TICKS;

        log::info!(
            "Level {} complete, health bonus {} (score {})",
            self.level + 1,
            bonus,
            self.player.score
        );
        self.emit(GameEvent::LevelComplete {
            bonus,
            next_level: self.level + 1,
        });
    }

    /// LevelComplete -> next level, or the victory ending after the last one
    pub fn advance_level(&mut self) -> Result<(), TransitionError> {
        self.require(self.phase == GamePhase::LevelComplete, "advance level")?;
        self.hold_ticks = 0;

        if self.is_last_level() {
            self.end_run(Outcome::Victory);
            return Ok(());
        }

        self.player.reset_for_level();
        load_level(self, self.level + 1);
        self.phase = GamePhase::Playing;
        Ok(())
    }

    /// Playing/LevelComplete -> GameOver
    pub(crate) fn end_run(&mut self, outcome: Outcome) {
        if matches!(self.phase, GamePhase::GameOver(_)) {
            return;
        }
        self.phase = GamePhase::GameOver(outcome);
        log::info!("Game over ({:?}), final score {}", outcome, self.player.score);
        self.emit(GameEvent::GameOver {
            score: self.player.score,
            outcome,
        });
    }

    /// GameOver -> Menu. Entities stay as they were until the next start.
    pub fn return_to_menu(&mut self) -> Result<(), TransitionError> {
        self.require(
            matches!(self.phase, GamePhase::GameOver(_)),
            "return to menu",
        )?;
        self.phase = GamePhase::Menu;
        self.emit(GameEvent::ReturnedToMenu);
        Ok(())
    }
}
