//! HUD abstraction
//!
//! The session pushes readouts and overlay changes through `Hud`; the browser
//! build implements it over DOM elements, native runs log it.

use crate::sim::Outcome;

/// Which overlay screen is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Menu,
    /// No overlay, gameplay visible
    Playing,
    GameOver { score: u64, outcome: Outcome },
    /// `next_level` is 1-based, as displayed
    LevelComplete { next_level: usize },
}

pub trait Hud {
    /// Health bar fill in [0, 1]
    fn set_health(&mut self, fraction: f32);
    fn set_score(&mut self, score: u64);
    /// 1-based level number
    fn set_level(&mut self, level: usize);
    fn set_treasures(&mut self, collected: u32, required: u32);
    fn set_loading_progress(&mut self, percent: u32);
    fn show_screen(&mut self, screen: Screen);
}

pub fn score_text(score: u64) -> String {
    format!("Score: {score}")
}

pub fn level_text(level: usize) -> String {
    format!("Level: {level}")
}

pub fn treasure_text(collected: u32, required: u32) -> String {
    format!("Treasures: {collected}/{required}")
}

pub fn loading_text(percent: u32) -> String {
    format!("Loading... {percent}%")
}

/// Health bar width as a CSS percentage
pub fn health_width(fraction: f32) -> String {
    format!("{}%", (fraction.clamp(0.0, 1.0) * 100.0).round())
}

/// Heading and body of the game-over overlay
pub fn game_over_text(score: u64, outcome: Outcome) -> (&'static str, String) {
    match outcome {
        Outcome::Victory => (
            "YOU WIN!",
            "Congratulations! You completed all levels!".to_string(),
        ),
        Outcome::Defeat => ("GAME OVER!", format!("Final Score: {score}")),
    }
}

pub fn level_complete_text(next_level: usize) -> String {
    format!("Preparing level {next_level}...")
}

/// HUD for headless runs: readouts go to the log
#[derive(Debug, Default)]
pub struct LogHud {
    last_loading: Option<u32>,
}

impl Hud for LogHud {
    fn set_health(&mut self, fraction: f32) {
        log::debug!("Health {}", health_width(fraction));
    }

    fn set_score(&mut self, score: u64) {
        log::debug!("{}", score_text(score));
    }

    fn set_level(&mut self, level: usize) {
        log::info!("{}", level_text(level));
    }

    fn set_treasures(&mut self, collected: u32, required: u32) {
        log::debug!("{}", treasure_text(collected, required));
    }

    fn set_loading_progress(&mut self, percent: u32) {
        if self.last_loading != Some(percent) {
            self.last_loading = Some(percent);
            log::info!("{}", loading_text(percent));
        }
    }

    fn show_screen(&mut self, screen: Screen) {
        match screen {
            Screen::GameOver { score, outcome } => {
                let (title, body) = game_over_text(score, outcome);
                log::info!("{title} {body}");
            }
            Screen::LevelComplete { next_level } => {
                log::info!("Level complete. {}", level_complete_text(next_level));
            }
            other => log::debug!("Screen: {other:?}"),
        }
    }
}
