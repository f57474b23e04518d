//! Session driver
//!
//! Owns the simulation state plus its collaborators. Frame time goes into a
//! fixed-step accumulator; after every tick the recorded `GameEvent`s are
//! turned into audio cues and HUD updates.

use crate::audio::{AudioManager, Cue};
use crate::consts::*;
use crate::hud::{Hud, Screen};
use crate::settings::Settings;
use crate::sim::{Direction, GameEvent, GamePhase, GameState, InputState, Outcome, tick};

pub struct Game<H: Hud> {
    state: GameState,
    input: InputState,
    audio: AudioManager,
    hud: H,
    settings: Settings,
    accumulator: f32,
}

impl<H: Hud> Game<H> {
    pub fn new(seed: u64, hud: H, audio: AudioManager, settings: Settings) -> Self {
        let mut state = GameState::new(seed);
        state.particle_cap = settings.max_particles();

        let mut game = Self {
            state,
            input: InputState::default(),
            audio,
            hud,
            settings,
            accumulator: 0.0,
        };
        game.apply_audio_settings();
        game.hud.show_screen(Screen::Loading);
        game.hud.set_loading_progress(0);
        log::info!("Game initialized with seed: {}", seed);
        game
    }

    fn apply_audio_settings(&mut self) {
        self.audio.set_master_volume(self.settings.master_volume);
        self.audio.set_sfx_volume(self.settings.sfx_volume);
        self.audio.set_music_volume(self.settings.music_volume);
        self.audio.set_enabled(self.settings.sound_enabled);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }

    pub fn hud_mut(&mut self) -> &mut H {
        &mut self.hud
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn set_loading_progress(&mut self, percent: u32) {
        self.hud.set_loading_progress(percent.min(100));
    }

    /// Asset barrier reached; the menu appears after `grace_ticks`
    pub fn finish_loading(&mut self, grace_ticks: u32) {
        self.hud.set_loading_progress(100);
        if let Err(e) = self.state.finish_loading(grace_ticks) {
            log::debug!("Ignored: {}", e);
        }
        self.dispatch();
    }

    /// Start button
    pub fn start(&mut self) {
        match self.state.start_game() {
            Ok(()) => {
                self.input.clear();
                self.accumulator = 0.0;
            }
            Err(e) => log::debug!("Ignored: {}", e),
        }
        self.dispatch();
    }

    /// Restart button on the game-over screen
    pub fn restart(&mut self) {
        if let Err(e) = self.state.return_to_menu() {
            log::debug!("Ignored: {}", e);
        }
        self.input.clear();
        self.dispatch();
    }

    /// Key down; ignored outside gameplay
    pub fn press(&mut self, dir: Direction) {
        if self.state.accepts_input() {
            self.input.press(dir);
        }
    }

    pub fn release(&mut self, dir: Direction) {
        self.input.release(dir);
    }

    /// Flip the global sound switch, returning the new value
    pub fn toggle_sound(&mut self) -> bool {
        self.settings.sound_enabled = !self.settings.sound_enabled;
        self.audio.set_enabled(self.settings.sound_enabled);
        // Resume the track if a run is in progress
        if self.settings.sound_enabled
            && matches!(self.state.phase, GamePhase::Playing | GamePhase::LevelComplete)
        {
            self.audio.start_music();
        }
        self.settings.sound_enabled
    }

    /// Advance by a frame delta, running at most `MAX_SUBSTEPS` ticks.
    /// Returns the number of ticks run.
    pub fn update(&mut self, dt: f32) -> u32 {
        // NaN would poison the accumulator for good
        if !dt.is_finite() {
            log::warn!("Ignoring non-finite frame delta {}", dt);
            return 0;
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            self.step();
            substeps += 1;
        }
        // Drop backlog the substep cap could not absorb
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Run exactly `n` ticks regardless of wall time
    pub fn run_ticks(&mut self, n: u32) {
        for _ in 0..n {
            self.step();
        }
    }

    fn step(&mut self) {
        if self.state.phase != GamePhase::Playing {
            self.input.clear();
        }
        tick(&mut self.state, &self.input);
        self.dispatch();
    }

    fn dispatch(&mut self) {
        for event in self.state.drain_events() {
            self.handle(event);
        }
    }

    fn handle(&mut self, event: GameEvent) {
        let player = &self.state.player;
        match event {
            GameEvent::AssetsReady | GameEvent::ReturnedToMenu => {
                self.hud.show_screen(Screen::Menu);
            }
            GameEvent::GameStarted => {
                self.hud.set_score(player.score);
                self.hud.set_health(player.health_fraction());
                self.audio.start_music();
            }
            GameEvent::LevelLoaded { level, quota } => {
                self.hud.set_level(level + 1);
                self.hud.set_treasures(0, quota);
                self.hud.set_health(player.health_fraction());
                self.hud.show_screen(Screen::Playing);
            }
            GameEvent::PlayerHit { .. } => {
                self.hud.set_health(player.health_fraction());
                self.audio.play(Cue::Hit);
            }
            GameEvent::TreasureCollected { collected, quota } => {
                self.hud.set_treasures(collected, quota);
                self.hud.set_score(player.score);
                self.audio.play(Cue::Collect);
            }
            GameEvent::PowerupCollected { kind } => {
                log::debug!("Powerup: {:?}", kind);
                self.hud.set_health(player.health_fraction());
                self.audio.play(Cue::Powerup);
            }
            GameEvent::SpeedBoostExpired => {
                log::debug!("Speed boost expired (speed {})", player.speed);
            }
            GameEvent::DoorEntered => {
                self.audio.play(Cue::Door);
            }
            GameEvent::LevelComplete { next_level, .. } => {
                self.hud.set_score(player.score);
                self.audio.play(Cue::Win);
                self.hud.show_screen(Screen::LevelComplete {
                    next_level: next_level + 1,
                });
            }
            GameEvent::GameOver { score, outcome } => {
                self.audio.pause_music();
                if outcome == Outcome::Defeat {
                    self.audio.play(Cue::Hit);
                }
                self.hud.set_score(score);
                self.hud.show_screen(Screen::GameOver { score, outcome });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::recording::{Call, RecordingBackend};
    use crate::hud::recording::RecordingHud;
    use glam::Vec2;

    fn game() -> (Game<RecordingHud>, RecordingBackend) {
        let backend = RecordingBackend::default();
        let audio = AudioManager::new(Some(Box::new(backend.clone())));
        let game = Game::new(42, RecordingHud::default(), audio, Settings::default());
        (game, backend)
    }

    fn playing() -> (Game<RecordingHud>, RecordingBackend) {
        let (mut game, backend) = game();
        game.finish_loading(0);
        game.start();
        game.state.enemies.clear();
        game.state.powerups.clear();
        (game, backend)
    }

    #[test]
    fn test_loading_then_menu() {
        let (mut game, _) = game();
        assert_eq!(game.hud().screen(), Some(Screen::Loading));
        game.set_loading_progress(50);
        game.finish_loading(30);
        assert_eq!(game.state().phase, GamePhase::Loading);
        assert_eq!(game.hud().loading, vec![0, 50, 100]);

        game.run_ticks(29);
        assert_eq!(game.state().phase, GamePhase::Loading);
        game.run_ticks(1);
        assert_eq!(game.state().phase, GamePhase::Menu);
        assert_eq!(game.hud().screen(), Some(Screen::Menu));
    }

    #[test]
    fn test_start_updates_hud_and_music() {
        let (game, backend) = playing();
        let hud = game.hud();
        assert_eq!(hud.screen(), Some(Screen::Playing));
        assert_eq!(hud.level, Some(1));
        assert_eq!(hud.treasures, Some((0, 3)));
        assert_eq!(hud.score, Some(0));
        assert_eq!(hud.health, Some(1.0));
        assert_eq!(backend.calls.borrow()[0], Call::StartMusic(0.3));
    }

    #[test]
    fn test_input_ignored_outside_playing() {
        let (mut game, _) = game();
        game.press(Direction::Right);
        assert_eq!(*game.input(), InputState::default());

        let (mut game, _) = playing();
        game.press(Direction::Right);
        assert_eq!(game.input().horizontal, 1.0);
        game.release(Direction::Right);
        assert_eq!(game.input().horizontal, 0.0);
    }

    #[test]
    fn test_movement_through_update() {
        let (mut game, _) = playing();
        game.state.treasures.clear();
        let start = game.state().player.pos;
        game.press(Direction::Right);
        let ticks = game.update(SIM_DT * 3.0 + 0.001);
        assert_eq!(ticks, 3);
        assert_eq!(game.state().player.pos, start + Vec2::new(15.0, 0.0));
    }

    #[test]
    fn test_update_caps_substeps() {
        let (mut game, _) = playing();
        game.state.treasures.clear();
        game.accumulator = 1.0;
        assert_eq!(game.update(0.0), MAX_SUBSTEPS);
        assert!(game.update(0.0) <= 1);
        // Huge deltas are clamped before accumulating
        assert!(game.update(5.0) <= 7);
    }

    #[test]
    fn test_non_finite_delta_is_skipped() {
        let (mut game, _) = playing();
        game.state.treasures.clear();
        assert_eq!(game.update(f32::NAN), 0);
        assert_eq!(game.update(f32::INFINITY), 0);
        assert!(game.accumulator.is_finite());

        let ticks: u32 = (0..60).map(|_| game.update(2.0 * SIM_DT)).sum();
        assert!(ticks >= 119);
        assert_eq!(game.state().phase, GamePhase::Playing);
    }

    #[test]
    fn test_treasure_cue_and_readouts() {
        let (mut game, backend) = playing();
        game.state.treasures[0].pos = game.state.player.pos;
        game.run_ticks(1);
        assert_eq!(game.hud().treasures, Some((1, 3)));
        assert_eq!(game.hud().score, Some(100));
        assert_eq!(backend.cues(), vec![Cue::Collect]);
    }

    #[test]
    fn test_door_completes_level_and_advances() {
        let (mut game, backend) = playing();
        game.state.treasures.clear();
        game.state.player.treasures = 3;
        game.state.player.pos = game.state.door.pos;
        game.run_ticks(1);

        assert_eq!(game.state().phase, GamePhase::LevelComplete);
        assert_eq!(
            game.hud().screen(),
            Some(Screen::LevelComplete { next_level: 2 })
        );
        assert_eq!(backend.cues(), vec![Cue::Door, Cue::Win]);
        // Full health: 10 * 50 bonus
        assert_eq!(game.hud().score, Some(500));

        game.run_ticks(LEVEL_COMPLETE_TICKS);
        assert_eq!(game.state().phase, GamePhase::Playing);
        assert_eq!(game.hud().level, Some(2));
        assert_eq!(game.hud().treasures, Some((0, 4)));
        assert_eq!(game.hud().screen(), Some(Screen::Playing));
    }

    #[test]
    fn test_death_ends_run() {
        let (mut game, backend) = playing();
        game.state.treasures.clear();
        game.state.player.health = 10;
        let mut enemy = crate::sim::Enemy {
            pos: game.state.player.pos,
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            dir: 1.0,
            speed: 0.0,
            kind: crate::sim::EnemyKind::Normal,
        };
        enemy.pos.x += 5.0;
        game.state.enemies.push(enemy);
        game.run_ticks(1);

        assert_eq!(game.state().phase, GamePhase::GameOver(Outcome::Defeat));
        assert_eq!(
            game.hud().screen(),
            Some(Screen::GameOver {
                score: 0,
                outcome: Outcome::Defeat
            })
        );
        assert_eq!(game.hud().health, Some(0.0));
        assert!(!game.audio().is_music_playing());
        assert!(backend.calls.borrow().contains(&Call::PauseMusic));
        assert_eq!(backend.cues(), vec![Cue::Hit, Cue::Hit]);

        game.restart();
        assert_eq!(game.state().phase, GamePhase::Menu);
        assert_eq!(game.hud().screen(), Some(Screen::Menu));
    }

    #[test]
    fn test_toggle_sound_persists_in_settings() {
        let (mut game, backend) = playing();
        assert!(!game.toggle_sound());
        assert!(!game.settings().sound_enabled);
        game.state.treasures[0].pos = game.state.player.pos;
        game.run_ticks(1);
        assert!(backend.cues().is_empty());

        assert!(game.toggle_sound());
        assert!(game.audio().is_music_playing());
    }

    #[test]
    fn test_invalid_requests_are_ignored() {
        let (mut game, _) = game();
        game.start();
        game.restart();
        assert_eq!(game.state().phase, GamePhase::Loading);
    }

    #[test]
    fn test_settings_cap_particles() {
        let settings = Settings {
            particles: false,
            ..Default::default()
        };
        let game = Game::new(1, RecordingHud::default(), AudioManager::silent(), settings);
        assert_eq!(game.state().particle_cap, 0);
    }
}
