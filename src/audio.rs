//! Audio cues and background music
//!
//! Playback is fire-and-forget: the manager logs backend failures and carries
//! on. Without a backend the game runs silently after a single warning.

use crate::error::AudioError;

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Player took damage, also played on death
    Hit,
    /// Treasure picked up
    Collect,
    /// Powerup picked up
    Powerup,
    /// Level cleared
    Win,
    /// Player reached the open door
    Door,
}

impl Cue {
    pub const ALL: [Cue; 5] = [Cue::Hit, Cue::Collect, Cue::Powerup, Cue::Win, Cue::Door];

    pub fn name(&self) -> &'static str {
        match self {
            Cue::Hit => "hit",
            Cue::Collect => "collect",
            Cue::Powerup => "powerup",
            Cue::Win => "win",
            Cue::Door => "door",
        }
    }
}

/// Something that can make noise
pub trait AudioBackend {
    fn play_cue(&mut self, cue: Cue, volume: f32) -> Result<(), AudioError>;
    fn start_music(&mut self, volume: f32) -> Result<(), AudioError>;
    fn pause_music(&mut self) -> Result<(), AudioError>;
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    enabled: bool,
    music_playing: bool,
}

impl AudioManager {
    pub fn new(backend: Option<Box<dyn AudioBackend>>) -> Self {
        if backend.is_none() {
            log::warn!("No audio device available - audio disabled");
        }
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: crate::consts::MUSIC_VOLUME,
            enabled: true,
            music_playing: false,
        }
    }

    /// Manager with no device; logs the warning once
    pub fn silent() -> Self {
        Self::new(None)
    }

    pub fn has_device(&self) -> bool {
        self.backend.is_some()
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Global sound switch. Disabling also pauses running music.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        log::info!("Sound {}", if enabled { "enabled" } else { "disabled" });
        if !enabled && self.music_playing {
            self.with_backend("music", |b| b.pause_music());
            self.music_playing = false;
        }
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    fn with_backend(
        &mut self,
        what: &str,
        f: impl FnOnce(&mut dyn AudioBackend) -> Result<(), AudioError>,
    ) -> bool {
        let Some(backend) = self.backend.as_deref_mut() else {
            return false;
        };
        match f(backend) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Audio {what} failed: {e}");
                false
            }
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, cue: Cue) {
        if !self.enabled {
            return;
        }
        let vol = self.master_volume * self.sfx_volume;
        if vol <= 0.0 {
            return;
        }
        self.with_backend(cue.name(), |b| b.play_cue(cue, vol));
    }

    /// Start the background track from its current position
    pub fn start_music(&mut self) {
        if !self.enabled {
            return;
        }
        let vol = self.master_volume * self.music_volume;
        self.music_playing = self.with_backend("music", |b| b.start_music(vol));
    }

    pub fn pause_music(&mut self) {
        if !self.music_playing {
            return;
        }
        self.music_playing = false;
        self.with_backend("music", |b| b.pause_music());
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::HtmlAudioBackend;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AudioBackend, AudioError, Cue};
    use wasm_bindgen::JsCast;
    use web_sys::{Document, HtmlAudioElement};

    /// Plays `<audio>` elements already present in the page
    pub struct HtmlAudioBackend {
        music: HtmlAudioElement,
        cues: Vec<(Cue, HtmlAudioElement)>,
    }

    fn element(document: &Document, id: &str) -> Option<HtmlAudioElement> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok())
    }

    fn element_id(cue: Cue) -> &'static str {
        match cue {
            Cue::Hit => "hitSound",
            Cue::Collect => "collectSound",
            Cue::Powerup => "powerupSound",
            Cue::Win => "winSound",
            Cue::Door => "doorSound",
        }
    }

    /// Browsers reject `play()` until the user interacts; log and move on
    fn play(el: &HtmlAudioElement, track: &'static str) -> Result<(), AudioError> {
        let promise = el.play().map_err(|e| AudioError::Playback {
            track,
            reason: format!("{e:?}"),
        })?;
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                log::warn!("Audio {track} rejected: {e:?}");
            }
        });
        Ok(())
    }

    impl HtmlAudioBackend {
        /// Requires the music element; missing cue elements are skipped
        pub fn from_document(document: &Document) -> Result<Self, AudioError> {
            let music = element(document, "bgMusic")
                .ok_or_else(|| AudioError::Unavailable("no #bgMusic element".into()))?;
            music.set_loop(true);

            let cues = Cue::ALL
                .iter()
                .filter_map(|cue| {
                    let el = element(document, element_id(*cue));
                    if el.is_none() {
                        log::warn!("Missing audio element #{}", element_id(*cue));
                    }
                    el.map(|el| (*cue, el))
                })
                .collect();

            Ok(Self { music, cues })
        }
    }

    impl AudioBackend for HtmlAudioBackend {
        fn play_cue(&mut self, cue: Cue, volume: f32) -> Result<(), AudioError> {
            let Some((_, el)) = self.cues.iter().find(|(c, _)| *c == cue) else {
                return Ok(());
            };
            el.set_volume(volume as f64);
            el.set_current_time(0.0);
            play(el, cue.name())
        }

        fn start_music(&mut self, volume: f32) -> Result<(), AudioError> {
            self.music.set_volume(volume as f64);
            play(&self.music, "music")
        }

        fn pause_music(&mut self) -> Result<(), AudioError> {
            self.music.pause().map_err(|e| AudioError::Playback {
                track: "music",
                reason: format!("{e:?}"),
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Cue(Cue, f32),
        StartMusic(f32),
        PauseMusic,
    }

    /// Backend that records calls into a shared log
    #[derive(Debug, Clone, Default)]
    pub struct RecordingBackend {
        pub calls: Rc<RefCell<Vec<Call>>>,
        pub fail: bool,
    }

    impl RecordingBackend {
        pub fn cues(&self) -> Vec<Cue> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|c| match c {
                    Call::Cue(cue, _) => Some(*cue),
                    _ => None,
                })
                .collect()
        }

        fn result(&self, track: &'static str) -> Result<(), AudioError> {
            if self.fail {
                Err(AudioError::Playback {
                    track,
                    reason: "test failure".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    impl AudioBackend for RecordingBackend {
        fn play_cue(&mut self, cue: Cue, volume: f32) -> Result<(), AudioError> {
            self.calls.borrow_mut().push(Call::Cue(cue, volume));
            self.result(cue.name())
        }

        fn start_music(&mut self, volume: f32) -> Result<(), AudioError> {
            self.calls.borrow_mut().push(Call::StartMusic(volume));
            self.result("music")
        }

        fn pause_music(&mut self) -> Result<(), AudioError> {
            self.calls.borrow_mut().push(Call::PauseMusic);
            self.result("music")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::recording::{Call, RecordingBackend};
    use super::*;

    fn manager() -> (AudioManager, RecordingBackend) {
        let backend = RecordingBackend::default();
        let mut audio = AudioManager::new(Some(Box::new(backend.clone())));
        audio.set_master_volume(1.0);
        (audio, backend)
    }

    #[test]
    fn test_cues_reach_backend() {
        let (mut audio, backend) = manager();
        audio.play(Cue::Collect);
        audio.play(Cue::Door);
        assert_eq!(backend.cues(), vec![Cue::Collect, Cue::Door]);
    }

    #[test]
    fn test_music_volume() {
        let (mut audio, backend) = manager();
        audio.start_music();
        assert!(audio.is_music_playing());
        assert_eq!(backend.calls.borrow()[0], Call::StartMusic(0.3));
    }

    #[test]
    fn test_disabled_suppresses_everything() {
        let (mut audio, backend) = manager();
        audio.start_music();
        audio.set_enabled(false);
        audio.play(Cue::Hit);
        audio.start_music();
        assert!(!audio.is_music_playing());
        assert_eq!(
            *backend.calls.borrow(),
            vec![Call::StartMusic(0.3), Call::PauseMusic]
        );
    }

    #[test]
    fn test_pause_without_music_is_noop() {
        let (mut audio, backend) = manager();
        audio.pause_music();
        assert!(backend.calls.borrow().is_empty());
    }

    #[test]
    fn test_failures_are_swallowed() {
        let backend = RecordingBackend {
            fail: true,
            ..Default::default()
        };
        let mut audio = AudioManager::new(Some(Box::new(backend.clone())));
        audio.play(Cue::Win);
        audio.start_music();
        assert!(!audio.is_music_playing());
        assert_eq!(backend.calls.borrow().len(), 2);
    }

    #[test]
    fn test_silent_manager() {
        let mut audio = AudioManager::silent();
        assert!(!audio.has_device());
        audio.play(Cue::Hit);
        audio.start_music();
        assert!(!audio.is_music_playing());
    }
}
