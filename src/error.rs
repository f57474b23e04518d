//! Error types
//!
//! Asset and audio failures are recovered where they happen (placeholder art,
//! silent cue); transition errors go back to whoever asked for the transition.

use crate::sim::GamePhase;

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Fetch failed for {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("Asset not in manifest: {0}")]
    Unknown(String),
}

#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("Audio device unavailable: {0}")]
    Unavailable(String),

    #[error("Playback failed for {track}: {reason}")]
    Playback { track: &'static str, reason: String },
}

/// A state-machine transition requested from the wrong phase
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot {action} while in {from:?}")]
pub struct TransitionError {
    pub from: GamePhase,
    pub action: &'static str,
}
