//! Playback state, configuration and event types
//!
//! These are the values the engine hands out; none of them give write access
//! to the engine itself.

use serde::{Deserialize, Serialize};

use crate::error::ScrollError;
use crate::timing::{check_beats_per_chord, check_bpm, DEFAULT_BEATS_PER_CHORD, DEFAULT_BPM};

/// Lifecycle state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    Paused,
}

/// Snapshot of the engine at one instant.
///
/// Returned by value, so holding one never observes later changes.
///
/// # Fields
/// - `is_active`: playing or paused (a song is loaded into the playhead)
/// - `is_paused`: paused; implies `is_active`
/// - `current_bpm`: tempo in beats per minute
/// - `active_line_index`: index into `ParsedSong::lines`
/// - `active_chord_index`: index of the chord within the active line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub is_active: bool,
    pub is_paused: bool,
    pub current_bpm: f64,
    pub active_line_index: usize,
    pub active_chord_index: usize,
}

impl PlaybackState {
    pub fn status(&self) -> PlaybackStatus {
        match (self.is_active, self.is_paused) {
            (true, false) => PlaybackStatus::Playing,
            (true, true) => PlaybackStatus::Paused,
            (false, _) => PlaybackStatus::Stopped,
        }
    }
}

/// Engine construction settings
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EngineConfig {
    pub initial_bpm: f64,
    pub beats_per_chord: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_bpm: DEFAULT_BPM,
            beats_per_chord: DEFAULT_BEATS_PER_CHORD,
        }
    }
}

impl EngineConfig {
    pub fn with_bpm(initial_bpm: f64) -> Self {
        Self {
            initial_bpm,
            ..Self::default()
        }
    }

    /// Check both values are finite and positive.
    pub fn validate(&self) -> Result<(), ScrollError> {
        check_bpm(self.initial_bpm)?;
        check_beats_per_chord(self.beats_per_chord)?;
        Ok(())
    }
}

/// Structured record of an engine transition, passed to the trace hook
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EngineEvent {
    Started { elapsed_ms: f64 },
    Paused { elapsed_ms: f64 },
    Resumed { elapsed_ms: f64 },
    Stopped,
    /// The playhead ran past the last chord
    Finished { elapsed_ms: f64 },
    TempoChanged { from_bpm: f64, to_bpm: f64 },
    Seeked { line: usize },
    PositionChanged { line: usize, chord: usize },
}
