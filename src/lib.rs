//! # chordscroll
//!
//! ChordPro line parsing and a tempo-synchronized auto-scroll engine for song
//! sheets.
//!
//! ## Pipeline
//! 1. [`parse`] (or [`load_song`] for text with a settings block) turns song
//!    text into a [`ParsedSong`]
//! 2. [`ScrollEngine`] builds a duration table from the song and a tempo
//! 3. The host calls [`ScrollEngine::tick`] once per display frame and renders
//!    the active line and chord from [`ScrollEngine::state`] or a subscriber
//!
//! ```rust
//! use chordscroll::{load_song, ManualClock, ScrollEngine};
//!
//! let song = load_song("---\ntempo: 90\n---\n[G]Row, row, [D]row your [G]boat")?;
//! let clock = ManualClock::new();
//! let mut engine = ScrollEngine::with_clock(song.parsed.clone(), song.engine_config(), clock.clone())?;
//!
//! engine.start();
//! clock.advance(3000.0);
//! engine.tick();
//! assert_eq!(engine.state().active_chord_index, 1);
//! # Ok::<(), chordscroll::ScrollError>(())
//! ```

pub mod chord;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod playback;
pub mod song;
pub mod timing;
pub mod transpose;

pub use chord::ChordSymbol;
pub use error::*;
pub use parser::{load_song, parse, parse_bytes};
pub use playback::{
    Clock, EngineConfig, EngineEvent, FrameScheduler, ManualClock, MonotonicClock, PlaybackState,
    PlaybackStatus, PolledFrames, ScrollEngine, Subscription,
};
pub use song::{ChordPosition, LineMetadata, ParsedLine, ParsedSong, Song, SongSettings};
pub use timing::{line_duration_ms, DEFAULT_BEATS_PER_CHORD, DEFAULT_BPM};
pub use transpose::{transpose_chord, transpose_song};

/// Parse `text` and build an engine for it at `bpm`.
///
/// # Errors
/// Returns [`ScrollError::InvalidTempo`] for a non-positive or non-finite tempo.
pub fn engine_for(text: &str, bpm: f64) -> Result<ScrollEngine, ScrollError> {
    ScrollEngine::new(parse(text), bpm)
}
