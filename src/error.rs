//! # Error Types
//!
//! This module defines the error type shared by the whole library.
//!
//! Parsing song text never fails (malformed markup degrades into best-effort
//! output), and runtime tempo changes are silently rejected. What remains are
//! configuration mistakes that should reach the developer: a bad tempo, a bad
//! beats-per-chord value, a seek past the end of the song, or a malformed
//! settings block.
//!
//! ## Usage
//! ```rust
//! use chordscroll::{line_duration_ms, ScrollError};
//!
//! match line_duration_ms(0.0, 1, 4.0) {
//!     Ok(ms) => println!("{} ms", ms),
//!     Err(ScrollError::InvalidTempo(bpm)) => eprintln!("bad tempo {}", bpm),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScrollError {
    /// Tempo that is zero, negative, NaN or infinite.
    ///
    /// # Example
    /// ```
    /// # use chordscroll::ScrollError;
    /// let err = ScrollError::InvalidTempo(-10.0);
    /// assert_eq!(err.to_string(), "Invalid tempo: -10 BPM (must be a positive number)");
    /// ```
    #[error("Invalid tempo: {0} BPM (must be a positive number)")]
    InvalidTempo(f64),

    /// Beats-per-chord that is zero, negative, NaN or infinite.
    ///
    /// # Example
    /// ```
    /// # use chordscroll::ScrollError;
    /// let err = ScrollError::InvalidBeatsPerChord(0.0);
    /// assert_eq!(err.to_string(), "Invalid beats per chord: 0 (must be a positive number)");
    /// ```
    #[error("Invalid beats per chord: {0} (must be a positive number)")]
    InvalidBeatsPerChord(f64),

    /// Seek target past the last line of the song.
    #[error("Line {index} is out of range (song has {line_count} lines)")]
    LineOutOfRange { index: usize, line_count: usize },

    /// Invalid settings block.
    ///
    /// Occurs when the `---` delimited YAML block of a song is malformed or
    /// carries values of the wrong type.
    #[error("Invalid metadata: {0}")]
    MetadataError(String),
}
