//! # Timing
//!
//! Converts tempo and chord counts into milliseconds.
//!
//! Every chord is held for a fixed number of beats (default 4, one bar of
//! 4/4), so a line lasts `chord_count × beats_per_chord × 60000 / bpm` ms.
//! Lines without chords last zero ms: they are shown but take no time.
//!
//! [`DurationTable`] holds those durations for a whole song together with
//! their running sum, and answers "which line and chord is active after
//! `elapsed` ms" with a binary search over the cumulative end times.

use crate::error::ScrollError;
use crate::song::ParsedSong;

pub const DEFAULT_BPM: f64 = 120.0;
pub const DEFAULT_BEATS_PER_CHORD: f64 = 4.0;

const MS_PER_MINUTE: f64 = 60_000.0;

pub(crate) fn check_bpm(bpm: f64) -> Result<f64, ScrollError> {
    if bpm.is_finite() && bpm > 0.0 {
        Ok(bpm)
    } else {
        Err(ScrollError::InvalidTempo(bpm))
    }
}

pub(crate) fn check_beats_per_chord(beats: f64) -> Result<f64, ScrollError> {
    if beats.is_finite() && beats > 0.0 {
        Ok(beats)
    } else {
        Err(ScrollError::InvalidBeatsPerChord(beats))
    }
}

/// Playback duration of one line in milliseconds.
///
/// # Example
/// ```rust
/// use chordscroll::line_duration_ms;
///
/// assert_eq!(line_duration_ms(120.0, 1, 4.0)?, 2000.0);
/// assert_eq!(line_duration_ms(60.0, 2, 4.0)?, 8000.0);
/// assert_eq!(line_duration_ms(120.0, 0, 4.0)?, 0.0);
/// assert!(line_duration_ms(0.0, 1, 4.0).is_err());
/// # Ok::<(), chordscroll::ScrollError>(())
/// ```
///
/// # Errors
/// [`ScrollError::InvalidTempo`] for a non-positive or non-finite `bpm`,
/// [`ScrollError::InvalidBeatsPerChord`] for a non-positive or non-finite
/// `beats_per_chord`.
pub fn line_duration_ms(bpm: f64, chord_count: usize, beats_per_chord: f64) -> Result<f64, ScrollError> {
    let bpm = check_bpm(bpm)?;
    let beats_per_chord = check_beats_per_chord(beats_per_chord)?;
    Ok(chord_count as f64 * beats_per_chord * (MS_PER_MINUTE / bpm))
}

/// Where the playhead sits at some elapsed time
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LinePosition {
    pub line: usize,
    pub chord: usize,
    /// Progress through the line, in `[0, 1)`
    pub progress: f64,
}

/// Per-line durations and cumulative start/end times for one tempo
///
/// `starts[i] == ends[i - 1]` bit for bit, so a playhead placed at a line's
/// start always locates to that line and never to the one before it.
#[derive(Debug, Clone)]
pub(crate) struct DurationTable {
    chord_counts: Vec<usize>,
    durations: Vec<f64>,
    starts: Vec<f64>,
    ends: Vec<f64>,
}

impl DurationTable {
    pub fn build(song: &ParsedSong, bpm: f64, beats_per_chord: f64) -> Result<Self, ScrollError> {
        let chord_counts: Vec<usize> = song.lines.iter().map(|l| l.chord_count()).collect();
        let durations = chord_counts
            .iter()
            .map(|&count| line_duration_ms(bpm, count, beats_per_chord))
            .collect::<Result<Vec<f64>, ScrollError>>()?;

        let mut starts = Vec::with_capacity(durations.len());
        let mut ends = Vec::with_capacity(durations.len());
        let mut running = 0.0;
        for duration in &durations {
            starts.push(running);
            running += duration;
            ends.push(running);
        }

        Ok(Self {
            chord_counts,
            durations,
            starts,
            ends,
        })
    }

    pub fn total_ms(&self) -> f64 {
        self.ends.last().copied().unwrap_or(0.0)
    }

    pub fn line_start_ms(&self, line: usize) -> f64 {
        self.starts[line]
    }

    /// Active line and chord at `elapsed` ms; `None` once the song is over.
    pub fn locate(&self, elapsed: f64) -> Option<LinePosition> {
        let elapsed = elapsed.max(0.0);
        // First line whose end lies strictly after `elapsed`; zero-length
        // lines can never satisfy this, so they are skipped
        let line = self.ends.partition_point(|&end| end <= elapsed);
        if line >= self.ends.len() {
            return None;
        }

        let duration = self.durations[line];
        let progress = if duration > 0.0 {
            ((elapsed - self.line_start_ms(line)) / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let chord_count = self.chord_counts[line];
        let chord = if chord_count == 0 {
            0
        } else {
            ((progress * chord_count as f64).floor() as usize).min(chord_count - 1)
        };

        Some(LinePosition { line, chord, progress })
    }

    /// Elapsed time for a line index plus progress through it.
    pub fn elapsed_at(&self, line: usize, progress: f64) -> f64 {
        self.starts[line] + self.durations[line] * progress.clamp(0.0, 1.0)
    }
}
