//! # Song Data Model
//!
//! Types produced by the line parser and consumed by the scroll engine.
//!
//! ## Key Types
//! - [`ChordPosition`] - One chord label (optional) above one lyric fragment
//! - [`ParsedLine`] - The positions of one source line plus its chord count
//! - [`ParsedSong`] - Every line of the song, plus an error flag for unusable input
//! - [`SongSettings`] - Values from the optional YAML settings block
//! - [`Song`] - Settings and parsed lines together, as returned by `load_song`
//!
//! All types serialize with camelCase field names so a browser front end reads
//! `chordCount`, `word`, `chord` directly.

use serde::{Deserialize, Serialize};

use crate::playback::EngineConfig;

/// A chord label positioned above a fragment of lyric text.
///
/// `word` may be a lyric token, a run of whitespace or empty. Only the
/// fragment directly after a chord marker carries a chord.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordPosition {
    pub chord: Option<String>,
    pub word: String,
}

impl ChordPosition {
    pub fn chord(chord: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            chord: Some(chord.into()),
            word: word.into(),
        }
    }

    pub fn text(word: impl Into<String>) -> Self {
        Self {
            chord: None,
            word: word.into(),
        }
    }

    /// Placeholder for a blank source line (vertical spacing only)
    pub fn spacer() -> Self {
        Self::text("")
    }

    pub fn has_chord(&self) -> bool {
        self.chord.is_some()
    }
}

/// Derived metadata, present only on lines with at least one chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMetadata {
    pub chord_count: usize,
}

/// One source line as an ordered list of chord positions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedLine {
    pub positions: Vec<ChordPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<LineMetadata>,
}

impl ParsedLine {
    /// Build a line, deriving metadata from the chord-bearing positions.
    pub fn new(positions: Vec<ChordPosition>) -> Self {
        let chord_count = positions.iter().filter(|p| p.has_chord()).count();
        let metadata = (chord_count > 0).then_some(LineMetadata { chord_count });
        Self { positions, metadata }
    }

    pub fn spacer() -> Self {
        Self::new(vec![ChordPosition::spacer()])
    }

    /// Number of chords on this line; zero when metadata is absent.
    pub fn chord_count(&self) -> usize {
        self.metadata.map_or(0, |m| m.chord_count)
    }

    /// A blank line kept only for spacing
    pub fn is_spacer(&self) -> bool {
        self.positions.len() == 1 && self.positions[0] == ChordPosition::spacer()
    }

    /// Concatenation of every word on the line.
    pub fn lyrics(&self) -> String {
        self.positions.iter().map(|p| p.word.as_str()).collect()
    }

    pub fn chords(&self) -> impl Iterator<Item = &str> {
        self.positions.iter().filter_map(|p| p.chord.as_deref())
    }
}

/// A whole song, line by line.
///
/// `error` is set only when the input could not be used as text at all; the
/// presentation layer then falls back to showing the raw source.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSong {
    pub lines: Vec<ParsedLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedSong {
    pub fn new(lines: Vec<ParsedLine>) -> Self {
        Self { lines, error: None }
    }

    /// Empty song carrying an error flag
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            lines: Vec::new(),
            error: Some(reason.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn total_chords(&self) -> usize {
        self.lines.iter().map(ParsedLine::chord_count).sum()
    }

    /// Chord names in order of first appearance, without repeats
    pub fn distinct_chords(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for chord in self.lines.iter().flat_map(ParsedLine::chords) {
            if !seen.contains(&chord) {
                seen.push(chord);
            }
        }
        seen
    }
}

/// Settings from the YAML block of a song.
///
/// ```text
/// ---
/// title: Riptide
/// artist: Vance Joy
/// key: Am
/// tempo: 102
/// beats-per-chord: 2
/// ---
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SongSettings {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub key: Option<String>,
    pub tempo: Option<f64>,
    pub beats_per_chord: Option<f64>,
}

/// A loaded song: its settings and its parsed body.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub settings: SongSettings,
    pub parsed: ParsedSong,
}

impl Song {
    /// Engine configuration with the song's tempo and beats-per-chord applied
    /// over the defaults (120 BPM, 4 beats per chord).
    pub fn engine_config(&self) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            initial_bpm: self.settings.tempo.unwrap_or(defaults.initial_bpm),
            beats_per_chord: self
                .settings
                .beats_per_chord
                .unwrap_or(defaults.beats_per_chord),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_count_metadata() {
        let line = ParsedLine::new(vec![
            ChordPosition::chord("C", "Hello"),
            ChordPosition::text(" "),
            ChordPosition::chord("G", "world"),
        ]);
        assert_eq!(line.chord_count(), 2);
        assert_eq!(line.metadata, Some(LineMetadata { chord_count: 2 }));

        let plain = ParsedLine::new(vec![ChordPosition::text("no chords")]);
        assert_eq!(plain.metadata, None);
        assert_eq!(plain.chord_count(), 0);
    }

    #[test]
    fn test_spacer_line() {
        let line = ParsedLine::spacer();
        assert!(line.is_spacer());
        assert_eq!(line.chord_count(), 0);
        assert_eq!(line.lyrics(), "");
    }

    #[test]
    fn test_distinct_chords_keep_first_appearance_order() {
        let song = ParsedSong::new(vec![
            ParsedLine::new(vec![
                ChordPosition::chord("G", "a"),
                ChordPosition::chord("C", "b"),
            ]),
            ParsedLine::new(vec![
                ChordPosition::chord("C", "c"),
                ChordPosition::chord("Am", "d"),
            ]),
        ]);
        assert_eq!(song.distinct_chords(), vec!["G", "C", "Am"]);
        assert_eq!(song.total_chords(), 4);
    }

    #[test]
    fn test_engine_config_from_settings() {
        let song = Song {
            settings: SongSettings {
                tempo: Some(90.0),
                ..Default::default()
            },
            parsed: ParsedSong::default(),
        };
        let config = song.engine_config();
        assert_eq!(config.initial_bpm, 90.0);
        assert_eq!(config.beats_per_chord, 4.0);
    }
}
