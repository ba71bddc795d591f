//! # Line Parser
//!
//! Converts ChordPro-style song text into a [`ParsedSong`].
//!
//! ## Markup
//! A chord name in square brackets precedes the word it is played on:
//!
//! ```text
//! [C]Hello [G]darkness my [Am]old friend
//! ```
//!
//! Each line becomes a list of [`ChordPosition`]s. The fragment after a marker
//! is split into its first run (which carries the chord) and the runs that
//! follow it (which do not). Text before the first marker is split the same
//! way with no chord. Blank lines become a single spacer position.
//!
//! ## Failure Semantics
//! [`parse`] never fails. Blank brackets stay in the text, nested brackets
//! fold into the chord name, and an unterminated `[` takes the rest of the line
//! (up to the next `[`) as its chord name. Only input that is not text at all
//! sets [`ParsedSong::error`].
//!
//! ## Settings Block
//! [`load_song`] additionally strips an optional YAML block fenced by `---`
//! lines at the top of the text and returns its values as [`SongSettings`].

use crate::error::ScrollError;
use crate::lexer::{split_runs, Lexer, Token};
use crate::song::{ChordPosition, ParsedLine, ParsedSong, Song, SongSettings};

/// Parse song text into lines of chord positions.
///
/// # Example
/// ```rust
/// use chordscroll::parse;
///
/// let song = parse("[C]Hello [G]world\n\nNo chords here");
/// assert_eq!(song.lines.len(), 3);
/// assert_eq!(song.lines[0].chord_count(), 2);
/// assert!(song.lines[1].is_spacer());
/// assert_eq!(song.lines[2].metadata, None);
/// ```
pub fn parse(text: &str) -> ParsedSong {
    let lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| parse_line(line, i + 1))
        .collect();
    ParsedSong::new(lines)
}

/// Parse raw bytes; invalid UTF-8 yields an empty song with its error flag set.
pub fn parse_bytes(bytes: &[u8]) -> ParsedSong {
    match std::str::from_utf8(bytes) {
        Ok(text) => parse(text),
        Err(e) => {
            log::debug!(target: "chordscroll::parser", "song text rejected: {}", e);
            ParsedSong::failed(format!("song text is not valid UTF-8: {}", e))
        }
    }
}

/// Parse one source line (`line_number` is 1-indexed, used for logging)
fn parse_line(line: &str, line_number: usize) -> ParsedLine {
    if line.trim().is_empty() {
        return ParsedLine::spacer();
    }

    let mut positions = Vec::new();
    let mut pending_chord: Option<&str> = None;

    for located in Lexer::new(line).tokenize() {
        match located.token {
            Token::Chord { name, terminated } => {
                if !terminated {
                    log::debug!(
                        target: "chordscroll::parser",
                        "line {}, column {}: unterminated chord marker read as '{}'",
                        line_number,
                        located.offset + 1,
                        name
                    );
                }
                // Back-to-back markers: the earlier chord sits on an empty word
                if let Some(previous) = pending_chord.replace(name) {
                    positions.push(ChordPosition::chord(previous, ""));
                }
            }
            Token::Text(text) => push_fragment(&mut positions, pending_chord.take(), text),
        }
    }

    if let Some(chord) = pending_chord {
        positions.push(ChordPosition::chord(chord, ""));
    }

    ParsedLine::new(positions)
}

/// Append a text fragment, attaching `chord` to its leading word.
fn push_fragment(positions: &mut Vec<ChordPosition>, chord: Option<&str>, text: &str) {
    let mut runs = split_runs(text).into_iter().peekable();

    if let Some(chord) = chord {
        match runs.peek() {
            Some(&first) if !first.starts_with(char::is_whitespace) => {
                positions.push(ChordPosition::chord(chord, first));
                runs.next();
            }
            // Keep the chord at the marker's column when the word starts later
            _ => positions.push(ChordPosition::chord(chord, "")),
        }
    }

    positions.extend(runs.map(ChordPosition::text));
}

/// Load a song: strip and read the settings block, then parse the body.
///
/// # Example
/// ```rust
/// use chordscroll::load_song;
///
/// let source = r#"---
/// title: Five Foot Two
/// tempo: 140
/// ---
/// [C]Five foot two, [E7]eyes of blue"#;
///
/// let song = load_song(source)?;
/// assert_eq!(song.settings.title.as_deref(), Some("Five Foot Two"));
/// assert_eq!(song.engine_config().initial_bpm, 140.0);
/// assert_eq!(song.parsed.lines.len(), 1);
/// # Ok::<(), chordscroll::ScrollError>(())
/// ```
///
/// # Errors
/// Returns [`ScrollError::MetadataError`] if the settings block is not valid
/// YAML or sets a non-positive tempo or beats-per-chord.
pub fn load_song(source: &str) -> Result<Song, ScrollError> {
    let (settings_block, body) = split_settings(source);

    let settings = match settings_block {
        Some(block) => parse_settings(block)?,
        None => SongSettings::default(),
    };

    Ok(Song {
        settings,
        parsed: parse(body),
    })
}

fn parse_settings(content: &str) -> Result<SongSettings, ScrollError> {
    if content.trim().is_empty() {
        return Ok(SongSettings::default());
    }

    let settings: SongSettings = serde_yaml::from_str(content)
        .map_err(|e| ScrollError::MetadataError(e.to_string()))?;

    if let Some(tempo) = settings.tempo {
        if !(tempo.is_finite() && tempo > 0.0) {
            return Err(ScrollError::MetadataError(format!("Invalid tempo: {}", tempo)));
        }
    }
    if let Some(beats) = settings.beats_per_chord {
        if !(beats.is_finite() && beats > 0.0) {
            return Err(ScrollError::MetadataError(format!(
                "Invalid beats-per-chord: {}",
                beats
            )));
        }
    }

    Ok(settings)
}

/// Split a leading `---` fenced settings block off the song text.
///
/// The opening fence must be the first non-blank line; a `---` anywhere
/// later is ordinary song text, as is an opening fence that is never
/// closed. Returns `(settings, body)` borrowed from `source`.
fn split_settings(source: &str) -> (Option<&str>, &str) {
    let mut offset = 0;
    let mut block_start = None;

    for line in source.split_inclusive('\n') {
        let next = offset + line.len();
        let is_fence = line.trim() == "---";

        match block_start {
            None if is_fence => block_start = Some(next),
            None if line.trim().is_empty() => {}
            None => return (None, source),
            Some(start) if is_fence => return (Some(&source[start..offset]), &source[next..]),
            Some(_) => {}
        }
        offset = next;
    }

    (None, source)
}
