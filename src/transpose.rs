//! Chord transposition
//!
//! Moves chord roots and slash basses by a number of semitones and respells
//! the result with sharps or flats. Lyrics and line structure are untouched,
//! so a transposed song keeps its chord counts and timing.

use crate::chord::{Accidental, ChordSymbol, NoteName, Pitch};
use crate::song::{ChordPosition, ParsedLine, ParsedSong};

/// Note name to semitone offset from C
fn pitch_to_semitone(pitch: Pitch) -> i32 {
    let base: i32 = match pitch.name {
        NoteName::C => 0,
        NoteName::D => 2,
        NoteName::E => 4,
        NoteName::F => 5,
        NoteName::G => 7,
        NoteName::A => 9,
        NoteName::B => 11,
    };
    let acc: i32 = match pitch.accidental {
        Accidental::Sharp => 1,
        Accidental::Flat => -1,
        Accidental::Natural => 0,
    };
    (base + acc).rem_euclid(12)
}

/// Convert a semitone to a spelled pitch
fn semitone_to_pitch(semitone: i32, prefer_flat: bool) -> Pitch {
    // 0=C, 1=C#/Db, 2=D, 3=D#/Eb, 4=E, 5=F, 6=F#/Gb, 7=G, 8=G#/Ab, 9=A, 10=A#/Bb, 11=B
    let (name, acc) = match semitone.rem_euclid(12) {
        0 => (NoteName::C, Accidental::Natural),
        1 => if prefer_flat { (NoteName::D, Accidental::Flat) } else { (NoteName::C, Accidental::Sharp) },
        2 => (NoteName::D, Accidental::Natural),
        3 => if prefer_flat { (NoteName::E, Accidental::Flat) } else { (NoteName::D, Accidental::Sharp) },
        4 => (NoteName::E, Accidental::Natural),
        5 => (NoteName::F, Accidental::Natural),
        6 => if prefer_flat { (NoteName::G, Accidental::Flat) } else { (NoteName::F, Accidental::Sharp) },
        7 => (NoteName::G, Accidental::Natural),
        8 => if prefer_flat { (NoteName::A, Accidental::Flat) } else { (NoteName::G, Accidental::Sharp) },
        9 => (NoteName::A, Accidental::Natural),
        10 => if prefer_flat { (NoteName::B, Accidental::Flat) } else { (NoteName::A, Accidental::Sharp) },
        11 => (NoteName::B, Accidental::Natural),
        _ => unreachable!(),
    };
    Pitch::new(name, acc)
}

fn transpose_pitch(pitch: Pitch, semitones: i32, prefer_flat: bool) -> Pitch {
    semitone_to_pitch(pitch_to_semitone(pitch) + semitones, prefer_flat)
}

impl ChordSymbol {
    /// Shift root and bass by `semitones`, keeping the quality as written.
    pub fn transpose(&self, semitones: i32, prefer_flat: bool) -> ChordSymbol {
        ChordSymbol {
            root: transpose_pitch(self.root, semitones, prefer_flat),
            quality: self.quality.clone(),
            bass: self.bass.map(|b| transpose_pitch(b, semitones, prefer_flat)),
        }
    }
}

/// Transpose a chord name by `semitones`.
///
/// Flat spellings are kept for chords written with a flat root; natural roots
/// moved downward are spelled with flats, upward with sharps. Names that are
/// not chord symbols (e.g. `N.C.`) are returned unchanged.
///
/// ```
/// use chordscroll::transpose_chord;
///
/// assert_eq!(transpose_chord("C", 2), "D");
/// assert_eq!(transpose_chord("Am7", 3), "Cm7");
/// assert_eq!(transpose_chord("Bb", 2), "C");
/// assert_eq!(transpose_chord("G/B", -2), "F/A");
/// assert_eq!(transpose_chord("N.C.", 5), "N.C.");
/// ```
pub fn transpose_chord(name: &str, semitones: i32) -> String {
    let Some(symbol) = ChordSymbol::parse(name) else {
        return name.to_string();
    };
    if semitones.rem_euclid(12) == 0 {
        return name.to_string();
    }

    let prefer_flat = match symbol.root.accidental {
        Accidental::Flat => true,
        Accidental::Sharp => false,
        Accidental::Natural => semitones < 0,
    };
    symbol.transpose(semitones, prefer_flat).to_string()
}

/// Transpose every chord of a song.
///
/// Returns a new song; lyrics, line structure and chord counts are unchanged.
pub fn transpose_song(song: &ParsedSong, semitones: i32) -> ParsedSong {
    let lines = song
        .lines
        .iter()
        .map(|line| ParsedLine {
            positions: line
                .positions
                .iter()
                .map(|p| ChordPosition {
                    chord: p.chord.as_deref().map(|c| transpose_chord(c, semitones)),
                    word: p.word.clone(),
                })
                .collect(),
            metadata: line.metadata,
        })
        .collect();

    ParsedSong {
        lines,
        error: song.error.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_transpose_up_uses_sharps() {
        assert_eq!(transpose_chord("C", 1), "C#");
        assert_eq!(transpose_chord("F", 1), "F#");
        assert_eq!(transpose_chord("A", 3), "C");
        assert_eq!(transpose_chord("E7", 2), "F#7");
    }

    #[test]
    fn test_transpose_down_uses_flats() {
        assert_eq!(transpose_chord("C", -2), "Bb");
        assert_eq!(transpose_chord("D", -1), "Db");
        assert_eq!(transpose_chord("Ebmaj7", 1), "Emaj7");
    }

    #[test]
    fn test_octave_shift_is_identity() {
        assert_eq!(transpose_chord("F#m", 12), "F#m");
        assert_eq!(transpose_chord("Gb", -24), "Gb");
    }

    #[test]
    fn test_slash_bass_follows_root() {
        assert_eq!(transpose_chord("D/F#", 2), "E/G#");
        assert_eq!(transpose_chord("C/E", -1), "B/Eb");
    }

    #[test]
    fn test_unknown_names_pass_through() {
        assert_eq!(transpose_chord("[C", 2), "[C");
        assert_eq!(transpose_chord("x", 2), "x");
    }

    #[test]
    fn test_transpose_song_keeps_structure() {
        let song = parse("[G]Some[D]where over the [Em]rainbow\n\nla la");
        let up = transpose_song(&song, 2);

        assert_eq!(up.lines.len(), song.lines.len());
        for (a, b) in song.lines.iter().zip(&up.lines) {
            assert_eq!(a.chord_count(), b.chord_count());
            assert_eq!(a.lyrics(), b.lyrics());
        }
        assert_eq!(up.distinct_chords(), vec!["A", "E", "F#m"]);
        // Input untouched
        assert_eq!(song.distinct_chords(), vec!["G", "D", "Em"]);
    }
}
