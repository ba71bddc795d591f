//! Chord symbol parsing
//!
//! Reads chord names such as `C`, `F#m7`, `Bbsus4` or `G/B` into a root pitch,
//! a free-form quality suffix and an optional slash bass note. Only the root
//! and bass are interpreted; the quality is carried through verbatim so exotic
//! spellings survive transposition untouched.

use std::fmt;

/// Note letters A through G
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            NoteName::C => 'C',
            NoteName::D => 'D',
            NoteName::E => 'E',
            NoteName::F => 'F',
            NoteName::G => 'G',
            NoteName::A => 'A',
            NoteName::B => 'B',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp, // #
    Flat,  // b
}

/// A spelled pitch class (letter plus accidental)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    pub name: NoteName,
    pub accidental: Accidental,
}

impl Pitch {
    pub fn new(name: NoteName, accidental: Accidental) -> Self {
        Self { name, accidental }
    }

    /// Read a pitch from the front of `s`, returning it and the unread rest.
    fn parse_prefix(s: &str) -> Option<(Pitch, &str)> {
        let mut chars = s.chars();
        let name = NoteName::from_char(chars.next()?)?;
        let rest = chars.as_str();

        let (accidental, rest) = if let Some(r) = rest.strip_prefix('#') {
            (Accidental::Sharp, r)
        } else if let Some(r) = rest.strip_prefix('b') {
            (Accidental::Flat, r)
        } else {
            (Accidental::Natural, rest)
        };

        Some((Pitch::new(name, accidental), rest))
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.as_char())?;
        match self.accidental {
            Accidental::Natural => Ok(()),
            Accidental::Sharp => write!(f, "#"),
            Accidental::Flat => write!(f, "b"),
        }
    }
}

/// A parsed chord name
///
/// # Examples
/// ```
/// use chordscroll::ChordSymbol;
///
/// let chord = ChordSymbol::parse("F#m7").unwrap();
/// assert_eq!(chord.root.to_string(), "F#");
/// assert_eq!(chord.quality, "m7");
///
/// let slash = ChordSymbol::parse("G/B").unwrap();
/// assert_eq!(slash.bass.map(|b| b.to_string()), Some("B".to_string()));
///
/// assert!(ChordSymbol::parse("N.C.").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordSymbol {
    pub root: Pitch,
    pub quality: String,
    pub bass: Option<Pitch>,
}

impl ChordSymbol {
    pub fn parse(symbol: &str) -> Option<ChordSymbol> {
        let (root, rest) = Pitch::parse_prefix(symbol.trim())?;

        // A slash only introduces a bass note when a full pitch follows it;
        // otherwise it belongs to the quality (e.g. `C6/9`)
        if let Some((quality, bass_text)) = rest.rsplit_once('/') {
            if let Some((bass, "")) = Pitch::parse_prefix(bass_text) {
                return Some(ChordSymbol {
                    root,
                    quality: quality.to_string(),
                    bass: Some(bass),
                });
            }
        }

        Some(ChordSymbol {
            root,
            quality: rest.to_string(),
            bass: None,
        })
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality)?;
        if let Some(bass) = self.bass {
            write!(f, "/{}", bass)?;
        }
        Ok(())
    }
}
