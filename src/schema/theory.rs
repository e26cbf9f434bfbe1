//! Music-domain types: modes, tonalities, and triads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Scale mode of a tonality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// 0 for major, 1 for minor; offsets the degree tables.
    pub fn flag(self) -> u8 {
        match self {
            Mode::Major => 0,
            Mode::Minor => 1,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Major => write!(f, "major"),
            Mode::Minor => write!(f, "minor"),
        }
    }
}

/// A mode name was neither "major" nor "minor".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("mode must be \"major\" or \"minor\", got {0:?}")]
pub struct InvalidMode(pub String);

impl FromStr for Mode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, InvalidMode> {
        match s {
            "major" => Ok(Mode::Major),
            "minor" => Ok(Mode::Minor),
            other => Err(InvalidMode(other.to_string())),
        }
    }
}

/// Key of the melody: tonic as a MIDI note number plus a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tonality {
    /// Tonic pitch as a MIDI note number.
    pub tonic: u8,
    /// Major or minor.
    pub mode: Mode,
}

impl Tonality {
    pub fn new(tonic: u8, mode: Mode) -> Self {
        Self { tonic, mode }
    }

    /// Pitch class of the scale degree whose triad suspends to sus4.
    pub fn third_degree_class(&self) -> u8 {
        ((u16::from(self.tonic) + 7 - u16::from(self.mode.flag())) % 12) as u8
    }

    /// Pitch class of the scale degree whose triad suspends to sus2.
    pub fn fourth_degree_class(&self) -> u8 {
        ((u16::from(self.tonic) + 5 + 3 * u16::from(self.mode.flag())) % 12) as u8
    }

    /// Octave index one below the tonic's, where the accompaniment sits.
    pub fn accompaniment_octave(&self) -> u8 {
        (self.tonic / 12).saturating_sub(1)
    }
}

impl fmt::Display for Tonality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tonic, self.mode)
    }
}

/// A tonality string did not parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TonalityParseError {
    #[error("expected <tonic>:<mode>, got {0:?}")]
    Format(String),
    #[error("tonic must be a MIDI note number 0-127, got {0:?}")]
    Tonic(String),
    #[error(transparent)]
    Mode(#[from] InvalidMode),
}

impl FromStr for Tonality {
    type Err = TonalityParseError;

    /// Parses strings like `60:major` or `57:minor`.
    fn from_str(s: &str) -> Result<Self, TonalityParseError> {
        let (tonic, mode) = s
            .split_once(':')
            .ok_or_else(|| TonalityParseError::Format(s.to_string()))?;
        let tonic: u8 = tonic
            .parse()
            .ok()
            .filter(|&t| t <= 127)
            .ok_or_else(|| TonalityParseError::Tonic(tonic.to_string()))?;
        Ok(Self::new(tonic, mode.parse()?))
    }
}

/// A triad as [root, middle, fifth] MIDI note numbers.
///
/// The intervals `middle - root` and `fifth - root` carry the quality; the
/// pitches themselves carry the octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub pitches: [u8; 3],
}

impl Chord {
    pub fn new(root: u8, middle: u8, fifth: u8) -> Self {
        Self {
            pitches: [root, middle, fifth],
        }
    }

    pub fn root(&self) -> u8 {
        self.pitches[0]
    }

    pub fn middle(&self) -> u8 {
        self.pitches[1]
    }

    pub fn fifth(&self) -> u8 {
        self.pitches[2]
    }

    /// True for triads spanning an exact perfect fifth, the ones a
    /// suspension can replace the third of.
    pub fn has_perfect_fifth(&self) -> bool {
        i16::from(self.fifth()) - i16::from(self.root()) == 7
    }

    /// True when the middle pitch already sits a second or a fourth above
    /// the root.
    pub fn is_suspended(&self) -> bool {
        let (root, middle) = (i16::from(self.root()), i16::from(self.middle()));
        middle == root + 2 || middle == root + 5
    }

    /// Octave-free suspension test: the intervals above the root, mod 12,
    /// form sus2 `[0, 2, 7]` or sus4 `[0, 5, 7]`.
    pub fn sus_shape(&self) -> bool {
        let [root, middle, fifth] = self.pitches.map(i16::from);
        (fifth - root).rem_euclid(12) == 7 && matches!((middle - root).rem_euclid(12), 2 | 5)
    }

    /// The same chord shape rebuilt in the given octave.
    pub fn to_octave(&self, octave: u8) -> Chord {
        Chord {
            pitches: self.pitches.map(|p| p % 12 + 12 * octave),
        }
    }
}
