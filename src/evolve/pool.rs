//! Diatonic chord pool construction.

use crate::schema::{Chord, Tonality};

/// Semitone offsets of the seven scale degrees above the tonic, before any
/// mode adjustment.
const DEGREE_STEPS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Degrees whose root drops a semitone in the minor mode.
const MINOR_FLATS: [u8; 7] = [0, 0, 1, 0, 0, 1, 1];

/// Degrees whose triad third differs between the two modes.
const THIRD_MASK: [u8; 7] = [0, 1, 1, 0, 0, 1, 1];

/// The seven triads a genome may draw from, one per scale degree of the
/// tonality. Built once per run and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordPool {
    chords: [Chord; 7],
}

impl ChordPool {
    /// Build the pool for a tonality. Pure: the same tonality always yields
    /// the same seven chords.
    pub fn for_tonality(tonality: Tonality) -> Self {
        let flag = tonality.mode.flag();

        let mut chords = [Chord::new(0, 0, 0); 7];
        for (degree, chord) in chords.iter_mut().enumerate() {
            let root = tonality.tonic + DEGREE_STEPS[degree] - flag * MINOR_FLATS[degree];
            let third = if THIRD_MASK[degree] == flag { 4 } else { 3 };
            *chord = Chord::new(root, root + third, root + 7);
        }

        // The leading-tone triad (major) or the supertonic triad (minor) is
        // diminished: narrow the fifth, and in minor also the third, which
        // the mask above left major.
        let diminished = usize::from(6 - 5 * flag);
        chords[diminished].pitches[1] -= flag;
        chords[diminished].pitches[2] -= 1;

        Self { chords }
    }

    pub fn chords(&self) -> &[Chord; 7] {
        &self.chords
    }
}
