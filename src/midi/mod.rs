//! Standard MIDI File boundary: melody quantization, key extraction, and
//! accompaniment rendering.
//!
//! Everything here is data marshaling around [`midly`]; the engine in
//! [`crate::evolve`] never touches MIDI.

mod key;
mod melody;
mod track;

pub use key::tonality_from_smf;
pub use melody::quantize_track;
pub use track::render_track;

use midly::{Smf, Timing, Track};

/// Errors crossing the MIDI file boundary.
#[derive(Debug, thiserror::Error)]
pub enum MidiError {
    #[error("SMPTE-timed files are not supported, only metrical timing")]
    UnsupportedTiming,
    #[error("file has {count} tracks, no melody at index {index}")]
    NoSuchTrack { index: usize, count: usize },
    #[error("no key signature in the file; pass tonic:mode or set one in the config")]
    NoTonality,
}

/// Ticks per quarter-note beat of a metrical file. One beat is one
/// accompaniment slot.
pub fn beat_ticks(smf: &Smf) -> Result<u16, MidiError> {
    match smf.header.timing {
        Timing::Metrical(ticks) => Ok(ticks.as_int()),
        Timing::Timecode(..) => Err(MidiError::UnsupportedTiming),
    }
}

/// The track holding the melody.
pub fn melody_track<'smf, 'bytes>(
    smf: &'smf Smf<'bytes>,
    index: usize,
) -> Result<&'smf Track<'bytes>, MidiError> {
    smf.tracks.get(index).ok_or(MidiError::NoSuchTrack {
        index,
        count: smf.tracks.len(),
    })
}
