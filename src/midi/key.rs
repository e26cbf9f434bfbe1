//! Tonality extraction from a key-signature meta event.

use midly::{MetaMessage, Smf, TrackEventKind};

use crate::schema::{Mode, Tonality};

/// Read the first key signature in the file, if any.
///
/// The signature stores a count of sharps (negative for flats) plus a minor
/// flag; each sharp moves the tonic a fifth up the circle, and minor keys
/// sit a major sixth above their relative major. The tonic is returned in
/// the octave of middle C (MIDI 60-71), matching where melodies usually
/// report their key.
pub fn tonality_from_smf(smf: &Smf) -> Option<Tonality> {
    for track in &smf.tracks {
        for event in track {
            if let TrackEventKind::Meta(MetaMessage::KeySignature(sharps, minor)) = event.kind {
                let mut class = (i32::from(sharps) * 7).rem_euclid(12);
                let mode = if minor {
                    class = (class + 9) % 12;
                    Mode::Minor
                } else {
                    Mode::Major
                };
                return Some(Tonality::new(60 + class as u8, mode));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use midly::num::u15;
    use midly::{Format, Header, Timing, TrackEvent};

    use super::*;

    fn smf_with_key(signature: Option<(i8, bool)>) -> Smf<'static> {
        let mut track = Vec::new();
        if let Some((sharps, minor)) = signature {
            track.push(TrackEvent {
                delta: 0.into(),
                kind: TrackEventKind::Meta(MetaMessage::KeySignature(sharps, minor)),
            });
        }
        track.push(TrackEvent {
            delta: 0.into(),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        Smf {
            header: Header::new(Format::SingleTrack, Timing::Metrical(u15::from(480))),
            tracks: vec![track],
        }
    }

    #[test]
    fn no_signature_means_no_tonality() {
        assert_eq!(tonality_from_smf(&smf_with_key(None)), None);
    }

    #[test]
    fn natural_signature_is_c_major_or_a_minor() {
        assert_eq!(
            tonality_from_smf(&smf_with_key(Some((0, false)))),
            Some(Tonality::new(60, Mode::Major))
        );
        assert_eq!(
            tonality_from_smf(&smf_with_key(Some((0, true)))),
            Some(Tonality::new(69, Mode::Minor))
        );
    }

    #[test]
    fn sharps_walk_up_the_circle_of_fifths() {
        // One sharp: G major. Three sharps: A major.
        assert_eq!(
            tonality_from_smf(&smf_with_key(Some((1, false)))),
            Some(Tonality::new(67, Mode::Major))
        );
        assert_eq!(
            tonality_from_smf(&smf_with_key(Some((3, false)))),
            Some(Tonality::new(69, Mode::Major))
        );
    }

    #[test]
    fn flats_walk_down_the_circle_of_fifths() {
        // One flat: F major, or D minor when the minor flag is set.
        assert_eq!(
            tonality_from_smf(&smf_with_key(Some((-1, false)))),
            Some(Tonality::new(65, Mode::Major))
        );
        assert_eq!(
            tonality_from_smf(&smf_with_key(Some((-1, true)))),
            Some(Tonality::new(62, Mode::Minor))
        );
    }
}
