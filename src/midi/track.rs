//! Rendering the winning genome as an accompaniment track.

use midly::num::{u4, u7};
use midly::{MetaMessage, MidiMessage, Track, TrackEvent, TrackEventKind};

use crate::evolve::Genome;
use crate::schema::Tonality;

/// Render one sustained chord per melody slot.
///
/// Every pitch is rebuilt one octave below the tonic's octave, so the
/// accompaniment sits under the melody no matter where the chord pool was
/// voiced. Each chord sounds for exactly one beat at a fixed velocity.
pub fn render_track(
    genome: &Genome,
    tonality: Tonality,
    ticks_per_beat: u16,
    velocity: u8,
) -> Track<'static> {
    let octave = tonality.accompaniment_octave();
    let vel = u7::from(velocity);

    let mut track = Track::new();
    for chord in &genome.chords {
        let pitches = chord.to_octave(octave).pitches;
        for pitch in pitches {
            track.push(note_event(0, true, pitch, vel));
        }
        track.push(note_event(u32::from(ticks_per_beat), false, pitches[0], vel));
        track.push(note_event(0, false, pitches[1], vel));
        track.push(note_event(0, false, pitches[2], vel));
    }
    track.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    track
}

fn note_event(delta: u32, on: bool, key: u8, vel: u7) -> TrackEvent<'static> {
    let key = u7::from(key);
    let message = if on {
        MidiMessage::NoteOn { key, vel }
    } else {
        MidiMessage::NoteOff { key, vel }
    };
    TrackEvent {
        delta: delta.into(),
        kind: TrackEventKind::Midi {
            channel: u4::from(0),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::quantize_track;
    use crate::schema::{Chord, Mode};

    fn two_chord_genome() -> Genome {
        Genome {
            chords: vec![Chord::new(60, 64, 67), Chord::new(67, 71, 74)],
        }
    }

    #[test]
    fn each_chord_becomes_six_events_plus_end_of_track() {
        let track = render_track(&two_chord_genome(), Tonality::new(60, Mode::Major), 480, 45);
        assert_eq!(track.len(), 2 * 6 + 1);
        assert_eq!(
            track.last().unwrap().kind,
            TrackEventKind::Meta(MetaMessage::EndOfTrack)
        );
    }

    #[test]
    fn chords_are_voiced_an_octave_below_the_tonic() {
        let track = render_track(&two_chord_genome(), Tonality::new(60, Mode::Major), 480, 45);

        let mut ons = track.iter().filter_map(|event| match event.kind {
            TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } => Some((key.as_int(), vel.as_int())),
            _ => None,
        });

        // C major drops from [60, 64, 67] to octave 4: [48, 52, 55].
        assert_eq!(ons.next(), Some((48, 45)));
        assert_eq!(ons.next(), Some((52, 45)));
        assert_eq!(ons.next(), Some((55, 45)));
        // G major's fifth wraps within the fixed octave: [55, 59, 50].
        assert_eq!(ons.next(), Some((55, 45)));
        assert_eq!(ons.next(), Some((59, 45)));
        assert_eq!(ons.next(), Some((50, 45)));
        assert_eq!(ons.next(), None);
    }

    #[test]
    fn each_chord_lasts_one_beat() {
        let track = render_track(&two_chord_genome(), Tonality::new(60, Mode::Major), 96, 45);
        let deltas: Vec<u32> = track.iter().map(|event| event.delta.as_int()).collect();
        assert_eq!(deltas, vec![0, 0, 0, 96, 0, 0, 0, 0, 0, 96, 0, 0, 0]);
    }

    #[test]
    fn rendered_track_quantizes_back_to_slot_chords() {
        let tonality = Tonality::new(60, Mode::Major);
        let track = render_track(&two_chord_genome(), tonality, 480, 45);
        let slots = quantize_track(&track, 480);
        assert_eq!(slots, vec![vec![48, 52, 55], vec![55, 59, 50]]);
    }

    #[test]
    fn written_file_round_trips() {
        use midly::num::u15;
        use midly::{Format, Header, Smf, Timing};

        let tonality = Tonality::new(60, Mode::Major);
        let track = render_track(&two_chord_genome(), tonality, 480, 45);
        let smf = Smf {
            header: Header::new(Format::SingleTrack, Timing::Metrical(u15::from(480))),
            tracks: vec![track],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accompaniment.mid");
        smf.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let parsed = Smf::parse(&bytes).unwrap();
        assert_eq!(parsed.tracks.len(), 1);
        assert_eq!(
            quantize_track(&parsed.tracks[0], 480),
            vec![vec![48, 52, 55], vec![55, 59, 50]]
        );
    }
}
