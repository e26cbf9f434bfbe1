//! Time-quantized note extraction from a melody track.

use std::collections::HashMap;

use midly::{MidiMessage, Track, TrackEventKind};

/// Collect the pitches sounding in each beat-sized slot of a track.
///
/// A note lands in every slot its sounding interval overlaps, however
/// partially, so the engine sees it wherever it is audible. NoteOn with zero
/// velocity counts as NoteOff. Notes left hanging at the end of the track
/// are dropped.
pub fn quantize_track(track: &Track, ticks_per_beat: u16) -> Vec<Vec<u8>> {
    let beat = u64::from(ticks_per_beat.max(1));

    let mut clock = 0u64;
    let mut pending: HashMap<u8, u64> = HashMap::new();
    let mut spans: Vec<(u8, u64, u64)> = Vec::new();

    for event in track {
        clock += u64::from(event.delta.as_int());
        let TrackEventKind::Midi { message, .. } = event.kind else {
            continue;
        };
        match message {
            MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                pending.entry(key.as_int()).or_insert(clock);
            }
            MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                if let Some(onset) = pending.remove(&key.as_int()) {
                    spans.push((key.as_int(), onset, clock));
                }
            }
            _ => {}
        }
    }

    let end = spans.iter().map(|&(_, _, off)| off).max().unwrap_or(0);
    let mut slots = vec![Vec::new(); end.div_ceil(beat) as usize];
    for (key, onset, off) in spans {
        let first = (onset / beat) as usize;
        let last = off.div_ceil(beat) as usize;
        for slot in &mut slots[first..last] {
            slot.push(key);
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use midly::TrackEvent;
    use midly::num::u4;

    use super::*;

    fn note_on(delta: u32, key: u8, vel: u8) -> TrackEvent<'static> {
        TrackEvent {
            delta: delta.into(),
            kind: TrackEventKind::Midi {
                channel: u4::from(0),
                message: MidiMessage::NoteOn {
                    key: key.into(),
                    vel: vel.into(),
                },
            },
        }
    }

    fn note_off(delta: u32, key: u8) -> TrackEvent<'static> {
        TrackEvent {
            delta: delta.into(),
            kind: TrackEventKind::Midi {
                channel: u4::from(0),
                message: MidiMessage::NoteOff {
                    key: key.into(),
                    vel: 0.into(),
                },
            },
        }
    }

    #[test]
    fn whole_beats_quantize_one_note_per_slot() {
        // Two quarter notes at 480 ticks per beat.
        let track = vec![
            note_on(0, 60, 90),
            note_off(480, 60),
            note_on(0, 62, 90),
            note_off(480, 62),
        ];
        assert_eq!(quantize_track(&track, 480), vec![vec![60], vec![62]]);
    }

    #[test]
    fn partial_overlap_reaches_both_slots() {
        // A note from tick 240 to tick 720 sounds in both beats.
        let track = vec![note_on(240, 64, 80), note_off(480, 64)];
        assert_eq!(quantize_track(&track, 480), vec![vec![64], vec![64]]);
    }

    #[test]
    fn rests_leave_empty_slots() {
        // One beat of sound, one beat of rest, one beat of sound.
        let track = vec![
            note_on(0, 60, 90),
            note_off(480, 60),
            note_on(480, 67, 90),
            note_off(480, 67),
        ];
        assert_eq!(
            quantize_track(&track, 480),
            vec![vec![60], vec![], vec![67]]
        );
    }

    #[test]
    fn zero_velocity_note_on_ends_the_note() {
        let track = vec![note_on(0, 60, 90), note_on(480, 60, 0)];
        assert_eq!(quantize_track(&track, 480), vec![vec![60]]);
    }

    #[test]
    fn overlapping_notes_share_slots() {
        let track = vec![
            note_on(0, 60, 90),
            note_on(0, 64, 90),
            note_off(480, 60),
            note_off(0, 64),
        ];
        assert_eq!(quantize_track(&track, 480), vec![vec![60, 64]]);
    }

    #[test]
    fn non_note_events_only_advance_the_clock() {
        use midly::MetaMessage;

        let track = vec![
            note_on(0, 60, 90),
            TrackEvent {
                delta: 480.into(),
                kind: TrackEventKind::Meta(MetaMessage::Tempo(500_000.into())),
            },
            note_off(480, 60),
        ];
        assert_eq!(quantize_track(&track, 480), vec![vec![60], vec![60]]);
    }

    #[test]
    fn empty_track_has_no_slots() {
        assert!(quantize_track(&Track::new(), 480).is_empty());
    }
}
