//! Fitness scoring of genomes against the quantized melody.

use super::EvolveError;
use super::genome::Genome;

/// Score for a slot where a chord tone sounds in the melody.
pub const MATCH_SCORE: u32 = 200;

/// Extra score when the matching chord is a suspension.
pub const SUS_BONUS: u32 = 25;

/// Score for a slot where the melody is silent.
pub const SILENCE_SCORE: u32 = 50;

/// Fitness ceiling for a melody of `slots` quanta, counting full matches and
/// ignoring the suspension bonus. Convergence targets are a share of this.
pub fn max_fitness(slots: usize) -> u32 {
    MATCH_SCORE * slots as u32
}

/// Score a genome slot by slot.
///
/// A slot scores [`MATCH_SCORE`] when any of its chord's pitches sounds in
/// the melody during that slot, plus [`SUS_BONUS`] when that chord has a
/// suspended shape. A silent slot accepts any chord for [`SILENCE_SCORE`].
/// Anything else scores zero.
///
/// The membership test compares raw pitches, so a chord only matches melody
/// notes in its own octave, while the suspension bonus is octave-free. The
/// asymmetry is deliberate and pinned by tests.
pub fn score_genome(genome: &Genome, notes: &[Vec<u8>]) -> Result<u32, EvolveError> {
    if genome.len() != notes.len() {
        return Err(EvolveError::SlotCountMismatch {
            genome: genome.len(),
            slots: notes.len(),
        });
    }

    let mut total = 0;
    for (chord, slot) in genome.chords.iter().zip(notes) {
        if slot.is_empty() {
            total += SILENCE_SCORE;
        } else if chord.pitches.iter().any(|p| slot.contains(p)) {
            total += MATCH_SCORE;
            if chord.sus_shape() {
                total += SUS_BONUS;
            }
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Chord;

    fn genome(chords: &[[u8; 3]]) -> Genome {
        Genome {
            chords: chords.iter().map(|&p| Chord { pitches: p }).collect(),
        }
    }

    #[test]
    fn chord_tone_in_slot_scores_a_match() {
        let fitness = score_genome(&genome(&[[60, 64, 67]]), &[vec![64]]).unwrap();
        assert_eq!(fitness, 200);
    }

    #[test]
    fn suspended_match_earns_the_bonus() {
        let fitness = score_genome(&genome(&[[60, 62, 67]]), &[vec![62]]).unwrap();
        assert_eq!(fitness, 225);
    }

    #[test]
    fn silent_slot_scores_once() {
        let fitness = score_genome(&genome(&[[60, 64, 67]]), &[vec![]]).unwrap();
        assert_eq!(fitness, 50);
    }

    #[test]
    fn sounding_slot_without_a_chord_tone_scores_zero() {
        let fitness = score_genome(&genome(&[[60, 64, 67]]), &[vec![61, 63]]).unwrap();
        assert_eq!(fitness, 0);
    }

    #[test]
    fn matching_is_octave_sensitive() {
        // The same shape an octave up misses the melody note entirely: raw
        // pitches decide membership, not pitch classes.
        let fitness = score_genome(&genome(&[[72, 76, 79]]), &[vec![64]]).unwrap();
        assert_eq!(fitness, 0);

        // The suspension bonus, by contrast, survives octave displacement
        // as long as some raw pitch still matches.
        let fitness = score_genome(&genome(&[[48, 62, 67]]), &[vec![62]]).unwrap();
        assert_eq!(fitness, 225);
    }

    #[test]
    fn slots_accumulate_independently() {
        let fitness = score_genome(
            &genome(&[[60, 64, 67], [62, 65, 69], [60, 62, 67], [60, 64, 67]]),
            &[vec![64, 70], vec![], vec![62], vec![58]],
        )
        .unwrap();
        assert_eq!(fitness, 200 + 50 + 225 + 0);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let err = score_genome(&genome(&[[60, 64, 67]]), &[vec![64], vec![]]).unwrap_err();
        assert!(matches!(
            err,
            EvolveError::SlotCountMismatch { genome: 1, slots: 2 }
        ));
    }

    #[test]
    fn max_fitness_scales_with_slot_count() {
        assert_eq!(max_fitness(0), 0);
        assert_eq!(max_fitness(7), 1400);
    }
}
