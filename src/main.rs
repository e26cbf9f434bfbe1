//! Accompanist CLI - evolve a chord accompaniment for a melody MIDI file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use midly::Smf;

use accompanist::{
    evolve::EvolutionEngine,
    midi::{beat_ticks, melody_track, quantize_track, render_track, tonality_from_smf},
    schema::{AccompanyConfig, Tonality},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <input.mid> <output.mid> [config.json] [tonic:mode]", args[0]);
        eprintln!();
        eprintln!("Evolve a chord accompaniment for a melody and append it as a new track.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  input.mid    Melody file to accompany");
        eprintln!("  output.mid   Where to write the file with the accompaniment added");
        eprintln!("  config.json  Optional run configuration");
        eprintln!("  tonic:mode   Key override, e.g. 60:major or 57:minor");
        std::process::exit(1);
    }

    let input = PathBuf::from(&args[1]);
    let output = PathBuf::from(&args[2]);

    // Load configuration
    let config: AccompanyConfig = match args.get(3) {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => AccompanyConfig::default(),
    };
    config.validate().unwrap_or_else(|e| {
        eprintln!("Error in config: {}", e);
        std::process::exit(1);
    });

    let key_override: Option<Tonality> = args.get(4).map(|s| {
        s.parse().unwrap_or_else(|e| {
            eprintln!("Error parsing key: {}", e);
            std::process::exit(1);
        })
    });

    // Load the melody
    let bytes = fs::read(&input).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", input.display(), e);
        std::process::exit(1);
    });
    let mut smf = Smf::parse(&bytes).unwrap_or_else(|e| {
        eprintln!("Error parsing {}: {}", input.display(), e);
        std::process::exit(1);
    });

    let ticks_per_beat = beat_ticks(&smf).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let track = melody_track(&smf, config.melody_track).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let notes = quantize_track(track, ticks_per_beat);

    let tonality = key_override
        .or(config.tonality)
        .or_else(|| tonality_from_smf(&smf))
        .unwrap_or_else(|| {
            eprintln!("Error: no key signature found; pass tonic:mode or set it in the config");
            std::process::exit(1);
        });

    println!("Accompanist");
    println!("===========");
    println!("Melody: {} ({} slots)", input.display(), notes.len());
    println!("Key: {}", tonality);
    println!(
        "Population: {} for up to {} generations",
        config.evolution.population_limit, config.evolution.generation_limit
    );
    println!();

    // Evolve
    let mut engine =
        EvolutionEngine::new(config.evolution.clone(), tonality, notes).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    println!("Evolving...");
    let start = Instant::now();
    let result = engine.run().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let elapsed = start.elapsed();

    println!(
        "  Stopped after {} generations ({:?})",
        result.stats.generations, result.stats.stop_reason
    );
    println!(
        "  Best fitness: {} of {}",
        result.stats.best_fitness, result.stats.max_fitness
    );
    println!("  Time: {:.2}s", elapsed.as_secs_f32());
    println!();

    // Append the accompaniment and write the result
    let accompaniment = render_track(&result.best, tonality, ticks_per_beat, config.output.velocity);
    smf.tracks.push(accompaniment);
    smf.save(&output).unwrap_or_else(|e| {
        eprintln!("Error writing {}: {}", output.display(), e);
        std::process::exit(1);
    });
    println!("Wrote {}", output.display());
}
