use choreo_lib::arranger::{FillSettings, PhraseStatus};
use choreo_lib::commands::{self, CommandResult, RecommendInput, SectionTempoInput};
use choreo_lib::pipeline::{Stage, TraceEntry, TraceWriter};

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "choreo")]
#[command(about = "Beat-synced dance move sequencer", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tempo of each fixed-size beat window
    Sections {
        /// Beat analysis JSON ({"tempo", "beat_times", "counts"?})
        #[arg(long)]
        beats: PathBuf,

        /// Beats per section
        #[arg(long, default_value_t = 8)]
        window: usize,

        /// How to aggregate tempo inside a section: "median" or "mean"
        #[arg(long)]
        agg: String,

        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,

        /// Append a JSONL progress trace to this file
        #[arg(long)]
        trace: Option<PathBuf>,
    },

    /// Generate a timed move sequence for a beat timeline
    Recommend {
        /// Beat analysis JSON ({"tempo", "beat_times", "counts"?})
        #[arg(long)]
        beats: PathBuf,

        /// Move catalog JSON (array of moves)
        #[arg(long)]
        catalog: PathBuf,

        /// Number of phrases (defaults to 8, capped by what the timeline holds)
        #[arg(long)]
        phrases: Option<usize>,

        /// Beats per phrase
        #[arg(long, default_value_t = 8)]
        phrase_length: u32,

        /// Recent picks kept out of the primary candidate pool
        #[arg(long, default_value_t = 3)]
        recent: usize,

        /// Selection budget per phrase
        #[arg(long, default_value_t = 200)]
        max_attempts: u32,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,

        /// Append a JSONL progress trace to this file
        #[arg(long)]
        trace: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Sections {
            beats,
            window,
            agg,
            json,
            trace,
        } => run_sections(beats, window, agg, json, trace),
        Command::Recommend {
            beats,
            catalog,
            phrases,
            phrase_length,
            recent,
            max_attempts,
            seed,
            json,
            trace,
        } => {
            let settings = FillSettings {
                phrase_length,
                recent_window: recent,
                max_attempts,
                ..FillSettings::default()
            };
            run_recommend(beats, catalog, phrases, settings, seed, json, trace)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e.message());
            ExitCode::FAILURE
        }
    }
}

fn run_sections(
    beats: PathBuf,
    window: usize,
    agg: String,
    json: bool,
    trace: Option<PathBuf>,
) -> CommandResult<()> {
    let analysis = commands::load_beats(&beats)?;
    let beat_count = analysis.beat_times.len();
    let sections = commands::section_tempo_command(SectionTempoInput {
        beat_times: analysis.beat_times.clone(),
        window_beats: window,
        aggregator: agg,
    })?;

    if let Some(path) = trace {
        let tracer = TraceWriter::new(path);
        tracer.write_batch(&[
            TraceEntry::new(Stage::Load, 0.5, "Loaded beat analysis")
                .with_data(serde_json::json!({ "beats": beat_count, "tempo": analysis.tempo })),
            TraceEntry::new(Stage::Sections, 1.0, "Segmented beats into sections")
                .with_data(serde_json::json!({ "sections": sections.len(), "window": window })),
        ])?;
        info!("Trace written to {}", tracer.path().display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    println!("Estimated global tempo: {:.1} BPM", analysis.tempo);
    for s in &sections {
        println!(
            "Section {}: {:.1} BPM — beats {}–{} on count {} ({:.2}s → {:.2}s, {:.2}s)",
            s.index,
            s.bpm,
            s.start_beat + 1,
            s.end_beat,
            analysis.count_at(s.start_beat).unwrap_or(1),
            s.start_time,
            s.end_time,
            s.duration
        );
    }
    Ok(())
}

fn run_recommend(
    beats: PathBuf,
    catalog: PathBuf,
    phrases: Option<usize>,
    settings: FillSettings,
    seed: Option<u64>,
    json: bool,
    trace: Option<PathBuf>,
) -> CommandResult<()> {
    let tracer = trace.map(TraceWriter::new);
    let mut entries = Vec::new();

    let analysis = commands::load_beats(&beats)?;
    let moves = commands::load_catalog(&catalog)?;
    entries.push(
        TraceEntry::new(Stage::Load, 0.25, "Loaded beat analysis and catalog").with_data(
            serde_json::json!({
                "beats": analysis.beat_times.len(),
                "tempo": analysis.tempo,
                "moves": moves.len(),
            }),
        ),
    );

    let output = commands::recommend_command(RecommendInput {
        beat_times: analysis.beat_times.clone(),
        bpm: analysis.tempo,
        catalog: moves,
        phrase_count: phrases,
        settings,
        seed,
    })?;
    let rec = &output.recommendation;

    let partial = rec
        .phrases
        .iter()
        .filter(|p| p.status == PhraseStatus::Partial)
        .count();
    entries.push(
        TraceEntry::new(Stage::Sequence, 0.75, "Filled phrases").with_data(serde_json::json!({
            "phrases": output.phrase_count,
            "partial": partial,
            "seed": output.seed,
        })),
    );
    entries.push(
        TraceEntry::new(Stage::Flatten, 1.0, "Placed moves on beats").with_data(
            serde_json::json!({
                "steps": rec.steps.len(),
                "truncated": rec.truncated,
            }),
        ),
    );

    if let Some(tracer) = &tracer {
        tracer.write_batch(&entries)?;
        info!("Trace written to {}", tracer.path().display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !rec.all_phrases_complete() {
        warn!("Some phrases could not be filled completely");
    }
    println!("Suggested moves (seed {}):", output.seed);
    for step in &rec.steps {
        match analysis.count_at(step.start_beat_index) {
            Some(count) => println!("[{}] {}", count, step.describe()),
            None => println!("{}", step.describe()),
        }
    }
    if rec.truncated {
        println!("(plan stops where the detected beats run out)");
    }
    Ok(())
}
