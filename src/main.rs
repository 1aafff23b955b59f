//! Fruit Merge headless runner
//!
//! Plays sessions with the autopilot at a fixed frame delta and reports the
//! scores. Rendering and real input belong to a front-end; this binary only
//! exercises the simulation.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;

use fruit_merge::highscores::HighScoreEntry;
use fruit_merge::settings::AutopilotStyle;
use fruit_merge::sim::{GamePhase, GameState, TickInput, tick};
use fruit_merge::{Autopilot, Settings};

#[derive(Parser, Debug)]
#[command(name = "fruit-merge", about = "Run Fruit Merge sessions headless")]
struct Args {
    /// Settings JSON file (missing file means defaults)
    #[arg(long, default_value = "fruit-merge.json")]
    settings: PathBuf,
    /// Spawn RNG seed
    #[arg(long)]
    seed: Option<u64>,
    /// Frame cap per run
    #[arg(long)]
    frames: Option<u64>,
    /// Simulated frames per second
    #[arg(long)]
    fps: Option<u32>,
    /// Runs to play back to back
    #[arg(long)]
    runs: Option<u32>,
    /// Autopilot style
    #[arg(long, value_enum)]
    autopilot: Option<AutopilotStyle>,
    /// Print a JSON summary instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
struct RunResult {
    run: u32,
    score: u64,
    frames: u64,
    peak_level: u8,
    topped_out: bool,
}

#[derive(Debug, Clone, Serialize)]
struct SessionSummary {
    seed: u64,
    autopilot: &'static str,
    runs: Vec<RunResult>,
    highscore: u64,
    board: Vec<HighScoreEntry>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    log::info!(
        "Fruit Merge starting: seed {}, {} run(s), {} fps, autopilot {}",
        settings.seed,
        settings.runs,
        settings.fps,
        settings.autopilot.as_str()
    );

    let summary = run_session(&settings)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for run in &summary.runs {
            println!(
                "run {}: score {} in {} frames (peak level {}{})",
                run.run + 1,
                run.score,
                run.frames,
                run.peak_level,
                if run.topped_out { ", topped out" } else { "" }
            );
        }
        println!("highscore: {}", summary.highscore);
    }
    Ok(())
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(&args.settings)?;
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(frames) = args.frames {
        settings.max_frames = frames;
    }
    if let Some(fps) = args.fps {
        settings.fps = fps;
    }
    if let Some(runs) = args.runs {
        settings.runs = runs;
    }
    if let Some(style) = args.autopilot {
        settings.autopilot = style;
    }

    if settings.max_frames == 0 {
        return Err(anyhow!("frames must be > 0"));
    }
    Ok(settings.sanitized())
}

fn run_session(settings: &Settings) -> Result<SessionSummary> {
    let mut state = GameState::new(settings.seed);
    let pilot = Autopilot::new(settings.autopilot);
    let dt = settings.frame_dt();
    let mut runs = Vec::with_capacity(settings.runs as usize);

    for run in 0..settings.runs {
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, dt).with_context(|| format!("starting run {}", run + 1))?;
        let first_frame = state.frame;

        while state.phase == GamePhase::Play && state.frame - first_frame < settings.max_frames {
            let input = pilot.next_input(&state.snapshot());
            tick(&mut state, &input, dt)
                .with_context(|| format!("run {} frame {}", run + 1, state.frame))?;
            for event in state.drain_events() {
                log::debug!("frame {}: {:?}", state.frame, event);
            }
        }

        let result = RunResult {
            run,
            score: state.score,
            frames: state.frame - first_frame,
            peak_level: state.peak_level,
            topped_out: state.phase == GamePhase::GameOver,
        };
        log::info!(
            "Run {} finished: score {}, {} frames",
            run + 1,
            result.score,
            result.frames
        );
        runs.push(result);

        let reset = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &reset, dt)?;
        state.drain_events();
    }

    Ok(SessionSummary {
        seed: settings.seed,
        autopilot: settings.autopilot.as_str(),
        runs,
        highscore: state.highscore(),
        board: state.highscores.runs().to_vec(),
    })
}
