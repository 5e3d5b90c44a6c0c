//! demo - end-to-end synthetic typing run for SignType
//!
//! Feeds the full pipeline (stub camera -> stub classifier -> stability
//! detector -> transcript) with simulated time, so a multi-second session
//! finishes instantly and deterministically.

use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use clap::Parser;

use signtype::{
    BackendRegistry, CameraConfig, CameraSource, SharedTuning, StubBackend, Tuning, TypingSession,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Simulated session length in seconds.
    #[arg(long, default_value_t = 30)]
    seconds: u64,
    /// Frames per second for the synthetic source.
    #[arg(long, default_value_t = 10)]
    fps: u32,
    /// Confidence threshold in [0, 1].
    #[arg(long, default_value_t = 0.7)]
    threshold: f32,
    /// Commit delay in milliseconds.
    #[arg(long, default_value_t = 2000)]
    delay_ms: u64,
    /// Classifier confidence jitter amplitude (0.0 = deterministic).
    #[arg(long, default_value_t = 0.0)]
    noise: f32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if args.fps == 0 {
        return Err(anyhow!("fps must be >= 1"));
    }
    if !(0.0..=1.0).contains(&args.threshold) {
        return Err(anyhow!("threshold must be in [0, 1]"));
    }

    let period = Duration::from_millis(1_000 / args.fps as u64);
    let total_ticks = args.seconds.saturating_mul(args.fps as u64);

    stage("build pipeline");
    let source = CameraSource::new(CameraConfig {
        device: "stub://demo".to_string(),
        target_fps: args.fps,
        width: 320,
        height: 240,
    })?;
    let mut registry = BackendRegistry::new();
    registry.register(StubBackend::with_alphabet().with_noise(args.noise));

    let tuning = SharedTuning::new(Tuning {
        confidence_threshold: args.threshold,
        commit_delay: Duration::from_millis(args.delay_ms),
    });
    let mut session = TypingSession::new(source, registry, tuning).with_sample_period(period);
    session.connect()?;

    stage("run simulated session");
    let t0 = Instant::now();
    let mut commits = Vec::new();
    for i in 0..total_ticks {
        let now = t0 + period * i as u32;
        let outcome = session.tick(now)?;
        if let Some(commit) = outcome.commit {
            eprintln!(
                "demo: t={:>6}ms typed '{}' ({} samples, held {:?})",
                (period * i as u32).as_millis(),
                commit.label,
                commit.samples,
                commit.held
            );
            commits.push(commit);
        }
    }

    println!("demo summary:");
    println!("  ticks simulated: {}", total_ticks);
    println!("  samples classified: {}", session.samples_classified());
    println!("  ticks skipped: {}", session.ticks_skipped());
    println!("  letters typed: {}", commits.len());
    println!("  transcript: \"{}\"", session.transcript().text());
    println!("next steps:");
    println!("  cargo run --bin signtyped");
    println!("  cargo run --bin demo -- --seconds 60 --delay-ms 500");

    Ok(())
}

fn stage(msg: &str) {
    eprintln!("demo: {}", msg);
}
