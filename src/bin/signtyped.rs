//! signtyped - SignType daemon
//!
//! This daemon:
//! 1. Ingests frames from the configured camera (V4L2 or stub)
//! 2. Classifies each frame with the configured backend
//! 3. Debounces the prediction stream through the stability detector
//! 4. Appends accepted letters to the session transcript
//! 5. Renders live per-class confidence bars on a TTY

use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};

use signtype::config::SigntypedConfig;
use signtype::ui::{PredictionBoard, UiMode};
use signtype::{BackendRegistry, CameraSource, SharedTuning, StubBackend, TypingSession};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = SigntypedConfig::load()?;
    log::info!(
        "signtyped starting: camera={} backend={} threshold={} delay={}ms period={}ms",
        cfg.camera.device,
        cfg.backend,
        cfg.tuning.confidence_threshold,
        cfg.tuning.commit_delay.as_millis(),
        cfg.sample_period.as_millis()
    );

    let source = CameraSource::new(cfg.camera.clone())?;
    let registry = build_registry(&cfg)?;
    let labels = default_backend_labels(&registry)?;

    let tuning = SharedTuning::new(cfg.tuning);
    let mut session =
        TypingSession::new(source, registry, tuning).with_sample_period(cfg.sample_period);
    session.connect()?;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handler = stop.clone();
    ctrlc::set_handler(move || {
        stop_handler.store(true, Ordering::Relaxed);
    })?;

    let ui_mode = UiMode::from_flag(std::env::var("SIGNTYPE_UI").ok().as_deref());
    let board = PredictionBoard::new(ui_mode, std::io::stderr().is_terminal(), &labels);

    log::info!(
        "signtyped running ({} classes). press ctrl-c to stop",
        labels.len()
    );

    // The hook only renders; all typing decisions live in the session.
    // Stopping discards detector state without draining a pending commit.
    let mut last_health_log = Instant::now();
    session.run(&stop, |outcome, transcript, source| {
        board.render(outcome, transcript.text());

        if last_health_log.elapsed() >= Duration::from_secs(5) {
            let stats = source.stats();
            log::info!(
                "camera health={} frames={} device={}",
                source.is_healthy(),
                stats.frames_captured,
                stats.device
            );
            last_health_log = Instant::now();
        }
    });

    board.finish();
    println!("session transcript: \"{}\"", session.transcript().text());
    Ok(())
}

fn build_registry(cfg: &SigntypedConfig) -> Result<BackendRegistry> {
    let mut registry = BackendRegistry::new();
    match cfg.backend.as_str() {
        "stub" => registry.register(StubBackend::with_alphabet().with_noise(0.05)),
        #[cfg(feature = "backend-tract")]
        "tract" => {
            let model_path = cfg
                .model_path
                .as_ref()
                .ok_or_else(|| anyhow!("tract backend requires model_path"))?;
            let labels_path = cfg
                .labels_path
                .as_ref()
                .ok_or_else(|| anyhow!("tract backend requires labels_path"))?;
            let backend = signtype::classify::TractBackend::new(
                model_path,
                labels_path,
                cfg.camera.width,
                cfg.camera.height,
            )?;
            registry.register(backend);
        }
        other => {
            return Err(anyhow!(
                "classifier backend '{}' is not available in this build",
                other
            ))
        }
    }
    Ok(registry)
}

fn default_backend_labels(registry: &BackendRegistry) -> Result<Vec<String>> {
    let backend = registry
        .default_backend()
        .ok_or_else(|| anyhow!("no classifier backend registered"))?;
    let guard = backend
        .lock()
        .map_err(|_| anyhow!("classifier backend lock poisoned"))?;
    Ok(guard.labels().to_vec())
}
