use std::sync::Mutex;
use std::time::Duration;

use tempfile::NamedTempFile;

use signtype::config::SigntypedConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "SIGNTYPE_CONFIG",
        "SIGNTYPE_CAMERA",
        "SIGNTYPE_BACKEND",
        "SIGNTYPE_MODEL_PATH",
        "SIGNTYPE_LABELS_PATH",
        "SIGNTYPE_CONFIDENCE_THRESHOLD",
        "SIGNTYPE_COMMIT_DELAY_MS",
        "SIGNTYPE_SAMPLE_PERIOD_MS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "camera": {
            "device": "/dev/video2",
            "target_fps": 15,
            "width": 800,
            "height": 600
        },
        "classifier": {
            "backend": "stub"
        },
        "detector": {
            "confidence_threshold": 0.8,
            "commit_delay_ms": 1500
        },
        "sample_period_ms": 50
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("SIGNTYPE_CONFIG", file.path());
    std::env::set_var("SIGNTYPE_CAMERA", "stub://override");
    std::env::set_var("SIGNTYPE_COMMIT_DELAY_MS", "2500");

    let cfg = SigntypedConfig::load().expect("load config");

    assert_eq!(cfg.camera.device, "stub://override");
    assert_eq!(cfg.camera.target_fps, 15);
    assert_eq!(cfg.camera.width, 800);
    assert_eq!(cfg.camera.height, 600);
    assert_eq!(cfg.backend, "stub");
    assert_eq!(cfg.tuning.confidence_threshold, 0.8);
    assert_eq!(cfg.tuning.commit_delay, Duration::from_millis(2500));
    assert_eq!(cfg.sample_period, Duration::from_millis(50));

    clear_env();
}

#[test]
fn defaults_apply_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = SigntypedConfig::load().expect("load defaults");

    assert_eq!(cfg.camera.device, "stub://camera");
    assert_eq!(cfg.backend, "stub");
    assert_eq!(cfg.tuning.confidence_threshold, 0.7);
    assert_eq!(cfg.tuning.commit_delay, Duration::from_millis(2000));
    assert_eq!(cfg.sample_period, Duration::from_millis(100));

    clear_env();
}

#[test]
fn out_of_range_threshold_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("SIGNTYPE_CONFIDENCE_THRESHOLD", "1.4");
    let err = SigntypedConfig::load().unwrap_err();
    assert!(err.to_string().contains("outside [0, 1]"));

    clear_env();
}

#[test]
fn tract_backend_requires_model_and_labels() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("SIGNTYPE_BACKEND", "tract");
    let err = SigntypedConfig::load().unwrap_err();
    assert!(err.to_string().contains("model_path"));

    std::env::set_var("SIGNTYPE_MODEL_PATH", "letters.onnx");
    std::env::set_var("SIGNTYPE_LABELS_PATH", "letters.txt");
    let cfg = SigntypedConfig::load().expect("load tract config");
    assert_eq!(cfg.backend, "tract");

    clear_env();
}
