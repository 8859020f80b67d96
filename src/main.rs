//! Visitor intent entrypoint: imports queued visits and runs a retraining pass,
//! once or as a daemon loop on the configured interval.

use visitor_intent::{
    config::IntentConfig,
    ingest::VisitRecorder,
    logging::{LogEvent, StructuredLogger},
    model::SharedClassifier,
    retrain::Retrainer,
    storage::VisitStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const PLACEHOLDER_SECRET: &str = "visitor-intent-secret-placeholder";

fn run_one_cycle(
    config: &IntentConfig,
    store: &VisitStore,
    recorder: &VisitRecorder,
    retrainer: &Retrainer,
    classifier: &SharedClassifier,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Some(path) = config.import_path.as_ref() {
        let imported = recorder.drain_inbox(store, path)?;
        if imported > 0 {
            info!(imported, path = %path.display(), "imported visits");
        }
    }

    let report = retrainer.run(store)?;
    let line = LogEvent::new("visitor_intent::retrain", "retraining report", &report);
    StructuredLogger::emit_json(&line, &mut std::io::stdout());
    classifier.replace(report.classifier);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("VISITOR_INTENT_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let config = IntentConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(data_dir = ?config.data_dir, "visitor intent starting");

    std::fs::create_dir_all(&config.data_dir)?;
    let secret = std::env::var("VISITOR_INTENT_SECRET").unwrap_or_else(|_| {
        warn!("VISITOR_INTENT_SECRET not set; using placeholder store key");
        PLACEHOLDER_SECRET.to_string()
    });
    let store = VisitStore::open(&config.store_path(), secret.as_bytes())?;

    let classifier = Arc::new(SharedClassifier::new(store.load_model()?.unwrap_or_default()));
    info!(total_samples = classifier.total_samples(), "model loaded");
    let recorder = VisitRecorder::new(Arc::clone(&classifier));
    let retrainer = Retrainer::new(config.labeling.clone(), config.retrain.clone());

    let interval_secs = config.retrain.interval_secs;
    if interval_secs > 0 {
        info!(interval_secs, "daemon mode (Ctrl+C to stop)");
        static STOP: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
        let _ = ctrlc::set_handler(|| {
            STOP.store(true, std::sync::atomic::Ordering::Relaxed);
        });
        let mut cycle: u64 = 0;
        while !STOP.load(std::sync::atomic::Ordering::Relaxed) {
            cycle += 1;
            if let Err(e) = run_one_cycle(&config, &store, &recorder, &retrainer, &classifier) {
                warn!(cycle, error = %e, "cycle failed");
            }
            for _ in 0..interval_secs {
                if STOP.load(std::sync::atomic::Ordering::Relaxed) {
                    break;
                }
                std::thread::sleep(Duration::from_secs(1));
            }
        }
        info!("visitor intent stopping");
    } else {
        run_one_cycle(&config, &store, &recorder, &retrainer, &classifier)?;
        info!("visitor intent cycle complete");
    }

    Ok(())
}
