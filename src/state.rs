use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;

use crate::analysis::AnalysisConfig;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    analysis_defaults: Arc<AnalysisConfig>,
    analysis_slots: Arc<Semaphore>,
    stats: Arc<RuntimeStats>,
    started_at: Instant,
}

#[derive(Default)]
pub struct RuntimeStats {
    pub analyses_completed: AtomicU64,
    pub analyses_failed: AtomicU64,
    pub frames_processed: AtomicU64,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let from_env = AnalysisConfig::from_env(&config.analysis);
        let analysis_defaults = match from_env.validate() {
            Ok(()) => from_env,
            Err(e) => {
                tracing::warn!(error = %e, "Analysis env config invalid, falling back to built-in defaults");
                AnalysisConfig::default()
            }
        };

        Self {
            config: Arc::new(config.clone()),
            analysis_defaults: Arc::new(analysis_defaults),
            analysis_slots: Arc::new(Semaphore::new(config.limits.max_concurrent_analyses.max(1))),
            stats: Arc::new(RuntimeStats::default()),
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn analysis_defaults(&self) -> &AnalysisConfig {
        &self.analysis_defaults
    }

    pub fn analysis_slots(&self) -> &Arc<Semaphore> {
        &self.analysis_slots
    }

    pub fn stats(&self) -> &RuntimeStats {
        &self.stats
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

impl RuntimeStats {
    pub fn record_success(&self, frames: u64) {
        self.analyses_completed.fetch_add(1, Ordering::Relaxed);
        self.frames_processed.fetch_add(frames, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.analyses_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "analysesCompleted": self.analyses_completed.load(Ordering::Relaxed),
            "analysesFailed": self.analyses_failed.load(Ordering::Relaxed),
            "framesProcessed": self.frames_processed.load(Ordering::Relaxed),
        })
    }
}
