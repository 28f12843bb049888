//! Shared handler state

use std::sync::Arc;

use poise_core::QuestionBank;
use poise_signal::SignalRelay;
use poise_vision::{FrameAnalyzer, LandmarkDetector};
use tokio::sync::Semaphore;

use crate::ServerConfig;

/// State handed to every request and session
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub relay: Arc<SignalRelay>,
    pub analyzer: FrameAnalyzer,
    pub questions: QuestionBank,
    /// Bounds concurrent frame analyses
    pub analysis_permits: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: ServerConfig, detector: Arc<dyn LandmarkDetector>) -> Self {
        AppState {
            relay: Arc::new(SignalRelay::with_config(config.relay_config())),
            analyzer: FrameAnalyzer::new(detector),
            questions: QuestionBank::new(),
            analysis_permits: Arc::new(Semaphore::new(config.analysis_concurrency)),
            config: Arc::new(config),
        }
    }
}
