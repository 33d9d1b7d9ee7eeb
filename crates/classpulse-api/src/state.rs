//! Shared application state threaded through every handler.

use std::sync::Arc;

use classpulse_core::config::AppConfig;
use classpulse_realtime::hub::RealtimeHub;
use classpulse_service::note::service::NoteService;
use classpulse_service::poll::service::PollService;

/// State available to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// The real-time hub (registry + dispatcher + heartbeat).
    pub hub: Arc<RealtimeHub>,
    /// Poll lifecycle service.
    pub poll_service: Arc<PollService>,
    /// Note session service.
    pub note_service: Arc<NoteService>,
}
