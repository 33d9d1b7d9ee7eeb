#![allow(dead_code)]

//! Shared test helpers for integration tests.
//!
//! Builds the full service graph over the in-memory persistence backend,
//! so tests exercise real services, the real hub, and the real router
//! without any external processes.

use std::sync::Arc;

use tokio::sync::mpsc;

use classpulse_core::config::realtime::RealtimeConfig;
use classpulse_core::config::AppConfig;
use classpulse_database::memory::content::MemoryContentRepository;
use classpulse_database::memory::contribution::MemoryContributionRepository;
use classpulse_database::memory::note::MemoryNoteSessionRepository;
use classpulse_database::memory::poll::MemoryPollRepository;
use classpulse_database::memory::vote::MemoryVoteRepository;
use classpulse_entity::user::UserRole;
use classpulse_realtime::connection::handle::{ClientIdentity, ConnectionHandle};
use classpulse_realtime::hub::RealtimeHub;
use classpulse_realtime::message::types::OutboundFrame;
use classpulse_service::context::RequestContext;
use classpulse_service::note::service::NoteService;
use classpulse_service::poll::service::{CreatePollInput, PollService};

/// Test application context.
pub struct TestApp {
    /// The real-time hub.
    pub hub: Arc<RealtimeHub>,
    /// Poll lifecycle service.
    pub poll_service: Arc<PollService>,
    /// Note session service.
    pub note_service: Arc<NoteService>,
    /// Content store handle, for seeding related-content fixtures.
    pub contents: Arc<MemoryContentRepository>,
}

impl TestApp {
    /// Build a fresh application over empty in-memory stores.
    pub fn new() -> Self {
        let polls = Arc::new(MemoryPollRepository::new());
        let votes = Arc::new(MemoryVoteRepository::new());
        let notes = Arc::new(MemoryNoteSessionRepository::new());
        let contributions = Arc::new(MemoryContributionRepository::new());
        let contents = Arc::new(MemoryContentRepository::new());

        let hub = Arc::new(RealtimeHub::new(RealtimeConfig::default()));

        let poll_service = Arc::new(PollService::new(
            polls,
            votes,
            contents.clone(),
            Arc::clone(hub.dispatcher()),
            None,
            30,
        ));
        let note_service = Arc::new(NoteService::new(
            notes,
            contributions,
            Arc::clone(hub.dispatcher()),
            None,
        ));

        Self {
            hub,
            poll_service,
            note_service,
            contents,
        }
    }

    /// The axum router over this app's state.
    pub fn router(&self) -> axum::Router {
        classpulse_api::router::build_router(classpulse_api::state::AppState {
            config: Arc::new(AppConfig::default()),
            hub: Arc::clone(&self.hub),
            poll_service: Arc::clone(&self.poll_service),
            note_service: Arc::clone(&self.note_service),
        })
    }

    /// Register a connection and bind an identity.
    pub fn connect(
        &self,
        user_id: i64,
        department_id: Option<i64>,
        subjects: &[&str],
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundFrame>) {
        let (handle, rx) = self.hub.registry().register();
        self.hub.registry().authenticate(
            &handle.id,
            ClientIdentity {
                user_id,
                department_id,
                subjects: subjects.iter().map(|s| s.to_string()).collect(),
            },
        );
        (handle, rx)
    }

    /// Register a connection without binding an identity.
    pub fn connect_anonymous(&self) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundFrame>) {
        self.hub.registry().register()
    }
}

/// A faculty caller in department 5.
pub fn faculty(user_id: i64) -> RequestContext {
    RequestContext::new(user_id, UserRole::Faculty, Some(5))
}

/// A student caller in department 5.
pub fn student(user_id: i64) -> RequestContext {
    RequestContext::new(user_id, UserRole::Student, Some(5))
}

/// An admin caller.
pub fn admin(user_id: i64) -> RequestContext {
    RequestContext::new(user_id, UserRole::Admin, None)
}

/// A two-option Physics poll for department 5.
pub fn sample_poll() -> CreatePollInput {
    CreatePollInput {
        title: "Quick check".into(),
        question: "How does momentum relate to kinetic energy in an elastic collision?".into(),
        options: vec!["Momentum only".into(), "Momentum and kinetic energy".into()],
        subject: "Physics".into(),
        department_id: Some(5),
        content_id: None,
        timer_duration_seconds: Some(60),
    }
}

/// Drain every queued event from a connection, parsed into
/// `(event_type, data)` pairs. Pings and closes are skipped.
pub fn drain_events(rx: &mut mpsc::Receiver<OutboundFrame>) -> Vec<(String, serde_json::Value)> {
    let mut events = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        if let OutboundFrame::Event(text) = frame {
            let value: serde_json::Value =
                serde_json::from_str(&text).expect("event frames are valid JSON");
            let event_type = value["type"].as_str().expect("event has a type").to_string();
            events.push((event_type, value["data"].clone()));
        }
    }
    events
}
