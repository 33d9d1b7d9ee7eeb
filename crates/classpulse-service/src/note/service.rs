//! Collaborative note session broadcaster.
//!
//! Owns note-session/contribution persistence and emits every mutation
//! through the dispatcher on per-session topics.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use classpulse_core::error::AppError;
use classpulse_core::result::AppResult;
use classpulse_core::traits::tagger::SketchTagger;
use classpulse_core::types::pagination::{PageRequest, PageResponse};
use classpulse_database::repositories::{ContributionRepository, NoteSessionRepository};
use classpulse_entity::note::{
    ContentKind, Contribution, NewContribution, NewNoteSession, NoteSession,
};
use classpulse_realtime::dispatch::dispatcher::BroadcastDispatcher;
use classpulse_realtime::dispatch::filter::BroadcastFilter;

use crate::context::RequestContext;
use crate::tags::keywords::KeywordExtractor;

/// Parameters for creating a note session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionInput {
    /// Session title.
    pub title: String,
    /// Seed content shown to participants.
    pub content: String,
    /// Subject the session belongs to.
    pub subject: String,
    /// Department scope for broadcast routing.
    pub department_id: Option<i64>,
}

/// Parameters for adding a contribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddContributionInput {
    /// Contribution body (text, or a caption for sketches).
    pub content: String,
    /// What kind of content this is.
    pub content_type: ContentKind,
    /// Base64 sketch data, for sketch contributions.
    pub sketch_data: Option<String>,
}

/// Manages note sessions and their append-only contributions.
#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteSessionRepository>,
    contributions: Arc<dyn ContributionRepository>,
    dispatcher: Arc<BroadcastDispatcher>,
    sketch_tagger: Option<Arc<dyn SketchTagger>>,
    keywords: KeywordExtractor,
}

impl std::fmt::Debug for NoteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteService").finish()
    }
}

impl NoteService {
    /// Creates a new note service.
    pub fn new(
        notes: Arc<dyn NoteSessionRepository>,
        contributions: Arc<dyn ContributionRepository>,
        dispatcher: Arc<BroadcastDispatcher>,
        sketch_tagger: Option<Arc<dyn SketchTagger>>,
    ) -> Self {
        Self {
            notes,
            contributions,
            dispatcher,
            sketch_tagger,
            keywords: KeywordExtractor::new(),
        }
    }

    /// Create a session and announce it.
    pub async fn create_session(
        &self,
        ctx: &RequestContext,
        input: CreateSessionInput,
    ) -> AppResult<NoteSession> {
        if !ctx.is_faculty_or_above() {
            return Err(AppError::permission("Only faculty can create note sessions"));
        }

        let session = self
            .notes
            .create(&NewNoteSession {
                title: input.title,
                content: input.content,
                created_by: ctx.user_id,
                subject: input.subject,
                department_id: input.department_id,
            })
            .await?;

        info!(note_id = session.id, created_by = ctx.user_id, "Note session created");

        let filter =
            BroadcastFilter::subject(&session.subject).with_department(session.department_id);
        self.dispatcher.broadcast(
            "note_session_created",
            serde_json::to_value(&session)?,
            &filter,
        );

        Ok(session)
    }

    /// Record a contribution to an active session and announce it on the
    /// session's topic.
    pub async fn add_contribution(
        &self,
        ctx: &RequestContext,
        note_id: i64,
        input: AddContributionInput,
    ) -> AppResult<Contribution> {
        let session = self.find_session(note_id).await?;
        if !session.is_active_session {
            return Err(AppError::session_not_active(format!(
                "Note session {note_id} is not accepting contributions"
            )));
        }

        let tags = match input.content_type {
            ContentKind::Text => self.keywords.extract(&input.content),
            ContentKind::Sketch => {
                let sketch = input.sketch_data.as_deref().unwrap_or(&input.content);
                self.sketch_tags(sketch).await
            }
        };

        let contribution = self
            .contributions
            .create(&NewContribution {
                note_id,
                user_id: ctx.user_id,
                content: input.content,
                content_type: input.content_type,
                tags,
            })
            .await?;

        debug!(
            note_id,
            contribution_id = contribution.id,
            user_id = ctx.user_id,
            "Contribution recorded"
        );

        self.dispatcher.broadcast(
            &format!("note_contribution_{note_id}"),
            serde_json::to_value(&contribution)?,
            &BroadcastFilter::subject(&session.subject),
        );

        Ok(contribution)
    }

    /// Toggle whether a session accepts contributions. Creator only.
    pub async fn update_session_status(
        &self,
        ctx: &RequestContext,
        note_id: i64,
        is_active: bool,
    ) -> AppResult<NoteSession> {
        let session = self.find_session(note_id).await?;
        if session.created_by != ctx.user_id {
            return Err(AppError::permission(
                "Only the session creator can change its status",
            ));
        }

        let ends_at = if is_active { None } else { Some(Utc::now()) };
        let updated = self.notes.update_status(note_id, is_active, ends_at).await?;

        info!(note_id, is_active, "Note session status updated");
        self.broadcast_session_update(&updated)?;

        Ok(updated)
    }

    /// Soft-delete a session. Creator only.
    ///
    /// The terminal state is announced on the session's update topic so
    /// live viewers see the session end.
    pub async fn delete_session(&self, ctx: &RequestContext, note_id: i64) -> AppResult<()> {
        let session = self.find_session(note_id).await?;
        if session.created_by != ctx.user_id {
            return Err(AppError::permission(
                "Only the session creator can delete it",
            ));
        }

        if !self.notes.soft_delete(note_id).await? {
            warn!(note_id, "Delete raced with another delete");
            return Ok(());
        }

        info!(note_id, "Note session deleted");

        let mut deleted = session;
        deleted.is_active = false;
        deleted.is_active_session = false;
        self.broadcast_session_update(&deleted)?;

        Ok(())
    }

    /// Fetch a session by id.
    pub async fn get_session(&self, note_id: i64) -> AppResult<NoteSession> {
        self.find_session(note_id).await
    }

    /// List non-deleted sessions, optionally filtered by subject.
    pub async fn list_active(
        &self,
        subject: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<NoteSession>> {
        self.notes.find_active(subject, page).await
    }

    /// List a session's contributions in submission order.
    pub async fn list_contributions(
        &self,
        note_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Contribution>> {
        self.find_session(note_id).await?;
        self.contributions.find_by_note(note_id, page).await
    }

    async fn find_session(&self, note_id: i64) -> AppResult<NoteSession> {
        self.notes
            .find_by_id(note_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Note session {note_id} not found")))
    }

    /// Sketch recognition is best-effort: the contribution is recorded
    /// with empty tags when the collaborator fails.
    async fn sketch_tags(&self, sketch_data: &str) -> Vec<String> {
        match &self.sketch_tagger {
            Some(tagger) => match tagger.generate(sketch_data).await {
                Ok(tags) => tags,
                Err(e) => {
                    warn!(error = %e, "Sketch tagger unavailable, continuing without tags");
                    Vec::new()
                }
            },
            None => Vec::new(),
        }
    }

    fn broadcast_session_update(&self, session: &NoteSession) -> AppResult<()> {
        let filter =
            BroadcastFilter::subject(&session.subject).with_department(session.department_id);
        self.dispatcher.broadcast(
            &format!("note_session_update_{}", session.id),
            serde_json::to_value(session)?,
            &filter,
        );
        Ok(())
    }
}
