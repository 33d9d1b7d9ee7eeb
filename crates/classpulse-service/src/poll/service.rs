//! Poll lifecycle controller.
//!
//! Owns all poll/vote persistence calls, the open-to-closed state
//! machine, the per-poll auto-close timers, and tally computation. Every
//! state change is emitted through the broadcast dispatcher.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use classpulse_core::error::AppError;
use classpulse_core::result::AppResult;
use classpulse_core::traits::tagger::TagGenerator;
use classpulse_core::types::pagination::{PageRequest, PageResponse};
use classpulse_database::repositories::{ContentRepository, PollRepository, VoteRepository};
use classpulse_entity::content::ContentSummary;
use classpulse_entity::poll::{NewPoll, Poll, PollOption};
use classpulse_realtime::dispatch::dispatcher::BroadcastDispatcher;
use classpulse_realtime::dispatch::filter::BroadcastFilter;

use crate::context::RequestContext;
use crate::tags::keywords::KeywordExtractor;

use super::results::{compute_results, PollResults};

/// Default number of related content items returned.
const DEFAULT_RELATED_LIMIT: i64 = 3;

/// Parameters for creating a poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePollInput {
    /// Poll title.
    pub title: String,
    /// The question being asked.
    pub question: String,
    /// Option texts in display order. At least two required.
    pub options: Vec<String>,
    /// Subject the poll belongs to.
    pub subject: String,
    /// Department scope for broadcast routing.
    pub department_id: Option<i64>,
    /// Optional related course content.
    pub content_id: Option<i64>,
    /// Auto-close timer duration in seconds; the configured default when
    /// absent.
    pub timer_duration_seconds: Option<i64>,
}

/// Manages the full poll lifecycle: `Created -> Active -> Closed`.
#[derive(Clone)]
pub struct PollService {
    polls: Arc<dyn PollRepository>,
    votes: Arc<dyn VoteRepository>,
    contents: Arc<dyn ContentRepository>,
    dispatcher: Arc<BroadcastDispatcher>,
    tagger: Option<Arc<dyn TagGenerator>>,
    keywords: KeywordExtractor,
    /// Pending auto-close tasks keyed by poll id, so a manual close can
    /// cancel the timer instead of letting it fire into a no-op.
    timers: Arc<Mutex<HashMap<i64, JoinHandle<()>>>>,
    default_timer_seconds: i64,
}

impl std::fmt::Debug for PollService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollService").finish()
    }
}

impl PollService {
    /// Creates a new poll service.
    pub fn new(
        polls: Arc<dyn PollRepository>,
        votes: Arc<dyn VoteRepository>,
        contents: Arc<dyn ContentRepository>,
        dispatcher: Arc<BroadcastDispatcher>,
        tagger: Option<Arc<dyn TagGenerator>>,
        default_timer_seconds: i64,
    ) -> Self {
        Self {
            polls,
            votes,
            contents,
            dispatcher,
            tagger,
            keywords: KeywordExtractor::new(),
            timers: Arc::new(Mutex::new(HashMap::new())),
            default_timer_seconds,
        }
    }

    /// Create a poll, schedule its auto-close, and announce it.
    pub async fn create_poll(
        &self,
        ctx: &RequestContext,
        input: CreatePollInput,
    ) -> AppResult<Poll> {
        if !ctx.is_faculty_or_above() {
            return Err(AppError::permission("Only faculty can create polls"));
        }
        if input.options.len() < 2 {
            return Err(AppError::invalid_poll("A poll needs at least two options"));
        }

        let tags = self.derive_tags(&input.question).await;

        let timer_seconds = input
            .timer_duration_seconds
            .filter(|&secs| secs > 0)
            .unwrap_or(self.default_timer_seconds);

        let options = input
            .options
            .iter()
            .enumerate()
            .map(|(index, text)| PollOption {
                index: index as i32,
                text: text.clone(),
            })
            .collect();

        let poll = self
            .polls
            .create(&NewPoll {
                title: input.title,
                question: input.question,
                options,
                created_by: ctx.user_id,
                subject: input.subject,
                department_id: input.department_id,
                content_id: input.content_id,
                tags,
                timer_duration_seconds: timer_seconds,
                expires_at: Utc::now() + Duration::seconds(timer_seconds),
            })
            .await?;

        // Scheduled strictly after the active poll is persisted, so the
        // close event always follows the creation event.
        self.schedule_auto_close(poll.id, timer_seconds);

        info!(
            poll_id = poll.id,
            created_by = ctx.user_id,
            timer_seconds,
            "Poll created"
        );

        let filter = BroadcastFilter::subject(&poll.subject).with_department(poll.department_id);
        self.dispatcher
            .broadcast("poll:created", serde_json::to_value(&poll)?, &filter);

        Ok(poll)
    }

    /// Record (or overwrite) the caller's vote and announce the new tally.
    pub async fn vote(
        &self,
        ctx: &RequestContext,
        poll_id: i64,
        option_index: i32,
    ) -> AppResult<PollResults> {
        let poll = self.find_poll(poll_id).await?;
        if !poll.is_active {
            return Err(AppError::poll_closed(format!("Poll {poll_id} is closed")));
        }
        if !poll.has_option(option_index) {
            return Err(AppError::invalid_option(format!(
                "Option {option_index} is out of range for poll {poll_id}"
            )));
        }

        self.votes.upsert(poll_id, ctx.user_id, option_index).await?;
        debug!(poll_id, user_id = ctx.user_id, option_index, "Vote recorded");

        let results = self.tally(&poll).await?;
        let filter = BroadcastFilter::all().with_department(poll.department_id);
        self.dispatcher
            .broadcast("poll:vote", serde_json::to_value(&results)?, &filter);

        Ok(results)
    }

    /// Close a poll on behalf of its creator or an admin.
    ///
    /// Idempotent: closing an already-closed poll is a no-op that simply
    /// returns the final tally.
    pub async fn close_poll(&self, ctx: &RequestContext, poll_id: i64) -> AppResult<PollResults> {
        let poll = self.find_poll(poll_id).await?;
        if poll.created_by != ctx.user_id && !ctx.is_admin() {
            return Err(AppError::permission(
                "Only the poll creator or an admin can close a poll",
            ));
        }

        self.cancel_timer(poll_id);
        self.finalize(poll_id).await
    }

    /// Timer-fired close path.
    async fn auto_close(&self, poll_id: i64) {
        self.timers.lock().expect("timer lock poisoned").remove(&poll_id);
        if let Err(e) = self.finalize(poll_id).await {
            warn!(poll_id, error = %e, "Auto-close failed");
        }
    }

    /// Terminal transition shared by both close paths.
    ///
    /// The repository flips `is_active` atomically, so exactly one caller
    /// observes the transition and broadcasts; everyone else is a no-op.
    async fn finalize(&self, poll_id: i64) -> AppResult<PollResults> {
        let transitioned = self.polls.set_inactive(poll_id).await?;
        let poll = self.find_poll(poll_id).await?;
        let results = self.tally(&poll).await?;

        if transitioned {
            info!(poll_id, total_votes = results.total, "Poll closed");
            let filter = BroadcastFilter::all().with_department(poll.department_id);
            self.dispatcher
                .broadcast("poll:closed", serde_json::to_value(&results)?, &filter);
        }

        Ok(results)
    }

    /// Current tally for a poll.
    pub async fn results(&self, poll_id: i64) -> AppResult<PollResults> {
        let poll = self.find_poll(poll_id).await?;
        self.tally(&poll).await
    }

    /// Fetch a poll by id.
    pub async fn get_poll(&self, poll_id: i64) -> AppResult<Poll> {
        self.find_poll(poll_id).await
    }

    /// List active polls, optionally filtered by subject and department.
    pub async fn list_active(
        &self,
        subject: Option<&str>,
        department_id: Option<i64>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Poll>> {
        self.polls.find_active(subject, department_id, page).await
    }

    /// Course content sharing tags with the poll. Empty when the poll has
    /// no tags.
    pub async fn find_related_content(
        &self,
        poll_id: i64,
        limit: Option<i64>,
    ) -> AppResult<Vec<ContentSummary>> {
        let poll = self.find_poll(poll_id).await?;
        if poll.tags.is_empty() {
            return Ok(Vec::new());
        }
        self.contents
            .find_by_tag_overlap(&poll.tags, limit.unwrap_or(DEFAULT_RELATED_LIMIT))
            .await
    }

    /// Number of pending auto-close timers (diagnostics).
    pub fn pending_timers(&self) -> usize {
        self.timers.lock().expect("timer lock poisoned").len()
    }

    async fn find_poll(&self, poll_id: i64) -> AppResult<Poll> {
        self.polls
            .find_by_id(poll_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Poll {poll_id} not found")))
    }

    async fn tally(&self, poll: &Poll) -> AppResult<PollResults> {
        let votes = self.votes.find_by_poll(poll.id).await?;
        Ok(compute_results(poll, &votes))
    }

    /// Ask the external tag generator, falling back to local keyword
    /// extraction. Never fails the surrounding operation.
    async fn derive_tags(&self, question: &str) -> Vec<String> {
        if let Some(tagger) = &self.tagger {
            match tagger.generate(question).await {
                Ok(tags) if !tags.is_empty() => return tags,
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Tag generator unavailable, using keyword fallback");
                }
            }
        }
        self.keywords.extract(question)
    }

    fn schedule_auto_close(&self, poll_id: i64, timer_seconds: i64) {
        let service = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(timer_seconds.max(0) as u64)).await;
            service.auto_close(poll_id).await;
        });
        self.timers
            .lock()
            .expect("timer lock poisoned")
            .insert(poll_id, handle);
    }

    fn cancel_timer(&self, poll_id: i64) {
        if let Some(handle) = self
            .timers
            .lock()
            .expect("timer lock poisoned")
            .remove(&poll_id)
        {
            handle.abort();
            debug!(poll_id, "Auto-close timer cancelled");
        }
    }
}
