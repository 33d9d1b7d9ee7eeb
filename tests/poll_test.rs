//! Integration tests for the poll lifecycle.

mod common;

use std::time::Duration;

use classpulse_core::error::ErrorKind;
use common::{admin, faculty, sample_poll, student, TestApp};

#[tokio::test]
async fn test_create_poll_requires_faculty() {
    let app = TestApp::new();

    let err = app
        .poll_service
        .create_poll(&student(1), sample_poll())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Permission);
}

#[tokio::test]
async fn test_create_poll_requires_two_options() {
    let app = TestApp::new();

    let mut input = sample_poll();
    input.options = vec!["Only one".into()];
    let err = app
        .poll_service
        .create_poll(&faculty(1), input)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidPoll);
}

#[tokio::test]
async fn test_created_poll_is_active_with_tags() {
    let app = TestApp::new();

    let poll = app
        .poll_service
        .create_poll(&faculty(1), sample_poll())
        .await
        .unwrap();

    assert!(poll.is_active);
    assert_eq!(poll.options.len(), 2);
    assert_eq!(poll.options[1].index, 1);
    // The question mentions "momentum" and "energy" from the fixed
    // vocabulary.
    assert!(poll.tags.contains(&"momentum".to_string()));
    assert_eq!(app.poll_service.pending_timers(), 1);
}

#[tokio::test]
async fn test_vote_on_unknown_poll() {
    let app = TestApp::new();

    let err = app
        .poll_service
        .vote(&student(2), 999, 0)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_vote_with_out_of_range_option() {
    let app = TestApp::new();
    let poll = app
        .poll_service
        .create_poll(&faculty(1), sample_poll())
        .await
        .unwrap();

    let err = app
        .poll_service
        .vote(&student(2), poll.id, 2)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOption);

    let err = app
        .poll_service
        .vote(&student(2), poll.id, -1)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOption);
}

#[tokio::test]
async fn test_revote_upserts() {
    let app = TestApp::new();
    let poll = app
        .poll_service
        .create_poll(&faculty(1), sample_poll())
        .await
        .unwrap();

    app.poll_service.vote(&student(2), poll.id, 0).await.unwrap();
    let results = app.poll_service.vote(&student(2), poll.id, 1).await.unwrap();

    assert_eq!(results.total, 1);
    assert_eq!(results.votes["Momentum only"], 0);
    assert_eq!(results.votes["Momentum and kinetic energy"], 1);
}

#[tokio::test]
async fn test_tally_counts_distinct_voters() {
    let app = TestApp::new();
    let poll = app
        .poll_service
        .create_poll(&faculty(1), sample_poll())
        .await
        .unwrap();

    app.poll_service.vote(&student(2), poll.id, 0).await.unwrap();
    app.poll_service.vote(&student(3), poll.id, 0).await.unwrap();
    app.poll_service.vote(&student(4), poll.id, 1).await.unwrap();
    // User 2 changes their mind; still three voters.
    app.poll_service.vote(&student(2), poll.id, 1).await.unwrap();

    let results = app.poll_service.results(poll.id).await.unwrap();
    assert_eq!(results.total, 3);
    assert_eq!(results.votes.values().sum::<i64>(), 3);
    assert_eq!(results.percentages["Momentum and kinetic energy"], 67);
}

#[tokio::test]
async fn test_results_with_zero_votes() {
    let app = TestApp::new();
    let poll = app
        .poll_service
        .create_poll(&faculty(1), sample_poll())
        .await
        .unwrap();

    let results = app.poll_service.results(poll.id).await.unwrap();
    assert_eq!(results.total, 0);
    assert!(results.percentages.values().all(|&pct| pct == 0));
}

#[tokio::test]
async fn test_vote_after_manual_close() {
    let app = TestApp::new();
    let poll = app
        .poll_service
        .create_poll(&faculty(1), sample_poll())
        .await
        .unwrap();

    app.poll_service.close_poll(&faculty(1), poll.id).await.unwrap();

    let err = app
        .poll_service
        .vote(&student(2), poll.id, 0)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::PollClosed);
}

#[tokio::test]
async fn test_close_permissions() {
    let app = TestApp::new();
    let poll = app
        .poll_service
        .create_poll(&faculty(1), sample_poll())
        .await
        .unwrap();

    // Not the creator, not an admin.
    let err = app
        .poll_service
        .close_poll(&faculty(8), poll.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Permission);

    // Admins may close anyone's poll.
    app.poll_service.close_poll(&admin(9), poll.id).await.unwrap();
    assert!(!app.poll_service.get_poll(poll.id).await.unwrap().is_active);
}

#[tokio::test]
async fn test_close_is_idempotent_and_cancels_timer() {
    let app = TestApp::new();
    let (_conn, mut rx) = app.connect(10, Some(5), &[]);

    let poll = app
        .poll_service
        .create_poll(&faculty(1), sample_poll())
        .await
        .unwrap();
    common::drain_events(&mut rx);

    app.poll_service.close_poll(&faculty(1), poll.id).await.unwrap();
    assert_eq!(app.poll_service.pending_timers(), 0);

    // Second close: no error, no second broadcast.
    app.poll_service.close_poll(&faculty(1), poll.id).await.unwrap();

    let closed_events: Vec<_> = common::drain_events(&mut rx)
        .into_iter()
        .filter(|(event_type, _)| event_type == "poll:closed")
        .collect();
    assert_eq!(closed_events.len(), 1);
}

#[tokio::test]
async fn test_auto_close_fires_at_expiry() {
    let app = TestApp::new();

    let mut input = sample_poll();
    input.timer_duration_seconds = Some(1);
    let poll = app
        .poll_service
        .create_poll(&faculty(1), input)
        .await
        .unwrap();
    assert!(poll.is_active);

    tokio::time::sleep(Duration::from_millis(1200)).await;

    assert!(!app.poll_service.get_poll(poll.id).await.unwrap().is_active);
    let err = app
        .poll_service
        .vote(&student(2), poll.id, 0)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::PollClosed);
}

#[tokio::test]
async fn test_related_content_by_tag_overlap() {
    let app = TestApp::new();
    app.contents
        .insert("Collisions handout", "Physics", vec!["momentum".into()]);
    app.contents
        .insert("Unrelated handout", "History", vec!["revolution".into()]);

    let poll = app
        .poll_service
        .create_poll(&faculty(1), sample_poll())
        .await
        .unwrap();

    let related = app
        .poll_service
        .find_related_content(poll.id, None)
        .await
        .unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].title, "Collisions handout");
}

#[tokio::test]
async fn test_related_content_empty_without_tags() {
    let app = TestApp::new();
    app.contents
        .insert("Collisions handout", "Physics", vec!["momentum".into()]);

    // A question with no vocabulary hits and no word longer than three
    // characters yields no tags at all.
    let mut input = sample_poll();
    input.question = "why is it so".into();
    let poll = app
        .poll_service
        .create_poll(&faculty(1), input)
        .await
        .unwrap();
    assert!(poll.tags.is_empty());

    let related = app
        .poll_service
        .find_related_content(poll.id, None)
        .await
        .unwrap();
    assert!(related.is_empty());
}
