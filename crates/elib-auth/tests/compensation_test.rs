//! Failure paths: nothing is left half-created and a failed refresh ends
//! its session.

mod helpers;

use std::sync::atomic::Ordering;
use std::time::Duration;

use elib_core::error::ErrorKind;

use helpers::TestApp;

#[tokio::test]
async fn test_failed_session_insert_leaves_nothing() {
    let app = TestApp::new();
    app.create_test_user("alice", "pw", "teacher").await;
    app.store.fail_create.store(true, Ordering::SeqCst);

    let err = app.login("alice", "pw").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Internal);
    assert_eq!(err.public_message(), "internal error");
    assert_eq!(app.store.inner.session_count().await, 0);
}

#[tokio::test]
async fn test_login_with_missing_role_is_internal() {
    let app = TestApp::new();
    let user_id = app.create_test_user("alice", "pw", "teacher").await;
    app.users.remove_role(user_id).await;

    let err = app.login("alice", "pw").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Internal);
    assert!(err.message.starts_with("create session: resolve role"));
    assert_eq!(app.store.inner.session_count().await, 0);
}

#[tokio::test]
async fn test_failed_rotation_ends_session() {
    let app = TestApp::new();
    app.create_test_user("bob", "pw", "student").await;
    let pair = app.login("bob", "pw").await.unwrap();
    let session_id = app.session_of(&pair).await;

    app.store.fail_rotate.store(true, Ordering::SeqCst);
    let err = app.service.update(&pair.refresh_token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Internal);
    assert!(err.message.starts_with("update session: store refresh token"));

    let session = app.store.inner.session(session_id).await.unwrap();
    assert!(session.logged_out_at.is_some());
    assert_eq!(app.store.inner.live_token_count(session_id).await, 0);
}

#[tokio::test]
async fn test_missing_role_on_refresh_ends_session() {
    let app = TestApp::new();
    let user_id = app.create_test_user("carol", "pw", "manager").await;
    let pair = app.login("carol", "pw").await.unwrap();
    let session_id = app.session_of(&pair).await;

    app.users.remove_role(user_id).await;
    let err = app.service.update(&pair.refresh_token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let session = app.store.inner.session(session_id).await.unwrap();
    assert!(session.logged_out_at.is_some());
    assert_eq!(app.store.inner.live_token_count(session_id).await, 0);
}

#[tokio::test]
async fn test_cleanup_failure_keeps_original_error() {
    let app = TestApp::new();
    app.create_test_user("dave", "pw", "student").await;
    let pair = app.login("dave", "pw").await.unwrap();

    app.store.fail_rotate.store(true, Ordering::SeqCst);
    app.store.fail_end.store(true, Ordering::SeqCst);
    let err = app.service.update(&pair.refresh_token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Internal);
    assert!(err.message.contains("injected rotate failure"));
}

#[tokio::test]
async fn test_logout_surfaces_end_session_failure() {
    let app = TestApp::new();
    app.create_test_user("erin", "pw", "student").await;
    let pair = app.login("erin", "pw").await.unwrap();

    app.store.fail_end.store(true, Ordering::SeqCst);
    let err = app.service.delete(&pair.refresh_token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Internal);
}

#[tokio::test]
async fn test_logout_surfaces_storage_failure_on_pop() {
    let app = TestApp::new();
    app.store.fail_pop.store(true, Ordering::SeqCst);

    let err = app.service.delete("anything").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Internal);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_refresh_still_completes() {
    let app = TestApp::new();
    app.create_test_user("frank", "pw", "teacher").await;
    let pair = app.login("frank", "pw").await.unwrap();
    let session_id = app.session_of(&pair).await;

    *app.store.rotate_delay.lock().unwrap() = Some(Duration::from_millis(50));
    let outcome =
        tokio::time::timeout(Duration::from_millis(10), app.service.update(&pair.refresh_token))
            .await;
    assert!(outcome.is_err(), "caller should give up before rotation finishes");

    tokio::time::sleep(Duration::from_millis(100)).await;

    let session = app.store.inner.session(session_id).await.unwrap();
    assert!(session.is_active());
    assert_eq!(app.store.inner.live_token_count(session_id).await, 1);
}
