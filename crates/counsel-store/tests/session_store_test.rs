//! Integration tests for the in-memory session store.

use chrono::{DateTime, Duration, TimeZone, Utc};
use counsel_core::error::CounselError;
use counsel_core::models::session::{AttorneySession, SessionId, SessionStatus, SessionTouch};
use counsel_core::repository::SessionStore;
use counsel_store::InMemorySessionStore;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn verified(id: &str) -> AttorneySession {
    AttorneySession {
        id: SessionId::new(id),
        status: SessionStatus::Verified,
        created_at: t0(),
        expires_at: t0() + Duration::seconds(1_800),
        last_activity_at: t0(),
    }
}

#[tokio::test]
async fn clones_share_sessions() {
    let store = InMemorySessionStore::new();
    let other = store.clone();
    store.insert(verified("session-a")).await.unwrap();

    let found = other.get(&SessionId::new("session-a")).await.unwrap();
    assert_eq!(found.unwrap().status, SessionStatus::Verified);
    assert_eq!(other.len(), 1);
}

#[tokio::test]
async fn duplicate_id_is_already_exists() {
    let store = InMemorySessionStore::new();
    store.insert(verified("session-a")).await.unwrap();
    let err = store.insert(verified("session-a")).await.unwrap_err();
    assert!(matches!(err, CounselError::AlreadyExists { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_touches_after_expiry_mark_once() {
    let store = InMemorySessionStore::new();
    store.insert(verified("session-a")).await.unwrap();
    let late = t0() + Duration::seconds(1_801);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.touch(&SessionId::new("session-a"), late).await.unwrap()
        }));
    }

    let mut transitions = 0;
    for handle in handles {
        match handle.await.unwrap() {
            SessionTouch::Expired(_) => transitions += 1,
            SessionTouch::AlreadyExpired => {}
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(transitions, 1);
}

#[tokio::test]
async fn terminated_session_stays_terminated_until_purged() {
    let store = InMemorySessionStore::new();
    let id = SessionId::new("session-a");
    store.insert(verified("session-a")).await.unwrap();

    assert!(store.terminate(&id).await.unwrap());
    assert!(!store.terminate(&id).await.unwrap());
    assert!(matches!(
        store.touch(&id, t0()).await.unwrap(),
        SessionTouch::Terminated
    ));

    let report = store
        .purge_expired(t0() + Duration::seconds(1_801))
        .await
        .unwrap();
    assert_eq!(report.removed, 1);
    assert!(report.newly_expired.is_empty());
    assert!(matches!(
        store.touch(&id, t0()).await.unwrap(),
        SessionTouch::NotFound
    ));
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let store = InMemorySessionStore::new();
    let id = SessionId::new("missing");
    assert!(store.get(&id).await.unwrap().is_none());
    assert!(!store.terminate(&id).await.unwrap());
    assert!(matches!(
        store.touch(&id, t0()).await.unwrap(),
        SessionTouch::NotFound
    ));
}
