//! Chat state shared through a match: unread arbitration, ordering, unmatch.

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use teammate::AppError;
use teammate::db::{self, MatchRecord};
use teammate::matches::{append_message, delete_match, fetch_match, mark_read, matches_for_user, messages_for_match};
use teammate::swipes::{Direction, record_swipe, resolve_match};

async fn pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::migrate(&pool).await.unwrap();
    pool
}

async fn matched_pair(pool: &SqlitePool, a: &str, b: &str) -> MatchRecord {
    record_swipe(pool, a, b, Direction::Like).await.unwrap();
    record_swipe(pool, b, a, Direction::Like).await.unwrap();
    resolve_match(pool, b, a).await.unwrap().unwrap().record
}

#[tokio::test]
async fn append_moves_the_recipients_unread_counter() {
    let pool = pool().await;
    let record = matched_pair(&pool, "alice", "bob").await;

    assert_eq!(record.unread_for("alice"), 0);
    assert_eq!(record.unread_for("bob"), 0);
    assert!(record.last_message.is_none());

    append_message(&pool, &record, "alice", "hey!").await.unwrap();
    append_message(&pool, &record, "alice", "up for a hackathon?").await.unwrap();

    let record = fetch_match(&pool, &record.id).await.unwrap();
    assert_eq!(record.unread_for("bob"), 2);
    assert_eq!(record.unread_for("alice"), 0);

    let last: serde_json::Value =
        serde_json::from_str(record.last_message.as_deref().unwrap()).unwrap();
    assert_eq!(last["text"], "up for a hackathon?");
    assert_eq!(last["senderId"], "alice");
}

#[tokio::test]
async fn read_resets_only_the_readers_counter() {
    let pool = pool().await;
    let record = matched_pair(&pool, "alice", "bob").await;

    append_message(&pool, &record, "alice", "one").await.unwrap();
    append_message(&pool, &record, "bob", "two").await.unwrap();

    let record = fetch_match(&pool, &record.id).await.unwrap();
    assert_eq!(record.unread_for("alice"), 1);
    assert_eq!(record.unread_for("bob"), 1);

    mark_read(&pool, &record, "bob").await.unwrap();

    let record = fetch_match(&pool, &record.id).await.unwrap();
    assert_eq!(record.unread_for("bob"), 0);
    assert_eq!(record.unread_for("alice"), 1);
}

#[tokio::test]
async fn messages_come_back_oldest_first() {
    let pool = pool().await;
    let record = matched_pair(&pool, "alice", "bob").await;

    for text in ["one", "two", "three"] {
        append_message(&pool, &record, "alice", text).await.unwrap();
    }

    let messages = messages_for_match(&pool, &record.id).await.unwrap();
    let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn match_lists_are_per_participant() {
    let pool = pool().await;
    matched_pair(&pool, "alice", "bob").await;
    matched_pair(&pool, "alice", "carol").await;

    assert_eq!(matches_for_user(&pool, "alice").await.unwrap().len(), 2);
    assert_eq!(matches_for_user(&pool, "bob").await.unwrap().len(), 1);
    assert_eq!(matches_for_user(&pool, "dave").await.unwrap().len(), 0);
}

#[tokio::test]
async fn unmatch_removes_the_match_and_its_messages() {
    let pool = pool().await;
    let record = matched_pair(&pool, "alice", "bob").await;
    append_message(&pool, &record, "alice", "hello").await.unwrap();

    delete_match(&pool, &record).await.unwrap();

    assert!(matches!(
        fetch_match(&pool, &record.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(messages_for_match(&pool, &record.id).await.unwrap().is_empty());

    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orphans, 0);
}
