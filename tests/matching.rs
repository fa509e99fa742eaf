//! Swipe recording and mutual-match resolution against an in-memory store.

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use teammate::db;
use teammate::swipes::{Direction, MatchOutcome, record_swipe, resolve_match};

// a single connection so every task sees the same in-memory database
async fn pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::migrate(&pool).await.unwrap();
    pool
}

async fn like(pool: &SqlitePool, actor: &str, target: &str) -> Option<MatchOutcome> {
    record_swipe(pool, actor, target, Direction::Like).await.unwrap();
    resolve_match(pool, actor, target).await.unwrap()
}

async fn match_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM matches")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn one_sided_like_creates_no_match() {
    let pool = pool().await;

    assert!(like(&pool, "alice", "bob").await.is_none());
    assert_eq!(match_count(&pool).await, 0);
}

#[tokio::test]
async fn mutual_like_creates_exactly_one_match() {
    let pool = pool().await;

    assert!(like(&pool, "alice", "bob").await.is_none());
    let outcome = like(&pool, "bob", "alice").await.expect("mutual like should match");

    assert!(outcome.created);
    assert!(outcome.record.involves("alice"));
    assert!(outcome.record.involves("bob"));
    assert_eq!(outcome.record.other("alice"), "bob");
    assert_eq!(match_count(&pool).await, 1);
}

#[tokio::test]
async fn repeat_likes_never_duplicate_a_match() {
    let pool = pool().await;

    like(&pool, "alice", "bob").await;
    let first = like(&pool, "bob", "alice").await.unwrap();
    assert!(first.created);

    let again = like(&pool, "alice", "bob").await.unwrap();
    assert!(!again.created);
    assert_eq!(again.record.id, first.record.id);
    assert_eq!(match_count(&pool).await, 1);
}

#[tokio::test]
async fn resolver_is_idempotent_for_a_mutual_pair() {
    let pool = pool().await;

    like(&pool, "alice", "bob").await;
    like(&pool, "bob", "alice").await;

    let outcome = resolve_match(&pool, "bob", "alice").await.unwrap().unwrap();
    assert!(!outcome.created);
    assert_eq!(match_count(&pool).await, 1);
}

#[tokio::test]
async fn pass_blocks_matching_until_revised() {
    let pool = pool().await;

    record_swipe(&pool, "bob", "alice", Direction::Pass).await.unwrap();
    assert!(like(&pool, "alice", "bob").await.is_none());
    // re-liking changes nothing while the pass stands
    assert!(like(&pool, "alice", "bob").await.is_none());
    assert_eq!(match_count(&pool).await, 0);

    // bob revises the pass into a like; the latest decision wins
    let outcome = like(&pool, "bob", "alice").await.expect("revised like should match");
    assert!(outcome.created);
    assert_eq!(match_count(&pool).await, 1);
}

#[tokio::test]
async fn one_decision_per_actor_and_target() {
    let pool = pool().await;

    record_swipe(&pool, "alice", "bob", Direction::Like).await.unwrap();
    record_swipe(&pool, "alice", "bob", Direction::Pass).await.unwrap();

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM swipes WHERE actor_id='alice' AND target_id='bob'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);

    let (direction,): (String,) =
        sqlx::query_as("SELECT direction FROM swipes WHERE actor_id='alice' AND target_id='bob'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(direction, "pass");
}

#[tokio::test]
async fn concurrent_mutual_likes_create_one_match() {
    let pool = pool().await;

    let (a, b) = tokio::join!(like(&pool, "alice", "bob"), like(&pool, "bob", "alice"));

    let created = [a, b].into_iter().flatten().filter(|o| o.created).count();
    assert_eq!(created, 1);
    assert_eq!(match_count(&pool).await, 1);
}
