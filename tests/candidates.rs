//! Candidate listing: exclusions, the college filter, and skill scoring.

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use teammate::db;
use teammate::swipes::{Direction, record_swipe};
use teammate::users::{CandidateQuery, NewProfile, ProfileUpdate, create_profile, list_candidates, update_profile};

async fn pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::migrate(&pool).await.unwrap();
    pool
}

async fn seed_user(pool: &SqlitePool, uid: &str, college: &str, skills: &[&str]) {
    create_profile(
        pool,
        uid,
        NewProfile {
            display_name: Some(uid.to_owned()),
            college: Some(college.to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    update_profile(
        pool,
        uid,
        ProfileUpdate {
            skills: Some(skills.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
}

fn uids(candidates: &[teammate::db::UserView]) -> Vec<&str> {
    candidates.iter().map(|c| c.uid.as_str()).collect()
}

#[tokio::test]
async fn excludes_self_and_prior_swipe_targets() {
    let pool = pool().await;
    for uid in ["carol", "xavier", "yara", "zane"] {
        seed_user(&pool, uid, "X", &[]).await;
    }

    // a pass excludes just as a like does
    record_swipe(&pool, "carol", "xavier", Direction::Pass).await.unwrap();

    let candidates = list_candidates(&pool, "carol", CandidateQuery::default()).await.unwrap();
    let listed = uids(&candidates);

    assert!(!listed.contains(&"carol"));
    assert!(!listed.contains(&"xavier"));
    assert!(listed.contains(&"yara"));
    assert!(listed.contains(&"zane"));
}

#[tokio::test]
async fn college_filter_is_an_equality_match() {
    let pool = pool().await;
    seed_user(&pool, "carol", "X", &[]).await;
    seed_user(&pool, "xavier", "X", &[]).await;
    seed_user(&pool, "yara", "Y", &[]).await;

    let candidates = list_candidates(
        &pool,
        "carol",
        CandidateQuery {
            college: Some("X".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(uids(&candidates), vec!["xavier"]);
}

#[tokio::test]
async fn skill_overlap_orders_candidates_descending() {
    let pool = pool().await;
    seed_user(&pool, "carol", "X", &["rust"]).await;
    seed_user(&pool, "none", "X", &["haskell"]).await;
    seed_user(&pool, "both", "X", &["rust", "sql"]).await;
    seed_user(&pool, "one", "X", &["sql", "go"]).await;

    let candidates = list_candidates(
        &pool,
        "carol",
        CandidateQuery {
            skills: Some("rust,sql".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(uids(&candidates), vec!["both", "one", "none"]);
    assert_eq!(candidates[0].score, Some(2));
    assert_eq!(candidates[1].score, Some(1));
    assert_eq!(candidates[2].score, Some(0));
}

#[tokio::test]
async fn page_size_is_bounded() {
    let pool = pool().await;
    for i in 0..60 {
        seed_user(&pool, &format!("user{i:02}"), "X", &[]).await;
    }

    let candidates = list_candidates(&pool, "outsider", CandidateQuery::default()).await.unwrap();
    assert_eq!(candidates.len(), 50);

    let candidates = list_candidates(
        &pool,
        "outsider",
        CandidateQuery {
            limit: Some(10),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(candidates.len(), 10);
}
