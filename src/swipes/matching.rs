use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::AppResult;
use crate::db::{self, MatchRecord};

#[derive(Debug)]
pub struct MatchOutcome {
    /// True for exactly one resolver call per pair, however many times both
    /// sides like each other.
    pub created: bool,
    pub record: MatchRecord,
}

/// Canonical key for an unordered pair of user ids.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}:{b}")
    } else {
        format!("{b}:{a}")
    }
}

/// Check whether `target` has already liked `actor` back and, if so, ensure
/// the shared match record exists. Called after a `like` swipe is recorded.
pub async fn resolve_match(
    pool: &SqlitePool,
    actor: &str,
    target: &str,
) -> AppResult<Option<MatchOutcome>> {
    let mutual: Option<(i64,)> = sqlx::query_as(
        "SELECT 1 FROM swipes WHERE actor_id=? AND target_id=? AND direction='like'",
    )
    .bind(target)
    .bind(actor)
    .fetch_optional(pool)
    .await?;

    if mutual.is_none() {
        return Ok(None);
    }

    let key = pair_key(actor, target);
    let (user_a, user_b) = if actor <= target {
        (actor, target)
    } else {
        (target, actor)
    };

    // the insert is keyed on the canonical pair, so of two concurrent mutual
    // likes only one create lands; the loser reads the winner's row instead
    // of erroring
    let created = sqlx::query(
        "INSERT INTO matches (id, pair_key, user_a, user_b, matched_at, last_message, unread_a, unread_b)
         VALUES (?,?,?,?,?,NULL,0,0)
         ON CONFLICT(pair_key) DO NOTHING",
    )
    .bind(Uuid::now_v7().to_string())
    .bind(&key)
    .bind(user_a)
    .bind(user_b)
    .bind(db::now())
    .execute(pool)
    .await?
    .rows_affected()
        > 0;

    let record: MatchRecord = sqlx::query_as(
        "SELECT id, pair_key, user_a, user_b, matched_at, last_message, unread_a, unread_b
         FROM matches WHERE pair_key=?",
    )
    .bind(&key)
    .fetch_one(pool)
    .await?;

    if created {
        info!("matched {user_a} with {user_b}");
    }

    Ok(Some(MatchOutcome { created, record }))
}

#[cfg(test)]
mod tests {
    use super::pair_key;

    #[test]
    fn pair_key_ignores_order() {
        assert_eq!(pair_key("alice", "bob"), "alice:bob");
        assert_eq!(pair_key("bob", "alice"), "alice:bob");
        assert_eq!(pair_key("x", "x"), "x:x");
    }
}
