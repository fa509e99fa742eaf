use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::auth::AuthUser;
use crate::db::MatchRecord;
use crate::{AppError, AppResult, AppState};

pub async fn fetch_match(pool: &SqlitePool, match_id: &str) -> AppResult<MatchRecord> {
    sqlx::query_as(
        "SELECT id, pair_key, user_a, user_b, matched_at, last_message, unread_a, unread_b
         FROM matches WHERE id=?",
    )
    .bind(match_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Match"))
}

pub async fn delete_match(pool: &SqlitePool, record: &MatchRecord) -> AppResult<()> {
    sqlx::query("DELETE FROM messages WHERE match_id=?")
        .bind(&record.id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM matches WHERE id=?")
        .bind(&record.id)
        .execute(pool)
        .await?;

    Ok(())
}

#[debug_handler(state = AppState)]
pub(crate) async fn detail(
    Path(match_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<Value>> {
    let record = fetch_match(&db_pool, &match_id).await?;
    if !record.involves(&claims.uid) {
        return Err(AppError::Forbidden);
    }

    Ok(Json(json!({ "match": record.into_view() })))
}

#[debug_handler(state = AppState)]
pub(crate) async fn unmatch(
    Path(match_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<Value>> {
    let record = fetch_match(&db_pool, &match_id).await?;
    if !record.involves(&claims.uid) {
        return Err(AppError::Forbidden);
    }

    delete_match(&db_pool, &record).await?;
    Ok(Json(json!({ "message": "Match deleted successfully" })))
}
