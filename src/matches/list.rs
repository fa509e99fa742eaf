use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::auth::AuthUser;
use crate::db::{MatchRecord, MatchView};
use crate::{AppError, AppResult, AppState};

pub async fn matches_for_user(pool: &SqlitePool, uid: &str) -> AppResult<Vec<MatchRecord>> {
    let records = sqlx::query_as(
        "SELECT id, pair_key, user_a, user_b, matched_at, last_message, unread_a, unread_b
         FROM matches WHERE user_a=? OR user_b=?
         ORDER BY matched_at DESC, id DESC",
    )
    .bind(uid)
    .bind(uid)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

#[debug_handler(state = AppState)]
pub(crate) async fn for_user(
    Path(user_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<Value>> {
    if claims.uid != user_id {
        return Err(AppError::Forbidden);
    }

    let matches: Vec<MatchView> = matches_for_user(&db_pool, &user_id)
        .await?
        .into_iter()
        .map(MatchRecord::into_view)
        .collect();

    Ok(Json(json!({ "matches": matches })))
}
