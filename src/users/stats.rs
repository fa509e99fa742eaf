use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use serde::Serialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::auth::AuthUser;
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_matches: i64,
    pub total_swipes: i64,
    pub likes_given: i64,
    pub likes_received: i64,
}

pub async fn user_stats(pool: &SqlitePool, uid: &str) -> AppResult<Stats> {
    let total_matches: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM matches WHERE user_a=? OR user_b=?")
            .bind(uid)
            .bind(uid)
            .fetch_one(pool)
            .await?;

    let total_swipes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM swipes WHERE actor_id=?")
        .bind(uid)
        .fetch_one(pool)
        .await?;

    let likes_given: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM swipes WHERE actor_id=? AND direction='like'")
            .bind(uid)
            .fetch_one(pool)
            .await?;

    let likes_received: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM swipes WHERE target_id=? AND direction='like'")
            .bind(uid)
            .fetch_one(pool)
            .await?;

    Ok(Stats {
        total_matches,
        total_swipes,
        likes_given,
        likes_received,
    })
}

#[debug_handler(state = AppState)]
pub(crate) async fn stats(
    Path(user_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<Value>> {
    if claims.uid != user_id {
        return Err(AppError::Forbidden);
    }

    let stats = user_stats(&db_pool, &user_id).await?;
    Ok(Json(json!({ "stats": stats })))
}
