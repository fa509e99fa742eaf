use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::auth::AuthUser;
use crate::db::SwipeRecord;
use crate::{AppError, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn history(
    Path(user_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<Value>> {
    if claims.uid != user_id {
        return Err(AppError::Forbidden);
    }

    let swipes: Vec<SwipeRecord> = sqlx::query_as(
        "SELECT id, actor_id, target_id, direction, created_at
         FROM swipes WHERE actor_id=?
         ORDER BY created_at DESC, id DESC LIMIT 100",
    )
    .bind(&user_id)
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(json!({ "swipes": swipes })))
}
