use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, debug_handler,
    extract::{ConnectInfo, State},
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::feed::Event;
use crate::ratelimit::RateLimits;
use crate::{AppError, AppResult, AppState, db};

use super::Direction;
use super::matching::resolve_match;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SwipeBody {
    target_user_id: Option<String>,
    direction: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SwipeReply {
    message: &'static str,
    is_match: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    match_id: Option<String>,
}

/// Upsert the caller's decision about `target`. One decision per
/// (actor, target): a re-swipe replaces the previous direction and timestamp
/// instead of appending a second record.
pub async fn record_swipe(
    pool: &SqlitePool,
    actor: &str,
    target: &str,
    direction: Direction,
) -> AppResult<String> {
    let (id,): (String,) = sqlx::query_as(
        "INSERT INTO swipes (id, actor_id, target_id, direction, created_at)
         VALUES (?,?,?,?,?)
         ON CONFLICT(actor_id, target_id)
         DO UPDATE SET direction=excluded.direction, created_at=excluded.created_at
         RETURNING id",
    )
    .bind(Uuid::now_v7().to_string())
    .bind(actor)
    .bind(target)
    .bind(direction.as_str())
    .bind(db::now())
    .fetch_one(pool)
    .await?;

    Ok(id)
}

#[debug_handler(state = AppState)]
pub(crate) async fn record(
    State(db_pool): State<SqlitePool>,
    State(events): State<broadcast::Sender<Event>>,
    State(limits): State<Arc<RateLimits>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    AuthUser(claims): AuthUser,
    Json(body): Json<SwipeBody>,
) -> AppResult<Json<SwipeReply>> {
    limits.swipes.check(addr.ip())?;

    let target_id = body.target_user_id.filter(|t| !t.is_empty());
    let (Some(target_id), Some(direction)) = (target_id, body.direction) else {
        return Err(AppError::Validation("Missing required fields".into()));
    };
    let direction: Direction = direction
        .parse()
        .map_err(|_| AppError::Validation("Invalid direction".into()))?;
    if target_id == claims.uid {
        return Err(AppError::Validation("Cannot swipe on yourself".into()));
    }

    record_swipe(&db_pool, &claims.uid, &target_id, direction).await?;

    let mut reply = SwipeReply {
        message: "Swipe recorded successfully",
        is_match: false,
        match_id: None,
    };

    if direction == Direction::Like {
        if let Some(outcome) = resolve_match(&db_pool, &claims.uid, &target_id).await? {
            reply.is_match = true;
            reply.match_id = Some(outcome.record.id.clone());
            if outcome.created {
                let _ = events.send(Event::match_created(&outcome.record.into_view()));
            }
        }
    }

    Ok(Json(reply))
}
