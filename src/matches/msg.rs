use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{self, MatchRecord, MessageRecord};
use crate::feed::Event;
use crate::{AppError, AppResult, AppState};

use super::detail::fetch_match;

#[derive(Deserialize)]
pub(crate) struct MessageBody {
    text: Option<String>,
}

/// Append a message and move the match's shared state with it: the
/// last-message pointer and the receiving side's unread counter change in
/// the same statement, so concurrent chats cannot lose increments.
pub async fn append_message(
    pool: &SqlitePool,
    record: &MatchRecord,
    sender: &str,
    text: &str,
) -> AppResult<MessageRecord> {
    let message = MessageRecord {
        id: Uuid::now_v7().to_string(),
        match_id: record.id.clone(),
        sender_id: sender.to_owned(),
        text: text.to_owned(),
        created_at: db::now(),
    };

    sqlx::query("INSERT INTO messages (id, match_id, sender_id, text, created_at) VALUES (?,?,?,?,?)")
        .bind(&message.id)
        .bind(&message.match_id)
        .bind(&message.sender_id)
        .bind(&message.text)
        .bind(&message.created_at)
        .execute(pool)
        .await?;

    let last = json!({
        "text": message.text,
        "senderId": message.sender_id,
        "timestamp": message.created_at,
    })
    .to_string();

    sqlx::query(
        "UPDATE matches SET last_message = ?,
            unread_a = unread_a + (CASE WHEN user_a <> ? THEN 1 ELSE 0 END),
            unread_b = unread_b + (CASE WHEN user_b <> ? THEN 1 ELSE 0 END)
         WHERE id = ?",
    )
    .bind(&last)
    .bind(sender)
    .bind(sender)
    .bind(&record.id)
    .execute(pool)
    .await?;

    Ok(message)
}

pub async fn messages_for_match(
    pool: &SqlitePool,
    match_id: &str,
) -> AppResult<Vec<MessageRecord>> {
    let messages = sqlx::query_as(
        "SELECT id, match_id, sender_id, text, created_at
         FROM messages WHERE match_id=?
         ORDER BY created_at ASC, id ASC",
    )
    .bind(match_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

pub async fn mark_read(pool: &SqlitePool, record: &MatchRecord, uid: &str) -> AppResult<()> {
    sqlx::query(
        "UPDATE matches SET
            unread_a = CASE WHEN user_a = ? THEN 0 ELSE unread_a END,
            unread_b = CASE WHEN user_b = ? THEN 0 ELSE unread_b END
         WHERE id = ?",
    )
    .bind(uid)
    .bind(uid)
    .bind(&record.id)
    .execute(pool)
    .await?;

    Ok(())
}

#[debug_handler(state = AppState)]
pub(crate) async fn send(
    Path(match_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    State(events): State<broadcast::Sender<Event>>,
    AuthUser(claims): AuthUser,
    Json(body): Json<MessageBody>,
) -> AppResult<Json<Value>> {
    let text = body
        .text
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty());
    let Some(text) = text else {
        return Err(AppError::Validation("Missing required fields".into()));
    };

    let record = fetch_match(&db_pool, &match_id).await?;
    if !record.involves(&claims.uid) {
        return Err(AppError::Forbidden);
    }

    let message = append_message(&db_pool, &record, &claims.uid, &text).await?;
    let _ = events.send(Event::message(&record, &message));

    Ok(Json(json!({ "message": message })))
}

#[debug_handler(state = AppState)]
pub(crate) async fn list(
    Path(match_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<Value>> {
    let record = fetch_match(&db_pool, &match_id).await?;
    if !record.involves(&claims.uid) {
        return Err(AppError::Forbidden);
    }

    let messages = messages_for_match(&db_pool, &match_id).await?;
    Ok(Json(json!({ "messages": messages })))
}

#[debug_handler(state = AppState)]
pub(crate) async fn read(
    Path(match_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<Value>> {
    let record = fetch_match(&db_pool, &match_id).await?;
    if !record.involves(&claims.uid) {
        return Err(AppError::Forbidden);
    }

    mark_read(&db_pool, &record, &claims.uid).await?;
    Ok(Json(json!({ "message": "Marked as read" })))
}
