use axum::{
    debug_handler,
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::broadcast;

use crate::auth::AuthUser;
use crate::db::{MatchRecord, MatchView, MessageRecord};

/// One frame on the live feed, already serialized; delivered to its two
/// recipients only.
#[derive(Debug, Clone)]
pub struct Event {
    pub recipients: [String; 2],
    pub body: String,
}

impl Event {
    pub fn match_created(record: &MatchView) -> Event {
        Event {
            recipients: record.users.clone(),
            body: json!({ "type": "match", "match": record }).to_string(),
        }
    }

    pub fn message(record: &MatchRecord, message: &MessageRecord) -> Event {
        Event {
            recipients: [record.user_a.clone(), record.user_b.clone()],
            body: json!({ "type": "message", "matchId": record.id, "message": message })
                .to_string(),
        }
    }
}

#[debug_handler(state = crate::AppState)]
pub async fn feed(
    State(events): State<broadcast::Sender<Event>>,
    AuthUser(claims): AuthUser,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(async move |stream| {
        let mut rx = events.subscribe();
        let (mut sender, mut receiver) = stream.split();

        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Ok(event) => {
                        if !event.recipients.contains(&claims.uid) {
                            continue;
                        }
                        if sender.send(event.body.into()).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                frame = receiver.next() => {
                    // push-only feed; incoming frames only signal liveness
                    if !matches!(frame, Some(Ok(_))) {
                        break;
                    }
                }
            }
        }
    })
}
