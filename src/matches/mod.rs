mod detail;
mod list;
mod msg;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub use detail::{delete_match, fetch_match};
pub use list::matches_for_user;
pub use msg::{append_message, mark_read, messages_for_match};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user/{user_id}", get(list::for_user))
        .route("/{match_id}", get(detail::detail).delete(detail::unmatch))
        .route("/{match_id}/messages", get(msg::list).post(msg::send))
        .route("/{match_id}/read", post(msg::read))
}
