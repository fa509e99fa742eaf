mod history;
mod matching;
mod record;

use std::str::FromStr;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub use matching::{MatchOutcome, pair_key, resolve_match};
pub use record::record_swipe;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(record::record))
        .route("/user/{user_id}/history", get(history::history))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Like,
    Pass,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Like => "like",
            Direction::Pass => "pass",
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "like" => Ok(Direction::Like),
            "pass" => Ok(Direction::Pass),
            _ => Err(()),
        }
    }
}
