mod candidates;
mod profile;
mod stats;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub use candidates::{CandidateQuery, list_candidates};
pub use profile::{NewProfile, ProfileUpdate, create_profile, fetch_profile, update_profile};
pub use stats::user_stats;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(profile::create))
        .route("/{user_id}", get(profile::profile).put(profile::update))
        .route("/{user_id}/potential-matches", get(candidates::potential_matches))
        .route("/{user_id}/stats", get(stats::stats))
}
