use std::collections::HashSet;

use axum::{
    Json, debug_handler,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::auth::AuthUser;
use crate::db::{UserRow, UserView};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct CandidateQuery {
    pub college: Option<String>,
    pub skills: Option<String>,
    pub limit: Option<i64>,
}

/// A bounded page of users the caller has not decided on yet, optionally
/// constrained by college and ranked by skill overlap. A linear scan; fine
/// at campus scale.
pub async fn list_candidates(
    pool: &SqlitePool,
    for_user: &str,
    query: CandidateQuery,
) -> AppResult<Vec<UserView>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 100);

    let rows: Vec<UserRow> = match &query.college {
        Some(college) => {
            sqlx::query_as(
                "SELECT uid, display_name, college, year, branch, bio, skills, interests, \
                 looking_for, profile_complete, created_at, updated_at
                 FROM users WHERE college=? LIMIT ?",
            )
            .bind(college)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as(
                "SELECT uid, display_name, college, year, branch, bio, skills, interests, \
                 looking_for, profile_complete, created_at, updated_at
                 FROM users LIMIT ?",
            )
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    // anyone the caller has already decided on is out, whichever way the
    // decision went
    let swiped: HashSet<String> =
        sqlx::query_as::<_, (String,)>("SELECT target_id FROM swipes WHERE actor_id=?")
            .bind(for_user)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|(target_id,)| target_id)
            .collect();

    let mut candidates: Vec<UserView> = rows
        .into_iter()
        .filter(|row| row.uid != for_user && !swiped.contains(&row.uid))
        .map(UserRow::into_view)
        .collect();

    if let Some(skills) = &query.skills {
        let wanted: Vec<&str> = skills
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        for candidate in &mut candidates {
            candidate.score = Some(
                candidate
                    .skills
                    .iter()
                    .filter(|skill| wanted.contains(&skill.as_str()))
                    .count(),
            );
        }

        // stable sort: ties keep scan order
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
    }

    Ok(candidates)
}

#[debug_handler(state = AppState)]
pub(crate) async fn potential_matches(
    Path(user_id): Path<String>,
    Query(query): Query<CandidateQuery>,
    State(db_pool): State<SqlitePool>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<Value>> {
    if claims.uid != user_id {
        return Err(AppError::Forbidden);
    }

    let matches = list_candidates(&db_pool, &user_id, query).await?;
    Ok(Json(json!({ "matches": matches })))
}
