use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use rand::seq::IndexedRandom;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::auth::AuthUser;
use crate::db::{self, UserRow, UserView};
use crate::{AppError, AppResult, AppState};

const SELECT_USER: &str = "SELECT uid, display_name, college, year, branch, bio, skills, \
     interests, looking_for, profile_complete, created_at, updated_at FROM users";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    pub display_name: Option<String>,
    pub college: Option<String>,
    pub year: Option<String>,
    pub branch: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub college: Option<String>,
    pub year: Option<String>,
    pub branch: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub looking_for: Option<Vec<String>>,
    pub profile_complete: Option<bool>,
}

pub async fn create_profile(
    pool: &SqlitePool,
    uid: &str,
    profile: NewProfile,
) -> AppResult<UserView> {
    let name = profile.display_name.unwrap_or_else(random_alias);
    let now = db::now();

    sqlx::query(
        "INSERT INTO users (uid, display_name, college, year, branch, bio, skills, \
         interests, looking_for, profile_complete, created_at, updated_at)
         VALUES (?,?,?,?,?,'','[]','[]','[]',0,?,?)
         ON CONFLICT(uid) DO NOTHING",
    )
    .bind(uid)
    .bind(&name)
    .bind(profile.college.unwrap_or_default())
    .bind(profile.year.unwrap_or_default())
    .bind(profile.branch.unwrap_or_default())
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    fetch_profile(pool, uid).await
}

pub async fn fetch_profile(pool: &SqlitePool, uid: &str) -> AppResult<UserView> {
    let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE uid=?"))
        .bind(uid)
        .fetch_optional(pool)
        .await?;

    row.map(UserRow::into_view).ok_or(AppError::NotFound("User"))
}

pub async fn update_profile(
    pool: &SqlitePool,
    uid: &str,
    update: ProfileUpdate,
) -> AppResult<UserView> {
    let skills = update.skills.map(|s| serde_json::to_string(&s)).transpose()?;
    let interests = update.interests.map(|s| serde_json::to_string(&s)).transpose()?;
    let looking_for = update.looking_for.map(|s| serde_json::to_string(&s)).transpose()?;

    let done = sqlx::query(
        "UPDATE users SET
            display_name = COALESCE(?, display_name),
            college = COALESCE(?, college),
            year = COALESCE(?, year),
            branch = COALESCE(?, branch),
            bio = COALESCE(?, bio),
            skills = COALESCE(?, skills),
            interests = COALESCE(?, interests),
            looking_for = COALESCE(?, looking_for),
            profile_complete = COALESCE(?, profile_complete),
            updated_at = ?
         WHERE uid = ?",
    )
    .bind(update.display_name)
    .bind(update.college)
    .bind(update.year)
    .bind(update.branch)
    .bind(update.bio)
    .bind(skills)
    .bind(interests)
    .bind(looking_for)
    .bind(update.profile_complete)
    .bind(db::now())
    .bind(uid)
    .execute(pool)
    .await?;

    if done.rows_affected() == 0 {
        return Err(AppError::NotFound("User"));
    }

    fetch_profile(pool, uid).await
}

fn random_alias() -> String {
    let adjectives = [
        "Curious", "Steady", "Bright", "Quiet", "Keen", "Swift", "Patient", "Restless",
        "Upbeat", "Sharp", "Mellow", "Earnest",
    ];
    let nouns = [
        "Otter", "Falcon", "Badger", "Heron", "Lynx", "Marmot", "Sparrow", "Ibex",
        "Raven", "Beaver",
    ];

    format!(
        "{} {}",
        adjectives.choose(&mut rand::rng()).unwrap(),
        nouns.choose(&mut rand::rng()).unwrap()
    )
}

#[debug_handler(state = AppState)]
pub(crate) async fn create(
    State(db_pool): State<SqlitePool>,
    AuthUser(claims): AuthUser,
    Json(mut body): Json<NewProfile>,
) -> AppResult<Json<Value>> {
    if body.display_name.is_none() {
        body.display_name = claims.name.clone();
    }

    let user = create_profile(&db_pool, &claims.uid, body).await?;
    Ok(Json(json!({ "user": user })))
}

#[debug_handler(state = AppState)]
pub(crate) async fn profile(
    Path(user_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<Value>> {
    if claims.uid != user_id {
        return Err(AppError::Forbidden);
    }

    let user = fetch_profile(&db_pool, &user_id).await?;
    Ok(Json(json!({ "user": user })))
}

#[debug_handler(state = AppState)]
pub(crate) async fn update(
    Path(user_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    AuthUser(claims): AuthUser,
    Json(body): Json<ProfileUpdate>,
) -> AppResult<Json<Value>> {
    if claims.uid != user_id {
        return Err(AppError::Forbidden);
    }

    let user = update_profile(&db_pool, &user_id, body).await?;
    Ok(Json(json!({ "message": "Profile updated successfully", "user": user })))
}
