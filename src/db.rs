use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    uid TEXT NOT NULL PRIMARY KEY,
    display_name TEXT NOT NULL,
    college TEXT NOT NULL DEFAULT '',
    year TEXT NOT NULL DEFAULT '',
    branch TEXT NOT NULL DEFAULT '',
    bio TEXT NOT NULL DEFAULT '',
    skills TEXT NOT NULL DEFAULT '[]',
    interests TEXT NOT NULL DEFAULT '[]',
    looking_for TEXT NOT NULL DEFAULT '[]',
    profile_complete INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS swipes (
    id TEXT NOT NULL,
    actor_id TEXT NOT NULL,
    target_id TEXT NOT NULL,
    direction TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (actor_id, target_id)
);

CREATE INDEX IF NOT EXISTS swipes_reverse ON swipes (target_id, actor_id, direction);

CREATE TABLE IF NOT EXISTS matches (
    id TEXT NOT NULL,
    pair_key TEXT NOT NULL PRIMARY KEY,
    user_a TEXT NOT NULL,
    user_b TEXT NOT NULL,
    matched_at TEXT NOT NULL,
    last_message TEXT,
    unread_a INTEGER NOT NULL DEFAULT 0,
    unread_b INTEGER NOT NULL DEFAULT 0
);

CREATE UNIQUE INDEX IF NOT EXISTS matches_id ON matches (id);

CREATE TABLE IF NOT EXISTS messages (
    id TEXT NOT NULL PRIMARY KEY,
    match_id TEXT NOT NULL,
    sender_id TEXT NOT NULL,
    text TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS messages_by_match ON messages (match_id, created_at);
";

pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

pub fn now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .expect("rfc3339 timestamp")
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub uid: String,
    pub display_name: String,
    pub college: String,
    pub year: String,
    pub branch: String,
    pub bio: String,
    pub skills: String,
    pub interests: String,
    pub looking_for: String,
    pub profile_complete: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl UserRow {
    pub fn into_view(self) -> UserView {
        UserView {
            uid: self.uid,
            display_name: self.display_name,
            college: self.college,
            year: self.year,
            branch: self.branch,
            bio: self.bio,
            skills: tags(&self.skills),
            interests: tags(&self.interests),
            looking_for: tags(&self.looking_for),
            profile_complete: self.profile_complete,
            created_at: self.created_at,
            updated_at: self.updated_at,
            score: None,
        }
    }
}

fn tags(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub uid: String,
    pub display_name: String,
    pub college: String,
    pub year: String,
    pub branch: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub looking_for: Vec<String>,
    pub profile_complete: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<usize>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRecord {
    pub id: String,
    #[serde(rename = "userId")]
    pub actor_id: String,
    #[serde(rename = "targetUserId")]
    pub target_id: String,
    pub direction: String,
    #[serde(rename = "timestamp")]
    pub created_at: String,
}

// users are kept in canonical (smaller, larger) order, the same order as
// pair_key; membership still has to be tested against both columns
#[derive(Debug, Clone, FromRow)]
pub struct MatchRecord {
    pub id: String,
    pub pair_key: String,
    pub user_a: String,
    pub user_b: String,
    pub matched_at: String,
    pub last_message: Option<String>,
    pub unread_a: i64,
    pub unread_b: i64,
}

impl MatchRecord {
    pub fn involves(&self, uid: &str) -> bool {
        self.user_a == uid || self.user_b == uid
    }

    pub fn other(&self, uid: &str) -> &str {
        if self.user_a == uid { &self.user_b } else { &self.user_a }
    }

    pub fn unread_for(&self, uid: &str) -> i64 {
        if self.user_a == uid { self.unread_a } else { self.unread_b }
    }

    pub fn into_view(self) -> MatchView {
        let last_message = self
            .last_message
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok());

        MatchView {
            id: self.id,
            users: [self.user_a.clone(), self.user_b.clone()],
            matched_at: self.matched_at,
            last_message,
            unread_count: BTreeMap::from([
                (self.user_a, self.unread_a),
                (self.user_b, self.unread_b),
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub id: String,
    pub users: [String; 2],
    pub matched_at: String,
    pub last_message: Option<Value>,
    pub unread_count: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: String,
    #[serde(skip)]
    pub match_id: String,
    pub sender_id: String,
    pub text: String,
    #[serde(rename = "timestamp")]
    pub created_at: String,
}
