pub mod appresult;
pub mod auth;
pub mod config;
pub mod db;
pub mod feed;
pub mod matches;
pub mod ratelimit;
pub mod swipes;
pub mod users;

use std::sync::Arc;

use axum::extract::FromRef;
use serde_json::Value;
use sqlx::SqlitePool;
use tokio::sync::broadcast;

pub use appresult::{AppError, AppResult};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub identity: auth::IdentityClient,
    pub events: broadcast::Sender<feed::Event>,
    pub limits: Arc<ratelimit::RateLimits>,
}

pub trait GetField {
    fn get_str_field(&self, field: &str) -> AppResult<String>;
    fn get_obj_field(&self, field: &str) -> AppResult<&Value>;
    fn get_arr_field(&self, field: &str) -> AppResult<&Vec<Value>>;
}

impl GetField for Value {
    fn get_str_field(&self, field: &str) -> AppResult<String> {
        Ok(self
            .get(field)
            .ok_or(format!("missing field {field}"))?
            .as_str()
            .ok_or(format!("expected field {field} to be a string"))?
            .to_owned())
    }

    fn get_obj_field(&self, field: &str) -> AppResult<&Value> {
        self.get(field)
            .ok_or(format!("missing field {field}").into())
    }

    fn get_arr_field(&self, field: &str) -> AppResult<&Vec<Value>> {
        self.get(field)
            .and_then(Value::as_array)
            .ok_or(format!("expected field {field} to be an array").into())
    }
}
