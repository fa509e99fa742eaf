use serde_json::{Value, json};

use crate::{AppError, AppResult, GetField};

#[derive(Debug, Clone)]
pub struct Claims {
    pub uid: String,
    pub name: Option<String>,
}

#[derive(Clone)]
pub struct IdentityClient {
    lookup_url: String,
    http: reqwest::Client,
}

impl IdentityClient {
    pub fn from_json(json: Value) -> AppResult<IdentityClient> {
        let lookup_url = format!(
            "https://identitytoolkit.googleapis.com/v1/accounts:lookup?key={}",
            json.get_obj_field("firebase")?.get_str_field("apikey")?
        );

        Ok(IdentityClient {
            lookup_url,
            http: reqwest::Client::new(),
        })
    }

    /// Resolve a bearer token to the account it was issued for. A token the
    /// provider rejects is an authentication failure; a provider we cannot
    /// reach propagates as an infrastructure error.
    pub async fn verify(&self, id_token: &str) -> AppResult<Claims> {
        let body: Value = self
            .http
            .post(&self.lookup_url)
            .json(&json!({ "idToken": id_token }))
            .send()
            .await?
            .json()
            .await?;

        if body.get("error").is_some() {
            return Err(AppError::Unauthorized("Invalid token"));
        }

        let users = body.get_arr_field("users")?;
        let Some(user) = users.first() else {
            return Err(AppError::Unauthorized("Invalid token"));
        };

        Ok(Claims {
            uid: user.get_str_field("localId")?,
            name: user
                .get("displayName")
                .and_then(Value::as_str)
                .map(str::to_owned),
        })
    }
}
