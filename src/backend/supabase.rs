use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::{Backend, BackendError};
use crate::models::{FamilySettings, Holiday, Kid, NewFamily, NewKid, User};

// Client for the hosted auth + REST endpoints
pub struct SupabaseBackend {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

// Pull the human-readable message out of an error body; the service uses
// different field names for auth and REST errors.
fn error_message(status: StatusCode, body: &Value) -> String {
    ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|field| body.get(*field).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Backend request failed with status {}", status))
}

async fn read_error(res: Response) -> BackendError {
    let status = res.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return BackendError::Unauthorized;
    }
    let body = res.json::<Value>().await.unwrap_or_default();
    BackendError::Service(error_message(status, &body))
}

fn transport(e: reqwest::Error) -> BackendError {
    warn!(error = %e, "Backend request failed");
    BackendError::Service(e.to_string())
}

impl SupabaseBackend {
    pub fn new(client: reqwest::Client, base_url: &str, anon_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, BackendError> {
        let res = req.send().await.map_err(transport)?;
        if !res.status().is_success() {
            return Err(read_error(res).await);
        }
        res.json::<T>().await.map_err(transport)
    }

    // `filter` is a PostgREST query string, e.g. "share_slug=eq.smiths"
    async fn select<T: DeserializeOwned>(&self, token: &str, table: &str, filter: &str) -> Result<Vec<T>, BackendError> {
        let path = format!("/rest/v1/{}?select=*&{}", table, filter);
        self.send(self.request(Method::GET, &path, token)).await
    }

    async fn insert<T: Serialize + Sync, R: DeserializeOwned>(
        &self,
        token: &str,
        table: &str,
        rows: &[T],
    ) -> Result<Vec<R>, BackendError> {
        let req = self
            .request(Method::POST, &format!("/rest/v1/{}", table), token)
            .header("Prefer", "return=representation")
            .json(rows);
        self.send(req).await
    }

    async fn insert_one<T: Serialize + Sync, R: DeserializeOwned>(
        &self,
        token: &str,
        table: &str,
        row: &T,
    ) -> Result<R, BackendError> {
        self.insert(token, table, std::slice::from_ref(row))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Service(format!("Insert into {} returned no row", table)))
    }
}

#[async_trait]
impl Backend for SupabaseBackend {
    async fn get_user(&self, token: &str) -> Result<User, BackendError> {
        self.send(self.request(Method::GET, "/auth/v1/user", token)).await
    }

    async fn find_family_by_slug(&self, token: &str, slug: &str) -> Result<Option<FamilySettings>, BackendError> {
        let rows: Vec<FamilySettings> = self
            .select(token, "family_settings", &format!("share_slug=eq.{}", slug))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_family_by_user(&self, token: &str, user_id: &str) -> Result<Option<FamilySettings>, BackendError> {
        let rows: Vec<FamilySettings> = self
            .select(token, "family_settings", &format!("user_id=eq.{}", user_id))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_family(&self, token: &str, family: NewFamily) -> Result<FamilySettings, BackendError> {
        self.insert_one(token, "family_settings", &family).await
    }

    async fn insert_kid(&self, token: &str, kid: NewKid) -> Result<Kid, BackendError> {
        self.insert_one(token, "kids", &kid).await
    }

    async fn insert_holidays(&self, token: &str, holidays: &[Holiday]) -> Result<(), BackendError> {
        let _: Vec<Value> = self.insert(token, "holidays", holidays).await?;
        Ok(())
    }

    async fn list_kids(&self, token: &str, user_id: &str) -> Result<Vec<Kid>, BackendError> {
        self.select(
            token,
            "kids",
            &format!("parent_user_id=eq.{}&order=created_at.asc", user_id),
        )
        .await
    }
}
