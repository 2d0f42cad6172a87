use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::collection::{Collection, RecordKind};
use super::errors::StoreError;
use super::store::{RemoteStore, Session};
use crate::config::RemoteConfig;

/// Remote store speaking the PostgREST dialect of a hosted backend
#[derive(Debug, Clone)]
pub struct RestRemoteStore {
    client: Client,
    config: RemoteConfig,
}

impl RestRemoteStore {
    pub fn new(config: RemoteConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }

    fn table_url(&self, kind: RecordKind) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, kind.table())
    }

    fn authorize(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        let request = request.bearer_auth(&session.access_token);
        match &self.config.api_key {
            Some(key) => request.header("apikey", key),
            None => request,
        }
    }
}

/// Query parameters selecting one user's rows of a kind, newest first
pub fn fetch_query(kind: RecordKind, user_id: &str) -> Vec<(&'static str, String)> {
    let order = match kind {
        RecordKind::VitalSigns => "timestamp.desc",
        _ => "created_at.desc",
    };

    let mut query = vec![
        ("select", "*".to_string()),
        ("user_id", format!("eq.{}", user_id)),
        ("order", order.to_string()),
    ];
    if kind.is_singleton() {
        query.push(("limit", "1".to_string()));
    }
    query
}

/// Rows to upsert, each tagged with the owner and the write time
pub fn upsert_rows<C: Collection>(value: &C, user_id: &str, updated_at: &str) -> Result<Vec<Value>, StoreError> {
    value
        .rows()
        .into_iter()
        .map(|row| {
            let mut row = serde_json::to_value(row)?;
            if let Value::Object(fields) = &mut row {
                fields.insert("user_id".to_string(), Value::String(user_id.to_string()));
                fields.insert("updated_at".to_string(), Value::String(updated_at.to_string()));
            }
            Ok(row)
        })
        .collect()
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(StoreError::NotAuthenticated);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("Remote store rejected request: {} {}", status, body);
    Err(StoreError::Backend(format!("{}: {}", status, body)))
}

#[async_trait]
impl<C: Collection> RemoteStore<C> for RestRemoteStore {
    async fn fetch(&self, session: &Session) -> Result<Option<C>, StoreError> {
        debug!("Fetching {} for user {}", C::KIND, session.user_id);

        let request = self
            .client
            .get(self.table_url(C::KIND))
            .query(&fetch_query(C::KIND, &session.user_id));
        let response = check_status(self.authorize(request, session).send().await?).await?;

        let rows: Vec<C::Item> = response.json().await?;
        debug!("Fetched {} {} rows", rows.len(), C::KIND);
        Ok(C::from_rows(rows))
    }

    async fn write(&self, session: &Session, value: &C) -> Result<(), StoreError> {
        let rows = upsert_rows(value, &session.user_id, &Utc::now().to_rfc3339())?;
        if rows.is_empty() {
            debug!("No {} rows to upsert", C::KIND);
            return Ok(());
        }

        debug!("Upserting {} {} rows for user {}", rows.len(), C::KIND, session.user_id);

        let request = self
            .client
            .post(self.table_url(C::KIND))
            .header("Prefer", "resolution=merge-duplicates")
            .json(&rows);
        check_status(self.authorize(request, session).send().await?).await?;
        Ok(())
    }
}
