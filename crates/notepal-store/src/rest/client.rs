//! PostgREST note repository implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use tracing::{debug, info, warn};

use notepal_core::{Error, Note, NoteDraft, NoteId, NoteRepository, Result};

use super::error::{to_notepal_error, Access, StoreErrorCode};
use super::types::{eq_filter, in_filter, ArchivePatch, PostgrestError};
use crate::config::StoreConfig;

/// Note repository backed by a PostgREST endpoint.
pub struct RestNoteStore {
    client: Client,
    config: StoreConfig,
}

impl RestNoteStore {
    /// Create a new store client with the given configuration.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;

        let mut client_builder =
            Client::builder().timeout(Duration::from_secs(config.timeout_seconds));

        if config.skip_tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "store",
            component = "rest_client",
            op = "init",
            base_url = %config.base_url,
            db_table = %config.table,
            timeout_secs = config.timeout_seconds,
            "Initializing note store client"
        );

        Ok(Self { client, config })
    }

    /// Create from `NOTEPAL_STORE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(StoreConfig::from_env()?)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Build a request against the table with authentication if configured.
    fn request(&self, method: Method) -> RequestBuilder {
        let mut req = self.client.request(method, self.config.table_url());

        if let Some(ref api_key) = self.config.api_key {
            req = req
                .header("apikey", api_key)
                .header("Authorization", format!("Bearer {}", api_key));
        }

        req.header("Content-Type", "application/json")
            .header("Accept", "application/json")
    }

    /// Build a write request that asks for the affected rows back.
    fn write_request(&self, method: Method) -> RequestBuilder {
        self.request(method).header("Prefer", "return=representation")
    }

    /// Send a request and decode the returned rows.
    async fn rows(
        &self,
        op: &'static str,
        access: Access,
        req: RequestBuilder,
    ) -> Result<Vec<Note>> {
        let start = Instant::now();

        let response = req
            .send()
            .await
            .map_err(|e| access.error(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body: PostgrestError = response.json().await.unwrap_or_default();
            let message = if body.message.is_empty() {
                status.to_string()
            } else {
                body.describe()
            };
            warn!(
                subsystem = "store",
                component = "rest_client",
                op,
                status = status.as_u16(),
                error = %message,
                "Store request failed"
            );
            return Err(to_notepal_error(
                StoreErrorCode::from_status(status.as_u16()),
                access,
                &message,
            ));
        }

        let rows: Option<Vec<Note>> = response
            .json()
            .await
            .map_err(|e| access.error(format!("Failed to parse response: {}", e)))?;
        let rows = rows.ok_or_else(|| access.error(format!("{}: store returned no data", op)))?;

        debug!(
            subsystem = "store",
            component = "rest_client",
            op,
            result_count = rows.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Store request complete"
        );
        Ok(rows)
    }
}

/// First row of a single-row write; an empty result is a write error.
fn single_row(op: &'static str, rows: Vec<Note>) -> Result<Note> {
    rows.into_iter()
        .next()
        .ok_or_else(|| Error::Write(format!("{}: no row returned", op)))
}

/// Log a bulk call before it is sent.
fn log_bulk(op: &'static str, ids: &[NoteId]) {
    debug!(
        subsystem = "store",
        component = "rest_client",
        op,
        input_count = ids.len(),
        "Sending bulk request"
    );
}

#[async_trait]
impl NoteRepository for RestNoteStore {
    async fn fetch_all(&self) -> Result<Vec<Note>> {
        let req = self.request(Method::GET).query(&[("select", "*")]);
        self.rows("fetch_all", Access::Read, req).await
    }

    async fn fetch(&self, id: NoteId) -> Result<Note> {
        let req = self
            .request(Method::GET)
            .query(&[("select", "*".to_string()), ("id", eq_filter(id))]);
        self.rows("fetch", Access::Read, req)
            .await?
            .into_iter()
            .next()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn fetch_many(&self, ids: &[NoteId]) -> Result<Vec<Note>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        log_bulk("fetch_many", ids);
        let req = self
            .request(Method::GET)
            .query(&[("select", "*".to_string()), ("id", in_filter(ids))]);
        self.rows("fetch_many", Access::Read, req).await
    }

    async fn create(&self, draft: NoteDraft) -> Result<Note> {
        let req = self
            .write_request(Method::POST)
            .query(&[("select", "*")])
            .json(&[draft]);
        single_row("create", self.rows("create", Access::Write, req).await?)
    }

    async fn update(&self, id: NoteId, draft: NoteDraft) -> Result<Note> {
        let req = self
            .write_request(Method::PATCH)
            .query(&[("id", eq_filter(id)), ("select", "*".to_string())])
            .json(&draft);
        single_row("update", self.rows("update", Access::Write, req).await?)
    }

    async fn remove(&self, id: NoteId) -> Result<Note> {
        let req = self
            .write_request(Method::DELETE)
            .query(&[("id", eq_filter(id)), ("select", "*".to_string())]);
        single_row("remove", self.rows("remove", Access::Write, req).await?)
    }

    async fn remove_many(&self, ids: &[NoteId]) -> Result<Vec<Note>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        log_bulk("remove_many", ids);
        let req = self
            .write_request(Method::DELETE)
            .query(&[("id", in_filter(ids)), ("select", "*".to_string())]);
        self.rows("remove_many", Access::Write, req).await
    }

    async fn set_archived(&self, id: NoteId, current: bool) -> Result<Note> {
        let req = self
            .write_request(Method::PATCH)
            .query(&[("id", eq_filter(id)), ("select", "*".to_string())])
            .json(&ArchivePatch { archived: !current });
        single_row(
            "set_archived",
            self.rows("set_archived", Access::Write, req).await?,
        )
    }

    async fn set_archived_many(&self, ids: &[NoteId], archived: bool) -> Result<Vec<Note>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        log_bulk("set_archived_many", ids);
        let req = self
            .write_request(Method::PATCH)
            .query(&[("id", in_filter(ids)), ("select", "*".to_string())])
            .json(&ArchivePatch { archived });
        self.rows("set_archived_many", Access::Write, req).await
    }
}
