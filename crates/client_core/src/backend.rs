//! Request/response exchanges with the scheduling service.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::ScheduleResult,
    error::reported_error,
    protocol::{
        event_route, schedule_route, EventRequest, EventResponseBody, ScheduleResponseBody,
        SchedulingRequest,
    },
};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// What the service answered, once the body has been decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerReply {
    Schedule(ScheduleResult),
    Error(String),
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to {url} failed: {source}")]
    Http { url: Url, source: reqwest::Error },
    #[error("invalid JSON response from {url} (status {status}): {source}")]
    Decode {
        url: Url,
        status: u16,
        source: serde_json::Error,
    },
    #[error("response from {url} (status {status}) carried neither a schedule nor an error")]
    MissingSchedule { url: Url, status: u16 },
}

#[async_trait]
pub trait SchedulingBackend: Send + Sync {
    async fn request_schedule(
        &self,
        request: &SchedulingRequest,
    ) -> Result<ServerReply, BackendError>;

    async fn analyze_event(&self, request: &EventRequest) -> Result<ServerReply, BackendError>;
}

/// JSON-over-HTTP backend. Routes are absolute paths resolved against the
/// configured server URL, so any path on the base URL is replaced.
pub struct HttpSchedulingBackend {
    http: Client,
    schedule_url: Url,
    event_url: Url,
}

impl HttpSchedulingBackend {
    pub fn new(server_url: &Url) -> Result<Self, url::ParseError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &Url) -> Result<Self, url::ParseError> {
        Ok(Self {
            http,
            schedule_url: server_url.join(schedule_route())?,
            event_url: server_url.join(event_route())?,
        })
    }

    pub fn schedule_url(&self) -> &Url {
        &self.schedule_url
    }

    pub fn event_url(&self) -> &Url {
        &self.event_url
    }

    /// Posts `body` and decodes the response whatever its status: the service
    /// reports bad input as a 400 with an `error` body.
    async fn post_json<T, R>(&self, url: &Url, body: &T) -> Result<(u16, R), BackendError>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|source| BackendError::Http {
                url: url.clone(),
                source,
            })?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| BackendError::Http {
                url: url.clone(),
                source,
            })?;
        debug!(%url, status, bytes = bytes.len(), "scheduling service responded");

        let decoded = serde_json::from_slice(&bytes).map_err(|source| BackendError::Decode {
            url: url.clone(),
            status,
            source,
        })?;
        Ok((status, decoded))
    }
}

#[async_trait]
impl SchedulingBackend for HttpSchedulingBackend {
    async fn request_schedule(
        &self,
        request: &SchedulingRequest,
    ) -> Result<ServerReply, BackendError> {
        let (status, body): (u16, ScheduleResponseBody) =
            self.post_json(&self.schedule_url, request).await?;
        if let Some(message) = reported_error(body.error) {
            return Ok(ServerReply::Error(message));
        }
        body.employee_schedule
            .map(|employee_schedule| ServerReply::Schedule(ScheduleResult { employee_schedule }))
            .ok_or_else(|| BackendError::MissingSchedule {
                url: self.schedule_url.clone(),
                status,
            })
    }

    async fn analyze_event(&self, request: &EventRequest) -> Result<ServerReply, BackendError> {
        let (status, mut body): (u16, EventResponseBody) =
            self.post_json(&self.event_url, request).await?;
        if let Some(message) = reported_error(body.error.take()) {
            return Ok(ServerReply::Error(message));
        }
        body.into_schedule()
            .map(ServerReply::Schedule)
            .ok_or_else(|| BackendError::MissingSchedule {
                url: self.event_url.clone(),
                status,
            })
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
