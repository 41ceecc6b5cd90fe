//! HTTP API Client
//!
//! reqwest implementation of [`TaskBackend`] and [`RoomSource`].

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::backend::{RoomSource, TaskBackend};
use super::dto::*;
use super::error::{ClientError, ClientResult};
use crate::config::BackendConfig;

/// REST client for the task backend
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: &BackendConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Send a request and fail on any non-success status
    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await.map_err(ClientError::from_transport)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::Status {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.send(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    /// Send a mutating call whose response body is not interpreted
    async fn call(&self, method: Method, path: &str) -> ClientResult<()> {
        self.send(self.request(method, path)).await?;
        Ok(())
    }

    async fn call_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<()> {
        self.send(self.request(method, path).json(body)).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await.map_err(ClientError::from_transport)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl TaskBackend for ApiClient {
    async fn list_projects(&self) -> ClientResult<Vec<Project>> {
        self.get_json("/api/projects").await
    }

    async fn create_project(&self, name: &str) -> ClientResult<()> {
        self.call_json(Method::POST, "/api/projects", &NameRequest { name })
            .await
    }

    async fn rename_project(&self, id: u64, name: &str) -> ClientResult<()> {
        self.call_json(Method::PUT, &format!("/api/projects/{}", id), &NameRequest { name })
            .await
    }

    async fn delete_project(&self, id: u64) -> ClientResult<()> {
        self.call(Method::DELETE, &format!("/api/projects/{}", id)).await
    }

    async fn get_project(&self, id: u64) -> ClientResult<Project> {
        self.get_json(&format!("/api/projects/{}", id)).await
    }

    async fn create_task(&self, project_id: u64, task: &NewTask) -> ClientResult<()> {
        self.call_json(Method::POST, &format!("/api/projects/{}/tasks", project_id), task)
            .await
    }

    async fn get_task(&self, id: u64) -> ClientResult<TaskDetail> {
        self.get_json(&format!("/api/tasks/{}", id)).await
    }

    async fn update_task(&self, id: u64, patch: &TaskPatch) -> ClientResult<()> {
        self.call_json(Method::PUT, &format!("/api/tasks/{}", id), patch)
            .await
    }

    async fn complete_task(&self, id: u64) -> ClientResult<()> {
        self.call(Method::POST, &format!("/api/tasks/{}/done", id)).await
    }

    async fn delete_task(&self, id: u64) -> ClientResult<()> {
        self.call(Method::DELETE, &format!("/api/tasks/{}", id)).await
    }

    async fn start_timer(&self, id: u64) -> ClientResult<()> {
        self.call(Method::POST, &format!("/api/tasks/{}/start", id)).await
    }

    async fn stop_timer(&self, id: u64) -> ClientResult<TimerStopped> {
        let response = self
            .send(self.request(Method::POST, &format!("/api/tasks/{}/stop", id)))
            .await?;
        decode(response).await
    }

    async fn list_notifications(&self) -> ClientResult<Vec<Notification>> {
        self.get_json("/api/notifications").await
    }

    async fn resolve_notification(&self, id: u64, resolution: Resolution) -> ClientResult<()> {
        let path = format!("/api/notifications/{}/{}", id, resolution.as_path());
        self.call(Method::POST, &path).await
    }

    async fn list_deadlines(&self) -> ClientResult<Vec<Deadline>> {
        self.get_json("/api/deadlines").await
    }

    async fn calendar_day(&self, date: NaiveDate) -> ClientResult<Vec<CalendarEntry>> {
        self.get_json(&format!("/api/calendar/{}", date.format("%Y-%m-%d")))
            .await
    }

    async fn calendar_week(&self, start: NaiveDate) -> ClientResult<WeekSchedule> {
        let request = self
            .request(Method::GET, "/api/calendar/week")
            .query(&[("start", start.format("%Y-%m-%d").to_string())]);
        let response = self.send(request).await?;
        decode(response).await
    }

    async fn recommendations(&self) -> ClientResult<Vec<String>> {
        self.get_json("/api/recommendations").await
    }

    async fn chat(&self, message: &str) -> ClientResult<ChatReply> {
        let request = self
            .request(Method::POST, "/api/chat")
            .json(&ChatRequest { message });
        let response = self.send(request).await?;
        decode(response).await
    }
}

#[async_trait]
impl RoomSource for ApiClient {
    async fn room_objects(&self) -> ClientResult<Vec<RoomObjectSnapshot>> {
        self.get_json("/api/room/objects").await
    }
}
