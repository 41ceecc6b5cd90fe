//! Backend Trait
//!
//! The seam between the views/room loop and the task backend. `ApiClient`
//! implements it over HTTP; tests substitute in-memory backends.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::dto::*;
use super::error::ClientResult;

/// Everything the list views need from the backend
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// `GET /api/projects`
    async fn list_projects(&self) -> ClientResult<Vec<Project>>;

    /// `POST /api/projects`
    async fn create_project(&self, name: &str) -> ClientResult<()>;

    /// `PUT /api/projects/{id}`
    async fn rename_project(&self, id: u64, name: &str) -> ClientResult<()>;

    /// `DELETE /api/projects/{id}`
    async fn delete_project(&self, id: u64) -> ClientResult<()>;

    /// `GET /api/projects/{id}`
    async fn get_project(&self, id: u64) -> ClientResult<Project>;

    /// `POST /api/projects/{id}/tasks`
    async fn create_task(&self, project_id: u64, task: &NewTask) -> ClientResult<()>;

    /// `GET /api/tasks/{id}`
    async fn get_task(&self, id: u64) -> ClientResult<TaskDetail>;

    /// `PUT /api/tasks/{id}`
    async fn update_task(&self, id: u64, patch: &TaskPatch) -> ClientResult<()>;

    /// `POST /api/tasks/{id}/done`
    async fn complete_task(&self, id: u64) -> ClientResult<()>;

    /// `DELETE /api/tasks/{id}`
    async fn delete_task(&self, id: u64) -> ClientResult<()>;

    /// `POST /api/tasks/{id}/start`
    async fn start_timer(&self, id: u64) -> ClientResult<()>;

    /// `POST /api/tasks/{id}/stop`
    async fn stop_timer(&self, id: u64) -> ClientResult<TimerStopped>;

    /// `GET /api/notifications`
    async fn list_notifications(&self) -> ClientResult<Vec<Notification>>;

    /// `POST /api/notifications/{id}/accept|decline`
    async fn resolve_notification(&self, id: u64, resolution: Resolution) -> ClientResult<()>;

    /// `GET /api/deadlines`
    async fn list_deadlines(&self) -> ClientResult<Vec<Deadline>>;

    /// `GET /api/calendar/{date}`
    async fn calendar_day(&self, date: NaiveDate) -> ClientResult<Vec<CalendarEntry>>;

    /// `GET /api/calendar/week?start=YYYY-MM-DD`
    async fn calendar_week(&self, start: NaiveDate) -> ClientResult<WeekSchedule>;

    /// `GET /api/recommendations`
    async fn recommendations(&self) -> ClientResult<Vec<String>>;

    /// `POST /api/chat`
    async fn chat(&self, message: &str) -> ClientResult<ChatReply>;
}

/// The narrow read the room sync loop needs
#[async_trait]
pub trait RoomSource: Send + Sync {
    /// `GET /api/room/objects`
    async fn room_objects(&self) -> ClientResult<Vec<RoomObjectSnapshot>>;
}
