//! Data Transfer Objects
//!
//! Request and response types for the backend REST surface.
//! These types are serialized/deserialized to/from JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================
// PROJECT & TASK DTOs
// ============================================

/// A project with its nested tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_rank")]
    pub priority: u8,
    #[serde(default, deserialize_with = "lenient_date")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub status: String,
    /// Tasks in server order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    /// Percentage of tasks marked done, rounded down
    pub fn progress(&self) -> u8 {
        if self.tasks.is_empty() {
            return 0;
        }
        let done = self.tasks.iter().filter(|t| t.status.is_done()).count();
        (done * 100 / self.tasks.len()) as u8
    }
}

/// A task as listed inside its project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "lenient_date")]
    pub deadline: Option<NaiveDate>,
    /// Estimated effort in hours
    #[serde(default)]
    pub estimated: Option<f64>,
    #[serde(default = "default_rank")]
    pub importance: u8,
    #[serde(default)]
    pub description: String,
}

fn default_rank() -> u8 {
    3
}

/// Task lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    #[serde(alias = "todo")]
    Pending,
    InProgress,
    Done,
    /// Any status string this client does not know about
    #[serde(other)]
    Other,
}

impl TaskStatus {
    pub fn is_done(self) -> bool {
        self == TaskStatus::Done
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Done => "done",
            TaskStatus::Other => "unknown",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "todo" => Ok(TaskStatus::Pending),
            "in_progress" | "in-progress" | "started" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(format!("unknown task status: {}", other)),
        }
    }
}

/// Full task detail shown in the task modal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDetail {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub deadline: Option<NaiveDate>,
    /// Tracked time in seconds
    #[serde(default)]
    pub time_spent: f64,
    /// Whether the timer is currently running
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub planned_start: Option<String>,
    #[serde(default)]
    pub planned_end: Option<String>,
    #[serde(default)]
    pub planned_hours: Option<f64>,
    #[serde(default)]
    pub status: TaskStatus,
}

/// Create task request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewTask {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_hours: Option<f64>,
}

impl NewTask {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial task update; absent fields are left unchanged by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }
}

/// Body for create/rename project
#[derive(Debug, Serialize)]
pub(crate) struct NameRequest<'a> {
    pub name: &'a str,
}

/// Response of `POST /api/tasks/{id}/stop`
#[derive(Debug, Clone, Deserialize)]
pub struct TimerStopped {
    #[serde(default)]
    pub time_spent: f64,
}

// ============================================
// NOTIFICATION, DEADLINE & CALENDAR DTOs
// ============================================

/// A pending notification waiting for a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    #[serde(default)]
    pub status: String,
}

/// Decision on a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Accept,
    Decline,
}

impl Resolution {
    pub fn as_path(self) -> &'static str {
        match self {
            Resolution::Accept => "accept",
            Resolution::Decline => "decline",
        }
    }
}

/// An upcoming task deadline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deadline {
    pub id: u64,
    pub task: String,
    #[serde(default)]
    pub project: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub deadline: Option<NaiveDate>,
}

/// One scheduled slot of a calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, alias = "name")]
    pub task: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub hours: Option<f64>,
}

/// Seven-day schedule keyed by `YYYY-MM-DD`
pub type WeekSchedule = BTreeMap<String, Vec<CalendarEntry>>;

// ============================================
// CHAT DTOs
// ============================================

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Assistant answer with the actions it logged
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default)]
    pub logs: Vec<serde_json::Value>,
}

// ============================================
// ROOM DTOs
// ============================================

/// One `(id, state)` pair of a room snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomObjectSnapshot {
    pub id: String,
    #[serde(default)]
    pub state: serde_json::Map<String, serde_json::Value>,
}

/// Dates are stored as free text by the backend; anything that does not
/// start with `YYYY-MM-DD` is treated as absent.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let s = s.trim();
        s.get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_with_defaults() {
        let project: Project = serde_json::from_value(json!({
            "id": 1,
            "name": "Thesis",
            "tasks": [
                {"id": 1, "name": "Outline", "status": "done"},
                {"id": 2, "name": "Draft", "status": "todo", "deadline": "2024-06-01"}
            ]
        }))
        .unwrap();

        assert_eq!(project.priority, 3);
        assert_eq!(project.tasks[0].status, TaskStatus::Done);
        assert_eq!(project.tasks[1].status, TaskStatus::Pending);
        assert_eq!(
            project.tasks[1].deadline,
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(project.progress(), 50);
    }

    #[test]
    fn test_progress_empty_project() {
        let project: Project = serde_json::from_value(json!({"id": 7, "name": "Empty"})).unwrap();
        assert!(project.tasks.is_empty());
        assert_eq!(project.progress(), 0);
    }

    #[test]
    fn test_unknown_status_and_bad_dates() {
        let task: Task = serde_json::from_value(json!({
            "id": 3,
            "name": "Odd",
            "status": "blocked",
            "deadline": "someday"
        }))
        .unwrap();
        assert_eq!(task.status, TaskStatus::Other);
        assert!(task.deadline.is_none());

        let task: Task = serde_json::from_value(json!({
            "id": 4,
            "name": "Timed",
            "deadline": "2024-06-01T18:00"
        }))
        .unwrap();
        assert_eq!(task.deadline, NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn test_new_task_skips_absent_fields() {
        let body = serde_json::to_value(
            NewTask::named("Write report").deadline(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
        )
        .unwrap();
        assert_eq!(body, json!({"name": "Write report", "deadline": "2024-06-01"}));
    }

    #[test]
    fn test_task_patch() {
        assert!(TaskPatch::default().is_empty());
        let patch = TaskPatch {
            status: Some(TaskStatus::InProgress),
            ..TaskPatch::default()
        };
        assert!(!patch.is_empty());
        assert_eq!(serde_json::to_value(patch).unwrap(), json!({"status": "in_progress"}));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("todo".parse::<TaskStatus>().unwrap(), TaskStatus::Pending);
        assert_eq!("Done".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
        assert!("later".parse::<TaskStatus>().is_err());
        assert_eq!(TaskStatus::InProgress.to_string(), "in progress");
    }

    #[test]
    fn test_room_snapshot_without_state() {
        let objects: Vec<RoomObjectSnapshot> =
            serde_json::from_value(json!([{"id": "bed"}, {"id": "window", "state": {"on": false}}]))
                .unwrap();
        assert!(objects[0].state.is_empty());
        assert_eq!(objects[1].state.get("on"), Some(&json!(false)));
    }

    #[test]
    fn test_calendar_entry_alias() {
        let entry: CalendarEntry =
            serde_json::from_value(json!({"name": "Review", "start": "09:00"})).unwrap();
        assert_eq!(entry.task, "Review");
        assert_eq!(entry.start.as_deref(), Some("09:00"));
    }

    #[test]
    fn test_chat_reply_mixed_logs() {
        let reply: ChatReply = serde_json::from_value(json!({
            "reply": "Done",
            "logs": ["created task", {"action": "plan", "task": 3}]
        }))
        .unwrap();
        assert_eq!(reply.logs[0], json!("created task"));
        assert_eq!(reply.logs[1]["task"], json!(3));

        let reply: ChatReply = serde_json::from_value(json!({"reply": "Hi"})).unwrap();
        assert!(reply.logs.is_empty());
    }
}
