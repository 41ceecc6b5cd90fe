//! List-view controller
//!
//! Translates user gestures into backend calls. Every mutation is followed
//! by an unconditional reload of the collection that owns it; nothing is
//! patched locally. Reads go through the [`RequestSequencer`] so a response
//! that was overtaken by a newer request for the same collection is dropped.

use chrono::NaiveDate;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::state::UiState;
use crate::client::{ClientResult, NewTask, Resolution, TaskBackend, TaskPatch};
use crate::sync::{RequestSequencer, Resource};

/// What happened to a user action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The view now reflects the server response
    Applied,
    /// Nothing was sent (empty input, no selection, declined confirmation)
    Ignored,
    /// A newer request for the same collection superseded this response
    Stale,
}

/// Interactive confirmation for destructive actions
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything (`--yes`)
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Owns the view state and the backend handle
#[derive(Clone)]
pub struct ViewController {
    backend: Arc<dyn TaskBackend>,
    state: Arc<RwLock<UiState>>,
    sequencer: Arc<RequestSequencer>,
}

impl ViewController {
    pub fn new(backend: Arc<dyn TaskBackend>) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(UiState::default())),
            sequencer: Arc::new(RequestSequencer::new()),
        }
    }

    /// Copy of the current view state for rendering
    pub async fn snapshot(&self) -> UiState {
        self.state.read().await.clone()
    }

    /// Issue a sequenced read and apply it if it is still the newest one.
    /// `apply` returns `false` when the state no longer wants the value.
    async fn fetch_into<T, Fut>(
        &self,
        resource: Resource,
        fetch: Fut,
        apply: impl FnOnce(&mut UiState, T) -> bool,
    ) -> ClientResult<Outcome>
    where
        Fut: Future<Output = ClientResult<T>>,
    {
        let ticket = self.sequencer.issue(resource);

        let value = fetch.await.map_err(|e| {
            tracing::warn!(?resource, seq = ticket.seq, "Fetch failed: {}", e);
            e
        })?;

        if !self.sequencer.is_current(ticket) {
            tracing::debug!(?resource, seq = ticket.seq, "Dropping stale response");
            return Ok(Outcome::Stale);
        }

        let mut state = self.state.write().await;
        if apply(&mut state, value) {
            Ok(Outcome::Applied)
        } else {
            Ok(Outcome::Stale)
        }
    }

    // ============================================
    // Projects
    // ============================================

    pub async fn load_projects(&self) -> ClientResult<Outcome> {
        self.fetch_into(Resource::Projects, self.backend.list_projects(), |s, projects| {
            s.set_projects(projects);
            true
        })
        .await
    }

    /// Make `id` the current project and show its tasks. The selection
    /// only changes once the project has been fetched.
    pub async fn select_project(&self, id: u64) -> ClientResult<Outcome> {
        let outcome = self
            .fetch_into(Resource::Tasks, self.backend.get_project(id), |s, project| {
                s.show_project(project);
                true
            })
            .await?;
        tracing::debug!(project_id = id, ?outcome, "Project selected");
        Ok(outcome)
    }

    /// Re-fetch the current project's tasks
    pub async fn reload_tasks(&self) -> ClientResult<Outcome> {
        let Some(id) = self.state.read().await.current_project else {
            return Ok(Outcome::Ignored);
        };
        self.fetch_into(Resource::Tasks, self.backend.get_project(id), |s, project| {
            s.set_project_tasks(project)
        })
        .await
    }

    pub async fn create_project(&self, name: &str) -> ClientResult<Outcome> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Outcome::Ignored);
        }
        self.backend.create_project(name).await?;
        tracing::info!(name, "Project created");
        self.load_projects().await
    }

    pub async fn rename_project(&self, id: u64, name: &str) -> ClientResult<Outcome> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Outcome::Ignored);
        }
        self.backend.rename_project(id, name).await?;
        tracing::info!(project_id = id, name, "Project renamed");

        let outcome = self.load_projects().await?;
        if self.state.read().await.current_project == Some(id) {
            self.reload_tasks().await?;
        }
        Ok(outcome)
    }

    pub async fn delete_project(&self, id: u64, confirm: &dyn Confirm) -> ClientResult<Outcome> {
        if !confirm.confirm(&format!("Delete project {}?", id)) {
            return Ok(Outcome::Ignored);
        }
        self.backend.delete_project(id).await?;
        tracing::info!(project_id = id, "Project deleted");

        {
            let mut state = self.state.write().await;
            if state.current_project == Some(id) {
                state.clear_selection();
            }
        }
        self.load_projects().await
    }

    // ============================================
    // Tasks
    // ============================================

    /// Create a task in the current project
    pub async fn create_task(&self, mut task: NewTask) -> ClientResult<Outcome> {
        let Some(project_id) = self.state.read().await.current_project else {
            return Ok(Outcome::Ignored);
        };
        task.name = task.name.trim().to_string();
        if task.name.is_empty() {
            return Ok(Outcome::Ignored);
        }
        self.backend.create_task(project_id, &task).await?;
        tracing::info!(project_id, name = %task.name, "Task created");
        self.reload_tasks().await
    }

    /// Open the detail modal for a task
    pub async fn open_task(&self, id: u64) -> ClientResult<Outcome> {
        self.fetch_into(Resource::TaskDetail, self.backend.get_task(id), |s, detail| {
            s.open_task(detail);
            true
        })
        .await
    }

    pub async fn close_task_modal(&self) {
        self.state.write().await.close_task_modal();
    }

    pub async fn update_task(&self, id: u64, patch: &TaskPatch) -> ClientResult<Outcome> {
        if patch.is_empty() {
            return Ok(Outcome::Ignored);
        }
        self.backend.update_task(id, patch).await?;
        tracing::info!(task_id = id, "Task updated");

        if self.state.read().await.current_task() == Some(id) {
            self.open_task(id).await?;
        }
        self.reload_tasks().await
    }

    pub async fn mark_done(&self, id: u64) -> ClientResult<Outcome> {
        self.backend.complete_task(id).await?;
        tracing::info!(task_id = id, "Task done");

        self.state.write().await.close_task_if_open(id);
        self.reload_tasks().await
    }

    pub async fn delete_task(&self, id: u64, confirm: &dyn Confirm) -> ClientResult<Outcome> {
        if !confirm.confirm(&format!("Delete task {}?", id)) {
            return Ok(Outcome::Ignored);
        }
        self.backend.delete_task(id).await?;
        tracing::info!(task_id = id, "Task deleted");

        self.state.write().await.close_task_if_open(id);
        self.reload_tasks().await
    }

    pub async fn start_timer(&self, id: u64) -> ClientResult<Outcome> {
        self.backend.start_timer(id).await?;
        tracing::info!(task_id = id, "Timer started");

        self.state.write().await.set_timer(id, true, None);
        self.reload_tasks().await
    }

    /// Stop the timer; returns the total tracked seconds reported by the backend
    pub async fn stop_timer(&self, id: u64) -> ClientResult<f64> {
        let stopped = self.backend.stop_timer(id).await?;
        tracing::info!(task_id = id, time_spent = stopped.time_spent, "Timer stopped");

        self.state
            .write()
            .await
            .set_timer(id, false, Some(stopped.time_spent));
        self.reload_tasks().await?;
        Ok(stopped.time_spent)
    }

    // ============================================
    // Notifications, deadlines, calendar
    // ============================================

    pub async fn load_notifications(&self) -> ClientResult<Outcome> {
        self.fetch_into(
            Resource::Notifications,
            self.backend.list_notifications(),
            |s, notifications| {
                s.set_notifications(notifications);
                true
            },
        )
        .await
    }

    pub async fn resolve_notification(&self, id: u64, resolution: Resolution) -> ClientResult<Outcome> {
        self.backend.resolve_notification(id, resolution).await?;
        tracing::info!(notification_id = id, resolution = resolution.as_path(), "Notification resolved");
        self.load_notifications().await
    }

    pub async fn load_deadlines(&self) -> ClientResult<Outcome> {
        self.fetch_into(Resource::Deadlines, self.backend.list_deadlines(), |s, deadlines| {
            s.set_deadlines(deadlines);
            true
        })
        .await
    }

    pub async fn load_day(&self, date: NaiveDate) -> ClientResult<Outcome> {
        self.fetch_into(Resource::CalendarDay, self.backend.calendar_day(date), |s, entries| {
            s.set_day(date, entries);
            true
        })
        .await
    }

    pub async fn load_week(&self, start: NaiveDate) -> ClientResult<Outcome> {
        self.fetch_into(Resource::CalendarWeek, self.backend.calendar_week(start), |s, week| {
            s.set_week(week);
            true
        })
        .await
    }

    pub async fn load_recommendations(&self) -> ClientResult<Outcome> {
        self.fetch_into(
            Resource::Recommendations,
            self.backend.recommendations(),
            |s, recommendations| {
                s.set_recommendations(recommendations);
                true
            },
        )
        .await
    }

    // ============================================
    // Chat
    // ============================================

    /// Send a chat message. On failure the chat panel shows a generic
    /// failure line and the error is returned.
    pub async fn send_chat(&self, message: &str) -> ClientResult<Outcome> {
        let message = message.trim();
        if message.is_empty() {
            return Ok(Outcome::Ignored);
        }
        self.state.write().await.push_chat_message(message);

        match self.backend.chat(message).await {
            Ok(reply) => {
                self.state.write().await.push_chat_reply(reply);
                Ok(Outcome::Applied)
            }
            Err(e) => {
                tracing::warn!("Chat request failed: {}", e);
                self.state.write().await.chat_failed();
                Err(e)
            }
        }
    }
}
