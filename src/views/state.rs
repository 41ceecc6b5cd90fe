//! View state
//!
//! Everything the list views show, plus the current selection. All
//! transitions here are pure; the controller fetches and then calls them.

use chrono::NaiveDate;

use crate::client::{CalendarEntry, ChatReply, Deadline, Notification, Project, Task, TaskDetail, WeekSchedule};

/// Generic text shown when the assistant cannot be reached
pub const CHAT_FAILURE: &str = "Unable to reach the assistant.";

/// Which modal is open
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    TaskDetail(TaskDetail),
}

/// Author of a chat line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
    Log,
}

/// One line of the chat panel
#[derive(Debug, Clone, PartialEq)]
pub struct ChatLine {
    pub speaker: Speaker,
    pub text: String,
}

/// Chat transcript and failure indicator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatPanel {
    pub lines: Vec<ChatLine>,
    pub failed: bool,
}

/// Snapshot of everything the list views render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub projects: Vec<Project>,
    pub current_project: Option<u64>,
    /// Header above the task list, e.g. `Tasks - Thesis`
    pub tasks_title: String,
    pub tasks: Vec<Task>,
    pub modal: Option<Modal>,
    pub notifications: Vec<Notification>,
    pub deadlines: Vec<Deadline>,
    pub day: Option<(NaiveDate, Vec<CalendarEntry>)>,
    pub week: WeekSchedule,
    pub recommendations: Vec<String>,
    pub chat: ChatPanel,
}

impl UiState {
    /// Id of the task shown in the detail modal
    pub fn current_task(&self) -> Option<u64> {
        match &self.modal {
            Some(Modal::TaskDetail(detail)) => Some(detail.id),
            None => None,
        }
    }

    /// Replace the project list. Drops the selection if the selected project
    /// is gone.
    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;

        if let Some(id) = self.current_project {
            if !self.projects.iter().any(|p| p.id == id) {
                self.clear_selection();
            }
        }
    }

    /// Make `project` the selected one and show its tasks in server order
    pub fn show_project(&mut self, project: Project) {
        self.current_project = Some(project.id);
        self.tasks_title = format!("Tasks - {}", project.name);
        self.tasks = project.tasks;
    }

    /// Forget the selected project, its tasks and the title
    pub fn clear_selection(&mut self) {
        self.current_project = None;
        self.tasks_title.clear();
        self.tasks.clear();
    }

    /// Show a fetched project's tasks if it is still the selected one.
    /// Returns whether the list changed.
    pub fn set_project_tasks(&mut self, project: Project) -> bool {
        if self.current_project != Some(project.id) {
            return false;
        }
        self.tasks_title = format!("Tasks - {}", project.name);
        self.tasks = project.tasks;
        true
    }

    pub fn open_task(&mut self, detail: TaskDetail) {
        self.modal = Some(Modal::TaskDetail(detail));
    }

    pub fn close_task_modal(&mut self) {
        self.modal = None;
    }

    /// Close the modal if it shows task `id`
    pub fn close_task_if_open(&mut self, id: u64) {
        if self.current_task() == Some(id) {
            self.close_task_modal();
        }
    }

    /// Record a started or stopped timer on the open task
    pub fn set_timer(&mut self, id: u64, started: bool, time_spent: Option<f64>) {
        if let Some(Modal::TaskDetail(detail)) = &mut self.modal {
            if detail.id == id {
                detail.started = started;
                if let Some(spent) = time_spent {
                    detail.time_spent = spent;
                }
            }
        }
    }

    pub fn set_notifications(&mut self, notifications: Vec<Notification>) {
        self.notifications = notifications;
    }

    pub fn set_deadlines(&mut self, deadlines: Vec<Deadline>) {
        self.deadlines = deadlines;
    }

    pub fn set_day(&mut self, date: NaiveDate, entries: Vec<CalendarEntry>) {
        self.day = Some((date, entries));
    }

    pub fn set_week(&mut self, week: WeekSchedule) {
        self.week = week;
    }

    pub fn set_recommendations(&mut self, recommendations: Vec<String>) {
        self.recommendations = recommendations;
    }

    pub fn push_chat_message(&mut self, text: &str) {
        self.chat.lines.push(ChatLine {
            speaker: Speaker::User,
            text: text.to_string(),
        });
    }

    pub fn push_chat_reply(&mut self, reply: ChatReply) {
        self.chat.failed = false;
        self.chat.lines.push(ChatLine {
            speaker: Speaker::Assistant,
            text: reply.reply,
        });
        for log in reply.logs {
            let text = match log {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            self.chat.lines.push(ChatLine {
                speaker: Speaker::Log,
                text,
            });
        }
    }

    pub fn chat_failed(&mut self) {
        self.chat.failed = true;
        self.chat.lines.push(ChatLine {
            speaker: Speaker::Assistant,
            text: CHAT_FAILURE.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TaskStatus;
    use serde_json::json;

    fn project(id: u64, name: &str, tasks: &[&str]) -> Project {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "tasks": tasks
                .iter()
                .enumerate()
                .map(|(i, t)| json!({"id": id * 100 + i as u64, "name": t}))
                .collect::<Vec<_>>()
        }))
        .unwrap()
    }

    fn detail(id: u64) -> TaskDetail {
        serde_json::from_value(json!({"id": id, "name": "Task", "time_spent": 30})).unwrap()
    }

    #[test]
    fn test_late_tasks_for_other_project_ignored() {
        let mut state = UiState::default();
        state.show_project(project(2, "B", &[]));

        assert!(!state.set_project_tasks(project(1, "A", &["a1"])));
        assert!(state.tasks.is_empty());

        assert!(state.set_project_tasks(project(2, "B", &["b1", "b2"])));
        let names: Vec<_> = state.tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["b1", "b2"]);
        assert_eq!(state.tasks_title, "Tasks - B");
        assert_eq!(state.tasks[0].status, TaskStatus::Pending);
    }

    #[test]
    fn test_show_project_replaces_selection() {
        let mut state = UiState::default();
        state.show_project(project(1, "A", &["a1"]));
        state.show_project(project(2, "B", &["b1", "b2"]));

        assert_eq!(state.current_project, Some(2));
        assert_eq!(state.tasks_title, "Tasks - B");
        let names: Vec<_> = state.tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["b1", "b2"]);
    }

    #[test]
    fn test_removed_project_clears_selection() {
        let mut state = UiState::default();
        state.set_projects(vec![project(1, "A", &[]), project(2, "B", &[])]);
        state.show_project(project(2, "B", &["b1"]));

        state.set_projects(vec![project(1, "A", &[])]);
        assert_eq!(state.current_project, None);
        assert!(state.tasks.is_empty());
        assert!(state.tasks_title.is_empty());
    }

    #[test]
    fn test_close_task_if_open() {
        let mut state = UiState::default();
        state.open_task(detail(4));

        state.close_task_if_open(5);
        assert_eq!(state.current_task(), Some(4));

        state.close_task_if_open(4);
        assert_eq!(state.current_task(), None);
    }

    #[test]
    fn test_timer_updates_open_task_only() {
        let mut state = UiState::default();
        state.open_task(detail(4));

        state.set_timer(9, true, None);
        state.set_timer(4, true, None);
        match &state.modal {
            Some(Modal::TaskDetail(d)) => assert!(d.started),
            None => panic!("modal closed"),
        }

        state.set_timer(4, false, Some(95.0));
        match &state.modal {
            Some(Modal::TaskDetail(d)) => {
                assert!(!d.started);
                assert_eq!(d.time_spent, 95.0);
            }
            None => panic!("modal closed"),
        }
    }

    #[test]
    fn test_chat_reply_and_failure() {
        let mut state = UiState::default();
        state.push_chat_message("hello");
        state.chat_failed();
        assert!(state.chat.failed);
        assert_eq!(state.chat.lines.last().unwrap().text, CHAT_FAILURE);

        state.push_chat_reply(ChatReply {
            reply: "hi".to_string(),
            logs: vec![json!("added task"), json!({"action": "plan"})],
        });
        assert!(!state.chat.failed);
        let speakers: Vec<_> = state.chat.lines.iter().map(|l| l.speaker).collect();
        assert_eq!(
            speakers,
            vec![Speaker::User, Speaker::Assistant, Speaker::Assistant, Speaker::Log, Speaker::Log]
        );
        assert_eq!(state.chat.lines[4].text, r#"{"action":"plan"}"#);
    }
}
