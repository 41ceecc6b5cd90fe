//! Text rendering of the list views
//!
//! Pure functions from an immutable [`UiState`] to display lines.

use super::state::{Modal, Speaker, UiState};
use crate::client::{CalendarEntry, TaskStatus};

/// Format tracked seconds as a timer label: `1h 05m 09s`, `4m 02s`, `12s`
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);

    if h > 0 {
        format!("{}h {:02}m {:02}s", h, m, s)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}

fn checkbox(status: TaskStatus) -> &'static str {
    if status.is_done() {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn render_projects(state: &UiState) -> Vec<String> {
    if state.projects.is_empty() {
        return vec!["No projects".to_string()];
    }
    state
        .projects
        .iter()
        .map(|p| {
            let marker = if state.current_project == Some(p.id) { '>' } else { ' ' };
            format!(
                "{} {:>3}: {} [{} tasks, {}% done]",
                marker,
                p.id,
                p.name,
                p.tasks.len(),
                p.progress()
            )
        })
        .collect()
}

pub fn render_tasks(state: &UiState) -> Vec<String> {
    let mut lines = Vec::new();
    if !state.tasks_title.is_empty() {
        lines.push(state.tasks_title.clone());
    }
    for t in &state.tasks {
        let mut line = format!("{} {:>3}: {}", checkbox(t.status), t.id, t.name);
        if let Some(deadline) = t.deadline {
            line.push_str(&format!(" (due {})", deadline));
        }
        if t.status == TaskStatus::InProgress {
            line.push_str(" *");
        }
        lines.push(line);
    }
    if state.current_project.is_some() && state.tasks.is_empty() {
        lines.push("No tasks".to_string());
    }
    lines
}

pub fn render_modal(state: &UiState) -> Vec<String> {
    let Some(Modal::TaskDetail(d)) = &state.modal else {
        return Vec::new();
    };

    let mut lines = vec![format!("{} (#{}, {})", d.name, d.id, d.status)];
    if !d.description.is_empty() {
        lines.push(d.description.clone());
    }
    if let Some(deadline) = d.deadline {
        lines.push(format!("Deadline: {}", deadline));
    }
    match (&d.planned_start, &d.planned_end) {
        (Some(start), Some(end)) => lines.push(format!("Planned: {} → {}", start, end)),
        (Some(start), None) => lines.push(format!("Planned from {}", start)),
        _ => {}
    }
    if let Some(hours) = d.planned_hours {
        lines.push(format!("Planned hours: {}", hours));
    }
    let timer = if d.started { "running" } else { "stopped" };
    lines.push(format!("Time spent: {} ({})", format_duration(d.time_spent), timer));
    lines
}

pub fn render_notifications(state: &UiState) -> Vec<String> {
    if state.notifications.is_empty() {
        return vec!["No notifications".to_string()];
    }
    state
        .notifications
        .iter()
        .map(|n| format!("{:>3}: {} [{}]", n.id, n.message, n.status))
        .collect()
}

pub fn render_deadlines(state: &UiState) -> Vec<String> {
    if state.deadlines.is_empty() {
        return vec!["No upcoming deadlines".to_string()];
    }
    state
        .deadlines
        .iter()
        .map(|d| match d.deadline {
            Some(date) => format!("{} - {} ({})", d.project, d.task, date),
            None => format!("{} - {}", d.project, d.task),
        })
        .collect()
}

fn render_entry(entry: &CalendarEntry) -> String {
    let mut line = String::from("  ");
    match (&entry.start, &entry.end) {
        (Some(start), Some(end)) => line.push_str(&format!("{}-{} ", start, end)),
        (Some(start), None) => line.push_str(&format!("{} ", start)),
        _ => {}
    }
    line.push_str(&entry.task);
    if let Some(project) = &entry.project {
        line.push_str(&format!(" [{}]", project));
    }
    if let Some(hours) = entry.hours {
        line.push_str(&format!(" {}h", hours));
    }
    line
}

pub fn render_day(state: &UiState) -> Vec<String> {
    let Some((date, entries)) = &state.day else {
        return Vec::new();
    };
    let mut lines = vec![date.format("%A %Y-%m-%d").to_string()];
    if entries.is_empty() {
        lines.push("  (free)".to_string());
    }
    lines.extend(entries.iter().map(render_entry));
    lines
}

pub fn render_week(state: &UiState) -> Vec<String> {
    let mut lines = Vec::new();
    for (date, entries) in &state.week {
        lines.push(date.clone());
        if entries.is_empty() {
            lines.push("  (free)".to_string());
        }
        lines.extend(entries.iter().map(render_entry));
    }
    lines
}

pub fn render_recommendations(state: &UiState) -> Vec<String> {
    if state.recommendations.is_empty() {
        return vec!["Nothing to suggest".to_string()];
    }
    state
        .recommendations
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}", i + 1, r))
        .collect()
}

pub fn render_chat(state: &UiState) -> Vec<String> {
    state
        .chat
        .lines
        .iter()
        .map(|line| match line.speaker {
            Speaker::User => format!("you> {}", line.text),
            Speaker::Assistant => format!("ai> {}", line.text),
            Speaker::Log => format!("  - {}", line.text),
        })
        .collect()
}
