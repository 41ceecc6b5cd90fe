//! In-process stub of the task backend used by the client tests.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use taskroom::config::BackendConfig;
use taskroom::ApiClient;

#[derive(Debug, Default)]
pub struct Store {
    pub projects: Vec<Value>,
    pub next_project: u64,
    pub next_task: u64,
    pub time_spent: HashMap<u64, u64>,
    pub notifications: Vec<Value>,
    pub room: Vec<Value>,
    pub requests: Vec<String>,
}

pub type Shared = Arc<Mutex<Store>>;

impl Store {
    fn seeded() -> Self {
        Store {
            next_project: 1,
            next_task: 1,
            notifications: vec![
                json!({"id": 1, "message": "Start 'Draft' now?", "status": "pending"}),
                json!({"id": 2, "message": "Plan tomorrow?", "status": "pending"}),
            ],
            room: vec![
                json!({"id": "bed", "state": {"on": true}}),
                json!({"id": "computer", "state": {"on": false}}),
                json!({"id": "window", "state": {"color": "#000000"}}),
                json!({"id": "aquarium", "state": {"on": true}}),
            ],
            ..Store::default()
        }
    }

    fn project_mut(&mut self, id: u64) -> Option<&mut Value> {
        self.projects.iter_mut().find(|p| p["id"] == json!(id))
    }

    fn task_mut(&mut self, id: u64) -> Option<&mut Value> {
        self.projects
            .iter_mut()
            .filter_map(|p| p["tasks"].as_array_mut())
            .flat_map(|tasks| tasks.iter_mut())
            .find(|t| t["id"] == json!(id))
    }

    fn log(&mut self, request: String) {
        self.requests.push(request);
    }
}

type Reply = Result<Json<Value>, StatusCode>;

fn ok() -> Reply {
    Ok(Json(json!({"status": "ok"})))
}

async fn list_projects(State(store): State<Shared>) -> Json<Value> {
    let mut store = store.lock().unwrap();
    store.log("GET /api/projects".into());
    Json(Value::Array(store.projects.clone()))
}

async fn create_project(State(store): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut store = store.lock().unwrap();
    store.log("POST /api/projects".into());
    let id = store.next_project;
    store.next_project += 1;
    let project = json!({
        "id": id,
        "name": body["name"].as_str().unwrap_or("Project"),
        "description": "",
        "priority": 3,
        "deadline": null,
        "status": "en cours",
        "tasks": []
    });
    store.projects.push(project.clone());
    Json(project)
}

async fn get_project(State(store): State<Shared>, Path(id): Path<u64>) -> Reply {
    let mut store = store.lock().unwrap();
    store.log(format!("GET /api/projects/{}", id));
    store.project_mut(id).map(|p| Json(p.clone())).ok_or(StatusCode::NOT_FOUND)
}

async fn rename_project(
    State(store): State<Shared>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = store.lock().unwrap();
    store.log(format!("PUT /api/projects/{}", id));
    let project = store.project_mut(id).ok_or(StatusCode::NOT_FOUND)?;
    project["name"] = body["name"].clone();
    ok()
}

async fn delete_project(State(store): State<Shared>, Path(id): Path<u64>) -> Reply {
    let mut store = store.lock().unwrap();
    store.log(format!("DELETE /api/projects/{}", id));
    store.projects.retain(|p| p["id"] != json!(id));
    ok()
}

async fn create_task(
    State(store): State<Shared>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = store.lock().unwrap();
    store.log(format!("POST /api/projects/{}/tasks", id));
    let task_id = store.next_task;
    let task = json!({
        "id": task_id,
        "name": body["name"],
        "description": body.get("description").cloned().unwrap_or(json!("")),
        "deadline": body.get("deadline").cloned().unwrap_or(Value::Null),
        "importance": 3,
        "status": "pending"
    });
    let project = store.project_mut(id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(tasks) = project["tasks"].as_array_mut() {
        tasks.push(task.clone());
    }
    store.next_task += 1;
    Ok(Json(task))
}

async fn get_task(State(store): State<Shared>, Path(id): Path<u64>) -> Reply {
    let mut store = store.lock().unwrap();
    store.log(format!("GET /api/tasks/{}", id));
    let spent = store.time_spent.get(&id).copied().unwrap_or(0);
    let mut task = store.task_mut(id).cloned().ok_or(StatusCode::NOT_FOUND)?;
    task["time_spent"] = json!(spent);
    task["started"] = json!(false);
    Ok(Json(task))
}

async fn update_task(
    State(store): State<Shared>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = store.lock().unwrap();
    store.log(format!("PUT /api/tasks/{}", id));
    let task = store.task_mut(id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(fields) = body.as_object() {
        for (key, value) in fields {
            task[key] = value.clone();
        }
    }
    ok()
}

async fn delete_task(State(store): State<Shared>, Path(id): Path<u64>) -> Reply {
    let mut store = store.lock().unwrap();
    store.log(format!("DELETE /api/tasks/{}", id));
    for project in store.projects.iter_mut() {
        if let Some(tasks) = project["tasks"].as_array_mut() {
            tasks.retain(|t| t["id"] != json!(id));
        }
    }
    ok()
}

async fn complete_task(State(store): State<Shared>, Path(id): Path<u64>) -> Reply {
    let mut store = store.lock().unwrap();
    store.log(format!("POST /api/tasks/{}/done", id));
    let task = store.task_mut(id).ok_or(StatusCode::NOT_FOUND)?;
    task["status"] = json!("done");
    ok()
}

async fn start_timer(State(store): State<Shared>, Path(id): Path<u64>) -> Reply {
    let mut store = store.lock().unwrap();
    store.log(format!("POST /api/tasks/{}/start", id));
    ok()
}

async fn stop_timer(State(store): State<Shared>, Path(id): Path<u64>) -> Reply {
    let mut store = store.lock().unwrap();
    store.log(format!("POST /api/tasks/{}/stop", id));
    let spent = store.time_spent.entry(id).or_insert(0);
    *spent += 90;
    Ok(Json(json!({"time_spent": *spent})))
}

async fn list_notifications(State(store): State<Shared>) -> Json<Value> {
    let store = store.lock().unwrap();
    Json(Value::Array(store.notifications.clone()))
}

async fn resolve_notification(
    State(store): State<Shared>,
    Path((id, action)): Path<(u64, String)>,
) -> Reply {
    if action != "accept" && action != "decline" {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut store = store.lock().unwrap();
    store.log(format!("POST /api/notifications/{}/{}", id, action));
    store.notifications.retain(|n| n["id"] != json!(id));
    ok()
}

async fn list_deadlines() -> Json<Value> {
    Json(json!([
        {"id": 4, "task": "Draft", "project": "Thesis", "deadline": "2024-06-01"}
    ]))
}

async fn calendar_day(Path(date): Path<String>) -> Json<Value> {
    Json(json!([
        {"id": 4, "task": "Draft", "project": "Thesis", "start": format!("{}T09:00", date), "end": format!("{}T11:00", date)}
    ]))
}

async fn calendar_week(Query(params): Query<HashMap<String, String>>) -> Reply {
    let start = params.get("start").ok_or(StatusCode::BAD_REQUEST)?;
    let mut week = serde_json::Map::new();
    week.insert(start.clone(), json!([{"task": "Draft", "hours": 2.0}]));
    Ok(Json(Value::Object(week)))
}

async fn recommendations() -> Json<Value> {
    Json(json!(["Thesis - Draft", "Garden - Water plants"]))
}

async fn chat(Json(body): Json<Value>) -> Reply {
    match body["message"].as_str() {
        Some("fail") => Err(StatusCode::INTERNAL_SERVER_ERROR),
        Some(message) => Ok(Json(json!({
            "reply": format!("Noted: {}", message),
            "logs": ["created reminder"]
        }))),
        None => Err(StatusCode::BAD_REQUEST),
    }
}

async fn room_objects(State(store): State<Shared>) -> Json<Value> {
    let store = store.lock().unwrap();
    Json(Value::Array(store.room.clone()))
}

pub fn router(store: Shared) -> Router {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/:id",
            get(get_project).put(rename_project).delete(delete_project),
        )
        .route("/api/projects/:id/tasks", post(create_task))
        .route("/api/tasks/:id", get(get_task).put(update_task).delete(delete_task))
        .route("/api/tasks/:id/done", post(complete_task))
        .route("/api/tasks/:id/start", post(start_timer))
        .route("/api/tasks/:id/stop", post(stop_timer))
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications/:id/:action", post(resolve_notification))
        .route("/api/deadlines", get(list_deadlines))
        .route("/api/calendar/week", get(calendar_week))
        .route("/api/calendar/:date", get(calendar_day))
        .route("/api/recommendations", get(recommendations))
        .route("/api/chat", post(chat))
        .route("/api/room/objects", get(room_objects))
        .with_state(store)
}

/// Serve the stub on an ephemeral port
pub async fn spawn_backend() -> (String, Shared) {
    let store: Shared = Arc::new(Mutex::new(Store::seeded()));
    let app = router(store.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), store)
}

pub async fn client() -> (ApiClient, Shared) {
    let (base_url, store) = spawn_backend().await;
    let config = BackendConfig {
        base_url,
        request_timeout_ms: 5000,
    };
    (ApiClient::new(&config).unwrap(), store)
}
