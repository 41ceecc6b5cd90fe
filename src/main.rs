//! Taskroom CLI
//!
//! Command-line interface for the task manager backend:
//! - Manage projects and tasks
//! - Track time on tasks
//! - Review notifications, deadlines, calendar and suggestions
//! - Chat with the assistant
//! - Watch the room visualization

use chrono::{Datelike, Duration as ChronoDuration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskroom::client::{ApiClient, NewTask, Resolution, TaskPatch, TaskStatus};
use taskroom::config::{generate_default_config, Config, LoggingConfig};
use taskroom::render::{terminal_size, AsciiSurface};
use taskroom::scene::{Camera, Scene};
use taskroom::sync::{spawn_room_sync, Polled, Poller, RenderLoop, SceneEvent};
use taskroom::views::{render, AssumeYes, Confirm, Outcome, ViewController};

#[derive(Parser)]
#[command(name = "taskroom")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal task manager client")]
#[command(long_about = "Taskroom talks to the task manager backend.\nManage projects and tasks, track time, and watch the room.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List projects
    Projects,

    /// Show a project's tasks
    Project {
        id: u64,
    },

    /// Create a project
    AddProject {
        name: String,
    },

    /// Rename a project
    RenameProject {
        id: u64,
        name: String,
    },

    /// Delete a project
    DeleteProject {
        id: u64,
    },

    /// Add a task to a project
    AddTask {
        /// Project id
        project: u64,
        /// Task name
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<NaiveDate>,
        #[arg(long)]
        planned_start: Option<String>,
        #[arg(long)]
        planned_end: Option<String>,
        #[arg(long)]
        planned_hours: Option<f64>,
    },

    /// Show task details
    Task {
        id: u64,
    },

    /// Update task fields
    UpdateTask {
        id: u64,
        /// Project id to reload afterwards
        #[arg(short, long)]
        project: Option<u64>,
        #[arg(long)]
        name: Option<String>,
        /// pending, in_progress or done
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        deadline: Option<NaiveDate>,
        #[arg(long)]
        importance: Option<u8>,
        /// Estimated hours
        #[arg(long)]
        estimated: Option<f64>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Mark a task done
    Done {
        id: u64,
        /// Project id to reload afterwards
        #[arg(short, long)]
        project: Option<u64>,
    },

    /// Delete a task
    DeleteTask {
        id: u64,
        /// Project id to reload afterwards
        #[arg(short, long)]
        project: Option<u64>,
    },

    /// Start the timer on a task
    Start {
        id: u64,
    },

    /// Stop the timer on a task
    Stop {
        id: u64,
    },

    /// List pending notifications
    Notifications,

    /// Accept a notification
    Accept {
        id: u64,
    },

    /// Decline a notification
    Decline {
        id: u64,
    },

    /// List upcoming deadlines
    Deadlines,

    /// Show a day's schedule (default: today)
    Calendar {
        date: Option<NaiveDate>,
    },

    /// Show a week's schedule (default: this week, starting Monday)
    Week {
        start: Option<NaiveDate>,
    },

    /// Show suggested next tasks
    Recommend,

    /// Send a message to the assistant
    Chat {
        message: Vec<String>,
    },

    /// Watch the room visualization
    Room {
        /// Stop after this many frames
        #[arg(long)]
        frames: Option<u64>,
    },

    /// Poll notifications and deadlines and print changes
    Watch,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Asks on the terminal
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        let _ = std::io::stdout().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)?;
                println!("Config written to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.backend.base_url = url.clone();
    }

    init_logging(&config.logging);
    tracing::debug!(backend = %config.backend.base_url, "Taskroom v{}", env!("CARGO_PKG_VERSION"));

    let client = Arc::new(ApiClient::new(&config.backend)?);
    let views = ViewController::new(client.clone());
    let confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };

    match cli.command {
        Commands::Projects => {
            views.load_projects().await?;
            print_lines(render::render_projects(&views.snapshot().await));
        }

        Commands::Project { id } => {
            show_project(&views, id).await?;
        }

        Commands::AddProject { name } => {
            report(views.create_project(&name).await?, "Project name is empty");
            print_lines(render::render_projects(&views.snapshot().await));
        }

        Commands::RenameProject { id, name } => {
            report(views.rename_project(id, &name).await?, "Project name is empty");
            print_lines(render::render_projects(&views.snapshot().await));
        }

        Commands::DeleteProject { id } => {
            report(views.delete_project(id, confirm.as_ref()).await?, "Cancelled");
            print_lines(render::render_projects(&views.snapshot().await));
        }

        Commands::AddTask {
            project,
            name,
            description,
            deadline,
            planned_start,
            planned_end,
            planned_hours,
        } => {
            select(&views, project).await?;
            let task = NewTask {
                name,
                description,
                deadline,
                planned_start,
                planned_end,
                planned_hours,
            };
            report(views.create_task(task).await?, "Task name is empty");
            print_lines(render::render_tasks(&views.snapshot().await));
        }

        Commands::Task { id } => {
            views.open_task(id).await?;
            print_lines(render::render_modal(&views.snapshot().await));
        }

        Commands::UpdateTask {
            id,
            project,
            name,
            status,
            deadline,
            importance,
            estimated,
            description,
        } => {
            if let Some(project) = project {
                select(&views, project).await?;
            }
            let patch = TaskPatch {
                name,
                status,
                estimated,
                deadline,
                importance,
                description,
            };
            report(views.update_task(id, &patch).await?, "Nothing to update");
            print_lines(render::render_tasks(&views.snapshot().await));
        }

        Commands::Done { id, project } => {
            if let Some(project) = project {
                select(&views, project).await?;
            }
            views.mark_done(id).await?;
            println!("Task {} done", id);
            print_lines(render::render_tasks(&views.snapshot().await));
        }

        Commands::DeleteTask { id, project } => {
            if let Some(project) = project {
                select(&views, project).await?;
            }
            report(views.delete_task(id, confirm.as_ref()).await?, "Cancelled");
            print_lines(render::render_tasks(&views.snapshot().await));
        }

        Commands::Start { id } => {
            views.open_task(id).await?;
            views.start_timer(id).await?;
            println!("Timer started on task {}", id);
        }

        Commands::Stop { id } => {
            let spent = views.stop_timer(id).await?;
            println!("Time spent: {}", render::format_duration(spent));
        }

        Commands::Notifications => {
            views.load_notifications().await?;
            print_lines(render::render_notifications(&views.snapshot().await));
        }

        Commands::Accept { id } => {
            views.resolve_notification(id, Resolution::Accept).await?;
            print_lines(render::render_notifications(&views.snapshot().await));
        }

        Commands::Decline { id } => {
            views.resolve_notification(id, Resolution::Decline).await?;
            print_lines(render::render_notifications(&views.snapshot().await));
        }

        Commands::Deadlines => {
            views.load_deadlines().await?;
            print_lines(render::render_deadlines(&views.snapshot().await));
        }

        Commands::Calendar { date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            views.load_day(date).await?;
            print_lines(render::render_day(&views.snapshot().await));
        }

        Commands::Week { start } => {
            let start = start.unwrap_or_else(|| week_start(Local::now().date_naive()));
            views.load_week(start).await?;
            print_lines(render::render_week(&views.snapshot().await));
        }

        Commands::Recommend => {
            views.load_recommendations().await?;
            print_lines(render::render_recommendations(&views.snapshot().await));
        }

        Commands::Chat { message } => {
            let result = views.send_chat(&message.join(" ")).await;
            print_lines(render::render_chat(&views.snapshot().await));
            result?;
        }

        Commands::Room { frames } => {
            run_room(client, &config, frames).await;
        }

        Commands::Watch => {
            run_watch(views, &config).await;
        }

        // Written before the backend client is built
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("taskroom={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

fn report(outcome: Outcome, ignored: &str) {
    match outcome {
        Outcome::Applied => {}
        Outcome::Ignored => println!("{}", ignored),
        Outcome::Stale => tracing::debug!("View superseded by a newer request"),
    }
}

/// Load the project list and make `id` current
async fn select(views: &ViewController, id: u64) -> anyhow::Result<()> {
    views.load_projects().await?;
    views.select_project(id).await?;
    Ok(())
}

async fn show_project(views: &ViewController, id: u64) -> anyhow::Result<()> {
    select(views, id).await?;
    print_lines(render::render_tasks(&views.snapshot().await));
    Ok(())
}

fn week_start(day: NaiveDate) -> NaiveDate {
    day - ChronoDuration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// Flip `tx` on Ctrl+C
fn shutdown_on_ctrl_c(tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            let _ = tx.send(true);
        }
    });
}

async fn run_room(client: Arc<ApiClient>, config: &Config, frames: Option<u64>) {
    let render = &config.render;
    let (events_tx, events_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    shutdown_on_ctrl_c(shutdown_tx);

    let resize = watch_terminal_size(events_tx.clone(), render.scale);
    let sync = spawn_room_sync(client, config.sync.room_period(), events_tx);

    let (cols, rows) = terminal_cells().unwrap_or((render.width, render.height));
    let scene = Scene::create(
        Camera::new(render.camera_speed, render.camera_sway),
        AsciiSurface::viewport_for(cols, rows, render.scale),
    );
    let surface = AsciiSurface::new(cols, rows, render.scale).echo_to_stdout();

    print!("\x1b[2J");
    let finished = RenderLoop::new(scene, surface, events_rx, render.frame_period())
        .run(shutdown_rx, frames)
        .await;

    sync.abort();
    resize.abort();
    tracing::info!(frames = finished.frames(), "Room closed");
}

/// Terminal size available to the room, keeping the last row free so the
/// trailing newline does not scroll
fn terminal_cells() -> Option<(usize, usize)> {
    terminal_size().map(|(cols, rows)| (cols, rows.saturating_sub(1).max(1)))
}

/// Send a `Resize` to the render loop whenever the terminal changes size
#[cfg(unix)]
fn watch_terminal_size(tx: mpsc::Sender<SceneEvent>, scale: f32) -> JoinHandle<()> {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut changes = match signal(SignalKind::window_change()) {
            Ok(changes) => changes,
            Err(e) => {
                tracing::warn!("Cannot watch terminal size: {}", e);
                return;
            }
        };

        while changes.recv().await.is_some() {
            let Some((cols, rows)) = terminal_cells() else {
                continue;
            };
            tracing::debug!(cols, rows, "Terminal resized");
            let viewport = AsciiSurface::viewport_for(cols, rows, scale);
            if tx.send(SceneEvent::Resize(viewport)).await.is_err() {
                break;
            }
        }
    })
}

#[cfg(not(unix))]
fn watch_terminal_size(_tx: mpsc::Sender<SceneEvent>, _scale: f32) -> JoinHandle<()> {
    tokio::spawn(async {})
}

async fn run_watch(views: ViewController, config: &Config) {
    let (notif_tx, mut notif_rx) = mpsc::channel::<Polled<Outcome>>(8);
    let (deadline_tx, mut deadline_rx) = mpsc::channel::<Polled<Outcome>>(8);
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    shutdown_on_ctrl_c(shutdown_tx);

    let c = views.clone();
    let notifications = Poller::new("notifications", config.sync.notification_period()).spawn(
        move || {
            let c = c.clone();
            async move { c.load_notifications().await }
        },
        notif_tx,
    );
    let c = views.clone();
    let deadlines = Poller::new("deadlines", config.sync.deadline_period()).spawn(
        move || {
            let c = c.clone();
            async move { c.load_deadlines().await }
        },
        deadline_tx,
    );

    let mut shown_notifications = Vec::new();
    let mut shown_deadlines = Vec::new();

    loop {
        tokio::select! {
            Some(_) = notif_rx.recv() => {
                let lines = render::render_notifications(&views.snapshot().await);
                if lines != shown_notifications {
                    println!("== Notifications");
                    print_lines(lines.clone());
                    shown_notifications = lines;
                }
            }
            Some(_) = deadline_rx.recv() => {
                let lines = render::render_deadlines(&views.snapshot().await);
                if lines != shown_deadlines {
                    println!("== Deadlines");
                    print_lines(lines.clone());
                    shown_deadlines = lines;
                }
            }
            _ = shutdown_rx.changed() => break,
            else => break,
        }
    }

    notifications.abort();
    deadlines.abort();
}
