//! # Taskroom
//!
//! Client for a personal task/project manager backend, with a live "room"
//! visualization mirrored from server state.
//!
//! ## Features
//!
//! - **List views**: projects, tasks, notifications, deadlines, calendar,
//!   recommendations and chat, reloaded from the server after every change
//! - **Sequenced reads**: responses overtaken by a newer request are dropped
//! - **Room loop**: fixed-interval snapshot polling feeding an independent
//!   fixed-timestep redraw loop over a channel
//!
//! ## Modules
//!
//! - [`client`]: REST client and backend traits
//! - [`views`]: view state, controller and text rendering
//! - [`scene`]: fixed catalog of room objects
//! - [`render`]: drawing surfaces
//! - [`sync`]: pollers, request sequencing and the render loop
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskroom::client::ApiClient;
//! use taskroom::config::BackendConfig;
//! use taskroom::views::{render, ViewController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(&BackendConfig::default())?;
//!     let views = ViewController::new(Arc::new(client));
//!
//!     views.load_projects().await?;
//!     views.select_project(1).await?;
//!
//!     for line in render::render_tasks(&views.snapshot().await) {
//!         println!("{}", line);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod render;
pub mod scene;
pub mod sync;
pub mod views;

// Re-export top-level types for convenience
pub use client::{ApiClient, ClientError, ClientResult, RoomSource, TaskBackend};

pub use config::{BackendConfig, Config, ConfigError, LoggingConfig, RenderConfig, SyncConfig};

pub use scene::{Camera, Scene, Viewport, VisualObject};

pub use render::{AsciiSurface, FrameRecorder, Surface};

pub use sync::{spawn_room_sync, Poller, RenderLoop, RequestSequencer, SceneEvent};

pub use views::{Outcome, UiState, ViewController};
