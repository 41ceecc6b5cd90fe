//! Backend Client
//!
//! REST client for the task manager backend.
//!
//! ## Architecture
//!
//! - **TaskBackend**: everything the list views read and mutate
//! - **RoomSource**: the room object snapshot read
//! - **ApiClient**: reqwest implementation of both

mod api;
mod backend;
pub mod dto;
mod error;

pub use api::ApiClient;
pub use backend::{RoomSource, TaskBackend};
pub use dto::{
    CalendarEntry, ChatReply, Deadline, NewTask, Notification, Project, Resolution,
    RoomObjectSnapshot, Task, TaskDetail, TaskPatch, TaskStatus, TimerStopped, WeekSchedule,
};
pub use error::{ClientError, ClientResult};
