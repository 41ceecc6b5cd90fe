//! Polling and Scheduling
//!
//! Keeps local state eventually consistent with the backend.
//!
//! ## Architecture
//!
//! - **Poller**: fixed-interval fetch loop with overlapping, sequenced requests
//! - **RequestSequencer**: drops responses older than the latest request
//! - **RenderLoop**: fixed-timestep room redraw fed by a snapshot channel

mod poller;
mod room;
mod sequencer;

pub use poller::{Polled, Poller};
pub use room::{spawn_room_sync, RenderLoop, SceneEvent};
pub use sequencer::{RequestSequencer, Resource, Ticket};
