//! Room sync and render loops
//!
//! Two independent loops connected by a channel:
//!
//! - the sync loop polls `GET /api/room/objects` and sends each snapshot
//!   as a [`SceneEvent`];
//! - the render loop owns the [`Scene`], drains pending events at the start
//!   of every fixed-timestep frame and redraws.
//!
//! The render loop never waits on the network. Snapshots older than the last
//! one applied are dropped.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::poller::{Polled, Poller};
use crate::client::{RoomObjectSnapshot, RoomSource};
use crate::render::{draw_scene, Surface};
use crate::scene::{Scene, Viewport};

/// Messages consumed by the render loop
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// A room snapshot issued by poll tick `seq`
    Snapshot {
        seq: u64,
        objects: Vec<RoomObjectSnapshot>,
    },
    /// The drawing area changed size
    Resize(Viewport),
}

impl From<Polled<Vec<RoomObjectSnapshot>>> for SceneEvent {
    fn from(polled: Polled<Vec<RoomObjectSnapshot>>) -> Self {
        SceneEvent::Snapshot {
            seq: polled.seq,
            objects: polled.value,
        }
    }
}

/// Start polling room objects into `tx`
pub fn spawn_room_sync(
    source: Arc<dyn RoomSource>,
    period: Duration,
    tx: mpsc::Sender<SceneEvent>,
) -> JoinHandle<()> {
    Poller::new("room", period).spawn(
        move || {
            let source = Arc::clone(&source);
            async move { source.room_objects().await }
        },
        tx,
    )
}

/// Fixed-timestep render loop
pub struct RenderLoop<S> {
    scene: Scene,
    surface: S,
    events: mpsc::Receiver<SceneEvent>,
    period: Duration,
    last_seq: u64,
    frames: u64,
}

impl<S: Surface> RenderLoop<S> {
    pub fn new(scene: Scene, surface: S, events: mpsc::Receiver<SceneEvent>, period: Duration) -> Self {
        Self {
            scene,
            surface,
            events,
            period,
            last_seq: 0,
            frames: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Apply one event to the scene
    fn handle(&mut self, event: SceneEvent) {
        match event {
            SceneEvent::Snapshot { seq, objects } => {
                if seq <= self.last_seq {
                    tracing::debug!(seq, last_seq = self.last_seq, "Dropping stale room snapshot");
                    return;
                }
                let matched = self.scene.merge_snapshot(&objects);
                self.last_seq = seq;
                tracing::trace!(seq, objects = objects.len(), matched, "Merged room snapshot");
            }
            SceneEvent::Resize(viewport) => self.scene.resize(viewport),
        }
    }

    /// Run a single frame: merge whatever has arrived, advance, draw
    pub fn step(&mut self, dt: Duration) {
        while let Ok(event) = self.events.try_recv() {
            self.handle(event);
        }

        self.scene.advance(dt);
        draw_scene(&self.scene, &mut self.surface);
        self.frames += 1;
    }

    /// Render until `shutdown` turns true (or its sender is dropped), or
    /// until `max_frames` frames were drawn.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>, max_frames: Option<u64>) -> Self {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        tracing::info!(period_ms = self.period.as_millis() as u64, "Render loop started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    let now = Instant::now();
                    self.step(now - last);
                    last = now;

                    if max_frames.is_some_and(|max| self.frames >= max) {
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!(frames = self.frames, "Render loop stopped");
        self
    }
}
