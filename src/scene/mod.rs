//! Room Scene
//!
//! The fixed catalog of room objects, mirrored from server snapshots.
//!
//! Objects are created once from [`catalog`] and never added or removed
//! afterwards. Snapshot entries for ids that are not in the catalog are
//! ignored.

mod camera;
mod object;

pub use camera::{Camera, Viewport};
pub use object::{Color, Rect, VisualObject, STATE_COLOR, STATE_ON};

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::client::RoomObjectSnapshot;

/// The fixed room catalog, in drawing order
pub fn catalog() -> Vec<VisualObject> {
    vec![
        VisualObject::new("bed", Rect::new(50.0, 150.0, 80.0, 40.0), Color::rgb(0x88, 0x88, 0xff)),
        VisualObject::new("computer", Rect::new(200.0, 120.0, 40.0, 30.0), Color::rgb(0x22, 0x22, 0x22)),
        VisualObject::new("window", Rect::new(300.0, 60.0, 70.0, 50.0), Color::rgb(0x87, 0xce, 0xeb)),
    ]
}

/// Ordered room objects plus camera and viewport
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<VisualObject>,
    index: HashMap<String, usize>,
    camera: Camera,
    viewport: Viewport,
}

impl Scene {
    /// Build the scene from the fixed catalog
    pub fn create(camera: Camera, viewport: Viewport) -> Self {
        Self::from_objects(catalog(), camera, viewport)
    }

    fn from_objects(objects: Vec<VisualObject>, camera: Camera, viewport: Viewport) -> Self {
        let index = objects
            .iter()
            .enumerate()
            .map(|(i, obj)| (obj.id().to_string(), i))
            .collect();

        Self {
            objects,
            index,
            camera,
            viewport,
        }
    }

    pub fn get(&self, id: &str) -> Option<&VisualObject> {
        self.index.get(id).map(|&i| &self.objects[i])
    }

    /// All objects in catalog order
    pub fn objects(&self) -> &[VisualObject] {
        &self.objects
    }

    /// Visible objects in catalog order
    pub fn visible(&self) -> impl Iterator<Item = &VisualObject> {
        self.objects.iter().filter(|obj| obj.is_visible())
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn advance(&mut self, dt: Duration) {
        self.camera.advance(dt);
    }

    /// Merge a partial state into one object.
    ///
    /// Returns `false` (and changes nothing) when the id is not in the catalog.
    pub fn apply_state(&mut self, id: &str, partial: &Map<String, Value>) -> bool {
        match self.index.get(id) {
            Some(&i) => {
                self.objects[i].apply_state(partial);
                true
            }
            None => {
                tracing::debug!(object = id, "Ignoring state for unknown room object");
                false
            }
        }
    }

    /// Merge a whole snapshot; returns how many entries matched an object
    pub fn merge_snapshot(&mut self, snapshot: &[RoomObjectSnapshot]) -> usize {
        snapshot
            .iter()
            .filter(|entry| self.apply_state(&entry.id, &entry.state))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scene() -> Scene {
        Scene::create(Camera::fixed(), Viewport::new(400.0, 300.0))
    }

    fn entry(id: &str, state: Value) -> RoomObjectSnapshot {
        RoomObjectSnapshot {
            id: id.to_string(),
            state: state.as_object().cloned().unwrap(),
        }
    }

    fn visible_ids(scene: &Scene) -> Vec<&str> {
        scene.visible().map(|o| o.id()).collect()
    }

    #[test]
    fn test_catalog_order() {
        let scene = scene();
        let ids: Vec<_> = scene.objects().iter().map(|o| o.id()).collect();
        assert_eq!(ids, vec!["bed", "computer", "window"]);
        assert_eq!(visible_ids(&scene), ids);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut scene = scene();
        let before = scene.objects().to_vec();

        let partial = json!({"on": false}).as_object().cloned().unwrap();
        assert!(!scene.apply_state("fridge", &partial));
        assert_eq!(scene.objects(), &before[..]);
        assert!(scene.get("fridge").is_none());
    }

    #[test]
    fn test_on_off_toggles_visibility() {
        let mut scene = scene();

        scene.merge_snapshot(&[entry("computer", json!({"on": false}))]);
        assert_eq!(visible_ids(&scene), vec!["bed", "window"]);

        scene.merge_snapshot(&[entry("computer", json!({"on": true}))]);
        assert_eq!(visible_ids(&scene), vec!["bed", "computer", "window"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let snapshot = vec![
            entry("bed", json!({"on": false})),
            entry("window", json!({"color": "#000000", "open": true})),
            entry("ghost", json!({"on": true})),
        ];

        let mut scene = scene();
        assert_eq!(scene.merge_snapshot(&snapshot), 2);
        let first = scene.objects().to_vec();

        scene.merge_snapshot(&snapshot);
        assert_eq!(scene.objects(), &first[..]);
        assert_eq!(scene.get("window").unwrap().color(), Color::BLACK);
    }

    #[test]
    fn test_snapshot_never_adds_objects() {
        let mut scene = scene();
        scene.merge_snapshot(&[entry("lamp", json!({"on": true}))]);
        assert_eq!(scene.objects().len(), 3);
    }
}
