//! Visual objects
//!
//! A room object with fixed geometry, an appearance and a state bag that is
//! only ever changed by merging server snapshots.

use serde_json::{Map, Value};
use std::fmt;

/// State bag key controlling visibility
pub const STATE_ON: &str = "on";
/// State bag key controlling appearance
pub const STATE_COLOR: &str = "color";

/// RGB color parsed from `#rgb` or `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a CSS hex color, returning `None` for anything else
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
                Some(Self::rgb(digit(0)?, digit(1)?, digit(2)?))
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => None,
        }
    }

    /// Relative luminance in 0..=1
    pub fn luminance(&self) -> f32 {
        (0.2126 * f32::from(self.r) + 0.7152 * f32::from(self.g) + 0.0722 * f32::from(self.b))
            / 255.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Axis-aligned rectangle in scene units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

/// A renderable room object
#[derive(Debug, Clone, PartialEq)]
pub struct VisualObject {
    id: String,
    bounds: Rect,
    color: Color,
    visible: bool,
    state: Map<String, Value>,
}

impl VisualObject {
    /// New object, initially switched on
    pub fn new(id: impl Into<String>, bounds: Rect, color: Color) -> Self {
        let mut state = Map::new();
        state.insert(STATE_ON.to_string(), Value::Bool(true));

        Self {
            id: id.into(),
            bounds,
            color,
            visible: true,
            state,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn state(&self) -> &Map<String, Value> {
        &self.state
    }

    /// Shallow-merge `partial` into the state bag, then derive visibility
    /// and appearance from the merged bag.
    ///
    /// Keys absent from `partial` keep their value. A non-boolean `on` or an
    /// unparseable `color` is stored but leaves the rendered object as it was.
    pub fn apply_state(&mut self, partial: &Map<String, Value>) {
        for (key, value) in partial {
            self.state.insert(key.clone(), value.clone());
        }

        if let Some(on) = self.state.get(STATE_ON).and_then(Value::as_bool) {
            self.visible = on;
        }

        if let Some(raw) = self.state.get(STATE_COLOR).and_then(Value::as_str) {
            match Color::parse_hex(raw) {
                Some(color) => self.color = color,
                None => tracing::debug!(object = %self.id, color = raw, "Ignoring unknown color"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn partial(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::parse_hex("#8888ff"), Some(Color::rgb(0x88, 0x88, 0xff)));
        assert_eq!(Color::parse_hex("#fff"), Some(Color::rgb(255, 255, 255)));
        assert_eq!(Color::parse_hex("red"), None);
        assert_eq!(Color::parse_hex("#12345"), None);
        assert_eq!(Color::parse_hex("#gg0000"), None);
        assert_eq!(Color::rgb(0x87, 0xce, 0xeb).to_string(), "#87ceeb");
    }

    #[test]
    fn test_new_object_is_on() {
        let obj = VisualObject::new("lamp", Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        assert!(obj.is_visible());
        assert_eq!(obj.state().get(STATE_ON), Some(&json!(true)));
    }

    #[test]
    fn test_shallow_merge_keeps_other_keys() {
        let mut obj = VisualObject::new("lamp", Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        obj.apply_state(&partial(json!({"brightness": 3})));
        obj.apply_state(&partial(json!({"on": false})));

        assert!(!obj.is_visible());
        assert_eq!(obj.state().get("brightness"), Some(&json!(3)));
    }

    #[test]
    fn test_color_update() {
        let mut obj = VisualObject::new("lamp", Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        obj.apply_state(&partial(json!({"color": "#ff0000"})));
        assert_eq!(obj.color(), Color::rgb(255, 0, 0));

        obj.apply_state(&partial(json!({"color": "not-a-color"})));
        assert_eq!(obj.color(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_non_bool_on_keeps_visibility() {
        let mut obj = VisualObject::new("lamp", Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        obj.apply_state(&partial(json!({"on": "nope"})));
        assert!(obj.is_visible());
    }
}
