//! Scene Rendering
//!
//! Draws a [`Scene`] onto a [`Surface`]. Surfaces only know how to clear
//! themselves and fill rectangles, the way a 2D canvas context does.

mod ascii;
mod recorder;

pub use ascii::{terminal_size, AsciiSurface};
pub use recorder::{DrawCommand, FrameRecorder};

use crate::scene::{Color, Rect, Scene, Viewport};

/// Background color of the room
pub const BACKGROUND: Color = Color::BLACK;

/// A 2D drawing target
pub trait Surface {
    /// Match the drawing area to `viewport`; called before every frame
    fn resize(&mut self, _viewport: Viewport) {}

    /// Clear the whole surface to `color`
    fn clear(&mut self, color: Color);

    /// Fill a rectangle given in scene units
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Called once all objects of a frame have been drawn
    fn present(&mut self) {}
}

/// Draw one frame: clear, then every visible object in catalog order
pub fn draw_scene<S: Surface + ?Sized>(scene: &Scene, surface: &mut S) {
    let (dx, dy) = scene.camera().offset();

    surface.resize(scene.viewport());
    surface.clear(BACKGROUND);
    for obj in scene.visible() {
        surface.fill_rect(obj.bounds().offset(dx, dy), obj.color());
    }
    surface.present();
}
