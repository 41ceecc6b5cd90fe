//! Recording surface

use super::Surface;
use crate::scene::{Color, Rect, Viewport};

/// One drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect { rect: Rect, color: Color },
}

/// Surface that keeps every presented frame as a list of commands
#[derive(Debug, Default)]
pub struct FrameRecorder {
    current: Vec<DrawCommand>,
    frames: Vec<Vec<DrawCommand>>,
    viewport: Option<Viewport>,
}

impl FrameRecorder {
    pub fn frames(&self) -> &[Vec<DrawCommand>] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&[DrawCommand]> {
        self.frames.last().map(Vec::as_slice)
    }

    /// Viewport of the most recent frame
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Number of filled rectangles in the last frame
    pub fn last_fill_count(&self) -> usize {
        self.last_frame()
            .map(|frame| {
                frame
                    .iter()
                    .filter(|cmd| matches!(cmd, DrawCommand::FillRect { .. }))
                    .count()
            })
            .unwrap_or(0)
    }
}

impl Surface for FrameRecorder {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn clear(&mut self, color: Color) {
        self.current.clear();
        self.current.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.current.push(DrawCommand::FillRect { rect, color });
    }

    fn present(&mut self) {
        self.frames.push(std::mem::take(&mut self.current));
    }
}
