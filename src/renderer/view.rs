//! Mapping between layout space and the canvas
//!
//! The scene is laid out in a fixed `VIEW_WIDTH` x `VIEW_HEIGHT` box with y
//! pointing down. It is scaled uniformly to fit the canvas and centred, so
//! the unused strip on the long side stays background.

use glam::Vec2;

use crate::consts::{VIEW_HEIGHT, VIEW_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Canvas size in whatever unit the caller measures pointers in
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Canvas units per layout unit
    pub fn scale(&self) -> f32 {
        (self.width / VIEW_WIDTH).min(self.height / VIEW_HEIGHT)
    }

    /// Layout point to normalized device coordinates
    pub fn to_ndc(&self, p: Vec2) -> Vec2 {
        let s = self.scale();
        let x = (p.x - VIEW_WIDTH / 2.0) * s;
        let y = (p.y - VIEW_HEIGHT / 2.0) * s;
        Vec2::new(x * 2.0 / self.width, -y * 2.0 / self.height)
    }

    /// Canvas point (origin top-left) to layout space
    pub fn to_layout(&self, x: f32, y: f32) -> Vec2 {
        let s = self.scale();
        Vec2::new(
            (x - self.width / 2.0) / s + VIEW_WIDTH / 2.0,
            (y - self.height / 2.0) / s + VIEW_HEIGHT / 2.0,
        )
    }
}
