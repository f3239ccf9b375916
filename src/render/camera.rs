//! Viewport for 2D rendering
//!
//! The camera position is the world point shown at the top-left corner of
//! the canvas; `scale` is canvas pixels per world unit.

use crate::core::types::{Vec2, WorldRect};

/// Zoom limits (canvas pixels per world unit)
pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// World position of the canvas's top-left corner
    pub camera: Vec2,
    pub scale: f32,
    /// Canvas size in pixels
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Create a viewport at the world origin with scale 1
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            camera: Vec2::ZERO,
            scale: 1.0,
            width,
            height,
        }
    }

    pub fn with_camera(mut self, camera: Vec2, scale: f32) -> Self {
        self.camera = camera;
        self.scale = scale;
        self
    }

    /// Scale actually used for transforms: clamped, and 1 if non-finite
    pub fn pixel_scale(&self) -> f32 {
        if self.scale.is_finite() {
            self.scale.clamp(MIN_SCALE, MAX_SCALE)
        } else {
            1.0
        }
    }

    /// `[camera.x, camera.x + width/scale] × [camera.y, camera.y + height/scale]`
    pub fn world_bounds(&self) -> WorldRect {
        let scale = self.pixel_scale();
        WorldRect::new(
            self.camera,
            self.camera + Vec2::new(self.width / scale, self.height / scale),
        )
    }

    /// World point at the middle of the canvas
    pub fn center(&self) -> Vec2 {
        self.world_bounds().center()
    }

    /// Convert world coordinates to canvas coordinates
    pub fn world_to_screen(&self, world_pos: Vec2) -> Vec2 {
        (world_pos - self.camera) * self.pixel_scale()
    }

    /// Convert canvas coordinates to world coordinates
    pub fn screen_to_world(&self, screen_pos: Vec2) -> Vec2 {
        screen_pos / self.pixel_scale() + self.camera
    }

    /// Move the camera so `point` is at the canvas center
    pub fn center_on(&mut self, point: Vec2) {
        let half = Vec2::new(self.width, self.height) * 0.5 / self.pixel_scale();
        self.camera = point - half;
    }

    /// Adjust zoom around the canvas center, clamped to [0.1, 10.0]
    pub fn adjust_zoom(&mut self, delta: f32) {
        let center = self.center();
        self.scale = (self.pixel_scale() * (1.0 + delta)).clamp(MIN_SCALE, MAX_SCALE);
        self.center_on(center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_bounds() {
        let vp = Viewport::new(800.0, 600.0).with_camera(Vec2::new(100.0, -50.0), 2.0);
        let bounds = vp.world_bounds();
        assert_eq!(bounds.min, Vec2::new(100.0, -50.0));
        assert_eq!(bounds.max, Vec2::new(500.0, 250.0));
        assert_eq!(vp.center(), Vec2::new(300.0, 100.0));
    }

    #[test]
    fn test_screen_round_trip() {
        let vp = Viewport::new(800.0, 600.0).with_camera(Vec2::new(10.0, 20.0), 4.0);
        let screen = vp.world_to_screen(Vec2::new(20.0, 20.0));
        assert_eq!(screen, Vec2::new(40.0, 0.0));
        assert_eq!(vp.screen_to_world(screen), Vec2::new(20.0, 20.0));
    }

    #[test]
    fn test_zoom_clamp_keeps_center() {
        let mut vp = Viewport::new(800.0, 600.0);
        let center = vp.center();
        vp.adjust_zoom(100.0);
        assert!(vp.scale <= MAX_SCALE);
        assert!((vp.center() - center).length() < 1e-3);
        vp.adjust_zoom(-100.0);
        assert!(vp.scale >= MIN_SCALE);
    }

    #[test]
    fn test_center_on() {
        let mut vp = Viewport::new(200.0, 100.0);
        vp.center_on(Vec2::new(500.0, 500.0));
        assert_eq!(vp.camera, Vec2::new(400.0, 450.0));
    }
}
