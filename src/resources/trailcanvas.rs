//! Persistent canvas for the fading-trail effect.
//!
//! Shapes are drawn into an off-screen texture that is never cleared. Each
//! frame first washes it with a translucent layer of the background color,
//! so older lines fade out gradually instead of vanishing. The texture is
//! then copied to the window.
//!
//! # Note
//! The canvas owns GPU resources and must stay on the main thread; it is
//! kept by the render loop, not inserted into the ECS world.

use raylib::prelude::*;

pub struct TrailCanvas {
    /// The underlying raylib render texture.
    pub texture: RenderTexture2D,
    pub width: u32,
    pub height: u32,
}

impl TrailCanvas {
    /// Create the canvas and fill it with `background`.
    pub fn new(
        rl: &mut RaylibHandle,
        th: &RaylibThread,
        width: u32,
        height: u32,
        background: Color,
    ) -> Result<Self, String> {
        let texture = rl
            .load_render_texture(th, width, height)
            .map_err(|e| format!("Failed to create trail canvas: {}", e))?;

        let mut canvas = Self {
            texture,
            width,
            height,
        };
        {
            let mut t = rl.begin_texture_mode(th, &mut canvas.texture);
            t.clear_background(background);
        }
        Ok(canvas)
    }

    /// Source rectangle for copying the canvas to the window.
    ///
    /// The height is negative to flip the Y axis, compensating for OpenGL's
    /// inverted texture coordinates.
    pub fn source_rect(&self) -> Rectangle {
        Rectangle {
            x: 0.0,
            y: 0.0,
            width: self.width as f32,
            height: -(self.height as f32),
        }
    }
}
