//! Drawing of the display state: trail canvas, caption and debug overlay.

use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::resources::config::SaverConfig;
use crate::resources::debugmode::DebugMode;
use crate::resources::displaystate::DisplayState;
use crate::resources::framestats::FrameStats;
use crate::resources::palette::Palette;
use crate::resources::screensize::ScreenSize;
use crate::resources::trailcanvas::TrailCanvas;

const CAPTION_COLOR: Color = Color {
    r: 120,
    g: 120,
    b: 160,
    a: 255,
};
const CAPTION_SIZE: i32 = 18;
const OVERLAY_COLOR: Color = Color {
    r: 200,
    g: 200,
    b: 200,
    a: 255,
};

/// Draw one frame from the coordinator's world.
///
/// Shapes go into the trail canvas on top of a translucent background wash,
/// then the canvas, caption and optional overlay go to the window. Only
/// [`DisplayState`] is read for shape data; a shape with no snapshot yet is
/// simply not drawn.
pub fn render_frame(
    rl: &mut RaylibHandle,
    th: &RaylibThread,
    canvas: &mut TrailCanvas,
    world: &World,
) {
    let config = world.resource::<SaverConfig>();
    let display = world.resource::<DisplayState>();
    let palette = world.resource::<Palette>();
    let screen = *world.resource::<ScreenSize>();

    let wash = Color::new(
        config.background.r,
        config.background.g,
        config.background.b,
        config.fade_alpha,
    );

    {
        let mut t = rl.begin_texture_mode(th, &mut canvas.texture);
        t.draw_rectangle(0, 0, screen.w, screen.h, wash);
        for snapshot in display.ordered() {
            draw_closed_polyline(
                &mut t,
                &snapshot.points,
                palette.color(snapshot.color_index),
                config.line_thickness,
            );
        }
    }

    let mut d = rl.begin_drawing(th);
    d.clear_background(config.background);
    d.draw_texture_rec(
        &canvas.texture,
        canvas.source_rect(),
        Vector2 { x: 0.0, y: 0.0 },
        Color::WHITE,
    );

    if let Some(caption) = config.caption.as_deref() {
        d.draw_text(caption, 20, screen.h - 40, CAPTION_SIZE, CAPTION_COLOR);
    }

    if world.contains_resource::<DebugMode>() {
        render_debug_ui(&mut d, world);
    }
}

/// Stroke the polyline through `points` and back to the first point.
pub fn draw_closed_polyline<D: RaylibDraw>(
    d: &mut D,
    points: &[Vector2],
    color: Color,
    thickness: f32,
) {
    if points.len() < 2 {
        return;
    }
    for (i, start) in points.iter().enumerate() {
        let end = points[(i + 1) % points.len()];
        if thickness > 1.0 {
            d.draw_line_ex(*start, end, thickness, color);
        } else {
            d.draw_line_v(*start, end, color);
        }
    }
}

fn render_debug_ui(d: &mut RaylibDrawHandle, world: &World) {
    let stats = *world.resource::<FrameStats>();
    let display = world.resource::<DisplayState>();

    d.draw_fps(10, 10);
    let text = format!(
        "Frames: {} | Drained: {} (total {}) | Shapes: {}",
        stats.frames,
        stats.drained_last_frame,
        stats.drained_total,
        display.len()
    );
    d.draw_text(&text, 10, 34, 10, OVERLAY_COLOR);
}
