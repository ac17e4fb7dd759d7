use eframe::egui::{Pos2, Rect, Vec2};

pub(super) const MIN_ZOOM: f32 = 0.1;
pub(super) const MAX_ZOOM: f32 = 8.0;

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

/// The next (pan, zoom) pair for a scroll of `scroll_delta` with the pointer
/// at `pointer`: zoom is clamped to [0.1, 8.0] and the world point under the
/// pointer stays put.
pub(super) fn zoom_toward(
    rect: Rect,
    pointer: Pos2,
    pan: Vec2,
    zoom: f32,
    scroll_delta: f32,
) -> (Vec2, f32) {
    let world_before = screen_to_world(rect, pan, zoom, pointer);
    let factor = (1.0 + (scroll_delta * 0.0018)).clamp(0.85, 1.15);
    let next_zoom = (zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    let next_pan = pointer - rect.center() - (world_before * next_zoom);
    (next_pan, next_zoom)
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Arc points of a pie slice in screen space, center first. Consecutive
/// point pairs fan into triangles so concave spans fill correctly.
pub(super) fn pie_slice_points(
    center: Pos2,
    radius: f32,
    angle_start: f32,
    angle_end: f32,
) -> Vec<Pos2> {
    const MAX_STEP: f32 = 0.2;

    let span = (angle_end - angle_start).max(0.0);
    let segments = ((span / MAX_STEP).ceil() as usize).max(1);

    let mut points = Vec::with_capacity(segments + 2);
    points.push(center);
    for step in 0..=segments {
        let angle = angle_start + span * (step as f32 / segments as f32);
        points.push(center + Vec2::new(angle.cos(), angle.sin()) * radius);
    }
    points
}
