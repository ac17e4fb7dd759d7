use eframe::egui::{
    Align2, Color32, CursorIcon, FontId, PointerButton, Sense, Shape, Stroke, Ui, vec2,
};

use super::super::render_utils::{
    circle_visible, pie_slice_points, screen_to_world, world_to_screen,
};
use super::super::{ViewModel, physics};

const BACKGROUND: Color32 = Color32::from_rgb(0x13, 0x17, 0x1d);
const UNAFFILIATED_FILL: Color32 = Color32::from_rgb(0x66, 0x66, 0x66);
const NODE_OUTLINE: Color32 = Color32::from_rgb(0x1e, 0x1e, 0x1e);
const HOVER_OUTLINE: Color32 = Color32::from_gray(0xc8);
const LABEL_COLOR: Color32 = Color32::from_rgb(0xee, 0xee, 0xee);
const PULSE_COLOR: Color32 = Color32::from_rgb(0x67, 0xc4, 0xff);

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.graph_dirty {
            self.rebuild_render_graph();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);

        // A resized canvas shifts every screen position, so let the layout
        // re-settle around the new center.
        if (rect.size() - self.canvas_size).length() > 0.5 {
            self.canvas_size = rect.size();
            if let Some(render_graph) = &mut self.render_graph {
                render_graph.reheat();
            }
        }

        self.handle_graph_zoom(ui, rect, &response);

        let pointer_world = response
            .interact_pointer_pos()
            .map(|pointer| screen_to_world(rect, self.pan, self.zoom, pointer));

        if response.drag_started_by(PointerButton::Primary) {
            let hit = response
                .interact_pointer_pos()
                .and_then(|pointer| self.node_at(rect, pointer));
            if let (Some(index), Some(world)) = (hit, pointer_world)
                && let Some(render_graph) = &mut self.render_graph
            {
                render_graph.begin_drag();
                render_graph.pin(index, world);
                self.drag_index = Some(index);
            }
        }

        if response.dragged() {
            if let Some(index) = self.drag_index {
                if let (Some(world), Some(render_graph)) =
                    (pointer_world, self.render_graph.as_mut())
                {
                    render_graph.pin(index, world);
                }
            } else {
                self.pan += response.drag_delta();
            }
        }

        if response.drag_stopped()
            && let Some(index) = self.drag_index.take()
            && let Some(render_graph) = &mut self.render_graph
        {
            render_graph.unpin(index);
            render_graph.end_drag();
        }

        let mut moving = false;
        if let Some(render_graph) = &mut self.render_graph {
            moving = physics::step_simulation(render_graph, &self.forces);
        }

        let now = ui.input(|input| input.time);
        let mut pulse_active = false;
        if let Some(until) = self.search_pulse_until {
            if now < until {
                pulse_active = true;
            } else {
                self.search_pulse_until = None;
                self.search_matches.clear();
            }
        }

        if moving || pulse_active || response.dragged() {
            ui.ctx().request_repaint();
        }

        let hovered = response
            .hover_pos()
            .and_then(|pointer| self.node_at(rect, pointer));
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = CursorIcon::PointingHand;
            });
        }

        let pan = self.pan;
        let zoom = self.zoom;
        let Some(render_graph) = self.render_graph.as_ref() else {
            return;
        };

        for edge in &render_graph.edges {
            let start = world_to_screen(rect, pan, zoom, render_graph.nodes[edge.source].world_pos);
            let end = world_to_screen(rect, pan, zoom, render_graph.nodes[edge.target].world_pos);
            let stroke = Stroke::new((edge.display.width * zoom).max(0.5), edge.display.color);
            if edge.display.dashed {
                painter.extend(Shape::dashed_line(
                    &[start, end],
                    stroke,
                    4.0 * zoom,
                    4.0 * zoom,
                ));
            } else {
                painter.line_segment([start, end], stroke);
            }
        }

        for (index, node) in render_graph.nodes.iter().enumerate() {
            let position = world_to_screen(rect, pan, zoom, node.world_pos);
            let radius = node.display.radius * zoom;
            if !circle_visible(rect, position, radius + 24.0) {
                continue;
            }

            if node.display.pie.is_empty() {
                painter.circle_filled(position, radius, UNAFFILIATED_FILL);
            } else {
                for slice in &node.display.pie {
                    let points =
                        pie_slice_points(position, radius, slice.angle_start, slice.angle_end);
                    for pair in points[1..].windows(2) {
                        painter.add(Shape::convex_polygon(
                            vec![points[0], pair[0], pair[1]],
                            slice.color,
                            Stroke::NONE,
                        ));
                    }
                }
            }

            let selected = self.selected.contains(&node.id);
            let outline = node_outline(selected, hovered == Some(index));
            painter.circle_stroke(position, radius, outline);

            if pulse_active && self.search_matches.contains(&node.id) {
                let phase = ((now * 6.0).sin() * 0.5 + 0.5) as f32;
                painter.circle_stroke(
                    position,
                    radius + 3.0 + phase * 6.0,
                    Stroke::new(2.0, PULSE_COLOR),
                );
            }

            painter.text(
                position - vec2(0.0, radius + 4.0),
                Align2::CENTER_BOTTOM,
                &node.display.label,
                FontId::proportional(12.0),
                LABEL_COLOR,
            );
        }

        if response.clicked_by(PointerButton::Primary) {
            let hit = hovered.map(|index| render_graph.nodes[index].id);
            self.apply_click_selection(hit);
        }
    }
}

/// Selection outranks hover; everything else gets the resting outline.
fn node_outline(selected: bool, hovered: bool) -> Stroke {
    if selected {
        Stroke::new(2.0, Color32::WHITE)
    } else if hovered {
        Stroke::new(2.0, HOVER_OUTLINE)
    } else {
        Stroke::new(1.0, NODE_OUTLINE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hovering_brightens_the_outline_without_outranking_selection() {
        let resting = node_outline(false, false);
        let hovered = node_outline(false, true);
        let selected = node_outline(true, true);

        assert_eq!(hovered.color, HOVER_OUTLINE);
        assert!(hovered.width > resting.width);
        assert_eq!(selected.color, Color32::WHITE);
    }
}
