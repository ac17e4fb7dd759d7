use eframe::egui::{Pos2, Rect, Response, Ui};

use super::super::ViewModel;
use super::super::render_utils::{screen_to_world, zoom_toward};

impl ViewModel {
    /// Scroll zooms toward the pointer; the world point under the cursor
    /// stays fixed while the scale changes.
    pub(in crate::app) fn handle_graph_zoom(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        (self.pan, self.zoom) = zoom_toward(rect, pointer, self.pan, self.zoom, scroll);
    }

    /// Index of the node under a screen position. When radii overlap the
    /// nearest center wins.
    pub(in crate::app) fn node_at(&self, rect: Rect, pointer: Pos2) -> Option<usize> {
        let render_graph = self.render_graph.as_ref()?;
        let world = screen_to_world(rect, self.pan, self.zoom, pointer);

        render_graph
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let distance = (node.world_pos - world).length();
                (distance <= node.display.radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Clicking a node selects it; the two most recent selections stay.
    /// Clicking empty canvas clears the selection.
    pub(in crate::app) fn apply_click_selection(&mut self, hit: Option<u32>) {
        match hit {
            Some(id) => {
                self.selected.retain(|&selected| selected != id);
                self.selected.insert(0, id);
                self.selected.truncate(2);
            }
            None => self.selected.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_model() -> ViewModel {
        ViewModel::new(crate::people::SocialGraph::build(Vec::new(), Vec::new()))
    }

    #[test]
    fn selection_keeps_the_two_most_recent_clicks() {
        let mut model = empty_model();

        model.apply_click_selection(Some(1));
        model.apply_click_selection(Some(2));
        model.apply_click_selection(Some(3));
        assert_eq!(model.selected, vec![3, 2]);

        // Reclicking an already selected person moves it to the front.
        model.apply_click_selection(Some(2));
        assert_eq!(model.selected, vec![2, 3]);
    }

    #[test]
    fn empty_canvas_click_clears_the_selection() {
        let mut model = empty_model();
        model.apply_click_selection(Some(1));
        model.apply_click_selection(None);
        assert!(model.selected.is_empty());
    }
}
