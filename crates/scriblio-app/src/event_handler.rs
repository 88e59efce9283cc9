//! Event handling for tool interactions.
//!
//! Translates pointer presses/moves/releases into canvas operations for the
//! active tool. Exactly one gesture handler set is live at a time; switching
//! tools goes through `Canvas::set_tool`, which resolves any gesture first.

use kurbo::{Point, Vec2};
use scriblio_core::canvas::Canvas;
use scriblio_core::input::InputState;
use scriblio_core::selection::{
    apply_manipulation, apply_rotation, hit_test_handles, HandleKind, ManipulationState,
    MultiMoveState, HANDLE_HIT_TOLERANCE,
};
use scriblio_core::shapes::{Shape, ShapeId};
use scriblio_core::tools::ToolKind;

/// Viewport pan in progress (select tool, empty-space drag).
///
/// Tracks the last pointer position in screen coordinates; each move applies
/// the delta from the previous one and the tracker resets on release.
#[derive(Debug, Clone, Copy)]
struct PanState {
    last: Point,
}

/// What the pointer is over, for cursor feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    /// Empty canvas.
    None,
    /// A shape body (move).
    Shape,
    /// A manipulation handle (resize/rotate).
    Handle,
}

/// Handles high-level pointer events and translates them to canvas operations.
pub struct EventHandler {
    /// Current manipulation state (dragging a handle on a single shape).
    manipulation: Option<ManipulationState>,
    /// Current multi-move state (moving the selection).
    multi_move: Option<MultiMoveState>,
    /// Current viewport pan.
    pan: Option<PanState>,
    /// Shape ID being edited (for text editing).
    pub editing_text: Option<ShapeId>,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new() -> Self {
        Self {
            manipulation: None,
            multi_move: None,
            pan: None,
            editing_text: None,
        }
    }

    /// Check if a select-mode operation is in progress.
    pub fn is_manipulating(&self) -> bool {
        self.manipulation.is_some() || self.multi_move.is_some()
    }

    /// Check if the viewport is being panned.
    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    /// Cancel any ongoing operation, restoring manipulated shapes.
    pub fn cancel(&mut self, canvas: &mut Canvas) {
        if let Some(manip) = self.manipulation.take() {
            if let Some(shape) = canvas.document.get_shape_mut(manip.shape_id) {
                *shape = manip.original_shape;
            }
            canvas.document.notify_modified(manip.shape_id);
        }
        if let Some(mm) = self.multi_move.take() {
            for (id, original) in mm.original_shapes {
                if let Some(shape) = canvas.document.get_shape_mut(id) {
                    *shape = original;
                }
                canvas.document.notify_modified(id);
            }
        }
        self.pan = None;
        canvas
            .tool_manager
            .cancel(&mut canvas.document);
    }

    /// What the pointer is hovering, for cursor selection.
    pub fn hover_target(&self, canvas: &Canvas, world_point: Point) -> HoverTarget {
        if canvas.tool_manager.current_tool != ToolKind::Select {
            return HoverTarget::None;
        }

        let handle_tolerance = HANDLE_HIT_TOLERANCE / canvas.camera.zoom;
        for &shape_id in &canvas.selection {
            if let Some(shape) = canvas.document.get_shape(shape_id) {
                if hit_test_handles(shape, world_point, handle_tolerance, canvas.camera.zoom)
                    .is_some()
                {
                    return HoverTarget::Handle;
                }
            }
        }

        let hits = canvas
            .document
            .shapes_at_point(world_point, 5.0 / canvas.camera.zoom);
        if hits.is_empty() {
            HoverTarget::None
        } else {
            HoverTarget::Shape
        }
    }

    /// Enter text editing mode for a shape.
    pub fn enter_text_edit(&mut self, canvas: &mut Canvas, id: ShapeId) {
        self.editing_text = Some(id);
        canvas.select(id);
    }

    /// Exit text editing mode, committing `final_text` to the shape.
    ///
    /// An empty (or whitespace-only) result deletes the shape.
    pub fn exit_text_edit(&mut self, canvas: &mut Canvas, final_text: Option<&str>) {
        let Some(id) = self.editing_text.take() else {
            return;
        };

        let Some(Shape::Text(text)) = canvas.document.get_shape(id) else {
            return;
        };

        let new_content = final_text.unwrap_or(&text.content).to_string();
        if new_content.trim().is_empty() {
            canvas.remove_shape(id);
            return;
        }

        if new_content != text.content {
            canvas.document.push_undo();
            if let Some(Shape::Text(text)) = canvas.document.get_shape_mut(id) {
                text.content = new_content;
                text.invalidate_cache();
            }
            canvas.document.notify_modified(id);
        }
    }

    /// Check if currently editing text.
    pub fn is_editing_text(&self) -> bool {
        self.editing_text.is_some()
    }

    /// Handle a press event.
    ///
    /// `world_point` is the pointer in document coordinates, `screen_point`
    /// in viewport coordinates (used by the pan tracker).
    ///
    /// Returns the id of a text shape whose editing should begin, if any;
    /// the app owns the editor state.
    pub fn handle_press(
        &mut self,
        canvas: &mut Canvas,
        world_point: Point,
        screen_point: Point,
        input: &InputState,
    ) -> Option<ShapeId> {
        // A click outside the edited text commits it; the app already pushed
        // the editor content into the shape, so only the exit bookkeeping
        // happens here.
        if self.editing_text.is_some() {
            let hits = canvas
                .document
                .shapes_at_point(world_point, 5.0 / canvas.camera.zoom);
            let clicked_on_editing = hits
                .first()
                .map(|&id| Some(id) == self.editing_text)
                .unwrap_or(false);
            if clicked_on_editing {
                return None;
            }
            self.exit_text_edit(canvas, None);
        }

        match canvas.tool_manager.current_tool {
            ToolKind::Select => {
                // Double-click on a text shape re-enters editing
                if input.is_double_click() {
                    let hits = canvas
                        .document
                        .shapes_at_point(world_point, 5.0 / canvas.camera.zoom);
                    if let Some(&id) = hits.first() {
                        if let Some(Shape::Text(_)) = canvas.document.get_shape(id) {
                            self.enter_text_edit(canvas, id);
                            return Some(id);
                        }
                    }
                }

                // Handle hit on a selected shape starts a resize/rotate
                let handle_tolerance = HANDLE_HIT_TOLERANCE / canvas.camera.zoom;
                for &shape_id in &canvas.selection {
                    if let Some(shape) = canvas.document.get_shape(shape_id) {
                        if let Some(handle_kind) = hit_test_handles(
                            shape,
                            world_point,
                            handle_tolerance,
                            canvas.camera.zoom,
                        ) {
                            self.manipulation = Some(ManipulationState::new(
                                shape_id,
                                Some(handle_kind),
                                world_point,
                                shape.clone(),
                            ));
                            return None;
                        }
                    }
                }

                // Shape hit selects and starts a move
                let hits = canvas
                    .document
                    .shapes_at_point(world_point, 5.0 / canvas.camera.zoom);
                if let Some(&id) = hits.first() {
                    if input.shift() {
                        // Add to/toggle selection
                        if canvas.is_selected(id) {
                            canvas.selection.retain(|&s| s != id);
                        } else {
                            canvas.add_to_selection(id);
                        }
                    } else {
                        if !canvas.is_selected(id) {
                            canvas.select(id);
                        }

                        let mut original_shapes = std::collections::HashMap::new();
                        for &shape_id in &canvas.selection {
                            if let Some(shape) = canvas.document.get_shape(shape_id) {
                                original_shapes.insert(shape_id, shape.clone());
                            }
                        }
                        if !original_shapes.is_empty() {
                            self.multi_move =
                                Some(MultiMoveState::new(world_point, original_shapes));
                        }
                    }
                } else {
                    // Empty space: deselect and pan the viewport
                    canvas.clear_selection();
                    self.pan = Some(PanState { last: screen_point });
                }
                None
            }
            ToolKind::Text => {
                let id = canvas
                    .tool_manager
                    .begin(world_point, &mut canvas.document);
                if let Some(id) = id {
                    self.enter_text_edit(canvas, id);
                    // Revert to select immediately so a second click cannot
                    // spawn another text shape
                    canvas.set_tool(ToolKind::Select);
                }
                id
            }
            ToolKind::Draw | ToolKind::Rectangle | ToolKind::Circle => {
                canvas
                    .tool_manager
                    .begin(world_point, &mut canvas.document);
                None
            }
        }
    }

    /// Handle a move event.
    pub fn handle_move(
        &mut self,
        canvas: &mut Canvas,
        world_point: Point,
        screen_point: Point,
        input: &InputState,
    ) {
        if let Some(pan) = self.pan.as_mut() {
            let delta = Vec2::new(screen_point.x - pan.last.x, screen_point.y - pan.last.y);
            pan.last = screen_point;
            canvas.camera.pan(delta);
            return;
        }

        if let Some(manip) = self.manipulation.as_mut() {
            manip.current_point = world_point;

            if manip.handle == Some(HandleKind::Rotate) {
                if let Some(shape) = canvas.document.get_shape_mut(manip.shape_id) {
                    apply_rotation(shape, world_point, input.shift());
                }
            } else {
                let updated = apply_manipulation(
                    &manip.original_shape,
                    manip.handle,
                    manip.delta(),
                    input.shift(),
                );
                if let Some(shape) = canvas.document.get_shape_mut(manip.shape_id) {
                    *shape = updated;
                }
            }
            canvas.document.notify_modified(manip.shape_id);
            return;
        }

        if let Some(mm) = self.multi_move.as_mut() {
            mm.current_point = world_point;
            let delta = mm.delta();
            for (&id, original) in &mm.original_shapes {
                let mut moved = original.clone();
                moved.transform(kurbo::Affine::translate(delta));
                if let Some(shape) = canvas.document.get_shape_mut(id) {
                    *shape = moved;
                }
                canvas.document.notify_modified(id);
            }
            return;
        }

        // Drawing tools: a move with no active gesture is a no-op inside
        canvas.tool_manager.update(world_point, &mut canvas.document);
    }

    /// Handle a release event.
    pub fn handle_release(&mut self, canvas: &mut Canvas, world_point: Point, input: &InputState) {
        if self.pan.take().is_some() {
            return;
        }

        // Finalize a single-shape manipulation with one undo entry
        if let Some(mut manip) = self.manipulation.take() {
            manip.current_point = world_point;

            if manip.handle == Some(HandleKind::Rotate) {
                let Some(shape) = canvas.document.get_shape(manip.shape_id) else {
                    return;
                };
                let final_rotation = shape.rotation();
                if (final_rotation - manip.original_shape.rotation()).abs() > 0.001 {
                    if let Some(shape) = canvas.document.get_shape_mut(manip.shape_id) {
                        *shape = manip.original_shape.clone();
                    }
                    canvas.document.push_undo();
                    if let Some(shape) = canvas.document.get_shape_mut(manip.shape_id) {
                        shape.set_rotation(final_rotation);
                    }
                    canvas.document.notify_modified(manip.shape_id);
                }
                return;
            }

            let delta = manip.delta();
            if delta.x.abs() > 0.1 || delta.y.abs() > 0.1 {
                // Restore the original, push undo, then apply the final change
                if let Some(shape) = canvas.document.get_shape_mut(manip.shape_id) {
                    *shape = manip.original_shape.clone();
                }
                canvas.document.push_undo();
                let new_shape = apply_manipulation(
                    &manip.original_shape,
                    manip.handle,
                    delta,
                    input.shift(),
                );
                if let Some(shape) = canvas.document.get_shape_mut(manip.shape_id) {
                    *shape = new_shape;
                }
                canvas.document.notify_modified(manip.shape_id);
            }
            return;
        }

        // Finalize a selection move with one undo entry
        if let Some(mut mm) = self.multi_move.take() {
            mm.current_point = world_point;
            let delta = mm.delta();

            if delta.x.abs() > 0.1 || delta.y.abs() > 0.1 {
                for (&id, original) in &mm.original_shapes {
                    if let Some(shape) = canvas.document.get_shape_mut(id) {
                        *shape = original.clone();
                    }
                }
                canvas.document.push_undo();
                let translation = kurbo::Affine::translate(delta);
                for (&id, original) in &mm.original_shapes {
                    let mut moved = original.clone();
                    moved.transform(translation);
                    if let Some(shape) = canvas.document.get_shape_mut(id) {
                        *shape = moved;
                    }
                    canvas.document.notify_modified(id);
                }
            }
            return;
        }

        canvas.tool_manager.end(&mut canvas.document);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriblio_core::input::{MouseButton, PointerEvent};
    use scriblio_core::shapes::{Rectangle, SerializableColor, ShapeTrait, Text};

    fn press(input: &mut InputState, x: f64, y: f64) {
        input.handle_pointer_event(PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        });
    }

    fn release(input: &mut InputState, x: f64, y: f64) {
        input.handle_pointer_event(PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        });
    }

    fn filled_rect(x: f64, y: f64, w: f64, h: f64) -> Rectangle {
        let mut rect = Rectangle::new(Point::new(x, y), w, h);
        rect.style.fill_color = Some(SerializableColor::black());
        rect
    }

    #[test]
    fn test_rectangle_tool_gesture() {
        let mut canvas = Canvas::new();
        let mut handler = EventHandler::new();
        let mut input = InputState::new();
        canvas.set_tool(ToolKind::Rectangle);

        press(&mut input, 10.0, 10.0);
        handler.handle_press(&mut canvas, Point::new(10.0, 10.0), Point::new(10.0, 10.0), &input);
        handler.handle_move(&mut canvas, Point::new(110.0, 60.0), Point::new(110.0, 60.0), &input);
        release(&mut input, 110.0, 60.0);
        handler.handle_release(&mut canvas, Point::new(110.0, 60.0), &input);

        assert_eq!(canvas.document.len(), 1);
        let shape = canvas.document.shapes_ordered().next().unwrap();
        let bounds = shape.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.width() - 100.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 50.0).abs() < f64::EPSILON);
        assert!(!canvas.tool_manager.is_active());
    }

    #[test]
    fn test_text_tool_reverts_to_select() {
        let mut canvas = Canvas::new();
        let mut handler = EventHandler::new();
        let mut input = InputState::new();
        canvas.set_tool(ToolKind::Text);

        press(&mut input, 30.0, 40.0);
        let id = handler.handle_press(
            &mut canvas,
            Point::new(30.0, 40.0),
            Point::new(30.0, 40.0),
            &input,
        );

        assert!(id.is_some());
        assert_eq!(canvas.tool_manager.current_tool, ToolKind::Select);
        assert!(handler.is_editing_text());
        assert_eq!(canvas.document.len(), 1);
    }

    #[test]
    fn test_select_empty_space_pans() {
        let mut canvas = Canvas::new();
        let mut handler = EventHandler::new();
        let mut input = InputState::new();

        press(&mut input, 100.0, 100.0);
        handler.handle_press(
            &mut canvas,
            Point::new(100.0, 100.0),
            Point::new(100.0, 100.0),
            &input,
        );
        assert!(handler.is_panning());

        handler.handle_move(
            &mut canvas,
            Point::new(130.0, 90.0),
            Point::new(130.0, 90.0),
            &input,
        );
        assert!((canvas.camera.offset.x - 30.0).abs() < f64::EPSILON);
        assert!((canvas.camera.offset.y + 10.0).abs() < f64::EPSILON);

        // Delta tracker advances with each move
        handler.handle_move(
            &mut canvas,
            Point::new(131.0, 90.0),
            Point::new(131.0, 90.0),
            &input,
        );
        assert!((canvas.camera.offset.x - 31.0).abs() < f64::EPSILON);

        release(&mut input, 131.0, 90.0);
        handler.handle_release(&mut canvas, Point::new(131.0, 90.0), &input);
        assert!(!handler.is_panning());
    }

    #[test]
    fn test_select_and_move_shape() {
        let mut canvas = Canvas::new();
        let mut handler = EventHandler::new();
        let mut input = InputState::new();

        let rect = filled_rect(0.0, 0.0, 50.0, 50.0);
        let id = rect.id();
        canvas.document.add_shape(Shape::Rectangle(rect));

        press(&mut input, 25.0, 25.0);
        handler.handle_press(
            &mut canvas,
            Point::new(25.0, 25.0),
            Point::new(25.0, 25.0),
            &input,
        );
        assert!(canvas.is_selected(id));
        assert!(handler.is_manipulating());

        handler.handle_move(
            &mut canvas,
            Point::new(45.0, 35.0),
            Point::new(45.0, 35.0),
            &input,
        );
        release(&mut input, 45.0, 35.0);
        handler.handle_release(&mut canvas, Point::new(45.0, 35.0), &input);

        let bounds = canvas.document.get_shape(id).unwrap().bounds();
        assert!((bounds.x0 - 20.0).abs() < 1e-9);
        assert!((bounds.y0 - 10.0).abs() < 1e-9);
        // Move is undoable in one step
        assert!(canvas.document.undo());
        let bounds = canvas.document.get_shape(id).unwrap().bounds();
        assert!(bounds.x0.abs() < 1e-9);
    }

    #[test]
    fn test_resize_via_corner_handle() {
        let mut canvas = Canvas::new();
        let mut handler = EventHandler::new();
        let mut input = InputState::new();

        let rect = filled_rect(0.0, 0.0, 50.0, 50.0);
        let id = rect.id();
        canvas.document.add_shape(Shape::Rectangle(rect));
        canvas.select(id);

        // Press on the bottom-right corner handle
        press(&mut input, 50.0, 50.0);
        handler.handle_press(
            &mut canvas,
            Point::new(50.0, 50.0),
            Point::new(50.0, 50.0),
            &input,
        );
        assert!(handler.is_manipulating());

        handler.handle_move(
            &mut canvas,
            Point::new(100.0, 100.0),
            Point::new(100.0, 100.0),
            &input,
        );
        release(&mut input, 100.0, 100.0);
        handler.handle_release(&mut canvas, Point::new(100.0, 100.0), &input);

        let bounds = canvas.document.get_shape(id).unwrap().bounds();
        assert!((bounds.width() - 100.0).abs() < 1e-9);
        assert!((bounds.height() - 100.0).abs() < 1e-9);
        assert!(bounds.x0.abs() < 1e-9);
    }

    #[test]
    fn test_cancel_restores_original() {
        let mut canvas = Canvas::new();
        let mut handler = EventHandler::new();
        let mut input = InputState::new();

        let rect = filled_rect(0.0, 0.0, 50.0, 50.0);
        let id = rect.id();
        canvas.document.add_shape(Shape::Rectangle(rect));

        press(&mut input, 25.0, 25.0);
        handler.handle_press(
            &mut canvas,
            Point::new(25.0, 25.0),
            Point::new(25.0, 25.0),
            &input,
        );
        handler.handle_move(
            &mut canvas,
            Point::new(80.0, 80.0),
            Point::new(80.0, 80.0),
            &input,
        );
        handler.cancel(&mut canvas);

        let bounds = canvas.document.get_shape(id).unwrap().bounds();
        assert!(bounds.x0.abs() < 1e-9);
        assert!(!handler.is_manipulating());
    }

    #[test]
    fn test_exit_text_edit_deletes_empty() {
        let mut canvas = Canvas::new();
        let mut handler = EventHandler::new();

        let text = Text::new(Point::new(0.0, 0.0), "hi".to_string());
        let id = text.id();
        canvas.document.add_shape(Shape::Text(text));

        handler.enter_text_edit(&mut canvas, id);
        handler.exit_text_edit(&mut canvas, Some("   "));

        assert!(canvas.document.is_empty());
        assert!(!handler.is_editing_text());
    }

    #[test]
    fn test_exit_text_edit_commits_content() {
        let mut canvas = Canvas::new();
        let mut handler = EventHandler::new();

        let text = Text::new(Point::new(0.0, 0.0), "old".to_string());
        let id = text.id();
        canvas.document.add_shape(Shape::Text(text));

        handler.enter_text_edit(&mut canvas, id);
        handler.exit_text_edit(&mut canvas, Some("new words"));

        let Some(Shape::Text(text)) = canvas.document.get_shape(id) else {
            panic!("expected text");
        };
        assert_eq!(text.content, "new words");
        assert!(canvas.document.can_undo());
    }

    #[test]
    fn test_shift_click_toggles_selection() {
        let mut canvas = Canvas::new();
        let mut handler = EventHandler::new();
        let mut input = InputState::new();

        let a = filled_rect(0.0, 0.0, 40.0, 40.0);
        let b = filled_rect(100.0, 0.0, 40.0, 40.0);
        let (ia, ib) = (a.id(), b.id());
        canvas.document.add_shape(Shape::Rectangle(a));
        canvas.document.add_shape(Shape::Rectangle(b));

        press(&mut input, 20.0, 20.0);
        handler.handle_press(&mut canvas, Point::new(20.0, 20.0), Point::new(20.0, 20.0), &input);
        release(&mut input, 20.0, 20.0);
        handler.handle_release(&mut canvas, Point::new(20.0, 20.0), &input);

        input.set_modifiers(scriblio_core::input::Modifiers {
            shift: true,
            ..Default::default()
        });
        input.begin_frame();
        press(&mut input, 120.0, 20.0);
        handler.handle_press(
            &mut canvas,
            Point::new(120.0, 20.0),
            Point::new(120.0, 20.0),
            &input,
        );

        assert!(canvas.is_selected(ia));
        assert!(canvas.is_selected(ib));
    }
}
