use crate::input::{InputEvent, MouseButton, MouseButtonState};
use crate::window::WindowControl;

use super::{ImageReplacer, InputHandler};

/// Moves the window while the left button is held.
///
/// Cursor positions are window-relative, so once the window follows the
/// cursor the origin stays valid for the whole drag.
#[derive(Debug, Default, Copy, Clone)]
pub struct DragHandler {
    dragging: bool,
    origin: Option<(f64, f64)>,
}

impl DragHandler {
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn origin(&self) -> Option<(f64, f64)> {
        self.origin
    }
}

impl InputHandler for DragHandler {
    fn handle(
        &mut self,
        event: &InputEvent,
        window: &mut dyn WindowControl,
        _images: &mut dyn ImageReplacer,
    ) {
        match event {
            InputEvent::PointerButton(ev) if ev.button == MouseButton::Left => match ev.state {
                MouseButtonState::Pressed => {
                    self.dragging = true;
                    self.origin = ev.position;
                }
                MouseButtonState::Released => {
                    self.dragging = false;
                    self.origin = None;
                }
            },
            InputEvent::PointerMoved(ev) if self.dragging => {
                let Some((ox, oy)) = self.origin else {
                    self.origin = Some((ev.x, ev.y));
                    return;
                };
                let (dx, dy) = ((ev.x - ox) as i32, (ev.y - oy) as i32);
                if dx == 0 && dy == 0 {
                    return;
                }
                let (x, y) = window.position();
                window.set_position(x + dx, y + dy);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{FakeWindow, RecordingImages};
    use crate::input::{PointerButtonEvent, PointerMoveEvent};

    fn button(state: MouseButtonState, position: Option<(f64, f64)>) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent { button: MouseButton::Left, state, position })
    }

    fn moved(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    #[test]
    fn drag_moves_window_by_cursor_delta() {
        let mut drag = DragHandler::default();
        let mut window = FakeWindow::new((400, 400), (100, 100));
        let mut images = RecordingImages::default();

        drag.handle(&button(MouseButtonState::Pressed, Some((10.0, 20.0))), &mut window, &mut images);
        drag.handle(&moved(35.0, 5.0), &mut window, &mut images);

        assert_eq!(window.position, (125, 85));
    }

    #[test]
    fn first_move_sets_origin_when_press_position_unknown() {
        let mut drag = DragHandler::default();
        let mut window = FakeWindow::new((400, 400), (0, 0));
        let mut images = RecordingImages::default();

        drag.handle(&button(MouseButtonState::Pressed, None), &mut window, &mut images);
        drag.handle(&moved(50.0, 50.0), &mut window, &mut images);
        assert_eq!(window.position, (0, 0));
        assert_eq!(drag.origin(), Some((50.0, 50.0)));

        drag.handle(&moved(60.0, 40.0), &mut window, &mut images);
        assert_eq!(window.position, (10, -10));
    }

    #[test]
    fn release_ends_drag_and_new_press_resets_origin() {
        let mut drag = DragHandler::default();
        let mut window = FakeWindow::new((400, 400), (0, 0));
        let mut images = RecordingImages::default();

        drag.handle(&button(MouseButtonState::Pressed, Some((0.0, 0.0))), &mut window, &mut images);
        drag.handle(&button(MouseButtonState::Released, Some((0.0, 0.0))), &mut window, &mut images);
        assert!(!drag.is_dragging());
        assert_eq!(drag.origin(), None);

        drag.handle(&moved(100.0, 100.0), &mut window, &mut images);
        assert_eq!(window.position, (0, 0));

        drag.handle(&button(MouseButtonState::Pressed, Some((100.0, 100.0))), &mut window, &mut images);
        drag.handle(&moved(103.0, 100.0), &mut window, &mut images);
        assert_eq!(window.position, (3, 0));
    }

    #[test]
    fn other_buttons_do_not_drag() {
        let mut drag = DragHandler::default();
        let mut window = FakeWindow::new((400, 400), (0, 0));
        let mut images = RecordingImages::default();
        let right = InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Right,
            state: MouseButtonState::Pressed,
            position: Some((0.0, 0.0)),
        });

        drag.handle(&right, &mut window, &mut images);
        drag.handle(&moved(30.0, 30.0), &mut window, &mut images);

        assert_eq!(window.position, (0, 0));
    }
}
