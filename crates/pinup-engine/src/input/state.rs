use super::frame::InputFrame;
use super::types::{InputEvent, PointerMoveEvent};

/// Current pointer state for the window.
///
/// Tracks the last pointer position so button presses can carry it.
/// Every applied event is also queued into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Pointer position in physical pixels.
    pub pointer_pos: Option<(f64, f64)>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and queues it in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::PointerButton(_)
            | InputEvent::Key { .. }
            | InputEvent::MouseWheel { .. }
            | InputEvent::FilesDropped(_) => {}
        }

        frame.push_event(ev);
    }
}
