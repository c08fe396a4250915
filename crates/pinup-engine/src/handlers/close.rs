use crate::input::{InputEvent, Key, KeyState};
use crate::window::WindowControl;

use super::{ImageReplacer, InputHandler};

/// Requests window closure when `key` is pressed.
#[derive(Debug, Copy, Clone)]
pub struct CloseHandler {
    key: Key,
}

impl CloseHandler {
    pub fn new(key: Key) -> Self {
        Self { key }
    }
}

impl Default for CloseHandler {
    fn default() -> Self {
        Self::new(Key::Escape)
    }
}

impl InputHandler for CloseHandler {
    fn handle(
        &mut self,
        event: &InputEvent,
        window: &mut dyn WindowControl,
        _images: &mut dyn ImageReplacer,
    ) {
        let InputEvent::Key { key, state: KeyState::Pressed, .. } = event else { return };
        if *key != self.key || window.close_requested() {
            return;
        }
        log::info!("{key} pressed, closing");
        window.request_close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{FakeWindow, RecordingImages};

    fn press(key: Key) -> InputEvent {
        InputEvent::Key { key, state: KeyState::Pressed, repeat: false }
    }

    #[test]
    fn escape_requests_close_once() {
        let mut handler = CloseHandler::default();
        let mut window = FakeWindow::new((400, 400), (0, 0));
        let mut images = RecordingImages::default();

        handler.handle(&press(Key::Escape), &mut window, &mut images);
        handler.handle(&press(Key::Escape), &mut window, &mut images);

        assert!(window.close_requested);
        assert_eq!(window.close_calls, 1);
    }

    #[test]
    fn other_keys_and_releases_are_ignored() {
        let mut handler = CloseHandler::default();
        let mut window = FakeWindow::new((400, 400), (0, 0));
        let mut images = RecordingImages::default();

        handler.handle(&press(Key::Q), &mut window, &mut images);
        let release = InputEvent::Key { key: Key::Escape, state: KeyState::Released, repeat: false };
        handler.handle(&release, &mut window, &mut images);

        assert!(!window.close_requested);
    }

    #[test]
    fn configured_key_is_honoured() {
        let mut handler = CloseHandler::new(Key::Q);
        let mut window = FakeWindow::new((400, 400), (0, 0));
        let mut images = RecordingImages::default();

        handler.handle(&press(Key::Escape), &mut window, &mut images);
        assert!(!window.close_requested);
        handler.handle(&press(Key::Q), &mut window, &mut images);
        assert!(window.close_requested);
    }
}
