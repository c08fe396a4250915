use crate::input::InputEvent;
use crate::window::WindowControl;

use super::{ImageReplacer, InputHandler};

/// Swaps the displayed image for the first dropped file.
///
/// Failures are logged and otherwise ignored; the current image stays.
#[derive(Debug, Default, Copy, Clone)]
pub struct DropHandler;

impl InputHandler for DropHandler {
    fn handle(
        &mut self,
        event: &InputEvent,
        window: &mut dyn WindowControl,
        images: &mut dyn ImageReplacer,
    ) {
        let InputEvent::FilesDropped(paths) = event else { return };
        let Some(path) = paths.first() else { return };
        if paths.len() > 1 {
            log::debug!("{} files dropped, using {}", paths.len(), path.display());
        }

        match images.replace_image(path, window) {
            Ok(()) => log::info!("showing {}", path.display()),
            Err(err) => log::warn!("could not show {}: {err}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::handlers::testing::{FakeWindow, RecordingImages};

    #[test]
    fn only_first_path_is_used() {
        let mut window = FakeWindow::new((400, 400), (0, 0));
        let mut images = RecordingImages::default();
        let event = InputEvent::FilesDropped(vec![PathBuf::from("a.png"), PathBuf::from("b.png")]);

        DropHandler.handle(&event, &mut window, &mut images);

        assert_eq!(images.requested, vec![PathBuf::from("a.png")]);
    }

    #[test]
    fn failure_is_swallowed() {
        let mut window = FakeWindow::new((400, 400), (10, 10));
        let mut images = RecordingImages { fail: true, ..Default::default() };
        let event = InputEvent::FilesDropped(vec![PathBuf::from("broken.png")]);

        DropHandler.handle(&event, &mut window, &mut images);

        assert_eq!(images.requested.len(), 1);
        assert_eq!(window, FakeWindow::new((400, 400), (10, 10)));
    }

    #[test]
    fn empty_drop_does_nothing() {
        let mut window = FakeWindow::new((400, 400), (0, 0));
        let mut images = RecordingImages::default();

        DropHandler.handle(&InputEvent::FilesDropped(Vec::new()), &mut window, &mut images);
        DropHandler.handle(&InputEvent::PointerLeft, &mut window, &mut images);

        assert!(images.requested.is_empty());
    }
}
