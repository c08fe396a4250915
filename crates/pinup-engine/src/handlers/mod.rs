//! Input handlers that turn typed events into window operations.
//!
//! Handlers never touch the platform window directly; they go through
//! [`WindowControl`], and image swaps go through [`ImageReplacer`]. Both are
//! supplied per dispatch by the widget.

mod close;
mod drag;
mod drop;
mod scale;

#[cfg(test)]
pub(crate) mod testing;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::input::InputEvent;
use crate::widget::WidgetError;
use crate::window::WindowControl;

pub use close::CloseHandler;
pub use drag::DragHandler;
pub use drop::DropHandler;
pub use scale::{LINE_HEIGHT, LOCK_CEILING, MAX_SCALE, MIN_SCALE, SCROLL_DIVISOR, ScaleHandler};

/// Replaces the displayed image and resizes the window to it.
pub trait ImageReplacer {
    fn replace_image(&mut self, path: &Path, window: &mut dyn WindowControl) -> Result<(), WidgetError>;
}

pub trait InputHandler {
    fn handle(
        &mut self,
        event: &InputEvent,
        window: &mut dyn WindowControl,
        images: &mut dyn ImageReplacer,
    );
}

/// Notified after the displayed image changed and the window took its size.
pub trait ResetSubscriber {
    fn on_image_replaced(&mut self, window: &dyn WindowControl);
}

/// Lets one handler sit in the dispatch list and the subscriber list at once.
impl<H: InputHandler> InputHandler for Rc<RefCell<H>> {
    fn handle(
        &mut self,
        event: &InputEvent,
        window: &mut dyn WindowControl,
        images: &mut dyn ImageReplacer,
    ) {
        self.borrow_mut().handle(event, window, images);
    }
}
