use std::path::{Path, PathBuf};

use crate::widget::WidgetError;
use crate::window::WindowControl;

use super::ImageReplacer;

/// Extent reported by [`FakeWindow::new`].
pub(crate) const FAKE_MAX_EXTENT: i32 = 8192;

/// In-memory window that applies every request immediately.
///
/// `set_size` does not enforce `max_extent`, so callers that forget to
/// respect it show up in assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakeWindow {
    pub size: (i32, i32),
    pub position: (i32, i32),
    pub max_extent: i32,
    pub close_requested: bool,
    pub close_calls: u32,
}

impl Default for FakeWindow {
    fn default() -> Self {
        Self::new((0, 0), (0, 0))
    }
}

impl FakeWindow {
    pub(crate) fn new(size: (i32, i32), position: (i32, i32)) -> Self {
        Self {
            size,
            position,
            max_extent: FAKE_MAX_EXTENT,
            close_requested: false,
            close_calls: 0,
        }
    }

    pub(crate) fn center(&self) -> (i32, i32) {
        (self.position.0 + self.size.0 / 2, self.position.1 + self.size.1 / 2)
    }
}

impl WindowControl for FakeWindow {
    fn size(&self) -> (i32, i32) {
        self.size
    }

    fn set_size(&mut self, width: i32, height: i32) {
        self.size = (width.max(1), height.max(1));
    }

    fn position(&self) -> (i32, i32) {
        self.position
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    fn max_extent(&self) -> i32 {
        self.max_extent
    }

    fn request_close(&mut self) {
        self.close_calls += 1;
        self.close_requested = true;
    }

    fn close_requested(&self) -> bool {
        self.close_requested
    }
}

/// Records requested paths; fails every request when `fail` is set.
#[derive(Debug, Default)]
pub(crate) struct RecordingImages {
    pub requested: Vec<PathBuf>,
    pub fail: bool,
}

impl ImageReplacer for RecordingImages {
    fn replace_image(&mut self, path: &Path, _window: &mut dyn WindowControl) -> Result<(), WidgetError> {
        self.requested.push(path.to_path_buf());
        if self.fail {
            return Err(WidgetError::NoImage);
        }
        Ok(())
    }
}
