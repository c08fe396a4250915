use winit::window::Window;

/// Window operations the input handlers and the widget depend on.
///
/// Sizes and positions are in physical pixels. The runtime implements this
/// for the live window; tests substitute an in-memory window.
pub trait WindowControl {
    /// Current inner size as `(width, height)`.
    fn size(&self) -> (i32, i32);

    fn set_size(&mut self, width: i32, height: i32);

    /// Current outer position of the top-left corner.
    fn position(&self) -> (i32, i32);

    fn set_position(&mut self, x: i32, y: i32);

    /// Largest width or height the window may take; beyond it the GPU
    /// cannot present.
    fn max_extent(&self) -> i32;

    /// Asks the runtime to close the window after the current frame.
    fn request_close(&mut self);

    fn close_requested(&self) -> bool;
}

/// Scales `(width, height)` down, keeping its aspect ratio, until neither
/// side exceeds `max`. Sizes already within the limit are returned as-is.
pub fn fit_within(width: i32, height: i32, max: i32) -> (i32, i32) {
    let (width, height) = (width.max(1), height.max(1));
    let max = max.max(1);
    let longest = width.max(height);
    if longest <= max {
        return (width, height);
    }

    let shrink = f64::from(max) / f64::from(longest);
    let fit = |side: i32| ((f64::from(side) * shrink) as i32).clamp(1, max);
    (fit(width), fit(height))
}

/// Last known window geometry.
///
/// Size and position requests are asynchronous on most platforms, so the
/// runtime tracks what was last requested or reported instead of querying
/// the window on every read.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct WindowGeometry {
    pub size: (i32, i32),
    pub position: (i32, i32),
}

impl WindowGeometry {
    pub fn from_window(window: &Window) -> Self {
        let size = window.inner_size();
        // Wayland does not report window positions; treat the origin as unknown.
        let position = window
            .outer_position()
            .map(|p| (p.x, p.y))
            .unwrap_or_default();

        Self {
            size: (size.width as i32, size.height as i32),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_within_limit_are_untouched() {
        assert_eq!(fit_within(400, 300, 8192), (400, 300));
        assert_eq!(fit_within(8192, 1, 8192), (8192, 1));
    }

    #[test]
    fn oversized_sizes_shrink_keeping_aspect() {
        assert_eq!(fit_within(9000, 6000, 4500), (4500, 3000));
        assert_eq!(fit_within(100, 20_000, 8192), (40, 8192));
    }

    #[test]
    fn degenerate_sizes_stay_positive() {
        assert_eq!(fit_within(0, -5, 8192), (1, 1));
        assert_eq!(fit_within(16_384, 1, 8192), (8192, 1));
    }
}
