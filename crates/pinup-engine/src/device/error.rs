/// What the frame loop should do after failing to acquire a surface texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was reconfigured in place; draw again next frame.
    Reconfigured,
    /// Nothing to fix; drop this frame and keep running.
    SkipFrame,
    /// The device cannot recover (out of memory); the widget closes.
    Fatal,
}

impl SurfaceErrorAction {
    pub fn is_fatal(self) -> bool {
        self == SurfaceErrorAction::Fatal
    }
}
