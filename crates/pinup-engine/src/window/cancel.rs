use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use winit::event_loop::EventLoopProxy;

/// Cross-thread stop request observed by the runtime between frames.
///
/// Setting the token never interrupts a frame in flight; the loop checks it
/// at the next iteration boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// User event used only to wake an idle event loop.
#[derive(Debug, Copy, Clone)]
pub struct Wake;

/// Handle for waking the runtime from another thread (e.g. a signal handler).
#[derive(Clone)]
pub struct RuntimeWaker {
    pub(crate) proxy: EventLoopProxy<Wake>,
}

impl RuntimeWaker {
    /// Wakes the event loop so it re-checks its cancellation token.
    ///
    /// A no-op once the loop has exited.
    pub fn wake(&self) {
        let _ = self.proxy.send_event(Wake);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_clear() {
        assert!(!CancelToken::new().is_cancelled());
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let token = CancelToken::new();
        let observer = token.clone();

        std::thread::spawn(move || token.cancel())
            .join()
            .unwrap();

        assert!(observer.is_cancelled());
    }
}
