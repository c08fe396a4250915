use super::types::InputEvent;

/// Input events collected since the last frame.
///
/// The runtime fills this as window events arrive; the application drains it
/// once per frame, so handlers see events in delivery order and never run
/// concurrently with each other.
#[derive(Debug, Default)]
pub struct InputFrame {
    events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Appends an event.
    ///
    /// The platform reports one event per dropped file; consecutive drops are
    /// merged so a multi-file drop arrives as a single `FilesDropped`.
    pub fn push_event(&mut self, ev: InputEvent) {
        if let InputEvent::FilesDropped(paths) = &ev {
            if let Some(InputEvent::FilesDropped(pending)) = self.events.last_mut() {
                pending.extend(paths.iter().cloned());
                return;
            }
        }
        self.events.push(ev);
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Removes and returns all pending events in arrival order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, InputEvent> {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::input::{Key, KeyState};

    fn dropped(p: &str) -> InputEvent {
        InputEvent::FilesDropped(vec![PathBuf::from(p)])
    }

    #[test]
    fn consecutive_drops_are_merged() {
        let mut frame = InputFrame::default();
        frame.push_event(dropped("a.png"));
        frame.push_event(dropped("b.png"));

        assert_eq!(
            frame.events(),
            &[InputEvent::FilesDropped(vec![
                PathBuf::from("a.png"),
                PathBuf::from("b.png"),
            ])]
        );
    }

    #[test]
    fn drops_separated_by_other_events_stay_apart() {
        let mut frame = InputFrame::default();
        frame.push_event(dropped("a.png"));
        frame.push_event(InputEvent::PointerLeft);
        frame.push_event(dropped("b.png"));
        assert_eq!(frame.events().len(), 3);
    }

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut frame = InputFrame::default();
        frame.push_event(InputEvent::PointerLeft);
        frame.push_event(InputEvent::Key {
            key: Key::Escape,
            state: KeyState::Pressed,
            repeat: false,
        });

        let drained: Vec<_> = frame.drain().collect();
        assert_eq!(drained[0], InputEvent::PointerLeft);
        assert!(matches!(drained[1], InputEvent::Key { key: Key::Escape, .. }));
        assert!(frame.is_empty());
    }
}
