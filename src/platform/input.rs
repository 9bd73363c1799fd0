//! Input capability

/// Registered listener handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u32);

/// What to listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerKind {
    /// Any key pressed, page-wide
    KeyDown,
    KeyUp,
    /// Click on the element with this id
    Click(&'static str),
    /// Value change on the slider with this id
    Change(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// `key` is the DOM key name (`"ArrowLeft"`, `"w"`, ...)
    KeyDown { key: String },
    KeyUp { key: String },
    Click { element: &'static str },
    Change { element: &'static str, value: i32 },
}

impl ListenerKind {
    /// Does `event` belong to a listener of this kind?
    pub fn accepts(&self, event: &InputEvent) -> bool {
        match (self, event) {
            (ListenerKind::KeyDown, InputEvent::KeyDown { .. }) => true,
            (ListenerKind::KeyUp, InputEvent::KeyUp { .. }) => true,
            (ListenerKind::Click(a), InputEvent::Click { element }) => a == element,
            (ListenerKind::Change(a), InputEvent::Change { element, .. }) => a == element,
            _ => false,
        }
    }
}

pub trait InputSurface {
    fn listen(&mut self, kind: ListenerKind) -> ListenerId;
    /// Unknown ids are ignored
    fn unlisten(&mut self, id: ListenerId);
}

/// The listeners one game registered
#[derive(Debug, Default)]
pub struct ListenerSet {
    ids: Vec<ListenerId>,
}

impl ListenerSet {
    pub fn install(&mut self, input: &mut dyn InputSurface, kind: ListenerKind) -> ListenerId {
        let id = input.listen(kind);
        self.ids.push(id);
        id
    }

    pub fn owns(&self, id: ListenerId) -> bool {
        self.ids.contains(&id)
    }

    /// Deregister everything; safe to call again
    pub fn release_all(&mut self, input: &mut dyn InputSurface) {
        for id in self.ids.drain(..) {
            input.unlisten(id);
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessInput;

    #[test]
    fn test_accepts() {
        let click = InputEvent::Click { element: "go" };
        assert!(ListenerKind::Click("go").accepts(&click));
        assert!(!ListenerKind::Click("stop").accepts(&click));
        assert!(!ListenerKind::KeyDown.accepts(&click));
        assert!(ListenerKind::KeyUp.accepts(&InputEvent::KeyUp { key: "w".into() }));
    }

    #[test]
    fn test_release_all_twice() {
        let mut input = HeadlessInput::default();
        let mut set = ListenerSet::default();
        let key = set.install(&mut input, ListenerKind::KeyDown);
        set.install(&mut input, ListenerKind::Click("go"));
        assert!(set.owns(key));
        assert_eq!(set.len(), 2);
        assert_eq!(input.active(), 2);

        set.release_all(&mut input);
        set.release_all(&mut input);
        assert_eq!(input.active(), 0);
        assert_eq!(input.stale_unlistens, 0);
        assert!(set.is_empty());
        assert!(!set.owns(key));
    }
}
