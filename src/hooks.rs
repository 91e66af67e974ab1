//! Host notification hooks for chip lifecycle events.
//!
//! The composer keeps a line's chips and the host's attachment lists (the
//! properties and documents pinned to the draft) in sync by notifying the
//! host whenever a chip enters or leaves the line, through whichever path:
//! explicit insertion, backspace or forward delete, a span removal that
//! swallowed the chip, direct removal by index, or an undo/redo that
//! brought it back or took it away again.
//!
//! Hooks are one-way: fired exactly once per event, never queued, never
//! retried, and a hook must not reach back into the composer that fired it
//! (the composer is mid-mutation). All methods default to no-ops so a host
//! implements only what it tracks.
//!
//! The hook object is injected at construction and owned by the composer;
//! see [`Composer::with_hooks`](crate::composer::Composer::with_hooks).

use serde_json::Value;

/// Receiver for chip lifecycle notifications.
///
/// Property events carry what the host needs to maintain a property list:
/// the opaque payload on insert (the host's own record, handed back
/// verbatim) and the id on removal. Document events carry id and label on
/// insert, id on removal.
pub trait ChipHooks {
    /// A property chip entered the line.
    fn property_inserted(&mut self, payload: Option<&Value>) {
        let _ = payload;
    }

    /// A property chip left the line.
    fn property_removed(&mut self, id: &str) {
        let _ = id;
    }

    /// A document chip entered the line.
    fn document_inserted(&mut self, id: &str, label: &str) {
        let _ = (id, label);
    }

    /// A document chip left the line.
    fn document_removed(&mut self, id: &str) {
        let _ = id;
    }
}

/// A hook receiver that ignores every event. The default for composers
/// whose host tracks nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl ChipHooks for NoopHooks {}

// ---------------------------------------------------------------------------
// Test recorder
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod recorder {
    use super::{ChipHooks, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// One observed hook invocation.
    #[derive(Debug, Clone, PartialEq)]
    pub enum HookEvent {
        PropertyInserted(Option<Value>),
        PropertyRemoved(String),
        DocumentInserted(String, String),
        DocumentRemoved(String),
    }

    /// Shared log handle: the test keeps one clone, the composer owns the
    /// recorder.
    pub type HookLog = Rc<RefCell<Vec<HookEvent>>>;

    /// A [`ChipHooks`] implementation that appends every event to a shared
    /// log.
    #[derive(Debug)]
    pub struct Recorder {
        log: HookLog,
    }

    impl Recorder {
        pub fn new(log: HookLog) -> Self {
            Self { log }
        }
    }

    impl ChipHooks for Recorder {
        fn property_inserted(&mut self, payload: Option<&Value>) {
            self.log
                .borrow_mut()
                .push(HookEvent::PropertyInserted(payload.cloned()));
        }

        fn property_removed(&mut self, id: &str) {
            self.log
                .borrow_mut()
                .push(HookEvent::PropertyRemoved(id.to_owned()));
        }

        fn document_inserted(&mut self, id: &str, label: &str) {
            self.log
                .borrow_mut()
                .push(HookEvent::DocumentInserted(id.to_owned(), label.to_owned()));
        }

        fn document_removed(&mut self, id: &str) {
            self.log
                .borrow_mut()
                .push(HookEvent::DocumentRemoved(id.to_owned()));
        }
    }
}
