//! Per-frame callback scheduling
//!
//! The controller asks for "the next frame" and the host loop fires it once
//! the frame interval has passed. Every request gets a fresh [`FrameId`], so a
//! callback fired for a cancelled or superseded request is recognized as
//! stale and ignored.

/// Handle for one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

/// Single-slot frame scheduler
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: Option<FrameId>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a callback for the next frame, replacing any pending one
    pub fn request(&mut self) -> FrameId {
        self.next_id = self.next_id.wrapping_add(1);
        let id = FrameId(self.next_id);
        self.pending = Some(id);
        id
    }

    /// Drop the pending callback, if any
    pub fn cancel(&mut self) -> Option<FrameId> {
        self.pending.take()
    }

    /// The callback the host should fire next
    pub fn pending(&self) -> Option<FrameId> {
        self.pending
    }

    /// Consume `id` if it is the pending callback.
    ///
    /// Returns false for stale ids, which must not produce output.
    pub fn fire(&mut self, id: FrameId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_once() {
        let mut frames = FrameScheduler::new();
        let id = frames.request();
        assert_eq!(frames.pending(), Some(id));
        assert!(frames.fire(id));
        assert!(!frames.fire(id));
        assert_eq!(frames.pending(), None);
    }

    #[test]
    fn test_cancelled_frame_is_stale() {
        let mut frames = FrameScheduler::new();
        let id = frames.request();
        assert_eq!(frames.cancel(), Some(id));
        assert!(!frames.fire(id));
    }

    #[test]
    fn test_new_request_supersedes_old() {
        let mut frames = FrameScheduler::new();
        let old = frames.request();
        let new = frames.request();
        assert_ne!(old, new);
        assert!(!frames.fire(old));
        assert!(frames.fire(new));
    }
}
