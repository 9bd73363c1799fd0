//! Clock and scheduler capability
//!
//! Handles are plain ids; the slots below are how games hold them. A slot cancels by
//! taking its handle, so cancelling twice never reaches the scheduler twice.

/// Interval or timeout handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u32);

/// Display-frame request handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(pub u32);

pub trait Scheduler {
    /// Fire `Timer(id)` every `ms` until cancelled
    fn start_interval(&mut self, ms: u32) -> TimerId;
    /// Fire `Timer(id)` once after `ms`
    fn start_timeout(&mut self, ms: u32) -> TimerId;
    /// Cancel an interval or a timeout. Unknown or already-fired ids are ignored.
    fn cancel_timer(&mut self, id: TimerId);
    /// Fire `Frame(id)` once at the next display refresh
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, id: FrameId);
}

/// At most one live timer
#[derive(Debug, Default)]
pub struct TimerSlot(Option<TimerId>);

impl TimerSlot {
    /// Replace whatever was running with a repeating timer
    pub fn start_interval(&mut self, scheduler: &mut dyn Scheduler, ms: u32) {
        self.cancel(scheduler);
        self.0 = Some(scheduler.start_interval(ms));
    }

    /// Replace whatever was running with a one-shot timer
    pub fn start_timeout(&mut self, scheduler: &mut dyn Scheduler, ms: u32) {
        self.cancel(scheduler);
        self.0 = Some(scheduler.start_timeout(ms));
    }

    pub fn cancel(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(id) = self.0.take() {
            scheduler.cancel_timer(id);
        }
    }

    /// A one-shot owned by this slot fired; forget it without cancelling.
    /// Returns false for ids this slot doesn't hold.
    pub fn complete(&mut self, id: TimerId) -> bool {
        if self.owns(id) {
            self.0 = None;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn owns(&self, id: TimerId) -> bool {
        self.0 == Some(id)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }
}

/// At most one outstanding frame request
#[derive(Debug, Default)]
pub struct FrameSlot(Option<FrameId>);

impl FrameSlot {
    pub fn request(&mut self, scheduler: &mut dyn Scheduler) {
        self.cancel(scheduler);
        self.0 = Some(scheduler.request_frame());
    }

    pub fn cancel(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(id) = self.0.take() {
            scheduler.cancel_frame(id);
        }
    }

    /// The requested frame arrived. Returns false for frames this slot didn't request.
    pub fn complete(&mut self, id: FrameId) -> bool {
        if self.0 == Some(id) {
            self.0 = None;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessScheduler;

    #[test]
    fn test_slot_cancel_is_idempotent() {
        let mut scheduler = HeadlessScheduler::default();
        let mut slot = TimerSlot::default();
        slot.start_interval(&mut scheduler, 100);
        assert_eq!(scheduler.active_timers(), 1);

        slot.cancel(&mut scheduler);
        slot.cancel(&mut scheduler);
        assert_eq!(scheduler.active_timers(), 0);
        assert_eq!(scheduler.cancelled, 1);
        assert_eq!(scheduler.stale_cancels, 0);
    }

    #[test]
    fn test_restart_replaces_previous_timer() {
        let mut scheduler = HeadlessScheduler::default();
        let mut slot = TimerSlot::default();
        slot.start_interval(&mut scheduler, 1000);
        slot.start_interval(&mut scheduler, 950);
        assert_eq!(scheduler.active_timers(), 1);
        assert_eq!(scheduler.interval_periods(), vec![950]);
    }

    #[test]
    fn test_complete_only_owned_ids() {
        let mut scheduler = HeadlessScheduler::default();
        let mut slot = TimerSlot::default();
        slot.start_timeout(&mut scheduler, 2000);
        assert!(!slot.complete(TimerId(999)));
        assert!(slot.is_active());

        let fired = scheduler.fire_timeouts();
        assert_eq!(fired.len(), 1);
        let crate::platform::HostEvent::Timer(id) = fired[0] else {
            panic!("expected a timer event");
        };
        assert!(slot.complete(id));
        assert!(!slot.is_active());
    }

    #[test]
    fn test_frame_slot() {
        let mut scheduler = HeadlessScheduler::default();
        let mut slot = FrameSlot::default();
        slot.request(&mut scheduler);
        slot.request(&mut scheduler);
        assert_eq!(scheduler.pending_frames(), 1);
        slot.cancel(&mut scheduler);
        assert_eq!(scheduler.pending_frames(), 0);
        assert!(!slot.is_active());
    }
}
