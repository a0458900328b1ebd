use crate::api::ApiClient;
use crate::models::DisplayState;
use gloo_timers::callback::Interval;
use leptos::logging::error;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PollTicket(u64);

/// Single-slot request pipeline for status polls.
///
/// At most one poll is outstanding. Timer ticks that arrive while a request is
/// in flight are dropped rather than queued, so responses can never be applied
/// out of order. An explicit refresh during a poll is remembered instead and
/// issued once that poll finishes, since the in-flight request may predate the
/// change the caller wants to see. A `reset` (loop restart) orphans the
/// in-flight ticket; its response is discarded when it arrives.
#[derive(Clone, Debug, Default)]
pub(crate) struct PollSlot {
    next_id: u64,
    in_flight: Option<u64>,
    refresh_requested: bool,
}

impl PollSlot {
    pub fn try_begin(&mut self) -> Option<PollTicket> {
        if self.in_flight.is_some() {
            return None;
        }
        self.next_id += 1;
        self.in_flight = Some(self.next_id);
        Some(PollTicket(self.next_id))
    }

    /// Like `try_begin`, but a busy slot schedules a follow-up poll.
    pub fn request_refresh(&mut self) -> Option<PollTicket> {
        let ticket = self.try_begin();
        if ticket.is_none() {
            self.refresh_requested = true;
        }
        ticket
    }

    /// Close `ticket`; returns whether its response should be applied.
    pub fn finish(&mut self, ticket: PollTicket) -> bool {
        if self.in_flight == Some(ticket.0) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// The refresh deferred while the slot was busy, once it is idle again.
    pub fn take_follow_up(&mut self) -> Option<PollTicket> {
        if !self.refresh_requested || self.in_flight.is_some() {
            return None;
        }
        self.refresh_requested = false;
        self.try_begin()
    }

    pub fn reset(&mut self) {
        self.in_flight = None;
        self.refresh_requested = false;
    }

    #[cfg(test)]
    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// Timer-driven poller that keeps `display` in step with `GET /status`.
///
/// Owns its timer exclusively; `start` always clears the previous one, so at
/// most one timer is armed.
#[derive(Clone, Copy)]
pub(crate) struct SyncLoop {
    api_client: RwSignal<ApiClient>,
    pub display: RwSignal<Option<DisplayState>>,
    pub last_error: RwSignal<Option<String>>,
    slot: StoredValue<PollSlot>,
    timer: StoredValue<Option<Interval>, LocalStorage>,
    interval_ms: u32,
}

impl SyncLoop {
    pub fn new(api_client: RwSignal<ApiClient>, interval_ms: u32) -> Self {
        Self {
            api_client,
            display: RwSignal::new(None),
            last_error: RwSignal::new(None),
            slot: StoredValue::new(PollSlot::default()),
            timer: StoredValue::new_local(None),
            interval_ms: interval_ms.max(1000),
        }
    }

    pub fn start(&self) {
        self.stop();
        self.slot.update_value(PollSlot::reset);
        self.tick();

        let s = *self;
        let handle = Interval::new(self.interval_ms, move || s.tick());
        self.timer.set_value(Some(handle));
    }

    /// Dropping the handle cancels the browser interval.
    pub fn stop(&self) {
        self.timer.set_value(None);
    }

    /// Poll now. While a poll is outstanding, one more is issued after it.
    pub fn refresh_now(&self) {
        let mut ticket = None;
        self.slot.update_value(|slot| ticket = slot.request_refresh());
        if let Some(ticket) = ticket {
            self.poll(ticket);
        }
    }

    fn tick(&self) {
        let mut ticket = None;
        self.slot.update_value(|slot| ticket = slot.try_begin());
        if let Some(ticket) = ticket {
            self.poll(ticket);
        }
    }

    fn poll(&self, ticket: PollTicket) {
        let api_client = self.api_client.get_untracked();
        let s = *self;
        spawn_local(async move {
            let res = api_client.get_status().await;

            let mut current = false;
            s.slot.update_value(|slot| current = slot.finish(ticket));
            // Orphaned by a restart: neither its data nor its failure is news.
            if !current {
                return;
            }

            match res {
                Ok(state) => s.apply(state),
                Err(e) => {
                    error!("status poll failed: {e}");
                    s.last_error.set(Some(e.to_string()));
                }
            }

            let mut follow_up = None;
            s.slot.update_value(|slot| follow_up = slot.take_follow_up());
            if let Some(next) = follow_up {
                s.poll(next);
            }
        });
    }

    fn apply(&self, state: DisplayState) {
        if let Some(class) = state.body_class() {
            if let Some(body) = document().body() {
                body.set_class_name(&class);
            }
        }
        self.last_error.set(None);
        self.display.set(Some(state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_while_fetching_is_dropped() {
        let mut slot = PollSlot::default();
        let first = slot.try_begin().expect("idle slot should issue a ticket");
        assert!(slot.is_fetching());
        assert!(slot.try_begin().is_none());
        assert!(slot.try_begin().is_none());

        assert!(slot.finish(first));
        assert!(!slot.is_fetching());
        assert!(slot.try_begin().is_some());
    }

    #[test]
    fn test_responses_cannot_apply_out_of_order() {
        // Two polls can never be outstanding at once, so the second request is
        // only issued after the first has been applied.
        let mut slot = PollSlot::default();
        let a = slot.try_begin().expect("ticket a");
        assert!(slot.try_begin().is_none());
        assert!(slot.finish(a));
        let b = slot.try_begin().expect("ticket b");
        assert!(slot.finish(b));

        // A late duplicate completion of `a` is ignored.
        assert!(!slot.finish(a));
    }

    #[test]
    fn test_reset_orphans_in_flight_ticket() {
        let mut slot = PollSlot::default();
        let stale = slot.try_begin().expect("ticket");
        slot.reset();
        let fresh = slot.try_begin().expect("restart should issue a new ticket");

        assert!(!slot.finish(stale));
        assert!(slot.is_fetching());
        assert!(slot.finish(fresh));
    }

    #[test]
    fn test_failed_poll_returns_slot_to_idle() {
        let mut slot = PollSlot::default();
        let t = slot.try_begin().expect("ticket");
        // Errors and successes both finish the ticket.
        slot.finish(t);
        assert!(!slot.is_fetching());
    }

    #[test]
    fn test_refresh_during_poll_runs_after_it() {
        let mut slot = PollSlot::default();
        let stale = slot.try_begin().expect("timer poll");

        // A toggle lands while the timer poll is still out.
        assert!(slot.request_refresh().is_none());
        assert!(slot.take_follow_up().is_none());

        assert!(slot.finish(stale));
        let fresh = slot.take_follow_up().expect("deferred refresh should run");
        assert_ne!(fresh, stale);
        assert!(slot.finish(fresh));
        assert!(slot.take_follow_up().is_none());
    }

    #[test]
    fn test_refresh_on_idle_slot_starts_at_once() {
        let mut slot = PollSlot::default();
        let t = slot.request_refresh().expect("idle slot should issue a ticket");
        assert!(slot.finish(t));
        assert!(slot.take_follow_up().is_none());
    }

    #[test]
    fn test_reset_drops_deferred_refresh() {
        let mut slot = PollSlot::default();
        let _orphan = slot.try_begin().expect("ticket");
        slot.request_refresh();
        slot.reset();
        assert!(slot.take_follow_up().is_none());
    }
}
