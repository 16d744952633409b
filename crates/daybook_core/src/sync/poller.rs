//! Interval-driven synthetic refresh layered on the [`ChangeBus`].
//!
//! Covers changes made by other processes that never reach this bus. The
//! host event loop drives it with [`Poller::tick`]; there is no thread.

use super::bus::{ChangeBus, ChangeOrigin};
use crate::model::entity::EntityKind;
use std::time::{Duration, Instant};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    kinds: Vec<EntityKind>,
    last_fired: Instant,
    stopped: bool,
}

impl Poller {
    /// Starts a poller whose first tick is due one `interval` after `now`.
    pub fn new(interval: Duration, kinds: &[EntityKind], now: Instant) -> Self {
        Self {
            interval,
            kinds: kinds.to_vec(),
            last_fired: now,
            stopped: false,
        }
    }

    /// Publishes one `Poll` event per watched kind when an interval has
    /// elapsed. Missed intervals collapse into a single refresh.
    pub fn tick(&mut self, now: Instant, bus: &ChangeBus) -> bool {
        if self.stopped || now.saturating_duration_since(self.last_fired) < self.interval {
            return false;
        }
        self.last_fired = now;
        for kind in &self.kinds {
            bus.publish(*kind, ChangeOrigin::Poll);
        }
        true
    }

    pub fn next_due(&self) -> Option<Instant> {
        (!self.stopped).then(|| self.last_fired + self.interval)
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_running(&self) -> bool {
        !self.stopped
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn fires_once_per_elapsed_interval_and_stops() {
        let bus = ChangeBus::new();
        let polls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&polls);
        let _sub = bus.subscribe(EntityKind::Task, move |event| {
            assert_eq!(event.origin, ChangeOrigin::Poll);
            counter.set(counter.get() + 1);
        });

        let start = Instant::now();
        let mut poller = Poller::new(Duration::from_secs(2), &[EntityKind::Task], start);
        assert!(!poller.tick(start + Duration::from_millis(1500), &bus));
        assert!(poller.tick(start + Duration::from_secs(2), &bus));
        assert!(!poller.tick(start + Duration::from_secs(3), &bus));
        assert!(poller.tick(start + Duration::from_secs(9), &bus));
        assert_eq!(polls.get(), 2);

        poller.stop();
        assert!(!poller.tick(start + Duration::from_secs(60), &bus));
        assert_eq!(poller.next_due(), None);
        assert_eq!(polls.get(), 2);
    }
}
