//! Deferred callbacks as data.
//!
//! Timers don't hold closures: each carries a `tag` that the owning
//! experience interprets when `poll` reports it fired. After `cancel_all`
//! nothing fires again.

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// A timer that came due during `poll`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub id: TimerId,
    pub tag: u32,
    /// The deadline that was reached (not the poll time).
    pub due_ms: u64,
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    tag: u32,
    due_ms: u64,
    /// `Some(period)` for repeating timers.
    period_ms: Option<u32>,
}

/// Pending fire-once and repeating timers, ordered by deadline.
#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    next_id: u32,
    now_ms: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the queue's notion of "now" forward without firing anything.
    /// Delays passed to `schedule_*` are measured from here.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Fire once, `delay_ms` after the current time.
    pub fn schedule_once(&mut self, delay_ms: u32, tag: u32) -> TimerId {
        self.insert(delay_ms, tag, None)
    }

    /// Fire every `period_ms` until cancelled. A zero period is treated as 1 ms.
    pub fn schedule_repeating(&mut self, period_ms: u32, tag: u32) -> TimerId {
        let period = period_ms.max(1);
        self.insert(period, tag, Some(period))
    }

    fn insert(&mut self, delay_ms: u32, tag: u32, period_ms: Option<u32>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let timer = Timer {
            id,
            tag,
            due_ms: self.now_ms + delay_ms as u64,
            period_ms,
        };
        // Stable by deadline: equal deadlines fire in scheduling order
        let idx = self.timers.partition_point(|t| t.due_ms <= timer.due_ms);
        self.timers.insert(idx, timer);
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        if let Some(idx) = self.timers.iter().position(|t| t.id == id) {
            self.timers.remove(idx);
            true
        } else {
            false
        }
    }

    /// Cancel every pending timer (component teardown).
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Advance to `now_ms` and return every timer that came due, in deadline order.
    /// A repeating timer fires once per elapsed period.
    pub fn poll(&mut self, now_ms: u64) -> Vec<TimerFired> {
        self.now_ms = self.now_ms.max(now_ms);
        let mut fired = Vec::new();
        while let Some(first) = self.timers.first() {
            if first.due_ms > self.now_ms {
                break;
            }
            let timer = self.timers.remove(0);
            fired.push(TimerFired {
                id: timer.id,
                tag: timer.tag,
                due_ms: timer.due_ms,
            });
            if let Some(period) = timer.period_ms {
                let next = Timer {
                    due_ms: timer.due_ms + period as u64,
                    ..timer
                };
                let idx = self.timers.partition_point(|t| t.due_ms <= next.due_ms);
                self.timers.insert(idx, next);
            }
        }
        fired
    }

    /// Whether a timer is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn once_fires_at_deadline() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_once(500, 7);
        assert!(timers.poll(499).is_empty());
        let fired = timers.poll(500);
        assert_eq!(fired, vec![TimerFired { id, tag: 7, due_ms: 500 }]);
        assert!(timers.is_empty());
        assert!(timers.poll(10_000).is_empty());
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.schedule_once(4500, 4);
        timers.schedule_once(200, 1);
        timers.schedule_once(1500, 3);
        timers.schedule_once(800, 2);
        let tags: Vec<u32> = timers.poll(5000).iter().map(|f| f.tag).collect();
        assert_eq!(tags, vec![1, 2, 3, 4]);
    }

    #[test]
    fn repeating_fires_once_per_period() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_repeating(40, 9);
        assert_eq!(timers.poll(39).len(), 0);
        assert_eq!(timers.poll(120).len(), 3);
        assert!(timers.is_pending(id));
        assert!(timers.cancel(id));
        assert!(timers.poll(1000).is_empty());
    }

    #[test]
    fn delay_is_relative_to_last_poll() {
        let mut timers = TimerQueue::new();
        timers.poll(1000);
        timers.schedule_once(200, 1);
        assert!(timers.poll(1199).is_empty());
        assert_eq!(timers.poll(1200).len(), 1);
    }

    #[test]
    fn set_now_moves_the_schedule_origin() {
        let mut timers = TimerQueue::new();
        timers.set_now(300);
        timers.schedule_once(100, 1);
        assert!(timers.poll(399).is_empty());
        assert_eq!(timers.poll(400).len(), 1);
    }

    #[test]
    fn cancel_all_silences_everything() {
        let mut timers = TimerQueue::new();
        timers.schedule_once(10, 1);
        timers.schedule_repeating(10, 2);
        timers.cancel_all();
        assert!(timers.poll(1_000).is_empty());
    }

    #[test]
    fn cancel_unknown_returns_false() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_once(10, 1);
        timers.poll(10);
        assert!(!timers.cancel(id));
    }
}
