use std::time::Instant;

/// Handle to a scheduled action, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Scheduled<A> {
    handle: TimerHandle,
    due: Instant,
    action: A,
}

/// A set of delayed, cancellable actions.
///
/// Actions come back out of [`TimerQueue::pop_due`] ordered by due instant;
/// actions due at the same instant come out in the order they were scheduled.
#[derive(Debug, Clone)]
pub struct TimerQueue<A> {
    entries: Vec<Scheduled<A>>,
    next_id: u64,
}

impl<A> TimerQueue<A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub fn schedule_at(&mut self, due: Instant, action: A) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Scheduled {
            handle,
            due,
            action,
        });
        handle
    }

    /// Cancel a pending action. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Earliest due instant among pending actions
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Remove and return the earliest action due at or before `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerHandle, Instant, A)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.handle))
            .map(|(idx, _)| idx)?;

        let entry = self.entries.remove(idx);
        Some((entry.handle, entry.due, entry.action))
    }
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}
