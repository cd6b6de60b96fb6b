use super::page::Page;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

pub type TimerCallback = Box<dyn FnOnce(&mut Page)>;

struct ScheduledTask {
    id: TimerId,
    due_at: u64,
    callback: TimerCallback,
}

/// One-shot timers against a virtual millisecond clock.
#[derive(Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_id: u64,
    tasks: Vec<ScheduledTask>,
}

impl TimerQueue {
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule(&mut self, delay: Duration, callback: TimerCallback) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.tasks.push(ScheduledTask {
            id,
            due_at: self.now_ms.saturating_add(delay_ms),
            callback,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        before != self.tasks.len()
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Removes the earliest task due at or before `limit`, moving the clock to
    /// its due time. Ties run in scheduling order.
    pub fn pop_due(&mut self, limit: u64) -> Option<TimerCallback> {
        let (index, _) = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due_at <= limit)
            .min_by_key(|(_, task)| (task.due_at, task.id.0))?;
        let task = self.tasks.remove(index);
        self.now_ms = self.now_ms.max(task.due_at);
        Some(task.callback)
    }

    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("now_ms", &self.now_ms)
            .field("pending", &self.tasks.len())
            .finish()
    }
}
