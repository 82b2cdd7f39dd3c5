use crate::runtime::event::FormEvent;
use log::trace;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum SchedulerCommand {
    EmitAfter {
        key: String,
        delay: Duration,
        event: FormEvent,
    },
    Cancel {
        key: String,
    },
}

#[derive(Debug, Clone)]
struct DelayedTask {
    due_at: Instant,
    key: String,
    event: FormEvent,
}

/// Single-threaded timer queue. Nothing fires on its own: the owner drains due events
/// with an explicit `now`, so delayed transitions never block the event loop.
#[derive(Debug, Default)]
pub struct Scheduler {
    delayed: Vec<DelayedTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, command: SchedulerCommand, now: Instant) {
        match command {
            SchedulerCommand::EmitAfter { key, delay, event } => {
                trace!("scheduling {event:?} under '{key}' in {delay:?}");
                self.delayed.push(DelayedTask {
                    due_at: now + delay,
                    key,
                    event,
                });
            }
            SchedulerCommand::Cancel { key } => {
                trace!("cancelling pending events under '{key}'");
                self.delayed.retain(|task| task.key != key);
            }
        }
    }

    pub fn drain_ready(&mut self, now: Instant) -> Vec<FormEvent> {
        let mut ready = Vec::new();
        let mut idx = 0usize;
        while idx < self.delayed.len() {
            if self.delayed[idx].due_at <= now {
                let task = self.delayed.swap_remove(idx);
                trace!("firing {:?} under '{}'", task.event, task.key);
                ready.push(task.event);
            } else {
                idx += 1;
            }
        }
        ready
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        let mut next = default_timeout;

        for task in &self.delayed {
            let due_in = task.due_at.saturating_duration_since(now);
            if due_in < next {
                next = due_in;
            }
        }

        next
    }
}
