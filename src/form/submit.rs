use std::time::{Duration, Instant};

use log::trace;

use crate::runtime::event::FormEvent;
use crate::runtime::{Scheduler, SchedulerCommand};

const FEEDBACK_KEY: &str = "submit_feedback";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Validating,
    /// The submit action is marked failed until the feedback window ends.
    RejectedFeedback,
}

/// Submit state machine: `Idle -> Validating -> Idle` on success, or
/// `Validating -> RejectedFeedback -> Idle` once the feedback window passes.
#[derive(Debug)]
pub struct SubmissionController {
    state: SubmitState,
    scheduler: Scheduler,
    feedback: Duration,
}

impl SubmissionController {
    pub fn new(feedback: Duration) -> Self {
        Self {
            state: SubmitState::Idle,
            scheduler: Scheduler::new(),
            feedback,
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Enters `Validating`, dropping any revert still pending from an earlier rejection.
    pub fn begin(&mut self, now: Instant) {
        if self.state == SubmitState::RejectedFeedback {
            self.scheduler.schedule(
                SchedulerCommand::Cancel {
                    key: FEEDBACK_KEY.to_string(),
                },
                now,
            );
        }
        self.state = SubmitState::Validating;
    }

    pub fn accept(&mut self) {
        self.state = SubmitState::Idle;
    }

    pub fn reject(&mut self, now: Instant) {
        self.state = SubmitState::RejectedFeedback;
        self.scheduler.schedule(
            SchedulerCommand::EmitAfter {
                key: FEEDBACK_KEY.to_string(),
                delay: self.feedback,
                event: FormEvent::RevertSubmitFeedback,
            },
            now,
        );
    }

    /// Fires due transitions. Returns true when the feedback window ended.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut reverted = false;
        for event in self.scheduler.drain_ready(now) {
            match event {
                FormEvent::RevertSubmitFeedback if self.state == SubmitState::RejectedFeedback => {
                    trace!("submit feedback window ended");
                    self.state = SubmitState::Idle;
                    reverted = true;
                }
                FormEvent::RevertSubmitFeedback => {}
            }
        }
        reverted
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.scheduler.poll_timeout(now, default_timeout)
    }
}
