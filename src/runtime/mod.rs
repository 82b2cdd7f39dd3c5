pub mod event;
pub mod scheduler;

pub use scheduler::{Scheduler, SchedulerCommand};
