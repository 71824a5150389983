//! Progress Port
//!
//! Observable interface for publish runs. The orchestrator and the
//! deployers report through it; sinks decide how to present events.

use crate::domain::entities::SessionId;
use crate::domain::value_objects::PublishStep;

/// Event emitted during a publish run
#[derive(Debug, Clone, PartialEq)]
pub enum PublishEvent {
    /// Session started against a destination
    Started {
        session: SessionId,
        destination: String,
    },

    /// A step began
    StepStarted { step: PublishStep },

    /// Per-item tick inside the current step
    Progress {
        message: String,
        current: usize,
        total: usize,
    },

    /// A step finished
    StepCompleted { step: PublishStep },

    /// Run finished (successfully or not)
    Completed {
        session: SessionId,
        success: bool,
        transferred: usize,
    },
}

impl PublishEvent {
    pub fn progress(message: impl Into<String>, current: usize, total: usize) -> Self {
        PublishEvent::Progress {
            message: message.into(),
            current,
            total,
        }
    }
}

/// Trait for receiving publish events
///
/// Implementations can be:
/// - ConsoleReporter: human progress on stderr
/// - JsonReporter: NDJSON event stream for CI
/// - NoopReporter: Silent operation
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: PublishEvent);

    /// Shorthand for a `Progress` event
    fn tick(&self, message: &str, current: usize, total: usize) {
        self.report(PublishEvent::progress(message, current, total));
    }
}

/// No-op reporter for silent operation
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: PublishEvent) {}
}

impl<F> ProgressReporter for F
where
    F: Fn(PublishEvent) + Send + Sync,
{
    fn report(&self, event: PublishEvent) {
        self(event)
    }
}
