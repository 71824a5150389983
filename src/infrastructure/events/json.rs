//! JSON Progress Reporter
//!
//! Outputs publish events as NDJSON for CI/automation consumption.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{ProgressReporter, PublishEvent};

/// Reporter that outputs NDJSON events to stdout
pub struct JsonReporter {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonReporter {
    /// Create a new JSON reporter writing to stdout
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Create a JSON reporter writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl ProgressReporter for JsonReporter {
    fn report(&self, event: PublishEvent) {
        let json = match event {
            PublishEvent::Started {
                session,
                destination,
            } => {
                serde_json::json!({
                    "event": "start",
                    "command": "publish",
                    "session": session.to_string(),
                    "destination": destination,
                })
            }

            PublishEvent::StepStarted { step } => {
                serde_json::json!({
                    "event": "step_start",
                    "command": "publish",
                    "step": step.name(),
                    "index": step.index(),
                })
            }

            PublishEvent::Progress {
                message,
                current,
                total,
            } => {
                serde_json::json!({
                    "event": "progress",
                    "command": "publish",
                    "message": message,
                    "current": current,
                    "total": total,
                })
            }

            PublishEvent::StepCompleted { step } => {
                serde_json::json!({
                    "event": "step_complete",
                    "command": "publish",
                    "step": step.name(),
                    "index": step.index(),
                })
            }

            PublishEvent::Completed {
                session,
                success,
                transferred,
            } => {
                serde_json::json!({
                    "event": "complete",
                    "command": "publish",
                    "session": session.to_string(),
                    "status": if success { "success" } else { "failed" },
                    "transferred": transferred,
                })
            }
        };

        self.write_event(json);
    }
}
