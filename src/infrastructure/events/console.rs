//! Console Progress Reporter
//!
//! Human-readable progress, one line per step. Per-item ticks are only
//! printed in verbose mode.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{ProgressReporter, PublishEvent};
use crate::domain::value_objects::PublishStep;

pub struct ConsoleReporter {
    writer: Mutex<Box<dyn Write + Send>>,
    verbose: bool,
}

impl ConsoleReporter {
    pub fn stderr(verbose: bool) -> Self {
        Self::with_writer(io::stderr(), verbose)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, verbose: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            verbose,
        }
    }

    fn line(&self, text: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", text);
        }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn report(&self, event: PublishEvent) {
        match event {
            PublishEvent::Started {
                session,
                destination,
            } => self.line(&format!("Publishing to {} (session {})", destination, session)),
            PublishEvent::StepStarted { step } => self.line(&format!(
                "[{}/{}] {}",
                step.index(),
                PublishStep::ALL.len(),
                step
            )),
            PublishEvent::Progress {
                message,
                current,
                total,
            } => {
                if self.verbose {
                    self.line(&format!("      {} ({}/{})", message, current, total));
                }
            }
            PublishEvent::StepCompleted { .. } => {}
            PublishEvent::Completed {
                success,
                transferred,
                ..
            } => {
                if success {
                    self.line(&format!("Done: {} transferred", transferred));
                } else {
                    self.line("Publish failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn prints_step_headers() {
        let buffer = Buffer::default();
        let reporter = ConsoleReporter::with_writer(buffer.clone(), false);

        reporter.report(PublishEvent::StepStarted {
            step: PublishStep::Upload,
        });
        reporter.tick("Uploading /www/a.txt", 1, 1);

        assert_eq!(buffer.text(), "[5/5] Upload\n");
    }

    #[test]
    fn verbose_prints_ticks() {
        let buffer = Buffer::default();
        let reporter = ConsoleReporter::with_writer(buffer.clone(), true);

        reporter.tick("Saving: Logo", 1, 2);

        assert!(buffer.text().contains("Saving: Logo (1/2)"));
    }
}
