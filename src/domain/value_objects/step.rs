//! Publish Steps
//!
//! The fixed step sequence of a publish run. Step names are part of the
//! extension contract (`step_completed`) and of progress output.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PublishStep {
    Calculate,
    CreatePages,
    GatherMedia,
    Files,
    Upload,
}

impl PublishStep {
    /// All steps in execution order
    pub const ALL: [PublishStep; 5] = [
        PublishStep::Calculate,
        PublishStep::CreatePages,
        PublishStep::GatherMedia,
        PublishStep::Files,
        PublishStep::Upload,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PublishStep::Calculate => "Calculate",
            PublishStep::CreatePages => "Creating Pages",
            PublishStep::GatherMedia => "Gathering Media",
            PublishStep::Files => "Files",
            PublishStep::Upload => "Upload",
        }
    }

    /// 1-based position, used for step progress
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
