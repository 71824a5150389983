//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod cancel;
mod path;
mod step;

pub use cancel::CancellationToken;
pub use path::{PathError, StagingPath};
pub use step::PublishStep;
