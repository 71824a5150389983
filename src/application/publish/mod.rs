//! Publish Module
//!
//! Orchestrates one publish run for a destination.
//!
//! ## Structure
//!
//! - `options` - Run options (`PublishOptions`, `PublishSettings`, `CancellationToken`)
//! - `result` - Run outcome (`PublishReport`)
//! - `use_case` - The step pipeline (`PublishUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use sitepush::application::publish::{PublishOptions, PublishUseCase};
//!
//! let use_case = PublishUseCase::new(resolver, renderer, media, servers, settings);
//! let report = use_case.publish(&PublishOptions::new("live").with_files(true), &reporter);
//! ```

mod options;
mod result;
mod use_case;

pub use options::{CancellationToken, PublishOptions, PublishSettings};
pub use result::PublishReport;
pub use use_case::PublishUseCase;
