pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::RunConfig;

pub use adapters::storage::LocalStorage;
pub use crate::core::{etl::EtlEngine, pipeline::TransitPipeline, report::transform_document};
pub use utils::diagnostics::Diagnostics;
pub use utils::error::{Result, TransitError};
