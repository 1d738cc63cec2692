pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::sink::RedisSink;
pub use crate::config::plan::PlanConfig;
pub use crate::core::{engine::SmokeEngine, pipeline::SeedPipeline};
pub use crate::utils::error::{Result, SmokeError};
