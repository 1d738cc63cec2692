pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{
    BatchReport, BatchSpec, CommandSpec, ConnectionMode, RunReport, SeedValue,
};
pub use crate::domain::ports::{CommandSink, ConfigProvider, Pipeline};
pub use crate::utils::error::Result;
