pub mod plan;

#[cfg(feature = "cli")]
use crate::domain::model::ConnectionMode;
#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "redis-smoke")]
#[command(about = "Seed and smoke-check a Redis deployment with pipelined SET/JSON.SET batches")]
pub struct CliConfig {
    #[arg(long, default_value = "redis://localhost:16379/0")]
    pub redis_url: String,

    #[arg(long, value_enum, default_value = "cluster")]
    pub mode: ConnectionMode,

    #[arg(long, default_value = "", help = "Prefix applied to every seeded key")]
    pub key_prefix: String,

    #[arg(long, help = "TOML seed plan; the built-in plan runs when omitted")]
    pub plan: Option<String>,

    #[arg(long, help = "Read every seeded key back after execution")]
    pub verify: bool,

    #[arg(long, help = "Write a JSON run report to this path")]
    pub report: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU/memory stats per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn redis_url(&self) -> &str {
        &self.redis_url
    }

    fn mode(&self) -> ConnectionMode {
        self.mode
    }

    fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    fn verify_enabled(&self) -> bool {
        self.verify
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validation::validate_redis_url("redis_url", &self.redis_url)?;
        validation::validate_key_prefix("key_prefix", &self.key_prefix)?;

        if let Some(plan_path) = &self.plan {
            validation::validate_non_empty_string("plan", plan_path)?;
        }
        if let Some(report_path) = &self.report {
            validation::validate_non_empty_string("report", report_path)?;
        }

        Ok(())
    }
}
