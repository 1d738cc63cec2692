use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scalar payload for a plain `SET`. Untagged so plan files write literals
/// directly (`value = 1`, `value = "ready"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeedValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

/// One queued command. The `op` tag selects between a plain string `SET`
/// and a RedisJSON `JSON.SET`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum CommandSpec {
    Set {
        key: String,
        value: SeedValue,
    },
    JsonSet {
        key: String,
        #[serde(default = "default_json_path")]
        path: String,
        value: serde_json::Value,
    },
}

fn default_json_path() -> String {
    ".".to_string()
}

impl CommandSpec {
    pub fn key(&self) -> &str {
        match self {
            CommandSpec::Set { key, .. } => key,
            CommandSpec::JsonSet { key, .. } => key,
        }
    }

    pub fn apply_prefix(&mut self, prefix: &str) {
        if prefix.is_empty() {
            return;
        }
        let prefixed = format!("{}:{}", prefix, self.key());
        match self {
            CommandSpec::Set { key, .. } => *key = prefixed,
            CommandSpec::JsonSet { key, .. } => *key = prefixed,
        }
    }
}

/// An ordered group of commands sent to the server as one client pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSpec {
    pub name: String,
    #[serde(rename = "command", default)]
    pub commands: Vec<CommandSpec>,
}

/// Connection flavor for the target deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ConnectionMode {
    Cluster,
    Single,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub name: String,
    pub commands: usize,
    pub replies: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub batches: Vec<BatchReport>,
    pub total_commands: usize,
    pub verified_keys: usize,
}

impl RunReport {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            batches: Vec::new(),
            total_commands: 0,
            verified_keys: 0,
        }
    }

    pub fn record_batch(&mut self, batch: BatchReport) {
        self.total_commands += batch.commands;
        self.batches.push(batch);
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }
}
