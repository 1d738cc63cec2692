use crate::domain::model::{BatchSpec, CommandSpec, SeedValue};
use crate::utils::error::{Result, SmokeError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A seed plan: an ordered list of named batches, each rendered into one
/// client pipeline at execution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    pub plan: PlanHeader,
    #[serde(rename = "batch", default)]
    pub batches: Vec<BatchSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanHeader {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl PlanConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SmokeError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        let config: PlanConfig = toml::from_str(&processed)?;
        Ok(config)
    }

    /// Replaces `${VAR}` references with the value of the environment
    /// variable. Unset variables are left as-is so validation can report them.
    fn substitute_env_vars(content: &str) -> String {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").expect("static pattern");
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    /// The built-in plan: one mixed JSON/string batch, then a JSON-only batch.
    pub fn default_plan() -> Self {
        Self {
            plan: PlanHeader {
                name: "default-smoke".to_string(),
                description: "Two pipelined batches of SET/JSON.SET commands".to_string(),
            },
            batches: vec![
                BatchSpec {
                    name: "mixed".to_string(),
                    commands: vec![
                        CommandSpec::JsonSet {
                            key: "blah".to_string(),
                            path: ".".to_string(),
                            value: serde_json::json!(1),
                        },
                        CommandSpec::Set {
                            key: "blah2".to_string(),
                            value: SeedValue::Int(1),
                        },
                    ],
                },
                BatchSpec {
                    name: "json-only".to_string(),
                    commands: vec![CommandSpec::JsonSet {
                        key: "blah3".to_string(),
                        path: ".".to_string(),
                        value: serde_json::json!(1),
                    }],
                },
            ],
        }
    }

    pub fn validate_plan(&self) -> Result<()> {
        validation::validate_non_empty_string("plan.name", &self.plan.name)?;

        if self.batches.is_empty() {
            return Err(SmokeError::MissingConfigError {
                field: "batch".to_string(),
            });
        }

        for batch in &self.batches {
            validation::validate_non_empty_string("batch.name", &batch.name)?;

            if batch.commands.is_empty() {
                return Err(SmokeError::InvalidConfigValueError {
                    field: "batch.command".to_string(),
                    value: batch.name.clone(),
                    reason: "Batch has no commands".to_string(),
                });
            }

            for command in &batch.commands {
                validation::validate_non_empty_string("command.key", command.key())?;

                if let CommandSpec::JsonSet { path, .. } = command {
                    validation::validate_non_empty_string("command.path", path)?;
                }
            }
        }

        Ok(())
    }

    pub fn total_commands(&self) -> usize {
        self.batches.iter().map(|b| b.commands.len()).sum()
    }
}

impl Validate for PlanConfig {
    fn validate(&self) -> Result<()> {
        self.validate_plan()
    }
}
