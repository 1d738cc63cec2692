use crate::config::plan::PlanConfig;
use crate::domain::model::{BatchReport, BatchSpec, CommandSpec, RunReport, SeedValue};
use crate::domain::ports::{CommandSink, ConfigProvider, Pipeline};
use crate::utils::error::{Result, SmokeError};
use crate::utils::validation::Validate;
use std::time::Instant;

/// Renders one batch into a non-atomic client pipeline. Command order is
/// preserved; MULTI/EXEC is not used because cluster deployments cannot wrap
/// cross-slot batches.
pub fn render_batch(batch: &BatchSpec) -> Result<redis::Pipeline> {
    let mut pipe = redis::pipe();

    for command in &batch.commands {
        match command {
            CommandSpec::Set { key, value } => {
                let cmd = pipe.cmd("SET").arg(key);
                match value {
                    SeedValue::Int(v) => cmd.arg(*v),
                    SeedValue::Float(v) => cmd.arg(*v),
                    SeedValue::Bool(v) => cmd.arg(*v),
                    SeedValue::Str(v) => cmd.arg(v),
                };
            }
            CommandSpec::JsonSet { key, path, value } => {
                let payload = serde_json::to_string(value)?;
                pipe.cmd("JSON.SET").arg(key).arg(path).arg(payload);
            }
        }
    }

    Ok(pipe)
}

pub struct SeedPipeline<S: CommandSink, C: ConfigProvider> {
    sink: S,
    config: C,
    plan: PlanConfig,
}

impl<S: CommandSink, C: ConfigProvider> SeedPipeline<S, C> {
    pub fn new(sink: S, config: C, plan: PlanConfig) -> Self {
        Self { sink, config, plan }
    }
}

#[async_trait::async_trait]
impl<S: CommandSink, C: ConfigProvider> Pipeline for SeedPipeline<S, C> {
    async fn prepare(&self) -> Result<Vec<BatchSpec>> {
        self.plan.validate()?;

        let mut batches = self.plan.batches.clone();
        let prefix = self.config.key_prefix();
        for batch in &mut batches {
            for command in &mut batch.commands {
                command.apply_prefix(prefix);
            }
        }

        tracing::debug!(
            "Prepared {} batches ({} commands) from plan '{}'",
            batches.len(),
            batches.iter().map(|b| b.commands.len()).sum::<usize>(),
            self.plan.plan.name
        );

        Ok(batches)
    }

    async fn execute(&self, batches: Vec<BatchSpec>) -> Result<RunReport> {
        let mut report = RunReport::new(chrono::Utc::now());

        // Batches run strictly in order; the next one is not rendered until
        // the previous one's replies have been received and checked.
        for batch in &batches {
            tracing::debug!(
                "Executing batch '{}' with {} commands",
                batch.name,
                batch.commands.len()
            );

            let pipe = render_batch(batch)?;
            let started = Instant::now();
            let replies = self.sink.run_batch(&pipe).await?;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            if replies.len() != batch.commands.len() {
                return Err(SmokeError::ProcessingError {
                    message: format!(
                        "batch '{}' returned {} replies for {} commands",
                        batch.name,
                        replies.len(),
                        batch.commands.len()
                    ),
                });
            }

            tracing::debug!("Batch '{}' completed in {}ms", batch.name, elapsed_ms);

            report.record_batch(BatchReport {
                name: batch.name.clone(),
                commands: batch.commands.len(),
                replies: replies.len(),
                elapsed_ms,
            });
        }

        Ok(report)
    }

    async fn verify(&self, batches: &[BatchSpec]) -> Result<usize> {
        if !self.config.verify_enabled() {
            return Ok(0);
        }

        let mut seen = 0;
        for batch in batches {
            for command in &batch.commands {
                let found = match command {
                    CommandSpec::Set { key, .. } => self.sink.fetch_string(key).await?.is_some(),
                    CommandSpec::JsonSet { key, path, .. } => {
                        self.sink.fetch_json(key, path).await?.is_some()
                    }
                };

                if !found {
                    return Err(SmokeError::ProcessingError {
                        message: format!(
                            "verification failed: key '{}' missing after execution",
                            command.key()
                        ),
                    });
                }
                seen += 1;
            }
        }

        tracing::debug!("Verified {} keys", seen);
        Ok(seen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::plan::{PlanConfig, PlanHeader};
    use crate::domain::model::ConnectionMode;
    use redis_test::{MockCmd, MockRedisConnection};
    use std::collections::VecDeque;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockSink {
        // packed pipeline bytes, in arrival order
        sent: Arc<Mutex<Vec<Vec<u8>>>>,
        // queued reply vectors, one per expected batch
        replies: Arc<Mutex<VecDeque<Vec<redis::Value>>>>,
        known_keys: Arc<Mutex<Vec<String>>>,
    }

    impl MockSink {
        fn new(replies: Vec<Vec<redis::Value>>) -> Self {
            Self {
                sent: Arc::new(Mutex::new(Vec::new())),
                replies: Arc::new(Mutex::new(replies.into_iter().collect())),
                known_keys: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn okay_replies(counts: &[usize]) -> Vec<Vec<redis::Value>> {
            counts
                .iter()
                .map(|n| vec![redis::Value::Okay; *n])
                .collect()
        }

        async fn sent_batches(&self) -> Vec<Vec<u8>> {
            self.sent.lock().await.clone()
        }

        async fn add_known_key(&self, key: &str) {
            self.known_keys.lock().await.push(key.to_string());
        }
    }

    impl CommandSink for MockSink {
        async fn run_batch(&self, pipe: &redis::Pipeline) -> Result<Vec<redis::Value>> {
            self.sent.lock().await.push(pipe.get_packed_pipeline());
            let reply = self.replies.lock().await.pop_front();
            reply.ok_or_else(|| SmokeError::ProcessingError {
                message: "unexpected batch".to_string(),
            })
        }

        async fn fetch_string(&self, key: &str) -> Result<Option<String>> {
            let keys = self.known_keys.lock().await;
            Ok(keys.iter().any(|k| k == key).then(|| "1".to_string()))
        }

        async fn fetch_json(&self, key: &str, _path: &str) -> Result<Option<String>> {
            let keys = self.known_keys.lock().await;
            Ok(keys.iter().any(|k| k == key).then(|| "1".to_string()))
        }
    }

    struct MockConfig {
        key_prefix: String,
        verify: bool,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                key_prefix: String::new(),
                verify: false,
            }
        }

        fn with_prefix(prefix: &str) -> Self {
            Self {
                key_prefix: prefix.to_string(),
                verify: false,
            }
        }

        fn with_verify() -> Self {
            Self {
                key_prefix: String::new(),
                verify: true,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn redis_url(&self) -> &str {
            "redis://localhost:16379/0"
        }

        fn mode(&self) -> ConnectionMode {
            ConnectionMode::Cluster
        }

        fn key_prefix(&self) -> &str {
            &self.key_prefix
        }

        fn verify_enabled(&self) -> bool {
            self.verify
        }
    }

    fn empty_plan() -> PlanConfig {
        PlanConfig {
            plan: PlanHeader {
                name: "empty".to_string(),
                description: String::new(),
            },
            batches: vec![],
        }
    }

    #[tokio::test]
    async fn test_prepare_applies_prefix() {
        let sink = MockSink::new(vec![]);
        let pipeline = SeedPipeline::new(
            sink,
            MockConfig::with_prefix("smoke"),
            PlanConfig::default_plan(),
        );

        let batches = pipeline.prepare().await.unwrap();

        assert_eq!(batches[0].commands[0].key(), "smoke:blah");
        assert_eq!(batches[0].commands[1].key(), "smoke:blah2");
        assert_eq!(batches[1].commands[0].key(), "smoke:blah3");
    }

    #[tokio::test]
    async fn test_prepare_without_prefix_keeps_keys() {
        let sink = MockSink::new(vec![]);
        let pipeline = SeedPipeline::new(sink, MockConfig::new(), PlanConfig::default_plan());

        let batches = pipeline.prepare().await.unwrap();

        assert_eq!(batches[0].commands[0].key(), "blah");
    }

    #[tokio::test]
    async fn test_prepare_rejects_empty_plan() {
        let sink = MockSink::new(vec![]);
        let pipeline = SeedPipeline::new(sink, MockConfig::new(), empty_plan());

        assert!(pipeline.prepare().await.is_err());
    }

    #[tokio::test]
    async fn test_execute_sends_batches_in_order() {
        let sink = MockSink::new(MockSink::okay_replies(&[2, 1]));
        let pipeline = SeedPipeline::new(
            sink.clone(),
            MockConfig::new(),
            PlanConfig::default_plan(),
        );

        let batches = pipeline.prepare().await.unwrap();
        pipeline.execute(batches.clone()).await.unwrap();

        let sent = sink.sent_batches().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], render_batch(&batches[0]).unwrap().get_packed_pipeline());
        assert_eq!(sent[1], render_batch(&batches[1]).unwrap().get_packed_pipeline());
    }

    #[tokio::test]
    async fn test_execute_reports_counts() {
        let sink = MockSink::new(MockSink::okay_replies(&[2, 1]));
        let pipeline = SeedPipeline::new(sink, MockConfig::new(), PlanConfig::default_plan());

        let batches = pipeline.prepare().await.unwrap();
        let report = pipeline.execute(batches).await.unwrap();

        assert_eq!(report.batch_count(), 2);
        assert_eq!(report.total_commands, 3);
        assert_eq!(report.batches[0].name, "mixed");
        assert_eq!(report.batches[0].commands, 2);
        assert_eq!(report.batches[0].replies, 2);
        assert_eq!(report.batches[1].name, "json-only");
        assert_eq!(report.batches[1].replies, 1);
    }

    #[tokio::test]
    async fn test_execute_rejects_reply_arity_mismatch() {
        // first batch carries 2 commands but only 1 reply comes back
        let sink = MockSink::new(MockSink::okay_replies(&[1, 1]));
        let pipeline = SeedPipeline::new(sink, MockConfig::new(), PlanConfig::default_plan());

        let batches = pipeline.prepare().await.unwrap();
        let err = pipeline.execute(batches).await.unwrap_err();

        assert!(err.to_string().contains("mixed"));
        assert!(err.to_string().contains("1 replies for 2 commands"));
    }

    #[tokio::test]
    async fn test_verify_disabled_is_a_noop() {
        let sink = MockSink::new(vec![]);
        let pipeline = SeedPipeline::new(
            sink,
            MockConfig::new(),
            PlanConfig::default_plan(),
        );

        let batches = pipeline.prepare().await.unwrap();
        assert_eq!(pipeline.verify(&batches).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_verify_counts_seen_keys() {
        let sink = MockSink::new(vec![]);
        sink.add_known_key("blah").await;
        sink.add_known_key("blah2").await;
        sink.add_known_key("blah3").await;

        let pipeline = SeedPipeline::new(
            sink,
            MockConfig::with_verify(),
            PlanConfig::default_plan(),
        );

        let batches = pipeline.prepare().await.unwrap();
        assert_eq!(pipeline.verify(&batches).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_verify_fails_on_missing_key() {
        let sink = MockSink::new(vec![]);
        sink.add_known_key("blah").await;
        // blah2 and blah3 were never written

        let pipeline = SeedPipeline::new(
            sink,
            MockConfig::with_verify(),
            PlanConfig::default_plan(),
        );

        let batches = pipeline.prepare().await.unwrap();
        let err = pipeline.verify(&batches).await.unwrap_err();
        assert!(err.to_string().contains("blah2"));
    }

    #[tokio::test]
    async fn test_render_batch_against_mock_connection() {
        let batch = BatchSpec {
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
        };

        let pipe = render_batch(&batch).unwrap();
        let mut conn = MockRedisConnection::new(vec![MockCmd::with_values(
            pipe.clone(),
            Ok(vec![redis::Value::Okay, redis::Value::Okay]),
        )]);

        let replies: Vec<redis::Value> = pipe.query_async(&mut conn).await.unwrap();
        assert_eq!(replies, vec![redis::Value::Okay, redis::Value::Okay]);
    }

    #[tokio::test]
    async fn test_render_batch_serializes_json_values() {
        let batch = BatchSpec {
            name: "doc".to_string(),
            commands: vec![CommandSpec::JsonSet {
                key: "doc".to_string(),
                path: "$".to_string(),
                value: serde_json::json!({"a": [1, 2], "b": "x"}),
            }],
        };

        let pipe = render_batch(&batch).unwrap();
        let packed = pipe.get_packed_pipeline();
        let rendered = String::from_utf8_lossy(&packed);

        assert!(rendered.contains("JSON.SET"));
        assert!(rendered.contains(r#"{"a":[1,2],"b":"x"}"#));
    }
}
