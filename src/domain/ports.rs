use crate::domain::model::{BatchSpec, ConnectionMode, RunReport};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait CommandSink: Send + Sync {
    fn run_batch(
        &self,
        pipe: &redis::Pipeline,
    ) -> impl std::future::Future<Output = Result<Vec<redis::Value>>> + Send;
    fn fetch_string(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn fetch_json(
        &self,
        key: &str,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn redis_url(&self) -> &str;
    fn mode(&self) -> ConnectionMode;
    fn key_prefix(&self) -> &str;
    fn verify_enabled(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn prepare(&self) -> Result<Vec<BatchSpec>>;
    async fn execute(&self, batches: Vec<BatchSpec>) -> Result<RunReport>;
    async fn verify(&self, batches: &[BatchSpec]) -> Result<usize>;
}
