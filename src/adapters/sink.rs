use crate::domain::model::ConnectionMode;
use crate::domain::ports::{CommandSink, ConfigProvider};
use crate::utils::error::Result;
use redis::aio::MultiplexedConnection;
use redis::cluster_async::ClusterConnection;
use redis::JsonAsyncCommands;
use std::sync::Arc;
use tokio::sync::Mutex;

enum RedisConn {
    Single(MultiplexedConnection),
    Cluster(ClusterConnection),
}

/// Connection adapter over the `redis` crate. Cloneable; all commands
/// serialize through the one underlying connection.
#[derive(Clone)]
pub struct RedisSink {
    inner: Arc<Mutex<RedisConn>>,
}

impl RedisSink {
    pub async fn connect<C: ConfigProvider>(config: &C) -> Result<Self> {
        let inner = match config.mode() {
            ConnectionMode::Cluster => {
                let client =
                    redis::cluster::ClusterClient::new(vec![config.redis_url().to_string()])?;
                let conn = client.get_async_connection().await?;
                tracing::debug!("Connected to Redis cluster at {}", config.redis_url());
                RedisConn::Cluster(conn)
            }
            ConnectionMode::Single => {
                let client = redis::Client::open(config.redis_url())?;
                let conn = client.get_multiplexed_tokio_connection().await?;
                tracing::debug!("Connected to Redis node at {}", config.redis_url());
                RedisConn::Single(conn)
            }
        };

        Ok(Self {
            inner: Arc::new(Mutex::new(inner)),
        })
    }

    async fn query<T: redis::FromRedisValue>(&self, cmd: redis::Cmd) -> Result<T> {
        let mut guard = self.inner.lock().await;
        let value = match &mut *guard {
            RedisConn::Single(c) => cmd.query_async(c).await?,
            RedisConn::Cluster(c) => cmd.query_async(c).await?,
        };
        Ok(value)
    }
}

impl CommandSink for RedisSink {
    async fn run_batch(&self, pipe: &redis::Pipeline) -> Result<Vec<redis::Value>> {
        let mut guard = self.inner.lock().await;
        let replies = match &mut *guard {
            RedisConn::Single(c) => pipe.query_async(c).await?,
            RedisConn::Cluster(c) => pipe.query_async(c).await?,
        };
        Ok(replies)
    }

    async fn fetch_string(&self, key: &str) -> Result<Option<String>> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(key);
        self.query(cmd).await
    }

    async fn fetch_json(&self, key: &str, path: &str) -> Result<Option<String>> {
        let mut guard = self.inner.lock().await;
        let value = match &mut *guard {
            RedisConn::Single(c) => c.json_get(key, path).await?,
            RedisConn::Cluster(c) => c.json_get(key, path).await?,
        };
        Ok(value)
    }
}
