use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::sync::RwLock;
use tracing::{debug, error, trace};

use super::MappingStore;
use crate::config::RedisConfig;
use crate::errors::{Result, ShortenerError};

pub struct RedisStore {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    key_prefix: String,
    ttl: Duration,
}

impl RedisStore {
    /// 由配置创建客户端，不做网络往返
    ///
    /// 连接在第一次使用时建立；启动阶段的 PING 由 `StoreFactory` 发起。
    pub fn new(config: &RedisConfig, ttl: Duration) -> Result<Self> {
        let url = Self::connection_url(config)?;
        let client = redis::Client::open(url).map_err(|e| {
            ShortenerError::config(format!(
                "invalid Redis address '{}': {}",
                config.address, e
            ))
        })?;

        debug!(
            "Redis client created: address={}, db={}",
            config.address, config.db
        );
        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            key_prefix: config.key_prefix.clone(),
            ttl,
        })
    }

    /// 由 address / password / db 拼出连接 URL
    ///
    /// address 可以是 `host:port` 或 `redis://host:port`，其他 scheme（含 `rediss://`）不支持。
    pub fn connection_url(config: &RedisConfig) -> Result<String> {
        let address = config.address.trim();
        let address = match address.split_once("://") {
            None => address,
            Some(("redis", rest)) => rest,
            Some((scheme, _)) => {
                return Err(ShortenerError::config(format!(
                    "unsupported Redis scheme '{}://' in address '{}', use host:port or redis://host:port",
                    scheme, config.address
                )));
            }
        };
        let address = address.trim_end_matches('/');

        if address.is_empty() {
            return Err(ShortenerError::config("Redis address is empty"));
        }

        if config.password.is_empty() {
            Ok(format!("redis://{}/{}", address, config.db))
        } else {
            Ok(format!(
                "redis://:{}@{}/{}",
                urlencoding::encode(&config.password),
                address,
                config.db
            ))
        }
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> std::result::Result<MultiplexedConnection, redis::RedisError> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用），下一次调用会重新建立连接
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    async fn ping(&self) -> std::result::Result<String, redis::RedisError> {
        let mut conn = self.get_connection().await?;
        match redis::cmd("PING").query_async::<String>(&mut conn).await {
            Ok(pong) => Ok(pong),
            Err(e) => {
                self.reset_connection().await;
                Err(e)
            }
        }
    }

    fn make_key(&self, code: &str) -> String {
        format!("{}{}", self.key_prefix, code)
    }
}

#[async_trait]
impl MappingStore for RedisStore {
    async fn put(&self, code: &str, long_url: &str, owner_id: &str) -> Result<()> {
        let key = self.make_key(code);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                self.reset_connection().await;
                return Err(e.into());
            }
        };

        match conn
            .set_ex::<&str, &str, ()>(&key, long_url, self.ttl.as_secs())
            .await
        {
            Ok(()) => {
                trace!("Saved mapping: code={}, owner={}", code, owner_id);
                Ok(())
            }
            Err(e) => {
                error!("Failed to save mapping for '{}': {}", code, e);
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }

    async fn get(&self, code: &str) -> Result<String> {
        let key = self.make_key(code);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                self.reset_connection().await;
                return Err(e.into());
            }
        };

        let result: redis::RedisResult<Option<String>> = conn.get(&key).await;

        match result {
            Ok(Some(long_url)) => {
                trace!("Retrieved mapping: {}", code);
                Ok(long_url)
            }
            Ok(None) => {
                trace!("Mapping not found or expired: {}", code);
                Err(ShortenerError::not_found(format!(
                    "short code '{}' not found",
                    code
                )))
            }
            Err(e) => {
                error!("Failed to read mapping '{}': {}", code, e);
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }

    async fn health_check(&self) -> Result<()> {
        let pong = self.ping().await.map_err(|e| {
            ShortenerError::store_unavailable(format!("Redis is unreachable: {}", e))
        })?;
        trace!("Redis health check: {}", pong);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redis_config(address: &str) -> RedisConfig {
        RedisConfig {
            address: address.to_string(),
            ..RedisConfig::default()
        }
    }

    #[test]
    fn test_connection_url_without_password() {
        let config = redis_config("127.0.0.1:6379");
        assert_eq!(
            RedisStore::connection_url(&config).unwrap(),
            "redis://127.0.0.1:6379/0"
        );
    }

    #[test]
    fn test_connection_url_with_password_and_db() {
        let config = RedisConfig {
            address: "redis://cache.internal:6380/".to_string(),
            password: "p@ss:word".to_string(),
            db: 3,
            key_prefix: String::new(),
        };
        assert_eq!(
            RedisStore::connection_url(&config).unwrap(),
            "redis://:p%40ss%3Aword@cache.internal:6380/3"
        );
    }

    #[test]
    fn test_connection_url_rejects_other_schemes() {
        for address in ["rediss://cache.internal:6380", "unix:///tmp/redis.sock", "http://x:1"] {
            let err = RedisStore::connection_url(&redis_config(address)).unwrap_err();
            assert!(matches!(err, ShortenerError::Config(_)), "{address}");
            assert!(err.message().contains(address));
        }
    }

    #[test]
    fn test_connection_url_rejects_empty_address() {
        for address in ["", "redis://", "   "] {
            let err = RedisStore::connection_url(&redis_config(address)).unwrap_err();
            assert!(matches!(err, ShortenerError::Config(_)));
        }
    }

    #[test]
    fn test_new_does_not_connect() {
        // 端口 1 上不会有 Redis，但创建客户端不应发起连接
        let store = RedisStore::new(&redis_config("127.0.0.1:1"), Duration::from_secs(60));
        assert!(store.is_ok());
    }

    #[tokio::test]
    async fn test_health_check_unreachable_is_store_unavailable() {
        let store =
            RedisStore::new(&redis_config("127.0.0.1:1"), Duration::from_secs(60)).unwrap();
        let err = store.health_check().await.unwrap_err();
        assert!(matches!(err, ShortenerError::StoreUnavailable(_)));
    }

    /// 需要本地 Redis：`cargo test -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn test_round_trip_against_local_redis() {
        let config = RedisConfig {
            key_prefix: "shortener-test:".to_string(),
            ..redis_config("127.0.0.1:6379")
        };
        let store = RedisStore::new(&config, Duration::from_secs(2)).unwrap();
        store.health_check().await.unwrap();

        let url = "https://www.guru3d.com/news-story/spotted-ryzen-threadripper-pro-3995wx-processor-with-8-channel-ddr4,2.html";
        store
            .put("Jsz4k57o", url, "e0dba740-fc4b-4977-872c-d360239e6b1a")
            .await
            .unwrap();
        assert_eq!(store.get("Jsz4k57o").await.unwrap(), url);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let err = store.get("Jsz4k57o").await.unwrap_err();
        assert!(matches!(err, ShortenerError::NotFound(_)));
    }
}
