//! Mapping store
//!
//! 短码 → 长链接的键值存储，所有映射写入时带固定 TTL，过期后视为不存在。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info};

use crate::config::StoreConfig;
use crate::errors::{Result, ShortenerError};

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

/// TTL 上限：30 天
pub const MAX_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[async_trait]
pub trait MappingStore: Send + Sync {
    /// 写入映射，覆盖同一短码上已有的映射，TTL 从写入时刻开始计算
    async fn put(&self, code: &str, long_url: &str, owner_id: &str) -> Result<()>;

    /// 读取长链接，不存在或已过期时返回 `NotFound`
    async fn get(&self, code: &str) -> Result<String>;

    /// 一次往返的存活检查
    async fn health_check(&self) -> Result<()>;

    fn backend_name(&self) -> &'static str;

    fn ttl(&self) -> Duration;
}

/// TTL 必须在 `(0, MAX_TTL]` 内
///
/// Redis 拒绝 `SETEX key 0`，过大的值会让内存后端的过期时间计算溢出。
pub fn validate_ttl(ttl: Duration) -> Result<Duration> {
    if ttl.is_zero() {
        return Err(ShortenerError::config("store ttl must be greater than 0"));
    }
    if ttl > MAX_TTL {
        return Err(ShortenerError::config(format!(
            "store ttl {}s exceeds the maximum of {}s",
            ttl.as_secs(),
            MAX_TTL.as_secs()
        )));
    }
    Ok(ttl)
}

pub struct StoreFactory;

impl StoreFactory {
    /// 按配置创建存储后端，并完成一次健康检查
    ///
    /// 这是启动阶段唯一的一次存活探测；Redis 不可达时返回 `StoreUnavailable`。
    pub async fn create(config: &StoreConfig) -> Result<Arc<dyn MappingStore>> {
        let ttl = validate_ttl(Duration::from_secs(config.ttl))?;

        let store: Arc<dyn MappingStore> = match config.backend.as_str() {
            "redis" => Arc::new(RedisStore::new(&config.redis, ttl)?),
            "memory" => Arc::new(MemoryStore::with_capacity(
                ttl,
                config.memory.max_capacity,
            )?),
            other => {
                return Err(ShortenerError::config(format!(
                    "unknown store backend '{}', expected 'redis' or 'memory'",
                    other
                )));
            }
        };

        store.health_check().await.inspect_err(|e| {
            error!(
                "Mapping store '{}' failed its health check: {}",
                store.backend_name(),
                e
            );
        })?;

        info!(
            "Mapping store ready: backend={}, ttl={}s",
            store.backend_name(),
            config.ttl
        );
        Ok(store)
    }
}
