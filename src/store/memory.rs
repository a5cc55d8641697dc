use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, trace};

use super::{MappingStore, validate_ttl};
use crate::errors::{Result, ShortenerError};

/// 默认最大条目数
pub const DEFAULT_MAX_CAPACITY: u64 = 100_000;

/// 进程内存储，TTL 语义与 Redis 后端一致
///
/// 过期与淘汰交给 moka：读取时过期条目不可见，后台维护任务负责真正移除。
#[derive(Clone)]
pub struct MemoryStore {
    inner: Cache<String, String>,
    ttl: Duration,
}

impl MemoryStore {
    pub fn new(ttl: Duration) -> Result<Self> {
        Self::with_capacity(ttl, DEFAULT_MAX_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, max_capacity: u64) -> Result<Self> {
        let ttl = validate_ttl(ttl)?;
        if max_capacity == 0 {
            return Err(ShortenerError::config(
                "memory store max_capacity must be greater than 0",
            ));
        }

        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        debug!(
            "MemoryStore initialized with max capacity: {}, ttl: {:?}",
            max_capacity, ttl
        );
        Ok(Self { inner, ttl })
    }

    /// 当前保存的条目数，先跑完待处理的维护任务，已过期条目不计入
    pub async fn len(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl MappingStore for MemoryStore {
    async fn put(&self, code: &str, long_url: &str, owner_id: &str) -> Result<()> {
        trace!("MemoryStore put: code={}, owner={}", code, owner_id);
        self.inner
            .insert(code.to_string(), long_url.to_string())
            .await;
        Ok(())
    }

    async fn get(&self, code: &str) -> Result<String> {
        match self.inner.get(code).await {
            Some(long_url) => Ok(long_url),
            None => {
                trace!("MemoryStore miss: {}", code);
                Err(ShortenerError::not_found(format!(
                    "short code '{}' not found",
                    code
                )))
            }
        }
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}
