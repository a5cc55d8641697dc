use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::ShortenerService;
use crate::store::StoreFactory;

pub struct StartupContext {
    pub service: Arc<ShortenerService>,
}

/// 准备服务器启动的上下文
///
/// 存储后端由 `StoreFactory` 创建并完成唯一一次健康检查；失败直接返回错误，进程不启动。
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let store = StoreFactory::create(&config.store)
        .await
        .context("Failed to initialize mapping store")?;

    let service = Arc::new(ShortenerService::new(
        store,
        config.server.base_url.clone(),
    ));

    info!(
        "Pre-startup completed in {} ms, short urls will use base {}",
        start_time.elapsed().as_millis(),
        config.server.base_url
    );

    Ok(StartupContext { service })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RedisConfig, StoreConfig};
    use crate::errors::ShortenerError;

    #[tokio::test]
    async fn test_startup_with_memory_store() {
        let config = StaticConfig {
            store: StoreConfig {
                backend: "memory".to_string(),
                ..StoreConfig::default()
            },
            ..StaticConfig::default()
        };

        let ctx = prepare_server_startup(&config).await.unwrap();
        assert_eq!(ctx.service.store().backend_name(), "memory");
        assert_eq!(ctx.service.base_url(), config.server.base_url);
    }

    #[tokio::test]
    async fn test_startup_fails_when_redis_is_unreachable() {
        let config = StaticConfig {
            store: StoreConfig {
                backend: "redis".to_string(),
                redis: RedisConfig {
                    address: "127.0.0.1:1".to_string(),
                    ..RedisConfig::default()
                },
                ..StoreConfig::default()
            },
            ..StaticConfig::default()
        };

        let err = prepare_server_startup(&config).await.err().unwrap();
        let cause = err.downcast_ref::<ShortenerError>().unwrap();
        assert!(matches!(cause, ShortenerError::StoreUnavailable(_)));
    }
}
