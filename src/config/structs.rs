use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShortenerError};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，分隔符为 `__`
pub const ENV_PREFIX: &str = "SHORTENER";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 监听地址、端口、对外短链前缀、worker 数量
/// - store: 映射存储后端与 Redis 连接参数
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：SHORTENER，分隔符：__
    /// 示例：SHORTENER__SERVER__PORT=9999
    pub fn load(path: &str) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ShortenerError::config(format!("failed to build config: {e}")))?;

        settings
            .try_deserialize::<StaticConfig>()
            .map_err(|e| ShortenerError::config(format!("failed to deserialize config: {e}")))
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("# Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ShortenerError::config(format!("failed to render config: {e}")))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// 返回给调用方的短链前缀，短码直接拼接在其后
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 映射存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "redis" 或 "memory"
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// 映射保留时长（秒）
    #[serde(default = "default_store_ttl")]
    pub ttl: u64,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// 内存后端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// 最大条目数，超出后按 moka 的淘汰策略驱逐
    #[serde(default = "default_memory_max_capacity")]
    pub max_capacity: u64,
}

/// Redis 连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// host:port
    #[serde(default = "default_redis_address")]
    pub address: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub db: i64,
    #[serde(default)]
    pub key_prefix: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    9808
}

fn default_base_url() -> String {
    "http://localhost:9808/".to_string()
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_store_backend() -> String {
    "redis".to_string()
}

fn default_store_ttl() -> u64 {
    6 * 60 * 60
}

fn default_memory_max_capacity() -> u64 {
    100_000
}

fn default_redis_address() -> String {
    "127.0.0.1:6379".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            base_url: default_base_url(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            ttl: default_store_ttl(),
            redis: RedisConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_memory_max_capacity(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            address: default_redis_address(),
            password: String::new(),
            db: 0,
            key_prefix: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.server.port, 9808);
        assert_eq!(config.store.backend, "redis");
        assert_eq!(config.store.ttl, 21600);
        assert_eq!(config.store.redis.address, "127.0.0.1:6379");
        assert_eq!(config.store.redis.db, 0);
        assert_eq!(config.store.memory.max_capacity, 100_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 7000
base_url = "https://sho.rt/"

[store]
backend = "memory"
ttl = 60
"#,
        )
        .unwrap();

        let config = StaticConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.base_url, "https://sho.rt/");
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.store.ttl, 60);
        // 未配置的字段回落到默认值
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.store.redis.address, "127.0.0.1:6379");
    }

    #[test]
    fn test_sample_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sample.toml");

        StaticConfig::default().save_to_file(&path).unwrap();
        let loaded = StaticConfig::load(path.to_str().unwrap()).unwrap();

        assert_eq!(loaded.store.ttl, StaticConfig::default().store.ttl);
        assert!(StaticConfig::generate_sample_config().contains("[store.redis]"));
    }
}
