//! Shortening service
//!
//! 串联短码生成与映射存储，HTTP 层与 CLI 共享同一套业务逻辑。

use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use crate::errors::{Result, ShortenerError};
use crate::generator::{generate_short_code, is_valid_short_code};
use crate::store::MappingStore;

/// Result of a successful shortening request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrl {
    pub code: String,
    /// `base_url` 与短码直接拼接
    pub short_url: String,
}

pub struct ShortenerService {
    store: Arc<dyn MappingStore>,
    base_url: String,
}

impl ShortenerService {
    pub fn new(store: Arc<dyn MappingStore>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: base_url.into(),
        }
    }

    pub fn store(&self) -> &Arc<dyn MappingStore> {
        &self.store
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create (or refresh) the mapping for `(long_url, user_id)`.
    ///
    /// The code is derived from the inputs, so repeating a request rewrites
    /// the same key and restarts its TTL. A different pair that happens to
    /// collide on the same code silently replaces the earlier mapping.
    pub async fn create_short_url(&self, long_url: &str, user_id: &str) -> Result<ShortUrl> {
        validate_long_url(long_url)?;
        if user_id.trim().is_empty() {
            return Err(ShortenerError::validation("user_id is required"));
        }

        let code = generate_short_code(long_url, user_id)?;
        self.store.put(&code, long_url, user_id).await?;

        let short_url = format!("{}{}", self.base_url, code);
        info!("Created short url: {} -> {}", code, long_url);

        Ok(ShortUrl { code, short_url })
    }

    /// Resolve a short code back to its long URL.
    pub async fn resolve(&self, code: &str) -> Result<String> {
        if !is_valid_short_code(code) {
            debug!("Rejected malformed short code: {}", code);
            return Err(ShortenerError::not_found(format!(
                "short code '{}' not found",
                code
            )));
        }

        self.store.get(code).await
    }
}

/// 长链接必须是带 host 的 http(s) URL
pub fn validate_long_url(long_url: &str) -> Result<()> {
    if long_url.trim().is_empty() {
        return Err(ShortenerError::validation("long_url is required"));
    }

    let parsed = Url::parse(long_url)
        .map_err(|e| ShortenerError::validation(format!("invalid long_url: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ShortenerError::validation(format!(
                "unsupported scheme '{}', only http and https are allowed",
                other
            )));
        }
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ShortenerError::validation("long_url must have a host"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::time::Duration;

    fn service() -> ShortenerService {
        let store = Arc::new(MemoryStore::new(Duration::from_secs(60)).unwrap());
        ShortenerService::new(store, "http://localhost:9808/")
    }

    #[test]
    fn test_validate_long_url() {
        assert!(validate_long_url("https://example.com").is_ok());
        assert!(validate_long_url("HTTP://example.com/path?q=1").is_ok());
        assert!(validate_long_url("").is_err());
        assert!(validate_long_url("   ").is_err());
        assert!(validate_long_url("example.com").is_err());
        assert!(validate_long_url("javascript:alert(1)").is_err());
        assert!(validate_long_url("ftp://example.com/file").is_err());
        assert!(validate_long_url("file:///etc/passwd").is_err());
    }

    #[tokio::test]
    async fn test_create_then_resolve() {
        let service = service();
        let url = "https://www.guru3d.com/news-story/spotted-ryzen-threadripper-pro-3995wx-processor-with-8-channel-ddr4,2.html";

        let created = service
            .create_short_url(url, "e0dba740-fc4b-4977-872c-d360239e6b1a")
            .await
            .unwrap();

        assert_eq!(created.code, "jTa4L57P");
        assert_eq!(created.short_url, "http://localhost:9808/jTa4L57P");
        assert_eq!(service.resolve(&created.code).await.unwrap(), url);
    }

    #[tokio::test]
    async fn test_create_requires_user_id() {
        let err = service()
            .create_short_url("https://example.com", " ")
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_resolve_malformed_code_is_not_found() {
        let err = service().resolve("not-a-code").await.unwrap_err();
        assert!(matches!(err, ShortenerError::NotFound(_)));
    }
}
