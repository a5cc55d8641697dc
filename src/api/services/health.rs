use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, trace};

use crate::services::ShortenerService;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub timestamp: String,
    pub uptime: u64,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct HealthService;

impl HealthService {
    pub async fn welcome() -> impl Responder {
        HttpResponse::Ok().json(serde_json::json!({
            "message": "shortener is running"
        }))
    }

    pub async fn health_check(
        service: web::Data<Arc<ShortenerService>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start = Instant::now();
        trace!("Received health check request");

        let store = service.store();
        let check = store.health_check().await;
        if let Err(ref e) = check {
            error!("Store health check failed: {}", e);
        }

        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;
        let healthy = check.is_ok();

        let body = HealthResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            backend: store.backend_name().to_string(),
            timestamp: now.to_rfc3339(),
            uptime,
            response_time_ms: start.elapsed().as_millis() as u64,
            error: check.err().map(|e| e.to_string()),
        };

        if healthy {
            HttpResponse::Ok().json(body)
        } else {
            HttpResponse::ServiceUnavailable().json(body)
        }
    }
}

/// Health 路由配置
pub fn health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(HealthService::welcome))
        .route("/health", web::get().to(HealthService::health_check))
        .route("/health", web::head().to(HealthService::health_check));
}
