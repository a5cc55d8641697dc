use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::api::middleware::RequestId;
use crate::errors::ShortenerError;
use crate::services::ShortenerService;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShortUrlRequest {
    pub long_url: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShortUrlResponse {
    pub message: String,
    pub short_url: String,
}

pub struct ShortenService;

impl ShortenService {
    #[instrument(skip_all, fields(user_id = %body.user_id))]
    pub async fn create_short_url(
        body: web::Json<CreateShortUrlRequest>,
        service: web::Data<Arc<ShortenerService>>,
    ) -> Result<HttpResponse, ShortenerError> {
        let request = body.into_inner();
        let created = service
            .create_short_url(&request.long_url, &request.user_id)
            .await?;

        debug!("Short code {} issued", created.code);

        Ok(HttpResponse::Ok().json(CreateShortUrlResponse {
            message: "short url created successfully".to_string(),
            short_url: created.short_url,
        }))
    }
}

/// JSON 解析失败（缺字段、类型不符、非 JSON）统一转成 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, req| {
            let request_id = RequestId::current(req).map(|id| id.0).unwrap_or_default();
            warn!(request_id = %request_id, "Rejected create request body: {}", err);
            ShortenerError::serialization(err.to_string()).into()
        })
}

/// Shorten 路由配置
pub fn shorten_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/create-short-url",
        web::post().to(ShortenService::create_short_url),
    );
}
