use actix_web::http::header::{CACHE_CONTROL, LOCATION};
use actix_web::{HttpResponse, web};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::errors::ShortenerError;
use crate::services::ShortenerService;

pub struct RedirectService;

impl RedirectService {
    #[instrument(skip_all, fields(code = %path))]
    pub async fn handle_redirect(
        path: web::Path<String>,
        service: web::Data<Arc<ShortenerService>>,
    ) -> Result<HttpResponse, ShortenerError> {
        let code = path.into_inner();

        let long_url = service.resolve(&code).await.inspect_err(|e| {
            debug!("Redirect failed for {}: {}", code, e);
        })?;

        Ok(HttpResponse::Found()
            .insert_header((LOCATION, long_url))
            // 映射会过期，不让客户端缓存跳转
            .insert_header((CACHE_CONTROL, "no-store"))
            .finish())
    }
}

/// Redirect 路由配置，必须最后注册
pub fn redirect_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{code}", web::get().to(RedirectService::handle_redirect))
        .route("/{code}", web::head().to(RedirectService::handle_redirect));
}
