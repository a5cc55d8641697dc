//! HTTP layer
//!
//! 路由注册顺序：`/`、`/health`、`/create-short-url`，最后是通配的 `/{code}`。

use actix_web::web;

pub mod middleware;
pub mod services;

/// 注册全部路由，服务器与测试共用
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(services::json_config());
    services::health_routes(cfg);
    services::shorten_routes(cfg);
    services::redirect_routes(cfg);
}
