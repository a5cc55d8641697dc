pub mod health;
pub mod redirect;
pub mod shorten;

pub use health::{AppStartTime, HealthService, health_routes};
pub use redirect::{RedirectService, redirect_routes};
pub use shorten::{
    CreateShortUrlRequest, CreateShortUrlResponse, ShortenService, json_config, shorten_routes,
};
