pub mod shortener;

pub use shortener::{ShortUrl, ShortenerService, validate_long_url};
