//! HTTP middleware: request logging, per-IP rate limiting, security headers

pub mod logging;
pub mod rate_limit;
pub mod security;
