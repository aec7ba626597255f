//! Per-IP fixed-window rate limiting
//!
//! Every `/api` route shares the configured global budget; sync triggers and
//! chat messages have their own, stricter budgets on top.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::state::AppState;

/// Sync triggers per IP per window
const SYNC_MAX: u32 = 5;
const SYNC_WINDOW_SECS: u64 = 60;
/// Chat messages per IP per window
const CHAT_MAX: u32 = 20;
const CHAT_WINDOW_SECS: u64 = 60;

/// Idle entries older than this are purged
const ENTRY_TTL: Duration = Duration::from_secs(300);

struct IpEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    /// bucket name -> (IP -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
    /// Global budget
    max_requests: u32,
    window_secs: u64,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window_secs,
        }
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub async fn check(&self, bucket: &'static str, ip: &str, max_requests: u32, window_secs: u64) -> bool {
        let mut map = self.inner.lock().await;
        let bucket_map = map.entry(bucket).or_default();
        let now = Instant::now();

        let entry = bucket_map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start).as_secs() >= window_secs {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= max_requests
    }

    /// Drop entries idle for five minutes that are also past the global window
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let now = Instant::now();
        let window = Duration::from_secs(self.window_secs);

        for bucket_map in map.values_mut() {
            // Entries still inside the global window keep their count
            bucket_map.retain(|_, entry| {
                let age = now.duration_since(entry.window_start);
                age < ENTRY_TTL || age < window
            });
        }
        map.retain(|_, bucket_map| !bucket_map.is_empty());
    }
}

/// Client IP: first `X-Forwarded-For` entry, then the peer address.
fn extract_ip(request: &Request) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

async fn limit(
    limiter: &RateLimiter,
    bucket: &'static str,
    max_requests: u32,
    window_secs: u64,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = extract_ip(&request);
    if !limiter.check(bucket, &ip, max_requests, window_secs).await {
        tracing::warn!(bucket, ip = %ip, "Rate limit exceeded");
        return Err(AppError::too_many_requests());
    }
    Ok(next.run(request).await)
}

/// Global budget for every `/api` route
pub async fn api_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let limiter = &state.rate_limiter;
    limit(limiter, "api", limiter.max_requests, limiter.window_secs, request, next).await
}

/// Sync triggers: 5 requests/minute per IP
pub async fn sync_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    limit(&state.rate_limiter, "sync", SYNC_MAX, SYNC_WINDOW_SECS, request, next).await
}

/// Chat: 20 requests/minute per IP
pub async fn chat_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    limit(&state.rate_limiter, "chat", CHAT_MAX, CHAT_WINDOW_SECS, request, next).await
}
