//! Per-address request throttling.
//!
//! Each client address gets a window that opens with its first request and
//! lasts `window`. Once `max_requests` have been admitted inside the window,
//! every further request is rejected until the window expires. Rejected
//! requests never reach a handler, so they never touch the session store.

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use tokio::time::Instant;

use crate::ui::error::ApiError;

/// Default number of requests admitted per window
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Default window length (15 minutes)
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    admitted: u32,
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Keyed window counter
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: DashMap<IpAddr, Window>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: DashMap::new(),
        }
    }

    /// Count a request from `addr` and decide whether it may proceed.
    pub fn check(&self, addr: IpAddr) -> RateLimitDecision {
        let now = Instant::now();
        let mut entry = self.clients.entry(addr).or_insert(Window {
            started_at: now,
            admitted: 0,
        });

        if now.duration_since(entry.started_at) >= self.window {
            *entry = Window {
                started_at: now,
                admitted: 0,
            };
        }

        if entry.admitted >= self.max_requests {
            let retry_after = self.window - now.duration_since(entry.started_at);
            return RateLimitDecision::Limited { retry_after };
        }

        entry.admitted += 1;
        RateLimitDecision::Allowed {
            remaining: self.max_requests - entry.admitted,
        }
    }

    /// Forget windows that have expired. Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.clients.len();
        self.clients
            .retain(|_, window| now.duration_since(window.started_at) < self.window);
        before.saturating_sub(self.clients.len())
    }

    /// Periodically purge expired windows until the task is aborted.
    pub fn spawn_purge_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(limiter.window);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let purged = limiter.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, "Purged expired rate limit windows");
                }
            }
        })
    }
}

/// axum middleware applying a [`RateLimiter`] keyed on the peer address.
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    match limiter.check(peer.ip()) {
        RateLimitDecision::Allowed { .. } => next.run(request).await,
        RateLimitDecision::Limited { retry_after } => {
            tracing::warn!(
                peer = %peer.ip(),
                path = %request.uri().path(),
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            ApiError::rate_limited(retry_after).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
    const OTHER: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 2));

    #[tokio::test(start_paused = true)]
    async fn test_allows_up_to_limit() {
        // テスト項目: ウィンドウ内では上限までのリクエストが許可される
        // given (前提条件):
        let limiter = RateLimiter::new(3, DEFAULT_WINDOW);

        // when (操作) / then (期待する結果):
        assert_eq!(limiter.check(CLIENT), RateLimitDecision::Allowed { remaining: 2 });
        assert_eq!(limiter.check(CLIENT), RateLimitDecision::Allowed { remaining: 1 });
        assert_eq!(limiter.check(CLIENT), RateLimitDecision::Allowed { remaining: 0 });
        assert!(matches!(limiter.check(CLIENT), RateLimitDecision::Limited { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_limited_for_remainder_of_window() {
        // テスト項目: 上限超過後はウィンドウが終わるまで拒否され続け、その後リセットされる
        // given (前提条件):
        let limiter = RateLimiter::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW);
        for _ in 0..DEFAULT_MAX_REQUESTS {
            assert!(matches!(limiter.check(CLIENT), RateLimitDecision::Allowed { .. }));
        }

        // when (操作): 14 分後
        tokio::time::advance(Duration::from_secs(14 * 60)).await;

        // then (期待する結果): まだ拒否され、残り時間は 1 分
        assert_eq!(
            limiter.check(CLIENT),
            RateLimitDecision::Limited {
                retry_after: Duration::from_secs(60)
            }
        );

        // when (操作): ウィンドウ終了後
        tokio::time::advance(Duration::from_secs(60)).await;

        // then (期待する結果):
        assert_eq!(
            limiter.check(CLIENT),
            RateLimitDecision::Allowed {
                remaining: DEFAULT_MAX_REQUESTS - 1
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_addresses_are_independent() {
        // テスト項目: アドレスごとに独立してカウントされる
        let limiter = RateLimiter::new(1, DEFAULT_WINDOW);

        assert!(matches!(limiter.check(CLIENT), RateLimitDecision::Allowed { .. }));
        assert!(matches!(limiter.check(CLIENT), RateLimitDecision::Limited { .. }));
        assert!(matches!(limiter.check(OTHER), RateLimitDecision::Allowed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        // テスト項目: 期限切れのウィンドウだけが削除される
        // given (前提条件):
        let limiter = RateLimiter::new(10, DEFAULT_WINDOW);
        limiter.check(CLIENT);
        tokio::time::advance(Duration::from_secs(10 * 60)).await;
        limiter.check(OTHER);

        // when (操作):
        tokio::time::advance(Duration::from_secs(5 * 60)).await;
        let purged = limiter.purge_expired();

        // then (期待する結果):
        assert_eq!(purged, 1);
        assert_eq!(
            limiter.check(OTHER),
            RateLimitDecision::Allowed { remaining: 8 }
        );
    }
}
