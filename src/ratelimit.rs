use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::{AppError, AppResult};

pub struct RateLimits {
    pub api: Limiter,
    pub swipes: Limiter,
}

impl RateLimits {
    pub fn new() -> Arc<RateLimits> {
        Arc::new(RateLimits {
            api: Limiter::new(
                100,
                Duration::from_secs(15 * 60),
                "Too many requests from this IP, please try again later.",
            ),
            swipes: Limiter::new(30, Duration::from_secs(60), "Too many swipes, please slow down."),
        })
    }
}

/// Fixed per-IP request window.
pub struct Limiter {
    max: u32,
    window: Duration,
    message: &'static str,
    hits: Mutex<HashMap<IpAddr, (Instant, u32)>>,
}

impl Limiter {
    pub fn new(max: u32, window: Duration, message: &'static str) -> Limiter {
        Limiter {
            max,
            window,
            message,
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub fn check(&self, ip: IpAddr) -> Result<(), AppError> {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap();

        let slot = hits.entry(ip).or_insert((now, 0));
        if now.duration_since(slot.0) >= self.window {
            *slot = (now, 0);
        }
        slot.1 += 1;

        if slot.1 > self.max {
            return Err(AppError::RateLimited(self.message));
        }

        if hits.len() > 4096 {
            let window = self.window;
            hits.retain(|_, slot| now.duration_since(slot.0) < window);
        }

        Ok(())
    }
}

pub async fn general(
    State(limits): State<Arc<RateLimits>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> AppResult<Response> {
    limits.api.check(addr.ip())?;
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    use super::Limiter;

    #[test]
    fn rejects_past_the_window_cap() {
        let limiter = Limiter::new(2, Duration::from_secs(60), "slow down");
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);

        assert!(limiter.check(ip).is_ok());
        assert!(limiter.check(ip).is_ok());
        assert!(limiter.check(ip).is_err());
    }

    #[test]
    fn windows_are_per_ip() {
        let limiter = Limiter::new(1, Duration::from_secs(60), "slow down");

        assert!(limiter.check(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))).is_ok());
        assert!(limiter.check(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2))).is_ok());
        assert!(limiter.check(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))).is_err());
    }
}
