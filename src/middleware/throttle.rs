use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request, StatusCode, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use redis::AsyncCommands;

use crate::{
    config::Config,
    utils::{error_codes, error_to_api_response, verify_token},
};

/// 固定窗口限流器
///
/// 带有效令牌的请求按用户ID计数，其余请求按客户端IP计数，
/// 两类桶的配额独立配置
#[derive(Clone)]
pub struct RateLimiter {
    redis: Arc<redis::Client>,
    config: Arc<Config>,
}

impl RateLimiter {
    pub fn new(redis: redis::Client, config: Config) -> Self {
        Self {
            redis: Arc::new(redis),
            config: Arc::new(config),
        }
    }

    pub async fn check_rate_limit(
        self: Arc<Self>,
        bearer: Option<&str>,
        req: Request<Body>,
        next: Next,
    ) -> Result<Response, StatusCode> {
        // 令牌解析失败一律按匿名处理，目录接口本身不要求登录
        let claims = bearer.and_then(|token| verify_token(token, &self.config).ok());

        let (key, limit) = match claims {
            Some(claims) => (
                format!("throttle:user:{}", claims.sub),
                self.config.throttle_user_requests,
            ),
            None => {
                let remote_ip = req
                    .extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ci| ci.0.ip().to_string());
                let ip = client_ip(req.headers(), remote_ip);
                (
                    format!("throttle:anon:{}", ip),
                    self.config.throttle_anon_requests,
                )
            }
        };

        let mut conn = self
            .redis
            .get_multiplexed_async_connection()
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        // 使用 Redis 的 INCR 和 EXPIRE 命令实现计数器
        let count: i32 = conn
            .incr(&key, 1)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        if count == 1 {
            // 窗口内第一次请求，设置过期时间
            let _: () = conn
                .expire(&key, self.config.throttle_window().as_secs() as i64)
                .await
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        }

        if count > limit as i32 {
            let window_secs = self.config.throttle_window().as_secs();
            tracing::debug!("请求被限流: {} 第{}次", key, count);
            return Ok((
                StatusCode::TOO_MANY_REQUESTS,
                [(RETRY_AFTER, window_secs.to_string())],
                error_to_api_response::<()>(
                    error_codes::RATE_LIMIT,
                    format!("请求过于频繁，请在{}秒后重试", window_secs),
                ),
            )
                .into_response());
        }

        Ok(next.run(req).await)
    }
}

/// 提取客户端IP，代理头优先，连接地址兜底
fn client_ip(headers: &HeaderMap, remote_ip: Option<String>) -> String {
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .map(|ip| ip.trim().to_string())
        .or(remote_ip)
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn throttle(
    State(limiter): State<Arc<RateLimiter>>,
    auth: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    // 缺失或格式不对的 Authorization 头都算匿名请求
    let bearer = auth
        .as_ref()
        .ok()
        .map(|TypedHeader(Authorization(bearer))| bearer.token());

    limiter.check_rate_limit(bearer, req, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn real_ip_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("1.2.3.4"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("5.6.7.8"));

        assert_eq!(client_ip(&headers, Some("9.9.9.9".to_string())), "1.2.3.4");
    }

    #[test]
    fn forwarded_for_takes_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("10.0.0.1, 10.0.0.2"),
        );

        assert_eq!(client_ip(&headers, None), "10.0.0.1");
    }

    #[test]
    fn forwarded_for_skips_empty_entries() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(" , 10.0.0.2"));

        assert_eq!(client_ip(&headers, None), "10.0.0.2");
    }

    #[test]
    fn falls_back_to_connection_address() {
        let headers = HeaderMap::new();

        assert_eq!(client_ip(&headers, Some("192.168.1.5".to_string())), "192.168.1.5");
        assert_eq!(client_ip(&headers, None), "unknown");
    }
}
