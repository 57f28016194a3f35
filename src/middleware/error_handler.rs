use axum::{
    body::{Body, to_bytes},
    http::{HeaderValue, Request, header},
    middleware::Next,
    response::Response,
};
use tracing::error;
use uuid::Uuid;

/// 请求日志中间件
///
/// 每个响应都带上 x-request-id；服务端错误把响应体一并记下来，方便排查
pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = std::time::Instant::now();

    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }

    if response.status().is_server_error() {
        let (mut parts, body) = response.into_parts();
        let bytes = match to_bytes(body, 1024).await {
            Ok(b) => b,
            Err(e) => {
                error!("Failed to read error response body: {}", e);
                return Response::from_parts(parts, Body::empty());
            }
        };
        let body_str = String::from_utf8_lossy(&bytes);

        error!(
            "Server error occurred - Request: {} {} {}, Status: {}, Elapsed: {}ms, Body: {}",
            request_id,
            method,
            uri,
            parts.status,
            started.elapsed().as_millis(),
            body_str
        );

        // 重置body以便重新构建响应
        parts.headers.remove(header::CONTENT_LENGTH);
        return Response::from_parts(parts, Body::from(bytes));
    }

    response
}
