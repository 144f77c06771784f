//! Request observation: response timing and access logging.
//!
//! Every response gets `X-Response-Time: <ms>ms`, and one `info` line per
//! request is emitted with method, URI, status, and elapsed time.

use std::time::{Duration, Instant};

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

pub const RESPONSE_TIME_HEADER: &str = "x-response-time";

pub async fn track(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let mut res = next.run(req).await;

    let rt = format_response_time(start.elapsed());
    if let Ok(v) = HeaderValue::from_str(&rt) {
        res.headers_mut().insert(RESPONSE_TIME_HEADER, v);
    }

    tracing::info!(%method, %uri, status = res.status().as_u16(), response_time = %rt, "request");
    res
}

fn format_response_time(elapsed: Duration) -> String {
    format!("{}ms", elapsed.as_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_time_is_whole_milliseconds() {
        assert_eq!(format_response_time(Duration::from_micros(400)), "0ms");
        assert_eq!(format_response_time(Duration::from_micros(12_900)), "12ms");
        assert_eq!(format_response_time(Duration::from_secs(2)), "2000ms");
    }
}
