//! Metrics middleware for API routes.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::metrics::{
    normalize_path, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION,
};

/// Keeps the in-flight gauge raised while a request is being served.
///
/// Dropped together with the request future, so a client that disconnects
/// mid-request still decrements the gauge.
struct InFlight;

impl InFlight {
    fn start() -> Self {
        HTTP_REQUESTS_IN_FLIGHT.inc();
        InFlight
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        HTTP_REQUESTS_IN_FLIGHT.dec();
    }
}

/// Route label for a request: the route template when one matched,
/// otherwise the path with ids replaced.
fn route_label(request: &Request<Body>) -> String {
    match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => normalize_path(request.uri().path()),
    }
}

/// Records duration, count and in-flight requests, labelled by method, route and status.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let route = route_label(&request);

    let start = Instant::now();
    let in_flight = InFlight::start();
    let response = next.run(request).await;
    drop(in_flight);

    let status = response.status().as_u16().to_string();
    let labels = [method.as_str(), route.as_str(), status.as_str()];
    HTTP_REQUEST_DURATION
        .with_label_values(&labels)
        .observe(start.elapsed().as_secs_f64());
    HTTP_REQUESTS_TOTAL.with_label_values(&labels).inc();

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::StatusCode,
        middleware,
        routing::{delete, get},
        Router,
    };
    use tower::ServiceExt;

    async fn ok_handler() -> &'static str {
        "OK"
    }

    fn app() -> Router {
        Router::new()
            .nest(
                "/api/v1",
                Router::new()
                    .route("/movies/{id}", get(ok_handler))
                    .route("/watchlist/{id}", delete(ok_handler)),
            )
            .layer(middleware::from_fn(metrics_middleware))
    }

    fn count(method: &str, route: &str, status: &str) -> u64 {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&[method, route, status])
            .get()
    }

    async fn send(method: &str, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_matched_route_template_is_the_label() {
        let before = count("GET", "/api/v1/movies/{id}", "200");
        assert_eq!(send("GET", "/api/v1/movies/27205").await, StatusCode::OK);
        assert!(count("GET", "/api/v1/movies/{id}", "200") > before);

        // Numeric-looking string ids share the same label
        let before = count("DELETE", "/api/v1/watchlist/{id}", "200");
        assert_eq!(send("DELETE", "/api/v1/watchlist/007").await, StatusCode::OK);
        assert!(count("DELETE", "/api/v1/watchlist/{id}", "200") > before);
    }

    #[tokio::test]
    async fn test_unmatched_path_is_normalized() {
        let before = count("GET", "/api/v1/people/{id}", "404");
        assert_eq!(
            send("GET", "/api/v1/people/525").await,
            StatusCode::NOT_FOUND
        );
        assert!(count("GET", "/api/v1/people/{id}", "404") > before);
    }
}
