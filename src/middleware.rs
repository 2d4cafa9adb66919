use std::fmt::Display;
use std::task::{Context, Poll};
use std::time::Instant;

use futures::future::BoxFuture;

use crate::http::{Request, Response};
use crate::service::{Layer, Service};

/// Middleware to log requests and the status they were answered with.
pub struct LogLayer;

impl<S> Layer<S> for LogLayer {
    type Service = LogMiddleware<S>;

    fn layer(&self, service: S) -> Self::Service {
        LogMiddleware { inner: service }
    }
}

#[derive(Clone)]
pub struct LogMiddleware<S> {
    inner: S,
}

impl<S> Service for LogMiddleware<S>
where
    S: Service<Response = Response> + Send,
    S::Error: Display + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let method = request.method.to_string();
        let path = request.path.clone();
        tracing::debug!(
            method = %method,
            path = %path,
            version = %request.version,
            body_len = request.body.len(),
            "request received"
        );

        let started = Instant::now();
        let future = self.inner.call(request);

        Box::pin(async move {
            let result = future.await;
            match &result {
                Ok(response) => tracing::info!(
                    method = %method,
                    path = %path,
                    status = response.status_code.as_u16(),
                    elapsed = ?started.elapsed(),
                    "request handled"
                ),
                Err(e) => tracing::error!(
                    method = %method,
                    path = %path,
                    error = %e,
                    "request failed"
                ),
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{StatusCode, parser::parse};
    use crate::service::service_fn;

    #[tokio::test]
    async fn passes_responses_and_errors_through() {
        let mut ok = LogLayer.layer(service_fn(|_request: Request| async {
            Ok::<_, String>(Response::new(StatusCode::CREATED))
        }));
        let response = ok
            .call(parse(b"POST /files/a HTTP/1.1\r\n\r\n").unwrap())
            .await
            .unwrap();
        assert_eq!(response.status_code, StatusCode::CREATED);

        let mut failing = LogLayer.layer(service_fn(|_request: Request| async {
            Err::<Response, _>("boom".to_string())
        }));
        let error = failing
            .call(parse(b"GET / HTTP/1.1\r\n\r\n").unwrap())
            .await
            .unwrap_err();
        assert_eq!(error, "boom");
    }
}
