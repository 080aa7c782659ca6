//! Request logging middleware for API calls.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Request logger middleware factory.
///
/// `/api` calls are logged at info level (warn for error statuses);
/// static assets and uploads only at debug level.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

/// Request logger middleware service.
pub struct RequestLoggerMiddleware<S> {
    service: S,
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let api = is_api_path(&path);

        if api {
            let remote_addr = req
                .connection_info()
                .realip_remote_addr()
                .unwrap_or("unknown")
                .to_string();
            info!(
                target: "api",
                method = %method,
                path = %path,
                query = %req.query_string(),
                remote_addr = %remote_addr,
                "→ Request started"
            );
        }

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let status = res.status();
            let duration_ms = start.elapsed().as_millis();

            if !api {
                debug!(
                    target: "api",
                    method = %method,
                    path = %path,
                    status = %status.as_u16(),
                    duration_ms = %duration_ms,
                    "Static request"
                );
            } else if status.is_success() || status.is_redirection() {
                info!(
                    target: "api",
                    method = %method,
                    path = %path,
                    status = %status.as_u16(),
                    duration_ms = %duration_ms,
                    "← Request completed"
                );
            } else if status.is_client_error() {
                warn!(
                    target: "api",
                    method = %method,
                    path = %path,
                    status = %status.as_u16(),
                    duration_ms = %duration_ms,
                    "← Client error"
                );
            } else {
                warn!(
                    target: "api",
                    method = %method,
                    path = %path,
                    status = %status.as_u16(),
                    duration_ms = %duration_ms,
                    "← Server error"
                );
            }

            Ok(res)
        })
    }
}
