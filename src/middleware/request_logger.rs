//! Request logging middleware.
//!
//! Emits one event when a request arrives and one when its response is
//! ready, under the `api` target. Only the presence of an `Authorization`
//! header is logged, never its value.

use std::future::{Ready, ready};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, USER_AGENT};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

/// Request logger middleware factory.
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

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

/// Outcome class used to pick the log level of the completion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Ok,
    ClientError,
    ServerError,
}

impl Outcome {
    fn of(status: StatusCode) -> Self {
        if status.is_server_error() {
            Self::ServerError
        } else if status.is_client_error() {
            Self::ClientError
        } else {
            Self::Ok
        }
    }
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
        let started = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_owned();

        {
            let conn = req.connection_info();
            let user_agent = req
                .headers()
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            info!(
                target: "api",
                %method,
                %path,
                query = req.query_string(),
                remote_addr = conn.realip_remote_addr().unwrap_or("-"),
                user_agent,
                credentials = req.headers().contains_key(AUTHORIZATION),
                "Request received"
            );
        }

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let status = res.status().as_u16();
            let duration_ms = started.elapsed().as_millis() as u64;

            match Outcome::of(res.status()) {
                Outcome::Ok => {
                    info!(target: "api", %method, %path, status, duration_ms, "Request completed")
                }
                Outcome::ClientError => {
                    warn!(target: "api", %method, %path, status, duration_ms, "Request rejected")
                }
                Outcome::ServerError => {
                    error!(target: "api", %method, %path, status, duration_ms, "Request failed")
                }
            }

            Ok(res)
        })
    }
}
