use std::future::{Ready, ready};

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
    web,
};
use futures_util::future::LocalBoxFuture;
use log::debug;

use crate::error::ConsoleError;
use crate::state::app_state::AppState;

/// Staff token taken from the `Authorization` header, forwarded upstream as is.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Requires a bearer token on every route it wraps, except the health check.
///
/// The token is not verified here. The persistence API owns authentication
/// and answers 401 for a stale token.
pub struct BearerAuth;

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = BearerAuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware { service }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: S,
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
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
        if req.path().starts_with("/api/health/check") {
            return Box::pin(self.service.call(req));
        }

        let Some(token) = bearer_token(&req) else {
            debug!("Rejecting {} without a bearer token", req.path());
            let login_url = req
                .app_data::<web::Data<AppState>>()
                .map(|state| state.config.login_path.clone())
                .unwrap_or_else(|| "/login".to_string());
            return Box::pin(async move { Err(ConsoleError::Unauthorized { login_url }.into()) });
        };

        req.extensions_mut().insert(BearerToken(token));
        Box::pin(self.service.call(req))
    }
}
