//! JWT authentication middleware for protecting API endpoints.
//!
//! This middleware extracts the bearer token from the Authorization header,
//! verifies it with the core [`TokenService`] and injects the caller's
//! [`AuthContext`] into the request.

use actix_web::{
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use um_core::{
    domain::entities::token::Claims,
    domain::entities::user::{Actor, Role},
    errors::TokenError,
    services::TokenService,
};
use uuid::Uuid;

const ACCESS_DENIED: &str = "Access denied.";
const INVALID_TOKEN: &str = "Invalid token.";

/// The authenticated caller injected into requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    /// Account id from the token claims
    pub id: Uuid,
    /// Role from the token claims
    pub role: Role,
}

impl AuthContext {
    /// Creates a new authentication context from JWT claims
    pub fn from_claims(claims: &Claims) -> Result<Self, TokenError> {
        let actor = claims.actor()?;
        Ok(Self {
            id: actor.id,
            role: actor.role,
        })
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

#[derive(Serialize)]
struct AuthFailure {
    message: &'static str,
}

fn access_denied_response() -> HttpResponse {
    HttpResponse::Unauthorized().json(AuthFailure {
        message: ACCESS_DENIED,
    })
}

fn invalid_token_response() -> HttpResponse {
    HttpResponse::Forbidden().json(AuthFailure {
        message: INVALID_TOKEN,
    })
}

fn access_denied() -> Error {
    InternalError::from_response(ACCESS_DENIED, access_denied_response()).into()
}

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    tokens: TokenService,
}

impl JwtAuth {
    /// Creates a new JWT authentication middleware verifying with `tokens`
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    tokens: TokenService,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let tokens = self.tokens.clone();

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    let response = access_denied_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            let auth_context = match tokens
                .verify_access_token(&token)
                .and_then(|claims| AuthContext::from_claims(&claims))
            {
                Ok(context) => context,
                Err(e) => {
                    tracing::debug!(error = %e, path = %req.path(), "Token verification failed");
                    let response = invalid_token_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            req.extensions_mut().insert(auth_context);

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthContext>()
                .copied()
                .ok_or_else(access_denied),
        )
    }
}
