use super::jwt::JwtService;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage, HttpResponse,
};
use actix_web::{FromRequest, HttpRequest};
use futures::future::{err, ok, Ready};
use shared::ErrorResponse;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;

/// Who is calling, attached to the request by `AuthMiddleware`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub user_id: Uuid,
    pub username: String,
}

#[derive(Clone)]
pub struct AuthMiddleware {
    jwt_service: Arc<JwtService>,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self {
            jwt_service: Arc::new(jwt_service),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<actix_web::body::EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
            jwt_service: self.jwt_service.clone(),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    jwt_service: Arc<JwtService>,
}

/// Why a request was turned away before reaching a guarded handler.
#[derive(Debug)]
enum TokenRejection {
    Missing,
    Malformed,
    Invalid(String),
    BadSubject(String),
}

impl TokenRejection {
    fn client_message(&self) -> &'static str {
        match self {
            TokenRejection::Missing | TokenRejection::Malformed => "Authentication required",
            TokenRejection::Invalid(_) => "Session expired or invalid, please log in again",
            TokenRejection::BadSubject(_) => "Invalid token claims",
        }
    }
}

impl std::fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenRejection::Missing => write!(f, "no bearer token"),
            TokenRejection::Malformed => write!(f, "Authorization header is not 'Bearer <token>'"),
            TokenRejection::Invalid(e) => write!(f, "token rejected: {}", e),
            TokenRejection::BadSubject(sub) => write!(f, "token subject is not a user id: {}", sub),
        }
    }
}

fn session_from_request(
    req: &ServiceRequest,
    jwt_service: &JwtService,
) -> Result<SessionContext, TokenRejection> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(TokenRejection::Missing)?;
    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(TokenRejection::Malformed)?;

    let claims = jwt_service
        .verify_token(token)
        .map_err(|e| TokenRejection::Invalid(e.to_string()))?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| TokenRejection::BadSubject(claims.sub))?;

    Ok(SessionContext {
        user_id,
        username: claims.username,
    })
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<actix_web::body::EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let jwt_service = self.jwt_service.clone();

        Box::pin(async move {
            match session_from_request(&req, &jwt_service) {
                Ok(session) => {
                    log::debug!("Session for {} on {}", session.username, req.path());
                    req.extensions_mut().insert(session);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(rejection) => {
                    log::warn!("Rejected {} {}: {}", req.method(), req.path(), rejection);
                    let body = ErrorResponse {
                        error: rejection.client_message().to_string(),
                    };
                    let (http_req, _payload) = req.into_parts();
                    let response = HttpResponse::Unauthorized().json(body).map_into_right_body();
                    Ok(ServiceResponse::new(http_req, response))
                }
            }
        })
    }
}

impl FromRequest for SessionContext {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<SessionContext>() {
            Some(session) => ok(session.clone()),
            None => {
                log::warn!("No session attached to request for path: {}", req.path());
                err(AppError::Unauthorized)
            }
        }
    }
}
