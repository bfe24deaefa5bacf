//! Request authentication.
//!
//! The external auth service issues an HS256 JWT. API clients send it as a
//! bearer token; the dashboard keeps it as the actix-identity id.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::http::{StatusCode, header};
use actix_web::middleware::Next;
use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, web};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::domain::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;

const DEFAULT_SIGNIN_URL: &str = "/auth/signin";

/// Turns 401 responses into a redirect to the sign-in page.
///
/// Wrapped around dashboard scopes with `middleware::from_fn`.
pub async fn redirect_unauthorized(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let signin_url = req
        .app_data::<web::Data<ServerConfig>>()
        .map(|config| config.signin_url())
        .unwrap_or_else(|| DEFAULT_SIGNIN_URL.to_string());

    let res = next.call(req).await?;
    if res.status() != StatusCode::UNAUTHORIZED {
        return Ok(res.map_into_boxed_body());
    }

    let (req, _) = res.into_parts();
    let response = HttpResponse::SeeOther()
        .insert_header((header::LOCATION, signin_url))
        .finish();
    Ok(ServiceResponse::new(req, response))
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Verifies the signature and expiry of an identity token.
pub fn decode_token(
    token: &str,
    secret: &str,
) -> Result<AuthenticatedUser, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    decode::<AuthenticatedUser>(token, &key, &validation).map(|data| data.claims)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let config = req
        .app_data::<web::Data<ServerConfig>>()
        .ok_or_else(|| ErrorInternalServerError("server configuration is not registered"))?;

    let token = match bearer_token(req) {
        Some(token) => token,
        None => req
            .get_identity()
            .ok()
            .and_then(|identity| identity.id().ok())
            .ok_or_else(|| ErrorUnauthorized("missing identity"))?,
    };

    decode_token(&token, &config.secret).map_err(|e| {
        log::warn!("Rejected identity token: {e}");
        ErrorUnauthorized("invalid identity")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    const SECRET: &str = "0123456789012345678901234567890123456789012345678901234567890123";

    fn claims(exp: usize) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".into(),
            email: "admin@example.com".into(),
            hub_id: 1,
            name: "Admin".into(),
            roles: vec!["leads_admin".into()],
            exp,
        }
    }

    fn token(exp: usize) -> String {
        encode(
            &Header::default(),
            &claims(exp),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn future_exp() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn bearer_prefix_is_required() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Token abc"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc"));
    }

    #[test]
    fn valid_token_decodes() {
        let exp = future_exp();
        let user = decode_token(&token(exp), SECRET).unwrap();
        assert_eq!(user, claims(exp));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let other = "x".repeat(64);
        assert!(decode_token(&token(future_exp()), &other).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        assert!(decode_token(&token(1_000), SECRET).is_err());
    }
}
