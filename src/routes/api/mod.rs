//! JSON API under `/api/v1`.
//!
//! Every failure answers `{ "error": "...", "details": {...} | null }`.

use std::collections::BTreeMap;
use std::fmt;
use std::future::{Ready, ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use serde::Serialize;

use crate::domain::auth::AuthenticatedUser;
use crate::services::ServiceError;

pub mod access;
pub mod campaigns;
pub mod inquiries;
pub mod tasks;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    details: Option<&'a BTreeMap<String, Vec<String>>>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(ErrorBody {
            error: &self.message,
            details: self.details.as_ref(),
        })
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized => Self::new(StatusCode::FORBIDDEN, "Access denied"),
            ServiceError::NotFound => Self::new(StatusCode::NOT_FOUND, "Not found"),
            ServiceError::Validation(e) => Self {
                status: StatusCode::BAD_REQUEST,
                message: "Validation failed".to_string(),
                details: Some(e.details()),
            },
            ServiceError::Form(message) => Self::bad_request(message),
            ServiceError::Conflict(message) => Self::new(StatusCode::CONFLICT, message),
            ServiceError::Internal(message) => {
                log::error!("API request failed: {message}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

pub type ApiResult = Result<HttpResponse, ApiError>;

/// The authenticated caller; a missing or invalid identity is a JSON 401.
pub struct ApiUser(pub AuthenticatedUser);

impl Deref for ApiUser {
    type Target = AuthenticatedUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for ApiUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let user = AuthenticatedUser::from_request(req, payload)
            .into_inner()
            .map(ApiUser)
            .map_err(|e| match e.as_response_error().status_code() {
                StatusCode::UNAUTHORIZED => {
                    ApiError::new(StatusCode::UNAUTHORIZED, "Authentication required")
                }
                status => ApiError::new(status, e.to_string()),
            });
        ready(user)
    }
}

/// Malformed JSON bodies, query strings and path segments answer with the
/// same error body as the handlers.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _| ApiError::bad_request(format!("Invalid JSON body: {err}")).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _| ApiError::bad_request(format!("Invalid query: {err}")).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_, _| ApiError::new(StatusCode::NOT_FOUND, "Not found").into())
}

/// CSV payload served as a download.
pub(crate) fn csv_attachment(filename: &str, body: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename.to_string())],
        })
        .body(body)
}

/// Registers every API endpoint. Literal segments (`export`, `trash`,
/// `board`) come before the `{id}` routes that would shadow them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(campaigns::list_campaign_types)
        .service(campaigns::create_campaign_type)
        .service(campaigns::update_campaign_type)
        .service(campaigns::delete_campaign_type)
        .service(campaigns::export_campaigns)
        .service(campaigns::list_campaigns)
        .service(campaigns::create_campaign)
        .service(campaigns::get_campaign)
        .service(campaigns::update_campaign)
        .service(campaigns::delete_campaign)
        .service(inquiries::export_inquiries)
        .service(inquiries::list_trash)
        .service(inquiries::list_inquiries)
        .service(inquiries::create_inquiry)
        .service(inquiries::get_inquiry)
        .service(inquiries::update_inquiry)
        .service(inquiries::trash_inquiry)
        .service(inquiries::change_stage)
        .service(inquiries::add_interaction)
        .service(inquiries::restore_inquiry)
        .service(inquiries::purge_inquiry)
        .service(tasks::board)
        .service(tasks::move_card)
        .service(tasks::list_follow_ups)
        .service(tasks::create_follow_up)
        .service(tasks::update_follow_up)
        .service(tasks::delete_follow_up)
        .service(tasks::list_regular)
        .service(tasks::create_regular)
        .service(tasks::update_regular)
        .service(tasks::delete_regular)
        .service(access::list_users)
        .service(access::create_user)
        .service(access::update_user)
        .service(access::delete_user)
        .service(access::list_roles)
        .service(access::create_role)
        .service(access::update_role)
        .service(access::delete_role)
        .service(access::list_permissions);
}
