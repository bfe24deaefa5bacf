use actix_identity::Identity;
use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use serde::de::DeserializeOwned;
use tera::{Context, Tera};

use crate::domain::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::services::ServiceError;

pub mod access;
pub mod api;
pub mod campaigns;
pub mod inquiries;
pub mod tasks;

/// Bootstrap alert class for a flash message level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Context shared by every dashboard page.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    home_url: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(e) => {
            log::error!("Failed to render template '{template}': {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Decodes an urlencoded form body that may repeat keys, such as
/// `permission_ids=1&permission_ids=2`.
pub(crate) fn parse_form<T: DeserializeOwned>(body: &[u8], back: &str) -> Result<T, HttpResponse> {
    serde_html_form::from_bytes(body).map_err(|e| {
        log::warn!("Failed to decode form: {e}");
        FlashMessage::error("The form could not be read.").send();
        redirect(back)
    })
}

/// Flashes a successful form submission and goes to `location`.
pub(crate) fn flash_success(message: &str, location: &str) -> HttpResponse {
    FlashMessage::success(message).send();
    redirect(location)
}

/// Maps a failed form submission to a flash message and a redirect back to
/// `back`. Internal errors answer 500.
pub(crate) fn service_failure(err: ServiceError, back: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        ServiceError::NotFound => {
            FlashMessage::error("The record was not found.").send();
            redirect(back)
        }
        ServiceError::Validation(e) => {
            let fields = e.details().into_keys().collect::<Vec<_>>().join(", ");
            FlashMessage::error(format!("Please check the fields: {fields}.")).send();
            redirect(back)
        }
        ServiceError::Form(message) | ServiceError::Conflict(message) => {
            FlashMessage::error(message).send();
            redirect(back)
        }
        ServiceError::Internal(message) => {
            log::error!("Dashboard request failed: {message}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &user, "na", &server_config.auth_service_url);
    render_template(&tera, "main/not_assigned.html", &context)
}

#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect("/")
}
