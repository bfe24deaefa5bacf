use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{InteractionKind, Stage};
use crate::dto::inquiries::InquiryQuery;
use crate::forms::inquiry::{InquiryForm, InteractionForm, StageForm};
use crate::forms::task::FollowUpTaskForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::api::csv_attachment;
use crate::routes::{
    base_context, flash_success, parse_form, redirect, render_template, service_failure,
};
use crate::services::{exports, inquiries, tasks};

fn inquiry_url(id: i32) -> String {
    format!("/inquiries/{id}")
}

#[get("/")]
pub async fn index() -> impl Responder {
    redirect("/inquiries")
}

fn show_list(
    trashed: bool,
    params: InquiryQuery,
    user: &AuthenticatedUser,
    repo: &DieselRepository,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    tera: &Tera,
) -> actix_web::HttpResponse {
    let (page, template) = if trashed {
        ("trash", "inquiries/trash.html")
    } else {
        ("inquiries", "inquiries/index.html")
    };

    match inquiries::load_inquiries_page(repo, user, params, trashed) {
        Ok(data) => {
            let mut context =
                base_context(flash_messages, user, page, &server_config.auth_service_url);
            context.insert("inquiries", &data.inquiries);
            context.insert("campaigns", &data.options.campaigns);
            context.insert("users", &data.options.users);
            context.insert("filters", &data.filters);
            context.insert("stages", &Stage::ALL);
            render_template(tera, template, &context)
        }
        Err(err) => service_failure(err, "/na"),
    }
}

#[get("/inquiries")]
pub async fn show_inquiries(
    params: web::Query<InquiryQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    show_list(
        false,
        params.into_inner(),
        &user,
        &repo,
        &flash_messages,
        &server_config,
        &tera,
    )
}

#[get("/inquiries/trash")]
pub async fn show_trash(
    params: web::Query<InquiryQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    show_list(
        true,
        params.into_inner(),
        &user,
        &repo,
        &flash_messages,
        &server_config,
        &tera,
    )
}

#[get("/inquiries/export")]
pub async fn export_inquiries(
    params: web::Query<InquiryQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match exports::export_inquiries(repo.get_ref(), &user, &params) {
        Ok(csv) => csv_attachment("inquiries.csv", csv),
        Err(err) => service_failure(err, "/inquiries"),
    }
}

#[get("/inquiries/{inquiry_id}")]
pub async fn show_inquiry(
    inquiry_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match inquiries::load_inquiry_page(repo.get_ref(), &user, inquiry_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "inquiries",
                &server_config.auth_service_url,
            );
            context.insert("detail", &data.detail);
            context.insert("campaigns", &data.options.campaigns);
            context.insert("users", &data.options.users);
            context.insert("stages", &Stage::ALL);
            context.insert("interaction_kinds", &InteractionKind::manual());
            render_template(&tera, "inquiries/detail.html", &context)
        }
        Err(err) => service_failure(err, "/inquiries"),
    }
}

#[post("/inquiries/add")]
pub async fn add_inquiry(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: InquiryForm = match parse_form(&body, "/inquiries") {
        Ok(form) => form,
        Err(response) => return response,
    };

    match inquiries::create_inquiry(repo.get_ref(), &user, form) {
        Ok(inquiry) => flash_success("Inquiry created.", &inquiry_url(inquiry.id.get())),
        Err(err) => service_failure(err, "/inquiries"),
    }
}

#[post("/inquiries/{inquiry_id}/save")]
pub async fn save_inquiry(
    inquiry_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let id = inquiry_id.into_inner();
    let back = inquiry_url(id);
    let form: InquiryForm = match parse_form(&body, &back) {
        Ok(form) => form,
        Err(response) => return response,
    };

    match inquiries::update_inquiry(repo.get_ref(), &user, id, form) {
        Ok(_) => flash_success("Inquiry updated.", &back),
        Err(err) => service_failure(err, &back),
    }
}

#[post("/inquiries/{inquiry_id}/stage")]
pub async fn change_stage(
    inquiry_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let id = inquiry_id.into_inner();
    let back = inquiry_url(id);
    let form: StageForm = match parse_form(&body, &back) {
        Ok(form) => form,
        Err(response) => return response,
    };

    match inquiries::change_stage(repo.get_ref(), &user, id, form) {
        Ok(inquiry) => flash_success(&format!("Stage set to {}.", inquiry.stage), &back),
        Err(err) => service_failure(err, &back),
    }
}

#[post("/inquiries/{inquiry_id}/interactions")]
pub async fn add_interaction(
    inquiry_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let id = inquiry_id.into_inner();
    let back = inquiry_url(id);
    let form: InteractionForm = match parse_form(&body, &back) {
        Ok(form) => form,
        Err(response) => return response,
    };

    match inquiries::add_interaction(repo.get_ref(), &user, id, form) {
        Ok(_) => flash_success("Interaction recorded.", &back),
        Err(err) => service_failure(err, &back),
    }
}

/// Follow-up created from the inquiry detail page; the seeker comes from the
/// path, not the form.
#[post("/inquiries/{inquiry_id}/follow-ups")]
pub async fn add_follow_up(
    inquiry_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let id = inquiry_id.into_inner();
    let back = inquiry_url(id);
    let mut form: FollowUpTaskForm = match parse_form(&body, &back) {
        Ok(form) => form,
        Err(response) => return response,
    };
    form.inquiry_id = id;

    match tasks::create_follow_up_task(repo.get_ref(), &user, form) {
        Ok(_) => flash_success("Follow-up scheduled.", &back),
        Err(err) => service_failure(err, &back),
    }
}

#[post("/inquiries/{inquiry_id}/trash")]
pub async fn trash_inquiry(
    inquiry_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match inquiries::trash_inquiry(repo.get_ref(), &user, inquiry_id.into_inner()) {
        Ok(_) => flash_success("Inquiry moved to the trash.", "/inquiries"),
        Err(err) => service_failure(err, "/inquiries"),
    }
}

#[post("/inquiries/{inquiry_id}/restore")]
pub async fn restore_inquiry(
    inquiry_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match inquiries::restore_inquiry(repo.get_ref(), &user, inquiry_id.into_inner()) {
        Ok(_) => flash_success("Inquiry restored.", "/inquiries/trash"),
        Err(err) => service_failure(err, "/inquiries/trash"),
    }
}

#[post("/inquiries/{inquiry_id}/purge")]
pub async fn purge_inquiry(
    inquiry_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match inquiries::purge_inquiry(repo.get_ref(), &user, inquiry_id.into_inner()) {
        Ok(()) => flash_success("Inquiry deleted permanently.", "/inquiries/trash"),
        Err(err) => service_failure(err, "/inquiries/trash"),
    }
}
