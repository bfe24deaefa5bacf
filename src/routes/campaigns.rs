use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::campaigns::CampaignQuery;
use crate::forms::campaign::CampaignForm;
use crate::forms::campaign_type::CampaignTypeForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::api::csv_attachment;
use crate::routes::{base_context, flash_success, parse_form, render_template, service_failure};
use crate::services::{campaign_types, campaigns, exports};

#[get("/campaigns")]
pub async fn show_campaigns(
    params: web::Query<CampaignQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match campaigns::load_campaigns_page(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "campaigns",
                &server_config.auth_service_url,
            );
            context.insert("campaigns", &data.campaigns);
            context.insert("campaign_types", &data.campaign_types);
            context.insert("filters", &data.filters);
            render_template(&tera, "campaigns/index.html", &context)
        }
        Err(err) => service_failure(err, "/"),
    }
}

#[get("/campaigns/export")]
pub async fn export_campaigns(
    params: web::Query<CampaignQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match exports::export_campaigns(repo.get_ref(), &user, &params) {
        Ok(csv) => csv_attachment("campaigns.csv", csv),
        Err(err) => service_failure(err, "/campaigns"),
    }
}

#[post("/campaigns/add")]
pub async fn add_campaign(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: CampaignForm = match parse_form(&body, "/campaigns") {
        Ok(form) => form,
        Err(response) => return response,
    };

    match campaigns::create_campaign(repo.get_ref(), &user, form) {
        Ok(_) => flash_success("Campaign created.", "/campaigns"),
        Err(err) => service_failure(err, "/campaigns"),
    }
}

#[post("/campaigns/{campaign_id}/save")]
pub async fn save_campaign(
    campaign_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: CampaignForm = match parse_form(&body, "/campaigns") {
        Ok(form) => form,
        Err(response) => return response,
    };

    match campaigns::update_campaign(repo.get_ref(), &user, campaign_id.into_inner(), form) {
        Ok(_) => flash_success("Campaign updated.", "/campaigns"),
        Err(err) => service_failure(err, "/campaigns"),
    }
}

#[post("/campaigns/{campaign_id}/delete")]
pub async fn delete_campaign(
    campaign_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match campaigns::delete_campaign(repo.get_ref(), &user, campaign_id.into_inner()) {
        Ok(()) => flash_success("Campaign deleted.", "/campaigns"),
        Err(err) => service_failure(err, "/campaigns"),
    }
}

#[get("/campaign-types")]
pub async fn show_campaign_types(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match campaign_types::list_campaign_types(repo.get_ref(), &user) {
        Ok(campaign_types) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "campaign_types",
                &server_config.auth_service_url,
            );
            context.insert("campaign_types", &campaign_types);
            render_template(&tera, "campaigns/types.html", &context)
        }
        Err(err) => service_failure(err, "/"),
    }
}

#[post("/campaign-types/add")]
pub async fn add_campaign_type(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: CampaignTypeForm = match parse_form(&body, "/campaign-types") {
        Ok(form) => form,
        Err(response) => return response,
    };

    match campaign_types::create_campaign_type(repo.get_ref(), &user, form) {
        Ok(_) => flash_success("Campaign type created.", "/campaign-types"),
        Err(err) => service_failure(err, "/campaign-types"),
    }
}

#[post("/campaign-types/{type_id}/save")]
pub async fn save_campaign_type(
    type_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: CampaignTypeForm = match parse_form(&body, "/campaign-types") {
        Ok(form) => form,
        Err(response) => return response,
    };

    match campaign_types::update_campaign_type(repo.get_ref(), &user, type_id.into_inner(), form)
    {
        Ok(_) => flash_success("Campaign type updated.", "/campaign-types"),
        Err(err) => service_failure(err, "/campaign-types"),
    }
}

#[post("/campaign-types/{type_id}/delete")]
pub async fn delete_campaign_type(
    type_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match campaign_types::delete_campaign_type(repo.get_ref(), &user, type_id.into_inner()) {
        Ok(()) => flash_success("Campaign type deleted.", "/campaign-types"),
        Err(err) => service_failure(err, "/campaign-types"),
    }
}
