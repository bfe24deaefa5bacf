use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::dto::campaigns::CampaignQuery;
use crate::forms::campaign::CampaignForm;
use crate::forms::campaign_type::CampaignTypeForm;
use crate::repository::DieselRepository;
use crate::routes::api::{ApiResult, ApiUser, csv_attachment};
use crate::services::{campaign_types, campaigns, exports};

#[get("/campaign-types")]
pub async fn list_campaign_types(user: ApiUser, repo: web::Data<DieselRepository>) -> ApiResult {
    let types = campaign_types::list_campaign_types(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(types))
}

#[post("/campaign-types")]
pub async fn create_campaign_type(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CampaignTypeForm>,
) -> ApiResult {
    let created = campaign_types::create_campaign_type(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(created))
}

#[put("/campaign-types/{id}")]
pub async fn update_campaign_type(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
    web::Json(form): web::Json<CampaignTypeForm>,
) -> ApiResult {
    let updated =
        campaign_types::update_campaign_type(repo.get_ref(), &user, id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/campaign-types/{id}")]
pub async fn delete_campaign_type(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
) -> ApiResult {
    campaign_types::delete_campaign_type(repo.get_ref(), &user, id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/campaigns/export")]
pub async fn export_campaigns(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<CampaignQuery>,
) -> ApiResult {
    let csv = exports::export_campaigns(repo.get_ref(), &user, &query)?;
    Ok(csv_attachment("campaigns.csv", csv))
}

#[get("/campaigns")]
pub async fn list_campaigns(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<CampaignQuery>,
) -> ApiResult {
    let listing = campaigns::list_campaigns(repo.get_ref(), &user, &query)?;
    Ok(HttpResponse::Ok().json(listing))
}

#[post("/campaigns")]
pub async fn create_campaign(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CampaignForm>,
) -> ApiResult {
    let created = campaigns::create_campaign(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(created))
}

#[get("/campaigns/{id}")]
pub async fn get_campaign(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
) -> ApiResult {
    let campaign = campaigns::get_campaign(repo.get_ref(), &user, id.into_inner())?;
    Ok(HttpResponse::Ok().json(campaign))
}

#[put("/campaigns/{id}")]
pub async fn update_campaign(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
    web::Json(form): web::Json<CampaignForm>,
) -> ApiResult {
    let updated = campaigns::update_campaign(repo.get_ref(), &user, id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/campaigns/{id}")]
pub async fn delete_campaign(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
) -> ApiResult {
    campaigns::delete_campaign(repo.get_ref(), &user, id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
