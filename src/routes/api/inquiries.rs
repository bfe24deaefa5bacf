use actix_web::{HttpResponse, delete, get, patch, post, put, web};

use crate::dto::inquiries::InquiryQuery;
use crate::forms::inquiry::{InquiryForm, InteractionForm, StageForm};
use crate::repository::DieselRepository;
use crate::routes::api::{ApiResult, ApiUser, csv_attachment};
use crate::services::{exports, inquiries};

#[get("/inquiries/export")]
pub async fn export_inquiries(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<InquiryQuery>,
) -> ApiResult {
    let csv = exports::export_inquiries(repo.get_ref(), &user, &query)?;
    Ok(csv_attachment("inquiries.csv", csv))
}

#[get("/inquiries/trash")]
pub async fn list_trash(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<InquiryQuery>,
) -> ApiResult {
    let listing = inquiries::list_inquiries(repo.get_ref(), &user, &query, true)?;
    Ok(HttpResponse::Ok().json(listing))
}

#[get("/inquiries")]
pub async fn list_inquiries(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<InquiryQuery>,
) -> ApiResult {
    let listing = inquiries::list_inquiries(repo.get_ref(), &user, &query, false)?;
    Ok(HttpResponse::Ok().json(listing))
}

#[post("/inquiries")]
pub async fn create_inquiry(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<InquiryForm>,
) -> ApiResult {
    let created = inquiries::create_inquiry(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(created))
}

/// Inquiry with its interactions, follow-ups and answers.
#[get("/inquiries/{id}")]
pub async fn get_inquiry(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
) -> ApiResult {
    let detail = inquiries::get_inquiry_detail(repo.get_ref(), &user, id.into_inner())?;
    Ok(HttpResponse::Ok().json(detail))
}

#[put("/inquiries/{id}")]
pub async fn update_inquiry(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
    web::Json(form): web::Json<InquiryForm>,
) -> ApiResult {
    let updated = inquiries::update_inquiry(repo.get_ref(), &user, id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Moves the inquiry to the trash.
#[delete("/inquiries/{id}")]
pub async fn trash_inquiry(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
) -> ApiResult {
    let trashed = inquiries::trash_inquiry(repo.get_ref(), &user, id.into_inner())?;
    Ok(HttpResponse::Ok().json(trashed))
}

#[patch("/inquiries/{id}/stage")]
pub async fn change_stage(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
    web::Json(form): web::Json<StageForm>,
) -> ApiResult {
    let updated = inquiries::change_stage(repo.get_ref(), &user, id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(updated))
}

#[post("/inquiries/{id}/interactions")]
pub async fn add_interaction(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
    web::Json(form): web::Json<InteractionForm>,
) -> ApiResult {
    let interaction = inquiries::add_interaction(repo.get_ref(), &user, id.into_inner(), form)?;
    Ok(HttpResponse::Created().json(interaction))
}

#[post("/inquiries/{id}/restore")]
pub async fn restore_inquiry(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
) -> ApiResult {
    let restored = inquiries::restore_inquiry(repo.get_ref(), &user, id.into_inner())?;
    Ok(HttpResponse::Ok().json(restored))
}

#[delete("/inquiries/{id}/purge")]
pub async fn purge_inquiry(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
) -> ApiResult {
    inquiries::purge_inquiry(repo.get_ref(), &user, id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
