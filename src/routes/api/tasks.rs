use actix_web::{HttpResponse, delete, get, patch, post, put, web};

use crate::domain::task::TaskKind;
use crate::dto::tasks::{BoardQuery, TaskQuery};
use crate::forms::task::{FollowUpTaskForm, MoveTaskForm, RegularTaskForm};
use crate::repository::DieselRepository;
use crate::routes::api::{ApiResult, ApiUser};
use crate::services::tasks;

#[get("/tasks/board")]
pub async fn board(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<BoardQuery>,
) -> ApiResult {
    let board = tasks::load_board(repo.get_ref(), &user, &query)?;
    Ok(HttpResponse::Ok().json(board))
}

/// Drops a card on a column or on another card. Answers with the card as
/// stored, so a client that moved it optimistically can reconcile.
#[patch("/tasks/board/move")]
pub async fn move_card(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<MoveTaskForm>,
) -> ApiResult {
    let outcome = tasks::move_task(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[get("/tasks/follow-up")]
pub async fn list_follow_ups(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<TaskQuery>,
) -> ApiResult {
    let tasks = tasks::list_follow_up_tasks(repo.get_ref(), &user, &query)?;
    Ok(HttpResponse::Ok().json(tasks))
}

#[post("/tasks/follow-up")]
pub async fn create_follow_up(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<FollowUpTaskForm>,
) -> ApiResult {
    let created = tasks::create_follow_up_task(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(created))
}

#[put("/tasks/follow-up/{id}")]
pub async fn update_follow_up(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
    web::Json(form): web::Json<FollowUpTaskForm>,
) -> ApiResult {
    let updated = tasks::update_follow_up_task(repo.get_ref(), &user, id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/tasks/follow-up/{id}")]
pub async fn delete_follow_up(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
) -> ApiResult {
    tasks::delete_task(repo.get_ref(), &user, TaskKind::FollowUp, id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/tasks/regular")]
pub async fn list_regular(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<TaskQuery>,
) -> ApiResult {
    let tasks = tasks::list_regular_tasks(repo.get_ref(), &user, &query)?;
    Ok(HttpResponse::Ok().json(tasks))
}

#[post("/tasks/regular")]
pub async fn create_regular(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<RegularTaskForm>,
) -> ApiResult {
    let created = tasks::create_regular_task(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(created))
}

#[put("/tasks/regular/{id}")]
pub async fn update_regular(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
    web::Json(form): web::Json<RegularTaskForm>,
) -> ApiResult {
    let updated = tasks::update_regular_task(repo.get_ref(), &user, id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/tasks/regular/{id}")]
pub async fn delete_regular(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
) -> ApiResult {
    tasks::delete_task(repo.get_ref(), &user, TaskKind::Regular, id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
