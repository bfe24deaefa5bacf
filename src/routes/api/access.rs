use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::dto::access::UserQuery;
use crate::forms::role::RoleForm;
use crate::forms::user::UserForm;
use crate::repository::DieselRepository;
use crate::routes::api::{ApiResult, ApiUser};
use crate::services::{roles, users};

#[get("/users")]
pub async fn list_users(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<UserQuery>,
) -> ApiResult {
    let listing = users::list_users(repo.get_ref(), &user, &query)?;
    Ok(HttpResponse::Ok().json(listing))
}

#[post("/users")]
pub async fn create_user(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UserForm>,
) -> ApiResult {
    let created = users::create_user(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(created))
}

#[put("/users/{id}")]
pub async fn update_user(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
    web::Json(form): web::Json<UserForm>,
) -> ApiResult {
    let updated = users::update_user(repo.get_ref(), &user, id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/users/{id}")]
pub async fn delete_user(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
) -> ApiResult {
    users::delete_user(repo.get_ref(), &user, id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/roles")]
pub async fn list_roles(user: ApiUser, repo: web::Data<DieselRepository>) -> ApiResult {
    let roles = roles::list_roles(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(roles))
}

#[post("/roles")]
pub async fn create_role(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<RoleForm>,
) -> ApiResult {
    let created = roles::create_role(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(created))
}

#[put("/roles/{id}")]
pub async fn update_role(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
    web::Json(form): web::Json<RoleForm>,
) -> ApiResult {
    let updated = roles::update_role(repo.get_ref(), &user, id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/roles/{id}")]
pub async fn delete_role(
    user: ApiUser,
    repo: web::Data<DieselRepository>,
    id: web::Path<i32>,
) -> ApiResult {
    roles::delete_role(repo.get_ref(), &user, id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/permissions")]
pub async fn list_permissions(user: ApiUser, repo: web::Data<DieselRepository>) -> ApiResult {
    let permissions = roles::list_permissions(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(permissions))
}
