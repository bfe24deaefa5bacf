use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::access::UserQuery;
use crate::forms::role::RoleForm;
use crate::forms::user::UserForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, flash_success, parse_form, render_template, service_failure};
use crate::services::{roles, users};

#[get("/users")]
pub async fn show_users(
    params: web::Query<UserQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match users::load_users_page(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "users",
                &server_config.auth_service_url,
            );
            context.insert("users", &data.users);
            context.insert("roles", &data.roles);
            context.insert("filters", &data.filters);
            render_template(&tera, "access/users.html", &context)
        }
        Err(err) => service_failure(err, "/"),
    }
}

#[post("/users/add")]
pub async fn add_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: UserForm = match parse_form(&body, "/users") {
        Ok(form) => form,
        Err(response) => return response,
    };

    match users::create_user(repo.get_ref(), &user, form) {
        Ok(_) => flash_success("User added.", "/users"),
        Err(err) => service_failure(err, "/users"),
    }
}

#[post("/users/{user_id}/save")]
pub async fn save_user(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: UserForm = match parse_form(&body, "/users") {
        Ok(form) => form,
        Err(response) => return response,
    };

    match users::update_user(repo.get_ref(), &user, user_id.into_inner(), form) {
        Ok(_) => flash_success("User updated.", "/users"),
        Err(err) => service_failure(err, "/users"),
    }
}

#[post("/users/{user_id}/delete")]
pub async fn delete_user(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match users::delete_user(repo.get_ref(), &user, user_id.into_inner()) {
        Ok(()) => flash_success("User removed.", "/users"),
        Err(err) => service_failure(err, "/users"),
    }
}

#[get("/roles")]
pub async fn show_roles(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match roles::load_roles_page(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "roles",
                &server_config.auth_service_url,
            );
            context.insert("roles", &data.roles);
            context.insert("permissions", &data.permissions);
            render_template(&tera, "access/roles.html", &context)
        }
        Err(err) => service_failure(err, "/"),
    }
}

#[post("/roles/add")]
pub async fn add_role(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: RoleForm = match parse_form(&body, "/roles") {
        Ok(form) => form,
        Err(response) => return response,
    };

    match roles::create_role(repo.get_ref(), &user, form) {
        Ok(_) => flash_success("Role created.", "/roles"),
        Err(err) => service_failure(err, "/roles"),
    }
}

#[post("/roles/{role_id}/save")]
pub async fn save_role(
    role_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: RoleForm = match parse_form(&body, "/roles") {
        Ok(form) => form,
        Err(response) => return response,
    };

    match roles::update_role(repo.get_ref(), &user, role_id.into_inner(), form) {
        Ok(_) => flash_success("Role updated.", "/roles"),
        Err(err) => service_failure(err, "/roles"),
    }
}

#[post("/roles/{role_id}/delete")]
pub async fn delete_role(
    role_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match roles::delete_role(repo.get_ref(), &user, role_id.into_inner()) {
        Ok(()) => flash_success("Role deleted.", "/roles"),
        Err(err) => service_failure(err, "/roles"),
    }
}
