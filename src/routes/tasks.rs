use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::task::TaskKind;
use crate::domain::types::{TaskPriority, TaskStatus};
use crate::dto::tasks::BoardQuery;
use crate::forms::task::{FollowUpTaskForm, MoveTaskForm, RegularTaskForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    base_context, flash_success, parse_form, redirect, render_template, service_failure,
};
use crate::services::{ServiceError, tasks};

const BOARD_URL: &str = "/tasks";

#[get("/tasks")]
pub async fn show_board(
    params: web::Query<BoardQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match tasks::load_board_page(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "tasks",
                &server_config.auth_service_url,
            );
            context.insert("board", &data.board);
            context.insert("users", &data.users);
            context.insert("filters", &data.filters);
            context.insert("statuses", &TaskStatus::ALL);
            context.insert("priorities", &TaskPriority::ALL);
            render_template(&tera, "tasks/board.html", &context)
        }
        Err(err) => service_failure(err, "/"),
    }
}

/// Form fallback for the board move when scripts are disabled.
#[post("/tasks/move")]
pub async fn move_card(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: MoveTaskForm = match parse_form(&body, BOARD_URL) {
        Ok(form) => form,
        Err(response) => return response,
    };

    match tasks::move_task(repo.get_ref(), &user, form) {
        Ok(outcome) if outcome.moved => flash_success("Task moved.", BOARD_URL),
        Ok(_) => redirect(BOARD_URL),
        Err(err) => service_failure(err, BOARD_URL),
    }
}

#[post("/tasks/regular/add")]
pub async fn add_regular_task(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: RegularTaskForm = match parse_form(&body, BOARD_URL) {
        Ok(form) => form,
        Err(response) => return response,
    };

    match tasks::create_regular_task(repo.get_ref(), &user, form) {
        Ok(_) => flash_success("Task created.", BOARD_URL),
        Err(err) => service_failure(err, BOARD_URL),
    }
}

#[post("/tasks/regular/{task_id}/save")]
pub async fn save_regular_task(
    task_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: RegularTaskForm = match parse_form(&body, BOARD_URL) {
        Ok(form) => form,
        Err(response) => return response,
    };

    match tasks::update_regular_task(repo.get_ref(), &user, task_id.into_inner(), form) {
        Ok(_) => flash_success("Task updated.", BOARD_URL),
        Err(err) => service_failure(err, BOARD_URL),
    }
}

#[post("/tasks/follow-up/{task_id}/save")]
pub async fn save_follow_up_task(
    task_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: FollowUpTaskForm = match parse_form(&body, BOARD_URL) {
        Ok(form) => form,
        Err(response) => return response,
    };

    match tasks::update_follow_up_task(repo.get_ref(), &user, task_id.into_inner(), form) {
        Ok(_) => flash_success("Follow-up updated.", BOARD_URL),
        Err(err) => service_failure(err, BOARD_URL),
    }
}

#[post("/tasks/{kind}/{task_id}/delete")]
pub async fn delete_task(
    path: web::Path<(String, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (kind, task_id) = path.into_inner();
    let kind = match kind.as_str() {
        "follow-up" => TaskKind::FollowUp,
        "regular" => TaskKind::Regular,
        _ => return service_failure(ServiceError::NotFound, BOARD_URL),
    };

    match tasks::delete_task(repo.get_ref(), &user, kind, task_id) {
        Ok(()) => flash_success("Task deleted.", BOARD_URL),
        Err(err) => service_failure(err, BOARD_URL),
    }
}
