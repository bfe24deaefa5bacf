#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::middleware::{Compress, Logger, from_fn};
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::db::establish_connection_pool;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;

pub mod db;
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
#[cfg(feature = "server")]
pub mod services;

pub const SERVICE_ACCESS_ROLE: &str = "leads";
pub const SERVICE_ADMIN_ROLE: &str = "leads_admin";

/// Minimum secret length accepted for cookie signing and token checks.
pub const MIN_SECRET_LEN: usize = 64;

/// Registers the dashboard pages. Callers wrap the scope with the sign-in
/// redirect.
#[cfg(feature = "server")]
pub fn configure_dashboard(cfg: &mut web::ServiceConfig) {
    use crate::routes::{access, campaigns, inquiries, logout, not_assigned, tasks};

    cfg.service(inquiries::index)
        .service(campaigns::export_campaigns)
        .service(campaigns::show_campaigns)
        .service(campaigns::add_campaign)
        .service(campaigns::save_campaign)
        .service(campaigns::delete_campaign)
        .service(campaigns::show_campaign_types)
        .service(campaigns::add_campaign_type)
        .service(campaigns::save_campaign_type)
        .service(campaigns::delete_campaign_type)
        .service(inquiries::show_trash)
        .service(inquiries::export_inquiries)
        .service(inquiries::show_inquiries)
        .service(inquiries::add_inquiry)
        .service(inquiries::show_inquiry)
        .service(inquiries::save_inquiry)
        .service(inquiries::change_stage)
        .service(inquiries::add_interaction)
        .service(inquiries::add_follow_up)
        .service(inquiries::trash_inquiry)
        .service(inquiries::restore_inquiry)
        .service(inquiries::purge_inquiry)
        .service(tasks::show_board)
        .service(tasks::move_card)
        .service(tasks::add_regular_task)
        .service(tasks::save_regular_task)
        .service(tasks::save_follow_up_task)
        .service(tasks::delete_task)
        .service(access::show_users)
        .service(access::add_user)
        .service(access::save_user)
        .service(access::delete_user)
        .service(access::show_roles)
        .service(access::add_role)
        .service(access::save_role)
        .service(access::delete_role)
        .service(not_assigned)
        .service(logout);
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    if server_config.secret.len() < MIN_SECRET_LEN {
        return Err(std::io::Error::other(format!(
            "The secret must be at least {MIN_SECRET_LEN} bytes long"
        )));
    }

    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(web::scope("/api/v1").configure(routes::api::configure))
            .service(
                web::scope("")
                    .wrap(from_fn(middleware::redirect_unauthorized))
                    .configure(configure_dashboard),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
