//! Domain aggregates exposed by the service layer.

pub mod auth;
pub mod board;
pub mod campaign;
pub mod campaign_type;
pub mod inquiry;
pub mod interaction;
pub mod role;
pub mod task;
pub mod types;
pub mod user;
