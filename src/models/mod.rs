//! Database models shared across the repository.

pub mod campaign;
pub mod campaign_type;
#[cfg(feature = "server")]
pub mod config;
pub mod inquiry;
pub mod interaction;
pub mod role;
pub mod task;
pub mod user;
