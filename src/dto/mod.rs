//! DTO modules that bridge services with templates and APIs.

pub mod access;
pub mod campaigns;
pub mod inquiries;
pub mod tasks;
